use std::cell::RefCell;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, anyhow};
use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;
use tracing::{debug, info};

use crate::model::{Event, EventId, Tag};
use crate::tags::TagSet;

/// Everything the application persists: events plus the tag list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(default)]
    pub events: Vec<Event>,

    #[serde(default)]
    pub tags: Vec<Tag>,
}

impl Default for Snapshot {
    fn default() -> Self {
        Self {
            events: vec![],
            tags: TagSet::with_defaults().into_tags(),
        }
    }
}

impl Snapshot {
    pub fn tag_set(&self) -> TagSet {
        TagSet::from_tags(self.tags.clone())
    }

    #[tracing::instrument(skip(self, event), fields(id = event.id))]
    pub fn push_event(&mut self, event: Event) {
        self.events.push(event);
        self.events.sort_by_key(|event| event.id);
    }
}

/// Read/write capability handed to the application shell. The calendar view
/// never talks to a store; it only receives the event list.
pub trait CalendarStore {
    fn load(&self) -> anyhow::Result<Snapshot>;
    fn save(&self, snapshot: &Snapshot) -> anyhow::Result<()>;
}

/// A single JSON document on disk.
#[derive(Debug)]
pub struct FileStore {
    pub path: PathBuf,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl CalendarStore for FileStore {
    #[tracing::instrument(skip(self), fields(file = %self.path.display()))]
    fn load(&self) -> anyhow::Result<Snapshot> {
        if !self.path.exists() {
            info!(file = %self.path.display(), "store file missing; starting empty");
            return Ok(Snapshot::default());
        }

        let raw = fs::read_to_string(&self.path)
            .with_context(|| format!("failed reading {}", self.path.display()))?;
        if raw.trim().is_empty() {
            return Ok(Snapshot::default());
        }

        let snapshot: Snapshot = serde_json::from_str(&raw)
            .with_context(|| format!("failed parsing {}", self.path.display()))?;
        debug!(
            events = snapshot.events.len(),
            tags = snapshot.tags.len(),
            "loaded snapshot"
        );
        Ok(snapshot)
    }

    #[tracing::instrument(skip(self, snapshot), fields(file = %self.path.display()))]
    fn save(&self, snapshot: &Snapshot) -> anyhow::Result<()> {
        save_json_atomic(&self.path, snapshot)
            .with_context(|| format!("failed to save {}", self.path.display()))
    }
}

/// In-process store for embedding hosts and tests.
#[derive(Debug, Default)]
pub struct MemoryStore {
    snapshot: RefCell<Snapshot>,
}

impl MemoryStore {
    pub fn new(snapshot: Snapshot) -> Self {
        Self {
            snapshot: RefCell::new(snapshot),
        }
    }
}

impl CalendarStore for MemoryStore {
    fn load(&self) -> anyhow::Result<Snapshot> {
        Ok(self.snapshot.borrow().clone())
    }

    fn save(&self, snapshot: &Snapshot) -> anyhow::Result<()> {
        *self.snapshot.borrow_mut() = snapshot.clone();
        Ok(())
    }
}

/// Sequential ids: one past the highest id in use, starting at 1. Fails once
/// the highest id is `u64::MAX`.
pub fn next_event_id(events: &[Event]) -> anyhow::Result<EventId> {
    let highest = events.iter().map(|event| event.id).max().unwrap_or(0);
    highest
        .checked_add(1)
        .ok_or_else(|| anyhow!("no event id left after {highest}"))
}

fn save_json_atomic(path: &Path, snapshot: &Snapshot) -> anyhow::Result<()> {
    debug!(
        file = %path.display(),
        events = snapshot.events.len(),
        "saving snapshot atomically"
    );

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    fs::create_dir_all(dir).with_context(|| format!("failed to create {}", dir.display()))?;

    let mut temp = NamedTempFile::new_in(dir)?;
    let serialized = serde_json::to_string_pretty(snapshot)?;
    writeln!(temp, "{serialized}")?;
    temp.flush()?;

    temp.persist(path)
        .map_err(|err| anyhow!("failed to persist {}: {}", path.display(), err))?;

    Ok(())
}
