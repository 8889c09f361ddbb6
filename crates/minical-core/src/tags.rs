use tracing::debug;

use crate::model::Tag;

pub const DEFAULT_TAG_NAMES: [&str; 3] = ["Meeting", "Interview", "Appointment"];

/// An entry in a selection menu. Plain labels (view modes) and tags are
/// kept apart so selection handlers match on them exhaustively.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MenuItem {
    Label(String),
    Tag(Tag),
}

impl MenuItem {
    pub fn label(&self) -> &str {
        match self {
            MenuItem::Label(label) => label,
            MenuItem::Tag(tag) => &tag.name,
        }
    }

    pub fn swatch(&self) -> Option<&str> {
        match self {
            MenuItem::Label(_) => None,
            MenuItem::Tag(tag) => tag.swatch(),
        }
    }
}

/// Tags in insertion order, unique by name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagSet {
    tags: Vec<Tag>,
}

impl TagSet {
    pub fn with_defaults() -> Self {
        let mut set = Self::default();
        for name in DEFAULT_TAG_NAMES {
            set.add(name, None);
        }
        set
    }

    pub fn from_tags(tags: Vec<Tag>) -> Self {
        let mut set = Self::default();
        for tag in tags {
            set.add(&tag.name, tag.color);
        }
        set
    }

    /// Adds a tag, or updates the colour of an existing one with the same
    /// name. Blank names are ignored. Returns whether anything changed.
    pub fn add(&mut self, name: &str, color: Option<String>) -> bool {
        let name = name.trim();
        if name.is_empty() {
            return false;
        }

        if let Some(existing) = self.tags.iter_mut().find(|tag| tag.name == name) {
            if color.is_some() && existing.color != color {
                debug!(tag = %name, "updating tag colour");
                existing.color = color;
                return true;
            }
            return false;
        }

        debug!(tag = %name, "adding tag");
        self.tags.push(Tag::new(name, color));
        true
    }

    pub fn remove(&mut self, name: &str) -> Option<Tag> {
        let idx = self.tags.iter().position(|tag| tag.name == name.trim())?;
        Some(self.tags.remove(idx))
    }

    pub fn get(&self, name: &str) -> Option<&Tag> {
        self.tags.iter().find(|tag| tag.name == name.trim())
    }

    pub fn iter(&self) -> impl Iterator<Item = &Tag> {
        self.tags.iter()
    }

    pub fn len(&self) -> usize {
        self.tags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }

    pub fn menu_items(&self) -> Vec<MenuItem> {
        self.tags.iter().cloned().map(MenuItem::Tag).collect()
    }

    pub fn into_tags(self) -> Vec<Tag> {
        self.tags
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::CalendarMode;

    #[test]
    fn add_trims_and_deduplicates_by_name() {
        let mut set = TagSet::with_defaults();
        assert_eq!(set.len(), 3);

        assert!(set.add("  Gym ", Some("#00ff00".to_string())));
        assert!(!set.add("Gym", None));
        assert!(!set.add("   ", None));
        assert_eq!(set.len(), 4);
        assert_eq!(set.get("Gym").and_then(Tag::swatch), Some("#00ff00"));

        assert!(set.add("Gym", Some("red".to_string())));
        assert_eq!(set.len(), 4);
        assert_eq!(set.get("Gym").and_then(Tag::swatch), Some("red"));
    }

    #[test]
    fn remove_returns_the_tag() {
        let mut set = TagSet::with_defaults();
        let removed = set.remove("Interview").expect("tag present");
        assert_eq!(removed.name, "Interview");
        assert!(set.get("Interview").is_none());
        assert!(set.remove("Interview").is_none());
    }

    #[test]
    fn from_tags_collapses_duplicates() {
        let set = TagSet::from_tags(vec![
            Tag::new("Meeting", None),
            Tag::new("Meeting", Some("blue".to_string())),
        ]);
        assert_eq!(set.len(), 1);
        assert_eq!(set.get("Meeting").and_then(Tag::swatch), Some("blue"));
    }

    #[test]
    fn menu_items_keep_labels_and_tags_apart() {
        let mut set = TagSet::default();
        set.add("Meeting", Some("#ff0000".to_string()));
        let items = set.menu_items();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].label(), "Meeting");
        assert_eq!(items[0].swatch(), Some("#ff0000"));

        let modes = CalendarMode::menu_items();
        let labels = modes.iter().map(MenuItem::label).collect::<Vec<_>>();
        assert_eq!(labels, vec!["Year", "Month", "Week", "Day"]);
        assert!(modes.iter().all(|item| matches!(item, MenuItem::Label(_))));
    }
}
