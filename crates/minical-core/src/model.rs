use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

pub type EventId = u64;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Tag {
    pub name: String,

    /// CSS colour used as the event swatch. Not validated.
    #[serde(default)]
    pub color: Option<String>,
}

impl Tag {
    pub fn new(name: impl Into<String>, color: Option<String>) -> Self {
        Self {
            name: name.into(),
            color,
        }
    }

    /// The colour to paint, or `None` when the host default applies.
    pub fn swatch(&self) -> Option<&str> {
        self.color
            .as_deref()
            .map(str::trim)
            .filter(|color| !color.is_empty())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub id: EventId,

    pub title: String,

    pub tag: Tag,

    #[serde(default)]
    pub description: String,

    #[serde(default)]
    pub start_date: Option<NaiveDate>,

    #[serde(default)]
    pub end_date: Option<NaiveDate>,

    /// "HH:MM", 24-hour.
    #[serde(default)]
    pub start_time: String,

    #[serde(default)]
    pub end_time: String,
}

impl Event {
    /// True when `date` lies in the inclusive `[start_date, end_date]` range.
    /// Events missing either bound never match.
    pub fn spans(&self, date: NaiveDate) -> bool {
        match (self.start_date, self.end_date) {
            (Some(start), Some(end)) => start <= date && date <= end,
            _ => false,
        }
    }

    /// Start date of an event that has both dates. Undated events are left
    /// out of every grid projection.
    pub fn dated_start(&self) -> Option<NaiveDate> {
        self.end_date.and(self.start_date)
    }

    pub fn starts_on(&self, date: NaiveDate) -> bool {
        self.dated_start() == Some(date)
    }
}
