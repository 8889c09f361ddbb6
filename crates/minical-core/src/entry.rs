//! Rules of the "add event" form.

use chrono::NaiveDate;
use thiserror::Error;

use crate::model::{Event, EventId};
use crate::tags::TagSet;
use crate::time_axis::parse_minutes;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DraftError {
    #[error("{0} is required")]
    MissingField(&'static str),

    #[error("unknown tag '{0}'")]
    UnknownTag(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DraftWarning {
    /// Same-day event whose end time is not after its start time.
    EndNotAfterStart,
}

impl DraftWarning {
    pub fn message(self) -> &'static str {
        match self {
            DraftWarning::EndNotAfterStart => "End time must be after start time",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventDraft {
    pub title: String,
    pub tag: String,
    pub description: String,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub start_time: String,
    pub end_time: String,
}

impl EventDraft {
    /// Sets both ends of the date range, ordering them the way the range
    /// picker does when the second pick precedes the first.
    pub fn set_date_range(&mut self, first: NaiveDate, second: NaiveDate) {
        if second < first {
            self.start_date = Some(second);
            self.end_date = Some(first);
        } else {
            self.start_date = Some(first);
            self.end_date = Some(second);
        }
    }

    pub fn validate(&self) -> Result<(), DraftError> {
        let required = [
            ("title", self.title.as_str()),
            ("tag", self.tag.as_str()),
            ("description", self.description.as_str()),
        ];
        for (name, value) in required {
            if value.trim().is_empty() {
                return Err(DraftError::MissingField(name));
            }
        }

        if self.start_date.is_none() {
            return Err(DraftError::MissingField("start date"));
        }
        if self.end_date.is_none() {
            return Err(DraftError::MissingField("end date"));
        }
        if self.start_time.is_empty() {
            return Err(DraftError::MissingField("start time"));
        }
        if self.end_time.is_empty() {
            return Err(DraftError::MissingField("end time"));
        }

        Ok(())
    }

    pub fn is_valid(&self) -> bool {
        self.validate().is_ok()
    }

    /// Non-blocking problems shown next to the form.
    pub fn warnings(&self) -> Vec<DraftWarning> {
        let mut warnings = Vec::new();
        let same_day = self.start_date.is_some() && self.start_date == self.end_date;
        if same_day
            && !self.start_time.is_empty()
            && !self.end_time.is_empty()
            && parse_minutes(&self.end_time) <= parse_minutes(&self.start_time)
        {
            warnings.push(DraftWarning::EndNotAfterStart);
        }
        warnings
    }

    /// Builds the event, taking the tag colour from `tags`.
    pub fn into_event(self, id: EventId, tags: &TagSet) -> Result<Event, DraftError> {
        self.validate()?;
        let tag = tags
            .get(&self.tag)
            .cloned()
            .ok_or_else(|| DraftError::UnknownTag(self.tag.trim().to_string()))?;

        Ok(Event {
            id,
            title: self.title.trim().to_string(),
            tag,
            description: self.description.trim().to_string(),
            start_date: self.start_date,
            end_date: self.end_date,
            start_time: self.start_time,
            end_time: self.end_time,
        })
    }
}
