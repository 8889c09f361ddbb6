//! Composes grid building, projection and the time axis into a renderable
//! view, and tracks the transient hover popup.

use chrono::{Datelike, NaiveDate};
use tracing::{debug, trace};

use crate::grid::{CalendarMode, GridCell, build_grid};
use crate::model::{Event, EventId};
use crate::projector::{events_on_day, month_event_count, project_onto_cell};
use crate::time_axis::{EventBlock, TimeAxis};
use crate::view_state::{Navigation, ViewState};

/// Screen rectangle of a hovered element, in pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnchorRect {
    pub top: f64,
    pub left: f64,
    pub bottom: f64,
    pub right: f64,
}

/// Where the popup goes: just below the hovered element's left edge.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PopupPosition {
    pub top: f64,
    pub left: f64,
}

impl From<AnchorRect> for PopupPosition {
    fn from(rect: AnchorRect) -> Self {
        Self {
            top: rect.bottom,
            left: rect.left,
        }
    }
}

/// The hovered event's fields, formatted for display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PopupDetails {
    pub id: EventId,
    pub tag: String,
    pub description: String,
    pub date: String,
    pub time: String,
}

impl PopupDetails {
    pub fn from_event(event: &Event) -> Self {
        Self {
            id: event.id,
            tag: event.tag.name.clone(),
            description: event.description.clone(),
            date: event
                .start_date
                .map(|date| date.format("%b %d, %Y").to_string())
                .unwrap_or_default(),
            time: format!("{} - {}", event.start_time, event.end_time),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct HoverPopup {
    pub event_id: EventId,
    pub position: PopupPosition,
    pub details: PopupDetails,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MonthTile {
    pub cell: GridCell,
    pub label: String,
    pub event_count: usize,
}

impl MonthTile {
    pub fn summary(&self) -> String {
        format!("{} events", self.event_count)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CellEvent<'a> {
    pub event: &'a Event,
    /// First spanned date of a multi-day event.
    pub is_start: bool,
    /// Last spanned date of a multi-day event.
    pub is_end: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DayCell<'a> {
    pub date: NaiveDate,
    pub label: String,
    /// False for padding days from the neighbouring months.
    pub in_month: bool,
    pub is_reference: bool,
    pub events: Vec<CellEvent<'a>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct HourRow {
    pub hour: u32,
    pub label: String,
    pub top: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DayTimeline<'a> {
    pub date: NaiveDate,
    pub day_height: f64,
    pub hours: Vec<HourRow>,
    pub blocks: Vec<EventBlock<'a>>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ViewBody<'a> {
    Year(Vec<MonthTile>),
    Month(Vec<DayCell<'a>>),
    Week(Vec<DayCell<'a>>),
    Day(DayTimeline<'a>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct RenderedView<'a> {
    pub state: ViewState,
    pub title: String,
    pub drill_up_label: Option<&'static str>,
    pub body: ViewBody<'a>,
}

/// The calendar surface: current view state, an event snapshot, the Day view
/// geometry and the hover popup.
#[derive(Debug, Clone)]
pub struct CalendarView {
    state: ViewState,
    events: Vec<Event>,
    axis: TimeAxis,
    hover: Option<HoverPopup>,
}

impl CalendarView {
    pub fn new(state: ViewState, events: Vec<Event>, axis: TimeAxis) -> Self {
        debug!(
            mode = %state.mode,
            reference = %state.reference,
            events = events.len(),
            "calendar view created"
        );
        Self {
            state,
            events,
            axis,
            hover: None,
        }
    }

    pub fn state(&self) -> ViewState {
        self.state
    }

    /// Replaces the event snapshot. A hover on an event that no longer exists
    /// is dropped.
    pub fn set_events(&mut self, events: Vec<Event>) {
        debug!(events = events.len(), "event snapshot replaced");
        self.events = events;
        if let Some(hover) = &self.hover
            && !self.events.iter().any(|event| event.id == hover.event_id)
        {
            self.hover = None;
        }
    }

    pub fn navigate(&mut self, nav: Navigation) -> ViewState {
        self.state = self.state.apply(nav);
        self.hover = None;
        self.state
    }

    /// Records a hover over `event_id` anchored at `anchor`. Unknown ids clear
    /// the popup.
    pub fn hover(&mut self, event_id: EventId, anchor: AnchorRect) -> Option<&HoverPopup> {
        let Some(event) = self.events.iter().find(|event| event.id == event_id) else {
            debug!(id = event_id, "hover on unknown event ignored");
            self.hover = None;
            return None;
        };

        trace!(id = event_id, ?anchor, "event hovered");
        self.hover = Some(HoverPopup {
            event_id,
            position: PopupPosition::from(anchor),
            details: PopupDetails::from_event(event),
        });
        self.hover.as_ref()
    }

    pub fn unhover(&mut self) {
        self.hover = None;
    }

    pub fn popup(&self) -> Option<&HoverPopup> {
        self.hover.as_ref()
    }

    pub fn render(&self) -> RenderedView<'_> {
        let state = self.state;
        let cells = build_grid(state.mode, state.reference);

        let body = match state.mode {
            CalendarMode::Year => ViewBody::Year(
                cells
                    .into_iter()
                    .filter_map(|cell| match cell {
                        GridCell::Month { year, month } => Some(MonthTile {
                            cell,
                            label: cell.label(),
                            event_count: month_event_count(year, month, &self.events),
                        }),
                        _ => None,
                    })
                    .collect(),
            ),
            CalendarMode::Month => ViewBody::Month(self.day_cells(&cells)),
            CalendarMode::Week => ViewBody::Week(self.day_cells(&cells)),
            CalendarMode::Day => ViewBody::Day(self.timeline(&cells)),
        };

        RenderedView {
            state,
            title: state.title(),
            drill_up_label: state.drill_up_label(),
            body,
        }
    }

    fn day_cells(&self, cells: &[GridCell]) -> Vec<DayCell<'_>> {
        let reference = self.state.reference;
        cells
            .iter()
            .filter_map(|cell| match cell {
                GridCell::Date(date) => Some(DayCell {
                    date: *date,
                    label: cell.label(),
                    in_month: date.year() == reference.year()
                        && date.month() == reference.month(),
                    is_reference: *date == reference,
                    events: project_onto_cell(cell, &self.events)
                        .into_iter()
                        .map(|event| CellEvent {
                            event,
                            is_start: event.start_date == Some(*date),
                            is_end: event.end_date == Some(*date),
                        })
                        .collect(),
                }),
                _ => None,
            })
            .collect()
    }

    fn timeline(&self, cells: &[GridCell]) -> DayTimeline<'_> {
        let date = self.state.reference;
        let hours = cells
            .iter()
            .filter_map(|cell| match cell {
                GridCell::Hour { hour, .. } => Some(HourRow {
                    hour: *hour,
                    label: cell.label(),
                    top: self.axis.hour_top(*hour),
                }),
                _ => None,
            })
            .collect();

        let blocks = events_on_day(date, &self.events)
            .into_iter()
            .enumerate()
            .map(|(idx, event)| self.axis.layout(event, idx))
            .collect();

        DayTimeline {
            date,
            day_height: self.axis.day_height(),
            hours,
            blocks,
        }
    }
}
