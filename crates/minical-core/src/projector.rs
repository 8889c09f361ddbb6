//! Selects and orders the events that belong to a grid cell.

use chrono::{Datelike, NaiveDate};

use crate::grid::GridCell;
use crate::model::Event;
use crate::time_axis::parse_minutes;

/// Events relevant to `cell`, ordered by start time.
///
/// - Month tiles: events starting in that month (ordered by start date, then time).
/// - Dates: events whose inclusive date range contains the date.
/// - Hour slots: every event starting on the slot's day. The Day view
///   positions them continuously, so the slot itself does not narrow the set.
pub fn project_onto_cell<'a>(cell: &GridCell, events: &'a [Event]) -> Vec<&'a Event> {
    match cell {
        GridCell::Month { year, month } => {
            let mut selected = events
                .iter()
                .filter(|event| starts_in_month(event, *year, *month))
                .collect::<Vec<_>>();
            selected.sort_by(|a, b| {
                a.start_date
                    .cmp(&b.start_date)
                    .then_with(|| a.start_time.cmp(&b.start_time))
            });
            selected
        }
        GridCell::Date(date) => {
            let mut selected = events
                .iter()
                .filter(|event| event.spans(*date))
                .collect::<Vec<_>>();
            sort_by_start_time(&mut selected);
            selected
        }
        GridCell::Hour { date, .. } => events_on_day(*date, events),
    }
}

/// Number of events starting within the month, for the Year view summary.
pub fn month_event_count(year: i32, month: u32, events: &[Event]) -> usize {
    events
        .iter()
        .filter(|event| starts_in_month(event, year, month))
        .count()
}

/// Events whose start date is `date`, ordered by start time.
pub fn events_on_day(date: NaiveDate, events: &[Event]) -> Vec<&Event> {
    let mut selected = events
        .iter()
        .filter(|event| event.starts_on(date))
        .collect::<Vec<_>>();
    sort_by_start_time(&mut selected);
    selected
}

/// Events starting on `date` whose start time falls inside `hour`.
pub fn events_starting_in_hour(date: NaiveDate, hour: u32, events: &[Event]) -> Vec<&Event> {
    events_on_day(date, events)
        .into_iter()
        .filter(|event| parse_minutes(&event.start_time) / 60 == hour)
        .collect()
}

fn starts_in_month(event: &Event, year: i32, month: u32) -> bool {
    event
        .dated_start()
        .is_some_and(|start| start.year() == year && start.month() == month)
}

// "HH:MM" is fixed width, so string order is time order. The sort is stable,
// which keeps insertion order for equal start times.
fn sort_by_start_time(events: &mut [&Event]) {
    events.sort_by(|a, b| a.start_time.cmp(&b.start_time));
}
