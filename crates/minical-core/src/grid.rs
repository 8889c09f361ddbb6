use std::fmt;
use std::str::FromStr;

use anyhow::anyhow;
use chrono::{
  Datelike,
  NaiveDate
};
use serde::{
  Deserialize,
  Serialize
};

use crate::datetime::{
  add_days,
  end_of_week,
  first_day_of_month,
  last_day_of_month,
  month_name,
  start_of_week
};
use crate::tags::MenuItem;

pub const HOURS_PER_DAY: u32 = 24;

#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Hash,
  Serialize,
  Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum CalendarMode {
  Year,
  Month,
  Week,
  Day
}

impl CalendarMode {
  pub fn all() -> [Self; 4] {
    [
      Self::Year,
      Self::Month,
      Self::Week,
      Self::Day
    ]
  }

  pub fn as_key(self) -> &'static str {
    match self {
      | Self::Year => "year",
      | Self::Month => "month",
      | Self::Week => "week",
      | Self::Day => "day"
    }
  }

  pub fn label(self) -> &'static str {
    match self {
      | Self::Year => "Year",
      | Self::Month => "Month",
      | Self::Week => "Week",
      | Self::Day => "Day"
    }
  }

  pub fn from_key(
    key: &str
  ) -> Option<Self> {
    match key
      .trim()
      .to_ascii_lowercase()
      .as_str()
    {
      | "year" => Some(Self::Year),
      | "month" => Some(Self::Month),
      | "week" => Some(Self::Week),
      | "day" => Some(Self::Day),
      | _ => None
    }
  }

  /// Next finer granularity, if any.
  pub fn finer(self) -> Option<Self> {
    match self {
      | Self::Year => Some(Self::Month),
      | Self::Month => Some(Self::Week),
      | Self::Week => Some(Self::Day),
      | Self::Day => None
    }
  }

  /// Next coarser granularity, if any.
  pub fn coarser(self) -> Option<Self> {
    match self {
      | Self::Year => None,
      | Self::Month => Some(Self::Year),
      | Self::Week => Some(Self::Month),
      | Self::Day => Some(Self::Week)
    }
  }

  pub fn menu_items() -> Vec<MenuItem> {
    Self::all()
      .into_iter()
      .map(|mode| {
        MenuItem::Label(
          mode.label().to_string()
        )
      })
      .collect()
  }
}

impl fmt::Display for CalendarMode {
  fn fmt(
    &self,
    f: &mut fmt::Formatter<'_>
  ) -> fmt::Result {
    f.write_str(self.as_key())
  }
}

impl FromStr for CalendarMode {
  type Err = anyhow::Error;

  fn from_str(
    s: &str
  ) -> Result<Self, Self::Err> {
    Self::from_key(s).ok_or_else(|| {
      anyhow!(
        "unknown calendar mode '{s}' \
         (expected year, month, week \
         or day)"
      )
    })
  }
}

/// One visible unit of a calendar grid.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq,
)]
pub enum GridCell {
  /// A month tile in the Year view.
  Month { year: i32, month: u32 },
  /// A date square in the Month or
  /// Week view.
  Date(NaiveDate),
  /// A one-hour row in the Day view.
  Hour { date: NaiveDate, hour: u32 }
}

impl GridCell {
  pub fn label(&self) -> String {
    match self {
      | Self::Month { month, .. } => {
        month_name(*month).to_string()
      }
      | Self::Date(date) => {
        date.day().to_string()
      }
      | Self::Hour { hour, .. } => {
        format!("{hour:02}:00")
      }
    }
  }

  /// The date this cell navigates to
  /// when clicked.
  pub fn anchor_date(&self) -> NaiveDate {
    match self {
      | Self::Month { year, month } => {
        first_day_of_month(*year, *month)
      }
      | Self::Date(date) => *date,
      | Self::Hour { date, .. } => *date
    }
  }
}

/// Computes the visible cells for
/// `mode` around `reference`.
pub fn build_grid(
  mode: CalendarMode,
  reference: NaiveDate
) -> Vec<GridCell> {
  let cells = match mode {
    | CalendarMode::Year => {
      (1..=12)
        .map(|month| {
          GridCell::Month {
            year: reference.year(),
            month
          }
        })
        .collect::<Vec<_>>()
    }
    | CalendarMode::Month => {
      let (start, end) =
        month_grid_bounds(reference);
      date_cells(start, end)
    }
    | CalendarMode::Week => {
      date_cells(
        start_of_week(reference),
        end_of_week(reference)
      )
    }
    | CalendarMode::Day => {
      (0..HOURS_PER_DAY)
        .map(|hour| {
          GridCell::Hour {
            date: reference,
            hour
          }
        })
        .collect()
    }
  };

  tracing::trace!(
    mode = %mode,
    reference = %reference,
    cells = cells.len(),
    "built calendar grid"
  );
  cells
}

/// First and last visible dates of
/// the Month grid: the Sunday on or
/// before the 1st through the Saturday
/// on or after the last day.
pub fn month_grid_bounds(
  reference: NaiveDate
) -> (NaiveDate, NaiveDate) {
  let first = first_day_of_month(
    reference.year(),
    reference.month()
  );
  let last = last_day_of_month(
    reference.year(),
    reference.month()
  );
  (
    start_of_week(first),
    end_of_week(last)
  )
}

fn date_cells(
  start: NaiveDate,
  end: NaiveDate
) -> Vec<GridCell> {
  let mut cells = Vec::new();
  let mut day = start;
  while day <= end {
    cells.push(GridCell::Date(day));
    let next = add_days(day, 1);
    if next == day {
      break;
    }
    day = next;
  }
  cells
}

#[cfg(test)]
mod tests {
  use chrono::Weekday;

  use super::*;

  fn day(
    y: i32,
    m: u32,
    d: u32
  ) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d)
      .expect("valid date")
  }

  fn dates(
    cells: &[GridCell]
  ) -> Vec<NaiveDate> {
    cells
      .iter()
      .map(GridCell::anchor_date)
      .collect()
  }

  #[test]
  fn cell_counts_match_mode() {
    let samples = [
      day(2024, 6, 10),
      day(2015, 2, 14),
      day(2024, 2, 29),
      day(2023, 12, 31),
      day(2026, 8, 1)
    ];
    for reference in samples {
      assert_eq!(
        build_grid(
          CalendarMode::Year,
          reference
        )
        .len(),
        12
      );
      let month = build_grid(
        CalendarMode::Month,
        reference
      );
      assert_eq!(month.len() % 7, 0);
      assert!(month.len() >= 28);
      assert_eq!(
        build_grid(
          CalendarMode::Week,
          reference
        )
        .len(),
        7
      );
      assert_eq!(
        build_grid(
          CalendarMode::Day,
          reference
        )
        .len(),
        24
      );
    }
  }

  #[test]
  fn year_grid_is_labelled_by_month() {
    let cells = build_grid(
      CalendarMode::Year,
      day(2024, 6, 10)
    );
    assert_eq!(
      cells[0],
      GridCell::Month {
        year:  2024,
        month: 1
      }
    );
    assert_eq!(cells[0].label(), "January");
    assert_eq!(
      cells[11].label(),
      "December"
    );
  }

  #[test]
  fn month_grid_covers_whole_weeks() {
    let cells = build_grid(
      CalendarMode::Month,
      day(2024, 6, 10)
    );
    let dates = dates(&cells);
    assert_eq!(dates.len(), 42);
    assert_eq!(dates[0], day(2024, 5, 26));
    assert_eq!(
      dates[0].weekday(),
      Weekday::Sun
    );
    assert_eq!(
      dates[dates.len() - 1],
      day(2024, 7, 6)
    );
    assert!(
      dates
        .windows(2)
        .all(|w| w[1] == add_days(w[0], 1))
    );
  }

  #[test]
  fn month_grid_without_padding() {
    // February 2015 starts on a Sunday
    // and ends on a Saturday.
    let cells = build_grid(
      CalendarMode::Month,
      day(2015, 2, 14)
    );
    assert_eq!(cells.len(), 28);
    assert_eq!(
      cells[0],
      GridCell::Date(day(2015, 2, 1))
    );
  }

  #[test]
  fn week_grid_contains_reference() {
    let reference = day(2024, 3, 20);
    let dates = dates(&build_grid(
      CalendarMode::Week,
      reference
    ));
    assert_eq!(dates[0], day(2024, 3, 17));
    assert_eq!(dates[6], day(2024, 3, 23));
    assert!(dates.contains(&reference));
  }

  #[test]
  fn day_grid_has_hour_slots() {
    let cells = build_grid(
      CalendarMode::Day,
      day(2024, 6, 10)
    );
    assert_eq!(cells[0].label(), "00:00");
    assert_eq!(cells[23].label(), "23:00");
    assert_eq!(
      cells[9],
      GridCell::Hour {
        date: day(2024, 6, 10),
        hour: 9
      }
    );
  }

  #[test]
  fn mode_keys_round_trip() {
    for mode in CalendarMode::all() {
      assert_eq!(
        mode
          .as_key()
          .parse::<CalendarMode>()
          .expect("known mode"),
        mode
      );
    }
    assert!(
      "quarter"
        .parse::<CalendarMode>()
        .is_err()
    );
    assert_eq!(
      CalendarMode::Day.finer(),
      None
    );
    assert_eq!(
      CalendarMode::Year.coarser(),
      None
    );
  }
}
