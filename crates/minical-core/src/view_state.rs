use anyhow::anyhow;
use chrono::{
  Datelike,
  NaiveDate
};
use tracing::debug;

use crate::datetime::{
  add_days,
  end_of_week,
  first_day_of_month,
  parse_date_arg,
  shift_months,
  shift_years,
  start_of_week
};
use crate::grid::CalendarMode;

#[derive(
  Debug, Clone, Copy, PartialEq, Eq,
)]
pub struct ViewState {
  pub mode:      CalendarMode,
  pub reference: NaiveDate
}

/// A user navigation action.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq,
)]
pub enum Navigation {
  Previous,
  Next,
  DrillUp,
  /// The clicked tile, date or day
  /// column.
  DrillDown(NaiveDate),
  /// Direct mode selection; keeps the
  /// reference date.
  Select(CalendarMode)
}

impl ViewState {
  pub fn new(
    mode: CalendarMode,
    reference: NaiveDate
  ) -> Self {
    Self { mode, reference }
  }

  /// Year view of `today`.
  pub fn initial(
    today: NaiveDate
  ) -> Self {
    Self::new(CalendarMode::Year, today)
  }

  /// Applies `nav` and returns the next
  /// state. Drill-down past Day and
  /// drill-up past Year leave the state
  /// unchanged.
  pub fn apply(
    self,
    nav: Navigation
  ) -> Self {
    let next = match nav {
      | Navigation::Previous => {
        self.step(-1)
      }
      | Navigation::Next => self.step(1),
      | Navigation::DrillUp => {
        match self.mode.coarser() {
          | Some(mode) => {
            Self::new(mode, self.reference)
          }
          | None => self
        }
      }
      | Navigation::DrillDown(target) => {
        match self.mode.finer() {
          | Some(
            mode @ CalendarMode::Month
          ) => {
            Self::new(
              mode,
              first_day_of_month(
                target.year(),
                target.month()
              )
            )
          }
          | Some(mode) => {
            Self::new(mode, target)
          }
          | None => self
        }
      }
      | Navigation::Select(mode) => {
        Self::new(mode, self.reference)
      }
    };

    debug!(
      ?nav,
      from_mode = %self.mode,
      from = %self.reference,
      to_mode = %next.mode,
      to = %next.reference,
      "view transition"
    );
    next
  }

  fn step(self, step: i32) -> Self {
    let reference = match self.mode {
      | CalendarMode::Year => {
        shift_years(self.reference, step)
      }
      | CalendarMode::Month => {
        shift_months(
          self.reference,
          step
        )
      }
      | CalendarMode::Week => {
        add_days(
          self.reference,
          i64::from(step) * 7
        )
      }
      | CalendarMode::Day => {
        add_days(
          self.reference,
          i64::from(step)
        )
      }
    };
    Self::new(self.mode, reference)
  }

  /// Header text for the current
  /// period.
  pub fn title(&self) -> String {
    let focus = self.reference;
    match self.mode {
      | CalendarMode::Year => {
        focus.format("%Y").to_string()
      }
      | CalendarMode::Month => {
        focus.format("%B %Y").to_string()
      }
      | CalendarMode::Week => {
        let start = start_of_week(focus);
        let end = end_of_week(focus);
        format!(
          "{} - {}",
          start.format("%b %-d"),
          end.format("%b %-d, %Y")
        )
      }
      | CalendarMode::Day => {
        focus
          .format("%A, %B %-d, %Y")
          .to_string()
      }
    }
  }

  /// Caption of the drill-up control,
  /// absent in the Year view.
  pub fn drill_up_label(
    &self
  ) -> Option<&'static str> {
    match self.mode.coarser()? {
      | CalendarMode::Year => {
        Some("View Year")
      }
      | CalendarMode::Month => {
        Some("View Month")
      }
      | CalendarMode::Week => {
        Some("View Week")
      }
      | CalendarMode::Day => None
    }
  }
}

impl Navigation {
  /// Parses `prev`, `next`, `up`,
  /// `down:<date>` or `mode:<mode>`.
  /// Relative dates resolve against
  /// `today`.
  pub fn parse(
    raw: &str,
    today: NaiveDate
  ) -> anyhow::Result<Self> {
    let trimmed = raw.trim();
    let (verb, arg) = trimmed
      .split_once(':')
      .map(|(verb, arg)| {
        (verb, Some(arg))
      })
      .unwrap_or((trimmed, None));

    match (
      verb
        .to_ascii_lowercase()
        .as_str(),
      arg
    ) {
      | ("prev" | "previous", None) => {
        Ok(Self::Previous)
      }
      | ("next", None) => Ok(Self::Next),
      | ("up", None) => Ok(Self::DrillUp),
      | ("down", Some(date)) => {
        Ok(Self::DrillDown(
          parse_date_arg(date, today)?
        ))
      }
      | ("mode", Some(mode)) => {
        Ok(Self::Select(mode.parse()?))
      }
      | _ => {
        Err(anyhow!(
          "invalid navigation \
           '{trimmed}' (expected prev, \
           next, up, down:<date> or \
           mode:<mode>)"
        ))
      }
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn day(
    y: i32,
    m: u32,
    d: u32
  ) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d)
      .expect("valid date")
  }

  #[test]
  fn next_then_previous_round_trips() {
    let references = [
      day(2024, 3, 15),
      day(2024, 12, 28),
      day(2023, 1, 1),
      day(2024, 2, 29)
    ];
    for mode in CalendarMode::all() {
      for reference in references {
        if mode == CalendarMode::Year
          && reference == day(2024, 2, 29)
        {
          continue;
        }
        let start =
          ViewState::new(mode, reference);
        let back = start
          .apply(Navigation::Next)
          .apply(Navigation::Previous);
        assert_eq!(
          back, start,
          "{mode} {reference}"
        );
      }
    }
  }

  #[test]
  fn month_and_year_steps_clamp_the_day() {
    let month = ViewState::new(
      CalendarMode::Month,
      day(2024, 1, 31)
    );
    let forward =
      month.apply(Navigation::Next);
    assert_eq!(
      forward.reference,
      day(2024, 2, 29)
    );
    assert_eq!(
      forward
        .apply(Navigation::Previous)
        .reference,
      day(2024, 1, 29)
    );

    let year = ViewState::new(
      CalendarMode::Year,
      day(2024, 2, 29)
    );
    let forward =
      year.apply(Navigation::Next);
    assert_eq!(
      forward.reference,
      day(2025, 2, 28)
    );
    assert_eq!(
      forward
        .apply(Navigation::Previous)
        .reference,
      day(2024, 2, 28)
    );
  }

  #[test]
  fn steps_move_reference_by_mode() {
    let reference = day(2024, 3, 15);
    let cases = [
      (
        CalendarMode::Year,
        day(2025, 3, 15)
      ),
      (
        CalendarMode::Month,
        day(2024, 4, 15)
      ),
      (
        CalendarMode::Week,
        day(2024, 3, 22)
      ),
      (
        CalendarMode::Day,
        day(2024, 3, 16)
      )
    ];
    for (mode, expected) in cases {
      let next = ViewState::new(
        mode, reference
      )
      .apply(Navigation::Next);
      assert_eq!(next.mode, mode);
      assert_eq!(next.reference, expected);
    }
  }

  #[test]
  fn drill_down_then_up_preserves_date() {
    let month = ViewState::new(
      CalendarMode::Month,
      day(2024, 3, 15)
    );
    let week = month.apply(
      Navigation::DrillDown(day(
        2024, 3, 20
      ))
    );
    assert_eq!(
      week,
      ViewState::new(
        CalendarMode::Week,
        day(2024, 3, 20)
      )
    );
    let up = week.apply(Navigation::DrillUp);
    assert_eq!(
      up,
      ViewState::new(
        CalendarMode::Month,
        day(2024, 3, 20)
      )
    );

    let dayview = week.apply(
      Navigation::DrillDown(day(
        2024, 3, 21
      ))
    );
    assert_eq!(
      dayview.mode,
      CalendarMode::Day
    );
    assert_eq!(
      dayview.apply(Navigation::DrillUp),
      ViewState::new(
        CalendarMode::Week,
        day(2024, 3, 21)
      )
    );
  }

  #[test]
  fn year_drill_down_lands_on_month_start()
  {
    let year = ViewState::initial(day(
      2024, 6, 10
    ));
    assert_eq!(
      year.mode,
      CalendarMode::Year
    );
    let month = year.apply(
      Navigation::DrillDown(day(
        2024, 9, 17
      ))
    );
    assert_eq!(
      month,
      ViewState::new(
        CalendarMode::Month,
        day(2024, 9, 1)
      )
    );
  }

  #[test]
  fn out_of_range_drills_are_ignored() {
    let year = ViewState::new(
      CalendarMode::Year,
      day(2024, 6, 10)
    );
    assert_eq!(
      year.apply(Navigation::DrillUp),
      year
    );

    let dayview = ViewState::new(
      CalendarMode::Day,
      day(2024, 6, 10)
    );
    assert_eq!(
      dayview.apply(
        Navigation::DrillDown(day(
          2024, 6, 11
        ))
      ),
      dayview
    );
  }

  #[test]
  fn select_keeps_reference() {
    let state = ViewState::new(
      CalendarMode::Year,
      day(2024, 6, 10)
    )
    .apply(Navigation::Select(
      CalendarMode::Day
    ));
    assert_eq!(
      state,
      ViewState::new(
        CalendarMode::Day,
        day(2024, 6, 10)
      )
    );
  }

  #[test]
  fn titles_per_mode() {
    let reference = day(2024, 6, 10);
    let title = |mode| {
      ViewState::new(mode, reference)
        .title()
    };
    assert_eq!(
      title(CalendarMode::Year),
      "2024"
    );
    assert_eq!(
      title(CalendarMode::Month),
      "June 2024"
    );
    assert_eq!(
      title(CalendarMode::Week),
      "Jun 9 - Jun 15, 2024"
    );
    assert_eq!(
      title(CalendarMode::Day),
      "Monday, June 10, 2024"
    );
  }

  #[test]
  fn drill_up_labels() {
    let label = |mode| {
      ViewState::new(
        mode,
        day(2024, 6, 10)
      )
      .drill_up_label()
    };
    assert_eq!(
      label(CalendarMode::Year),
      None
    );
    assert_eq!(
      label(CalendarMode::Month),
      Some("View Year")
    );
    assert_eq!(
      label(CalendarMode::Week),
      Some("View Month")
    );
    assert_eq!(
      label(CalendarMode::Day),
      Some("View Week")
    );
  }

  #[test]
  fn parses_navigation_actions() {
    let today = day(2024, 6, 10);
    let parse = |raw: &str| {
      Navigation::parse(raw, today)
    };
    assert_eq!(
      parse("prev").expect("prev"),
      Navigation::Previous
    );
    assert_eq!(
      parse("Next").expect("next"),
      Navigation::Next
    );
    assert_eq!(
      parse("up").expect("up"),
      Navigation::DrillUp
    );
    assert_eq!(
      parse("down:2024-03-20")
        .expect("down"),
      Navigation::DrillDown(day(
        2024, 3, 20
      ))
    );
    assert_eq!(
      parse("down:tomorrow")
        .expect("relative down"),
      Navigation::DrillDown(day(
        2024, 6, 11
      ))
    );
    assert_eq!(
      parse("mode:week").expect("mode"),
      Navigation::Select(
        CalendarMode::Week
      )
    );
    assert!(parse("down").is_err());
    assert!(parse("sideways").is_err());
    assert!(parse("mode:quarter").is_err());
  }
}
