use crate::model::Event;

pub const MINUTES_PER_DAY: u32 = 1440;
pub const DEFAULT_HOUR_HEIGHT: f64 =
  60.0;
pub const DEFAULT_MIN_EVENT_HEIGHT: f64 =
  20.0;

/// Minutes since midnight for an
/// "HH:MM" string. Components that do
/// not parse count as zero and the
/// result is clamped to the last minute
/// of the day.
pub fn parse_minutes(time: &str) -> u32 {
  let (hours, minutes) = time
    .trim()
    .split_once(':')
    .unwrap_or((time.trim(), ""));
  let component = |raw: &str| {
    raw.trim().parse::<u32>().unwrap_or(0)
  };

  component(hours)
    .saturating_mul(60)
    .saturating_add(component(minutes))
    .min(MINUTES_PER_DAY - 1)
}

/// Fraction of the day elapsed at
/// `time`, in `[0.0, 1.0)`.
pub fn offset_fraction(
  time: &str
) -> f64 {
  f64::from(parse_minutes(time))
    / f64::from(MINUTES_PER_DAY)
}

/// Vertical geometry of the Day view.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimeAxis {
  pub hour_height:      f64,
  pub min_event_height: f64
}

impl Default for TimeAxis {
  fn default() -> Self {
    Self {
      hour_height:
        DEFAULT_HOUR_HEIGHT,
      min_event_height:
        DEFAULT_MIN_EVENT_HEIGHT
    }
  }
}

impl TimeAxis {
  pub fn new(
    hour_height: f64,
    min_event_height: f64
  ) -> Self {
    Self {
      hour_height,
      min_event_height
    }
  }

  pub fn day_height(&self) -> f64 {
    24.0 * self.hour_height
  }

  pub fn position(
    &self,
    time: &str
  ) -> f64 {
    offset_fraction(time)
      * self.day_height()
  }

  /// Top of the label row for `hour`.
  pub fn hour_top(
    &self,
    hour: u32
  ) -> f64 {
    f64::from(hour) * self.hour_height
  }

  pub fn layout<'a>(
    &self,
    event: &'a Event,
    stack_index: usize
  ) -> EventBlock<'a> {
    let top =
      self.position(&event.start_time);
    let bottom =
      self.position(&event.end_time);
    let height = (bottom - top)
      .max(self.min_event_height);

    if bottom <= top {
      tracing::debug!(
        id = event.id,
        start = %event.start_time,
        end = %event.end_time,
        "degenerate time range clamped to minimum height"
      );
    }

    EventBlock {
      event,
      top,
      bottom,
      height,
      stack_index
    }
  }
}

/// An event placed on the Day view's
/// time axis. `bottom` is the raw end
/// position; `height` is floored at the
/// axis minimum, so `top + height` can
/// exceed `bottom`.
#[derive(Debug, Clone, PartialEq)]
pub struct EventBlock<'a> {
  pub event:       &'a Event,
  pub top:         f64,
  pub bottom:      f64,
  pub height:      f64,
  pub stack_index: usize
}
