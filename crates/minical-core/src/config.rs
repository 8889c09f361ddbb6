use std::fs;
use std::path::{
  Path,
  PathBuf
};

use anyhow::{
  Context,
  anyhow
};
use serde::Deserialize;
use tracing::{
  debug,
  info,
  warn
};

use crate::grid::CalendarMode;
use crate::time_axis::{
  DEFAULT_HOUR_HEIGHT,
  DEFAULT_MIN_EVENT_HEIGHT,
  TimeAxis
};

const CONFIG_ENV_VAR: &str =
  "MINICAL_CONFIG";
const DEFAULT_STORE_PATH: &str =
  "~/.minical/calendar.json";

#[derive(
  Debug, Clone, PartialEq, Deserialize,
)]
pub struct Config {
  #[serde(default = "config_default_version")]
  pub version: u32,
  #[serde(default)]
  pub layout:  LayoutConfig,
  #[serde(default)]
  pub startup: StartupConfig,
  #[serde(default)]
  pub storage: StorageConfig,
  #[serde(default)]
  pub display: DisplayConfig,
  #[serde(skip)]
  pub loaded_from: Option<PathBuf>
}

#[derive(
  Debug, Clone, PartialEq, Deserialize,
)]
pub struct LayoutConfig {
  #[serde(
    default = "config_default_hour_height"
  )]
  pub hour_height:      f64,
  #[serde(
    default = "config_default_min_event_height"
  )]
  pub min_event_height: f64
}

#[derive(
  Debug, Clone, PartialEq, Deserialize,
)]
pub struct StartupConfig {
  #[serde(default = "config_default_mode")]
  pub mode: CalendarMode
}

#[derive(
  Debug, Clone, PartialEq, Deserialize,
)]
pub struct StorageConfig {
  #[serde(default = "config_default_store_path")]
  pub path: String
}

#[derive(
  Debug, Clone, PartialEq, Deserialize,
)]
pub struct DisplayConfig {
  #[serde(default = "config_true")]
  pub color: bool
}

fn config_true() -> bool {
  true
}

fn config_default_version() -> u32 {
  1
}

fn config_default_hour_height() -> f64 {
  DEFAULT_HOUR_HEIGHT
}

fn config_default_min_event_height()
-> f64 {
  DEFAULT_MIN_EVENT_HEIGHT
}

fn config_default_mode() -> CalendarMode
{
  CalendarMode::Year
}

fn config_default_store_path() -> String
{
  DEFAULT_STORE_PATH.to_string()
}

impl Default for Config {
  fn default() -> Self {
    Self {
      version:     config_default_version(),
      layout:      LayoutConfig::default(),
      startup:     StartupConfig::default(),
      storage:     StorageConfig::default(),
      display:     DisplayConfig::default(),
      loaded_from: None
    }
  }
}

impl Default for LayoutConfig {
  fn default() -> Self {
    Self {
      hour_height:
        config_default_hour_height(),
      min_event_height:
        config_default_min_event_height(
        )
    }
  }
}

impl Default for StartupConfig {
  fn default() -> Self {
    Self {
      mode: config_default_mode()
    }
  }
}

impl Default for StorageConfig {
  fn default() -> Self {
    Self {
      path: config_default_store_path()
    }
  }
}

impl Default for DisplayConfig {
  fn default() -> Self {
    Self { color: true }
  }
}

impl Config {
  /// Loads the config from
  /// `override_path`, `$MINICAL_CONFIG`
  /// or `~/.config/minical/config.toml`,
  /// in that order. Missing files fall
  /// back to defaults.
  #[tracing::instrument(skip(
    override_path
  ))]
  pub fn load(
    override_path: Option<&Path>
  ) -> anyhow::Result<Self> {
    let Some(path) =
      resolve_config_path(override_path)
    else {
      warn!(
        "no config file found; using \
         defaults"
      );
      return Ok(Self::default());
    };

    if !path.exists() {
      if override_path.is_some() {
        return Err(anyhow!(
          "config file {} does not \
           exist",
          path.display()
        ));
      }
      warn!(
        file = %path.display(),
        "config file not found; using \
         defaults"
      );
      return Ok(Self::default());
    }

    info!(
      file = %path.display(),
      "loading config"
    );
    let text = fs::read_to_string(&path)
      .with_context(|| {
        format!(
          "failed to read {}",
          path.display()
        )
      })?;
    let mut cfg = Self::from_toml(&text)
      .with_context(|| {
        format!(
          "failed to parse {}",
          path.display()
        )
      })?;
    cfg.loaded_from = Some(path);
    Ok(cfg)
  }

  pub fn from_toml(
    text: &str
  ) -> anyhow::Result<Self> {
    let mut cfg =
      toml::from_str::<Self>(text)?;
    cfg.sanitize();
    debug!(
      version = cfg.version,
      hour_height = cfg.layout.hour_height,
      mode = %cfg.startup.mode,
      "parsed config"
    );
    Ok(cfg)
  }

  pub fn time_axis(&self) -> TimeAxis {
    TimeAxis::new(
      self.layout.hour_height,
      self.layout.min_event_height
    )
  }

  /// Store location, with `~/` expanded.
  /// `override_path` wins when given.
  pub fn store_path(
    &self,
    override_path: Option<&Path>
  ) -> PathBuf {
    match override_path {
      | Some(path) => expand_tilde(path),
      | None => {
        expand_tilde(Path::new(
          &self.storage.path
        ))
      }
    }
  }

  fn sanitize(&mut self) {
    let layout = &mut self.layout;
    if !layout.hour_height.is_finite()
      || layout.hour_height <= 0.0
    {
      warn!(
        hour_height = layout.hour_height,
        "invalid hour_height; using \
         default"
      );
      layout.hour_height =
        config_default_hour_height();
    }

    if !layout
      .min_event_height
      .is_finite()
      || layout.min_event_height < 0.0
    {
      warn!(
        min_event_height =
          layout.min_event_height,
        "invalid min_event_height; \
         using default"
      );
      layout.min_event_height =
        config_default_min_event_height(
        );
    }

    let day_height =
      24.0 * layout.hour_height;
    if layout.min_event_height
      > day_height
    {
      layout.min_event_height =
        day_height;
    }

    if self
      .storage
      .path
      .trim()
      .is_empty()
    {
      self.storage.path =
        config_default_store_path();
    }
  }
}

fn resolve_config_path(
  override_path: Option<&Path>
) -> Option<PathBuf> {
  if let Some(path) = override_path {
    return Some(expand_tilde(path));
  }

  if let Ok(raw) =
    std::env::var(CONFIG_ENV_VAR)
  {
    let trimmed = raw.trim();
    if !trimmed.is_empty() {
      return Some(expand_tilde(
        Path::new(trimmed)
      ));
    }
  }

  dirs::config_dir().map(|dir| {
    dir
      .join("minical")
      .join("config.toml")
  })
}

pub fn expand_tilde(
  path: &Path
) -> PathBuf {
  let text = path.to_string_lossy();
  if let Some(rest) =
    text.strip_prefix("~/")
    && let Some(home) = dirs::home_dir()
  {
    return home.join(rest);
  }
  path.to_path_buf()
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn empty_file_uses_defaults() {
    let cfg = Config::from_toml("")
      .expect("empty config parses");
    assert_eq!(cfg, Config::default());
    assert_eq!(
      cfg.time_axis(),
      TimeAxis::default()
    );
    assert_eq!(
      cfg.startup.mode,
      CalendarMode::Year
    );
  }

  #[test]
  fn reads_all_sections() {
    let cfg = Config::from_toml(
      r#"
version = 2
[layout]
hour_height = 48.0
min_event_height = 12.0
[startup]
mode = "week"
[storage]
path = "/tmp/minical.json"
[display]
color = false
"#
    )
    .expect("config parses");

    assert_eq!(cfg.version, 2);
    assert_eq!(
      cfg.time_axis(),
      TimeAxis::new(48.0, 12.0)
    );
    assert_eq!(
      cfg.startup.mode,
      CalendarMode::Week
    );
    assert!(!cfg.display.color);
    assert_eq!(
      cfg.store_path(None),
      PathBuf::from("/tmp/minical.json")
    );
    assert_eq!(
      cfg.store_path(Some(Path::new(
        "/srv/other.json"
      ))),
      PathBuf::from("/srv/other.json")
    );
  }

  #[test]
  fn sanitizes_layout_values() {
    let cfg = Config::from_toml(
      r#"
[layout]
hour_height = -5.0
min_event_height = -1.0
[storage]
path = "   "
"#
    )
    .expect("config parses");
    assert_eq!(
      cfg.layout,
      LayoutConfig::default()
    );
    assert_eq!(
      cfg.storage.path,
      DEFAULT_STORE_PATH
    );

    let capped = Config::from_toml(
      r#"
[layout]
hour_height = 1.0
min_event_height = 100.0
"#
    )
    .expect("config parses");
    assert_eq!(
      capped.layout.min_event_height,
      24.0
    );
  }

  #[test]
  fn rejects_unknown_mode() {
    assert!(
      Config::from_toml(
        "[startup]\nmode = \"quarter\"\n"
      )
      .is_err()
    );
  }

  #[test]
  fn missing_override_is_an_error() {
    let dir = tempfile::tempdir()
      .expect("tempdir");
    let missing =
      dir.path().join("nope.toml");
    assert!(
      Config::load(Some(&missing))
        .is_err()
    );
  }

  #[test]
  fn loads_override_file() {
    let dir = tempfile::tempdir()
      .expect("tempdir");
    let path =
      dir.path().join("config.toml");
    fs::write(
      &path,
      "[startup]\nmode = \"day\"\n"
    )
    .expect("write config");

    let cfg = Config::load(Some(&path))
      .expect("load config");
    assert_eq!(
      cfg.startup.mode,
      CalendarMode::Day
    );
    assert_eq!(
      cfg.loaded_from,
      Some(path)
    );
  }
}
