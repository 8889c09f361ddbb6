pub mod calendar_view;
pub mod cli;
pub mod config;
pub mod datetime;
pub mod entry;
pub mod grid;
pub mod model;
pub mod projector;
pub mod render;
pub mod store;
pub mod tags;
pub mod time_axis;
pub mod view_state;

use std::ffi::OsString;

use anyhow::Context;
use chrono::{
  Local,
  NaiveDate
};
use clap::Parser;
use tracing::{
  debug,
  info,
  warn
};

use crate::calendar_view::{
  AnchorRect,
  CalendarView
};
use crate::cli::{
  AddArgs,
  Command,
  ShowArgs
};
use crate::config::Config;
use crate::datetime::parse_date_arg;
use crate::entry::EventDraft;
use crate::render::Renderer;
use crate::store::{
  CalendarStore,
  FileStore,
  next_event_id
};
use crate::view_state::{
  Navigation,
  ViewState
};

/// Synthetic anchor for `--hover`: a
/// terminal has no element geometry.
const CLI_HOVER_ANCHOR: AnchorRect =
  AnchorRect {
    top:    0.0,
    left:   0.0,
    bottom: 0.0,
    right:  0.0
  };

#[tracing::instrument(skip_all)]
pub fn run(
  raw_args: Vec<OsString>
) -> anyhow::Result<()> {
  let cli =
    cli::GlobalCli::parse_from(raw_args);

  cli::init_tracing(
    cli.verbose,
    cli.quiet
  )?;

  info!(
    verbose = cli.verbose,
    quiet = cli.quiet,
    "starting minical"
  );

  let cfg = Config::load(
    cli.config.as_deref()
  )?;
  let store_path =
    cfg.store_path(cli.store.as_deref());
  let store = FileStore::new(&store_path);
  let renderer =
    Renderer::new(cfg.display.color);
  let today = Local::now().date_naive();

  match cli.command {
    | Some(Command::Show(args)) => {
      show(
        &cfg, &store, &renderer, args,
        today
      )
    }
    | None => {
      show(
        &cfg,
        &store,
        &renderer,
        ShowArgs::default(),
        today
      )
    }
    | Some(Command::Add(args)) => {
      add(&store, args, today)
    }
    | Some(Command::Tags) => {
      let snapshot = store.load()?;
      renderer.print_menu(
        &snapshot.tag_set().menu_items()
      )
    }
    | Some(Command::Tag {
      name,
      color
    }) => {
      let mut snapshot = store.load()?;
      let mut tags = snapshot.tag_set();
      if tags.add(&name, color) {
        snapshot.tags = tags.into_tags();
        store.save(&snapshot)?;
        info!(
          tag = %name.trim(),
          "tag saved"
        );
      } else {
        warn!(
          tag = %name,
          "tag unchanged"
        );
      }
      Ok(())
    }
  }?;

  info!("done");
  Ok(())
}

#[tracing::instrument(skip(
  cfg, store, renderer
))]
fn show(
  cfg: &Config,
  store: &dyn CalendarStore,
  renderer: &Renderer,
  args: ShowArgs,
  today: NaiveDate
) -> anyhow::Result<()> {
  let snapshot = store.load()?;
  let reference = match &args.date {
    | Some(raw) => {
      parse_date_arg(raw, today)?
    }
    | None => today
  };
  let mode =
    args.mode.unwrap_or(cfg.startup.mode);

  let mut view = CalendarView::new(
    ViewState::new(mode, reference),
    snapshot.events,
    cfg.time_axis()
  );

  for raw in &args.nav {
    let nav = Navigation::parse(raw, today)
      .with_context(|| {
        format!(
          "bad --nav value '{raw}'"
        )
      })?;
    view.navigate(nav);
  }

  if let Some(id) = args.hover
    && view
      .hover(id, CLI_HOVER_ANCHOR)
      .is_none()
  {
    warn!(id, "no event with that id");
  }

  let rendered = view.render();
  debug!(
    mode = %rendered.state.mode,
    reference = %rendered.state.reference,
    "rendering view"
  );
  renderer.print_view(&rendered)?;

  if let Some(popup) = view.popup() {
    renderer.print_popup(popup)?;
  }
  Ok(())
}

#[tracing::instrument(skip(store, args))]
fn add(
  store: &dyn CalendarStore,
  args: AddArgs,
  today: NaiveDate
) -> anyhow::Result<()> {
  let start =
    parse_date_arg(&args.start, today)?;
  let end = match &args.end {
    | Some(raw) => {
      parse_date_arg(raw, today)?
    }
    | None => start
  };

  let mut draft = EventDraft {
    title:       args.title,
    tag:         args.tag,
    description: args.description,
    start_time:  args.from,
    end_time:    args.to,
    ..EventDraft::default()
  };
  draft.set_date_range(start, end);

  for warning in draft.warnings() {
    eprintln!(
      "warning: {}",
      warning.message()
    );
  }

  let mut snapshot = store.load()?;
  let id = next_event_id(&snapshot.events)?;
  let event = draft
    .into_event(id, &snapshot.tag_set())
    .context("cannot add event")?;

  info!(
    id,
    title = %event.title,
    "adding event"
  );
  snapshot.push_event(event);
  store.save(&snapshot)?;
  println!("Added event {id}");
  Ok(())
}
