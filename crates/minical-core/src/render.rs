use std::io::{self, IsTerminal, Write};

use unicode_width::UnicodeWidthStr;

use crate::calendar_view::{DayCell, DayTimeline, HoverPopup, MonthTile, RenderedView, ViewBody};
use crate::datetime::WEEKDAY_LABELS;
use crate::model::Event;
use crate::tags::MenuItem;

const YEAR_COLUMNS: usize = 4;
const SWATCH: &str = "■";

#[derive(Debug, Clone)]
pub struct Renderer {
    color: bool,
}

impl Renderer {
    /// Colour is used only when enabled and stdout is a terminal.
    pub fn new(color: bool) -> Self {
        Self {
            color: color && io::stdout().is_terminal(),
        }
    }

    pub fn plain() -> Self {
        Self { color: false }
    }

    #[tracing::instrument(skip(self, view), fields(mode = %view.state.mode))]
    pub fn print_view(&self, view: &RenderedView<'_>) -> anyhow::Result<()> {
        let mut out = io::stdout().lock();
        self.write_view(&mut out, view)
    }

    pub fn print_popup(&self, popup: &HoverPopup) -> anyhow::Result<()> {
        let mut out = io::stdout().lock();
        self.write_popup(&mut out, popup)
    }

    pub fn print_menu(&self, items: &[MenuItem]) -> anyhow::Result<()> {
        let mut out = io::stdout().lock();
        for item in items {
            match item {
                MenuItem::Label(label) => writeln!(out, "  {label}")?,
                MenuItem::Tag(tag) => {
                    let color = tag.swatch().unwrap_or("default");
                    writeln!(out, "{} {}  ({color})", self.swatch(tag.swatch()), tag.name)?;
                }
            }
        }
        Ok(())
    }

    pub fn write_view<W: Write>(&self, mut out: W, view: &RenderedView<'_>) -> anyhow::Result<()> {
        writeln!(out, "{}", self.paint(&view.title, "1"))?;
        if let Some(label) = view.drill_up_label {
            writeln!(out, "[{label}]")?;
        }
        writeln!(out)?;

        match &view.body {
            ViewBody::Year(tiles) => self.write_year(&mut out, tiles),
            ViewBody::Month(cells) | ViewBody::Week(cells) => self.write_days(&mut out, cells),
            ViewBody::Day(timeline) => self.write_timeline(&mut out, timeline),
        }
    }

    pub fn write_popup<W: Write>(&self, mut out: W, popup: &HoverPopup) -> anyhow::Result<()> {
        let details = &popup.details;
        writeln!(out)?;
        writeln!(
            out,
            "popup at top {:.0}px, left {:.0}px",
            popup.position.top, popup.position.left
        )?;
        writeln!(out, "  Id:          {}", details.id)?;
        writeln!(out, "  Tag:         {}", details.tag)?;
        writeln!(out, "  Description: {}", details.description)?;
        writeln!(out, "  Date:        {}", details.date)?;
        writeln!(out, "  Time:        {}", details.time)?;
        Ok(())
    }

    fn write_year<W: Write>(&self, out: &mut W, tiles: &[MonthTile]) -> anyhow::Result<()> {
        let rows = tiles
            .chunks(YEAR_COLUMNS)
            .map(|chunk| {
                chunk
                    .iter()
                    .map(|tile| format!("{}\n{}", self.paint(&tile.label, "1"), tile.summary()))
                    .collect::<Vec<_>>()
            })
            .collect::<Vec<_>>();

        write_table(out, None, rows)
    }

    fn write_days<W: Write>(&self, out: &mut W, cells: &[DayCell<'_>]) -> anyhow::Result<()> {
        let headers = WEEKDAY_LABELS
            .iter()
            .map(|label| label.to_string())
            .collect::<Vec<_>>();
        let rows = cells
            .chunks(WEEKDAY_LABELS.len())
            .map(|week| {
                week.iter()
                    .map(|cell| self.day_cell_text(cell))
                    .collect::<Vec<_>>()
            })
            .collect::<Vec<_>>();

        write_table(out, Some(headers), rows)
    }

    fn day_cell_text(&self, cell: &DayCell<'_>) -> String {
        let label = if cell.is_reference {
            self.paint(&format!("[{}]", cell.label), "7")
        } else if !cell.in_month {
            self.paint(&cell.label, "2")
        } else {
            cell.label.clone()
        };

        let mut lines = vec![label];
        for entry in &cell.events {
            lines.push(format!(
                "{} {}",
                self.swatch(entry.event.tag.swatch()),
                event_line(entry.event)
            ));
        }
        lines.join("\n")
    }

    fn write_timeline<W: Write>(&self, out: &mut W, timeline: &DayTimeline<'_>) -> anyhow::Result<()> {
        let hour_height = timeline.day_height / 24.0;
        for row in &timeline.hours {
            let blocks = timeline
                .blocks
                .iter()
                .filter(|block| hour_of(block.top, hour_height) == row.hour)
                .collect::<Vec<_>>();

            if blocks.is_empty() {
                writeln!(out, "{} │", self.paint(&row.label, "2"))?;
                continue;
            }

            for (idx, block) in blocks.iter().enumerate() {
                let gutter = if idx == 0 {
                    row.label.clone()
                } else {
                    " ".repeat(UnicodeWidthStr::width(row.label.as_str()))
                };
                writeln!(
                    out,
                    "{gutter} │ {} {}  (top {:.0}px, height {:.0}px)",
                    self.swatch(block.event.tag.swatch()),
                    event_line(block.event),
                    block.top,
                    block.height
                )?;
            }
        }
        Ok(())
    }

    fn swatch(&self, color: Option<&str>) -> String {
        match color.and_then(parse_css_hex) {
            Some((r, g, b)) if self.color => format!("\x1b[38;2;{r};{g};{b}m{SWATCH}\x1b[0m"),
            _ => SWATCH.to_string(),
        }
    }

    fn paint(&self, text: &str, code: &str) -> String {
        if !self.color {
            return text.to_string();
        }
        format!("\x1b[{code}m{text}\x1b[0m")
    }
}

fn event_line(event: &Event) -> String {
    format!("{}-{} {}", event.start_time, event.end_time, event.title)
}

fn hour_of(top: f64, hour_height: f64) -> u32 {
    if hour_height <= 0.0 {
        return 0;
    }
    (top / hour_height).floor().clamp(0.0, 23.0) as u32
}

/// `#rgb` or `#rrggbb`; anything else is left to the default swatch.
fn parse_css_hex(color: &str) -> Option<(u8, u8, u8)> {
    let hex = color.trim().strip_prefix('#')?;
    if !hex.chars().all(|ch| ch.is_ascii_hexdigit()) {
        return None;
    }
    let channel = |raw: &str| u8::from_str_radix(raw, 16).ok();
    match hex.len() {
        3 => {
            let expand = |idx: usize| channel(&hex[idx..idx + 1].repeat(2));
            Some((expand(0)?, expand(1)?, expand(2)?))
        }
        6 => Some((channel(&hex[0..2])?, channel(&hex[2..4])?, channel(&hex[4..6])?)),
        _ => None,
    }
}

fn write_table<W: Write>(
    mut writer: W,
    headers: Option<Vec<String>>,
    rows: Vec<Vec<String>>,
) -> anyhow::Result<()> {
    let column_count = headers
        .as_ref()
        .map(Vec::len)
        .unwrap_or_else(|| rows.iter().map(Vec::len).max().unwrap_or(0));
    let mut widths = vec![0usize; column_count];

    if let Some(headers) = &headers {
        for (idx, header) in headers.iter().enumerate() {
            widths[idx] = widths[idx].max(UnicodeWidthStr::width(header.as_str()));
        }
    }

    for row in &rows {
        for (idx, cell) in row.iter().enumerate().take(column_count) {
            for line in cell.lines() {
                widths[idx] = widths[idx].max(UnicodeWidthStr::width(strip_ansi(line).as_str()));
            }
        }
    }

    if let Some(headers) = &headers {
        for idx in 0..column_count {
            write!(writer, "{:width$} ", headers[idx], width = widths[idx])?;
        }
        writeln!(writer)?;

        for width in &widths {
            write!(writer, "{:-<width$} ", "", width = *width)?;
        }
        writeln!(writer)?;
    }

    for row in rows {
        let cells = row
            .iter()
            .map(|cell| cell.lines().collect::<Vec<_>>())
            .collect::<Vec<_>>();
        let height = cells.iter().map(Vec::len).max().unwrap_or(0).max(1);

        for line_idx in 0..height {
            for idx in 0..column_count {
                let line = cells
                    .get(idx)
                    .and_then(|lines| lines.get(line_idx))
                    .copied()
                    .unwrap_or("");
                let visible_width = UnicodeWidthStr::width(strip_ansi(line).as_str());
                let padding = widths[idx].saturating_sub(visible_width);
                write!(writer, "{}{} ", line, " ".repeat(padding))?;
            }
            writeln!(writer)?;
        }
        writeln!(writer)?;
    }

    Ok(())
}

fn strip_ansi(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut escaped = false;

    for ch in s.chars() {
        if escaped {
            if ch == 'm' {
                escaped = false;
            }
            continue;
        }

        if ch == '\x1b' {
            escaped = true;
            continue;
        }

        out.push(ch);
    }

    out
}
