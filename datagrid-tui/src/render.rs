//! Draws a [`TableView<String>`] with crossterm.
//!
//! Layout, top to bottom: title, search box, header, body rows, footer
//! (summary, page strip, page size), status line and key help.

use std::io::{self, Write};

use crossterm::{
    cursor::MoveTo,
    queue,
    style::{Attribute, Color, Print, ResetColor, SetAttribute, SetForegroundColor},
    terminal::{Clear, ClearType},
};
use datagrid_lib::Body;
use datagrid_lib::column::ColumnWidth;
use datagrid_lib::pagination::{EllipsisPosition, PageItem, PageSizeSelector, PageWindow};
use datagrid_lib::view::{Footer, Toolbar};
use datagrid_lib::TableView;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

const COLUMN_GAP: u16 = 2;
const SKELETON: char = '░';

const HELP: &str = "type to search · ←/→ page · Home/End first/last · ↑/↓ row · Enter open · \
                    Tab page size · Del remove · ^R reset · ^E outage · Esc quit";

/// Front-end state the view model does not carry.
#[derive(Debug, Default)]
pub struct Overlay<'a> {
    pub title: &'a str,
    /// Highlighted body row.
    pub cursor: Option<usize>,
    pub status: Option<&'a str>,
}

// ============================================================================
// Text layout
// ============================================================================

/// Truncate `text` to `width` display cells, padding with spaces.
pub fn fit(text: &str, width: u16) -> String {
    let width = usize::from(width);
    if text.width() <= width {
        let mut out = text.to_string();
        out.extend(std::iter::repeat_n(' ', width - text.width()));
        return out;
    }
    if width == 0 {
        return String::new();
    }

    let mut out = String::new();
    let mut used = 0;
    for c in text.chars() {
        let w = c.width().unwrap_or(0);
        if used + w > width - 1 {
            break;
        }
        out.push(c);
        used += w;
    }
    out.push('…');
    used += 1;
    out.extend(std::iter::repeat_n(' ', width - used));
    out
}

/// Resolve column widths for a row of `available` cells.
///
/// Columns with an ideal width get it (within their bounds); the rest
/// share what is left evenly.
pub fn layout_columns(hints: &[ColumnWidth], available: u16) -> Vec<u16> {
    if hints.is_empty() {
        return Vec::new();
    }
    let gaps = COLUMN_GAP.saturating_mul(hints.len() as u16 - 1);
    let available = available.saturating_sub(gaps);

    let fixed: u16 = hints
        .iter()
        .filter(|hint| hint.ideal.is_some())
        .map(|hint| hint.resolve(available))
        .fold(0, u16::saturating_add);
    let flexible = hints.iter().filter(|hint| hint.ideal.is_none()).count() as u16;
    let share = if flexible == 0 {
        0
    } else {
        available.saturating_sub(fixed) / flexible
    };

    hints
        .iter()
        .map(|hint| match hint.ideal {
            Some(_) => hint.resolve(available),
            None => hint.resolve(share),
        })
        .collect()
}

fn join_cells<'a>(cells: impl Iterator<Item = (&'a str, u16)>) -> String {
    let gap = " ".repeat(usize::from(COLUMN_GAP));
    cells
        .map(|(text, width)| fit(text, width))
        .collect::<Vec<_>>()
        .join(&gap)
}

// ============================================================================
// Footer segments
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Normal,
    Active,
    Disabled,
}

/// The page strip as styled text segments.
pub fn page_strip(window: &PageWindow) -> Vec<(String, Tone)> {
    let mut segments = Vec::new();
    let link_tone = |enabled: bool| if enabled { Tone::Normal } else { Tone::Disabled };

    if let Some(previous) = window.previous {
        segments.push(("‹ Prev".to_string(), link_tone(previous.enabled)));
    }
    for item in &window.items {
        segments.push(match item {
            PageItem::Page { number, active: true } => (format!("[{}]", number), Tone::Active),
            PageItem::Page { number, .. } => (number.to_string(), Tone::Normal),
            PageItem::Ellipsis(EllipsisPosition::Start | EllipsisPosition::End) => {
                ("…".to_string(), Tone::Disabled)
            }
        });
    }
    if let Some(next) = window.next {
        segments.push(("Next ›".to_string(), link_tone(next.enabled)));
    }
    segments
}

pub fn page_size_segments(selector: &PageSizeSelector) -> Vec<(String, Tone)> {
    selector
        .options
        .iter()
        .map(|&size| {
            if size == selector.selected {
                (format!("[{}]", size), Tone::Active)
            } else {
                (size.to_string(), Tone::Normal)
            }
        })
        .collect()
}

// ============================================================================
// Drawing
// ============================================================================

pub fn draw<W: Write>(
    out: &mut W,
    view: &TableView<String>,
    overlay: &Overlay<'_>,
    (cols, rows): (u16, u16),
) -> io::Result<()> {
    queue!(out, Clear(ClearType::All))?;
    let mut y = 0;

    queue!(
        out,
        MoveTo(0, y),
        SetAttribute(Attribute::Bold),
        Print(fit(overlay.title, cols)),
        SetAttribute(Attribute::Reset)
    )?;
    y += 1;

    if let Some(toolbar) = &view.toolbar {
        draw_toolbar(out, toolbar, y, cols)?;
        y += 1;
    }
    y += 1;

    let hints: Vec<ColumnWidth> = view.header.iter().map(|cell| cell.width).collect();
    let widths = layout_columns(&hints, cols);

    let header = join_cells(
        view.header
            .iter()
            .zip(&widths)
            .map(|(cell, &w)| (cell.content.as_str(), w)),
    );
    queue!(
        out,
        MoveTo(0, y),
        SetAttribute(Attribute::Bold),
        Print(fit(&header, cols)),
        SetAttribute(Attribute::Reset),
        MoveTo(0, y + 1),
        SetAttribute(Attribute::Dim),
        Print("─".repeat(usize::from(cols))),
        SetAttribute(Attribute::Reset)
    )?;
    y += 2;

    // Footer (3) + status + help
    let reserved = 5;
    let mut body_rows = rows.saturating_sub(y + reserved);
    if let Some(max) = view.max_height {
        body_rows = body_rows.min(max);
    }
    y = draw_body(out, &view.body, &widths, overlay.cursor, y, cols, body_rows)?;
    y += 1;

    if let Some(footer) = &view.footer {
        draw_footer(out, footer, y, cols)?;
    }

    let bottom = rows.saturating_sub(2);
    if let Some(status) = overlay.status {
        queue!(
            out,
            MoveTo(0, bottom),
            SetForegroundColor(Color::Cyan),
            Print(fit(status, cols)),
            ResetColor
        )?;
    }
    queue!(
        out,
        MoveTo(0, bottom + 1),
        SetAttribute(Attribute::Dim),
        Print(fit(HELP, cols)),
        SetAttribute(Attribute::Reset)
    )?;

    out.flush()
}

fn draw_toolbar<W: Write>(out: &mut W, toolbar: &Toolbar, y: u16, cols: u16) -> io::Result<()> {
    let Some(search) = &toolbar.search else {
        return Ok(());
    };
    queue!(out, MoveTo(0, y), Print("🔍 "))?;
    let field = cols.saturating_sub(3);
    if search.value.is_empty() {
        queue!(
            out,
            SetAttribute(Attribute::Dim),
            Print(fit(&search.placeholder, field)),
            SetAttribute(Attribute::Reset)
        )
    } else {
        queue!(
            out,
            SetAttribute(Attribute::Underlined),
            Print(fit(&format!("{}▏", search.value), field)),
            SetAttribute(Attribute::Reset)
        )
    }
}

/// Draw the body; returns the next free line.
fn draw_body<W: Write>(
    out: &mut W,
    body: &Body<String>,
    widths: &[u16],
    cursor: Option<usize>,
    mut y: u16,
    cols: u16,
    max_rows: u16,
) -> io::Result<u16> {
    match body {
        Body::Failed { message } => {
            queue!(
                out,
                MoveTo(0, y),
                SetForegroundColor(Color::Red),
                Print(fit(message, cols)),
                ResetColor
            )?;
            y += 1;
        }
        Body::Loading { rows } => {
            for row in rows.iter().take(usize::from(max_rows)) {
                let cells: Vec<String> = row
                    .cells
                    .iter()
                    .zip(widths)
                    .map(|(_, &w)| SKELETON.to_string().repeat(usize::from(w)))
                    .collect();
                let line = join_cells(cells.iter().map(String::as_str).zip(widths.iter().copied()));
                queue!(
                    out,
                    MoveTo(0, y),
                    SetAttribute(Attribute::Dim),
                    Print(fit(&line, cols)),
                    SetAttribute(Attribute::Reset)
                )?;
                y += 1;
            }
        }
        Body::Empty {
            message,
            reset_action,
            ..
        } => {
            queue!(out, MoveTo(0, y), Print(fit(message, cols)))?;
            y += 1;
            if *reset_action {
                queue!(
                    out,
                    MoveTo(0, y),
                    SetAttribute(Attribute::Dim),
                    Print(fit("Press Ctrl-R to reset filters", cols)),
                    SetAttribute(Attribute::Reset)
                )?;
                y += 1;
            }
        }
        Body::Populated { rows } => {
            for row in rows.iter().take(usize::from(max_rows)) {
                let line = join_cells(
                    row.cells
                        .iter()
                        .zip(widths)
                        .map(|(cell, &w)| (cell.content.as_str(), w)),
                );
                let highlighted = row.clickable && cursor == Some(row.index);
                queue!(out, MoveTo(0, y))?;
                if highlighted {
                    queue!(out, SetAttribute(Attribute::Reverse))?;
                }
                queue!(out, Print(fit(&line, cols)), SetAttribute(Attribute::Reset))?;
                y += 1;
            }
        }
    }
    Ok(y)
}

fn draw_footer<W: Write>(out: &mut W, footer: &Footer, y: u16, cols: u16) -> io::Result<()> {
    queue!(
        out,
        MoveTo(0, y),
        Print(fit(&footer.summary.to_string(), cols))
    )?;

    if let Some(window) = &footer.pagination {
        queue!(out, MoveTo(0, y + 1))?;
        draw_segments(out, &page_strip(window))?;
    }

    if let Some(selector) = &footer.page_size {
        queue!(out, MoveTo(0, y + 2), Print("Items per page: "))?;
        draw_segments(out, &page_size_segments(selector))?;
    }
    Ok(())
}

fn draw_segments<W: Write>(out: &mut W, segments: &[(String, Tone)]) -> io::Result<()> {
    for (text, tone) in segments {
        match tone {
            Tone::Normal => queue!(out, Print(text))?,
            Tone::Active => queue!(
                out,
                SetAttribute(Attribute::Bold),
                SetForegroundColor(Color::Yellow),
                Print(text),
                ResetColor,
                SetAttribute(Attribute::Reset)
            )?,
            Tone::Disabled => queue!(
                out,
                SetAttribute(Attribute::Dim),
                Print(text),
                SetAttribute(Attribute::Reset)
            )?,
        }
        queue!(out, Print(" "))?;
    }
    Ok(())
}
