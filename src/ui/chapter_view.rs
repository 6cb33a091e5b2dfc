use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Padding, Paragraph},
    Frame,
};
use std::time::Instant;

use super::highlight::Highlighter;
use super::styles::Palette;
use super::utils::expand_tabs;
use crate::app::{App, Focus};
use crate::clipboard::CopyStatus;
use crate::index::{ChapterEntry, FileRef};
use crate::loader::{CacheEntry, FileContent, LoadOutcome};

/// Render the open chapter: file list with the active panel expanded inline
pub fn render(f: &mut Frame, area: Rect, app: &App, hl: &Highlighter, p: &Palette) {
    let Some(chapter) = app.current_chapter() else {
        return;
    };

    let focused = app.focus == Focus::Content;
    let block = Block::default()
        .title(Span::styled(format!(" {} ", chapter.label()), p.title_style()))
        .borders(Borders::ALL)
        .border_style(if focused { Style::default().fg(p.blue) } else { p.border_style() })
        .padding(Padding::horizontal(1))
        .style(p.default_style());
    let inner_height = area.height.saturating_sub(2) as usize;
    let inner_width = area.width.saturating_sub(4) as usize;

    let (lines, cursor_line) = build_lines(app, chapter, hl, p, inner_height, inner_width);

    // Keep the file cursor row on screen
    let scroll = if inner_height == 0 || cursor_line < inner_height {
        0
    } else {
        cursor_line + 1 - inner_height
    };

    let para = Paragraph::new(lines)
        .block(block)
        .scroll((scroll.min(u16::MAX as usize) as u16, 0));
    f.render_widget(para, area);
}

fn build_lines(
    app: &App,
    chapter: &ChapterEntry,
    hl: &Highlighter,
    p: &Palette,
    height: usize,
    width: usize,
) -> (Vec<Line<'static>>, usize) {
    let mut lines: Vec<Line<'static>> = Vec::new();

    if chapter.files.is_empty() {
        lines.push(Line::from(Span::styled(
            "No files found for this chapter.",
            Style::default().fg(p.dim),
        )));
        return (lines, 0);
    }

    // Rows left for code once every file row and the panel chrome are drawn
    let code_rows = height.saturating_sub(chapter.files.len() + 3).max(5);
    let mut cursor_line = 0;

    for (idx, file) in chapter.files.iter().enumerate() {
        let is_open = app.panels.is_open(idx);
        let is_cursor = idx == app.file_cursor;
        if is_cursor {
            cursor_line = lines.len();
        }

        let marker = if is_open { "▾ " } else { "▸ " };
        let name_style = if is_open {
            Style::default().fg(p.cyan).add_modifier(Modifier::BOLD)
        } else if app.panels.active() == Some(idx) {
            Style::default().fg(p.cyan)
        } else {
            Style::default().fg(p.text)
        };
        let row = Line::from(vec![
            Span::styled(marker, Style::default().fg(p.muted)),
            Span::styled(file.display_name.clone(), name_style),
            Span::styled(format!("  {}", file.raw_path), Style::default().fg(p.dim)),
        ]);
        lines.push(if is_cursor && app.focus == Focus::Content {
            row.style(p.selected_style())
        } else {
            row
        });

        if is_open {
            render_panel(&mut lines, app, file, hl, p, code_rows, width);
        }
    }

    (lines, cursor_line)
}

fn render_panel(
    lines: &mut Vec<Line<'static>>,
    app: &App,
    file: &FileRef,
    hl: &Highlighter,
    p: &Palette,
    code_rows: usize,
    width: usize,
) {
    match app.active_entry() {
        None | Some(CacheEntry::Loading(_)) => {
            lines.push(Line::from(Span::styled(
                "  ⠋ Loading…",
                Style::default().fg(p.yellow),
            )));
        }
        Some(CacheEntry::Ready(LoadOutcome::Failed(err))) => {
            for text in err.lines() {
                lines.push(Line::from(Span::styled(format!("  {}", text), p.error_style())));
            }
        }
        Some(CacheEntry::Ready(LoadOutcome::Loaded(content))) => {
            lines.push(code_header(app, file, p, width));
            render_code(lines, app, file, content, hl, p, code_rows);
        }
    }
    lines.push(Line::from(""));
}

fn code_header(app: &App, file: &FileRef, p: &Palette, width: usize) -> Line<'static> {
    let label = app.copy_status.label(Instant::now());
    let button_style = match app.copy_status.settle(Instant::now()) {
        CopyStatus::Idle => p.key_hint_style(),
        CopyStatus::Copied(_) => Style::default().fg(p.green).add_modifier(Modifier::BOLD),
        CopyStatus::Failed(_) => p.error_style().add_modifier(Modifier::BOLD),
    };
    let name = format!("  {}", file.file_name());
    let button = format!("[y] {}", label);
    let pad = width.saturating_sub(name.chars().count() + button.chars().count());
    Line::from(vec![
        Span::styled(name, Style::default().fg(p.bright)),
        Span::raw(" ".repeat(pad)),
        Span::styled(button, button_style),
    ])
    .style(Style::default().bg(p.panel))
}

fn render_code(
    lines: &mut Vec<Line<'static>>,
    app: &App,
    file: &FileRef,
    content: &FileContent,
    hl: &Highlighter,
    p: &Palette,
    code_rows: usize,
) {
    let tab_width = app.config.display.tab_width;
    let all: Vec<String> = content
        .raw
        .lines()
        .map(|l| expand_tabs(l, tab_width))
        .collect();
    let start = (app.panel_scroll as usize).min(all.len().saturating_sub(1));
    let end = (start + code_rows).min(all.len());
    let refs: Vec<&str> = all.iter().map(|s| s.as_str()).collect();

    let highlighted = hl.highlight_window(
        &refs,
        start..end,
        file.file_name(),
        &app.config.source.language,
        app.current_theme(),
        p.code_style(),
    );

    let num_width = all.len().to_string().len();
    for (offset, spans) in highlighted.into_iter().enumerate() {
        let mut row: Vec<Span<'static>> = Vec::with_capacity(spans.len() + 1);
        if app.config.display.line_numbers {
            row.push(Span::styled(
                format!("  {:>w$} ", start + offset + 1, w = num_width),
                Style::default().fg(p.dim).bg(p.code_bg),
            ));
        } else {
            row.push(Span::styled("  ", p.code_style()));
        }
        row.extend(spans);
        lines.push(Line::from(row).style(p.code_style()));
    }

    if end < all.len() || start > 0 {
        lines.push(Line::from(Span::styled(
            format!("  lines {}-{} of {} · J/K to scroll", start + 1, end, all.len()),
            Style::default().fg(p.dim),
        )));
    }
}
