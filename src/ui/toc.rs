use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Padding, Paragraph},
    Frame,
};

use super::styles::Palette;
use super::utils::split_top;
use crate::app::{App, Focus, IndexState, InputMode, View};

/// Render the search box and chapter list (left side)
pub fn render(f: &mut Frame, area: Rect, app: &App, p: &Palette) {
    let (search_area, list_area) = split_top(area, 3);
    render_search(f, search_area, app, p);
    render_list(f, list_area, app, p);
}

fn render_search(f: &mut Frame, area: Rect, app: &App, p: &Palette) {
    let searching = app.input_mode == InputMode::Search;
    let border = if searching {
        Style::default().fg(p.blue)
    } else {
        p.border_style()
    };

    let content = if app.search_query.is_empty() && !searching {
        Line::from(Span::styled("Search chapters… (/)", Style::default().fg(p.dim)))
    } else {
        let mut spans = vec![Span::styled(app.search_query.as_str(), Style::default().fg(p.bright))];
        if searching {
            spans.push(Span::styled("█", Style::default().fg(p.blue)));
        }
        Line::from(spans)
    };

    let search = Paragraph::new(content).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(border)
            .style(p.surface_style()),
    );
    f.render_widget(search, area);
}

fn render_list(f: &mut Frame, area: Rect, app: &App, p: &Palette) {
    let visible = app.visible_toc();
    let total = app.chapters.len();
    let title = if app.search_query.is_empty() {
        format!(" CHAPTERS ({}) ", total)
    } else {
        format!(" CHAPTERS ({}/{}) ", visible.len(), total)
    };

    let focused = app.focus == Focus::Toc;
    let block = Block::default()
        .title(Span::styled(title, p.title_style()))
        .borders(Borders::ALL)
        .border_style(if focused { Style::default().fg(p.blue) } else { p.border_style() })
        .padding(Padding::horizontal(1))
        .style(p.surface_style());

    if visible.is_empty() {
        let msg = match app.index_state {
            IndexState::Loading => "Loading index…",
            _ if !app.search_query.is_empty() => "No matching chapters",
            _ => "",
        };
        let empty = Paragraph::new(Span::styled(msg, Style::default().fg(p.dim))).block(block);
        f.render_widget(empty, area);
        return;
    }

    // Keep the cursor in view
    let viewport = area.height.saturating_sub(2) as usize;
    let start = if viewport == 0 || app.toc_cursor < viewport {
        0
    } else {
        app.toc_cursor + 1 - viewport
    };

    let open_chapter = match app.view {
        View::Chapter(i) => Some(i),
        View::Home => None,
    };

    let items: Vec<ListItem> = visible
        .iter()
        .enumerate()
        .skip(start)
        .take(viewport.max(1))
        .map(|(pos, &idx)| {
            let chapter = &app.chapters[idx];
            let is_cursor = pos == app.toc_cursor;
            let is_open = open_chapter == Some(idx);
            let label_style = if is_open {
                Style::default().fg(p.cyan).add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(p.text)
            };
            let line = Line::from(vec![
                Span::styled(format!("{} ", chapter.icon), label_style),
                Span::styled(chapter.title.as_str(), label_style),
                Span::styled(format!("  {}", chapter.files.len()), Style::default().fg(p.dim)),
            ]);
            let item = ListItem::new(line);
            if is_cursor && focused {
                item.style(p.selected_style())
            } else if is_cursor {
                item.style(Style::default().bg(p.panel))
            } else {
                item
            }
        })
        .collect();

    f.render_widget(List::new(items).block(block), area);
}
