use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use super::styles::Palette;
use crate::app::{App, Focus, IndexState, InputMode, View};

/// Compute the display width of a list of spans
fn spans_width(spans: &[Span]) -> usize {
    spans.iter().map(|s| s.content.chars().count()).sum()
}

/// Top row: app name · source · current location, theme on the right
pub fn render_top_bar(f: &mut Frame, area: Rect, app: &App, p: &Palette) {
    let mut left: Vec<Span> = vec![
        Span::styled(" nb", Style::default().fg(p.cyan).add_modifier(Modifier::BOLD)),
        Span::styled(" · ", Style::default().fg(p.border)),
        Span::styled(app.source_label.as_str(), Style::default().fg(p.green)),
    ];
    match app.current_chapter() {
        Some(chapter) => {
            left.push(Span::styled(" › ", Style::default().fg(p.border)));
            left.push(Span::styled(chapter.label(), Style::default().fg(p.bright)));
        }
        None => {
            left.push(Span::styled(" › ", Style::default().fg(p.border)));
            left.push(Span::styled("Home", Style::default().fg(p.bright)));
        }
    }
    if app.index_state == IndexState::Loading {
        left.push(Span::styled("  (indexing…)", Style::default().fg(p.yellow)));
    }

    let right = vec![
        Span::styled(format!("{} cached", app.loader.len()), Style::default().fg(p.dim)),
        Span::styled("  ", Style::default()),
        Span::styled(
            format!("◐ {} ", app.current_theme().label()),
            Style::default().fg(p.muted),
        ),
    ];

    let pad = (area.width as usize).saturating_sub(spans_width(&left) + spans_width(&right));
    let mut spans = left;
    spans.push(Span::raw(" ".repeat(pad)));
    spans.extend(right);

    let bar = Paragraph::new(Line::from(spans)).style(Style::default().bg(p.panel));
    f.render_widget(bar, area);
}

/// Bottom row: key hints for the current mode
pub fn render_bottom_bar(f: &mut Frame, area: Rect, app: &App, p: &Palette) {
    let hints: &[(&str, &str)] = match (app.input_mode, app.focus, app.view) {
        (InputMode::Search, _, _) => &[("type", "filter"), ("enter", "keep"), ("esc", "clear")],
        (_, Focus::Content, View::Chapter(_)) => &[
            ("j/k", "files"),
            ("enter", "open/close"),
            ("y", "copy"),
            ("r", "reload"),
            ("J/K", "scroll"),
            ("tab", "toc"),
            ("t", "theme"),
            ("H", "home"),
            ("q", "quit"),
        ],
        _ => &[
            ("j/k", "chapters"),
            ("enter", "open"),
            ("/", "search"),
            ("R", "reindex"),
            ("t", "theme"),
            ("H", "home"),
            ("q", "quit"),
        ],
    };

    let mut spans: Vec<Span> = vec![Span::raw(" ")];
    for (key, desc) in hints {
        spans.push(Span::styled(*key, p.key_hint_style()));
        spans.push(Span::styled(format!(" {}  ", desc), Style::default().fg(p.dim)));
    }
    let bar = Paragraph::new(Line::from(spans)).style(Style::default().bg(p.panel));
    f.render_widget(bar, area);
}

/// Transient notification in the top-right corner
pub fn render_notification(f: &mut Frame, area: Rect, message: &str, p: &Palette) {
    let notif_width = message.chars().count() as u16 + 4;
    let notif_x = area.x + area.width.saturating_sub(notif_width + 2);
    let notif_y = area.y + 2;

    let notif_area = Rect {
        x: notif_x,
        y: notif_y.min(area.y + area.height.saturating_sub(1)),
        width: notif_width.min(area.width),
        height: 1,
    };

    let notif = Paragraph::new(Line::from(vec![
        Span::styled(" ● ", Style::default().fg(p.green)),
        Span::styled(message, Style::default().fg(p.text)),
        Span::raw(" "),
    ]))
    .style(Style::default().bg(p.panel).fg(p.text));

    f.render_widget(notif, notif_area);
}
