mod chapter_view;
pub mod highlight;
mod home;
mod status_bar;
mod styles;
mod toc;
mod utils;

use crate::app::{App, View};
use highlight::Highlighter;
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::widgets::Block;
use ratatui::Frame;

/// Render the entire UI
pub fn draw(f: &mut Frame, app: &App, hl: &Highlighter) {
    let p = styles::palette(app.current_theme());
    f.render_widget(Block::default().style(p.default_style()), f.area());

    let outer = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // top bar
            Constraint::Min(1),    // main content
            Constraint::Length(1), // key hints
        ])
        .split(f.area());

    status_bar::render_top_bar(f, outer[0], app, p);

    let toc_width = if outer[1].width < 80 { 28 } else { 36 };
    let main_area = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length(toc_width), // chapter list
            Constraint::Min(1),            // home or chapter
        ])
        .split(outer[1]);

    toc::render(f, main_area[0], app, p);
    match app.view {
        View::Home => home::render(f, main_area[1], app, p),
        View::Chapter(_) => chapter_view::render(f, main_area[1], app, hl, p),
    }

    status_bar::render_bottom_bar(f, outer[2], app, p);

    if let Some(ref msg) = app.message {
        status_bar::render_notification(f, f.area(), msg, p);
    }
}
