use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Padding, Paragraph},
    Frame,
};

use super::styles::Palette;
use super::utils::word_wrap;
use crate::app::{ActivityState, App};
use crate::github::{self, ActivityOutcome};

/// Landing panel: title and the recent-activity feed
pub fn render(f: &mut Frame, area: Rect, app: &App, p: &Palette) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(p.border_style())
        .padding(Padding::new(2, 2, 1, 0))
        .style(p.default_style());
    let width = area.width.saturating_sub(6) as usize;

    let mut lines: Vec<Line> = vec![
        Line::from(Span::styled(
            app.config.display.title.as_str(),
            Style::default().fg(p.bright).add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            app.config.display.subtitle.as_str(),
            Style::default().fg(p.muted),
        )),
        Line::from(""),
        Line::from(Span::styled("Recent Updates", p.title_style())),
        Line::from(""),
    ];

    match &app.activity {
        ActivityState::Disabled => {
            lines.push(Line::from(Span::styled(
                "Activity feed disabled",
                Style::default().fg(p.dim),
            )));
        }
        ActivityState::Loading => {
            lines.push(Line::from(Span::styled(
                "Loading recent changes...",
                Style::default().fg(p.yellow),
            )));
        }
        ActivityState::Ready(ActivityOutcome::Empty) => {
            lines.push(Line::from(Span::styled(
                github::NO_CHANGES_MESSAGE,
                Style::default().fg(p.dim),
            )));
        }
        ActivityState::Ready(ActivityOutcome::Failed(_)) => {
            lines.push(Line::from(Span::styled(github::ERROR_MESSAGE, p.error_style())));
        }
        ActivityState::Ready(ActivityOutcome::Commits(commits)) => {
            for commit in commits {
                lines.push(Line::from(vec![
                    Span::styled(commit.display_date(), Style::default().fg(p.green)),
                    Span::styled("  ", Style::default()),
                    Span::styled(commit.author_name.as_str(), Style::default().fg(p.purple)),
                ]));
                for wrapped in word_wrap(commit.summary(), width.saturating_sub(2)) {
                    lines.push(Line::from(Span::styled(
                        format!("  {}", wrapped),
                        Style::default().fg(p.text),
                    )));
                }
                lines.push(Line::from(Span::styled(
                    format!("  {}", commit.html_url),
                    Style::default().fg(p.blue).add_modifier(Modifier::UNDERLINED),
                )));
                lines.push(Line::from(""));
            }
        }
    }

    f.render_widget(Paragraph::new(lines).block(block), area);
}
