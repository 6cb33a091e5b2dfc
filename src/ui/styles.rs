use ratatui::style::{Color, Modifier, Style};

use crate::theme::Theme;

/// Colours for one theme
#[derive(Debug, Clone, Copy)]
pub struct Palette {
    // ── Background colors ──
    pub bg: Color,
    pub surface: Color,
    pub panel: Color,
    pub border: Color,
    pub code_bg: Color,
    pub selected_bg: Color,

    // ── Text colors ──
    pub text: Color,
    pub dim: Color,
    pub muted: Color,
    pub bright: Color,

    // ── Accent colors ──
    pub blue: Color,
    pub cyan: Color,
    pub green: Color,
    pub yellow: Color,
    pub red: Color,
    pub purple: Color,
}

pub const DARK: Palette = Palette {
    bg: Color::Rgb(12, 12, 12),
    surface: Color::Rgb(20, 20, 20),
    panel: Color::Rgb(26, 26, 26),
    border: Color::Rgb(42, 42, 42),
    code_bg: Color::Rgb(17, 20, 26),
    selected_bg: Color::Rgb(26, 42, 58),

    text: Color::Rgb(200, 200, 200),
    dim: Color::Rgb(102, 102, 102),
    muted: Color::Rgb(136, 136, 136),
    bright: Color::Rgb(232, 232, 232),

    blue: Color::Rgb(96, 165, 250),
    cyan: Color::Rgb(34, 211, 238),
    green: Color::Rgb(74, 222, 128),
    yellow: Color::Rgb(250, 204, 21),
    red: Color::Rgb(248, 113, 113),
    purple: Color::Rgb(167, 139, 250),
};

pub const LIGHT: Palette = Palette {
    bg: Color::Rgb(250, 250, 250),
    surface: Color::Rgb(242, 242, 242),
    panel: Color::Rgb(232, 232, 232),
    border: Color::Rgb(200, 200, 200),
    code_bg: Color::Rgb(246, 248, 250),
    selected_bg: Color::Rgb(214, 230, 250),

    text: Color::Rgb(36, 36, 36),
    dim: Color::Rgb(140, 140, 140),
    muted: Color::Rgb(100, 100, 100),
    bright: Color::Rgb(0, 0, 0),

    blue: Color::Rgb(29, 78, 216),
    cyan: Color::Rgb(14, 116, 144),
    green: Color::Rgb(21, 128, 61),
    yellow: Color::Rgb(161, 98, 7),
    red: Color::Rgb(185, 28, 28),
    purple: Color::Rgb(109, 40, 217),
};

pub fn palette(theme: Theme) -> &'static Palette {
    match theme {
        Theme::Dark => &DARK,
        Theme::Light => &LIGHT,
    }
}

// ── Composed styles ──

impl Palette {
    pub fn default_style(&self) -> Style {
        Style::default().fg(self.text).bg(self.bg)
    }

    pub fn surface_style(&self) -> Style {
        Style::default().fg(self.text).bg(self.surface)
    }

    pub fn border_style(&self) -> Style {
        Style::default().fg(self.border)
    }

    pub fn selected_style(&self) -> Style {
        Style::default().fg(self.blue).bg(self.selected_bg)
    }

    pub fn title_style(&self) -> Style {
        Style::default().fg(self.cyan).add_modifier(Modifier::BOLD)
    }

    pub fn key_hint_style(&self) -> Style {
        Style::default().fg(self.muted).add_modifier(Modifier::BOLD)
    }

    pub fn error_style(&self) -> Style {
        Style::default().fg(self.red)
    }

    pub fn code_style(&self) -> Style {
        Style::default().fg(self.text).bg(self.code_bg)
    }
}
