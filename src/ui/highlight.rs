use ratatui::style::{Color, Style};
use ratatui::text::Span;
use syntect::easy::HighlightLines;
use syntect::highlighting::{Theme as SyntectTheme, ThemeSet};
use std::ops::Range;
use syntect::parsing::{SyntaxReference, SyntaxSet};

use crate::theme::Theme;

/// Syntax and theme sets, loaded once per session
pub struct Highlighter {
    syntax_set: SyntaxSet,
    theme_set: ThemeSet,
}

impl Highlighter {
    pub fn new() -> Self {
        Highlighter {
            // two-face bundles extra grammars (TOML, Dockerfile, ...) on top of syntect's defaults
            syntax_set: two_face::syntax::extra_newlines(),
            theme_set: ThemeSet::load_defaults(),
        }
    }

    fn syntax_for(&self, filename: &str, fallback_token: &str) -> &SyntaxReference {
        let ext = filename.rsplit_once('.').map(|(_, e)| e).unwrap_or("");
        self.syntax_set
            .find_syntax_by_extension(ext)
            .or_else(|| self.syntax_set.find_syntax_by_token(fallback_token))
            .unwrap_or_else(|| self.syntax_set.find_syntax_plain_text())
    }

    fn syntect_theme(&self, theme: Theme) -> Option<&SyntectTheme> {
        let name = match theme {
            Theme::Dark => "base16-ocean.dark",
            Theme::Light => "InspiredGitHub",
        };
        self.theme_set.themes.get(name)
    }

    /// Highlight a run of consecutive lines from one file.
    /// `filename` picks the grammar; `fallback_token` (e.g. "cpp") is used when the
    /// extension is unknown. Syntax state carries across the lines passed in.
    pub fn highlight_lines(
        &self,
        lines: &[&str],
        filename: &str,
        fallback_token: &str,
        theme: Theme,
        base_style: Style,
    ) -> Vec<Vec<Span<'static>>> {
        let plain = || -> Vec<Vec<Span<'static>>> {
            lines
                .iter()
                .map(|l| vec![Span::styled(l.to_string(), base_style)])
                .collect()
        };
        let Some(syn_theme) = self.syntect_theme(theme) else {
            return plain();
        };
        let syntax = self.syntax_for(filename, fallback_token);
        let mut highlighter = HighlightLines::new(syntax, syn_theme);

        let mut out = Vec::with_capacity(lines.len());
        for line in lines {
            // syntect needs a trailing newline
            let input = format!("{}\n", line);
            match highlighter.highlight_line(&input, &self.syntax_set) {
                Ok(ranges) => out.push(
                    ranges
                        .into_iter()
                        .map(|(syn_style, text)| {
                            let fg = Color::Rgb(
                                syn_style.foreground.r,
                                syn_style.foreground.g,
                                syn_style.foreground.b,
                            );
                            Span::styled(text.trim_end_matches('\n').to_string(), base_style.fg(fg))
                        })
                        .collect(),
                ),
                Err(_) => out.push(vec![Span::styled(line.to_string(), base_style)]),
            }
        }
        out
    }

    /// Highlight `lines[range]` with parser state carried from line 0, so a scrolled
    /// window that opens inside a block comment or raw string keeps the right colours.
    pub fn highlight_window(
        &self,
        lines: &[&str],
        range: Range<usize>,
        filename: &str,
        fallback_token: &str,
        theme: Theme,
        base_style: Style,
    ) -> Vec<Vec<Span<'static>>> {
        let end = range.end.min(lines.len());
        let start = range.start.min(end);
        self.highlight_lines(&lines[..end], filename, fallback_token, theme, base_style)
            .into_iter()
            .skip(start)
            .collect()
    }
}
