use ratatui::layout::{Constraint, Direction, Layout, Rect};

/// Simple word-wrap helper.
/// Uses `chars().count()` for the width check so multi-byte UTF-8 strings
/// are measured in characters, not bytes.
pub(crate) fn word_wrap(text: &str, max_width: usize) -> Vec<String> {
    if max_width == 0 {
        return vec![text.to_string()];
    }
    let mut result = Vec::new();
    for line in text.lines() {
        if line.chars().count() <= max_width {
            result.push(line.to_string());
        } else {
            let mut current = String::new();
            for word in line.split_whitespace() {
                if current.is_empty() {
                    current = word.to_string();
                } else if current.chars().count() + 1 + word.chars().count() <= max_width {
                    current.push(' ');
                    current.push_str(word);
                } else {
                    result.push(current);
                    current = word.to_string();
                }
            }
            if !current.is_empty() {
                result.push(current);
            }
        }
    }
    if result.is_empty() {
        result.push(String::new());
    }
    result
}

/// Expand tabs to the configured width
pub(crate) fn expand_tabs(line: &str, tab_width: u8) -> String {
    if !line.contains('\t') {
        return line.to_string();
    }
    line.replace('\t', &" ".repeat(tab_width.max(1) as usize))
}

/// Rect of `height` rows taken from the top of `r`, with the remainder
pub(crate) fn split_top(r: Rect, height: u16) -> (Rect, Rect) {
    let parts = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(height), Constraint::Min(0)])
        .split(r);
    (parts[0], parts[1])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_line_untouched() {
        assert_eq!(word_wrap("hello", 10), vec!["hello"]);
    }

    #[test]
    fn wraps_on_word_boundary() {
        assert_eq!(word_wrap("one two three", 7), vec!["one two", "three"]);
    }

    #[test]
    fn empty_text_yields_one_line() {
        assert_eq!(word_wrap("", 5), vec![""]);
    }

    #[test]
    fn tabs_expand() {
        assert_eq!(expand_tabs("\tx", 4), "    x");
        assert_eq!(expand_tabs("a\tb", 2), "a  b");
    }

    #[test]
    fn split_top_heights() {
        let (top, rest) = split_top(Rect::new(0, 0, 10, 10), 3);
        assert_eq!(top.height, 3);
        assert_eq!(rest.height, 7);
    }
}
