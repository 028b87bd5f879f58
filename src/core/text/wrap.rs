//! ANSI-preserving word wrapping, truncation and padding.

use unicode_segmentation::UnicodeSegmentation;

use super::ansi::{extract_ansi_code, AnsiCode};
use super::width::{grapheme_width, visible_width};

const ANSI_RESET: &str = "\x1b[0m";

/// Replays the SGR codes seen so far so a continuation row starts in the same style.
#[derive(Debug, Default)]
struct StyleTracker {
    codes: Vec<String>,
}

impl StyleTracker {
    fn observe(&mut self, code: &AnsiCode) {
        if code.is_sgr_reset() {
            self.codes.clear();
        } else if code.is_sgr() {
            self.codes.push(code.code.clone());
        }
    }

    fn is_active(&self) -> bool {
        !self.codes.is_empty()
    }

    fn prefix(&self) -> String {
        self.codes.concat()
    }
}

enum Piece<'a> {
    Ansi(AnsiCode),
    Grapheme(&'a str),
}

fn pieces(line: &str) -> Vec<Piece<'_>> {
    let mut out = Vec::new();
    let mut idx = 0;
    let mut run_start = 0;
    while idx < line.len() {
        if let Some(code) = extract_ansi_code(line, idx) {
            out.extend(line[run_start..idx].graphemes(true).map(Piece::Grapheme));
            idx += code.length;
            run_start = idx;
            out.push(Piece::Ansi(code));
            continue;
        }
        idx += line[idx..].chars().next().map_or(1, char::len_utf8);
    }
    out.extend(line[run_start..].graphemes(true).map(Piece::Grapheme));
    out
}

struct Token<'a> {
    pieces: Vec<Piece<'a>>,
    width: usize,
    is_space: bool,
}

fn tokens(line: &str) -> Vec<Token<'_>> {
    let mut out: Vec<Token<'_>> = Vec::new();
    for piece in pieces(line) {
        let (is_space, width) = match &piece {
            Piece::Ansi(_) => (false, 0),
            Piece::Grapheme(g) => (g.chars().all(char::is_whitespace), grapheme_width(g)),
        };
        match out.last_mut() {
            Some(token) if token.is_space == is_space => {
                token.width += width;
                token.pieces.push(piece);
            }
            _ => out.push(Token {
                pieces: vec![piece],
                width,
                is_space,
            }),
        }
    }
    out
}

struct RowBuilder {
    rows: Vec<String>,
    current: String,
    column: usize,
    continuation: bool,
    tracker: StyleTracker,
}

impl RowBuilder {
    fn push(&mut self, piece: &Piece<'_>) {
        match piece {
            Piece::Ansi(code) => {
                self.tracker.observe(code);
                self.current.push_str(&code.code);
            }
            Piece::Grapheme(g) => {
                self.current.push_str(g);
                self.column += grapheme_width(g);
            }
        }
    }

    fn push_all(&mut self, token: &Token<'_>) {
        for piece in &token.pieces {
            self.push(piece);
        }
    }

    fn break_row(&mut self, continuation: bool) {
        if self.tracker.is_active() {
            self.current.push_str(ANSI_RESET);
        }
        let next = self.tracker.prefix();
        self.rows.push(std::mem::replace(&mut self.current, next));
        self.column = 0;
        self.continuation = continuation;
    }
}

/// Wraps `text` to `width` columns, breaking on whitespace where possible and hard-splitting words
/// that cannot fit on a row of their own. Active SGR styling is closed at the end of each row and
/// reopened on the next one. Embedded newlines always break.
pub fn wrap_text_with_ansi(text: &str, width: usize) -> Vec<String> {
    let width = width.max(1);
    let mut builder = RowBuilder {
        rows: Vec::new(),
        current: String::new(),
        column: 0,
        continuation: false,
        tracker: StyleTracker::default(),
    };

    for (index, line) in text.split('\n').enumerate() {
        if index > 0 {
            builder.break_row(false);
        }

        let mut pending_space: Option<Token<'_>> = None;
        for token in tokens(line) {
            if token.is_space {
                // Leading whitespace survives only on the first row of a line.
                if builder.column > 0 || !builder.continuation {
                    pending_space = Some(token);
                }
                continue;
            }
            if token.width == 0 {
                builder.push_all(&token);
                continue;
            }

            let space_width = pending_space.as_ref().map_or(0, |space| space.width);
            if builder.column + space_width + token.width <= width {
                if let Some(space) = pending_space.take() {
                    builder.push_all(&space);
                }
                builder.push_all(&token);
                continue;
            }

            pending_space = None;
            if builder.column > 0 {
                builder.break_row(true);
            }
            if token.width <= width {
                builder.push_all(&token);
                continue;
            }
            for piece in &token.pieces {
                if let Piece::Grapheme(g) = piece {
                    if builder.column > 0 && builder.column + grapheme_width(g) > width {
                        builder.break_row(true);
                    }
                }
                builder.push(piece);
            }
        }
    }

    let mut rows = builder.rows;
    rows.push(builder.current);
    rows
}

/// Cuts `text` to at most `max_width` columns, ending it with `ellipsis` when something was
/// removed. Text that already fits is returned unchanged.
pub fn truncate_to_width(text: &str, max_width: usize, ellipsis: &str) -> String {
    if visible_width(text) <= max_width {
        return text.to_string();
    }
    let ellipsis_width = visible_width(ellipsis);
    if ellipsis_width > max_width {
        return String::new();
    }

    let target = max_width - ellipsis_width;
    let mut out = String::with_capacity(text.len());
    let mut column = 0;
    let mut styled = false;
    for piece in pieces(text) {
        match piece {
            Piece::Ansi(code) => {
                styled = true;
                out.push_str(&code.code);
            }
            Piece::Grapheme(g) => {
                let w = grapheme_width(g);
                if column + w > target {
                    break;
                }
                column += w;
                out.push_str(g);
            }
        }
    }
    if styled {
        out.push_str(ANSI_RESET);
    }
    out.push_str(ellipsis);
    out
}

/// Right-pads `text` with spaces to `width` visible columns.
pub fn pad_to_width(text: &str, width: usize) -> String {
    let padding = width.saturating_sub(visible_width(text));
    format!("{text}{}", " ".repeat(padding))
}

#[cfg(test)]
mod tests {
    use super::{pad_to_width, truncate_to_width, wrap_text_with_ansi};
    use crate::core::text::width::visible_width;

    #[test]
    fn wraps_on_word_boundaries() {
        assert_eq!(
            wrap_text_with_ansi("the quick brown fox", 10),
            vec!["the quick", "brown fox"]
        );
    }

    #[test]
    fn hard_splits_words_longer_than_the_row() {
        assert_eq!(
            wrap_text_with_ansi("abcdefghij", 4),
            vec!["abcd", "efgh", "ij"]
        );
    }

    #[test]
    fn keeps_explicit_newlines_and_empty_lines() {
        assert_eq!(wrap_text_with_ansi("a\n\nb", 10), vec!["a", "", "b"]);
        assert_eq!(wrap_text_with_ansi("", 10), vec![""]);
    }

    #[test]
    fn keeps_leading_indent_but_drops_continuation_spaces() {
        assert_eq!(wrap_text_with_ansi("  one two", 6), vec!["  one", "two"]);
    }

    #[test]
    fn style_is_closed_and_reopened_across_rows() {
        let rows = wrap_text_with_ansi("\x1b[1mbold words here\x1b[22m", 10);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0], "\x1b[1mbold words\x1b[0m");
        assert_eq!(rows[1], "\x1b[1mhere\x1b[22m");
        assert!(rows.iter().all(|row| visible_width(row) <= 10));
    }

    #[test]
    fn truncation_appends_ellipsis_only_when_needed() {
        assert_eq!(truncate_to_width("short", 10, "…"), "short");
        assert_eq!(truncate_to_width("a longer line", 6, "…"), "a lon…");
        assert_eq!(
            truncate_to_width("\x1b[31mred text\x1b[39m", 4, "…"),
            "\x1b[31mred\x1b[0m…"
        );
    }

    #[test]
    fn pads_to_visible_width() {
        assert_eq!(pad_to_width("\x1b[1mab\x1b[0m", 4), "\x1b[1mab\x1b[0m  ");
        assert_eq!(pad_to_width("abcdef", 4), "abcdef");
    }
}
