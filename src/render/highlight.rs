//! Syntax highlighting for fenced code blocks.

use std::sync::LazyLock;

use syntect::easy::HighlightLines;
use syntect::highlighting::{FontStyle, Style as SynStyle, Theme, ThemeSet};
use syntect::parsing::SyntaxSet;
use syntect::util::LinesWithEndings;

use super::tree::{CodeLine, HighlightedSpan, TokenStyle};

static SYNTAX_SET: LazyLock<SyntaxSet> = LazyLock::new(SyntaxSet::load_defaults_newlines);
static THEME_SET: LazyLock<ThemeSet> = LazyLock::new(ThemeSet::load_defaults);

const THEME_NAME: &str = "base16-ocean.dark";
const PLAIN_FOREGROUND: (u8, u8, u8) = (0xc0, 0xc5, 0xce);

fn theme() -> Option<&'static Theme> {
    THEME_SET
        .themes
        .get(THEME_NAME)
        .or_else(|| THEME_SET.themes.values().next())
}

fn token_style(style: SynStyle) -> TokenStyle {
    TokenStyle {
        foreground: (style.foreground.r, style.foreground.g, style.foreground.b),
        bold: style.font_style.contains(FontStyle::BOLD),
        italic: style.font_style.contains(FontStyle::ITALIC),
        underline: style.font_style.contains(FontStyle::UNDERLINE),
    }
}

fn plain_line(line: &str) -> CodeLine {
    let text = line.trim_end_matches(['\n', '\r']);
    if text.is_empty() {
        return CodeLine::default();
    }
    CodeLine {
        spans: vec![HighlightedSpan {
            text: text.to_string(),
            style: TokenStyle {
                foreground: PLAIN_FOREGROUND,
                ..TokenStyle::default()
            },
        }],
    }
}

/// Returns true when `language` resolves to a grammar other than plain text.
pub fn is_known_language(language: &str) -> bool {
    SYNTAX_SET.find_syntax_by_token(language).is_some()
}

/// Highlights `code` line by line with the grammar registered for `language`.
///
/// Unknown languages use the plain text grammar. Spans never contain line terminators and the
/// concatenated span text of each line equals the source line.
pub fn highlight_code(code: &str, language: &str) -> Vec<CodeLine> {
    let syntax = SYNTAX_SET
        .find_syntax_by_token(language)
        .unwrap_or_else(|| SYNTAX_SET.find_syntax_plain_text());
    let Some(theme) = theme() else {
        return LinesWithEndings::from(code).map(plain_line).collect();
    };

    let mut highlighter = HighlightLines::new(syntax, theme);
    let mut lines = Vec::new();
    for line in LinesWithEndings::from(code) {
        let Ok(ranges) = highlighter.highlight_line(line, &SYNTAX_SET) else {
            lines.push(plain_line(line));
            continue;
        };
        let spans = ranges
            .into_iter()
            .filter_map(|(style, text)| {
                let text = text.trim_end_matches(['\n', '\r']);
                (!text.is_empty()).then(|| HighlightedSpan {
                    text: text.to_string(),
                    style: token_style(style),
                })
            })
            .collect();
        lines.push(CodeLine { spans });
    }
    lines
}
