//! Paints a [`DisplayTree`] into terminal lines.

use crate::core::text::width::visible_width;
use crate::core::text::wrap::{pad_to_width, truncate_to_width, wrap_text_with_ansi};
use crate::render::tree::{
    Block, CellAlignment, CodeBlock, HighlightedSpan, Inline, List, Table,
};
use crate::render::{render, DisplayTree, Preset, Viewport};

pub type MarkdownStyleFn = Box<dyn Fn(&str) -> String>;

// Terminals expand a raw tab to the next 8-column stop, so tabs are painted as the three columns
// `visible_width` counts for them.
const TAB_SPACES: &str = "   ";

fn expand_tabs(text: &str) -> String {
    text.replace('\t', TAB_SPACES)
}

pub type CodeTokenStyleFn = Box<dyn Fn(&HighlightedSpan) -> String>;

pub struct MarkdownTheme {
    pub heading: MarkdownStyleFn,
    pub link: MarkdownStyleFn,
    pub link_url: MarkdownStyleFn,
    pub code: MarkdownStyleFn,
    pub code_block_border: MarkdownStyleFn,
    pub line_number: MarkdownStyleFn,
    pub quote: MarkdownStyleFn,
    pub quote_border: MarkdownStyleFn,
    pub hr: MarkdownStyleFn,
    pub list_bullet: MarkdownStyleFn,
    pub bold: MarkdownStyleFn,
    pub italic: MarkdownStyleFn,
    pub strikethrough: MarkdownStyleFn,
    pub underline: MarkdownStyleFn,
    pub image: MarkdownStyleFn,
    pub code_token: CodeTokenStyleFn,
}

fn ansi_wrap(text: &str, prefix: &str, suffix: &str) -> String {
    format!("{prefix}{text}{suffix}")
}

fn sgr(prefix: &'static str, suffix: &'static str) -> MarkdownStyleFn {
    Box::new(move |text| ansi_wrap(text, prefix, suffix))
}

fn ansi_code_token(span: &HighlightedSpan) -> String {
    let (r, g, b) = span.style.foreground;
    let mut text = ansi_wrap(&span.text, &format!("\x1b[38;2;{r};{g};{b}m"), "\x1b[39m");
    if span.style.bold {
        text = ansi_wrap(&text, "\x1b[1m", "\x1b[22m");
    }
    if span.style.italic {
        text = ansi_wrap(&text, "\x1b[3m", "\x1b[23m");
    }
    if span.style.underline {
        text = ansi_wrap(&text, "\x1b[4m", "\x1b[24m");
    }
    text
}

impl MarkdownTheme {
    /// No styling at all; useful for logs, pipes and `NO_COLOR` terminals.
    pub fn plain() -> Self {
        let identity = || -> MarkdownStyleFn { Box::new(|text| text.to_string()) };
        Self {
            heading: identity(),
            link: identity(),
            link_url: identity(),
            code: identity(),
            code_block_border: identity(),
            line_number: identity(),
            quote: identity(),
            quote_border: identity(),
            hr: identity(),
            list_bullet: identity(),
            bold: identity(),
            italic: identity(),
            strikethrough: identity(),
            underline: identity(),
            image: identity(),
            code_token: Box::new(|span| span.text.clone()),
        }
    }

    pub fn ansi() -> Self {
        Self {
            heading: sgr("\x1b[36m", "\x1b[39m"),
            link: sgr("\x1b[34m", "\x1b[39m"),
            link_url: sgr("\x1b[2m", "\x1b[22m"),
            code: sgr("\x1b[33;48;5;236m", "\x1b[39;49m"),
            code_block_border: sgr("\x1b[2m", "\x1b[22m"),
            line_number: sgr("\x1b[90m", "\x1b[39m"),
            quote: sgr("\x1b[90m", "\x1b[39m"),
            quote_border: sgr("\x1b[90m", "\x1b[39m"),
            hr: sgr("\x1b[90m", "\x1b[39m"),
            list_bullet: sgr("\x1b[36m", "\x1b[39m"),
            bold: sgr("\x1b[1m", "\x1b[22m"),
            italic: sgr("\x1b[3m", "\x1b[23m"),
            strikethrough: sgr("\x1b[9m", "\x1b[29m"),
            underline: sgr("\x1b[4m", "\x1b[24m"),
            image: sgr("\x1b[35m", "\x1b[39m"),
            code_token: Box::new(ansi_code_token),
        }
    }
}

pub struct MarkdownView {
    theme: MarkdownTheme,
}

impl MarkdownView {
    pub fn new(theme: MarkdownTheme) -> Self {
        Self { theme }
    }

    /// Renders and paints `markdown` in one step.
    pub fn paint_markdown(&self, markdown: &str, viewport: Viewport, width: usize) -> Vec<String> {
        self.paint(&render(markdown, viewport), width)
    }

    /// Paints `tree` into lines no wider than `width` columns, except for tables whose minimum
    /// width exceeds it.
    pub fn paint(&self, tree: &DisplayTree, width: usize) -> Vec<String> {
        self.paint_blocks(&tree.blocks, width.max(1), true)
    }

    // Adjacent margins collapse to the larger of the two. Nested content (list items, quotes)
    // is painted without margins.
    fn paint_blocks(&self, blocks: &[Block], width: usize, with_margins: bool) -> Vec<String> {
        let mut lines = Vec::new();
        let mut previous_margin: Option<u8> = None;
        for block in blocks {
            let preset = block.preset();
            if let (Some(previous), true) = (previous_margin, with_margins) {
                let gap = previous.max(preset.margin_top);
                lines.extend(std::iter::repeat(String::new()).take(gap as usize));
            }
            lines.extend(self.paint_block(block, width));
            previous_margin = Some(preset.margin_bottom);
        }
        lines
    }

    fn paint_block(&self, block: &Block, width: usize) -> Vec<String> {
        match block {
            Block::Paragraph { inlines, .. } => {
                wrap_text_with_ansi(&self.paint_inlines(inlines, width), width)
            }
            Block::Heading { level, inlines, .. } => {
                let text = self.paint_inlines(inlines, width);
                let styled = match level {
                    1 => (self.theme.heading)(&(self.theme.bold)(&(self.theme.underline)(&text))),
                    2 => (self.theme.heading)(&(self.theme.bold)(&text)),
                    _ => {
                        let marked = format!("{} {text}", "#".repeat(*level as usize));
                        (self.theme.heading)(&(self.theme.bold)(&marked))
                    }
                };
                wrap_text_with_ansi(&styled, width)
            }
            Block::List(list) => self.paint_list(list, width),
            Block::BlockQuote { blocks, preset } => self.paint_quote(blocks, *preset, width),
            Block::CodeBlock(code) => self.paint_code(code, width),
            Block::Table(table) => self.paint_table(table, width),
            Block::ThematicBreak { .. } => vec![(self.theme.hr)(&"─".repeat(width.min(80)))],
            Block::Html { text, .. } => wrap_text_with_ansi(&expand_tabs(text.trim_end()), width),
        }
    }

    fn paint_inlines(&self, inlines: &[Inline], width: usize) -> String {
        let mut out = String::new();
        for inline in inlines {
            match inline {
                Inline::Text(text) | Inline::Html(text) => out.push_str(&expand_tabs(text)),
                Inline::Emphasis(children) => {
                    out.push_str(&(self.theme.italic)(&self.paint_inlines(children, width)))
                }
                Inline::Strong(children) => {
                    out.push_str(&(self.theme.bold)(&self.paint_inlines(children, width)))
                }
                Inline::Strikethrough(children) => out.push_str(&(self.theme.strikethrough)(
                    &self.paint_inlines(children, width),
                )),
                Inline::Code { text, preset } => {
                    let pad = " ".repeat(preset.padding as usize);
                    let text = expand_tabs(text);
                    out.push_str(&(self.theme.code)(&format!("{pad}{text}{pad}")));
                }
                Inline::Link(link) => {
                    let label = self.paint_inlines(&link.children, width);
                    out.push_str(&(self.theme.link)(&(self.theme.underline)(&label)));
                    let plain = Inline::plain_text(&link.children);
                    let mailto_label = link.href.strip_prefix("mailto:") == Some(plain.as_str());
                    if plain != link.href && !mailto_label {
                        out.push_str(&(self.theme.link_url)(&format!(" ({})", link.href)));
                    }
                }
                Inline::Image(image) => {
                    let label = if image.alt.is_empty() {
                        "[image]".to_string()
                    } else {
                        format!("[image: {}]", image.alt)
                    };
                    let clamp = (width * image.max_width_percent as usize / 100).max(1);
                    out.push_str(&(self.theme.image)(&truncate_to_width(&label, clamp, "…")));
                    out.push_str(&(self.theme.link_url)(&format!(" ({})", image.src)));
                }
                Inline::Break => out.push('\n'),
            }
        }
        out
    }

    fn paint_list(&self, list: &List, width: usize) -> Vec<String> {
        let indent = " ".repeat(list.preset.indent as usize);
        let mut lines = Vec::new();
        for (idx, item) in list.items.iter().enumerate() {
            let mut marker = if list.ordered {
                format!("{}. ", list.start.saturating_add(idx as u32))
            } else {
                "- ".to_string()
            };
            match item.checked {
                Some(true) => marker.push_str("[x] "),
                Some(false) => marker.push_str("[ ] "),
                None => {}
            }
            let marker_width = visible_width(&marker);
            let content_width = width
                .saturating_sub(indent.len() + marker_width)
                .max(1);
            let mut body = self.paint_blocks(&item.blocks, content_width, false);
            if body.is_empty() {
                body.push(String::new());
            }
            let continuation = " ".repeat(marker_width);
            for (line_idx, line) in body.into_iter().enumerate() {
                if line_idx == 0 {
                    lines.push(format!("{indent}{}{line}", (self.theme.list_bullet)(&marker)));
                } else {
                    lines.push(format!("{indent}{continuation}{line}"));
                }
            }
        }
        lines
    }

    fn paint_quote(&self, blocks: &[Block], preset: Preset, width: usize) -> Vec<String> {
        let indent = " ".repeat(preset.indent as usize);
        let padding = " ".repeat(preset.padding as usize);
        let border = (self.theme.quote_border)("│");
        let inner_width = width
            .saturating_sub(indent.len() + 1 + padding.len())
            .max(1);
        self.paint_blocks(blocks, inner_width, false)
            .into_iter()
            .map(|line| {
                if line.is_empty() {
                    format!("{indent}{border}")
                } else {
                    let styled = (self.theme.quote)(&(self.theme.italic)(&line));
                    format!("{indent}{border}{padding}{styled}")
                }
            })
            .collect()
    }

    fn paint_code(&self, code: &CodeBlock, width: usize) -> Vec<String> {
        let pad = " ".repeat(code.preset.padding as usize);
        let inner_width = width.saturating_sub(pad.len()).max(1);
        let digits = code.lines.len().max(1).to_string().len();
        let gutter_width = if code.line_numbers { digits + 1 } else { 0 };
        let text_width = inner_width.saturating_sub(gutter_width).max(1);

        let mut lines = Vec::with_capacity(code.lines.len() + 2);
        lines.push(format!(
            "{pad}{}",
            (self.theme.code_block_border)(&format!("```{}", code.language))
        ));
        for (idx, line) in code.lines.iter().enumerate() {
            let styled: String = line
                .spans
                .iter()
                .map(|span| {
                    if span.text.contains('\t') {
                        (self.theme.code_token)(&HighlightedSpan {
                            text: expand_tabs(&span.text),
                            style: span.style,
                        })
                    } else {
                        (self.theme.code_token)(span)
                    }
                })
                .collect();
            let rows = if code.wrap {
                wrap_text_with_ansi(&styled, text_width)
            } else {
                vec![truncate_to_width(&styled, text_width, "…")]
            };
            for (row_idx, row) in rows.into_iter().enumerate() {
                let gutter = match (code.line_numbers, row_idx) {
                    (false, _) => String::new(),
                    (true, 0) => (self.theme.line_number)(&format!("{:>digits$} ", idx + 1)),
                    (true, _) => " ".repeat(gutter_width),
                };
                lines.push(format!("{pad}{gutter}{row}"));
            }
        }
        lines.push(format!("{pad}{}", (self.theme.code_block_border)("```")));
        lines
    }

    fn paint_table(&self, table: &Table, width: usize) -> Vec<String> {
        let num_cols = table.header.len();
        if num_cols == 0 {
            return Vec::new();
        }
        let width = table.min_width.map_or(width, |min| width.max(min));
        let pad_width = table.cell_preset.padding as usize;
        let pad = " ".repeat(pad_width);

        let cell = |row: &[Vec<Inline>], col: usize| -> String {
            row.get(col)
                .map(|inlines| self.paint_inlines(inlines, width))
                .unwrap_or_default()
        };
        let header: Vec<String> = (0..num_cols).map(|col| cell(&table.header, col)).collect();
        let rows: Vec<Vec<String>> = table
            .rows
            .iter()
            .map(|row| (0..num_cols).map(|col| cell(row, col)).collect())
            .collect();

        let border_overhead = (2 * pad_width + 1) * num_cols + 1;
        let available_for_cells = width.saturating_sub(border_overhead);
        if available_for_cells < num_cols {
            return std::iter::once(&header)
                .chain(rows.iter())
                .flat_map(|cells| wrap_text_with_ansi(&cells.join(" | "), width))
                .collect();
        }

        let column_widths = allocate_column_widths(&header, &rows, available_for_cells);
        let alignment = |col: usize| {
            table
                .alignments
                .get(col)
                .copied()
                .unwrap_or(CellAlignment::None)
        };
        let rule = |left: &str, join: &str, right: &str| -> String {
            let cells: Vec<String> = column_widths
                .iter()
                .map(|w| "─".repeat(w + 2 * pad_width))
                .collect();
            format!("{left}{}{right}", cells.join(join))
        };
        let joiner = format!("{pad}│{pad}");
        let paint_row = |cells: &[String], bold: bool, lines: &mut Vec<String>| {
            let wrapped: Vec<Vec<String>> = cells
                .iter()
                .zip(column_widths.iter())
                .map(|(text, width)| wrap_text_with_ansi(text, (*width).max(1)))
                .collect();
            let height = wrapped.iter().map(Vec::len).max().unwrap_or(0);
            for line_idx in 0..height {
                let parts: Vec<String> = (0..num_cols)
                    .map(|col| {
                        let text = wrapped[col].get(line_idx).map_or("", String::as_str);
                        let aligned = align_cell(text, column_widths[col], alignment(col));
                        if bold {
                            (self.theme.bold)(&aligned)
                        } else {
                            aligned
                        }
                    })
                    .collect();
                lines.push(format!("│{pad}{}{pad}│", parts.join(joiner.as_str())));
            }
        };

        let mut lines = vec![rule("┌", "┬", "┐")];
        paint_row(&header, true, &mut lines);
        let separator = rule("├", "┼", "┤");
        lines.push(separator.clone());
        for (row_idx, row) in rows.iter().enumerate() {
            paint_row(row, false, &mut lines);
            if row_idx + 1 < rows.len() {
                lines.push(separator.clone());
            }
        }
        lines.push(rule("└", "┴", "┘"));
        lines
    }
}

fn align_cell(text: &str, width: usize, alignment: CellAlignment) -> String {
    let slack = width.saturating_sub(visible_width(text));
    match alignment {
        CellAlignment::Right => format!("{}{text}", " ".repeat(slack)),
        CellAlignment::Center => {
            let left = slack / 2;
            format!("{}{text}{}", " ".repeat(left), " ".repeat(slack - left))
        }
        CellAlignment::Left | CellAlignment::None => pad_to_width(text, width),
    }
}

fn longest_word_width(text: &str, cap: usize) -> usize {
    text.split_whitespace()
        .map(visible_width)
        .max()
        .unwrap_or(0)
        .clamp(1, cap)
}

/// Column widths for a table whose cells may use `available` columns in total.
///
/// Columns get their natural width when everything fits. Otherwise each column keeps room for
/// its longest word (capped, so one long token cannot starve the rest) and the remaining space
/// is shared in proportion to how much each column would still like to grow.
fn allocate_column_widths(header: &[String], rows: &[Vec<String>], available: usize) -> Vec<usize> {
    const MAX_UNBROKEN_WORD_WIDTH: usize = 30;
    let num_cols = header.len();

    let mut natural = vec![0usize; num_cols];
    let mut min_words = vec![1usize; num_cols];
    for cells in std::iter::once(header).chain(rows.iter().map(Vec::as_slice)) {
        for (col, text) in cells.iter().enumerate().take(num_cols) {
            natural[col] = natural[col].max(visible_width(text));
            min_words[col] = min_words[col].max(longest_word_width(text, MAX_UNBROKEN_WORD_WIDTH));
        }
    }

    if natural.iter().sum::<usize>() <= available {
        return natural
            .iter()
            .zip(min_words.iter())
            .map(|(natural, min)| (*natural).max(*min))
            .collect();
    }

    let mut minimum = min_words.clone();
    if minimum.iter().sum::<usize>() > available {
        minimum = vec![1; num_cols];
        let remaining = available.saturating_sub(num_cols);
        let total_weight: usize = min_words.iter().map(|w| w - 1).sum();
        if total_weight > 0 {
            for (col, w) in min_words.iter().enumerate() {
                minimum[col] += (w - 1) * remaining / total_weight;
            }
        }
        let mut leftover = available.saturating_sub(minimum.iter().sum());
        for width in minimum.iter_mut() {
            if leftover == 0 {
                break;
            }
            *width += 1;
            leftover -= 1;
        }
    }

    let grow_potential: usize = natural
        .iter()
        .zip(minimum.iter())
        .map(|(natural, min)| natural.saturating_sub(*min))
        .sum();
    let extra = available.saturating_sub(minimum.iter().sum());
    let mut widths: Vec<usize> = (0..num_cols)
        .map(|col| {
            let delta = natural[col].saturating_sub(minimum[col]);
            let grow = if grow_potential > 0 {
                delta * extra / grow_potential
            } else {
                0
            };
            minimum[col] + grow
        })
        .collect();

    let mut remaining = available.saturating_sub(widths.iter().sum());
    while remaining > 0 {
        let mut grew = false;
        for col in 0..num_cols {
            if remaining > 0 && widths[col] < natural[col] {
                widths[col] += 1;
                remaining -= 1;
                grew = true;
            }
        }
        if !grew {
            break;
        }
    }
    widths
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::{MarkdownTheme, MarkdownView};
    use crate::core::text::width::visible_width;
    use crate::render::Viewport;

    fn theme() -> MarkdownTheme {
        MarkdownTheme {
            heading: Box::new(|text| format!("<h>{text}</h>")),
            link: Box::new(|text| format!("<l>{text}</l>")),
            link_url: Box::new(|text| format!("<url>{text}</url>")),
            code: Box::new(|text| format!("<c>{text}</c>")),
            code_block_border: Box::new(|text| format!("<cb>{text}</cb>")),
            line_number: Box::new(|text| format!("<n>{text}</n>")),
            quote: Box::new(|text| format!("<q>{text}</q>")),
            quote_border: Box::new(|text| text.to_string()),
            hr: Box::new(|text| format!("<hr>{text}</hr>")),
            list_bullet: Box::new(|text| format!("<b>{text}</b>")),
            bold: Box::new(|text| format!("<b>{text}</b>")),
            italic: Box::new(|text| format!("<i>{text}</i>")),
            strikethrough: Box::new(|text| format!("<s>{text}</s>")),
            underline: Box::new(|text| format!("<u>{text}</u>")),
            image: Box::new(|text| format!("<img>{text}</img>")),
            code_token: Box::new(|span| span.text.clone()),
        }
    }

    fn paint(markdown: &str, viewport: Viewport, width: usize) -> Vec<String> {
        MarkdownView::new(theme()).paint_markdown(markdown, viewport, width)
    }

    #[test]
    fn heading_spacing_depends_on_viewport() {
        assert_eq!(
            paint("# Title\nParagraph", Viewport::Wide, 40),
            vec!["<h><b><u>Title</u></b></h>", "", "Paragraph"]
        );
        assert_eq!(
            paint("# Title\nParagraph", Viewport::Narrow, 40),
            vec!["<h><b><u>Title</u></b></h>", "Paragraph"]
        );
    }

    #[test]
    fn link_renders_url_only_when_needed() {
        assert_eq!(
            paint("[x](x)\n[y](z)", Viewport::Wide, 80),
            vec!["<l><u>x</u></l>", "<l><u>y</u></l><url> (z)</url>"]
        );
    }

    #[test]
    fn inline_code_padding_follows_viewport() {
        assert_eq!(paint("run `ls`", Viewport::Wide, 80), vec!["run <c> ls </c>"]);
        assert_eq!(paint("run `ls`", Viewport::Narrow, 80), vec!["run <c>ls</c>"]);
    }

    #[test]
    fn blockquote_is_indented_and_bordered() {
        assert_eq!(
            paint("> quote", Viewport::Wide, 80),
            vec!["  │  <q><i>quote</i></q>"]
        );
        assert_eq!(
            paint("> quote", Viewport::Narrow, 80),
            vec![" │ <q><i>quote</i></q>"]
        );
    }

    #[test]
    fn lists_render_bullets_numbers_and_tasks() {
        assert_eq!(
            paint("- one\n- [ ] two", Viewport::Wide, 80),
            vec!["   <b>- </b>one", "   <b>- [ ] </b>two"]
        );
        assert_eq!(
            paint("7. seven\n8. eight", Viewport::Narrow, 80),
            vec!["  <b>7. </b>seven", "  <b>8. </b>eight"]
        );
    }

    #[test]
    fn wide_code_blocks_number_lines_and_truncate() {
        assert_eq!(
            paint("```rust\nlet x = 1;\n```", Viewport::Wide, 40),
            vec!["  <cb>```rust</cb>", "  <n>1 </n>let x = 1;", "  <cb>```</cb>"]
        );
        assert_eq!(
            paint("```\naaaa bbbb cccc\n```", Viewport::Wide, 12),
            vec!["  <cb>```text</cb>", "  <n>1 </n>aaaa bb…", "  <cb>```</cb>"]
        );
    }

    #[test]
    fn narrow_code_blocks_wrap_without_gutter() {
        assert_eq!(
            paint("```\naaaa bbbb cccc\n```", Viewport::Narrow, 12),
            vec![" <cb>```text</cb>", " aaaa bbbb", " cccc", " <cb>```</cb>"]
        );
    }

    #[test]
    fn table_renders_borders_and_alignment() {
        let input = "| a | b |\n| - | -: |\n| c | dd |";
        assert_eq!(
            paint(input, Viewport::Wide, 80),
            vec![
                "┌───┬────┐",
                "│ <b>a</b> │ <b> b</b> │",
                "├───┼────┤",
                "│ c │ dd │",
                "└───┴────┘",
            ]
        );
    }

    #[test]
    fn narrow_tables_overflow_instead_of_squeezing() {
        let input = "| column one | column two |\n|---|---|\n| some longer text here | and more text here |";
        let view = MarkdownView::new(MarkdownTheme::plain());
        let narrow = view.paint_markdown(input, Viewport::Narrow, 20);
        assert!(narrow.iter().any(|line| visible_width(line) > 20));

        let wide = view.paint_markdown(input, Viewport::Wide, 20);
        assert!(wide.iter().all(|line| visible_width(line) <= 20), "{wide:?}");
    }

    #[test]
    fn images_show_alt_and_source() {
        assert_eq!(
            paint("![cat](c.png)", Viewport::Wide, 80),
            vec!["<img>[image: cat]</img><url> (c.png)</url>"]
        );
    }

    #[test]
    fn thematic_break_spans_width() {
        assert_eq!(
            paint("---", Viewport::Wide, 10),
            vec![format!("<hr>{}</hr>", "─".repeat(10))]
        );
    }

    #[test]
    fn ansi_theme_keeps_lines_within_width() {
        let view = MarkdownView::new(MarkdownTheme::ansi());
        let input = "Some **bold** words and `code` that wrap across several rows of output.\n\n```rust\nfn main() { println!(\"a fairly long line of code\"); }\n```";
        for viewport in [Viewport::Narrow, Viewport::Wide] {
            let lines = view.paint_markdown(input, viewport, 24);
            assert!(lines.iter().all(|line| visible_width(line) <= 24), "{lines:?}");
        }
    }

    #[test]
    fn tab_indented_code_is_painted_with_spaces() {
        let view = MarkdownView::new(MarkdownTheme::plain());
        let input = "```go\nfunc f() int {\n\t\t\treturn 1234567890\n}\n```\n\nkey:\tvalue";
        for viewport in [Viewport::Narrow, Viewport::Wide] {
            let lines = view.paint_markdown(input, viewport, 27);
            assert!(lines.iter().all(|line| !line.contains('\t')), "{lines:?}");
            assert!(lines.iter().all(|line| visible_width(line) <= 27), "{lines:?}");
        }
        let narrow = view.paint_markdown(input, Viewport::Narrow, 27);
        assert!(narrow.contains(&"          return 1234567890".to_string()), "{narrow:?}");
        assert!(narrow.contains(&"key:   value".to_string()), "{narrow:?}");
    }
}
