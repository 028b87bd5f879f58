//! Display tree produced by [`super::render`].
//!
//! The tree is toolkit neutral: it names element kinds, carries resolved presets and already
//! highlighted code, and leaves painting to a front end such as
//! [`crate::widgets::markdown::MarkdownView`].

use super::presets::Preset;
use super::viewport::Viewport;

#[derive(Debug, Clone, PartialEq)]
pub struct DisplayTree {
    pub viewport: Viewport,
    pub blocks: Vec<Block>,
}

impl DisplayTree {
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Block {
    Paragraph {
        inlines: Vec<Inline>,
        preset: Preset,
    },
    Heading {
        level: u8,
        inlines: Vec<Inline>,
        preset: Preset,
    },
    List(List),
    BlockQuote {
        blocks: Vec<Block>,
        preset: Preset,
    },
    CodeBlock(CodeBlock),
    Table(Table),
    ThematicBreak {
        preset: Preset,
    },
    Html {
        text: String,
        preset: Preset,
    },
}

impl Block {
    pub fn preset(&self) -> Preset {
        match self {
            Block::Paragraph { preset, .. }
            | Block::Heading { preset, .. }
            | Block::BlockQuote { preset, .. }
            | Block::ThematicBreak { preset }
            | Block::Html { preset, .. } => *preset,
            Block::List(list) => list.preset,
            Block::CodeBlock(code) => code.preset,
            Block::Table(table) => table.preset,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct List {
    pub ordered: bool,
    /// First number of an ordered list.
    pub start: u32,
    pub items: Vec<ListItem>,
    pub preset: Preset,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ListItem {
    /// Task list state, `None` for a plain item.
    pub checked: Option<bool>,
    pub blocks: Vec<Block>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CodeBlock {
    /// Fence language, `text` when the fence had none.
    pub language: String,
    pub lines: Vec<CodeLine>,
    pub line_numbers: bool,
    pub wrap: bool,
    pub preset: Preset,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CodeLine {
    pub spans: Vec<HighlightedSpan>,
}

impl CodeLine {
    pub fn text(&self) -> String {
        self.spans.iter().map(|span| span.text.as_str()).collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HighlightedSpan {
    pub text: String,
    pub style: TokenStyle,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TokenStyle {
    pub foreground: (u8, u8, u8),
    pub bold: bool,
    pub italic: bool,
    pub underline: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellAlignment {
    None,
    Left,
    Center,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Overflow {
    /// Content wider than the viewport scrolls sideways instead of being squeezed.
    Scroll,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    pub alignments: Vec<CellAlignment>,
    pub header: Vec<Vec<Inline>>,
    pub rows: Vec<Vec<Vec<Inline>>>,
    pub overflow: Overflow,
    /// Minimum painted width in columns.
    pub min_width: Option<usize>,
    pub preset: Preset,
    pub cell_preset: Preset,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Inline {
    Text(String),
    Emphasis(Vec<Inline>),
    Strong(Vec<Inline>),
    Strikethrough(Vec<Inline>),
    Code { text: String, preset: Preset },
    Link(Link),
    Image(Image),
    Break,
    Html(String),
}

impl Inline {
    pub fn plain_text(inlines: &[Inline]) -> String {
        let mut out = String::new();
        for inline in inlines {
            match inline {
                Inline::Text(text) | Inline::Html(text) | Inline::Code { text, .. } => {
                    out.push_str(text)
                }
                Inline::Emphasis(children)
                | Inline::Strong(children)
                | Inline::Strikethrough(children) => out.push_str(&Inline::plain_text(children)),
                Inline::Link(link) => out.push_str(&Inline::plain_text(&link.children)),
                Inline::Image(image) => out.push_str(&image.alt),
                Inline::Break => out.push('\n'),
            }
        }
        out
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkTarget {
    /// Opens outside the chat view (a new browser tab or context).
    NewContext,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Link {
    pub href: String,
    pub title: Option<String>,
    pub target: LinkTarget,
    pub rel: &'static str,
    pub children: Vec<Inline>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Image {
    pub alt: String,
    pub src: String,
    pub title: Option<String>,
    /// Width clamp relative to the content column.
    pub max_width_percent: u8,
}
