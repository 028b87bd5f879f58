//! Per element size and spacing presets for the two viewport modes.

use super::viewport::Viewport;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementKind {
    Text,
    Break,
    Paragraph,
    Heading1,
    Heading2,
    Heading3,
    Emphasis,
    Strong,
    Strikethrough,
    Link,
    UnorderedList,
    OrderedList,
    ListItem,
    BlockQuote,
    InlineCode,
    CodeBlock,
    Table,
    TableCell,
    Image,
    ThematicBreak,
    Html,
    Unknown,
}

/// Resolved layout numbers for one element.
///
/// `text_px` keeps the pixel size used by graphical front ends. Terminal painters read the
/// spacing fields: blank rows before and after the block, columns of indent before the block,
/// and columns of padding inside it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Preset {
    pub text_px: u16,
    pub margin_top: u8,
    pub margin_bottom: u8,
    pub indent: u8,
    pub padding: u8,
}

const fn preset(text_px: u16, margin_top: u8, margin_bottom: u8, indent: u8, padding: u8) -> Preset {
    Preset {
        text_px,
        margin_top,
        margin_bottom,
        indent,
        padding,
    }
}

// (narrow, wide)
const PARAGRAPH: (Preset, Preset) = (preset(13, 0, 1, 0, 0), preset(14, 0, 1, 0, 0));
const HEADING1: (Preset, Preset) = (preset(29, 1, 0, 0, 0), preset(35, 1, 1, 0, 0));
const HEADING2: (Preset, Preset) = (preset(24, 1, 0, 0, 0), preset(29, 1, 1, 0, 0));
const HEADING3: (Preset, Preset) = (preset(21, 0, 0, 0, 0), preset(24, 1, 0, 0, 0));
const LIST: (Preset, Preset) = (preset(13, 0, 1, 2, 0), preset(14, 0, 1, 3, 0));
const LIST_ITEM: (Preset, Preset) = (preset(13, 0, 0, 0, 0), preset(14, 0, 0, 0, 0));
const BLOCK_QUOTE: (Preset, Preset) = (preset(13, 0, 1, 1, 1), preset(14, 1, 1, 2, 2));
const INLINE_CODE: (Preset, Preset) = (preset(10, 0, 0, 0, 0), preset(13, 0, 0, 0, 1));
const CODE_BLOCK: (Preset, Preset) = (preset(13, 0, 1, 0, 1), preset(14, 1, 1, 0, 2));
const TABLE: (Preset, Preset) = (preset(12, 0, 1, 0, 0), preset(14, 1, 1, 0, 0));
const TABLE_CELL: (Preset, Preset) = (preset(12, 0, 0, 0, 1), preset(14, 0, 0, 0, 1));
const IMAGE: (Preset, Preset) = (preset(13, 0, 0, 0, 0), preset(14, 1, 1, 0, 0));
const THEMATIC_BREAK: (Preset, Preset) = (preset(13, 0, 1, 0, 0), preset(14, 1, 1, 0, 0));

/// Narrow tables keep at least this many columns and overflow sideways below it.
pub const NARROW_TABLE_MIN_WIDTH: usize = 60;

impl ElementKind {
    fn presets(self) -> (Preset, Preset) {
        match self {
            ElementKind::Heading1 => HEADING1,
            ElementKind::Heading2 => HEADING2,
            ElementKind::Heading3 => HEADING3,
            ElementKind::UnorderedList | ElementKind::OrderedList => LIST,
            ElementKind::ListItem => LIST_ITEM,
            ElementKind::BlockQuote => BLOCK_QUOTE,
            ElementKind::InlineCode => INLINE_CODE,
            ElementKind::CodeBlock => CODE_BLOCK,
            ElementKind::Table => TABLE,
            ElementKind::TableCell => TABLE_CELL,
            ElementKind::Image => IMAGE,
            ElementKind::ThematicBreak => THEMATIC_BREAK,
            ElementKind::Text
            | ElementKind::Break
            | ElementKind::Paragraph
            | ElementKind::Emphasis
            | ElementKind::Strong
            | ElementKind::Strikethrough
            | ElementKind::Link
            | ElementKind::Html
            | ElementKind::Unknown => PARAGRAPH,
        }
    }

    pub fn preset(self, viewport: Viewport) -> Preset {
        let (narrow, wide) = self.presets();
        match viewport {
            Viewport::Narrow => narrow,
            Viewport::Wide => wide,
        }
    }

    pub fn heading(level: u8) -> Self {
        match level {
            1 => ElementKind::Heading1,
            2 => ElementKind::Heading2,
            _ => ElementKind::Heading3,
        }
    }
}
