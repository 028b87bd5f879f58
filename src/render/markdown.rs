//! Markdown to [`DisplayTree`] projection.
//!
//! Each mdast node is classified into an [`ElementKind`] and handed to the handler registered for
//! that kind. Kinds without a dedicated handler go through the fallback, which keeps the node's
//! plain text so nothing the model wrote is dropped.

use markdown::mdast::{self, AlignKind, Node};
use markdown::{to_mdast, ParseOptions};

use super::highlight::highlight_code;
use super::presets::{ElementKind, Preset, NARROW_TABLE_MIN_WIDTH};
use super::tree::{
    Block, CellAlignment, CodeBlock, DisplayTree, Image, Inline, Link, LinkTarget, List, ListItem,
    Overflow, Table,
};
use super::viewport::Viewport;

const DEFAULT_CODE_LANGUAGE: &str = "text";
const LINK_REL: &str = "noopener noreferrer";

struct RenderContext {
    viewport: Viewport,
}

impl RenderContext {
    fn preset(&self, kind: ElementKind) -> Preset {
        kind.preset(self.viewport)
    }
}

type BlockHandler = fn(&Node, &RenderContext) -> Vec<Block>;
type InlineHandler = fn(&Node, &RenderContext) -> Vec<Inline>;

/// Parses `markdown` (GFM) and projects it into a display tree for `viewport`.
///
/// Pure and deterministic: equal inputs produce equal trees. Parsing never fails from the
/// caller's point of view; input the parser rejects becomes a single paragraph of raw text.
pub fn render(markdown: &str, viewport: Viewport) -> DisplayTree {
    let context = RenderContext { viewport };
    let blocks = match to_mdast(markdown, &ParseOptions::gfm()) {
        Ok(Node::Root(root)) => render_blocks(&root.children, &context),
        Ok(other) => render_blocks(std::slice::from_ref(&other), &context),
        Err(_) if markdown.trim().is_empty() => Vec::new(),
        Err(_) => vec![Block::Paragraph {
            inlines: vec![Inline::Text(markdown.to_string())],
            preset: context.preset(ElementKind::Paragraph),
        }],
    };
    DisplayTree { viewport, blocks }
}

fn classify(node: &Node) -> ElementKind {
    match node {
        Node::Text(_) => ElementKind::Text,
        Node::Break(_) => ElementKind::Break,
        Node::Paragraph(_) => ElementKind::Paragraph,
        Node::Heading(heading) => ElementKind::heading(heading.depth),
        Node::Emphasis(_) => ElementKind::Emphasis,
        Node::Strong(_) => ElementKind::Strong,
        Node::Delete(_) => ElementKind::Strikethrough,
        Node::Link(_) => ElementKind::Link,
        Node::List(list) if list.ordered => ElementKind::OrderedList,
        Node::List(_) => ElementKind::UnorderedList,
        Node::ListItem(_) => ElementKind::ListItem,
        Node::Blockquote(_) => ElementKind::BlockQuote,
        Node::InlineCode(_) => ElementKind::InlineCode,
        Node::Code(_) => ElementKind::CodeBlock,
        Node::Table(_) => ElementKind::Table,
        Node::TableCell(_) => ElementKind::TableCell,
        Node::Image(_) => ElementKind::Image,
        Node::ThematicBreak(_) => ElementKind::ThematicBreak,
        Node::Html(_) => ElementKind::Html,
        _ => ElementKind::Unknown,
    }
}

fn block_handler(kind: ElementKind) -> BlockHandler {
    match kind {
        ElementKind::Paragraph => render_paragraph,
        ElementKind::Heading1 | ElementKind::Heading2 | ElementKind::Heading3 => render_heading,
        ElementKind::UnorderedList | ElementKind::OrderedList => render_list,
        ElementKind::BlockQuote => render_block_quote,
        ElementKind::CodeBlock => render_code_block,
        ElementKind::Table => render_table,
        ElementKind::ThematicBreak => render_thematic_break,
        ElementKind::Html => render_html_block,
        _ => render_fallback_block,
    }
}

fn inline_handler(kind: ElementKind) -> InlineHandler {
    match kind {
        ElementKind::Text => render_text,
        ElementKind::Break => render_break,
        ElementKind::Emphasis | ElementKind::Strong | ElementKind::Strikethrough => {
            render_decorated
        }
        ElementKind::InlineCode => render_inline_code,
        ElementKind::Link => render_link,
        ElementKind::Image => render_image,
        ElementKind::Html => render_html_inline,
        _ => render_fallback_inline,
    }
}

fn render_blocks(nodes: &[Node], context: &RenderContext) -> Vec<Block> {
    nodes
        .iter()
        .flat_map(|node| block_handler(classify(node))(node, context))
        .collect()
}

fn render_inlines(nodes: &[Node], context: &RenderContext) -> Vec<Inline> {
    nodes
        .iter()
        .flat_map(|node| inline_handler(classify(node))(node, context))
        .collect()
}

fn render_paragraph(node: &Node, context: &RenderContext) -> Vec<Block> {
    let Node::Paragraph(paragraph) = node else {
        return render_fallback_block(node, context);
    };
    let inlines = render_inlines(&paragraph.children, context);
    if inlines.is_empty() {
        return Vec::new();
    }
    // A paragraph holding nothing but an image is laid out as a standalone figure.
    let kind = match paragraph.children.as_slice() {
        [Node::Image(_)] => ElementKind::Image,
        _ => ElementKind::Paragraph,
    };
    vec![Block::Paragraph {
        inlines,
        preset: context.preset(kind),
    }]
}

fn render_heading(node: &Node, context: &RenderContext) -> Vec<Block> {
    let Node::Heading(heading) = node else {
        return render_fallback_block(node, context);
    };
    vec![Block::Heading {
        level: heading.depth,
        inlines: render_inlines(&heading.children, context),
        preset: context.preset(ElementKind::heading(heading.depth)),
    }]
}

fn render_list(node: &Node, context: &RenderContext) -> Vec<Block> {
    let Node::List(list) = node else {
        return render_fallback_block(node, context);
    };
    let items = list
        .children
        .iter()
        .filter_map(|child| match child {
            Node::ListItem(item) => Some(ListItem {
                checked: item.checked,
                blocks: render_blocks(&item.children, context),
            }),
            _ => None,
        })
        .collect();
    vec![Block::List(List {
        ordered: list.ordered,
        start: list.start.unwrap_or(1),
        items,
        preset: context.preset(classify(node)),
    })]
}

fn render_block_quote(node: &Node, context: &RenderContext) -> Vec<Block> {
    let Node::Blockquote(quote) = node else {
        return render_fallback_block(node, context);
    };
    vec![Block::BlockQuote {
        blocks: render_blocks(&quote.children, context),
        preset: context.preset(ElementKind::BlockQuote),
    }]
}

fn code_language(lang: Option<&str>) -> String {
    lang.map(str::trim)
        .filter(|lang| !lang.is_empty())
        .unwrap_or(DEFAULT_CODE_LANGUAGE)
        .to_ascii_lowercase()
}

fn render_code_block(node: &Node, context: &RenderContext) -> Vec<Block> {
    let Node::Code(code) = node else {
        return render_fallback_block(node, context);
    };
    let language = code_language(code.lang.as_deref());
    let source = code.value.strip_suffix('\n').unwrap_or(&code.value);
    vec![Block::CodeBlock(CodeBlock {
        lines: highlight_code(source, &language),
        language,
        line_numbers: !context.viewport.is_narrow(),
        wrap: context.viewport.is_narrow(),
        preset: context.preset(ElementKind::CodeBlock),
    })]
}

fn cell_alignment(align: &AlignKind) -> CellAlignment {
    match align {
        AlignKind::Left => CellAlignment::Left,
        AlignKind::Center => CellAlignment::Center,
        AlignKind::Right => CellAlignment::Right,
        AlignKind::None => CellAlignment::None,
    }
}

fn render_row(row: &mdast::TableRow, context: &RenderContext) -> Vec<Vec<Inline>> {
    row.children
        .iter()
        .map(|cell| match cell {
            Node::TableCell(cell) => render_inlines(&cell.children, context),
            other => render_fallback_inline(other, context),
        })
        .collect()
}

fn render_table(node: &Node, context: &RenderContext) -> Vec<Block> {
    let Node::Table(table) = node else {
        return render_fallback_block(node, context);
    };
    let mut rows = table.children.iter().filter_map(|child| match child {
        Node::TableRow(row) => Some(render_row(row, context)),
        _ => None,
    });
    let Some(header) = rows.next() else {
        return Vec::new();
    };
    vec![Block::Table(Table {
        alignments: table.align.iter().map(cell_alignment).collect(),
        header,
        rows: rows.collect(),
        overflow: Overflow::Scroll,
        min_width: context
            .viewport
            .is_narrow()
            .then_some(NARROW_TABLE_MIN_WIDTH),
        preset: context.preset(ElementKind::Table),
        cell_preset: context.preset(ElementKind::TableCell),
    })]
}

fn render_thematic_break(_node: &Node, context: &RenderContext) -> Vec<Block> {
    vec![Block::ThematicBreak {
        preset: context.preset(ElementKind::ThematicBreak),
    }]
}

fn render_html_block(node: &Node, context: &RenderContext) -> Vec<Block> {
    let Node::Html(html) = node else {
        return render_fallback_block(node, context);
    };
    vec![Block::Html {
        text: html.value.clone(),
        preset: context.preset(ElementKind::Html),
    }]
}

fn render_fallback_block(node: &Node, context: &RenderContext) -> Vec<Block> {
    let text = plain_text(node);
    if text.trim().is_empty() {
        return Vec::new();
    }
    vec![Block::Paragraph {
        inlines: vec![Inline::Text(text)],
        preset: context.preset(ElementKind::Unknown),
    }]
}

fn render_text(node: &Node, _context: &RenderContext) -> Vec<Inline> {
    match node {
        Node::Text(text) if !text.value.is_empty() => vec![Inline::Text(text.value.clone())],
        _ => Vec::new(),
    }
}

fn render_break(_node: &Node, _context: &RenderContext) -> Vec<Inline> {
    vec![Inline::Break]
}

fn render_decorated(node: &Node, context: &RenderContext) -> Vec<Inline> {
    match node {
        Node::Emphasis(emphasis) => vec![Inline::Emphasis(render_inlines(
            &emphasis.children,
            context,
        ))],
        Node::Strong(strong) => vec![Inline::Strong(render_inlines(&strong.children, context))],
        Node::Delete(delete) => vec![Inline::Strikethrough(render_inlines(
            &delete.children,
            context,
        ))],
        other => render_fallback_inline(other, context),
    }
}

fn render_inline_code(node: &Node, context: &RenderContext) -> Vec<Inline> {
    let Node::InlineCode(code) = node else {
        return render_fallback_inline(node, context);
    };
    vec![Inline::Code {
        text: code.value.clone(),
        preset: context.preset(ElementKind::InlineCode),
    }]
}

fn render_link(node: &Node, context: &RenderContext) -> Vec<Inline> {
    let Node::Link(link) = node else {
        return render_fallback_inline(node, context);
    };
    vec![Inline::Link(Link {
        href: link.url.clone(),
        title: link.title.clone(),
        target: LinkTarget::NewContext,
        rel: LINK_REL,
        children: render_inlines(&link.children, context),
    })]
}

fn render_image(node: &Node, context: &RenderContext) -> Vec<Inline> {
    let Node::Image(image) = node else {
        return render_fallback_inline(node, context);
    };
    vec![Inline::Image(Image {
        alt: image.alt.clone(),
        src: image.url.clone(),
        title: image.title.clone(),
        max_width_percent: 100,
    })]
}

fn render_html_inline(node: &Node, context: &RenderContext) -> Vec<Inline> {
    let Node::Html(html) = node else {
        return render_fallback_inline(node, context);
    };
    vec![Inline::Html(html.value.clone())]
}

fn render_fallback_inline(node: &Node, _context: &RenderContext) -> Vec<Inline> {
    let text = plain_text(node);
    if text.is_empty() {
        Vec::new()
    } else {
        vec![Inline::Text(text)]
    }
}

fn plain_text(node: &Node) -> String {
    match node {
        Node::Text(text) => text.value.clone(),
        Node::InlineCode(code) => code.value.clone(),
        Node::InlineMath(math) => math.value.clone(),
        Node::Math(math) => math.value.clone(),
        Node::Code(code) => code.value.clone(),
        Node::Html(html) => html.value.clone(),
        Node::Image(image) => image.alt.clone(),
        Node::Break(_) => "\n".to_string(),
        Node::FootnoteReference(reference) => format!(
            "[^{}]",
            reference.label.as_deref().unwrap_or(&reference.identifier)
        ),
        other => {
            let Some(children) = other.children() else {
                return String::new();
            };
            let block_level = children.iter().any(|child| {
                matches!(
                    child,
                    Node::Paragraph(_) | Node::List(_) | Node::Code(_) | Node::Blockquote(_)
                )
            });
            let separator = if block_level { "\n" } else { "" };
            children
                .iter()
                .map(plain_text)
                .filter(|text| !text.is_empty())
                .collect::<Vec<_>>()
                .join(separator)
        }
    }
}
