//! Markdown rendering and terminal painting for the Discuss chat client.
//!
//! # Overview
//! - [`render`] projects markdown into a toolkit neutral [`DisplayTree`], with every element
//!   carrying the size and spacing preset for the current [`Viewport`].
//! - [`MarkdownView`] paints a tree into ANSI lines for a terminal of a given width.
//! - Text helpers measure, wrap and truncate strings that contain ANSI escapes.
//! - [`terminal`] reads the terminal size and builds the title escape.

pub mod config;
pub mod logging;
pub mod terminal;

pub mod core;
pub mod render;
pub mod widgets;

pub use crate::config::EnvConfig;
pub use crate::render::{
    render, Block, DisplayTree, ElementKind, Inline, Preset, Viewport, DEFAULT_NARROW_BREAKPOINT,
};
pub use crate::widgets::{MarkdownTheme, MarkdownView};

/// ANSI-aware wrapping helper.
pub use crate::core::text::wrap::wrap_text_with_ansi;
/// ANSI-aware truncation helper.
pub use crate::core::text::wrap::truncate_to_width;
/// Visible width helper that ignores ANSI control sequences.
pub use crate::core::text::width::visible_width;
/// Escape sequence stripping helper.
pub use crate::core::text::ansi::strip_ansi;
