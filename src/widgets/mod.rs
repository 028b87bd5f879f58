//! Terminal painters for rendered content.

pub mod markdown;

pub use markdown::{MarkdownStyleFn, MarkdownTheme, MarkdownView};
