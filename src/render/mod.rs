//! Markdown rendering pipeline: parse, classify, project into a [`DisplayTree`].

pub mod highlight;
pub mod markdown;
pub mod presets;
pub mod tree;
pub mod viewport;

pub use markdown::render;
pub use presets::{ElementKind, Preset};
pub use tree::{Block, DisplayTree, Inline};
pub use viewport::{Viewport, DEFAULT_NARROW_BREAKPOINT};
