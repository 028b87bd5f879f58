//! Text helpers (ANSI parsing, width calculations, wrapping, truncation).
//!
//! Everything here is string in, string out so both the renderer and the chat front end can use
//! it without pulling in the painter.

pub mod ansi;
pub mod width;
pub mod wrap;
