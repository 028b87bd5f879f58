//! Terminal chat client.
//!
//! ## Provider bootstrap
//!
//! Pick the backend with `--provider` or `DISCUSS_PROVIDER`:
//!
//! - `gemini` (default) calls the Generative Language API. Set `GEMINI_API_KEY`; optionally
//!   `DISCUSS_MODEL` and `GEMINI_BASE_URL`.
//! - `mock` replies locally with a markdown showcase, for offline runs and tests.
//!
//! Each prompt is sent on its own, without earlier turns. Sessions live in memory and are gone
//! when the process exits.
//!
//! ## Layout
//!
//! The screen switches to the narrow layout below `DISCUSS_BREAKPOINT` columns (80 by
//! default). `/narrow` and `/wide` override it for the rest of the run.

pub mod app;
pub mod cli;
pub mod commands;
pub mod providers;
pub mod runtime;
pub mod tui;
