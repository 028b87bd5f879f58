//! Shared text primitives.

pub mod text;
