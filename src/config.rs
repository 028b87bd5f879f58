//! Environment configuration.

use std::env;

use crate::render::{Viewport, DEFAULT_NARROW_BREAKPOINT};

#[derive(Debug, Clone)]
pub struct EnvConfig {
    pub force_narrow: bool,
    pub narrow_breakpoint: Option<usize>,
    pub log_file: Option<String>,
    pub debug: bool,
    pub no_color: bool,
}

impl EnvConfig {
    pub fn from_env() -> Self {
        Self {
            force_narrow: env_flag("DISCUSS_NARROW"),
            narrow_breakpoint: env_usize_opt("DISCUSS_BREAKPOINT"),
            log_file: env_string_opt("DISCUSS_LOG"),
            debug: env_flag("DISCUSS_DEBUG"),
            no_color: env_string_opt("NO_COLOR").is_some(),
        }
    }

    pub fn breakpoint(&self) -> usize {
        self.narrow_breakpoint.unwrap_or(DEFAULT_NARROW_BREAKPOINT)
    }

    /// Viewport for a terminal `columns` wide, honoring `DISCUSS_NARROW`.
    pub fn viewport_for(&self, columns: usize) -> Viewport {
        if self.force_narrow {
            Viewport::Narrow
        } else {
            Viewport::for_columns(columns, self.breakpoint())
        }
    }
}

fn env_flag(key: &str) -> bool {
    env::var(key).map(|value| value == "1").unwrap_or(false)
}

fn env_string_opt(key: &str) -> Option<String> {
    env::var(key).ok().and_then(|value| {
        if value.trim().is_empty() {
            None
        } else {
            Some(value)
        }
    })
}

fn env_usize_opt(key: &str) -> Option<usize> {
    env_string_opt(key)
        .and_then(|value| value.trim().parse::<usize>().ok())
        .filter(|value| *value > 0)
}
