use std::time::Duration;

use clap::Parser;

use crate::providers::{ProviderOptions, DEFAULT_PROVIDER_ID};

#[derive(Parser, Debug)]
#[command(
    name = "discuss",
    about = "Chat with a language model from the terminal",
    version,
    long_about = None,
)]
pub struct Cli {
    /// Optional first prompt, sent as soon as the chat opens
    #[arg(value_name = "PROMPT")]
    pub prompt: Option<String>,

    /// Completion backend: gemini or mock
    #[arg(long, short = 'p', env = "DISCUSS_PROVIDER", default_value = DEFAULT_PROVIDER_ID)]
    pub provider: String,

    /// Model identifier, e.g. "gemini-2.0-flash"
    #[arg(long, short = 'm', env = "DISCUSS_MODEL")]
    pub model: Option<String>,

    /// API key for the Generative Language API
    #[arg(long, env = "GEMINI_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Override the API base URL
    #[arg(long, env = "GEMINI_BASE_URL")]
    pub base_url: Option<String>,

    /// Request timeout in seconds (0 = no limit)
    #[arg(long, value_name = "SECS")]
    pub timeout_secs: Option<u64>,

    /// Render width in columns instead of the terminal width
    #[arg(long, value_name = "COLS")]
    pub width: Option<u16>,

    /// Start in the narrow layout
    #[arg(long)]
    pub narrow: bool,
}

impl Cli {
    pub fn provider_options(&self) -> ProviderOptions {
        ProviderOptions {
            provider_id: self.provider.clone(),
            model: self.model.clone(),
            api_key: self.api_key.clone(),
            base_url: self.base_url.clone(),
            timeout: self
                .timeout_secs
                .filter(|secs| *secs > 0)
                .map(Duration::from_secs),
        }
    }
}
