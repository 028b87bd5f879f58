#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SlashCommand {
    New,
    Sessions,
    /// 1-based sidebar position; `None` when the argument is missing or not a number.
    Select(Option<usize>),
    Narrow,
    Wide,
    Retry,
    Cancel,
    Help,
    Quit,
    Unknown(String),
}

pub const HELP_TEXT: &str = "Commands: /new, /sessions, /select <n>, /narrow, /wide, /retry, /cancel, /help, /quit";

pub fn parse_slash_command(input: &str) -> Option<SlashCommand> {
    let trimmed = input.trim();
    if !trimmed.starts_with('/') {
        return None;
    }

    let mut words = trimmed.split_whitespace();
    let command = words.next().unwrap_or(trimmed).to_string();

    let parsed = match command.as_str() {
        "/new" => SlashCommand::New,
        "/sessions" => SlashCommand::Sessions,
        "/select" => SlashCommand::Select(words.next().and_then(|arg| arg.parse().ok())),
        "/narrow" => SlashCommand::Narrow,
        "/wide" => SlashCommand::Wide,
        "/retry" => SlashCommand::Retry,
        "/cancel" => SlashCommand::Cancel,
        "/help" => SlashCommand::Help,
        "/quit" | "/exit" => SlashCommand::Quit,
        _ => SlashCommand::Unknown(command),
    };

    Some(parsed)
}
