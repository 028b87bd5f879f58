//! Line-oriented chat screen: banner, sidebar, transcript bubbles, notices and prompt.

use std::io::{self, Write};

use completion_provider::ProviderProfile;
use discuss_tui::terminal::{set_title_sequence, CLEAR_SCREEN};
use discuss_tui::widgets::MarkdownStyleFn;
use discuss_tui::{
    truncate_to_width, wrap_text_with_ansi, MarkdownTheme, MarkdownView, Viewport,
};
use session_store::Entry;

use crate::app::App;

pub const BANNER: &str = "Discuss Ai.";
const BANNER_HINT: &str = "Ask anything. Type /help for commands.";
const LOADING_TEXT: &str = "Thinking...";
const REQUEST_LABEL: &str = "You";
const RESPONSE_LABEL: &str = "Discuss";
const PROMPT: &str = "> ";
const MIN_WIDTH: usize = 20;
const BUBBLE_INSET: usize = 2;

pub struct ChatStyle {
    pub header: MarkdownStyleFn,
    pub dim: MarkdownStyleFn,
    pub accent: MarkdownStyleFn,
    pub banner: MarkdownStyleFn,
    pub notice: MarkdownStyleFn,
}

fn sgr(prefix: &'static str, suffix: &'static str) -> MarkdownStyleFn {
    Box::new(move |text| format!("{prefix}{text}{suffix}"))
}

impl ChatStyle {
    pub fn plain() -> Self {
        let identity = || -> MarkdownStyleFn { Box::new(|text| text.to_string()) };
        Self {
            header: identity(),
            dim: identity(),
            accent: identity(),
            banner: identity(),
            notice: identity(),
        }
    }

    pub fn ansi() -> Self {
        Self {
            header: sgr("\x1b[1;36m", "\x1b[22;39m"),
            dim: sgr("\x1b[2m", "\x1b[22m"),
            accent: sgr("\x1b[35m", "\x1b[39m"),
            banner: sgr("\x1b[1m", "\x1b[22m"),
            notice: sgr("\x1b[33m", "\x1b[39m"),
        }
    }
}

/// `Repaint` clears the terminal and draws the whole frame; `Append` prints only the lines that
/// changed since the previous frame, for pipes and logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaintMode {
    Repaint,
    Append,
}

pub struct ChatScreen {
    markdown: MarkdownView,
    style: ChatStyle,
    profile: ProviderProfile,
    mode: PaintMode,
    last_title: Option<String>,
    last_frame: Vec<String>,
}

impl ChatScreen {
    pub fn new(profile: ProviderProfile, color: bool, mode: PaintMode) -> Self {
        let (theme, style) = if color {
            (MarkdownTheme::ansi(), ChatStyle::ansi())
        } else {
            (MarkdownTheme::plain(), ChatStyle::plain())
        };
        Self {
            markdown: MarkdownView::new(theme),
            style,
            profile,
            mode,
            last_title: None,
            last_frame: Vec::new(),
        }
    }

    /// Builds the full frame for `app`.
    pub fn render_lines(&self, app: &App, width: usize, viewport: Viewport) -> Vec<String> {
        let width = width.max(MIN_WIDTH);
        let mut lines = vec![self.header_line(app, width), String::new()];

        if app.show_sidebar() {
            lines.extend(self.sidebar_lines(app, width, viewport));
            lines.push(String::new());
        }

        let active_id = app.store.active_session_id();
        let loading_here = app.loading_session().is_some() && app.loading_session() == active_id;
        let transcript = app
            .store
            .active_session()
            .map(|session| session.transcript())
            .unwrap_or(&[]);

        if transcript.is_empty() && !loading_here {
            lines.push((self.style.banner)(BANNER));
            lines.push((self.style.dim)(BANNER_HINT));
            lines.push(String::new());
        }

        for entry in transcript {
            lines.extend(self.entry_lines(entry, width, viewport));
        }

        if loading_here {
            if let Some(prompt) = app.pending_prompt() {
                lines.extend(self.request_bubble(prompt, None, width, viewport));
                lines.push(String::new());
            }
            lines.push(self.response_label(None));
            lines.push(format!(
                "{}{}",
                " ".repeat(BUBBLE_INSET),
                (self.style.dim)(LOADING_TEXT)
            ));
            lines.push(String::new());
        } else if app.is_loading() {
            lines.push((self.style.dim)("A reply is loading in another chat."));
        }

        for notice in app.notices() {
            for line in wrap_text_with_ansi(&format!("! {notice}"), width) {
                lines.push((self.style.notice)(&line));
            }
        }

        if !app.input.trim().is_empty() {
            let hint = format!("Draft: {}  (Enter sends it)", app.input.trim());
            lines.push((self.style.dim)(&truncate_to_width(&hint, width, "...")));
        }

        lines
    }

    /// Writes the frame for `app` to `out`, plus the window title when it changed.
    pub fn present(
        &mut self,
        app: &App,
        out: &mut dyn Write,
        width: usize,
        viewport: Viewport,
    ) -> io::Result<()> {
        let lines = self.render_lines(app, width, viewport);

        match self.mode {
            PaintMode::Repaint => {
                let title = format!("{BANNER} | {}", app.store.tab_title());
                if self.last_title.as_deref() != Some(title.as_str()) {
                    out.write_all(set_title_sequence(&title).as_bytes())?;
                    self.last_title = Some(title);
                }
                out.write_all(CLEAR_SCREEN.as_bytes())?;
                for line in &lines {
                    writeln!(out, "{line}")?;
                }
                out.write_all(PROMPT.as_bytes())?;
            }
            PaintMode::Append => {
                let unchanged = lines
                    .iter()
                    .zip(&self.last_frame)
                    .take_while(|(next, previous)| next == previous)
                    .count();
                for line in &lines[unchanged..] {
                    writeln!(out, "{line}")?;
                }
            }
        }

        out.flush()?;
        self.last_frame = lines;
        Ok(())
    }

    fn header_line(&self, app: &App, width: usize) -> String {
        let detail = format!(
            " · {}/{} · {}",
            self.profile.provider_id,
            self.profile.model_id,
            app.store.tab_title()
        );
        let name = (self.style.header)(RESPONSE_LABEL);
        let room = width.saturating_sub(RESPONSE_LABEL.len());
        format!(
            "{name}{}",
            (self.style.dim)(&truncate_to_width(&detail, room, "..."))
        )
    }

    fn sidebar_lines(&self, app: &App, width: usize, viewport: Viewport) -> Vec<String> {
        let mut lines = vec![format!(
            "{} {}",
            (self.style.header)("Chats"),
            (self.style.dim)("(/select <n>, /new)")
        )];

        for (index, summary) in app.store.list_sessions().iter().enumerate() {
            let marker = if summary.active { ">" } else { " " };
            let row = format!("{marker} {:>2}. {}", index + 1, summary.title);
            let date = format!("{} · {} messages", summary.created_label, summary.entry_count);

            if viewport.is_narrow() {
                lines.push(truncate_to_width(&row, width, "..."));
                lines.push(format!("      {}", (self.style.dim)(&date)));
            } else {
                let row = truncate_to_width(&row, width.saturating_sub(date.len() + 2), "...");
                lines.push(format!("{row}  {}", (self.style.dim)(&date)));
            }
        }

        lines
    }

    fn entry_lines(&self, entry: &Entry, width: usize, viewport: Viewport) -> Vec<String> {
        let time = entry.time_label();
        let mut lines = self.request_bubble(entry.request_text(), Some(&time), width, viewport);
        lines.push(String::new());
        lines.push(self.response_label(Some(&time)));

        let body_width = width.saturating_sub(BUBBLE_INSET).max(1);
        let inset = " ".repeat(BUBBLE_INSET);
        for line in self
            .markdown
            .paint_markdown(entry.response_text(), viewport, body_width)
        {
            if line.is_empty() {
                lines.push(line);
            } else {
                lines.push(format!("{inset}{line}"));
            }
        }
        lines.push(String::new());
        lines
    }

    fn request_bubble(
        &self,
        text: &str,
        time: Option<&str>,
        width: usize,
        viewport: Viewport,
    ) -> Vec<String> {
        let label = match time {
            Some(time) => format!("{REQUEST_LABEL} · {time}"),
            None => REQUEST_LABEL.to_string(),
        };
        let mut lines = vec![(self.style.dim)(&label)];

        let body_width = width.saturating_sub(BUBBLE_INSET).max(1);
        for line in self.markdown.paint_markdown(text, viewport, body_width) {
            if line.is_empty() {
                lines.push((self.style.accent)("│"));
            } else {
                lines.push(format!("{}{line}", (self.style.accent)("│ ")));
            }
        }
        lines
    }

    fn response_label(&self, time: Option<&str>) -> String {
        let name = (self.style.accent)(RESPONSE_LABEL);
        match time {
            Some(time) => format!("{name}{}", (self.style.dim)(&format!(" · {time}"))),
            None => name,
        }
    }
}
