use completion_provider::{CompletionEvent, ProviderProfile};
use discuss::app::{App, HostOps, RequestId};
use discuss::tui::{ChatScreen, PaintMode, BANNER};
use discuss_tui::Viewport;

#[derive(Default)]
struct CountingHost {
    next: RequestId,
}

impl HostOps for CountingHost {
    fn start_request(&mut self, _prompt: String) -> Result<RequestId, String> {
        self.next += 1;
        Ok(self.next)
    }

    fn cancel_request(&mut self, _request_id: RequestId) {}

    fn request_render(&mut self) {}

    fn request_stop(&mut self) {}
}

fn screen(mode: PaintMode) -> ChatScreen {
    ChatScreen::new(
        ProviderProfile {
            provider_id: "mock".to_string(),
            model_id: "mock".to_string(),
        },
        false,
        mode,
    )
}

fn app_with_reply(prompt: &str, reply: &str) -> App {
    let mut app = App::new();
    let mut host = CountingHost::default();
    app.on_line(prompt, &mut host);
    app.on_completion_event(CompletionEvent::Completed {
        request_id: host.next,
        text: reply.to_string(),
    });
    app
}

#[test]
fn empty_session_shows_banner_and_header() {
    let lines = screen(PaintMode::Append).render_lines(&App::new(), 80, Viewport::Wide);

    assert_eq!(lines[0], "Discuss · mock/mock · New Chat");
    assert!(lines.iter().any(|line| line == BANNER));
}

#[test]
fn entries_render_as_request_and_markdown_response_bubbles() {
    let app = app_with_reply("**hello**", "**world**");
    let lines = screen(PaintMode::Append).render_lines(&app, 80, Viewport::Wide);

    assert!(!lines.iter().any(|line| line == BANNER));
    let you = lines
        .iter()
        .position(|line| line.starts_with("You · "))
        .expect("request label");
    assert_eq!(lines[you + 1], "│ hello");
    let reply = lines
        .iter()
        .position(|line| line.starts_with("Discuss · ") && line.len() == "Discuss · 00:00".len())
        .expect("response label");
    assert!(reply > you);
    assert_eq!(lines[reply + 1], "  world");
    assert_eq!(lines[0], "Discuss · mock/mock · **hello**");
}

#[test]
fn request_text_is_rendered_as_markdown() {
    let app = app_with_reply("explain **this** `code`", "done");

    let narrow = screen(PaintMode::Append).render_lines(&app, 60, Viewport::Narrow);
    assert!(narrow.iter().any(|line| line == "│ explain this code"), "{narrow:?}");

    let wide = screen(PaintMode::Append).render_lines(&app, 100, Viewport::Wide);
    let bubble: Vec<&String> = wide.iter().filter(|line| line.starts_with("│")).collect();
    assert!(!bubble.is_empty());
    assert!(bubble
        .iter()
        .all(|line| !line.contains("**") && !line.contains('`')));
}

#[test]
fn multi_paragraph_request_keeps_border_on_blank_rows() {
    let app = app_with_reply("first part\n\nsecond part", "ok");
    let lines = screen(PaintMode::Append).render_lines(&app, 80, Viewport::Wide);

    let start = lines
        .iter()
        .position(|line| line == "│ first part")
        .expect("first paragraph");
    assert_eq!(lines[start + 1], "│");
    assert_eq!(lines[start + 2], "│ second part");
}

#[test]
fn long_requests_wrap_inside_the_bubble() {
    let app = app_with_reply("one two three four five six seven eight nine ten", "ok");
    let lines = screen(PaintMode::Append).render_lines(&app, 24, Viewport::Narrow);

    let bubble: Vec<&String> = lines.iter().filter(|line| line.starts_with("│ ")).collect();
    assert!(bubble.len() > 1);
    assert!(bubble
        .iter()
        .all(|line| discuss_tui::visible_width(line) <= 24));
}

#[test]
fn pending_request_shows_prompt_and_loading_placeholder() {
    let mut app = App::new();
    let mut host = CountingHost::default();
    app.on_line("slow one", &mut host);

    let lines = screen(PaintMode::Append).render_lines(&app, 80, Viewport::Wide);

    assert!(!lines.iter().any(|line| line == BANNER));
    assert!(lines.iter().any(|line| line == "│ slow one"));
    assert!(lines.iter().any(|line| line == "  Thinking..."));
}

#[test]
fn pending_request_in_other_session_is_not_drawn_here() {
    let mut app = App::new();
    let mut host = CountingHost::default();
    app.on_line("slow one", &mut host);
    app.on_line("/new", &mut host);

    let lines = screen(PaintMode::Append).render_lines(&app, 80, Viewport::Wide);

    assert!(lines.iter().any(|line| line == BANNER));
    assert!(!lines.iter().any(|line| line == "  Thinking..."));
    assert!(lines
        .iter()
        .any(|line| line == "A reply is loading in another chat."));
}

#[test]
fn sidebar_lists_sessions_with_active_marker() {
    let mut app = app_with_reply("first chat", "a");
    let mut host = CountingHost::default();
    app.on_line("/new", &mut host);
    app.on_line("/sessions", &mut host);

    let wide = screen(PaintMode::Append).render_lines(&app, 100, Viewport::Wide);
    let first = wide
        .iter()
        .find(|line| line.contains("1. first chat"))
        .expect("first session row");
    assert!(first.starts_with("   1. first chat"));
    assert!(first.contains("· 1 messages"));
    let second = wide
        .iter()
        .find(|line| line.contains("2. New Chat"))
        .expect("second session row");
    assert!(second.starts_with(">  2. New Chat"));

    let narrow = screen(PaintMode::Append).render_lines(&app, 40, Viewport::Narrow);
    let row = narrow
        .iter()
        .position(|line| line.contains("1. first chat"))
        .expect("narrow row");
    assert!(narrow[row + 1].starts_with("      "));
    assert!(narrow[row + 1].contains("· 1 messages"));
}

#[test]
fn notices_and_draft_are_listed_last() {
    let mut app = App::new();
    let mut host = CountingHost::default();
    app.on_line("question", &mut host);
    app.on_completion_event(CompletionEvent::Failed {
        request_id: 1,
        error: "HTTP 500".to_string(),
    });

    let lines = screen(PaintMode::Append).render_lines(&app, 80, Viewport::Wide);
    let tail: Vec<&str> = lines.iter().rev().take(2).map(String::as_str).collect();

    assert_eq!(tail[0], "Draft: question  (Enter sends it)");
    assert_eq!(tail[1], "! Request failed: HTTP 500");
}

#[test]
fn append_mode_prints_only_changed_tail() {
    let mut screen = screen(PaintMode::Append);
    let mut app = App::new();
    let mut host = CountingHost::default();

    let mut first = Vec::new();
    screen
        .present(&app, &mut first, 80, Viewport::Wide)
        .expect("present");
    let first = String::from_utf8(first).expect("utf8");
    assert!(first.contains(BANNER));

    app.on_line("/help", &mut host);
    let mut second = Vec::new();
    screen
        .present(&app, &mut second, 80, Viewport::Wide)
        .expect("present");
    let second = String::from_utf8(second).expect("utf8");

    assert!(!second.contains(BANNER));
    assert!(second.starts_with("! Commands:"));
}

#[test]
fn repaint_mode_sets_title_once_and_clears_screen() {
    let mut screen = screen(PaintMode::Repaint);
    let app = App::new();

    let mut first = Vec::new();
    screen
        .present(&app, &mut first, 80, Viewport::Wide)
        .expect("present");
    let first = String::from_utf8(first).expect("utf8");
    assert!(first.starts_with("\x1b]0;Discuss Ai. | New Chat\x07\x1b[2J\x1b[H"));
    assert!(first.ends_with("> "));

    let mut second = Vec::new();
    screen
        .present(&app, &mut second, 80, Viewport::Wide)
        .expect("present");
    let second = String::from_utf8(second).expect("utf8");
    assert!(second.starts_with("\x1b[2J\x1b[H"));
}
