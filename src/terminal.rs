//! Terminal queries and escape sequences used by the chat front end.

#[cfg(unix)]
use libc::{self, c_int};

use crate::core::text::ansi::strip_ansi;

/// Columns assumed when the size cannot be read (pipes, CI).
pub const FALLBACK_COLUMNS: u16 = 80;
pub const FALLBACK_ROWS: u16 = 24;

/// Current `(columns, rows)` of the controlling terminal.
///
/// Falls back to `COLUMNS`/`LINES` and then to 80x24.
pub fn terminal_size() -> (u16, u16) {
    #[cfg(unix)]
    {
        for fd in [libc::STDOUT_FILENO, libc::STDIN_FILENO, libc::STDERR_FILENO] {
            if let Some(size) = read_winsize(fd) {
                return size;
            }
        }
    }

    let columns = env_dimension("COLUMNS").unwrap_or(FALLBACK_COLUMNS);
    let rows = env_dimension("LINES").unwrap_or(FALLBACK_ROWS);
    (columns, rows)
}

pub fn stdout_is_terminal() -> bool {
    #[cfg(unix)]
    {
        unsafe { libc::isatty(libc::STDOUT_FILENO) == 1 }
    }
    #[cfg(not(unix))]
    {
        false
    }
}

/// OSC 0 sequence that sets the window and tab title.
///
/// Control characters are removed so a title cannot end the sequence early.
pub fn set_title_sequence(title: &str) -> String {
    let clean: String = strip_ansi(title)
        .chars()
        .filter(|ch| !ch.is_control())
        .collect();
    format!("\x1b]0;{clean}\x07")
}

/// Clear the screen and move the cursor home.
pub const CLEAR_SCREEN: &str = "\x1b[2J\x1b[H";

#[cfg(unix)]
fn read_winsize(fd: c_int) -> Option<(u16, u16)> {
    let mut size = libc::winsize {
        ws_row: 0,
        ws_col: 0,
        ws_xpixel: 0,
        ws_ypixel: 0,
    };
    let result = unsafe { libc::ioctl(fd, libc::TIOCGWINSZ, &mut size) };
    if result == 0 && size.ws_col > 0 && size.ws_row > 0 {
        Some((size.ws_col, size.ws_row))
    } else {
        None
    }
}

fn env_dimension(key: &str) -> Option<u16> {
    std::env::var(key)
        .ok()
        .and_then(|value| value.trim().parse::<u16>().ok())
        .filter(|value| *value > 0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn title_sequence_strips_controls_and_escapes() {
        assert_eq!(set_title_sequence("hello"), "\x1b]0;hello\x07");
        assert_eq!(
            set_title_sequence("bad\x07title\x1b[31m red\x1b[0m"),
            "\x1b]0;badtitle red\x07"
        );
    }

    #[test]
    fn terminal_size_is_never_zero() {
        let (columns, rows) = terminal_size();
        assert!(columns > 0);
        assert!(rows > 0);
    }
}
