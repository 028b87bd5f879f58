//! ANSI escape parsing.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnsiCodeKind {
    Csi,
    Osc,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnsiCode {
    pub code: String,
    pub length: usize,
    pub kind: AnsiCodeKind,
}

impl AnsiCode {
    /// SGR sequences (`ESC [ ... m`) are the only codes that change text style.
    pub fn is_sgr(&self) -> bool {
        self.kind == AnsiCodeKind::Csi && self.code.ends_with('m')
    }

    pub fn is_sgr_reset(&self) -> bool {
        self.code == "\x1b[0m" || self.code == "\x1b[m"
    }
}

pub fn extract_ansi_code(input: &str, pos: usize) -> Option<AnsiCode> {
    let bytes = input.as_bytes();
    if pos + 1 >= bytes.len() || bytes[pos] != 0x1b {
        return None;
    }

    match bytes[pos + 1] {
        b'[' => extract_csi(input, pos),
        b']' => extract_osc(input, pos),
        _ => None,
    }
}

fn extract_csi(input: &str, pos: usize) -> Option<AnsiCode> {
    let bytes = input.as_bytes();
    let end = (pos + 2..bytes.len()).find(|&idx| (0x40..=0x7e).contains(&bytes[idx]))? + 1;
    Some(AnsiCode {
        code: input[pos..end].to_string(),
        length: end - pos,
        kind: AnsiCodeKind::Csi,
    })
}

// OSC ends with BEL or ST (`ESC \`).
fn extract_osc(input: &str, pos: usize) -> Option<AnsiCode> {
    let bytes = input.as_bytes();
    let mut idx = pos + 2;
    while idx < bytes.len() {
        let end = match bytes[idx] {
            0x07 => Some(idx + 1),
            0x1b if bytes.get(idx + 1) == Some(&b'\\') => Some(idx + 2),
            _ => None,
        };
        if let Some(end) = end {
            return Some(AnsiCode {
                code: input[pos..end].to_string(),
                length: end - pos,
                kind: AnsiCodeKind::Osc,
            });
        }
        idx += 1;
    }
    None
}

/// Removes every recognized escape sequence, leaving only printable text.
pub fn strip_ansi(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut idx = 0;
    while idx < input.len() {
        if let Some(code) = extract_ansi_code(input, idx) {
            idx += code.length;
            continue;
        }
        let Some(ch) = input[idx..].chars().next() else {
            break;
        };
        out.push(ch);
        idx += ch.len_utf8();
    }
    out
}
