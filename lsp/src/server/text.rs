use ropey::Rope;
use slim_core::text::code_skeleton;
use slim_core::token;
use tower_lsp::lsp_types::{Position, Range, TextDocumentContentChangeEvent};

// Convert LSP UTF-16 position to Rope char index (scalar values), clamped to the end of the line.
pub(crate) fn position_to_char_idx(text: &Rope, pos: Position) -> usize {
    let line_idx = pos.line as usize;
    if line_idx >= text.len_lines() {
        return text.len_chars();
    }
    let line_start_char = text.line_to_char(line_idx);
    let line_slice = text.line(line_idx);
    let target_utf16 = pos.character as usize;

    if let Some(s) = line_slice.as_str() {
        if s.is_ascii() {
            return line_start_char + target_utf16.min(s.len());
        }
    }

    let mut seen_utf16 = 0usize;
    let mut chars_in_line = 0usize;
    for ch in line_slice.chars() {
        let u16_len = ch.len_utf16();
        if seen_utf16 + u16_len > target_utf16 {
            break;
        }
        seen_utf16 += u16_len;
        chars_in_line += 1;
        if seen_utf16 == target_utf16 {
            break;
        }
    }
    line_start_char + chars_in_line
}

// Apply one full or ranged LSP change to a rope buffer.
pub(crate) fn apply_change(text: &mut Rope, change: &TextDocumentContentChangeEvent) {
    let Some(range) = &change.range else {
        *text = Rope::from_str(&change.text);
        return;
    };
    let start_char = position_to_char_idx(text, range.start);
    let end_char = position_to_char_idx(text, range.end);
    let (s, e) = if start_char <= end_char {
        (start_char, end_char)
    } else {
        (end_char, start_char)
    };
    if s != e {
        text.remove(s..e);
    }
    if !change.text.is_empty() {
        text.insert(s, &change.text);
    }
}

/// Range covering the whole rope, in UTF-16 positions.
pub(crate) fn full_range(text: &Rope) -> Range {
    let last = text.len_lines().saturating_sub(1);
    let end = Position::new(last as u32, text.line(last).len_utf16_cu() as u32);
    Range::new(Position::new(0, 0), end)
}

/// Range of a byte span on `line` within `line_text`.
pub(crate) fn span_range(line: u32, line_text: &str, start: usize, end: usize) -> Range {
    Range::new(
        Position::new(line, token::byte_to_utf16(line_text, start)),
        Position::new(line, token::byte_to_utf16(line_text, end)),
    )
}

/// Innermost call still open at the cursor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct OpenCall {
    pub(crate) name: String,
    /// Receiver of a `receiver.method(` call.
    pub(crate) receiver: Option<String>,
    /// Top-level commas between the open parenthesis and the cursor.
    pub(crate) active_parameter: u32,
}

fn ident_before(bytes: &[u8], mut end: usize) -> Option<(usize, usize)> {
    while end > 0 && bytes[end - 1].is_ascii_whitespace() {
        end -= 1;
    }
    let mut start = end;
    while start > 0 && (bytes[start - 1].is_ascii_alphanumeric() || bytes[start - 1] == b'_') {
        start -= 1;
    }
    (start < end && !bytes[start].is_ascii_digit()).then_some((start, end))
}

/// Scan backwards from the end of `line_prefix` for the nearest unclosed `(`
/// of the current statement. String contents are ignored.
pub(crate) fn find_call_before_cursor(line_prefix: &str) -> Option<OpenCall> {
    let skeleton = code_skeleton(line_prefix);
    let bytes = skeleton.as_bytes();
    let mut depth = 0i32;
    let mut commas = 0u32;
    let mut i = bytes.len();
    while i > 0 {
        i -= 1;
        match bytes[i] {
            b')' | b']' => depth += 1,
            b'[' if depth > 0 => depth -= 1,
            b'(' if depth > 0 => depth -= 1,
            b'(' => {
                let (start, end) = ident_before(bytes, i)?;
                let name = skeleton[start..end].to_string();
                let mut j = start;
                while j > 0 && bytes[j - 1].is_ascii_whitespace() {
                    j -= 1;
                }
                let receiver = (j > 0 && bytes[j - 1] == b'.')
                    .then(|| ident_before(bytes, j - 1))
                    .flatten()
                    .map(|(s, e)| skeleton[s..e].to_string());
                return Some(OpenCall {
                    name,
                    receiver,
                    active_parameter: commas,
                });
            }
            b',' if depth == 0 => commas += 1,
            b';' | b'{' | b'}' if depth == 0 => return None,
            _ => {}
        }
    }
    None
}

/// Text of `line` before the UTF-16 `character`.
pub(crate) fn line_prefix(text: &str, line: u32, character: u32) -> Option<&str> {
    let line_text = token::line_at(text, line)?;
    Some(&line_text[..token::utf16_to_byte(line_text, character)])
}
