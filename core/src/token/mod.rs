//! Line-level token matching shared by the binding scanner and the resolver.
//!
//! Nothing here parses SLiM. Tokens are maximal identifier runs found by
//! regex inside a single line, with byte spans relative to that line.

use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;

#[cfg(test)]
mod token_test;

static IDENTIFIER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?-u:\b)[a-zA-Z_][a-zA-Z0-9_]*(?-u:\b)").expect("identifier regex"));

// Right-hand side is optional so a trailing dot still counts while typing.
static MEMBER_ACCESS_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"([a-zA-Z_][a-zA-Z0-9_]*)\s*\.\s*([a-zA-Z_][a-zA-Z0-9_]*)?").expect("member access regex")
});

static TRAILING_DOT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"([a-zA-Z_][a-zA-Z0-9_]*)\s*\.\s*$").expect("trailing dot regex"));

/// Half-open byte range `[start, end)` within a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Cursor containment used by both resolver strategies: a cursor sitting
    /// right after the last character still touches the token.
    pub fn touches(&self, offset: usize) -> bool {
        offset >= self.start && offset <= self.end
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.start, self.end)
    }
}

/// An identifier run inside a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token<'a> {
    pub text: &'a str,
    pub span: Span,
}

impl<'a> Token<'a> {
    fn from_match(m: regex::Match<'a>) -> Self {
        Self {
            text: m.as_str(),
            span: Span::new(m.start(), m.end()),
        }
    }
}

/// A dotted access `object . member?` found in a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MemberAccess<'a> {
    pub object: Token<'a>,
    pub member: Option<Token<'a>>,
    /// Whole match, from the first character of `object` to the end of
    /// `member` (or of the dot and trailing whitespace when there is none).
    pub span: Span,
}

impl MemberAccess<'_> {
    pub fn member_text(&self) -> &str {
        self.member.map(|m| m.text).unwrap_or("")
    }
}

/// Iterate identifier tokens of `line` from left to right.
pub fn identifiers(line: &str) -> impl Iterator<Item = Token<'_>> {
    IDENTIFIER_RE.find_iter(line).map(Token::from_match)
}

/// Iterate non-overlapping dotted accesses of `line` from left to right.
pub fn member_accesses(line: &str) -> impl Iterator<Item = MemberAccess<'_>> {
    MEMBER_ACCESS_RE.captures_iter(line).filter_map(|caps| {
        let whole = caps.get(0)?;
        let object = Token::from_match(caps.get(1)?);
        let member = caps.get(2).map(Token::from_match);
        Some(MemberAccess {
            object,
            member,
            span: Span::new(whole.start(), whole.end()),
        })
    })
}

/// If `prefix` ends with `identifier .` (whitespace allowed around the dot),
/// return that identifier.
pub fn trailing_member_object(prefix: &str) -> Option<Token<'_>> {
    TRAILING_DOT_RE
        .captures(prefix)
        .and_then(|caps| caps.get(1))
        .map(Token::from_match)
}

/// The `line`-th line of `text`, split on `\n` only. A trailing `\r` is kept,
/// it never matches an identifier.
pub fn line_at(text: &str, line: u32) -> Option<&str> {
    text.split('\n').nth(line as usize)
}

/// Convert an LSP character offset (UTF-16 code units) into a byte offset
/// within `line`, clamped to the line length and to a char boundary.
pub fn utf16_to_byte(line: &str, character: u32) -> usize {
    let target = character as usize;
    if line.is_ascii() {
        return target.min(line.len());
    }
    let mut seen = 0usize;
    for (idx, ch) in line.char_indices() {
        if seen >= target {
            return idx;
        }
        seen += ch.len_utf16();
        if seen > target {
            // Cursor inside a surrogate pair; snap to the char start.
            return idx;
        }
    }
    line.len()
}

/// Convert a byte offset within `line` back into UTF-16 code units.
pub fn byte_to_utf16(line: &str, byte: usize) -> u32 {
    if line.is_ascii() {
        return byte.min(line.len()) as u32;
    }
    line.char_indices()
        .take_while(|(idx, _)| *idx < byte)
        .map(|(_, ch)| ch.len_utf16() as u32)
        .sum()
}
