//! Line-based structure checks: brace balance and likely missing semicolons.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

use crate::text::{code_skeleton, strip_comments};


/// Diagnostic source reported to clients.
pub const SOURCE: &str = "slim-tools";

/// Upper bound on issues reported for one document.
pub const MAX_ISSUES: usize = 200;

pub const UNEXPECTED_CLOSING_BRACE: &str = "Unexpected closing brace";
pub const MISSING_SEMICOLON: &str = "Statement might be missing a semicolon";
pub const UNCLOSED_BRACES: &str = "Unclosed brace(s)";

static BLOCK_HEADER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(?:s\d+\s+)?\d+\s+\w+\(\)").expect("block header regex"));
static CONTROL_FLOW_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*(if|else|while|for|switch|case|default)\b").expect("control flow regex"));
static CALLBACK_HEADER_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(initialize|early|late|fitness)\s*\([^)]*\)\s*\{?\s*$").expect("callback header regex")
});
static TICK_HEADER_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*(s\d+\s+)?\d+\s+(early|late|reproduction|fitness)\s*\(\)\s*$").expect("tick header regex")
});
static COMMENT_LINE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\s*(/[/*]|\*)").expect("comment line regex"));

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
}

/// One structure problem. The range always spans the whole line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StructureIssue {
    pub line: usize,
    /// Line length in UTF-16 code units.
    pub end_character: usize,
    pub severity: Severity,
    pub message: &'static str,
}

impl StructureIssue {
    fn whole_line(line: usize, text: &str, severity: Severity, message: &'static str) -> Self {
        Self {
            line,
            end_character: text.encode_utf16().count(),
            severity,
            message,
        }
    }
}

/// Outcome of the semicolon heuristic for one trimmed line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SemicolonCheck {
    pub should_mark: bool,
    /// Open parenthesis count carried into the next line.
    pub paren_balance: isize,
}

/// Whether `line` looks like a statement that ends without `;`, given the
/// parenthesis balance carried from previous lines.
pub fn check_semicolon(line: &str, paren_balance: isize) -> SemicolonCheck {
    let code = strip_comments(line);
    let code = code.trim();
    let skeleton = code_skeleton(code);
    let opens = skeleton.matches('(').count() as isize;
    let closes = skeleton.matches(')').count() as isize;
    let net = paren_balance + opens - closes;

    let safe = code.ends_with(';')
        || code.ends_with('{')
        || code.ends_with('}')
        || net > 0
        || CONTROL_FLOW_RE.is_match(code)
        || CALLBACK_HEADER_RE.is_match(code)
        || TICK_HEADER_RE.is_match(code)
        || COMMENT_LINE_RE.is_match(line)
        || line.trim().is_empty();

    SemicolonCheck {
        should_mark: !safe && net == 0,
        paren_balance: net,
    }
}

fn is_block_header(trimmed: &str) -> bool {
    BLOCK_HEADER_RE.is_match(trimmed)
}

/// Run the brace and semicolon checks over a whole document.
pub fn check_structure(text: &str) -> Vec<StructureIssue> {
    let lines: Vec<&str> = text.split('\n').collect();
    let mut issues = Vec::new();
    let mut brace_count = 0isize;
    // Deepest negative count so far; only a new low is a new stray brace.
    let mut lowest = 0isize;
    let mut last_open_brace_line: Option<usize> = None;
    let mut paren_balance = 0isize;

    for (index, raw) in lines.iter().enumerate() {
        let trimmed = raw.trim();
        if trimmed.is_empty() || trimmed.starts_with("//") {
            continue;
        }

        let skeleton = code_skeleton(raw);
        let opens = skeleton.matches('{').count() as isize;
        let closes = skeleton.matches('}').count() as isize;
        brace_count += opens - closes;
        if opens > 0 {
            last_open_brace_line = Some(index);
        }

        if brace_count < lowest {
            if !is_block_header(trimmed) {
                issues.push(StructureIssue::whole_line(index, raw, Severity::Error, UNEXPECTED_CLOSING_BRACE));
            }
            lowest = brace_count;
        }

        let check = check_semicolon(trimmed, paren_balance);
        paren_balance = check.paren_balance;
        if check.should_mark {
            issues.push(StructureIssue::whole_line(index, raw, Severity::Warning, MISSING_SEMICOLON));
        }
    }

    if brace_count > 0 {
        let last = lines.last().map(|l| l.trim()).unwrap_or_default();
        if last != "}" {
            if let Some(open_line) = last_open_brace_line {
                issues.push(StructureIssue::whole_line(
                    open_line,
                    lines[open_line],
                    Severity::Error,
                    UNCLOSED_BRACES,
                ));
            }
        }
    }

    if issues.len() > MAX_ISSUES {
        tracing::debug!(total = issues.len(), kept = MAX_ISSUES, "truncating structure issues");
        issues.truncate(MAX_ISSUES);
    }
    issues
}
