//! Lexical context resolution: which identifier sits at a cursor and what
//! role it plays, decided from the line text and an instance binding table.

use serde::Serialize;

use crate::binding::BindingTable;
use crate::token::{self, Span};

#[cfg(test)]
mod resolve_test;

/// Semantic role of the identifier at a cursor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum ResolvedContext {
    /// A standalone identifier.
    #[serde(rename_all = "camelCase")]
    Bare {
        word: String,
        instance_class: Option<String>,
    },
    /// The right-hand side of `instance.word`; `word` is empty after a bare dot.
    #[serde(rename_all = "camelCase")]
    Member {
        word: String,
        class_name: String,
        instance_name: String,
    },
}

impl ResolvedContext {
    pub fn word(&self) -> &str {
        match self {
            ResolvedContext::Bare { word, .. } | ResolvedContext::Member { word, .. } => word,
        }
    }

    pub fn is_member(&self) -> bool {
        matches!(self, ResolvedContext::Member { .. })
    }
}

/// How the cursor constrains the token search.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolveMode {
    /// Token enclosing the cursor, searching the whole line (hover, lookup).
    Enclosing,
    /// Token ending at the cursor, searching only the text before it
    /// (completion while typing).
    Preceding,
}

/// A resolved context together with the span of its word in the line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    pub context: ResolvedContext,
    pub line: u32,
    /// Byte span of the resolved word within its line.
    pub span: Span,
}

/// Resolve the identifier under (`line`, `character`) for hover and lookup.
pub fn resolve_at_cursor(text: &str, line: u32, character: u32, table: &BindingTable) -> Option<ResolvedContext> {
    resolve(text, line, character, ResolveMode::Enclosing, table).map(|r| r.context)
}

/// Resolve the identifier being typed at (`line`, `character`) for completion.
pub fn resolve_for_completion(
    text: &str,
    line: u32,
    character: u32,
    table: &BindingTable,
) -> Option<ResolvedContext> {
    resolve(text, line, character, ResolveMode::Preceding, table).map(|r| r.context)
}

pub fn resolve(text: &str, line: u32, character: u32, mode: ResolveMode, table: &BindingTable) -> Option<Resolution> {
    let line_text = token::line_at(text, line)?;
    if character as usize > line_text.encode_utf16().count() {
        return None;
    }
    let cursor = token::utf16_to_byte(line_text, character);
    let (context, span) = match mode {
        ResolveMode::Enclosing => enclosing(line_text, cursor, table)?,
        ResolveMode::Preceding => preceding(&line_text[..cursor], cursor, table)?,
    };
    Some(Resolution { context, line, span })
}

fn enclosing(line: &str, cursor: usize, table: &BindingTable) -> Option<(ResolvedContext, Span)> {
    // Member access wins over a bare word whenever the cursor is inside the
    // dotted expression, including on its left-hand side.
    if let Some(access) = token::member_accesses(line).find(|a| a.span.touches(cursor)) {
        let span = access
            .member
            .map(|m| m.span)
            .unwrap_or_else(|| Span::new(access.span.end, access.span.end));
        let context = ResolvedContext::Member {
            word: access.member_text().to_string(),
            class_name: table.class_of(access.object.text).to_string(),
            instance_name: access.object.text.to_string(),
        };
        return Some((context, span));
    }

    let tok = token::identifiers(line).find(|t| t.span.touches(cursor))?;
    let context = ResolvedContext::Bare {
        word: tok.text.to_string(),
        instance_class: table.instance_class(tok.text).map(str::to_string),
    };
    Some((context, tok.span))
}

fn preceding(prefix: &str, cursor: usize, table: &BindingTable) -> Option<(ResolvedContext, Span)> {
    if let Some(object) = token::trailing_member_object(prefix) {
        let context = ResolvedContext::Member {
            word: String::new(),
            class_name: table.class_of(object.text).to_string(),
            instance_name: object.text.to_string(),
        };
        return Some((context, Span::new(cursor, cursor)));
    }

    // Bare words offer only global symbols, so no class is resolved here.
    let tok = token::identifiers(prefix).filter(|t| t.span.touches(cursor)).last()?;
    let context = ResolvedContext::Bare {
        word: tok.text.to_string(),
        instance_class: None,
    };
    Some((context, tok.span))
}
