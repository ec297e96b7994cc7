//! User-defined function symbols.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;


// Eidos writes `function (returnType)name(params)`; the return type is optional here.
static FUNCTION_DEF_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?-u:\b)function\s+(?:\([^)]*\)\s*)?([A-Za-z_][A-Za-z0-9_]*)").expect("function definition regex")
});

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FunctionSymbol {
    pub name: String,
    pub line: usize,
    /// Line length in UTF-16 code units; the symbol range covers the whole line.
    pub end_character: usize,
}

/// Every `function` definition in `text`, one per line at most.
pub fn function_symbols(text: &str) -> Vec<FunctionSymbol> {
    text.split('\n')
        .enumerate()
        .filter_map(|(line, content)| {
            let name = FUNCTION_DEF_RE.captures(content)?.get(1)?.as_str();
            Some(FunctionSymbol {
                name: name.to_string(),
                line,
                end_character: content.encode_utf16().count(),
            })
        })
        .collect()
}
