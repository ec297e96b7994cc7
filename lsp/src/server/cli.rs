use std::path::{Component, Path, PathBuf};

use anyhow::Context;
use clap::Parser;
use slim_core::binding::{BindingScope, BindingTable};
use slim_core::symbols::function_symbols;
use tower_lsp::lsp_types::DiagnosticSeverity;

use super::diagnostics::compute_diagnostics;

#[derive(Debug, Parser)]
#[command(name = "slim-lsp", version, about = "Language server for SLiM and Eidos scripts")]
pub(crate) struct Args {
    /// Directory holding the *_functions.json, *_classes.json, callbacks and types files
    #[arg(long, value_name = "DIR")]
    pub(crate) docs_dir: Option<PathBuf>,

    /// Share instance bindings across documents (global) or keep them per document
    #[arg(long, value_name = "SCOPE", default_value_t = BindingScope::Global)]
    pub(crate) binding_scope: BindingScope,

    /// Analyze a file (relative path) and print JSON instead of serving
    #[arg(long, value_name = "FILE")]
    pub(crate) analyze: Option<String>,

    /// With --analyze, print only errors as `Line L:C: message`
    #[arg(long, requires = "analyze")]
    pub(crate) errors_only: bool,

    /// Accepted for editor clients that always pass it; stdio is the only transport
    #[arg(long, hide = true)]
    pub(crate) stdio: bool,
}

impl Args {
    /// `--docs-dir`, else `docs/` beside the executable, else `./docs`.
    pub(crate) fn resolved_docs_dir(&self) -> PathBuf {
        if let Some(dir) = &self.docs_dir {
            return dir.clone();
        }
        std::env::current_exe()
            .ok()
            .and_then(|exe| exe.parent().map(|p| p.join("docs")))
            .filter(|dir| dir.is_dir())
            .unwrap_or_else(|| PathBuf::from("docs"))
    }
}

/// Output of `--analyze` for the file at `path`.
pub(crate) fn analyze(path: &str, errors_only: bool) -> anyhow::Result<String> {
    let content = read_file_content(path)?;
    let diagnostics = compute_diagnostics(&content);

    if errors_only {
        let errors: Vec<String> = diagnostics
            .iter()
            .filter(|d| d.severity == Some(DiagnosticSeverity::ERROR))
            .map(|d| {
                format!(
                    "Line {}:{}: {}",
                    d.range.start.line + 1,
                    d.range.start.character + 1,
                    d.message
                )
            })
            .collect();
        return Ok(if errors.is_empty() {
            "No errors found".to_string()
        } else {
            errors.join("\n")
        });
    }

    let mut bindings = BindingTable::new();
    bindings.update_from_text(&content);
    let output = serde_json::json!({
        "bindings": bindings.snapshot(),
        "diagnostics": diagnostics,
        "symbols": function_symbols(&content),
    });
    Ok(serde_json::to_string_pretty(&output)?)
}

pub(crate) fn is_safe_path(path: &str) -> bool {
    let path = Path::new(path);

    if path.as_os_str().is_empty() || path.is_absolute() {
        return false;
    }
    if path.components().any(|c| c == Component::ParentDir) {
        return false;
    }

    let s = path.to_string_lossy();
    if s.chars().any(|c| matches!(c, '\0' | '\n' | '\r' | '\t')) {
        return false;
    }
    // Windows drive prefixes such as `C:foo`.
    !(s.len() >= 2 && s.as_bytes()[1] == b':')
}

pub(crate) fn read_file_content(path: &str) -> anyhow::Result<String> {
    if !is_safe_path(path) {
        anyhow::bail!("Unsafe file path: {}", path);
    }
    std::fs::read_to_string(path).with_context(|| format!("Failed to read file '{}'", path))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_escaping_paths() {
        assert!(is_safe_path("scripts/model.slim"));
        assert!(!is_safe_path(""));
        assert!(!is_safe_path("/etc/passwd"));
        assert!(!is_safe_path("../model.slim"));
        assert!(!is_safe_path("a/../../b"));
        assert!(!is_safe_path("C:model.slim"));
        assert!(!is_safe_path("bad\nname"));
    }

    #[test]
    fn parses_flags() {
        let args = Args::try_parse_from(["slim-lsp", "--binding-scope", "document", "--docs-dir", "d"]).unwrap();
        assert_eq!(args.binding_scope, BindingScope::Document);
        assert_eq!(args.resolved_docs_dir(), PathBuf::from("d"));
        assert!(args.analyze.is_none());

        let args = Args::try_parse_from(["slim-lsp", "--stdio"]).unwrap();
        assert_eq!(args.binding_scope, BindingScope::Global);
    }

    #[test]
    fn errors_only_needs_analyze() {
        assert!(Args::try_parse_from(["slim-lsp", "--errors-only"]).is_err());
        assert!(Args::try_parse_from(["slim-lsp", "--binding-scope", "nowhere"]).is_err());
    }
}
