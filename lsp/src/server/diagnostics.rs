use std::time::Duration;

use slim_core::validate::{self, Severity, StructureIssue};
use tokio::time::sleep;
use tower_lsp::lsp_types::{Diagnostic, DiagnosticSeverity, Position, Range, Url};
use tracing::debug;

use super::MAX_DIAGNOSTICS;
use super::state::{SlimLanguageServer, lock};

fn to_diagnostic(issue: &StructureIssue) -> Diagnostic {
    let severity = match issue.severity {
        Severity::Error => DiagnosticSeverity::ERROR,
        Severity::Warning => DiagnosticSeverity::WARNING,
    };
    Diagnostic {
        range: Range::new(
            Position::new(issue.line as u32, 0),
            Position::new(issue.line as u32, issue.end_character as u32),
        ),
        severity: Some(severity),
        source: Some(validate::SOURCE.to_string()),
        message: issue.message.to_string(),
        ..Default::default()
    }
}

pub(crate) fn compute_diagnostics(text: &str) -> Vec<Diagnostic> {
    validate::check_structure(text)
        .iter()
        .take(MAX_DIAGNOSTICS)
        .map(to_diagnostic)
        .collect()
}

impl SlimLanguageServer {
    /// Publish structure diagnostics for `uri` after the configured delay,
    /// unless the document changed or closed in the meantime.
    pub(crate) fn schedule_diagnostics(&self, uri: Url, scheduled_version: i32) {
        let Some(client) = self.client.clone() else {
            return;
        };
        let (enabled, delay_ms) = {
            let config = lock(&self.config);
            (config.diagnostics_enabled, config.debounce_ms)
        };
        if !enabled {
            return;
        }
        let documents = self.documents.clone();
        tokio::spawn(async move {
            sleep(Duration::from_millis(delay_ms)).await;

            let content = match documents.get(&uri) {
                Some(doc) if doc.version == scheduled_version => doc.content.to_string(),
                _ => return,
            };

            let diagnostics = compute_diagnostics(&content);
            debug!(uri = %uri, count = diagnostics.len(), "publishing diagnostics");
            client
                .publish_diagnostics(uri, diagnostics, Some(scheduled_version))
                .await;
        });
    }

    /// Clear published diagnostics for a closed document.
    pub(crate) async fn clear_diagnostics(&self, uri: Url) {
        if let Some(client) = &self.client {
            client.publish_diagnostics(uri, Vec::new(), None).await;
        }
    }
}
