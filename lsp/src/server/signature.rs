use once_cell::sync::Lazy;
use regex::Regex;
use slim_core::binding::BindingTable;
use slim_core::docs::DocIndex;
use slim_core::resolve::{ResolvedContext, resolve_at_cursor};
use tower_lsp::lsp_types::{
    Documentation, MarkupContent, MarkupKind, ParameterInformation, ParameterLabel, Position, SignatureHelp,
    SignatureInformation,
};

use super::text::{find_call_before_cursor, line_prefix};

// Method signatures read `– (returnType)name(params)`; function signatures
// have already lost their return type at load time.
static SIGNATURE_HEAD_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*[–-]?\s*(?:\([^)]*\))?\s*").expect("signature head regex"));
static PARAMETER_LIST_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\(([^)]*)\)").expect("parameter list regex"));

/// Comma-separated parameters of the first parenthesised group after the
/// return type.
pub(crate) fn parameters_of(signature: &str) -> Vec<String> {
    let head_len = SIGNATURE_HEAD_RE.find(signature).map(|m| m.end()).unwrap_or(0);
    PARAMETER_LIST_RE
        .captures(&signature[head_len..])
        .and_then(|c| c.get(1))
        .map(|m| {
            m.as_str()
                .split(',')
                .map(str::trim)
                .filter(|p| !p.is_empty())
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

pub(crate) fn sig_owned(label: String, params: Vec<String>, doc: String) -> SignatureInformation {
    SignatureInformation {
        label,
        documentation: Some(Documentation::MarkupContent(MarkupContent {
            kind: MarkupKind::Markdown,
            value: doc,
        })),
        parameters: Some(
            params
                .into_iter()
                .map(|p| ParameterInformation {
                    label: ParameterLabel::Simple(p),
                    documentation: None,
                })
                .collect(),
        ),
        active_parameter: None,
    }
}

fn function_signature(docs: &DocIndex, name: &str) -> Option<SignatureInformation> {
    let record = docs.lookup_function(name)?;
    Some(sig_owned(
        record.signature.clone(),
        parameters_of(&record.signature),
        format!("{}\n\n{}", record.signature, record.description),
    ))
}

fn method_signature(docs: &DocIndex, class_name: &str, name: &str) -> Option<SignatureInformation> {
    let method = docs.lookup_class(class_name)?.method(name)?;
    Some(sig_owned(
        method.signature.clone(),
        parameters_of(&method.signature),
        format!("**{class_name}.{name}**\n\n{}", method.description),
    ))
}

/// Signature of the documented call under or around the cursor.
pub(crate) fn signature_help_at(
    text: &str,
    position: Position,
    docs: &DocIndex,
    table: &BindingTable,
) -> Option<SignatureHelp> {
    let open_call = line_prefix(text, position.line, position.character).and_then(find_call_before_cursor);

    let under_cursor = match resolve_at_cursor(text, position.line, position.character, table) {
        Some(ResolvedContext::Bare { word, .. }) => function_signature(docs, &word).map(|s| (s, word)),
        Some(ResolvedContext::Member { word, class_name, .. }) => {
            method_signature(docs, &class_name, &word).map(|s| (s, word))
        }
        None => None,
    };

    let (signature, active) = match under_cursor {
        Some((signature, word)) => {
            let active = open_call
                .filter(|call| call.name == word)
                .map(|call| call.active_parameter)
                .unwrap_or(0);
            (signature, active)
        }
        None => {
            let call = open_call?;
            let signature = match &call.receiver {
                Some(receiver) => method_signature(docs, table.class_of(receiver), &call.name)?,
                None => function_signature(docs, &call.name)?,
            };
            (signature, call.active_parameter)
        }
    };

    let last_param = signature
        .parameters
        .as_ref()
        .map(|p| p.len().saturating_sub(1))
        .unwrap_or(0) as u32;
    Some(SignatureHelp {
        signatures: vec![signature],
        active_signature: Some(0),
        active_parameter: Some(active.min(last_param)),
    })
}
