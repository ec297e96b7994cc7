use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{Context, Result};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;
use tracing::{debug, info, warn};

use super::{CallbackRecord, ClassRecord, DocIndex, DocSource, FunctionRecord, TypeRecord};

static RETURN_TYPE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\(([^)]+)\)").expect("return type regex"));
static LEADING_RETURN_TYPE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\([^)]+\)\s*").expect("leading return type regex"));
static CALLBACK_SUFFIX_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s+(callbacks|events)$").expect("callback suffix regex"));

/// Shape of a documentation file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocKind {
    Functions(DocSource),
    Classes,
    Callbacks,
    Types,
}

#[derive(Debug, Clone, Copy)]
pub struct DocFile {
    pub file_name: &'static str,
    pub kind: DocKind,
}

/// Files read from the documentation directory, in merge order. Later files
/// overwrite entries of earlier ones with the same name.
pub const DOC_FILES: &[DocFile] = &[
    DocFile {
        file_name: "slim_functions.json",
        kind: DocKind::Functions(DocSource::Slim),
    },
    DocFile {
        file_name: "eidos_functions.json",
        kind: DocKind::Functions(DocSource::Eidos),
    },
    DocFile {
        file_name: "slim_classes.json",
        kind: DocKind::Classes,
    },
    DocFile {
        file_name: "eidos_classes.json",
        kind: DocKind::Classes,
    },
    DocFile {
        file_name: "slim_callbacks.json",
        kind: DocKind::Callbacks,
    },
    DocFile {
        file_name: "eidos_types.json",
        kind: DocKind::Types,
    },
];

#[derive(Debug, Deserialize)]
struct RawFunction {
    #[serde(default)]
    signatures: Vec<String>,
    #[serde(default)]
    description: String,
}

/// Split `(returnType)name(params)` into `("returnType", "name(params)")`.
pub(crate) fn split_return_type(signature: &str) -> (String, String) {
    let return_type = RETURN_TYPE_RE
        .captures(signature)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_string())
        .unwrap_or_else(|| "void".to_string());
    let stripped = LEADING_RETURN_TYPE_RE.replace(signature, "").into_owned();
    (return_type, stripped)
}

pub(crate) fn trim_callback_signature(signature: &str) -> String {
    CALLBACK_SUFFIX_RE.replace(signature, "").into_owned()
}

impl DocIndex {
    /// Load every known documentation file present in `dir`.
    ///
    /// Missing files are skipped; a file that exists but cannot be read or
    /// parsed is an error.
    pub fn load_dir(dir: &Path) -> Result<Self> {
        let mut index = DocIndex::new();
        for file in DOC_FILES {
            let path = dir.join(file.file_name);
            if !path.exists() {
                warn!(path = %path.display(), "documentation file not found, skipping");
                continue;
            }
            let content =
                std::fs::read_to_string(&path).with_context(|| format!("Failed to read '{}'", path.display()))?;
            index
                .add_json(file.kind, &content)
                .with_context(|| format!("Failed to load documentation from '{}'", path.display()))?;
            debug!(file = file.file_name, "loaded documentation file");
        }
        let (functions, classes, callbacks, types) = index.counts();
        info!(functions, classes, callbacks, types, dir = %dir.display(), "documentation index loaded");
        Ok(index)
    }

    /// Merge one documentation file of the given shape.
    pub fn add_json(&mut self, kind: DocKind, json: &str) -> Result<()> {
        match kind {
            DocKind::Functions(source) => self.add_functions_json(json, source),
            DocKind::Classes => self.add_classes_json(json),
            DocKind::Callbacks => self.add_callbacks_json(json),
            DocKind::Types => self.add_types_json(json),
        }
    }

    /// `{category: {name: {signatures, description}}}`
    pub fn add_functions_json(&mut self, json: &str, source: DocSource) -> Result<()> {
        let categories: BTreeMap<String, BTreeMap<String, RawFunction>> =
            serde_json::from_str(json).context("invalid function documentation")?;
        for (category, functions) in categories {
            for (name, raw) in functions {
                let Some(first) = raw.signatures.first() else {
                    warn!(%category, %name, "function has no signature, skipping");
                    continue;
                };
                let (return_type, signature) = split_return_type(first);
                self.insert_function(
                    &name,
                    FunctionRecord {
                        signature,
                        signatures: raw.signatures.clone(),
                        return_type,
                        description: raw.description,
                        source,
                    },
                );
            }
        }
        Ok(())
    }

    /// `{Class: {constructor?, methods?, properties?}}`
    pub fn add_classes_json(&mut self, json: &str) -> Result<()> {
        let classes: BTreeMap<String, ClassRecord> =
            serde_json::from_str(json).context("invalid class documentation")?;
        for (name, record) in classes {
            self.insert_class(&name, record);
        }
        Ok(())
    }

    /// `{name: {signature, description}}`
    pub fn add_callbacks_json(&mut self, json: &str) -> Result<()> {
        let callbacks: BTreeMap<String, CallbackRecord> =
            serde_json::from_str(json).context("invalid callback documentation")?;
        for (name, mut record) in callbacks {
            record.signature = trim_callback_signature(&record.signature);
            self.insert_callback(&name, record);
        }
        Ok(())
    }

    /// `{name: {description}}`
    pub fn add_types_json(&mut self, json: &str) -> Result<()> {
        let types: BTreeMap<String, TypeRecord> = serde_json::from_str(json).context("invalid type documentation")?;
        for (name, record) in types {
            self.insert_type(&name, record);
        }
        Ok(())
    }
}
