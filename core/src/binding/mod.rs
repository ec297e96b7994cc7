//! Instance binding table: identifier → class name, inferred by scanning
//! script text for construction, population and block-registration idioms.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use anyhow::anyhow;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use tracing::debug;

mod rules;


pub use rules::{BINDING_RULES, BindingRule, BindingTarget, EVENT_BLOCK_CLASS, SUBPOPULATION_CLASS, match_line};

/// Hand-authored identifier → class shortcuts, consulted after the table.
pub const STATIC_ALIASES: &[(&str, &str)] = &[("sim", "Species")];

pub fn static_alias(name: &str) -> Option<&'static str> {
    STATIC_ALIASES
        .iter()
        .find(|(alias, _)| *alias == name)
        .map(|(_, class)| *class)
}

/// Inferred identifier → class bindings. Only ever grows or overwrites.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BindingTable {
    bindings: FxHashMap<String, String>,
}

impl BindingTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rescan `text` line by line and merge its bindings into the table.
    /// Later lines overwrite earlier ones; nothing is removed.
    pub fn update_from_text(&mut self, text: &str) {
        let mut added = 0usize;
        for line in text.split('\n') {
            if let Some((ident, class)) = match_line(line) {
                self.bind(ident, class);
                added += 1;
            }
        }
        debug!(bindings = added, total = self.bindings.len(), "scanned instance bindings");
    }

    pub fn bind(&mut self, ident: &str, class: &str) {
        match self.bindings.get_mut(ident) {
            Some(existing) if existing == class => {}
            Some(existing) => *existing = class.to_string(),
            None => {
                self.bindings.insert(ident.to_string(), class.to_string());
            }
        }
    }

    pub fn get(&self, ident: &str) -> Option<&str> {
        self.bindings.get(ident).map(String::as_str)
    }

    /// Table first, then the static aliases.
    pub fn instance_class(&self, ident: &str) -> Option<&str> {
        self.get(ident).or_else(|| static_alias(ident))
    }

    /// Like [`instance_class`](Self::instance_class), falling back to the
    /// identifier itself as a literal class name guess.
    pub fn class_of<'a>(&'a self, ident: &'a str) -> &'a str {
        self.instance_class(ident).unwrap_or(ident)
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    /// Sorted snapshot, for reporting.
    pub fn snapshot(&self) -> BTreeMap<String, String> {
        self.bindings.iter().map(|(k, v)| (k.clone(), v.clone())).collect()
    }
}

/// Whether bindings are shared by every document or kept per document.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BindingScope {
    /// One table for the whole process; bindings leak between documents.
    #[default]
    Global,
    /// One table per document key, dropped when the document closes.
    Document,
}

impl fmt::Display for BindingScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BindingScope::Global => f.write_str("global"),
            BindingScope::Document => f.write_str("document"),
        }
    }
}

impl FromStr for BindingScope {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "global" => Ok(BindingScope::Global),
            "document" => Ok(BindingScope::Document),
            other => Err(anyhow!("unknown binding scope '{}', expected 'global' or 'document'", other)),
        }
    }
}

/// Owner of the binding tables for every open document.
#[derive(Debug, Default)]
pub struct BindingStore {
    scope: BindingScope,
    global: BindingTable,
    documents: FxHashMap<String, BindingTable>,
}

impl BindingStore {
    pub fn new(scope: BindingScope) -> Self {
        Self {
            scope,
            ..Self::default()
        }
    }

    pub fn scope(&self) -> BindingScope {
        self.scope
    }

    /// Switching scope starts from empty tables for the new scope.
    pub fn set_scope(&mut self, scope: BindingScope) {
        if self.scope != scope {
            debug!(from = %self.scope, to = %scope, "binding scope changed");
            self.scope = scope;
            self.global = BindingTable::default();
            self.documents.clear();
        }
    }

    /// Table that serves `document`; created empty on first use.
    pub fn table_mut(&mut self, document: &str) -> &mut BindingTable {
        match self.scope {
            BindingScope::Global => &mut self.global,
            BindingScope::Document => self.documents.entry(document.to_string()).or_default(),
        }
    }

    pub fn table(&self, document: &str) -> Option<&BindingTable> {
        match self.scope {
            BindingScope::Global => Some(&self.global),
            BindingScope::Document => self.documents.get(document),
        }
    }

    /// Rescan `text` into the table serving `document` and return it.
    pub fn update_instance_bindings(&mut self, document: &str, text: &str) -> &BindingTable {
        let table = self.table_mut(document);
        table.update_from_text(text);
        table
    }

    /// Forget a closed document. A no-op for the global table.
    pub fn close(&mut self, document: &str) {
        if self.scope == BindingScope::Document {
            self.documents.remove(document);
        }
    }
}
