//! Documentation index over the SLiM and Eidos reference corpus.
//!
//! Records are normalized at load time (return types split off function
//! signatures, callback suffixes trimmed) and kept in ordered maps so that
//! every listing is deterministic.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

mod loader;


pub use loader::{DOC_FILES, DocFile, DocKind};

/// Corpus a record was loaded from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DocSource {
    #[serde(rename = "SLiM")]
    Slim,
    Eidos,
}

impl fmt::Display for DocSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DocSource::Slim => f.write_str("SLiM"),
            DocSource::Eidos => f.write_str("Eidos"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FunctionRecord {
    /// First documented signature without its leading `(returnType)`.
    pub signature: String,
    /// Every documented signature, verbatim.
    pub signatures: Vec<String>,
    pub return_type: String,
    pub description: String,
    pub source: DocSource,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MethodRecord {
    #[serde(default)]
    pub signature: String,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PropertyRecord {
    #[serde(rename = "type", default)]
    pub ty: String,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConstructorRecord {
    #[serde(default)]
    pub signature: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClassRecord {
    #[serde(default)]
    pub constructor: Option<ConstructorRecord>,
    #[serde(default)]
    pub methods: BTreeMap<String, MethodRecord>,
    #[serde(default)]
    pub properties: BTreeMap<String, PropertyRecord>,
}

/// Constructor documentation with blanks replaced by placeholders.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConstructorInfo {
    pub signature: String,
    pub description: String,
}

pub const NO_CONSTRUCTOR_SIGNATURE: &str = "None";
pub const NO_CONSTRUCTOR_DESCRIPTION: &str = "No constructor method implemented";

impl ClassRecord {
    pub fn method(&self, name: &str) -> Option<&MethodRecord> {
        self.methods.get(name)
    }

    pub fn property(&self, name: &str) -> Option<&PropertyRecord> {
        self.properties.get(name)
    }

    pub fn constructor_info(&self) -> ConstructorInfo {
        let non_blank = |s: &Option<String>| s.as_deref().map(str::trim).filter(|s| !s.is_empty()).map(str::to_string);
        let ctor = self.constructor.as_ref();
        ConstructorInfo {
            signature: ctor
                .and_then(|c| non_blank(&c.signature))
                .unwrap_or_else(|| NO_CONSTRUCTOR_SIGNATURE.to_string()),
            description: ctor
                .and_then(|c| non_blank(&c.description))
                .unwrap_or_else(|| NO_CONSTRUCTOR_DESCRIPTION.to_string()),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CallbackRecord {
    #[serde(default)]
    pub signature: String,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TypeRecord {
    #[serde(default)]
    pub description: String,
}

/// Queryable view over the loaded documentation.
#[derive(Debug, Clone, Default)]
pub struct DocIndex {
    functions: BTreeMap<String, FunctionRecord>,
    classes: BTreeMap<String, ClassRecord>,
    callbacks: BTreeMap<String, CallbackRecord>,
    types: BTreeMap<String, TypeRecord>,
}

impl DocIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lookup_function(&self, name: &str) -> Option<&FunctionRecord> {
        self.functions.get(name)
    }

    pub fn lookup_class(&self, name: &str) -> Option<&ClassRecord> {
        self.classes.get(name)
    }

    pub fn lookup_callback(&self, name: &str) -> Option<&CallbackRecord> {
        self.callbacks.get(name)
    }

    pub fn lookup_type(&self, name: &str) -> Option<&TypeRecord> {
        self.types.get(name)
    }

    /// Callback a hovered word refers to: the first, in name order, whose
    /// signature is the word or whose name starts with it.
    pub fn find_callback(&self, word: &str) -> Option<(&str, &CallbackRecord)> {
        if word.is_empty() {
            return None;
        }
        self.callbacks
            .iter()
            .find(|(name, cb)| cb.signature == word || name.starts_with(word))
            .map(|(name, cb)| (name.as_str(), cb))
    }

    pub fn functions(&self) -> impl Iterator<Item = (&str, &FunctionRecord)> {
        self.functions.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn classes(&self) -> impl Iterator<Item = (&str, &ClassRecord)> {
        self.classes.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn callbacks(&self) -> impl Iterator<Item = (&str, &CallbackRecord)> {
        self.callbacks.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn types(&self) -> impl Iterator<Item = (&str, &TypeRecord)> {
        self.types.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn is_empty(&self) -> bool {
        self.functions.is_empty() && self.classes.is_empty() && self.callbacks.is_empty() && self.types.is_empty()
    }

    pub fn insert_function(&mut self, name: &str, record: FunctionRecord) {
        self.functions.insert(name.to_string(), record);
    }

    pub fn insert_class(&mut self, name: &str, record: ClassRecord) {
        self.classes.insert(name.to_string(), record);
    }

    pub fn insert_callback(&mut self, name: &str, record: CallbackRecord) {
        self.callbacks.insert(name.to_string(), record);
    }

    pub fn insert_type(&mut self, name: &str, record: TypeRecord) {
        self.types.insert(name.to_string(), record);
    }

    /// `(functions, classes, callbacks, types)`
    pub fn counts(&self) -> (usize, usize, usize, usize) {
        (
            self.functions.len(),
            self.classes.len(),
            self.callbacks.len(),
            self.types.len(),
        )
    }
}
