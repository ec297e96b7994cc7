use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use dashmap::DashMap;
use ropey::Rope;
use slim_core::binding::{BindingScope, BindingStore, BindingTable};
use slim_core::docs::DocIndex;
use tower_lsp::Client;
use tower_lsp::lsp_types::Url;

use super::config::ServerConfig;

/// Text and version of an open document.
#[derive(Debug, Default)]
pub(crate) struct Document {
    pub(crate) content: Rope,
    pub(crate) version: i32,
}

/// Shared server state. Handlers borrow it through `&self`.
pub struct SlimLanguageServer {
    /// `None` in tests; notifications to the client are skipped.
    pub(crate) client: Option<Client>,
    pub(crate) documents: Arc<DashMap<Url, Document>>,
    pub(crate) docs: Arc<DocIndex>,
    /// Held across "rescan, then resolve" so concurrent requests cannot
    /// interleave their updates of a shared table.
    pub(crate) bindings: Mutex<BindingStore>,
    pub(crate) config: Mutex<ServerConfig>,
}

pub(crate) fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl SlimLanguageServer {
    pub(crate) fn new(client: Client, docs: Arc<DocIndex>, scope: BindingScope) -> Self {
        Self::build(Some(client), docs, scope)
    }

    /// A server without a client connection, for driving handlers directly.
    pub fn new_test(docs: DocIndex) -> Self {
        Self::new_test_with_scope(docs, BindingScope::default())
    }

    pub fn new_test_with_scope(docs: DocIndex, scope: BindingScope) -> Self {
        Self::build(None, Arc::new(docs), scope)
    }

    fn build(client: Option<Client>, docs: Arc<DocIndex>, scope: BindingScope) -> Self {
        Self {
            client,
            documents: Arc::new(DashMap::new()),
            docs,
            bindings: Mutex::new(BindingStore::new(scope)),
            config: Mutex::new(ServerConfig {
                binding_scope: scope,
                ..ServerConfig::default()
            }),
        }
    }

    pub(crate) fn document_text(&self, uri: &Url) -> Option<String> {
        self.documents.get(uri).map(|doc| doc.content.to_string())
    }

    /// Rescan `text` into the table serving `uri` and run `f` against it
    /// while the store stays locked.
    pub(crate) fn with_bindings<R>(&self, uri: &Url, text: &str, f: impl FnOnce(&BindingTable) -> R) -> R {
        let mut store = lock(&self.bindings);
        let table = store.update_instance_bindings(uri.as_str(), text);
        f(table)
    }
}
