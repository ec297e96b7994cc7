use ropey::Rope;
use slim_core::resolve::{ResolveMode, resolve, resolve_for_completion};
use slim_core::symbols::function_symbols;
use slim_core::token;
use tower_lsp::LanguageServer;
use tower_lsp::jsonrpc::Result;
use tower_lsp::lsp_types::*;
use tracing::{debug, info};

use super::{
    completion::{completion_items, resolve_item},
    config::CONFIG_SECTION,
    formatting::format_slim,
    hover::hover_markdown,
    signature::signature_help_at,
    state::{Document, SlimLanguageServer, lock},
    text::{apply_change, full_range, span_range},
};

#[tower_lsp::async_trait]
impl LanguageServer for SlimLanguageServer {
    async fn initialize(&self, params: InitializeParams) -> Result<InitializeResult> {
        info!("SLiM Language Server initializing with root {:?}", params.root_uri);

        Ok(InitializeResult {
            capabilities: ServerCapabilities {
                text_document_sync: Some(TextDocumentSyncCapability::Kind(TextDocumentSyncKind::INCREMENTAL)),
                hover_provider: Some(HoverProviderCapability::Simple(true)),
                completion_provider: Some(CompletionOptions {
                    resolve_provider: Some(true),
                    trigger_characters: Some(vec![".".to_string()]),
                    ..Default::default()
                }),
                signature_help_provider: Some(SignatureHelpOptions {
                    trigger_characters: Some(vec!["(".to_string(), ",".to_string(), " ".to_string()]),
                    retrigger_characters: Some(vec![",".to_string(), ")".to_string()]),
                    work_done_progress_options: Default::default(),
                }),
                document_symbol_provider: Some(OneOf::Left(true)),
                document_formatting_provider: Some(OneOf::Left(true)),
                ..Default::default()
            },
            server_info: Some(ServerInfo {
                name: "SLiM Language Server".to_string(),
                version: Some(env!("CARGO_PKG_VERSION").to_string()),
            }),
        })
    }

    async fn initialized(&self, _: InitializedParams) {
        let (functions, classes, callbacks, types) = self.docs.counts();
        info!(functions, classes, callbacks, types, "SLiM Language Server initialized");
        if let Some(client) = &self.client {
            client
                .log_message(MessageType::INFO, "SLiM Language Server started")
                .await;
        }
        self.load_config().await;
    }

    async fn shutdown(&self) -> Result<()> {
        info!("SLiM Language Server shutting down");
        Ok(())
    }

    async fn did_change_configuration(&self, params: DidChangeConfigurationParams) {
        // Clients that push settings send the whole tree; others only notify.
        let pointer = format!("/{}", CONFIG_SECTION.replace('.', "/"));
        match params.settings.pointer(&pointer).filter(|v| !v.is_null()) {
            Some(section) => self.apply_config(section.clone()),
            None => self.load_config().await,
        }
    }

    async fn did_open(&self, params: DidOpenTextDocumentParams) {
        let uri = params.text_document.uri;
        let version = params.text_document.version;
        debug!(uri = %uri, version, "document opened");
        self.documents.insert(
            uri.clone(),
            Document {
                content: Rope::from_str(&params.text_document.text),
                version,
            },
        );
        self.schedule_diagnostics(uri, version);
    }

    async fn did_change(&self, params: DidChangeTextDocumentParams) {
        let uri = params.text_document.uri;
        let version = params.text_document.version;
        {
            let mut entry = self.documents.entry(uri.clone()).or_default();
            entry.version = version;
            for change in &params.content_changes {
                apply_change(&mut entry.content, change);
            }
        }
        self.schedule_diagnostics(uri, version);
    }

    async fn did_close(&self, params: DidCloseTextDocumentParams) {
        let uri = params.text_document.uri;
        self.documents.remove(&uri);
        lock(&self.bindings).close(uri.as_str());
        self.clear_diagnostics(uri).await;
    }

    async fn hover(&self, params: HoverParams) -> Result<Option<Hover>> {
        let uri = &params.text_document_position_params.text_document.uri;
        let position = params.text_document_position_params.position;
        let Some(text) = self.document_text(uri) else {
            return Ok(None);
        };

        let resolution = self.with_bindings(uri, &text, |table| {
            resolve(&text, position.line, position.character, ResolveMode::Enclosing, table)
        });
        let Some(resolution) = resolution else {
            return Ok(None);
        };
        let Some(markdown) = hover_markdown(&resolution.context, &self.docs) else {
            debug!(word = resolution.context.word(), "no documentation for hovered word");
            return Ok(None);
        };

        let range = token::line_at(&text, resolution.line)
            .map(|line| span_range(resolution.line, line, resolution.span.start, resolution.span.end));
        Ok(Some(Hover {
            contents: HoverContents::Markup(MarkupContent {
                kind: MarkupKind::Markdown,
                value: markdown,
            }),
            range,
        }))
    }

    async fn completion(&self, params: CompletionParams) -> Result<Option<CompletionResponse>> {
        let uri = &params.text_document_position.text_document.uri;
        let position = params.text_document_position.position;
        let Some(text) = self.document_text(uri) else {
            return Ok(None);
        };

        let context = self.with_bindings(uri, &text, |table| {
            resolve_for_completion(&text, position.line, position.character, table)
        });
        let items = completion_items(context.as_ref(), &self.docs);
        debug!(count = items.len(), member = context.as_ref().is_some_and(|c| c.is_member()), "completion");
        Ok(Some(CompletionResponse::Array(items)))
    }

    async fn completion_resolve(&self, item: CompletionItem) -> Result<CompletionItem> {
        Ok(resolve_item(item, &self.docs))
    }

    async fn signature_help(&self, params: SignatureHelpParams) -> Result<Option<SignatureHelp>> {
        let uri = &params.text_document_position_params.text_document.uri;
        let position = params.text_document_position_params.position;
        let Some(text) = self.document_text(uri) else {
            return Ok(None);
        };

        Ok(self.with_bindings(uri, &text, |table| signature_help_at(&text, position, &self.docs, table)))
    }

    async fn document_symbol(&self, params: DocumentSymbolParams) -> Result<Option<DocumentSymbolResponse>> {
        let Some(text) = self.document_text(&params.text_document.uri) else {
            return Ok(None);
        };

        let symbols: Vec<DocumentSymbol> = function_symbols(&text)
            .into_iter()
            .map(|symbol| {
                let line = symbol.line as u32;
                let range = Range::new(Position::new(line, 0), Position::new(line, symbol.end_character as u32));
                DocumentSymbol {
                    name: symbol.name,
                    detail: None,
                    kind: SymbolKind::FUNCTION,
                    tags: None,
                    #[allow(deprecated)]
                    deprecated: None,
                    range,
                    selection_range: range,
                    children: None,
                }
            })
            .collect();
        Ok(Some(DocumentSymbolResponse::Nested(symbols)))
    }

    async fn formatting(&self, params: DocumentFormattingParams) -> Result<Option<Vec<TextEdit>>> {
        let Some(content) = self.document_text(&params.text_document.uri) else {
            return Ok(None);
        };
        let formatted = format_slim(&content, &params.options);
        if formatted == content {
            return Ok(Some(vec![]));
        }
        let range = full_range(&Rope::from_str(&content));
        Ok(Some(vec![TextEdit {
            range,
            new_text: formatted,
        }]))
    }
}
