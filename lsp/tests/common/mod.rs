#![allow(dead_code)]

use slim_core::docs::{DocIndex, DocSource};
use slim_lsp::SlimLanguageServer;
use tower_lsp::LanguageServer;
use tower_lsp::lsp_types::*;

pub const SLIM_FUNCTIONS: &str = r#"{
    "Initialization": {
        "initializeMutationRate": {
            "signatures": ["(void)initializeMutationRate(numeric rates, [Ni ends = NULL], [string$ sex = \"*\"])"],
            "description": "Set the mutation rate."
        }
    }
}"#;

pub const EIDOS_FUNCTIONS: &str = r#"{
    "Math": {
        "rnorm": {
            "signatures": ["(float)rnorm(integer$ n, [numeric mean = 0], [numeric sd = 1])"],
            "description": "Normal draws."
        }
    }
}"#;

pub const CLASSES: &str = r#"{
    "Subpopulation": {
        "methods": {
            "setSubpopulationSize": {
                "signature": "– (void)setSubpopulationSize(integer$ size)",
                "description": "Resize the subpopulation."
            }
        },
        "properties": {
            "individuals": { "type": "object<Individual>", "description": "All individuals." }
        }
    },
    "Species": {
        "methods": {
            "addSubpop": {
                "signature": "– (object<Subpopulation>$)addSubpop(is$ subpopID, integer$ size)",
                "description": "Add a subpopulation."
            }
        },
        "properties": {
            "cycle": { "type": "integer$", "description": "Current cycle." }
        }
    },
    "SLiMEidosBlock": {
        "properties": {
            "active": { "type": "integer$", "description": "Whether the block runs." }
        }
    },
    "Dictionary": {
        "constructor": { "signature": "(object<Dictionary>$)Dictionary(...)", "description": "Make a dictionary." }
    }
}"#;

pub const CALLBACKS: &str = r#"{
    "early() events": { "signature": "early() events", "description": "Runs early in the tick." }
}"#;

pub const TYPES: &str = r#"{ "integer": { "description": "Whole numbers." } }"#;

pub fn fixture_docs() -> DocIndex {
    let mut docs = DocIndex::new();
    docs.add_functions_json(SLIM_FUNCTIONS, DocSource::Slim).unwrap();
    docs.add_functions_json(EIDOS_FUNCTIONS, DocSource::Eidos).unwrap();
    docs.add_classes_json(CLASSES).unwrap();
    docs.add_callbacks_json(CALLBACKS).unwrap();
    docs.add_types_json(TYPES).unwrap();
    docs
}

pub fn uri(name: &str) -> Url {
    Url::parse(&format!("file:///tmp/{name}")).unwrap()
}

pub async fn open(server: &SlimLanguageServer, uri: &Url, text: &str) {
    server
        .did_open(DidOpenTextDocumentParams {
            text_document: TextDocumentItem::new(uri.clone(), "slim".to_string(), 1, text.to_string()),
        })
        .await;
}

pub fn at(uri: &Url, line: u32, character: u32) -> TextDocumentPositionParams {
    TextDocumentPositionParams::new(TextDocumentIdentifier::new(uri.clone()), Position::new(line, character))
}

pub async fn hover_text(server: &SlimLanguageServer, uri: &Url, line: u32, character: u32) -> Option<String> {
    let hover = server
        .hover(HoverParams {
            text_document_position_params: at(uri, line, character),
            work_done_progress_params: Default::default(),
        })
        .await
        .unwrap()?;
    match hover.contents {
        HoverContents::Markup(markup) => Some(markup.value),
        other => panic!("unexpected hover contents: {other:?}"),
    }
}

pub async fn completion_items(server: &SlimLanguageServer, uri: &Url, line: u32, character: u32) -> Vec<CompletionItem> {
    let response = server
        .completion(CompletionParams {
            text_document_position: at(uri, line, character),
            work_done_progress_params: Default::default(),
            partial_result_params: Default::default(),
            context: None,
        })
        .await
        .unwrap();
    match response {
        Some(CompletionResponse::Array(items)) => items,
        Some(CompletionResponse::List(list)) => list.items,
        None => Vec::new(),
    }
}
