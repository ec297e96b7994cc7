use std::sync::Arc;

use clap::Parser;
use slim_core::docs::DocIndex;
use tower_lsp::{LspService, Server};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use super::cli::{Args, analyze};
use super::state::SlimLanguageServer;

const DEFAULT_TRACE_FILTER: &str = "slim_lsp=info,slim_core=info";

pub async fn run() {
    let args = Args::parse();

    if let Some(path) = &args.analyze {
        match analyze(path, args.errors_only) {
            Ok(output) => println!("{}", output),
            Err(e) => {
                eprintln!("slim-lsp analyze error: {e:#}");
                std::process::exit(2);
            }
        }
        return;
    }

    // stdout carries the protocol; logs go to stderr.
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_TRACE_FILTER)))
        .init();

    let docs_dir = args.resolved_docs_dir();
    let docs = DocIndex::load_dir(&docs_dir).unwrap_or_else(|e| {
        error!("failed to load documentation from {}: {e:#}", docs_dir.display());
        DocIndex::new()
    });
    let docs = Arc::new(docs);
    let scope = args.binding_scope;
    info!(%scope, "starting SLiM language server");

    let stdin = tokio::io::stdin();
    let stdout = tokio::io::stdout();

    let (service, socket) = LspService::new(move |client| SlimLanguageServer::new(client, docs.clone(), scope));
    Server::new(stdin, stdout, socket).serve(service).await;
}
