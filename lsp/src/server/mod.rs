mod cli;
mod completion;
mod config;
mod diagnostics;
mod entry;
mod formatting;
mod handlers;
mod hover;
mod signature;
mod state;
mod text;

pub use entry::run;
pub use state::SlimLanguageServer;

/// Publication cap for one document's diagnostics.
pub(crate) const MAX_DIAGNOSTICS: usize = slim_core::validate::MAX_ISSUES;
