//! Language server for SLiM and Eidos scripts.

mod server;

pub use server::{SlimLanguageServer, run};
