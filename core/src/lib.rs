//! Core analysis for SLiM and Eidos scripts: instance binding, cursor
//! context resolution, the documentation index, and structure checks.

pub mod binding;
pub mod docs;
pub mod resolve;
pub mod symbols;
pub mod text;
pub mod token;
pub mod validate;

pub use binding::{BindingScope, BindingStore, BindingTable};
pub use docs::DocIndex;
pub use resolve::{ResolvedContext, resolve_at_cursor, resolve_for_completion};
