//! Code snippet library with durable local persistence and fuzzy search.
//!
//! This library provides functionality for creating, storing, searching, and
//! organizing code snippets with tags, languages, and bookmarks.

mod cli;
mod config;
mod errors;
mod helper;
mod query;
mod search;
mod snippet;
mod storage;
mod types;

// Re-export key components
pub use cli::*;
pub use config::*;
pub use errors::*;
pub use helper::*;
pub use query::*;
pub use search::*;
pub use snippet::*;
pub use storage::*;
pub use types::*;
