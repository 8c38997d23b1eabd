//! Shared types for the snipstash application.
//!
//! This module contains the crate Result alias, the import/export envelope
//! shapes, library statistics, and the CLI command set.
use std::{collections::BTreeMap, path::PathBuf};

use chrono::{DateTime, Utc};
use clap::Subcommand;
use serde::{Deserialize, Serialize};

use crate::{SnipError, Snippet, SortKey};

/// A specialized Result type for snipstash operations.
pub type Result<T> = std::result::Result<T, SnipError>;

/// Version tag written into every export envelope.
pub const EXPORT_VERSION: &str = "1.0";

/// Versioned wrapper around a full library export.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportEnvelope {
    /// The whole collection, verbatim
    pub snippets: Vec<Snippet>,
    /// When the export was produced
    pub exported_at: DateTime<Utc>,
    /// Envelope format version
    pub version: String,
}

/// Incoming side of the envelope. Only `snippets` is required; records are
/// re-validated one by one, so their shape is kept loose here.
#[derive(Debug, Deserialize)]
pub struct ImportEnvelope {
    pub snippets: Vec<IncomingSnippet>,
}

/// One record inside an import payload. Any `id` or `updatedAt` in the
/// payload is dropped at the parse stage: imports always get a fresh ID
/// and a cleared update stamp.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IncomingSnippet {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub code: String,
    #[serde(default)]
    pub language: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub bookmarked: bool,
    /// Preserved when supplied, stamped at import time otherwise
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// Aggregate counts over the library.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LibraryStats {
    pub total_snippets: usize,
    pub bookmarked_count: usize,
    pub language_count: usize,
    pub tag_count: usize,
    /// Snippet count per language, sorted by language
    pub language_distribution: BTreeMap<String, usize>,
}

/// Available subcommands for the snipstash application
#[derive(Subcommand)]
pub enum Commands {
    /// Add a new snippet
    Add {
        /// Title of the snippet
        #[clap(short = 'T', long)]
        title: String,

        /// Short description of what the code does
        #[clap(short, long)]
        description: Option<String>,

        /// Language the code is written in
        #[clap(short, long)]
        language: String,

        /// The code itself, inline
        #[clap(short, long)]
        code: Option<String>,

        /// Path to a file containing the code
        #[clap(short, long)]
        file: Option<PathBuf>,

        /// Compose the code in your editor
        #[clap(short, long)]
        edit: bool,

        /// Tags to associate with the snippet (comma-separated)
        #[clap(short = 't', long)]
        tags: Option<String>,
    },

    /// View a snippet by ID
    View {
        /// ID of the snippet to view
        id: String,

        /// Format output as raw JSON
        #[clap(short, long)]
        json: bool,
    },

    /// List snippets with optional filtering
    List {
        /// Free-text query to filter by
        #[clap(short, long)]
        query: Option<String>,

        /// Only show snippets in this language
        #[clap(short, long)]
        language: Option<String>,

        /// Only show snippets carrying one of these tags (repeatable)
        #[clap(short, long)]
        tag: Vec<String>,

        /// Sort order
        #[clap(short, long, value_enum, default_value = "newest")]
        sort: SortKey,

        /// Limit the number of snippets returned
        #[clap(short = 'n', long)]
        limit: Option<usize>,

        /// Format output as JSON
        #[clap(short, long)]
        json: bool,

        /// Only show snippet IDs and titles
        #[clap(short, long)]
        brief: bool,
    },

    /// Search snippets by fuzzy relevance
    Search {
        /// Search query text
        query: String,

        /// Limit the number of search results (0 means no limit)
        #[clap(short = 'n', long, default_value_t = 10)]
        limit: usize,

        /// Format output as JSON
        #[clap(short, long)]
        json: bool,
    },

    /// Edit an existing snippet
    Edit {
        /// ID of the snippet to edit
        id: String,

        /// New title for the snippet
        #[clap(short = 'T', long)]
        title: Option<String>,

        /// New description
        #[clap(short, long)]
        description: Option<String>,

        /// New language
        #[clap(short, long)]
        language: Option<String>,

        /// Replacement code, inline
        #[clap(short, long)]
        code: Option<String>,

        /// Path to a file containing the replacement code
        #[clap(short, long)]
        file: Option<PathBuf>,

        /// Open the current code in your editor
        #[clap(short, long)]
        edit: bool,

        /// Replacement tags (comma-separated)
        #[clap(short = 't', long)]
        tags: Option<String>,
    },

    /// Toggle a snippet's bookmark flag
    Bookmark {
        /// ID of the snippet to toggle
        id: String,
    },

    /// Delete a snippet by ID
    Delete {
        /// ID of the snippet to delete
        id: String,

        /// Skip confirmation prompt
        #[clap(short, long)]
        force: bool,
    },

    /// Delete every snippet in the library
    Clear {
        /// Skip confirmation prompt
        #[clap(short, long)]
        force: bool,
    },

    /// Export the library as a versioned JSON envelope
    Export {
        /// Write the envelope to this file instead of stdout
        #[clap(short, long)]
        output: Option<PathBuf>,
    },

    /// Import snippets from an export envelope
    Import {
        /// Path to the envelope file
        input: PathBuf,
    },

    /// List every tag in use
    Tags,

    /// List every language in use
    Languages,

    /// Show library statistics
    Stats {
        /// Format output as JSON
        #[clap(short, long)]
        json: bool,
    },
}
