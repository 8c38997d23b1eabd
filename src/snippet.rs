//! The snippet record and the input shapes used to create and update one.
//!
//! Field rules live here so every write path (create, update, import)
//! enforces the same contract: `title`, `code` and `language` are required,
//! tags are trimmed and de-duplicated, and the id and creation time can
//! never be rewritten once assigned.
use std::collections::HashSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{Result, SnipError};

/// Represents a single code snippet in the library
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snippet {
    /// Unique identifier for the snippet
    pub id: String,
    /// Snippet title
    pub title: String,
    /// Free-form description of what the code does
    #[serde(default)]
    pub description: String,
    /// The source text itself
    pub code: String,
    /// Language identifier ("javascript", "python", ...)
    pub language: String,
    /// Tags for organization
    #[serde(default)]
    pub tags: Vec<String>,
    /// Whether the snippet is pinned to the bookmark list
    #[serde(default)]
    pub bookmarked: bool,
    /// When the snippet was created
    pub created_at: DateTime<Utc>,
    /// Last modification time, absent until the first update
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Input for creating a snippet. The store validates and normalizes it;
/// nothing here is trusted yet.
#[derive(Debug, Clone, Default)]
pub struct SnippetDraft {
    pub title: String,
    pub description: String,
    pub code: String,
    pub language: String,
    pub tags: Vec<String>,
    /// Caller-supplied creation time; the store stamps now when absent
    pub created_at: Option<DateTime<Utc>>,
}

/// A partial update. Absent fields keep their current values. The id and
/// creation time are not part of the patch at all, so unknown keys in a
/// deserialized patch (including "id" and "createdAt") are dropped instead
/// of applied.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SnippetPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub code: Option<String>,
    pub language: Option<String>,
    pub tags: Option<Vec<String>>,
    pub bookmarked: Option<bool>,
}

impl Snippet {
    /// Builds a validated snippet from a draft, assigning a fresh ID.
    ///
    /// `title`, `description` and `code` are stored trimmed; tags are
    /// cleaned with [`clean_tags`]; the bookmark flag always starts false.
    pub fn from_draft(draft: SnippetDraft) -> Result<Self> {
        validate_fields(&draft.title, &draft.code, &draft.language)?;

        Ok(Snippet {
            id: Uuid::new_v4().to_string(),
            title: draft.title.trim().to_string(),
            description: draft.description.trim().to_string(),
            code: draft.code.trim().to_string(),
            language: draft.language,
            tags: clean_tags(&draft.tags),
            bookmarked: false,
            created_at: draft.created_at.unwrap_or_else(Utc::now),
            updated_at: None,
        })
    }

    /// Merges a patch over this snippet and returns the result, leaving
    /// `self` untouched. The merged record is validated before it is
    /// returned, so a bad patch can never produce a stored invalid
    /// snippet. `updated_at` is stamped on every successful merge, empty
    /// patches included.
    pub fn merged_with(&self, patch: &SnippetPatch) -> Result<Snippet> {
        let mut merged = self.clone();

        if let Some(title) = &patch.title {
            merged.title = title.clone();
        }
        if let Some(description) = &patch.description {
            merged.description = description.clone();
        }
        if let Some(code) = &patch.code {
            merged.code = code.clone();
        }
        if let Some(language) = &patch.language {
            merged.language = language.clone();
        }
        if let Some(tags) = &patch.tags {
            merged.tags = clean_tags(tags);
        }
        if let Some(bookmarked) = patch.bookmarked {
            merged.bookmarked = bookmarked;
        }

        // Re-validate only when a required field was part of the patch
        if patch.title.is_some() || patch.code.is_some() || patch.language.is_some() {
            validate_fields(&merged.title, &merged.code, &merged.language)?;
        }

        merged.updated_at = Some(Utc::now());
        Ok(merged)
    }
}

/// Checks the three required fields, naming the first one that fails.
/// `title` and `code` must be non-blank after trimming; `language` must be
/// non-empty as given.
pub fn validate_fields(title: &str, code: &str, language: &str) -> Result<()> {
    if title.trim().is_empty() {
        return Err(SnipError::Validation { field: "title" });
    }
    if code.trim().is_empty() {
        return Err(SnipError::Validation { field: "code" });
    }
    if language.is_empty() {
        return Err(SnipError::Validation { field: "language" });
    }
    Ok(())
}

/// Trims each tag, drops blanks, and removes duplicates while preserving
/// first-occurrence order.
pub fn clean_tags(tags: &[String]) -> Vec<String> {
    let mut seen = HashSet::new();
    tags.iter()
        .map(|tag| tag.trim())
        .filter(|tag| !tag.is_empty() && seen.insert(tag.to_string()))
        .map(str::to_string)
        .collect()
}
