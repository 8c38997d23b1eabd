//! Snippet persistence and the operations that mutate the library.
//!
//! The whole collection lives in a single JSON slot file. Every mutating
//! operation rewrites that file atomically (temp file, then rename) and
//! rebuilds the search index before returning, so a query issued right
//! after a mutation always reflects it.

use std::{
    collections::{BTreeMap, BTreeSet, HashSet},
    fs,
    io::{ErrorKind, Write},
    path::Path,
};

use chrono::Utc;
use log::{debug, error, info, warn};
use tempfile::NamedTempFile;
use uuid::Uuid;

use crate::{
    clean_tags, filter_and_sort, validate_fields, Config, ExportEnvelope, ImportEnvelope,
    LibraryStats, ListQuery, Result, SearchIndex, SnipError, Snippet, SnippetDraft, SnippetPatch,
    EXPORT_VERSION,
};

/// Owns the snippet collection, its slot file, and the search index.
///
/// The store is the single source of truth: no other component mutates the
/// collection. Mutations take `&mut self`; there is no locking and no
/// background work, every operation completes before it returns.
pub struct SnippetStore {
    /// Application configuration
    config: Config,

    /// The live collection, newest-created first
    snippets: Vec<Snippet>,

    /// Fuzzy index over the current collection
    index: SearchIndex,
}

impl SnippetStore {
    /// Opens the store over the slot file named by the configuration.
    ///
    /// A missing file yields an empty library. A file that exists but does
    /// not parse is reported through the log and also yields an empty
    /// library, so a damaged slot never blocks startup.
    pub fn open(config: Config) -> Result<Self> {
        let snippets = load_slot(&config.data_file)?;
        info!(
            "Opened snippet library with {} snippets from {}",
            snippets.len(),
            config.data_file.display()
        );

        let index = SearchIndex::build(&snippets);
        Ok(SnippetStore {
            config,
            snippets,
            index,
        })
    }

    /// Validates and stores a new snippet, returning the stored record.
    ///
    /// Nothing is mutated when validation fails. The new snippet is
    /// prepended, so the collection stays newest-created first.
    pub fn create(&mut self, draft: SnippetDraft) -> Result<Snippet> {
        let snippet = Snippet::from_draft(draft)?;
        info!("Creating snippet: {} ({})", snippet.title, snippet.id);

        self.snippets.insert(0, snippet.clone());
        self.commit()?;
        Ok(snippet)
    }

    /// Full copy of the collection, newest-created first.
    pub fn get_all(&self) -> Vec<Snippet> {
        self.snippets.clone()
    }

    /// Looks up one snippet by ID.
    pub fn get(&self, id: &str) -> Result<Snippet> {
        self.snippets
            .iter()
            .find(|snippet| snippet.id == id)
            .cloned()
            .ok_or_else(|| SnipError::NotFound { id: id.to_string() })
    }

    /// Merges a partial update over an existing snippet and returns the
    /// updated record.
    ///
    /// The merged record is validated before any state changes, so a
    /// rejected update leaves both memory and storage untouched.
    /// `updated_at` is stamped on every successful update.
    pub fn update(&mut self, id: &str, patch: &SnippetPatch) -> Result<Snippet> {
        let position = self.position(id)?;
        let updated = self.snippets[position].merged_with(patch)?;
        info!("Updating snippet: {} ({})", updated.title, updated.id);

        self.snippets[position] = updated.clone();
        self.commit()?;
        Ok(updated)
    }

    /// Flips the bookmark flag. Routed through update, so it stamps
    /// `updated_at` like any other mutation.
    pub fn toggle_bookmark(&mut self, id: &str) -> Result<Snippet> {
        let bookmarked = !self.get(id)?.bookmarked;
        let patch = SnippetPatch {
            bookmarked: Some(bookmarked),
            ..SnippetPatch::default()
        };
        self.update(id, &patch)
    }

    /// Removes a snippet, returning the removed record.
    pub fn delete(&mut self, id: &str) -> Result<Snippet> {
        let position = self.position(id)?;
        let removed = self.snippets.remove(position);
        info!("Deleted snippet: {} ({})", removed.title, removed.id);

        self.commit()?;
        Ok(removed)
    }

    /// Empties the library and persists the empty state.
    pub fn clear(&mut self) -> Result<()> {
        info!("Clearing snippet library ({} snippets)", self.snippets.len());
        self.snippets.clear();
        self.commit()
    }

    /// Re-reads the slot file, discarding in-memory state. This is the
    /// recovery step after a persistence failure.
    pub fn reload(&mut self) -> Result<()> {
        self.snippets = load_slot(&self.config.data_file)?;
        self.index = SearchIndex::build(&self.snippets);
        info!(
            "Reloaded {} snippets from {}",
            self.snippets.len(),
            self.config.data_file.display()
        );
        Ok(())
    }

    /// Free-text relevance search over the live collection. A blank query
    /// returns everything in collection order; otherwise results come back
    /// in descending relevance order.
    pub fn search(&self, query: &str) -> Vec<Snippet> {
        let ids = self.index.search(query);
        ids.iter().filter_map(|id| self.get(id).ok()).collect()
    }

    /// Runs the full filter and sort pipeline against the live collection.
    pub fn query(&self, query: &ListQuery) -> Vec<Snippet> {
        filter_and_sort(&self.snippets, &self.index, query)
    }

    /// Snippets whose language matches exactly, in collection order.
    pub fn snippets_by_language(&self, language: &str) -> Vec<Snippet> {
        self.snippets
            .iter()
            .filter(|snippet| snippet.language == language)
            .cloned()
            .collect()
    }

    /// Snippets with a tag containing the given text, case-insensitively.
    pub fn snippets_by_tag(&self, tag: &str) -> Vec<Snippet> {
        let needle = tag.to_lowercase();
        self.snippets
            .iter()
            .filter(|snippet| {
                snippet
                    .tags
                    .iter()
                    .any(|tag| tag.to_lowercase().contains(&needle))
            })
            .cloned()
            .collect()
    }

    /// Snippets currently bookmarked, in collection order.
    pub fn bookmarked(&self) -> Vec<Snippet> {
        self.snippets
            .iter()
            .filter(|snippet| snippet.bookmarked)
            .cloned()
            .collect()
    }

    /// Every distinct tag in use, sorted.
    pub fn all_tags(&self) -> Vec<String> {
        let tags: BTreeSet<String> = self
            .snippets
            .iter()
            .flat_map(|snippet| snippet.tags.iter().cloned())
            .collect();
        tags.into_iter().collect()
    }

    /// Every distinct language in use, sorted.
    pub fn all_languages(&self) -> Vec<String> {
        let languages: BTreeSet<String> = self
            .snippets
            .iter()
            .map(|snippet| snippet.language.clone())
            .collect();
        languages.into_iter().collect()
    }

    /// Aggregate counts for the current library.
    pub fn stats(&self) -> LibraryStats {
        let mut language_distribution: BTreeMap<String, usize> = BTreeMap::new();
        for snippet in &self.snippets {
            *language_distribution
                .entry(snippet.language.clone())
                .or_insert(0) += 1;
        }

        LibraryStats {
            total_snippets: self.snippets.len(),
            bookmarked_count: self.snippets.iter().filter(|s| s.bookmarked).count(),
            language_count: language_distribution.len(),
            tag_count: self.all_tags().len(),
            language_distribution,
        }
    }

    /// Serializes the whole library into the versioned export envelope.
    pub fn export(&self) -> Result<String> {
        let envelope = ExportEnvelope {
            snippets: self.snippets.clone(),
            exported_at: Utc::now(),
            version: EXPORT_VERSION.to_string(),
        };

        serde_json::to_string_pretty(&envelope).map_err(|e| {
            error!("Failed to serialize export envelope: {}", e);
            SnipError::Persistence {
                message: format!("serialize export envelope: {}", e),
            }
        })
    }

    /// Imports an export envelope, returning the number of snippets added.
    ///
    /// Every record is validated before anything changes; one bad record
    /// rejects the whole payload. Records whose title matches an existing
    /// snippet's title case-insensitively are skipped. Survivors get a
    /// fresh ID, keep a supplied creation time, and start with no update
    /// stamp. They are prepended in payload order.
    pub fn import(&mut self, payload: &str) -> Result<usize> {
        let envelope: ImportEnvelope =
            serde_json::from_str(payload).map_err(|e| SnipError::Import {
                message: format!("invalid import payload: {}", e),
            })?;

        for (index, incoming) in envelope.snippets.iter().enumerate() {
            validate_fields(&incoming.title, &incoming.code, &incoming.language).map_err(|e| {
                SnipError::Import {
                    message: format!("invalid snippet at index {}: {}", index, e),
                }
            })?;
        }

        // Duplicate suppression is against the pre-import collection only;
        // same-titled records within one payload are all kept
        let existing_titles: HashSet<String> = self
            .snippets
            .iter()
            .map(|snippet| snippet.title.to_lowercase())
            .collect();

        let total = envelope.snippets.len();
        let mut added: Vec<Snippet> = Vec::new();

        for incoming in envelope.snippets {
            if existing_titles.contains(&incoming.title.to_lowercase()) {
                debug!("Skipping duplicate title on import: {}", incoming.title);
                continue;
            }

            added.push(Snippet {
                id: Uuid::new_v4().to_string(),
                title: incoming.title,
                description: incoming.description,
                code: incoming.code,
                language: incoming.language,
                tags: clean_tags(&incoming.tags),
                bookmarked: incoming.bookmarked,
                created_at: incoming.created_at.unwrap_or_else(Utc::now),
                updated_at: None,
            });
        }

        let count = added.len();
        info!(
            "Importing {} of {} snippets ({} duplicate titles skipped)",
            count,
            total,
            total - count
        );

        self.snippets.splice(0..0, added);
        self.commit()?;
        Ok(count)
    }

    fn position(&self, id: &str) -> Result<usize> {
        self.snippets
            .iter()
            .position(|snippet| snippet.id == id)
            .ok_or_else(|| SnipError::NotFound { id: id.to_string() })
    }

    /// Rebuilds the index and rewrites the slot file. The index is rebuilt
    /// first so a stale one is never queried, even when the write fails
    /// and the caller has to reload.
    fn commit(&mut self) -> Result<()> {
        self.index = SearchIndex::build(&self.snippets);
        self.persist()
    }

    /// Writes the collection to the slot file using a temporary file and
    /// an atomic rename, so the slot never holds a partial write.
    fn persist(&self) -> Result<()> {
        let path = &self.config.data_file;

        if let Some(parent) = path.parent() {
            if !parent.exists() {
                debug!("Creating data directory: {}", parent.display());
                fs::create_dir_all(parent).map_err(|e| {
                    error!("Failed to create data directory {}: {}", parent.display(), e);
                    SnipError::Persistence {
                        message: format!("create {}: {}", parent.display(), e),
                    }
                })?;
            }
        }

        let dir = path.parent().unwrap_or_else(|| Path::new("."));
        let mut temp_file = NamedTempFile::new_in(dir).map_err(|e| {
            error!("Failed to create temporary file: {}", e);
            SnipError::Persistence {
                message: format!("create temporary file: {}", e),
            }
        })?;

        let json = serde_json::to_string_pretty(&self.snippets).map_err(|e| {
            error!("Failed to serialize snippet library: {}", e);
            SnipError::Persistence {
                message: format!("serialize library: {}", e),
            }
        })?;

        temp_file.write_all(json.as_bytes()).map_err(|e| {
            error!("Failed to write to temporary file: {}", e);
            SnipError::Persistence {
                message: format!("write temporary file: {}", e),
            }
        })?;

        temp_file.flush().map_err(|e| {
            error!("Failed to flush temporary file: {}", e);
            SnipError::Persistence {
                message: format!("flush temporary file: {}", e),
            }
        })?;

        temp_file.persist(path).map_err(|e| {
            error!("Failed to persist file {}: {}", path.display(), e.error);
            SnipError::Persistence {
                message: format!("replace {}: {}", path.display(), e.error),
            }
        })?;

        debug!(
            "Persisted {} snippets to {}",
            self.snippets.len(),
            path.display()
        );
        Ok(())
    }
}

/// Reads the slot file into a collection. Missing and unparseable files
/// both come back empty; only other I/O failures are errors.
fn load_slot(path: &Path) -> Result<Vec<Snippet>> {
    debug!("Loading snippet slot file: {}", path.display());

    let raw = match fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            debug!("Slot file does not exist yet, starting empty");
            return Ok(Vec::new());
        }
        Err(e) => {
            error!("Failed to read slot file {}: {}", path.display(), e);
            return Err(SnipError::Io(e));
        }
    };

    match serde_json::from_str(&raw) {
        Ok(snippets) => Ok(snippets),
        Err(e) => {
            warn!(
                "Slot file {} is not valid snippet JSON ({}), starting empty",
                path.display(),
                e
            );
            Ok(Vec::new())
        }
    }
}
