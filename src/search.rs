//! Fuzzy relevance index over the snippet collection.
//!
//! The index keeps its own lowercased snapshot of every searchable field,
//! so queries never touch live store state. It is rebuilt wholesale after
//! every mutation and answers queries as ranked snippet IDs, which keeps
//! the matcher swappable without touching the store or the query layer.

use fuzzy_matcher::skim::SkimMatcherV2;
use fuzzy_matcher::FuzzyMatcher;
use log::debug;

use crate::Snippet;

/// Relative weight of a title match.
const TITLE_WEIGHT: i64 = 4;
/// Relative weight of a description match.
const DESCRIPTION_WEIGHT: i64 = 3;
/// Relative weight of a match inside the code body.
const CODE_WEIGHT: i64 = 2;
/// Relative weight of the best-matching tag.
const TAG_WEIGHT: i64 = 1;

/// One searchable document in the index.
struct IndexEntry {
    id: String,
    title: String,
    description: String,
    code: String,
    tags: Vec<String>,
}

/// A fuzzy text index over snippet titles, descriptions, code and tags.
pub struct SearchIndex {
    entries: Vec<IndexEntry>,
}

impl SearchIndex {
    /// Builds a fresh index from the given collection snapshot, preserving
    /// collection order.
    pub fn build(snippets: &[Snippet]) -> Self {
        let entries = snippets
            .iter()
            .map(|snippet| IndexEntry {
                id: snippet.id.clone(),
                title: snippet.title.to_lowercase(),
                description: snippet.description.to_lowercase(),
                code: snippet.code.to_lowercase(),
                tags: snippet.tags.iter().map(|tag| tag.to_lowercase()).collect(),
            })
            .collect();

        SearchIndex { entries }
    }

    /// Returns snippet IDs ranked by descending weighted relevance. A blank
    /// query matches everything, in collection order.
    pub fn search(&self, query: &str) -> Vec<String> {
        let query = query.trim().to_lowercase();

        if query.is_empty() {
            return self.entries.iter().map(|entry| entry.id.clone()).collect();
        }

        let matcher = SkimMatcherV2::default();
        let mut scored: Vec<(&IndexEntry, i64)> = Vec::new();

        for entry in &self.entries {
            let title_score = matcher.fuzzy_match(&entry.title, &query).unwrap_or(0);
            let description_score = matcher
                .fuzzy_match(&entry.description, &query)
                .unwrap_or(0);
            let code_score = matcher.fuzzy_match(&entry.code, &query).unwrap_or(0);
            // The best-scoring tag counts for the whole field
            let tag_score = entry
                .tags
                .iter()
                .filter_map(|tag| matcher.fuzzy_match(tag, &query))
                .max()
                .unwrap_or(0);

            let total = title_score * TITLE_WEIGHT
                + description_score * DESCRIPTION_WEIGHT
                + code_score * CODE_WEIGHT
                + tag_score * TAG_WEIGHT;

            if total > 0 {
                scored.push((entry, total));
            }
        }

        debug!(
            "Query '{}' matched {} of {} indexed snippets",
            query,
            scored.len(),
            self.entries.len()
        );

        // Highest score first; sort_by is stable, so ties keep collection order
        scored.sort_by(|a, b| b.1.cmp(&a.1));

        scored
            .into_iter()
            .map(|(entry, _)| entry.id.clone())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::SnippetDraft;

    fn snippet(title: &str, code: &str, tags: &[&str]) -> Snippet {
        Snippet::from_draft(SnippetDraft {
            title: title.to_string(),
            code: code.to_string(),
            language: "rust".to_string(),
            tags: tags.iter().map(|tag| tag.to_string()).collect(),
            ..SnippetDraft::default()
        })
        .unwrap()
    }

    #[test]
    fn blank_query_returns_everything_in_collection_order() {
        let snippets = vec![
            snippet("Binary Search", "fn bs() {}", &[]),
            snippet("Linked List", "struct Node;", &[]),
        ];
        let index = SearchIndex::build(&snippets);

        let ids = index.search("   ");
        assert_eq!(ids, vec![snippets[0].id.clone(), snippets[1].id.clone()]);
    }

    #[test]
    fn unrelated_snippets_are_excluded() {
        let snippets = vec![
            snippet("Binary Search", "fn bs() {}", &[]),
            snippet("Binary Tree", "struct Tree;", &[]),
            snippet("Linked List", "struct Node;", &[]),
        ];
        let index = SearchIndex::build(&snippets);

        let ids = index.search("binary");
        assert_eq!(ids.len(), 2);
        assert!(ids.contains(&snippets[0].id));
        assert!(ids.contains(&snippets[1].id));
        assert!(!ids.contains(&snippets[2].id));
    }

    #[test]
    fn title_matches_rank_above_code_matches() {
        let snippets = vec![
            snippet("Sorting helpers", "let values = binary_split(input);", &[]),
            snippet("Binary Search", "fn search() {}", &[]),
        ];
        let index = SearchIndex::build(&snippets);

        let ids = index.search("binary");
        assert_eq!(ids.first(), Some(&snippets[1].id));
    }

    #[test]
    fn tolerates_dropped_characters() {
        let snippets = vec![
            snippet("Binary Search", "fn bs() {}", &[]),
            snippet("Linked List", "struct Node;", &[]),
        ];
        let index = SearchIndex::build(&snippets);

        let ids = index.search("binry");
        assert_eq!(ids, vec![snippets[0].id.clone()]);
    }

    #[test]
    fn tag_matches_count_once_at_lowest_weight() {
        let snippets = vec![
            snippet("Graph walk", "fn walk() {}", &["traversal", "recursion"]),
            snippet("Recursion basics", "fn rec() {}", &[]),
        ];
        let index = SearchIndex::build(&snippets);

        let ids = index.search("recursion");
        assert_eq!(ids.len(), 2);
        // Title match outranks the tag-only match
        assert_eq!(ids.first(), Some(&snippets[1].id));
    }
}
