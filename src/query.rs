//! Pure filter and sort pipeline that turns the raw collection into the
//! final displayed list.
//!
//! Nothing in here mutates store state. The search step only decides
//! membership; ordering before the sort stays in collection order, and
//! every sort is stable, so ties keep their pre-sort relative positions.

use std::collections::HashSet;

use clap::ValueEnum;

use crate::{SearchIndex, Snippet};

/// Sort orders for listing snippets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum SortKey {
    /// Most recently created first
    #[default]
    Newest,
    /// Oldest first
    Oldest,
    /// Title, case-insensitive
    Name,
    /// Language, case-insensitive
    Language,
    /// Bookmarked snippets first
    Bookmarked,
}

/// Criteria for a list query. Unset fields apply no filtering.
#[derive(Debug, Clone, Default)]
pub struct ListQuery {
    /// Free-text query run through the fuzzy index
    pub search: Option<String>,
    /// Exact language to keep; None means every language
    pub language: Option<String>,
    /// Keep snippets carrying at least one of these tags
    pub tags: Vec<String>,
    /// Final ordering
    pub sort: SortKey,
}

/// Applies the search, language and tag filters in that order, then sorts.
pub fn filter_and_sort(
    collection: &[Snippet],
    index: &SearchIndex,
    query: &ListQuery,
) -> Vec<Snippet> {
    let mut filtered: Vec<Snippet> = collection.to_vec();

    if let Some(search) = query.search.as_deref() {
        if !search.trim().is_empty() {
            let matched: HashSet<String> = index.search(search).into_iter().collect();
            // Membership comes from the index; order stays with the collection
            filtered.retain(|snippet| matched.contains(&snippet.id));
        }
    }

    if let Some(language) = query.language.as_deref() {
        filtered.retain(|snippet| snippet.language == language);
    }

    if !query.tags.is_empty() {
        filtered.retain(|snippet| query.tags.iter().any(|tag| snippet.tags.contains(tag)));
    }

    sort_snippets(&mut filtered, query.sort);
    filtered
}

/// Sorts in place. Every arm uses a stable sort, so equal keys keep their
/// pre-sort relative order.
pub fn sort_snippets(snippets: &mut [Snippet], sort: SortKey) {
    match sort {
        SortKey::Newest => snippets.sort_by(|a, b| b.created_at.cmp(&a.created_at)),
        SortKey::Oldest => snippets.sort_by(|a, b| a.created_at.cmp(&b.created_at)),
        SortKey::Name => {
            snippets.sort_by(|a, b| a.title.to_lowercase().cmp(&b.title.to_lowercase()))
        }
        SortKey::Language => {
            snippets.sort_by(|a, b| a.language.to_lowercase().cmp(&b.language.to_lowercase()))
        }
        SortKey::Bookmarked => snippets.sort_by(|a, b| b.bookmarked.cmp(&a.bookmarked)),
    }
}
