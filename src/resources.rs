//! Visible subset of the resource catalog.

use crate::catalog::Resource;
use crate::fields::CategoryFilter;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResourceQuery {
    pub search: String,
    pub category: CategoryFilter,
    pub favorites_only: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceEntry {
    pub resource: Resource,
    pub is_favorite: bool,
}

/// Entries matching the search term (case-insensitive, title or description),
/// the category, and the favorites toggle, in catalog order. The term is
/// matched as typed, surrounding whitespace included.
pub fn filter_resources(
    catalog: &[Resource],
    query: &ResourceQuery,
    favorites: &[u64],
) -> Vec<ResourceEntry> {
    let needle = query.search.to_lowercase();
    catalog
        .iter()
        .filter(|r| {
            needle.is_empty()
                || r.title.to_lowercase().contains(&needle)
                || r.description.to_lowercase().contains(&needle)
        })
        .filter(|r| query.category.matches(&r.category))
        .filter(|r| !query.favorites_only || favorites.contains(&r.id))
        .map(|r| ResourceEntry {
            resource: r.clone(),
            is_favorite: favorites.contains(&r.id),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn res(id: u64, title: &str, description: &str, category: &str) -> Resource {
        Resource {
            id,
            title: title.into(),
            description: description.into(),
            category: category.into(),
            link: format!("https://example.com/{id}"),
        }
    }

    fn catalog() -> Vec<Resource> {
        vec![
            res(1, "Rust Book", "The official guide", "Programming"),
            res(2, "Pomodoro Timer", "Focus in short bursts", "Productivity"),
            res(3, "Rustlings", "Small exercises", "Programming"),
            res(4, "Notion", "Notes and docs, rust-free", "Productivity"),
        ]
    }

    fn ids(entries: &[ResourceEntry]) -> Vec<u64> {
        entries.iter().map(|e| e.resource.id).collect()
    }

    #[test]
    fn empty_catalog_yields_empty_result() {
        let query = ResourceQuery {
            search: "anything".into(),
            category: CategoryFilter::Only("Programming".into()),
            favorites_only: true,
        };
        assert!(filter_resources(&[], &query, &[1, 2]).is_empty());
        assert!(filter_resources(&[], &ResourceQuery::default(), &[]).is_empty());
    }

    #[test]
    fn search_matches_title_or_description_ignoring_case() {
        let query = ResourceQuery { search: "RUST".into(), ..ResourceQuery::default() };
        assert_eq!(ids(&filter_resources(&catalog(), &query, &[])), vec![1, 3, 4]);
    }

    #[test]
    fn search_term_whitespace_is_significant() {
        let query = ResourceQuery { search: "rust ".into(), ..ResourceQuery::default() };
        assert_eq!(ids(&filter_resources(&catalog(), &query, &[])), vec![1]);
        let query = ResourceQuery { search: " ".into(), ..ResourceQuery::default() };
        assert_eq!(ids(&filter_resources(&catalog(), &query, &[])), vec![1, 2, 3, 4]);
        let query = ResourceQuery { search: "  ".into(), ..ResourceQuery::default() };
        assert!(filter_resources(&catalog(), &query, &[]).is_empty());
    }

    #[test]
    fn filters_combine_and_keep_catalog_order() {
        let query = ResourceQuery {
            search: "rust".into(),
            category: CategoryFilter::Only("Programming".into()),
            favorites_only: true,
        };
        let got = filter_resources(&catalog(), &query, &[3, 1]);
        assert_eq!(ids(&got), vec![1, 3]);
        assert!(got.iter().all(|e| e.is_favorite));
    }

    #[test]
    fn favorite_flag_is_set_without_favorites_only() {
        let got = filter_resources(&catalog(), &ResourceQuery::default(), &[2]);
        assert_eq!(ids(&got), vec![1, 2, 3, 4]);
        assert_eq!(got.iter().filter(|e| e.is_favorite).count(), 1);
        assert!(got[1].is_favorite);
    }
}
