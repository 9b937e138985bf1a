use std::collections::{BTreeMap, BTreeSet};

use super::markers::citation_markers;
use crate::models::Source;

/// Distinct indices cited in the body, markdown link text excluded.
pub fn cited_indices(body: &str) -> BTreeSet<u32> {
    citation_markers(body).filter_map(|marker| marker.index).collect()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CitedSources {
    /// Cited sources, ascending by original index.
    pub sources: Vec<Source>,
    /// Original index to displayed index. Currently always the identity.
    pub index_map: BTreeMap<u32, u32>,
}

/// Keeps only the cited sources and sorts them by index. Indices are not
/// compacted: a body citing `[1]` and `[3]` lists exactly 1 and 3.
pub fn filter_cited(sources: &[Source], cited: &BTreeSet<u32>) -> CitedSources {
    let mut kept: Vec<Source> = sources
        .iter()
        .filter(|source| cited.contains(&source.index))
        .cloned()
        .collect();
    kept.sort_by_key(|source| source.index);

    let index_map = kept.iter().map(|source| (source.index, source.index)).collect();

    CitedSources {
        sources: kept,
        index_map,
    }
}

/// Applies the displayed-index mapping to a filtered list.
pub fn renumber(cited: CitedSources) -> Vec<Source> {
    let CitedSources { sources, index_map } = cited;
    sources
        .into_iter()
        .map(|mut source| {
            if let Some(displayed) = index_map.get(&source.index) {
                source.index = *displayed;
            }
            source
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sources(indices: &[u32]) -> Vec<Source> {
        indices
            .iter()
            .map(|i| Source::new(*i, format!("T{}", i), format!("https://s/{}", i)))
            .collect()
    }

    #[test]
    fn collects_distinct_citations() {
        let cited = cited_indices("a [3] b [1] c [3] d [1][2]");
        assert_eq!(cited.into_iter().collect::<Vec<_>>(), vec![1, 2, 3]);
    }

    #[test]
    fn link_text_is_not_cited() {
        assert!(cited_indices("[1](http://x)").is_empty());
    }

    #[test]
    fn filters_and_sorts_without_compacting() {
        let cited = cited_indices("first [3], then [1]");
        let result = filter_cited(&sources(&[2, 3, 1]), &cited);
        let indices: Vec<u32> = result.sources.iter().map(|s| s.index).collect();
        assert_eq!(indices, vec![1, 3]);
        assert_eq!(result.index_map, BTreeMap::from([(1, 1), (3, 3)]));
    }

    #[test]
    fn uncited_sources_are_dropped() {
        let result = filter_cited(&sources(&[1, 2]), &BTreeSet::new());
        assert!(result.sources.is_empty());
        assert!(result.index_map.is_empty());
    }

    #[test]
    fn renumbering_is_identity() {
        let result = filter_cited(&sources(&[1, 4, 9]), &BTreeSet::from([4, 9]));
        let displayed = renumber(result.clone());
        assert_eq!(displayed, result.sources);
    }
}
