use crate::domain::model::{AggregatedEntry, RankedEntry};

/// Orders entries by `(count, lines)` descending and numbers them.
///
/// `id` is the 1-based position. `rank` only looks at `count`: an entry whose
/// count equals the previous entry's count shares its rank, even when the
/// line totals differ.
pub fn rank(mut entries: Vec<AggregatedEntry>) -> Vec<RankedEntry> {
    entries.sort_by(|a, b| (b.count, b.lines).cmp(&(a.count, a.lines)));

    let mut ranked: Vec<RankedEntry> = Vec::with_capacity(entries.len());
    for (position, entry) in entries.into_iter().enumerate() {
        let id = position + 1;
        let rank = match ranked.last() {
            Some(previous) if previous.entry.count == entry.count => previous.rank,
            _ => id,
        };
        ranked.push(RankedEntry {
            id,
            rank,
            contributor_count: entry.authors.len(),
            entry,
        });
    }
    ranked
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(name: &str, count: usize, lines: usize) -> AggregatedEntry {
        AggregatedEntry {
            name: name.to_string(),
            domains: vec![format!("{}.edu", name)],
            university: None,
            count,
            lines,
            authors: Vec::new(),
            patches: Vec::new(),
        }
    }

    fn summary(ranked: &[RankedEntry]) -> Vec<(&str, usize, usize)> {
        ranked
            .iter()
            .map(|r| (r.entry.name.as_str(), r.id, r.rank))
            .collect()
    }

    #[test]
    fn test_equal_counts_share_rank() {
        let ranked = rank(vec![entry("c", 3, 50), entry("b", 5, 10), entry("a", 5, 20)]);

        assert_eq!(summary(&ranked), vec![("a", 1, 1), ("b", 2, 1), ("c", 3, 3)]);
    }

    #[test]
    fn test_full_key_ties_keep_input_order() {
        let ranked = rank(vec![entry("first", 2, 7), entry("second", 2, 7), entry("top", 9, 0)]);

        assert_eq!(
            summary(&ranked),
            vec![("top", 1, 1), ("first", 2, 2), ("second", 3, 2)]
        );
    }

    #[test]
    fn test_rank_restarts_after_a_different_count() {
        let ranked = rank(vec![
            entry("a", 4, 0),
            entry("b", 4, 0),
            entry("c", 4, 0),
            entry("d", 2, 0),
            entry("e", 2, 0),
            entry("f", 1, 0),
        ]);

        let ranks: Vec<_> = ranked.iter().map(|r| r.rank).collect();
        assert_eq!(ranks, vec![1, 1, 1, 4, 4, 6]);
        assert!(ranked.windows(2).all(|w| w[0].rank <= w[1].rank));
    }

    #[test]
    fn test_contributor_count_and_empty_input() {
        let mut with_authors = entry("a", 1, 1);
        with_authors.authors = vec![
            crate::domain::model::AuthorSummary {
                email: "x@a.edu".to_string(),
                name: "X".to_string(),
                count: 1,
                commits: Vec::new(),
            };
            2
        ];

        let ranked = rank(vec![with_authors]);
        assert_eq!(ranked[0].contributor_count, 2);
        assert!(rank(Vec::new()).is_empty());
    }
}
