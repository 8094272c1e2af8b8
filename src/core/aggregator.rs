use crate::core::resolver::DomainResolver;
use crate::domain::model::{
    AggregatedEntry, AuthorAccumulator, AuthorSummary, DomainAccumulator, DomainAccumulators,
    Institution,
};
use crate::utils::ordered_map::OrderedMap;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum BucketKey {
    Institution(String),
    Unmatched(String),
}

/// Buckets in creation order.
#[derive(Debug, Clone, Default)]
pub struct AggregationState {
    buckets: OrderedMap<BucketKey, AggregatedEntry>,
}

impl AggregationState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &BucketKey) -> Option<&AggregatedEntry> {
        self.buckets.get(key)
    }

    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    pub fn into_entries(self) -> Vec<AggregatedEntry> {
        self.buckets.into_values().collect()
    }
}

/// Author list of one domain, most commits first; ties keep first-seen order.
pub fn author_summaries(authors: &OrderedMap<String, AuthorAccumulator>) -> Vec<AuthorSummary> {
    let mut summaries: Vec<AuthorSummary> = authors
        .iter()
        .map(|(email, author)| AuthorSummary {
            email: email.clone(),
            name: author.display_name.clone(),
            count: author.commit_count(),
            commits: author.commits.clone(),
        })
        .collect();
    sort_authors(&mut summaries);
    summaries
}

fn sort_authors(authors: &mut [AuthorSummary]) {
    // sort_by is stable
    authors.sort_by(|a, b| b.count.cmp(&a.count));
}

/// Merges one email domain's accumulation into the state.
///
/// An unmatched domain gets its own `Unknown (<domain>)` bucket; the
/// classifier never accumulates unmatched domains, so only accumulators
/// built elsewhere reach it. A matched
/// domain joins its institution's bucket; a domain already present in that
/// bucket is not merged a second time.
pub fn merge_domain(
    mut state: AggregationState,
    domain: &str,
    accumulator: DomainAccumulator,
    institution: Option<&Institution>,
) -> AggregationState {
    let key = match institution {
        Some(institution) => BucketKey::Institution(institution.name.clone()),
        None => BucketKey::Unmatched(domain.to_string()),
    };

    let entry = state.buckets.get_or_insert_with(key, || AggregatedEntry {
        name: match institution {
            Some(institution) => institution.name.clone(),
            None => format!("Unknown ({})", domain),
        },
        domains: Vec::new(),
        university: institution.cloned(),
        count: 0,
        lines: 0,
        authors: Vec::new(),
        patches: Vec::new(),
    });

    if entry.domains.iter().any(|d| d == domain) {
        tracing::debug!("Domain {} already merged into {}", domain, entry.name);
        return state;
    }

    entry.domains.push(domain.to_string());
    entry.authors.extend(author_summaries(&accumulator.authors));
    sort_authors(&mut entry.authors);
    entry.count += accumulator.patch_count;
    entry.lines += accumulator.line_total;
    entry.patches.extend(accumulator.patches);

    state
}

/// Rolls every accumulated domain up into institution-level entries.
pub fn aggregate(
    accumulators: DomainAccumulators,
    resolver: &mut DomainResolver<'_>,
) -> Vec<AggregatedEntry> {
    let domain_count = accumulators.len();
    let state = accumulators
        .into_iter()
        .fold(AggregationState::new(), |state, (domain, accumulator)| {
            let institution = resolver.resolve(&domain);
            merge_domain(state, &domain, accumulator, institution)
        });

    tracing::info!(
        "Aggregated {} domains into {} entries",
        domain_count,
        state.len()
    );
    state.into_entries()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::classifier::tests::commit;
    use crate::core::classifier::CommitClassifier;
    use crate::core::registry::RegistryIndex;
    use crate::domain::model::CommitDetail;

    fn accumulator(authors: &[(&str, usize)], lines: usize) -> DomainAccumulator {
        let mut acc = DomainAccumulator::default();
        for (email, count) in authors {
            let author = acc.authors.get_or_insert_with(email.to_string(), || AuthorAccumulator {
                display_name: email.to_string(),
                commits: Vec::new(),
            });
            for n in 0..*count {
                author.commits.push(CommitDetail {
                    commit: format!("{}-{}", email, n),
                    summary: String::new(),
                    date: String::new(),
                    files: 1,
                    lines: "-0/+1".to_string(),
                });
                acc.patches.push(format!("{}-{}", email, n));
            }
            acc.patch_count += count;
        }
        acc.line_total = lines;
        acc
    }

    #[test]
    fn test_merges_domains_of_one_institution() {
        let index = RegistryIndex::new(vec![Institution::new("Foo Univ", &["foo.edu", "cs.foo.edu"])]);
        let mut resolver = DomainResolver::new(&index);
        let mut classifier = CommitClassifier::new(&mut resolver);

        for i in 0..3 {
            let lines = if i == 0 { 4 } else { 3 };
            classifier.classify(commit(&format!("a{}", i), Some("a@foo.edu"), 0, lines));
        }
        for i in 0..2 {
            let lines = if i == 0 { 2 } else { 3 };
            classifier.classify(commit(&format!("b{}", i), Some("b@cs.foo.edu"), lines, 0));
        }
        let (accumulators, stats) = classifier.finish();

        let entries = aggregate(accumulators, &mut resolver);
        assert_eq!(entries.len(), 1);

        let foo = &entries[0];
        assert_eq!(foo.name, "Foo Univ");
        assert_eq!(foo.count, 5);
        assert_eq!(foo.lines, 15);
        assert_eq!(foo.domains, vec!["foo.edu", "cs.foo.edu"]);
        assert_eq!(foo.authors.len(), 2);
        assert_eq!(foo.university.as_ref().unwrap().name, "Foo Univ");
        assert_eq!(foo.patches, vec!["patch a0", "patch a1", "patch a2", "patch b0", "patch b1"]);

        let total: usize = entries.iter().map(|e| e.count).sum();
        assert_eq!(total, stats.classified);
    }

    #[test]
    fn test_unmatched_domain_gets_unknown_entry() {
        let acc = accumulator(&[("x@lab.org", 2)], 8);
        let state = merge_domain(AggregationState::new(), "lab.org", acc, None);

        let entry = state.get(&BucketKey::Unmatched("lab.org".to_string())).unwrap();
        assert_eq!(entry.name, "Unknown (lab.org)");
        assert_eq!(entry.domains, vec!["lab.org"]);
        assert_eq!(entry.university, None);
        assert_eq!(entry.count, 2);
        assert_eq!(entry.lines, 8);
    }

    #[test]
    fn test_same_domain_merges_once() {
        let foo = Institution::new("Foo Univ", &["foo.edu"]);
        let acc = accumulator(&[("a@foo.edu", 3)], 10);

        let state = merge_domain(AggregationState::new(), "foo.edu", acc.clone(), Some(&foo));
        let state = merge_domain(state, "foo.edu", acc, Some(&foo));

        let entry = state.get(&BucketKey::Institution("Foo Univ".to_string())).unwrap();
        assert_eq!(entry.domains, vec!["foo.edu"]);
        assert_eq!(entry.count, 3);
        assert_eq!(entry.lines, 10);
        assert_eq!(entry.authors.len(), 1);
        assert_eq!(entry.patches.len(), 3);
    }

    #[test]
    fn test_authors_sorted_desc_with_stable_ties() {
        let foo = Institution::new("Foo Univ", &["foo.edu", "cs.foo.edu"]);
        let first = accumulator(&[("a@foo.edu", 1), ("b@foo.edu", 3), ("c@foo.edu", 2)], 0);
        let second = accumulator(&[("d@cs.foo.edu", 2), ("e@cs.foo.edu", 3)], 0);

        let state = merge_domain(AggregationState::new(), "foo.edu", first, Some(&foo));
        let state = merge_domain(state, "cs.foo.edu", second, Some(&foo));
        let entries = state.into_entries();

        let emails: Vec<_> = entries[0].authors.iter().map(|a| a.email.as_str()).collect();
        assert_eq!(
            emails,
            vec!["b@foo.edu", "e@cs.foo.edu", "c@foo.edu", "d@cs.foo.edu", "a@foo.edu"]
        );
        assert!(entries[0].authors.windows(2).all(|w| w[0].count >= w[1].count));
    }

    #[test]
    fn test_emission_order_follows_bucket_creation() {
        let foo = Institution::new("Foo Univ", &["foo.edu"]);
        let bar = Institution::new("Bar Univ", &["bar.ac.cn"]);
        let acc = accumulator(&[("z@x", 1)], 1);

        let state = merge_domain(AggregationState::new(), "bar.ac.cn", acc.clone(), Some(&bar));
        let state = merge_domain(state, "other.org", acc.clone(), None);
        let state = merge_domain(state, "foo.edu", acc.clone(), Some(&foo));
        let state = merge_domain(state, "mail.bar.ac.cn", acc, Some(&bar));

        let names: Vec<_> = state.into_entries().into_iter().map(|e| e.name).collect();
        assert_eq!(names, vec!["Bar Univ", "Unknown (other.org)", "Foo Univ"]);
    }
}
