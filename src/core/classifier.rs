use crate::core::resolver::{email_domain, DomainResolver};
use crate::domain::model::{
    AuthorAccumulator, CommitDetail, CommitRecord, DomainAccumulator, DomainAccumulators,
};
use crate::utils::error::Result;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ClassifyStats {
    pub seen: usize,
    pub classified: usize,
    pub missing_email: usize,
    pub unmatched: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    Accumulated,
    MissingEmail,
    Unmatched,
}

/// Single pass over commit records, accumulating per email domain.
pub struct CommitClassifier<'r, 'a> {
    resolver: &'r mut DomainResolver<'a>,
    accumulators: DomainAccumulators,
    stats: ClassifyStats,
}

impl<'r, 'a> CommitClassifier<'r, 'a> {
    pub fn new(resolver: &'r mut DomainResolver<'a>) -> Self {
        Self {
            resolver,
            accumulators: DomainAccumulators::new(),
            stats: ClassifyStats::default(),
        }
    }

    pub fn classify(&mut self, commit: CommitRecord) -> Classification {
        self.stats.seen += 1;

        let email = match commit.author_email.as_deref() {
            Some(email) if !email.is_empty() => email.to_string(),
            _ => {
                self.stats.missing_email += 1;
                return Classification::MissingEmail;
            }
        };

        let domain = email_domain(&email);
        if self.resolver.resolve(domain).is_none() {
            self.stats.unmatched += 1;
            return Classification::Unmatched;
        }

        let detail = CommitDetail::from(&commit);
        let accumulator = self
            .accumulators
            .get_or_insert_with(domain.to_string(), DomainAccumulator::default);
        accumulator.patch_count += 1;
        accumulator.line_total += commit.total_lines();

        let author = accumulator
            .authors
            .get_or_insert_with(email.clone(), || AuthorAccumulator {
                display_name: commit.author_name.clone(),
                commits: Vec::new(),
            });
        author.commits.push(detail);

        accumulator.patches.push(commit.patch);
        self.stats.classified += 1;
        Classification::Accumulated
    }

    /// Drains `commits`, stopping at the first source error.
    pub fn consume<I>(&mut self, commits: I, mut on_commit: impl FnMut()) -> Result<()>
    where
        I: IntoIterator<Item = Result<CommitRecord>>,
    {
        for commit in commits {
            self.classify(commit?);
            on_commit();
        }
        Ok(())
    }

    pub fn stats(&self) -> ClassifyStats {
        self.stats
    }

    pub fn finish(self) -> (DomainAccumulators, ClassifyStats) {
        tracing::info!(
            "Classified {} of {} commits ({} without email, {} unmatched domains)",
            self.stats.classified,
            self.stats.seen,
            self.stats.missing_email,
            self.stats.unmatched
        );
        (self.accumulators, self.stats)
    }
}
