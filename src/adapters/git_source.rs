use crate::domain::model::CommitRecord;
use crate::domain::ports::{CommitIter, CommitSource};
use crate::utils::error::{Result, StatsError};
use chrono::{DateTime, FixedOffset};
use git2::{Commit, DiffFormat, Oid, Repository, Revwalk, Sort};
use std::path::Path;

/// Walks one branch of a local repository, newest commit first.
pub struct GitCommitSource {
    repo: Repository,
    branch: String,
}

impl GitCommitSource {
    pub fn open<P: AsRef<Path>>(path: P, branch: impl Into<String>) -> Result<Self> {
        let repo = Repository::open(path.as_ref())?;
        tracing::debug!("Opened repository at {}", path.as_ref().display());
        Ok(Self {
            repo,
            branch: branch.into(),
        })
    }

    fn tip_oid(&self) -> Result<Oid> {
        let object = self.repo.revparse_single(&self.branch)?;
        Ok(object.peel_to_commit()?.id())
    }

    fn walk(&self) -> Result<Revwalk<'_>> {
        let mut walk = self.repo.revwalk()?;
        walk.push(self.tip_oid()?)?;
        walk.set_sorting(Sort::TIME)?;
        Ok(walk)
    }

    fn read_commit(&self, oid: Oid) -> Result<CommitRecord> {
        let commit = self.repo.find_commit(oid)?;
        let tree = commit.tree()?;
        let parent_tree = if commit.parent_count() > 0 {
            Some(commit.parent(0)?.tree()?)
        } else {
            None
        };

        let diff = self
            .repo
            .diff_tree_to_tree(parent_tree.as_ref(), Some(&tree), None)?;
        let stats = diff.stats()?;

        let author = commit.author();
        let email = String::from_utf8_lossy(author.email_bytes()).into_owned();
        let authored_at = signature_time(&author.when())?;

        let mut patch = show_header(&commit, &authored_at);
        diff.print(DiffFormat::Patch, |_delta, _hunk, line| {
            if matches!(line.origin(), '+' | '-' | ' ') {
                patch.push(line.origin());
            }
            patch.push_str(&String::from_utf8_lossy(line.content()));
            true
        })?;

        Ok(CommitRecord {
            id: oid.to_string(),
            author_email: (!email.is_empty()).then_some(email),
            author_name: String::from_utf8_lossy(author.name_bytes()).into_owned(),
            summary: commit.summary().unwrap_or_default().to_string(),
            authored_at,
            insertions: stats.insertions(),
            deletions: stats.deletions(),
            files_changed: stats.files_changed(),
            patch,
        })
    }
}

fn signature_time(when: &git2::Time) -> Result<DateTime<FixedOffset>> {
    let offset = FixedOffset::east_opt(when.offset_minutes() * 60).ok_or_else(|| {
        StatsError::ProcessingError {
            message: format!("invalid timezone offset {} minutes", when.offset_minutes()),
        }
    })?;
    let utc = DateTime::from_timestamp(when.seconds(), 0).ok_or_else(|| {
        StatsError::ProcessingError {
            message: format!("invalid commit timestamp {}", when.seconds()),
        }
    })?;
    Ok(utc.with_timezone(&offset))
}

/// Header in the layout of `git show`.
fn show_header(commit: &Commit<'_>, authored_at: &DateTime<FixedOffset>) -> String {
    let author = commit.author();
    let mut header = format!(
        "commit {}\nAuthor: {} <{}>\nDate:   {}\n\n",
        commit.id(),
        String::from_utf8_lossy(author.name_bytes()),
        String::from_utf8_lossy(author.email_bytes()),
        authored_at.format("%a %b %-d %H:%M:%S %Y %z")
    );
    for line in String::from_utf8_lossy(commit.message_bytes()).lines() {
        header.push_str("    ");
        header.push_str(line);
        header.push('\n');
    }
    header.push('\n');
    header
}

impl CommitSource for GitCommitSource {
    fn tip(&self) -> Result<String> {
        Ok(self.tip_oid()?.to_string())
    }

    /// Unsorted walk; only the count matters here.
    fn size_hint(&self) -> Option<u64> {
        let mut walk = self.repo.revwalk().ok()?;
        walk.push(self.tip_oid().ok()?).ok()?;
        Some(walk.count() as u64)
    }

    fn commits(&self) -> Result<CommitIter<'_>> {
        let walk = self.walk()?;
        Ok(Box::new(walk.map(move |oid| self.read_commit(oid?))))
    }
}
