use crate::utils::ordered_map::OrderedMap;
use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

/// 機構記錄；`name` 與 `domains` 以外的欄位原樣保留並輸出
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Institution {
    pub name: String,
    pub domains: Vec<String>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl Institution {
    pub fn new(name: impl Into<String>, domains: &[&str]) -> Self {
        Self {
            name: name.into(),
            domains: domains.iter().map(|d| d.to_string()).collect(),
            extra: serde_json::Map::new(),
        }
    }
}

/// One commit as delivered by a commit source.
#[derive(Debug, Clone)]
pub struct CommitRecord {
    pub id: String,
    pub author_email: Option<String>,
    pub author_name: String,
    pub summary: String,
    pub authored_at: DateTime<FixedOffset>,
    pub insertions: usize,
    pub deletions: usize,
    pub files_changed: usize,
    pub patch: String,
}

impl CommitRecord {
    pub fn total_lines(&self) -> usize {
        self.insertions + self.deletions
    }

    pub fn line_delta(&self) -> String {
        format!("-{}/+{}", self.deletions, self.insertions)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommitDetail {
    pub commit: String,
    pub summary: String,
    pub date: String,
    pub files: usize,
    pub lines: String,
}

impl From<&CommitRecord> for CommitDetail {
    fn from(record: &CommitRecord) -> Self {
        Self {
            commit: record.id.clone(),
            summary: record.summary.clone(),
            date: record.authored_at.to_rfc3339(),
            files: record.files_changed,
            lines: record.line_delta(),
        }
    }
}

/// Per-author accumulation inside one email domain. The commit count is the
/// length of `commits`.
#[derive(Debug, Clone, Default)]
pub struct AuthorAccumulator {
    pub display_name: String,
    pub commits: Vec<CommitDetail>,
}

impl AuthorAccumulator {
    pub fn commit_count(&self) -> usize {
        self.commits.len()
    }
}

#[derive(Debug, Clone, Default)]
pub struct DomainAccumulator {
    pub patch_count: usize,
    pub line_total: usize,
    pub patches: Vec<String>,
    pub authors: OrderedMap<String, AuthorAccumulator>,
}

/// Email domain → accumulation, in first-seen order.
pub type DomainAccumulators = OrderedMap<String, DomainAccumulator>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthorSummary {
    pub email: String,
    pub name: String,
    pub count: usize,
    pub commits: Vec<CommitDetail>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AggregatedEntry {
    pub name: String,
    pub domains: Vec<String>,
    pub university: Option<Institution>,
    pub count: usize,
    pub lines: usize,
    pub authors: Vec<AuthorSummary>,
    /// Raw patches in domain-then-commit order.
    #[serde(skip)]
    pub patches: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedEntry {
    #[serde(flatten)]
    pub entry: AggregatedEntry,
    pub id: usize,
    pub rank: usize,
    pub contributor_count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportMeta {
    pub update: String,
    pub repo: String,
    pub branch: String,
    pub commit: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct Report {
    pub meta: ReportMeta,
    pub data: Vec<RankedEntry>,
}

/// Input handed to the page renderer for one ranked entry.
#[derive(Debug, Clone, PartialEq)]
pub struct PatchArchive {
    pub id: usize,
    pub title: String,
    pub patches: Vec<String>,
}

impl PatchArchive {
    /// Moves the entry's patches into a new archive.
    pub fn take_from(ranked: &mut RankedEntry) -> Self {
        Self {
            id: ranked.id,
            title: format!("Patches contributed by {}", ranked.entry.name),
            patches: std::mem::take(&mut ranked.entry.patches),
        }
    }
}

#[derive(Debug, Clone)]
pub struct TransformResult {
    pub report: Report,
    pub archives: Vec<PatchArchive>,
}
