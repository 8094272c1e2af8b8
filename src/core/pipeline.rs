use crate::adapters::git_source::GitCommitSource;
use crate::adapters::html::render_archive;
use crate::adapters::registry_source::{FileRegistrySource, HttpRegistrySource};
use crate::core::aggregator::aggregate;
use crate::core::classifier::CommitClassifier;
use crate::core::ranker::rank;
use crate::core::registry::RegistryIndex;
use crate::core::resolver::DomainResolver;
use crate::domain::model::{
    Institution, PatchArchive, RankedEntry, Report, ReportMeta, TransformResult,
};
use crate::domain::ports::{CommitSource, ConfigProvider, Pipeline, RegistrySource, Storage};
use crate::utils::error::{Result, StatsError};
use crate::utils::progress::CommitProgress;
use std::io::Write;
use std::time::Duration;
use zip::write::{FileOptions, ZipWriter};

pub const RESULT_FILE: &str = "result.json";
pub const SUMMARY_FILE: &str = "summary.csv";
pub const DETAIL_DIR: &str = "detail";
pub const ARCHIVE_FILE: &str = "report.zip";

/// Runs the whole core over one commit source: classify, aggregate, rank.
pub fn build_report(
    institutions: Vec<Institution>,
    source: &dyn CommitSource,
    repo_label: &str,
    branch: &str,
    progress: &CommitProgress,
) -> Result<TransformResult> {
    let index = RegistryIndex::new(institutions);
    let mut resolver = DomainResolver::new(&index);
    let tip = source.tip()?;

    let mut classifier = CommitClassifier::new(&mut resolver);
    if let Err(e) = classifier.consume(source.commits()?, || progress.inc()) {
        progress.abandon();
        return Err(e);
    }
    progress.finish();
    let (accumulators, _) = classifier.finish();

    let mut data = rank(aggregate(accumulators, &mut resolver));
    tracing::debug!("{} domains cached as unmatched", resolver.cached_unmatched());

    let archives = data.iter_mut().map(PatchArchive::take_from).collect();

    Ok(TransformResult {
        report: Report {
            meta: ReportMeta {
                update: chrono::Local::now().to_rfc3339(),
                repo: repo_label.to_string(),
                branch: branch.to_string(),
                commit: tip,
            },
            data,
        },
        archives,
    })
}

/// Ranking table, one row per entry.
pub fn summary_csv(data: &[RankedEntry]) -> Result<Vec<u8>> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(["rank", "id", "name", "count", "lines", "contributor_count", "domains"])?;
    for ranked in data {
        writer.write_record([
            ranked.rank.to_string(),
            ranked.id.to_string(),
            ranked.entry.name.clone(),
            ranked.entry.count.to_string(),
            ranked.entry.lines.to_string(),
            ranked.contributor_count.to_string(),
            ranked.entry.domains.join(";"),
        ])?;
    }
    writer
        .into_inner()
        .map_err(|e| StatsError::IoError(e.into_error()))
}

/// Progress display for a walk; the total is only counted on request,
/// since counting costs a full extra walk.
pub fn commit_progress(
    source: &dyn CommitSource,
    show_progress: bool,
    count_commits: bool,
) -> CommitProgress {
    if !show_progress {
        return CommitProgress::hidden();
    }
    let total = if count_commits { source.size_hint() } else { None };
    if let Some(total) = total {
        tracing::info!("Total commits: {}", total);
    }
    CommitProgress::new(total)
}

/// Owned inputs of the blocking commit walk.
struct WalkJob {
    repo_path: String,
    branch: String,
    repo_label: String,
    show_progress: bool,
    count_commits: bool,
}

impl WalkJob {
    fn run(self, registry: Vec<Institution>) -> Result<TransformResult> {
        tracing::info!(
            "🔍 Walking {} ({}) at {}",
            self.repo_label,
            self.branch,
            self.repo_path
        );
        let source = GitCommitSource::open(&self.repo_path, self.branch.as_str())?;
        let progress = commit_progress(&source, self.show_progress, self.count_commits);

        build_report(registry, &source, &self.repo_label, &self.branch, &progress)
    }
}

pub struct ContributionPipeline<S: Storage, C: ConfigProvider> {
    storage: S,
    config: C,
    registry: Box<dyn RegistrySource>,
    show_progress: bool,
}

impl<S: Storage, C: ConfigProvider> ContributionPipeline<S, C> {
    pub fn new(storage: S, config: C) -> Self {
        let timeout = Duration::from_secs(config.registry_timeout_seconds());
        let registry: Box<dyn RegistrySource> = match config.registry_file() {
            Some(file) => Box::new(FileRegistrySource::new(file)),
            None => Box::new(HttpRegistrySource::new(config.registry_url(), timeout)),
        };

        Self {
            storage,
            config,
            registry,
            show_progress: true,
        }
    }

    pub fn with_progress(mut self, show_progress: bool) -> Self {
        self.show_progress = show_progress;
        self
    }

    fn zip_bundle(&self, files: &[(String, Vec<u8>)]) -> Result<Vec<u8>> {
        let mut zip = ZipWriter::new(std::io::Cursor::new(Vec::new()));
        for (name, data) in files {
            zip.start_file::<_, ()>(name.as_str(), FileOptions::default())?;
            zip.write_all(data)?;
        }
        let cursor = zip.finish()?;
        Ok(cursor.into_inner())
    }
}

#[async_trait::async_trait]
impl<S: Storage, C: ConfigProvider> Pipeline for ContributionPipeline<S, C> {
    async fn extract(&self) -> Result<Vec<Institution>> {
        self.registry.fetch().await
    }

    async fn transform(&self, registry: Vec<Institution>) -> Result<TransformResult> {
        let job = WalkJob {
            repo_path: self.config.repo_path().to_string(),
            branch: self.config.branch().to_string(),
            repo_label: self.config.repo_label().to_string(),
            show_progress: self.show_progress,
            count_commits: self.config.count_commits(),
        };

        // git2 是同步 API，整段走訪放到 blocking 執行緒
        tokio::task::spawn_blocking(move || job.run(registry))
            .await
            .map_err(|e| StatsError::ProcessingError {
                message: format!("commit walk task failed: {}", e),
            })?
    }

    async fn load(&self, result: TransformResult) -> Result<String> {
        let output_path = format!("{}/{}", self.config.output_path(), RESULT_FILE);
        let mut files: Vec<(String, Vec<u8>)> = Vec::new();

        let json_data = serde_json::to_vec_pretty(&result.report)?;
        self.storage.write_file(RESULT_FILE, &json_data).await?;
        tracing::info!("💾 Result saved to {}", output_path);
        files.push((RESULT_FILE.to_string(), json_data));

        let csv_data = summary_csv(&result.report.data)?;
        self.storage.write_file(SUMMARY_FILE, &csv_data).await?;
        files.push((SUMMARY_FILE.to_string(), csv_data));

        // 先清空 detail 目錄再寫入分頁
        self.storage.clear_dir(DETAIL_DIR).await?;
        let mut page_total = 0;
        for archive in &result.archives {
            for page in render_archive(archive, self.config.page_size()) {
                let path = format!("{}/{}", DETAIL_DIR, page.file_name);
                self.storage.write_file(&path, page.html.as_bytes()).await?;
                if self.config.archive_enabled() {
                    files.push((path, page.html.into_bytes()));
                }
                page_total += 1;
            }
        }
        tracing::info!("📄 Wrote {} detail pages to {}/", page_total, DETAIL_DIR);

        if self.config.archive_enabled() {
            let zip_data = self.zip_bundle(&files)?;
            tracing::debug!("Writing ZIP file ({} bytes) to storage", zip_data.len());
            self.storage.write_file(ARCHIVE_FILE, &zip_data).await?;
            tracing::info!("📦 Bundle saved to {}/{}", self.config.output_path(), ARCHIVE_FILE);
        }

        Ok(output_path)
    }
}
