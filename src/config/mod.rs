pub mod toml_config;

#[cfg(feature = "cli")]
use crate::adapters::registry_source::DEFAULT_REGISTRY_URL;
#[cfg(feature = "cli")]
use crate::domain::ports::ConfigProvider;
#[cfg(feature = "cli")]
use crate::utils::error::Result;
#[cfg(feature = "cli")]
use crate::utils::validation::{
    validate_branch, validate_one_of, validate_page_size, validate_path, validate_range,
    validate_registry_file, validate_registry_url, Validate,
};
#[cfg(feature = "cli")]
use clap::Parser;
#[cfg(feature = "cli")]
use serde::{Deserialize, Serialize};

pub const LOG_FORMATS: &[&str] = &["compact", "json"];
pub const MAX_REGISTRY_TIMEOUT_SECONDS: u64 = 600;

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Serialize, Deserialize, Parser)]
#[command(name = "git-uni-stats")]
#[command(about = "Rank institutions by commits contributed to a git repository")]
pub struct CliConfig {
    /// Path to the local git repository
    #[arg(long, default_value = "/tmp/linux")]
    pub path: String,

    /// Branch to walk
    #[arg(long, default_value = "master")]
    pub branch: String,

    /// Repository label written to the report
    #[arg(long, default_value = "Linux Mainline")]
    pub repo: String,

    #[arg(long, default_value = DEFAULT_REGISTRY_URL)]
    pub registry_url: String,

    /// Read the institution list from a local JSON file instead of downloading it
    #[arg(long)]
    pub registry_file: Option<String>,

    /// Registry download timeout in seconds
    #[arg(long, default_value = "30")]
    pub registry_timeout: u64,

    /// Output directory
    #[arg(long = "output", default_value = "./output")]
    pub output_path: String,

    /// Patches per detail page
    #[arg(long, default_value = "10")]
    pub page_size: usize,

    /// Also bundle every artifact into report.zip
    #[arg(long)]
    pub archive: bool,

    /// Count commits before the walk to show a total (walks the history twice)
    #[arg(long)]
    pub count_commits: bool,

    /// Load settings from a TOML file instead of the flags above
    #[arg(long)]
    pub config: Option<String>,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Log CPU and memory usage per phase")]
    pub monitor: bool,

    #[arg(long, default_value = "compact", help = "Log format: compact or json")]
    pub log_format: String,
}

#[cfg(feature = "cli")]
impl ConfigProvider for CliConfig {
    fn repo_path(&self) -> &str {
        &self.path
    }

    fn branch(&self) -> &str {
        &self.branch
    }

    fn repo_label(&self) -> &str {
        &self.repo
    }

    fn registry_url(&self) -> &str {
        &self.registry_url
    }

    fn registry_file(&self) -> Option<&str> {
        self.registry_file.as_deref()
    }

    fn registry_timeout_seconds(&self) -> u64 {
        self.registry_timeout
    }

    fn output_path(&self) -> &str {
        &self.output_path
    }

    fn page_size(&self) -> usize {
        self.page_size
    }

    fn archive_enabled(&self) -> bool {
        self.archive
    }

    fn count_commits(&self) -> bool {
        self.count_commits
    }
}

#[cfg(feature = "cli")]
impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        validate_path("path", &self.path)?;
        validate_branch("branch", &self.branch)?;
        match &self.registry_file {
            Some(file) => validate_registry_file("registry_file", file)?,
            None => validate_registry_url("registry_url", &self.registry_url)?,
        }
        validate_range(
            "registry_timeout",
            self.registry_timeout,
            1,
            MAX_REGISTRY_TIMEOUT_SECONDS,
        )?;
        validate_path("output_path", &self.output_path)?;
        validate_page_size("page_size", self.page_size)?;
        validate_one_of("log_format", &self.log_format, LOG_FORMATS)?;
        Ok(())
    }
}
