use crate::adapters::registry_source::DEFAULT_REGISTRY_URL;
use crate::adapters::html::DEFAULT_PAGE_SIZE;
use crate::config::MAX_REGISTRY_TIMEOUT_SECONDS;
use crate::domain::ports::ConfigProvider;
use crate::utils::error::{Result, StatsError};
use crate::utils::validation::Validate;
use serde::{Deserialize, Serialize};
use std::path::Path;

const DEFAULT_REGISTRY_TIMEOUT_SECONDS: u64 = 30;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TomlConfig {
    pub repository: RepositoryConfig,
    #[serde(default)]
    pub registry: RegistryConfig,
    pub output: OutputConfig,
    pub monitoring: Option<MonitoringConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RepositoryConfig {
    pub path: String,
    pub branch: Option<String>,
    pub label: Option<String>,
    /// 預先計算 commit 總數以顯示進度條
    pub count_commits: Option<bool>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RegistryConfig {
    pub url: Option<String>,
    pub file: Option<String>,
    pub timeout_seconds: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    pub path: String,
    pub page_size: Option<usize>,
    pub archive: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonitoringConfig {
    pub enabled: bool,
    pub log_format: Option<String>,
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(StatsError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        // 處理環境變數替換
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| StatsError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${REPO_PATH})，未設定的保持原樣
    fn substitute_env_vars(content: &str) -> Result<String> {
        use regex::Regex;
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| StatsError::ConfigError {
            message: format!("invalid substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    /// 驗證配置的合理性
    pub fn validate_config(&self) -> Result<()> {
        use crate::utils::validation::*;

        validate_path("repository.path", &self.repository.path)?;
        validate_branch("repository.branch", self.branch())?;

        match &self.registry.file {
            Some(file) => validate_registry_file("registry.file", file)?,
            None => validate_registry_url("registry.url", self.registry_url())?,
        }
        validate_range(
            "registry.timeout_seconds",
            self.registry_timeout_seconds(),
            1,
            MAX_REGISTRY_TIMEOUT_SECONDS,
        )?;

        validate_path("output.path", &self.output.path)?;
        validate_page_size("output.page_size", self.page_size())?;

        if let Some(format) = self.monitoring.as_ref().and_then(|m| m.log_format.as_deref()) {
            validate_one_of("monitoring.log_format", format, crate::config::LOG_FORMATS)?;
        }

        Ok(())
    }

    /// 取得監控設定
    pub fn monitoring_enabled(&self) -> bool {
        self.monitoring.as_ref().map(|m| m.enabled).unwrap_or(false)
    }

    pub fn log_format(&self) -> Option<&str> {
        self.monitoring.as_ref().and_then(|m| m.log_format.as_deref())
    }
}

impl ConfigProvider for TomlConfig {
    fn repo_path(&self) -> &str {
        &self.repository.path
    }

    fn branch(&self) -> &str {
        self.repository.branch.as_deref().unwrap_or("master")
    }

    fn repo_label(&self) -> &str {
        self.repository.label.as_deref().unwrap_or(&self.repository.path)
    }

    fn registry_url(&self) -> &str {
        self.registry.url.as_deref().unwrap_or(DEFAULT_REGISTRY_URL)
    }

    fn registry_file(&self) -> Option<&str> {
        self.registry.file.as_deref()
    }

    fn registry_timeout_seconds(&self) -> u64 {
        self.registry
            .timeout_seconds
            .unwrap_or(DEFAULT_REGISTRY_TIMEOUT_SECONDS)
    }

    fn output_path(&self) -> &str {
        &self.output.path
    }

    fn page_size(&self) -> usize {
        self.output.page_size.unwrap_or(DEFAULT_PAGE_SIZE)
    }

    fn archive_enabled(&self) -> bool {
        self.output.archive.unwrap_or(false)
    }

    fn count_commits(&self) -> bool {
        self.repository.count_commits.unwrap_or(false)
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}
