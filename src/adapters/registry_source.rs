use crate::core::registry::parse_registry;
use crate::domain::model::Institution;
use crate::domain::ports::RegistrySource;
use crate::utils::error::{Result, StatsError};
use async_trait::async_trait;
use reqwest::Client;
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_REGISTRY_URL: &str =
    "https://github.com/Hipo/university-domains-list/raw/master/world_universities_and_domains.json";

/// Downloads the registry over HTTP(S), giving up after `timeout`.
pub struct HttpRegistrySource {
    client: Client,
    url: String,
    timeout: Duration,
}

impl HttpRegistrySource {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Self {
        Self {
            client: Client::new(),
            url: url.into(),
            timeout,
        }
    }
}

#[async_trait]
impl RegistrySource for HttpRegistrySource {
    async fn fetch(&self) -> Result<Vec<Institution>> {
        tracing::info!("🌐 Getting institution list from {}", self.url);

        let response = self
            .client
            .get(&self.url)
            .timeout(self.timeout)
            .send()
            .await?;
        tracing::debug!("Registry response status: {}", response.status());

        if !response.status().is_success() {
            return Err(StatsError::RegistryUnavailable {
                message: format!("{} answered {}", self.url, response.status()),
            });
        }

        let body = response.bytes().await?;
        let institutions = parse_registry(&body)?;
        tracing::info!("📚 Loaded {} institutions", institutions.len());
        Ok(institutions)
    }
}

/// Reads the registry from a local JSON file.
pub struct FileRegistrySource {
    path: PathBuf,
}

impl FileRegistrySource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl RegistrySource for FileRegistrySource {
    async fn fetch(&self) -> Result<Vec<Institution>> {
        tracing::info!("📁 Reading institution list from {}", self.path.display());

        let body = tokio::fs::read(&self.path)
            .await
            .map_err(|e| StatsError::RegistryUnavailable {
                message: format!("cannot read {}: {}", self.path.display(), e),
            })?;
        let institutions = parse_registry(&body)?;
        tracing::info!("📚 Loaded {} institutions", institutions.len());
        Ok(institutions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[tokio::test]
    async fn test_http_source_parses_registry() {
        let server = MockServer::start();
        let registry_mock = server.mock(|when, then| {
            when.method(GET).path("/world_universities_and_domains.json");
            then.status(200)
                .header("Content-Type", "application/json")
                .json_body(serde_json::json!([
                    {"name": "Foo Univ", "domains": ["foo.edu"], "country": "United States"},
                    {"name": "Bar Univ", "domains": ["bar.ac.cn"]}
                ]));
        });

        let source = HttpRegistrySource::new(
            server.url("/world_universities_and_domains.json"),
            Duration::from_secs(5),
        );
        let institutions = source.fetch().await.unwrap();

        registry_mock.assert();
        assert_eq!(institutions.len(), 2);
        assert_eq!(institutions[0].name, "Foo Univ");
        assert_eq!(institutions[1].domains, vec!["bar.ac.cn"]);
    }

    #[tokio::test]
    async fn test_http_source_fails_on_server_error() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/registry.json");
            then.status(503);
        });

        let source = HttpRegistrySource::new(server.url("/registry.json"), Duration::from_secs(5));
        let err = source.fetch().await.unwrap_err();
        assert!(matches!(err, StatsError::RegistryUnavailable { .. }));
    }

    #[tokio::test]
    async fn test_http_source_times_out() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/slow.json");
            then.status(200)
                .delay(Duration::from_millis(1500))
                .json_body(serde_json::json!([]));
        });

        let source = HttpRegistrySource::new(server.url("/slow.json"), Duration::from_millis(200));
        let err = source.fetch().await.unwrap_err();
        assert!(matches!(err, StatsError::RegistryRequestError(_)));
    }

    #[tokio::test]
    async fn test_file_source_reports_malformed_entry() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(br#"[{"name": "No Domains"}]"#).unwrap();

        let err = FileRegistrySource::new(file.path()).fetch().await.unwrap_err();
        assert!(matches!(err, StatsError::MalformedRegistryEntry { index: 0, .. }));
    }

    #[tokio::test]
    async fn test_file_source_missing_file_is_unavailable() {
        let err = FileRegistrySource::new("/nonexistent/registry.json")
            .fetch()
            .await
            .unwrap_err();
        assert!(matches!(err, StatsError::RegistryUnavailable { .. }));
    }
}
