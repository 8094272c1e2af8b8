use crate::domain::model::{CommitRecord, Institution, TransformResult};
use crate::utils::error::Result;
use async_trait::async_trait;

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
    fn clear_dir(&self, path: &str) -> impl std::future::Future<Output = Result<()>> + Send;
}

pub trait ConfigProvider: Send + Sync {
    fn repo_path(&self) -> &str;
    fn branch(&self) -> &str;
    fn repo_label(&self) -> &str;
    fn registry_url(&self) -> &str;
    fn registry_file(&self) -> Option<&str>;
    fn registry_timeout_seconds(&self) -> u64;
    fn output_path(&self) -> &str;
    fn page_size(&self) -> usize;
    fn archive_enabled(&self) -> bool;
    /// Count the walk up front so the progress bar has a total.
    fn count_commits(&self) -> bool {
        false
    }
}

/// Supplies the ordered institution list.
#[async_trait]
pub trait RegistrySource: Send + Sync {
    async fn fetch(&self) -> Result<Vec<Institution>>;
}

pub type CommitIter<'a> = Box<dyn Iterator<Item = Result<CommitRecord>> + 'a>;

/// Supplies commit records in walk order.
pub trait CommitSource {
    /// Commit id the walk starts from.
    fn tip(&self) -> Result<String>;
    /// Number of commits the walk will yield, when cheaply known.
    fn size_hint(&self) -> Option<u64> {
        None
    }
    fn commits(&self) -> Result<CommitIter<'_>>;
}

#[async_trait]
pub trait Pipeline: Send + Sync {
    async fn extract(&self) -> Result<Vec<Institution>>;
    async fn transform(&self, registry: Vec<Institution>) -> Result<TransformResult>;
    async fn load(&self, result: TransformResult) -> Result<String>;
}
