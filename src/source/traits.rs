use crate::model::SourceError;

#[async_trait::async_trait]
pub trait DatasetSource: Send + Sync {
    /// Stable key identifying where the data comes from. Used as the cache key.
    fn identity(&self) -> String;

    async fn fetch(&self) -> Result<String, SourceError>;
}
