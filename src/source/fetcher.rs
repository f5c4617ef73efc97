use crate::model::SourceError;
use crate::source::traits::DatasetSource;
use reqwest::Client;
use std::path::PathBuf;
use std::time::Duration;
use tracing::debug;

/// Order table stored on the local filesystem.
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait::async_trait]
impl DatasetSource for FileSource {
    fn identity(&self) -> String {
        format!("file:{}", self.path.display())
    }

    async fn fetch(&self) -> Result<String, SourceError> {
        debug!(path = %self.path.display(), "Reading dataset file");
        tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|source| SourceError::Io {
                path: self.path.display().to_string(),
                source,
            })
    }
}

/// Order table downloaded over HTTP.
pub struct HttpSource {
    client: Client,
    url: String,
}

impl HttpSource {
    pub fn new(url: impl Into<String>) -> Self {
        Self::with_client(Client::new(), url)
    }

    pub fn with_client(client: Client, url: impl Into<String>) -> Self {
        Self {
            client,
            url: url.into(),
        }
    }
}

#[async_trait::async_trait]
impl DatasetSource for HttpSource {
    fn identity(&self) -> String {
        self.url.clone()
    }

    async fn fetch(&self) -> Result<String, SourceError> {
        debug!(url = %self.url, "Downloading dataset");
        let response = self
            .client
            .get(&self.url)
            .timeout(Duration::from_secs(30))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(SourceError::InvalidResponse(response.status().as_u16()));
        }

        Ok(response.text().await?)
    }
}
