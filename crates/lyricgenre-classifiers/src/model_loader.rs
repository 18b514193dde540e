//! Model artifact loading
//!
//! Fetches the serialized artifact from its [`ModelSource`], optionally checks
//! its SHA-256 digest, and deserializes it into a [`LoadedModel`]. Fetch
//! failures are reported as [`Error::ArtifactUnreachable`]; anything wrong with
//! the fetched bytes is [`Error::ArtifactInvalid`].

use crate::classifier::Classifier;
use crate::genre::GenreLabel;
use crate::linear::LinearGenreClassifier;
use bytes::Bytes;
use hf_hub::{api::sync::Api, Repo, RepoType};
use lyricgenre_core::{Error, Result};
use sha2::{Digest, Sha256};
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};
use url::Url;

/// Default timeout for remote artifact downloads
pub const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(60);

const HF_SCHEME: &str = "hf://";

/// Source location for the model artifact
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModelSource {
    /// Load from local file system
    LocalPath(PathBuf),

    /// Download over HTTP(S)
    Remote(Url),

    /// Download from Hugging Face Hub
    HuggingFace {
        repo_id: String,
        revision: Option<String>,
        filename: String,
    },
}

impl ModelSource {
    /// Parse a source string
    ///
    /// `http://` and `https://` strings are remote URLs,
    /// `hf://owner/repo/path/to/file[@revision]` names a file on the Hugging
    /// Face Hub, and anything else is a local path.
    pub fn parse(source: &str) -> Result<Self> {
        if let Some(rest) = source.strip_prefix(HF_SCHEME) {
            return Self::parse_hf(rest);
        }

        if source.starts_with("http://") || source.starts_with("https://") {
            let url = Url::parse(source)
                .map_err(|e| Error::config(format!("Invalid model URL '{source}': {e}")))?;
            return Self::remote(url);
        }

        if source.contains("://") {
            return Err(Error::config(format!(
                "Unsupported model source scheme in '{source}', expected http, https or hf"
            )));
        }

        Ok(Self::LocalPath(PathBuf::from(source)))
    }

    /// Remote source, restricted to HTTP(S)
    pub fn remote(url: Url) -> Result<Self> {
        match url.scheme() {
            "http" | "https" => Ok(Self::Remote(url)),
            scheme => Err(Error::config(format!(
                "URL scheme '{scheme}' is not supported for model downloads"
            ))),
        }
    }

    fn parse_hf(rest: &str) -> Result<Self> {
        let (path, revision) = match rest.rsplit_once('@') {
            Some((path, rev)) if !rev.is_empty() => (path, Some(rev.to_string())),
            _ => (rest, None),
        };

        let mut parts = path.splitn(3, '/');
        match (parts.next(), parts.next(), parts.next()) {
            (Some(owner), Some(repo), Some(filename))
                if !owner.is_empty() && !repo.is_empty() && !filename.is_empty() =>
            {
                Ok(Self::HuggingFace {
                    repo_id: format!("{owner}/{repo}"),
                    revision,
                    filename: filename.to_string(),
                })
            }
            _ => Err(Error::config(format!(
                "Invalid Hugging Face source '{HF_SCHEME}{rest}', expected hf://owner/repo/file"
            ))),
        }
    }
}

impl fmt::Display for ModelSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::LocalPath(path) => write!(f, "{}", path.display()),
            Self::Remote(url) => write!(f, "{url}"),
            Self::HuggingFace {
                repo_id,
                revision,
                filename,
            } => {
                write!(f, "{HF_SCHEME}{repo_id}/{filename}")?;
                if let Some(rev) = revision {
                    write!(f, "@{rev}")?;
                }
                Ok(())
            }
        }
    }
}

/// Configuration for loading the model artifact
#[derive(Debug, Clone)]
pub struct ModelConfig {
    /// Source of the artifact
    pub source: ModelSource,

    /// Expected SHA-256 digest of the artifact bytes (hex)
    pub sha256: Option<String>,

    /// Timeout for remote downloads
    pub timeout: Duration,
}

impl ModelConfig {
    pub fn new(source: ModelSource) -> Self {
        Self {
            source,
            sha256: None,
            timeout: DEFAULT_FETCH_TIMEOUT,
        }
    }

    /// Create a new model configuration from local path
    pub fn from_local(path: impl Into<PathBuf>) -> Self {
        Self::new(ModelSource::LocalPath(path.into()))
    }

    /// Create a new model configuration from a URL
    pub fn from_url(url: &str) -> Result<Self> {
        let url = Url::parse(url).map_err(|e| Error::config(format!("Invalid model URL '{url}': {e}")))?;
        Ok(Self::new(ModelSource::remote(url)?))
    }

    /// Create a new model configuration from Hugging Face
    pub fn from_hf(repo_id: impl Into<String>, filename: impl Into<String>) -> Self {
        Self::new(ModelSource::HuggingFace {
            repo_id: repo_id.into(),
            revision: None,
            filename: filename.into(),
        })
    }

    /// Pin the expected SHA-256 digest
    pub fn with_sha256(mut self, digest: impl Into<String>) -> Self {
        self.sha256 = Some(digest.into());
        self
    }

    /// Set the download timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set Hugging Face revision
    pub fn with_revision(mut self, revision: impl Into<String>) -> Self {
        if let ModelSource::HuggingFace { revision: rev, .. } = &mut self.source {
            *rev = Some(revision.into());
        }
        self
    }
}

/// Metadata about the loaded artifact
#[derive(Debug, Clone)]
pub struct ModelMetadata {
    /// Model name
    pub name: String,

    /// Model version
    pub version: String,

    /// Closed label set
    pub labels: Vec<GenreLabel>,

    /// Where the artifact was loaded from
    pub source: String,

    /// SHA-256 digest of the artifact bytes (hex)
    pub sha256: String,

    /// Artifact size in bytes
    pub size_bytes: usize,
}

/// A loaded, read-only model ready for inference
///
/// Cloning is cheap and shares the same classifier.
#[derive(Clone)]
pub struct LoadedModel {
    classifier: Arc<LinearGenreClassifier>,
    metadata: Arc<ModelMetadata>,
}

impl LoadedModel {
    /// Fetch and deserialize the artifact described by `config`
    pub async fn load(config: &ModelConfig) -> Result<Self> {
        info!("Loading model artifact from {}", config.source);
        let bytes = fetch_artifact(config).await?;
        let model = Self::from_bytes(&bytes, &config.source.to_string(), config.sha256.as_deref())?;
        info!(
            "Loaded model '{}' version '{}' with {} labels",
            model.metadata.name,
            model.metadata.version,
            model.metadata.labels.len()
        );
        Ok(model)
    }

    /// Deserialize already fetched artifact bytes
    pub fn from_bytes(bytes: &[u8], source: &str, expected_sha256: Option<&str>) -> Result<Self> {
        let digest = sha256_hex(bytes);
        if let Some(expected) = expected_sha256 {
            if !digest.eq_ignore_ascii_case(expected.trim()) {
                return Err(Error::invalid(format!(
                    "artifact digest mismatch: expected {expected}, got {digest}"
                )));
            }
        }

        let classifier = LinearGenreClassifier::from_bytes(bytes)?;
        debug!(
            "Artifact {} has {} vocabulary entries",
            source,
            classifier.vocabulary_size()
        );

        let metadata = ModelMetadata {
            name: classifier.name().to_string(),
            version: classifier.version().to_string(),
            labels: classifier.labels().to_vec(),
            source: source.to_string(),
            sha256: digest,
            size_bytes: bytes.len(),
        };

        Ok(Self {
            classifier: Arc::new(classifier),
            metadata: Arc::new(metadata),
        })
    }

    /// Shared inference handle
    pub fn classifier(&self) -> Arc<dyn Classifier> {
        self.classifier.clone()
    }

    /// Get model metadata
    pub fn metadata(&self) -> &ModelMetadata {
        &self.metadata
    }
}

/// Fetch the raw artifact bytes from the configured source
pub async fn fetch_artifact(config: &ModelConfig) -> Result<Bytes> {
    match &config.source {
        ModelSource::LocalPath(path) => {
            let bytes = tokio::fs::read(path)
                .await
                .map_err(|e| Error::unreachable(path.display().to_string(), e))?;
            Ok(Bytes::from(bytes))
        }
        ModelSource::Remote(url) => fetch_remote(url, config.timeout).await,
        ModelSource::HuggingFace {
            repo_id,
            revision,
            filename,
        } => {
            let location = config.source.to_string();
            let repo_id = repo_id.clone();
            let revision = revision.clone().unwrap_or_else(|| "main".to_string());
            let filename = filename.clone();

            // hf-hub's sync API blocks on network IO
            let path = tokio::task::spawn_blocking(move || {
                let api = Api::new().map_err(|e| format!("Failed to initialize HF API: {e}"))?;
                let repo = api.repo(Repo::with_revision(repo_id, RepoType::Model, revision));
                repo.get(&filename)
                    .map_err(|e| format!("Failed to download model from HF: {e}"))
            })
            .await
            .map_err(|e| Error::internal(format!("HF download task failed: {e}")))?
            .map_err(|reason| Error::unreachable(location.clone(), reason))?;

            let bytes = tokio::fs::read(&path)
                .await
                .map_err(|e| Error::unreachable(location, e))?;
            Ok(Bytes::from(bytes))
        }
    }
}

async fn fetch_remote(url: &Url, timeout: Duration) -> Result<Bytes> {
    let client = reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|e| Error::internal(format!("Failed to build HTTP client: {e}")))?;

    debug!("GET {}", url);
    let response = client
        .get(url.clone())
        .send()
        .await
        .map_err(|e| Error::unreachable(url.as_str(), e))?;

    let status = response.status();
    if !status.is_success() {
        return Err(Error::unreachable(url.as_str(), format!("HTTP status {status}")));
    }

    response
        .bytes()
        .await
        .map_err(|e| Error::unreachable(url.as_str(), e))
}

/// Hex encoded SHA-256 digest
pub fn sha256_hex(bytes: &[u8]) -> String {
    format!("{:x}", Sha256::digest(bytes))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_sources() {
        assert_eq!(
            ModelSource::parse("./models/genre.json").unwrap(),
            ModelSource::LocalPath(PathBuf::from("./models/genre.json"))
        );

        let remote =
            ModelSource::parse("https://github.com/tlary/genre-streamlit/blob/main/genreModel.json?raw=true")
                .unwrap();
        assert!(matches!(remote, ModelSource::Remote(ref url) if url.host_str() == Some("github.com")));

        let hf = ModelSource::parse("hf://tlary/genre-model/artifacts/model.json@v2").unwrap();
        assert_eq!(
            hf,
            ModelSource::HuggingFace {
                repo_id: "tlary/genre-model".to_string(),
                revision: Some("v2".to_string()),
                filename: "artifacts/model.json".to_string(),
            }
        );
        assert_eq!(hf.to_string(), "hf://tlary/genre-model/artifacts/model.json@v2");
    }

    #[test]
    fn test_parse_rejects_bad_sources() {
        assert!(matches!(ModelSource::parse("ftp://host/model.json"), Err(Error::Config(_))));
        assert!(matches!(ModelSource::parse("hf://only-owner"), Err(Error::Config(_))));
        assert!(matches!(ModelSource::parse("https://"), Err(Error::Config(_))));
    }

    #[test]
    fn test_model_config_builders() {
        let config = ModelConfig::from_hf("tlary/genre-model", "model.json")
            .with_revision("main")
            .with_sha256("abc")
            .with_timeout(Duration::from_secs(5));

        if let ModelSource::HuggingFace { repo_id, revision, filename } = &config.source {
            assert_eq!(repo_id, "tlary/genre-model");
            assert_eq!(revision.as_deref(), Some("main"));
            assert_eq!(filename, "model.json");
        } else {
            panic!("Expected HuggingFace source");
        }
        assert_eq!(config.sha256.as_deref(), Some("abc"));
        assert_eq!(config.timeout, Duration::from_secs(5));

        assert!(ModelConfig::from_url("file:///etc/model.json").is_err());
    }

    #[test]
    fn test_sha256_hex() {
        assert_eq!(
            sha256_hex(b""),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }
}
