//! Server configuration

use crate::cli::Cli;
use lyricgenre_classifiers::genre::DEFAULT_IMAGE_DIR;
use lyricgenre_classifiers::{ModelConfig, ModelSource};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Model artifact settings
    #[serde(default)]
    pub model: ModelSettings,

    /// Base directory of genre images, always ending in '/'
    #[serde(default = "default_static_dir")]
    pub static_dir: String,

    /// Listen address
    #[serde(default = "default_listen")]
    pub listen: String,

    /// Listen port
    #[serde(default = "default_port")]
    pub port: u16,
}

/// Where to load the model artifact from and how
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelSettings {
    /// Local path, http(s) URL or hf://owner/repo/file
    #[serde(default = "default_model_source")]
    pub source: String,

    /// Expected SHA-256 digest of the artifact bytes
    #[serde(default)]
    pub sha256: Option<String>,

    /// Download timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl ServerConfig {
    /// Load configuration from file and CLI overrides
    ///
    /// A missing configuration file is not an error; defaults are used.
    pub fn load(config_path: &str, cli: &Cli) -> anyhow::Result<Self> {
        let mut config = if Path::new(config_path).exists() {
            let content = std::fs::read_to_string(config_path)?;
            Self::from_yaml(&content)?
        } else {
            Self::default()
        };

        config.apply_overrides(cli);
        Ok(config)
    }

    /// Parse configuration from YAML
    pub fn from_yaml(yaml: &str) -> Result<Self, serde_yaml::Error> {
        let mut config: Self = serde_yaml::from_str(yaml)?;
        config.static_dir = normalize_dir(&config.static_dir);
        Ok(config)
    }

    /// Apply CLI overrides
    pub fn apply_overrides(&mut self, cli: &Cli) {
        if let Some(model) = &cli.model {
            self.model.source = model.clone();
        }
        if let Some(sha256) = &cli.model_sha256 {
            self.model.sha256 = Some(sha256.clone());
        }
        if let Some(static_dir) = &cli.static_dir {
            self.static_dir = normalize_dir(static_dir);
        }
        if let Some(listen) = &cli.listen {
            self.listen = listen.clone();
        }
        if let Some(port) = cli.port {
            self.port = port;
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            model: ModelSettings::default(),
            static_dir: default_static_dir(),
            listen: default_listen(),
            port: default_port(),
        }
    }
}

impl ModelSettings {
    /// Build the loader configuration
    pub fn to_model_config(&self) -> lyricgenre_core::Result<ModelConfig> {
        let mut config = ModelConfig::new(ModelSource::parse(&self.source)?)
            .with_timeout(Duration::from_secs(self.timeout_secs));
        if let Some(sha256) = &self.sha256 {
            config = config.with_sha256(sha256.clone());
        }
        Ok(config)
    }
}

impl Default for ModelSettings {
    fn default() -> Self {
        Self {
            source: default_model_source(),
            sha256: None,
            timeout_secs: default_timeout_secs(),
        }
    }
}

fn normalize_dir(dir: &str) -> String {
    if dir.ends_with('/') {
        dir.to_string()
    } else {
        format!("{dir}/")
    }
}

fn default_model_source() -> String {
    "./models/genre-model.json".to_string()
}

fn default_static_dir() -> String {
    DEFAULT_IMAGE_DIR.to_string()
}

fn default_listen() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8501
}

fn default_timeout_secs() -> u64 {
    60
}
