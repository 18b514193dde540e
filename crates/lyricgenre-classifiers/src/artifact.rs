//! Serialized model artifact format
//!
//! An artifact is a JSON document describing a linear bag-of-words genre
//! classifier. It is produced offline by training and consumed read-only here.
//!
//! ```json
//! {
//!   "format": "lyricgenre-linear",
//!   "format_version": 1,
//!   "name": "german-lyrics",
//!   "version": "2021.03",
//!   "labels": ["hiphop", "pop", "rock", "schlager"],
//!   "preprocessing": [{ "type": "lowercase" }, { "type": "strip_punctuation" }],
//!   "bias": [0.0, 0.1, 0.0, 0.0],
//!   "weights": { "digga": [2.5, -0.3, -0.4, -0.8] }
//! }
//! ```

use crate::genre::GenreLabel;
use lyricgenre_core::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// Format identifier every artifact must carry
pub const ARTIFACT_FORMAT: &str = "lyricgenre-linear";

/// Artifact format version understood by this crate
pub const ARTIFACT_FORMAT_VERSION: u32 = 1;

/// Raw, unvalidated artifact document
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelArtifact {
    /// Format identifier
    pub format: String,

    /// Format version
    pub format_version: u32,

    /// Model name
    #[serde(default)]
    pub name: String,

    /// Model version
    #[serde(default)]
    pub version: String,

    /// Ordered closed label set
    pub labels: Vec<String>,

    /// Preprocessing steps applied to the text before tokenization
    #[serde(default)]
    pub preprocessing: Vec<PreprocessingStep>,

    /// Per-label bias
    pub bias: Vec<f32>,

    /// Per-token weights, one entry per label
    #[serde(default)]
    pub weights: HashMap<String, Vec<f32>>,
}

/// Preprocessing step configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PreprocessingStep {
    Lowercase,
    NormalizeWhitespace,
    StripPunctuation,
    Truncate { max_chars: usize },
}

/// An artifact that passed validation
#[derive(Debug, Clone)]
pub struct ValidatedArtifact {
    pub name: String,
    pub version: String,
    pub labels: Vec<GenreLabel>,
    pub preprocessing: Vec<PreprocessingStep>,
    pub bias: Vec<f32>,
    pub weights: HashMap<String, Vec<f32>>,
}

impl ModelArtifact {
    /// Deserialize an artifact from raw bytes
    ///
    /// Any deserialization failure, including empty or truncated input, is
    /// reported as [`Error::ArtifactInvalid`].
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        serde_json::from_slice(bytes)
            .map_err(|e| Error::invalid(format!("failed to deserialize artifact: {e}")))
    }

    /// Check format, labels and weight shapes
    pub fn validate(self) -> Result<ValidatedArtifact> {
        if self.format != ARTIFACT_FORMAT {
            return Err(Error::invalid(format!(
                "unsupported artifact format '{}', expected '{}'",
                self.format, ARTIFACT_FORMAT
            )));
        }
        if self.format_version != ARTIFACT_FORMAT_VERSION {
            return Err(Error::invalid(format!(
                "unsupported artifact format version {}, expected {}",
                self.format_version, ARTIFACT_FORMAT_VERSION
            )));
        }
        if self.labels.is_empty() {
            return Err(Error::invalid("artifact declares no labels"));
        }

        let mut seen = HashSet::new();
        let mut labels = Vec::with_capacity(self.labels.len());
        for raw in self.labels {
            if !seen.insert(raw.clone()) {
                return Err(Error::invalid(format!("duplicate label '{raw}'")));
            }
            labels.push(GenreLabel::new(raw)?);
        }

        let num_labels = labels.len();
        check_weights("bias", &self.bias, num_labels)?;
        for (token, weights) in &self.weights {
            check_weights(&format!("token '{token}'"), weights, num_labels)?;
        }

        for step in &self.preprocessing {
            if let PreprocessingStep::Truncate { max_chars: 0 } = step {
                return Err(Error::invalid("truncate step must keep at least one character"));
            }
        }

        Ok(ValidatedArtifact {
            name: self.name,
            version: self.version,
            labels,
            preprocessing: self.preprocessing,
            bias: self.bias,
            weights: self.weights,
        })
    }
}

fn check_weights(what: &str, weights: &[f32], num_labels: usize) -> Result<()> {
    if weights.len() != num_labels {
        return Err(Error::invalid(format!(
            "{what} has {} weights, expected {num_labels}",
            weights.len()
        )));
    }
    if weights.iter().any(|w| !w.is_finite()) {
        return Err(Error::invalid(format!("{what} has non-finite weights")));
    }
    Ok(())
}
