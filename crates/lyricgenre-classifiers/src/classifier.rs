//! Classifier trait and common types

use crate::genre::GenreLabel;
use async_trait::async_trait;
use lyricgenre_core::Result;

/// Trait for all genre classifiers
///
/// Implementations are immutable once constructed: `classify` takes `&self`
/// and must return the same label for the same text on every call.
#[async_trait]
pub trait Classifier: Send + Sync {
    /// Classify the given text
    async fn classify(&self, text: &str) -> Result<ClassificationResult>;

    /// Get the classifier name
    fn name(&self) -> &str;

    /// The closed set of labels this classifier can return
    fn labels(&self) -> &[GenreLabel];
}

/// Result of classification
#[derive(Debug, Clone)]
pub struct ClassificationResult {
    /// Predicted genre label
    pub label: GenreLabel,

    /// Probability of the predicted label (0.0-1.0)
    pub score: f32,

    /// Additional metadata
    pub metadata: ClassificationMetadata,

    /// Latency in microseconds
    pub latency_us: u64,
}

/// Metadata about classification
#[derive(Debug, Clone, Default)]
pub struct ClassificationMetadata {
    /// Model name or version
    pub model: Option<String>,

    /// All class scores, in the classifier's label order
    pub all_scores: Option<Vec<(GenreLabel, f32)>>,

    /// Number of tokens that contributed to the prediction
    pub matched_tokens: usize,
}
