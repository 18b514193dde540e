//! Linear bag-of-words genre classifier
//!
//! Scores every label as `bias + Σ weight(token)` over the whitespace
//! separated tokens of the preprocessed text and returns the best label.
//! Ties go to the label listed first in the artifact, so the same text always
//! yields the same label.

use crate::artifact::{ModelArtifact, PreprocessingStep, ValidatedArtifact};
use crate::classifier::{ClassificationMetadata, ClassificationResult, Classifier};
use crate::genre::GenreLabel;
use lyricgenre_core::{Error, Result};
use regex::Regex;
use std::collections::HashMap;
use std::time::Instant;

pub struct LinearGenreClassifier {
    name: String,
    version: String,
    labels: Vec<GenreLabel>,
    preprocessing: Vec<PreprocessingStep>,
    bias: Vec<f32>,
    weights: HashMap<String, Vec<f32>>,
    punctuation: Regex,
}

impl LinearGenreClassifier {
    /// Build a classifier from a validated artifact
    pub fn new(artifact: ValidatedArtifact) -> Result<Self> {
        let punctuation = Regex::new(r"[\p{P}\p{S}]").map_err(|e| {
            Error::classifier(format!("Failed to build punctuation matcher: {e}"))
        })?;

        let name = if artifact.name.is_empty() {
            "linear-genre".to_string()
        } else {
            artifact.name
        };

        Ok(Self {
            name,
            version: artifact.version,
            labels: artifact.labels,
            preprocessing: artifact.preprocessing,
            bias: artifact.bias,
            weights: artifact.weights,
            punctuation,
        })
    }

    /// Deserialize, validate and build a classifier from artifact bytes
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        Self::new(ModelArtifact::from_bytes(bytes)?.validate()?)
    }

    /// Model version declared by the artifact
    pub fn version(&self) -> &str {
        &self.version
    }

    /// Number of tokens with learned weights
    pub fn vocabulary_size(&self) -> usize {
        self.weights.len()
    }

    /// Apply the artifact's preprocessing steps in order
    pub fn preprocess(&self, text: &str) -> String {
        let mut text = text.to_string();
        for step in &self.preprocessing {
            text = match step {
                PreprocessingStep::Lowercase => text.to_lowercase(),
                PreprocessingStep::NormalizeWhitespace => {
                    text.split_whitespace().collect::<Vec<_>>().join(" ")
                }
                PreprocessingStep::StripPunctuation => {
                    self.punctuation.replace_all(&text, "").into_owned()
                }
                PreprocessingStep::Truncate { max_chars } => {
                    text.chars().take(*max_chars).collect()
                }
            };
        }
        text
    }

    /// Raw per-label scores and the number of tokens with known weights
    ///
    /// Accumulated in f64 so that sums of large finite weights stay finite.
    fn score(&self, text: &str) -> (Vec<f64>, usize) {
        let processed = self.preprocess(text);
        let mut scores: Vec<f64> = self.bias.iter().map(|&b| f64::from(b)).collect();
        let mut matched = 0;

        for token in processed.split_whitespace() {
            if let Some(weights) = self.weights.get(token) {
                matched += 1;
                for (score, weight) in scores.iter_mut().zip(weights) {
                    *score += f64::from(*weight);
                }
            }
        }

        (scores, matched)
    }
}

/// Index of the highest score, first index on ties
fn argmax(scores: &[f64]) -> usize {
    let mut best = 0;
    for (i, score) in scores.iter().enumerate().skip(1) {
        if *score > scores[best] {
            best = i;
        }
    }
    best
}

fn softmax(scores: &[f64]) -> Vec<f32> {
    let max = scores.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let exps: Vec<f64> = scores.iter().map(|s| (s - max).exp()).collect();
    let sum: f64 = exps.iter().sum();
    exps.into_iter().map(|e| (e / sum) as f32).collect()
}

#[async_trait::async_trait]
impl Classifier for LinearGenreClassifier {
    async fn classify(&self, text: &str) -> Result<ClassificationResult> {
        let start = Instant::now();

        let (scores, matched_tokens) = self.score(text);
        let best = argmax(&scores);
        let probabilities = softmax(&scores);

        Ok(ClassificationResult {
            label: self.labels[best].clone(),
            score: probabilities[best],
            metadata: ClassificationMetadata {
                model: Some(format!("{}@{}", self.name, self.version)),
                all_scores: Some(
                    self.labels
                        .iter()
                        .cloned()
                        .zip(probabilities)
                        .collect(),
                ),
                matched_tokens,
            },
            latency_us: start.elapsed().as_micros() as u64,
        })
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn labels(&self) -> &[GenreLabel] {
        &self.labels
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classifier(json: &str) -> LinearGenreClassifier {
        LinearGenreClassifier::from_bytes(json.as_bytes()).unwrap()
    }

    const ARTIFACT: &str = r#"{
        "format": "lyricgenre-linear",
        "format_version": 1,
        "name": "test",
        "version": "1",
        "labels": ["hiphop", "pop", "schlager"],
        "preprocessing": [
            {"type": "lowercase"},
            {"type": "strip_punctuation"},
            {"type": "normalize_whitespace"}
        ],
        "bias": [0.0, 0.2, 0.1],
        "weights": {
            "digga": [3.0, -1.0, -1.0],
            "herz": [-1.0, 0.5, 2.0],
            "baby": [0.0, 2.0, 0.0]
        }
    }"#;

    #[test]
    fn test_preprocess() {
        let c = classifier(ARTIFACT);
        assert_eq!(c.preprocess("  Ey, DIGGA!\n\nMein  Herz "), "ey digga mein herz");
    }

    #[test]
    fn test_truncate_counts_chars() {
        let c = classifier(
            r#"{"format":"lyricgenre-linear","format_version":1,"labels":["pop"],
                "preprocessing":[{"type":"truncate","max_chars":3}],"bias":[0.0]}"#,
        );
        assert_eq!(c.preprocess("Grüße"), "Grü");
    }

    #[tokio::test]
    async fn test_classify_picks_best_label() {
        let c = classifier(ARTIFACT);

        let result = c.classify("Digga, was geht?").await.unwrap();
        assert_eq!(result.label.as_str(), "hiphop");
        assert_eq!(result.metadata.matched_tokens, 1);

        let result = c.classify("Mein Herz, mein Herz").await.unwrap();
        assert_eq!(result.label.as_str(), "schlager");

        let result = c.classify("Baby baby").await.unwrap();
        assert_eq!(result.label.as_str(), "pop");
    }

    #[tokio::test]
    async fn test_empty_input_falls_back_to_bias() {
        let c = classifier(ARTIFACT);
        let result = c.classify("").await.unwrap();
        assert_eq!(result.label.as_str(), "pop");
        assert_eq!(result.metadata.matched_tokens, 0);

        let result = c.classify("   \n\t").await.unwrap();
        assert_eq!(result.label.as_str(), "pop");
    }

    #[tokio::test]
    async fn test_ties_go_to_first_label() {
        let c = classifier(
            r#"{"format":"lyricgenre-linear","format_version":1,
                "labels":["rock","pop"],"bias":[0.0, 0.0]}"#,
        );
        let result = c.classify("anything").await.unwrap();
        assert_eq!(result.label.as_str(), "rock");
        assert!((result.score - 0.5).abs() < 1e-6);
    }

    #[tokio::test]
    async fn test_scores_form_distribution() {
        let c = classifier(ARTIFACT);
        let result = c.classify("digga herz baby").await.unwrap();
        let scores = result.metadata.all_scores.unwrap();

        assert_eq!(scores.len(), 3);
        let total: f32 = scores.iter().map(|(_, s)| s).sum();
        assert!((total - 1.0).abs() < 1e-5);
        let best = scores.iter().find(|(l, _)| *l == result.label).unwrap();
        assert_eq!(best.1, result.score);
    }

    #[tokio::test]
    async fn test_classify_is_deterministic() {
        let c = classifier(ARTIFACT);
        let text = "Ey digga, mein Herz schlägt für dich, baby";
        let first = c.classify(text).await.unwrap();
        let second = c.classify(text).await.unwrap();
        assert_eq!(first.label, second.label);
        assert_eq!(first.score, second.score);
    }

    #[tokio::test]
    async fn test_large_weights_keep_scores_finite() {
        let c = classifier(
            r#"{"format":"lyricgenre-linear","format_version":1,
                "labels":["pop","rock"],"bias":[0.0, 0.0],
                "weights":{"a":[3e38, 0.0]}}"#,
        );
        let result = c.classify("a a a").await.unwrap();
        assert_eq!(result.label.as_str(), "pop");
        assert!((result.score - 1.0).abs() < 1e-6);

        let scores = result.metadata.all_scores.unwrap();
        assert!(scores.iter().all(|(_, s)| s.is_finite()));
    }
}
