//! Lyricgenre Classifiers
//!
//! Genre classification of song lyrics.
//!
//! - [`model_loader`] fetches a serialized model artifact from a local path,
//!   an HTTP(S) URL or the Hugging Face Hub and deserializes it once.
//! - [`linear`] runs inference with the loaded bag-of-words weights.
//! - [`genre`] maps raw labels to display names and image paths.

pub mod artifact;
pub mod classifier;
pub mod genre;
pub mod linear;
pub mod model_loader;

pub use artifact::{ModelArtifact, PreprocessingStep, ARTIFACT_FORMAT, ARTIFACT_FORMAT_VERSION};
pub use classifier::{ClassificationMetadata, ClassificationResult, Classifier};
pub use genre::{display_name, genre_message, image_path, GenreLabel, GenrePresentation};
pub use linear::LinearGenreClassifier;
pub use model_loader::{LoadedModel, ModelConfig, ModelMetadata, ModelSource};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::classifier::{ClassificationResult, Classifier};
    pub use crate::genre::{GenreLabel, GenrePresentation};
    pub use crate::linear::LinearGenreClassifier;
    pub use crate::model_loader::{LoadedModel, ModelConfig, ModelSource};
}
