//! Genre labels and their display mapping
//!
//! A [`GenreLabel`] is one raw value of the closed label set fixed when the
//! model was trained. Everything shown to a user is derived from the raw
//! label by pure functions: [`display_name`] for the human-readable name and
//! [`image_path`] for the image asset, which always uses the raw label.

use lyricgenre_core::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Labels whose display form differs from the raw label
const DISPLAY_NAMES: &[(&str, &str)] = &[
    ("hiphop", "Hip-Hop"),
    ("pop", "Pop"),
    ("schlager", "Schlager"),
];

/// File extension of genre image assets
pub const IMAGE_EXTENSION: &str = ".jpg";

/// Default base directory of genre image assets
pub const DEFAULT_IMAGE_DIR: &str = "./static/";

/// A raw genre label from a model's closed label set
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct GenreLabel(String);

impl GenreLabel {
    /// Create a label, rejecting values that cannot name an image file
    ///
    /// Labels must be non-empty lowercase slugs (`[a-z0-9_-]+`).
    pub fn new(label: impl Into<String>) -> Result<Self> {
        let label = label.into();
        if label.is_empty() {
            return Err(Error::invalid("genre label must not be empty"));
        }
        if !label
            .bytes()
            .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit() || b == b'_' || b == b'-')
        {
            return Err(Error::invalid(format!(
                "genre label '{label}' must only contain lowercase letters, digits, '_' or '-'"
            )));
        }
        Ok(Self(label))
    }

    /// The raw label as produced by the model
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Human-readable name of this label
    pub fn display_name(&self) -> &str {
        display_name(&self.0)
    }

    /// Image path for this label under `base_dir`
    pub fn image_path(&self, base_dir: &str) -> String {
        image_path(base_dir, self)
    }
}

impl fmt::Display for GenreLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for GenreLabel {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        Self::new(value)
    }
}

impl From<GenreLabel> for String {
    fn from(label: GenreLabel) -> Self {
        label.0
    }
}

impl AsRef<str> for GenreLabel {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Map a raw label to its display name
///
/// `hiphop` becomes `Hip-Hop`, `pop` and `schlager` are capitalized, and
/// every other label is returned unchanged.
pub fn display_name(label: &str) -> &str {
    DISPLAY_NAMES
        .iter()
        .find(|(raw, _)| *raw == label)
        .map(|(_, display)| *display)
        .unwrap_or(label)
}

/// Resolve the image path of a label by plain concatenation
pub fn image_path(base_dir: &str, label: &GenreLabel) -> String {
    format!("{}{}{}", base_dir, label.as_str(), IMAGE_EXTENSION)
}

/// Informational message shown next to a prediction
pub fn genre_message(display_name: &str) -> String {
    format!("The song's genre is {display_name}")
}

/// Everything needed to show a prediction to the user
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GenrePresentation {
    /// Raw label
    pub label: GenreLabel,

    /// Human-readable name
    pub display_name: String,

    /// Informational message
    pub message: String,

    /// Image path resolved from the raw label
    pub image_path: String,
}

impl GenrePresentation {
    /// Build the presentation of `label` with images under `image_dir`
    pub fn new(label: GenreLabel, image_dir: &str) -> Self {
        let display_name = label.display_name().to_string();
        let message = genre_message(&display_name);
        let image_path = label.image_path(image_dir);
        Self {
            label,
            display_name,
            message,
            image_path,
        }
    }
}
