//! Lyricgenre Core
//!
//! Types shared across the lyric genre classification crates.
//!
//! This crate provides the error taxonomy used from artifact loading up to
//! the HTTP layer, so that "artifact unreachable" and "artifact invalid"
//! stay distinguishable wherever they surface.

pub mod error;

pub use error::{Error, Result};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::error::{Error, Result};
}
