//! Error types for Lightbox
//!
//! The animation and transition engine never returns these: failures there
//! resolve into a `false` completion. Errors surface only at the boundaries
//! (configuration loading, image downloads, paging).

use thiserror::Error;

/// Errors that can occur at the Lightbox boundaries
#[derive(Error, Debug)]
pub enum LightboxError {
    /// Configuration file could not be read
    #[error("Failed to read configuration: {0}")]
    ConfigIo(#[from] std::io::Error),

    /// Configuration document is not valid TOML for the expected schema
    #[error("Failed to parse configuration: {0}")]
    ConfigParse(#[from] toml::de::Error),

    /// A configuration value is out of range
    #[error("Invalid configuration value for `{field}`: {reason}")]
    InvalidConfig { field: &'static str, reason: String },

    /// An image download failed
    #[error("Image download failed for {url}: {reason}")]
    Download { url: String, reason: String },

    /// Requested an image outside the album
    #[error("Image index {index} out of range (album has {count} images)")]
    IndexOutOfRange { index: usize, count: usize },
}

impl LightboxError {
    pub fn download(url: impl Into<String>, reason: impl Into<String>) -> Self {
        LightboxError::Download {
            url: url.into(),
            reason: reason.into(),
        }
    }
}

/// Result type for Lightbox operations
pub type Result<T> = std::result::Result<T, LightboxError>;
