//! Error types for image generation.

use thiserror::Error;

/// Result type for image generation operations.
pub type ImageGenResult<T> = Result<T, ImageGenError>;

/// Errors from the image-generation and segmentation collaborators.
#[derive(Debug, Error)]
pub enum ImageGenError {
    #[error("API key not configured (set IMAGEGEN_API_KEY)")]
    MissingApiKey,

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error ({status}): {body}")]
    Api { status: u16, body: String },

    #[error("No image URL in response")]
    EmptyResponse,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
