//! Pipeline error taxonomy.
//!
//! Per-track failures (missing assets, probe failures, render failures
//! after the fallback retry) are caught at the assembler boundary, logged
//! with the track's slug, and the track is excluded. A run only fails as
//! a whole when no tracks survive or the final stitch fails.

use thiserror::Error;

use mixforge_catalog::CatalogError;
use mixforge_imagegen::ImageGenError;
use mixforge_media::MediaError;

/// Result type for pipeline operations.
pub type PipelineResult<T> = Result<T, PipelineError>;

/// Errors that abort a pipeline operation.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("No usable tracks to process")]
    NoTracks,

    #[error("No segments rendered successfully")]
    NoSegments,

    #[error("Required asset missing for track '{0}'")]
    AssetMissing(String),

    #[error("Render failed after fallback retry: {0}")]
    Render(String),

    #[error(transparent)]
    Media(#[from] MediaError),

    #[error(transparent)]
    Catalog(#[from] CatalogError),

    #[error(transparent)]
    ImageGen(#[from] ImageGenError),

    #[error("Invalid compilation info: {0}")]
    InvalidInfo(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
