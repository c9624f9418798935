//! Upload collaborator interface.
//!
//! The core never participates in the host's OAuth handshake; it only
//! hands over a finished file with its metadata and consumes the
//! published identifier for run history.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::CatalogResult;

/// Visibility of a published video.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Privacy {
    Public,
    #[default]
    Unlisted,
    Private,
}

/// Everything the host needs for one upload.
#[derive(Debug, Clone)]
pub struct UploadRequest {
    pub file: PathBuf,
    pub title: String,
    pub description: String,
    pub tags: Vec<String>,
    pub privacy: Privacy,
}

/// Result of a successful upload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Published {
    pub id: String,
    pub url: String,
}

/// A video hosting collaborator.
#[async_trait]
pub trait VideoHost: Send + Sync {
    async fn upload(&self, request: &UploadRequest) -> CatalogResult<Published>;
}
