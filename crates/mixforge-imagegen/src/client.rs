//! HTTP client for the image-generation collaborator.
//!
//! The collaborator takes a text prompt and target dimensions and returns
//! a URL to a generated raster image; this client downloads and persists
//! it at a caller-chosen path. Retrying is the caller's responsibility.

use std::path::{Path, PathBuf};

use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{ImageGenError, ImageGenResult};

/// Default generation model path.
pub const DEFAULT_MODEL: &str = "fal-ai/flux/dev";
const DEFAULT_BASE_URL: &str = "https://fal.run";

/// Image generation API client.
pub struct ImageGenClient {
    base_url: String,
    model: String,
    api_key: String,
    client: Client,
}

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    prompt: &'a str,
    image_size: ImageSize,
    num_images: u32,
}

#[derive(Debug, Serialize)]
struct ImageSize {
    width: u32,
    height: u32,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    images: Vec<ImageRef>,
    #[serde(default)]
    image: Option<ImageRef>,
}

#[derive(Debug, Deserialize)]
struct ImageRef {
    url: String,
}

impl ImageGenClient {
    /// Create a client from the environment (`IMAGEGEN_API_KEY`).
    pub fn from_env() -> ImageGenResult<Self> {
        let api_key =
            std::env::var("IMAGEGEN_API_KEY").map_err(|_| ImageGenError::MissingApiKey)?;
        Ok(Self::new(api_key))
    }

    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            api_key: api_key.into(),
            client: Client::new(),
        }
    }

    /// Override the endpoint; used by tests and self-hosted gateways.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Generate an image and return its URL.
    pub async fn generate(&self, prompt: &str, width: u32, height: u32) -> ImageGenResult<String> {
        let url = format!("{}/{}", self.base_url, self.model);
        debug!("Generating image {}x{}: {:.80}", width, height, prompt);

        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Key {}", self.api_key))
            .json(&GenerateRequest {
                prompt,
                image_size: ImageSize { width, height },
                num_images: 1,
            })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ImageGenError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: GenerateResponse = response.json().await?;
        parsed
            .images
            .into_iter()
            .next()
            .or(parsed.image)
            .map(|i| i.url)
            .ok_or(ImageGenError::EmptyResponse)
    }

    /// Download an image URL to a local path.
    pub async fn download(&self, url: &str, dest: impl AsRef<Path>) -> ImageGenResult<()> {
        let dest = dest.as_ref();
        let bytes = self.client.get(url).send().await?.error_for_status()?.bytes().await?;
        if let Some(parent) = dest.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(dest, &bytes).await?;
        Ok(())
    }

    /// Generate an image and persist it at `dest`, skipping generation
    /// when the file already exists (file-existence cache, keyed by the
    /// caller's deterministic path).
    pub async fn generate_to_file(
        &self,
        prompt: &str,
        width: u32,
        height: u32,
        dest: impl AsRef<Path>,
    ) -> ImageGenResult<PathBuf> {
        let dest = dest.as_ref();
        if dest.exists() {
            debug!("Image exists, skipping generation: {}", dest.display());
            return Ok(dest.to_path_buf());
        }

        let url = self.generate(prompt, width, height).await?;
        self.download(&url, dest).await?;
        info!("Image saved: {}", dest.display());
        Ok(dest.to_path_buf())
    }
}
