//! Segmentation mask acquisition.
//!
//! Masks drive the masked-region effects: white pixels mark the region
//! the pulse applies to. The trait is the contract; the bundled
//! implementation calls a hosted BiRefNet-style endpoint with the image
//! inlined as a data URL.

use std::path::Path;

use async_trait::async_trait;
use base64::Engine;
use reqwest::Client;
use serde::Deserialize;
use tracing::info;

use crate::error::{ImageGenError, ImageGenResult};

const DEFAULT_BASE_URL: &str = "https://fal.run";
const DEFAULT_MODEL: &str = "fal-ai/birefnet";

/// Produces a grayscale mask for an image.
#[async_trait]
pub trait Segmenter: Send + Sync {
    /// Segment `image`, writing the mask to `mask_out`.
    async fn segment(&self, image: &Path, mask_out: &Path) -> ImageGenResult<()>;
}

/// Hosted segmentation client.
pub struct RemoteSegmenter {
    base_url: String,
    model: String,
    api_key: String,
    client: Client,
}

#[derive(Debug, Deserialize)]
struct SegmentResponse {
    mask_image: Option<MaskRef>,
}

#[derive(Debug, Deserialize)]
struct MaskRef {
    url: String,
}

impl RemoteSegmenter {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            api_key: api_key.into(),
            client: Client::new(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    fn data_url(image: &Path, bytes: &[u8]) -> String {
        let mime = match image.extension().and_then(|e| e.to_str()) {
            Some("png") => "image/png",
            Some("webp") => "image/webp",
            _ => "image/jpeg",
        };
        format!(
            "data:{};base64,{}",
            mime,
            base64::engine::general_purpose::STANDARD.encode(bytes)
        )
    }
}

#[async_trait]
impl Segmenter for RemoteSegmenter {
    async fn segment(&self, image: &Path, mask_out: &Path) -> ImageGenResult<()> {
        let bytes = tokio::fs::read(image).await?;
        let payload = serde_json::json!({
            "image_url": Self::data_url(image, &bytes),
            "output_format": "png",
            "output_mask": true,
        });

        let url = format!("{}/{}", self.base_url, self.model);
        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Key {}", self.api_key))
            .json(&payload)
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

        let parsed: SegmentResponse = response.json().await?;
        let mask_url = parsed
            .mask_image
            .map(|m| m.url)
            .ok_or(ImageGenError::EmptyResponse)?;

        let mask_bytes = self
            .client
            .get(&mask_url)
            .send()
            .await?
            .error_for_status()?
            .bytes()
            .await?;
        if let Some(parent) = mask_out.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(mask_out, &mask_bytes).await?;
        info!("Mask saved: {}", mask_out.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_data_url_mime() {
        let url = RemoteSegmenter::data_url(Path::new("bg.png"), b"x");
        assert!(url.starts_with("data:image/png;base64,"));
        let url = RemoteSegmenter::data_url(Path::new("bg.jpg"), b"x");
        assert!(url.starts_with("data:image/jpeg;base64,"));
    }
}
