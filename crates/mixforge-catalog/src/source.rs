//! Track metadata source collaborator.
//!
//! The pipeline treats the source as opaque: give it a track URL, get a
//! structured record back. An empty title is total failure for that URL.

use async_trait::async_trait;
use regex::Regex;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::OnceLock;
use tracing::debug;

use mixforge_models::{extract_tempo, slugify, Track};

use crate::error::{CatalogError, CatalogResult};

const USER_AGENT: &str = "Mozilla/5.0 (compatible; MixForgeBot/1.0)";

/// Structured metadata for one external track.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackRecord {
    pub title: String,
    #[serde(default)]
    pub artist: String,
    pub duration: f64,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub tags: String,
    /// Tempo estimate in BPM; 0 = unknown
    #[serde(default)]
    pub tempo: u32,
    #[serde(default)]
    pub audio_url: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    pub source_id: String,
    pub source_url: String,
}

impl TrackRecord {
    /// Convert into a pipeline track. Mood stays at its default; the
    /// classifier sets it during batch processing.
    pub fn into_track(self) -> Track {
        let mut track = Track::new(slugify(&self.title), self.title.clone(), self.duration);
        track.artist = self.artist;
        track.description = self.description;
        track.tempo = self.tempo;
        track.tags = self.tags;
        track.source_id = self.source_id;
        track.source_url = self.source_url;
        track.audio_url = self.audio_url;
        track.image_url = self.image_url;
        track
    }
}

/// Fetches track metadata from a source URL.
#[async_trait]
pub trait TrackSource: Send + Sync {
    async fn fetch(&self, url: &str) -> CatalogResult<TrackRecord>;
}

/// Metadata source for Suno track pages, which embed a JSON document in
/// the served HTML.
pub struct SunoSource {
    client: Client,
}

impl SunoSource {
    pub fn new() -> Self {
        Self {
            client: Client::new(),
        }
    }
}

impl Default for SunoSource {
    fn default() -> Self {
        Self::new()
    }
}

fn embedded_json_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r#"<script[^>]*type="application/json"[^>]*>([^<]+)</script>"#)
            .expect("valid script regex")
    })
}

fn next_data_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r#"<script id="__NEXT_DATA__"[^>]*>([^<]+)</script>"#)
            .expect("valid next-data regex")
    })
}

/// Last path component of a track URL.
fn extract_track_id(url: &str) -> String {
    url.trim_end_matches('/')
        .rsplit('/')
        .next()
        .unwrap_or_default()
        .split('?')
        .next()
        .unwrap_or_default()
        .to_string()
}

/// Build a record from the page's embedded clip document.
fn record_from_clip(clip: &Value, url: &str, track_id: &str) -> Option<TrackRecord> {
    let title = clip.get("title")?.as_str().unwrap_or_default().to_string();
    if title.is_empty() {
        return None;
    }

    let metadata = clip.get("metadata").cloned().unwrap_or(Value::Null);
    let description = metadata
        .get("prompt")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();

    Some(TrackRecord {
        artist: clip
            .get("display_name")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string(),
        duration: metadata
            .get("duration")
            .and_then(Value::as_f64)
            .unwrap_or(0.0),
        tags: metadata
            .get("tags")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string(),
        tempo: extract_tempo(&description),
        audio_url: clip
            .get("audio_url")
            .and_then(Value::as_str)
            .map(String::from),
        image_url: clip
            .get("image_large_url")
            .and_then(Value::as_str)
            .or_else(|| clip.get("image_url").and_then(Value::as_str))
            .map(String::from),
        source_id: clip
            .get("id")
            .and_then(Value::as_str)
            .unwrap_or(track_id)
            .to_string(),
        source_url: url.to_string(),
        description,
        title,
    })
}

/// Walk an embedded page document down to the clip object.
fn find_clip(doc: &Value) -> Option<&Value> {
    let clip = doc.get("props")?.get("pageProps")?.get("clip")?;
    clip.is_object().then_some(clip)
}

#[async_trait]
impl TrackSource for SunoSource {
    async fn fetch(&self, url: &str) -> CatalogResult<TrackRecord> {
        let track_id = extract_track_id(url);
        debug!("Fetching track metadata: {} (id {})", url, track_id);

        let html = self
            .client
            .get(url)
            .header("User-Agent", USER_AGENT)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;

        for re in [embedded_json_regex(), next_data_regex()] {
            if let Some(captures) = re.captures(&html) {
                let raw = captures.get(1).map(|m| m.as_str()).unwrap_or_default();
                let doc: Value = match serde_json::from_str(raw) {
                    Ok(doc) => doc,
                    Err(_) => continue,
                };
                if let Some(record) = find_clip(&doc).and_then(|c| record_from_clip(c, url, &track_id)) {
                    return Ok(record);
                }
            }
        }

        Err(CatalogError::EmptyMetadata(url.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::method;
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn clip_page(title: &str) -> String {
        let doc = serde_json::json!({
            "props": {"pageProps": {"clip": {
                "title": title,
                "display_name": "Skyline",
                "id": "abc123",
                "audio_url": "https://cdn.example/t.mp3",
                "image_url": "https://cdn.example/t.png",
                "metadata": {
                    "duration": 187.4,
                    "prompt": "soulful amapiano at 112 bpm",
                    "tags": "amapiano, deep"
                }
            }}}
        });
        format!(
            "<html><body><script id=\"__NEXT_DATA__\" type=\"application/json\">{}</script></body></html>",
            doc
        )
    }

    #[test]
    fn test_extract_track_id() {
        assert_eq!(extract_track_id("https://suno.com/s/M2sT9pAdu"), "M2sT9pAdu");
        assert_eq!(extract_track_id("https://suno.com/song/xyz/"), "xyz");
        assert_eq!(extract_track_id("https://suno.com/s/abc?ref=1"), "abc");
    }

    #[tokio::test]
    async fn test_fetch_parses_embedded_json() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string(clip_page("Midnight Taxi")))
            .mount(&server)
            .await;

        let record = SunoSource::new().fetch(&server.uri()).await.unwrap();
        assert_eq!(record.title, "Midnight Taxi");
        assert_eq!(record.tempo, 112);
        assert!((record.duration - 187.4).abs() < 1e-9);
        assert_eq!(record.source_id, "abc123");

        let track = record.into_track();
        assert_eq!(track.slug, "midnight_taxi");
    }

    #[tokio::test]
    async fn test_empty_title_is_total_failure() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string(clip_page("")))
            .mount(&server)
            .await;

        let err = SunoSource::new().fetch(&server.uri()).await.unwrap_err();
        assert!(matches!(err, CatalogError::EmptyMetadata(_)));
    }

    #[tokio::test]
    async fn test_page_without_embedded_json() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>nothing</html>"))
            .mount(&server)
            .await;

        let err = SunoSource::new().fetch(&server.uri()).await.unwrap_err();
        assert!(matches!(err, CatalogError::EmptyMetadata(_)));
    }
}
