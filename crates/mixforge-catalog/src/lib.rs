//! Track acquisition, asset downloads, run history and upload interfaces.

pub mod download;
pub mod error;
pub mod history;
pub mod source;
pub mod upload;

pub use download::{download_track_audio, fetch_asset};
pub use error::{CatalogError, CatalogResult};
pub use history::{ChannelHistory, PendingTask, TrackEntry, UploadedVideo, VideoKind, HISTORY_FILE};
pub use source::{SunoSource, TrackRecord, TrackSource};
pub use upload::{Privacy, Published, UploadRequest, VideoHost};
