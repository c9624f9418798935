//! Clients for the image-generation and segmentation collaborators.

pub mod client;
pub mod error;
pub mod segmenter;

pub use client::{ImageGenClient, DEFAULT_MODEL};
pub use error::{ImageGenError, ImageGenResult};
pub use segmenter::{RemoteSegmenter, Segmenter};
