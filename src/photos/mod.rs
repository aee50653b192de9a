//! Card photos for condition review
//!
//! Tracks the front and back photos of a card and pulls candidate images
//! out of marketplace listings.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;
use url::Url;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PhotoError {
    #[error("Please enter a listing URL")]
    EmptyUrl,
    #[error("Invalid listing URL: {0}")]
    InvalidUrl(String),
}

/// Which face of the card a photo shows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PhotoSide {
    Front,
    Back,
}

/// A photo attached to the card under review
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardPhoto {
    pub id: String,
    pub side: PhotoSide,
    /// Uploaded file name or extracted image URL
    pub source: String,
}

/// Photos of one card, in the order they were added
#[derive(Debug, Clone, Default)]
pub struct PhotoSet {
    photos: Vec<CardPhoto>,
}

impl PhotoSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a photo. The first photo of an empty set is the front, later
    /// ones the back.
    pub fn add(&mut self, source: impl Into<String>) -> &CardPhoto {
        let side = if self.photos.is_empty() {
            PhotoSide::Front
        } else {
            PhotoSide::Back
        };
        self.add_with_side(source, side)
    }

    /// Add a photo on an explicit side
    pub fn add_with_side(&mut self, source: impl Into<String>, side: PhotoSide) -> &CardPhoto {
        self.photos.push(CardPhoto {
            id: Uuid::new_v4().to_string(),
            side,
            source: source.into(),
        });
        &self.photos[self.photos.len() - 1]
    }

    /// Remove the photo with `id`; returns whether one was removed
    pub fn remove(&mut self, id: &str) -> bool {
        let before = self.photos.len();
        self.photos.retain(|p| p.id != id);
        self.photos.len() != before
    }

    /// The first photo showing `side`
    pub fn current(&self, side: PhotoSide) -> Option<&CardPhoto> {
        self.photos.iter().find(|p| p.side == side)
    }

    pub fn photos(&self) -> &[CardPhoto] {
        &self.photos
    }

    pub fn len(&self) -> usize {
        self.photos.len()
    }

    pub fn is_empty(&self) -> bool {
        self.photos.is_empty()
    }
}

/// Finds card images on a marketplace listing page
#[async_trait]
pub trait ImageExtractor: Send + Sync {
    async fn extract(&self, listing_url: &str) -> Result<Vec<String>, PhotoError>;
}

/// Check a listing URL is present and absolute
pub fn parse_listing_url(listing_url: &str) -> Result<Url, PhotoError> {
    let trimmed = listing_url.trim();
    if trimmed.is_empty() {
        return Err(PhotoError::EmptyUrl);
    }
    Url::parse(trimmed).map_err(|e| PhotoError::InvalidUrl(e.to_string()))
}

/// Extractor returning placeholder images for any valid listing URL
pub struct MockImageExtractor {
    latency: Duration,
    count: usize,
}

impl MockImageExtractor {
    pub fn new() -> Self {
        Self {
            latency: Duration::ZERO,
            count: 4,
        }
    }

    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }
}

impl Default for MockImageExtractor {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ImageExtractor for MockImageExtractor {
    async fn extract(&self, listing_url: &str) -> Result<Vec<String>, PhotoError> {
        let url = parse_listing_url(listing_url)?;

        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }

        debug!("Extracting images from {}", url);
        Ok(vec!["/api/placeholder/400/500".to_string(); self.count])
    }
}
