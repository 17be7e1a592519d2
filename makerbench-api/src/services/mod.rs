//! Preview enrichment for submitted bookmarks
//!
//! A submission is enriched with the page's title, description and a
//! preview image. The image comes from `og:image` when the page declares
//! one, otherwise from a screenshot uploaded to the image host.

pub mod image_host;
pub mod metadata;
pub mod screenshot;

use std::time::Duration;

use async_trait::async_trait;
use makerbench_common::config::ServicesConfig;
use makerbench_common::db::ImageSource;
use makerbench_common::normalize::Metadata;
use makerbench_common::time;
use serde_json::Value;
use thiserror::Error;
use tracing::{info, warn};

pub use image_host::{ImageHostClient, UploadResult};
pub use metadata::{MetadataClient, PageMetadata};
pub use screenshot::{ScreenshotClient, ScreenshotResult};

/// Enrichment service construction errors
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("HTTP client error: {0}")]
    Client(String),
}

/// Source of page metadata, screenshots and hosted images
///
/// Implementations never fail outright: unsuccessful lookups are reported
/// in the returned values so a submission can still be stored.
#[async_trait]
pub trait PreviewProvider: Send + Sync {
    async fn extract_metadata(&self, url: &str) -> PageMetadata;

    async fn capture_screenshot(&self, url: &str) -> ScreenshotResult;

    async fn upload_screenshot(&self, image: Vec<u8>, bookmark_id: &str) -> UploadResult;
}

/// Provider backed by the real HTTP services
#[derive(Debug, Clone)]
pub struct HttpPreviewProvider {
    metadata: MetadataClient,
    screenshots: ScreenshotClient,
    images: ImageHostClient,
}

impl HttpPreviewProvider {
    pub fn new(
        metadata: MetadataClient,
        screenshots: ScreenshotClient,
        images: ImageHostClient,
    ) -> Self {
        Self {
            metadata,
            screenshots,
            images,
        }
    }

    /// Build all three clients from service configuration
    pub fn from_config(config: &ServicesConfig) -> Result<Self, ServiceError> {
        let metadata = MetadataClient::new(Duration::from_secs(config.metadata_timeout_secs))?;
        let screenshot_timeout = Duration::from_secs(config.screenshot_timeout_secs);
        let screenshots = ScreenshotClient::new(
            config.browserless_url.clone(),
            config.browserless_api_key.clone(),
            screenshot_timeout,
        )?;
        let images = ImageHostClient::new(config.cloudinary.clone(), screenshot_timeout)?;

        if config.browserless_api_key.is_none() {
            warn!("Browserless API key not configured; screenshots disabled");
        }
        if config.cloudinary.is_none() {
            warn!("Cloudinary credentials not configured; screenshot uploads disabled");
        }

        Ok(Self::new(metadata, screenshots, images))
    }
}

#[async_trait]
impl PreviewProvider for HttpPreviewProvider {
    async fn extract_metadata(&self, url: &str) -> PageMetadata {
        self.metadata.extract(url).await
    }

    async fn capture_screenshot(&self, url: &str) -> ScreenshotResult {
        self.screenshots.capture(url).await
    }

    async fn upload_screenshot(&self, image: Vec<u8>, bookmark_id: &str) -> UploadResult {
        self.images.upload_screenshot(image, bookmark_id).await
    }
}

/// Provider that performs no network calls
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopPreviewProvider;

#[async_trait]
impl PreviewProvider for NoopPreviewProvider {
    async fn extract_metadata(&self, _url: &str) -> PageMetadata {
        PageMetadata::default()
    }

    async fn capture_screenshot(&self, _url: &str) -> ScreenshotResult {
        ScreenshotResult::failed("Screenshots disabled")
    }

    async fn upload_screenshot(&self, _image: Vec<u8>, _bookmark_id: &str) -> UploadResult {
        UploadResult::failed("Uploads disabled")
    }
}

/// Result of enriching one submission
#[derive(Debug, Clone, PartialEq)]
pub struct Enrichment {
    pub title: Option<String>,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub image_source: ImageSource,
    /// Extraction details stored alongside the bookmark
    pub metadata: Metadata,
}

/// Gather metadata and a preview image for `url`
///
/// Image preference: `og:image`, then an uploaded screenshot, then none
/// (`fallback`). Failures are recorded in `metadata` and logged.
pub async fn enrich(provider: &dyn PreviewProvider, url: &str, bookmark_id: &str) -> Enrichment {
    let page = provider.extract_metadata(url).await;

    let mut metadata = Metadata::new();
    metadata.insert("extractedAt".to_string(), Value::from(time::now_db_string()));
    if let Some(err) = &page.error {
        warn!(url = %url, error = %err, "Metadata extraction failed");
        metadata.insert("metadataError".to_string(), Value::from(err.clone()));
    }

    let (image_url, image_source) = match page.og_image.clone() {
        Some(og_image) => {
            metadata.insert("ogImage".to_string(), Value::from(og_image.clone()));
            (Some(og_image), ImageSource::Og)
        }
        None => match screenshot_image(provider, url, bookmark_id, &mut metadata).await {
            Some(hosted) => (Some(hosted), ImageSource::Screenshot),
            None => (None, ImageSource::Fallback),
        },
    };

    info!(
        bookmark_id = %bookmark_id,
        image_source = image_source.as_str(),
        "Bookmark enriched"
    );

    Enrichment {
        title: page.title,
        description: page.description,
        image_url,
        image_source,
        metadata,
    }
}

async fn screenshot_image(
    provider: &dyn PreviewProvider,
    url: &str,
    bookmark_id: &str,
    metadata: &mut Metadata,
) -> Option<String> {
    let shot = provider.capture_screenshot(url).await;
    let image = match (shot.success, shot.image) {
        (true, Some(image)) => image,
        _ => {
            let err = shot.error.unwrap_or_else(|| "Screenshot capture failed".to_string());
            warn!(url = %url, error = %err, "Screenshot capture failed");
            metadata.insert("screenshotError".to_string(), Value::from(err));
            return None;
        }
    };

    let upload = provider.upload_screenshot(image, bookmark_id).await;
    match (upload.success, upload.url) {
        (true, Some(hosted)) => Some(hosted),
        _ => {
            let err = upload.error.unwrap_or_else(|| "Upload failed".to_string());
            warn!(bookmark_id = %bookmark_id, error = %err, "Screenshot upload failed");
            metadata.insert("uploadError".to_string(), Value::from(err));
            None
        }
    }
}
