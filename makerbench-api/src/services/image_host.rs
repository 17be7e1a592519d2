//! Cloudinary screenshot hosting
//!
//! Uploads use Cloudinary's signed REST upload: the sorted upload parameters
//! plus the API secret are hashed with SHA-256.

use std::time::Duration;

use chrono::{DateTime, Utc};
use makerbench_common::config::CloudinaryConfig;
use makerbench_common::time;
use serde::Deserialize;
use sha2::{Digest, Sha256};

use super::ServiceError;

const CLOUDINARY_BASE_URL: &str = "https://api.cloudinary.com";

/// Outcome of an image upload
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UploadResult {
    pub success: bool,
    pub url: Option<String>,
    pub public_id: Option<String>,
    pub error: Option<String>,
}

impl UploadResult {
    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            error: Some(error.into()),
            ..Default::default()
        }
    }
}

#[derive(Debug, Deserialize)]
struct UploadResponse {
    secure_url: String,
    public_id: String,
}

#[derive(Debug, Deserialize)]
struct UploadErrorResponse {
    error: UploadErrorBody,
}

#[derive(Debug, Deserialize)]
struct UploadErrorBody {
    message: String,
}

/// Sign upload parameters: `sha256("k1=v1&k2=v2..." + secret)` in hex
///
/// Parameters are sorted by key before joining.
pub fn sign_params(params: &[(&str, String)], api_secret: &str) -> String {
    let mut sorted: Vec<&(&str, String)> = params.iter().collect();
    sorted.sort_by(|a, b| a.0.cmp(b.0));

    let joined = sorted
        .iter()
        .map(|(k, v)| format!("{}={}", k, v))
        .collect::<Vec<_>>()
        .join("&");

    format!("{:x}", Sha256::digest(format!("{}{}", joined, api_secret).as_bytes()))
}

/// Cloudinary upload client
#[derive(Debug, Clone)]
pub struct ImageHostClient {
    http_client: reqwest::Client,
    base_url: String,
    credentials: Option<CloudinaryConfig>,
}

impl ImageHostClient {
    pub fn new(
        credentials: Option<CloudinaryConfig>,
        timeout: Duration,
    ) -> Result<Self, ServiceError> {
        let http_client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ServiceError::Client(e.to_string()))?;

        Ok(Self {
            http_client,
            base_url: CLOUDINARY_BASE_URL.to_string(),
            credentials,
        })
    }

    /// Point the client at another API host (tests)
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Upload a PNG screenshot as `screenshots/YYYY/MM/<bookmark_id>`
    pub async fn upload_screenshot(&self, image: Vec<u8>, bookmark_id: &str) -> UploadResult {
        self.upload_at(image, bookmark_id, time::now()).await
    }

    async fn upload_at(
        &self,
        image: Vec<u8>,
        bookmark_id: &str,
        now: DateTime<Utc>,
    ) -> UploadResult {
        let Some(creds) = self.credentials.as_ref() else {
            return UploadResult::failed("Cloudinary credentials not configured");
        };

        let params = vec![
            ("folder", format!("screenshots/{}", time::year_month_folder(now))),
            ("format", "png".to_string()),
            ("overwrite", "true".to_string()),
            ("public_id", bookmark_id.to_string()),
            ("timestamp", now.timestamp().to_string()),
        ];
        let signature = sign_params(&params, &creds.api_secret);

        let file = match reqwest::multipart::Part::bytes(image)
            .file_name(format!("{}.png", bookmark_id))
            .mime_str("image/png")
        {
            Ok(part) => part,
            Err(e) => return UploadResult::failed(e.to_string()),
        };

        let mut form = reqwest::multipart::Form::new()
            .part("file", file)
            .text("api_key", creds.api_key.clone())
            .text("signature", signature)
            .text("signature_algorithm", "sha256");
        for (key, value) in params {
            form = form.text(key, value);
        }

        let url = format!("{}/v1_1/{}/image/upload", self.base_url, creds.cloud_name);
        tracing::debug!(bookmark_id = %bookmark_id, "Uploading screenshot");

        let response = match self.http_client.post(&url).multipart(form).send().await {
            Ok(response) => response,
            Err(e) => return UploadResult::failed(e.to_string()),
        };

        let status = response.status();
        if !status.is_success() {
            let message = match response.json::<UploadErrorResponse>().await {
                Ok(body) => body.error.message,
                Err(_) => format!("Upload failed with status {}", status.as_u16()),
            };
            return UploadResult::failed(message);
        }

        match response.json::<UploadResponse>().await {
            Ok(body) => UploadResult {
                success: true,
                url: Some(body.secure_url),
                public_id: Some(body.public_id),
                error: None,
            },
            Err(_) => UploadResult::failed("No result returned from Cloudinary"),
        }
    }
}
