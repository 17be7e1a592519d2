//! Browserless screenshot capture

use std::time::Duration;

use serde::Serialize;
use serde_json::json;

use super::ServiceError;

/// Outcome of a screenshot capture
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScreenshotResult {
    pub success: bool,
    /// PNG bytes when `success`
    pub image: Option<Vec<u8>>,
    pub error: Option<String>,
}

impl ScreenshotResult {
    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            success: false,
            image: None,
            error: Some(error.into()),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ScreenshotPayload<'a> {
    url: &'a str,
    options: serde_json::Value,
    viewport: serde_json::Value,
    wait_for_timeout: u64,
}

/// Browserless `/screenshot` client
#[derive(Debug, Clone)]
pub struct ScreenshotClient {
    http_client: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
}

impl ScreenshotClient {
    pub fn new(
        base_url: impl Into<String>,
        api_key: Option<String>,
        timeout: Duration,
    ) -> Result<Self, ServiceError> {
        let http_client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ServiceError::Client(e.to_string()))?;

        Ok(Self {
            http_client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key,
        })
    }

    /// Capture a 1280x800 PNG of `url` after a 3 s settle delay
    pub async fn capture(&self, url: &str) -> ScreenshotResult {
        let Some(key) = self.api_key.as_deref() else {
            return ScreenshotResult::failed("Browserless API key not configured");
        };

        let payload = ScreenshotPayload {
            url,
            options: json!({ "type": "png", "fullPage": false }),
            viewport: json!({ "width": 1280, "height": 800 }),
            wait_for_timeout: 3000,
        };

        tracing::debug!(url = %url, "Requesting screenshot");

        let response = match self
            .http_client
            .post(format!("{}/screenshot", self.base_url))
            .query(&[("token", key)])
            .json(&payload)
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) if e.is_timeout() => {
                return ScreenshotResult::failed("Screenshot capture timeout")
            }
            Err(e) => return ScreenshotResult::failed(e.to_string()),
        };

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return ScreenshotResult::failed(format!(
                "Browserless API error: {} - {}",
                status.as_u16(),
                error_text
            ));
        }

        match response.bytes().await {
            Ok(bytes) => ScreenshotResult {
                success: true,
                image: Some(bytes.to_vec()),
                error: None,
            },
            Err(e) if e.is_timeout() => ScreenshotResult::failed("Screenshot capture timeout"),
            Err(e) => ScreenshotResult::failed(e.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_partial_json, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_missing_key_is_unsuccessful() {
        let client =
            ScreenshotClient::new("http://localhost", None, Duration::from_secs(1)).unwrap();
        let result = client.capture("https://example.com").await;
        assert!(!result.success);
        assert!(result.image.is_none());
        assert!(result.error.unwrap().contains("not configured"));
    }

    #[tokio::test]
    async fn test_capture_posts_viewport_and_token() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/screenshot"))
            .and(query_param("token", "bl-key"))
            .and(body_partial_json(json!({
                "url": "https://example.com",
                "viewport": { "width": 1280, "height": 800 },
                "waitForTimeout": 3000
            })))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(vec![0x89, b'P', b'N', b'G']))
            .expect(1)
            .mount(&server)
            .await;

        let client = ScreenshotClient::new(
            server.uri(),
            Some("bl-key".to_string()),
            Duration::from_secs(5),
        )
        .unwrap();
        let result = client.capture("https://example.com").await;

        assert!(result.success);
        assert_eq!(result.image.unwrap(), vec![0x89, b'P', b'N', b'G']);
    }

    #[tokio::test]
    async fn test_capture_reports_api_errors() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(429).set_body_string("rate limited"))
            .mount(&server)
            .await;

        let client =
            ScreenshotClient::new(server.uri(), Some("k".to_string()), Duration::from_secs(5))
                .unwrap();
        let result = client.capture("https://example.com").await;

        assert!(!result.success);
        assert_eq!(result.error.as_deref(), Some("Browserless API error: 429 - rate limited"));
    }
}
