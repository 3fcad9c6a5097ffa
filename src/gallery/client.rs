use super::Gallery;
use crate::models::{GenerateImageRequest, GenerateImageResponse, ImagePayload};
use crate::{Error, Result};
use reqwest::Client;

pub const GENERATE_IMAGE_PATH: &str = "/api/generate-image";

/// Talks to a running proxy endpoint on behalf of a [`Gallery`].
pub struct GalleryClient {
    client: Client,
    base_url: String,
}

impl GalleryClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::new_with_client(base_url, Client::new())
    }

    pub fn new_with_client(base_url: impl Into<String>, client: Client) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { client, base_url }
    }

    pub fn endpoint(&self) -> String {
        format!("{}{}", self.base_url, GENERATE_IMAGE_PATH)
    }

    /// Posts one prompt and interprets the envelope.
    ///
    /// The body is read as an envelope whatever the status code; the proxy
    /// answers failures with a 500 and a JSON body.
    pub async fn generate(&self, prompt: &str) -> Result<ImagePayload> {
        tracing::debug!("Sending prompt: {:?}", prompt);

        let response = self
            .client
            .post(self.endpoint())
            .json(&GenerateImageRequest {
                text: prompt.to_string(),
            })
            .send()
            .await
            .map_err(|e| {
                tracing::error!("Failed to reach proxy endpoint: {}", e);
                e
            })?;

        let status = response.status();
        let body = response.text().await?;
        let envelope: GenerateImageResponse = serde_json::from_str(&body).map_err(|e| {
            tracing::error!("Unexpected proxy response (status {}): {}", status, body);
            Error::UpstreamPayload(format!(
                "unexpected body from image endpoint (status {}): {}",
                status, e
            ))
        })?;

        envelope.into_payload()
    }

    /// Runs a full submit cycle against `gallery`.
    ///
    /// The gallery is settled on every path, so it never stays loading.
    /// Returns `false` if a submission was already in flight.
    pub async fn submit(&self, gallery: &mut Gallery) -> bool {
        let Some(prompt) = gallery.begin_submit() else {
            return false;
        };

        let outcome = self.generate(&prompt).await;
        if let Err(e) = &outcome {
            tracing::warn!("Generation failed: {}", e);
        }
        gallery.settle(outcome);
        true
    }
}
