use super::ImageGenerationService;
use crate::models::UpstreamImage;
use crate::{Error, Result};
use async_trait::async_trait;
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use reqwest::header::ACCEPT;
use reqwest::{Client, Url};

/// Characters left alone when escaping a URI component; spaces become `%20`.
const URI_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// Calls the image service at a fixed base URL.
///
/// No timeout is set on purpose: the transport default applies.
pub struct ImageServiceClient {
    client: Client,
    base_url: Url,
}

impl ImageServiceClient {
    pub fn new(base_url: Url) -> Self {
        Self::new_with_client(base_url, Client::new())
    }

    pub fn new_with_client(base_url: Url, client: Client) -> Self {
        Self { client, base_url }
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Base URL with `prompt` appended to any query it already carries.
    fn prompt_url(&self, prompt: &str) -> Url {
        let prompt = utf8_percent_encode(prompt, URI_COMPONENT);
        let query = match self.base_url.query() {
            Some(existing) if !existing.is_empty() => format!("{}&prompt={}", existing, prompt),
            _ => format!("prompt={}", prompt),
        };

        let mut url = self.base_url.clone();
        url.set_query(Some(&query));
        url
    }
}

#[async_trait]
impl ImageGenerationService for ImageServiceClient {
    async fn generate_image(&self, prompt: &str) -> Result<UpstreamImage> {
        tracing::debug!("Calling image service endpoint: {}", self.base_url);

        let response = self
            .client
            .get(self.prompt_url(prompt))
            .header(ACCEPT, "application/json")
            .send()
            .await
            .map_err(|e| {
                tracing::error!("Failed to send request to image service: {}", e);
                e
            })?;

        let status = response.status();
        tracing::debug!("Image service response status: {}", status);

        if !status.is_success() {
            let error_text = response.text().await?;
            tracing::error!("Image service error (status {}): {}", status, error_text);
            return Err(Error::UpstreamHttp {
                status: status.as_u16(),
                body: error_text,
            });
        }

        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| {
            tracing::error!("Failed to parse image service response: {}\nBody: {}", e, body);
            Error::UpstreamPayload(format!("Failed to parse image service response: {}", e))
        })
    }
}
