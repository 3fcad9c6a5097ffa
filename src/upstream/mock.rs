use super::ImageGenerationService;
use crate::models::UpstreamImage;
use crate::{Error, Result};
use async_trait::async_trait;
use std::sync::{Arc, Mutex};

#[derive(Clone)]
enum MockResponse {
    Image(UpstreamImage),
    Status(u16, String),
}

/// In-memory image service that replays canned responses in order, cycling.
pub struct MockImageGenerationClient {
    responses: Arc<Mutex<Vec<MockResponse>>>,
    prompts: Arc<Mutex<Vec<String>>>,
}

impl MockImageGenerationClient {
    pub fn new() -> Self {
        Self {
            responses: Arc::new(Mutex::new(Vec::new())),
            prompts: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn with_image_response(self, image_bytes: &str, caption: &str) -> Self {
        self.responses
            .lock()
            .unwrap()
            .push(MockResponse::Image(UpstreamImage {
                image_bytes: image_bytes.to_string(),
                caption: caption.to_string(),
            }));
        self
    }

    pub fn with_status_response(self, status: u16, body: &str) -> Self {
        self.responses
            .lock()
            .unwrap()
            .push(MockResponse::Status(status, body.to_string()));
        self
    }

    pub fn get_call_count(&self) -> usize {
        self.prompts.lock().unwrap().len()
    }

    pub fn received_prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

impl Default for MockImageGenerationClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ImageGenerationService for MockImageGenerationClient {
    async fn generate_image(&self, prompt: &str) -> Result<UpstreamImage> {
        let count = {
            let mut prompts = self.prompts.lock().unwrap();
            prompts.push(prompt.to_string());
            prompts.len()
        };

        let responses = self.responses.lock().unwrap();
        let response = if responses.is_empty() {
            // Smallest thing that still sniffs as a JPEG
            MockResponse::Image(UpstreamImage {
                image_bytes: "ffd8ffe000104a464946".to_string(),
                caption: format!("An image of {}", prompt),
            })
        } else {
            responses[(count - 1) % responses.len()].clone()
        };

        match response {
            MockResponse::Image(image) => Ok(image),
            MockResponse::Status(status, body) => Err(Error::UpstreamHttp { status, body }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_default_response_mentions_prompt() {
        let client = MockImageGenerationClient::new();
        let image = client.generate_image("a lighthouse").await.unwrap();
        assert!(image.image_bytes.starts_with("ffd8ff"));
        assert_eq!(image.caption, "An image of a lighthouse");
    }

    #[tokio::test]
    async fn test_mock_cycles_responses_and_records_prompts() {
        let client = MockImageGenerationClient::new()
            .with_image_response("ffd8ff01", "first")
            .with_status_response(503, "overloaded");

        assert_eq!(client.generate_image("one").await.unwrap().caption, "first");
        assert!(client.generate_image("two").await.is_err());
        assert_eq!(client.generate_image("three").await.unwrap().caption, "first");

        assert_eq!(client.get_call_count(), 3);
        assert_eq!(client.received_prompts(), vec!["one", "two", "three"]);
    }
}
