//! External image-generation service integration
//!
//! The service is an opaque HTTP endpoint: a GET with the prompt in the query
//! string returns hex-encoded JPEG bytes and a caption.

pub mod client;
pub mod mock;

pub use client::ImageServiceClient;
pub use mock::MockImageGenerationClient;

use crate::models::UpstreamImage;
use crate::Result;
use async_trait::async_trait;

#[async_trait]
pub trait ImageGenerationService: Send + Sync {
    async fn generate_image(&self, prompt: &str) -> Result<UpstreamImage>;
}
