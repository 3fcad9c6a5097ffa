//! Gallery state: the prompt draft, the request lifecycle and the ordered
//! list of generated images with their caption visibility.
//!
//! The gallery itself performs no I/O. A front end drives it with
//! [`Gallery::begin_submit`] / [`Gallery::settle`] around a request to the
//! proxy endpoint (see [`client::GalleryClient`]).

pub mod client;
pub mod terminal;

pub use client::GalleryClient;

use crate::encoding;
use crate::models::ImagePayload;
use crate::{Error, Result};
use serde::Serialize;

pub const SUBMIT_LABEL: &str = "Generate";
pub const SUBMIT_LABEL_LOADING: &str = "Generating...";
pub const HIDE_CAPTIONS_LABEL: &str = "Hide Captions";
pub const SHOW_CAPTIONS_LABEL: &str = "Show Captions";

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedImage {
    url: String,
    caption: String,
    pub show_caption: bool,
}

impl GeneratedImage {
    /// Fails unless `url` is a well-formed JPEG data URI.
    pub fn new(url: String, caption: String, show_caption: bool) -> Result<Self> {
        if !encoding::is_jpeg_data_uri(&url) {
            return Err(Error::Input(
                "image is not a well-formed JPEG data URI".to_string(),
            ));
        }

        Ok(Self {
            url,
            caption,
            show_caption,
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn caption(&self) -> &str {
        &self.caption
    }

    pub fn overlay(&self) -> CaptionOverlay {
        if self.show_caption {
            CaptionOverlay::Visible
        } else {
            CaptionOverlay::RevealOnHover
        }
    }

    /// Decoded JPEG bytes.
    pub fn bytes(&self) -> Result<Vec<u8>> {
        encoding::decode_jpeg_data_uri(&self.url)
    }
}

/// How a cell's caption overlay is drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaptionOverlay {
    /// Always fully opaque.
    Visible,
    /// Transparent at rest, opaque while the pointer is over the cell.
    RevealOnHover,
}

impl CaptionOverlay {
    pub fn is_visible(self, hovered: bool) -> bool {
        match self {
            CaptionOverlay::Visible => true,
            CaptionOverlay::RevealOnHover => hovered,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Gallery {
    input_text: String,
    is_loading: bool,
    images: Vec<GeneratedImage>,
    error: Option<String>,
    show_all_captions: bool,
}

impl Default for Gallery {
    fn default() -> Self {
        Self::new()
    }
}

impl Gallery {
    pub fn new() -> Self {
        Self {
            input_text: String::new(),
            is_loading: false,
            images: Vec::new(),
            error: None,
            show_all_captions: true,
        }
    }

    pub fn input_text(&self) -> &str {
        &self.input_text
    }

    pub fn set_input_text(&mut self, text: impl Into<String>) {
        self.input_text = text.into();
    }

    pub fn is_loading(&self) -> bool {
        self.is_loading
    }

    pub fn images(&self) -> &[GeneratedImage] {
        &self.images
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn show_all_captions(&self) -> bool {
        self.show_all_captions
    }

    /// The submit control and the input are disabled while a request is in flight.
    pub fn can_submit(&self) -> bool {
        !self.is_loading
    }

    pub fn submit_label(&self) -> &'static str {
        if self.is_loading {
            SUBMIT_LABEL_LOADING
        } else {
            SUBMIT_LABEL
        }
    }

    pub fn caption_toggle_label(&self) -> &'static str {
        if self.show_all_captions {
            HIDE_CAPTIONS_LABEL
        } else {
            SHOW_CAPTIONS_LABEL
        }
    }

    /// Toggle and clear controls only exist once there is something to act on.
    pub fn has_toolbar(&self) -> bool {
        !self.images.is_empty()
    }

    /// Starts a submission and returns the prompt to send, exactly as typed.
    ///
    /// Returns `None` while another submission is still in flight.
    pub fn begin_submit(&mut self) -> Option<String> {
        if self.is_loading {
            return None;
        }

        self.is_loading = true;
        self.error = None;
        Some(self.input_text.clone())
    }

    /// Settles the in-flight submission, whatever its outcome.
    pub fn settle(&mut self, outcome: Result<ImagePayload>) {
        self.is_loading = false;

        let appended = outcome.and_then(|payload| {
            GeneratedImage::new(payload.image, payload.caption, self.show_all_captions)
        });

        match appended {
            Ok(image) => self.images.push(image),
            Err(e) => self.error = Some(e.to_string()),
        }
    }

    pub fn clear_all(&mut self) {
        self.images.clear();
    }

    /// Flips the global default and forces every existing image to match it.
    pub fn toggle_all_captions(&mut self) {
        self.show_all_captions = !self.show_all_captions;
        let show = self.show_all_captions;
        self.images
            .iter_mut()
            .for_each(|image| image.show_caption = show);
    }

    /// Reveal target for devices without hover: flips one image's caption.
    ///
    /// Returns the new visibility, or `None` if `index` is out of range.
    pub fn toggle_caption(&mut self, index: usize) -> Option<bool> {
        let image = self.images.get_mut(index)?;
        image.show_caption = !image.show_caption;
        Some(image.show_caption)
    }
}
