//! Prompt-to-image gallery
//!
//! A small proxy that forwards text prompts to a remote image-generation
//! service and hands back JPEG data URIs, plus the gallery that collects the
//! results and manages their captions.

pub mod encoding;
pub mod error;
pub mod gallery;
pub mod models;
pub mod server;
pub mod upstream;

pub use error::{Error, ErrorKind, Result};
