//! Line-oriented terminal front end for the gallery.
//!
//! Any line that is not a command is submitted as a prompt, exactly as typed.
//! A prompt that itself starts with `:` is entered with a doubled colon.
//! A terminal has no hover, so hidden captions are revealed per image with
//! `:caption N`.

use super::{CaptionOverlay, Gallery, GalleryClient, SUBMIT_LABEL_LOADING};
use crate::Result;
use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};

pub const HELP: &str = "\
Type a prompt and press Enter to generate an image.
Commands:
  :captions    hide/show all captions
  :caption N   toggle the caption of image N
  :clear       remove all images
  :save DIR    write all images to DIR as JPEG files
  :list        show the gallery
  :help        show this help
  :quit        exit
Start a line with '::' to send a prompt that begins with ':'.";

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Prompt(String),
    ToggleCaptions,
    ToggleCaption(usize),
    Clear,
    Save(PathBuf),
    List,
    Help,
    Quit,
}

impl Command {
    pub fn parse(line: &str) -> std::result::Result<Self, String> {
        let Some(command) = line.strip_prefix(':') else {
            return Ok(Command::Prompt(line.to_string()));
        };
        if command.starts_with(':') {
            return Ok(Command::Prompt(command.to_string()));
        }

        let mut parts = command.trim().splitn(2, char::is_whitespace);
        let name = parts.next().unwrap_or_default();
        let arg = parts.next().map(str::trim).filter(|a| !a.is_empty());

        match (name, arg) {
            ("captions", None) => Ok(Command::ToggleCaptions),
            ("caption", Some(n)) => match n.parse::<usize>() {
                Ok(n) if n >= 1 => Ok(Command::ToggleCaption(n - 1)),
                _ => Err(format!("'{}' is not an image number", n)),
            },
            ("caption", None) => Err("usage: :caption N".to_string()),
            ("clear", None) => Ok(Command::Clear),
            ("save", Some(dir)) => Ok(Command::Save(PathBuf::from(dir))),
            ("save", None) => Err("usage: :save DIR".to_string()),
            ("list", None) => Ok(Command::List),
            ("help", None) => Ok(Command::Help),
            ("quit", None) | ("q", None) => Ok(Command::Quit),
            _ => Err(format!("unknown command ':{}' (try :help)", command.trim())),
        }
    }
}

/// Draws the gallery as plain text.
pub fn render(gallery: &Gallery) -> String {
    let mut out = String::new();

    if let Some(error) = gallery.error() {
        let _ = writeln!(out, "! {}", error);
    }

    if gallery.images().is_empty() {
        let _ = writeln!(out, "(no images yet)");
        return out;
    }

    for (i, image) in gallery.images().iter().enumerate() {
        let number = i + 1;
        match image.overlay() {
            CaptionOverlay::Visible => {
                let _ = writeln!(out, "[{}] {}", number, image.caption());
            }
            // No hover in a terminal, so the caption stays hidden.
            CaptionOverlay::RevealOnHover => {
                let _ = writeln!(
                    out,
                    "[{}] (caption hidden, :caption {} to reveal)",
                    number, number
                );
            }
        }
        let _ = writeln!(out, "    {}", describe_payload(image.url()));
    }

    let _ = writeln!(
        out,
        ":captions {} | :clear Clear All",
        gallery.caption_toggle_label()
    );
    out
}

fn describe_payload(url: &str) -> String {
    let encoded_len = url.len().saturating_sub(crate::encoding::JPEG_DATA_URI_PREFIX.len());
    // Four base64 characters carry three bytes.
    let approx_bytes = encoded_len / 4 * 3;
    format!("JPEG, ~{:.1} KB", approx_bytes as f64 / 1024.0)
}

/// Writes every image, in display order, to `dir/image-NNN.jpg`.
pub fn save_images(gallery: &Gallery, dir: &Path) -> Result<Vec<PathBuf>> {
    fs::create_dir_all(dir)?;

    gallery
        .images()
        .iter()
        .enumerate()
        .map(|(i, image)| -> Result<PathBuf> {
            let path = dir.join(format!("image-{:03}.jpg", i + 1));
            fs::write(&path, image.bytes()?)?;
            Ok(path)
        })
        .collect()
}

/// Reads commands from `input` until EOF or `:quit`, returning the final state.
pub async fn run<R, W>(client: &GalleryClient, input: R, out: &mut W) -> Result<Gallery>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut gallery = Gallery::new();
    let mut lines = input.lines();

    emit(out, format!("{}\nSending prompts to {}\n", HELP, client.endpoint())).await?;

    while let Some(line) = lines.next_line().await? {
        let command = match Command::parse(&line) {
            Ok(command) => command,
            Err(message) => {
                emit(out, format!("{}\n", message)).await?;
                continue;
            }
        };

        let text = match command {
            Command::Prompt(text) => {
                gallery.set_input_text(text);
                emit(out, format!("{}\n", SUBMIT_LABEL_LOADING)).await?;
                client.submit(&mut gallery).await;
                render(&gallery)
            }
            Command::ToggleCaptions if gallery.has_toolbar() => {
                gallery.toggle_all_captions();
                render(&gallery)
            }
            Command::Clear if gallery.has_toolbar() => {
                gallery.clear_all();
                render(&gallery)
            }
            Command::ToggleCaptions | Command::Clear => "No images yet\n".to_string(),
            Command::ToggleCaption(index) => match gallery.toggle_caption(index) {
                Some(_) => render(&gallery),
                None => format!("No image #{}\n", index + 1),
            },
            Command::Save(dir) => match save_images(&gallery, &dir) {
                Ok(paths) => format!("Saved {} image(s) to {}\n", paths.len(), dir.display()),
                Err(e) => {
                    tracing::error!("Failed to save images to {}: {}", dir.display(), e);
                    format!("! {}\n", e)
                }
            },
            Command::List => render(&gallery),
            Command::Help => format!("{}\n", HELP),
            Command::Quit => break,
        };
        emit(out, text).await?;
    }

    Ok(gallery)
}

async fn emit<W: AsyncWrite + Unpin>(out: &mut W, text: String) -> Result<()> {
    out.write_all(text.as_bytes()).await?;
    out.flush().await?;
    Ok(())
}
