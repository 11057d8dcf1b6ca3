//! Turning user supplied media references into something a request can carry.
//!
//! Remote `http(s)` URLs are passed through untouched. Local images are read
//! and embedded as `data:` URLs. Local videos are rejected: the service only
//! accepts videos by URL.

use crate::error::{Error, Result};
use base64::{Engine as _, engine::general_purpose};
use std::fmt::Formatter;
use std::path::Path;
use tracing::debug;
use url::Url;

/// Largest audio upload accepted by the transcription endpoint.
pub const MAX_AUDIO_BYTES: u64 = 25 * 1024 * 1024;

/// Returns an image reference usable in a request: URLs unchanged, local files
/// as base64 data URLs.
pub fn load_image(input: &str) -> Result<String> {
    if is_remote(input) || is_data_url(input) {
        return Ok(input.to_string());
    }
    load_image_as_data_url(input)
}

/// Reads a local image and encodes it as `data:<mime>;base64,<payload>`.
pub fn load_image_as_data_url(path: impl AsRef<Path>) -> Result<String> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(Error::AssetNotFound(path.to_path_buf()));
    }
    let mime = image_mime(path)?;
    let bytes = std::fs::read(path)?;
    debug!(path = %path.display(), mime, len = bytes.len(), "encoding image");
    Ok(data_url(mime, &bytes))
}

/// Returns a video reference. Only remote URLs are accepted.
pub fn load_video(input: &str) -> Result<String> {
    if is_remote(input) {
        return Ok(input.to_string());
    }
    Err(Error::unsupported(format!(
        "local video files are not supported, pass an http(s) URL instead: {input}"
    )))
}

pub fn data_url(mime: &str, bytes: &[u8]) -> String {
    format!(
        "data:{mime};base64,{}",
        general_purpose::STANDARD.encode(bytes)
    )
}

pub fn image_mime(path: &Path) -> Result<&'static str> {
    match extension(path).as_deref() {
        Some("jpg" | "jpeg") => Ok("image/jpeg"),
        Some("png") => Ok("image/png"),
        Some("gif") => Ok("image/gif"),
        Some("webp") => Ok("image/webp"),
        Some("bmp") => Ok("image/bmp"),
        _ => Err(Error::unsupported(format!(
            "unrecognised image type: {}",
            path.display()
        ))),
    }
}

pub fn audio_mime(path: &Path) -> &'static str {
    match extension(path).as_deref() {
        Some("wav") => "audio/wav",
        Some("m4a" | "mp4") => "audio/mp4",
        Some("ogg") => "audio/ogg",
        Some("flac") => "audio/flac",
        Some("webm") => "audio/webm",
        _ => "audio/mpeg",
    }
}

/// An audio file read into memory for a multipart upload.
#[derive(Clone)]
pub struct AudioFile {
    pub(crate) file_name: String,
    pub(crate) mime_type: &'static str,
    pub(crate) bytes: Vec<u8>,
}

impl AudioFile {
    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    pub fn mime_type(&self) -> &'static str {
        self.mime_type
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

impl std::fmt::Debug for AudioFile {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AudioFile")
            .field("file_name", &self.file_name)
            .field("mime_type", &self.mime_type)
            .field("len", &self.bytes.len())
            .finish()
    }
}

pub fn load_audio(path: impl AsRef<Path>) -> Result<AudioFile> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(Error::AssetNotFound(path.to_path_buf()));
    }

    let size = std::fs::metadata(path)?.len();
    if size > MAX_AUDIO_BYTES {
        return Err(Error::unsupported(format!(
            "audio file too large ({:.1} MB), maximum is {} MB: {}",
            size as f64 / (1024.0 * 1024.0),
            MAX_AUDIO_BYTES / (1024 * 1024),
            path.display()
        )));
    }

    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "audio".to_string());

    Ok(AudioFile {
        file_name,
        mime_type: audio_mime(path),
        bytes: std::fs::read(path)?,
    })
}

/// Splits a base64 data URL into its MIME type and decoded bytes.
pub fn decode_data_url(url: &str) -> Option<(String, Vec<u8>)> {
    let rest = url.strip_prefix("data:")?;
    let (mime, payload) = rest.split_once(";base64,")?;
    let bytes = general_purpose::STANDARD.decode(payload).ok()?;
    Some((mime.to_string(), bytes))
}

pub(crate) fn is_data_url(input: &str) -> bool {
    input.starts_with("data:")
}

fn is_remote(input: &str) -> bool {
    Url::parse(input)
        .map(|url| matches!(url.scheme(), "http" | "https"))
        .unwrap_or(false)
}

fn extension(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase)
}
