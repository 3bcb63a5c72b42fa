//! Chart images placed into the report.
//!
//! Images are inlined as `data:` URIs so the page does not depend on where
//! it is opened from.

use base64::Engine as _;
use serde::Deserialize;
use std::{
    fs,
    path::{Path, PathBuf},
};

/// Chart images produced outside the pipeline. Each one is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ChartImages {
    pub irradiance: Option<PathBuf>,
    pub cloud_cover: Option<PathBuf>,
    pub precipitation: Option<PathBuf>,
    pub temperature: Option<PathBuf>,
}

/// A figure slot in the report: either an embedded image or a note.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Figure {
    pub number: usize,
    pub caption: &'static str,
    pub embedded: bool,
    /// `data:` URI of the image, empty when not embedded.
    pub src: String,
    pub note: String,
}

fn media_type(path: &Path) -> &'static str {
    match path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .as_deref()
    {
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("svg") => "image/svg+xml",
        Some("webp") => "image/webp",
        _ => "image/png",
    }
}

/// Inline image bytes as a `data:` URI.
pub fn data_uri(path: &Path, bytes: &[u8]) -> String {
    format!(
        "data:{};base64,{}",
        media_type(path),
        base64::engine::general_purpose::STANDARD.encode(bytes)
    )
}

impl Figure {
    fn note(number: usize, caption: &'static str, note: String) -> Figure {
        Figure {
            number,
            caption,
            embedded: false,
            src: String::new(),
            note,
        }
    }

    /// Embed `path` if it can be read, otherwise leave a placeholder note.
    pub fn resolve(number: usize, caption: &'static str, path: Option<&Path>) -> Figure {
        let Some(p) = path else {
            return Figure::note(
                number,
                caption,
                format!("[Note] no image provided for figure {}", number),
            );
        };
        match fs::read(p) {
            Ok(bytes) if p.is_file() => Figure {
                number,
                caption,
                embedded: true,
                src: data_uri(p, &bytes),
                note: String::new(),
            },
            _ => {
                log::warn!("Chart image not found: {}", p.display());
                Figure::note(
                    number,
                    caption,
                    format!("[Note] image not found: {}", p.display()),
                )
            }
        }
    }
}
