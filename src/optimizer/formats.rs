//! Image file formats: which sources a scan picks up, the output encodings, and
//! where each output is written.

use std::path::{Path, PathBuf};
use std::str::FromStr;
use serde::{Deserialize, Serialize};
use crate::optimizer::OptimizeError;

/// Source extensions picked up by a scan.
pub const SUPPORTED_EXTENSIONS: [&str; 7] = ["png", "jpg", "jpeg", "webp", "tiff", "tif", "gif"];

/// File-name marker for outputs written next to a kept original.
pub const OPTIMIZED_MARKER: &str = "_optimized";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    WebP,
    Jpeg,
    Png,
}

impl OutputFormat {
    pub fn extension(&self) -> &'static str {
        match self { Self::WebP => "webp", Self::Jpeg => "jpeg", Self::Png => "png" }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.extension().to_uppercase())
    }
}

impl FromStr for OutputFormat {
    type Err = OptimizeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "webp" => Ok(Self::WebP),
            "jpg" | "jpeg" => Ok(Self::Jpeg),
            "png" => Ok(Self::Png),
            other => Err(OptimizeError::format(format!("Unsupported output format: {}", other))),
        }
    }
}

fn extension_of(path: &Path) -> Option<String> {
    path.extension().and_then(|e| e.to_str()).map(|e| e.to_lowercase())
}

pub fn is_supported(path: &Path) -> bool {
    extension_of(path).is_some_and(|ext| SUPPORTED_EXTENSIONS.contains(&ext.as_str()))
}

pub fn is_optimized_artifact(path: &Path) -> bool {
    path.file_name().and_then(|n| n.to_str()).is_some_and(|n| n.contains(OPTIMIZED_MARKER))
}

/// Where the recompressed copy of `input` goes: `<stem>_optimized.<ext>` when the original
/// is kept, otherwise `<stem>.<ext>` beside it.
pub fn output_path(input: &Path, format: OutputFormat, preserve_original: bool) -> PathBuf {
    let stem = input.file_stem().and_then(|s| s.to_str()).unwrap_or("image");
    let name = if preserve_original {
        format!("{}{}.{}", stem, OPTIMIZED_MARKER, format.extension())
    } else {
        format!("{}.{}", stem, format.extension())
    };
    input.with_file_name(name)
}
