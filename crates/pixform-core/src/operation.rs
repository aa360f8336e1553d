//! Image operations selectable from the upload form.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A single transform applied to an uploaded image.
///
/// The set is closed: every consumer matches exhaustively, so adding a variant
/// is a compile-time checked change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Operation {
    /// Convert to single-channel luminance, keeping the input container.
    Grayscale,
    /// Re-encode as WebP.
    ToWebp,
    /// Re-encode as JPEG.
    ToJpeg,
    /// Re-encode as PNG.
    ToPng,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unsupported operation: {0}")]
pub struct ParseOperationError(pub String);

impl Operation {
    pub const ALL: [Operation; 4] = [
        Operation::Grayscale,
        Operation::ToWebp,
        Operation::ToJpeg,
        Operation::ToPng,
    ];

    /// Identifier submitted by the HTML form (`cgray`, `cwebp`, ...).
    pub fn wire_id(self) -> &'static str {
        match self {
            Operation::Grayscale => "cgray",
            Operation::ToWebp => "cwebp",
            Operation::ToJpeg => "cjpg",
            Operation::ToPng => "cpng",
        }
    }

    /// Canonical name used in logs.
    pub fn name(self) -> &'static str {
        match self {
            Operation::Grayscale => "grayscale",
            Operation::ToWebp => "to-webp",
            Operation::ToJpeg => "to-jpeg",
            Operation::ToPng => "to-png",
        }
    }

    /// Label shown in the operation select box.
    pub fn label(self) -> &'static str {
        match self {
            Operation::Grayscale => "Convert to Grayscale",
            Operation::ToWebp => "Convert to WebP",
            Operation::ToJpeg => "Convert to JPG",
            Operation::ToPng => "Convert to PNG",
        }
    }

    /// Extension (with leading dot) of the artifact this operation produces.
    ///
    /// `None` means the input extension is kept.
    pub fn target_extension(self) -> Option<&'static str> {
        match self {
            Operation::Grayscale => None,
            Operation::ToWebp => Some(".webp"),
            Operation::ToJpeg => Some(".jpg"),
            Operation::ToPng => Some(".png"),
        }
    }

    /// Parse a form wire identifier only (`cgray`, `cwebp`, `cjpg`, `cpng`).
    pub fn from_wire(value: &str) -> Option<Operation> {
        Operation::ALL.into_iter().find(|op| op.wire_id() == value)
    }
}

impl FromStr for Operation {
    type Err = ParseOperationError;

    /// Accepts wire identifiers and canonical names.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        Operation::ALL
            .into_iter()
            .find(|op| op.wire_id() == trimmed || op.name() == trimmed)
            .ok_or_else(|| ParseOperationError(s.to_string()))
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
