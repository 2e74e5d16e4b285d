//! Error types for reference loading and inspection.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while loading a reference or inspecting an image.
///
/// Every variant is local to one request; none of them leaves the
/// [`Inspector`](crate::Inspector) in an unusable state.
#[derive(Debug, Error)]
pub enum InspectError {
    /// An inspection was attempted before any reference was loaded.
    #[error("reference silhouette not loaded")]
    ReferenceNotLoaded,

    /// Input bytes are not a decodable raster image.
    #[error("image could not be decoded: {0}")]
    Decode(String),

    /// Thresholding left no foreground region with a traceable outline.
    #[error("no shape detected in image")]
    ShapeNotFound,

    /// Query raster size differs from the reference raster size.
    #[error(
        "image dimensions {}x{} do not match reference {}x{}",
        .query[0],
        .query[1],
        .reference[0],
        .reference[1]
    )]
    DimensionMismatch {
        /// Reference raster size `[width, height]`.
        reference: [u32; 2],
        /// Query raster size `[width, height]`.
        query: [u32; 2],
    },

    /// Reading a reference image from disk failed.
    #[error("failed to read {path}: {source}")]
    Io {
        /// The path that failed.
        path: PathBuf,
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// Inspection parameters are out of range.
    #[error("invalid inspection config: {0}")]
    InvalidConfig(String),
}

impl InspectError {
    /// Stable machine-readable kind, used in serialized verdicts.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::ReferenceNotLoaded | Self::InvalidConfig(_) | Self::Io { .. } => {
                ErrorKind::Configuration
            }
            Self::Decode(_) => ErrorKind::Decode,
            Self::ShapeNotFound => ErrorKind::ShapeNotFound,
            Self::DimensionMismatch { .. } => ErrorKind::DimensionMismatch,
        }
    }
}

/// Coarse error category attached to ERROR verdicts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// Missing or unreadable reference, or invalid parameters.
    Configuration,
    /// Undecodable image bytes.
    Decode,
    /// No foreground region after thresholding.
    ShapeNotFound,
    /// Query and reference raster sizes disagree.
    DimensionMismatch,
}

/// Result type for inspection operations.
pub type InspectResult<T> = std::result::Result<T, InspectError>;
