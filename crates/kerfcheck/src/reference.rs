//! Reference silhouette loading and the shared, swappable reference slot.
//!
//! A [`ReferenceSilhouette`] is built completely before it is published to a
//! [`ReferenceSlot`]. Readers take an `Arc` snapshot and never see a
//! half-built reference; a reload swaps the whole `Arc` in one step.

use std::path::Path;
use std::sync::{Arc, RwLock};

use crate::boundary::Boundary;
use crate::config::InspectConfig;
use crate::error::{InspectError, InspectResult};
use crate::silhouette;

/// Immutable known-good silhouette.
///
/// Remembers the threshold and smoothing it was extracted with, so it can
/// only be used by an inspector that extracts queries the same way.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct ReferenceSilhouette {
    boundary: Boundary,
    area: f64,
    threshold: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    smoothing_sigma: Option<f32>,
}

impl ReferenceSilhouette {
    /// Wrap a boundary that was extracted with `config`.
    pub fn from_boundary(boundary: Boundary, config: &InspectConfig) -> Self {
        let area = boundary.area();
        Self {
            boundary,
            area,
            threshold: config.threshold,
            smoothing_sigma: config.smoothing_sigma,
        }
    }

    /// Decode reference image bytes and extract the largest bright region.
    pub fn from_bytes(bytes: &[u8], config: &InspectConfig) -> InspectResult<Self> {
        let boundary = silhouette::extract_from_bytes(bytes, config)?;
        Ok(Self::from_boundary(boundary, config))
    }

    /// Read and load a reference image file.
    pub fn from_path(path: &Path, config: &InspectConfig) -> InspectResult<Self> {
        let bytes = std::fs::read(path).map_err(|source| InspectError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_bytes(&bytes, config)
    }

    /// Reference outline.
    pub fn boundary(&self) -> &Boundary {
        &self.boundary
    }

    /// Raster size `[width, height]` of the reference image.
    pub fn frame(&self) -> [u32; 2] {
        self.boundary.frame()
    }

    /// Enclosed area in square pixels.
    pub fn area(&self) -> f64 {
        self.area
    }

    /// Binarization threshold the reference was extracted with.
    pub fn threshold(&self) -> u8 {
        self.threshold
    }

    /// Smoothing sigma the reference was extracted with.
    pub fn smoothing_sigma(&self) -> Option<f32> {
        self.smoothing_sigma
    }

    /// `true` when queries extracted with `config` are comparable to this reference.
    pub fn is_compatible_with(&self, config: &InspectConfig) -> bool {
        self.threshold == config.threshold && self.smoothing_sigma == config.smoothing_sigma
    }
}

/// Process-wide holder for the current reference.
///
/// Empty until the first successful [`publish`](Self::publish).
#[derive(Debug, Default)]
pub struct ReferenceSlot {
    current: RwLock<Option<Arc<ReferenceSilhouette>>>,
}

impl ReferenceSlot {
    /// Empty slot.
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the current reference, if one is loaded.
    pub fn get(&self) -> Option<Arc<ReferenceSilhouette>> {
        let guard = match self.current.read() {
            Ok(g) => g,
            Err(poisoned) => poisoned.into_inner(),
        };
        guard.clone()
    }

    /// Replace the current reference; returns the previous one.
    pub fn publish(&self, reference: ReferenceSilhouette) -> Option<Arc<ReferenceSilhouette>> {
        let next = Arc::new(reference);
        let mut guard = match self.current.write() {
            Ok(g) => g,
            Err(poisoned) => poisoned.into_inner(),
        };
        guard.replace(next)
    }

    /// `true` once a reference has been published.
    pub fn is_loaded(&self) -> bool {
        self.get().is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::synthetic::{encode_png, PartSpec};

    fn png(spec: &PartSpec) -> Vec<u8> {
        encode_png(&spec.render()).unwrap()
    }

    #[test]
    fn loads_square_reference() {
        let bytes = png(&PartSpec::new(120, 60));
        let r = ReferenceSilhouette::from_bytes(&bytes, &InspectConfig::default()).unwrap();
        assert_eq!(r.frame(), [120, 120]);
        assert!((r.area() - 59.0 * 59.0).abs() < 1e-9);
        assert_eq!(r.threshold(), 128);
        assert_eq!(r.smoothing_sigma(), None);
    }

    #[test]
    fn compatibility_follows_extraction_settings() {
        let cfg = InspectConfig::default();
        let r = ReferenceSilhouette::from_bytes(&png(&PartSpec::new(80, 40)), &cfg).unwrap();
        assert!(r.is_compatible_with(&cfg));
        assert!(r.is_compatible_with(&InspectConfig::with_tolerance(5.0)));

        let other_threshold = InspectConfig {
            threshold: 200,
            ..InspectConfig::default()
        };
        assert!(!r.is_compatible_with(&other_threshold));

        let smoothed = InspectConfig {
            smoothing_sigma: Some(1.0),
            ..InspectConfig::default()
        };
        assert!(!r.is_compatible_with(&smoothed));
    }

    #[test]
    fn undecodable_reference_fails() {
        let err = ReferenceSilhouette::from_bytes(&[0u8; 16], &InspectConfig::default())
            .unwrap_err();
        assert!(matches!(err, InspectError::Decode(_)));
    }

    #[test]
    fn blank_reference_fails() {
        let bytes = encode_png(&image::GrayImage::new(40, 40)).unwrap();
        let err = ReferenceSilhouette::from_bytes(&bytes, &InspectConfig::default()).unwrap_err();
        assert!(matches!(err, InspectError::ShapeNotFound));
    }

    #[test]
    fn missing_file_reports_path() {
        let err = ReferenceSilhouette::from_path(
            Path::new("/nonexistent/kerfcheck/reference.png"),
            &InspectConfig::default(),
        )
        .unwrap_err();
        assert!(matches!(err, InspectError::Io { .. }));
        assert!(err.to_string().contains("reference.png"));
    }

    #[test]
    fn slot_starts_empty_and_swaps_whole_reference() {
        let slot = ReferenceSlot::new();
        assert!(!slot.is_loaded());

        let cfg = InspectConfig::default();
        let small = ReferenceSilhouette::from_bytes(&png(&PartSpec::new(100, 20)), &cfg).unwrap();
        let large = ReferenceSilhouette::from_bytes(&png(&PartSpec::new(100, 60)), &cfg).unwrap();

        assert!(slot.publish(small.clone()).is_none());
        let before = slot.get().unwrap();

        let previous = slot.publish(large.clone()).unwrap();
        assert_eq!(*previous, small);
        assert_eq!(*slot.get().unwrap(), large);
        // A snapshot taken before the reload keeps the old reference alive.
        assert_eq!(*before, small);
    }
}
