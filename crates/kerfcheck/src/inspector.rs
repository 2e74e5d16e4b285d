//! High-level inspection API.
//!
//! [`Inspector`] is the primary entry point. It owns the inspection
//! configuration and the swappable reference silhouette, and is meant to be
//! created once at startup and shared (`&Inspector` or `Arc<Inspector>`)
//! across all request handlers.

use std::path::Path;
use std::sync::Arc;

use rayon::prelude::*;

use crate::compare::{compare_boundaries, Comparison};
use crate::config::InspectConfig;
use crate::error::{InspectError, InspectResult};
use crate::reference::{ReferenceSilhouette, ReferenceSlot};
use crate::silhouette;
use crate::verdict::Verdict;

/// Primary inspection interface.
///
/// # Examples
///
/// ```no_run
/// use kerfcheck::{InspectConfig, Inspector};
///
/// let inspector = Inspector::new(InspectConfig::default()).unwrap();
/// inspector
///     .load_reference_file(std::path::Path::new("reference.png"))
///     .unwrap();
/// let bytes = std::fs::read("part.png").unwrap();
/// let verdict = inspector.inspect(&bytes);
/// println!("{}: {}", verdict.status, verdict.message);
/// ```
#[derive(Debug)]
pub struct Inspector {
    config: InspectConfig,
    reference: ReferenceSlot,
}

impl Inspector {
    /// Create an inspector with no reference loaded.
    pub fn new(config: InspectConfig) -> InspectResult<Self> {
        config.validate().map_err(InspectError::InvalidConfig)?;
        Ok(Self {
            config,
            reference: ReferenceSlot::new(),
        })
    }

    /// Access the inspection configuration.
    pub fn config(&self) -> &InspectConfig {
        &self.config
    }

    /// Load (or reload) the reference silhouette from encoded image bytes.
    ///
    /// On failure the previously loaded reference, if any, stays in place.
    pub fn load_reference(&self, bytes: &[u8]) -> InspectResult<()> {
        let reference = ReferenceSilhouette::from_bytes(bytes, &self.config)
            .inspect_err(|e| tracing::warn!("reference load failed: {e}"))?;
        self.install(reference)
    }

    /// Load (or reload) the reference silhouette from an image file.
    pub fn load_reference_file(&self, path: &Path) -> InspectResult<()> {
        let reference = ReferenceSilhouette::from_path(path, &self.config).inspect_err(|e| {
            tracing::warn!("reference load from {} failed: {e}", path.display())
        })?;
        self.install(reference)
    }

    /// Publish an already built reference.
    ///
    /// The reference must have been extracted with this inspector's
    /// threshold and smoothing; otherwise it is rejected with
    /// [`InspectError::InvalidConfig`] and the current reference is kept.
    pub fn install(&self, reference: ReferenceSilhouette) -> InspectResult<()> {
        if !reference.is_compatible_with(&self.config) {
            return Err(InspectError::InvalidConfig(format!(
                "reference extracted with threshold {} smoothing {:?}, inspector uses threshold {} smoothing {:?}",
                reference.threshold(),
                reference.smoothing_sigma(),
                self.config.threshold,
                self.config.smoothing_sigma,
            )));
        }
        let frame = reference.frame();
        tracing::info!(
            "reference loaded: {} boundary points, area {:.0} px², frame {}x{}",
            reference.boundary().len(),
            reference.area(),
            frame[0],
            frame[1],
        );
        if self.reference.publish(reference).is_some() {
            tracing::info!("previous reference replaced");
        }
        Ok(())
    }

    /// Snapshot of the current reference.
    pub fn reference(&self) -> Option<Arc<ReferenceSilhouette>> {
        self.reference.get()
    }

    /// Run extraction and comparison, returning the raw comparison.
    pub fn compare(&self, bytes: &[u8]) -> InspectResult<Comparison> {
        let reference = self.reference.get().ok_or(InspectError::ReferenceNotLoaded)?;
        self.compare_against(bytes, &reference)
    }

    /// Inspect one encoded image against the current reference.
    pub fn inspect(&self, bytes: &[u8]) -> Verdict {
        let verdict = Verdict::assemble(self.compare(bytes));
        tracing::debug!(
            status = %verdict.status,
            n_defects = verdict.defect_points.len(),
            max_deviation = verdict.max_deviation,
            "inspection finished"
        );
        verdict
    }

    /// Inspect several images in parallel against one reference snapshot.
    ///
    /// Verdicts are returned in input order. A reload that happens while the
    /// batch runs does not affect it.
    pub fn inspect_batch<B>(&self, images: &[B]) -> Vec<Verdict>
    where
        B: AsRef<[u8]> + Sync,
    {
        let Some(reference) = self.reference.get() else {
            let err = InspectError::ReferenceNotLoaded;
            return images.iter().map(|_| Verdict::from_error(&err)).collect();
        };
        let verdicts: Vec<Verdict> = images
            .par_iter()
            .map(|bytes| Verdict::assemble(self.compare_against(bytes.as_ref(), &reference)))
            .collect();
        let n_fail = verdicts.iter().filter(|v| !v.is_pass()).count();
        tracing::info!("batch of {} inspected, {} not passed", verdicts.len(), n_fail);
        verdicts
    }

    fn compare_against(
        &self,
        bytes: &[u8],
        reference: &ReferenceSilhouette,
    ) -> InspectResult<Comparison> {
        let extracted = silhouette::extract_from_bytes(bytes, &self.config)?;
        compare_boundaries(&extracted, reference, self.config.tolerance_px)
    }
}
