//! kerfcheck — silhouette inspection for laser- and die-cut parts.
//!
//! A captured grayscale image of a cut part is reduced to the outline of its
//! largest bright region and compared point by point against the outline of
//! a known-good reference part. The pipeline stages are:
//!
//! 1. **Reference** – decode the template once, extract its outline, publish
//!    it to a swappable slot shared by all inspections.
//! 2. **Silhouette** – decode a query image, binarize with the shared
//!    threshold, trace external contours, keep the largest by area.
//! 3. **Compare** – signed point-to-polygon distance of every query outline
//!    point to the reference outline (positive outside); points beyond the
//!    tolerance are defects.
//! 4. **Verdict** – PASS / FAIL / ERROR with defect points and the maximum
//!    deviation.
//!
//! Independently, [`classify`] maps an operator-supplied
//! [`AttributeBundle`] to a [`DefectCategory`] through an ordered rule table.
//!
//! # Public API
//! - [`Inspector`] as the primary entry point
//! - [`InspectConfig`] for threshold/tolerance tuning
//! - [`Verdict`], [`Comparison`] and [`InspectError`] result types
//! - [`classify`] / [`classify_explained`] for defect categorization

mod boundary;
mod classify;
mod compare;
mod config;
mod error;
mod inspector;
mod reference;
pub mod silhouette;
pub mod synthetic;
mod verdict;

pub use boundary::{Boundary, PixelBounds, MIN_BOUNDARY_POINTS};
pub use classify::{
    classify, classify_explained, first_match, AttributeBundle, DefectCategory, Rule, RULES,
};
pub use compare::{compare_boundaries, Comparison, DefectPoint};
pub use config::{ConfigError, InspectConfig, DEFAULT_THRESHOLD, DEFAULT_TOLERANCE_PX};
pub use error::{ErrorKind, InspectError, InspectResult};
pub use inspector::Inspector;
pub use reference::{ReferenceSilhouette, ReferenceSlot};
pub use verdict::{Verdict, VerdictStatus};
