//! Boundary deviation comparator.
//!
//! Sign convention: deviation is the signed distance from an extracted
//! boundary point to the reference polygon, positive outside the reference
//! and negative inside. Only outward deviations strictly above the tolerance
//! are defects (burrs, protrusions). Inward deviations are reported as a
//! diagnostic but never fail a part.

use crate::boundary::Boundary;
use crate::error::{InspectError, InspectResult};
use crate::reference::ReferenceSilhouette;

/// A boundary point whose outward deviation exceeds the tolerance.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct DefectPoint {
    /// Pixel x.
    pub x: i32,
    /// Pixel y.
    pub y: i32,
    /// Signed deviation from the reference outline (pixels).
    pub deviation: f64,
}

/// Point-wise comparison of one extracted boundary against the reference.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Comparison {
    /// Defect points in boundary traversal order.
    pub defect_points: Vec<DefectPoint>,
    /// Largest deviation over defect points; 0 when there are none.
    pub max_deviation: f64,
    /// Most negative deviation over all points (deepest inward point); 0 when
    /// no point lies inside the reference.
    pub min_deviation: f64,
    /// Number of extracted boundary points compared.
    pub n_points: usize,
    /// Tolerance used for this comparison (pixels).
    pub tolerance_px: f64,
}

impl Comparison {
    /// `true` when at least one defect point was found.
    pub fn has_defects(&self) -> bool {
        !self.defect_points.is_empty()
    }
}

/// Compare `extracted` against `reference` with the given tolerance.
///
/// Fails with [`InspectError::DimensionMismatch`] before any point-wise work
/// when the two boundaries were traced in rasters of different size.
pub fn compare_boundaries(
    extracted: &Boundary,
    reference: &ReferenceSilhouette,
    tolerance_px: f64,
) -> InspectResult<Comparison> {
    let ref_frame = reference.frame();
    let query_frame = extracted.frame();
    if ref_frame != query_frame {
        return Err(InspectError::DimensionMismatch {
            reference: ref_frame,
            query: query_frame,
        });
    }

    let outline = reference.boundary();
    let mut defect_points = Vec::new();
    let mut max_deviation = 0.0f64;
    let mut min_deviation = 0.0f64;

    for &[x, y] in extracted.points() {
        let deviation = outline.signed_distance([x as f64, y as f64]);
        if deviation > tolerance_px {
            defect_points.push(DefectPoint { x, y, deviation });
            max_deviation = max_deviation.max(deviation);
        }
        min_deviation = min_deviation.min(deviation);
    }

    Ok(Comparison {
        defect_points,
        max_deviation,
        min_deviation,
        n_points: extracted.len(),
        tolerance_px,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::InspectConfig;
    use crate::silhouette::extract_boundary;
    use crate::synthetic::{Edge, EdgeDefect, PartSpec};
    use approx::assert_abs_diff_eq;

    fn boundary_of(spec: &PartSpec) -> Boundary {
        extract_boundary(&spec.render(), &InspectConfig::default()).unwrap()
    }

    fn reference_of(spec: &PartSpec) -> ReferenceSilhouette {
        ReferenceSilhouette::from_boundary(boundary_of(spec), &InspectConfig::default())
    }

    #[test]
    fn identical_shapes_have_no_deviation() {
        let spec = PartSpec::new(200, 100);
        let cmp = compare_boundaries(&boundary_of(&spec), &reference_of(&spec), 0.5).unwrap();
        assert!(!cmp.has_defects());
        assert_eq!(cmp.max_deviation, 0.0);
        assert_eq!(cmp.min_deviation, 0.0);
        assert!(cmp.n_points > 0);
    }

    #[test]
    fn burr_deviation_equals_its_depth() {
        let base = PartSpec::new(200, 100);
        let burred = base
            .clone()
            .with_defect(EdgeDefect::burr(Edge::Right, 8, 6));
        let cmp = compare_boundaries(&boundary_of(&burred), &reference_of(&base), 0.5).unwrap();
        assert!(cmp.has_defects());
        assert_abs_diff_eq!(cmp.max_deviation, 6.0, epsilon = 1e-9);
        for p in &cmp.defect_points {
            assert!((150..=155).contains(&p.x), "x={} outside burr", p.x);
            assert!((96..=103).contains(&p.y), "y={} outside burr", p.y);
            assert!(p.deviation > 0.5);
        }
    }

    #[test]
    fn deviation_at_tolerance_is_not_a_defect() {
        let base = PartSpec::new(200, 100);
        let burred = base
            .clone()
            .with_defect(EdgeDefect::burr(Edge::Top, 10, 2));
        let cmp = compare_boundaries(&boundary_of(&burred), &reference_of(&base), 2.0).unwrap();
        assert!(!cmp.has_defects());
        assert_eq!(cmp.max_deviation, 0.0);

        let cmp = compare_boundaries(&boundary_of(&burred), &reference_of(&base), 1.5).unwrap();
        assert!(cmp.has_defects());
        assert_abs_diff_eq!(cmp.max_deviation, 2.0, epsilon = 1e-9);
    }

    #[test]
    fn notches_are_inward_and_never_defects() {
        let base = PartSpec::new(200, 100);
        let notched = base
            .clone()
            .with_defect(EdgeDefect::notch(Edge::Left, 10, 5));
        let cmp = compare_boundaries(&boundary_of(&notched), &reference_of(&base), 0.5).unwrap();
        assert!(!cmp.has_defects());
        assert_abs_diff_eq!(cmp.min_deviation, -5.0, epsilon = 1e-9);
    }

    #[test]
    fn frame_mismatch_is_reported_before_comparison() {
        let reference = reference_of(&PartSpec::new(200, 100));
        let other = boundary_of(&PartSpec::new(180, 100));
        let err = compare_boundaries(&other, &reference, 0.5).unwrap_err();
        match err {
            InspectError::DimensionMismatch { reference, query } => {
                assert_eq!(reference, [200, 200]);
                assert_eq!(query, [180, 180]);
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
