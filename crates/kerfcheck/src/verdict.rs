//! Verdict types and assembly from comparison results or errors.

use crate::compare::Comparison;
use crate::error::{ErrorKind, InspectError};

/// Outcome of one inspection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum VerdictStatus {
    /// No boundary point exceeds the tolerance.
    Pass,
    /// At least one boundary point exceeds the tolerance.
    Fail,
    /// The inspection could not be carried out.
    Error,
}

impl std::fmt::Display for VerdictStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Pass => "PASS",
            Self::Fail => "FAIL",
            Self::Error => "ERROR",
        };
        f.write_str(s)
    }
}

/// Final inspection result handed back to the caller.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Verdict {
    /// Pass/fail/error outcome.
    pub status: VerdictStatus,
    /// Human-readable summary.
    pub message: String,
    /// Defect pixel coordinates `[x, y]`; empty unless `status == Fail`.
    pub defect_points: Vec<[i32; 2]>,
    /// Maximum deviation over defect points (pixels); 0 unless `status == Fail`.
    pub max_deviation: f64,
    /// Error category, present only for `status == Error`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorKind>,
}

impl Verdict {
    /// Build a PASS or FAIL verdict from a comparison.
    pub fn from_comparison(cmp: &Comparison) -> Self {
        if !cmp.has_defects() {
            return Self {
                status: VerdictStatus::Pass,
                message: format!(
                    "PASS: silhouette within tolerance ({} px)",
                    cmp.tolerance_px
                ),
                defect_points: Vec::new(),
                max_deviation: 0.0,
                error: None,
            };
        }

        Self {
            status: VerdictStatus::Fail,
            message: format!(
                "FAIL: max deviation {:.2} px exceeds tolerance {} px ({} defect points)",
                cmp.max_deviation,
                cmp.tolerance_px,
                cmp.defect_points.len()
            ),
            defect_points: cmp.defect_points.iter().map(|p| [p.x, p.y]).collect(),
            max_deviation: cmp.max_deviation,
            error: None,
        }
    }

    /// Build an ERROR verdict.
    pub fn from_error(err: &InspectError) -> Self {
        Self {
            status: VerdictStatus::Error,
            message: err.to_string(),
            defect_points: Vec::new(),
            max_deviation: 0.0,
            error: Some(err.kind()),
        }
    }

    /// Collapse a comparison result into a verdict.
    pub fn assemble(result: Result<Comparison, InspectError>) -> Self {
        match result {
            Ok(cmp) => Self::from_comparison(&cmp),
            Err(err) => Self::from_error(&err),
        }
    }

    /// `true` for PASS.
    pub fn is_pass(&self) -> bool {
        self.status == VerdictStatus::Pass
    }
}
