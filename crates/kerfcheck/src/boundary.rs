//! Closed pixel boundaries and point-to-polygon signed distance.
//!
//! A [`Boundary`] is the traced outer edge of one foreground region: an
//! ordered ring of integer pixel centers, closed implicitly (the last point
//! connects back to the first). Distances are measured against the polygon
//! through those centers, so they are continuous and sub-pixel capable.

/// Minimum number of points for a boundary to enclose an area.
pub const MIN_BOUNDARY_POINTS: usize = 3;

/// Ordered, implicitly closed outline of a foreground region.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct Boundary {
    points: Vec<[i32; 2]>,
    frame: [u32; 2],
}

/// Axis-aligned bounds of a boundary, inclusive on both ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct PixelBounds {
    /// Minimum `[x, y]`.
    pub min: [i32; 2],
    /// Maximum `[x, y]`.
    pub max: [i32; 2],
}

impl PixelBounds {
    /// Width and height in pixels (inclusive span).
    pub fn size(&self) -> [u32; 2] {
        [
            (self.max[0] - self.min[0] + 1) as u32,
            (self.max[1] - self.min[1] + 1) as u32,
        ]
    }
}

impl Boundary {
    /// Build a boundary traced inside a raster of size `frame`.
    ///
    /// Returns `None` when fewer than [`MIN_BOUNDARY_POINTS`] points are given.
    pub fn new(points: Vec<[i32; 2]>, frame: [u32; 2]) -> Option<Self> {
        if points.len() < MIN_BOUNDARY_POINTS {
            return None;
        }
        Some(Self { points, frame })
    }

    /// Boundary points in traversal order.
    pub fn points(&self) -> &[[i32; 2]] {
        &self.points
    }

    /// Number of points.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// `true` when there are no points; never the case for a constructed boundary.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Raster size `[width, height]` the boundary was traced in.
    pub fn frame(&self) -> [u32; 2] {
        self.frame
    }

    /// Axis-aligned bounds of the boundary points.
    pub fn bounds(&self) -> PixelBounds {
        let mut min = self.points[0];
        let mut max = self.points[0];
        for p in &self.points[1..] {
            min[0] = min[0].min(p[0]);
            min[1] = min[1].min(p[1]);
            max[0] = max[0].max(p[0]);
            max[1] = max[1].max(p[1]);
        }
        PixelBounds { min, max }
    }

    /// Enclosed polygon area (shoelace formula, always non-negative).
    pub fn area(&self) -> f64 {
        polygon_area(&self.points)
    }

    /// Signed distance from `p` to the boundary polygon.
    ///
    /// Positive outside, negative inside, zero on the outline.
    pub fn signed_distance(&self, p: [f64; 2]) -> f64 {
        let d = self.distance_to_outline(p);
        if d == 0.0 {
            0.0
        } else if self.contains(p) {
            -d
        } else {
            d
        }
    }

    /// Unsigned distance from `p` to the nearest polygon edge.
    pub fn distance_to_outline(&self, p: [f64; 2]) -> f64 {
        let mut best_sq = f64::INFINITY;
        for (a, b) in self.edges() {
            let d_sq = point_segment_dist_sq(p, a, b);
            if d_sq < best_sq {
                best_sq = d_sq;
                if best_sq == 0.0 {
                    break;
                }
            }
        }
        best_sq.sqrt()
    }

    /// Even-odd point-in-polygon test. Points on the outline may go either way.
    pub fn contains(&self, p: [f64; 2]) -> bool {
        let mut inside = false;
        for (a, b) in self.edges() {
            if (a[1] > p[1]) != (b[1] > p[1]) {
                let x_cross = a[0] + (p[1] - a[1]) * (b[0] - a[0]) / (b[1] - a[1]);
                if p[0] < x_cross {
                    inside = !inside;
                }
            }
        }
        inside
    }

    fn edges(&self) -> impl Iterator<Item = ([f64; 2], [f64; 2])> + '_ {
        let n = self.points.len();
        (0..n).map(move |i| {
            let a = self.points[i];
            let b = self.points[(i + 1) % n];
            (
                [a[0] as f64, a[1] as f64],
                [b[0] as f64, b[1] as f64],
            )
        })
    }
}

pub(crate) fn polygon_area(points: &[[i32; 2]]) -> f64 {
    if points.len() < MIN_BOUNDARY_POINTS {
        return 0.0;
    }
    let n = points.len();
    let mut twice_area = 0i64;
    for i in 0..n {
        let [x0, y0] = points[i];
        let [x1, y1] = points[(i + 1) % n];
        twice_area += x0 as i64 * y1 as i64 - x1 as i64 * y0 as i64;
    }
    (twice_area as f64 * 0.5).abs()
}

#[inline]
fn point_segment_dist_sq(p: [f64; 2], a: [f64; 2], b: [f64; 2]) -> f64 {
    let abx = b[0] - a[0];
    let aby = b[1] - a[1];
    let apx = p[0] - a[0];
    let apy = p[1] - a[1];
    let len_sq = abx * abx + aby * aby;
    let t = if len_sq > 0.0 {
        ((apx * abx + apy * aby) / len_sq).clamp(0.0, 1.0)
    } else {
        0.0
    };
    let dx = apx - t * abx;
    let dy = apy - t * aby;
    dx * dx + dy * dy
}
