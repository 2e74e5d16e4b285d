//! Silhouette extraction: decode → (smooth) → binarize → trace → select.
//!
//! Reference and query images go through exactly this procedure with the
//! same [`InspectConfig`], so their boundaries are directly comparable.

use image::{GrayImage, ImageBuffer, Luma};
use imageproc::contours::{find_contours, BorderType, Contour};

use crate::boundary::{polygon_area, Boundary, MIN_BOUNDARY_POINTS};
use crate::config::InspectConfig;
use crate::error::{InspectError, InspectResult};

/// Decode encoded image bytes (PNG, JPEG, ...) to 8-bit grayscale.
pub fn decode_gray(bytes: &[u8]) -> InspectResult<GrayImage> {
    let img = image::load_from_memory(bytes).map_err(|e| InspectError::Decode(e.to_string()))?;
    Ok(img.to_luma8())
}

/// Binary mask: 255 where intensity `>= threshold`, 0 elsewhere.
pub fn binarize(gray: &GrayImage, threshold: u8) -> GrayImage {
    let (w, h) = gray.dimensions();
    let mut out = GrayImage::new(w, h);
    for (src, dst) in gray.pixels().zip(out.pixels_mut()) {
        if src[0] >= threshold {
            dst[0] = 255;
        }
    }
    out
}

/// Gaussian-smooth a grayscale image in float precision.
pub fn smooth(gray: &GrayImage, sigma: f32) -> GrayImage {
    let (w, h) = gray.dimensions();
    let f = ImageBuffer::<Luma<f32>, Vec<f32>>::from_fn(w, h, |x, y| {
        Luma([gray.get_pixel(x, y)[0] as f32 / 255.0])
    });
    let blurred = imageproc::filter::gaussian_blur_f32(&f, sigma);
    GrayImage::from_fn(w, h, |x, y| {
        let v = blurred.get_pixel(x, y)[0].clamp(0.0, 1.0);
        Luma([(v * 255.0).round() as u8])
    })
}

/// Extract the outer boundary of the largest bright region of `gray`.
pub fn extract_boundary(gray: &GrayImage, config: &InspectConfig) -> InspectResult<Boundary> {
    let frame = [gray.width(), gray.height()];
    let mask = match config.smoothing_sigma {
        Some(sigma) => binarize(&smooth(gray, sigma), config.threshold),
        None => binarize(gray, config.threshold),
    };

    let contours: Vec<Contour<i32>> = find_contours(&mask);
    let n_external = contours.iter().filter(|c| is_external(c)).count();

    let best = contours
        .into_iter()
        .filter(is_external)
        .filter(|c| c.points.len() >= MIN_BOUNDARY_POINTS)
        .map(|c| c.points.into_iter().map(|p| [p.x, p.y]).collect::<Vec<_>>())
        .map(|pts| (polygon_area(&pts), pts))
        .fold(None::<(f64, Vec<[i32; 2]>)>, |best, cand| match best {
            Some(b) if b.0 >= cand.0 => Some(b),
            _ => Some(cand),
        });

    let Some((area, points)) = best else {
        tracing::debug!(n_external, "no traceable foreground region");
        return Err(InspectError::ShapeNotFound);
    };

    tracing::trace!(
        n_external,
        n_points = points.len(),
        area,
        "selected largest external region"
    );
    Boundary::new(points, frame).ok_or(InspectError::ShapeNotFound)
}

/// Decode `bytes` and extract the boundary of the largest bright region.
pub fn extract_from_bytes(bytes: &[u8], config: &InspectConfig) -> InspectResult<Boundary> {
    let gray = decode_gray(bytes)?;
    extract_boundary(&gray, config)
}

fn is_external(c: &Contour<i32>) -> bool {
    matches!(c.border_type, BorderType::Outer) && c.parent.is_none()
}
