//! Synthetic part images: a bright square part on a dark background, with
//! optional burrs (outward protrusions) or notches (inward cuts).
//!
//! Used by unit tests, benchmarks and the CLI `generate` command.

use std::io::Cursor;

use image::{GrayImage, ImageFormat, Luma};

/// Part edge a defect is attached to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Edge {
    /// `+x` edge.
    Right,
    /// `-x` edge.
    Left,
    /// `-y` edge.
    Top,
    /// `+y` edge.
    Bottom,
}

/// Rectangular edge defect, centered along its edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EdgeDefect {
    /// Which part edge carries the defect.
    pub edge: Edge,
    /// Extent along the edge (pixels).
    pub width: u32,
    /// Extent across the edge (pixels).
    pub depth: u32,
    /// `true` for a protrusion, `false` for a notch cut into the part.
    pub outward: bool,
}

impl EdgeDefect {
    /// Outward protrusion.
    pub fn burr(edge: Edge, width: u32, depth: u32) -> Self {
        Self {
            edge,
            width,
            depth,
            outward: true,
        }
    }

    /// Inward cut.
    pub fn notch(edge: Edge, width: u32, depth: u32) -> Self {
        Self {
            edge,
            width,
            depth,
            outward: false,
        }
    }
}

/// Square part centered in a square canvas.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PartSpec {
    /// Canvas side (pixels).
    pub image_size: u32,
    /// Part side (pixels).
    pub part_size: u32,
    /// Part intensity.
    pub part_pix: u8,
    /// Background intensity.
    pub bg_pix: u8,
    /// Edge defects drawn after the part.
    pub defects: Vec<EdgeDefect>,
}

impl PartSpec {
    /// White part of side `part_size` centered on a black `image_size` canvas.
    pub fn new(image_size: u32, part_size: u32) -> Self {
        Self {
            image_size,
            part_size,
            part_pix: 255,
            bg_pix: 0,
            defects: Vec::new(),
        }
    }

    /// Override the part intensity.
    pub fn with_intensity(mut self, part_pix: u8) -> Self {
        self.part_pix = part_pix;
        self
    }

    /// Add an edge defect.
    pub fn with_defect(mut self, defect: EdgeDefect) -> Self {
        self.defects.push(defect);
        self
    }

    /// First pixel index of the part along either axis.
    pub fn part_start(&self) -> u32 {
        self.image_size.saturating_sub(self.part_size) / 2
    }

    /// One past the last pixel index of the part, clipped to the canvas.
    pub fn part_end(&self) -> u32 {
        self.part_start()
            .saturating_add(self.part_size)
            .min(self.image_size)
    }

    /// Rasterize the part and its defects.
    pub fn render(&self) -> GrayImage {
        let n = self.image_size;
        let mut img = GrayImage::from_pixel(n, n, Luma([self.bg_pix]));
        let (s, e) = (self.part_start(), self.part_end());
        fill(&mut img, [s, s], [e, e], self.part_pix);

        for d in &self.defects {
            let [x0, y0, x1, y1] = self.defect_rect(d);
            let pix = if d.outward { self.part_pix } else { self.bg_pix };
            fill(&mut img, [x0, y0], [x1, y1], pix);
        }
        img
    }

    /// Defect rectangle `[x0, y0, x1, y1)` in canvas pixels, clipped to the canvas.
    pub fn defect_rect(&self, d: &EdgeDefect) -> [u32; 4] {
        let (s, e) = (self.part_start(), self.part_end());
        let mid = self.image_size / 2;
        let along0 = mid.saturating_sub(d.width / 2);
        let along1 = along0.saturating_add(d.width);
        let (across0, across1) = match (d.edge, d.outward) {
            (Edge::Right, true) => (e, e.saturating_add(d.depth)),
            (Edge::Right, false) => (e.saturating_sub(d.depth), e),
            (Edge::Left, true) | (Edge::Top, true) => (s.saturating_sub(d.depth), s),
            (Edge::Left, false) | (Edge::Top, false) => (s, s.saturating_add(d.depth)),
            (Edge::Bottom, true) => (e, e.saturating_add(d.depth)),
            (Edge::Bottom, false) => (e.saturating_sub(d.depth), e),
        };
        let n = self.image_size;
        match d.edge {
            Edge::Right | Edge::Left => [
                across0.min(n),
                along0.min(n),
                across1.min(n),
                along1.min(n),
            ],
            Edge::Top | Edge::Bottom => [
                along0.min(n),
                across0.min(n),
                along1.min(n),
                across1.min(n),
            ],
        }
    }
}

fn fill(img: &mut GrayImage, from: [u32; 2], to: [u32; 2], pix: u8) {
    for y in from[1]..to[1] {
        for x in from[0]..to[0] {
            img.put_pixel(x, y, Luma([pix]));
        }
    }
}

/// Encode a grayscale image as PNG bytes.
pub fn encode_png(img: &GrayImage) -> image::ImageResult<Vec<u8>> {
    let mut buf = Cursor::new(Vec::new());
    img.write_to(&mut buf, ImageFormat::Png)?;
    Ok(buf.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn part_is_centered() {
        let spec = PartSpec::new(600, 300);
        assert_eq!(spec.part_start(), 150);
        assert_eq!(spec.part_end(), 450);
        let img = spec.render();
        assert_eq!(img.get_pixel(150, 150)[0], 255);
        assert_eq!(img.get_pixel(449, 449)[0], 255);
        assert_eq!(img.get_pixel(450, 300)[0], 0);
        assert_eq!(img.get_pixel(149, 300)[0], 0);
    }

    #[test]
    fn right_burr_matches_asset_layout() {
        let spec = PartSpec::new(600, 300).with_defect(EdgeDefect::burr(Edge::Right, 10, 10));
        let burr = spec.defects[0];
        assert_eq!(spec.defect_rect(&burr), [450, 295, 460, 305]);
        let img = spec.render();
        assert_eq!(img.get_pixel(459, 295)[0], 255);
        assert_eq!(img.get_pixel(459, 304)[0], 255);
        assert_eq!(img.get_pixel(460, 300)[0], 0);
        assert_eq!(img.get_pixel(455, 294)[0], 0);
    }

    #[test]
    fn notch_clears_part_pixels() {
        let spec = PartSpec::new(100, 50).with_defect(EdgeDefect::notch(Edge::Top, 6, 4));
        let img = spec.render();
        assert_eq!(spec.defect_rect(&spec.defects[0]), [47, 25, 53, 29]);
        assert_eq!(img.get_pixel(50, 25)[0], 0);
        assert_eq!(img.get_pixel(50, 29)[0], 255);
    }

    #[test]
    fn oversized_part_and_defect_are_clipped_to_canvas() {
        let spec = PartSpec::new(40, 60)
            .with_defect(EdgeDefect::burr(Edge::Bottom, u32::MAX, u32::MAX));
        assert_eq!(spec.part_start(), 0);
        assert_eq!(spec.part_end(), 40);
        assert_eq!(spec.defect_rect(&spec.defects[0]), [0, 40, 40, 40]);
        let img = spec.render();
        assert!(img.pixels().all(|p| p[0] == 255));
    }

    #[test]
    fn png_bytes_decode_back() {
        let img = PartSpec::new(32, 16).render();
        let bytes = encode_png(&img).unwrap();
        let back = image::load_from_memory(&bytes).unwrap().to_luma8();
        assert_eq!(back, img);
    }
}
