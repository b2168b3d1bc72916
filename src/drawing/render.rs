//! Stroke replay targets
//!
//! A full redraw clears the target and replays every committed stroke in
//! order. [`Raster`] is an in-memory coverage bitmap with the same replay
//! contract as the browser canvas; replaying the same stroke list always
//! yields the same pixels.

use super::stroke::Point;

/// Something committed strokes can be replayed onto
pub trait RenderTarget {
    fn clear(&mut self);

    fn draw_polyline(&mut self, points: &[Point], line_width: f64);
}

/// Coverage bitmap: 0 is background, 255 is ink
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Raster {
    width: usize,
    height: usize,
    pixels: Vec<u8>,
}

impl Raster {
    pub const INK: u8 = 255;

    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            pixels: vec![0; width * height],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn pixel(&self, x: usize, y: usize) -> Option<u8> {
        if x < self.width && y < self.height {
            Some(self.pixels[y * self.width + x])
        } else {
            None
        }
    }

    pub fn is_inked(&self, x: usize, y: usize) -> bool {
        self.pixel(x, y) == Some(Self::INK)
    }

    pub fn ink_count(&self) -> usize {
        self.pixels.iter().filter(|&&p| p == Self::INK).count()
    }

    /// Ink every pixel whose center lies within `half_width` of segment a-b
    fn fill_segment(&mut self, a: Point, b: Point, half_width: f64) {
        if self.width == 0 || self.height == 0 {
            return;
        }
        let max_x = (self.width - 1) as f64;
        let max_y = (self.height - 1) as f64;
        let x0 = (a.x.min(b.x) - half_width).floor().clamp(0.0, max_x) as usize;
        let x1 = (a.x.max(b.x) + half_width).ceil().clamp(0.0, max_x) as usize;
        let y0 = (a.y.min(b.y) - half_width).floor().clamp(0.0, max_y) as usize;
        let y1 = (a.y.max(b.y) + half_width).ceil().clamp(0.0, max_y) as usize;

        for y in y0..=y1 {
            for x in x0..=x1 {
                let center = Point::new(x as f64 + 0.5, y as f64 + 0.5);
                if center.distance_to_segment(a, b) <= half_width {
                    self.pixels[y * self.width + x] = Self::INK;
                }
            }
        }
    }
}

impl RenderTarget for Raster {
    fn clear(&mut self) {
        self.pixels.iter_mut().for_each(|p| *p = 0);
    }

    fn draw_polyline(&mut self, points: &[Point], line_width: f64) {
        let half_width = (line_width / 2.0).max(0.5);
        for segment in points.windows(2) {
            self.fill_segment(segment[0], segment[1], half_width);
        }
    }
}
