//! Freehand stroke geometry

use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Point at parameter `t` along the segment from `self` to `other`
    pub fn lerp(&self, other: Point, t: f64) -> Point {
        Point::new(self.x + (other.x - self.x) * t, self.y + (other.y - self.y) * t)
    }

    pub fn distance(&self, other: Point) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }

    /// Distance from this point to the segment `a`-`b`
    pub fn distance_to_segment(&self, a: Point, b: Point) -> f64 {
        let dx = b.x - a.x;
        let dy = b.y - a.y;
        let len_sq = dx * dx + dy * dy;
        if len_sq == 0.0 {
            return self.distance(a);
        }
        let t = (((self.x - a.x) * dx + (self.y - a.y) * dy) / len_sq).clamp(0.0, 1.0);
        self.distance(Point::new(a.x + t * dx, a.y + t * dy))
    }
}

/// A committed polyline. Always has at least two points.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Stroke {
    points: Vec<Point>,
}

impl Stroke {
    pub const MIN_POINTS: usize = 2;

    /// Build a stroke; `None` when there are too few points to be visible
    pub fn from_points(points: Vec<Point>) -> Option<Self> {
        if points.len() >= Self::MIN_POINTS {
            Some(Self { points })
        } else {
            None
        }
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    /// Remove ink within `radius` of `center`.
    ///
    /// Segments are clipped where they enter and leave the circle, so a
    /// stroke crossed by the eraser splits into the runs on either side.
    /// Returns the surviving runs; an untouched stroke comes back as a
    /// single run equal to itself.
    pub fn erase(&self, center: Point, radius: f64) -> Vec<Stroke> {
        let mut runs = Vec::new();
        let mut run: Vec<Point> = Vec::new();

        for segment in self.points.windows(2) {
            let (a, b) = (segment[0], segment[1]);
            let overlap = circle_overlap(a, b, center, radius);
            if run.is_empty() && overlap.map_or(true, |(t0, _)| t0 > 0.0) {
                run.push(a);
            }
            match overlap {
                None => run.push(b),
                Some((t0, t1)) => {
                    if t0 > 0.0 {
                        run.push(a.lerp(b, t0));
                    }
                    runs.extend(Stroke::from_points(std::mem::take(&mut run)));
                    if t1 < 1.0 {
                        run.push(a.lerp(b, t1));
                        run.push(b);
                    }
                }
            }
        }
        runs.extend(Stroke::from_points(run));
        runs
    }

    /// True if any ink of this stroke lies within `radius` of `center`
    pub fn hit(&self, center: Point, radius: f64) -> bool {
        self.points
            .windows(2)
            .any(|w| circle_overlap(w[0], w[1], center, radius).is_some())
    }
}

/// Parameter range `[t0, t1]` of segment `a`-`b` lying inside the circle,
/// clipped to `[0, 1]`. `None` when the segment misses or only touches it.
fn circle_overlap(a: Point, b: Point, center: Point, radius: f64) -> Option<(f64, f64)> {
    let (dx, dy) = (b.x - a.x, b.y - a.y);
    let (fx, fy) = (a.x - center.x, a.y - center.y);
    let qa = dx * dx + dy * dy;
    if qa == 0.0 {
        return (a.distance(center) <= radius).then_some((0.0, 1.0));
    }
    let qb = 2.0 * (fx * dx + fy * dy);
    let qc = fx * fx + fy * fy - radius * radius;
    let disc = qb * qb - 4.0 * qa * qc;
    if disc <= 0.0 {
        return None;
    }
    let root = disc.sqrt();
    let t0 = ((-qb - root) / (2.0 * qa)).max(0.0);
    let t1 = ((-qb + root) / (2.0 * qa)).min(1.0);
    (t0 < t1).then_some((t0, t1))
}
