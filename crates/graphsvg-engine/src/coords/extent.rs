use super::Vec2;

/// Axis-aligned rectangle in logical units.
///
/// An `Extent` is the "view" of a graph: it decides which part of the logical
/// plane lands on the device canvas. Width and height may be any real; the
/// mapping functions divide by them, so a zero-sized extent yields non-finite
/// results and is the caller's responsibility.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Extent {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Extent {
    #[inline]
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height }
    }

    /// Overwrites all four components.
    #[inline]
    pub fn set(&mut self, x: f64, y: f64, width: f64, height: f64) {
        *self = Self::new(x, y, width, height);
    }

    /// Translates the extent in place.
    #[inline]
    pub fn offset(&mut self, dx: f64, dy: f64) {
        self.x += dx;
        self.y += dy;
    }

    #[inline]
    pub fn min(self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }

    #[inline]
    pub fn max_x(self) -> f64 {
        self.x + self.width
    }

    #[inline]
    pub fn max_y(self) -> f64 {
        self.y + self.height
    }

    #[inline]
    pub fn area(self) -> f64 {
        self.width * self.height
    }

    /// `[min_x, min_y, max_x, max_y]`.
    #[inline]
    pub fn corners(self) -> [f64; 4] {
        [self.x, self.y, self.max_x(), self.max_y()]
    }

    /// Closed-interval test on the X axis.
    #[inline]
    pub fn contains_x(self, x: f64) -> bool {
        x >= self.x && x <= self.max_x()
    }

    /// Closed-interval test on the Y axis.
    #[inline]
    pub fn contains_y(self, y: f64) -> bool {
        y >= self.y && y <= self.max_y()
    }

    /// Unit interval to logical X.
    #[inline]
    pub fn local_x(self, t: f64) -> f64 {
        self.x + self.width * t
    }

    /// Unit interval to logical Y.
    #[inline]
    pub fn local_y(self, t: f64) -> f64 {
        self.y + self.height * t
    }

    /// Logical X to unit interval.
    #[inline]
    pub fn world_x(self, v: f64) -> f64 {
        (v - self.x) / self.width
    }

    /// Logical Y to unit interval.
    #[inline]
    pub fn world_y(self, v: f64) -> f64 {
        (v - self.y) / self.height
    }

    /// Returns an equivalent extent with non-negative width and height.
    #[inline]
    pub fn normalized(self) -> Self {
        let (x, width) = normalize_axis(self.x, self.width);
        let (y, height) = normalize_axis(self.y, self.height);
        Self::new(x, y, width, height)
    }

    /// Intersects `self` with `other`.
    ///
    /// An axis with no overlap collapses to a zero-length span placed at the
    /// midpoint of the two candidate bounds, so the result never has a negative
    /// size and its [`area`](Self::area) is zero whenever the rectangles do not
    /// overlap with positive area.
    pub fn union(self, other: Extent) -> Extent {
        let a = self.normalized();
        let b = other.normalized();
        let (x, width) = overlap(a.x, a.max_x(), b.x, b.max_x());
        let (y, height) = overlap(a.y, a.max_y(), b.y, b.max_y());
        Extent::new(x, y, width, height)
    }
}

#[inline]
fn normalize_axis(origin: f64, len: f64) -> (f64, f64) {
    if len < 0.0 { (origin + len, -len) } else { (origin, len) }
}

fn overlap(a_min: f64, a_max: f64, b_min: f64, b_max: f64) -> (f64, f64) {
    let lo = a_min.max(b_min);
    let hi = a_max.min(b_max);
    if hi >= lo {
        (lo, hi - lo)
    } else {
        ((lo + hi) * 0.5, 0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn e(x: f64, y: f64, w: f64, h: f64) -> Extent { Extent::new(x, y, w, h) }

    // ── mapping ───────────────────────────────────────────────────────────

    #[test]
    fn local_and_world_round_trip() {
        let view = e(-4.0, -3.0, 8.0, 6.0);
        for v in [-4.0, -1.25, 0.0, 0.3, 3.9, 12.5] {
            assert!((view.local_x(view.world_x(v)) - v).abs() < 1e-12);
            assert!((view.local_y(view.world_y(v)) - v).abs() < 1e-12);
        }
        for t in [0.0, 0.25, 0.5, 1.0, -0.5, 2.0] {
            assert!((view.world_x(view.local_x(t)) - t).abs() < 1e-12);
            assert!((view.world_y(view.local_y(t)) - t).abs() < 1e-12);
        }
    }

    #[test]
    fn world_x_is_monotonic_for_positive_width() {
        let view = e(-4.0, -4.0, 8.0, 8.0);
        let samples: Vec<f64> = (-20..=20).map(|i| view.world_x(f64::from(i) * 0.5)).collect();
        assert!(samples.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn unit_interval_edges_hit_bounds() {
        let view = e(-4.0, -4.0, 8.0, 8.0);
        assert_eq!(view.local_x(0.0), -4.0);
        assert_eq!(view.local_x(1.0), 4.0);
        assert_eq!(view.world_y(0.0), 0.5);
    }

    #[test]
    fn offset_translates_in_place() {
        let mut view = e(0.0, 0.0, 10.0, 10.0);
        view.offset(-1.0, 2.5);
        assert_eq!(view, e(-1.0, 2.5, 10.0, 10.0));
        assert_eq!(view.max_x(), 9.0);
        assert_eq!(view.max_y(), 12.5);
    }

    #[test]
    fn contains_is_closed() {
        let view = e(0.0, 0.0, 10.0, 10.0);
        assert!(view.contains_x(0.0));
        assert!(view.contains_x(10.0));
        assert!(!view.contains_y(10.5));
    }

    // ── union ─────────────────────────────────────────────────────────────

    #[test]
    fn union_of_overlapping_is_intersection() {
        let u = e(0.0, 0.0, 10.0, 10.0).union(e(5.0, 5.0, 10.0, 10.0));
        assert_eq!(u, e(5.0, 5.0, 5.0, 5.0));
        assert!(u.area() > 0.0);
    }

    #[test]
    fn union_of_disjoint_collapses_to_midpoint() {
        let u = e(0.0, 0.0, 5.0, 5.0).union(e(20.0, 0.0, 5.0, 5.0));
        // candidate bounds on X are lo = 20, hi = 5
        assert_eq!(u.x, 12.5);
        assert_eq!(u.width, 0.0);
        assert_eq!(u.height, 5.0);
        assert_eq!(u.area(), 0.0);
    }

    #[test]
    fn union_touching_edge_has_zero_area() {
        let u = e(0.0, 0.0, 10.0, 10.0).union(e(10.0, 0.0, 10.0, 10.0));
        assert_eq!(u.width, 0.0);
        assert_eq!(u.area(), 0.0);
    }

    #[test]
    fn union_normalizes_negative_sizes() {
        let u = e(10.0, 10.0, -10.0, -10.0).union(e(0.0, 0.0, 5.0, 5.0));
        assert_eq!(u, e(0.0, 0.0, 5.0, 5.0));
    }
}
