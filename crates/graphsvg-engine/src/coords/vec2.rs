use core::ops::Sub;

use super::DeviceSize;

/// A point or offset. Device positions and logical positions share this type;
/// which space a value lives in is up to the caller.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Vec2 {
    pub x: f64,
    pub y: f64,
}

impl Vec2 {
    #[inline]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    #[inline]
    pub const fn zero() -> Self {
        Self { x: 0.0, y: 0.0 }
    }

    /// Device position → unit square, flipped so `y = 0` is the bottom edge.
    ///
    /// The result is what [`Extent::local_x`](super::Extent::local_x) and
    /// `local_y` expect.
    pub fn unit_in(self, size: DeviceSize) -> Vec2 {
        Vec2::new(self.x / size.width_f(), 1.0 - self.y / size.height_f())
    }
}

impl Sub for Vec2 {
    type Output = Vec2;
    #[inline]
    fn sub(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x - rhs.x, self.y - rhs.y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unit_in_flips_y() {
        let size = DeviceSize::new(200, 100);
        assert_eq!(Vec2::new(0.0, 0.0).unit_in(size), Vec2::new(0.0, 1.0));
        assert_eq!(Vec2::new(50.0, 75.0).unit_in(size), Vec2::new(0.25, 0.25));
    }

    #[test]
    fn delta() {
        assert_eq!(Vec2::new(3.0, 1.0) - Vec2::new(1.0, 4.0), Vec2::new(2.0, -3.0));
    }
}
