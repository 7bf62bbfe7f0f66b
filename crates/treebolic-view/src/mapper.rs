//! Conversion between the disk's Euclidean embedding and view pixels.
//!
//! The unit disk is centered on the view; `x_shift`/`y_shift` pan it by a
//! fraction of the view extent and widen the mapping range on that axis.

use crate::geom::Point;
use treebolic_hyper::{Complex, Location};

/// Disk points mapped outside the unit circle are pulled back to this radius.
pub const MAX_DISK_RADIUS: f64 = 0.99;

#[derive(Debug, Clone, PartialEq)]
pub struct Mapper {
    width: f64,
    height: f64,
    map_scale_factor: f64,
    scale_x: f64,
    scale_y: f64,
    x_shift: f64,
    y_shift: f64,
    left: f64,
    top: f64,
}

impl Default for Mapper {
    fn default() -> Self {
        Self {
            width: 0.0,
            height: 0.0,
            map_scale_factor: 1.0,
            scale_x: 1.0,
            scale_y: 1.0,
            x_shift: 0.0,
            y_shift: 0.0,
            left: 0.0,
            top: 0.0,
        }
    }
}

impl Mapper {
    pub fn new(width: f64, height: f64) -> Self {
        let mut mapper = Self::default();
        mapper.set_size(width, height);
        mapper
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn height(&self) -> f64 {
        self.height
    }

    pub fn set_size(&mut self, width: f64, height: f64) {
        self.width = width;
        self.height = height;
        self.compute_scale();
    }

    pub fn shift(&self) -> (f64, f64) {
        (self.x_shift, self.y_shift)
    }

    pub fn set_shift(&mut self, x_shift: f64, y_shift: f64) {
        self.x_shift = x_shift;
        self.y_shift = y_shift;
        self.compute_scale();
    }

    pub fn map_scale_factor(&self) -> f64 {
        self.map_scale_factor
    }

    pub fn set_map_scale_factor(&mut self, factor: f64) {
        self.map_scale_factor = factor;
    }

    /// Offset subtracted from node positions reported to the host.
    pub fn set_origin(&mut self, left: f64, top: f64) {
        self.left = left;
        self.top = top;
    }

    pub fn origin(&self) -> Point {
        Point::new(self.left, self.top)
    }

    fn compute_scale(&mut self) {
        self.scale_x = (0.5 + self.x_shift.abs()) * self.width;
        self.scale_y = (0.5 + self.y_shift.abs()) * self.height;
    }

    pub fn x_to_view(&self, x: f64) -> f64 {
        self.scale_x * self.map_scale_factor * x + self.x_shift * self.width + self.width / 2.0
    }

    pub fn y_to_view(&self, y: f64) -> f64 {
        self.scale_y * self.map_scale_factor * y + self.y_shift * self.height + self.height / 2.0
    }

    pub fn w_to_view(&self, cx: f64) -> f64 {
        self.scale_x * self.map_scale_factor * cx
    }

    pub fn h_to_view(&self, cy: f64) -> f64 {
        self.scale_y * self.map_scale_factor * cy
    }

    pub fn to_view(&self, z: Complex) -> Point {
        Point::new(self.x_to_view(z.re), self.y_to_view(z.im))
    }

    pub fn w_to_disk(&self, cvx: f64) -> f64 {
        cvx / (self.scale_x * self.map_scale_factor)
    }

    pub fn h_to_disk(&self, cvy: f64) -> f64 {
        cvy / (self.scale_y * self.map_scale_factor)
    }

    /// Inverse of [`Mapper::to_view`], clamped to [`MAX_DISK_RADIUS`].
    pub fn to_disk(&self, p: Point) -> Complex {
        let vx = p.x - self.width / 2.0;
        let vy = p.y - self.height / 2.0;
        let z = Complex::new(
            self.w_to_disk(vx - self.x_shift * self.width),
            self.h_to_disk(vy - self.y_shift * self.height),
        );
        if z.abs2() > 1.0 {
            z.normalize().scale(MAX_DISK_RADIUS)
        } else {
            z
        }
    }

    /// Pixel position of a node's mapped center relative to the origin.
    pub fn view_location(&self, location: &Location) -> Point {
        let p = self.to_view(location.euclidean.center);
        Point::new(p.x - self.left, p.y - self.top)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_origin_maps_to_center() {
        let mapper = Mapper::new(800.0, 600.0);
        assert_eq!(mapper.to_view(Complex::ZERO), Point::new(400.0, 300.0));
        assert_eq!(mapper.to_view(Complex::new(1.0, 1.0)), Point::new(800.0, 600.0));
    }

    #[test]
    fn test_shift_widens_scale() {
        let mut mapper = Mapper::new(800.0, 600.0);
        mapper.set_shift(0.25, -0.5);
        assert_eq!(mapper.w_to_view(1.0), 600.0);
        assert_eq!(mapper.h_to_view(1.0), 600.0);
        // pan moves the origin by a fraction of each extent
        assert_eq!(mapper.to_view(Complex::ZERO), Point::new(600.0, 0.0));
    }

    #[test]
    fn test_to_disk_clamps() {
        let mapper = Mapper::new(100.0, 100.0);
        let z = mapper.to_disk(Point::new(1000.0, 50.0));
        assert!((z.abs() - MAX_DISK_RADIUS).abs() < 1e-12);
        assert!(z.re > 0.0);
    }

    #[test]
    fn test_map_scale_factor() {
        let mut mapper = Mapper::new(200.0, 200.0);
        mapper.set_map_scale_factor(2.0);
        assert_eq!(mapper.to_view(Complex::new(0.5, 0.0)), Point::new(300.0, 100.0));
        let z = mapper.to_disk(Point::new(300.0, 100.0));
        assert!((z.re - 0.5).abs() < 1e-12 && z.im.abs() < 1e-12);
    }
}
