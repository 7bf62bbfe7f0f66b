//! Pixel-space geometry: points, rectangles with out-codes, and elliptical
//! arcs in the y-down convention of drawing surfaces (angles in degrees,
//! counterclockwise on screen).

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn midpoint(self, other: Point) -> Point {
        Point::new((self.x + other.x) / 2.0, (self.y + other.y) / 2.0)
    }

    pub fn distance_sq(self, other: Point) -> f64 {
        let dx = other.x - self.x;
        let dy = other.y - self.y;
        dx * dx + dy * dy
    }

    pub fn distance(self, other: Point) -> f64 {
        self.distance_sq(other).sqrt()
    }
}

pub const OUT_BOTTOM: u8 = 1;
pub const OUT_LEFT: u8 = 2;
pub const OUT_RIGHT: u8 = 4;
pub const OUT_TOP: u8 = 8;

/// Axis-aligned rectangle; negative extents are flipped on construction.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        let (x, width) = if width < 0.0 { (x + width, -width) } else { (x, width) };
        let (y, height) = if height < 0.0 { (y + height, -height) } else { (y, height) };
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    pub fn center(&self) -> Point {
        Point::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    pub fn inflate(&self, d: f64) -> Rect {
        Rect::new(self.x - d, self.y - d, self.width + 2.0 * d, self.height + 2.0 * d)
    }

    pub fn union(&self, other: &Rect) -> Rect {
        let x = self.x.min(other.x);
        let y = self.y.min(other.y);
        Rect::new(x, y, self.right().max(other.right()) - x, self.bottom().max(other.bottom()) - y)
    }

    pub fn intersects(&self, other: &Rect) -> bool {
        self.x < other.right()
            && other.x < self.right()
            && self.y < other.bottom()
            && other.y < self.bottom()
    }

    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.x && p.x <= self.right() && p.y >= self.y && p.y <= self.bottom()
    }

    /// Which sides of the rectangle `p` lies beyond, as `OUT_*` bits.
    pub fn outcode(&self, p: Point) -> u8 {
        let mut out = 0;
        if self.width <= 0.0 {
            out |= OUT_LEFT | OUT_RIGHT;
        } else if p.x < self.x {
            out |= OUT_LEFT;
        } else if p.x > self.right() {
            out |= OUT_RIGHT;
        }
        if self.height <= 0.0 {
            out |= OUT_TOP | OUT_BOTTOM;
        } else if p.y < self.y {
            out |= OUT_TOP;
        } else if p.y > self.bottom() {
            out |= OUT_BOTTOM;
        }
        out
    }
}

/// Elliptical arc inscribed in a frame. `start` and `extent` are in degrees;
/// the rotation sense is carried separately because angle normalization
/// loses it.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Arc2D {
    pub frame: Rect,
    pub start: f64,
    pub extent: f64,
    pub counterclockwise: bool,
}

impl Arc2D {
    pub fn from_center(center: Point, corner: Point) -> Self {
        let w2 = (corner.x - center.x).abs();
        let h2 = (corner.y - center.y).abs();
        Self {
            frame: Rect::new(center.x - w2, center.y - h2, 2.0 * w2, 2.0 * h2),
            ..Default::default()
        }
    }

    pub fn center(&self) -> Point {
        self.frame.center()
    }

    pub fn width(&self) -> f64 {
        self.frame.width
    }

    pub fn height(&self) -> f64 {
        self.frame.height
    }

    fn point_at(&self, degrees: f64) -> Point {
        let angle = (-degrees).to_radians();
        Point::new(
            self.frame.x + (angle.cos() * 0.5 + 0.5) * self.frame.width,
            self.frame.y + (angle.sin() * 0.5 + 0.5) * self.frame.height,
        )
    }

    pub fn start_point(&self) -> Point {
        self.point_at(self.start)
    }

    pub fn end_point(&self) -> Point {
        self.point_at(self.start + self.extent)
    }

    /// Reset start and extent so the arc runs counterclockwise from `from`
    /// to `to`.
    pub fn set_angles(&mut self, from: Point, to: Point) {
        let c = self.center();
        let w = self.frame.width;
        let h = self.frame.height;
        let a1 = (w * (c.y - from.y)).atan2(h * (from.x - c.x));
        let mut a2 = (w * (c.y - to.y)).atan2(h * (to.x - c.x)) - a1;
        if a2 <= 0.0 {
            a2 += std::f64::consts::TAU;
        }
        self.start = a1.to_degrees();
        self.extent = a2.to_degrees();
    }

    pub fn contains_angle(&self, degrees: f64) -> bool {
        let mut extent = self.extent;
        let backwards = extent < 0.0;
        if backwards {
            extent = -extent;
        }
        if extent >= 360.0 {
            return true;
        }
        let mut angle = normalize_degrees(degrees) - normalize_degrees(self.start);
        if backwards {
            angle = -angle;
        }
        if angle < 0.0 {
            angle += 360.0;
        }
        (0.0..extent).contains(&angle)
    }
}

/// Fold an angle into (-180, 180].
pub fn normalize_degrees(angle: f64) -> f64 {
    if angle > 180.0 {
        if angle <= 540.0 {
            return angle - 360.0;
        }
    } else if angle <= -180.0 {
        if angle > -540.0 {
            return angle + 360.0;
        }
    } else {
        return angle;
    }
    let r = angle - 360.0 * (angle / 360.0).round();
    if r == -180.0 { 180.0 } else { r }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rect_flips_negative_extent() {
        let r = Rect::new(10.0, 10.0, -4.0, -6.0);
        assert_eq!(r, Rect::new(6.0, 4.0, 4.0, 6.0));
    }

    #[test]
    fn test_outcode() {
        let r = Rect::new(0.0, 0.0, 10.0, 10.0);
        assert_eq!(r.outcode(Point::new(5.0, 5.0)), 0);
        assert_eq!(r.outcode(Point::new(-1.0, 5.0)), OUT_LEFT);
        assert_eq!(r.outcode(Point::new(11.0, 11.0)), OUT_RIGHT | OUT_BOTTOM);
        assert_eq!(r.outcode(Point::new(5.0, -3.0)), OUT_TOP);
    }

    #[test]
    fn test_intersects_is_strict() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        assert!(a.intersects(&Rect::new(9.0, 9.0, 5.0, 5.0)));
        assert!(!a.intersects(&Rect::new(10.0, 0.0, 5.0, 5.0)));
    }

    #[test]
    fn test_arc_endpoints_follow_angles() {
        let mut arc = Arc2D::from_center(Point::new(0.0, 0.0), Point::new(10.0, 10.0));
        arc.start = 0.0;
        arc.extent = 90.0;
        let s = arc.start_point();
        let e = arc.end_point();
        assert!((s.x - 10.0).abs() < 1e-9 && s.y.abs() < 1e-9);
        // 90 degrees is up on screen
        assert!(e.x.abs() < 1e-9 && (e.y + 10.0).abs() < 1e-9);
    }

    #[test]
    fn test_set_angles_round_trip() {
        let mut arc = Arc2D::from_center(Point::new(0.0, 0.0), Point::new(10.0, 10.0));
        arc.set_angles(Point::new(10.0, 0.0), Point::new(-10.0, 0.0));
        assert!((arc.start - 0.0).abs() < 1e-9);
        assert!((arc.extent - 180.0).abs() < 1e-9);
        assert!(arc.contains_angle(90.0));
        assert!(!arc.contains_angle(-90.0));
    }

    #[test]
    fn test_normalize_degrees() {
        assert_eq!(normalize_degrees(190.0), -170.0);
        assert_eq!(normalize_degrees(-180.0), 180.0);
        assert_eq!(normalize_degrees(45.0), 45.0);
        assert!((normalize_degrees(1000.0) - (-80.0)).abs() < 1e-9);
    }
}
