//! Anchor cropping: where an edge meets the rectangle a node occupies.
//! Every query returns `None` when no valid crossing exists and the caller
//! keeps the raw endpoint.

use crate::geom::{Arc2D, OUT_BOTTOM, OUT_LEFT, OUT_RIGHT, OUT_TOP, Point, Rect};

/// Point where the line through `from` and `to` leaves `rect` on the side
/// facing `from`.
pub fn segment_anchor(rect: Option<&Rect>, from: Point, to: Point) -> Option<Point> {
    let rect = rect?;
    let code = rect.outcode(from);
    let c = rect.center();
    let (top, bottom, left, right) = (rect.y, rect.bottom(), rect.x, rect.right());
    let tan = (to.y - from.y) / (to.x - from.x);

    if code & OUT_LEFT != 0 {
        let y = (left - c.x) * tan + c.y;
        if y >= top && y <= bottom {
            return Some(Point::new(left, y));
        }
    }
    if code & OUT_RIGHT != 0 {
        let y = (right - c.x) * tan + c.y;
        if y >= top && y <= bottom {
            return Some(Point::new(right, y));
        }
    }
    if code & OUT_BOTTOM != 0 {
        let x = (bottom - c.y) / tan + c.x;
        if x >= left && x <= right {
            return Some(Point::new(x, bottom));
        }
    }
    if code & OUT_TOP != 0 {
        let x = (top - c.y) / tan + c.x;
        if x >= left && x <= right {
            return Some(Point::new(x, top));
        }
    }
    None
}

/// Point where `arc` crosses the boundary of `rect`. Each supporting line of
/// the rectangle is intersected with the arc's ellipse, and a candidate is
/// kept only if it lies within the arc's angular span.
pub fn arc_anchor(rect: Option<&Rect>, arc: &Arc2D) -> Option<Point> {
    let rect = rect?;
    let rc = rect.center();
    let w = rect.width / 2.0;
    let h = rect.height / 2.0;

    let ac = arc.center();
    let a2 = (arc.width() / 2.0).powi(2);
    let b2 = (arc.height() / 2.0).powi(2);

    // rectangle relative to the arc center
    let dx = rc.x - ac.x;
    let dy = rc.y - ac.y;
    let is_above = dy < 0.0;
    let is_left = dx < 0.0;
    let (left, right, top, bottom) = (dx - w, dx + w, dy - h, dy + h);

    let on_rect_y = |y: f64| y >= top && y <= bottom;
    let on_rect_x = |x: f64| x >= left && x <= right;
    let found = |x: f64, y: f64| Point::new(x + ac.x, y + ac.y);

    for x in [left, right] {
        let k = x * x / a2;
        if k <= 1.0 {
            let mut y = ((1.0 - k) * b2).sqrt();
            if is_above {
                y = -y;
            }
            if on_rect_y(y) && is_on_arc(x, y, arc) {
                return Some(found(x, y));
            }
        }
    }
    for y in [bottom, top] {
        let k = y * y / b2;
        if k <= 1.0 {
            let mut x = ((1.0 - k) * a2).sqrt();
            if is_left {
                x = -x;
            }
            if on_rect_x(x) && is_on_arc(x, y, arc) {
                return Some(found(x, y));
            }
        }
    }
    None
}

/// Whether two node rectangles touch once each is grown by one pixel.
pub fn boxes_intersect(a: Option<&Rect>, b: Option<&Rect>) -> bool {
    match (a, b) {
        (Some(a), Some(b)) => a.inflate(1.0).intersects(&b.inflate(1.0)),
        _ => false,
    }
}

fn is_on_arc(dx: f64, dy: f64, arc: &Arc2D) -> bool {
    let angle = (-dy * arc.width()).atan2(dx * arc.height());
    arc.contains_angle(angle.to_degrees())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_segment_anchor_horizontal() {
        let rect = Rect::new(90.0, 90.0, 20.0, 20.0);
        let anchor = segment_anchor(Some(&rect), Point::new(0.0, 100.0), Point::new(100.0, 100.0));
        assert_eq!(anchor, Some(Point::new(90.0, 100.0)));
    }

    #[test]
    fn test_segment_anchor_vertical() {
        let rect = Rect::new(90.0, 90.0, 20.0, 20.0);
        let anchor = segment_anchor(Some(&rect), Point::new(100.0, 300.0), Point::new(100.0, 100.0));
        assert_eq!(anchor, Some(Point::new(100.0, 110.0)));
    }

    #[test]
    fn test_segment_anchor_inside_or_missing() {
        let rect = Rect::new(0.0, 0.0, 20.0, 20.0);
        assert_eq!(segment_anchor(Some(&rect), Point::new(5.0, 5.0), Point::new(10.0, 10.0)), None);
        assert_eq!(segment_anchor(None, Point::new(50.0, 5.0), Point::new(10.0, 10.0)), None);
    }

    #[test]
    fn test_arc_anchor_on_circle() {
        // quarter circle of radius 100 around the origin, from east to north
        let mut arc = Arc2D::from_center(Point::new(0.0, 0.0), Point::new(100.0, 100.0));
        arc.start = 0.0;
        arc.extent = 90.0;
        // box straddling the circle near 45 degrees (up-right on screen)
        let p = Point::new(70.71, -70.71);
        let rect = Rect::new(p.x - 10.0, p.y - 10.0, 20.0, 20.0);
        let anchor = arc_anchor(Some(&rect), &arc).unwrap();
        assert!((anchor.distance(Point::new(0.0, 0.0)) - 100.0).abs() < 1e-6);
        assert!(rect.inflate(1e-6).contains(anchor));
    }

    #[test]
    fn test_arc_anchor_outside_span() {
        let mut arc = Arc2D::from_center(Point::new(0.0, 0.0), Point::new(100.0, 100.0));
        arc.start = 0.0;
        arc.extent = 90.0;
        // same box mirrored below the x axis is off the arc
        let rect = Rect::new(60.71, 60.71, 20.0, 20.0);
        assert_eq!(arc_anchor(Some(&rect), &arc), None);
    }

    #[test]
    fn test_boxes_intersect_with_inflation() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let b = Rect::new(11.0, 0.0, 10.0, 10.0);
        assert!(boxes_intersect(Some(&a), Some(&b)));
        let c = Rect::new(13.0, 0.0, 10.0, 10.0);
        assert!(!boxes_intersect(Some(&a), Some(&c)));
        assert!(!boxes_intersect(Some(&a), None));
    }
}
