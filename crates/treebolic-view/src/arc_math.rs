//! Points and tangents on elliptical arcs, used to place edge labels,
//! images and terminators. Angles are radians in screen coordinates.

use crate::geom::{Arc2D, Point};
use std::f64::consts::{FRAC_PI_2, PI, TAU};

fn eccentricity(arc: &Arc2D) -> f64 {
    let a = arc.width() / 2.0;
    let b = arc.height() / 2.0;
    let d = if a > b { b * b / (a * a) } else { a * a / (b * b) };
    (1.0 - d).sqrt()
}

/// Middle of the arc's angular span.
pub fn mid_arc(arc: &Arc2D) -> Point {
    let a = arc.width() / 2.0;
    let b = arc.height() / 2.0;
    let theta = (-arc.start).to_radians() + (-arc.extent / 2.0).to_radians();
    let c = arc.center();
    Point::new(a * theta.cos() + c.x, b * theta.sin() + c.y)
}

/// Angles from the two foci to `p`.
fn focal_angles(arc: &Arc2D, p: Point) -> (f64, f64) {
    let e = eccentricity(arc);
    let w = arc.width() / 2.0;
    let h = arc.height() / 2.0;
    let c = arc.center();
    let x = p.x - c.x;
    let y = p.y - c.y;
    if w >= h {
        let ea = e * w;
        ((y).atan2(x - ea), (y).atan2(x + ea))
    } else {
        let eb = e * h;
        ((y - eb).atan2(x), (y + eb).atan2(x))
    }
}

/// Direction of the normal at `p`: the bisector of the focal angles.
fn angle_at(arc: &Arc2D, p: Point) -> f64 {
    let (a1, mut a2) = focal_angles(arc, p);
    if (a1 - a2).abs() > PI {
        a2 += TAU;
    }
    (a1 + a2) / 2.0
}

/// Tangent at an arc end pointing back along the arc.
pub fn tangent(arc: &Arc2D, p: Point, is_start: bool) -> f64 {
    let angle = angle_at(arc, p);
    if arc.counterclockwise == is_start {
        angle - FRAC_PI_2
    } else {
        angle + FRAC_PI_2
    }
}

/// Tangent used to orient text laid along the arc.
pub fn text_tangent(arc: &Arc2D, p: Point) -> f64 {
    let (a1, a2) = focal_angles(arc, p);
    (a1 + a2) / 2.0 + FRAC_PI_2
}
