use proptest::prelude::*;
use treebolic_view::Point;
use treebolic_view::mapper::{MAX_DISK_RADIUS, Mapper};

proptest! {
    #[test]
    fn prop_to_disk_then_to_view_round_trips(
        width in 50.0f64..2000.0,
        height in 50.0f64..2000.0,
        fx in 0.0f64..1.0,
        fy in 0.0f64..1.0,
        x_shift in -0.5f64..0.5,
        y_shift in -0.5f64..0.5,
        scale in 0.25f64..4.0,
    ) {
        let mut mapper = Mapper::new(width, height);
        mapper.set_shift(x_shift, y_shift);
        mapper.set_map_scale_factor(scale);

        let p = Point::new(fx * width, fy * height);
        let z = mapper.to_disk(p);
        prop_assert!(z.abs() <= 1.0 + 1e-12);

        let raw_x = (p.x - width / 2.0 - x_shift * width) / mapper.w_to_view(1.0);
        let raw_y = (p.y - height / 2.0 - y_shift * height) / mapper.h_to_view(1.0);
        if raw_x * raw_x + raw_y * raw_y <= 1.0 {
            let back = mapper.to_view(z);
            prop_assert!((back.x - p.x).abs() < 1e-6, "x {} -> {}", p.x, back.x);
            prop_assert!((back.y - p.y).abs() < 1e-6, "y {} -> {}", p.y, back.y);
        } else {
            prop_assert!((z.abs() - MAX_DISK_RADIUS).abs() < 1e-9);
        }
    }
}
