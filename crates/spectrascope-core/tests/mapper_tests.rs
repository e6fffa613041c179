//! Coordinate mapper integration tests

use proptest::prelude::*;
use rstest::rstest;
use spectrascope_core::{
    compute_view_bounds, ClipTransform, CoordinateMapper, MapperConfig, Point2, Region, Viewport,
};

fn cloud() -> impl Strategy<Value = Vec<Point2>> {
    prop::collection::vec((-1e3..1e3f64, -1e3..1e3f64), 1..64)
        .prop_map(|v| v.into_iter().map(Point2::from).collect())
}

fn viewport() -> impl Strategy<Value = Viewport> {
    (50.0..2000.0f64, 50.0..2000.0f64).prop_map(|(w, h)| Viewport::new(w, h))
}

fn assert_close(a: Point2, b: Point2, scale: f64) {
    let tol = 1e-9 * scale.max(1.0);
    assert!(
        (a.x - b.x).abs() <= tol && (a.y - b.y).abs() <= tol,
        "{a:?} != {b:?}"
    );
}

proptest! {
    #[test]
    fn test_round_trip_both_modes(
        points in cloud(),
        vp in viewport(),
        equal_scale in any::<bool>(),
        sample in (-2e3..2e3f64, -2e3..2e3f64),
    ) {
        let config = MapperConfig::default().with_equal_scale(equal_scale);
        let mapper = CoordinateMapper::fit(&points, vp, config).unwrap();
        let p = Point2::from(sample);
        let back = mapper.screen_to_data(mapper.data_to_screen(p));
        assert_close(back, p, 4e3);
    }

    #[test]
    fn test_every_point_lands_in_viewport(
        points in cloud(),
        vp in viewport(),
        equal_scale in any::<bool>(),
    ) {
        let config = MapperConfig::default().with_equal_scale(equal_scale);
        let mapper = CoordinateMapper::fit(&points, vp, config).unwrap();
        for p in &points {
            let s = mapper.data_to_screen(*p);
            prop_assert!(s.x >= 0.0 && s.x <= vp.width, "x {} outside {}", s.x, vp.width);
            prop_assert!(s.y >= 0.0 && s.y <= vp.height, "y {} outside {}", s.y, vp.height);
        }
    }

    #[test]
    fn test_equal_scale_matches_container_aspect(points in cloud(), vp in viewport()) {
        let config = MapperConfig::default().with_equal_scale(true);
        let bounds = compute_view_bounds(&points, vp, &config);
        let (ppu_x, ppu_y) = bounds.pixels_per_unit(vp);
        prop_assert!((ppu_x - ppu_y).abs() <= 1e-9 * ppu_x.max(ppu_y));
    }

    #[test]
    fn test_clip_transform_matches_screen_mapping(
        points in cloud(),
        vp in viewport(),
        sample in (-1e3..1e3f64, -1e3..1e3f64),
    ) {
        let bounds = compute_view_bounds(&points, vp, &MapperConfig::default());
        let p = Point2::from(sample);
        let via_clip = ClipTransform::clip_to_screen(bounds.clip_transform().to_clip(p), vp);
        let direct = bounds.data_to_screen(p, vp);
        prop_assert!((via_clip.x - direct.x).abs() < 1e-6 * vp.width.max(1.0) * 10.0);
        prop_assert!((via_clip.y - direct.y).abs() < 1e-6 * vp.height.max(1.0) * 10.0);
    }
}

#[rstest]
#[case::single_point(vec![Point2::new(3.0, 4.0)])]
#[case::constant_x(vec![Point2::new(1.0, 0.0), Point2::new(1.0, 10.0)])]
#[case::with_nan(vec![Point2::new(f64::NAN, 0.0), Point2::new(2.0, 2.0)])]
fn test_degenerate_extents_have_area(#[case] points: Vec<Point2>) {
    let bounds =
        compute_view_bounds(&points, Viewport::new(400.0, 300.0), &MapperConfig::default());
    assert!(bounds.width() > 0.0);
    assert!(bounds.height() > 0.0);
}

#[test]
fn test_screen_box_converts_to_data_box() {
    let points = vec![Point2::new(0.0, 0.0), Point2::new(100.0, 100.0)];
    let mapper =
        CoordinateMapper::fit(&points, Viewport::new(200.0, 200.0), MapperConfig::default())
            .unwrap();

    let a = mapper.data_to_screen(Point2::new(10.0, 90.0));
    let b = mapper.data_to_screen(Point2::new(50.0, 40.0));
    let region = mapper.screen_region_to_data(&Region::rect(a, b));

    assert!(region.contains(Point2::new(30.0, 60.0)));
    assert!(!region.contains(Point2::new(60.0, 60.0)));
}
