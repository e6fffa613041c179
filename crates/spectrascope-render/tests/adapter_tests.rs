//! Cross-backend agreement tests

use proptest::prelude::*;
use rstest::rstest;
use spectrascope_core::{
    BoxBounds, ColorResult, CoordinateMapper, MapperConfig, Point2, Point3, Region, Viewport,
};
use spectrascope_render::{
    Backend, PointCloudAdapter, ReglAdapter, RenderConfig, RendererAdapter, ScatterGlAdapter,
    VectorAdapter,
};

fn color(hidden: bool, z_index: u8) -> ColorResult {
    ColorResult {
        color: "#4c78a8".to_string(),
        opacity: 0.85,
        stroke: None,
        stroke_width: None,
        hidden,
        z_index,
        size_scale: 1.0,
    }
}

fn plain(n: usize) -> Vec<ColorResult> {
    vec![color(false, 0); n]
}

fn flat_adapters(
    points: &[Point2],
    viewport: Viewport,
    config: &RenderConfig,
) -> Vec<Box<dyn RendererAdapter>> {
    vec![
        Box::new(VectorAdapter::new(points.to_vec(), viewport, config.clone()).unwrap()),
        Box::new(ScatterGlAdapter::new(points.to_vec(), viewport, config.clone()).unwrap()),
        Box::new(ReglAdapter::new(points.to_vec(), viewport, config.clone()).unwrap()),
    ]
}

/// Within a millionth of a pixel
fn close(a: Point2, b: Point2) -> bool {
    (a.x - b.x).abs() <= 1e-6 && (a.y - b.y).abs() <= 1e-6
}

/// Half-unit lattice, so distinct points are never closer than 0.5
fn point_strategy() -> impl Strategy<Value = Point2> {
    (-2000..2000i32, -2000..2000i32)
        .prop_map(|(x, y)| Point2::new(f64::from(x) * 0.5, f64::from(y) * 0.5))
}

fn viewport_strategy() -> impl Strategy<Value = Viewport> {
    (50.0..2000.0f64, 50.0..2000.0f64).prop_map(|(w, h)| Viewport::new(w, h))
}

proptest! {
    #[test]
    fn test_gpu_projection_matches_mapper(
        points in prop::collection::vec(point_strategy(), 1..60),
        viewport in viewport_strategy(),
        equal_scale in any::<bool>(),
        hidden_mask in prop::collection::vec(any::<bool>(), 60),
    ) {
        let config = RenderConfig::default().with_equal_scale(equal_scale);
        let colors: Vec<ColorResult> =
            (0..points.len()).map(|i| color(hidden_mask[i], 0)).collect();
        let shown: Vec<Point2> = points
            .iter()
            .zip(&hidden_mask)
            .filter(|(_, hidden)| !**hidden)
            .map(|(p, _)| *p)
            .collect();
        let mapper = CoordinateMapper::fit(&shown, viewport, config.mapper).unwrap();

        let mut scatter = ScatterGlAdapter::new(points.clone(), viewport, config.clone()).unwrap();
        let mut regl = ReglAdapter::new(points.clone(), viewport, config).unwrap();
        scatter.paint(&colors).unwrap();
        regl.paint(&colors).unwrap();

        prop_assert_eq!(scatter.scene().mapper().bounds(), mapper.bounds());
        prop_assert_eq!(regl.scene().mapper().bounds(), mapper.bounds());
        for (i, p) in points.iter().enumerate() {
            let expected = mapper.data_to_screen(*p);
            prop_assert!(close(scatter.project(i).unwrap(), expected));
            prop_assert!(close(regl.project(i).unwrap(), expected));
        }
    }

    #[test]
    fn test_box_selection_agrees_across_backends(
        points in prop::collection::vec(point_strategy(), 1..80),
        viewport in viewport_strategy(),
        equal_scale in any::<bool>(),
        (ax, ay, bx, by) in (0.0..1.0f64, 0.0..1.0f64, 0.0..1.0f64, 0.0..1.0f64),
    ) {
        let config = RenderConfig::default().with_equal_scale(equal_scale);
        let mut adapters = flat_adapters(&points, viewport, &config);
        for a in adapters.iter_mut() {
            a.paint(&plain(points.len())).unwrap();
        }

        let bounds = BoxBounds::from_corners(
            Point2::new(ax * viewport.width, ay * viewport.height),
            Point2::new(bx * viewport.width, by * viewport.height),
        );
        let region = Region::Box { bounds };
        let expected = adapters[0].indices_in_screen_region(&region);
        for a in &adapters[1..] {
            let got = a.indices_in_screen_region(&region);
            prop_assert_eq!(got, expected.clone(), "{}", a.backend().name());
        }
    }

    #[test]
    fn test_box_cornered_on_a_point_agrees_across_backends(
        points in prop::collection::vec(point_strategy(), 1..80),
        equal_scale in any::<bool>(),
        anchor in any::<prop::sample::Index>(),
    ) {
        let viewport = Viewport::new(613.0, 419.0);
        let config = RenderConfig::default().with_equal_scale(equal_scale);
        let mut adapters = flat_adapters(&points, viewport, &config);
        for a in adapters.iter_mut() {
            a.paint(&plain(points.len())).unwrap();
        }

        // min corner sits exactly on the sample's drawn position
        let mapper = CoordinateMapper::fit(&points, viewport, config.mapper).unwrap();
        let target = anchor.index(points.len());
        let s = mapper.data_to_screen(points[target]);
        let region = Region::Box { bounds: BoxBounds::new(s.x, s.x + 40.0, s.y, s.y + 40.0) };

        for a in &adapters {
            let got = a.indices_in_screen_region(&region);
            prop_assert!(got.contains(&target), "{} dropped {}", a.backend().name(), target);
            prop_assert_eq!(got, adapters[0].indices_in_screen_region(&region));
        }
    }
}

#[test]
fn test_lasso_triangle_selects_inside_point_only() {
    let points = vec![Point2::new(5.0, 5.0), Point2::new(9.0, 9.0), Point2::new(1.0, 8.0)];
    let viewport = Viewport::new(640.0, 480.0);
    for config in [RenderConfig::default(), RenderConfig::default().with_equal_scale(true)] {
        let mut adapters = flat_adapters(&points, viewport, &config);
        for a in adapters.iter_mut() {
            a.paint(&plain(points.len())).unwrap();
        }
        let mapper = CoordinateMapper::fit(&points, viewport, config.mapper).unwrap();
        let lasso = Region::polygon(
            [(0.0, 0.0), (10.0, 0.0), (5.0, 10.0)]
                .iter()
                .map(|&(x, y)| mapper.data_to_screen(Point2::new(x, y)))
                .collect(),
        );
        for a in &adapters {
            assert_eq!(a.indices_in_screen_region(&lasso), vec![0], "{}", a.backend().name());
        }
    }
}

#[rstest]
#[case::vector(Backend::Vector)]
#[case::scatter_gl(Backend::ScatterGl)]
#[case::regl(Backend::Regl)]
#[case::point_cloud(Backend::PointCloud)]
fn test_hidden_samples_neither_drawn_nor_hit(#[case] backend: Backend) {
    let flat: Vec<Point2> = (0..4).map(|i| Point2::new(i as f64, i as f64)).collect();
    let viewport = Viewport::new(300.0, 300.0);
    let config = RenderConfig::default();
    let mut adapter: Box<dyn RendererAdapter> = match backend {
        Backend::Vector => Box::new(VectorAdapter::new(flat, viewport, config).unwrap()),
        Backend::ScatterGl => Box::new(ScatterGlAdapter::new(flat, viewport, config).unwrap()),
        Backend::Regl => Box::new(ReglAdapter::new(flat, viewport, config).unwrap()),
        Backend::PointCloud => {
            let cloud = flat.iter().map(|p| Point3::new(p.x, p.y, 0.0)).collect();
            Box::new(PointCloudAdapter::new(cloud, viewport, config).unwrap())
        }
    };

    adapter.paint(&plain(4)).unwrap();
    let everything = Region::rect(Point2::new(0.0, 0.0), Point2::new(300.0, 300.0));
    assert_eq!(adapter.indices_in_screen_region(&everything), vec![0, 1, 2, 3]);
    let spots: Vec<Point2> = (0..300)
        .step_by(2)
        .flat_map(|x| (0..300).step_by(2).map(move |y| Point2::new(x as f64, y as f64)))
        .collect();
    let picked_2 = spots.iter().any(|s| adapter.pick(*s) == Some(2));
    assert!(picked_2);

    let mut colors = plain(4);
    colors[2] = color(true, 4);
    adapter.paint(&colors).unwrap();
    assert_eq!(adapter.drawn_count(), 3);
    assert_eq!(adapter.indices_in_screen_region(&everything), vec![0, 1, 3]);
    assert!(spots.iter().all(|s| adapter.pick(*s) != Some(2)));
}

#[test]
fn test_frame_length_rejected_everywhere() {
    let points = vec![Point2::new(0.0, 0.0); 3];
    for mut a in flat_adapters(&points, Viewport::new(100.0, 100.0), &RenderConfig::default()) {
        assert!(a.paint(&plain(2)).is_err());
    }
}

#[test]
fn test_point_cloud_caps_at_default_limit() {
    let cloud: Vec<Point3> = (0..800)
        .map(|i| Point3::new((i % 20) as f64, ((i / 20) % 20) as f64, (i / 400) as f64))
        .collect();
    let mut adapter =
        PointCloudAdapter::new(cloud, Viewport::new(800.0, 600.0), RenderConfig::default())
            .unwrap();
    let mut colors = plain(800);
    colors[799] = color(false, 4);
    colors[650] = color(false, 3);
    adapter.paint(&colors).unwrap();

    assert_eq!(adapter.drawn_count(), 500);
    assert_eq!(adapter.omitted_count(), 300);
    let meshed: Vec<_> = adapter.instances().iter().map(|i| i.index).collect();
    assert!(meshed.contains(&799) && meshed.contains(&650));
    assert!(!meshed.contains(&600));
}

#[test]
fn test_equal_scale_uniform_pixels() {
    let points = vec![Point2::new(0.0, 0.0), Point2::new(100.0, 1.0)];
    let config = RenderConfig::default().with_equal_scale(true);
    let mut regl = ReglAdapter::new(points, Viewport::new(400.0, 400.0), config).unwrap();
    regl.paint(&plain(2)).unwrap();
    let mapper = regl.scene().mapper();
    let (px, py) = mapper.bounds().pixels_per_unit(mapper.viewport());
    assert!((px - py).abs() < 1e-9);
    assert_eq!(mapper.config(), &MapperConfig::default().with_equal_scale(true));
}
