//! Property checks for the charting engine over seeded random inputs.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use playsight::chart::{
    ChartData, ChartError, ChartEvent, ChartInstance, ZoomController, ZoomMode, calculate_domain,
    normalize, normalize_all, render,
};
use playsight_common::{MetricRecord, MetricType, SeriesValues};

const ROUNDS: usize = 200;

fn random_values(rng: &mut SmallRng, len: usize) -> Vec<f64> {
    (0..len)
        .map(|_| (rng.random_range(-1000.0..1000.0_f64) * 100.0).round() / 100.0)
        .collect()
}

fn line_chart(values: &[f64]) -> ChartInstance {
    let record = MetricRecord::new("Line")
        .with_type(MetricType::Line)
        .with_values(values);
    ChartInstance::new(normalize(&record, 0).unwrap())
}

#[test]
fn test_original_index_follows_input_order() {
    let mut rng = SmallRng::seed_from_u64(1);

    for _ in 0..ROUNDS {
        let len = rng.random_range(1..60);
        let values = random_values(&mut rng, len);

        let flat = MetricRecord::new("Flat").with_values(&values);
        let pairs = MetricRecord::new("Pairs")
            .with_type(MetricType::Bar)
            .with_pairs(values.iter().enumerate().map(|(i, v)| (format!("c{}", i), *v)));
        let categories: Vec<String> = (0..len).map(|i| format!("c{}", i)).collect();
        let category_refs: Vec<&str> = categories.iter().map(String::as_str).collect();
        let multi = MetricRecord::new("Multi").with_series(
            &category_refs,
            vec![
                SeriesValues::new("a", values.clone()),
                SeriesValues::new("b", values.iter().map(|v| v * 2.0).collect()),
            ],
        );

        for record in [flat, pairs] {
            let chart = normalize(&record, 0).unwrap();
            let ChartData::Cartesian(points) = chart.data else {
                panic!("expected cartesian data");
            };
            assert_eq!(points.len(), len);
            for (i, point) in points.iter().enumerate() {
                assert_eq!(point.original_index, i);
                assert_eq!(point.y, values[i]);
            }
        }

        let chart = normalize(&multi, 0).unwrap();
        let ChartData::MultiLine { rows, .. } = chart.data else {
            panic!("expected multiline data");
        };
        for (i, row) in rows.iter().enumerate() {
            assert_eq!(row.original_index, i);
            assert_eq!(row.category, categories[i]);
        }
    }
}

#[test]
fn test_pie_keeps_top_ten_positive_slices() {
    let mut rng = SmallRng::seed_from_u64(2);

    for _ in 0..ROUNDS {
        let len = rng.random_range(1..30);
        let values: Vec<f64> = (0..len)
            .map(|_| match rng.random_range(0..4) {
                0 => 0.0,
                1 => -rng.random_range(1.0..100.0_f64).round(),
                _ => rng.random_range(1.0..1000.0_f64).round(),
            })
            .collect();
        let positive = values.iter().filter(|v| **v > 0.0).count();

        let record = MetricRecord::new("Pie")
            .with_type(MetricType::Pie)
            .with_values(&values);

        match normalize(&record, 0) {
            Ok(chart) => {
                let ChartData::Pie(slices) = chart.data else {
                    panic!("expected pie data");
                };
                assert_eq!(slices.len(), positive.min(10));
                assert!(slices.iter().all(|s| s.value > 0.0));
                assert!(slices.windows(2).all(|w| w[0].value >= w[1].value));
            }
            Err(e) => {
                assert_eq!(positive, 0);
                assert_eq!(e, ChartError::EmptyDataset);
            }
        }
    }
}

#[test]
fn test_domain_pads_by_a_tenth_of_the_span() {
    let mut rng = SmallRng::seed_from_u64(3);

    for _ in 0..ROUNDS {
        let len = rng.random_range(1..50);
        let values = random_values(&mut rng, len);
        let min = values.iter().copied().fold(f64::INFINITY, f64::min);
        let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);

        let domain = calculate_domain(values.iter().copied()).unwrap();
        assert_eq!(domain.min, min - 0.1 * (max - min));
        assert_eq!(domain.max, max + 0.1 * (max - min));
    }

    let single = calculate_domain([42.0]).unwrap();
    assert_eq!((single.min, single.max), (42.0, 42.0));
    assert!(single.is_degenerate());
}

#[test]
fn test_zoom_then_reset_restores_axes() {
    let mut rng = SmallRng::seed_from_u64(4);

    for _ in 0..ROUNDS {
        let len = rng.random_range(3..120);
        let values = random_values(&mut rng, len);
        let mut chart = line_chart(&values);

        let ticks_before = chart.zoom().tick_count(len);
        let domain_before = chart.zoom().y_domain(&chart.chart().data);

        let a = rng.random_range(0..len);
        let b = rng.random_range(0..len);
        chart.handle(ChartEvent::MouseDown(a));
        chart.handle(ChartEvent::MouseMove(b));
        chart.handle(ChartEvent::MouseUp);
        chart.handle(ChartEvent::Reset);

        assert!(!chart.zoom().is_zoomed());
        assert_eq!(chart.zoom().tick_count(len), ticks_before);
        assert_eq!(chart.zoom().y_domain(&chart.chart().data), domain_before);
    }
}

#[test]
fn test_wheel_zoom_stays_in_bounds() {
    let mut rng = SmallRng::seed_from_u64(5);

    for _ in 0..ROUNDS / 4 {
        let len = rng.random_range(3..200);
        let values = random_values(&mut rng, len);
        let mut chart = line_chart(&values);
        chart.handle(ChartEvent::SetMode(ZoomMode::Wheel));
        let max_index = (len - 1) as f64;

        for _ in 0..40 {
            let delta_y = if rng.random_bool(0.6) { -1.0 } else { 1.0 };
            let x_fraction = rng.random_range(0.0..=1.0);
            chart.handle(ChartEvent::Wheel {
                delta_y,
                x_fraction,
            });

            let state = *chart.zoom().state();
            if let (Some(left), Some(right)) = (state.left.value(), state.right.value()) {
                assert!(left >= -1e-9, "left {} below 0", left);
                assert!(right <= max_index + 1e-9, "right {} past {}", right, max_index);
                assert!(right - left >= 2.0 - 1e-9, "range {} too small", right - left);
            }
        }
    }
}

#[test]
fn test_empty_drag_selection_is_noop() {
    let mut rng = SmallRng::seed_from_u64(6);

    for _ in 0..ROUNDS {
        let len = rng.random_range(3..80);
        let values = random_values(&mut rng, len);
        let mut chart = line_chart(&values);

        if rng.random_bool(0.5) {
            chart.handle(ChartEvent::MouseDown(0));
            chart.handle(ChartEvent::MouseMove(len - 1));
            chart.handle(ChartEvent::MouseUp);
        }
        let before = *chart.zoom().state();

        let index = rng.random_range(0..len);
        chart.handle(ChartEvent::MouseDown(index));
        chart.handle(ChartEvent::MouseMove(index));
        chart.handle(ChartEvent::MouseUp);

        assert_eq!(*chart.zoom().state(), before);
    }
}

#[test]
fn test_flat_values_scenario() {
    let values: Vec<f64> = (1..=10).map(f64::from).collect();
    let chart = line_chart(&values);

    let ChartData::Cartesian(points) = &chart.chart().data else {
        panic!("expected cartesian data");
    };
    for (i, point) in points.iter().enumerate() {
        assert_eq!(point.label.to_string(), i.to_string());
        assert_eq!(point.y, (i + 1) as f64);
        assert_eq!(point.original_index, i);
    }
    assert_eq!(chart.zoom().tick_count(points.len()), 10);

    let scene = chart.scene().unwrap();
    assert_eq!(scene.x_ticks.len(), 10);
}

#[test]
fn test_multiline_domain_scenario() {
    let record = MetricRecord::new("Multi").with_series(
        &["Jan", "Feb", "Mar"],
        vec![
            SeriesValues::new("A", vec![1.0, 2.0, 3.0]),
            SeriesValues::new("B", vec![4.0, 5.0, 6.0]),
        ],
    );
    let chart = normalize(&record, 0).unwrap();
    let domain = ZoomController::new().y_domain(&chart.data).unwrap();

    assert_eq!((domain.min, domain.max), (0.5, 6.5));
}

#[test]
fn test_pie_scenario() {
    let record = MetricRecord::new("Pie")
        .with_type(MetricType::Pie)
        .with_values(&[0.0, 5.0, -2.0, 10.0, 3.0]);
    let chart = normalize(&record, 0).unwrap();

    let ChartData::Pie(slices) = &chart.data else {
        panic!("expected pie data");
    };
    let values: Vec<f64> = slices.iter().map(|s| s.value).collect();
    assert_eq!(values, vec![10.0, 5.0, 3.0]);
}

#[test]
fn test_unsupported_type_is_skipped() {
    let mut scatter = MetricRecord::new("Scatter").with_values(&[1.0, 2.0]);
    scatter.metric_type = Some("scatter".to_string());

    assert_eq!(
        normalize(&scatter, 0),
        Err(ChartError::UnsupportedChartType("scatter".to_string()))
    );
    assert!(normalize_all(std::slice::from_ref(&scatter)).is_empty());
}

#[test]
fn test_one_bad_record_does_not_affect_others() {
    let records = vec![
        MetricRecord::new("A").with_values(&[1.0, 2.0]),
        MetricRecord::new("Broken")
            .with_type(MetricType::MultiLine)
            .with_series(&["x", "y"], vec![SeriesValues::new("s", vec![1.0])]),
        MetricRecord::new("C").with_values(&[3.0]),
    ];

    let charts = normalize_all(&records);
    let titles: Vec<&str> = charts.iter().map(|c| c.title.as_str()).collect();
    assert_eq!(titles, vec!["A", "C"]);

    let controller = ZoomController::new();
    assert!(charts.iter().all(|c| render(c, &controller).is_some()));
}

#[test]
fn test_mode_toggle_keeps_window() {
    let mut rng = SmallRng::seed_from_u64(7);

    for _ in 0..ROUNDS {
        let len = rng.random_range(4..80);
        let values = random_values(&mut rng, len);
        let mut chart = line_chart(&values);

        let a = rng.random_range(0..len / 2);
        let b = rng.random_range(len / 2 + 1..len);
        chart.handle(ChartEvent::MouseDown(a));
        chart.handle(ChartEvent::MouseMove(b));
        chart.handle(ChartEvent::MouseUp);
        let window = chart.zoom().window(len);

        chart.handle(ChartEvent::SetMode(ZoomMode::Wheel));
        assert_eq!(chart.mode(), ZoomMode::Wheel);
        assert_eq!(chart.zoom().window(len), window);

        chart.handle(ChartEvent::SetMode(ZoomMode::Drag));
        assert_eq!(chart.zoom().window(len), window);
    }
}
