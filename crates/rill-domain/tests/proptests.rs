use proptest::prelude::*;
use rill_domain::services::align::align;
use rill_domain::services::scale::MinMaxScaler;
use rill_domain::services::window::build_supervised;
use rill_domain::value_objects::frame::DenseFrame;
use rill_domain::value_objects::schema::{ColumnSpec, Schema};
use rill_domain::value_objects::series::SeriesPoint;

fn schema() -> Schema {
    Schema::new(
        vec![ColumnSpec::real("gauge")],
        vec![ColumnSpec::real("obs")],
        "gauge",
    )
    .expect("schema")
}

fn sorted_unique(mut ts: Vec<i64>) -> Vec<i64> {
    ts.sort_unstable();
    ts.dedup();
    ts
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 64,
        .. ProptestConfig::default()
    })]

    #[test]
    fn alignment_cursor_never_rewinds(
        primary_ts in prop::collection::vec(0i64..10_000, 2..60),
        secondary_ts in prop::collection::vec(0i64..10_000, 1..120),
    ) {
        let primary: Vec<SeriesPoint> = sorted_unique(primary_ts)
            .into_iter()
            .map(|ts| SeriesPoint::observed(ts, &[1.0]))
            .collect();
        prop_assume!(primary.len() >= 2);

        let mut secondary_ts = secondary_ts;
        secondary_ts.sort_unstable();
        let secondary: Vec<SeriesPoint> = secondary_ts
            .iter()
            .enumerate()
            .map(|(idx, &ts)| SeriesPoint::observed(ts, &[idx as f64]))
            .collect();

        let (frame, report) = align(&primary, &secondary, &schema()).expect("align");

        // Observation payloads are their stream indexes, so assigned rows
        // must carry non-decreasing values scanned top to bottom: a rewind
        // would place a later observation above an earlier one.
        let mut last_seen = -1.0f64;
        for row in 0..frame.len() {
            if let Some(value) = frame.get(row, 1) {
                prop_assert!(value >= last_seen);
                last_seen = value;
            }
        }

        let accounted = report.assigned
            + report.discarded_before_cursor
            + report.discarded_after_exhaustion;
        prop_assert_eq!(accounted, secondary.len());
    }

    #[test]
    fn alignment_preserves_grid(
        primary_ts in prop::collection::vec(0i64..10_000, 2..60),
        secondary_ts in prop::collection::vec(0i64..10_000, 0..60),
    ) {
        let primary_ts = sorted_unique(primary_ts);
        prop_assume!(primary_ts.len() >= 2);
        let primary: Vec<SeriesPoint> = primary_ts
            .iter()
            .map(|&ts| SeriesPoint::observed(ts, &[1.0]))
            .collect();
        let secondary: Vec<SeriesPoint> = sorted_unique(secondary_ts)
            .into_iter()
            .map(|ts| SeriesPoint::observed(ts, &[0.5]))
            .collect();

        let (frame, _) = align(&primary, &secondary, &schema()).expect("align");
        prop_assert_eq!(frame.timestamps, primary_ts);
    }

    #[test]
    fn scaler_round_trips_within_tolerance(
        values in prop::collection::vec(-1_000.0f64..1_000.0, 3..40),
    ) {
        let min = values.iter().cloned().fold(f64::INFINITY, f64::min);
        let max = values.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
        prop_assume!(max - min > 1e-6);

        let frame = DenseFrame {
            columns: vec!["target".to_string()],
            timestamps: (0..values.len() as i64).collect(),
            rows: values.iter().map(|&v| vec![v]).collect(),
        };
        let scaler = MinMaxScaler::fit(&frame).expect("fit");
        let scaled = scaler.transform(&frame).expect("transform");

        let normalized: Vec<f64> = scaled.rows.iter().map(|row| row[0]).collect();
        let context: Vec<Vec<f64>> = normalized.iter().map(|_| Vec::new()).collect();
        let inverted = scaler.invert_target(&normalized, &context).expect("invert");

        for (original, recovered) in values.iter().zip(inverted.iter()) {
            prop_assert!((original - recovered).abs() < 1e-9 * (1.0 + original.abs()));
        }
    }

    #[test]
    fn window_count_matches_formula(
        rows in 2usize..60,
        lag in 1usize..6,
        lead in 1usize..4,
    ) {
        let frame = DenseFrame {
            columns: vec!["a".to_string(), "b".to_string()],
            timestamps: (0..rows as i64).map(|i| i * 60).collect(),
            rows: (0..rows).map(|i| vec![i as f64, i as f64 * 2.0]).collect(),
        };

        match build_supervised(&frame, lag, lead, "b") {
            Ok(supervised) => {
                prop_assert!(rows >= lag + lead);
                prop_assert_eq!(supervised.len(), rows - lag - lead + 1);
            }
            Err(_) => prop_assert!(rows < lag + lead),
        }
    }
}
