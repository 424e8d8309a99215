// This module contains the definition of `ChartSpec`, `FacetSpec` and
// `LegendCorner`.
pub mod config;

// This module contains the definition of `ResultsDB` and the log parsing.
pub mod db;

// This module contains chart formatting: variant names, legend labels and
// colors.
pub mod fmt;

// This module contains the definition of benchmark id schemas and their
// decoding.
pub mod id;

// This module contains the definition of `F64`.
pub mod metrics;

// This module contains the chart drawing.
pub mod plot;

// This module contains the definition of `Series` and its builder.
pub mod series;

// Re-exports.
pub use config::{ChartSpec, FacetSpec, LegendCorner};
pub use db::ResultsDB;
pub use fmt::PlotFmt;
pub use id::{DecodedKey, ExperimentSchema, ParamStyle, Variant};
pub use series::{Series, SeriesBuilder, SparsePolicy, SparseSeries};

use color_eyre::eyre::WrapErr;
use color_eyre::Report;
use plot::SeriesStyle;
use plotters::style::RGBColor;

/// Generates one chart end to end: loads the spec's log file, decodes and
/// groups its measurements, and renders every series the spec defines.
pub fn comparison_plot(spec: &ChartSpec) -> Result<(), Report> {
    let db = ResultsDB::load(spec.log_file()).wrap_err("load results")?;
    comparison_plot_with(spec, &db, |_| true)
}

/// Generates one chart from an already-loaded database, keeping only the
/// records the caller's predicate accepts. Loading once and calling this
/// per chart builds several charts from the same log with no shared
/// mutable state.
pub fn comparison_plot_with<F>(
    spec: &ChartSpec,
    db: &ResultsDB,
    filter: F,
) -> Result<(), Report>
where
    F: Fn(&DecodedKey) -> bool,
{
    let mut builder = SeriesBuilder::new(spec.x_param(), spec.scale());
    for (key, measurement) in db.decode(spec.schema()) {
        if filter(&key) {
            builder.push(key, measurement);
        }
    }
    let all = builder.into_series(spec.sparse())?;

    let styled = arrange(spec, &all);
    plot::line_chart(spec, &styled)
}

// Orders series for drawing and assigns their labels and colors: facet
// values in configured order with controller before checkpoint inside
// each value, or plain builder order when the chart has no facet.
fn arrange<'a>(
    spec: &ChartSpec,
    all: &'a [Series],
) -> Vec<(SeriesStyle, &'a Series)> {
    let mut styled = Vec::new();
    if let (Some(facet), Some(fixed_index)) =
        (spec.facet(), spec.facet_fixed_index())
    {
        for (position, &value) in facet.values().iter().enumerate() {
            for series in all {
                if series.fixed_params().get(fixed_index) != Some(&value) {
                    continue;
                }
                let label = PlotFmt::label(
                    series.variant(),
                    Some((value, facet.noun())),
                );
                let color =
                    facet_color(spec, position, series.variant(), styled.len());
                styled.push((SeriesStyle { label, color }, series));
            }
        }
    } else {
        for (index, series) in all.iter().enumerate() {
            let label = PlotFmt::label(series.variant(), None);
            let color = PlotFmt::default_color(index);
            styled.push((SeriesStyle { label, color }, series));
        }
    }
    styled
}

fn facet_color(
    spec: &ChartSpec,
    position: usize,
    variant: Variant,
    fallback_index: usize,
) -> RGBColor {
    let palette = spec.palette();
    if palette.is_empty() {
        return PlotFmt::default_color(fallback_index);
    }
    let (light, dark) = match palette.get(position) {
        Some(pair) => pair,
        None => panic!(
            "chart palette has {} entries but facet value #{} needs one",
            palette.len(),
            position + 1
        ),
    };
    match variant {
        Variant::Controller => PlotFmt::color(light),
        Variant::Checkpoint => PlotFmt::color(dark),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn write_log(name: &str, contents: &str) -> PathBuf {
        let path = std::env::temp_dir().join(name);
        std::fs::write(&path, contents).expect("writing the test log should work");
        path
    }

    fn cread_schema() -> ExperimentSchema {
        ExperimentSchema::new(
            "cread",
            ParamStyle::PackedDigits { count: 2 },
            vec![
                (String::from("single_31509708"), Variant::Controller),
                (String::from("dist_31509708"), Variant::Checkpoint),
            ],
        )
    }

    const CREAD_LOG: &str = concat!(
        r#"{"reason":"benchmark-complete","id":"cread31/single_31509708","typical":{"estimate":1000000.0,"lower_bound":900000.0,"upper_bound":1100000.0,"unit":"ns"}}"#,
        "\n",
        r#"{"reason":"benchmark-complete","id":"cread31/dist_31509708","typical":{"estimate":2000000.0,"lower_bound":1900000.0,"upper_bound":2100000.0,"unit":"ns"}}"#,
        "\n",
    );

    #[test]
    fn one_point_per_variant_scales_to_milliseconds() {
        let path = write_log("raid_plot_lib_scale_test.txt", CREAD_LOG);
        let db = ResultsDB::load(&path).unwrap();

        let mut builder = SeriesBuilder::new(1, 1e-6);
        for (key, measurement) in db.decode(&cread_schema()) {
            builder.push(key, measurement);
        }
        // both series hold a single x, so padding is the explicit opt-in
        let all = builder
            .into_series(SparsePolicy::Pad { x: 0.9 })
            .unwrap();

        assert_eq!(all.len(), 2);
        assert_eq!(all[0].variant(), Variant::Controller);
        assert_eq!(all[0].points()[1].x, 1.0);
        assert_eq!(all[0].points()[1].estimate, 1.0);
        assert_eq!(all[1].variant(), Variant::Checkpoint);
        assert_eq!(all[1].points()[1].estimate, 2.0);

        std::fs::remove_file(path).unwrap();
    }

    #[test]
    fn sparse_series_without_opt_in_renders_nothing() {
        let log_path = write_log("raid_plot_lib_sparse_test.txt", CREAD_LOG);
        let output = std::env::temp_dir().join("raid_plot_lib_sparse_test.svg");

        let spec = ChartSpec::new(
            &log_path,
            cread_schema(),
            1,
            1e-6,
            "number of checksum devices",
            "read time in ms",
            &output,
        );
        let err = comparison_plot(&spec).unwrap_err();
        assert!(err.downcast_ref::<SparseSeries>().is_some());
        assert!(!output.exists());

        std::fs::remove_file(log_path).unwrap();
    }

    #[test]
    fn foreign_records_are_excluded_and_the_rest_charted() {
        let log = concat!(
            r#"{"reason":"benchmark-complete","id":"recover631/single recover","typical":{"estimate":5.0,"lower_bound":4.0,"upper_bound":6.0,"unit":"ns"}}"#,
            "\n",
            r#"{"reason":"benchmark-complete","id":"cread31/single_31509708","typical":{"estimate":1000000.0,"lower_bound":900000.0,"upper_bound":1100000.0,"unit":"ns"}}"#,
            "\n",
            r#"{"reason":"warmup"}"#,
            "\n",
            r#"{"reason":"benchmark-complete","id":"cread32/single_31509708","typical":{"estimate":1500000.0,"lower_bound":1400000.0,"upper_bound":1600000.0,"unit":"ns"}}"#,
            "\n",
        );
        let log_path = write_log("raid_plot_lib_foreign_test.txt", log);
        let output = std::env::temp_dir().join("raid_plot_lib_foreign_test.svg");

        let db = ResultsDB::load(&log_path).unwrap();
        // only the two cread records decode under the cread schema
        assert_eq!(db.decode(&cread_schema()).count(), 2);

        let spec = ChartSpec::new(
            &log_path,
            cread_schema(),
            1,
            1e-6,
            "number of checksum devices",
            "read time in ms",
            &output,
        );
        comparison_plot_with(&spec, &db, |_| true).unwrap();
        assert!(output.exists());

        std::fs::remove_file(log_path).unwrap();
        std::fs::remove_file(output).unwrap();
    }

    #[test]
    fn builds_from_the_same_log_are_identical() {
        let log = concat!(
            r#"{"reason":"benchmark-complete","id":"dwrite_9_2/single_31509708","typical":{"estimate":4.0,"lower_bound":3.0,"upper_bound":5.0,"unit":"ns"}}"#,
            "\n",
            r#"{"reason":"benchmark-complete","id":"dwrite_2_2/single_31509708","typical":{"estimate":1.0,"lower_bound":0.5,"upper_bound":1.5,"unit":"ns"}}"#,
            "\n",
            r#"{"reason":"benchmark-complete","id":"dwrite_9_2/dist_31509708","typical":{"estimate":8.0,"lower_bound":7.0,"upper_bound":9.0,"unit":"ns"}}"#,
            "\n",
            r#"{"reason":"benchmark-complete","id":"dwrite_2_2/dist_31509708","typical":{"estimate":2.0,"lower_bound":1.5,"upper_bound":2.5,"unit":"ns"}}"#,
            "\n",
        );
        let path = write_log("raid_plot_lib_idempotent_test.txt", log);
        let schema = ExperimentSchema::new(
            "dwrite",
            ParamStyle::Underscored { count: 2 },
            vec![
                (String::from("single_31509708"), Variant::Controller),
                (String::from("dist_31509708"), Variant::Checkpoint),
            ],
        );

        let build = || {
            let db = ResultsDB::load(&path).unwrap();
            let mut builder = SeriesBuilder::new(0, 1e-6);
            for (key, measurement) in db.decode(&schema) {
                builder.push(key, measurement);
            }
            builder.into_series(SparsePolicy::Reject).unwrap()
        };

        let first = serde_json::to_string(&build()).unwrap();
        let second = serde_json::to_string(&build()).unwrap();
        assert_eq!(first, second);

        std::fs::remove_file(path).unwrap();
    }

    #[test]
    fn faceted_chart_with_palette_renders() {
        // recover measurements for two failure counts, two variants each
        let log = concat!(
            r#"{"reason":"benchmark-complete","id":"recover651/single recover","typical":{"estimate":5.0e9,"lower_bound":4.0e9,"upper_bound":6.0e9,"unit":"ns"}}"#,
            "\n",
            r#"{"reason":"benchmark-complete","id":"recover661/single recover","typical":{"estimate":6.0e9,"lower_bound":5.0e9,"upper_bound":7.0e9,"unit":"ns"}}"#,
            "\n",
            r#"{"reason":"benchmark-complete","id":"recover651/distributed recover","typical":{"estimate":3.0e9,"lower_bound":2.0e9,"upper_bound":4.0e9,"unit":"ns"}}"#,
            "\n",
            r#"{"reason":"benchmark-complete","id":"recover661/distributed recover","typical":{"estimate":4.0e9,"lower_bound":3.0e9,"upper_bound":5.0e9,"unit":"ns"}}"#,
            "\n",
            r#"{"reason":"benchmark-complete","id":"recover652/single recover","typical":{"estimate":7.0e9,"lower_bound":6.0e9,"upper_bound":8.0e9,"unit":"ns"}}"#,
            "\n",
            r#"{"reason":"benchmark-complete","id":"recover662/single recover","typical":{"estimate":8.0e9,"lower_bound":7.0e9,"upper_bound":9.0e9,"unit":"ns"}}"#,
            "\n",
            r#"{"reason":"benchmark-complete","id":"recover652/distributed recover","typical":{"estimate":5.0e9,"lower_bound":4.0e9,"upper_bound":6.0e9,"unit":"ns"}}"#,
            "\n",
            r#"{"reason":"benchmark-complete","id":"recover662/distributed recover","typical":{"estimate":6.0e9,"lower_bound":5.0e9,"upper_bound":7.0e9,"unit":"ns"}}"#,
            "\n",
        );
        let log_path = write_log("raid_plot_lib_facet_test.txt", log);
        let output = std::env::temp_dir().join("raid_plot_lib_facet_test.svg");

        let schema = ExperimentSchema::new(
            "recover",
            ParamStyle::PackedDigits { count: 3 },
            vec![
                (String::from("single recover"), Variant::Controller),
                (String::from("distributed recover"), Variant::Checkpoint),
            ],
        );
        let mut spec = ChartSpec::new(
            &log_path,
            schema,
            1,
            1e-9,
            "number of checksum devices",
            "recover time in seconds",
            &output,
        );
        spec.set_facet(FacetSpec::new(2, vec![2, 1], "failures"))
            .set_palette(vec![("blue", "darkblue"), ("red", "darkred")]);

        comparison_plot(&spec).unwrap();
        let written = std::fs::read_to_string(&output).unwrap();
        assert!(written.contains("<svg"));
        // every series has its legend entry
        assert!(written.contains("controller, 2 failures"));
        assert!(written.contains("checkpoint, 1 failures"));

        std::fs::remove_file(log_path).unwrap();
        std::fs::remove_file(output).unwrap();
    }

    #[test]
    fn facet_values_missing_from_the_log_are_skipped() {
        let log = concat!(
            r#"{"reason":"benchmark-complete","id":"drecover_2_2_1/single recover","typical":{"estimate":2.0e9,"lower_bound":1.0e9,"upper_bound":3.0e9,"unit":"ns"}}"#,
            "\n",
            r#"{"reason":"benchmark-complete","id":"drecover_4_2_1/single recover","typical":{"estimate":4.0e9,"lower_bound":3.0e9,"upper_bound":5.0e9,"unit":"ns"}}"#,
            "\n",
        );
        let log_path = write_log("raid_plot_lib_missing_facet_test.txt", log);

        let schema = ExperimentSchema::new(
            "drecover",
            ParamStyle::Underscored { count: 3 },
            vec![(String::from("single recover"), Variant::Controller)],
        );
        let mut spec = ChartSpec::new(
            &log_path,
            schema,
            0,
            1e-9,
            "number of data devices",
            "recover time in seconds",
            "unused.svg",
        );
        spec.set_facet(FacetSpec::new(2, vec![1, 2], "failures"));

        let db = ResultsDB::load(&log_path).unwrap();
        let mut builder = SeriesBuilder::new(spec.x_param(), spec.scale());
        for (key, measurement) in db.decode(spec.schema()) {
            builder.push(key, measurement);
        }
        let all = builder.into_series(spec.sparse()).unwrap();
        let styled = arrange(&spec, &all);

        // only the f = 1 series exists; f = 2 draws nothing
        assert_eq!(styled.len(), 1);
        assert_eq!(styled[0].0.label, "controller, 1 failures");

        std::fs::remove_file(log_path).unwrap();
    }
}
