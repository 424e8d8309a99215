use crate::config::{ChartSpec, LegendCorner};
use crate::series::Series;
use color_eyre::eyre;
use color_eyre::eyre::WrapErr;
use color_eyre::Report;
use plotters::prelude::*;
use std::ops::Range;
use tracing::info;

/// Label and color attached to one series when it is drawn.
#[derive(Debug)]
pub struct SeriesStyle {
    pub label: String,
    pub color: RGBColor,
}

/// Draws one comparative chart: for every series a line through the
/// estimates plus a shaded band between the confidence bounds, then axis
/// labels and a legend box, all written as one SVG document to the spec's
/// output path. An existing file at that path is overwritten.
pub fn line_chart(
    spec: &ChartSpec,
    styled: &[(SeriesStyle, &Series)],
) -> Result<(), Report> {
    if styled.is_empty() {
        eyre::bail!(
            "chart {} has no series to draw",
            spec.output_path().display()
        );
    }

    let (x_range, y_range) = axis_ranges(styled);
    let path = spec.output_path();

    let root = SVGBackend::new(path, spec.size()).into_drawing_area();
    root.fill(&WHITE)
        .wrap_err_with(|| format!("prepare chart {}", path.display()))?;

    let mut chart = ChartBuilder::on(&root)
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(60)
        .build_cartesian_2d(x_range, y_range)?;

    chart
        .configure_mesh()
        .x_desc(spec.x_label())
        .y_desc(spec.y_label())
        .axis_desc_style(("sans-serif", 16))
        .label_style(("sans-serif", 13))
        .draw()?;

    for (style, series) in styled {
        let color = style.color;

        // confidence band: upper bound left to right, lower bound back
        let band: Vec<(f64, f64)> = series
            .points()
            .iter()
            .map(|point| (point.x, point.upper_bound))
            .chain(
                series
                    .points()
                    .iter()
                    .rev()
                    .map(|point| (point.x, point.lower_bound)),
            )
            .collect();
        chart.draw_series(std::iter::once(Polygon::new(
            band,
            color.mix(0.2).filled(),
        )))?;

        chart
            .draw_series(LineSeries::new(
                series.points().iter().map(|point| (point.x, point.estimate)),
                color.stroke_width(2),
            ))?
            .label(style.label.clone())
            .legend(move |(x, y)| {
                PathElement::new(vec![(x, y), (x + 20, y)], color.stroke_width(2))
            });
    }

    chart
        .configure_series_labels()
        .position(legend_position(spec.legend()))
        .border_style(BLACK)
        .background_style(WHITE.mix(0.8))
        .label_font(("sans-serif", 13))
        .draw()?;

    root.present()
        .wrap_err_with(|| format!("write chart {}", path.display()))?;
    info!("[plot] wrote {}", path.display());
    Ok(())
}

fn legend_position(corner: LegendCorner) -> SeriesLabelPosition {
    match corner {
        LegendCorner::UpperLeft => SeriesLabelPosition::UpperLeft,
        LegendCorner::UpperRight => SeriesLabelPosition::UpperRight,
        LegendCorner::LowerLeft => SeriesLabelPosition::LowerLeft,
        LegendCorner::LowerRight => SeriesLabelPosition::LowerRight,
    }
}

// Computes the axis spans from the data: x covers the points exactly and
// y covers the widest confidence bounds with a 5% margin, so the layout
// never depends on backend autoscaling.
fn axis_ranges(styled: &[(SeriesStyle, &Series)]) -> (Range<f64>, Range<f64>) {
    let mut x_min = f64::INFINITY;
    let mut x_max = f64::NEG_INFINITY;
    let mut y_min = f64::INFINITY;
    let mut y_max = f64::NEG_INFINITY;

    for (_, series) in styled {
        for point in series.points() {
            x_min = x_min.min(point.x);
            x_max = x_max.max(point.x);
            y_min = y_min.min(point.lower_bound);
            y_max = y_max.max(point.upper_bound);
        }
    }

    let x_range = if x_max > x_min {
        x_min..x_max
    } else {
        (x_min - 0.5)..(x_max + 0.5)
    };
    let y_range = if y_max > y_min {
        let pad = (y_max - y_min) * 0.05;
        (y_min - pad)..(y_max + pad)
    } else {
        (y_min - 0.5)..(y_max + 0.5)
    };
    (x_range, y_range)
}
