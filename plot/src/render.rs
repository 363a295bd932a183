use crate::config;
use align::{Envelope, PlotSpec};
use anyhow::Result;
use plotters::coord::ranged1d::ValueFormatter;
use plotters::coord::types::RangedCoordu64;
use plotters::coord::Shift;
use plotters::prelude::*;
use std::path::Path;

const FIGURE_SIZE: (u32, u32) = (1280, 960);
const PANELS_PER_ROW: usize = 2;

/// Draws the comparison figure: one panel per metric spec, one mean line and
/// mean±std band per group, colors assigned by group index.
pub fn render(
    plots: &[PlotSpec],
    grid: &[u64],
    groups: &[(String, Vec<Envelope>)],
    out_path: &Path,
) -> Result<()> {
    let root = SVGBackend::new(out_path, FIGURE_SIZE).into_drawing_area();
    root.fill(&WHITE)?;
    let rows = plots.len().div_ceil(PANELS_PER_ROW);
    let areas = root.split_evenly((rows, PANELS_PER_ROW));
    for (index, spec) in plots.iter().enumerate() {
        let bottom_row = index / PANELS_PER_ROW == rows - 1;
        draw_panel(&areas[index], spec, grid, groups, index, bottom_row)?;
    }
    root.present()?;
    Ok(())
}

fn draw_panel(
    area: &DrawingArea<SVGBackend, Shift>,
    spec: &PlotSpec,
    grid: &[u64],
    groups: &[(String, Vec<Envelope>)],
    panel_index: usize,
    bottom_row: bool,
) -> Result<()> {
    let x_max = grid.last().copied().unwrap_or(1).max(1);
    let (y_min, y_max) = y_extent(spec, groups, panel_index);

    let mut builder = ChartBuilder::on(area);
    builder
        .caption(&spec.name, ("sans-serif", 18))
        .margin(10)
        .x_label_area_size(35)
        .y_label_area_size(55);

    if spec.logscale {
        let mut chart = builder.build_cartesian_2d(0..x_max, (y_min..y_max).log_scale())?;
        draw_panel_content(&mut chart, spec, grid, groups, panel_index, bottom_row)?;
    } else {
        let mut chart = builder.build_cartesian_2d(0..x_max, y_min..y_max)?;
        draw_panel_content(&mut chart, spec, grid, groups, panel_index, bottom_row)?;
    }
    Ok(())
}

fn draw_panel_content<'a, 'b, Y>(
    chart: &mut ChartContext<'a, SVGBackend<'b>, Cartesian2d<RangedCoordu64, Y>>,
    spec: &PlotSpec,
    grid: &[u64],
    groups: &[(String, Vec<Envelope>)],
    panel_index: usize,
    bottom_row: bool,
) -> Result<()>
where
    'b: 'a,
    Y: Ranged<ValueType = f64> + ValueFormatter<f64>,
{
    let x_formatter = |step: &u64| abbreviate_steps(*step);
    let y_formatter = |value: &f64| format!("{value:.2}");
    {
        let mut mesh = chart.configure_mesh();
        mesh.light_line_style(&TRANSPARENT)
            .bold_line_style(&RGBColor(0xb3, 0xb3, 0xb3).mix(0.2))
            .x_labels(6)
            .y_labels(8)
            .x_label_formatter(&x_formatter)
            .label_style(("sans-serif", 11));
        if spec.logscale {
            mesh.y_label_formatter(&y_formatter);
        }
        if bottom_row {
            mesh.x_desc("Simulation steps");
        }
        if let Some(label) = &spec.label {
            mesh.y_desc(label);
        }
        mesh.draw()?;
    }

    for (group_index, (label, envelopes)) in groups.iter().enumerate() {
        let envelope = &envelopes[panel_index];
        let color = config::PALETTE[group_index % config::PALETTE.len()];

        let band: Vec<(u64, f64)> = grid
            .iter()
            .copied()
            .zip(envelope.upper.iter().copied())
            .chain(
                grid.iter()
                    .rev()
                    .copied()
                    .zip(envelope.lower.iter().rev().copied()),
            )
            .collect();
        chart.draw_series(std::iter::once(Polygon::new(band, &color.mix(0.25))))?;

        chart
            .draw_series(LineSeries::new(
                grid.iter().copied().zip(envelope.mean.iter().copied()),
                &color,
            ))?
            .label(label.as_str())
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 16, y)], color));
    }

    // One shared legend, drawn on the first panel only.
    if panel_index == 0 {
        chart
            .configure_series_labels()
            .position(SeriesLabelPosition::UpperRight)
            .background_style(&WHITE.mix(0.8))
            .border_style(&BLACK.mix(0.4))
            .label_font(("sans-serif", 12))
            .draw()?;
    }
    Ok(())
}

/// Y range across every group's envelope for one panel, padded for display.
/// Log-scaled panels always get a strictly positive lower bound.
fn y_extent(spec: &PlotSpec, groups: &[(String, Vec<Envelope>)], panel_index: usize) -> (f64, f64) {
    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;
    for (_, envelopes) in groups {
        let envelope = &envelopes[panel_index];
        for &v in envelope.lower.iter().chain(envelope.upper.iter()) {
            min = min.min(v);
            max = max.max(v);
        }
    }
    if !min.is_finite() || !max.is_finite() {
        return (0.0, 1.0);
    }
    if spec.logscale {
        let min = min.max(1e-6);
        let max = max.max(min * 2.0);
        (min * 0.8, max * 1.25)
    } else {
        let pad = ((max - min) * 0.05).max(1e-9);
        (min - pad, max + pad)
    }
}

pub fn abbreviate_steps(step: u64) -> String {
    if step >= 1_000_000_000 {
        format!("{}B", step / 1_000_000_000)
    } else if step >= 1_000_000 {
        format!("{}M", step / 1_000_000)
    } else if step >= 1_000 {
        format!("{}K", step / 1_000)
    } else {
        step.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn step_labels_abbreviate_by_magnitude() {
        assert_eq!(abbreviate_steps(0), "0");
        assert_eq!(abbreviate_steps(999), "999");
        assert_eq!(abbreviate_steps(5_000), "5K");
        assert_eq!(abbreviate_steps(5_000_000), "5M");
        assert_eq!(abbreviate_steps(1_000_000_000), "1B");
    }

    #[test]
    fn renders_a_figure_for_two_groups() {
        let dir = tempfile::TempDir::new().unwrap();
        let out = dir.path().join("figure.svg");
        let plots = vec![
            PlotSpec::new("a", "Panel A")
                .label("meters")
                .logscale()
                .clip_min(0.1),
            PlotSpec::new("b", "Panel B"),
        ];
        let grid = vec![0, 50, 100];
        let envelope = |base: f64| Envelope {
            mean: vec![base, base + 1.0, base + 2.0],
            lower: vec![base - 0.5, base + 0.5, base + 1.5],
            upper: vec![base + 0.5, base + 1.5, base + 2.5],
        };
        let groups = vec![
            ("attention".to_string(), vec![envelope(1.0), envelope(2.0)]),
            ("mlp".to_string(), vec![envelope(3.0), envelope(4.0)]),
        ];
        render(&plots, &grid, &groups, &out).unwrap();
        let svg = std::fs::read_to_string(&out).unwrap();
        assert!(svg.contains("<svg"));
    }

    #[test]
    fn log_extent_stays_positive() {
        let groups = vec![(
            "g".to_string(),
            vec![Envelope {
                mean: vec![0.0],
                lower: vec![-1.0],
                upper: vec![2.0],
            }],
        )];
        let spec = align::PlotSpec::new("k", "k").logscale();
        let (lo, hi) = y_extent(&spec, &groups, 0);
        assert!(lo > 0.0);
        assert!(hi > lo);
    }
}
