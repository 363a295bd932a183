use crate::{AlignedSeries, PlotSpec};
use serde::{Deserialize, Serialize};

/// The plottable band for one metric key: elementwise mean across runs plus
/// the mean ± population-standard-deviation bounds. All three vectors have
/// one entry per grid step.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Envelope {
    pub mean: Vec<f64>,
    pub lower: Vec<f64>,
    pub upper: Vec<f64>,
}

/// Collapses the run dimension of an aligned series into a mean/std band.
///
/// In order: every value is scaled by `spec.coeff` (unit conversion), the
/// optional transform is applied per column (the vector of per-run values at
/// one grid step), then mean and population std are taken across runs, and
/// finally `clip_max` and then `clip_min` are applied identically to the
/// mean and both bounds. Clipping is a display floor/ceiling, not a
/// statistical operation, so it may flatten the band onto the clip bound.
pub fn aggregate(aligned: &AlignedSeries, spec: &PlotSpec) -> Envelope {
    assert!(!aligned.rows.is_empty(), "cannot aggregate zero runs");
    let cols = aligned.grid.len();
    let run_count = aligned.rows.len();

    let mut scaled: Vec<Vec<f64>> = aligned
        .rows
        .iter()
        .map(|row| row.iter().map(|v| v * spec.coeff).collect())
        .collect();

    if let Some(transform) = spec.transform {
        let mut column = vec![0.0; run_count];
        for col in 0..cols {
            for (run, row) in scaled.iter().enumerate() {
                column[run] = row[col];
            }
            transform(&mut column);
            for (run, row) in scaled.iter_mut().enumerate() {
                row[col] = column[run];
            }
        }
    }

    let mut mean = Vec::with_capacity(cols);
    let mut lower = Vec::with_capacity(cols);
    let mut upper = Vec::with_capacity(cols);
    for col in 0..cols {
        let m = scaled.iter().map(|row| row[col]).sum::<f64>() / run_count as f64;
        let var = scaled
            .iter()
            .map(|row| (row[col] - m).powi(2))
            .sum::<f64>()
            / run_count as f64;
        let std = var.sqrt();
        mean.push(m);
        lower.push(m - std);
        upper.push(m + std);
    }

    if let Some(max) = spec.clip_max {
        for v in mean.iter_mut().chain(lower.iter_mut()).chain(upper.iter_mut()) {
            *v = v.min(max);
        }
    }
    if let Some(min) = spec.clip_min {
        for v in mean.iter_mut().chain(lower.iter_mut()).chain(upper.iter_mut()) {
            *v = v.max(min);
        }
    }

    Envelope { mean, lower, upper }
}
