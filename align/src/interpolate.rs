use crate::Grid;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

/// Loggers tend to emit garbage during warm-up, so the first samples of
/// every series are discarded before alignment.
const WARMUP_SAMPLES: usize = 2;

/// One run's logged sequence for a single metric key. `steps` and `values`
/// are parallel vectors ordered by step. Their lengths may disagree when the
/// logger flushed one stream further than the other; alignment truncates to
/// the shorter of the two.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ScalarSeries {
    pub steps: Vec<u64>,
    pub values: Vec<f64>,
}

/// Everything one run recorded, keyed by metric name.
pub type RunScalars = BTreeMap<String, ScalarSeries>;

/// One metric key resampled onto the grid: one row per run, one column per
/// grid step.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AlignedSeries {
    pub grid: Vec<u64>,
    pub rows: Vec<Vec<f64>>,
}

#[derive(Debug, Error)]
pub enum ConsistencyError {
    #[error(
        "all runs must log the same scalar keys; run 0 logged {expected:?}, run {run} logged {found:?}"
    )]
    KeyMismatch {
        run: usize,
        expected: Vec<String>,
        found: Vec<String>,
    },
    #[error("scalar {key:?} was not logged by the runs")]
    MissingKey { key: String },
    #[error("scalar {key:?}: run {run} has no samples left after warm-up truncation")]
    TooFewSamples { key: String, run: usize },
    #[error("cannot interpolate an empty series")]
    EmptySeries,
    #[error("scalar {key:?}: run {run} realized {found} grid steps, expected {expected}")]
    GridMismatch {
        key: String,
        run: usize,
        expected: usize,
        found: usize,
    },
}

/// Resamples one already-truncated series onto `grid_steps`.
///
/// A cursor walks the sample sequence once, left to right, ending up at the
/// last sample whose step is at or below the current grid step. Grid step 0
/// takes the cursor value as-is; a cursor inside the sequence takes the
/// unweighted midpoint of the cursor value and its successor; a cursor on
/// the final sample repeats that value (flat extrapolation past the end of
/// the run). The midpoint ignores how far the grid step sits between the
/// two samples: it is a coarse average, not a distance-weighted
/// interpolation.
pub fn interpolate_series(
    steps: &[u64],
    values: &[f64],
    grid_steps: &[u64],
) -> Result<Vec<f64>, ConsistencyError> {
    let len = steps.len().min(values.len());
    if len == 0 {
        return Err(ConsistencyError::EmptySeries);
    }
    let last = len - 1;
    let mut idx = 0;
    let mut out = Vec::with_capacity(grid_steps.len());
    for &g in grid_steps {
        while idx < last && steps[idx + 1] <= g {
            idx += 1;
        }
        let value = if g == 0 || idx == last {
            values[idx]
        } else {
            (values[idx] + values[idx + 1]) / 2.0
        };
        out.push(value);
    }
    Ok(out)
}

/// Aligns every run of a group onto `grid` for each of the configured metric
/// keys. All runs must have logged exactly the same key set; a mismatch
/// aborts the whole group with no aligned output, since it means the runs
/// were not produced by the same experiment configuration.
pub fn align_runs(
    runs: &[RunScalars],
    grid: &Grid,
    keys: &[&str],
) -> Result<BTreeMap<String, AlignedSeries>, ConsistencyError> {
    validate_key_sets(runs)?;
    let grid_steps = grid.steps();
    let mut aligned = BTreeMap::new();
    for &key in keys {
        let mut rows = Vec::with_capacity(runs.len());
        for (run, scalars) in runs.iter().enumerate() {
            let series = scalars
                .get(key)
                .ok_or_else(|| ConsistencyError::MissingKey {
                    key: key.to_string(),
                })?;
            let retained = series.steps.len().min(series.values.len());
            if retained <= WARMUP_SAMPLES {
                return Err(ConsistencyError::TooFewSamples {
                    key: key.to_string(),
                    run,
                });
            }
            let steps = &series.steps[WARMUP_SAMPLES..retained];
            let values = &series.values[WARMUP_SAMPLES..retained];
            let row = interpolate_series(steps, values, &grid_steps)?;
            if row.len() != grid_steps.len() {
                return Err(ConsistencyError::GridMismatch {
                    key: key.to_string(),
                    run,
                    expected: grid_steps.len(),
                    found: row.len(),
                });
            }
            rows.push(row);
        }
        aligned.insert(
            key.to_string(),
            AlignedSeries {
                grid: grid_steps.clone(),
                rows,
            },
        );
    }
    Ok(aligned)
}

fn validate_key_sets(runs: &[RunScalars]) -> Result<(), ConsistencyError> {
    let Some((first, rest)) = runs.split_first() else {
        return Ok(());
    };
    for (offset, run) in rest.iter().enumerate() {
        if !run.keys().eq(first.keys()) {
            return Err(ConsistencyError::KeyMismatch {
                run: offset + 1,
                expected: first.keys().cloned().collect(),
                found: run.keys().cloned().collect(),
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn series(samples: &[(u64, f64)]) -> ScalarSeries {
        ScalarSeries {
            steps: samples.iter().map(|&(s, _)| s).collect(),
            values: samples.iter().map(|&(_, v)| v).collect(),
        }
    }

    /// Prepends two warm-up samples that alignment must discard.
    fn run_with(key: &str, samples: &[(u64, f64)]) -> RunScalars {
        let mut padded = vec![(0, f64::MAX), (0, f64::MAX)];
        padded.extend_from_slice(samples);
        let mut run = RunScalars::new();
        run.insert(key.to_string(), series(&padded));
        run
    }

    #[test]
    fn output_length_always_matches_the_grid() {
        let steps: Vec<u64> = (0..17).map(|i| i * 37).collect();
        let values: Vec<f64> = (0..17).map(|i| i as f64).collect();
        for grid_steps in [vec![0], vec![0, 3, 9_999], vec![0, 1, 2, 3, 4, 5, 6]] {
            let out = interpolate_series(&steps, &values, &grid_steps).unwrap();
            assert_eq!(out.len(), grid_steps.len());
        }
    }

    #[test]
    fn grid_step_zero_takes_the_first_retained_value() {
        let out = interpolate_series(&[7, 100, 200], &[42.0, 1.0, 2.0], &[0]).unwrap();
        assert_eq!(out, vec![42.0]);
    }

    #[test]
    fn grid_steps_past_the_run_extrapolate_flat() {
        let out = interpolate_series(&[0, 100, 200], &[1.0, 2.0, 3.0], &[0, 200, 5_000]).unwrap();
        assert_eq!(out[1], 3.0);
        assert_eq!(out[2], 3.0);
    }

    #[test]
    fn interior_grid_steps_take_the_bracketing_midpoint() {
        let out = interpolate_series(
            &[0, 100, 200, 300],
            &[10.0, 12.0, 14.0, 16.0],
            &[0, 150, 300],
        )
        .unwrap();
        assert_eq!(out, vec![10.0, 13.0, 16.0]);
    }

    #[test]
    fn mismatched_step_and_value_lengths_truncate_to_the_shorter() {
        // Five steps but only four values: the fifth step must be ignored.
        let out = interpolate_series(
            &[0, 100, 200, 300, 400],
            &[10.0, 12.0, 14.0, 16.0],
            &[0, 400],
        )
        .unwrap();
        assert_eq!(out, vec![10.0, 16.0]);
    }

    #[test]
    fn empty_series_is_an_error() {
        let err = interpolate_series(&[], &[], &[0, 100]).unwrap_err();
        assert!(matches!(err, ConsistencyError::EmptySeries));
    }

    #[test]
    fn warm_up_samples_are_discarded() {
        let run = run_with("loss", &[(0, 10.0), (100, 12.0), (200, 14.0), (300, 16.0)]);
        let aligned = align_runs(&[run], &Grid::new(150, 310), &["loss"]).unwrap();
        assert_eq!(aligned["loss"].rows, vec![vec![10.0, 13.0, 16.0]]);
        assert_eq!(aligned["loss"].grid, vec![0, 150, 300]);
    }

    #[test]
    fn identical_runs_align_identically() {
        let samples = [(0, 10.0), (100, 12.0), (200, 14.0), (300, 16.0)];
        let runs = vec![run_with("loss", &samples), run_with("loss", &samples)];
        let aligned = align_runs(&runs, &Grid::new(150, 310), &["loss"]).unwrap();
        assert_eq!(
            aligned["loss"].rows,
            vec![vec![10.0, 13.0, 16.0], vec![10.0, 13.0, 16.0]]
        );
    }

    #[test]
    fn key_set_mismatch_is_fatal() {
        let a = run_with("loss", &[(0, 1.0), (1, 1.0), (2, 1.0)]);
        let b = run_with("score", &[(0, 1.0), (1, 1.0), (2, 1.0)]);
        let err = align_runs(&[a, b], &Grid::new(1, 3), &["loss"]).unwrap_err();
        assert!(matches!(err, ConsistencyError::KeyMismatch { run: 1, .. }));
    }

    #[test]
    fn missing_configured_key_is_reported() {
        let run = run_with("loss", &[(0, 1.0), (1, 1.0), (2, 1.0)]);
        let err = align_runs(&[run], &Grid::new(1, 3), &["score"]).unwrap_err();
        assert!(matches!(err, ConsistencyError::MissingKey { .. }));
    }

    #[test]
    fn runs_shorter_than_the_warm_up_are_rejected() {
        let mut run = RunScalars::new();
        run.insert("loss".to_string(), series(&[(0, 1.0), (1, 2.0)]));
        let err = align_runs(&[run], &Grid::new(1, 3), &["loss"]).unwrap_err();
        assert!(matches!(err, ConsistencyError::TooFewSamples { .. }));
    }
}
