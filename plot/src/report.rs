use crate::args::OutputMode;
use align::{Envelope, PlotSpec};
use anyhow::{Context, Result};
use std::io::Write;
use std::path::Path;
use tracing::info;

/// Emits the aggregated values in the mode selected by `--output`. Purely a
/// reporting step: the aligned and aggregated data are identical in both
/// modes.
pub fn emit(
    mode: OutputMode,
    plots: &[PlotSpec],
    grid: &[u64],
    groups: &[(String, Vec<Envelope>)],
    report_dir: &Path,
) -> Result<()> {
    match mode {
        OutputMode::Summary => log_summary(plots, groups),
        OutputMode::Csv => write_csv(plots, grid, groups, report_dir),
    }
}

fn log_summary(plots: &[PlotSpec], groups: &[(String, Vec<Envelope>)]) -> Result<()> {
    for (index, spec) in plots.iter().enumerate() {
        for (group, envelopes) in groups {
            let envelope = &envelopes[index];
            if let Some(mean) = envelope.mean.last() {
                info!("{group}: {} final mean {mean:.4}", spec.key);
            }
        }
    }
    Ok(())
}

fn write_csv(
    plots: &[PlotSpec],
    grid: &[u64],
    groups: &[(String, Vec<Envelope>)],
    report_dir: &Path,
) -> Result<()> {
    file_io::ensure_dir_exists(report_dir)?;
    for (index, spec) in plots.iter().enumerate() {
        let path = report_dir.join(csv_file_name(&spec.key));
        let mut file = file_io::create_file_buf_write(&path)
            .with_context(|| format!("failed to create {}", path.display()))?;

        write!(file, "step")?;
        for (group, _) in groups {
            write!(file, ",{group}_mean,{group}_std")?;
        }
        writeln!(file)?;

        for (col, step) in grid.iter().enumerate() {
            write!(file, "{step}")?;
            for (_, envelopes) in groups {
                let envelope = &envelopes[index];
                let mean = envelope.mean[col];
                let std = envelope.upper[col] - mean;
                write!(file, ",{mean},{std}")?;
            }
            writeln!(file)?;
        }
        file.flush()?;
        info!("wrote {}", path.display());
    }
    Ok(())
}

fn csv_file_name(key: &str) -> String {
    let mut name: String = key
        .chars()
        .map(|c| if c == '/' || c == ' ' { '_' } else { c })
        .collect();
    name.push_str(".csv");
    name
}
