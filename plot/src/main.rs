mod args;
mod config;
mod render;
mod report;

use align::{aggregate, align_runs, Envelope, Grid, RunScalars};
use anyhow::{bail, Context, Result};
use args::Args;
use cache::{GroupData, ResultCache};
use clap::Parser;
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    let args = Args::parse();
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    if !args.path.is_dir() {
        bail!("{} is not a valid path", args.path.display());
    }

    let plots = config::plots();
    let grid = Grid::default();
    let cache = ResultCache::new(config::CACHE_DIR);

    let mut groups: Vec<(String, GroupData)> = Vec::new();
    for group_dir in group_dirs(&args.path)? {
        let group = group_dir
            .file_name()
            .and_then(|name| name.to_str())
            .map(str::to_string)
            .with_context(|| format!("group directory {} has no name", group_dir.display()))?;

        let data = match cache.load(&group)? {
            Some(data) => {
                info!("cache hit for group {group}");
                data
            }
            None => {
                let runs = load_runs(&group_dir)?;
                if runs.is_empty() {
                    warn!("skipping {group}: no event logs found");
                    continue;
                }
                info!("started aggregation of {group} ({} runs)", runs.len());
                let keys: Vec<&str> = plots.iter().map(|spec| spec.key.as_str()).collect();
                let data = align_runs(&runs, &grid, &keys)
                    .with_context(|| format!("failed to align group {group}"))?;
                cache.store(&group, &data)?;
                data
            }
        };
        groups.push((group, data));
    }
    if groups.is_empty() {
        bail!("no groups with event logs under {}", args.path.display());
    }

    let mut bands: Vec<(String, Vec<Envelope>)> = Vec::with_capacity(groups.len());
    for (group, data) in &groups {
        let mut envelopes = Vec::with_capacity(plots.len());
        for spec in &plots {
            let aligned = data.get(&spec.key).with_context(|| {
                format!("scalar {:?} missing from aligned data of group {group}", spec.key)
            })?;
            envelopes.push(aggregate(aligned, spec));
        }
        bands.push((group.clone(), envelopes));
    }

    let grid_steps = grid.steps();
    validate_grids(&grid_steps, &groups)?;

    let out_path = Path::new(config::OUTPUT_FILE);
    if let Some(parent) = out_path.parent() {
        file_io::ensure_dir_exists(parent)?;
    }
    render::render(&plots, &grid_steps, &bands, out_path)?;
    info!("wrote {}", out_path.display());

    report::emit(
        args.output,
        &plots,
        &grid_steps,
        &bands,
        Path::new(config::REPORT_DIR),
    )?;
    Ok(())
}

/// Every aligned series must carry the configured grid. A cached artifact
/// written under an older grid configuration would otherwise misalign the
/// figure, so a mismatch is fatal and names the directory to delete.
fn validate_grids(expected: &[u64], groups: &[(String, GroupData)]) -> Result<()> {
    for (group, data) in groups {
        for (key, aligned) in data {
            if aligned.grid.as_slice() != expected {
                bail!(
                    "group {group} scalar {key:?}: cached grid has {} steps but the \
                     configured grid has {}; delete {} and rerun",
                    aligned.grid.len(),
                    expected.len(),
                    config::CACHE_DIR,
                );
            }
        }
    }
    Ok(())
}

/// Sorted subdirectories of the root path; each is a candidate group.
fn group_dirs(path: &Path) -> Result<Vec<PathBuf>> {
    let mut dirs: Vec<PathBuf> = std::fs::read_dir(path)
        .with_context(|| format!("failed to list {}", path.display()))?
        .filter_map(Result::ok)
        .map(|entry| entry.path())
        .filter(|path| path.is_dir())
        .collect();
    dirs.sort();
    Ok(dirs)
}

/// All runs of one group, with event-less directories filtered out.
fn load_runs(group_dir: &Path) -> Result<Vec<RunScalars>> {
    let mut runs = Vec::new();
    for run_dir in event_log::find_run_dirs(group_dir) {
        let scalars = event_log::read_run(&run_dir)
            .with_context(|| format!("failed to read run {}", run_dir.display()))?;
        if scalars.is_empty() {
            continue;
        }
        runs.push(scalars);
    }
    Ok(runs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use align::AlignedSeries;

    fn group(name: &str, grid: Vec<u64>) -> (String, GroupData) {
        let mut data = GroupData::new();
        data.insert(
            "loss".to_string(),
            AlignedSeries {
                rows: vec![vec![1.0; grid.len()]],
                grid,
            },
        );
        (name.to_string(), data)
    }

    #[test]
    fn matching_grids_pass_validation() {
        let groups = vec![group("baseline", vec![0, 10, 20])];
        assert!(validate_grids(&[0, 10, 20], &groups).is_ok());
    }

    #[test]
    fn stale_cached_grids_are_rejected() {
        let groups = vec![group("baseline", vec![0, 10, 20]), group("new", vec![0, 10])];
        let err = validate_grids(&[0, 10, 20], &groups).unwrap_err();
        assert!(err.to_string().contains("new"));
    }
}
