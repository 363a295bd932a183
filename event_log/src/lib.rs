use align::{RunScalars, ScalarSeries};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::io::{self, BufRead};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Suffix that marks a file as a scalar event log.
pub const EVENT_FILE_SUFFIX: &str = ".events.jsonl";

/// One logged scalar: a single line of an event-log file.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ScalarEvent {
    pub step: u64,
    pub key: String,
    pub value: f64,
}

#[derive(Debug, Error)]
pub enum ReadError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("{path}:{line}: malformed event record: {source}")]
    Malformed {
        path: PathBuf,
        line: usize,
        #[source]
        source: serde_json::Error,
    },
}

/// Directories under `group_dir` (searched recursively) that contain at
/// least one event-log file. Each such directory is one run. Returned
/// sorted so that run ordering is stable across invocations.
pub fn find_run_dirs<P: AsRef<Path>>(group_dir: P) -> Vec<PathBuf> {
    let mut run_dirs = BTreeSet::new();
    for entry in walkdir::WalkDir::new(group_dir)
        .into_iter()
        .filter_map(Result::ok)
    {
        if entry.file_type().is_file() && is_event_file(entry.path()) {
            if let Some(parent) = entry.path().parent() {
                run_dirs.insert(parent.to_path_buf());
            }
        }
    }
    run_dirs.into_iter().collect()
}

/// Reads every event-log file directly inside `run_dir` and accumulates the
/// records into per-key series ordered by step. The returned map is empty
/// when the directory holds event files with no records in them.
pub fn read_run<P: AsRef<Path>>(run_dir: P) -> Result<RunScalars, ReadError> {
    let run_dir = run_dir.as_ref();
    let mut event_files: Vec<PathBuf> = std::fs::read_dir(run_dir)
        .map_err(|source| ReadError::Io {
            path: run_dir.to_path_buf(),
            source,
        })?
        .filter_map(Result::ok)
        .map(|entry| entry.path())
        .filter(|path| path.is_file() && is_event_file(path))
        .collect();
    event_files.sort();

    let mut samples: std::collections::BTreeMap<String, Vec<(u64, f64)>> = Default::default();
    for path in event_files {
        let reader = open_event_file(&path)?;
        for (index, line) in reader.lines().enumerate() {
            let line = line.map_err(|source| ReadError::Io {
                path: path.clone(),
                source,
            })?;
            if line.trim().is_empty() {
                continue;
            }
            let event: ScalarEvent =
                serde_json::from_str(&line).map_err(|source| ReadError::Malformed {
                    path: path.clone(),
                    line: index + 1,
                    source,
                })?;
            samples
                .entry(event.key)
                .or_default()
                .push((event.step, event.value));
        }
    }

    let mut scalars = RunScalars::new();
    for (key, mut points) in samples {
        points.sort_by_key(|&(step, _)| step);
        scalars.insert(
            key,
            ScalarSeries {
                steps: points.iter().map(|&(step, _)| step).collect(),
                values: points.iter().map(|&(_, value)| value).collect(),
            },
        );
    }
    Ok(scalars)
}

fn is_event_file(path: &Path) -> bool {
    path.file_name()
        .and_then(|name| name.to_str())
        .is_some_and(|name| name.ends_with(EVENT_FILE_SUFFIX))
}

fn open_event_file(path: &Path) -> Result<std::io::BufReader<std::fs::File>, ReadError> {
    file_io::open_file_buf_read(path).map_err(|source| ReadError::Io {
        path: path.to_path_buf(),
        source,
    })
}
