use clap::{Parser, ValueEnum};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct Args {
    /// Root directory containing one subdirectory per experiment group, each
    /// holding that group's run directories.
    #[arg(long, default_value = ".")]
    pub path: PathBuf,

    /// Downstream reporting mode for the aggregated values. Does not change
    /// how values are aligned or aggregated.
    #[arg(long, value_enum, default_value = "csv")]
    pub output: OutputMode,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputMode {
    /// Log the final mean per group and metric.
    Summary,
    /// Write one CSV per metric with per-group mean/std columns.
    Csv,
}
