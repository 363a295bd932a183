mod aggregate;
mod grid;
mod interpolate;
mod plot_spec;

pub use aggregate::{aggregate, Envelope};
pub use grid::Grid;
pub use interpolate::{
    align_runs, interpolate_series, AlignedSeries, ConsistencyError, RunScalars, ScalarSeries,
};
pub use plot_spec::{ColumnTransform, PlotSpec};
