/// Transform applied to one grid-step column (the per-run values at a single
/// grid step) after coefficient scaling and before the mean/std pass.
pub type ColumnTransform = fn(&mut [f64]);

/// Configuration for one metric panel. Built once by the caller and passed
/// explicitly through alignment and aggregation.
#[derive(Clone, Debug)]
pub struct PlotSpec {
    /// Metric key as recorded in the event logs.
    pub key: String,
    /// Panel title.
    pub name: String,
    /// Y-axis label; omitted when `None`.
    pub label: Option<String>,
    /// Linear unit-conversion coefficient applied to every value.
    pub coeff: f64,
    pub logscale: bool,
    /// Display floor for the mean and both band bounds.
    pub clip_min: Option<f64>,
    /// Display ceiling, applied before `clip_min`.
    pub clip_max: Option<f64>,
    pub transform: Option<ColumnTransform>,
}

impl PlotSpec {
    pub fn new(key: &str, name: &str) -> Self {
        Self {
            key: key.to_string(),
            name: name.to_string(),
            label: None,
            coeff: 1.0,
            logscale: false,
            clip_min: None,
            clip_max: None,
            transform: None,
        }
    }

    pub fn label(mut self, label: &str) -> Self {
        self.label = Some(label.to_string());
        self
    }

    pub fn coeff(mut self, coeff: f64) -> Self {
        self.coeff = coeff;
        self
    }

    pub fn logscale(mut self) -> Self {
        self.logscale = true;
        self
    }

    pub fn clip_min(mut self, min: f64) -> Self {
        self.clip_min = Some(min);
        self
    }

    pub fn clip_max(mut self, max: f64) -> Self {
        self.clip_max = Some(max);
        self
    }

    pub fn transform(mut self, transform: ColumnTransform) -> Self {
        self.transform = Some(transform);
        self
    }
}
