use rand::seq::SliceRandom;
use std::fmt;

/// One hyperparameter value in a run declaration.
#[derive(Clone, Debug, PartialEq)]
pub enum ParamValue {
    Int(i64),
    Float(f64),
    Str(String),
    Bool(bool),
}

impl fmt::Display for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamValue::Int(v) => write!(f, "{v}"),
            ParamValue::Float(v) => write!(f, "{v}"),
            ParamValue::Str(v) => write!(f, "{v}"),
            ParamValue::Bool(v) => write!(f, "{v}"),
        }
    }
}

impl From<i64> for ParamValue {
    fn from(v: i64) -> Self {
        ParamValue::Int(v)
    }
}

impl From<f64> for ParamValue {
    fn from(v: f64) -> Self {
        ParamValue::Float(v)
    }
}

impl From<&str> for ParamValue {
    fn from(v: &str) -> Self {
        ParamValue::Str(v.to_string())
    }
}

impl From<bool> for ParamValue {
    fn from(v: bool) -> Self {
        ParamValue::Bool(v)
    }
}

/// One generated parameter assignment: `(name, value)` pairs in declaration
/// order.
pub type ParamList = Vec<(String, ParamValue)>;

/// A declarative hyperparameter grid. Combinations are the cartesian product
/// of the declared value lists, in declaration order.
#[derive(Clone, Debug, Default)]
pub struct ParamGrid {
    params: Vec<(String, Vec<ParamValue>)>,
}

impl ParamGrid {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add<V: Into<ParamValue>>(mut self, name: &str, values: Vec<V>) -> Self {
        self.params
            .push((name.to_string(), values.into_iter().map(Into::into).collect()));
        self
    }

    pub fn generate_params(&self, randomize: bool) -> Vec<ParamList> {
        let mut combinations: Vec<ParamList> = vec![vec![]];
        for (name, values) in &self.params {
            let mut next = Vec::with_capacity(combinations.len() * values.len());
            for combination in &combinations {
                for value in values {
                    let mut combination = combination.clone();
                    combination.push((name.clone(), value.clone()));
                    next.push(combination);
                }
            }
            combinations = next;
        }
        if randomize {
            combinations.shuffle(&mut rand::thread_rng());
        }
        combinations
    }
}

/// One launchable training run: a unique name and the full shell command.
#[derive(Clone, Debug, PartialEq)]
pub struct Run {
    pub name: String,
    pub cmd: String,
}

/// A base command line plus the parameter combinations to launch it with.
#[derive(Clone, Debug)]
pub struct Experiment {
    pub name: String,
    pub cmd: String,
    pub param_combinations: Vec<ParamList>,
}

impl Experiment {
    pub fn new(name: &str, cmd: &str, param_combinations: Vec<ParamList>) -> Self {
        Self {
            name: name.to_string(),
            cmd: cmd.to_string(),
            param_combinations,
        }
    }

    pub fn generate_runs(&self) -> Vec<Run> {
        self.param_combinations
            .iter()
            .map(|combination| {
                let mut name = self.name.clone();
                let mut cmd = self.cmd.clone();
                for (param, value) in combination {
                    name.push_str(&format!("_{param}_{value}"));
                    cmd.push_str(&format!(" --{param}={value}"));
                }
                Run { name, cmd }
            })
            .collect()
    }
}

/// A named batch of experiments, launched together.
#[derive(Clone, Debug)]
pub struct RunDescription {
    pub run_name: String,
    pub experiments: Vec<Experiment>,
}

impl RunDescription {
    pub fn new(run_name: &str, experiments: Vec<Experiment>) -> Self {
        Self {
            run_name: run_name.to_string(),
            experiments,
        }
    }

    pub fn generate_runs(&self) -> Vec<Run> {
        self.experiments
            .iter()
            .flat_map(Experiment::generate_runs)
            .collect()
    }
}
