use serde::{Deserialize, Serialize};

/// The shared resampling grid: step values `0, stride, 2 * stride, ..`
/// strictly below `bound`. One grid is shared by every run and every metric
/// key of an invocation, which is what makes runs with different logging
/// cadences directly comparable.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct Grid {
    stride: u64,
    bound: u64,
}

impl Grid {
    pub const DEFAULT_STRIDE: u64 = 5_000_000;
    pub const DEFAULT_BOUND: u64 = 1_000_000_000 + 10_000;

    pub fn new(stride: u64, bound: u64) -> Self {
        assert!(stride > 0, "grid stride must be positive");
        Self { stride, bound }
    }

    pub fn steps(&self) -> Vec<u64> {
        (0..self.bound).step_by(self.stride as usize).collect()
    }

    pub fn len(&self) -> usize {
        self.bound.div_ceil(self.stride) as usize
    }

    pub fn is_empty(&self) -> bool {
        self.bound == 0
    }
}

impl Default for Grid {
    fn default() -> Self {
        Self::new(Self::DEFAULT_STRIDE, Self::DEFAULT_BOUND)
    }
}
