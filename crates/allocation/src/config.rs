use crate::error::{AllocationError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use supplyroute_graph::DEFAULT_MAX_HOPS;

/// Upper bound accepted for `max_hops`; path counts grow exponentially
pub const MAX_HOPS_LIMIT: usize = 32;

/// How equal-score feasible paths are resolved
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TieBreak {
    /// Smallest node-identifier sequence wins
    #[default]
    Lexicographic,
    /// Earliest path in enumeration order wins
    FirstEncountered,
}

impl fmt::Display for TieBreak {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Lexicographic => "lexicographic",
            Self::FirstEncountered => "first_encountered",
        })
    }
}

impl FromStr for TieBreak {
    type Err = AllocationError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "lexicographic" => Ok(Self::Lexicographic),
            "first_encountered" | "first" => Ok(Self::FirstEncountered),
            other => Err(AllocationError::InvalidConfig(format!(
                "unknown tie-break {other:?} (expected lexicographic or first_encountered)"
            ))),
        }
    }
}

/// Allocation engine settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AllocationConfig {
    /// Maximum edges per candidate path
    pub max_hops: usize,

    pub tie_break: TieBreak,

    /// Allocate chunks on the rayon pool
    pub parallel: bool,
}

impl Default for AllocationConfig {
    fn default() -> Self {
        Self {
            max_hops: DEFAULT_MAX_HOPS,
            tie_break: TieBreak::default(),
            parallel: false,
        }
    }
}

impl AllocationConfig {
    pub fn validate(&self) -> Result<()> {
        if self.max_hops > MAX_HOPS_LIMIT {
            return Err(AllocationError::InvalidConfig(format!(
                "max_hops must be at most {MAX_HOPS_LIMIT}, got {}",
                self.max_hops
            )));
        }
        Ok(())
    }
}
