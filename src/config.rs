use serde::{Deserialize, Serialize};

use crate::simulation::MAX_GOALS_LIMIT;

pub const DEFAULT_MAX_GOALS: u32 = 10;
/// Smallest goal rate handed to the simulator. Zero would collapse the
/// distribution onto a certain 0-goal outcome.
pub const DEFAULT_LAMBDA_FLOOR: f64 = 0.1;
pub const DEFAULT_TOP_SCORELINES: usize = 5;
pub const DEFAULT_LOG_LEVEL: &str = "info";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    pub max_goals: u32,
    pub lambda_floor: f64,
    pub top_scorelines: usize,
    pub log_level: String,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            max_goals: DEFAULT_MAX_GOALS,
            lambda_floor: DEFAULT_LAMBDA_FLOOR,
            top_scorelines: DEFAULT_TOP_SCORELINES,
            log_level: DEFAULT_LOG_LEVEL.to_string(),
        }
    }
}

impl SimConfig {
    /// Defaults overridden by `SIM_*` environment variables. Unparseable or
    /// out-of-range values are ignored.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let d = Self::default();
        let max_goals = lookup("SIM_MAX_GOALS")
            .and_then(|v| v.trim().parse::<u32>().ok())
            .filter(|v| *v <= MAX_GOALS_LIMIT)
            .unwrap_or(d.max_goals);
        let lambda_floor = lookup("SIM_LAMBDA_FLOOR")
            .and_then(|v| v.trim().parse::<f64>().ok())
            .filter(|v| v.is_finite() && *v > 0.0)
            .unwrap_or(d.lambda_floor);
        let top_scorelines = lookup("SIM_TOP_SCORELINES")
            .and_then(|v| v.trim().parse::<usize>().ok())
            .unwrap_or(d.top_scorelines);
        let log_level = lookup("SIM_LOG_LEVEL")
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .unwrap_or(d.log_level);
        Self {
            max_goals,
            lambda_floor,
            top_scorelines,
            log_level,
        }
    }

    /// The configured floor when it is positive and finite, else the default.
    pub fn effective_lambda_floor(&self) -> f64 {
        if self.lambda_floor.is_finite() && self.lambda_floor > 0.0 {
            self.lambda_floor
        } else {
            DEFAULT_LAMBDA_FLOOR
        }
    }

    pub fn with_max_goals(mut self, max_goals: u32) -> Self {
        self.max_goals = max_goals;
        self
    }
}
