use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::config::SimConfig;
use crate::error::{PredictError, Result};
use crate::strength::StrengthParams;

/// Goal rate used for both sides when there is nothing to estimate from.
pub const NEUTRAL_LAMBDA: f64 = 1.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Confidence {
    /// Both teams had history; rates come from estimated strengths.
    Estimated,
    /// History was empty or a team never appeared; rates are neutral.
    NeutralFallback,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MatchPrediction {
    pub lambda_home: f64,
    pub lambda_away: f64,
    pub confidence: Confidence,
    /// Set when either rate was raised to the configured floor.
    pub floored: bool,
}

impl MatchPrediction {
    pub fn neutral() -> Self {
        Self {
            lambda_home: NEUTRAL_LAMBDA,
            lambda_away: NEUTRAL_LAMBDA,
            confidence: Confidence::NeutralFallback,
            floored: false,
        }
    }
}

pub fn validate_fixture(home: &str, away: &str) -> Result<()> {
    if home.trim().is_empty() || away.trim().is_empty() {
        return Err(PredictError::EmptyTeamId);
    }
    if home == away {
        return Err(PredictError::SameTeam(home.to_string()));
    }
    Ok(())
}

pub fn predict_expected_goals(
    home: &str,
    away: &str,
    params: Option<&StrengthParams>,
    cfg: &SimConfig,
) -> Result<MatchPrediction> {
    validate_fixture(home, away)?;

    let Some(params) = params else {
        debug!(home, away, "no match history, using neutral goal rates");
        return Ok(MatchPrediction::neutral());
    };
    let (Some(h), Some(a)) = (params.team(home), params.team(away)) else {
        debug!(home, away, "team missing from history, using neutral goal rates");
        return Ok(MatchPrediction::neutral());
    };

    let raw_home = h.home_attack * a.away_defense * params.averages.avg_home_goals;
    let raw_away = a.away_attack * h.home_defense * params.averages.avg_away_goals;

    let floor = cfg.effective_lambda_floor();
    let (lambda_home, floored_home) = floor_lambda(raw_home, floor);
    let (lambda_away, floored_away) = floor_lambda(raw_away, floor);
    if floored_home || floored_away {
        warn!(
            home,
            away,
            raw_home,
            raw_away,
            floor,
            "goal rate below floor, clamped"
        );
    }

    Ok(MatchPrediction {
        lambda_home,
        lambda_away,
        confidence: Confidence::Estimated,
        floored: floored_home || floored_away,
    })
}

fn floor_lambda(raw: f64, floor: f64) -> (f64, bool) {
    if !raw.is_finite() || raw < floor {
        (floor, true)
    } else {
        (raw, false)
    }
}
