use serde::{Deserialize, Serialize};

use crate::error::{PredictError, Result};

/// One finished fixture as delivered by the match store.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct HistoricalMatch {
    pub home_team: String,
    pub away_team: String,
    pub home_goals: u32,
    pub away_goals: u32,
}

impl HistoricalMatch {
    pub fn new(
        home_team: impl Into<String>,
        away_team: impl Into<String>,
        home_goals: u32,
        away_goals: u32,
    ) -> Self {
        Self {
            home_team: home_team.into(),
            away_team: away_team.into(),
            home_goals,
            away_goals,
        }
    }

    /// Build from raw store counts, which arrive signed.
    pub fn from_raw(
        home_team: impl Into<String>,
        away_team: impl Into<String>,
        home_goals: i64,
        away_goals: i64,
    ) -> Result<Self> {
        let home_team = home_team.into();
        let away_team = away_team.into();
        let (Ok(h), Ok(a)) = (u32::try_from(home_goals), u32::try_from(away_goals)) else {
            return Err(PredictError::NegativeGoals {
                home: home_team,
                away: away_team,
                home_goals,
                away_goals,
            });
        };
        Ok(Self::new(home_team, away_team, h, a))
    }
}

/// Anything that can hand the engine a snapshot of finished matches.
pub trait MatchHistorySource {
    fn historical_matches(&self) -> anyhow::Result<Vec<HistoricalMatch>>;
}
