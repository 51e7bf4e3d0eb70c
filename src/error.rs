use thiserror::Error;

/// Caller misuse of the prediction pipeline. Missing history is not an error;
/// it degrades to a neutral prediction instead.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PredictError {
    #[error("negative goal count in match {home} vs {away}: {home_goals}-{away_goals}")]
    NegativeGoals {
        home: String,
        away: String,
        home_goals: i64,
        away_goals: i64,
    },

    #[error("a team cannot play itself: {0}")]
    SameTeam(String),

    #[error("team identifier must not be empty")]
    EmptyTeamId,

    #[error("goal rate must be positive and finite, got {0}")]
    InvalidLambda(f64),

    #[error("max_goals {requested} exceeds limit {limit}")]
    MaxGoalsTooLarge { requested: u32, limit: u32 },
}

pub type Result<T> = std::result::Result<T, PredictError>;
