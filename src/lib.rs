pub mod config;
pub mod error;
pub mod history;
pub mod logging;
pub mod pipeline;
pub mod predictor;
pub mod simulation;
pub mod snapshot;
pub mod store;
pub mod strength;

pub use config::SimConfig;
pub use error::PredictError;
pub use history::{HistoricalMatch, MatchHistorySource};
pub use pipeline::{Fixture, Forecast, forecast, forecast_fixtures};
pub use predictor::{Confidence, MatchPrediction};
pub use simulation::{OutcomeProbabilities, ScorelineDistribution};
pub use strength::{LeagueAverages, StrengthParams, TeamStrength};
