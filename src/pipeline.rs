use rayon::prelude::*;
use serde::Serialize;
use tracing::debug;

use crate::config::SimConfig;
use crate::error::Result;
use crate::history::HistoricalMatch;
use crate::predictor::{Confidence, MatchPrediction, predict_expected_goals, validate_fixture};
use crate::simulation::{OutcomeProbabilities, ScorelineDistribution, ScorelineProb, simulate_match};
use crate::strength::{LeagueAverages, StrengthParams, estimate_strengths};

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Fixture {
    pub home: String,
    pub away: String,
}

impl Fixture {
    pub fn new(home: impl Into<String>, away: impl Into<String>) -> Self {
        Self {
            home: home.into(),
            away: away.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Forecast {
    pub fixture: Fixture,
    pub averages: Option<LeagueAverages>,
    pub prediction: MatchPrediction,
    pub outcomes: OutcomeProbabilities,
    pub top_scorelines: Vec<ScorelineProb>,
    pub distribution: ScorelineDistribution,
}

impl Forecast {
    pub fn confidence(&self) -> Confidence {
        self.prediction.confidence
    }

    pub fn is_neutral(&self) -> bool {
        self.prediction.confidence == Confidence::NeutralFallback
    }
}

/// Estimate strengths from the full history and forecast one fixture.
pub fn forecast(
    history: &[HistoricalMatch],
    home: &str,
    away: &str,
    cfg: &SimConfig,
) -> Result<Forecast> {
    validate_fixture(home, away)?;
    let params = estimate_strengths(history);
    forecast_with_params(params.as_ref(), home, away, cfg)
}

pub fn forecast_with_params(
    params: Option<&StrengthParams>,
    home: &str,
    away: &str,
    cfg: &SimConfig,
) -> Result<Forecast> {
    let prediction = predict_expected_goals(home, away, params, cfg)?;
    let distribution = simulate_match(prediction.lambda_home, prediction.lambda_away, cfg.max_goals)?;
    let outcomes = distribution.outcome_probabilities();
    debug!(
        home,
        away,
        lambda_home = prediction.lambda_home,
        lambda_away = prediction.lambda_away,
        p_home = outcomes.home_win,
        p_draw = outcomes.draw,
        p_away = outcomes.away_win,
        "fixture forecast"
    );

    Ok(Forecast {
        fixture: Fixture::new(home, away),
        averages: params.map(|p| p.averages),
        prediction,
        outcomes,
        top_scorelines: distribution.top_scorelines(cfg.top_scorelines),
        distribution,
    })
}

/// Forecast many fixtures against one history snapshot. Strengths are
/// estimated once; fixtures run in parallel and keep their input order.
pub fn forecast_fixtures(
    history: &[HistoricalMatch],
    fixtures: &[Fixture],
    cfg: &SimConfig,
) -> Vec<Result<Forecast>> {
    let params = estimate_strengths(history);
    fixtures
        .par_iter()
        .map(|f| forecast_with_params(params.as_ref(), &f.home, &f.away, cfg))
        .collect()
}

/// Every ordered pairing of the teams seen in the history.
pub fn round_robin(history: &[HistoricalMatch]) -> Vec<Fixture> {
    let mut teams = history
        .iter()
        .flat_map(|m| [m.home_team.as_str(), m.away_team.as_str()])
        .collect::<Vec<_>>();
    teams.sort_unstable();
    teams.dedup();

    let mut out = Vec::with_capacity(teams.len() * teams.len().saturating_sub(1));
    for home in &teams {
        for away in &teams {
            if home != away {
                out.push(Fixture::new(*home, *away));
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PredictError;

    fn history() -> Vec<HistoricalMatch> {
        vec![
            HistoricalMatch::new("A", "B", 2, 1),
            HistoricalMatch::new("B", "A", 0, 3),
            HistoricalMatch::new("A", "B", 1, 1),
            HistoricalMatch::new("C", "A", 1, 1),
        ]
    }

    #[test]
    fn forecast_carries_all_stages() {
        let f = forecast(&history(), "A", "B", &SimConfig::default()).unwrap();
        assert_eq!(f.fixture, Fixture::new("A", "B"));
        assert_eq!(f.averages.map(|a| a.matches), Some(4));
        assert_eq!(f.confidence(), Confidence::Estimated);
        assert_eq!(f.top_scorelines.len(), SimConfig::default().top_scorelines);
        assert_eq!(f.distribution.max_goals, 10);
    }

    #[test]
    fn empty_history_is_neutral_not_error() {
        let f = forecast(&[], "X", "Y", &SimConfig::default()).unwrap();
        assert!(f.is_neutral());
        assert!(f.averages.is_none());
        assert_eq!(f.prediction.lambda_home, 1.0);
        assert_eq!(f.prediction.lambda_away, 1.0);
        assert!((f.outcomes.home_win - f.outcomes.away_win).abs() < 1e-12);
    }

    #[test]
    fn invalid_fixture_fails_fast() {
        assert_eq!(
            forecast(&history(), "A", "A", &SimConfig::default()).unwrap_err(),
            PredictError::SameTeam("A".to_string())
        );
    }

    #[test]
    fn batch_matches_single_calls_in_order() {
        let h = history();
        let cfg = SimConfig::default();
        let fixtures = round_robin(&h);
        assert_eq!(fixtures.len(), 6);
        let batch = forecast_fixtures(&h, &fixtures, &cfg);
        for (fixture, got) in fixtures.iter().zip(batch) {
            let want = forecast(&h, &fixture.home, &fixture.away, &cfg).unwrap();
            assert_eq!(got.unwrap(), want);
        }
    }
}
