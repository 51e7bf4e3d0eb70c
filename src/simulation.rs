use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::{PredictError, Result};

/// Upper bound on the per-side goal cap; the matrix grows quadratically.
pub const MAX_GOALS_LIMIT: u32 = 100;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OutcomeProbabilities {
    pub home_win: f64,
    pub draw: f64,
    pub away_win: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Score {
    pub home: u32,
    pub away: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScorelineProb {
    pub score: Score,
    pub probability: f64,
}

/// Joint scoreline probabilities; `matrix[i][j]` is P(home = i, away = j).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScorelineDistribution {
    pub max_goals: u32,
    pub home_marginal: Vec<f64>,
    pub away_marginal: Vec<f64>,
    pub matrix: Vec<Vec<f64>>,
}

/// Truncated Poisson mass for 0..=max_goals, renormalized to sum to 1.
pub fn poisson_marginal(lambda: f64, max_goals: u32) -> Result<Vec<f64>> {
    check_lambda(lambda)?;
    check_max_goals(max_goals)?;

    // Log space keeps large rates from underflowing e^-lambda to zero.
    let ln_lambda = lambda.ln();
    let mut ln_fact = 0.0_f64;
    let mut log_mass = Vec::with_capacity(max_goals as usize + 1);
    for k in 0..=max_goals {
        if k > 0 {
            ln_fact += f64::from(k).ln();
        }
        log_mass.push(-lambda + f64::from(k) * ln_lambda - ln_fact);
    }

    let peak = log_mass.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let mut out: Vec<f64> = log_mass.iter().map(|l| (l - peak).exp()).collect();
    let sum: f64 = out.iter().sum();
    for p in &mut out {
        *p /= sum;
    }
    Ok(out)
}

pub fn simulate_match(
    lambda_home: f64,
    lambda_away: f64,
    max_goals: u32,
) -> Result<ScorelineDistribution> {
    let home_marginal = poisson_marginal(lambda_home, max_goals)?;
    let away_marginal = poisson_marginal(lambda_away, max_goals)?;

    let mut matrix: Vec<Vec<f64>> = home_marginal
        .iter()
        .map(|ph| away_marginal.iter().map(|pa| ph * pa).collect())
        .collect();

    let total: f64 = matrix.iter().flatten().sum();
    if total > 0.0 && (total - 1.0).abs() > f64::EPSILON {
        for row in &mut matrix {
            for p in row.iter_mut() {
                *p /= total;
            }
        }
    }

    Ok(ScorelineDistribution {
        max_goals,
        home_marginal,
        away_marginal,
        matrix,
    })
}

impl ScorelineDistribution {
    pub fn probability(&self, home: u32, away: u32) -> Option<f64> {
        self.matrix
            .get(home as usize)
            .and_then(|row| row.get(away as usize))
            .copied()
    }

    pub fn total(&self) -> f64 {
        self.matrix.iter().flatten().sum()
    }

    /// Below the diagonal is a home win, the diagonal a draw, above it an away win.
    pub fn outcome_probabilities(&self) -> OutcomeProbabilities {
        let mut home_win = 0.0;
        let mut draw = 0.0;
        let mut away_win = 0.0;
        for (i, row) in self.matrix.iter().enumerate() {
            for (j, p) in row.iter().enumerate() {
                if i > j {
                    home_win += p;
                } else if i < j {
                    away_win += p;
                } else {
                    draw += p;
                }
            }
        }

        let sum = home_win + draw + away_win;
        if sum > 0.0 {
            OutcomeProbabilities {
                home_win: home_win / sum,
                draw: draw / sum,
                away_win: away_win / sum,
            }
        } else {
            OutcomeProbabilities {
                home_win: 1.0 / 3.0,
                draw: 1.0 / 3.0,
                away_win: 1.0 / 3.0,
            }
        }
    }

    /// Cells ordered by probability, ties broken by lower scores first.
    pub fn top_scorelines(&self, n: usize) -> Vec<ScorelineProb> {
        let mut cells = self
            .matrix
            .iter()
            .enumerate()
            .flat_map(|(i, row)| {
                row.iter().enumerate().map(move |(j, p)| ScorelineProb {
                    score: Score {
                        home: i as u32,
                        away: j as u32,
                    },
                    probability: *p,
                })
            })
            .collect::<Vec<_>>();
        cells.sort_by(|a, b| {
            b.probability
                .total_cmp(&a.probability)
                .then(a.score.home.cmp(&b.score.home))
                .then(a.score.away.cmp(&b.score.away))
        });
        cells.truncate(n);
        cells
    }

    pub fn most_likely_scoreline(&self) -> ScorelineProb {
        self.top_scorelines(1)
            .into_iter()
            .next()
            .unwrap_or(ScorelineProb {
                score: Score { home: 0, away: 0 },
                probability: 1.0,
            })
    }

    /// Means of the truncated marginals.
    pub fn expected_goals(&self) -> (f64, f64) {
        let mean = |v: &[f64]| {
            v.iter()
                .enumerate()
                .map(|(k, p)| k as f64 * p)
                .sum::<f64>()
        };
        (mean(&self.home_marginal), mean(&self.away_marginal))
    }

    /// Draw one concrete scoreline from the joint distribution. A matrix with
    /// no positive mass yields 0-0.
    pub fn sample_scoreline<R: Rng>(&self, rng: &mut R) -> Score {
        let total = self.total();
        if !total.is_finite() || total <= 0.0 {
            return Score { home: 0, away: 0 };
        }
        let target = rng.gen_range(0.0..total);
        let mut acc = 0.0;
        let mut last = Score { home: 0, away: 0 };
        for (i, row) in self.matrix.iter().enumerate() {
            for (j, p) in row.iter().enumerate() {
                if *p <= 0.0 {
                    continue;
                }
                last = Score {
                    home: i as u32,
                    away: j as u32,
                };
                acc += p;
                if target < acc {
                    return last;
                }
            }
        }
        last
    }
}

fn check_lambda(lambda: f64) -> Result<()> {
    if !lambda.is_finite() || lambda <= 0.0 {
        return Err(PredictError::InvalidLambda(lambda));
    }
    Ok(())
}

fn check_max_goals(max_goals: u32) -> Result<()> {
    if max_goals > MAX_GOALS_LIMIT {
        return Err(PredictError::MaxGoalsTooLarge {
            requested: max_goals,
            limit: MAX_GOALS_LIMIT,
        });
    }
    Ok(())
}
