use match_predictor::config::SimConfig;
use match_predictor::pipeline::forecast;
use match_predictor::predictor::{Confidence, predict_expected_goals};
use match_predictor::simulation::simulate_match;
use match_predictor::strength::estimate_strengths;
use match_predictor::HistoricalMatch;

const TOL: f64 = 1e-9;
const RATES: &[f64] = &[0.1, 0.35, 0.8, 1.0, 1.45, 2.2, 3.1, 4.75, 6.0];

fn scenario() -> Vec<HistoricalMatch> {
    vec![
        HistoricalMatch::new("A", "B", 2, 1),
        HistoricalMatch::new("B", "A", 0, 3),
        HistoricalMatch::new("A", "B", 1, 1),
    ]
}

#[test]
fn distributions_are_normalized_for_any_rates() {
    for &lh in RATES {
        for &la in RATES {
            for max_goals in [0, 2, 10] {
                let d = simulate_match(lh, la, max_goals).unwrap();
                assert!((d.home_marginal.iter().sum::<f64>() - 1.0).abs() < TOL);
                assert!((d.away_marginal.iter().sum::<f64>() - 1.0).abs() < TOL);
                assert!((d.total() - 1.0).abs() < TOL);

                let o = d.outcome_probabilities();
                assert!((o.home_win + o.draw + o.away_win - 1.0).abs() < TOL);
                for p in [o.home_win, o.draw, o.away_win] {
                    assert!((0.0..=1.0).contains(&p));
                }
            }
        }
    }
}

#[test]
fn swapping_rates_swaps_outcomes() {
    for &a in RATES {
        for &b in RATES {
            let ab = simulate_match(a, b, 10).unwrap().outcome_probabilities();
            let ba = simulate_match(b, a, 10).unwrap().outcome_probabilities();
            assert!((ab.home_win - ba.away_win).abs() < TOL);
            assert!((ab.away_win - ba.home_win).abs() < TOL);
            assert!((ab.draw - ba.draw).abs() < TOL);
        }
    }
}

#[test]
fn home_win_grows_with_home_rate() {
    for &la in RATES {
        let mut prev = 0.0;
        for &lh in RATES {
            let p = simulate_match(lh, la, 10).unwrap().outcome_probabilities().home_win;
            assert!(p + 1e-12 >= prev, "home_win fell from {prev} to {p} at lh={lh} la={la}");
            prev = p;
        }
    }
}

#[test]
fn empty_history_gives_exact_neutral_rates() {
    let f = forecast(&[], "team_x", "team_y", &SimConfig::default()).unwrap();
    assert_eq!(f.prediction.lambda_home, 1.0);
    assert_eq!(f.prediction.lambda_away, 1.0);
    assert_eq!(f.prediction.confidence, Confidence::NeutralFallback);
}

#[test]
fn worked_example_reproduces_intermediate_values() {
    let params = estimate_strengths(&scenario()).unwrap();
    assert!((params.averages.avg_home_goals - 1.0).abs() < TOL);
    assert!((params.averages.avg_away_goals - 5.0 / 3.0).abs() < TOL);

    let a = params.team("A").unwrap();
    assert!((a.home_attack - 1.5).abs() < TOL);
    assert!((a.home_defense - 0.6).abs() < TOL);

    let p = predict_expected_goals("A", "B", Some(&params), &SimConfig::default()).unwrap();
    assert!((p.lambda_home - 1.5 * 1.5 * 1.0).abs() < TOL);
    assert!((p.lambda_away - 0.6 * 0.6 * 5.0 / 3.0).abs() < TOL);

    let f = forecast(&scenario(), "A", "B", &SimConfig::default()).unwrap();
    assert_eq!(f.prediction, p);
    assert!(f.outcomes.home_win > 0.6);
}

#[test]
fn zero_goal_cap_is_a_certain_draw() {
    let cfg = SimConfig::default().with_max_goals(0);
    let f = forecast(&scenario(), "A", "B", &cfg).unwrap();
    assert_eq!(f.distribution.matrix, vec![vec![1.0]]);
    assert_eq!(f.outcomes.draw, 1.0);
    assert_eq!(f.outcomes.home_win, 0.0);
    assert_eq!(f.outcomes.away_win, 0.0);
}

#[test]
fn unknown_team_is_neutral_but_known_league() {
    let f = forecast(&scenario(), "A", "Newcomers", &SimConfig::default()).unwrap();
    assert!(f.is_neutral());
    assert_eq!(f.averages.map(|a| a.matches), Some(3));
}

#[test]
fn zero_floor_from_json_still_forecasts() {
    let cfg: SimConfig = serde_json::from_str(r#"{"lambda_floor": 0.0}"#).unwrap();
    let f = forecast(&scenario(), "B", "A", &cfg).unwrap();
    assert!(f.prediction.floored);
    assert!(f.prediction.lambda_home > 0.0);
    assert!((f.outcomes.home_win + f.outcomes.draw + f.outcomes.away_win - 1.0).abs() < TOL);
}
