use chrono::{NaiveDate, NaiveTime};

use match_predictor::config::SimConfig;
use match_predictor::history::MatchHistorySource;
use match_predictor::pipeline::forecast;
use match_predictor::store::{self, NewMatch};
use match_predictor::{Confidence, HistoricalMatch};

fn new_match<'a>(home: &'a str, away: &'a str, day: u32) -> NewMatch<'a> {
    NewMatch {
        played_on: NaiveDate::from_ymd_opt(2023, 3, day).expect("valid date"),
        kickoff: NaiveTime::from_hms_opt(19, 0, 0),
        venue: None,
        home_team: home,
        away_team: away,
    }
}

#[test]
fn history_sums_player_goals_per_side() {
    let conn = store::open_in_memory().unwrap();
    for team in ["A", "B", "C"] {
        store::add_team(&conn, team).unwrap();
    }
    let a1 = store::add_player(&conn, "A1", Some(9), "A").unwrap();
    let a2 = store::add_player(&conn, "A2", Some(10), "A").unwrap();
    let b1 = store::add_player(&conn, "B1", Some(7), "B").unwrap();
    let c1 = store::add_player(&conn, "C1", Some(11), "C").unwrap();

    // Later date inserted first; the feed is ordered by date.
    let late = store::add_match(&conn, &new_match("B", "A", 22)).unwrap();
    let early = store::add_match(&conn, &new_match("A", "B", 20)).unwrap();
    let goalless = store::add_match(&conn, &new_match("A", "B", 24)).unwrap();

    store::add_stat(&conn, early, a1, 1, 0).unwrap();
    store::add_stat(&conn, early, a2, 1, 1).unwrap();
    store::add_stat(&conn, early, b1, 1, 0).unwrap();
    // A player from a team not in the fixture does not count.
    store::add_stat(&conn, early, c1, 4, 0).unwrap();
    store::add_stat(&conn, late, a1, 3, 0).unwrap();
    store::add_stat(&conn, goalless, b1, 0, 2).unwrap();

    let history = conn.historical_matches().unwrap();
    assert_eq!(
        history,
        vec![
            HistoricalMatch::new("A", "B", 2, 1),
            HistoricalMatch::new("B", "A", 0, 3),
            HistoricalMatch::new("A", "B", 0, 0),
        ]
    );
}

#[test]
fn empty_store_yields_neutral_forecast() {
    let conn = store::open_in_memory().unwrap();
    let history = store::load_historical_matches(&conn).unwrap();
    assert!(history.is_empty());

    let f = forecast(&history, "A", "B", &SimConfig::default()).unwrap();
    assert_eq!(f.prediction.confidence, Confidence::NeutralFallback);
    assert_eq!((f.prediction.lambda_home, f.prediction.lambda_away), (1.0, 1.0));
}

#[test]
fn negative_goals_written_directly_are_rejected_on_load() {
    let conn = store::open_in_memory().unwrap();
    store::add_team(&conn, "A").unwrap();
    store::add_team(&conn, "B").unwrap();
    let a1 = store::add_player(&conn, "A1", None, "A").unwrap();
    let m = store::add_match(&conn, &new_match("A", "B", 20)).unwrap();
    conn.execute(
        "INSERT INTO stats(goals, cards, match_id, player_id) VALUES (-2, 0, ?1, ?2)",
        rusqlite::params![m, a1],
    )
    .unwrap();

    let err = store::load_historical_matches(&conn).unwrap_err();
    assert!(err.to_string().contains("negative goal count"));
}

#[test]
fn file_backed_db_round_trips() {
    let dir = std::env::temp_dir().join(format!("match_predictor_test_{}", std::process::id()));
    let path = dir.join("league.sqlite");
    {
        let conn = store::open_db(&path).unwrap();
        store::add_team(&conn, "A").unwrap();
        store::add_team(&conn, "B").unwrap();
        store::add_match(&conn, &new_match("A", "B", 20)).unwrap();
    }
    let conn = store::open_db(&path).unwrap();
    assert_eq!(store::list_teams(&conn).unwrap(), vec!["A", "B"]);
    assert_eq!(conn.historical_matches().unwrap().len(), 1);
    drop(conn);
    let _ = std::fs::remove_dir_all(dir);
}
