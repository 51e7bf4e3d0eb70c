use std::path::PathBuf;

use anyhow::{Context, Result, anyhow};
use tracing::{info, warn};

use match_predictor::config::SimConfig;
use match_predictor::history::MatchHistorySource;
use match_predictor::logging::init_logging;
use match_predictor::pipeline::{self, Forecast};
use match_predictor::simulation::MAX_GOALS_LIMIT;
use match_predictor::store;

fn main() -> Result<()> {
    let _ = dotenvy::from_filename(".env.local");
    let _ = dotenvy::from_filename(".env");

    let args = std::env::args().skip(1).collect::<Vec<_>>();
    if has_flag(&args, "--help") || has_flag(&args, "-h") {
        print_usage();
        return Ok(());
    }

    let mut cfg = SimConfig::from_env();
    init_logging(&cfg.log_level);

    if let Some(raw) = arg_value(&args, "--max-goals") {
        let max_goals = raw
            .trim()
            .parse::<u32>()
            .with_context(|| format!("invalid --max-goals {raw}"))?;
        if max_goals > MAX_GOALS_LIMIT {
            return Err(anyhow!("--max-goals must be at most {MAX_GOALS_LIMIT}"));
        }
        cfg = cfg.with_max_goals(max_goals);
    }

    let db_path = arg_value(&args, "--db")
        .map(PathBuf::from)
        .or_else(store::default_db_path)
        .context("unable to resolve sqlite path")?;
    let conn = store::open_db(&db_path)?;
    let history = conn.historical_matches().context("load match history")?;
    info!(db = %db_path.display(), matches = history.len(), "history loaded");
    if history.is_empty() {
        warn!("no recorded matches; predictions will be neutral");
    }

    let json = has_flag(&args, "--json");

    if has_flag(&args, "--all") {
        let fixtures = pipeline::round_robin(&history);
        let mut forecasts = Vec::with_capacity(fixtures.len());
        for result in pipeline::forecast_fixtures(&history, &fixtures, &cfg) {
            forecasts.push(result?);
        }
        if json {
            println!("{}", serde_json::to_string_pretty(&forecasts)?);
        } else {
            print_table(&forecasts);
        }
        return Ok(());
    }

    let home = arg_value(&args, "--home").context("missing --home <team>")?;
    let away = arg_value(&args, "--away").context("missing --away <team>")?;
    let forecast = pipeline::forecast(&history, &home, &away, &cfg)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&forecast)?);
    } else {
        print_report(&forecast);
    }

    if let Some(raw) = arg_value(&args, "--sample") {
        let n = raw
            .trim()
            .parse::<usize>()
            .with_context(|| format!("invalid --sample {raw}"))?;
        let mut rng = rand::thread_rng();
        println!();
        println!("Simulated results:");
        for _ in 0..n {
            let s = forecast.distribution.sample_scoreline(&mut rng);
            println!("  {} {} x {} {}", forecast.fixture.home, s.home, s.away, forecast.fixture.away);
        }
    }

    Ok(())
}

fn print_report(f: &Forecast) {
    println!("{} vs {}", f.fixture.home, f.fixture.away);
    if let Some(avg) = f.averages {
        println!(
            "League: {} matches, avg goals home {:.2} / away {:.2}",
            avg.matches, avg.avg_home_goals, avg.avg_away_goals
        );
    }
    println!(
        "Expected goals: {:.2} - {:.2}",
        f.prediction.lambda_home, f.prediction.lambda_away
    );
    if f.is_neutral() {
        println!("Note: not enough history for this fixture, showing a neutral prediction");
    }
    if f.prediction.floored {
        println!("Note: a goal rate was raised to the configured floor");
    }
    println!("Home: {:.1}%", f.outcomes.home_win * 100.0);
    println!("Draw: {:.1}%", f.outcomes.draw * 100.0);
    println!("Away: {:.1}%", f.outcomes.away_win * 100.0);
    if !f.top_scorelines.is_empty() {
        println!("Most likely scores:");
        for s in &f.top_scorelines {
            println!(
                "  {}-{}  {:.1}%",
                s.score.home,
                s.score.away,
                s.probability * 100.0
            );
        }
    }
}

fn print_table(forecasts: &[Forecast]) {
    println!(
        "{:<20} {:<20} {:>6} {:>6} {:>7} {:>7} {:>7}",
        "home", "away", "xg_h", "xg_a", "home%", "draw%", "away%"
    );
    for f in forecasts {
        println!(
            "{:<20} {:<20} {:>6.2} {:>6.2} {:>7.1} {:>7.1} {:>7.1}",
            f.fixture.home,
            f.fixture.away,
            f.prediction.lambda_home,
            f.prediction.lambda_away,
            f.outcomes.home_win * 100.0,
            f.outcomes.draw * 100.0,
            f.outcomes.away_win * 100.0
        );
    }
}

fn print_usage() {
    println!("usage: match_predictor [--db PATH] --home TEAM --away TEAM [--max-goals N] [--sample N] [--json]");
    println!("       match_predictor [--db PATH] --all [--json]");
}

fn has_flag(args: &[String], flag: &str) -> bool {
    args.iter().any(|a| a == flag)
}

fn arg_value(args: &[String], name: &str) -> Option<String> {
    let prefix = format!("{name}=");
    for (idx, arg) in args.iter().enumerate() {
        if let Some(raw) = arg.strip_prefix(&prefix) {
            let trimmed = raw.trim();
            if !trimmed.is_empty() {
                return Some(trimmed.to_string());
            }
        }
        if arg == name
            && let Some(next) = args.get(idx + 1)
            && !next.trim().is_empty()
        {
            return Some(next.clone());
        }
    }
    None
}
