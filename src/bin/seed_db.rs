use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::{Days, NaiveDate, NaiveTime};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use tracing::info;

use match_predictor::logging::init_logging;
use match_predictor::store::{self, NewMatch};

const TEAMS: &[&str] = &[
    "Flamengo",
    "Palmeiras",
    "São Paulo",
    "Vasco",
    "Corinthians",
    "Grêmio",
    "Inter",
    "Cruzeiro",
    "Atlético-MG",
    "Bahia",
];
const VENUES: &[&str] = &["Maracanã", "Morumbi", "Mineirão", "Beira-Rio", "Fonte Nova"];
const PLAYERS_PER_TEAM: usize = 5;

fn main() -> Result<()> {
    let _ = dotenvy::from_filename(".env.local");
    let _ = dotenvy::from_filename(".env");
    init_logging("info");

    let args = std::env::args().skip(1).collect::<Vec<_>>();
    let db_path = parse_arg(&args, "--db")
        .map(PathBuf::from)
        .or_else(store::default_db_path)
        .context("unable to resolve sqlite path")?;
    let seed = parse_arg(&args, "--seed")
        .and_then(|v| v.parse::<u64>().ok())
        .unwrap_or(2023);
    let mut rng = StdRng::seed_from_u64(seed);

    let mut conn = store::open_db(&db_path)?;
    if !store::list_teams(&conn)?.is_empty() {
        println!("{} already has teams, nothing to seed", db_path.display());
        return Ok(());
    }
    let tx = conn.transaction().context("begin seed transaction")?;

    let mut squads = Vec::with_capacity(TEAMS.len());
    for team in TEAMS {
        store::add_team(&tx, team)?;
        let mut ids = Vec::with_capacity(PLAYERS_PER_TEAM);
        for n in 0..PLAYERS_PER_TEAM {
            let name = format!("{team} #{}", n + 1);
            ids.push(store::add_player(&tx, &name, Some(rng.gen_range(1..=99)), team)?);
        }
        squads.push(ids);
    }

    let start = NaiveDate::from_ymd_opt(2023, 3, 20).context("invalid season start date")?;
    let mut day = 0u64;
    let mut matches = 0usize;
    for (h, home) in TEAMS.iter().enumerate() {
        for (a, away) in TEAMS.iter().enumerate() {
            if h == a {
                continue;
            }
            let played_on = start
                .checked_add_days(Days::new(day))
                .context("season date overflow")?;
            day += 1;
            let kickoff = NaiveTime::from_hms_opt(rng.gen_range(16..=22), 0, 0);
            let venue = VENUES.choose(&mut rng).copied();
            let match_id = store::add_match(
                &tx,
                &NewMatch {
                    played_on,
                    kickoff,
                    venue,
                    home_team: *home,
                    away_team: *away,
                },
            )?;

            // Stronger clubs sit earlier in the list.
            let home_max = 3 + u32::from(h < 4);
            let away_max = 2 + u32::from(a < 4);
            let home_goals = rng.gen_range(0..=home_max);
            let away_goals = rng.gen_range(0..=away_max);
            record_goals(&tx, &mut rng, match_id, &squads[h], home_goals)?;
            record_goals(&tx, &mut rng, match_id, &squads[a], away_goals)?;
            matches += 1;
        }
    }

    tx.commit().context("commit seed transaction")?;
    info!(db = %db_path.display(), teams = TEAMS.len(), matches, seed, "seeded demo league");
    println!("Seeded {} teams and {matches} matches into {}", TEAMS.len(), db_path.display());
    Ok(())
}

fn record_goals(
    conn: &rusqlite::Connection,
    rng: &mut StdRng,
    match_id: i64,
    squad: &[i64],
    goals: u32,
) -> Result<()> {
    for _ in 0..goals {
        let Some(player) = squad.choose(rng) else {
            break;
        };
        let cards = u32::from(rng.gen_bool(0.1));
        store::add_stat(conn, match_id, *player, 1, cards)?;
    }
    Ok(())
}

fn parse_arg(args: &[String], name: &str) -> Option<String> {
    let prefix = format!("{name}=");
    for (idx, arg) in args.iter().enumerate() {
        if let Some(raw) = arg.strip_prefix(&prefix) {
            return Some(raw.trim().to_string());
        }
        if arg == name
            && let Some(next) = args.get(idx + 1)
        {
            return Some(next.trim().to_string());
        }
    }
    None
}
