use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::history::HistoricalMatch;

/// Multiplier used whenever a team has no evidence in a given context.
pub const NEUTRAL_STRENGTH: f64 = 1.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LeagueAverages {
    pub matches: usize,
    pub avg_home_goals: f64,
    pub avg_away_goals: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TeamStrength {
    pub home_attack: f64,
    pub away_attack: f64,
    pub home_defense: f64,
    pub away_defense: f64,
    pub home_matches: usize,
    pub away_matches: usize,
}

impl TeamStrength {
    pub fn neutral() -> Self {
        Self {
            home_attack: NEUTRAL_STRENGTH,
            away_attack: NEUTRAL_STRENGTH,
            home_defense: NEUTRAL_STRENGTH,
            away_defense: NEUTRAL_STRENGTH,
            home_matches: 0,
            away_matches: 0,
        }
    }
}

impl Default for TeamStrength {
    fn default() -> Self {
        Self::neutral()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrengthParams {
    pub averages: LeagueAverages,
    pub teams: HashMap<String, TeamStrength>,
}

impl StrengthParams {
    pub fn team(&self, id: &str) -> Option<&TeamStrength> {
        self.teams.get(id)
    }
}

#[derive(Debug, Default, Clone, Copy)]
struct SideTotals {
    matches: u64,
    scored: u64,
    conceded: u64,
}

impl SideTotals {
    fn add(&mut self, scored: u32, conceded: u32) {
        self.matches += 1;
        self.scored += u64::from(scored);
        self.conceded += u64::from(conceded);
    }
}

#[derive(Debug, Default, Clone, Copy)]
struct TeamTotals {
    home: SideTotals,
    away: SideTotals,
}

/// Estimate per-team attack and defense multipliers relative to the league's
/// home/away scoring averages. Returns `None` when there is no history at all.
pub fn estimate_strengths(matches: &[HistoricalMatch]) -> Option<StrengthParams> {
    if matches.is_empty() {
        return None;
    }

    let mut total_home = 0u64;
    let mut total_away = 0u64;
    let mut totals: HashMap<&str, TeamTotals> = HashMap::new();

    for m in matches {
        total_home += u64::from(m.home_goals);
        total_away += u64::from(m.away_goals);
        totals
            .entry(m.home_team.as_str())
            .or_default()
            .home
            .add(m.home_goals, m.away_goals);
        totals
            .entry(m.away_team.as_str())
            .or_default()
            .away
            .add(m.away_goals, m.home_goals);
    }

    let n = matches.len() as f64;
    let averages = LeagueAverages {
        matches: matches.len(),
        avg_home_goals: total_home as f64 / n,
        avg_away_goals: total_away as f64 / n,
    };

    let teams = totals
        .into_iter()
        .map(|(team, t)| {
            let strength = TeamStrength {
                home_attack: ratio(t.home.scored, t.home.matches, averages.avg_home_goals),
                home_defense: ratio(t.home.conceded, t.home.matches, averages.avg_away_goals),
                away_attack: ratio(t.away.scored, t.away.matches, averages.avg_away_goals),
                away_defense: ratio(t.away.conceded, t.away.matches, averages.avg_home_goals),
                home_matches: t.home.matches as usize,
                away_matches: t.away.matches as usize,
            };
            (team.to_string(), strength)
        })
        .collect();

    Some(StrengthParams { averages, teams })
}

// Mean goals per match over the league average, neutral when either side is empty.
fn ratio(goals: u64, matches: u64, league_avg: f64) -> f64 {
    if matches == 0 || league_avg <= 0.0 {
        return NEUTRAL_STRENGTH;
    }
    (goals as f64 / matches as f64) / league_avg
}
