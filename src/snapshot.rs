use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use sha2::{Digest, Sha256};
use tracing::debug;

use crate::history::HistoricalMatch;
use crate::strength::{StrengthParams, estimate_strengths};

/// SHA-256 over the history as a multiset, so row order does not change it.
pub fn fingerprint(history: &[HistoricalMatch]) -> String {
    let mut rows = history
        .iter()
        .map(|m| {
            format!(
                "{}:{}|{}:{}|{}|{}",
                m.home_team.len(),
                m.home_team,
                m.away_team.len(),
                m.away_team,
                m.home_goals,
                m.away_goals
            )
        })
        .collect::<Vec<_>>();
    rows.sort_unstable();

    let mut hasher = Sha256::new();
    for row in &rows {
        hasher.update(row.as_bytes());
        hasher.update(b"\n");
    }
    format!("{:x}", hasher.finalize())
}

/// Memo of strength estimates keyed by history fingerprint, for hosts that
/// forecast repeatedly against the same snapshot. Library-only: the bundled
/// binaries estimate once per run and do not need it.
#[derive(Debug, Default)]
pub struct StrengthCache {
    entries: Mutex<HashMap<String, Arc<Option<StrengthParams>>>>,
}

impl StrengthCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_or_estimate(&self, history: &[HistoricalMatch]) -> Arc<Option<StrengthParams>> {
        let key = fingerprint(history);
        {
            let guard = self.entries.lock().unwrap_or_else(|e| e.into_inner());
            if let Some(hit) = guard.get(&key) {
                return Arc::clone(hit);
            }
        }

        debug!(matches = history.len(), key = %key, "estimating strengths for new snapshot");
        let params = Arc::new(estimate_strengths(history));
        let mut guard = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        Arc::clone(guard.entry(key).or_insert(params))
    }

    pub fn len(&self) -> usize {
        self.entries.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        self.entries.lock().unwrap_or_else(|e| e.into_inner()).clear();
    }
}
