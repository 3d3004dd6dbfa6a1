//! Best distance leaderboard
//!
//! Keeps the ten longest runs of the session. Storage is up to the host; the board only
//! derives serde so it can be handed over as JSON.

use serde::{Deserialize, Serialize};

/// Maximum number of runs to keep
pub const MAX_RECORDS: usize = 10;

/// One finished run
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RunRecord {
    /// Total distance flown across all stages
    pub distance: f32,
    /// Stage reached (1-based)
    pub stage: u32,
}

/// Runs sorted longest first
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BestDistances {
    pub records: Vec<RunRecord>,
}

impl BestDistances {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a run of `distance` would make the board
    pub fn qualifies(&self, distance: f32) -> bool {
        if distance <= 0.0 {
            return false;
        }
        self.records.len() < MAX_RECORDS
            || self.records.last().is_none_or(|r| distance > r.distance)
    }

    /// Rank (1-based) a run of `distance` would take, if it qualifies
    pub fn potential_rank(&self, distance: f32) -> Option<usize> {
        if !self.qualifies(distance) {
            return None;
        }
        Some(self.insert_position(distance) + 1)
    }

    /// Record a finished run. Returns its rank (1-based) if it made the board.
    pub fn record(&mut self, distance: f32, stage: u32) -> Option<usize> {
        let rank = self.potential_rank(distance)?;
        self.records.insert(rank - 1, RunRecord { distance, stage });
        self.records.truncate(MAX_RECORDS);
        Some(rank)
    }

    /// Longest run so far
    pub fn best(&self) -> Option<f32> {
        self.records.first().map(|r| r.distance)
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Ties go below existing entries
    fn insert_position(&self, distance: f32) -> usize {
        self.records
            .iter()
            .position(|r| distance > r.distance)
            .unwrap_or(self.records.len())
    }
}

/// Distance formatted for display (100 world units per kilometre)
pub fn format_km(distance: f32) -> String {
    format!("{:.1} km", distance / 100.0)
}
