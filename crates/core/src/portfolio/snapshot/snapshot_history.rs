use chrono::NaiveDate;
use log::debug;
use serde::{Deserialize, Serialize};

use super::snapshot_model::PortfolioSnapshot;
use crate::constants::DEFAULT_SNAPSHOT_RETENTION;
use crate::portfolio::valuation::PortfolioValuation;

/// Snapshots newest first, at most one per date, capped at `retention`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotHistory {
    snapshots: Vec<PortfolioSnapshot>,
    retention: usize,
}

impl Default for SnapshotHistory {
    fn default() -> Self {
        Self::new(DEFAULT_SNAPSHOT_RETENTION)
    }
}

impl SnapshotHistory {
    pub fn new(retention: usize) -> Self {
        SnapshotHistory {
            snapshots: Vec::new(),
            retention: retention.max(1),
        }
    }

    /// Restores persisted snapshots, applying the same-date and retention
    /// rules as if each had been recorded in turn.
    pub fn from_snapshots(snapshots: Vec<PortfolioSnapshot>, retention: usize) -> Self {
        let mut history = Self::new(retention);
        for snapshot in snapshots {
            history.insert(snapshot);
        }
        history.prune();
        history
    }

    pub fn retention(&self) -> usize {
        self.retention
    }

    /// Newest first.
    pub fn snapshots(&self) -> &[PortfolioSnapshot] {
        &self.snapshots
    }

    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    pub fn latest(&self) -> Option<&PortfolioSnapshot> {
        self.snapshots.first()
    }

    pub fn on(&self, date: NaiveDate) -> Option<&PortfolioSnapshot> {
        self.snapshots.iter().find(|s| s.date == date)
    }

    /// Stores a snapshot, replacing any existing one for the same date.
    /// Returns true if an earlier snapshot was replaced.
    pub fn record(&mut self, snapshot: PortfolioSnapshot) -> bool {
        let replaced = self.insert(snapshot);
        self.prune();
        replaced
    }

    /// Snapshots a valuation into the history and returns the new record.
    pub fn take_snapshot(
        &mut self,
        valuation: &PortfolioValuation,
        notes: Option<String>,
    ) -> PortfolioSnapshot {
        let snapshot = PortfolioSnapshot::from_valuation(valuation, notes);
        self.record(snapshot.clone());
        snapshot
    }

    /// Snapshots dated on or after `from`, oldest first, for charting and
    /// period metrics.
    pub fn since(&self, from: Option<NaiveDate>) -> Vec<PortfolioSnapshot> {
        let mut selected: Vec<PortfolioSnapshot> = self
            .snapshots
            .iter()
            .filter(|s| from.map_or(true, |from| s.date >= from))
            .cloned()
            .collect();
        selected.reverse();
        selected
    }

    fn insert(&mut self, snapshot: PortfolioSnapshot) -> bool {
        if let Some(existing) = self.snapshots.iter_mut().find(|s| s.date == snapshot.date) {
            debug!("Replacing snapshot for {}", snapshot.date);
            *existing = snapshot;
            return true;
        }
        let position = self
            .snapshots
            .iter()
            .position(|s| s.date < snapshot.date)
            .unwrap_or(self.snapshots.len());
        self.snapshots.insert(position, snapshot);
        false
    }

    fn prune(&mut self) {
        if self.snapshots.len() > self.retention {
            debug!(
                "Pruning {} snapshot(s) beyond retention of {}",
                self.snapshots.len() - self.retention,
                self.retention
            );
            self.snapshots.truncate(self.retention);
        }
    }
}
