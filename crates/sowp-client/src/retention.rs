//! Chat retention sweeper.
//!
//! Messages older than the retention horizon are deleted, at most once per
//! cooldown window.  The cleanup marker is advanced *before* anything is
//! deleted so that a crash mid-sweep does not cause an immediate re-run on
//! the next start; whatever survived is picked up by the next eligible
//! sweep.
//!
//! Deletions are issued in batches.  Every delete of a batch is started
//! together and the batch is joined before the next one begins, so the
//! report is only produced once every deletion has completed.

use futures::future::join_all;
use serde::Serialize;
use sowp_shared::constants::{CLEANUP_BATCH_SIZE, CLEANUP_COOLDOWN_MS, RETENTION_HORIZON_MS};
use sowp_store::{MessageStore, StoreError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RetentionPolicy {
    /// Maximum message age in milliseconds.
    pub horizon_ms: i64,
    /// Minimum time between two automatic sweeps in milliseconds.
    pub cooldown_ms: i64,
    /// Deletions issued concurrently per batch.
    pub batch_size: usize,
}

impl Default for RetentionPolicy {
    fn default() -> Self {
        Self {
            horizon_ms: RETENTION_HORIZON_MS,
            cooldown_ms: CLEANUP_COOLDOWN_MS,
            batch_size: CLEANUP_BATCH_SIZE,
        }
    }
}

impl RetentionPolicy {
    /// Messages with a timestamp strictly below this are stale.
    pub fn cutoff(&self, now: i64) -> i64 {
        now.saturating_sub(self.horizon_ms)
    }

    /// Whether an automatic sweep may run given the last cleanup time.
    pub fn is_due(&self, last_cleanup: Option<i64>, now: i64) -> bool {
        match last_cleanup {
            None => true,
            Some(last) => now.saturating_sub(last) > self.cooldown_ms,
        }
    }
}

/// Counts gathered during one sweep.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SweepReport {
    pub cutoff: i64,
    /// Stale messages found in the read phase.
    pub candidates: usize,
    pub deleted: usize,
    /// Candidates removed by someone else before our delete landed.
    pub already_gone: usize,
    pub failed: usize,
    pub batches: usize,
    /// Keys whose deletion failed; they are retried by the next sweep.
    pub failed_keys: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum SweepOutcome {
    /// The cooldown has not elapsed; nothing was read or changed.
    Skipped { last_cleanup: i64, next_due: i64 },
    Completed(SweepReport),
    PartiallyFailed(SweepReport),
}

impl SweepOutcome {
    pub fn report(&self) -> Option<&SweepReport> {
        match self {
            SweepOutcome::Skipped { .. } => None,
            SweepOutcome::Completed(report) | SweepOutcome::PartiallyFailed(report) => Some(report),
        }
    }

    pub fn is_skipped(&self) -> bool {
        matches!(self, SweepOutcome::Skipped { .. })
    }

    pub fn deleted(&self) -> usize {
        self.report().map(|r| r.deleted).unwrap_or(0)
    }
}

pub struct RetentionSweeper<S> {
    store: S,
    policy: RetentionPolicy,
}

impl<S: MessageStore> RetentionSweeper<S> {
    pub fn new(store: S, policy: RetentionPolicy) -> Self {
        Self { store, policy }
    }

    pub fn policy(&self) -> &RetentionPolicy {
        &self.policy
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Sweep if the cooldown since the last cleanup has elapsed.
    ///
    /// Called on application start.  A skipped run leaves the marker
    /// untouched.
    pub async fn maybe_sweep(&self, now: i64) -> Result<SweepOutcome, StoreError> {
        let marker = self.store.cleanup_marker().await?;

        if let (false, Some(last)) = (self.policy.is_due(marker, now), marker) {
            let next_due = last.saturating_add(self.policy.cooldown_ms);
            tracing::debug!(last_cleanup = last, next_due, "cleanup not due yet");
            return Ok(SweepOutcome::Skipped {
                last_cleanup: last,
                next_due,
            });
        }

        self.advance_marker(now).await?;
        self.sweep(now).await
    }

    /// Sweep regardless of the cooldown.  Still advances the marker.
    pub async fn force_sweep(&self, now: i64) -> Result<SweepOutcome, StoreError> {
        tracing::info!("forced cleanup requested");
        self.advance_marker(now).await?;
        self.sweep(now).await
    }

    /// Delete every message older than the horizon.
    ///
    /// Does not consult or write the cleanup marker.  A failure to read the
    /// message list is returned as an error; failures of individual deletes
    /// are counted in the report.
    pub async fn sweep(&self, now: i64) -> Result<SweepOutcome, StoreError> {
        let cutoff = self.policy.cutoff(now);

        let messages = self.store.list_messages().await.map_err(|e| {
            tracing::warn!(error = %e, "failed to read messages for cleanup");
            e
        })?;

        let stale: Vec<String> = messages
            .into_iter()
            .filter(|m| m.is_older_than(cutoff))
            .map(|m| m.key)
            .collect();

        let mut report = SweepReport {
            cutoff,
            candidates: stale.len(),
            ..SweepReport::default()
        };

        if stale.is_empty() {
            tracing::debug!(cutoff, "no old messages to clean up");
            return Ok(SweepOutcome::Completed(report));
        }

        let batch_size = self.policy.batch_size.max(1);
        let total_batches = stale.len().div_ceil(batch_size);
        tracing::info!(
            candidates = stale.len(),
            batches = total_batches,
            cutoff,
            "deleting old messages"
        );

        for (index, batch) in stale.chunks(batch_size).enumerate() {
            let results = join_all(batch.iter().map(|key| self.store.delete_message(key))).await;

            for (key, result) in batch.iter().zip(results) {
                match result {
                    Ok(true) => report.deleted += 1,
                    Ok(false) => report.already_gone += 1,
                    Err(e) => {
                        tracing::warn!(key = %key, error = %e, "failed to delete old message");
                        report.failed += 1;
                        report.failed_keys.push(key.clone());
                    }
                }
            }

            report.batches += 1;
            tracing::debug!(
                batch = index + 1,
                of = total_batches,
                size = batch.len(),
                "cleanup batch finished"
            );
        }

        tracing::info!(
            deleted = report.deleted,
            already_gone = report.already_gone,
            failed = report.failed,
            "cleanup finished"
        );

        if report.failed == 0 {
            Ok(SweepOutcome::Completed(report))
        } else {
            Ok(SweepOutcome::PartiallyFailed(report))
        }
    }

    /// Number of messages a sweep at `now` would try to delete.
    pub async fn count_stale(&self, now: i64) -> Result<usize, StoreError> {
        self.store
            .count_messages_before(self.policy.cutoff(now))
            .await
    }

    async fn advance_marker(&self, now: i64) -> Result<(), StoreError> {
        let stored = self.store.advance_cleanup_marker(now).await?;
        if stored > now {
            // Another sweeper ran with a later clock; we sweep anyway.
            tracing::debug!(stored, now, "cleanup marker already ahead");
        }
        Ok(())
    }
}
