//! Business-status data-quality gate.
//!
//! Two entry points share one rule, "a permanently closed venue is never
//! served":
//!
//! - [`screen_raw`] runs on freshly fetched provider records before they are
//!   normalized and cached.
//! - [`retain_servable`] runs on results read back from the cache, because a
//!   venue can close for good while its entry is still inside its TTL.

use venue_core::{BusinessStatus, NormalizedResult};

use crate::types::RawPlaceRecord;

/// Per-batch counters for the write path.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatusCounts {
    pub dropped_perm_closed: usize,
    pub flagged_temp_closed: usize,
    pub missing_status: usize,
}

impl StatusCounts {
    pub fn add(&mut self, other: StatusCounts) {
        self.dropped_perm_closed += other.dropped_perm_closed;
        self.flagged_temp_closed += other.flagged_temp_closed;
        self.missing_status += other.missing_status;
    }
}

#[derive(Debug, Clone, Default)]
pub struct Screened {
    pub records: Vec<RawPlaceRecord>,
    pub counts: StatusCounts,
}

/// Drops permanently closed records and counts the rest by status.
///
/// Temporarily closed records are kept; they reach callers flagged as
/// [`BusinessStatus::TempClosed`]. A record with no status is kept as
/// operational.
#[must_use]
pub fn screen_raw(records: Vec<RawPlaceRecord>) -> Screened {
    let mut counts = StatusCounts::default();

    let records: Vec<RawPlaceRecord> = records
        .into_iter()
        .filter(|record| {
            let raw_status = record.business_status();
            if raw_status.is_none() {
                counts.missing_status += 1;
            }
            match BusinessStatus::from_provider(raw_status) {
                BusinessStatus::PermClosed => {
                    counts.dropped_perm_closed += 1;
                    false
                }
                BusinessStatus::TempClosed => {
                    counts.flagged_temp_closed += 1;
                    true
                }
                BusinessStatus::Operational | BusinessStatus::Unknown => true,
            }
        })
        .collect();

    if counts != StatusCounts::default() {
        tracing::debug!(
            kept = records.len(),
            dropped_perm_closed = counts.dropped_perm_closed,
            flagged_temp_closed = counts.flagged_temp_closed,
            missing_status = counts.missing_status,
            "business status screen"
        );
    }

    Screened { records, counts }
}

/// Removes permanently closed venues from results served out of the cache.
///
/// Returns the surviving results and how many were removed.
#[must_use]
pub fn retain_servable(results: Vec<NormalizedResult>) -> (Vec<NormalizedResult>, usize) {
    let before = results.len();
    let kept: Vec<NormalizedResult> = results
        .into_iter()
        .filter(|r| r.business_status.is_servable())
        .collect();
    let dropped = before - kept.len();

    if dropped > 0 {
        tracing::warn!(
            dropped,
            kept = kept.len(),
            "cached results contained permanently closed venues"
        );
    }

    (kept, dropped)
}
