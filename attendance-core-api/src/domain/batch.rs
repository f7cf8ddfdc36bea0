use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One failed item inside a batch operation. The batch itself carried on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchItemFailure {
    pub item_id: Uuid,
    pub date: Option<NaiveDate>,
    pub error: String,
}

/// Counters of a single auto-close run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AutoCloseCounts {
    pub processed: usize,
    pub marked_present: usize,
    pub marked_absent: usize,
    pub marked_on_leave: usize,
    pub marked_holiday: usize,
    pub already_marked: usize,
    pub errors: usize,
}

impl AutoCloseCounts {
    pub fn add(&mut self, other: &AutoCloseCounts) {
        self.processed += other.processed;
        self.marked_present += other.marked_present;
        self.marked_absent += other.marked_absent;
        self.marked_on_leave += other.marked_on_leave;
        self.marked_holiday += other.marked_holiday;
        self.already_marked += other.already_marked;
        self.errors += other.errors;
    }
}

/// Result of closing out one site for one date. Also persisted on the
/// site policy as the last run summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AutoCloseSummary {
    pub site_id: Uuid,
    pub date: NaiveDate,
    pub ok: bool,
    /// Explanation for no-op runs (disabled, weekend, holiday)
    pub message: Option<String>,
    #[serde(flatten)]
    pub counts: AutoCloseCounts,
    pub failures: Vec<BatchItemFailure>,
    pub completed_at: NaiveDateTime,
}

impl AutoCloseSummary {
    pub fn skipped(site_id: Uuid, date: NaiveDate, message: impl Into<String>, at: NaiveDateTime) -> Self {
        Self {
            site_id,
            date,
            ok: true,
            message: Some(message.into()),
            counts: AutoCloseCounts::default(),
            failures: Vec::new(),
            completed_at: at,
        }
    }

    pub fn is_noop(&self) -> bool {
        self.counts.processed == 0 && self.message.is_some()
    }
}

/// Result of a sequential day-by-day backfill
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DateRangeCloseSummary {
    pub site_id: Uuid,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub totals: AutoCloseCounts,
    pub days: Vec<AutoCloseSummary>,
}

/// Outcome of one site inside a multi-site trigger
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SiteCloseOutcome {
    pub site_id: Uuid,
    pub summary: Option<AutoCloseSummary>,
    pub error: Option<String>,
}
