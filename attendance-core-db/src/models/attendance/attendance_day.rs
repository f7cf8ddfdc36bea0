use attendance_core_api::{AttendanceStatus, Direction, EntrySource};
use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::entry::{AttendanceEntry, ValidationIssue};
use crate::models::identifiable::Identifiable;

/// Database model for one worker's attendance on one calendar date.
///
/// # Documentation
/// - Unique per (worker_id, date).
/// - `entries` alternate direction starting with IN; violating entries are
///   rejected before they reach this record.
/// - `check_in_time`, `check_out_time`, `total_hours` and `status` are
///   derived from `entries` and recomputed on every write.
/// - `version` increases by one on every persisted change and guards
///   concurrent appends.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceDayModel {
    pub id: Uuid,
    pub worker_id: Uuid,
    pub site_id: Uuid,
    pub date: NaiveDate,
    pub entries: Vec<AttendanceEntry>,
    pub check_in_time: Option<NaiveDateTime>,
    pub check_out_time: Option<NaiveDateTime>,
    pub total_hours: Decimal,
    pub status: AttendanceStatus,
    pub is_late: bool,
    pub is_early_leave: bool,
    /// References LeaveApplicationModel.id when status is on-leave
    pub leave_id: Option<Uuid>,
    pub validation_issues: Vec<ValidationIssue>,
    pub reconciled: bool,
    pub reconciled_by: Option<Uuid>,
    pub reconciled_at: Option<NaiveDateTime>,
    pub reconciliation_notes: Option<String>,
    /// Set when the daily job created or closed the record
    pub auto_closed: bool,
    pub notes: Option<String>,
    pub version: i64,
}

impl AttendanceDayModel {
    pub fn new(worker_id: Uuid, site_id: Uuid, date: NaiveDate) -> Self {
        Self {
            id: Uuid::new_v4(),
            worker_id,
            site_id,
            date,
            entries: Vec::new(),
            check_in_time: None,
            check_out_time: None,
            total_hours: Decimal::ZERO,
            status: AttendanceStatus::Absent,
            is_late: false,
            is_early_leave: false,
            leave_id: None,
            validation_issues: Vec::new(),
            reconciled: false,
            reconciled_by: None,
            reconciled_at: None,
            reconciliation_notes: None,
            auto_closed: false,
            notes: None,
            version: 0,
        }
    }

    pub fn has_entries(&self) -> bool {
        !self.entries.is_empty()
    }

    /// Written by leave sync alone; no real check-in or check-out on it
    pub fn is_leave_synced(&self) -> bool {
        self.leave_id.is_some() && self.entries.iter().all(|entry| entry.source == EntrySource::LeaveSync)
    }

    /// Entries in timestamp order
    pub fn sorted_entries(&self) -> Vec<&AttendanceEntry> {
        let mut sorted: Vec<&AttendanceEntry> = self.entries.iter().collect();
        sorted.sort_by_key(|entry| entry.timestamp);
        sorted
    }

    pub fn last_entry(&self) -> Option<&AttendanceEntry> {
        self.entries.iter().max_by_key(|entry| entry.timestamp)
    }

    pub fn last_direction(&self) -> Option<Direction> {
        self.last_entry().map(|entry| entry.direction)
    }

    /// Minutes covered by completed IN→OUT pairs. A trailing IN adds nothing.
    pub fn worked_minutes(&self) -> i64 {
        let mut total = 0;
        let mut open_in: Option<NaiveDateTime> = None;
        for entry in self.sorted_entries() {
            match (entry.direction, open_in) {
                (Direction::In, _) => open_in = Some(entry.timestamp),
                (Direction::Out, Some(start)) => {
                    total += (entry.timestamp - start).num_minutes().max(0);
                    open_in = None;
                }
                (Direction::Out, None) => {}
            }
        }
        total
    }

    pub fn first_check_in(&self) -> Option<NaiveDateTime> {
        self.sorted_entries()
            .into_iter()
            .find(|entry| entry.direction == Direction::In)
            .map(|entry| entry.timestamp)
    }

    pub fn last_check_out(&self) -> Option<NaiveDateTime> {
        self.sorted_entries()
            .into_iter()
            .rev()
            .find(|entry| entry.direction == Direction::Out)
            .map(|entry| entry.timestamp)
    }
}

impl Identifiable for AttendanceDayModel {
    fn get_id(&self) -> Uuid {
        self.id
    }
}
