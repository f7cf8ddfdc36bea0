use attendance_core_api::{Direction, EntrySource, IssueKind, IssueSeverity};
use chrono::NaiveDateTime;
use heapless::String as HeaplessString;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A single check-in or check-out event within an attendance day
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceEntry {
    pub direction: Direction,
    /// Site-local wall-clock time
    pub timestamp: NaiveDateTime,
    pub source: EntrySource,
    /// Device or gate marker that produced the entry
    pub device_id: Option<HeaplessString<50>>,
    /// Staff member who marked the entry by hand
    pub marked_by: Option<Uuid>,
    pub notes: Option<HeaplessString<200>>,
}

impl AttendanceEntry {
    pub fn new(direction: Direction, timestamp: NaiveDateTime, source: EntrySource) -> Self {
        Self {
            direction,
            timestamp,
            source,
            device_id: None,
            marked_by: None,
            notes: None,
        }
    }

    /// Attach a note, truncated to the column width
    pub fn with_note(mut self, note: &str) -> Self {
        let mut value: HeaplessString<200> = HeaplessString::new();
        for ch in note.chars() {
            if value.push(ch).is_err() {
                break;
            }
        }
        self.notes = Some(value);
        self
    }
}

/// Issue raised while validating or closing a day, kept for audit
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationIssue {
    pub kind: IssueKind,
    pub severity: IssueSeverity,
    pub message: String,
    pub timestamp: NaiveDateTime,
}

impl ValidationIssue {
    pub fn warning(kind: IssueKind, message: impl Into<String>, timestamp: NaiveDateTime) -> Self {
        Self {
            kind,
            severity: IssueSeverity::Warning,
            message: message.into(),
            timestamp,
        }
    }

    pub fn info(kind: IssueKind, message: impl Into<String>, timestamp: NaiveDateTime) -> Self {
        Self {
            kind,
            severity: IssueSeverity::Info,
            message: message.into(),
            timestamp,
        }
    }
}
