use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Direction of a single gate-entry event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(type_name = "direction", rename_all = "UPPERCASE"))]
#[serde(rename_all = "UPPERCASE")]
pub enum Direction {
    In,
    Out,
}

impl Direction {
    pub fn opposite(self) -> Self {
        match self {
            Direction::In => Direction::Out,
            Direction::Out => Direction::In,
        }
    }
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Direction::In => write!(f, "IN"),
            Direction::Out => write!(f, "OUT"),
        }
    }
}

impl FromStr for Direction {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "IN" => Ok(Direction::In),
            "OUT" => Ok(Direction::Out),
            _ => Err(()),
        }
    }
}

/// Final attendance status of one worker on one date
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(type_name = "attendance_status", rename_all = "kebab-case"))]
#[serde(rename_all = "kebab-case")]
pub enum AttendanceStatus {
    Present,
    Absent,
    HalfDay,
    Late,
    EarlyLeave,
    OnLeave,
    Holiday,
}

impl AttendanceStatus {
    /// Late and early-leave days are present days carrying a quality flag.
    pub fn counts_as_present(self) -> bool {
        matches!(
            self,
            AttendanceStatus::Present | AttendanceStatus::Late | AttendanceStatus::EarlyLeave
        )
    }
}

impl std::fmt::Display for AttendanceStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AttendanceStatus::Present => write!(f, "present"),
            AttendanceStatus::Absent => write!(f, "absent"),
            AttendanceStatus::HalfDay => write!(f, "half-day"),
            AttendanceStatus::Late => write!(f, "late"),
            AttendanceStatus::EarlyLeave => write!(f, "early-leave"),
            AttendanceStatus::OnLeave => write!(f, "on-leave"),
            AttendanceStatus::Holiday => write!(f, "holiday"),
        }
    }
}

impl FromStr for AttendanceStatus {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "present" => Ok(AttendanceStatus::Present),
            "absent" => Ok(AttendanceStatus::Absent),
            "half-day" => Ok(AttendanceStatus::HalfDay),
            "late" => Ok(AttendanceStatus::Late),
            "early-leave" => Ok(AttendanceStatus::EarlyLeave),
            "on-leave" => Ok(AttendanceStatus::OnLeave),
            "holiday" => Ok(AttendanceStatus::Holiday),
            _ => Err(()),
        }
    }
}

/// Origin of an attendance entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(type_name = "entry_source", rename_all = "kebab-case"))]
#[serde(rename_all = "kebab-case")]
pub enum EntrySource {
    Manual,
    Device,
    AutoClose,
    LeaveSync,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum IssueKind {
    Anomaly,
    LateArrival,
    EarlyLeave,
    Weekend,
    AfterHours,
    InferredCheckOut,
    Reconciliation,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IssueSeverity {
    Info,
    Warning,
    Error,
}
