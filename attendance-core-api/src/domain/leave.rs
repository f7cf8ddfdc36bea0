use serde::{Deserialize, Serialize};
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(type_name = "leave_type", rename_all = "lowercase"))]
#[serde(rename_all = "lowercase")]
pub enum LeaveType {
    Sick,
    Casual,
    Earned,
    Paid,
    Unpaid,
    Emergency,
    Other,
}

impl LeaveType {
    /// Leave types that are paid unless stated otherwise on the application
    pub fn is_paid_by_default(self) -> bool {
        matches!(
            self,
            LeaveType::Sick | LeaveType::Casual | LeaveType::Earned | LeaveType::Paid
        )
    }
}

impl std::fmt::Display for LeaveType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LeaveType::Sick => write!(f, "sick"),
            LeaveType::Casual => write!(f, "casual"),
            LeaveType::Earned => write!(f, "earned"),
            LeaveType::Paid => write!(f, "paid"),
            LeaveType::Unpaid => write!(f, "unpaid"),
            LeaveType::Emergency => write!(f, "emergency"),
            LeaveType::Other => write!(f, "other"),
        }
    }
}

impl FromStr for LeaveType {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "sick" => Ok(LeaveType::Sick),
            "casual" => Ok(LeaveType::Casual),
            "earned" => Ok(LeaveType::Earned),
            "paid" => Ok(LeaveType::Paid),
            "unpaid" => Ok(LeaveType::Unpaid),
            "emergency" => Ok(LeaveType::Emergency),
            "other" => Ok(LeaveType::Other),
            _ => Err(()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(type_name = "leave_status", rename_all = "lowercase"))]
#[serde(rename_all = "lowercase")]
pub enum LeaveStatus {
    Pending,
    Approved,
    Rejected,
    Cancelled,
}

impl LeaveStatus {
    pub fn is_terminal(self) -> bool {
        matches!(self, LeaveStatus::Rejected | LeaveStatus::Cancelled)
    }
}

impl std::fmt::Display for LeaveStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LeaveStatus::Pending => write!(f, "pending"),
            LeaveStatus::Approved => write!(f, "approved"),
            LeaveStatus::Rejected => write!(f, "rejected"),
            LeaveStatus::Cancelled => write!(f, "cancelled"),
        }
    }
}
