use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::{Validate, ValidationError};

use super::attendance::{Direction, EntrySource};
use super::leave::LeaveType;

/// A candidate check-in/check-out event
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
#[validate(schema(function = "validate_entry_request"))]
pub struct EntryRequest {
    pub worker_id: Uuid,
    pub site_id: Uuid,
    pub date: NaiveDate,
    pub direction: Direction,
    /// Site-local wall-clock time of the event
    pub timestamp: NaiveDateTime,
    pub source: EntrySource,
    #[validate(length(max = 50))]
    pub device_id: Option<String>,
    pub marked_by: Option<Uuid>,
    #[validate(length(max = 200))]
    pub notes: Option<String>,
}

impl EntryRequest {
    pub fn manual(
        worker_id: Uuid,
        site_id: Uuid,
        direction: Direction,
        timestamp: NaiveDateTime,
    ) -> Self {
        Self {
            worker_id,
            site_id,
            date: timestamp.date(),
            direction,
            timestamp,
            source: EntrySource::Manual,
            device_id: None,
            marked_by: None,
            notes: None,
        }
    }
}

fn validate_entry_request(request: &EntryRequest) -> Result<(), ValidationError> {
    if request.timestamp.date() != request.date {
        return Err(ValidationError::new("timestamp_outside_date"));
    }
    Ok(())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Validate)]
pub struct PayrollPeriod {
    #[validate(range(min = 2000, max = 2100))]
    pub year: i32,
    #[validate(range(min = 1, max = 12))]
    pub month: u32,
}

impl std::fmt::Display for PayrollPeriod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

/// Manual adjustments to an unpaid salary record
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
#[validate(schema(function = "validate_salary_edit"))]
pub struct SalaryEditRequest {
    pub other_deductions: Option<Decimal>,
    pub other_bonuses: Option<Decimal>,
    #[validate(length(max = 500))]
    pub notes: Option<String>,
}

fn validate_salary_edit(edit: &SalaryEditRequest) -> Result<(), ValidationError> {
    let negative = |value: &Option<Decimal>| value.map(|v| v.is_sign_negative()).unwrap_or(false);
    if negative(&edit.other_deductions) || negative(&edit.other_bonuses) {
        return Err(ValidationError::new("negative_adjustment"));
    }
    if edit.other_deductions.is_none() && edit.other_bonuses.is_none() && edit.notes.is_none() {
        return Err(ValidationError::new("empty_edit"));
    }
    Ok(())
}

/// Payment-tracking fields, the only ones a paid record accepts
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct PaymentDetails {
    pub paid_at: Option<NaiveDateTime>,
    #[validate(length(max = 50))]
    pub payment_method: Option<String>,
    #[validate(length(max = 100))]
    pub payment_reference: Option<String>,
    #[validate(length(max = 100))]
    pub external_ledger_id: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
#[validate(schema(function = "validate_leave_request"))]
pub struct LeaveRequest {
    pub worker_id: Uuid,
    pub leave_type: LeaveType,
    pub from_date: NaiveDate,
    pub to_date: NaiveDate,
    #[validate(length(min = 1, max = 255))]
    pub reason: String,
    pub is_paid: bool,
}

fn validate_leave_request(request: &LeaveRequest) -> Result<(), ValidationError> {
    if request.from_date > request.to_date {
        return Err(ValidationError::new("from_date_after_to_date"));
    }
    Ok(())
}
