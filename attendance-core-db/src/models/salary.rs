use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::models::identifiable::Identifiable;
use crate::utils::hash_as_i64;

/// Fields a paid record still accepts
pub const PAYMENT_FIELDS: [&str; 5] = [
    "isPaid",
    "paidAt",
    "paymentMethod",
    "paymentReference",
    "externalLedgerId",
];

/// Bookkeeping fields that never count as a business change
const BOOKKEEPING_FIELDS: [&str; 5] = ["editHistory", "hash", "antecedentHash", "updatedAt", "calculatedAt"];

/// One before/after pair inside an edit history entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldChange {
    pub field: String,
    pub before: Value,
    pub after: Value,
}

/// Append-only audit entry of a salary record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SalaryEdit {
    pub editor_id: Uuid,
    pub edited_at: NaiveDateTime,
    pub reason: String,
    pub changes: Vec<FieldChange>,
}

/// Database model for a monthly salary record.
///
/// # Documentation
/// - Unique per (worker_id, year, month).
/// - Derived from attendance and leave; regenerable until `is_paid`.
/// - Once paid, only `PAYMENT_FIELDS` may change.
/// - `hash` is the content hash with `hash` set to 0 and acts as the
///   compare-and-swap token for updates; `antecedent_hash` is the previous one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SalaryRecordModel {
    pub id: Uuid,
    pub worker_id: Uuid,
    pub site_id: Uuid,
    pub year: i32,
    pub month: i32,

    pub working_start_date: NaiveDate,
    pub working_end_date: NaiveDate,
    pub month_working_days: i32,

    pub present_days: i32,
    pub absent_days: i32,
    pub half_days: i32,
    pub paid_leave_days: i32,
    pub unpaid_leave_days: i32,
    pub holiday_days: i32,
    pub late_days: i32,
    pub early_leave_days: i32,

    pub total_hours: Decimal,
    pub overtime_hours: Decimal,

    pub base_salary: Decimal,
    pub per_day_amount: Decimal,
    pub earnings: Decimal,
    pub absence_deduction: Decimal,
    pub other_deductions: Decimal,
    pub total_deductions: Decimal,
    pub overtime_amount: Decimal,
    pub other_bonuses: Decimal,
    pub total_bonuses: Decimal,
    pub gross_salary: Decimal,
    pub net_salary: Decimal,

    pub is_paid: bool,
    pub paid_at: Option<NaiveDateTime>,
    pub payment_method: Option<String>,
    pub payment_reference: Option<String>,
    pub external_ledger_id: Option<String>,

    pub notes: Option<String>,
    pub edit_history: Vec<SalaryEdit>,

    pub calculated_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
    pub antecedent_hash: i64,
    pub hash: i64,
}

impl SalaryRecordModel {
    /// Content hash with the `hash` field zeroed
    pub fn compute_hash(&self) -> Result<i64, String> {
        let mut for_hashing = self.clone();
        for_hashing.hash = 0;
        hash_as_i64(&for_hashing)
    }

    fn business_fields(&self) -> serde_json::Map<String, Value> {
        match serde_json::to_value(self) {
            Ok(Value::Object(mut map)) => {
                for field in BOOKKEEPING_FIELDS {
                    map.remove(field);
                }
                map
            }
            _ => serde_json::Map::new(),
        }
    }

    /// Field-level differences between two versions of a record, in field order
    pub fn diff(before: &SalaryRecordModel, after: &SalaryRecordModel) -> Vec<FieldChange> {
        let before_fields = before.business_fields();
        let after_fields = after.business_fields();
        after_fields
            .iter()
            .filter_map(|(field, after_value)| {
                let before_value = before_fields.get(field).cloned().unwrap_or(Value::Null);
                (before_value != *after_value).then(|| FieldChange {
                    field: field.clone(),
                    before: before_value,
                    after: after_value.clone(),
                })
            })
            .collect()
    }

    /// Fields outside the payment-tracking set that differ between versions
    pub fn non_payment_changes(before: &SalaryRecordModel, after: &SalaryRecordModel) -> Vec<String> {
        Self::diff(before, after)
            .into_iter()
            .map(|change| change.field)
            .filter(|field| !PAYMENT_FIELDS.contains(&field.as_str()))
            .collect()
    }
}

impl Identifiable for SalaryRecordModel {
    fn get_id(&self) -> Uuid {
        self.id
    }
}
