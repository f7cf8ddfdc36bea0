//! Prorated monthly payroll
//!
//! A calculation is: payable window, then day buckets, then amounts, then a
//! hash-guarded upsert of the salary record.

pub mod amounts;
pub mod buckets;
pub mod engine;
pub mod window;

pub use amounts::{compute_amounts, overtime_amount, SalaryAmounts, OVERTIME_RATE_DAYS};
pub use buckets::{classify_days, DayBuckets};
pub use engine::{PayrollEngine, SalaryBatchResult};
pub use window::{pay_window, PayWindow};
