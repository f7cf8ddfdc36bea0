pub mod attendance_day;
pub mod entry;

pub use attendance_day::AttendanceDayModel;
pub use entry::{AttendanceEntry, ValidationIssue};
