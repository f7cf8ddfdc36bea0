use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(type_name = "employment_status", rename_all = "UPPERCASE"))]
#[serde(rename_all = "UPPERCASE")]
pub enum EmploymentStatus {
    Active,
    Inactive,
}

impl std::fmt::Display for EmploymentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EmploymentStatus::Active => write!(f, "ACTIVE"),
            EmploymentStatus::Inactive => write!(f, "INACTIVE"),
        }
    }
}
