use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "role_type")]
#[serde(rename_all = "lowercase")]
pub enum RoleType {
    #[sea_orm(string_value = "admin")]
    Admin,
    #[sea_orm(string_value = "employee")]
    Employee,
}

#[derive(Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "attendance_status")]
#[serde(rename_all = "lowercase")]
pub enum AttendanceStatus {
    #[sea_orm(string_value = "present")]
    Present,
    #[sea_orm(string_value = "absent")]
    Absent,
    #[sea_orm(string_value = "leave")]
    Leave,
}

#[derive(Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "salary_type")]
#[serde(rename_all = "lowercase")]
pub enum SalaryType {
    #[sea_orm(string_value = "monthly")]
    Monthly,
    #[sea_orm(string_value = "daily")]
    Daily,
    #[sea_orm(string_value = "hourly")]
    Hourly,
}

#[derive(Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "run_status")]
#[serde(rename_all = "lowercase")]
pub enum RunStatus {
    #[sea_orm(string_value = "draft")]
    Draft,
    #[sea_orm(string_value = "finalized")]
    Finalized,
    #[sea_orm(string_value = "paid")]
    Paid,
    #[sea_orm(string_value = "archived")]
    Archived,
    #[sea_orm(string_value = "cancelled")]
    Cancelled,
}

#[derive(Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "holiday_kind")]
#[serde(rename_all = "snake_case")]
pub enum HolidayKind {
    #[sea_orm(string_value = "regular")]
    Regular,
    #[sea_orm(string_value = "special")]
    Special,
    #[sea_orm(string_value = "special_working")]
    SpecialWorking,
}
