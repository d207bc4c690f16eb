use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::sea_orm_active_enums::AttendanceStatus;

/// One attendance entry per (employee, calendar day); the unique index lives
/// in the migration. Absent/leave rows carry no actual punches and no
/// overtime, and late/undertime are zero.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "attendance")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
    pub created_by: Option<Uuid>,
    pub updated_by: Option<Uuid>,
    pub employee_id: Uuid,
    pub date: Date,
    #[sea_orm(column_type = "Text")]
    pub schedule_in: String,
    #[sea_orm(column_type = "Text")]
    pub schedule_out: String,
    #[sea_orm(column_type = "Text", nullable)]
    pub actual_in: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub actual_out: Option<String>,
    pub status: AttendanceStatus,
    pub late_minutes: Option<i32>,
    pub undertime_hours: Option<f64>,
    pub overtime_hours: Option<f64>,
    #[sea_orm(column_type = "Text", nullable)]
    pub remarks: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::employee::Entity",
        from = "Column::EmployeeId",
        to = "super::employee::Column::Id"
    )]
    Employee,
}

impl Related<super::employee::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Employee.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
