use chrono::Weekday;
use sea_orm::entity::prelude::*;
use sea_orm::FromJsonQueryResult;
use serde::{Deserialize, Serialize};

use super::sea_orm_active_enums::SalaryType;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "employee")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
    pub created_by: Option<Uuid>,
    pub updated_by: Option<Uuid>,
    pub organization_id: Uuid,
    #[sea_orm(column_type = "Text")]
    pub first_name: String,
    #[sea_orm(column_type = "Text")]
    pub last_name: String,
    #[sea_orm(column_type = "Text", nullable)]
    pub middle_name: Option<String>,
    #[sea_orm(column_type = "Text")]
    pub email: String,
    #[sea_orm(column_type = "Text", nullable)]
    pub phone: Option<String>,
    #[sea_orm(column_type = "Text")]
    pub position: String,
    #[sea_orm(column_type = "Text")]
    pub department: String,
    #[sea_orm(column_type = "Text")]
    pub employment_type: String,
    pub hire_date: Date,
    pub basic_salary: f64,
    pub allowance: Option<f64>,
    pub salary_type: SalaryType,
    // Per-employee rate overrides; None falls through to the organization's
    // payroll settings, then to the hardcoded defaults.
    pub regular_holiday_rate: Option<f64>,
    pub special_holiday_rate: Option<f64>,
    pub night_diff_percent: Option<f64>,
    pub overtime_regular_rate: Option<f64>,
    pub overtime_rest_day_rate: Option<f64>,
    pub regular_holiday_ot_rate: Option<f64>,
    pub special_holiday_ot_rate: Option<f64>,
    pub default_schedule: WeekSchedule,
}

/// One weekday of an employee's default schedule.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, FromJsonQueryResult)]
#[serde(rename_all = "camelCase")]
pub struct DaySchedule {
    pub time_in: String,
    pub time_out: String,
    pub is_workday: bool,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, FromJsonQueryResult)]
#[serde(rename_all = "camelCase")]
pub struct WeekSchedule {
    pub monday: DaySchedule,
    pub tuesday: DaySchedule,
    pub wednesday: DaySchedule,
    pub thursday: DaySchedule,
    pub friday: DaySchedule,
    pub saturday: DaySchedule,
    pub sunday: DaySchedule,
}

impl WeekSchedule {
    pub fn on(&self, weekday: Weekday) -> &DaySchedule {
        match weekday {
            Weekday::Mon => &self.monday,
            Weekday::Tue => &self.tuesday,
            Weekday::Wed => &self.wednesday,
            Weekday::Thu => &self.thursday,
            Weekday::Fri => &self.friday,
            Weekday::Sat => &self.saturday,
            Weekday::Sun => &self.sunday,
        }
    }
}

impl Default for WeekSchedule {
    /// 09:00-18:00 Monday through Friday, weekends off.
    fn default() -> Self {
        let workday = DaySchedule {
            time_in: "09:00".to_string(),
            time_out: "18:00".to_string(),
            is_workday: true,
        };
        let rest_day = DaySchedule {
            time_in: String::new(),
            time_out: String::new(),
            is_workday: false,
        };

        Self {
            monday: workday.clone(),
            tuesday: workday.clone(),
            wednesday: workday.clone(),
            thursday: workday.clone(),
            friday: workday,
            saturday: rest_day.clone(),
            sunday: rest_day,
        }
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::organization::Entity",
        from = "Column::OrganizationId",
        to = "super::organization::Column::Id"
    )]
    Organization,
    #[sea_orm(has_many = "super::attendance::Entity")]
    Attendance,
    #[sea_orm(has_many = "super::payslip::Entity")]
    Payslip,
}

impl Related<super::organization::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Organization.def()
    }
}

impl Related<super::attendance::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Attendance.def()
    }
}

impl Related<super::payslip::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Payslip.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
