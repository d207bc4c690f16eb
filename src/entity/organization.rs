use sea_orm::entity::prelude::*;
use sea_orm::FromJsonQueryResult;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "organization")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
    #[sea_orm(column_type = "Text", unique)]
    pub name: String,
    pub payroll_settings: PayrollSettings,
    pub departments: StringList,
    pub leave_types: StringList,
}

/// Organization-level payroll defaults, the middle tier of the
/// employee -> organization -> hardcoded rate fallback chain. All rates are
/// decimal multipliers (1.25 means 125%).
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, FromJsonQueryResult)]
#[serde(rename_all = "camelCase")]
pub struct PayrollSettings {
    pub regular_holiday_rate: Option<f64>,
    pub special_holiday_rate: Option<f64>,
    pub night_diff_percent: Option<f64>,
    pub overtime_regular_rate: Option<f64>,
    pub overtime_rest_day_rate: Option<f64>,
    pub regular_holiday_ot_rate: Option<f64>,
    pub special_holiday_ot_rate: Option<f64>,
    #[serde(default)]
    pub prorated_leave: bool,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, FromJsonQueryResult)]
pub struct StringList(pub Vec<String>);

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::employee::Entity")]
    Employee,
    #[sea_orm(has_many = "super::payroll_run::Entity")]
    PayrollRun,
    #[sea_orm(has_many = "super::holiday::Entity")]
    Holiday,
}

impl Related<super::employee::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Employee.def()
    }
}

impl Related<super::payroll_run::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PayrollRun.def()
    }
}

impl Related<super::holiday::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Holiday.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
