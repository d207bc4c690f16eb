use sea_orm::entity::prelude::*;
use sea_orm::FromJsonQueryResult;
use serde::{Deserialize, Serialize};

/// One payslip per (payroll run, employee), created when the run is
/// computed. Later adjustments go through the explicit update endpoint and
/// re-derive gross/net from the stored base pay.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "payslip")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
    pub created_by: Option<Uuid>,
    pub updated_by: Option<Uuid>,
    pub payroll_run_id: Uuid,
    pub employee_id: Uuid,
    pub period_start: Date,
    pub period_end: Date,
    pub base_pay: f64,
    pub gross_pay: f64,
    pub net_pay: f64,
    pub non_taxable_allowance: f64,
    pub deductions: LineItems,
    pub incentives: LineItems,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, FromJsonQueryResult)]
pub struct LineItems(pub Vec<LineItem>);

impl LineItems {
    pub fn total(&self) -> f64 {
        self.0.iter().map(|item| item.amount).sum()
    }
}

/// Flat deduction or incentive line.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LineItem {
    pub name: String,
    pub amount: f64,
    #[serde(rename = "type")]
    pub kind: LineItemKind,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LineItemKind {
    Government,
    Manual,
    Incentive,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::payroll_run::Entity",
        from = "Column::PayrollRunId",
        to = "super::payroll_run::Column::Id"
    )]
    PayrollRun,
    #[sea_orm(
        belongs_to = "super::employee::Entity",
        from = "Column::EmployeeId",
        to = "super::employee::Column::Id"
    )]
    Employee,
}

impl Related<super::payroll_run::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PayrollRun.def()
    }
}

impl Related<super::employee::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Employee.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
