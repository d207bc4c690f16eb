use sea_orm::entity::prelude::*;
use sea_orm::FromJsonQueryResult;
use serde::{Deserialize, Serialize};

use super::sea_orm_active_enums::RunStatus;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "payroll_run")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
    pub created_by: Option<Uuid>,
    pub updated_by: Option<Uuid>,
    pub organization_id: Uuid,
    pub cutoff_start: Date,
    pub cutoff_end: Date,
    /// Membership snapshot taken when the run was created; later hires do
    /// not join an existing run.
    pub employee_ids: UuidList,
    pub deductions_enabled: bool,
    pub government_deductions: GovernmentDeductions,
    pub status: RunStatus,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, FromJsonQueryResult)]
pub struct UuidList(pub Vec<Uuid>);

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, FromJsonQueryResult)]
pub struct GovernmentDeductions {
    pub sss: GovernmentToggle,
    pub pagibig: GovernmentToggle,
    pub philhealth: GovernmentToggle,
    pub tax: GovernmentToggle,
}

impl Default for GovernmentDeductions {
    fn default() -> Self {
        let toggle = GovernmentToggle {
            enabled: true,
            frequency: DeductionFrequency::Full,
        };

        Self {
            sss: toggle.clone(),
            pagibig: toggle.clone(),
            philhealth: toggle.clone(),
            tax: toggle,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GovernmentToggle {
    pub enabled: bool,
    pub frequency: DeductionFrequency,
}

/// `Half` halves the contribution on this cutoff, for organizations that
/// split monthly government dues across two cutoffs.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeductionFrequency {
    Full,
    Half,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::organization::Entity",
        from = "Column::OrganizationId",
        to = "super::organization::Column::Id"
    )]
    Organization,
    #[sea_orm(has_many = "super::payslip::Entity")]
    Payslip,
}

impl Related<super::organization::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Organization.def()
    }
}

impl Related<super::payslip::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Payslip.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
