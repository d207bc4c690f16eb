use chrono::NaiveDate;

use crate::entity::payroll_run::GovernmentDeductions;
use crate::entity::payslip::LineItem;
use crate::entity::sea_orm_active_enums::RunStatus;

use super::*;

#[derive(Debug, Serialize, Deserialize)]
pub(super) struct CreateRun {
    pub(super) organization_id: Uuid,
    pub(super) cutoff_start: NaiveDate,
    pub(super) cutoff_end: NaiveDate,
    /// Omitted: snapshot every employee of the organization.
    #[serde(default)]
    pub(super) employee_ids: Option<Vec<Uuid>>,
    #[serde(default = "default_true")]
    pub(super) deductions_enabled: bool,
    #[serde(default)]
    pub(super) government_deductions: Option<GovernmentDeductions>,
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Deserialize)]
pub(super) struct ListRuns {
    pub(super) organization_id: Uuid,
}

/// Per-employee manual lines supplied when a run is computed.
#[derive(Debug, Default, Serialize, Deserialize)]
pub(super) struct ComputeRun {
    #[serde(default)]
    pub(super) adjustments: Vec<EmployeeAdjustment>,
}

#[derive(Debug, Serialize, Deserialize)]
pub(super) struct EmployeeAdjustment {
    pub(super) employee_id: Uuid,
    #[serde(default)]
    pub(super) deductions: Vec<LineItem>,
    #[serde(default)]
    pub(super) incentives: Vec<LineItem>,
    #[serde(default)]
    pub(super) non_taxable_allowance: f64,
}

#[derive(Debug, Serialize, Deserialize)]
pub(super) struct ComputeOutcome {
    pub(super) created: usize,
    pub(super) failed: usize,
    pub(super) errors: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub(super) struct UpdatePayslip {
    #[serde(default)]
    pub(super) deductions: Option<Vec<LineItem>>,
    #[serde(default)]
    pub(super) incentives: Option<Vec<LineItem>>,
    #[serde(default)]
    pub(super) non_taxable_allowance: Option<f64>,
}

#[derive(Debug, Serialize, Deserialize)]
pub(super) struct UpdateRunStatus {
    pub(super) status: RunStatus,
}
