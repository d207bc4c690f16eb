//! Payroll aggregation: rate resolution, base pay, government deduction
//! toggles, payslip totals, and the run status state machine.

use chrono::NaiveDate;
use serde::Serialize;
use thiserror::Error;

use crate::consts;
use crate::entity::employee;
use crate::entity::organization::PayrollSettings;
use crate::entity::payroll_run::{DeductionFrequency, GovernmentDeductions, GovernmentToggle};
use crate::entity::payslip::{LineItem, LineItemKind};
use crate::entity::sea_orm_active_enums::{RunStatus, SalaryType};
use crate::utils::count_working_days;

#[derive(Debug, Error)]
pub enum PayrollError {
    #[error("cutoff start {0} is after cutoff end {1}")]
    InvalidCutoff(NaiveDate, NaiveDate),
    #[error("cannot transition payroll run from {from:?} to {to:?}")]
    InvalidTransition { from: RunStatus, to: RunStatus },
}

/// Fully resolved multiplier table for one employee.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RateTable {
    pub regular_holiday_rate: f64,
    pub special_holiday_rate: f64,
    pub night_diff_percent: f64,
    pub overtime_regular_rate: f64,
    pub overtime_rest_day_rate: f64,
    pub regular_holiday_ot_rate: f64,
    pub special_holiday_ot_rate: f64,
}

impl Default for RateTable {
    fn default() -> Self {
        Self {
            regular_holiday_rate: consts::DEFAULT_REGULAR_HOLIDAY_RATE,
            special_holiday_rate: consts::DEFAULT_SPECIAL_HOLIDAY_RATE,
            night_diff_percent: consts::DEFAULT_NIGHT_DIFF_PERCENT,
            overtime_regular_rate: consts::DEFAULT_OVERTIME_REGULAR_RATE,
            overtime_rest_day_rate: consts::DEFAULT_OVERTIME_REST_DAY_RATE,
            regular_holiday_ot_rate: consts::DEFAULT_REGULAR_HOLIDAY_OT_RATE,
            special_holiday_ot_rate: consts::DEFAULT_SPECIAL_HOLIDAY_OT_RATE,
        }
    }
}

/// First present layer wins: employee override, then organization setting,
/// then the hardcoded default.
pub fn resolve_rate(employee: Option<f64>, organization: Option<f64>, fallback: f64) -> f64 {
    employee.or(organization).unwrap_or(fallback)
}

pub fn resolve_rates(employee: &employee::Model, settings: &PayrollSettings) -> RateTable {
    let defaults = RateTable::default();

    RateTable {
        regular_holiday_rate: resolve_rate(
            employee.regular_holiday_rate,
            settings.regular_holiday_rate,
            defaults.regular_holiday_rate,
        ),
        special_holiday_rate: resolve_rate(
            employee.special_holiday_rate,
            settings.special_holiday_rate,
            defaults.special_holiday_rate,
        ),
        night_diff_percent: resolve_rate(
            employee.night_diff_percent,
            settings.night_diff_percent,
            defaults.night_diff_percent,
        ),
        overtime_regular_rate: resolve_rate(
            employee.overtime_regular_rate,
            settings.overtime_regular_rate,
            defaults.overtime_regular_rate,
        ),
        overtime_rest_day_rate: resolve_rate(
            employee.overtime_rest_day_rate,
            settings.overtime_rest_day_rate,
            defaults.overtime_rest_day_rate,
        ),
        regular_holiday_ot_rate: resolve_rate(
            employee.regular_holiday_ot_rate,
            settings.regular_holiday_ot_rate,
            defaults.regular_holiday_ot_rate,
        ),
        special_holiday_ot_rate: resolve_rate(
            employee.special_holiday_ot_rate,
            settings.special_holiday_ot_rate,
            defaults.special_holiday_ot_rate,
        ),
    }
}

/// Base pay for one cutoff. A monthly salary is taken as-is per cutoff, not
/// re-derived from attendance; daily and hourly salaries scale by the
/// weekday count of the cutoff.
pub fn base_pay(
    basic_salary: f64,
    salary_type: &SalaryType,
    cutoff_start: NaiveDate,
    cutoff_end: NaiveDate,
) -> Result<f64, PayrollError> {
    if cutoff_start > cutoff_end {
        return Err(PayrollError::InvalidCutoff(cutoff_start, cutoff_end));
    }

    let working_days = count_working_days(cutoff_start, cutoff_end) as f64;

    Ok(match salary_type {
        SalaryType::Monthly => basic_salary,
        SalaryType::Daily => basic_salary * working_days,
        SalaryType::Hourly => basic_salary * working_days * consts::WORK_DAY_HOURS as f64,
    })
}

/// Applies the run's government toggles to a deduction list. Disabled kinds
/// drop their line items, `half` frequency halves the amount; manual
/// deductions pass through untouched. With deductions disabled on the run,
/// every government item is dropped.
pub fn apply_government_settings(
    deductions: Vec<LineItem>,
    settings: &GovernmentDeductions,
    deductions_enabled: bool,
) -> Vec<LineItem> {
    deductions
        .into_iter()
        .filter_map(|item| {
            if item.kind != LineItemKind::Government {
                return Some(item);
            }

            if !deductions_enabled {
                return None;
            }

            let toggle = toggle_for(settings, &item.name)?;
            if !toggle.enabled {
                return None;
            }

            Some(match toggle.frequency {
                DeductionFrequency::Full => item,
                DeductionFrequency::Half => LineItem {
                    amount: item.amount / 2.0,
                    ..item
                },
            })
        })
        .collect()
}

// Unknown government line names fall outside the four statutory kinds and
// are kept as-is.
fn toggle_for<'a>(settings: &'a GovernmentDeductions, name: &str) -> Option<&'a GovernmentToggle> {
    match name.to_ascii_lowercase().as_str() {
        "sss" => Some(&settings.sss),
        "pagibig" | "pag-ibig" => Some(&settings.pagibig),
        "philhealth" => Some(&settings.philhealth),
        "tax" | "withholding tax" => Some(&settings.tax),
        _ => None,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PayslipTotals {
    pub base_pay: f64,
    pub gross_pay: f64,
    pub total_deductions: f64,
    pub net_pay: f64,
}

/// `gross = base + incentives`, `net = gross - deductions`. Callers run
/// [`apply_government_settings`] over the deduction list first.
pub fn compute_totals(base_pay: f64, incentives: &[LineItem], deductions: &[LineItem]) -> PayslipTotals {
    let gross_pay = base_pay + incentives.iter().map(|item| item.amount).sum::<f64>();
    let total_deductions = deductions.iter().map(|item| item.amount).sum::<f64>();

    PayslipTotals {
        base_pay,
        gross_pay,
        total_deductions,
        net_pay: gross_pay - total_deductions,
    }
}

/// Run lifecycle: draft -> finalized -> paid -> archived, with cancellation
/// allowed until the run is paid. Everything else is rejected; a paid run
/// can never revert to draft.
pub fn check_transition(from: &RunStatus, to: &RunStatus) -> Result<(), PayrollError> {
    let allowed = matches!(
        (from, to),
        (RunStatus::Draft, RunStatus::Finalized)
            | (RunStatus::Finalized, RunStatus::Paid)
            | (RunStatus::Paid, RunStatus::Archived)
            | (RunStatus::Draft, RunStatus::Cancelled)
            | (RunStatus::Finalized, RunStatus::Cancelled)
    );

    if allowed {
        Ok(())
    } else {
        Err(PayrollError::InvalidTransition {
            from: from.clone(),
            to: to.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(name: &str, amount: f64, kind: LineItemKind) -> LineItem {
        LineItem {
            name: name.to_string(),
            amount,
            kind,
        }
    }

    #[test]
    fn test_rate_fallback_tiers() {
        // no override anywhere: hardcoded default
        assert_eq!(resolve_rate(None, None, 1.0), 1.0);
        // organization setting beats the default
        assert_eq!(resolve_rate(None, Some(0.5), 1.0), 0.5);
        // employee override beats everything
        assert_eq!(resolve_rate(Some(0.75), Some(0.5), 1.0), 0.75);
    }

    #[test]
    fn test_resolve_rates_mixes_layers_per_field() {
        let mut employee = employee_fixture();
        employee.special_holiday_rate = Some(0.5);

        let settings = PayrollSettings {
            overtime_regular_rate: Some(1.5),
            ..Default::default()
        };

        let rates = resolve_rates(&employee, &settings);
        assert_eq!(rates.special_holiday_rate, 0.5);
        assert_eq!(rates.overtime_regular_rate, 1.5);
        assert_eq!(rates.regular_holiday_rate, 1.0);
        assert_eq!(rates.special_holiday_ot_rate, 1.69);
    }

    #[test]
    fn test_base_pay_by_salary_type() {
        // June 2024: 20 weekdays
        let start = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
        let end = NaiveDate::from_ymd_opt(2024, 6, 30).unwrap();

        assert_eq!(base_pay(30_000.0, &SalaryType::Monthly, start, end).unwrap(), 30_000.0);
        assert_eq!(base_pay(1_000.0, &SalaryType::Daily, start, end).unwrap(), 20_000.0);
        assert_eq!(base_pay(100.0, &SalaryType::Hourly, start, end).unwrap(), 16_000.0);

        assert!(matches!(
            base_pay(30_000.0, &SalaryType::Monthly, end, start),
            Err(PayrollError::InvalidCutoff(..))
        ));
    }

    #[test]
    fn test_totals_identities() {
        let incentives = vec![
            line("perfect attendance", 1_500.0, LineItemKind::Incentive),
            line("referral bonus", 2_000.0, LineItemKind::Incentive),
        ];
        let deductions = vec![
            line("sss", 1_125.0, LineItemKind::Government),
            line("cash advance", 500.0, LineItemKind::Manual),
        ];

        let totals = compute_totals(25_000.0, &incentives, &deductions);
        assert_eq!(totals.gross_pay, 25_000.0 + 3_500.0);
        assert_eq!(totals.total_deductions, 1_625.0);
        assert_eq!(totals.net_pay, totals.gross_pay - totals.total_deductions);
    }

    #[test]
    fn test_government_toggles() {
        let mut settings = GovernmentDeductions::default();
        settings.philhealth.enabled = false;
        settings.sss.frequency = DeductionFrequency::Half;

        let deductions = vec![
            line("sss", 1_000.0, LineItemKind::Government),
            line("philhealth", 400.0, LineItemKind::Government),
            line("tax", 2_000.0, LineItemKind::Government),
            line("cash advance", 500.0, LineItemKind::Manual),
        ];

        let applied = apply_government_settings(deductions.clone(), &settings, true);
        assert_eq!(applied.len(), 3);
        assert_eq!(applied[0].amount, 500.0); // sss halved
        assert_eq!(applied[1].name, "tax");
        assert_eq!(applied[2].name, "cash advance");

        // deductions disabled on the run: only the manual item survives
        let applied = apply_government_settings(deductions, &settings, false);
        assert_eq!(applied.len(), 1);
        assert_eq!(applied[0].name, "cash advance");
    }

    #[test]
    fn test_run_status_machine() {
        use RunStatus::*;

        for (from, to) in [
            (Draft, Finalized),
            (Finalized, Paid),
            (Paid, Archived),
            (Draft, Cancelled),
            (Finalized, Cancelled),
        ] {
            assert!(check_transition(&from, &to).is_ok(), "{from:?} -> {to:?}");
        }

        for (from, to) in [
            (Paid, Draft),
            (Paid, Cancelled),
            (Archived, Paid),
            (Cancelled, Draft),
            (Draft, Paid),
            (Finalized, Draft),
        ] {
            assert!(check_transition(&from, &to).is_err(), "{from:?} -> {to:?}");
        }
    }

    fn employee_fixture() -> employee::Model {
        use crate::entity::employee::WeekSchedule;

        employee::Model {
            id: uuid::Uuid::new_v4(),
            created_at: chrono::Local::now().into(),
            updated_at: chrono::Local::now().into(),
            created_by: None,
            updated_by: None,
            organization_id: uuid::Uuid::new_v4(),
            first_name: "Maria".to_string(),
            last_name: "Santos".to_string(),
            middle_name: None,
            email: "maria.santos@example.com".to_string(),
            phone: None,
            position: "Accountant".to_string(),
            department: "Finance".to_string(),
            employment_type: "regular".to_string(),
            hire_date: NaiveDate::from_ymd_opt(2022, 3, 14).unwrap(),
            basic_salary: 30_000.0,
            allowance: None,
            salary_type: SalaryType::Monthly,
            regular_holiday_rate: None,
            special_holiday_rate: None,
            night_diff_percent: None,
            overtime_regular_rate: None,
            overtime_rest_day_rate: None,
            regular_holiday_ot_rate: None,
            special_holiday_ot_rate: None,
            default_schedule: WeekSchedule::default(),
        }
    }
}
