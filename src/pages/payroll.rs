use std::str::FromStr;

use actix_web::{dev, get, patch, post, web, FromRequest, HttpRequest, HttpResponse, Responder};
use chrono::Local;
use futures_util::future::LocalBoxFuture;
use sea_orm::{ActiveValue::{Set, Unchanged}, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{auth::Admin, consts::{MAX_BATCH_ERRORS, WORK_DAY_HOURS}, entity::{attendance, employee, organization, payroll_run, payslip::{self, LineItem, LineItemKind, LineItems}, prelude::*, sea_orm_active_enums::{RunStatus, SalaryType}}, payroll, utils};

use extractor::DraftRun;
use model::*;

mod extractor;
mod model;

pub(super) fn config(cfg: &mut web::ServiceConfig) {
    cfg
        .service(create_run)
        .service(list_runs)
        .service(update_payslip)
        .service(compute_run)
        .service(list_payslips)
        .service(update_run_status);
}

#[post("")]
async fn create_run(db: web::Data<DatabaseConnection>, admin: Admin, payload: web::Json<CreateRun>) -> impl Responder {
    let payload = payload.into_inner();

    if payload.cutoff_start > payload.cutoff_end {
        return Err(actix_web::error::ErrorBadRequest("cutoff start is after cutoff end"));
    }

    // membership snapshot: employees hired after this point never join the run
    let employee_ids = match payload.employee_ids {
        Some(ids) => ids,
        None => Employee::find()
            .filter(employee::Column::OrganizationId.eq(payload.organization_id))
            .all(db.as_ref()).await.unwrap()
            .into_iter()
            .map(|employee| employee.id)
            .collect(),
    };

    let run = payroll_run::ActiveModel {
        id: Set(Uuid::new_v4()),
        created_at: Set(Local::now().fixed_offset()),
        updated_at: Set(Local::now().fixed_offset()),
        created_by: Set(Some(admin.id)),
        updated_by: Set(Some(admin.id)),
        organization_id: Set(payload.organization_id),
        cutoff_start: Set(payload.cutoff_start),
        cutoff_end: Set(payload.cutoff_end),
        employee_ids: Set(payroll_run::UuidList(employee_ids)),
        deductions_enabled: Set(payload.deductions_enabled),
        government_deductions: Set(payload.government_deductions.unwrap_or_default()),
        status: Set(RunStatus::Draft),
    };

    let run = PayrollRun::insert(run)
        .exec_with_returning(db.as_ref()).await.unwrap();

    Ok(HttpResponse::Created().json(web::Json(run)))
}

#[get("")]
async fn list_runs(db: web::Data<DatabaseConnection>, _admin: Admin, query: web::Query<ListRuns>) -> impl Responder {
    let runs = PayrollRun::find()
        .filter(payroll_run::Column::OrganizationId.eq(query.organization_id))
        .order_by_desc(payroll_run::Column::CutoffStart)
        .all(db.as_ref()).await.unwrap();

    web::Json(runs)
}

async fn generate_payslip(
    db: &DatabaseConnection,
    employee: &employee::Model,
    run: &payroll_run::Model,
    settings: &organization::PayrollSettings,
    adjustment: Option<&EmployeeAdjustment>,
    admin_id: Uuid,
) -> Result<payslip::ActiveModel, String> {
    let rates = payroll::resolve_rates(employee, settings);

    let base_pay = payroll::base_pay(employee.basic_salary, &employee.salary_type, run.cutoff_start, run.cutoff_end)
        .map_err(|err| err.to_string())?;

    // attendance-derived overtime for the cutoff, paid at the resolved
    // regular overtime multiplier
    let overtime_hours = Attendance::find()
        .filter(attendance::Column::EmployeeId.eq(employee.id))
        .filter(attendance::Column::Date.between(run.cutoff_start, run.cutoff_end))
        .all(db).await
        .map_err(|err| err.to_string())?
        .into_iter()
        .filter_map(|record| record.overtime_hours)
        .sum::<f64>();

    let working_days = utils::count_working_days(run.cutoff_start, run.cutoff_end) as f64;
    let hourly_rate = match employee.salary_type {
        SalaryType::Hourly => employee.basic_salary,
        SalaryType::Daily => employee.basic_salary / WORK_DAY_HOURS as f64,
        SalaryType::Monthly if working_days > 0.0 => base_pay / (working_days * WORK_DAY_HOURS as f64),
        SalaryType::Monthly => 0.0,
    };

    let mut incentives = adjustment.map(|adj| adj.incentives.clone()).unwrap_or_default();
    if overtime_hours > 0.0 {
        incentives.push(LineItem {
            name: "overtime pay".to_string(),
            amount: overtime_hours * hourly_rate * rates.overtime_regular_rate,
            kind: LineItemKind::Incentive,
        });
    }

    let deductions = payroll::apply_government_settings(
        adjustment.map(|adj| adj.deductions.clone()).unwrap_or_default(),
        &run.government_deductions,
        run.deductions_enabled,
    );

    let totals = payroll::compute_totals(base_pay, &incentives, &deductions);

    let non_taxable_allowance = adjustment
        .map(|adj| adj.non_taxable_allowance)
        .filter(|amount| *amount > 0.0)
        .or(employee.allowance)
        .unwrap_or(0.0);

    Ok(payslip::ActiveModel {
        id: Set(Uuid::new_v4()),
        created_at: Set(Local::now().fixed_offset()),
        updated_at: Set(Local::now().fixed_offset()),
        created_by: Set(Some(admin_id)),
        updated_by: Set(Some(admin_id)),
        payroll_run_id: Set(run.id),
        employee_id: Set(employee.id),
        period_start: Set(run.cutoff_start),
        period_end: Set(run.cutoff_end),
        base_pay: Set(totals.base_pay),
        gross_pay: Set(totals.gross_pay),
        net_pay: Set(totals.net_pay),
        non_taxable_allowance: Set(non_taxable_allowance),
        deductions: Set(LineItems(deductions)),
        incentives: Set(LineItems(incentives)),
    })
}

#[post("/{run_id}/compute")]
async fn compute_run(db: web::Data<DatabaseConnection>, admin: Admin, run: DraftRun, payload: web::Json<ComputeRun>) -> impl Responder {
    let Some(organization) = Organization::find_by_id(run.organization_id)
        .one(db.as_ref()).await.unwrap()
    else {
        return Err(actix_web::error::ErrorNotFound("organization not found"));
    };

    let mut outcome = ComputeOutcome {
        created: 0,
        failed: 0,
        errors: Vec::new(),
    };

    let note_failure = |outcome: &mut ComputeOutcome, message: String| {
        outcome.failed += 1;
        if outcome.errors.len() < MAX_BATCH_ERRORS {
            outcome.errors.push(message);
        }
    };

    // snapshot order is preserved so reported indices stay stable
    for employee_id in &run.employee_ids.0 {
        let Some(employee) = Employee::find_by_id(*employee_id)
            .one(db.as_ref()).await.unwrap()
        else {
            note_failure(&mut outcome, format!("{employee_id}: employee not found"));
            continue;
        };

        // payslips are created once per (run, employee); recompute never
        // overwrites one that exists
        let existing = Payslip::find()
            .filter(payslip::Column::PayrollRunId.eq(run.id))
            .filter(payslip::Column::EmployeeId.eq(*employee_id))
            .one(db.as_ref()).await.unwrap();

        if existing.is_some() {
            note_failure(&mut outcome, format!("{employee_id}: payslip already exists"));
            continue;
        }

        let adjustment = payload.adjustments.iter().find(|adj| adj.employee_id == *employee_id);

        match generate_payslip(db.as_ref(), &employee, &run, &organization.payroll_settings, adjustment, admin.id).await {
            Ok(record) => {
                Payslip::insert(record).exec(db.as_ref()).await.unwrap();
                outcome.created += 1;
            }
            Err(message) => note_failure(&mut outcome, format!("{employee_id}: {message}")),
        }
    }

    Ok(HttpResponse::Created().json(web::Json(outcome)))
}

#[get("/{run_id}/payslips")]
async fn list_payslips(db: web::Data<DatabaseConnection>, _admin: Admin, run: payroll_run::Model) -> impl Responder {
    let payslips = Payslip::find()
        .filter(payslip::Column::PayrollRunId.eq(run.id))
        .all(db.as_ref()).await.unwrap();

    web::Json(payslips)
}

#[patch("/payslip/{payslip_id}")]
async fn update_payslip(db: web::Data<DatabaseConnection>, admin: Admin, path: web::Path<Uuid>, payload: web::Json<UpdatePayslip>) -> impl Responder {
    let Some(stored) = Payslip::find_by_id(*path)
        .one(db.as_ref()).await.unwrap()
    else {
        return Err(actix_web::error::ErrorNotFound("payslip not found"));
    };

    let Some(run) = PayrollRun::find_by_id(stored.payroll_run_id)
        .one(db.as_ref()).await.unwrap()
    else {
        return Err(actix_web::error::ErrorNotFound("payroll run not found"));
    };

    if run.status != RunStatus::Draft {
        return Err(actix_web::error::ErrorBadRequest("payroll run is no longer a draft"));
    }

    let payload = payload.into_inner();

    let deductions = payload.deductions.map(LineItems).unwrap_or(stored.deductions);
    let incentives = payload.incentives.map(LineItems).unwrap_or(stored.incentives);

    // gross/net re-derive from the stored base pay and the edited lines
    let totals = payroll::compute_totals(stored.base_pay, &incentives.0, &deductions.0);

    let updated = Payslip::update(payslip::ActiveModel {
        id: Unchanged(stored.id),
        updated_at: Set(Local::now().fixed_offset()),
        updated_by: Set(Some(admin.id)),
        gross_pay: Set(totals.gross_pay),
        net_pay: Set(totals.net_pay),
        non_taxable_allowance: Set(payload.non_taxable_allowance.unwrap_or(stored.non_taxable_allowance)),
        deductions: Set(deductions),
        incentives: Set(incentives),
        ..Default::default()
    }).exec(db.as_ref()).await.unwrap();

    Ok(HttpResponse::Ok().json(web::Json(updated)))
}

#[post("/{run_id}/status")]
async fn update_run_status(db: web::Data<DatabaseConnection>, admin: Admin, run: payroll_run::Model, payload: web::Json<UpdateRunStatus>) -> actix_web::Result<HttpResponse> {
    payroll::check_transition(&run.status, &payload.status)
        .map_err(actix_web::error::ErrorBadRequest)?;

    let updated = PayrollRun::update(payroll_run::ActiveModel {
        id: Unchanged(run.id),
        updated_at: Set(Local::now().fixed_offset()),
        updated_by: Set(Some(admin.id)),
        status: Set(payload.status.clone()),
        ..Default::default()
    }).exec(db.as_ref()).await.unwrap();

    Ok(HttpResponse::Ok().json(web::Json(updated)))
}
