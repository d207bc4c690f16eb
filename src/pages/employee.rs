use actix_web::{get, post, web, HttpResponse, Responder};
use chrono::{Local, NaiveDate};
use sea_orm::{ActiveValue::Set, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{auth::Admin, consts::MAX_BATCH_ERRORS, csv_io::{self, EmployeeRow}, entity::{employee::{self, WeekSchedule}, prelude::*, sea_orm_active_enums::SalaryType, user}};

pub(super) fn config(cfg: &mut web::ServiceConfig) {
    cfg
        .service(create_employee)
        .service(list_employees)
        .service(csv_template)
        .service(export_csv)
        .service(import_csv);
}

/// Interactive single-employee form. Rates here are decimals already; only
/// the CSV path divides percentages down.
#[derive(Debug, Serialize, Deserialize)]
struct CreateEmployee {
    organization_id: Uuid,
    first_name: String,
    last_name: String,
    #[serde(default)]
    middle_name: Option<String>,
    email: String,
    #[serde(default)]
    phone: Option<String>,
    position: String,
    department: String,
    employment_type: String,
    hire_date: NaiveDate,
    basic_salary: f64,
    #[serde(default)]
    allowance: Option<f64>,
    salary_type: SalaryType,
    #[serde(default)]
    regular_holiday_rate: Option<f64>,
    #[serde(default)]
    special_holiday_rate: Option<f64>,
    #[serde(default)]
    night_diff_percent: Option<f64>,
    #[serde(default)]
    overtime_regular_rate: Option<f64>,
    #[serde(default)]
    overtime_rest_day_rate: Option<f64>,
    #[serde(default)]
    regular_holiday_ot_rate: Option<f64>,
    #[serde(default)]
    special_holiday_ot_rate: Option<f64>,
    #[serde(default)]
    default_schedule: Option<WeekSchedule>,
}

#[post("")]
async fn create_employee(db: web::Data<DatabaseConnection>, admin: Admin, payload: web::Json<CreateEmployee>) -> impl Responder {
    let payload = payload.into_inner();

    let record = employee::ActiveModel {
        id: Set(Uuid::new_v4()),
        created_at: Set(Local::now().fixed_offset()),
        updated_at: Set(Local::now().fixed_offset()),
        created_by: Set(Some(admin.id)),
        updated_by: Set(Some(admin.id)),
        organization_id: Set(payload.organization_id),
        first_name: Set(payload.first_name),
        last_name: Set(payload.last_name),
        middle_name: Set(payload.middle_name),
        email: Set(payload.email),
        phone: Set(payload.phone),
        position: Set(payload.position),
        department: Set(payload.department),
        employment_type: Set(payload.employment_type),
        hire_date: Set(payload.hire_date),
        basic_salary: Set(payload.basic_salary),
        allowance: Set(payload.allowance),
        salary_type: Set(payload.salary_type),
        regular_holiday_rate: Set(payload.regular_holiday_rate),
        special_holiday_rate: Set(payload.special_holiday_rate),
        night_diff_percent: Set(payload.night_diff_percent),
        overtime_regular_rate: Set(payload.overtime_regular_rate),
        overtime_rest_day_rate: Set(payload.overtime_rest_day_rate),
        regular_holiday_ot_rate: Set(payload.regular_holiday_ot_rate),
        special_holiday_ot_rate: Set(payload.special_holiday_ot_rate),
        default_schedule: Set(payload.default_schedule.unwrap_or_default()),
    };

    let record = Employee::insert(record)
        .exec_with_returning(db.as_ref()).await.unwrap();

    HttpResponse::Created().json(web::Json(record))
}

#[derive(Debug, Deserialize)]
struct ListEmployees {
    organization_id: Uuid,
    #[serde(default)]
    department: Option<String>,
    #[serde(default)]
    search: Option<String>,
}

#[get("")]
async fn list_employees(db: web::Data<DatabaseConnection>, _user: user::Model, query: web::Query<ListEmployees>) -> impl Responder {
    let mut select = Employee::find()
        .filter(employee::Column::OrganizationId.eq(query.organization_id));

    if let Some(department) = &query.department {
        select = select.filter(employee::Column::Department.eq(department));
    }

    if let Some(search) = &query.search {
        select = select.filter(employee::Column::LastName.contains(search));
    }

    let employees = select
        .order_by_asc(employee::Column::LastName)
        .all(db.as_ref()).await.unwrap();

    web::Json(employees)
}

#[get("/template")]
async fn csv_template(_user: user::Model) -> impl Responder {
    HttpResponse::Ok()
        .content_type("text/csv")
        .body(csv_io::employee_csv_template())
}

#[derive(Debug, Deserialize)]
struct OrganizationQuery {
    organization_id: Uuid,
}

#[get("/export")]
async fn export_csv(db: web::Data<DatabaseConnection>, _admin: Admin, query: web::Query<OrganizationQuery>) -> impl Responder {
    let employees = Employee::find()
        .filter(employee::Column::OrganizationId.eq(query.organization_id))
        .order_by_asc(employee::Column::LastName)
        .all(db.as_ref()).await.unwrap();

    HttpResponse::Ok()
        .content_type("text/csv")
        .body(csv_io::export_employees_csv(&employees))
}

#[derive(Debug, Serialize)]
struct ImportOutcome {
    added: usize,
    failed: usize,
    errors: Vec<String>,
}

#[post("/import")]
async fn import_csv(db: web::Data<DatabaseConnection>, admin: Admin, query: web::Query<OrganizationQuery>, body: String) -> actix_web::Result<HttpResponse> {
    let import = csv_io::parse_employee_csv(&body)
        .map_err(actix_web::error::ErrorBadRequest)?;

    let mut outcome = ImportOutcome {
        added: 0,
        failed: import.invalid_rows.len(),
        errors: Vec::new(),
    };

    for row_error in &import.invalid_rows {
        if outcome.errors.len() >= MAX_BATCH_ERRORS {
            break;
        }

        for error in &row_error.errors {
            outcome.errors.push(format!("row {}: {}", row_error.row, error.message));
        }
    }

    // valid rows import in sheet order; a bad row never blocks the rest
    for row in import.valid_rows {
        let insert = Employee::insert(active_model_from_row(query.organization_id, admin.id, row))
            .exec(db.as_ref()).await;

        match insert {
            Ok(_) => outcome.added += 1,
            Err(err) => {
                outcome.failed += 1;
                if outcome.errors.len() < MAX_BATCH_ERRORS {
                    outcome.errors.push(err.to_string());
                }
            }
        }
    }

    Ok(HttpResponse::Ok().json(web::Json(outcome)))
}

fn active_model_from_row(organization_id: Uuid, admin_id: Uuid, row: EmployeeRow) -> employee::ActiveModel {
    employee::ActiveModel {
        id: Set(Uuid::new_v4()),
        created_at: Set(Local::now().fixed_offset()),
        updated_at: Set(Local::now().fixed_offset()),
        created_by: Set(Some(admin_id)),
        updated_by: Set(Some(admin_id)),
        organization_id: Set(organization_id),
        first_name: Set(row.first_name),
        last_name: Set(row.last_name),
        middle_name: Set(row.middle_name),
        email: Set(row.email),
        phone: Set(row.phone),
        position: Set(row.position),
        department: Set(row.department),
        employment_type: Set(row.employment_type),
        hire_date: Set(row.hire_date),
        basic_salary: Set(row.basic_salary),
        allowance: Set(row.allowance),
        salary_type: Set(row.salary_type),
        regular_holiday_rate: Set(row.regular_holiday_rate),
        special_holiday_rate: Set(row.special_holiday_rate),
        night_diff_percent: Set(row.night_diff_percent),
        overtime_regular_rate: Set(row.overtime_regular_rate),
        overtime_rest_day_rate: Set(row.overtime_rest_day_rate),
        regular_holiday_ot_rate: Set(row.regular_holiday_ot_rate),
        special_holiday_ot_rate: Set(row.special_holiday_ot_rate),
        default_schedule: Set(WeekSchedule::default()),
    }
}
