use actix_web::{get, patch, post, web, HttpResponse, Responder};
use chrono::{Datelike as _, Local};
use sea_orm::{ActiveValue::{Set, Unchanged}, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{auth::Admin, bulk::BulkDraft, consts::MAX_BATCH_ERRORS, entity::{attendance, prelude::*, sea_orm_active_enums::AttendanceStatus, user}, timesheet};

use model::*;

mod model;

pub(super) fn config(cfg: &mut web::ServiceConfig) {
    cfg
        .service(create_attendance)
        .service(list_attendance)
        .service(update_attendance)
        .service(bulk_create_attendance);
}

#[post("")]
async fn create_attendance(db: web::Data<DatabaseConnection>, admin: Admin, payload: web::Json<CreateAttendance>) -> impl Responder {
    let Some(employee) = Employee::find_by_id(payload.employee_id)
        .one(db.as_ref()).await.unwrap()
    else {
        return Err(actix_web::error::ErrorNotFound("employee not found"));
    };

    // one record per (employee, date); re-posting the same day hands back
    // the existing row
    let existing = Attendance::find()
        .filter(attendance::Column::EmployeeId.eq(payload.employee_id))
        .filter(attendance::Column::Date.eq(payload.date))
        .one(db.as_ref()).await.unwrap();

    if let Some(existing) = existing {
        return Ok(HttpResponse::Ok().json(web::Json(existing)));
    }

    let day_schedule = employee.default_schedule.on(payload.date.weekday());

    let resolved = timesheet::resolve(
        &day_schedule.time_in,
        &day_schedule.time_out,
        payload.actual_in.as_deref(),
        payload.actual_out.as_deref(),
        &payload.status,
        payload.overtime_hours,
    );

    let record = attendance::ActiveModel {
        id: Set(Uuid::new_v4()),
        created_at: Set(Local::now().fixed_offset()),
        updated_at: Set(Local::now().fixed_offset()),
        created_by: Set(Some(admin.id)),
        updated_by: Set(Some(admin.id)),
        employee_id: Set(payload.employee_id),
        date: Set(payload.date),
        schedule_in: Set(day_schedule.time_in.clone()),
        schedule_out: Set(day_schedule.time_out.clone()),
        actual_in: Set(resolved.actual_in),
        actual_out: Set(resolved.actual_out),
        status: Set(payload.status.clone()),
        late_minutes: Set(Some(resolved.late_minutes)),
        undertime_hours: Set(Some(resolved.undertime_hours)),
        overtime_hours: Set(resolved.overtime_hours),
        remarks: Set(payload.remarks.clone()),
    };

    let record = Attendance::insert(record)
        .exec_with_returning(db.as_ref()).await.unwrap();

    Ok(HttpResponse::Created().json(web::Json(record)))
}

#[get("")]
async fn list_attendance(db: web::Data<DatabaseConnection>, _user: user::Model, query: web::Query<ListAttendance>) -> impl Responder {
    let records = Attendance::find()
        .filter(attendance::Column::EmployeeId.eq(query.employee_id))
        .filter(attendance::Column::Date.between(query.start, query.end))
        .order_by_asc(attendance::Column::Date)
        .all(db.as_ref()).await.unwrap();

    let views = records
        .into_iter()
        .map(|record| {
            let derived_overtime_hours = match record.status {
                AttendanceStatus::Present => {
                    timesheet::derived_overtime_hours(&record.schedule_out, record.actual_out.as_deref())
                }
                _ => 0.0,
            };

            AttendanceView { record, derived_overtime_hours }
        })
        .collect::<Vec<_>>();

    web::Json(views)
}

#[patch("/{attendance_id}")]
async fn update_attendance(db: web::Data<DatabaseConnection>, admin: Admin, path: web::Path<Uuid>, payload: web::Json<UpdateAttendance>) -> impl Responder {
    let Some(stored) = Attendance::find_by_id(*path)
        .one(db.as_ref()).await.unwrap()
    else {
        return Err(actix_web::error::ErrorNotFound("attendance record not found"));
    };

    let payload = payload.into_inner();

    let status = payload.status.unwrap_or(stored.status.clone());
    // an explicit empty string clears a punch, a missing field keeps it
    let actual_in = merge_punch(payload.actual_in, stored.actual_in.clone());
    let actual_out = merge_punch(payload.actual_out, stored.actual_out.clone());
    let overtime = payload.overtime_hours.or(stored.overtime_hours);

    let resolved = timesheet::resolve(
        &stored.schedule_in,
        &stored.schedule_out,
        actual_in.as_deref(),
        actual_out.as_deref(),
        &status,
        overtime,
    );

    // absent/leave ignores any manual late/undertime: the clearing rule is
    // an unconditional override
    let (late_minutes, undertime_hours) = match status {
        AttendanceStatus::Present => (
            payload.late_minutes.apply(stored.late_minutes, resolved.late_minutes),
            payload.undertime_hours.apply(stored.undertime_hours, resolved.undertime_hours),
        ),
        _ => (Some(0), Some(0.0)),
    };

    let record = Attendance::update(attendance::ActiveModel {
        id: Unchanged(stored.id),
        updated_at: Set(Local::now().fixed_offset()),
        updated_by: Set(Some(admin.id)),
        actual_in: Set(resolved.actual_in),
        actual_out: Set(resolved.actual_out),
        status: Set(status),
        late_minutes: Set(late_minutes),
        undertime_hours: Set(undertime_hours),
        overtime_hours: Set(resolved.overtime_hours),
        remarks: Set(payload.remarks.or(stored.remarks)),
        ..Default::default()
    }).exec(db.as_ref()).await.unwrap();

    Ok(HttpResponse::Ok().json(web::Json(record)))
}

fn merge_punch(supplied: Option<String>, stored: Option<String>) -> Option<String> {
    match supplied {
        Some(value) if value.is_empty() => None,
        Some(value) => Some(value),
        None => stored,
    }
}

#[post("/bulk")]
async fn bulk_create_attendance(db: web::Data<DatabaseConnection>, admin: Admin, payload: web::Json<BulkCreateAttendance>) -> impl Responder {
    let payload = payload.into_inner();

    let Some(employee) = Employee::find_by_id(payload.employee_id)
        .one(db.as_ref()).await.unwrap()
    else {
        return Err(actix_web::error::ErrorNotFound("employee not found"));
    };

    let mut draft = BulkDraft::new(
        employee.id,
        employee.default_schedule.clone(),
        payload.start_date,
        payload.end_date,
        payload.include_saturday,
        payload.include_sunday,
    );

    for (date, entry) in payload.entries {
        draft.set_entry(date, entry);
    }
    for date in payload.excluded {
        draft.exclude(date);
    }

    // validation failures reject the batch before anything is written
    let records = draft.build()
        .map_err(actix_web::error::ErrorBadRequest)?;

    let mut outcome = BulkOutcome {
        created: 0,
        failed: 0,
        errors: Vec::new(),
    };

    // sequential, in date order: item failures are collected and never roll
    // back the items already written
    for record in records {
        let duplicate = Attendance::find()
            .filter(attendance::Column::EmployeeId.eq(record.employee_id))
            .filter(attendance::Column::Date.eq(record.date))
            .one(db.as_ref()).await.unwrap();

        if duplicate.is_some() {
            outcome.failed += 1;
            if outcome.errors.len() < MAX_BATCH_ERRORS {
                outcome.errors.push(format!("{}: attendance already recorded", record.date));
            }
            continue;
        }

        let insert = Attendance::insert(attendance::ActiveModel {
            id: Set(Uuid::new_v4()),
            created_at: Set(Local::now().fixed_offset()),
            updated_at: Set(Local::now().fixed_offset()),
            created_by: Set(Some(admin.id)),
            updated_by: Set(Some(admin.id)),
            employee_id: Set(record.employee_id),
            date: Set(record.date),
            schedule_in: Set(record.schedule_in),
            schedule_out: Set(record.schedule_out),
            actual_in: Set(record.actual_in),
            actual_out: Set(record.actual_out),
            status: Set(record.status),
            late_minutes: Set(Some(record.late_minutes)),
            undertime_hours: Set(Some(record.undertime_hours)),
            overtime_hours: Set(record.overtime_hours),
            remarks: Set(None),
        }).exec(db.as_ref()).await;

        match insert {
            Ok(_) => outcome.created += 1,
            Err(err) => {
                outcome.failed += 1;
                if outcome.errors.len() < MAX_BATCH_ERRORS {
                    outcome.errors.push(format!("{}: {err}", record.date));
                }
            }
        }
    }

    Ok(HttpResponse::Created().json(web::Json(outcome)))
}
