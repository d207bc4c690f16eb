use actix_web::{get, post, web, HttpResponse, Responder};
use chrono::{Local, NaiveDate};
use sea_orm::{ActiveValue::Set, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{auth::Admin, csv_io, entity::{holiday, prelude::*, sea_orm_active_enums::HolidayKind, user}};

pub(super) fn config(cfg: &mut web::ServiceConfig) {
    cfg
        .service(create_holiday)
        .service(list_holidays)
        .service(import_csv);
}

#[derive(Debug, Serialize, Deserialize)]
struct CreateHoliday {
    organization_id: Uuid,
    name: String,
    date: NaiveDate,
    kind: HolidayKind,
    #[serde(default)]
    recurring: bool,
}

#[post("")]
async fn create_holiday(db: web::Data<DatabaseConnection>, admin: Admin, payload: web::Json<CreateHoliday>) -> impl Responder {
    let payload = payload.into_inner();

    // same organization + date + name is a duplicate, hand back the
    // existing row
    let existing = Holiday::find()
        .filter(holiday::Column::OrganizationId.eq(payload.organization_id))
        .filter(holiday::Column::Date.eq(payload.date))
        .filter(holiday::Column::Name.eq(&payload.name))
        .one(db.as_ref()).await.unwrap();

    if let Some(existing) = existing {
        return HttpResponse::Ok().json(web::Json(existing));
    }

    let record = Holiday::insert(holiday::ActiveModel {
        id: Set(Uuid::new_v4()),
        created_at: Set(Local::now().fixed_offset()),
        updated_at: Set(Local::now().fixed_offset()),
        created_by: Set(Some(admin.id)),
        updated_by: Set(Some(admin.id)),
        organization_id: Set(payload.organization_id),
        name: Set(payload.name),
        date: Set(payload.date),
        kind: Set(payload.kind),
        recurring: Set(payload.recurring),
    }).exec_with_returning(db.as_ref()).await.unwrap();

    HttpResponse::Created().json(web::Json(record))
}

#[derive(Debug, Deserialize)]
struct ListHolidays {
    organization_id: Uuid,
}

#[get("")]
async fn list_holidays(db: web::Data<DatabaseConnection>, _user: user::Model, query: web::Query<ListHolidays>) -> impl Responder {
    let holidays = Holiday::find()
        .filter(holiday::Column::OrganizationId.eq(query.organization_id))
        .order_by_asc(holiday::Column::Date)
        .all(db.as_ref()).await.unwrap();

    web::Json(holidays)
}

/// Duplicates are skipped and counted, never itemized; unparseable lines
/// were already dropped by the parser.
#[derive(Debug, Serialize, Deserialize)]
struct HolidayImportOutcome {
    added: usize,
    skipped: usize,
}

#[post("/import")]
async fn import_csv(db: web::Data<DatabaseConnection>, admin: Admin, query: web::Query<ListHolidays>, body: String) -> impl Responder {
    let rows = csv_io::parse_holiday_csv(&body);

    let mut outcome = HolidayImportOutcome { added: 0, skipped: 0 };

    for row in rows {
        let existing = Holiday::find()
            .filter(holiday::Column::OrganizationId.eq(query.organization_id))
            .filter(holiday::Column::Date.eq(row.date))
            .filter(holiday::Column::Name.eq(&row.name))
            .one(db.as_ref()).await.unwrap();

        if existing.is_some() {
            outcome.skipped += 1;
            continue;
        }

        Holiday::insert(holiday::ActiveModel {
            id: Set(Uuid::new_v4()),
            created_at: Set(Local::now().fixed_offset()),
            updated_at: Set(Local::now().fixed_offset()),
            created_by: Set(Some(admin.id)),
            updated_by: Set(Some(admin.id)),
            organization_id: Set(query.organization_id),
            name: Set(row.name),
            date: Set(row.date),
            kind: Set(row.kind),
            recurring: Set(row.recurring),
        }).exec(db.as_ref()).await.unwrap();

        outcome.added += 1;
    }

    HttpResponse::Ok().json(web::Json(outcome))
}
