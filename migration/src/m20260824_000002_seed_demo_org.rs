use sea_orm_migration::prelude::*;
use sha2::Digest as _;

use crate::m20260823_000001_init::{Employee, Organization, User};

#[derive(DeriveMigrationName)]
pub struct Migration;

const ORG_ID: u128 = 0xA0;
const ADMIN_ID: u128 = 12345;

fn default_schedule_json() -> String {
    let workday = r#"{"timeIn":"09:00","timeOut":"18:00","isWorkday":true}"#;
    let rest_day = r#"{"timeIn":"","timeOut":"","isWorkday":false}"#;

    format!(
        r#"{{"monday":{workday},"tuesday":{workday},"wednesday":{workday},"thursday":{workday},"friday":{workday},"saturday":{rest_day},"sunday":{rest_day}}}"#
    )
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let time = Expr::val("2026-08-24T03:15:00.000Z").cast_as("timestamptz");
        let org_id = Expr::val(format!("{:032x}", ORG_ID)).cast_as("uuid");

        // organization with partially configured payroll settings; the
        // unset rates fall through to the hardcoded defaults
        manager
            .exec_stmt(Query::insert()
                .into_table(Organization::Table)
                .columns(["id", "created_at", "updated_at", "name", "payroll_settings", "departments", "leave_types"])
                .values_panic([
                    org_id.clone(),
                    time.clone(),
                    time.clone(),
                    "Acme Manufacturing PH".into(),
                    Expr::val(r#"{"nightDiffPercent":0.1,"overtimeRegularRate":1.25,"proratedLeave":false}"#).cast_as("jsonb"),
                    Expr::val(r#"["Engineering","Finance","Operations"]"#).cast_as("jsonb"),
                    Expr::val(r#"["vacation","sick"]"#).cast_as("jsonb"),
                ])
                .to_owned()
        ).await.unwrap();

        let hashed_password = &sha2::Sha256::digest("admin:admin")[..];

        manager
            .exec_stmt(Query::insert()
                .into_table(User::Table)
                .columns(["id", "created_at", "updated_at", "organization_id", "username", "password", "role"])
                .values_panic([
                    Expr::val(format!("{:032x}", ADMIN_ID)).cast_as("uuid"),
                    time.clone(),
                    time.clone(),
                    org_id.clone(),
                    "admin".into(),
                    hashed_password.into(),
                    Expr::val("admin").cast_as("role_type"),
                ])
                .to_owned()
        ).await.unwrap();

        let first_names = ["Juan", "Maria", "Jose", "Ana", "Leo", "Carmen", "Ramon", "Luz", "Tomas", "Elena"];
        let last_names = ["Dela Cruz", "Santos", "Reyes", "Garcia", "Mendoza"];
        let departments = ["Engineering", "Finance", "Operations"];

        // 25 demo employees on the default Monday-Friday schedule
        for i in 1..=25u128 {
            let index = i as usize;
            let salary: f64 = rand::random_range(18_000..=60_000) as f64;

            manager
                .exec_stmt(Query::insert()
                    .into_table(Employee::Table)
                    .columns([
                        "id", "created_at", "updated_at", "organization_id",
                        "first_name", "last_name", "email", "position", "department",
                        "employment_type", "hire_date", "basic_salary", "salary_type",
                        "default_schedule",
                    ])
                    .values_panic([
                        Expr::val(format!("{:032x}", 0xE000 + i)).cast_as("uuid"),
                        time.clone(),
                        time.clone(),
                        org_id.clone(),
                        first_names[index % first_names.len()].into(),
                        last_names[index % last_names.len()].into(),
                        format!("employee{i}@acme.example.com").into(),
                        "Staff".into(),
                        departments[index % departments.len()].into(),
                        "regular".into(),
                        Expr::val("2025-01-15").cast_as("date"),
                        salary.into(),
                        Expr::val("monthly").cast_as("salary_type"),
                        Expr::val(default_schedule_json()).cast_as("jsonb"),
                    ])
                    .to_owned()
            ).await.unwrap();
        }

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        for i in 1..=25u128 {
            manager
                .exec_stmt(Query::delete()
                    .from_table(Employee::Table)
                    .and_where(Expr::col("id").eq(Expr::val(format!("{:032x}", 0xE000 + i)).cast_as("uuid")))
                    .to_owned()
            ).await.unwrap();
        }

        manager
            .exec_stmt(Query::delete()
                .from_table(User::Table)
                .and_where(Expr::col("id").eq(Expr::val(format!("{:032x}", ADMIN_ID)).cast_as("uuid")))
                .to_owned()
        ).await.unwrap();

        manager
            .exec_stmt(Query::delete()
                .from_table(Organization::Table)
                .and_where(Expr::col("id").eq(Expr::val(format!("{:032x}", ORG_ID)).cast_as("uuid")))
                .to_owned()
        ).await.unwrap();

        Ok(())
    }
}
