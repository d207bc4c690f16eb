use std::ops::Deref;

use super::*;

impl FromRequest for payroll_run::Model {
    type Error = actix_web::Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut dev::Payload) -> Self::Future {
        let req = req.clone();

        Box::pin(async move {
            let run_id = req.match_info().get("run_id").expect("This extractor must be used under `run_id` path");
            let Ok(run_id) = Uuid::from_str(run_id) else {
                return Err(actix_web::error::ErrorBadRequest("invalid `run_id`"));
            };

            let db = req.app_data::<web::Data<DatabaseConnection>>().expect("DatabaseConnection must be attached");

            let Some(run) = PayrollRun::find_by_id(run_id)
                .one(db.as_ref()).await.unwrap()
            else {
                return Err(actix_web::error::ErrorNotFound("payroll run not found"));
            };

            Ok(run)
        })
    }
}

/// A run that is still a draft: payslips may be computed and edited.
pub(super) struct DraftRun(pub(super) payroll_run::Model);

impl Deref for DraftRun {
    type Target = payroll_run::Model;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl FromRequest for DraftRun {
    type Error = actix_web::Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut dev::Payload) -> Self::Future {
        let req = req.clone();

        Box::pin(async move {
            let run = payroll_run::Model::from_request(&req, &mut dev::Payload::None).await?;

            if run.status != RunStatus::Draft {
                return Err(actix_web::error::ErrorBadRequest("payroll run is no longer a draft"));
            }

            Ok(Self(run))
        })
    }
}

#[cfg(test)]
mod tests {
    use actix_web::{http::StatusCode, test, App};
    use chrono::{Local, NaiveDate};
    use sea_orm::{DatabaseBackend, MockDatabase};

    use crate::auth::Authority;
    use crate::entity::payroll_run::{GovernmentDeductions, UuidList};
    use crate::entity::sea_orm_active_enums::RoleType;
    use crate::entity::user;

    use super::*;

    fn user_fixture() -> user::Model {
        user::Model {
            id: Uuid::new_v4(),
            created_at: Local::now().into(),
            updated_at: Local::now().into(),
            organization_id: Uuid::new_v4(),
            username: "admin".to_string(),
            password: Vec::new(),
            role: RoleType::Admin,
        }
    }

    fn run_fixture(status: RunStatus) -> payroll_run::Model {
        payroll_run::Model {
            id: Uuid::new_v4(),
            created_at: Local::now().into(),
            updated_at: Local::now().into(),
            created_by: None,
            updated_by: None,
            organization_id: Uuid::new_v4(),
            cutoff_start: NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
            cutoff_end: NaiveDate::from_ymd_opt(2024, 6, 15).unwrap(),
            employee_ids: UuidList(vec![Uuid::new_v4()]),
            deductions_enabled: true,
            government_deductions: GovernmentDeductions::default(),
            status,
        }
    }

    #[actix_web::test]
    async fn test_run_extractor() {
        #[get("/{run_id}")]
        async fn test_handler(run: payroll_run::Model) -> impl Responder {
            web::Json(run)
        }

        let secret = b"secret";
        let user = user_fixture();
        let run = run_fixture(RunStatus::Draft);

        let token = Authority::new(secret).issue_for(&user);

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([
                vec![ run.clone() ],
            ]);

        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(Authority::new(secret)))
                .app_data(web::Data::new(db.into_connection()))
                .service(test_handler)
        ).await;

        let req = test::TestRequest::default()
            .uri(&format!("/{}", run.id))
            .insert_header(("Authorization", format!("JWT {token}")))
            .to_request();

        let returned_run: payroll_run::Model = test::call_and_read_body_json(&app, req).await;
        assert_eq!(returned_run, run);
    }

    #[actix_web::test]
    async fn test_draft_run_extractor() {
        #[get("/{run_id}")]
        async fn test_handler(run: DraftRun) -> impl Responder {
            web::Json(run.0)
        }

        let secret = b"secret";
        let user = user_fixture();
        let draft_run = run_fixture(RunStatus::Draft);
        let paid_run = run_fixture(RunStatus::Paid);

        let token = Authority::new(secret).issue_for(&user);

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([
                vec![ draft_run.clone() ],
                vec![ paid_run.clone() ],
            ]);

        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(Authority::new(secret)))
                .app_data(web::Data::new(db.into_connection()))
                .service(test_handler)
        ).await;

        let req = test::TestRequest::default()
            .uri(&format!("/{}", draft_run.id))
            .insert_header(("Authorization", format!("JWT {token}")))
            .to_request();

        let returned_run: payroll_run::Model = test::call_and_read_body_json(&app, req).await;
        assert_eq!(returned_run, draft_run);

        let req = test::TestRequest::default()
            .uri(&format!("/{}", paid_run.id))
            .insert_header(("Authorization", format!("JWT {token}")))
            .to_request();

        let response = test::call_service(&app, req).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
