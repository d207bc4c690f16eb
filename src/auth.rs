use std::ops::Deref;

use actix_web::{body, dev, http::{self, header::ContentType, StatusCode}, web, FromRequest, HttpRequest, HttpResponse};
use chrono::{Duration, Local};
use futures_util::future::LocalBoxFuture;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::entity::{sea_orm_active_enums::RoleType, user};

/// Signs and verifies the bearer tokens the UI sends on every call. The
/// token embeds the whole user row, organization id included, so handlers
/// never look the caller up again.
pub struct Authority {
    jwt_key: (EncodingKey, DecodingKey),
}

impl Authority {
    pub fn new(jwt_key: &[u8]) -> Self {
        Self {
            jwt_key: (EncodingKey::from_secret(jwt_key), DecodingKey::from_secret(jwt_key)),
        }
    }

    /// Week-long token for the given user.
    pub fn issue_for(&self, user: &user::Model) -> String {
        let claims = Claims {
            exp: (Local::now() + Duration::weeks(1)).timestamp(),
            data: user,
        };

        encode(&Header::default(), &claims, &self.jwt_key.0).expect("user model serializes to claims")
    }

    pub fn authorize(&self, token: impl AsRef<str>) -> Result<user::Model, AuthError> {
        let payload = decode::<Claims<user::Model>>(token.as_ref(), &self.jwt_key.1, &Validation::default())?;

        Ok(payload.claims.data)
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct Claims<T> {
    exp: i64,
    data: T,
}

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("missing bearer token")]
    MissingToken,
    #[error("invalid or expired token")]
    BadToken(#[from] jsonwebtoken::errors::Error),
}

impl actix_web::error::ResponseError for AuthError {
    fn error_response(&self) -> HttpResponse<body::BoxBody> {
        HttpResponse::build(self.status_code())
            .insert_header(ContentType::plaintext())
            .body(self.to_string())
    }

    fn status_code(&self) -> http::StatusCode {
        match self {
            AuthError::MissingToken => StatusCode::UNAUTHORIZED,
            AuthError::BadToken(_) => StatusCode::FORBIDDEN,
        }
    }
}

impl FromRequest for user::Model {
    type Error = actix_web::Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut dev::Payload) -> Self::Future {
        let req = req.clone();

        Box::pin(async move {
            // `Authorization: JWT <token>`
            let token = req
                .headers()
                .get("Authorization")
                .and_then(|value| value.to_str().ok())
                .and_then(|value| value.split_once(' '))
                .map(|(_, token)| token)
                .ok_or(AuthError::MissingToken)?;

            let authority = req.app_data::<web::Data<Authority>>().expect("Authority must be attached");
            let user = authority.authorize(token)?;

            Ok(user)
        })
    }
}

/// Rejects non-admin callers with 403. All write endpoints outside an
/// employee's own attendance take this.
pub struct Admin(pub user::Model);

impl Deref for Admin {
    type Target = user::Model;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl FromRequest for Admin {
    type Error = actix_web::Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut dev::Payload) -> Self::Future {
        let req = req.clone();

        Box::pin(async move {
            let user = user::Model::from_request(&req, &mut dev::Payload::None).await?;

            if user.role != RoleType::Admin {
                return Err(actix_web::error::ErrorForbidden("forbidden"));
            }

            Ok(Self(user))
        })
    }
}

#[cfg(test)]
mod tests {
    use actix_web::{get, test, App, Responder};
    use uuid::Uuid;

    use super::*;

    pub(crate) fn user_fixture(role: RoleType) -> user::Model {
        user::Model {
            id: Uuid::new_v4(),
            created_at: Local::now().into(),
            updated_at: Local::now().into(),
            organization_id: Uuid::new_v4(),
            username: "maria".to_string(),
            password: Vec::new(),
            role,
        }
    }

    #[actix_web::test]
    async fn test_issue_and_authorize() {
        let authority = Authority::new(b"secret");
        let user = user_fixture(RoleType::Employee);

        let token = authority.issue_for(&user);

        let authorized = authority.authorize(token).expect("token round-trips");
        assert_eq!(authorized, user);
    }

    #[actix_web::test]
    async fn test_user_extractor() {
        let secret = b"secret";

        #[get("/")]
        async fn test_handler(user: user::Model) -> impl Responder {
            user.id.to_string()
        }

        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(Authority::new(secret)))
                .service(test_handler),
        )
        .await;

        let no_token = test::TestRequest::default().uri("/").to_request();
        let response = test::call_service(&app, no_token).await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let garbage = test::TestRequest::default()
            .uri("/")
            .insert_header(("Authorization", "JWT nonsense"))
            .to_request();
        let response = test::call_service(&app, garbage).await;
        assert_eq!(response.status(), StatusCode::FORBIDDEN);

        let token = Authority::new(secret).issue_for(&user_fixture(RoleType::Employee));
        let authorized = test::TestRequest::default()
            .uri("/")
            .insert_header(("Authorization", format!("JWT {token}")))
            .to_request();
        let response = test::call_service(&app, authorized).await;
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[actix_web::test]
    async fn test_admin_extractor() {
        let secret = b"secret";

        #[get("/")]
        async fn test_handler(user: Admin) -> impl Responder {
            assert_eq!(user.role, RoleType::Admin);

            ""
        }

        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(Authority::new(secret)))
                .service(test_handler),
        )
        .await;

        let admin_token = Authority::new(secret).issue_for(&user_fixture(RoleType::Admin));
        let request = test::TestRequest::default()
            .insert_header(("Authorization", format!("JWT {admin_token}")))
            .to_request();
        let response = test::call_service(&app, request).await;
        assert_eq!(response.status(), StatusCode::OK);

        let employee_token = Authority::new(secret).issue_for(&user_fixture(RoleType::Employee));
        let request = test::TestRequest::default()
            .insert_header(("Authorization", format!("JWT {employee_token}")))
            .to_request();
        let response = test::call_service(&app, request).await;
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }
}
