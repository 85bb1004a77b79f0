//! Login endpoint. Credential verification itself lives in
//! [`crate::auth`]; a successful login returns the player payload plus
//! the achievement catalogue the client needs for its session.

use actix_web::{post, web, HttpResponse};
use serde::Deserialize;
use serde_json::json;
use sqlx::PgPool;

use crate::auth;
use crate::db::player_repo;
use crate::error::ApiError;
use crate::http::params::FieldCheck;

#[derive(Deserialize)]
pub struct LoginForm {
    pub email: Option<String>,
    pub password: Option<String>,
}

/// POST /api/login
#[post("/login")]
pub async fn login(
    form: web::Form<LoginForm>,
    db: web::Data<PgPool>,
) -> Result<HttpResponse, ApiError> {
    let mut check = FieldCheck::new();
    let email = check.take("email", &form.email);
    let password = check.take("password", &form.password);
    check.finish()?;

    let Some((playerid, stored)) = player_repo::credentials_by_email(db.get_ref(), email).await?
    else {
        return Err(ApiError::Unauthorized);
    };
    if !auth::verify_password(password, &stored) {
        return Err(ApiError::Unauthorized);
    }

    let player = player_repo::player_by_id(db.get_ref(), playerid).await?;
    let achievements = player_repo::achievement_list(db.get_ref()).await?;

    Ok(HttpResponse::Ok().json(json!({
        "error": false,
        "message": "Login successful",
        "player": player,
        "achievements": achievements,
    })))
}

pub fn init_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(login);
}
