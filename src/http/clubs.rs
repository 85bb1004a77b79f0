//! Club listing and creation.

use actix_web::{get, post, web, HttpResponse};
use serde::Deserialize;
use serde_json::json;
use sqlx::PgPool;

use crate::db::club_repo;
use crate::error::ApiError;
use crate::http::params::FieldCheck;

#[derive(Deserialize)]
pub struct CreateClubForm {
    pub name: Option<String>,
    pub address: Option<String>,
}

/// GET /api/get_clubs
#[get("/get_clubs")]
pub async fn get_clubs(db: web::Data<PgPool>) -> Result<HttpResponse, ApiError> {
    let clubs = club_repo::club_names(db.get_ref()).await?;
    Ok(HttpResponse::Ok().json(json!({
        "error": false,
        "message": "Club data retrieved",
        "clubs": clubs,
    })))
}

/// POST /api/create_club
#[post("/create_club")]
pub async fn create_club(
    form: web::Form<CreateClubForm>,
    db: web::Data<PgPool>,
) -> Result<HttpResponse, ApiError> {
    let mut check = FieldCheck::new();
    let name = check.take("name", &form.name);
    let address = check.take("address", &form.address);
    check.finish()?;

    club_repo::create_club(db.get_ref(), name, address).await?;
    Ok(HttpResponse::Ok().json(json!({
        "error": false,
        "message": "Club created",
    })))
}

pub fn init_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(get_clubs).service(create_club);
}
