//! Ladder roster for the app's main fragment.

use actix_web::{get, web, HttpResponse};
use serde_json::json;
use sqlx::PgPool;

use crate::db::player_repo;
use crate::error::ApiError;

/// GET /api/get_ladder_profile_data
#[get("/get_ladder_profile_data")]
pub async fn get_ladder_profile_data(db: web::Data<PgPool>) -> Result<HttpResponse, ApiError> {
    let players = player_repo::ladder_profiles(db.get_ref()).await?;
    Ok(HttpResponse::Ok().json(json!({
        "error": false,
        "message": "Ladder data retrieved",
        "players": players,
    })))
}

pub fn init_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(get_ladder_profile_data);
}
