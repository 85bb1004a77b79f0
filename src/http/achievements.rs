//! Achievement catalogue and awards.

use actix_web::{get, post, web, HttpResponse};
use serde::Deserialize;
use serde_json::json;
use sqlx::PgPool;

use crate::db::player_repo;
use crate::error::ApiError;
use crate::http::params::{self, FieldCheck};

#[derive(Deserialize)]
pub struct AwardForm {
    pub achievementid: Option<String>,
    pub playerid: Option<String>,
}

/// GET /api/get_achievements
#[get("/get_achievements")]
pub async fn get_achievements(db: web::Data<PgPool>) -> Result<HttpResponse, ApiError> {
    let achievements = player_repo::achievement_list(db.get_ref()).await?;
    Ok(HttpResponse::Ok().json(json!({
        "error": false,
        "message": "Achievement data retrieved",
        "achievements": achievements,
    })))
}

/// POST /api/post_achievement
#[post("/post_achievement")]
pub async fn post_achievement(
    form: web::Form<AwardForm>,
    db: web::Data<PgPool>,
) -> Result<HttpResponse, ApiError> {
    let mut check = FieldCheck::new();
    let achievementid = check.take("achievementid", &form.achievementid);
    let playerid = check.take("playerid", &form.playerid);
    check.finish()?;

    let achievementid = params::parse_id("achievementid", achievementid)?;
    let playerid = params::parse_id("playerid", playerid)?;

    player_repo::post_achievement(db.get_ref(), achievementid, playerid).await?;
    Ok(HttpResponse::Ok().json(json!({
        "error": false,
        "message": "Achievement posted",
    })))
}

pub fn init_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(get_achievements).service(post_achievement);
}
