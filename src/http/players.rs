//! Player signup, profile fetch and deletion.

use actix_web::{get, post, web, HttpResponse};
use serde::Deserialize;
use serde_json::json;
use sqlx::PgPool;

use crate::auth;
use crate::db::player_repo;
use crate::error::ApiError;
use crate::http::params::{self, FieldCheck};

#[derive(Deserialize)]
pub struct SignupForm {
    pub email: Option<String>,
    pub password: Option<String>,
    pub contactno: Option<String>,
    pub fname: Option<String>,
    pub lname: Option<String>,
    pub clubname: Option<String>,
}

#[derive(Deserialize)]
pub struct PlayerQuery {
    pub playerid: Option<String>,
}

/// POST /api/create_player
#[post("/create_player")]
pub async fn create_player(
    form: web::Form<SignupForm>,
    db: web::Data<PgPool>,
) -> Result<HttpResponse, ApiError> {
    let mut check = FieldCheck::new();
    let email = check.take("email", &form.email);
    let password = check.take("password", &form.password);
    let contactno = check.take("contactno", &form.contactno);
    let fname = check.take("fname", &form.fname);
    let lname = check.take("lname", &form.lname);
    let clubname = check.take("clubname", &form.clubname);
    check.finish()?;

    let hash = auth::hash_password(password)?;
    let playerid =
        player_repo::create_player(db.get_ref(), email, &hash, contactno, fname, lname, clubname)
            .await?;
    log::info!("player {playerid} created");

    Ok(HttpResponse::Ok().json(json!({
        "error": false,
        "message": "Player created",
    })))
}

/// GET /api/get_player_data?playerid=
#[get("/get_player_data")]
pub async fn get_player_data(
    query: web::Query<PlayerQuery>,
    db: web::Data<PgPool>,
) -> Result<HttpResponse, ApiError> {
    let mut check = FieldCheck::new();
    let playerid = check.take("playerid", &query.playerid);
    check.finish()?;
    let playerid = params::parse_id("playerid", playerid)?;

    let player = player_repo::player_by_id(db.get_ref(), playerid).await?;
    Ok(HttpResponse::Ok().json(json!({
        "error": false,
        "message": "Player data retrieved",
        "player": player,
    })))
}

/// GET /api/delete_player?playerid=
#[get("/delete_player")]
pub async fn delete_player(
    query: web::Query<PlayerQuery>,
    db: web::Data<PgPool>,
) -> Result<HttpResponse, ApiError> {
    let mut check = FieldCheck::new();
    let playerid = check.take("playerid", &query.playerid);
    check.finish()?;
    let playerid = params::parse_id("playerid", playerid)?;

    player_repo::delete_player(db.get_ref(), playerid).await?;
    Ok(HttpResponse::Ok().json(json!({
        "error": false,
        "message": "Player deleted",
    })))
}

pub fn init_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(create_player)
        .service(get_player_data)
        .service(delete_player);
}
