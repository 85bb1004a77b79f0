//! Challenge endpoints: creation, participant association, accept /
//! cancel, per-player listings and result posting.

use actix_web::{get, post, web, HttpResponse};
use serde::Deserialize;
use serde_json::json;
use sqlx::PgPool;

use crate::db::challenge_repo;
use crate::db::result_repo::{self, ResultReport};
use crate::error::ApiError;
use crate::http::params::{self, FieldCheck};
use crate::metrics::RESULTS_POSTED;

//////////////////////////////////////////////////
// Requests
//////////////////////////////////////////////////

#[derive(Deserialize)]
pub struct CreateChallengeForm {
    pub clubname: Option<String>,
    pub date: Option<String>,
    pub time: Option<String>,
}

#[derive(Deserialize)]
pub struct ProposeForm {
    pub challengeid: Option<String>,
    pub playerid: Option<String>,
    pub opponentid: Option<String>,
}

#[derive(Deserialize)]
pub struct PostResultForm {
    pub challengeid: Option<String>,
    pub winnerid: Option<String>,
    pub loserid: Option<String>,
    pub score: Option<String>,
    pub winnerelo: Option<String>,
    pub loserelo: Option<String>,
    pub newhighestelo: Option<String>,
    pub hotstreak: Option<String>,
}

#[derive(Deserialize)]
pub struct PlayerQuery {
    pub playerid: Option<String>,
}

#[derive(Deserialize)]
pub struct ChallengeQuery {
    pub challengeid: Option<String>,
}

//////////////////////////////////////////////////
// Handlers
//////////////////////////////////////////////////

/// POST /api/create_challenge
#[post("/create_challenge")]
pub async fn create_challenge(
    form: web::Form<CreateChallengeForm>,
    db: web::Data<PgPool>,
) -> Result<HttpResponse, ApiError> {
    let mut check = FieldCheck::new();
    let clubname = check.take("clubname", &form.clubname);
    let date = check.take("date", &form.date);
    let time = check.take("time", &form.time);
    check.finish()?;

    let date = params::parse_epoch_date(date)?;
    let time = params::parse_time(time)?;

    let challengeid = challenge_repo::create(db.get_ref(), clubname, date, time).await?;
    Ok(HttpResponse::Ok().json(json!({
        "error": false,
        "message": "Challenge created",
        "challengeid": challengeid,
    })))
}

/// POST /api/create_player_challenge
#[post("/create_player_challenge")]
pub async fn create_player_challenge(
    form: web::Form<ProposeForm>,
    db: web::Data<PgPool>,
) -> Result<HttpResponse, ApiError> {
    let mut check = FieldCheck::new();
    let challengeid = check.take("challengeid", &form.challengeid);
    let playerid = check.take("playerid", &form.playerid);
    let opponentid = check.take("opponentid", &form.opponentid);
    check.finish()?;

    let challengeid = params::parse_id("challengeid", challengeid)?;
    let playerid = params::parse_id("playerid", playerid)?;
    let opponentid = params::parse_id("opponentid", opponentid)?;

    challenge_repo::propose(db.get_ref(), challengeid, playerid, opponentid).await?;
    Ok(HttpResponse::Ok().json(json!({
        "error": false,
        "message": "Challenge created",
    })))
}

/// GET /api/get_challenges?playerid=
#[get("/get_challenges")]
pub async fn get_challenges(
    query: web::Query<PlayerQuery>,
    db: web::Data<PgPool>,
) -> Result<HttpResponse, ApiError> {
    let mut check = FieldCheck::new();
    let playerid = check.take("playerid", &query.playerid);
    check.finish()?;
    let playerid = params::parse_id("playerid", playerid)?;

    let challenges = challenge_repo::active_for(db.get_ref(), playerid).await?;
    Ok(HttpResponse::Ok().json(json!({
        "error": false,
        "message": "Challenges retrieved",
        "challenges": challenges,
    })))
}

/// GET /api/get_match_history?playerid=
#[get("/get_match_history")]
pub async fn get_match_history(
    query: web::Query<PlayerQuery>,
    db: web::Data<PgPool>,
) -> Result<HttpResponse, ApiError> {
    let mut check = FieldCheck::new();
    let playerid = check.take("playerid", &query.playerid);
    check.finish()?;
    let playerid = params::parse_id("playerid", playerid)?;

    let challenges = challenge_repo::history_for(db.get_ref(), playerid).await?;
    Ok(HttpResponse::Ok().json(json!({
        "error": false,
        "message": "Match history retrieved",
        "challenges": challenges,
    })))
}

/// GET /api/accept_challenge?challengeid=
#[get("/accept_challenge")]
pub async fn accept_challenge(
    query: web::Query<ChallengeQuery>,
    db: web::Data<PgPool>,
) -> Result<HttpResponse, ApiError> {
    let mut check = FieldCheck::new();
    let challengeid = check.take("challengeid", &query.challengeid);
    check.finish()?;
    let challengeid = params::parse_id("challengeid", challengeid)?;

    challenge_repo::accept(db.get_ref(), challengeid).await?;
    Ok(HttpResponse::Ok().json(json!({
        "error": false,
        "message": "Challenge accepted",
    })))
}

/// GET /api/cancel_challenge?challengeid=
///
/// Decline and cancel share this endpoint: both remove the pending
/// challenge.
#[get("/cancel_challenge")]
pub async fn cancel_challenge(
    query: web::Query<ChallengeQuery>,
    db: web::Data<PgPool>,
) -> Result<HttpResponse, ApiError> {
    let mut check = FieldCheck::new();
    let challengeid = check.take("challengeid", &query.challengeid);
    check.finish()?;
    let challengeid = params::parse_id("challengeid", challengeid)?;

    challenge_repo::cancel(db.get_ref(), challengeid).await?;
    Ok(HttpResponse::Ok().json(json!({
        "error": false,
        "message": "Challenge cancelled",
    })))
}

/// POST /api/post_result
#[post("/post_result")]
pub async fn post_result(
    form: web::Form<PostResultForm>,
    db: web::Data<PgPool>,
) -> Result<HttpResponse, ApiError> {
    let mut check = FieldCheck::new();
    let challengeid = check.take("challengeid", &form.challengeid);
    let winnerid = check.take("winnerid", &form.winnerid);
    let loserid = check.take("loserid", &form.loserid);
    let score = check.take("score", &form.score);
    let winnerelo = check.take("winnerelo", &form.winnerelo);
    let loserelo = check.take("loserelo", &form.loserelo);
    let newhighestelo = check.take("newhighestelo", &form.newhighestelo);
    let hotstreak = check.take("hotstreak", &form.hotstreak);
    check.finish()?;

    let report = ResultReport {
        challengeid: params::parse_id("challengeid", challengeid)?,
        winnerid: params::parse_id("winnerid", winnerid)?,
        loserid: params::parse_id("loserid", loserid)?,
        score: score.to_string(),
        winnerelo: params::parse_elo("winnerelo", winnerelo)?,
        loserelo: params::parse_elo("loserelo", loserelo)?,
        newhighestelo: params::parse_elo("newhighestelo", newhighestelo)?,
        hotstreak: params::parse_flag("hotstreak", hotstreak)?,
    };

    result_repo::post_result(db.get_ref(), &report).await?;
    RESULTS_POSTED.inc();
    log::info!(
        "result posted for challenge {} (winner {})",
        report.challengeid,
        report.winnerid
    );

    Ok(HttpResponse::Ok().json(json!({
        "error": false,
        "message": "Result submitted",
    })))
}

//////////////////////////////////////////////////
// Mount
//////////////////////////////////////////////////

pub fn init_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(create_challenge)
        .service(create_player_challenge)
        .service(get_challenges)
        .service(get_match_history)
        .service(accept_challenge)
        .service(cancel_challenge)
        .service(post_result);
}
