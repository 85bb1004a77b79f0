//! Player signup, profile, ladder and achievement queries.
//!
//! Rating fields on the player row are read here but only ever written by
//! the result poster.

use sqlx::PgPool;

use crate::db::club_repo;
use crate::db::models::{Achievement, Player};
use crate::error::ApiError;

const PLAYER_COLUMNS: &str = "p.playerid, p.email, p.contactno, p.fname, p.lname, \
     c.name AS clubname, p.elo, p.winstreak, p.hotstreak, p.matchesplayed, \
     p.wins, p.losses, p.highestelo, p.clubchamp";

/// Insert a new player, resolving the human-facing club name to its id.
/// The password arrives already hashed. A duplicate email surfaces as
/// [`ApiError::Conflict`].
pub async fn create_player(
    db: &PgPool,
    email: &str,
    password_hash: &str,
    contactno: &str,
    fname: &str,
    lname: &str,
    club_name: &str,
) -> Result<i64, ApiError> {
    let clubid = club_repo::club_id_by_name(db, club_name).await?;

    let playerid = sqlx::query_scalar::<_, i64>(
        "INSERT INTO player (email, password, contactno, fname, lname, clubid) \
         VALUES ($1, $2, $3, $4, $5, $6) \
         RETURNING playerid",
    )
    .bind(email)
    .bind(password_hash)
    .bind(contactno)
    .bind(fname)
    .bind(lname)
    .bind(clubid)
    .fetch_one(db)
    .await
    .map_err(|e| ApiError::classify(e, "Email is already in use", "club"))?;

    Ok(playerid)
}

/// (playerid, stored password hash) for a login attempt, if the email is
/// registered.
pub async fn credentials_by_email(
    db: &PgPool,
    email: &str,
) -> Result<Option<(i64, String)>, ApiError> {
    Ok(
        sqlx::query_as::<_, (i64, String)>("SELECT playerid, password FROM player WHERE email = $1")
            .bind(email)
            .fetch_optional(db)
            .await?,
    )
}

/// Full player payload including earned achievement ids.
pub async fn player_by_id(db: &PgPool, playerid: i64) -> Result<Player, ApiError> {
    let mut player = sqlx::query_as::<_, Player>(&format!(
        "SELECT {PLAYER_COLUMNS} FROM player p \
         LEFT JOIN club c ON c.clubid = p.clubid \
         WHERE p.playerid = $1"
    ))
    .bind(playerid)
    .fetch_optional(db)
    .await?
    .ok_or(ApiError::NotFound("player"))?;

    player.achieved = achievements_for(db, player.playerid).await?;
    Ok(player)
}

/// Ladder roster: every player's profile and rating state, strongest
/// first, with achievements appended per player.
pub async fn ladder_profiles(db: &PgPool) -> Result<Vec<Player>, ApiError> {
    let mut players = sqlx::query_as::<_, Player>(&format!(
        "SELECT {PLAYER_COLUMNS} FROM player p \
         LEFT JOIN club c ON c.clubid = p.clubid \
         ORDER BY p.elo DESC, p.playerid"
    ))
    .fetch_all(db)
    .await?;

    for player in &mut players {
        player.achieved = achievements_for(db, player.playerid).await?;
    }
    Ok(players)
}

pub async fn delete_player(db: &PgPool, playerid: i64) -> Result<(), ApiError> {
    let rows = sqlx::query("DELETE FROM player WHERE playerid = $1")
        .bind(playerid)
        .execute(db)
        .await?
        .rows_affected();

    if rows == 0 {
        return Err(ApiError::NotFound("player"));
    }
    Ok(())
}

/// The achievement catalogue.
pub async fn achievement_list(db: &PgPool) -> Result<Vec<Achievement>, ApiError> {
    let achievements = sqlx::query_as::<_, Achievement>(
        "SELECT achievementid, name AS achievementname, description AS achievementdescription \
         FROM achievement ORDER BY achievementid",
    )
    .fetch_all(db)
    .await?;
    Ok(achievements)
}

/// Ids of the achievements a player has earned.
pub async fn achievements_for(db: &PgPool, playerid: i64) -> Result<Vec<i64>, ApiError> {
    Ok(sqlx::query_scalar::<_, i64>(
        "SELECT achievementid FROM player_achievement WHERE playerid = $1 ORDER BY achievementid",
    )
    .bind(playerid)
    .fetch_all(db)
    .await?)
}

pub async fn post_achievement(db: &PgPool, achievementid: i64, playerid: i64) -> Result<(), ApiError> {
    sqlx::query("INSERT INTO player_achievement (achievementid, playerid) VALUES ($1, $2)")
        .bind(achievementid)
        .bind(playerid)
        .execute(db)
        .await
        .map_err(|e| ApiError::classify(e, "Achievement already awarded", "achievement or player"))?;
    Ok(())
}
