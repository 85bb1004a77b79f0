//! Challenge lifecycle: creation, the two-sided participant association,
//! acceptance, cancellation and the per-player listings.
//!
//! A challenge moves Proposed → Accepted → Scored; cancel/decline remove
//! the rows outright. Scored is terminal (enforced by the result poster).

use chrono::{NaiveDate, NaiveTime};
use sqlx::PgPool;

use crate::config::settings;
use crate::db::club_repo;
use crate::db::models::{ActiveChallenge, MatchRecord};
use crate::error::ApiError;
use crate::rating::types::MatchOutcome;

/// Insert a pending challenge and return its store-assigned id.
/// RETURNING hands the id back atomically; reading back the newest row
/// would race under concurrent creation.
pub async fn create(
    db: &PgPool,
    club_name: &str,
    date: NaiveDate,
    time: NaiveTime,
) -> Result<i64, ApiError> {
    let clubid = club_repo::club_id_by_name(db, club_name).await?;

    let challengeid = sqlx::query_scalar::<_, i64>(
        "INSERT INTO challenge (clubid, date, time) VALUES ($1, $2, $3) RETURNING challengeid",
    )
    .bind(clubid)
    .bind(date)
    .bind(time)
    .fetch_one(db)
    .await?;

    Ok(challengeid)
}

/// Record both participants of a challenge: the initiator and the
/// opponent, each unresolved. Both rows land in one transaction so a
/// half-proposed challenge can never persist.
pub async fn propose(
    db: &PgPool,
    challengeid: i64,
    playerid: i64,
    opponentid: i64,
) -> Result<(), ApiError> {
    if playerid == opponentid {
        return Err(ApiError::Validation(
            "a player cannot challenge themselves".into(),
        ));
    }

    let mut tx = db.begin().await?;

    for (pid, initiates) in [(playerid, true), (opponentid, false)] {
        let res = sqlx::query(
            "INSERT INTO player_challenge (challengeid, playerid, didinitiate, didwin) \
             VALUES ($1, $2, $3, $4)",
        )
        .bind(challengeid)
        .bind(pid)
        .bind(initiates)
        .bind(MatchOutcome::Unresolved.raw())
        .execute(&mut *tx)
        .await;

        if let Err(e) = res {
            tx.rollback().await.ok();
            return Err(ApiError::classify(
                e,
                "challenge already has participants",
                "challenge or player",
            ));
        }
    }

    tx.commit().await.map_err(ApiError::Transaction)?;
    Ok(())
}

/// Mark a challenge accepted. Accepting an already-accepted challenge is
/// a harmless no-op; an unknown id is NotFound.
pub async fn accept(db: &PgPool, challengeid: i64) -> Result<(), ApiError> {
    let rows = sqlx::query("UPDATE challenge SET accepted = TRUE WHERE challengeid = $1")
        .bind(challengeid)
        .execute(db)
        .await?
        .rows_affected();

    if rows == 0 {
        return Err(ApiError::NotFound("challenge"));
    }
    Ok(())
}

/// Remove a pending challenge. Cancel and decline are the same
/// operation: association rows go first, then the parent row.
pub async fn cancel(db: &PgPool, challengeid: i64) -> Result<(), ApiError> {
    let mut tx = db.begin().await?;

    sqlx::query("DELETE FROM player_challenge WHERE challengeid = $1")
        .bind(challengeid)
        .execute(&mut *tx)
        .await
        .map_err(ApiError::Transaction)?;

    let rows = sqlx::query("DELETE FROM challenge WHERE challengeid = $1")
        .bind(challengeid)
        .execute(&mut *tx)
        .await
        .map_err(ApiError::Transaction)?
        .rows_affected();

    if rows == 0 {
        tx.rollback().await.ok();
        return Err(ApiError::NotFound("challenge"));
    }

    tx.commit().await.map_err(ApiError::Transaction)?;
    Ok(())
}

/// Unresolved challenges for a player, joined with the opponent (the
/// other participant row of the same challenge) and challenge metadata.
pub async fn active_for(db: &PgPool, playerid: i64) -> Result<Vec<ActiveChallenge>, ApiError> {
    let rows = sqlx::query_as::<_, ActiveChallenge>(
        "SELECT c.challengeid, \
                pc.didinitiate, \
                o.playerid AS opponentid, \
                o.fname, \
                o.lname, \
                cl.name AS clubname, \
                c.date, \
                c.time, \
                c.accepted \
           FROM player_challenge pc \
           JOIN player_challenge oc \
             ON oc.challengeid = pc.challengeid AND oc.playerid <> pc.playerid \
           JOIN player o ON o.playerid = oc.playerid \
           JOIN challenge c ON c.challengeid = pc.challengeid \
           JOIN club cl ON cl.clubid = c.clubid \
          WHERE pc.playerid = $1 AND pc.didwin = $2 \
          ORDER BY c.date, c.time \
          LIMIT $3",
    )
    .bind(playerid)
    .bind(MatchOutcome::Unresolved.raw())
    .bind(settings().history_limit)
    .fetch_all(db)
    .await?;

    Ok(rows)
}

/// Completed matches for a player: resolved outcome, opponent, date and
/// reported score.
pub async fn history_for(db: &PgPool, playerid: i64) -> Result<Vec<MatchRecord>, ApiError> {
    let rows = sqlx::query_as::<_, MatchRecord>(
        "SELECT c.challengeid, \
                pc.didwin, \
                o.playerid AS opponentid, \
                o.fname, \
                o.lname, \
                c.date, \
                c.score \
           FROM player_challenge pc \
           JOIN player_challenge oc \
             ON oc.challengeid = pc.challengeid AND oc.playerid <> pc.playerid \
           JOIN player o ON o.playerid = oc.playerid \
           JOIN challenge c ON c.challengeid = pc.challengeid \
          WHERE pc.playerid = $1 AND pc.didwin <> $2 \
          ORDER BY c.date DESC, c.challengeid DESC \
          LIMIT $3",
    )
    .bind(playerid)
    .bind(MatchOutcome::Unresolved.raw())
    .bind(settings().history_limit)
    .fetch_all(db)
    .await?;

    Ok(rows)
}
