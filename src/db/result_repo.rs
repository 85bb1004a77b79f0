//! Result poster: closes a challenge and applies both rating updates in
//! a single transaction.

use sqlx::{PgConnection, PgPool};

use crate::db::rating_repo;
use crate::error::ApiError;
use crate::rating::champion::{champion_verdict, top_rival};
use crate::rating::types::MatchOutcome;

/// A finished match ready to be recorded. The post-match ratings arrive
/// pre-computed; this module owns sequencing and atomicity, not the Elo
/// formula.
#[derive(Debug, Clone)]
pub struct ResultReport {
    pub challengeid: i64,
    pub winnerid: i64,
    pub loserid: i64,
    pub score: String,
    pub winnerelo: i32,
    pub loserelo: i32,
    pub newhighestelo: i32,
    pub hotstreak: bool,
}

/// Record a result: score, both participant outcomes, winner and loser
/// rating rows, and the club-champion handover. All five mutations
/// commit together or not at all.
pub async fn post_result(db: &PgPool, report: &ResultReport) -> Result<(), ApiError> {
    if report.winnerid == report.loserid {
        return Err(ApiError::Validation("winner and loser must differ".into()));
    }

    let mut tx = db.begin().await?;

    // Lock both rating rows in ascending playerid order so two posts
    // touching the same players queue instead of deadlocking.
    let players = sqlx::query_as::<_, (i64, Option<i64>, bool)>(
        "SELECT playerid, clubid, clubchamp FROM player \
          WHERE playerid = ANY($1) \
          ORDER BY playerid \
            FOR UPDATE",
    )
    .bind(vec![report.winnerid, report.loserid])
    .fetch_all(&mut *tx)
    .await?;

    if players.len() != 2 {
        tx.rollback().await.ok();
        return Err(ApiError::NotFound("player"));
    }
    let Some(&(_, winner_clubid, winner_was_champ)) = players
        .iter()
        .find(|(playerid, _, _)| *playerid == report.winnerid)
    else {
        tx.rollback().await.ok();
        return Err(ApiError::NotFound("player"));
    };

    // Claim the challenge. A score that is already set means the
    // challenge reached its terminal state and can never be re-scored;
    // this is also what serialises two simultaneous posts down to one.
    let existing = sqlx::query_scalar::<_, Option<String>>(
        "SELECT score FROM challenge WHERE challengeid = $1 FOR UPDATE",
    )
    .bind(report.challengeid)
    .fetch_optional(&mut *tx)
    .await?;

    match existing {
        None => {
            tx.rollback().await.ok();
            return Err(ApiError::NotFound("challenge"));
        }
        Some(Some(_)) => {
            tx.rollback().await.ok();
            return Err(ApiError::Conflict(
                "result already posted for this challenge".into(),
            ));
        }
        Some(None) => {}
    }

    // 1) the reported score
    sqlx::query("UPDATE challenge SET score = $1 WHERE challengeid = $2")
        .bind(&report.score)
        .bind(report.challengeid)
        .execute(&mut *tx)
        .await
        .map_err(ApiError::Transaction)?;

    // 2) + 3) resolve both participant rows
    set_outcome(&mut tx, report.challengeid, report.winnerid, MatchOutcome::Won).await?;
    set_outcome(&mut tx, report.challengeid, report.loserid, MatchOutcome::Lost).await?;

    // Champion verdict runs on the pre-update elo of the other club
    // members. No club mates at all means the winner takes the flag
    // unopposed; the prior champion is cleared by identity.
    let mut clubchamp = winner_was_champ;
    if let Some(clubid) = winner_clubid {
        let rivals = rating_repo::club_rivals(&mut tx, clubid, report.winnerid).await?;
        if champion_verdict(report.winnerelo, top_rival(&rivals)) {
            if let Some(prior) = rating_repo::current_champion(&mut tx, clubid).await? {
                if prior != report.winnerid {
                    rating_repo::clear_champion(&mut tx, prior).await?;
                }
            }
            clubchamp = true;
        }
    }

    // 4) + 5) rating rows
    let rows = rating_repo::apply_winner(
        &mut tx,
        report.winnerid,
        report.winnerelo,
        report.newhighestelo,
        report.hotstreak,
        clubchamp,
    )
    .await?;
    if rows != 1 {
        tx.rollback().await.ok();
        return Err(ApiError::NotFound("player"));
    }

    let rows = rating_repo::apply_loser(&mut tx, report.loserid, report.loserelo).await?;
    if rows != 1 {
        tx.rollback().await.ok();
        return Err(ApiError::NotFound("player"));
    }

    tx.commit().await.map_err(ApiError::Transaction)?;
    Ok(())
}

/// Resolve one participant row; zero rows affected means the player is
/// not part of the challenge and the whole post must roll back.
async fn set_outcome(
    conn: &mut PgConnection,
    challengeid: i64,
    playerid: i64,
    outcome: MatchOutcome,
) -> Result<(), ApiError> {
    let rows = sqlx::query(
        "UPDATE player_challenge SET didwin = $1 WHERE challengeid = $2 AND playerid = $3",
    )
    .bind(outcome.raw())
    .bind(challengeid)
    .bind(playerid)
    .execute(&mut *conn)
    .await
    .map_err(ApiError::Transaction)?
    .rows_affected();

    if rows == 0 {
        return Err(ApiError::NotFound("challenge participant"));
    }
    Ok(())
}
