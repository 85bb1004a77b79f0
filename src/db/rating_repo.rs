//! Rating ledger helpers. All functions run on a caller-supplied
//! connection so the result poster can keep them inside one transaction.

use sqlx::PgConnection;

use crate::error::ApiError;
use crate::rating::champion::Rival;

/// Pre-update (playerid, elo) of every club member other than `exclude`.
/// An empty list means the club has no rival for the excluded player.
pub async fn club_rivals(
    conn: &mut PgConnection,
    clubid: i64,
    exclude: i64,
) -> Result<Vec<Rival>, ApiError> {
    let rows = sqlx::query_as::<_, (i64, i32)>(
        "SELECT playerid, elo FROM player WHERE clubid = $1 AND playerid <> $2",
    )
    .bind(clubid)
    .bind(exclude)
    .fetch_all(&mut *conn)
    .await?;

    Ok(rows
        .into_iter()
        .map(|(playerid, elo)| Rival { playerid, elo })
        .collect())
}

/// Identity of the recorded club champion, if any.
pub async fn current_champion(
    conn: &mut PgConnection,
    clubid: i64,
) -> Result<Option<i64>, ApiError> {
    Ok(sqlx::query_scalar::<_, i64>(
        "SELECT playerid FROM player WHERE clubid = $1 AND clubchamp = TRUE",
    )
    .bind(clubid)
    .fetch_optional(&mut *conn)
    .await?)
}

/// Clear the champion flag by player identity, never by elo equality —
/// two players sharing an elo value must not both lose the flag.
pub async fn clear_champion(conn: &mut PgConnection, playerid: i64) -> Result<(), ApiError> {
    sqlx::query("UPDATE player SET clubchamp = FALSE WHERE playerid = $1")
        .bind(playerid)
        .execute(&mut *conn)
        .await
        .map_err(ApiError::Transaction)?;
    Ok(())
}

/// Winner side of a posted result: new rating, streaks, counters,
/// highest-ever elo and the champion verdict.
pub async fn apply_winner(
    conn: &mut PgConnection,
    playerid: i64,
    elo: i32,
    highestelo: i32,
    hotstreak: bool,
    clubchamp: bool,
) -> Result<u64, ApiError> {
    Ok(sqlx::query(
        "UPDATE player \
            SET elo = $1, \
                winstreak = winstreak + 1, \
                hotstreak = $2, \
                matchesplayed = matchesplayed + 1, \
                wins = wins + 1, \
                highestelo = $3, \
                clubchamp = $4 \
          WHERE playerid = $5",
    )
    .bind(elo)
    .bind(hotstreak)
    .bind(highestelo)
    .bind(clubchamp)
    .bind(playerid)
    .execute(&mut *conn)
    .await
    .map_err(ApiError::Transaction)?
    .rows_affected())
}

/// Loser side: new rating, streaks reset, counters bumped.
pub async fn apply_loser(
    conn: &mut PgConnection,
    playerid: i64,
    elo: i32,
) -> Result<u64, ApiError> {
    Ok(sqlx::query(
        "UPDATE player \
            SET elo = $1, \
                winstreak = 0, \
                hotstreak = FALSE, \
                matchesplayed = matchesplayed + 1, \
                losses = losses + 1 \
          WHERE playerid = $2",
    )
    .bind(elo)
    .bind(playerid)
    .execute(&mut *conn)
    .await
    .map_err(ApiError::Transaction)?
    .rows_affected())
}
