//! Club roster queries.

use sqlx::PgPool;

use crate::cache;
use crate::error::ApiError;

/// Club names offered at signup and challenge creation.
pub async fn club_names(db: &PgPool) -> Result<Vec<String>, ApiError> {
    let names = sqlx::query_scalar::<_, String>("SELECT name FROM club ORDER BY name")
        .fetch_all(db)
        .await?;
    Ok(names)
}

pub async fn create_club(db: &PgPool, name: &str, address: &str) -> Result<i64, ApiError> {
    let clubid = sqlx::query_scalar::<_, i64>(
        "INSERT INTO club (name, address) VALUES ($1, $2) RETURNING clubid",
    )
    .bind(name)
    .bind(address)
    .fetch_one(db)
    .await
    .map_err(|e| ApiError::classify(e, "Club name is already in use", "club"))?;

    cache::remember_club(name, clubid);
    Ok(clubid)
}

/// Resolve a club name to its id, through the warm cache when possible.
/// Clubs are never renamed or deleted, so cached entries stay valid.
pub async fn club_id_by_name(db: &PgPool, name: &str) -> Result<i64, ApiError> {
    if let Some(id) = cache::cached_club_id(name) {
        return Ok(id);
    }

    let id = sqlx::query_scalar::<_, i64>("SELECT clubid FROM club WHERE name = $1")
        .bind(name)
        .fetch_optional(db)
        .await?
        .ok_or(ApiError::NotFound("club"))?;

    cache::remember_club(name, id);
    Ok(id)
}
