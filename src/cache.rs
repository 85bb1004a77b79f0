//! Warm in-memory cache for the club lookup table.
//!
//! Club names are the human-facing selector at signup and challenge
//! creation, so every boundary call translates a name to a clubid. The
//! table is tiny and append-only, which makes it a safe candidate for a
//! process-local cache warmed at start-up and topped up on club creation.

use dashmap::DashMap;
use once_cell::sync::Lazy;
use sqlx::PgPool;

/// Global map club name → clubid.
pub static CLUBS: Lazy<DashMap<String, i64>> = Lazy::new(DashMap::new);

/// Fetch the `club` table and populate [`CLUBS`]. Idempotent.
pub async fn warm_clubs(db: &PgPool) -> anyhow::Result<()> {
    let rows = sqlx::query_as::<_, (i64, String)>("SELECT clubid, name FROM club")
        .fetch_all(db)
        .await?;

    for (clubid, name) in rows {
        CLUBS.insert(name, clubid);
    }
    Ok(())
}

/// Cached clubid for a name, if warmed.
pub fn cached_club_id(name: &str) -> Option<i64> {
    CLUBS.get(name).map(|e| *e.value())
}

/// Record a club that was just created (or freshly looked up).
pub fn remember_club(name: &str, clubid: i64) {
    CLUBS.insert(name.to_string(), clubid);
}

/// Warm every in-memory cache we have (called once at startup).
pub async fn warm_all(db: &PgPool) {
    if let Err(e) = warm_clubs(db).await {
        log::warn!("cache warm-up failed: {e:?}");
    }
}
