//! Row structs shared by the repositories and the HTTP layer.
//!
//! Field names double as the JSON keys the mobile client expects.

use chrono::{NaiveDate, NaiveTime};
use serde::Serialize;
use sqlx::FromRow;

/// Full profile + rating state for one player.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Player {
    pub playerid: i64,
    pub email: String,
    pub contactno: String,
    pub fname: String,
    pub lname: String,
    /// None when the player has not joined a club.
    pub clubname: Option<String>,
    pub elo: i32,
    pub winstreak: i32,
    pub hotstreak: bool,
    pub matchesplayed: i32,
    pub wins: i32,
    pub losses: i32,
    pub highestelo: i32,
    pub clubchamp: bool,
    /// Achievement ids, filled in by a second query.
    #[sqlx(skip)]
    pub achieved: Vec<i64>,
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Club {
    pub clubid: i64,
    pub name: String,
    pub address: String,
}

/// An unresolved challenge as seen by one participant, joined with the
/// opponent's profile summary and the challenge metadata.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct ActiveChallenge {
    pub challengeid: i64,
    pub didinitiate: bool,
    pub opponentid: i64,
    pub fname: String,
    pub lname: String,
    pub clubname: String,
    pub date: NaiveDate,
    pub time: NaiveTime,
    pub accepted: bool,
}

/// A completed match as seen by one participant.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct MatchRecord {
    pub challengeid: i64,
    pub didwin: i16,
    pub opponentid: i64,
    pub fname: String,
    pub lname: String,
    pub date: NaiveDate,
    pub score: Option<String>,
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Achievement {
    pub achievementid: i64,
    pub achievementname: String,
    pub achievementdescription: String,
}
