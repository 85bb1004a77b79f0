pub mod achievements;
pub mod auth;
pub mod challenges;
pub mod clubs;
pub mod health;
pub mod ladder;
pub mod params;
pub mod players;
pub mod routes;
