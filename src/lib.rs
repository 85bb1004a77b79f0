//! Tennis-ladder backend: challenge lifecycle, rating ledger and result
//! posting over Postgres, with an actix-web HTTP surface.

pub mod auth;
pub mod cache;
pub mod config;
pub mod db;
pub mod error;
pub mod http;
pub mod metrics;
pub mod rating;
