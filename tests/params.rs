//! Unit tests for parameter validation, date/time conversion and the
//! offset parser.

use chrono::{FixedOffset, NaiveDate, NaiveTime, TimeZone, Utc};
use ladder_server::config::parse_offset;
use ladder_server::error::ApiError;
use ladder_server::http::params::{
    epoch_to_date, parse_flag, parse_id, parse_time, FieldCheck,
};

#[test]
fn missing_fields_are_all_named() {
    let mut check = FieldCheck::new();
    check.take("clubname", &None);
    check.take("date", &Some("   ".to_string()));
    check.take("time", &Some("18:30".to_string()));

    let err = check.finish().expect_err("two fields are missing");
    assert!(matches!(err, ApiError::MissingFields(_)));
    assert_eq!(
        err.to_string(),
        "Please enter all necessary fields: clubname, date"
    );
}

#[test]
fn complete_form_passes() {
    let mut check = FieldCheck::new();
    let clubname = Some("  Riverside ".to_string());
    let value = check.take("clubname", &clubname);
    assert_eq!(value, "Riverside");
    assert!(check.finish().is_ok());
}

#[test]
fn epoch_date_follows_the_configured_offset_not_the_host() {
    // 00:30 UTC: still the previous day two hours west, same day east.
    let secs = Utc
        .with_ymd_and_hms(2026, 8, 7, 0, 30, 0)
        .unwrap()
        .timestamp();

    let utc = FixedOffset::east_opt(0).unwrap();
    let west = FixedOffset::west_opt(2 * 3600).unwrap();
    let east = FixedOffset::east_opt(3600).unwrap();

    assert_eq!(
        epoch_to_date(secs, utc).unwrap(),
        NaiveDate::from_ymd_opt(2026, 8, 7).unwrap()
    );
    assert_eq!(
        epoch_to_date(secs, west).unwrap(),
        NaiveDate::from_ymd_opt(2026, 8, 6).unwrap()
    );
    assert_eq!(
        epoch_to_date(secs, east).unwrap(),
        NaiveDate::from_ymd_opt(2026, 8, 7).unwrap()
    );
}

#[test]
fn time_accepts_minutes_and_seconds_forms() {
    assert_eq!(
        parse_time("18:30").unwrap(),
        NaiveTime::from_hms_opt(18, 30, 0).unwrap()
    );
    assert_eq!(
        parse_time("18:30:15").unwrap(),
        NaiveTime::from_hms_opt(18, 30, 15).unwrap()
    );
    assert!(parse_time("half past six").is_err());
    assert!(parse_time("25:00").is_err());
}

#[test]
fn offset_parser_accepts_signed_hh_mm_only() {
    assert_eq!(
        parse_offset("+01:00"),
        FixedOffset::east_opt(3600)
    );
    assert_eq!(
        parse_offset("-05:30"),
        FixedOffset::east_opt(-(5 * 3600 + 30 * 60))
    );
    assert_eq!(parse_offset("+00:00"), FixedOffset::east_opt(0));
    assert!(parse_offset("01:00").is_none());
    assert!(parse_offset("+1:00").is_none());
    assert!(parse_offset("+25:00").is_none());
    assert!(parse_offset("+01:60").is_none());
    assert!(parse_offset("UTC").is_none());
}

#[test]
fn ids_and_flags_reject_garbage() {
    assert_eq!(parse_id("playerid", "42").unwrap(), 42);
    assert!(matches!(
        parse_id("playerid", "forty-two"),
        Err(ApiError::Validation(_))
    ));

    assert!(parse_flag("hotstreak", "1").unwrap());
    assert!(!parse_flag("hotstreak", "0").unwrap());
    assert!(parse_flag("hotstreak", "true").unwrap());
    assert!(matches!(
        parse_flag("hotstreak", "yes"),
        Err(ApiError::Validation(_))
    ));
}

#[test]
fn password_hashing_round_trips() {
    let hash = ladder_server::auth::hash_password("topspin").expect("hash");
    assert!(ladder_server::auth::verify_password("topspin", &hash));
    assert!(!ladder_server::auth::verify_password("slice", &hash));
    assert!(!ladder_server::auth::verify_password("topspin", "not-a-phc-string"));
}
