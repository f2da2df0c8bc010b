//! Tests for error surfacing: the server's detail envelope, display
//! formatting, credential decode failures, and helpers around racing reads.

use base64::{Engine as _, engine::general_purpose::URL_SAFE_NO_PAD};
use time::macros::{date, datetime};

use hrportal_rs::session::claims;
use hrportal_rs::utils::date_format::{parse_iso_date, parse_iso_datetime};
use hrportal_rs::{ApiErrorBody, Error, RequestSequence, SpanTrace};


#[test]
fn detail_envelope_with_string_detail() {
    let body: ApiErrorBody =
        serde_json::from_str(r#"{"detail": "Employee not found"}"#).unwrap();
    assert_eq!(body.message().as_deref(), Some("Employee not found"));
}

#[test]
fn detail_envelope_with_structured_detail() {
    // Field validation failures arrive as structured JSON; the message keeps
    // the raw rendering rather than discarding it.
    let message = ApiErrorBody::detail_from_body(
        r#"{"detail": [{"loc": ["body", "start_date"], "msg": "invalid date"}]}"#,
    )
    .expect("structured detail should still produce a message");
    assert!(message.contains("start_date"));
    assert!(message.contains("invalid date"));
}

#[test]
fn detail_envelope_tolerates_missing_or_unparseable_bodies() {
    assert_eq!(ApiErrorBody::detail_from_body("{}"), None);
    assert_eq!(ApiErrorBody::detail_from_body("<html>gateway error</html>"), None);
    assert_eq!(ApiErrorBody::detail_from_body(""), None);
}

#[test]
fn display_includes_server_detail_when_present() {
    test_utils::do_setup();

    let rejected = Error::Authentication {
        detail: Some("Invalid username or password".to_string()),
        span_trace: SpanTrace::capture(),
    };
    assert_eq!(
        rejected.to_string(),
        "login failed: Invalid username or password"
    );

    let anonymous = Error::Authentication {
        detail: None,
        span_trace: SpanTrace::capture(),
    };
    assert_eq!(anonymous.to_string(), "login failed");

    let forbidden = Error::Authorization {
        status_code: reqwest::StatusCode::FORBIDDEN,
        detail: Some("HR admin capability required".to_string()),
        span_trace: SpanTrace::capture(),
    };
    assert_eq!(
        forbidden.to_string(),
        "not authorized: HR admin capability required"
    );
    assert!(forbidden.span_trace().is_some());

    let validation = Error::Validation("new password must be 6-12 characters".to_string());
    assert_eq!(
        validation.to_string(),
        "invalid input: new password must be 6-12 characters"
    );
    assert!(validation.span_trace().is_none());
}

#[test]
fn decode_rejects_invalid_base64_payload() {
    let err = claims::decode("a.!!!.c").expect_err("must not decode");
    assert!(matches!(err, claims::DecodeError::Base64(_)), "got {err:?}");
}

#[test]
fn decode_rejects_payload_that_is_not_claims_json() {
    let payload = URL_SAFE_NO_PAD.encode(b"not json at all");
    let credential = format!("header.{payload}.sig");
    let err = claims::decode(&credential).expect_err("must not decode");
    assert!(matches!(err, claims::DecodeError::Json(_)), "got {err:?}");
}

#[test]
fn decode_rejects_payload_with_missing_claims() {
    let payload = URL_SAFE_NO_PAD.encode(br#"{"emp_no": 110022}"#);
    let credential = format!("header.{payload}.sig");
    let err = claims::decode(&credential).expect_err("must not decode");
    assert!(matches!(err, claims::DecodeError::Json(_)), "got {err:?}");
}

#[test]
fn request_sequence_applies_last_request_wins() {
    let seq = RequestSequence::new();

    let stale = seq.issue();
    let fresh = seq.issue();

    // The stale response arriving after the fresh one must be discarded.
    assert!(!seq.is_latest(&stale));
    assert!(seq.is_latest(&fresh));

    // Issuing again supersedes everything outstanding.
    let newest = seq.issue();
    assert!(!seq.is_latest(&fresh));
    assert!(seq.is_latest(&newest));
}

#[test]
fn date_parsing_accepts_plain_and_datetime_renderings() {
    assert_eq!(parse_iso_date("1986-06-26").unwrap(), date!(1986 - 06 - 26));
    assert_eq!(
        parse_iso_date("1986-06-26T00:00:00").unwrap(),
        date!(1986 - 06 - 26)
    );
    assert!(parse_iso_date("26/06/1986").is_err());
}

#[test]
fn datetime_parsing_accepts_the_server_renderings() {
    assert_eq!(
        parse_iso_datetime("2024-03-01T09:15:00Z").unwrap(),
        datetime!(2024 - 03 - 01 09:15:00 UTC)
    );
    // Naive timestamps are assumed UTC, with or without fractional seconds.
    assert_eq!(
        parse_iso_datetime("2024-03-01T09:15:00").unwrap(),
        datetime!(2024 - 03 - 01 09:15:00 UTC)
    );
    assert_eq!(
        parse_iso_datetime("2024-03-01T09:15:00.500000").unwrap(),
        datetime!(2024 - 03 - 01 09:15:00.5 UTC)
    );
    assert!(parse_iso_datetime("not a timestamp").is_err());
}
