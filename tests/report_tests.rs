use chrono::{TimeZone, Utc};
use session_reaper::{
    FatalError, ReclamationOutcome, RunReport, RunResponse, SessionResult,
};

fn entry(id: &str, outcome: ReclamationOutcome) -> SessionResult {
    SessionResult {
        session_id: id.to_string(),
        outcome,
        connected_at: Some(Utc.with_ymd_and_hms(2025, 6, 1, 7, 0, 0).unwrap()),
        last_updated_at: Some(Utc.with_ymd_and_hms(2025, 6, 1, 9, 0, 0).unwrap()),
        error: None,
    }
}

#[test]
fn test_report_uses_legacy_wire_keys() {
    let mut report = RunReport::default();
    report.record(entry("s1", ReclamationOutcome::Successful));
    report.record(entry("s2", ReclamationOutcome::Skipped));

    let json = serde_json::to_string(&report).unwrap();

    assert!(json.contains("\"contact_result\""));
    assert!(json.contains("\"contacts_processed\":2"));
    assert!(json.contains("\"contacts_disconnected\":1"));
    assert!(json.contains("\"Successful\""));
    assert!(json.contains("\"Skipped\""));
}

#[test]
fn test_record_counts_only_successful_as_reclaimed() {
    let mut report = RunReport::default();
    report.record(entry("s1", ReclamationOutcome::Failed));
    report.record(entry("s2", ReclamationOutcome::NotFound));
    report.record(entry("s3", ReclamationOutcome::Error));
    report.record(entry("s4", ReclamationOutcome::Successful));

    assert_eq!(report.processed, 4);
    assert_eq!(report.reclaimed, 1);
    assert!(report.reclaimed <= report.processed);
}

#[test]
fn test_error_entry_omits_absent_timestamps() {
    let result = SessionResult {
        session_id: "s1".to_string(),
        outcome: ReclamationOutcome::Error,
        connected_at: None,
        last_updated_at: None,
        error: Some("directory unavailable: timeout".to_string()),
    };

    let json = serde_json::to_string(&result).unwrap();

    assert!(!json.contains("connected_at"));
    assert!(!json.contains("last_updated_at"));
    assert!(json.contains("\"error\":\"directory unavailable: timeout\""));
}

#[test]
fn test_success_envelope_shape() {
    let mut report = RunReport::default();
    report.record(entry("s1", ReclamationOutcome::Successful));

    let response = RunResponse::from_run(Ok(report));
    let json: serde_json::Value = serde_json::to_value(&response).unwrap();

    assert_eq!(json["status"], 200);
    assert_eq!(json["message"], "Success");
    assert_eq!(json["data"]["contacts_processed"], 1);
    assert_eq!(json["data"]["contact_result"][0]["session_id"], "s1");
}

#[test]
fn test_fatal_envelope_shape() {
    let response = RunResponse::from_run(Err(FatalError::MissingCredentials));
    let json: serde_json::Value = serde_json::to_value(&response).unwrap();

    assert_eq!(json["statusCode"], 500);
    assert_eq!(json["body"]["error"], "No directory credentials found");
    assert!(json["body"].get("message").is_none());
}

#[test]
fn test_unauthorized_envelope_carries_cause() {
    let response = RunResponse::from_run(Err(FatalError::Unauthorized(
        "directory returned 403 Forbidden".to_string(),
    )));
    let json: serde_json::Value = serde_json::to_value(&response).unwrap();

    assert_eq!(json["statusCode"], 500);
    assert_eq!(json["body"]["error"], "Not authorized");
    assert_eq!(json["body"]["message"], "directory returned 403 Forbidden");
}
