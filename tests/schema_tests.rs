use clickscope::ingest::IngestOptions;
use clickscope::schema::{self, SchemaError, ValidateError};
use std::io::Write;

#[test]
fn mandatory_columns_in_any_case_spacing_and_order() {
    let headers = ["Referral URL", " PAGE URL", "Domain ", "user agent", "session_id", "Country"];
    assert!(schema::validate_headers(&headers).is_ok());
}

#[test]
fn reports_exactly_the_missing_columns() {
    let headers = ["user_agent", "page_url", "extra"];
    let err = schema::validate_headers(&headers).unwrap_err();
    assert_eq!(err.missing(), &["domain".to_string(), "referral_url".to_string()]);
    assert_eq!(err.to_string(), "Missing mandatory columns: domain, referral_url");
}

#[test]
fn empty_header_misses_everything() {
    let headers: [&str; 0] = [];
    let missing = schema::missing_columns(&headers);
    assert_eq!(missing, vec!["user_agent", "domain", "page_url", "referral_url"]);
}

#[test]
fn normalize_column_rule() {
    assert_eq!(schema::normalize_column("  Page URL "), "page_url");
    assert_eq!(schema::normalize_column("USER_AGENT"), "user_agent");
    assert_eq!(schema::normalize_column("a b c"), "a_b_c");
}

#[test]
fn validate_file_reads_only_the_header() {
    let mut f = tempfile::NamedTempFile::new().unwrap();
    writeln!(f, "User Agent,Domain,Page URL,Referral URL").unwrap();
    writeln!(f, "this row,is,malformed").unwrap();
    assert!(schema::validate_file(f.path(), &IngestOptions::default()).is_ok());
}

#[test]
fn validate_file_schema_error_lists_missing() {
    let mut f = tempfile::NamedTempFile::new().unwrap();
    writeln!(f, "user_agent,domain").unwrap();
    match schema::validate_file(f.path(), &IngestOptions::default()) {
        Err(ValidateError::Schema(SchemaError::MissingColumns(cols))) => {
            assert_eq!(cols, vec!["page_url", "referral_url"]);
        }
        other => panic!("expected schema error, got {other:?}"),
    }
}

#[test]
fn unreadable_file_is_not_a_schema_error() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("nope.csv");
    let res = schema::validate_file(&missing, &IngestOptions::default());
    assert!(matches!(res, Err(ValidateError::Read(_))));
}

#[test]
fn honours_custom_delimiter() {
    let mut f = tempfile::NamedTempFile::new().unwrap();
    writeln!(f, "user_agent;domain;page_url;referral_url").unwrap();
    let semicolon = IngestOptions::default().with_delimiter(b';');
    assert!(schema::validate_file(f.path(), &semicolon).is_ok());
    assert!(schema::validate_file(f.path(), &IngestOptions::default()).is_err());
}

#[test]
fn validate_file_with_bare_carriage_returns() {
    let mut f = tempfile::NamedTempFile::new().unwrap();
    f.write_all(b"user_agent,domain,page_url,referral_url\rx,d,/,\r").unwrap();
    assert!(schema::validate_file(f.path(), &IngestOptions::default()).is_ok());
}
