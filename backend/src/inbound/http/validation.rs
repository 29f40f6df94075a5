//! Shared validation helpers for inbound HTTP adapters.
//!
//! Extractor failures (malformed JSON, missing fields, non-numeric path ids)
//! are rewritten into the standard `invalid_request` envelope so clients see
//! one error shape regardless of where parsing failed.

use actix_web::HttpRequest;
use actix_web::error::{JsonPayloadError, PathError};
use actix_web::web::{JsonConfig, PathConfig};
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde_json::json;
use tracing::warn;

use crate::domain::Error;

const NAIVE_DATE_TIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.f";
const DATE_FORMAT: &str = "%Y-%m-%d";

/// Validation error codes for HTTP request failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ErrorCode {
    MalformedBody,
    InvalidPath,
    InvalidTimestamp,
}

impl ErrorCode {
    fn as_str(self) -> &'static str {
        match self {
            ErrorCode::MalformedBody => "malformed_body",
            ErrorCode::InvalidPath => "invalid_path",
            ErrorCode::InvalidTimestamp => "invalid_timestamp",
        }
    }
}

/// Newtype wrapper for HTTP field names to provide type safety.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct FieldName(&'static str);

impl FieldName {
    pub(crate) const fn new(name: &'static str) -> Self {
        Self(name)
    }

    fn as_str(&self) -> &str {
        self.0
    }
}

pub(crate) fn invalid_timestamp_error(field: FieldName, value: &str) -> Error {
    let field = field.as_str();
    Error::invalid_request(format!(
        "{field} must be an RFC 3339 timestamp or a YYYY-MM-DD date"
    ))
    .with_details(json!({
        "field": field,
        "value": value,
        "code": ErrorCode::InvalidTimestamp.as_str(),
    }))
}

/// Parse a birth date.
///
/// Accepts an RFC 3339 timestamp, an offset-less timestamp (read as UTC), or a
/// plain date (midnight UTC).
pub(crate) fn parse_birth_date(value: &str, field: FieldName) -> Result<DateTime<Utc>, Error> {
    let trimmed = value.trim();
    if let Ok(timestamp) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(timestamp.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(trimmed, NAIVE_DATE_TIME_FORMAT) {
        return Ok(naive.and_utc());
    }
    NaiveDate::parse_from_str(trimmed, DATE_FORMAT)
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|midnight| midnight.and_utc())
        .ok_or_else(|| invalid_timestamp_error(field, value))
}

fn reject_extraction(req: &HttpRequest, code: ErrorCode, message: String) -> actix_web::Error {
    let error = Error::invalid_request(message).with_details(json!({ "code": code.as_str() }));
    warn!(
        method = %req.method(),
        path = req.path(),
        code = code.as_str(),
        message = error.message(),
        trace_id = ?error.trace_id(),
        "request rejected"
    );
    error.into()
}

fn json_error_handler(err: JsonPayloadError, req: &HttpRequest) -> actix_web::Error {
    reject_extraction(
        req,
        ErrorCode::MalformedBody,
        format!("invalid request body: {err}"),
    )
}

fn path_error_handler(err: PathError, req: &HttpRequest) -> actix_web::Error {
    reject_extraction(
        req,
        ErrorCode::InvalidPath,
        format!("invalid path parameter: {err}"),
    )
}

/// JSON extractor configuration reporting failures as `invalid_request`.
pub fn json_config() -> JsonConfig {
    JsonConfig::default().error_handler(json_error_handler)
}

/// Path extractor configuration reporting failures as `invalid_request`.
pub fn path_config() -> PathConfig {
    PathConfig::default().error_handler(path_error_handler)
}

#[cfg(test)]
pub(crate) mod tests {
    use std::io;
    use std::sync::{Arc, Mutex};

    use super::*;
    use crate::domain::ErrorCode as DomainErrorCode;
    use actix_web::test::TestRequest;
    use chrono::TimeZone;
    use rstest::rstest;
    use tracing::subscriber::DefaultGuard;

    /// Log lines written by a thread-local subscriber.
    #[derive(Clone, Default)]
    pub(crate) struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

    impl CapturedLogs {
        pub(crate) fn contents(&self) -> String {
            let bytes = self.0.lock().expect("log buffer lock").clone();
            String::from_utf8(bytes).expect("utf-8 log output")
        }
    }

    impl io::Write for CapturedLogs {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().expect("log buffer lock").extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    /// Route this thread's tracing output into a buffer until the guard drops.
    pub(crate) fn capture_logs() -> (CapturedLogs, DefaultGuard) {
        let logs = CapturedLogs::default();
        let writer = logs.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_ansi(false)
            .with_max_level(tracing::Level::DEBUG)
            .with_writer(move || writer.clone())
            .finish();
        (logs, tracing::subscriber::set_default(subscriber))
    }

    #[test]
    fn malformed_body_is_logged_with_request_context() {
        let (logs, _guard) = capture_logs();
        let req = TestRequest::post().uri("/api/hero").to_http_request();

        let error = json_error_handler(JsonPayloadError::ContentType, &req);

        assert_eq!(
            error.as_response_error().status_code(),
            actix_web::http::StatusCode::BAD_REQUEST
        );
        let output = logs.contents();
        assert!(output.contains("request rejected"), "{output}");
        assert!(output.contains("malformed_body"), "{output}");
        assert!(output.contains("POST"), "{output}");
        assert!(output.contains("/api/hero"), "{output}");
    }

    #[test]
    fn invalid_path_is_logged_with_request_context() {
        let (logs, _guard) = capture_logs();
        let req = TestRequest::get().uri("/api/hero/abc").to_http_request();
        let cause = <serde::de::value::Error as serde::de::Error>::custom("invalid digit");

        let error = path_error_handler(PathError::Deserialize(cause), &req);

        assert_eq!(
            error.as_response_error().status_code(),
            actix_web::http::StatusCode::BAD_REQUEST
        );
        let output = logs.contents();
        assert!(output.contains("invalid_path"), "{output}");
        assert!(output.contains("GET"), "{output}");
        assert!(output.contains("/api/hero/abc"), "{output}");
    }

    const FIELD: FieldName = FieldName::new("birthDate");

    fn utc(y: i32, m: u32, d: u32, h: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, 0, 0)
            .single()
            .expect("valid timestamp")
    }

    #[rstest]
    #[case("1980-02-29T00:00:00Z", utc(1980, 2, 29, 0))]
    #[case("1980-02-29T03:00:00+03:00", utc(1980, 2, 29, 0))]
    #[case("1980-02-29T07:00:00", utc(1980, 2, 29, 7))]
    #[case("1980-02-29T07:00:00.250", utc(1980, 2, 29, 7) + chrono::Duration::milliseconds(250))]
    #[case("1980-02-29", utc(1980, 2, 29, 0))]
    fn birth_date_accepts_supported_forms(#[case] raw: &str, #[case] expected: DateTime<Utc>) {
        assert_eq!(parse_birth_date(raw, FIELD).expect("parses"), expected);
    }

    #[rstest]
    #[case("")]
    #[case("29/02/1980")]
    #[case("1981-02-29")]
    fn birth_date_rejects_other_text(#[case] raw: &str) {
        let error = parse_birth_date(raw, FIELD).expect_err("rejected");

        assert_eq!(error.code(), DomainErrorCode::InvalidRequest);
        assert_eq!(
            error.details().and_then(|details| details.get("field")),
            Some(&json!("birthDate"))
        );
    }
}
