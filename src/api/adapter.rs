// adapter.rs
use serde_json::Value;

use super::error::ApiError;
use super::models::{Ack, Envelope, FileEnvelope, HistoryFile, HistoryResponse};

// ===============================
// Envelope -> payload
// ===============================

fn rejection(error: Option<String>, message: Option<String>, fallback: &str) -> ApiError {
    ApiError::Rejected(error.or(message).unwrap_or_else(|| fallback.to_string()))
}

impl<T> Envelope<T> {
    /// Payload of a read endpoint. `success` may be absent; only an explicit
    /// `false` is a rejection.
    pub fn into_data(self, what: &str) -> Result<T, ApiError> {
        if self.success == Some(false) {
            return Err(rejection(self.error, self.message, &format!("{what} failed")));
        }
        self.data.ok_or(ApiError::MissingData)
    }

    /// Acknowledgement of a write endpoint; the payload is ignored.
    pub fn into_ack(self, what: &str) -> Result<Ack, ApiError> {
        if self.success == Some(false) {
            return Err(rejection(self.error, self.message, &format!("{what} failed")));
        }
        Ok(Ack { message: self.message })
    }
}

/// Raw result bodies of the action endpoints are shown verbatim, but a
/// `success: false` still counts as a failure.
pub fn check_action(body: Value, what: &str) -> Result<Value, ApiError> {
    if body.get("success").and_then(Value::as_bool) == Some(false) {
        let field = |key: &str| body.get(key).and_then(Value::as_str).map(str::to_string);
        return Err(rejection(field("error"), field("message"), &format!("{what} failed")));
    }
    Ok(body)
}

// ===============================
// History listings
// ===============================

impl HistoryResponse {
    /// Flattens both listing shapes into one file list. Grouped listings keep
    /// their day order and tag each file with its date.
    pub fn into_files(self) -> Result<Vec<HistoryFile>, ApiError> {
        if self.success == Some(false) {
            return Err(rejection(self.error, self.message, "loading history failed"));
        }
        if let Some(files) = self.files {
            return Ok(files);
        }
        let days = self.data.unwrap_or_default();
        Ok(days
            .into_iter()
            .flat_map(|day| {
                let date = day.date;
                day.files.into_iter().map(move |mut f| {
                    f.date.get_or_insert_with(|| date.clone());
                    f
                })
            })
            .collect())
    }
}

/// Text files come back either raw or wrapped as `{success, content}`.
pub fn unwrap_text_body(body: String) -> Result<String, ApiError> {
    match serde_json::from_str::<FileEnvelope>(&body) {
        Ok(env) if env.success == Some(false) => {
            Err(rejection(env.error, None, "reading file failed"))
        }
        Ok(FileEnvelope { content: Some(content), .. }) => Ok(content),
        _ => Ok(body),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::models::SystemStatus;

    #[test]
    fn unflagged_envelope_is_accepted() {
        let env: Envelope<SystemStatus> =
            serde_json::from_str(r#"{"data": {"version": "2.0.3"}}"#).unwrap();
        assert_eq!(env.into_data("status").unwrap().version, "2.0.3");
    }

    #[test]
    fn rejection_prefers_error_then_message() {
        let env: Envelope<Value> =
            serde_json::from_str(r#"{"success": false, "error": "disk full", "message": "x"}"#)
                .unwrap();
        assert_eq!(env.into_data("config").unwrap_err().to_string(), "disk full");

        let env: Envelope<Value> = serde_json::from_str(r#"{"success": false}"#).unwrap();
        assert_eq!(env.into_ack("saving config").unwrap_err().to_string(), "saving config failed");
    }

    #[test]
    fn read_without_data_is_an_error() {
        let env: Envelope<Value> = serde_json::from_str(r#"{"success": true}"#).unwrap();
        assert!(matches!(env.into_data("status"), Err(ApiError::MissingData)));
    }

    #[test]
    fn grouped_history_is_flattened_with_dates() {
        let body = r#"{
            "success": true,
            "data": [
                {"date": "2025-01-02", "files": [
                    {"name": "12-00.html", "type": "html", "path": "2025-01-02/html/12-00.html",
                     "size": 2048, "modified": "12:00:01"}
                ]},
                {"date": "2025-01-01", "files": [
                    {"name": "a.txt", "type": "txt", "path": "2025-01-01/txt/a.txt",
                     "size": 10, "modified": "08:00:00"},
                    {"name": "b.txt", "type": "txt", "path": "2025-01-01/txt/b.txt",
                     "size": 11, "modified": "07:00:00"}
                ]}
            ]
        }"#;
        let files = serde_json::from_str::<HistoryResponse>(body).unwrap().into_files().unwrap();
        let names: Vec<_> = files.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, ["12-00.html", "a.txt", "b.txt"]);
        assert_eq!(files[1].date.as_deref(), Some("2025-01-01"));
        assert_eq!(files[0].kind.as_deref(), Some("html"));
    }

    #[test]
    fn flat_history_passes_through() {
        let body = r#"{"files": [
            {"name": "2025-01-01/", "path": "2025-01-01", "size": 0, "mtime": 1700000000}
        ]}"#;
        let files = serde_json::from_str::<HistoryResponse>(body).unwrap().into_files().unwrap();
        assert_eq!(files.len(), 1);
        assert!(files[0].is_directory());
        assert_eq!(files[0].mtime, Some(1_700_000_000.0));
    }

    #[test]
    fn flat_history_accepts_fractional_mtime() {
        let body = r#"{"files": [
            {"name": "a.txt", "path": "a.txt", "size": 10, "mtime": 1740817800.25}
        ]}"#;
        let files = serde_json::from_str::<HistoryResponse>(body).unwrap().into_files().unwrap();
        assert_eq!(files[0].mtime, Some(1_740_817_800.25));
    }

    #[test]
    fn wrapped_text_body_is_unwrapped() {
        let wrapped = r#"{"success": true, "content": "line one\nline two"}"#.to_string();
        assert_eq!(unwrap_text_body(wrapped).unwrap(), "line one\nline two");
        assert_eq!(unwrap_text_body("plain text".into()).unwrap(), "plain text");
        assert!(unwrap_text_body(r#"{"success": false, "error": "gone"}"#.into()).is_err());
    }

    #[test]
    fn action_failure_is_detected() {
        let ok = check_action(serde_json::json!({"success": true, "result": 3}), "push").unwrap();
        assert_eq!(ok["result"], 3);
        let err = check_action(serde_json::json!({"success": false, "error": "boom"}), "push");
        assert_eq!(err.unwrap_err().to_string(), "boom");
    }
}
