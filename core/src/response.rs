//! Invocation response and the exception payload attached on faults.

use serde::{Deserialize, Serialize};

/// Status written for validation failures.
pub const VALIDATION_ERROR_STATUS: u16 = 400;

/// Default status written for execution faults.
pub const INTERNAL_ERROR_STATUS: u16 = 500;

/// Status of a response nobody has written a failure into.
pub const SUCCESS_STATUS: u16 = 200;

/// Result of one command invocation.
///
/// Created and owned by whoever orchestrates the invocation. Validation and
/// fault mapping only borrow it for the duration of the call.
///
/// # Examples
///
/// ```
/// use command_contract_core::Response;
///
/// let response = Response::default();
/// assert_eq!(response.status, 200);
/// assert!(response.is_success());
/// assert!(response.results.is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Response {
    pub status: u16,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub results: Option<serde_json::Value>,
}

impl Default for Response {
    fn default() -> Self {
        Self {
            status: SUCCESS_STATUS,
            message: "Success".to_string(),
            results: None,
        }
    }
}

impl Response {
    /// Successful response carrying `results`.
    pub fn ok(results: serde_json::Value) -> Self {
        Self {
            results: Some(results),
            ..Self::default()
        }
    }

    /// Serializes `payload` into the results field.
    pub fn set_results<T: Serialize>(&mut self, payload: &T) -> serde_json::Result<()> {
        self.results = Some(serde_json::to_value(payload)?);
        Ok(())
    }

    /// Returns `true` for statuses below 400.
    pub fn is_success(&self) -> bool {
        self.status < VALIDATION_ERROR_STATUS
    }

    /// Overwrites status and message, leaving the payload alone.
    pub(crate) fn fail(&mut self, status: u16, message: impl Into<String>) {
        self.status = status;
        self.message = message.into();
    }
}

/// Payload attached to a response when execution faulted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExceptionResult {
    pub message: String,
    /// Only ever populated by debug builds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stack_trace: Option<String>,
    #[serde(rename = "type")]
    pub type_name: String,
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_exception_result_wire_shape() {
        let result = ExceptionResult {
            message: "boom".into(),
            stack_trace: None,
            type_name: "std::io::Error".into(),
        };
        let value = serde_json::to_value(&result).unwrap();
        assert_eq!(value, json!({"message": "boom", "type": "std::io::Error"}));
    }

    #[test]
    fn test_fail_keeps_results() {
        let mut response = Response::ok(json!({"items": [1, 2]}));
        response.fail(VALIDATION_ERROR_STATUS, "nope");
        assert_eq!(response.status, 400);
        assert_eq!(response.message, "nope");
        assert_eq!(response.results, Some(json!({"items": [1, 2]})));
        assert!(!response.is_success());
    }

    #[test]
    fn test_set_results_serializes_payload() {
        #[derive(Serialize)]
        struct Account<'a> {
            name: &'a str,
            kind: &'a str,
        }

        let mut response = Response::default();
        response
            .set_results(&Account {
                name: "acct",
                kind: "StorageV2",
            })
            .unwrap();
        assert_eq!(
            response.results,
            Some(json!({"name": "acct", "kind": "StorageV2"}))
        );
        assert!(response.is_success());
    }
}
