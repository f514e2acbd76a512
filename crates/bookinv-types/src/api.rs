//! Response envelope shared by the server and its clients.

use serde::{Deserialize, Serialize};

use crate::validation::ValidationErrors;

/// `{success: true, data}` on success, `{success: false, error, errors?}` on failure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<ValidationErrors>,
}

impl<T> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        ApiResponse {
            success: true,
            data: Some(data),
            error: None,
            errors: None,
        }
    }

    pub fn failure(error: impl Into<String>, errors: Option<ValidationErrors>) -> Self {
        ApiResponse {
            success: false,
            data: None,
            error: Some(error.into()),
            errors,
        }
    }
}

/// Empty payload confirming an operation without returning a record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Confirmation {}
