use std::collections::HashMap;

use serde::{Deserialize, Serialize};

pub type FieldErrors = HashMap<String, Vec<String>>;

/// JSON envelope shared by every endpoint: `{ success, message?, error?, errors?, ...data }`.
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub errors: Option<FieldErrors>,
    #[serde(flatten)]
    pub data: Option<T>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            message: None,
            error: None,
            errors: None,
            data: Some(data),
        }
    }

    pub fn success_with_message(message: &str, data: T) -> Self {
        Self {
            message: Some(message.to_string()),
            ..Self::success(data)
        }
    }

    pub fn error(error: &str) -> Self {
        Self {
            success: false,
            message: None,
            error: Some(error.to_string()),
            errors: None,
            data: None,
        }
    }

    pub fn validation(error: &str, errors: FieldErrors) -> Self {
        Self {
            errors: Some(errors),
            ..Self::error(error)
        }
    }
}
