//! The `{data, errors}` wrapper used by every account endpoint.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};

/// Result envelope.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultEnvelope<T> {
    pub data: Option<T>,
    #[serde(default)]
    pub errors: Vec<String>,
}

impl<T> ResultEnvelope<T> {
    pub fn success(data: T) -> Self {
        Self {
            data: Some(data),
            errors: Vec::new(),
        }
    }

    pub fn failure(errors: Vec<String>) -> Self {
        Self { data: None, errors }
    }
}

impl<T: Serialize> IntoResponse for ResultEnvelope<T> {
    fn into_response(self) -> Response {
        (StatusCode::OK, Json(self)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_success_shape() {
        let envelope = ResultEnvelope::success(json!({"token": "abc"}));
        assert_eq!(
            serde_json::to_value(&envelope).unwrap(),
            json!({"data": {"token": "abc"}, "errors": []})
        );
    }

    #[test]
    fn test_failure_shape() {
        let envelope: ResultEnvelope<()> = ResultEnvelope::failure(vec!["nope".to_string()]);
        assert_eq!(
            serde_json::to_value(&envelope).unwrap(),
            json!({"data": null, "errors": ["nope"]})
        );
    }
}
