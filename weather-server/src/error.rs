use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use weather_core::AgentError;

use crate::envelope::timestamp;

pub type Result<T> = std::result::Result<T, ApiError>;

pub const GENERIC_INTERNAL_MESSAGE: &str = "Something went wrong";

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    Configuration(String),

    #[error("Request timeout")]
    Timeout,

    #[error("{0}")]
    Upstream(String),

    #[error("Internal Server Error")]
    Internal {
        message: String,
        /// Include `message` in the response body (non-production only).
        expose: bool,
    },
}

impl ApiError {
    pub fn missing_city() -> Self {
        ApiError::Validation("City parameter is required".to_string())
    }

    pub fn missing_model_key() -> Self {
        ApiError::Configuration("OPENAI_API_KEY not configured".to_string())
    }

    pub fn internal(message: impl Into<String>, expose: bool) -> Self {
        ApiError::Internal {
            message: message.into(),
            expose,
        }
    }

    pub fn from_agent(err: AgentError, expose: bool) -> Self {
        match err {
            AgentError::Model(e) if expose => ApiError::Upstream(e.to_string()),
            AgentError::Model(e) => ApiError::Upstream(e.redacted()),
            other => ApiError::internal(other.to_string(), expose),
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::Configuration(_)
            | ApiError::Timeout
            | ApiError::Upstream(_)
            | ApiError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();

        let body = match &self {
            ApiError::Internal { message, expose } => {
                let message = if *expose {
                    message.as_str()
                } else {
                    GENERIC_INTERNAL_MESSAGE
                };
                json!({
                    "success": false,
                    "error": self.to_string(),
                    "message": message,
                    "timestamp": timestamp(),
                })
            }
            _ => json!({
                "success": false,
                "error": self.to_string(),
                "timestamp": timestamp(),
            }),
        };

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use weather_core::ModelError;

    #[test]
    fn statuses_follow_taxonomy() {
        assert_eq!(ApiError::missing_city().status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            ApiError::missing_model_key().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(ApiError::Timeout.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(ApiError::Timeout.to_string(), "Request timeout");
    }

    #[test]
    fn model_failures_are_upstream() {
        let err = ApiError::from_agent(AgentError::Model(ModelError::EmptyResponse), false);
        assert!(matches!(err, ApiError::Upstream(ref m) if m.contains("no choices")));

        let err = ApiError::from_agent(AgentError::StepLimit(5), false);
        assert!(matches!(err, ApiError::Internal { expose: false, .. }));
    }

    #[test]
    fn provider_body_is_hidden_unless_exposed() {
        let api_error = || {
            AgentError::Model(ModelError::Api {
                status: StatusCode::UNAUTHORIZED,
                body: "Incorrect API key provided: sk-abc".to_string(),
            })
        };

        let shown = ApiError::from_agent(api_error(), true);
        assert!(matches!(shown, ApiError::Upstream(ref m) if m.contains("sk-abc")));

        let hidden = ApiError::from_agent(api_error(), false);
        assert!(
            matches!(hidden, ApiError::Upstream(ref m) if m == "model API error (401 Unauthorized)")
        );
    }
}
