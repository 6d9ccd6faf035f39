use reqwest::StatusCode;

/// Failures talking to the chat model provider.
#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    #[error("model request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("model API error ({status}): {body}")]
    Api { status: StatusCode, body: String },

    #[error("failed to decode model response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("model returned no choices")]
    EmptyResponse,
}

impl ModelError {
    /// Same failure without any upstream response body.
    pub fn redacted(&self) -> String {
        match self {
            ModelError::Api { status, .. } => format!("model API error ({status})"),
            other => other.to_string(),
        }
    }
}

/// Rejected tool invocation; reported back to the model, not to the caller.
#[derive(Debug, thiserror::Error)]
pub enum ToolError {
    #[error("invalid arguments: {0}")]
    InvalidArguments(String),

    #[error("unknown tool '{0}'")]
    UnknownTool(String),
}

#[derive(Debug, thiserror::Error)]
pub enum AgentError {
    #[error(transparent)]
    Model(#[from] ModelError),

    #[error("agent did not produce a reply within {0} model calls")]
    StepLimit(usize),
}

/// Clip an upstream response body for inclusion in an error message.
pub(crate) fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((idx, _)) => format!("{}...", &body[..idx]),
        None => body.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncate_body_keeps_char_boundaries() {
        let long = "天".repeat(300);
        let truncated = truncate_body(&long);
        assert!(truncated.ends_with("..."));
        assert_eq!(truncated.chars().count(), 203);
        assert_eq!(truncate_body("short"), "short");
    }

    #[test]
    fn redacted_drops_api_body() {
        let err = ModelError::Api {
            status: StatusCode::UNAUTHORIZED,
            body: "Incorrect API key provided: sk-abc".to_string(),
        };

        assert!(err.to_string().contains("sk-abc"));
        assert_eq!(err.redacted(), "model API error (401 Unauthorized)");
        assert_eq!(
            ModelError::EmptyResponse.redacted(),
            "model returned no choices"
        );
    }
}
