use reqwest::StatusCode;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("request to {path} failed: {source}")]
    Http {
        path: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("{path} returned {status}: {body}")]
    Status {
        path: String,
        status: StatusCode,
        body: String,
    },
    #[error("could not decode response from {path}: {source}")]
    Decode {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}

impl ApiError {
    /// Short, user-facing description for status lines.
    pub fn summary(&self) -> String {
        match self {
            ApiError::Http { source, .. } if source.is_timeout() => "request timed out".to_string(),
            ApiError::Http { source, .. } if source.is_connect() => {
                "could not reach the server".to_string()
            }
            ApiError::Http { .. } => "network error".to_string(),
            ApiError::Status { status, .. } => format!("server error ({status})"),
            ApiError::Decode { .. } => "unexpected response from server".to_string(),
        }
    }
}
