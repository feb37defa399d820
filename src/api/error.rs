use serde::Deserialize;

/// Error type for dashboard API calls
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Non-2xx response whose JSON body carried an `error` message
    #[error("{message}")]
    Server { status: u16, message: String },
    /// Non-2xx response without a usable JSON error body
    #[error("HTTP {status}: {body}")]
    Http { status: u16, body: String },
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("unexpected response body: {0}")]
    Decode(#[source] serde_json::Error),
    #[error("invalid server url '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },
}

impl ApiError {
    /// HTTP status for server-side failures, None for transport problems
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Server { status, .. } | ApiError::Http { status, .. } => Some(*status),
            _ => None,
        }
    }
}

#[derive(Deserialize)]
struct ErrorBody {
    error: Option<String>,
}

/// Turn a failed response into an error, preferring the server's own message.
pub fn classify_failure(status: u16, body: &str) -> ApiError {
    match serde_json::from_str::<ErrorBody>(body) {
        Ok(ErrorBody {
            error: Some(message),
        }) => ApiError::Server { status, message },
        _ => ApiError::Http {
            status,
            body: body.to_string(),
        },
    }
}
