use reqwest::StatusCode;
use serde::Deserialize;
use thiserror::Error;

pub type DdResult<T> = color_eyre::eyre::Result<T>;

/// Coarse failure class of a remote call, used to decide whether a step
/// aborts the run or lets it continue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::Display, strum_macros::EnumIter)]
#[strum(serialize_all = "kebab-case")]
pub enum ErrorClass {
    Unauthorized,
    NotFound,
    AlreadyTerminal,
    RateLimited,
    Api,
    Network,
    Decode,
}

#[derive(Debug, Error)]
pub enum RemoteError {
    #[error("unauthorized ({status}): {message}")]
    Unauthorized { status: StatusCode, message: String },
    #[error("not found: {message}")]
    NotFound { message: String },
    #[error("resource cannot accept this request ({status}): {message}")]
    AlreadyTerminal { status: StatusCode, message: String },
    #[error("rate limited: {message}")]
    RateLimited { message: String },
    #[error("api error ({status}{}): {message}", id_suffix(.id))]
    Api {
        status: StatusCode,
        id: Option<String>,
        message: String,
    },
    #[error("network error: {0}")]
    Network(#[source] reqwest::Error),
    #[error("unexpected response body at `{path}`: {message}")]
    Decode { path: String, message: String },
}

fn id_suffix(id: &Option<String>) -> String {
    id.as_deref().map(|id| format!(", {id}")).unwrap_or_default()
}

/// Error body returned by the DigitalOcean API on non-2xx responses.
#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    id: Option<String>,
    message: Option<String>,
}

impl RemoteError {
    /// Classify a non-success response from its status and raw body.
    pub fn from_status(status: StatusCode, body: &[u8]) -> Self {
        let (id, message) = match serde_json::from_slice::<ApiErrorBody>(body) {
            Ok(ApiErrorBody { id, message }) => (id, message),
            Err(_) => (None, None),
        };
        let message = message
            .filter(|m| !m.is_empty())
            .or_else(|| status.canonical_reason().map(str::to_string))
            .unwrap_or_else(|| String::from("no message"));

        match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                RemoteError::Unauthorized { status, message }
            }
            StatusCode::NOT_FOUND => RemoteError::NotFound { message },
            StatusCode::CONFLICT | StatusCode::UNPROCESSABLE_ENTITY => {
                RemoteError::AlreadyTerminal { status, message }
            }
            StatusCode::TOO_MANY_REQUESTS => RemoteError::RateLimited { message },
            _ => RemoteError::Api {
                status,
                id,
                message,
            },
        }
    }

    pub fn class(&self) -> ErrorClass {
        match self {
            RemoteError::Unauthorized { .. } => ErrorClass::Unauthorized,
            RemoteError::NotFound { .. } => ErrorClass::NotFound,
            RemoteError::AlreadyTerminal { .. } => ErrorClass::AlreadyTerminal,
            RemoteError::RateLimited { .. } => ErrorClass::RateLimited,
            RemoteError::Api { .. } => ErrorClass::Api,
            RemoteError::Network(_) => ErrorClass::Network,
            RemoteError::Decode { .. } => ErrorClass::Decode,
        }
    }
}

impl From<reqwest::Error> for RemoteError {
    fn from(err: reqwest::Error) -> Self {
        RemoteError::Network(err)
    }
}

impl From<serde_path_to_error::Error<serde_json::Error>> for RemoteError {
    fn from(err: serde_path_to_error::Error<serde_json::Error>) -> Self {
        RemoteError::Decode {
            path: err.path().to_string(),
            message: err.inner().to_string(),
        }
    }
}
