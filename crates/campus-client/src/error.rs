//! Client error types.
//!
//! Maps HTTP status codes to typed error variants. The backend reports
//! failures as `{"message": "...", "code": "..."}`; the message is surfaced
//! to the user verbatim, so every variant keeps it intact.

use std::fmt;

use crate::storage::StorageError;

/// Errors that can occur when talking to the Campus backend or persisting
/// client state.
#[derive(Debug, Clone, PartialEq)]
pub enum ClientError {
    /// Network-level error (DNS, connection refused, timeout, TLS).
    Network(String),

    /// 400 Bad Request.
    BadRequest { code: String, message: String },

    /// 401 Unauthorized: missing, expired or revoked token.
    Unauthorized { code: String, message: String },

    /// 403 Forbidden: the role is not allowed to perform the call.
    Forbidden { code: String, message: String },

    /// 404 Not Found.
    NotFound { message: String },

    /// 409 Conflict (e.g. a session with the same name already exists).
    Conflict { code: String, message: String },

    /// 422 Unprocessable Entity: validation error.
    UnprocessableEntity { code: String, message: String },

    /// 429 Too Many Requests.
    TooManyRequests { message: String },

    /// 5xx or any other unexpected status.
    Server { status: u16, message: String },

    /// The response body did not match the expected shape.
    Deserialization(String),

    /// A request body could not be encoded.
    Encoding(String),

    /// Durable client storage failed.
    Storage(String),

    /// The operation is tenant-scoped but no school is in context.
    NoTenant,
}

impl ClientError {
    /// Create a network error from a reqwest error.
    pub fn network(err: reqwest::Error) -> Self {
        Self::Network(err.to_string())
    }

    /// Build the error for a non-success response.
    ///
    /// The message comes from the body's `message` field (or
    /// `error.message`); when the body carries none, the raw body is used,
    /// and when that is empty a per-status default.
    pub fn from_status(status: u16, body: &str) -> Self {
        let detail = ErrorDetail::parse(body);
        let code = |default: &str| detail.code.clone().unwrap_or_else(|| default.to_string());
        let message = |default: &str| {
            detail.message.clone().unwrap_or_else(|| {
                if body.trim().is_empty() {
                    default.to_string()
                } else {
                    body.to_string()
                }
            })
        };

        match status {
            400 => Self::BadRequest {
                code: code("BAD_REQUEST"),
                message: message("Bad request"),
            },
            401 => Self::Unauthorized {
                code: code("UNAUTHORIZED"),
                message: message("Unauthorized"),
            },
            403 => Self::Forbidden {
                code: code("FORBIDDEN"),
                message: message("Forbidden"),
            },
            404 => Self::NotFound {
                message: message("Not found"),
            },
            409 => Self::Conflict {
                code: code("CONFLICT"),
                message: message("Conflict"),
            },
            422 => Self::UnprocessableEntity {
                code: code("UNPROCESSABLE_ENTITY"),
                message: message("Unprocessable entity"),
            },
            429 => Self::TooManyRequests {
                message: message("Too many requests"),
            },
            _ => Self::Server {
                status,
                message: message("Server error"),
            },
        }
    }

    /// Get the error code, if available.
    pub fn code(&self) -> Option<&str> {
        match self {
            Self::BadRequest { code, .. } => Some(code),
            Self::Unauthorized { code, .. } => Some(code),
            Self::Forbidden { code, .. } => Some(code),
            Self::Conflict { code, .. } => Some(code),
            Self::UnprocessableEntity { code, .. } => Some(code),
            _ => None,
        }
    }

    /// The user-facing message.
    pub fn message(&self) -> &str {
        match self {
            Self::Network(msg) => msg,
            Self::BadRequest { message, .. } => message,
            Self::Unauthorized { message, .. } => message,
            Self::Forbidden { message, .. } => message,
            Self::NotFound { message } => message,
            Self::Conflict { message, .. } => message,
            Self::UnprocessableEntity { message, .. } => message,
            Self::TooManyRequests { message } => message,
            Self::Server { message, .. } => message,
            Self::Deserialization(msg) => msg,
            Self::Encoding(msg) => msg,
            Self::Storage(msg) => msg,
            Self::NoTenant => "No school selected",
        }
    }

    /// Get the HTTP status code, if applicable.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::BadRequest { .. } => Some(400),
            Self::Unauthorized { .. } => Some(401),
            Self::Forbidden { .. } => Some(403),
            Self::NotFound { .. } => Some(404),
            Self::Conflict { .. } => Some(409),
            Self::UnprocessableEntity { .. } => Some(422),
            Self::TooManyRequests { .. } => Some(429),
            Self::Server { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Returns `true` if this is an authentication error (401).
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Unauthorized { .. })
    }

    /// Returns `true` if this is a network-level error.
    pub fn is_network(&self) -> bool {
        matches!(self, Self::Network(_))
    }

    /// Returns `true` for a 404.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

impl fmt::Display for ClientError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Network(msg) => write!(f, "Network error: {}", msg),
            Self::BadRequest { code, message } => write!(f, "Bad Request [{}]: {}", code, message),
            Self::Unauthorized { code, message } => {
                write!(f, "Unauthorized [{}]: {}", code, message)
            }
            Self::Forbidden { code, message } => write!(f, "Forbidden [{}]: {}", code, message),
            Self::NotFound { message } => write!(f, "Not Found: {}", message),
            Self::Conflict { code, message } => write!(f, "Conflict [{}]: {}", code, message),
            Self::UnprocessableEntity { code, message } => {
                write!(f, "Unprocessable Entity [{}]: {}", code, message)
            }
            Self::TooManyRequests { message } => write!(f, "Too Many Requests: {}", message),
            Self::Server { status, message } => write!(f, "Server Error ({}): {}", status, message),
            Self::Deserialization(msg) => write!(f, "Deserialization error: {}", msg),
            Self::Encoding(msg) => write!(f, "Encoding error: {}", msg),
            Self::Storage(msg) => write!(f, "Storage error: {}", msg),
            Self::NoTenant => write!(f, "No school selected"),
        }
    }
}

impl std::error::Error for ClientError {}

impl From<StorageError> for ClientError {
    fn from(err: StorageError) -> Self {
        Self::Storage(err.to_string())
    }
}

/// `code`/`message` pulled out of an error body.
///
/// Accepts both the flat shape `{"message", "code"}` and the nested
/// `{"error": {"message", "code"}}` shape; a string `error` field counts as
/// the message.
#[derive(Debug, Default)]
struct ErrorDetail {
    code: Option<String>,
    message: Option<String>,
}

impl ErrorDetail {
    fn parse(body: &str) -> Self {
        let Ok(value) = serde_json::from_str::<serde_json::Value>(body) else {
            return Self::default();
        };
        let nested = value.get("error");
        let text = |v: Option<&serde_json::Value>| v.and_then(|v| v.as_str()).map(str::to_string);

        let message = text(value.get("message"))
            .or_else(|| text(nested.and_then(|e| e.get("message"))))
            .or_else(|| text(nested));
        let code = text(value.get("code")).or_else(|| text(nested.and_then(|e| e.get("code"))));

        Self { code, message }
    }
}
