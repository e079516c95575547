//! Error types for conedb-client

/// Result type alias for client operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur during client operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Client configuration error
    #[error("configuration error: {0}")]
    Config(String),

    /// Authentication failure (invalid or rejected API key)
    #[error("authentication error: {0}")]
    Auth(String),

    /// A required index name was not provided
    #[error("index name is missing")]
    IndexNameMissing,

    /// The named index does not exist
    #[error("index \"{0}\" does not exist")]
    IndexNotFound(String),

    /// Required index-creation parameters are absent
    #[error("index creation data missing: {0}")]
    CreationDataMissing(String),

    /// The controller reported a terminal failure while provisioning
    #[error("index \"{0}\" creation failed")]
    CreationFailed(String),

    /// The readiness poll budget was exhausted before a terminal state
    #[error("index \"{name}\" not ready after {attempts} attempts")]
    RetryExhausted {
        /// Index being waited on
        name: String,
        /// Attempts performed before giving up
        attempts: u32,
    },

    /// The operation was cancelled
    #[error("operation cancelled")]
    Cancelled,

    /// The API returned a non-success response
    #[error("api error ({status}): {message}")]
    Api {
        /// HTTP status code
        status: u16,
        /// Response body (bounded)
        message: String,
    },

    /// Request timeout
    #[error("timeout: {0}")]
    Timeout(String),

    /// Network / transport error
    #[error("connection error: {0}")]
    Connection(String),

    /// Serialization / deserialization error
    #[error("serialization error: {0}")]
    Serialization(String),
}

impl Error {
    /// Whether this error means the queried resource does not exist.
    ///
    /// Used to distinguish create-vs-reuse in existence checks and
    /// "not visible yet" during readiness polling.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Error::IndexNotFound(_) | Error::Api { status: 404, .. }
        )
    }

    /// Whether this error is plausibly transient.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Error::Timeout(_) | Error::Connection(_) | Error::Api { status: 500..=599, .. }
        )
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Error::Timeout("request timed out".to_string())
        } else if err.is_connect() {
            Error::Connection(err.to_string())
        } else if let Some(status) = err.status() {
            match status.as_u16() {
                401 | 403 => Error::Auth(err.to_string()),
                code => Error::Api {
                    status: code,
                    message: err.to_string(),
                },
            }
        } else {
            Error::Connection(err.to_string())
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Serialization(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_not_found() {
        assert!(Error::IndexNotFound("idx".into()).is_not_found());
        assert!(Error::Api {
            status: 404,
            message: "missing".into()
        }
        .is_not_found());
        assert!(!Error::Api {
            status: 500,
            message: "boom".into()
        }
        .is_not_found());
        assert!(!Error::CreationFailed("idx".into()).is_not_found());
    }

    #[test]
    fn test_is_retryable() {
        assert!(Error::Timeout("t".into()).is_retryable());
        assert!(Error::Connection("c".into()).is_retryable());
        assert!(Error::Api {
            status: 503,
            message: "busy".into()
        }
        .is_retryable());
        assert!(!Error::Auth("bad key".into()).is_retryable());
        assert!(!Error::IndexNotFound("idx".into()).is_retryable());
    }

    #[test]
    fn test_display_includes_identifier() {
        let err = Error::CreationFailed("my-index".into());
        assert_eq!(err.to_string(), "index \"my-index\" creation failed");

        let err = Error::RetryExhausted {
            name: "my-index".into(),
            attempts: 300,
        };
        assert_eq!(
            err.to_string(),
            "index \"my-index\" not ready after 300 attempts"
        );
    }
}
