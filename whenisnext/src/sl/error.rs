//! SL API error types.

use crate::domain::TimeError;

/// Broad classification of an [`SlError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Connection, DNS or timeout failure
    Network,
    /// Unexpected HTTP status, upstream status code or missing field
    Protocol,
    /// Malformed JSON or timestamp
    Parse,
    /// Client used without the credentials it needs
    Config,
}

/// Errors that can occur when talking to the SL APIs.
#[derive(Debug, thiserror::Error)]
pub enum SlError {
    /// HTTP request failed (network error, timeout, etc.)
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// API returned a non-success HTTP status
    #[error("API error {status}: {message}")]
    Http { status: u16, message: String },

    /// API answered 200 but reported a failure in its envelope
    #[error("API returned status code {code}: {message}")]
    Upstream { code: i64, message: String },

    /// A field the response must carry was absent
    #[error("missing field in response: {0}")]
    MissingField(&'static str),

    /// Failed to parse response JSON
    #[error("JSON parse error: {message}")]
    Json {
        message: String,
        body: Option<String>,
    },

    /// An expected departure time did not match the fixed format
    #[error(transparent)]
    Time(#[from] TimeError),

    /// Feature not configured
    #[error("not configured: {0}")]
    NotConfigured(&'static str),
}

impl SlError {
    /// Classify this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            SlError::Network(_) => ErrorKind::Network,
            SlError::Http { .. } | SlError::Upstream { .. } | SlError::MissingField(_) => {
                ErrorKind::Protocol
            }
            SlError::Json { .. } | SlError::Time(_) => ErrorKind::Parse,
            SlError::NotConfigured(_) => ErrorKind::Config,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Departure;

    #[test]
    fn error_display() {
        let err = SlError::Http {
            status: 500,
            message: "Internal Server Error".into(),
        };
        assert_eq!(err.to_string(), "API error 500: Internal Server Error");

        let err = SlError::Upstream {
            code: 1002,
            message: "Key is invalid".into(),
        };
        assert_eq!(
            err.to_string(),
            "API returned status code 1002: Key is invalid"
        );

        let err = SlError::MissingField("ResponseData");
        assert_eq!(err.to_string(), "missing field in response: ResponseData");

        let err = SlError::Json {
            message: "expected value".into(),
            body: Some("<html>".into()),
        };
        assert!(err.to_string().contains("JSON parse error"));
    }

    #[test]
    fn kinds() {
        assert_eq!(
            SlError::Http {
                status: 404,
                message: String::new()
            }
            .kind(),
            ErrorKind::Protocol
        );
        assert_eq!(SlError::MissingField("Name").kind(), ErrorKind::Protocol);
        assert_eq!(
            SlError::Json {
                message: String::new(),
                body: None
            }
            .kind(),
            ErrorKind::Parse
        );

        let time_err = Departure::parse("nope").unwrap_err();
        assert_eq!(SlError::from(time_err).kind(), ErrorKind::Parse);
        assert_eq!(
            SlError::NotConfigured("api_key_lookup").kind(),
            ErrorKind::Config
        );
    }
}
