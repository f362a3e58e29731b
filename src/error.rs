//! Custom error types for push-release with improved type safety and error handling.

use thiserror::Error;

/// Main error type for push-release operations.
#[derive(Error, Debug)]
pub enum PushReleaseError {
    // Cli args errors
    #[error("Invalid arguments: {0}")]
    InvalidArgs(String),

    // Configuration errors
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Invalid push event: {0}")]
    InvalidEvent(String),

    // Release decision errors
    #[error("Failed to classify commit message: {0}")]
    Classification(String),

    #[error(
        "Cannot determine release eligibility: status checks could not be fetched after {attempts} attempts: {message}"
    )]
    ChecksUndetermined { attempts: u32, message: String },

    #[error(
        "No prior release tag found: configure an initial version to create the first release"
    )]
    NoPriorTag,

    #[error("Commit does not imply a version increment: nothing to release")]
    NothingToRelease,

    // Forge errors
    #[error("Forge operation failed: {0}")]
    ForgeError(String),

    // Network/API errors
    #[error("Network request failed: {0}")]
    NetworkError(String),

    #[error("API authentication failed: {0}")]
    AuthenticationError(String),

    #[error("API rate limit exceeded")]
    RateLimitExceeded,

    #[error("API request rejected with status {status}: {message}")]
    RequestRejected { status: u16, message: String },

    // Version/parsing errors - automatic conversions via #[from]
    #[error("Invalid version format: {0}")]
    InvalidVersion(#[from] semver::Error),

    #[error("Template rendering failed: {0}")]
    TemplateError(#[from] tera::Error),

    // TOML parsing errors
    #[error("TOML parse error: {0}")]
    TomlParseError(#[from] toml::de::Error),

    // JSON parsing errors
    #[error("JSON parse error: {0}")]
    JsonParseError(#[from] serde_json::Error),

    #[error("URL parse error: {0}")]
    UrlError(#[from] url::ParseError),

    #[error("Logger initialization error: {0}")]
    LoggerError(#[from] log::SetLoggerError),

    // Generic wrapper for other errors
    #[error(transparent)]
    Other(#[from] color_eyre::Report),
}

/// Result type alias using PushReleaseError
pub type Result<T> = std::result::Result<T, PushReleaseError>;

impl PushReleaseError {
    /// Create a forge error with context
    pub fn forge(msg: impl Into<String>) -> Self {
        Self::ForgeError(msg.into())
    }

    /// Create an invalid config error
    pub fn invalid_config(msg: impl Into<String>) -> Self {
        Self::InvalidConfig(msg.into())
    }

    /// Create an invalid event error
    pub fn invalid_event(msg: impl Into<String>) -> Self {
        Self::InvalidEvent(msg.into())
    }

    /// Whether the error is worth retrying. Only failures reaching or coming
    /// back from the host qualify.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            Self::NetworkError(_) | Self::RateLimitExceeded | Self::ForgeError(_)
        )
    }

    /// Whether the error only means this push produces no release, rather
    /// than a failure of the handler.
    pub fn is_no_release(&self) -> bool {
        matches!(self, Self::Classification(_))
    }

    /// Classify a host response by status code: 5xx is retryable, 429 and
    /// rate-limit 403s are rate limits, 401/403 are auth failures, and any
    /// other 4xx is rejected for good.
    pub fn from_status(status: u16, message: impl Into<String>) -> Self {
        let message = message.into();

        match status {
            429 => Self::RateLimitExceeded,
            403 if message.to_lowercase().contains("rate limit") => {
                Self::RateLimitExceeded
            }
            401 | 403 => Self::AuthenticationError(message),
            500..=599 => Self::ForgeError(format!("{status}: {message}")),
            _ => Self::RequestRejected { status, message },
        }
    }
}

// Implement From for std::io::Error - wraps in Other variant for generic I/O errors
impl From<std::io::Error> for PushReleaseError {
    fn from(err: std::io::Error) -> Self {
        Self::Other(color_eyre::Report::from(err))
    }
}

// Implement From for reqwest errors (network/API)
impl From<reqwest::Error> for PushReleaseError {
    fn from(err: reqwest::Error) -> Self {
        match err.status() {
            Some(status) => Self::from_status(status.as_u16(), err.to_string()),
            None => Self::NetworkError(err.to_string()),
        }
    }
}

// Implement From for octocrab errors (GitHub API)
impl From<octocrab::Error> for PushReleaseError {
    fn from(err: octocrab::Error) -> Self {
        match &err {
            octocrab::Error::GitHub { source, .. } => Self::from_status(
                source.status_code.as_u16(),
                source.message.clone(),
            ),
            octocrab::Error::Hyper { .. }
            | octocrab::Error::Service { .. }
            | octocrab::Error::Http { .. } => {
                Self::NetworkError(format!("GitHub API error: {}", err))
            }
            _ => Self::Other(color_eyre::Report::msg(format!(
                "GitHub API error: {}",
                err
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_formats() {
        let err = PushReleaseError::forge("API call failed");
        assert_eq!(err.to_string(), "Forge operation failed: API call failed");

        let err = PushReleaseError::invalid_config("missing field");
        assert_eq!(err.to_string(), "Invalid configuration: missing field");

        let err = PushReleaseError::ChecksUndetermined {
            attempts: 4,
            message: "boom".into(),
        };
        assert!(err.to_string().contains("after 4 attempts: boom"));
    }

    #[test]
    fn test_error_helpers() {
        let err = PushReleaseError::forge("API call failed");
        assert!(matches!(err, PushReleaseError::ForgeError(_)));

        let err = PushReleaseError::invalid_event("no repository");
        assert!(matches!(err, PushReleaseError::InvalidEvent(_)));
    }

    #[test]
    fn test_transient_errors() {
        assert!(PushReleaseError::forge("500").is_transient());
        assert!(PushReleaseError::RateLimitExceeded.is_transient());
        assert!(PushReleaseError::NetworkError("reset".into()).is_transient());
        assert!(
            !PushReleaseError::AuthenticationError("bad token".into())
                .is_transient()
        );
        assert!(!PushReleaseError::NoPriorTag.is_transient());
    }

    #[test]
    fn test_status_codes_split_transient_from_permanent() {
        for status in [500, 502, 503] {
            let err = PushReleaseError::from_status(status, "server error");
            assert!(matches!(err, PushReleaseError::ForgeError(_)));
            assert!(err.is_transient(), "{status}");
        }

        let err = PushReleaseError::from_status(429, "slow down");
        assert!(matches!(err, PushReleaseError::RateLimitExceeded));
        assert!(err.is_transient());

        let err = PushReleaseError::from_status(403, "API rate limit exceeded");
        assert!(matches!(err, PushReleaseError::RateLimitExceeded));

        let err = PushReleaseError::from_status(403, "Resource not accessible");
        assert!(matches!(err, PushReleaseError::AuthenticationError(_)));
        assert!(!err.is_transient());

        let err = PushReleaseError::from_status(401, "Bad credentials");
        assert!(matches!(err, PushReleaseError::AuthenticationError(_)));

        for status in [404, 409, 422] {
            let err = PushReleaseError::from_status(status, "Not Found");
            assert!(matches!(
                err,
                PushReleaseError::RequestRejected { status: s, .. } if s == status
            ));
            assert!(!err.is_transient(), "{status}");
        }
    }

    #[test]
    fn test_only_classification_means_no_release() {
        assert!(
            PushReleaseError::Classification("Merge branch".into())
                .is_no_release()
        );
        assert!(!PushReleaseError::NoPriorTag.is_no_release());
        assert!(!PushReleaseError::forge("500").is_no_release());
    }

    #[test]
    fn test_from_conversions() {
        let semver_err = semver::Version::parse("invalid");
        assert!(semver_err.is_err());
        let err: PushReleaseError = semver_err.unwrap_err().into();
        assert!(matches!(err, PushReleaseError::InvalidVersion(_)));
    }
}
