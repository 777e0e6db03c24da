//! Normalized provider faults.
//!
//! Every failure a handler reports is collapsed into [`ProviderError`], whose
//! `Display` output carries a stable prefix per category.

/// Message shown when no AWS credentials could be resolved.
pub const MISSING_CREDENTIALS_MESSAGE: &str = "AWS credentials not configured. Set AWS_ACCESS_KEY_ID and AWS_SECRET_ACCESS_KEY, or configure an AWS profile.";

/// Message shown when the resolved credentials are no longer valid.
pub const EXPIRED_CREDENTIALS_MESSAGE: &str =
    "AWS credentials have expired. Refresh your session token or re-authenticate.";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProviderError {
    #[error("{}", MISSING_CREDENTIALS_MESSAGE)]
    MissingCredentials,

    #[error("{}", EXPIRED_CREDENTIALS_MESSAGE)]
    ExpiredCredentials,

    #[error("Access denied: {0}")]
    AccessDenied(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("AWS API error: {code}: {message}")]
    Api { code: String, message: String },
}

/// Stable category of a provider fault.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderErrorKind {
    MissingCredentials,
    ExpiredCredentials,
    AccessDenied,
    NotFound,
    Network,
    Api,
}

const MISSING_CREDENTIAL_PATTERNS: &[&str] = &[
    "could not load credentials",
    "no credentials",
    "credentials provider was not enabled",
    "no providers in chain provided credentials",
    "failed to load credentials",
    "unable to load credentials",
    "error occurred while loading credentials",
];

const EXPIRED_CODES: &[&str] = &["ExpiredToken", "ExpiredTokenException", "RequestExpired"];

const ACCESS_DENIED_CODES: &[&str] = &[
    "AccessDenied",
    "AccessDeniedException",
    "UnauthorizedOperation",
    "UnrecognizedClientException",
    "InvalidClientTokenId",
    "AuthFailure",
    "SignatureDoesNotMatch",
];

const NETWORK_PATTERNS: &[&str] = &[
    "dispatch failure",
    "connection refused",
    "connection reset",
    "dns error",
    "timed out",
    "timeout",
];

impl ProviderError {
    /// Classify a fault from its service error code (when known) and message.
    ///
    /// Credential problems are checked first so an unresolvable credential
    /// chain reported as a dispatch failure is not mistaken for a network
    /// fault.
    pub fn classify(code: Option<&str>, message: &str) -> Self {
        let code = code.filter(|c| !c.is_empty());
        let lower = message.to_lowercase();

        if code == Some("CredentialsProviderError")
            || MISSING_CREDENTIAL_PATTERNS.iter().any(|p| lower.contains(p))
        {
            return ProviderError::MissingCredentials;
        }

        if code.is_some_and(|c| EXPIRED_CODES.contains(&c)) || lower.contains("expired") {
            return ProviderError::ExpiredCredentials;
        }

        if code.is_some_and(|c| ACCESS_DENIED_CODES.contains(&c))
            || lower.contains("access denied")
            || lower.contains("not authorized")
        {
            return ProviderError::AccessDenied(message.to_string());
        }

        if let Some(c) = code {
            if c.ends_with("NotFound") || c.ends_with("NotFoundException") || c.starts_with("NoSuch")
            {
                return ProviderError::NotFound(message.to_string());
            }
        }

        if code.is_none() && NETWORK_PATTERNS.iter().any(|p| lower.contains(p)) {
            return ProviderError::Network(message.to_string());
        }

        ProviderError::Api {
            code: code.unwrap_or("Error").to_string(),
            message: message.to_string(),
        }
    }

    pub fn kind(&self) -> ProviderErrorKind {
        match self {
            ProviderError::MissingCredentials => ProviderErrorKind::MissingCredentials,
            ProviderError::ExpiredCredentials => ProviderErrorKind::ExpiredCredentials,
            ProviderError::AccessDenied(_) => ProviderErrorKind::AccessDenied,
            ProviderError::NotFound(_) => ProviderErrorKind::NotFound,
            ProviderError::Network(_) => ProviderErrorKind::Network,
            ProviderError::Api { .. } => ProviderErrorKind::Api,
        }
    }

    pub fn is_credentials(&self) -> bool {
        matches!(
            self,
            ProviderError::MissingCredentials | ProviderError::ExpiredCredentials
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_credentials_by_message() {
        let err = ProviderError::classify(None, "Could not load credentials from any providers");
        assert_eq!(err, ProviderError::MissingCredentials);
        assert!(err.to_string().starts_with("AWS credentials not configured."));
    }

    #[test]
    fn test_missing_credentials_by_code() {
        let err = ProviderError::classify(Some("CredentialsProviderError"), "whatever");
        assert_eq!(err, ProviderError::MissingCredentials);
    }

    #[test]
    fn test_missing_credentials_wins_over_network() {
        let err = ProviderError::classify(
            None,
            "dispatch failure: an error occurred while loading credentials: no providers in chain provided credentials",
        );
        assert_eq!(err, ProviderError::MissingCredentials);
    }

    #[test]
    fn test_expired_credentials() {
        let by_code = ProviderError::classify(Some("ExpiredToken"), "The security token is invalid");
        let by_message = ProviderError::classify(None, "The provided token has expired.");

        assert_eq!(by_code, ProviderError::ExpiredCredentials);
        assert_eq!(by_message, ProviderError::ExpiredCredentials);
        assert!(by_code.to_string().starts_with("AWS credentials have expired."));
    }

    #[test]
    fn test_access_denied() {
        let err = ProviderError::classify(
            Some("UnauthorizedOperation"),
            "You are not authorized to perform this operation.",
        );
        assert_eq!(err.kind(), ProviderErrorKind::AccessDenied);
        assert_eq!(
            err.to_string(),
            "Access denied: You are not authorized to perform this operation."
        );
    }

    #[test]
    fn test_not_found_codes() {
        for code in ["NoSuchBucket", "ResourceNotFoundException", "ClusterNotFoundException"] {
            let err = ProviderError::classify(Some(code), "gone");
            assert_eq!(err, ProviderError::NotFound("gone".into()), "code {code}");
        }
    }

    #[test]
    fn test_network() {
        let err = ProviderError::classify(None, "dispatch failure: connection refused");
        assert_eq!(err.kind(), ProviderErrorKind::Network);
        assert!(err.to_string().starts_with("Network error: "));
    }

    #[test]
    fn test_generic_api_error() {
        let err = ProviderError::classify(Some("ValidationError"), "Stack with id x does not exist");
        assert_eq!(
            err.to_string(),
            "AWS API error: ValidationError: Stack with id x does not exist"
        );

        let uncoded = ProviderError::classify(None, "boom");
        assert_eq!(uncoded.to_string(), "AWS API error: Error: boom");
        assert!(!uncoded.is_credentials());
    }

    #[test]
    fn test_empty_code_treated_as_absent() {
        let err = ProviderError::classify(Some(""), "boom");
        assert_eq!(
            err,
            ProviderError::Api {
                code: "Error".into(),
                message: "boom".into()
            }
        );
    }
}
