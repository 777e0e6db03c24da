use serde::Serialize;

use crate::dispatch::InvocationError;
use crate::error::ProviderErrorKind;
use crate::tool::ToolResult;

/// Category of a failed invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    UnknownTool,
    InvalidArguments,
    MissingCredentials,
    ExpiredCredentials,
    AccessDenied,
    NotFound,
    Network,
    Provider,
}

impl FailureKind {
    pub fn is_provider(&self) -> bool {
        !matches!(self, FailureKind::UnknownTool | FailureKind::InvalidArguments)
    }
}

impl From<ProviderErrorKind> for FailureKind {
    fn from(kind: ProviderErrorKind) -> Self {
        match kind {
            ProviderErrorKind::MissingCredentials => FailureKind::MissingCredentials,
            ProviderErrorKind::ExpiredCredentials => FailureKind::ExpiredCredentials,
            ProviderErrorKind::AccessDenied => FailureKind::AccessDenied,
            ProviderErrorKind::NotFound => FailureKind::NotFound,
            ProviderErrorKind::Network => FailureKind::Network,
            ProviderErrorKind::Api => FailureKind::Provider,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Failure {
    pub kind: FailureKind,
    pub message: String,
}

/// Outcome of one invocation. Every call produces exactly one.
#[derive(Debug, Clone, PartialEq)]
pub enum ResultEnvelope {
    Success(ToolResult),
    Failure(Failure),
}

impl ResultEnvelope {
    pub fn failure(kind: FailureKind, message: impl Into<String>) -> Self {
        ResultEnvelope::Failure(Failure {
            kind,
            message: message.into(),
        })
    }

    pub fn is_error(&self) -> bool {
        matches!(self, ResultEnvelope::Failure(_))
    }

    /// Text sent back to the caller: the rendered payload or the failure message.
    pub fn text(&self) -> String {
        match self {
            ResultEnvelope::Success(result) => result.as_text(),
            ResultEnvelope::Failure(failure) => failure.message.clone(),
        }
    }

    pub fn payload(&self) -> Option<&ToolResult> {
        match self {
            ResultEnvelope::Success(result) => Some(result),
            ResultEnvelope::Failure(_) => None,
        }
    }

    pub fn as_failure(&self) -> Option<&Failure> {
        match self {
            ResultEnvelope::Success(_) => None,
            ResultEnvelope::Failure(failure) => Some(failure),
        }
    }

    pub fn failure_kind(&self) -> Option<FailureKind> {
        self.as_failure().map(|f| f.kind)
    }
}

impl From<ToolResult> for ResultEnvelope {
    fn from(result: ToolResult) -> Self {
        ResultEnvelope::Success(result)
    }
}

impl From<InvocationError> for ResultEnvelope {
    fn from(err: InvocationError) -> Self {
        let kind = match &err {
            InvocationError::UnknownTool(_) => FailureKind::UnknownTool,
            InvocationError::InvalidArguments(_) => FailureKind::InvalidArguments,
            InvocationError::Provider(provider) => provider.kind().into(),
        };
        ResultEnvelope::failure(kind, err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ProviderError;
    use crate::schema::ArgumentError;
    use serde_json::json;

    #[test]
    fn test_success_text_is_pretty_json() {
        let envelope = ResultEnvelope::from(ToolResult::Json(json!({"count": 0, "buckets": []})));

        assert!(!envelope.is_error());
        assert_eq!(envelope.text(), "{\n  \"count\": 0,\n  \"buckets\": []\n}");
        assert!(envelope.failure_kind().is_none());
    }

    #[test]
    fn test_unknown_tool_message() {
        let envelope = ResultEnvelope::from(InvocationError::UnknownTool("ec2_nuke".into()));

        assert!(envelope.is_error());
        assert_eq!(envelope.failure_kind(), Some(FailureKind::UnknownTool));
        assert_eq!(envelope.text(), "Unknown tool: ec2_nuke");
    }

    #[test]
    fn test_invalid_arguments_message_names_field() {
        let envelope = ResultEnvelope::from(InvocationError::InvalidArguments(ArgumentError::new(
            "bucket",
            "required argument is missing",
        )));

        assert_eq!(envelope.failure_kind(), Some(FailureKind::InvalidArguments));
        assert_eq!(
            envelope.text(),
            "Invalid arguments: bucket: required argument is missing"
        );
    }

    #[test]
    fn test_provider_failure_kinds() {
        let envelope = ResultEnvelope::from(InvocationError::Provider(
            ProviderError::MissingCredentials,
        ));
        assert_eq!(envelope.failure_kind(), Some(FailureKind::MissingCredentials));
        assert!(envelope.text().starts_with("AWS credentials not configured."));

        let envelope = ResultEnvelope::from(InvocationError::Provider(ProviderError::Api {
            code: "Throttling".into(),
            message: "Rate exceeded".into(),
        }));
        assert_eq!(envelope.failure_kind(), Some(FailureKind::Provider));
        assert!(FailureKind::Provider.is_provider());
        assert!(!FailureKind::UnknownTool.is_provider());
    }
}
