//! Classification of AWS SDK errors into [`ProviderError`].

use std::error::Error as StdError;
use std::fmt::Debug;

use aws_smithy_runtime_api::client::result::SdkError;
use aws_smithy_types::error::metadata::ProvideErrorMetadata;
use fleet_core::ProviderError;

/// Classify an SDK operation error.
///
/// The service error code and message are used when the request reached the
/// service. Otherwise the source chain is collected and classified by text,
/// with connection and timeout failures reported as network errors.
pub(crate) fn classify_sdk_error<E, R>(err: SdkError<E, R>) -> ProviderError
where
    E: ProvideErrorMetadata + StdError + 'static,
    R: Debug,
{
    let mut messages = Vec::new();
    let err_ref: &dyn StdError = &err;
    collect_error_messages(err_ref, &mut messages);

    let root_message = messages
        .last()
        .cloned()
        .unwrap_or_else(|| "Unknown error".to_string());

    if let Some(service_err) = err.as_service_error() {
        let message = service_err
            .message()
            .map(str::to_string)
            .unwrap_or(root_message);
        return ProviderError::classify(service_err.code(), &message);
    }

    let combined = messages.join(": ");
    let classified = ProviderError::classify(None, &combined);
    match (&err, classified) {
        (
            SdkError::DispatchFailure(_) | SdkError::TimeoutError(_),
            ProviderError::Api { message, .. },
        ) => ProviderError::Network(message),
        (_, classified) => classified,
    }
}

/// Error for a request the client could not even construct.
pub(crate) fn build_error(err: impl std::fmt::Display) -> ProviderError {
    ProviderError::Api {
        code: "InvalidRequest".to_string(),
        message: err.to_string(),
    }
}

/// Walk the source chain, skipping wrappers that carry no detail.
fn collect_error_messages(err: &dyn StdError, messages: &mut Vec<String>) {
    let msg = err.to_string();
    if !msg.is_empty()
        && !msg.starts_with("dispatch failure")
        && !msg.starts_with("connector error")
        && !msg.starts_with("unhandled error")
        && !msg.starts_with("service error")
    {
        messages.push(msg);
    }

    if let Some(source) = err.source() {
        collect_error_messages(source, messages);
    }
}
