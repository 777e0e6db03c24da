use std::sync::Arc;
use std::time::Instant;

use serde_json::Value;

use crate::envelope::ResultEnvelope;
use crate::error::ProviderError;
use crate::registry::ToolRegistry;
use crate::schema::ArgumentError;
use crate::tool::ToolResult;

/// Per-invocation faults, all of which end up as a failure envelope.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum InvocationError {
    #[error("Unknown tool: {0}")]
    UnknownTool(String),

    #[error("Invalid arguments: {0}")]
    InvalidArguments(#[from] ArgumentError),

    #[error(transparent)]
    Provider(#[from] ProviderError),
}

/// Routes invocation requests to registered tools.
///
/// Cheap to clone; clones share the same registry.
#[derive(Debug, Clone)]
pub struct Dispatcher {
    registry: Arc<ToolRegistry>,
}

impl Dispatcher {
    pub fn new(registry: ToolRegistry) -> Self {
        Self {
            registry: Arc::new(registry),
        }
    }

    pub fn from_shared(registry: Arc<ToolRegistry>) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &ToolRegistry {
        &self.registry
    }

    /// Invoke a tool by name. Always yields an envelope.
    pub async fn invoke(&self, tool_name: &str, arguments: Value) -> ResultEnvelope {
        let started = Instant::now();
        let outcome = self.try_invoke(tool_name, arguments).await;
        let elapsed = started.elapsed();

        match outcome {
            Ok(result) => {
                log::debug!("tool {} succeeded in {:?}", tool_name, elapsed);
                ResultEnvelope::Success(result)
            }
            Err(err) => {
                log::warn!("tool {} failed in {:?}: {}", tool_name, elapsed, err);
                err.into()
            }
        }
    }

    /// Like [`invoke`](Self::invoke) but keeps the typed error.
    pub async fn try_invoke(
        &self,
        tool_name: &str,
        arguments: Value,
    ) -> Result<ToolResult, InvocationError> {
        let (tool, schema) = self.registry.resolve(tool_name)?;
        let validated = schema.validate(&arguments)?;
        log::debug!("invoking tool {} with {} argument(s)", tool_name, validated.len());
        tool.execute_raw(validated).await
    }
}
