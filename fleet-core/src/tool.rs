use std::future::Future;
use std::pin::Pin;

use schemars::JsonSchema;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::dispatch::InvocationError;
use crate::error::ProviderError;
use crate::schema::{input_schema_for, ArgumentError};

/// Payload a tool hands back on success.
///
/// Service tools return [`ToolResult::Json`]; `Text` exists for tools whose
/// natural output is prose.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ToolResult {
    /// Plain text response
    Text(String),

    /// Structured JSON data
    Json(Value),
}

impl ToolResult {
    /// Create a JSON result from any serializable type
    pub fn json<T: Serialize>(value: T) -> Result<Self, serde_json::Error> {
        Ok(Self::Json(serde_json::to_value(value)?))
    }

    /// Create a text result from a string
    pub fn text(s: impl Into<String>) -> Self {
        Self::Text(s.into())
    }

    /// Render the payload the way it goes over the wire.
    ///
    /// JSON is pretty-printed with two-space indentation.
    pub fn as_text(&self) -> String {
        match self {
            ToolResult::Text(s) => s.clone(),
            ToolResult::Json(v) => serde_json::to_string_pretty(v).unwrap_or_else(|_| v.to_string()),
        }
    }

    /// Get the JSON payload if this is a Json variant
    pub fn as_json(&self) -> Option<&Value> {
        match self {
            ToolResult::Json(v) => Some(v),
            ToolResult::Text(_) => None,
        }
    }

    /// Get a reference to the text content if this is a Text variant
    pub fn as_str(&self) -> Option<&str> {
        match self {
            ToolResult::Text(s) => Some(s),
            ToolResult::Json(_) => None,
        }
    }
}

impl From<String> for ToolResult {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<&str> for ToolResult {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<Value> for ToolResult {
    fn from(v: Value) -> Self {
        Self::Json(v)
    }
}

/// Errors a tool handler can return.
///
/// The dispatcher turns every variant into an [`InvocationError`]; anything
/// other than [`ToolError::InvalidArgument`] is normalized into a
/// [`ProviderError`] on the way.
#[derive(Debug, thiserror::Error)]
pub enum ToolError {
    /// An argument passed schema validation but cannot be used as given.
    #[error("Invalid arguments: {0}")]
    InvalidArgument(#[from] ArgumentError),

    #[error(transparent)]
    Provider(#[from] ProviderError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("{0}")]
    Custom(String),
}

impl ToolError {
    pub fn invalid_argument(argument: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidArgument(ArgumentError::new(argument, message))
    }
}

impl From<String> for ToolError {
    fn from(s: String) -> Self {
        Self::Custom(s)
    }
}

impl From<&str> for ToolError {
    fn from(s: &str) -> Self {
        Self::Custom(s.to_string())
    }
}

impl From<ToolError> for InvocationError {
    /// Free-form messages are classified by content, so raw SDK text such as
    /// "Could not load credentials" still lands on the credentials category.
    fn from(err: ToolError) -> Self {
        match err {
            ToolError::InvalidArgument(err) => InvocationError::InvalidArguments(err),
            ToolError::Provider(err) => InvocationError::Provider(err),
            ToolError::Serialization(err) => InvocationError::Provider(ProviderError::Api {
                code: "SerializationError".to_string(),
                message: err.to_string(),
            }),
            ToolError::Custom(message) => {
                InvocationError::Provider(ProviderError::classify(None, &message))
            }
        }
    }
}

/// Trait for implementing tools that can be invoked through the dispatcher.
///
/// Tools define an input type with `#[derive(Deserialize, JsonSchema)]`. The
/// generated JSON Schema is what callers discover, and the dispatcher checks
/// arguments against it before `execute` runs.
///
/// ```rust
/// use fleet_core::{Tool, ToolError, ToolResult};
/// use schemars::JsonSchema;
/// use serde::Deserialize;
///
/// #[derive(Deserialize, JsonSchema)]
/// struct GreetInput {
///     /// Who to greet
///     name: String,
/// }
///
/// struct GreetTool;
///
/// impl Tool for GreetTool {
///     type Input = GreetInput;
///
///     fn name(&self) -> &str { "greet" }
///     fn description(&self) -> &str { "Say hello" }
///
///     async fn execute(&self, input: Self::Input) -> Result<ToolResult, ToolError> {
///         Ok(format!("Hello, {}", input.name).into())
///     }
/// }
/// ```
pub trait Tool: Send + Sync {
    /// The input type for this tool. Must implement `Deserialize` and `JsonSchema`.
    type Input: DeserializeOwned + JsonSchema + Send;

    /// The name of the tool (e.g., "aws_whoami", "s3_list_objects")
    fn name(&self) -> &str;

    /// A description of what the tool does
    fn description(&self) -> &str;

    /// Get the JSON schema for this tool's input.
    ///
    /// Generated from the `JsonSchema` derive on `Input`.
    fn input_schema(&self) -> Value {
        input_schema_for::<Self::Input>()
    }

    /// Execute the tool with typed input
    fn execute(
        &self,
        input: Self::Input,
    ) -> impl Future<Output = Result<ToolResult, ToolError>> + Send;
}

/// Object-safe view of a tool, as stored in the registry.
///
/// Implement [`Tool`] and convert with [`box_tool`].
pub trait DynTool: Send + Sync {
    fn name(&self) -> &str;
    fn description(&self) -> &str;
    fn input_schema(&self) -> Value;

    /// Run the handler on arguments that already passed schema validation.
    fn execute_raw(
        &self,
        arguments: Map<String, Value>,
    ) -> Pin<Box<dyn Future<Output = Result<ToolResult, InvocationError>> + Send + '_>>;
}

/// Convert a `Tool` into a type-erased `Box<dyn DynTool>` for storage in the registry.
pub fn box_tool<T: Tool + 'static>(tool: T) -> Box<dyn DynTool> {
    let input_schema = tool.input_schema();
    Box::new(ToolWrapper { tool, input_schema })
}

/// Internal wrapper that implements DynTool for any Tool
struct ToolWrapper<T> {
    tool: T,
    input_schema: Value,
}

impl<T: Tool + 'static> DynTool for ToolWrapper<T> {
    fn name(&self) -> &str {
        self.tool.name()
    }

    fn description(&self) -> &str {
        self.tool.description()
    }

    fn input_schema(&self) -> Value {
        self.input_schema.clone()
    }

    fn execute_raw(
        &self,
        arguments: Map<String, Value>,
    ) -> Pin<Box<dyn Future<Output = Result<ToolResult, InvocationError>> + Send + '_>> {
        Box::pin(async move {
            let typed_input: T::Input = serde_json::from_value(Value::Object(arguments))
                .map_err(|e| ArgumentError::new("arguments", e.to_string()))?;

            self.tool
                .execute(typed_input)
                .await
                .map_err(InvocationError::from)
        })
    }
}
