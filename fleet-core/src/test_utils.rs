//! Test utilities for fleet-core.
//!
//! Enable with the `test-utils` feature:
//!
//! ```toml
//! [dev-dependencies]
//! fleet-core = { version = "...", features = ["test-utils"] }
//! ```
//!
//! # Example
//!
//! ```rust
//! use fleet_core::{test_utils::MockTool, Dispatcher, ToolRegistry};
//! use serde_json::json;
//!
//! # tokio_test::block_on(async {
//! let tool = MockTool::echo("echo");
//! let calls = tool.clone();
//!
//! let mut builder = ToolRegistry::builder();
//! builder.add(tool).unwrap();
//! let dispatcher = Dispatcher::new(builder.build());
//!
//! let envelope = dispatcher.invoke("echo", json!({"value": "hi"})).await;
//! assert!(!envelope.is_error());
//! assert_eq!(calls.call_count(), 1);
//! # });
//! ```

use std::sync::{Arc, Mutex};

use schemars::JsonSchema;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::schema::input_schema_for;
use crate::tool::{Tool, ToolError, ToolResult};

type Responder = dyn Fn(&Value) -> Result<ToolResult, ToolError> + Send + Sync;

/// Input of a mock that takes no arguments.
#[derive(Debug, Default, Deserialize, JsonSchema)]
pub struct NoArguments {}

/// Input advertised by [`MockTool::echo`].
#[derive(Debug, Deserialize, JsonSchema)]
pub struct EchoInput {
    /// Value to echo back
    #[serde(default)]
    pub value: Option<String>,
}

/// A configurable tool that records every call it receives.
///
/// Handlers see the validated arguments as raw JSON; the advertised schema
/// comes from whichever input type was set with [`MockTool::with_input`].
/// Clones share the call log, so keep a clone to inspect after registering.
#[derive(Clone)]
pub struct MockTool {
    name: String,
    description: String,
    input_schema: Value,
    responder: Arc<Responder>,
    calls: Arc<Mutex<Vec<Value>>>,
}

impl MockTool {
    pub fn new<F>(name: impl Into<String>, responder: F) -> Self
    where
        F: Fn(&Value) -> Result<ToolResult, ToolError> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            description: "Mock tool".to_string(),
            input_schema: input_schema_for::<NoArguments>(),
            responder: Arc::new(responder),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Returns `{"echo": <arguments>}`. Accepts an optional string `value`.
    pub fn echo(name: impl Into<String>) -> Self {
        Self::new(name, |args| Ok(ToolResult::Json(json!({ "echo": args })))).with_input::<EchoInput>()
    }

    /// Always fails with the given raw message.
    pub fn failing(name: impl Into<String>, message: impl Into<String>) -> Self {
        let message = message.into();
        Self::new(name, move |_| Err(ToolError::Custom(message.clone())))
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Advertise the schema of `T` as this tool's input.
    pub fn with_input<T: JsonSchema>(mut self) -> Self {
        self.input_schema = input_schema_for::<T>();
        self
    }

    /// Arguments of every call, in order.
    pub fn calls(&self) -> Vec<Value> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

impl Tool for MockTool {
    type Input = Value;

    fn name(&self) -> &str {
        &self.name
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn input_schema(&self) -> Value {
        self.input_schema.clone()
    }

    async fn execute(&self, input: Self::Input) -> Result<ToolResult, ToolError> {
        self.calls.lock().unwrap().push(input.clone());
        (self.responder)(&input)
    }
}
