//! # Fleet core
//!
//! The tool registry and invocation contract behind fleet's AWS tools.
//!
//! A tool is a named operation with a typed input and an async handler. The
//! input's JSON Schema comes from `schemars`, and the registry reads it back
//! into an [`ArgumentSchema`] at registration. Tools are collected into an
//! immutable [`ToolRegistry`] and invoked through a [`Dispatcher`], which
//! validates arguments, runs the handler and always answers with a
//! [`ResultEnvelope`].
//!
//! ```rust
//! use fleet_core::{Dispatcher, Tool, ToolError, ToolRegistry, ToolResult};
//! use schemars::JsonSchema;
//! use serde::Deserialize;
//! use serde_json::json;
//!
//! #[derive(Deserialize, JsonSchema)]
//! struct AddInput {
//!     /// First operand
//!     a: i64,
//!     /// Second operand
//!     b: i64,
//! }
//!
//! struct Add;
//!
//! impl Tool for Add {
//!     type Input = AddInput;
//!
//!     fn name(&self) -> &str { "add" }
//!     fn description(&self) -> &str { "Add two integers" }
//!
//!     async fn execute(&self, input: Self::Input) -> Result<ToolResult, ToolError> {
//!         Ok(ToolResult::Json(json!({ "sum": input.a + input.b })))
//!     }
//! }
//!
//! # tokio_test::block_on(async {
//! let mut builder = ToolRegistry::builder();
//! builder.add(Add).unwrap();
//! let dispatcher = Dispatcher::new(builder.build());
//!
//! let envelope = dispatcher.invoke("add", json!({"a": 2, "b": "3"})).await;
//! assert!(!envelope.is_error());
//!
//! let envelope = dispatcher.invoke("add", json!({"a": 2})).await;
//! assert_eq!(envelope.text(), "Invalid arguments: b: required argument is missing");
//! # });
//! ```

pub mod dispatch;
pub mod envelope;
pub mod error;
pub mod registry;
pub mod schema;
pub mod tool;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use dispatch::{Dispatcher, InvocationError};
pub use envelope::{Failure, FailureKind, ResultEnvelope};
pub use error::{
    ProviderError, ProviderErrorKind, EXPIRED_CREDENTIALS_MESSAGE, MISSING_CREDENTIALS_MESSAGE,
};
pub use registry::{RegistryError, ToolInfo, ToolRegistry, ToolRegistryBuilder};
pub use schema::{input_schema_for, Argument, ArgumentError, ArgumentKind, ArgumentSchema};
pub use tool::{box_tool, DynTool, Tool, ToolError, ToolResult};
