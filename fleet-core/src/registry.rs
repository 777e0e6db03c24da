use std::collections::HashSet;

use serde::Serialize;
use serde_json::Value;

use crate::dispatch::InvocationError;
use crate::schema::ArgumentSchema;
use crate::tool::{box_tool, DynTool, Tool};

/// Startup-time registration faults.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistryError {
    #[error("Tool '{0}' is already registered")]
    DuplicateName(String),

    #[error("Tool '{tool}' has a malformed argument schema: {reason}")]
    MalformedSchema { tool: String, reason: String },

    #[error("Tool name must not be empty")]
    EmptyName,
}

/// Owned discovery record for a registered tool.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolInfo {
    pub name: String,
    pub description: String,
    pub input_schema: Value,
}

impl ToolInfo {
    fn from_tool(tool: &dyn DynTool) -> Self {
        Self {
            name: tool.name().to_string(),
            description: tool.description().to_string(),
            input_schema: tool.input_schema(),
        }
    }
}

/// A registered tool together with the argument schema read from its input schema.
struct Entry {
    tool: Box<dyn DynTool>,
    arguments: ArgumentSchema,
}

/// Collects tools before the registry is frozen.
///
/// ```rust
/// use fleet_core::ToolRegistry;
///
/// let registry = ToolRegistry::builder().build();
/// assert!(registry.is_empty());
/// ```
#[derive(Default)]
pub struct ToolRegistryBuilder {
    entries: Vec<Entry>,
    names: HashSet<String>,
}

impl ToolRegistryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a typed tool.
    pub fn add<T: Tool + 'static>(&mut self, tool: T) -> Result<&mut Self, RegistryError> {
        self.register(box_tool(tool))
    }

    /// Register an already boxed tool.
    ///
    /// A rejected descriptor leaves the builder untouched; the first tool
    /// registered under a name is the one that stays.
    pub fn register(&mut self, tool: Box<dyn DynTool>) -> Result<&mut Self, RegistryError> {
        let name = tool.name();
        if name.is_empty() {
            return Err(RegistryError::EmptyName);
        }
        if self.names.contains(name) {
            return Err(RegistryError::DuplicateName(name.to_string()));
        }
        let arguments = ArgumentSchema::from_json_schema(&tool.input_schema()).map_err(|reason| {
            RegistryError::MalformedSchema {
                tool: name.to_string(),
                reason,
            }
        })?;

        self.names.insert(name.to_string());
        self.entries.push(Entry { tool, arguments });
        Ok(self)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn build(self) -> ToolRegistry {
        ToolRegistry {
            entries: self.entries,
        }
    }
}

/// Immutable, insertion-ordered table of tools.
pub struct ToolRegistry {
    entries: Vec<Entry>,
}

impl ToolRegistry {
    pub fn builder() -> ToolRegistryBuilder {
        ToolRegistryBuilder::new()
    }

    fn entry(&self, name: &str) -> Result<&Entry, InvocationError> {
        self.entries
            .iter()
            .find(|e| e.tool.name() == name)
            .ok_or_else(|| InvocationError::UnknownTool(name.to_string()))
    }

    pub fn lookup(&self, name: &str) -> Result<&dyn DynTool, InvocationError> {
        self.entry(name).map(|e| e.tool.as_ref())
    }

    /// Look up a tool along with the schema its arguments are validated against.
    pub fn resolve(&self, name: &str) -> Result<(&dyn DynTool, &ArgumentSchema), InvocationError> {
        self.entry(name).map(|e| (e.tool.as_ref(), &e.arguments))
    }

    /// Iterate over tools in registration order.
    pub fn list(&self) -> impl Iterator<Item = &dyn DynTool> + '_ {
        self.entries.iter().map(|e| e.tool.as_ref())
    }

    pub fn tool_infos(&self) -> Vec<ToolInfo> {
        self.list().map(ToolInfo::from_tool).collect()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entry(name).is_ok()
    }

    pub fn schema(&self, name: &str) -> Option<&ArgumentSchema> {
        self.entry(name).ok().map(|e| &e.arguments)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl std::fmt::Debug for ToolRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ToolRegistry")
            .field("tools", &self.list().map(|t| t.name()).collect::<Vec<_>>())
            .finish()
    }
}
