pub mod config_vars;
pub mod get_app;
pub mod get_logs;
pub mod list_addons;
pub mod list_apps;
pub mod list_releases;
pub mod restart;
pub mod scale;

#[cfg(test)]
pub(crate) mod test_support;

use crate::mcp::{ToolCallResult, ToolDefinition};
use futures::FutureExt;
use heroku_api::{ApiError, HerokuApi};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::any::Any;
use std::collections::HashSet;
use std::fmt::Display;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use thiserror::Error;

/// Trait that every MCP tool implements.
#[async_trait::async_trait]
pub trait Tool: Send + Sync {
    fn definition(&self) -> ToolDefinition;

    async fn call(&self, params: Value) -> ToolCallResult;
}

#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("Duplicate tool name: {0}")]
    DuplicateTool(String),
}

/// Registry of all available tools, in registration order.
pub struct ToolRegistry {
    tools: Vec<Box<dyn Tool>>,
}

impl ToolRegistry {
    pub fn new(tools: Vec<Box<dyn Tool>>) -> Result<Self, RegistryError> {
        let mut seen = HashSet::new();
        for tool in &tools {
            let name = tool.definition().name;
            if !seen.insert(name.clone()) {
                return Err(RegistryError::DuplicateTool(name));
            }
        }
        Ok(Self { tools })
    }

    /// The Heroku tool catalog, all sharing one API client.
    pub fn heroku(api: Arc<dyn HerokuApi>) -> Result<Self, RegistryError> {
        Self::new(vec![
            Box::new(list_apps::ListAppsTool::new(api.clone())),
            Box::new(get_app::GetAppTool::new(api.clone())),
            Box::new(list_releases::ListReleasesTool::new(api.clone())),
            Box::new(get_logs::GetLogsTool::new(api.clone())),
            Box::new(restart::RestartTool::new(api.clone())),
            Box::new(scale::ScaleTool::new(api.clone())),
            Box::new(list_addons::ListAddonsTool::new(api.clone())),
            Box::new(config_vars::ConfigVarsTool::new(api)),
        ])
    }

    pub fn definitions(&self) -> Vec<ToolDefinition> {
        self.tools.iter().map(|t| t.definition()).collect()
    }

    /// Dispatch a call by tool name. Never panics and never returns a
    /// protocol error: every outcome is a result envelope.
    pub async fn call(&self, name: &str, params: Value) -> ToolCallResult {
        let Some(tool) = self.tools.iter().find(|t| t.definition().name == name) else {
            tracing::warn!(tool = name, "unknown tool requested");
            return ToolCallResult::error(format!("Unknown tool: {name}"));
        };

        tracing::debug!(tool = name, "calling tool");
        match AssertUnwindSafe(tool.call(params)).catch_unwind().await {
            Ok(result) => result,
            Err(panic) => {
                let message = panic_message(panic.as_ref());
                tracing::error!(tool = name, "tool handler panicked: {message}");
                ToolCallResult::error(format!("Error: {message}"))
            }
        }
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else {
        "tool handler panicked".to_string()
    }
}

// ─── Shared handler plumbing ────────────────────────────────────────────────

/// Checks that run after deserialization and before any network call.
pub(crate) trait Validate {
    fn validate(&self) -> Result<(), String> {
        Ok(())
    }
}

/// Deserialize and validate tool arguments into a typed params struct.
pub(crate) fn parse_params<T: DeserializeOwned + Validate>(
    params: Value,
) -> Result<T, ToolCallResult> {
    // Clients may send `arguments: null` for tools without required fields.
    let params = if params.is_null() {
        Value::Object(serde_json::Map::new())
    } else {
        params
    };
    let parsed: T = serde_json::from_value(params).map_err(invalid_params)?;
    parsed.validate().map_err(invalid_params)?;
    Ok(parsed)
}

pub(crate) fn invalid_params(reason: impl Display) -> ToolCallResult {
    ToolCallResult::error(format!("Invalid parameters: {reason}"))
}

pub(crate) fn require_non_empty(field: &str, value: &str) -> Result<(), String> {
    if value.trim().is_empty() {
        return Err(format!("{field} must not be empty"));
    }
    Ok(())
}

pub(crate) fn to_tool_result<T: Serialize>(value: &T) -> ToolCallResult {
    match serde_json::to_string_pretty(value) {
        Ok(json) => ToolCallResult::text(json),
        Err(e) => ToolCallResult::error(format!("Serialization error: {e}")),
    }
}

/// Error envelope for a failed API interaction, e.g. `Failed to scale: ...`.
pub(crate) fn failure(action: &str, err: ApiError) -> ToolCallResult {
    tracing::warn!(action, error = %err, "tool call failed");
    ToolCallResult::error(format!("Failed to {action}: {err}"))
}
