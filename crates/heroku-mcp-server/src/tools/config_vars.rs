use super::{
    failure, invalid_params, parse_params, require_non_empty, to_tool_result, Tool, Validate,
};
use crate::mcp::{ToolCallResult, ToolDefinition};
use heroku_api::{ConfigVars, ConfigVarsPatch, HerokuApi};
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::collections::BTreeMap;
use std::sync::{Arc, LazyLock};

pub const NAME: &str = "heroku_config_vars";

/// Key names whose values are partially hidden in listings.
static SENSITIVE_KEY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)key|secret|password|token|api").unwrap());

const MASK_PREFIX_CHARS: usize = 4;
const MASK_NOTE: &str =
    "Sensitive values are partially masked. Use key parameter to get full value.";

pub struct ConfigVarsTool {
    api: Arc<dyn HerokuApi>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ConfigVarsParams {
    app_name: String,
    #[serde(default)]
    set: Option<bool>,
    #[serde(default)]
    key: Option<String>,
    /// `None` (omitted or null) in set mode unsets the key.
    #[serde(default)]
    value: Option<String>,
}

impl ConfigVarsParams {
    fn is_set(&self) -> bool {
        self.set.unwrap_or(false)
    }

    fn key(&self) -> Option<&str> {
        self.key.as_deref().filter(|k| !k.is_empty())
    }
}

impl Validate for ConfigVarsParams {
    fn validate(&self) -> Result<(), String> {
        require_non_empty("appName", &self.app_name)
    }
}

#[derive(Serialize)]
struct ListOutput {
    app: String,
    config_vars: BTreeMap<String, String>,
    count: usize,
    note: &'static str,
}

#[derive(Serialize)]
struct SingleOutput {
    app: String,
    key: String,
    value: Option<String>,
    exists: bool,
}

#[derive(Serialize)]
struct WriteOutput {
    app: String,
    action: &'static str,
    key: String,
    value: String,
    config_vars: ConfigVars,
}

/// Mask `value` when `key` looks like it holds a credential.
pub fn mask_value(key: &str, value: &str) -> String {
    if SENSITIVE_KEY.is_match(key) {
        let prefix: String = value.chars().take(MASK_PREFIX_CHARS).collect();
        format!("{prefix}****")
    } else {
        value.to_string()
    }
}

pub fn mask_config_vars(vars: &ConfigVars) -> BTreeMap<String, String> {
    vars.iter()
        .map(|(k, v)| (k.clone(), mask_value(k, v)))
        .collect()
}

impl ConfigVarsTool {
    pub fn new(api: Arc<dyn HerokuApi>) -> Self {
        Self { api }
    }

    async fn write(&self, app: String, key: String, value: Option<String>) -> ToolCallResult {
        let action = if value.is_some() { "set" } else { "unset" };
        let mut patch = ConfigVarsPatch::new();
        patch.insert(key.clone(), value.clone());

        match self.api.set_config_vars(&app, &patch).await {
            Ok(config_vars) => to_tool_result(&WriteOutput {
                app,
                action,
                key,
                value: value.unwrap_or_else(|| "(unset)".into()),
                config_vars,
            }),
            Err(e) => failure("manage config vars", e),
        }
    }

    async fn read(&self, app: String, key: Option<String>) -> ToolCallResult {
        let vars = match self.api.get_config_vars(&app).await {
            Ok(v) => v,
            Err(e) => return failure("manage config vars", e),
        };

        match key {
            Some(key) => to_tool_result(&SingleOutput {
                app,
                value: vars.get(&key).cloned(),
                exists: vars.contains_key(&key),
                key,
            }),
            None => to_tool_result(&ListOutput {
                app,
                config_vars: mask_config_vars(&vars),
                count: vars.len(),
                note: MASK_NOTE,
            }),
        }
    }
}

#[async_trait::async_trait]
impl Tool for ConfigVarsTool {
    fn definition(&self) -> ToolDefinition {
        ToolDefinition {
            name: NAME.into(),
            description: "Get or set config vars (environment variables) for a Heroku app.".into(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "appName": {
                        "type": "string",
                        "description": "Name of the Heroku app"
                    },
                    "set": {
                        "type": "boolean",
                        "description": "Set to true to modify config vars (default: false, just lists)"
                    },
                    "key": {
                        "type": "string",
                        "description": "Config var key (for getting a specific var or setting)"
                    },
                    "value": {
                        "type": ["string", "null"],
                        "description": "Config var value when set=true. Omit or use null to unset."
                    }
                },
                "required": ["appName"]
            }),
        }
    }

    async fn call(&self, params: Value) -> ToolCallResult {
        let params: ConfigVarsParams = match parse_params(params) {
            Ok(p) => p,
            Err(e) => return e,
        };
        let key = params.key().map(str::to_string);

        if params.is_set() {
            let Some(key) = key else {
                return invalid_params("key is required when set is true");
            };
            return self.write(params.app_name, key, params.value).await;
        }
        self.read(params.app_name, key).await
    }
}
