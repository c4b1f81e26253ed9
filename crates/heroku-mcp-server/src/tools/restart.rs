use super::{failure, parse_params, require_non_empty, to_tool_result, Tool, Validate};
use crate::mcp::{ToolCallResult, ToolDefinition};
use heroku_api::{Dyno, HerokuApi};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::sync::Arc;

pub const NAME: &str = "heroku_restart";

/// Restarts are asynchronous on Heroku; the dyno read-back is a snapshot
/// taken right after the request, not a confirmation.
const READ_BACK_NOTE: &str =
    "Dyno states were read immediately after the restart request and may not reflect it yet.";

pub struct RestartTool {
    api: Arc<dyn HerokuApi>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RestartParams {
    app_name: String,
    #[serde(default)]
    dyno: Option<String>,
}

impl Validate for RestartParams {
    fn validate(&self) -> Result<(), String> {
        require_non_empty("appName", &self.app_name)
    }
}

#[derive(Serialize)]
struct RestartOutput {
    app: String,
    restarted: String,
    message: String,
    current_dynos: Vec<DynoState>,
    note: &'static str,
}

#[derive(Serialize)]
struct DynoState {
    name: String,
    state: String,
    #[serde(rename = "type")]
    process_type: String,
}

impl From<Dyno> for DynoState {
    fn from(d: Dyno) -> Self {
        Self {
            name: d.name,
            state: d.state,
            process_type: d.process_type,
        }
    }
}

impl RestartTool {
    pub fn new(api: Arc<dyn HerokuApi>) -> Self {
        Self { api }
    }
}

#[async_trait::async_trait]
impl Tool for RestartTool {
    fn definition(&self) -> ToolDefinition {
        ToolDefinition {
            name: NAME.into(),
            description: "Restart dynos for a Heroku app. Can restart all dynos or a specific one."
                .into(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "appName": {
                        "type": "string",
                        "description": "Name of the Heroku app"
                    },
                    "dyno": {
                        "type": "string",
                        "description": "Specific dyno to restart (e.g., web.1). Omit to restart all."
                    }
                },
                "required": ["appName"]
            }),
        }
    }

    async fn call(&self, params: Value) -> ToolCallResult {
        let params: RestartParams = match parse_params(params) {
            Ok(p) => p,
            Err(e) => return e,
        };
        let dyno = params.dyno.as_deref().filter(|d| !d.trim().is_empty());

        if let Err(e) = self.api.restart_dynos(&params.app_name, dyno).await {
            return failure("restart", e);
        }
        let dynos = match self.api.list_dynos(&params.app_name).await {
            Ok(d) => d,
            Err(e) => return failure("restart", e),
        };

        let message = match dyno {
            Some(d) => format!("Restart requested for dyno {d}"),
            None => "Restart requested for all dynos".to_string(),
        };

        to_tool_result(&RestartOutput {
            app: params.app_name.clone(),
            restarted: dyno.unwrap_or("all").to_string(),
            message,
            current_dynos: dynos.into_iter().map(DynoState::from).collect(),
            note: READ_BACK_NOTE,
        })
    }
}
