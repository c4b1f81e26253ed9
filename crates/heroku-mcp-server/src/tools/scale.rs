use super::{failure, parse_params, require_non_empty, to_tool_result, Tool, Validate};
use crate::mcp::{ToolCallResult, ToolDefinition};
use heroku_api::{Formation, HerokuApi};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::sync::Arc;

pub const NAME: &str = "heroku_scale";

const READ_BACK_NOTE: &str =
    "Formation was read immediately after scaling; dynos may still be starting or stopping.";

pub struct ScaleTool {
    api: Arc<dyn HerokuApi>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ScaleParams {
    app_name: String,
    /// Process type, e.g. `web` or `worker`.
    dyno: String,
    quantity: u32,
    #[serde(default)]
    size: Option<String>,
}

impl Validate for ScaleParams {
    fn validate(&self) -> Result<(), String> {
        require_non_empty("appName", &self.app_name)?;
        require_non_empty("dyno", &self.dyno)
    }
}

#[derive(Serialize)]
struct ScaleOutput {
    app: String,
    scaled: FormationSummary,
    message: String,
    formation: Vec<FormationSummary>,
    note: &'static str,
}

#[derive(Serialize)]
struct FormationSummary {
    #[serde(rename = "type")]
    process_type: String,
    quantity: u32,
    size: String,
}

impl From<Formation> for FormationSummary {
    fn from(f: Formation) -> Self {
        Self {
            process_type: f.process_type,
            quantity: f.quantity,
            size: f.size,
        }
    }
}

impl ScaleTool {
    pub fn new(api: Arc<dyn HerokuApi>) -> Self {
        Self { api }
    }
}

#[async_trait::async_trait]
impl Tool for ScaleTool {
    fn definition(&self) -> ToolDefinition {
        ToolDefinition {
            name: NAME.into(),
            description: "Scale dynos for a Heroku app. Change the number of running dynos and optionally their size."
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
                        "description": "Dyno type to scale (e.g., web, worker)"
                    },
                    "quantity": {
                        "type": "number",
                        "minimum": 0,
                        "description": "Number of dynos to run"
                    },
                    "size": {
                        "type": "string",
                        "description": "Dyno size (eco, basic, standard-1x, standard-2x, etc.)"
                    }
                },
                "required": ["appName", "dyno", "quantity"]
            }),
        }
    }

    async fn call(&self, params: Value) -> ToolCallResult {
        let params: ScaleParams = match parse_params(params) {
            Ok(p) => p,
            Err(e) => return e,
        };
        let size = params.size.as_deref().filter(|s| !s.trim().is_empty());

        let scaled = match self
            .api
            .scale_formation(&params.app_name, &params.dyno, params.quantity, size)
            .await
        {
            Ok(f) => f,
            Err(e) => return failure("scale", e),
        };
        let formation = match self.api.list_formations(&params.app_name).await {
            Ok(f) => f,
            Err(e) => return failure("scale", e),
        };

        to_tool_result(&ScaleOutput {
            app: params.app_name.clone(),
            scaled: scaled.into(),
            message: format!("Scaled {} to {} dyno(s)", params.dyno, params.quantity),
            formation: formation.into_iter().map(FormationSummary::from).collect(),
            note: READ_BACK_NOTE,
        })
    }
}
