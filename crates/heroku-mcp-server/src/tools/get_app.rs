use super::{failure, parse_params, require_non_empty, to_tool_result, Tool, Validate};
use crate::mcp::{ToolCallResult, ToolDefinition};
use heroku_api::{App, Dyno, Formation, HerokuApi};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::sync::Arc;

pub const NAME: &str = "heroku_get_app";

pub struct GetAppTool {
    api: Arc<dyn HerokuApi>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GetAppParams {
    app_name: String,
}

impl Validate for GetAppParams {
    fn validate(&self) -> Result<(), String> {
        require_non_empty("appName", &self.app_name)
    }
}

#[derive(Serialize)]
struct AppDetail {
    name: String,
    id: String,
    web_url: Option<String>,
    region: String,
    stack: String,
    owner: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    team: Option<String>,
    maintenance: bool,
    created_at: String,
    updated_at: String,
    dynos: Vec<DynoSummary>,
    formation: Vec<FormationSummary>,
}

#[derive(Serialize)]
struct DynoSummary {
    name: String,
    #[serde(rename = "type")]
    process_type: String,
    state: String,
    size: String,
}

#[derive(Serialize)]
struct FormationSummary {
    #[serde(rename = "type")]
    process_type: String,
    quantity: u32,
    size: String,
    command: Option<String>,
}

impl AppDetail {
    fn new(app: App, dynos: Vec<Dyno>, formation: Vec<Formation>) -> Self {
        Self {
            name: app.name,
            id: app.id,
            web_url: app.web_url,
            region: app.region.name,
            stack: app.stack.name,
            owner: app.owner.email,
            team: app.team.map(|t| t.name),
            maintenance: app.maintenance,
            created_at: app.created_at,
            updated_at: app.updated_at,
            dynos: dynos
                .into_iter()
                .map(|d| DynoSummary {
                    name: d.name,
                    process_type: d.process_type,
                    state: d.state,
                    size: d.size,
                })
                .collect(),
            formation: formation
                .into_iter()
                .map(|f| FormationSummary {
                    process_type: f.process_type,
                    quantity: f.quantity,
                    size: f.size,
                    command: f.command,
                })
                .collect(),
        }
    }
}

impl GetAppTool {
    pub fn new(api: Arc<dyn HerokuApi>) -> Self {
        Self { api }
    }
}

#[async_trait::async_trait]
impl Tool for GetAppTool {
    fn definition(&self) -> ToolDefinition {
        ToolDefinition {
            name: NAME.into(),
            description: "Get detailed information about a Heroku app including dynos and formation."
                .into(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "appName": {
                        "type": "string",
                        "description": "Name of the Heroku app"
                    }
                },
                "required": ["appName"]
            }),
        }
    }

    async fn call(&self, params: Value) -> ToolCallResult {
        let params: GetAppParams = match parse_params(params) {
            Ok(p) => p,
            Err(e) => return e,
        };
        let app_name = params.app_name.as_str();

        // All three must succeed; the first failure fails the whole call.
        let fetched = tokio::try_join!(
            self.api.get_app(app_name),
            self.api.list_dynos(app_name),
            self.api.list_formations(app_name),
        );

        match fetched {
            Ok((app, dynos, formation)) => to_tool_result(&AppDetail::new(app, dynos, formation)),
            Err(e) => failure("get app", e),
        }
    }
}
