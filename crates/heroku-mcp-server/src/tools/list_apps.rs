use super::{failure, parse_params, to_tool_result, Tool, Validate};
use crate::mcp::{ToolCallResult, ToolDefinition};
use heroku_api::{App, HerokuApi};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::sync::Arc;

pub const NAME: &str = "heroku_list_apps";

pub struct ListAppsTool {
    api: Arc<dyn HerokuApi>,
}

#[derive(Deserialize, Default)]
struct ListAppsParams {
    #[serde(default)]
    team: Option<String>,
}

impl Validate for ListAppsParams {}

#[derive(Serialize)]
struct AppSummary {
    name: String,
    web_url: Option<String>,
    region: String,
    stack: String,
    owner: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    team: Option<String>,
    maintenance: bool,
    created_at: String,
}

impl From<App> for AppSummary {
    fn from(app: App) -> Self {
        Self {
            name: app.name,
            web_url: app.web_url,
            region: app.region.name,
            stack: app.stack.name,
            owner: app.owner.email,
            team: app.team.map(|t| t.name),
            maintenance: app.maintenance,
            created_at: app.created_at,
        }
    }
}

impl ListAppsTool {
    pub fn new(api: Arc<dyn HerokuApi>) -> Self {
        Self { api }
    }
}

#[async_trait::async_trait]
impl Tool for ListAppsTool {
    fn definition(&self) -> ToolDefinition {
        ToolDefinition {
            name: NAME.into(),
            description: "List all Heroku apps. Optionally filter by team.".into(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "team": {
                        "type": "string",
                        "description": "Filter apps by team name (optional)"
                    }
                },
                "required": []
            }),
        }
    }

    async fn call(&self, params: Value) -> ToolCallResult {
        let params: ListAppsParams = match parse_params(params) {
            Ok(p) => p,
            Err(e) => return e,
        };
        let team = params.team.as_deref().filter(|t| !t.trim().is_empty());

        match self.api.list_apps(team).await {
            Ok(apps) => {
                let summaries: Vec<AppSummary> = apps.into_iter().map(AppSummary::from).collect();
                to_tool_result(&summaries)
            }
            Err(e) => failure("list apps", e),
        }
    }
}
