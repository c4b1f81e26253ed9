use super::{failure, parse_params, require_non_empty, to_tool_result, Tool, Validate};
use crate::mcp::{ToolCallResult, ToolDefinition};
use heroku_api::{Addon, HerokuApi};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::sync::Arc;

pub const NAME: &str = "heroku_list_addons";

pub struct ListAddonsTool {
    api: Arc<dyn HerokuApi>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ListAddonsParams {
    app_name: String,
}

impl Validate for ListAddonsParams {
    fn validate(&self) -> Result<(), String> {
        require_non_empty("appName", &self.app_name)
    }
}

#[derive(Serialize)]
struct AddonsOutput {
    app: String,
    addons: Vec<AddonSummary>,
    count: usize,
}

#[derive(Serialize)]
struct AddonSummary {
    name: String,
    service: String,
    plan: String,
    state: String,
    created_at: String,
}

impl From<Addon> for AddonSummary {
    fn from(a: Addon) -> Self {
        Self {
            name: a.name,
            service: a.addon_service.name,
            plan: a.plan.name,
            state: a.state,
            created_at: a.created_at,
        }
    }
}

impl ListAddonsTool {
    pub fn new(api: Arc<dyn HerokuApi>) -> Self {
        Self { api }
    }
}

#[async_trait::async_trait]
impl Tool for ListAddonsTool {
    fn definition(&self) -> ToolDefinition {
        ToolDefinition {
            name: NAME.into(),
            description: "List all add-ons attached to a Heroku app (databases, caches, etc.)"
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
        let params: ListAddonsParams = match parse_params(params) {
            Ok(p) => p,
            Err(e) => return e,
        };

        match self.api.list_addons(&params.app_name).await {
            Ok(addons) => {
                let addons: Vec<AddonSummary> = addons.into_iter().map(AddonSummary::from).collect();
                to_tool_result(&AddonsOutput {
                    app: params.app_name,
                    count: addons.len(),
                    addons,
                })
            }
            Err(e) => failure("list add-ons", e),
        }
    }
}
