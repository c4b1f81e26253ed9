use super::{failure, parse_params, require_non_empty, to_tool_result, Tool, Validate};
use crate::mcp::{ToolCallResult, ToolDefinition};
use heroku_api::{HerokuApi, Release, DEFAULT_RELEASE_LIMIT};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::sync::Arc;

pub const NAME: &str = "heroku_list_releases";

pub struct ListReleasesTool {
    api: Arc<dyn HerokuApi>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ListReleasesParams {
    app_name: String,
    #[serde(default)]
    limit: Option<usize>,
}

impl Validate for ListReleasesParams {
    fn validate(&self) -> Result<(), String> {
        require_non_empty("appName", &self.app_name)?;
        if self.limit == Some(0) {
            return Err("limit must be at least 1".into());
        }
        Ok(())
    }
}

#[derive(Serialize)]
struct ReleaseSummary {
    version: u64,
    description: String,
    status: String,
    user: String,
    current: bool,
    created_at: String,
}

impl From<Release> for ReleaseSummary {
    fn from(r: Release) -> Self {
        Self {
            version: r.version,
            description: r.description,
            status: r.status,
            user: r.user.email,
            current: r.current,
            created_at: r.created_at,
        }
    }
}

impl ListReleasesTool {
    pub fn new(api: Arc<dyn HerokuApi>) -> Self {
        Self { api }
    }
}

#[async_trait::async_trait]
impl Tool for ListReleasesTool {
    fn definition(&self) -> ToolDefinition {
        ToolDefinition {
            name: NAME.into(),
            description: "List releases for a Heroku app. Shows deployment history, newest first."
                .into(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "appName": {
                        "type": "string",
                        "description": "Name of the Heroku app"
                    },
                    "limit": {
                        "type": "number",
                        "minimum": 1,
                        "description": "Maximum number of releases to return (default: 10)"
                    }
                },
                "required": ["appName"]
            }),
        }
    }

    async fn call(&self, params: Value) -> ToolCallResult {
        let params: ListReleasesParams = match parse_params(params) {
            Ok(p) => p,
            Err(e) => return e,
        };
        let limit = params.limit.unwrap_or(DEFAULT_RELEASE_LIMIT);

        match self.api.list_releases(&params.app_name, limit).await {
            Ok(releases) => {
                let summaries: Vec<ReleaseSummary> =
                    releases.into_iter().map(ReleaseSummary::from).collect();
                to_tool_result(&summaries)
            }
            Err(e) => failure("list releases", e),
        }
    }
}
