use super::{failure, parse_params, require_non_empty, to_tool_result, Tool, Validate};
use crate::mcp::{ToolCallResult, ToolDefinition};
use heroku_api::{HerokuApi, LogSessionOptions, DEFAULT_LOG_LINES};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::sync::Arc;

pub const NAME: &str = "heroku_get_logs";

pub struct GetLogsTool {
    api: Arc<dyn HerokuApi>,
}

#[derive(Deserialize, Clone, Copy, Debug, PartialEq)]
#[serde(rename_all = "lowercase")]
enum LogSource {
    App,
    Heroku,
}

impl LogSource {
    fn as_str(self) -> &'static str {
        match self {
            LogSource::App => "app",
            LogSource::Heroku => "heroku",
        }
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GetLogsParams {
    app_name: String,
    #[serde(default)]
    lines: Option<u32>,
    #[serde(default)]
    dyno: Option<String>,
    #[serde(default)]
    source: Option<LogSource>,
}

impl Validate for GetLogsParams {
    fn validate(&self) -> Result<(), String> {
        require_non_empty("appName", &self.app_name)?;
        if self.lines == Some(0) {
            return Err("lines must be at least 1".into());
        }
        Ok(())
    }
}

#[derive(Serialize)]
struct LogsOutput {
    app: String,
    lines_requested: u32,
    filters: LogFilters,
    logs: String,
}

#[derive(Serialize)]
struct LogFilters {
    dyno: String,
    source: String,
}

impl GetLogsTool {
    pub fn new(api: Arc<dyn HerokuApi>) -> Self {
        Self { api }
    }
}

#[async_trait::async_trait]
impl Tool for GetLogsTool {
    fn definition(&self) -> ToolDefinition {
        ToolDefinition {
            name: NAME.into(),
            description: "Get recent logs from a Heroku app. Can filter by dyno or source.".into(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "appName": {
                        "type": "string",
                        "description": "Name of the Heroku app"
                    },
                    "lines": {
                        "type": "number",
                        "minimum": 1,
                        "description": "Number of log lines to retrieve (default: 100)"
                    },
                    "dyno": {
                        "type": "string",
                        "description": "Filter by dyno name (e.g., web.1, worker.1)"
                    },
                    "source": {
                        "type": "string",
                        "description": "Filter by source (app or heroku)",
                        "enum": ["app", "heroku"]
                    }
                },
                "required": ["appName"]
            }),
        }
    }

    async fn call(&self, params: Value) -> ToolCallResult {
        let params: GetLogsParams = match parse_params(params) {
            Ok(p) => p,
            Err(e) => return e,
        };
        let lines = params.lines.unwrap_or(DEFAULT_LOG_LINES);
        let dyno = params.dyno.filter(|d| !d.trim().is_empty());
        let source = params.source.map(LogSource::as_str);

        let options = LogSessionOptions::new(lines)
            .with_dyno(dyno.clone())
            .with_source(source.map(str::to_string));

        // Sessions are single-use: create, then fetch exactly once.
        let session = match self.api.create_log_session(&params.app_name, &options).await {
            Ok(s) => s,
            Err(e) => return failure("get logs", e),
        };
        let logs = match self.api.fetch_log_text(&session.logplex_url).await {
            Ok(text) => text,
            Err(e) => return failure("get logs", e),
        };

        to_tool_result(&LogsOutput {
            app: params.app_name,
            lines_requested: lines,
            filters: LogFilters {
                dyno: dyno.unwrap_or_else(|| "all".into()),
                source: source.unwrap_or("all").into(),
            },
            logs,
        })
    }
}
