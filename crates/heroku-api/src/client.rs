use crate::api::HerokuApi;
use crate::config::ApiConfig;
use crate::error::{extract_error_message, ApiError};
use crate::types::{
    Addon, App, ConfigVars, ConfigVarsPatch, Dyno, Formation, FormationUpdate, LogSession,
    LogSessionOptions, Release,
};
use reqwest::header::ACCEPT;
use reqwest::{Method, Url};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

pub const ACCEPT_HEADER: &str = "application/vnd.heroku+json; version=3";

/// Platform API client. One pooled connection set, one credential.
#[derive(Debug, Clone)]
pub struct HerokuClient {
    config: ApiConfig,
    http: reqwest::Client,
}

impl HerokuClient {
    pub fn new(config: ApiConfig) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout())
            .user_agent(concat!("heroku-mcp/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| ApiError::Configuration(format!("failed to build HTTP client: {e}")))?;
        Ok(Self { config, http })
    }

    pub fn config(&self) -> &ApiConfig {
        &self.config
    }

    /// Join percent-encoded path segments onto the base URL.
    fn url(&self, segments: &[&str]) -> Result<Url, ApiError> {
        let mut url = Url::parse(self.config.base_url())
            .map_err(|e| ApiError::Configuration(format!("invalid base URL: {e}")))?;
        url.path_segments_mut()
            .map_err(|_| ApiError::Configuration("base URL cannot carry a path".into()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// Send an authenticated request and return the body of a 2xx response.
    async fn send(
        &self,
        method: Method,
        segments: &[&str],
        body: Option<Value>,
    ) -> Result<String, ApiError> {
        let url = self.url(segments)?;
        tracing::debug!(method = %method, path = url.path(), "heroku api request");

        let mut req = self
            .http
            .request(method.clone(), url.clone())
            .bearer_auth(self.config.api_key())
            .header(ACCEPT, ACCEPT_HEADER);
        if let Some(body) = body {
            req = req.json(&body);
        }

        let response = req.send().await?;
        let status = response.status();
        let text = response.text().await?;
        tracing::debug!(
            method = %method,
            path = url.path(),
            status = status.as_u16(),
            "heroku api response"
        );

        if !status.is_success() {
            return Err(ApiError::Api {
                status: status.as_u16(),
                message: extract_error_message(&text),
            });
        }
        Ok(text)
    }

    async fn request<T: DeserializeOwned>(
        &self,
        method: Method,
        segments: &[&str],
        body: Option<Value>,
    ) -> Result<T, ApiError> {
        let text = self.send(method, segments, body).await?;
        decode_body(&text)
    }

    async fn get<T: DeserializeOwned>(&self, segments: &[&str]) -> Result<T, ApiError> {
        self.request(Method::GET, segments, None).await
    }

    async fn with_body<T: DeserializeOwned, B: Serialize>(
        &self,
        method: Method,
        segments: &[&str],
        body: &B,
    ) -> Result<T, ApiError> {
        let body = serde_json::to_value(body).map_err(|e| ApiError::Decode(e.to_string()))?;
        self.request(method, segments, Some(body)).await
    }
}

/// Decode a response body; an empty body is treated as `{}`.
fn decode_body<T: DeserializeOwned>(text: &str) -> Result<T, ApiError> {
    let result = if text.trim().is_empty() {
        serde_json::from_value(Value::Object(serde_json::Map::new()))
    } else {
        serde_json::from_str(text)
    };
    result.map_err(|e| ApiError::Decode(e.to_string()))
}

#[async_trait::async_trait]
impl HerokuApi for HerokuClient {
    async fn list_apps(&self, team: Option<&str>) -> Result<Vec<App>, ApiError> {
        match team {
            Some(team) => self.get(&["teams", team, "apps"]).await,
            None => self.get(&["apps"]).await,
        }
    }

    async fn get_app(&self, app: &str) -> Result<App, ApiError> {
        self.get(&["apps", app]).await
    }

    async fn list_releases(&self, app: &str, limit: usize) -> Result<Vec<Release>, ApiError> {
        let mut releases: Vec<Release> = self.get(&["apps", app, "releases"]).await?;
        releases.truncate(limit);
        Ok(releases)
    }

    async fn create_log_session(
        &self,
        app: &str,
        options: &LogSessionOptions,
    ) -> Result<LogSession, ApiError> {
        self.with_body(Method::POST, &["apps", app, "log-sessions"], options)
            .await
    }

    async fn fetch_log_text(&self, url: &str) -> Result<String, ApiError> {
        let response = self.http.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::Transport(format!(
                "Failed to fetch logs: {}",
                status.as_u16()
            )));
        }
        Ok(response.text().await?)
    }

    async fn restart_dynos(&self, app: &str, dyno: Option<&str>) -> Result<(), ApiError> {
        let mut segments = vec!["apps", app, "dynos"];
        segments.extend(dyno);
        // Body is empty (or an ignorable ack) for restarts.
        self.send(Method::DELETE, &segments, None).await?;
        Ok(())
    }

    async fn list_dynos(&self, app: &str) -> Result<Vec<Dyno>, ApiError> {
        self.get(&["apps", app, "dynos"]).await
    }

    async fn list_formations(&self, app: &str) -> Result<Vec<Formation>, ApiError> {
        self.get(&["apps", app, "formation"]).await
    }

    async fn scale_formation(
        &self,
        app: &str,
        process_type: &str,
        quantity: u32,
        size: Option<&str>,
    ) -> Result<Formation, ApiError> {
        let update = FormationUpdate {
            quantity,
            size: size.map(str::to_string),
        };
        self.with_body(
            Method::PATCH,
            &["apps", app, "formation", process_type],
            &update,
        )
        .await
    }

    async fn list_addons(&self, app: &str) -> Result<Vec<Addon>, ApiError> {
        self.get(&["apps", app, "addons"]).await
    }

    async fn get_config_vars(&self, app: &str) -> Result<ConfigVars, ApiError> {
        self.get(&["apps", app, "config-vars"]).await
    }

    async fn set_config_vars(
        &self,
        app: &str,
        patch: &ConfigVarsPatch,
    ) -> Result<ConfigVars, ApiError> {
        self.with_body(Method::PATCH, &["apps", app, "config-vars"], patch)
            .await
    }
}
