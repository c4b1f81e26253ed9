//! In-memory stand-in for the Platform API used by handler tests.

use heroku_api::{
    Addon, ApiError, App, ConfigVars, ConfigVarsPatch, Dyno, EmailRef, Formation, HerokuApi,
    LogSession, LogSessionOptions, NamedRef, Release,
};
use std::collections::HashSet;
use std::sync::Mutex;

pub const APP: &str = "demo";
pub const LOG_URL: &str = "https://logs.example.com/sessions/one-shot";

pub struct FakeHeroku {
    apps: Vec<App>,
    releases: Vec<Release>,
    dynos: Vec<Dyno>,
    formations: Mutex<Vec<Formation>>,
    addons: Vec<Addon>,
    config: Mutex<ConfigVars>,
    log_text: String,
    failing: HashSet<&'static str>,
    calls: Mutex<Vec<String>>,
    last_log_options: Mutex<Option<LogSessionOptions>>,
    last_patch: Mutex<Option<ConfigVarsPatch>>,
}

impl FakeHeroku {
    pub fn new() -> Self {
        let mut config = ConfigVars::new();
        config.insert("API_KEY".into(), "abcd1234".into());
        config.insert("PORT".into(), "5000".into());
        config.insert("DATABASE_URL".into(), "postgres://u:p@host/db".into());
        config.insert("Stripe_Secret".into(), "sk".into());

        Self {
            apps: vec![app(APP, None), app("other", Some("platform"))],
            releases: (1..=10).rev().map(release).collect(),
            dynos: vec![dyno("web.1", "web"), dyno("worker.1", "worker")],
            formations: Mutex::new(vec![
                formation("web", 2, "standard-1X", Some("npm start")),
                formation("worker", 1, "basic", None),
            ]),
            addons: vec![Addon {
                id: "addon-1".into(),
                name: "postgresql-curved-12345".into(),
                addon_service: NamedRef {
                    name: "heroku-postgresql".into(),
                },
                plan: NamedRef {
                    name: "heroku-postgresql:essential-0".into(),
                },
                state: "provisioned".into(),
                created_at: "2024-01-01T00:00:00Z".into(),
            }],
            config: Mutex::new(config),
            log_text: "2024-01-01T00:00:00Z app[web.1]: listening on 5000\n".into(),
            failing: HashSet::new(),
            calls: Mutex::new(Vec::new()),
            last_log_options: Mutex::new(None),
            last_patch: Mutex::new(None),
        }
    }

    /// Make `operation` fail as if the connection were refused.
    pub fn failing(mut self, operation: &'static str) -> Self {
        self.failing.insert(operation);
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn last_log_options(&self) -> Option<LogSessionOptions> {
        self.last_log_options.lock().unwrap().clone()
    }

    pub fn last_patch(&self) -> Option<ConfigVarsPatch> {
        self.last_patch.lock().unwrap().clone()
    }

    fn record(&self, operation: &'static str) -> Result<(), ApiError> {
        self.calls.lock().unwrap().push(operation.to_string());
        if self.failing.contains(operation) {
            return Err(ApiError::Transport(
                "error sending request: connection refused".into(),
            ));
        }
        Ok(())
    }

    fn find_app(&self, name: &str) -> Result<&App, ApiError> {
        self.apps.iter().find(|a| a.name == name).ok_or(ApiError::Api {
            status: 404,
            message: "Couldn't find that app.".into(),
        })
    }
}

#[async_trait::async_trait]
impl HerokuApi for FakeHeroku {
    async fn list_apps(&self, team: Option<&str>) -> Result<Vec<App>, ApiError> {
        self.record("list_apps")?;
        Ok(self
            .apps
            .iter()
            .filter(|a| match team {
                Some(team) => a.team.as_ref().is_some_and(|t| t.name == team),
                None => true,
            })
            .cloned()
            .collect())
    }

    async fn get_app(&self, app: &str) -> Result<App, ApiError> {
        self.record("get_app")?;
        self.find_app(app).cloned()
    }

    async fn list_releases(&self, app: &str, limit: usize) -> Result<Vec<Release>, ApiError> {
        self.record("list_releases")?;
        self.find_app(app)?;
        Ok(self.releases.iter().take(limit).cloned().collect())
    }

    async fn create_log_session(
        &self,
        app: &str,
        options: &LogSessionOptions,
    ) -> Result<LogSession, ApiError> {
        self.record("create_log_session")?;
        self.find_app(app)?;
        *self.last_log_options.lock().unwrap() = Some(options.clone());
        Ok(LogSession {
            logplex_url: LOG_URL.into(),
            created_at: "2024-01-01T00:00:00Z".into(),
        })
    }

    async fn fetch_log_text(&self, url: &str) -> Result<String, ApiError> {
        self.record("fetch_log_text")?;
        assert_eq!(url, LOG_URL);
        Ok(self.log_text.clone())
    }

    async fn restart_dynos(&self, app: &str, _dyno: Option<&str>) -> Result<(), ApiError> {
        self.record("restart_dynos")?;
        self.find_app(app)?;
        Ok(())
    }

    async fn list_dynos(&self, app: &str) -> Result<Vec<Dyno>, ApiError> {
        self.record("list_dynos")?;
        self.find_app(app)?;
        Ok(self.dynos.clone())
    }

    async fn list_formations(&self, app: &str) -> Result<Vec<Formation>, ApiError> {
        self.record("list_formations")?;
        self.find_app(app)?;
        Ok(self.formations.lock().unwrap().clone())
    }

    async fn scale_formation(
        &self,
        app: &str,
        process_type: &str,
        quantity: u32,
        size: Option<&str>,
    ) -> Result<Formation, ApiError> {
        self.record("scale_formation")?;
        self.find_app(app)?;
        let mut formations = self.formations.lock().unwrap();
        let formation = formations
            .iter_mut()
            .find(|f| f.process_type == process_type)
            .ok_or(ApiError::Api {
                status: 404,
                message: "Couldn't find that formation.".into(),
            })?;
        formation.quantity = quantity;
        if let Some(size) = size {
            formation.size = size.to_string();
        }
        Ok(formation.clone())
    }

    async fn list_addons(&self, app: &str) -> Result<Vec<Addon>, ApiError> {
        self.record("list_addons")?;
        self.find_app(app)?;
        Ok(self.addons.clone())
    }

    async fn get_config_vars(&self, app: &str) -> Result<ConfigVars, ApiError> {
        self.record("get_config_vars")?;
        self.find_app(app)?;
        Ok(self.config.lock().unwrap().clone())
    }

    async fn set_config_vars(
        &self,
        app: &str,
        patch: &ConfigVarsPatch,
    ) -> Result<ConfigVars, ApiError> {
        self.record("set_config_vars")?;
        self.find_app(app)?;
        *self.last_patch.lock().unwrap() = Some(patch.clone());
        let mut config = self.config.lock().unwrap();
        for (key, value) in patch {
            match value {
                Some(value) => config.insert(key.clone(), value.clone()),
                None => config.remove(key),
            };
        }
        Ok(config.clone())
    }
}

fn app(name: &str, team: Option<&str>) -> App {
    App {
        id: format!("{name}-id"),
        name: name.into(),
        web_url: Some(format!("https://{name}.herokuapp.com/")),
        region: NamedRef { name: "us".into() },
        stack: NamedRef {
            name: "heroku-24".into(),
        },
        owner: EmailRef {
            email: "owner@example.com".into(),
        },
        team: team.map(|t| NamedRef { name: t.into() }),
        maintenance: false,
        created_at: "2024-01-01T00:00:00Z".into(),
        updated_at: "2024-03-01T00:00:00Z".into(),
    }
}

fn release(version: u64) -> Release {
    Release {
        id: format!("release-{version}"),
        version,
        description: format!("Deploy {version:03}"),
        status: "succeeded".into(),
        user: EmailRef {
            email: "dev@example.com".into(),
        },
        current: version == 10,
        created_at: format!("2024-01-{version:02}T00:00:00Z"),
    }
}

fn dyno(name: &str, process_type: &str) -> Dyno {
    Dyno {
        id: format!("{name}-id"),
        name: name.into(),
        process_type: process_type.into(),
        state: "up".into(),
        size: "basic".into(),
        created_at: "2024-01-01T00:00:00Z".into(),
        updated_at: "2024-01-01T00:00:00Z".into(),
    }
}

fn formation(process_type: &str, quantity: u32, size: &str, command: Option<&str>) -> Formation {
    Formation {
        id: format!("{process_type}-formation"),
        process_type: process_type.into(),
        quantity,
        size: size.into(),
        command: command.map(str::to_string),
    }
}

/// Parse the JSON text of a successful envelope.
pub fn payload(result: &crate::mcp::ToolCallResult) -> serde_json::Value {
    assert!(!result.is_error, "unexpected error: {}", result.joined_text());
    serde_json::from_str(&result.joined_text()).unwrap()
}
