use crate::error::ApiError;
use crate::types::{
    Addon, App, ConfigVars, ConfigVarsPatch, Dyno, Formation, LogSession, LogSessionOptions,
    Release,
};

/// The Platform API operations the tool handlers depend on.
///
/// `HerokuClient` is the production implementation; tests substitute an
/// in-memory fake.
#[async_trait::async_trait]
pub trait HerokuApi: Send + Sync {
    /// Apps visible to the credential, or only those owned by `team`.
    async fn list_apps(&self, team: Option<&str>) -> Result<Vec<App>, ApiError>;

    async fn get_app(&self, app: &str) -> Result<App, ApiError>;

    /// The first `limit` releases in the order the API returns them (newest first).
    async fn list_releases(&self, app: &str, limit: usize) -> Result<Vec<Release>, ApiError>;

    async fn create_log_session(
        &self,
        app: &str,
        options: &LogSessionOptions,
    ) -> Result<LogSession, ApiError>;

    /// Unauthenticated fetch of a log session URL.
    async fn fetch_log_text(&self, url: &str) -> Result<String, ApiError>;

    /// Restart one dyno, or every dyno when `dyno` is `None`.
    async fn restart_dynos(&self, app: &str, dyno: Option<&str>) -> Result<(), ApiError>;

    async fn list_dynos(&self, app: &str) -> Result<Vec<Dyno>, ApiError>;

    async fn list_formations(&self, app: &str) -> Result<Vec<Formation>, ApiError>;

    /// Partial update: `size: None` leaves the current size alone.
    async fn scale_formation(
        &self,
        app: &str,
        process_type: &str,
        quantity: u32,
        size: Option<&str>,
    ) -> Result<Formation, ApiError>;

    async fn list_addons(&self, app: &str) -> Result<Vec<Addon>, ApiError>;

    async fn get_config_vars(&self, app: &str) -> Result<ConfigVars, ApiError>;

    /// Apply `patch` and return the app's full config afterwards.
    async fn set_config_vars(
        &self,
        app: &str,
        patch: &ConfigVarsPatch,
    ) -> Result<ConfigVars, ApiError>;
}
