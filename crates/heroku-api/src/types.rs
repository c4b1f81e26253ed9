use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Reference to a related resource by name (`region`, `stack`, `team`, `plan`...).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NamedRef {
    pub name: String,
}

/// Reference to an account by email (`owner`, `user`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmailRef {
    pub email: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct App {
    pub id: String,
    pub name: String,
    pub web_url: Option<String>,
    pub region: NamedRef,
    pub stack: NamedRef,
    pub owner: EmailRef,
    #[serde(default)]
    pub team: Option<NamedRef>,
    #[serde(default)]
    pub maintenance: bool,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Release {
    pub id: String,
    pub version: u64,
    #[serde(default)]
    pub description: String,
    pub status: String,
    pub user: EmailRef,
    #[serde(default)]
    pub current: bool,
    pub created_at: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dyno {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub process_type: String,
    pub state: String,
    pub size: String,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Formation {
    pub id: String,
    #[serde(rename = "type")]
    pub process_type: String,
    pub quantity: u32,
    pub size: String,
    #[serde(default)]
    pub command: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Addon {
    pub id: String,
    pub name: String,
    pub addon_service: NamedRef,
    pub plan: NamedRef,
    pub state: String,
    pub created_at: String,
}

/// A single-use pointer to a logplex stream.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogSession {
    pub logplex_url: String,
    pub created_at: String,
}

pub const DEFAULT_LOG_LINES: u32 = 100;
pub const DEFAULT_RELEASE_LIMIT: usize = 10;

/// Body of a log-session request. Sessions are always non-tailing.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LogSessionOptions {
    pub lines: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dyno: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    tail: bool,
}

impl LogSessionOptions {
    pub fn new(lines: u32) -> Self {
        Self {
            lines,
            dyno: None,
            source: None,
            tail: false,
        }
    }

    pub fn with_dyno(mut self, dyno: Option<String>) -> Self {
        self.dyno = dyno;
        self
    }

    pub fn with_source(mut self, source: Option<String>) -> Self {
        self.source = source;
        self
    }
}

impl Default for LogSessionOptions {
    fn default() -> Self {
        Self::new(DEFAULT_LOG_LINES)
    }
}

/// Request body for `PATCH /apps/{app}/formation/{type}`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FormationUpdate {
    pub quantity: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<String>,
}

pub type ConfigVars = BTreeMap<String, String>;

/// Partial config update; a `None` value deletes the key.
pub type ConfigVarsPatch = BTreeMap<String, Option<String>>;
