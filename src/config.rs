use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

pub const DEFAULT_CONFIG_PATH: &str = "config.yml";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid config: {0}")]
    Parse(#[from] serde_yaml::Error),
    #[error("config value {0} must not be empty")]
    Empty(&'static str),
}

/// Application configuration from `config.yml`.
///
/// Keys are upper-case to match the credentials file handed out with an
/// agent (`API_KEY`, `AGENT_ID`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Credential for the conversational-AI service. An empty key means the
    /// agent is public and sessions are opened without authentication.
    #[serde(rename = "API_KEY")]
    pub api_key: String,
    /// Identifies the remote agent to talk to.
    #[serde(rename = "AGENT_ID")]
    pub agent_id: String,
    #[serde(flatten)]
    pub page: PageConfig,
}

/// Static page content shown above the conversation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageConfig {
    #[serde(rename = "TITLE", default = "default_title")]
    pub title: String,
    #[serde(rename = "CAPTION", default)]
    pub caption: Option<String>,
    #[serde(rename = "DESCRIPTION", default = "default_description")]
    pub description: String,
}

fn default_title() -> String {
    "Voice Assistant".to_string()
}

fn default_description() -> String {
    "Press the button below to start a voice conversation. The microphone will be \
     activated, and you can talk to the AI in real time."
        .to_string()
}

impl Default for PageConfig {
    fn default() -> Self {
        Self {
            title: default_title(),
            caption: None,
            description: default_description(),
        }
    }
}

impl Config {
    /// Whether sessions should authenticate with the API key.
    pub fn requires_auth(&self) -> bool {
        !self.api_key.is_empty()
    }
}

/// Parse configuration from YAML text.
pub fn parse(contents: &str) -> Result<Config, ConfigError> {
    let config: Config = serde_yaml::from_str(contents)?;
    if config.agent_id.trim().is_empty() {
        return Err(ConfigError::Empty("AGENT_ID"));
    }
    Ok(config)
}

/// Load configuration from `path`. A missing file is an error: there is no
/// usable default for the credentials.
pub fn load(path: &Path) -> Result<Config, ConfigError> {
    let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    parse(&contents)
}
