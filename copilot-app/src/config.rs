use anyhow::{Context, Result};
use copilot_tools::{ToolConfig, WorkspaceEndpoint};
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const DEFAULT_CONFIG_FILE: &str = "copilot.yaml";

pub const ENV_WORKSPACE_URL: &str = "COPILOT_WORKSPACE_URL";
pub const ENV_WORKSPACE_TOKEN: &str = "COPILOT_WORKSPACE_TOKEN";
pub const ENV_MAX_RETRIES: &str = "COPILOT_MAX_RETRIES";
pub const ENV_TIMEOUT_SECS: &str = "COPILOT_TIMEOUT_SECS";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub workspace: WorkspaceSettings,
    #[serde(default)]
    pub tools: ToolConfig,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WorkspaceSettings {
    #[serde(default)]
    pub base_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
}

impl Config {
    pub fn from_yaml(content: &str) -> Result<Self> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(content).context("Failed to parse config")
    }

    /// Load `path`, falling back to defaults when the file does not exist.
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        Self::from_yaml(&content).with_context(|| format!("Invalid config in {}", path.display()))
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let content = serde_yaml::to_string(self)?;
        std::fs::write(path, content)
            .with_context(|| format!("Failed to write {}", path.display()))
    }

    pub fn apply_env(&mut self) -> Result<()> {
        self.apply_env_from(|key| std::env::var(key).ok())
    }

    /// Apply `COPILOT_*` overrides using `lookup` as the environment.
    pub fn apply_env_from<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup(ENV_WORKSPACE_URL) {
            self.workspace.base_url = url;
        }
        if let Some(token) = lookup(ENV_WORKSPACE_TOKEN) {
            self.workspace.token = Some(token);
        }
        if let Some(value) = lookup(ENV_MAX_RETRIES) {
            self.tools.max_retries = value
                .trim()
                .parse()
                .with_context(|| format!("{} must be a positive integer", ENV_MAX_RETRIES))?;
        }
        if let Some(value) = lookup(ENV_TIMEOUT_SECS) {
            self.tools.timeout_secs = value
                .trim()
                .parse()
                .with_context(|| format!("{} must be a positive integer", ENV_TIMEOUT_SECS))?;
        }
        Ok(())
    }

    /// Command-line flags win over file and environment.
    pub fn apply_overrides(&mut self, base_url: Option<String>, token: Option<String>) {
        if let Some(url) = base_url {
            self.workspace.base_url = url;
        }
        if let Some(token) = token {
            self.workspace.token = Some(token);
        }
    }

    /// An absent token becomes an empty credential, which the validator
    /// reports as `Missing configuration`.
    pub fn endpoint(&self) -> WorkspaceEndpoint {
        WorkspaceEndpoint::new(
            self.workspace.base_url.clone(),
            self.workspace.token.clone().unwrap_or_default(),
        )
    }
}
