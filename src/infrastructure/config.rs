use crate::chart::Size;
use crate::domain::wizard::WizardRules;
use serde::Deserialize;
use std::time::Duration;

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub server: ServerSettings,
    pub backend: BackendSettings,
    #[serde(default)]
    pub render: RenderSettings,
    #[serde(default)]
    pub wizard: WizardRules,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerSettings {
    pub bind: String,
    /// Seconds a workspace may sit untouched before it is evicted
    #[serde(default = "default_workspace_idle_secs")]
    pub workspace_idle_secs: u64,
}

impl ServerSettings {
    pub fn workspace_idle_ttl(&self) -> Duration {
        Duration::from_secs(self.workspace_idle_secs)
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct BackendSettings {
    pub base_url: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

/// Chart size used when a request does not give one
#[derive(Debug, Deserialize, Clone, Copy)]
pub struct RenderSettings {
    pub width: f64,
    pub height: f64,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            width: 800.0,
            height: 600.0,
        }
    }
}

impl RenderSettings {
    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_workspace_idle_secs() -> u64 {
    1800
}

/// `config/lab.toml`, overridden by `LAB__SECTION__KEY` environment variables
pub fn load_app_config() -> anyhow::Result<AppConfig> {
    let settings = config::Config::builder()
        .add_source(config::File::with_name("config/lab"))
        .add_source(config::Environment::with_prefix("LAB").separator("__"))
        .build()?;

    Ok(settings.try_deserialize()?)
}
