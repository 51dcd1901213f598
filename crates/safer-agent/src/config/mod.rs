//! Configuration loading for SAFER.
//! Reads safer.toml from the current directory or the path in SAFER_CONFIG.
//! Every section is optional. Without SAFER_CONFIG, a missing safer.toml
//! means all defaults.

use safer_common::policy::RiskPolicy;
use safer_ingestion::fanout::FanoutConfig;
use safer_ingestion::sources::opentargets::OPEN_TARGETS_GRAPHQL_URL;
use safer_ingestion::PipelineConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub sources: SourcesConfig,
    #[serde(default)]
    pub fanout: FanoutConfig,
    #[serde(default)]
    pub policy: RiskPolicy,
    #[serde(default)]
    pub report: ReportConfig,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SourcesConfig {
    #[serde(default)]
    pub opentargets: OpenTargetsConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpenTargetsConfig {
    #[serde(default = "default_ot_url")]
    pub url: String,
    #[serde(default = "default_http_timeout")]
    pub timeout_secs: u64,
    /// Rows requested per association / adverse-event page
    #[serde(default = "default_page_size")]
    pub page_size: usize,
}

fn default_ot_url()       -> String { OPEN_TARGETS_GRAPHQL_URL.to_string() }
fn default_http_timeout() -> u64    { 30 }
fn default_page_size()    -> usize  { 100 }

impl Default for OpenTargetsConfig {
    fn default() -> Self {
        Self {
            url: default_ot_url(),
            timeout_secs: default_http_timeout(),
            page_size: default_page_size(),
        }
    }
}

impl OpenTargetsConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportConfig {
    #[serde(default = "default_family_risk")]
    pub family_risk: bool,
    /// External policy file (TOML, YAML or JSON). Replaces `[policy]` when set.
    pub policy_file: Option<PathBuf>,
}

fn default_family_risk() -> bool { true }

impl Default for ReportConfig {
    fn default() -> Self {
        Self { family_risk: default_family_risk(), policy_file: None }
    }
}

impl Config {
    /// Load configuration from safer.toml.
    /// Checks SAFER_CONFIG env var first, then current directory. Only a
    /// missing ./safer.toml with SAFER_CONFIG unset falls back to defaults.
    pub fn load() -> anyhow::Result<Self> {
        match std::env::var("SAFER_CONFIG") {
            Ok(path) => Self::load_from(Path::new(&path)),
            Err(_) => Self::load_or_default(Path::new("safer.toml")),
        }
    }

    /// Load an explicitly named config file. A missing file is an error.
    pub fn load_from(path: &Path) -> anyhow::Result<Self> {
        if !path.exists() {
            anyhow::bail!(
                "Config file not found: {}\n\
                 Copy safer.example.toml to safer.toml and edit it.",
                path.display()
            );
        }

        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    fn load_or_default(path: &Path) -> anyhow::Result<Self> {
        if !path.exists() {
            tracing::debug!("No config at {}, using defaults", path.display());
            return Ok(Self::default());
        }
        Self::load_from(path)
    }

    /// Pipeline settings, with the external policy file resolved.
    pub fn pipeline_config(&self) -> anyhow::Result<PipelineConfig> {
        let policy = match &self.report.policy_file {
            Some(path) => RiskPolicy::from_path(path)?,
            None => self.policy.clone(),
        };
        Ok(PipelineConfig {
            policy,
            fanout: self.fanout.clone(),
            family_risk: self.report.family_risk,
        })
    }
}
