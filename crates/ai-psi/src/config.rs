//! Action-selection configuration loading.

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::error::PsiError;

/// Settings consumed by the cognitive cycle, loaded from YAML.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PsiConfig {
    /// Id under which the agent is registered in the world snapshot
    pub agent_id: String,

    /// Demand names, tokenized on anything that is not alphanumeric
    /// (e.g. "Energy Water Integrity")
    pub demands: String,

    /// Seconds an action may stay in flight before it is stopped
    #[serde(default = "default_timeout")]
    pub procedure_execution_timeout_secs: u64,

    /// Cycles to wait after the plan runs out before planning again
    #[serde(default = "default_replan_delay")]
    pub replan_delay_cycles: u32,

    /// Salience boost applied to every node of an adopted plan
    #[serde(default = "default_stimulus")]
    pub stimulus: i32,

    /// Plan-success confidence must exceed this for a plan to be adopted
    #[serde(default = "default_threshold")]
    pub plan_success_threshold: f64,
}

fn default_agent_id() -> String {
    "agent".to_string()
}
fn default_demands() -> String {
    "Energy Water Integrity Affiliation Certainty Competence".to_string()
}
fn default_timeout() -> u64 {
    60
}
fn default_replan_delay() -> u32 {
    4
}
fn default_stimulus() -> i32 {
    10
}
fn default_threshold() -> f64 {
    0.9
}

impl Default for PsiConfig {
    fn default() -> Self {
        Self {
            agent_id: default_agent_id(),
            demands: default_demands(),
            procedure_execution_timeout_secs: default_timeout(),
            replan_delay_cycles: default_replan_delay(),
            stimulus: default_stimulus(),
            plan_success_threshold: default_threshold(),
        }
    }
}

impl PsiConfig {
    /// Load configuration from a YAML file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config from {}", path.display()))?;
        let config: Self = serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse config from {}", path.display()))?;
        config
            .validate()
            .with_context(|| format!("Invalid config in {}", path.display()))?;
        Ok(config)
    }

    /// Load `path` if it exists, defaults otherwise
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    pub fn validate(&self) -> Result<(), PsiError> {
        if !(0.0..=1.0).contains(&self.plan_success_threshold) {
            return Err(PsiError::Config(format!(
                "plan_success_threshold must be within [0, 1], got {}",
                self.plan_success_threshold
            )));
        }
        if self.agent_id.trim().is_empty() {
            return Err(PsiError::Config("agent_id must not be empty".to_string()));
        }
        Ok(())
    }

    /// Demand names in configuration order.
    pub fn demand_names(&self) -> Vec<String> {
        self.demands
            .split(|c: char| !c.is_alphanumeric())
            .filter(|name| !name.is_empty())
            .map(str::to_string)
            .collect()
    }
}
