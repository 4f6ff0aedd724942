use serde::{Deserialize, Serialize};

use crate::error::{AppResult, ApplicationError};

/// How the random source is seeded when no `rand` parameter has a value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SeedPolicy {
    #[default]
    Entropy,
    Fixed(u64),
}

/// How data crosses a connection between two applications.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConnectMode {
    #[default]
    Memory,
    File,
}

impl ConnectMode {
    pub fn is_memory(&self) -> bool {
        matches!(self, ConnectMode::Memory)
    }
}

/// Configuration shared by applications
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApplicationConfig {
    #[serde(default)]
    pub seed_policy: SeedPolicy,
    #[serde(default)]
    pub connect_mode: ConnectMode,
    #[serde(default)]
    pub parameter_document: bool,
    #[serde(default = "default_ram_mb")]
    pub default_ram_mb: i64,
}

fn default_ram_mb() -> i64 {
    256
}

impl Default for ApplicationConfig {
    fn default() -> Self {
        ApplicationConfig {
            seed_policy: SeedPolicy::Entropy,
            connect_mode: ConnectMode::Memory,
            parameter_document: false,
            default_ram_mb: default_ram_mb(),
        }
    }
}

impl ApplicationConfig {
    pub fn from_json_str(text: &str) -> AppResult<Self> {
        serde_json::from_str(text).map_err(|e| ApplicationError::Document(format!("invalid config: {}", e)))
    }
}
