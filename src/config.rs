use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::{Error, Result};

/// Prefix for environment overrides, e.g. `FANOUT_STRATEGY__KIND=state`.
pub const ENV_PREFIX: &str = "FANOUT";

const DEFAULT_ENCODED_ATTRIBUTE: &str = "event";
const DEFAULT_STATE_ATTRIBUTE: &str = "state";

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub strategy: StrategyConfig,
    #[serde(default)]
    pub sns: SnsConfig,
}

/// Which naming strategy the handler runs with.
///
/// Both fields are optional, so `FANOUT_STRATEGY__ATTRIBUTE=outbox` alone
/// selects the encoded strategy reading `outbox`.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct StrategyConfig {
    #[serde(default)]
    pub kind: StrategyKind,
    /// Overrides the strategy's own default attribute.
    #[serde(default)]
    pub attribute: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StrategyKind {
    #[default]
    Encoded,
    State,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct SnsConfig {
    /// Falls back to `AWS_REGION`, then `us-east-1`.
    #[serde(default)]
    pub region: Option<String>,
    /// Endpoint override for local stacks.
    #[serde(default)]
    pub endpoint_url: Option<String>,
}

impl Config {
    /// Loads settings from an optional TOML file, then `FANOUT_*`
    /// environment variables.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        Self::load_with(path, environment())
    }

    fn load_with(path: Option<&Path>, env: config::Environment) -> Result<Self> {
        let mut builder = config::Config::builder();
        if let Some(path) = path {
            builder = builder.add_source(config::File::from(path));
        }

        let settings = builder
            .add_source(env)
            .build()
            .map_err(|e| Error::Config(e.to_string()))?;

        settings
            .try_deserialize()
            .map_err(|e| Error::Config(e.to_string()))
    }
}

impl StrategyConfig {
    pub fn name(&self) -> &'static str {
        match self.kind {
            StrategyKind::Encoded => "encoded",
            StrategyKind::State => "state",
        }
    }

    pub fn attribute(&self) -> &str {
        match (&self.attribute, self.kind) {
            (Some(attribute), _) => attribute,
            (None, StrategyKind::Encoded) => DEFAULT_ENCODED_ATTRIBUTE,
            (None, StrategyKind::State) => DEFAULT_STATE_ATTRIBUTE,
        }
    }
}

impl SnsConfig {
    pub fn region(&self) -> String {
        self.region
            .clone()
            .or_else(|| std::env::var("AWS_REGION").ok().filter(|r| !r.is_empty()))
            .unwrap_or_else(default_region)
    }
}

fn environment() -> config::Environment {
    config::Environment::with_prefix(ENV_PREFIX)
        .prefix_separator("_")
        .separator("__")
}

fn default_region() -> String {
    "us-east-1".to_string()
}
