//! Configuration resolution.
//!
//! Resolution order: explicit CLI path → `SMT_TRIAGE_CONFIG` environment
//! variable → built-in defaults. The config file is a single JSON document
//! with optional `codes`, `policy`, and `schema` sections; absent sections
//! fall back to defaults independently.

use serde::{Deserialize, Serialize};
use smt_common::{Error, Result};
use std::fs;
use std::path::Path;

use crate::codes::FailureCodeTable;
use crate::policy::DetectorPolicy;
use crate::schema::ColumnSchema;

/// Environment variable naming an alternate config file.
pub const ENV_CONFIG_PATH: &str = "SMT_TRIAGE_CONFIG";

/// Where the effective configuration came from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConfigSource {
    /// Explicitly provided via CLI argument.
    CliArgument,

    /// Set via the `SMT_TRIAGE_CONFIG` environment variable.
    Environment,

    /// Using built-in defaults.
    #[default]
    BuiltinDefault,
}

impl std::fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigSource::CliArgument => write!(f, "CLI argument"),
            ConfigSource::Environment => write!(f, "environment variable"),
            ConfigSource::BuiltinDefault => write!(f, "builtin default"),
        }
    }
}

/// On-disk config file shape. Every section is optional.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct ConfigFile {
    codes: Option<FailureCodeTable>,
    policy: Option<DetectorPolicy>,
    schema: Option<ColumnSchema>,
}

/// Complete, validated analysis configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AnalysisConfig {
    /// Failure-code → meaning table.
    pub codes: FailureCodeTable,

    /// Detector policy (failure predicate, unresolved handling).
    pub policy: DetectorPolicy,

    /// Raw-file column schema.
    pub schema: ColumnSchema,
}

impl AnalysisConfig {
    /// Resolve and load configuration.
    ///
    /// Returns the effective config together with its provenance for
    /// diagnostics. A path that resolves but cannot be read or parsed is a
    /// hard error; silently falling back to defaults would mask typos.
    pub fn load(cli_path: Option<&Path>) -> Result<(Self, ConfigSource)> {
        if let Some(path) = cli_path {
            return Ok((Self::from_file(path)?, ConfigSource::CliArgument));
        }

        if let Ok(env_path) = std::env::var(ENV_CONFIG_PATH) {
            if !env_path.is_empty() {
                return Ok((
                    Self::from_file(Path::new(&env_path))?,
                    ConfigSource::Environment,
                ));
            }
        }

        Ok((Self::default(), ConfigSource::BuiltinDefault))
    }

    /// Load configuration from a JSON file, overlaying defaults per section.
    pub fn from_file(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path).map_err(|e| {
            Error::Config(format!("cannot read {}: {e}", path.display()))
        })?;
        let file: ConfigFile = serde_json::from_str(&raw).map_err(|e| {
            Error::Config(format!("cannot parse {}: {e}", path.display()))
        })?;

        let config = Self {
            codes: file.codes.unwrap_or_default(),
            policy: file.policy.unwrap_or_default(),
            schema: file.schema.unwrap_or_default(),
        };
        config.validate()?;
        Ok(config)
    }

    /// Validate all sections.
    pub fn validate(&self) -> Result<()> {
        self.codes.validate()?;
        self.schema.validate()?;
        Ok(())
    }
}
