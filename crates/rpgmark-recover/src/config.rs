use rpgmark_codec::Strategy;
use rpgmark_core::errors::{ErrorInfo, RpgError};
use serde::{Deserialize, Serialize};

/// YAML-configurable parameters governing snapshot recovery.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecoveryConfig {
    /// Decoder used on unbroken and repaired candidates.
    #[serde(default)]
    pub strategy: Strategy,
    /// Fan candidates out over a thread pool.
    #[serde(default)]
    pub parallel: bool,
    /// Worker count when `parallel` is set; `None` lets rayon decide.
    #[serde(default)]
    pub threads: Option<usize>,
    /// Components smaller than this are discarded before repair.
    #[serde(default = "default_min_vertices")]
    pub min_vertices: usize,
    /// Capacity of the observation buffer; `None` keeps every node.
    #[serde(default)]
    pub buffer_capacity: Option<usize>,
}

fn default_min_vertices() -> usize {
    4
}

impl Default for RecoveryConfig {
    fn default() -> Self {
        Self {
            strategy: Strategy::default(),
            parallel: false,
            threads: None,
            min_vertices: default_min_vertices(),
            buffer_capacity: None,
        }
    }
}

impl RecoveryConfig {
    /// Parses a YAML document; missing fields take their defaults.
    pub fn from_yaml_str(yaml: &str) -> Result<Self, RpgError> {
        serde_yaml::from_str(yaml).map_err(|err| serde_error("yaml_deserialize", err))
    }

    /// Serializes the configuration to YAML.
    pub fn to_yaml_string(&self) -> Result<String, RpgError> {
        serde_yaml::to_string(self).map_err(|err| serde_error("yaml_serialize", err))
    }
}

fn serde_error(code: &str, err: impl ToString) -> RpgError {
    RpgError::Serde(ErrorInfo::new(code, err.to_string()))
}
