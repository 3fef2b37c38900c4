use log::{info, warn};
use once_cell::sync::OnceCell;
use serde_derive::Deserialize;

use crate::engine::matchengine::Locality;

static INSTANCE: OnceCell<RuntimeConfig> = OnceCell::new();

/// Returns the installed config, or the defaults if none was installed
pub fn instance() -> &'static RuntimeConfig {
    INSTANCE.get_or_init(RuntimeConfig::new)
}

/// Installs `config` as the process-wide config
///
/// Only the first call wins; later calls log and keep the installed value.
pub fn install(config: RuntimeConfig) -> &'static RuntimeConfig {
    if INSTANCE.set(config).is_err() {
        warn!("runtime config already installed, ignoring new value");
    }
    instance()
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum StoreKind {
    #[default]
    Memory,
    Mysql,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct StoreConfig {
    pub kind: StoreKind,
    pub database_url: Option<String>,
    pub max_connections: u32,
    /// TOML seed for the memory store
    pub seed_path: Option<String>,
}

impl Default for StoreConfig {
    fn default() -> Self {
        StoreConfig {
            kind: StoreKind::Memory,
            database_url: None,
            max_connections: 5,
            seed_path: None,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct MatchingConfig {
    /// Upper bound on candidate collection reads in flight per search
    pub max_concurrent_reads: usize,
    pub locality: Locality,
}

impl Default for MatchingConfig {
    fn default() -> Self {
        MatchingConfig {
            max_concurrent_reads: 8,
            locality: Locality::default(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct RuntimeConfig {
    pub addr: String,
    pub metrics_addr: String,
    pub store: StoreConfig,
    pub matching: MatchingConfig,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        RuntimeConfig::new()
    }
}

impl RuntimeConfig {
    pub fn new() -> Self {
        RuntimeConfig {
            addr: "0.0.0.0:4000".to_string(),
            metrics_addr: "0.0.0.0:4010".to_string(),
            store: StoreConfig::default(),
            matching: MatchingConfig::default(),
        }
    }

    /// Reads the config from `path`, falling back to defaults on any error
    pub fn from_toml(path: &str) -> Self {
        let contents = match std::fs::read_to_string(path) {
            Ok(c) => c,
            Err(e) => {
                warn!(
                    "Something went wrong reading the runtime config file {}, {:?}",
                    path, e
                );
                return RuntimeConfig::new();
            }
        };
        match toml::from_str::<RuntimeConfig>(&contents) {
            Ok(config) => {
                info!("loaded runtime config from {}", path);
                config
            }
            Err(e) => {
                warn!(
                    "Something went wrong parsing the runtime config file {}, {:?}",
                    path, e
                );
                RuntimeConfig::new()
            }
        }
    }
}
