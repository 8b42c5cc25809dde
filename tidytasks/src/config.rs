use serde::Deserialize;
use std::path::PathBuf;

/// Prefix shared by every environment variable the server reads, e.g. `TIDYTASKS_PORT`.
pub const ENV_PREFIX: &str = "TIDYTASKS";

#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct Config {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_tasks_file")]
    pub tasks_file: PathBuf,
    /// Verbose logging and error chains on fault pages. Only for a trusted local network.
    #[serde(default = "default_debug")]
    pub debug: bool,
}

impl Config {
    /// Loads configuration from `TIDYTASKS_*` environment variables.
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_environment(config::Environment::with_prefix(ENV_PREFIX))
    }

    /// Loads configuration from the given environment source.
    pub fn from_environment(environment: config::Environment) -> anyhow::Result<Self> {
        let settings = config::Config::builder()
            .add_source(environment.try_parsing(true))
            .build()?;

        let config: Config = settings.try_deserialize()?;
        Ok(config)
    }

    /// The socket address the server binds to.
    pub fn server_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            tasks_file: default_tasks_file(),
            debug: default_debug(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    5000
}

fn default_tasks_file() -> PathBuf {
    PathBuf::from("tasks.json")
}

fn default_debug() -> bool {
    true
}
