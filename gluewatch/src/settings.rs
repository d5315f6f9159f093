use std::path::{Path, PathBuf};
use std::str::FromStr;

use clap::Parser;
use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError};
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString, IntoStaticStr};
use thiserror::Error;

mod cloudwatch_settings;
mod derive_settings;
mod eligibility_settings;
mod engine_settings;
mod glue_settings;

pub use cloudwatch_settings::CloudWatchSettings;
pub use derive_settings::DeriveSettings;
pub use eligibility_settings::EligibilitySettings;
pub use engine_settings::EngineSettings;
pub use glue_settings::GlueSettings;

const ENV_APP_ENVIRONMENT: &str = "APP_ENVIRONMENT";
const ENV_PREFIX: &str = "APP";
const ENV_SEPARATOR: &str = "__";
const DEFAULT_RESOURCES_DIR: &str = "./resources";
const APP_CONFIG: &str = "application";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub engine: EngineSettings,
    #[serde(default)]
    pub glue: GlueSettings,
    #[serde(default)]
    pub cloudwatch: CloudWatchSettings,
    #[serde(default)]
    pub eligibility: EligibilitySettings,
    #[serde(default)]
    pub derive: DeriveSettings,
}

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to load configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("{0} environment unrecognized")]
    UnrecognizedEnvironment(String),

    #[error("override {key} out of range: {value}")]
    OverrideOutOfRange { key: &'static str, value: String },
}

impl Settings {
    /// Load layered configuration: `application` then `<environment>` from the resources
    /// directory, an explicit configuration file, `APP__`-prefixed environment variables, and
    /// finally command line overrides.
    #[tracing::instrument(level = "info")]
    pub fn load(options: &CliOptions) -> Result<Self, SettingsError> {
        let resources = options.resources_path();
        let environment = match options.environment {
            Some(env) => env,
            None => Environment::from_env()?,
        };

        let config = Config::builder().add_source(config::File::from(resources.join(APP_CONFIG)).required(true));
        let config = Self::load_environment_configuration(config, &resources, environment);
        let config = Self::load_configuration(config, options);
        let config = Self::load_environment_variables(config);
        let config = Self::load_overrides(config, options)?;

        let settings = config.build()?.try_deserialize()?;
        tracing::info!(?settings, %environment, "settings loaded");
        Ok(settings)
    }

    fn load_environment_configuration(
        config: ConfigBuilder<DefaultState>, resources: &Path, environment: Environment,
    ) -> ConfigBuilder<DefaultState> {
        let env_path = resources.join(environment.as_ref());
        tracing::info!("looking for {} config at: {:?}", environment, env_path);
        config.add_source(config::File::from(env_path).required(true))
    }

    fn load_configuration(config: ConfigBuilder<DefaultState>, options: &CliOptions) -> ConfigBuilder<DefaultState> {
        match options.config {
            Some(ref config_path) => {
                tracing::info!("looking for {} config at: {:?}", APP_CONFIG, config_path);
                config.add_source(config::File::from(config_path.as_path()).required(true))
            },
            None => config,
        }
    }

    fn load_environment_variables(config: ConfigBuilder<DefaultState>) -> ConfigBuilder<DefaultState> {
        let config_env = config::Environment::with_prefix(ENV_PREFIX).separator(ENV_SEPARATOR);
        tracing::info!("loading environment properties with prefix: {:?}", config_env);
        config.add_source(config_env)
    }

    fn load_overrides(
        config: ConfigBuilder<DefaultState>, options: &CliOptions,
    ) -> Result<ConfigBuilder<DefaultState>, SettingsError> {
        let config = match options.interval_secs {
            None => config,
            Some(interval_secs) => {
                let key = "engine.sweep_interval_secs";
                let value = i64::try_from(interval_secs)
                    .map_err(|_| SettingsError::OverrideOutOfRange { key, value: interval_secs.to_string() })?;
                config.set_override(key, value)?
            },
        };

        Ok(config)
    }
}

#[derive(Parser, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[clap(author, version, about)]
pub struct CliOptions {
    /// override environment-based configuration file to load.
    /// Default behavior is to load configuration based on `APP_ENVIRONMENT` envvar.
    #[clap(short, long)]
    pub config: Option<PathBuf>,

    /// Override default location from which to load configuration files. Default directory is
    /// ./resources.
    #[clap(short, long)]
    pub resources: Option<PathBuf>,

    #[clap(short, long, value_enum)]
    pub environment: Option<Environment>,

    /// Repeat the sweep every `interval_secs` seconds instead of running it once.
    #[clap(short, long)]
    pub interval_secs: Option<u64>,
}

impl CliOptions {
    pub fn resources_path(&self) -> PathBuf {
        self.resources
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_RESOURCES_DIR))
    }
}

#[derive(
    Debug,
    Display,
    Copy,
    Clone,
    PartialEq,
    Eq,
    EnumString,
    IntoStaticStr,
    clap::ValueEnum,
    Serialize,
    Deserialize,
)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    Local,
    Production,
}

impl Default for Environment {
    fn default() -> Self {
        Self::Local
    }
}

impl AsRef<str> for Environment {
    fn as_ref(&self) -> &str {
        self.into()
    }
}

impl Environment {
    /// Environment named by `APP_ENVIRONMENT`, defaulting to local when unset.
    pub fn from_env() -> Result<Self, SettingsError> {
        match std::env::var(ENV_APP_ENVIRONMENT) {
            Ok(rep) => Self::from_str(rep.trim()).map_err(|_| SettingsError::UnrecognizedEnvironment(rep)),
            Err(_) => Ok(Self::default()),
        }
    }
}

/// Resolve the shared AWS configuration through the default provider chain, applying the
/// region override when given.
pub async fn load_aws_config(region: Option<&str>) -> aws_config::SdkConfig {
    let mut loader = aws_config::defaults(aws_config::BehaviorVersion::latest());
    if let Some(region) = region {
        loader = loader.region(aws_config::Region::new(region.to_string()));
    }
    loader.load().await
}
