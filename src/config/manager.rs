use super::{
    analysis::AnalysisConfig,
    data::DataConfig,
    evolution::EvolutionConfig,
    traits::ConfigSection,
};
use crate::error::TradeIntervalError;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::{Arc, RwLock};

/// Prefix for environment overrides, e.g. `TRADEINTERVAL__EVOLUTION__SEED=7`
pub const ENV_PREFIX: &str = "TRADEINTERVAL";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub evolution: EvolutionConfig,
    pub analysis: AnalysisConfig,
    pub data: DataConfig,
}

impl AppConfig {
    pub fn validate(&self) -> Result<(), TradeIntervalError> {
        validate_section(&self.evolution)?;
        validate_section(&self.analysis)?;
        validate_section(&self.data)?;
        Ok(())
    }

    /// Build a config from an optional TOML file layered under environment overrides
    pub fn load(path: Option<&Path>) -> Result<Self, TradeIntervalError> {
        let mut builder = config::Config::builder();
        if let Some(path) = path {
            builder = builder.add_source(
                config::File::from(path).format(config::FileFormat::Toml),
            );
        }
        let settings = builder
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let config: AppConfig = settings.try_deserialize()?;
        config.validate()?;
        log::debug!("Loaded configuration (file: {:?})", path);
        Ok(config)
    }
}

fn validate_section<S: ConfigSection>(section: &S) -> Result<(), TradeIntervalError> {
    section.validate().map_err(|e| match e {
        TradeIntervalError::Configuration(msg) => {
            TradeIntervalError::Configuration(format!("[{}] {}", S::section_name(), msg))
        }
        other => other,
    })
}

pub struct ConfigManager {
    config: Arc<RwLock<AppConfig>>,
}

impl Default for ConfigManager {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigManager {
    pub fn new() -> Self {
        Self {
            config: Arc::new(RwLock::new(AppConfig::default())),
        }
    }

    pub fn load_from_file<P: AsRef<Path>>(&self, path: P) -> Result<(), TradeIntervalError> {
        let config = AppConfig::load(Some(path.as_ref()))?;
        *self.write()? = config;
        Ok(())
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), TradeIntervalError> {
        let toml_str = {
            let config = self.read()?;
            toml::to_string_pretty(&*config)?
        };

        std::fs::write(path, toml_str)?;
        Ok(())
    }

    pub fn get(&self) -> Result<AppConfig, TradeIntervalError> {
        Ok(self.read()?.clone())
    }

    /// Apply `f` and keep the result only if it still validates
    pub fn update<F>(&self, f: F) -> Result<(), TradeIntervalError>
    where
        F: FnOnce(&mut AppConfig),
    {
        let mut config = self.write()?;
        let mut candidate = config.clone();
        f(&mut candidate);
        candidate.validate()?;
        *config = candidate;
        Ok(())
    }

    fn read(&self) -> Result<std::sync::RwLockReadGuard<'_, AppConfig>, TradeIntervalError> {
        self.config
            .read()
            .map_err(|_| TradeIntervalError::Configuration("Config lock poisoned".to_string()))
    }

    fn write(&self) -> Result<std::sync::RwLockWriteGuard<'_, AppConfig>, TradeIntervalError> {
        self.config
            .write()
            .map_err(|_| TradeIntervalError::Configuration("Config lock poisoned".to_string()))
    }
}
