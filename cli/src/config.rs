use std::{
  fs,
  path::{Path, PathBuf},
};

use serde::Deserialize;

use crate::ConfigError;

pub const CONFIG_FILE_NAME: &str = ".mailidx-config.toml";

#[derive(Debug, Deserialize)]
pub struct Config {
  pub database: DatabaseConfig,
}

#[derive(Debug, Deserialize)]
pub struct DatabaseConfig {
  /// Répertoire de l'index ; relatif au fichier de configuration s'il n'est
  /// pas absolu.
  pub path: PathBuf,
}

impl Config {
  /// Charge la configuration depuis `path`, ou depuis `~/.mailidx-config.toml`.
  pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
    match path {
      Some(path) => Self::load_from(path),
      None => Self::load_from(&Self::default_path()?),
    }
  }

  pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
    let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
      path: path.to_path_buf(),
      source,
    })?;
    let mut config: Config = toml::from_str(&content).map_err(|source| ConfigError::Parse {
      path: path.to_path_buf(),
      source,
    })?;

    if config.database.path.is_relative() {
      if let Some(parent) = path.parent() {
        config.database.path = parent.join(&config.database.path);
      }
    }
    tracing::debug!(
      config = %path.display(),
      database = %config.database.path.display(),
      "configuration chargée"
    );

    Ok(config)
  }

  pub fn default_path() -> Result<PathBuf, ConfigError> {
    dirs::home_dir()
      .map(|home| home.join(CONFIG_FILE_NAME))
      .ok_or(ConfigError::NoHome)
  }

  pub fn database_path(&self) -> &Path {
    &self.database.path
  }
}
