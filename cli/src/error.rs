use std::{collections::TryReserveError, io, path::PathBuf};

use fts::SearchError;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
  #[error("Impossible de déterminer le répertoire personnel")]
  NoHome,
  #[error("Impossible de lire la configuration {}", path.display())]
  Read {
    path: PathBuf,
    #[source]
    source: io::Error,
  },
  #[error("Configuration {} invalide", path.display())]
  Parse {
    path: PathBuf,
    #[source]
    source: toml::de::Error,
  },
}

#[derive(Debug, thiserror::Error)]
pub enum CountError {
  #[error(transparent)]
  Index(#[from] SearchError),
  #[error("Mémoire insuffisante pour construire la query")]
  Allocation(#[from] TryReserveError),
  #[error("Impossible d'écrire le résultat")]
  Output(#[source] io::Error),
}
