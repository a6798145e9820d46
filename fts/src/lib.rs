use std::{io, path::PathBuf};

use tantivy::{query::QueryParserError, TantivyError};

pub use create_index_config::*;
pub use database::*;
pub use ingest::*;
pub use read_only::ReadOnlyDirectory;
pub use tantivy::Index;
pub use threads::ThreadCount;

pub mod create_index_config;
pub mod database;
pub mod ingest;
pub mod read_only;
pub mod threads;

#[derive(Debug, thiserror::Error)]
pub enum SearchError {
  #[error("Impossible d'ouvrir l'index {}", path.display())]
  Open {
    path: PathBuf,
    #[source]
    source: TantivyError,
  },
  #[error("Index {} incompatible : le champ `{field}` est absent du schéma", path.display())]
  IncompatibleSchema { path: PathBuf, field: &'static str },
  #[error("Impossible de parser la query « {query} »")]
  Query {
    query: String,
    #[source]
    source: QueryParserError,
  },
  #[error("Ligne {line} : message JSON invalide")]
  Json {
    line: usize,
    #[source]
    source: serde_json::Error,
  },
  #[error("Erreur de l'index")]
  Tantivy(#[from] TantivyError),
  #[error("Erreur d'entrée/sortie")]
  Io(#[from] io::Error),
}
