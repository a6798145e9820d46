use std::{io::Write, path::Path};

use clap::{Parser, ValueEnum};
use fts::Database;

use crate::{query::query_string_from_args, CountError};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputMode {
  #[default]
  Messages,
  Threads,
}

/// Compte les messages, ou les fils de discussion, qui correspondent à une
/// recherche
///
/// Les options doivent précéder les termes de recherche : tout ce qui suit le
/// premier terme fait partie de la query.
#[derive(Debug, Parser)]
#[command(name = "count")]
pub struct CountArgs {
  /// Unité comptée
  #[arg(short, long, value_enum, default_value_t)]
  pub output: OutputMode,
  /// Termes de recherche ; sans terme, tous les messages sont comptés
  #[arg(trailing_var_arg = true)]
  pub terms: Vec<String>,
}

/// Ouvre l'index en lecture seule, compte et écrit le résultat sur une ligne.
pub fn run<W: Write>(database_path: &Path, args: &CountArgs, out: &mut W) -> Result<u64, CountError> {
  let query_str = query_string_from_args(&args.terms)?;

  let database = Database::open(database_path)?;
  let query = database.compile(&query_str)?;
  let count = match args.output {
    OutputMode::Messages => query.count_messages()?,
    OutputMode::Threads => query.count_threads()?,
  };
  tracing::debug!(output = ?args.output, query = %query_str, count, "comptage");

  writeln!(out, "{count}")
    .and_then(|_| out.flush())
    .map_err(CountError::Output)?;

  Ok(count)
}
