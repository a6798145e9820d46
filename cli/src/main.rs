use std::{io, path::PathBuf, process::ExitCode};

use clap::{Parser, Subcommand};
use mailidx::{
  count::{self, CountArgs},
  Config,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Registry};

#[derive(Debug, Parser)]
/// Indexation et recherche de courriels
#[command(name = "mailidx", version, about)]
struct Cli {
  /// Fichier de configuration (défaut : ~/.mailidx-config.toml)
  #[arg(long, global = true, env = "MAILIDX_CONFIG")]
  config: Option<PathBuf>,
  #[command(subcommand)]
  command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
  Count(CountArgs),
  #[command(subcommand)]
  Index(Index),
}

#[derive(Debug, Subcommand)]
enum Index {
  /// Crée un index vide à l'emplacement configuré
  Create,
  /// Ajoute à l'index les messages JSON lus sur l'entrée standard, un par ligne
  Ingest,
}

fn main() -> ExitCode {
  Registry::default()
    .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
    .with(EnvFilter::from_default_env())
    .init();

  let args = match Cli::try_parse() {
    Ok(args) => args,
    Err(e) => {
      let _ = e.print();
      // --help et --version passent aussi par ici
      return if e.use_stderr() {
        ExitCode::FAILURE
      } else {
        ExitCode::SUCCESS
      };
    }
  };

  match run(args) {
    Ok(()) => ExitCode::SUCCESS,
    Err(e) => {
      eprintln!("{e:#}");
      ExitCode::FAILURE
    }
  }
}

fn run(args: Cli) -> anyhow::Result<()> {
  let config = Config::load(args.config.as_deref())?;

  match args.command {
    Commands::Count(count_args) => {
      count::run(config.database_path(), &count_args, &mut io::stdout().lock())?;
    }
    Commands::Index(command) => match command {
      Index::Create => fts::create_index_config(config.database_path())?,
      Index::Ingest => {
        let ingested = fts::ingest(config.database_path(), io::stdin().lock())?;
        tracing::info!(messages = ingested, "ingest");
      }
    },
  };

  Ok(())
}
