use std::{io::BufRead, path::Path};

use chrono::{DateTime, Utc};
use serde::Deserialize;
use tantivy::{doc, Index};

use crate::{MessageFields, SearchError};

const COMMIT_EVERY: u64 = 100_000;

/// Ingère des messages JSON (un par ligne) dans l'index et retourne le nombre
/// de messages ajoutés. Les lignes vides sont ignorées.
pub fn ingest<P: AsRef<Path>, R: BufRead>(directory_path: P, rdr: R) -> Result<u64, SearchError> {
  let path = directory_path.as_ref();
  let index = Index::open_in_dir(path).map_err(|source| SearchError::Open {
    path: path.to_path_buf(),
    source,
  })?;
  let MessageFields {
    id,
    thread,
    from,
    to,
    subject,
    body,
    tag,
    date,
  } = MessageFields::resolve(&index.schema(), path)?;

  let mut index_writer = index.writer(125_000_000)?;
  let mut cpt = 0u64;
  for (line, json_line) in rdr.lines().enumerate() {
    let json_line = json_line?;
    if json_line.trim().is_empty() {
      continue;
    }
    let message: Message =
      serde_json::from_str(&json_line).map_err(|source| SearchError::Json {
        line: line + 1,
        source,
      })?;
    let mut document = doc!(
        id => message.id,
        thread => message.thread,
        from => message.from,
        subject => message.subject,
        body => message.body,
        date => tantivy::DateTime::from_unix_timestamp(message.date.timestamp())
    );
    message.to.iter().for_each(|f| document.add_text(to, f));
    message.tags.iter().for_each(|f| document.add_text(tag, f));

    index_writer.add_document(document)?;
    cpt += 1;
    if cpt % COMMIT_EVERY == 0 {
      index_writer.commit()?;
      tracing::debug!(messages = cpt, "commit intermédiaire");
    }
  }
  index_writer.commit()?;
  tracing::info!(messages = cpt, path = %path.display(), "ingestion terminée");

  Ok(cpt)
}

#[derive(Debug, Deserialize)]
pub struct Message {
  pub id: String,
  pub thread: u64,
  #[serde(default)]
  pub from: String,
  #[serde(default)]
  pub to: Vec<String>,
  #[serde(default)]
  pub subject: String,
  #[serde(default)]
  pub body: String,
  #[serde(default)]
  pub tags: Vec<String>,
  pub date: DateTime<Utc>,
}
