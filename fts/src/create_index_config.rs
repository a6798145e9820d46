use std::{
  fs,
  path::{Path, PathBuf},
};

use tantivy::{
  schema::{Field, Schema, FAST, INDEXED, STORED, STRING, TEXT},
  Index,
};

use crate::SearchError;

pub const ID: &str = "id";
pub const THREAD: &str = "thread";
pub const FROM: &str = "from";
pub const TO: &str = "to";
pub const SUBJECT: &str = "subject";
pub const BODY: &str = "body";
pub const TAG: &str = "tag";
pub const DATE: &str = "date";

pub fn message_schema() -> Schema {
  let mut schema_builder = Schema::builder();

  schema_builder.add_text_field(ID, STRING | STORED);
  schema_builder.add_u64_field(THREAD, INDEXED | FAST | STORED);
  schema_builder.add_text_field(FROM, TEXT | STORED);
  schema_builder.add_text_field(TO, TEXT | STORED);
  schema_builder.add_text_field(SUBJECT, TEXT | STORED);
  schema_builder.add_text_field(BODY, TEXT);
  schema_builder.add_text_field(TAG, STRING | STORED);
  schema_builder.add_date_field(DATE, INDEXED | FAST | STORED);

  schema_builder.build()
}

pub fn create_index_config<P: AsRef<Path>>(directory_path: P) -> Result<(), SearchError> {
  fs::create_dir(&directory_path)?;
  Index::create_in_dir(&directory_path, message_schema())?;
  tracing::info!(path = %directory_path.as_ref().display(), "index créé");

  Ok(())
}

/// Champs du schéma des messages, résolus une fois pour toutes à l'ouverture.
#[derive(Debug, Clone, Copy)]
pub struct MessageFields {
  pub id: Field,
  pub thread: Field,
  pub from: Field,
  pub to: Field,
  pub subject: Field,
  pub body: Field,
  pub tag: Field,
  pub date: Field,
}

impl MessageFields {
  pub fn resolve(schema: &Schema, path: &Path) -> Result<Self, SearchError> {
    let field = |name: &'static str| {
      schema
        .get_field(name)
        .ok_or_else(|| SearchError::IncompatibleSchema {
          path: PathBuf::from(path),
          field: name,
        })
    };

    Ok(Self {
      id: field(ID)?,
      thread: field(THREAD)?,
      from: field(FROM)?,
      to: field(TO)?,
      subject: field(SUBJECT)?,
      body: field(BODY)?,
      tag: field(TAG)?,
      date: field(DATE)?,
    })
  }

  /// Champs interrogés quand un terme ne précise pas de champ.
  pub fn default_search_fields(&self) -> Vec<Field> {
    vec![self.subject, self.body, self.from, self.to]
  }
}
