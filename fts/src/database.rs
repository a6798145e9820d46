use std::path::{Path, PathBuf};

use tantivy::{
  collector::Count,
  query::{AllQuery, Query, QueryParser, QueryParserError},
  Index, IndexReader, ReloadPolicy, TantivyError,
};

use crate::{MessageFields, ReadOnlyDirectory, SearchError, ThreadCount};

/// Index de messages ouvert en lecture seule.
///
/// Aucun `IndexWriter` n'est créé et rien n'est écrit dans le répertoire, pas
/// même un fichier de verrou : plusieurs processus peuvent compter en
/// parallèle sur le même index, y compris pendant une ingestion ou sans droit
/// d'écriture. L'index est refermé quand la valeur est détruite.
pub struct Database {
  path: PathBuf,
  index: Index,
  reader: IndexReader,
  fields: MessageFields,
}

impl Database {
  pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, SearchError> {
    let path = path.as_ref().to_path_buf();
    let index = ReadOnlyDirectory::open(&path)
      .map_err(TantivyError::from)
      .and_then(Index::open)
      .map_err(|source| SearchError::Open {
        path: path.clone(),
        source,
      })?;
    let fields = MessageFields::resolve(&index.schema(), &path)?;
    let reader = index
      .reader_builder()
      .reload_policy(ReloadPolicy::Manual)
      .try_into()
      .map_err(|source| SearchError::Open {
        path: path.clone(),
        source,
      })?;
    tracing::debug!(path = %path.display(), "index ouvert en lecture seule");

    Ok(Self {
      path,
      index,
      reader,
      fields,
    })
  }

  /// Compile une query pour cet index. La chaîne vide sélectionne tous les
  /// messages ; une query qui ne fait qu'exclure (`-tag:work`) s'applique à
  /// tous les messages.
  pub fn compile(&self, query: &str) -> Result<CompiledQuery<'_>, SearchError> {
    let compiled: Box<dyn Query> = if query.is_empty() {
      Box::new(AllQuery)
    } else {
      let query_parser = QueryParser::for_index(&self.index, self.fields.default_search_fields());
      let parsed = match query_parser.parse_query(query) {
        Err(QueryParserError::AllButQueryForbidden) => query_parser.parse_query(&format!("* {query}")),
        parsed => parsed,
      };
      parsed.map_err(|source| SearchError::Query {
        query: query.to_string(),
        source,
      })?
    };
    tracing::debug!(query, "query compilée");

    Ok(CompiledQuery {
      database: self,
      query: compiled,
    })
  }
}

impl Drop for Database {
  fn drop(&mut self) {
    tracing::debug!(path = %self.path.display(), "fermeture de l'index");
  }
}

/// Query liée à un index ouvert ; elle ne peut pas lui survivre.
pub struct CompiledQuery<'db> {
  database: &'db Database,
  query: Box<dyn Query>,
}

impl CompiledQuery<'_> {
  pub fn count_messages(&self) -> Result<u64, SearchError> {
    let searcher = self.database.reader.searcher();
    let count = searcher.search(self.query.as_ref(), &Count)?;

    Ok(count as u64)
  }

  /// Nombre de fils de discussion contenant au moins un message qui
  /// correspond.
  pub fn count_threads(&self) -> Result<u64, SearchError> {
    let searcher = self.database.reader.searcher();
    let count = searcher.search(
      self.query.as_ref(),
      &ThreadCount::new(self.database.fields.thread),
    )?;

    Ok(count)
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::{create_index_config, fixtures};
  use std::fs;
  use tantivy::{
    doc,
    schema::{Schema, TEXT},
  };
  use tempfile::tempdir;

  fn counts(database: &Database, query: &str) -> (u64, u64) {
    let compiled = database.compile(query).unwrap();
    (
      compiled.count_messages().unwrap(),
      compiled.count_threads().unwrap(),
    )
  }

  #[test]
  fn test_counts_on_fixture() {
    let tmp = tempdir().unwrap();
    let path = fixtures::index_dir(&tmp);
    fixtures::build_index(&path);
    let database = Database::open(&path).unwrap();

    assert_eq!(counts(&database, ""), (5, 3));
    assert_eq!(counts(&database, "*"), (5, 3));
    assert_eq!(counts(&database, "sushi"), (3, 2));
    assert_eq!(counts(&database, "numbers"), (2, 1));
    assert_eq!(counts(&database, "tag:work"), (2, 1));
    assert_eq!(counts(&database, "tag:unread"), (1, 1));
    assert_eq!(counts(&database, "thread:3"), (1, 1));
    assert_eq!(counts(&database, "sushi AND tag:inbox"), (3, 2));
  }

  #[test]
  fn test_threads_never_exceed_messages() {
    let tmp = tempdir().unwrap();
    let path = fixtures::index_dir(&tmp);
    fixtures::build_index(&path);
    let database = Database::open(&path).unwrap();

    for query in ["", "sushi", "report", "tag:inbox", "vinegar", "friday"] {
      let (messages, threads) = counts(&database, query);
      assert!(threads <= messages, "{query}: {threads} > {messages}");
    }
  }

  #[test]
  fn test_no_match_counts_zero() {
    let tmp = tempdir().unwrap();
    let path = fixtures::index_dir(&tmp);
    fixtures::build_index(&path);
    let database = Database::open(&path).unwrap();

    assert_eq!(counts(&database, "unicorn"), (0, 0));
  }

  #[test]
  fn test_counts_are_stable_across_openings() {
    let tmp = tempdir().unwrap();
    let path = fixtures::index_dir(&tmp);
    fixtures::build_index(&path);

    let first = counts(&Database::open(&path).unwrap(), "sushi");
    let second = counts(&Database::open(&path).unwrap(), "sushi");
    assert_eq!(first, second);
  }

  #[test]
  fn test_threads_deduplicated_across_segments() {
    let tmp = tempdir().unwrap();
    let path = fixtures::index_dir(&tmp);
    fixtures::build_index(&path);
    // second commit : nouveau segment, même fil que c1
    let late = r#"{"id":"c2@example.com","thread":3,"subject":"Re: Sushi recipes","body":"more rice","date":"2024-03-05T08:00:00Z"}"#;
    crate::ingest(&path, late.as_bytes()).unwrap();

    let database = Database::open(&path).unwrap();
    assert_eq!(counts(&database, ""), (6, 3));
    assert_eq!(counts(&database, "rice"), (2, 1));
  }

  #[test]
  fn test_open_missing_directory() {
    let tmp = tempdir().unwrap();
    let result = Database::open(tmp.path().join("nowhere"));
    assert!(matches!(result, Err(SearchError::Open { .. })));
  }

  #[test]
  fn test_open_directory_without_index() {
    let tmp = tempdir().unwrap();
    let result = Database::open(tmp.path());
    assert!(matches!(result, Err(SearchError::Open { .. })));
  }

  #[test]
  fn test_open_incompatible_schema() {
    let tmp = tempdir().unwrap();
    let mut schema_builder = Schema::builder();
    let title = schema_builder.add_text_field("title", TEXT);
    let index = Index::create_in_dir(tmp.path(), schema_builder.build()).unwrap();
    let mut index_writer = index.writer_with_num_threads(1, 15_000_000).unwrap();
    index_writer.add_document(doc!(title => "hello")).unwrap();
    index_writer.commit().unwrap();

    let result = Database::open(tmp.path());
    assert!(matches!(
      result,
      Err(SearchError::IncompatibleSchema { field: "id", .. })
    ));
  }

  #[test]
  fn test_compile_rejects_malformed_query() {
    let tmp = tempdir().unwrap();
    let path = fixtures::index_dir(&tmp);
    create_index_config(&path).unwrap();
    let database = Database::open(&path).unwrap();

    assert!(matches!(
      database.compile("nosuchfield:foo"),
      Err(SearchError::Query { .. })
    ));
    assert!(matches!(
      database.compile("thread:abc"),
      Err(SearchError::Query { .. })
    ));
  }

  #[test]
  fn test_exclusion_only_query() {
    let tmp = tempdir().unwrap();
    let path = fixtures::index_dir(&tmp);
    fixtures::build_index(&path);
    let database = Database::open(&path).unwrap();

    assert_eq!(counts(&database, "-tag:work"), (3, 2));
    assert_eq!(counts(&database, "-sushi"), (2, 1));
    assert_eq!(counts(&database, "-tag:work -tag:unread"), (2, 2));
    assert_eq!(counts(&database, "sushi -tag:unread"), (2, 2));
  }

  fn listing(path: &Path) -> Vec<(PathBuf, u64)> {
    let mut entries: Vec<_> = fs::read_dir(path)
      .unwrap()
      .map(|entry| {
        let entry = entry.unwrap();
        (entry.path(), entry.metadata().unwrap().len())
      })
      .collect();
    entries.sort();
    entries
  }

  #[test]
  fn test_open_leaves_directory_untouched() {
    let tmp = tempdir().unwrap();
    let path = fixtures::index_dir(&tmp);
    fixtures::build_index(&path);
    for (file, _) in listing(&path) {
      if file.extension().map_or(false, |ext| ext == "lock") {
        fs::remove_file(file).unwrap();
      }
    }
    let before = listing(&path);

    {
      let database = Database::open(&path).unwrap();
      assert_eq!(counts(&database, "sushi"), (3, 2));
    }

    assert_eq!(listing(&path), before);
  }

  #[cfg(unix)]
  #[test]
  fn test_open_without_write_permission() {
    use std::os::unix::fs::PermissionsExt;

    let tmp = tempdir().unwrap();
    let path = fixtures::index_dir(&tmp);
    fixtures::build_index(&path);
    fs::set_permissions(&path, fs::Permissions::from_mode(0o555)).unwrap();

    let result = Database::open(&path).map(|database| counts(&database, ""));

    fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
    assert_eq!(result.unwrap(), (5, 3));
  }

  #[test]
  fn test_open_takes_no_writer_lock() {
    let tmp = tempdir().unwrap();
    let path = fixtures::index_dir(&tmp);
    create_index_config(&path).unwrap();
    let _database = Database::open(&path).unwrap();

    let index = Index::open_in_dir(&path).unwrap();
    assert!(index.writer_with_num_threads(1, 15_000_000).is_ok());
  }
}
