use std::collections::TryReserveError;

/// Recolle les termes de recherche, séparés par une espace, sans les
/// transformer. Aucun terme donne la chaîne vide, que l'index interprète
/// comme « tous les messages ».
pub fn query_string_from_args<S: AsRef<str>>(terms: &[S]) -> Result<String, TryReserveError> {
  let len = terms.iter().map(|t| t.as_ref().len()).sum::<usize>() + terms.len().saturating_sub(1);
  let mut query_str = String::new();
  query_str.try_reserve_exact(len)?;

  for (i, term) in terms.iter().enumerate() {
    if i > 0 {
      query_str.push(' ');
    }
    query_str.push_str(term.as_ref());
  }

  Ok(query_str)
}
