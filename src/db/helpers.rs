use eyre::WrapErr;
use color_eyre::Result;

pub fn generate_field_equal_qmark(name: &str) -> String {
  format!("{} = ?", name)
}

/**
 * AI source attributions are stored as a JSON array in a TEXT
 * column. Absent AND empty lists are stored as NULL, never as
 * "[]".
 */
pub fn ai_sources_to_json(sources: &Option<Vec<String>>) -> Result<Option<String>> {
  match sources {
    Some(list) if !list.is_empty() => serde_json::to_string(list)
      .map(Some)
      .context("Serializing ai_sources"),
    _ => Ok(None),
  }
}

// No escaping of "%" or "_" here: a search term containing
// wildcards just matches more rows, which is fine for a blog
// search box.
pub fn like_pattern(term: &str) -> String {
  format!("%{}%", term)
}
