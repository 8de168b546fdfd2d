use chrono::Local;

// Timestamps are stored as TEXT in SQLite. The fractional
// seconds keep "ORDER BY published_at DESC" stable when several
// articles get created within the same second.
// chrono formatting reference:
// https://docs.rs/chrono/0.4.19/chrono/format/strftime/index.html
const DATE_FORMAT_SQLITE: &'static str = "%Y-%m-%d %H:%M:%S%.6f";

pub fn current_datetime_string() -> String {
  Local::now().format(DATE_FORMAT_SQLITE).to_string()
}

#[cfg(test)]
mod tests {
  use super::*;
  use chrono::NaiveDateTime;

  #[test]
  fn current_datetime_string_parses_back() {
    let now = current_datetime_string();
    let parsed = NaiveDateTime::parse_from_str(&now, DATE_FORMAT_SQLITE);
    assert!(parsed.is_ok());
  }
}
