use lazy_static::lazy_static;
use regex::Regex;

// Average reading speed in words per minute. Most sources
// quote somewhere between 200 and 250.
const READING_SPEED_WPM: f64 = 225.0;

/**
 * Generate a URL-friendly slug from a title or tag name.
 * Has to stay deterministic, article and tag identity
 * depends on it.
 */
pub fn slugify(text: &str) -> String {
  // Since there's no way to define a const that uses
  // the heap, we need that weird lazy_static crate.
  lazy_static! {
    // Anything that isn't a word character, whitespace or
    // a hyphen gets dropped:
    static ref NON_SLUG_CHARS: Regex = Regex::new(
      r"[^\w\s-]"
    ).unwrap();
    // Runs of whitespace and hyphens collapse into a single
    // hyphen:
    static ref SEPARATOR_RUNS: Regex = Regex::new(
      r"[-\s]+"
    ).unwrap();
  }

  let lowered = text.to_lowercase();
  let cleaned = NON_SLUG_CHARS.replace_all(&lowered, "");
  let hyphenated = SEPARATOR_RUNS.replace_all(&cleaned, "-");
  hyphenated.trim_matches('-').to_string()
}

// Estimated reading time in minutes, never less than 1.
pub fn estimate_reading_time(content: &str) -> i32 {
  let words = content.split_whitespace().count();
  let minutes = (words as f64 / READING_SPEED_WPM).round() as i32;
  minutes.max(1)
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn slugify_hello_world() {
    assert_eq!(slugify("Hello, World!"), "hello-world");
  }

  #[test]
  fn slugify_is_idempotent() {
    let once = slugify("AI's Next Frontier Isn't Intelligence, It's Context");
    assert_eq!(slugify(&once), once);
  }

  #[test]
  fn slugify_collapses_separator_runs() {
    assert_eq!(slugify("  AI   Safety -- Basics "), "ai-safety-basics");
  }

  #[test]
  fn slugify_strips_punctuation_only_input() {
    assert_eq!(slugify("?!..."), "");
  }

  #[test]
  fn reading_time_has_a_floor_of_one_minute() {
    assert_eq!(estimate_reading_time("word"), 1);
  }

  #[test]
  fn reading_time_for_225_words_is_one_minute() {
    let content = "word ".repeat(225);
    assert_eq!(estimate_reading_time(&content), 1);
  }

  #[test]
  fn reading_time_for_450_words_is_two_minutes() {
    let content = "word ".repeat(450);
    assert_eq!(estimate_reading_time(&content), 2);
  }
}
