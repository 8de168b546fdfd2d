use serde::{Deserialize, Serialize};

// I'm starting with ultra simple datatypes,
// which is something SQLite fits naturally into.
// Timestamps travel as the TEXT the store holds.

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArticleStatus {
  Draft,
  Published,
}

impl ArticleStatus {
  pub fn as_str(&self) -> &'static str {
    match self {
      ArticleStatus::Draft => "draft",
      ArticleStatus::Published => "published",
    }
  }

  // Rows only ever get written through this repository so an
  // unknown status in the store shouldn't happen. Falling back
  // to draft keeps such a row out of public listings.
  pub fn from_db(value: &str) -> ArticleStatus {
    match value {
      "published" => ArticleStatus::Published,
      _ => ArticleStatus::Draft,
    }
  }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Article {
  pub id: i64,
  pub slug: String,
  pub title: String,
  pub subtitle: Option<String>,
  pub excerpt: Option<String>,
  pub content: String,
  pub featured: bool,
  pub status: ArticleStatus,
  pub reading_time: i32,
  pub view_count: i64,
  pub ai_sources: Option<Vec<String>>,
  pub meta_description: Option<String>,
  pub meta_keywords: Option<String>,
  pub created_at: String,
  pub updated_at: String,
  pub published_at: Option<String>,
  pub tags: Vec<Tag>,
  pub categories: Vec<Category>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Tag {
  pub id: i64,
  pub name: String,
  pub slug: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Category {
  pub id: i64,
  pub name: String,
  pub slug: String,
}

// Input for article creation. Only title and content are
// really required, everything else has a usable default.
#[derive(Debug, Clone)]
pub struct NewArticle {
  pub title: String,
  pub content: String,
  pub subtitle: Option<String>,
  pub excerpt: Option<String>,
  pub tags: Vec<String>,
  pub categories: Vec<String>,
  pub featured: bool,
  pub ai_sources: Option<Vec<String>>,
  pub meta_description: Option<String>,
  pub meta_keywords: Option<String>,
  pub status: ArticleStatus,
}

impl Default for NewArticle {
  fn default() -> Self {
    NewArticle {
      title: String::new(),
      content: String::new(),
      subtitle: None,
      excerpt: None,
      tags: Vec::new(),
      categories: Vec::new(),
      featured: false,
      ai_sources: None,
      meta_description: None,
      meta_keywords: None,
      status: ArticleStatus::Draft,
    }
  }
}

// Object I use to fit my "update only what the caller sent"
// agenda. The fields double as the update allow-list: anything
// not in here simply cannot be modified through the API.
// Note that reading_time and view_count are absent on purpose.
#[derive(Debug, Default)]
pub struct ArticleUpdate {
  pub title: Option<String>,
  pub subtitle: Option<String>,
  pub excerpt: Option<String>,
  pub content: Option<String>,
  pub status: Option<ArticleStatus>,
  pub featured: Option<bool>,
  pub meta_description: Option<String>,
  pub meta_keywords: Option<String>,
  // Wholesale replacement of the tag list when present:
  pub tags: Option<Vec<String>>,
}

// Filters for the main listing query. All of these combine
// with AND.
#[derive(Debug)]
pub struct ArticleFilters {
  pub status: ArticleStatus,
  pub featured_only: bool,
  pub category: Option<String>,
  pub tag: Option<String>,
  pub limit: i64,
  pub offset: i64,
}

impl Default for ArticleFilters {
  fn default() -> Self {
    ArticleFilters {
      status: ArticleStatus::Published,
      featured_only: false,
      category: None,
      tag: None,
      limit: 10,
      offset: 0,
    }
  }
}

#[derive(Debug, Serialize)]
pub struct Stats {
  pub total_articles: i64,
  pub published_articles: i64,
  pub draft_articles: i64,
  pub total_views: i64,
  pub total_tags: i64,
  pub total_categories: i64,
}
