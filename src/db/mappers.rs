use super::entities::*;
use rusqlite::types::Type;
use rusqlite::{Error, Row};

// Column order contract for every article SELECT. Has to stay
// in sync with map_article below.
pub const ARTICLE_COLUMNS: &'static str =
  "a.id, a.slug, a.title, a.subtitle, a.excerpt, a.content, \
  a.featured, a.status, a.reading_time, a.view_count, a.ai_sources, \
  a.meta_description, a.meta_keywords, a.created_at, a.updated_at, \
  a.published_at";

pub fn map_article(row: &Row) -> Result<Article, Error> {
  let status: String = row.get(7)?;
  // ai_sources is a JSON array in a TEXT column, NULL when the
  // article never declared any:
  let ai_sources_raw: Option<String> = row.get(10)?;
  let ai_sources = match ai_sources_raw {
    Some(json) => Some(
      serde_json::from_str(&json)
        .map_err(|e| Error::FromSqlConversionFailure(10, Type::Text, Box::new(e)))?,
    ),
    None => None,
  };

  Ok(Article {
    id: row.get(0)?,
    slug: row.get(1)?,
    title: row.get(2)?,
    subtitle: row.get(3)?,
    excerpt: row.get(4)?,
    content: row.get(5)?,
    featured: row.get(6)?,
    status: ArticleStatus::from_db(&status),
    reading_time: row.get(8)?,
    view_count: row.get(9)?,
    ai_sources,
    meta_description: row.get(11)?,
    meta_keywords: row.get(12)?,
    created_at: row.get(13)?,
    updated_at: row.get(14)?,
    published_at: row.get(15)?,
    // Association lists get attached by the caller when the
    // operation wants them:
    tags: Vec::new(),
    categories: Vec::new(),
  })
}

pub fn map_tag(row: &Row) -> Result<Tag, Error> {
  Ok(Tag {
    id: row.get(0)?,
    name: row.get(1)?,
    slug: row.get(2)?,
  })
}

pub fn map_category(row: &Row) -> Result<Category, Error> {
  Ok(Category {
    id: row.get(0)?,
    name: row.get(1)?,
    slug: row.get(2)?,
  })
}
