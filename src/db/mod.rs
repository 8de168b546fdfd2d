use std::fs;
use std::path::Path;

use color_eyre::{Report, Result};
use derive_more::Display;
use eyre::WrapErr;
use log::{debug, warn};
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::{params, Connection, OptionalExtension, Row, ToSql, NO_PARAMS};

pub mod entities;
mod helpers;
mod mappers;
mod queries;

use crate::utils::text_utils::{estimate_reading_time, slugify};
use crate::utils::time_utils::current_datetime_string;
use entities::*;
use helpers::{ai_sources_to_json, generate_field_equal_qmark, like_pattern};
use mappers::{map_article, map_category, map_tag, ARTICLE_COLUMNS};
use queries::{select_query_builder, update_query_builder, Order, OrderBy};

// Type alias to make function signatures much clearer:
pub type Pool = r2d2::Pool<SqliteConnectionManager>;

// Validation problems are caught before we touch the store at
// all. Everything else that can go wrong during a write comes
// back as a rusqlite error wrapped in a report.
#[derive(Debug, Display)]
pub enum ValidationError {
  #[display(fmt = "Article title cannot be empty")]
  EmptyTitle,
  #[display(fmt = "Article content cannot be empty")]
  EmptyContent,
}
// Standard way to implement the Error trait is
// to not actually implement any function at all.
impl std::error::Error for ValidationError {}

/**
 * All article persistence goes through this. It owns the
 * connection pool and the path to the schema definition,
 * there's no module-level state anywhere.
 */
pub struct ArticleRepository {
  pool: Pool,
  schema_path: String,
}

impl ArticleRepository {

  pub fn open(db_path: &str, schema_path: &str) -> Result<Self> {
    // The directory holding the database file might not exist
    // on a first run:
    if let Some(parent) = Path::new(db_path).parent() {
      if !parent.as_os_str().is_empty() {
        fs::create_dir_all(parent)
          .context("Creating the database directory")?;
      }
    }
    let manager = SqliteConnectionManager::file(db_path);
    let pool = Pool::new(manager)
      .context("Database connection failed")?;
    Self::with_pool(pool, schema_path)
  }

  // Also what the tests use, with a pool capped at a single
  // in-memory connection.
  pub fn with_pool(pool: Pool, schema_path: &str) -> Result<Self> {
    let repository = ArticleRepository {
      pool,
      schema_path: schema_path.to_string(),
    };
    repository.ensure_schema()?;
    Ok(repository)
  }

  // Runs on every startup. The schema file only contains
  // "IF NOT EXISTS" statements and "INSERT OR IGNORE" seeds so
  // re-applying it is safe. When the file can't be read we
  // just end up with a connectable but possibly empty store,
  // that's not an error.
  fn ensure_schema(&self) -> Result<()> {
    match fs::read_to_string(&self.schema_path) {
      Ok(schema) => {
        let conn = self.pool.get()?;
        conn.execute_batch(&schema)
          .context("Applying database schema")
      },
      Err(_) => {
        warn!(
          "Schema file {} could not be read, skipping schema bootstrap",
          self.schema_path
        );
        Ok(())
      }
    }
  }

  /**
   * Insert a new article with its tag and category links and
   * return its id. One single transaction: any failure along
   * the way rolls back the article row and every tag row or
   * association created for it.
   */
  pub fn create_article(&self, article: &NewArticle) -> Result<i64> {
    if article.title.trim().is_empty() {
      return Err(Report::new(ValidationError::EmptyTitle));
    }
    if article.content.trim().is_empty() {
      return Err(Report::new(ValidationError::EmptyContent));
    }

    let mut conn = self.pool.get()?;
    let tx = conn.transaction()?;

    let slug = unique_article_slug(&tx, &slugify(&article.title))?;
    let reading_time = estimate_reading_time(&article.content);
    let ai_sources = ai_sources_to_json(&article.ai_sources)?;
    let now = current_datetime_string();
    // published_at only gets a value when the article starts
    // out published. It's never overwritten afterwards.
    let published_at = match article.status {
      ArticleStatus::Published => Some(now.clone()),
      ArticleStatus::Draft => None,
    };

    tx.execute(
      "INSERT INTO articles (
        slug, title, subtitle, excerpt, content,
        featured, ai_sources, reading_time,
        meta_description, meta_keywords, status,
        created_at, updated_at, published_at
      ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
      params![
        slug,
        article.title,
        article.subtitle,
        article.excerpt,
        article.content,
        article.featured,
        ai_sources,
        reading_time,
        article.meta_description,
        article.meta_keywords,
        article.status.as_str(),
        now,
        now,
        published_at
      ],
    )?;
    let article_id = tx.last_insert_rowid();

    link_tags(&tx, article_id, &article.tags)?;
    link_categories(&tx, article_id, &article.categories)?;

    tx.commit()?;
    debug!("Created article {} with slug {}", article_id, slug);
    Ok(article_id)
  }

  /**
   * The main listing query. Filters all combine with AND,
   * results come back newest published first with their tag
   * and category lists attached. Listing never touches the
   * view counters.
   */
  pub fn get_articles(&self, filters: &ArticleFilters) -> Result<Vec<Article>> {
    let conn = self.pool.get()?;

    let mut where_clauses = vec![generate_field_equal_qmark("a.status")];
    let status = filters.status.as_str();
    let mut params_list: Vec<&dyn ToSql> = vec![&status as &dyn ToSql];

    if filters.featured_only {
      where_clauses.push(String::from("a.featured = 1"));
    }
    if let Some(category) = &filters.category {
      where_clauses.push(generate_field_equal_qmark("c.slug"));
      params_list.push(category);
    }
    if let Some(tag) = &filters.tag {
      where_clauses.push(generate_field_equal_qmark("t.slug"));
      params_list.push(tag);
    }

    // The DISTINCT matters: an article with several matching
    // tags would otherwise show up once per joined row.
    let query = select_query_builder(
      &vec![format!("DISTINCT {}", ARTICLE_COLUMNS)],
      &vec![String::from(
        "articles a \
        LEFT JOIN article_categories ac ON a.id = ac.article_id \
        LEFT JOIN categories c ON ac.category_id = c.id \
        LEFT JOIN article_tags at ON a.id = at.article_id \
        LEFT JOIN tags t ON at.tag_id = t.id",
      )],
      Some(&where_clauses),
      Some(OrderBy::new(Order::Desc, String::from("a.published_at"))),
      Some(filters.limit),
      Some(filters.offset),
    );

    let mut articles = select_many(&conn, &query, params_list, map_article)?;
    for article in articles.iter_mut() {
      article.tags = tags_for_article(&conn, article.id)?;
      article.categories = categories_for_article(&conn, article.id)?;
    }
    Ok(articles)
  }

  pub fn featured_articles(&self, limit: i64) -> Result<Vec<Article>> {
    self.get_articles(&ArticleFilters {
      featured_only: true,
      limit,
      ..ArticleFilters::default()
    })
  }

  pub fn recent_articles(&self, limit: i64) -> Result<Vec<Article>> {
    self.get_articles(&ArticleFilters {
      limit,
      ..ArticleFilters::default()
    })
  }

  pub fn articles_by_category(&self, category_slug: &str, limit: i64) -> Result<Vec<Article>> {
    self.get_articles(&ArticleFilters {
      category: Some(category_slug.to_string()),
      limit,
      ..ArticleFilters::default()
    })
  }

  pub fn articles_by_tag(&self, tag_slug: &str, limit: i64) -> Result<Vec<Article>> {
    self.get_articles(&ArticleFilters {
      tag: Some(tag_slug.to_string()),
      limit,
      ..ArticleFilters::default()
    })
  }

  /**
   * Single article lookup by slug. Nominally a read but it
   * bumps the view counter in the same transaction, that's the
   * whole point of fetching by slug. The returned record still
   * carries the count from before the bump. Absent slug is a
   * normal outcome, not an error.
   */
  pub fn get_article_by_slug(&self, slug: &str) -> Result<Option<Article>> {
    let mut conn = self.pool.get()?;
    let tx = conn.transaction()?;

    let query = format!(
      "SELECT {} FROM articles a WHERE a.slug = ?",
      ARTICLE_COLUMNS
    );
    let found = tx
      .query_row(&query, params![slug], map_article)
      .optional()?;

    let mut article = match found {
      Some(article) => article,
      None => return Ok(None),
    };

    tx.execute(
      "UPDATE articles SET view_count = view_count + 1 WHERE id = ?",
      params![article.id],
    )?;

    article.tags = tags_for_article(&tx, article.id)?;
    article.categories = categories_for_article(&tx, article.id)?;

    tx.commit()?;
    Ok(Some(article))
  }

  /**
   * Partial update. Returns false without touching the store
   * when none of the allow-listed scalar fields is present
   * (a tag list on its own doesn't count, that's how the API
   * always behaved). Field changes and the optional tag list
   * replacement commit or roll back together.
   */
  pub fn update_article(&self, article_id: i64, update: &ArticleUpdate) -> Result<bool> {
    let mut set_clauses: Vec<String> = Vec::new();
    let mut values: Vec<&dyn ToSql> = Vec::new();

    if let Some(title) = &update.title {
      set_clauses.push(generate_field_equal_qmark("title"));
      values.push(title);
    }
    if let Some(subtitle) = &update.subtitle {
      set_clauses.push(generate_field_equal_qmark("subtitle"));
      values.push(subtitle);
    }
    if let Some(excerpt) = &update.excerpt {
      set_clauses.push(generate_field_equal_qmark("excerpt"));
      values.push(excerpt);
    }
    if let Some(content) = &update.content {
      // Careful: reading_time deliberately keeps its creation
      // time estimate, content edits don't refresh it.
      set_clauses.push(generate_field_equal_qmark("content"));
      values.push(content);
    }
    let status_str = update.status.map(|s| s.as_str());
    if let Some(status) = &status_str {
      set_clauses.push(generate_field_equal_qmark("status"));
      values.push(status);
    }
    if let Some(featured) = &update.featured {
      set_clauses.push(generate_field_equal_qmark("featured"));
      values.push(featured);
    }
    if let Some(meta_description) = &update.meta_description {
      set_clauses.push(generate_field_equal_qmark("meta_description"));
      values.push(meta_description);
    }
    if let Some(meta_keywords) = &update.meta_keywords {
      set_clauses.push(generate_field_equal_qmark("meta_keywords"));
      values.push(meta_keywords);
    }

    if set_clauses.is_empty() {
      return Ok(false);
    }

    let mut conn = self.pool.get()?;
    let tx = conn.transaction()?;

    let now = current_datetime_string();
    set_clauses.push(generate_field_equal_qmark("updated_at"));
    values.push(&now);

    // First transition into "published" stamps published_at,
    // every later publish leaves it alone:
    if update.status == Some(ArticleStatus::Published) {
      let published_at: Option<String> = tx
        .query_row(
          "SELECT published_at FROM articles WHERE id = ?",
          params![article_id],
          |row| row.get(0),
        )
        .optional()?
        .unwrap_or(None);
      if published_at.is_none() {
        set_clauses.push(generate_field_equal_qmark("published_at"));
        values.push(&now);
      }
    }

    values.push(&article_id);
    let query = update_query_builder("articles", &set_clauses, "id = ?");
    tx.execute(&query, values)?;

    // Tag replacement is wholesale: drop every association row
    // and relink from the supplied list.
    if let Some(tags) = &update.tags {
      tx.execute(
        "DELETE FROM article_tags WHERE article_id = ?",
        params![article_id],
      )?;
      link_tags(&tx, article_id, tags)?;
    }

    tx.commit()?;
    Ok(true)
  }

  /**
   * Case-insensitive substring search over title, excerpt and
   * content, published articles only. Lighter-weight results
   * than get_articles on purpose: no tag or category lists get
   * attached here.
   */
  pub fn search_articles(&self, query: &str, limit: i64) -> Result<Vec<Article>> {
    let conn = self.pool.get()?;
    let pattern = like_pattern(query);
    let sql = format!(
      "SELECT {} FROM articles a \
      WHERE a.status = 'published' \
      AND (a.title LIKE ? OR a.excerpt LIKE ? OR a.content LIKE ?) \
      ORDER BY a.published_at DESC \
      LIMIT ?",
      ARTICLE_COLUMNS
    );
    select_many(
      &conn,
      &sql,
      params![pattern, pattern, pattern, limit],
      map_article,
    )
  }

  // Pure aggregation, no side effects anywhere.
  pub fn get_stats(&self) -> Result<Stats> {
    let conn = self.pool.get()?;
    Ok(Stats {
      total_articles: count_scalar(&conn, "SELECT COUNT(*) FROM articles")?,
      published_articles: count_scalar(
        &conn,
        "SELECT COUNT(*) FROM articles WHERE status = 'published'",
      )?,
      draft_articles: count_scalar(
        &conn,
        "SELECT COUNT(*) FROM articles WHERE status = 'draft'",
      )?,
      // COALESCE so an empty table reports 0 instead of NULL:
      total_views: count_scalar(
        &conn,
        "SELECT COALESCE(SUM(view_count), 0) FROM articles",
      )?,
      total_tags: count_scalar(&conn, "SELECT COUNT(*) FROM tags")?,
      total_categories: count_scalar(&conn, "SELECT COUNT(*) FROM categories")?,
    })
  }

}

// Stole most of the signature from the rusqlite doc.
fn select_many<T, P, F>(
  conn: &Connection,
  query: &str,
  params: P,
  mapper: F
) -> Result<Vec<T>>
  where
    P: IntoIterator,
    P::Item: ToSql,
    F: FnMut(&Row<'_>) -> Result<T, rusqlite::Error>,
{
  let mut stmt = conn.prepare(query)?;
  stmt.query_map(params, mapper)
    .and_then(Iterator::collect)
    .context("Generic select_many query")
}

fn count_scalar(conn: &Connection, query: &str) -> Result<i64> {
  let mut stmt = conn.prepare(query)?;
  let count: i64 = stmt.query_row(NO_PARAMS, |row| row.get(0))?;
  Ok(count)
}

// Probes slug, slug-1, slug-2, ... until no article uses it.
fn unique_article_slug(conn: &Connection, base: &str) -> Result<String> {
  let mut slug = base.to_string();
  let mut counter = 1;
  loop {
    let existing: Option<i64> = conn
      .query_row(
        "SELECT id FROM articles WHERE slug = ?",
        params![slug],
        |row| row.get(0),
      )
      .optional()?;
    if existing.is_none() {
      return Ok(slug);
    }
    slug = format!("{}-{}", base, counter);
    counter += 1;
  }
}

// Tags are folksonomic: a tag gets created the first time an
// article references it. Two names normalizing to the same slug
// collapse into a single tag row, and the OR IGNORE on the
// association insert keeps a double link from corrupting
// anything.
fn link_tags(conn: &Connection, article_id: i64, tags: &[String]) -> Result<()> {
  for tag_name in tags {
    let tag_slug = slugify(tag_name);
    conn.execute(
      "INSERT OR IGNORE INTO tags (name, slug) VALUES (?, ?)",
      params![tag_name, tag_slug],
    )?;
    let tag_id: i64 = conn.query_row(
      "SELECT id FROM tags WHERE slug = ?",
      params![tag_slug],
      |row| row.get(0),
    )?;
    conn.execute(
      "INSERT OR IGNORE INTO article_tags (article_id, tag_id) VALUES (?, ?)",
      params![article_id, tag_id],
    )?;
  }
  Ok(())
}

// Categories are curated, which makes this the exact opposite
// of link_tags: only link the ones that already exist and
// silently skip the rest. The asymmetry is intentional, don't
// "fix" it.
fn link_categories(conn: &Connection, article_id: i64, categories: &[String]) -> Result<()> {
  for category_name in categories {
    let category: Option<i64> = conn
      .query_row(
        "SELECT id FROM categories WHERE name = ?",
        params![category_name],
        |row| row.get(0),
      )
      .optional()?;
    match category {
      Some(category_id) => {
        conn.execute(
          "INSERT OR IGNORE INTO article_categories (article_id, category_id) \
          VALUES (?, ?)",
          params![article_id, category_id],
        )?;
      },
      None => debug!("Skipping unknown category: {}", category_name),
    }
  }
  Ok(())
}

fn tags_for_article(conn: &Connection, article_id: i64) -> Result<Vec<Tag>> {
  select_many(
    conn,
    "SELECT t.id, t.name, t.slug FROM tags t \
    JOIN article_tags at ON t.id = at.tag_id \
    WHERE at.article_id = ?",
    params![article_id],
    map_tag,
  )
}

fn categories_for_article(conn: &Connection, article_id: i64) -> Result<Vec<Category>> {
  select_many(
    conn,
    "SELECT c.id, c.name, c.slug FROM categories c \
    JOIN article_categories ac ON c.id = ac.category_id \
    WHERE ac.article_id = ?",
    params![article_id],
    map_category,
  )
}
