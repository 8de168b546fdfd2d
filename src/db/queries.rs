// Query building for the statements we have to assemble at
// runtime: the filtered article listing and the partial
// updates. Everything user-provided still goes through "?"
// placeholders, only field names and numeric limits end up
// in the string itself.

pub enum Order {
  Asc,
  Desc,
}

pub struct OrderBy {
  pub order: Order,
  pub field: String,
}

impl OrderBy {
  pub fn new(order: Order, field: String) -> Self {
    OrderBy { order, field }
  }
}

// Decided to put "q_" in front of all args just
// because "where" is a reserved Rust keyword.
pub fn select_query_builder(
  q_fields: &Vec<String>,
  q_from: &Vec<String>,
  q_where: Option<&Vec<String>>,
  q_order: Option<OrderBy>,
  limit: Option<i64>,
  offset: Option<i64>,
) -> String {
  let mut query = format!(
    "SELECT {} FROM {} ",
    &q_fields.join(","),
    &q_from.join(",")
  );
  if let Some(wh) = q_where {
    // All our filters are conjunctive:
    query.push_str(
      &format!(
        "WHERE {} ",
        &wh.join(" AND ")
      )
    );
  }
  if let Some(order) = q_order {
    query.push_str(&format!("ORDER BY {} ", order.field));
    query.push_str(
      match order.order {
        Order::Asc => "ASC ",
        Order::Desc => "DESC "
      }
    );
  }
  if let Some(lim) = limit {
    query.push_str(
      &format!(
        "LIMIT {} ",
        lim
      )
    );
    if let Some(off) = offset {
      query.push_str(
        &format!(
          "OFFSET {} ",
          off
        )
      );
    }
  }
  query
}

// The SET clauses are expected to already be "field = ?"
// strings, see helpers::generate_field_equal_qmark.
pub fn update_query_builder(
  table: &str,
  set_clauses: &Vec<String>,
  q_where: &str,
) -> String {
  format!(
    "UPDATE {} SET {} WHERE {} ",
    table,
    &set_clauses.join(","),
    q_where
  )
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn generate_simple_select() {
    let query = select_query_builder(
      &vec!["articles.slug".to_string(), "articles.title".to_string()],
      &vec!["articles".to_string()],
      None,
      None,
      None,
      None
    );
    // There's supposed to be an extra space at the end and no space between commas:
    let expected = String::from("SELECT articles.slug,articles.title FROM articles ");
    assert_eq!(query, expected);
  }

  #[test]
  fn generate_full_select() {
    let query = select_query_builder(
      &vec!["a.slug".to_string()],
      &vec!["articles a".to_string()],
      Some(&vec!["a.status = ?".to_string(), "a.featured = 1".to_string()]),
      Some(OrderBy::new(Order::Desc, "a.published_at".to_string())),
      Some(10),
      Some(20)
    );
    let expected = String::from(
      "SELECT a.slug FROM articles a WHERE a.status = ? AND a.featured = 1 \
      ORDER BY a.published_at DESC LIMIT 10 OFFSET 20 ");
    assert_eq!(query, expected);
  }

  #[test]
  fn generate_update_query() {
    let query = update_query_builder(
      "articles",
      &vec!["title = ?".to_string(), "updated_at = ?".to_string()],
      "id = ?"
    );
    let expected = String::from(
      "UPDATE articles SET title = ?,updated_at = ? WHERE id = ? ");
    assert_eq!(query, expected);
  }
}
