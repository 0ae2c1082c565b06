// Structured predicate builder for book list queries

use serde::{Deserialize, Serialize};

/// Optional filters accepted by the list endpoint.
///
/// Each set field contributes one AND-ed condition; values always travel as
/// bound parameters, never spliced into the SQL text.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookQuery {
    /// Substring match on the title.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub q: Option<String>,
    /// Creation date (date portion only) at or after this date, `YYYY-MM-DD`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_from: Option<String>,
    /// Creation date (date portion only) at or before this date.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_to: Option<String>,
}

/// One typed condition on the books table.
#[derive(Debug, Clone, PartialEq)]
pub enum Condition {
    /// `title LIKE ?` with a wildcard-wrapped pattern.
    TitleContains(String),
    /// `date(createdAt) >= date(?)`, time of day truncated.
    CreatedOnOrAfter(String),
    /// `date(createdAt) <= date(?)`, time of day truncated.
    CreatedOnOrBefore(String),
}

impl Condition {
    pub(crate) fn to_sql(&self) -> &'static str {
        match self {
            Condition::TitleContains(_) => "title LIKE ?",
            Condition::CreatedOnOrAfter(_) => "date(createdAt) >= date(?)",
            Condition::CreatedOnOrBefore(_) => "date(createdAt) <= date(?)",
        }
    }

    /// The value bound for this condition's placeholder.
    pub(crate) fn bind_value(&self) -> String {
        match self {
            Condition::TitleContains(q) => format!("%{}%", q),
            Condition::CreatedOnOrAfter(d) | Condition::CreatedOnOrBefore(d) => d.clone(),
        }
    }
}

impl BookQuery {
    pub fn is_empty(&self) -> bool {
        self.q.is_none() && self.date_from.is_none() && self.date_to.is_none()
    }

    /// Compile the set fields into typed conditions, in a fixed order.
    pub fn conditions(&self) -> Vec<Condition> {
        let mut conditions = Vec::new();
        if let Some(q) = &self.q {
            conditions.push(Condition::TitleContains(q.clone()));
        }
        if let Some(from) = &self.date_from {
            conditions.push(Condition::CreatedOnOrAfter(from.clone()));
        }
        if let Some(to) = &self.date_to {
            conditions.push(Condition::CreatedOnOrBefore(to.clone()));
        }
        conditions
    }

    /// Render the WHERE clause (with leading space) and the bound values in
    /// placeholder order. No conditions yields an empty clause.
    pub fn to_sql(&self) -> (String, Vec<String>) {
        let conditions = self.conditions();
        if conditions.is_empty() {
            return (String::new(), Vec::new());
        }

        let clause = conditions
            .iter()
            .map(|c| c.to_sql())
            .collect::<Vec<_>>()
            .join(" AND ");
        let values = conditions.iter().map(|c| c.bind_value()).collect();

        (format!(" WHERE {}", clause), values)
    }
}
