//! Row filter builder for the REST endpoint.
//!
//! Produces query parameters in the `column=op.value` form the hosted
//! backend expects, e.g. `date=gte.2025-08-08&order=date.asc&limit=7`.

use std::fmt::Display;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RowQuery {
    params: Vec<(String, String)>,
}

impl RowQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn select(self, columns: &str) -> Self {
        self.push("select", columns.to_string())
    }

    pub fn eq(self, column: &str, value: impl Display) -> Self {
        self.push(column, format!("eq.{value}"))
    }

    pub fn gte(self, column: &str, value: impl Display) -> Self {
        self.push(column, format!("gte.{value}"))
    }

    pub fn order(self, column: &str, ascending: bool) -> Self {
        let direction = if ascending { "asc" } else { "desc" };
        self.push("order", format!("{column}.{direction}"))
    }

    pub fn limit(self, limit: usize) -> Self {
        self.push("limit", limit.to_string())
    }

    /// Upsert target columns.
    pub fn on_conflict(self, columns: &str) -> Self {
        self.push("on_conflict", columns.to_string())
    }

    pub fn params(&self) -> &[(String, String)] {
        &self.params
    }

    fn push(mut self, key: &str, value: String) -> Self {
        self.params.push((key.to_string(), value));
        self
    }
}
