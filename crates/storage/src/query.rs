//! SqlQuery: a `where(fragment, params)` accumulator
//!
//! Collects filter fragments for one table and renders them as a single
//! `SELECT` statement. Useful for checking exactly what a host with a real
//! SQL backend would receive.

use overlay_core::{QueryBuilder, SqlParam};

/// A SELECT over one table with AND-joined WHERE clauses
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SqlQuery {
    table: String,
    clauses: Vec<String>,
    params: Vec<SqlParam>,
}

impl SqlQuery {
    /// Start a query over `table`
    pub fn new(table: impl Into<String>) -> Self {
        SqlQuery {
            table: table.into(),
            ..Default::default()
        }
    }

    /// Accumulated clauses, in the order they were added
    pub fn clauses(&self) -> &[String] {
        &self.clauses
    }

    /// Accumulated parameters, in placeholder order
    pub fn params(&self) -> &[SqlParam] {
        &self.params
    }

    /// Render the full statement
    pub fn to_sql(&self) -> String {
        let mut sql = format!("SELECT * FROM \"{}\"", self.table.replace('"', "\"\""));
        if !self.clauses.is_empty() {
            let joined: Vec<String> = self.clauses.iter().map(|c| format!("({})", c)).collect();
            sql.push_str(" WHERE ");
            sql.push_str(&joined.join(" AND "));
        }
        sql
    }
}

impl QueryBuilder for SqlQuery {
    fn where_fragment(mut self, sql: &str, params: Vec<SqlParam>) -> Self {
        self.clauses.push(sql.to_string());
        self.params.extend(params);
        self
    }
}
