//! Filter conditions over store keys
//!
//! A [`Condition`] is what a named predicate produces: a test applied to the
//! string stored under one key of one qualified physical attribute. It can
//! be rendered as a parameterized SQL fragment for an hstore-style backing
//! store, or evaluated directly by an in-memory host.
//!
//! ## Rendering
//!
//! | Test | SQL |
//! |------|-----|
//! | `Contains` | `"t"."a" @> hstore(?, ?)` |
//! | `Compare` (cast) | `("t"."a" -> 'k')::integer < ?` |
//! | `Compare` (text) | `"t"."a" -> 'k' < ?` |
//! | `Equals` | `"t"."a" -> 'k' = ?` |
//! | `JsonContains` | `("t"."a" -> 'k')::jsonb @> ?::jsonb` |
//!
//! Identifiers are always double-quoted and qualified with the table name,
//! so two overlay-bearing tables with identically named attributes never
//! collide in one query.

use crate::traits::QueryBuilder;
use std::cmp::Ordering;
use std::fmt;

/// A table-qualified physical attribute
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ColumnRef {
    /// Host table name
    pub table: String,
    /// Physical attribute (column) name
    pub attribute: String,
}

impl ColumnRef {
    /// Create a column reference
    pub fn new(table: impl Into<String>, attribute: impl Into<String>) -> Self {
        ColumnRef {
            table: table.into(),
            attribute: attribute.into(),
        }
    }

    /// `"table"."attribute"`
    pub fn qualified(&self) -> String {
        format!(
            "{}.{}",
            quote_ident(&self.table),
            quote_ident(&self.attribute)
        )
    }
}

impl fmt::Display for ColumnRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.qualified())
    }
}

/// Ordering comparison
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CompareOp {
    /// `<`
    Lt,
    /// `<=`
    Lte,
    /// `=`
    Eq,
    /// `>=`
    Gte,
    /// `>`
    Gt,
}

impl CompareOp {
    /// SQL operator
    pub const fn symbol(&self) -> &'static str {
        match self {
            CompareOp::Lt => "<",
            CompareOp::Lte => "<=",
            CompareOp::Eq => "=",
            CompareOp::Gte => ">=",
            CompareOp::Gt => ">",
        }
    }

    /// Whether `stored.cmp(operand)` satisfies this operator
    pub fn matches(&self, ordering: Ordering) -> bool {
        match self {
            CompareOp::Lt => ordering == Ordering::Less,
            CompareOp::Lte => ordering != Ordering::Greater,
            CompareOp::Eq => ordering == Ordering::Equal,
            CompareOp::Gte => ordering != Ordering::Less,
            CompareOp::Gt => ordering == Ordering::Greater,
        }
    }
}

/// Store-side cast applied to the extracted string before comparing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StoreCast {
    /// `::integer`
    Integer,
    /// `::float`
    Float,
    /// `::decimal`
    Decimal,
    /// `::bigint` over epoch seconds
    Epoch,
    /// No cast; lexical comparison
    Text,
}

impl StoreCast {
    /// SQL type name, `None` for [`StoreCast::Text`]
    pub const fn sql_type(&self) -> Option<&'static str> {
        match self {
            StoreCast::Integer => Some("integer"),
            StoreCast::Float => Some("float"),
            StoreCast::Decimal => Some("decimal"),
            StoreCast::Epoch => Some("bigint"),
            StoreCast::Text => None,
        }
    }
}

/// A bound query parameter
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SqlParam {
    /// Text parameter
    Text(String),
    /// Integer parameter
    Int(i64),
}

impl fmt::Display for SqlParam {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SqlParam::Text(s) => write!(f, "{}", s),
            SqlParam::Int(i) => write!(f, "{}", i),
        }
    }
}

/// The test a condition applies to the stored string
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum FilterTest {
    /// Native map containment of `{key: value}`
    Contains {
        /// Serialized value
        value: String,
    },
    /// Ordering comparison after a store-side cast
    Compare {
        /// Cast applied to the stored string
        cast: StoreCast,
        /// Comparison operator
        op: CompareOp,
        /// Right-hand side
        operand: SqlParam,
    },
    /// Equality of the extracted string
    Equals {
        /// Serialized value
        value: String,
    },
    /// JSON superset containment
    JsonContains {
        /// JSON text of the contained value
        json: String,
    },
}

/// A rendered filter fragment
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SqlFragment {
    /// SQL with `?` placeholders
    pub sql: String,
    /// Parameters in placeholder order
    pub params: Vec<SqlParam>,
}

/// A filter over one store key of one qualified physical attribute
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Condition {
    /// Qualified physical attribute
    pub column: ColumnRef,
    /// Store key inside the attribute
    pub store_key: String,
    /// Test applied to the stored string
    pub test: FilterTest,
}

impl Condition {
    /// Render as a parameterized SQL fragment
    pub fn to_sql(&self) -> SqlFragment {
        let column = self.column.qualified();
        let key = quote_literal(&self.store_key);
        match &self.test {
            FilterTest::Contains { value } => SqlFragment {
                sql: format!("{} @> hstore(?, ?)", column),
                params: vec![
                    SqlParam::Text(self.store_key.clone()),
                    SqlParam::Text(value.clone()),
                ],
            },
            FilterTest::Compare { cast, op, operand } => {
                let sql = match cast.sql_type() {
                    Some(ty) => format!("({} -> {})::{} {} ?", column, key, ty, op.symbol()),
                    None => format!("{} -> {} {} ?", column, key, op.symbol()),
                };
                SqlFragment {
                    sql,
                    params: vec![operand.clone()],
                }
            }
            FilterTest::Equals { value } => SqlFragment {
                sql: format!("{} -> {} = ?", column, key),
                params: vec![SqlParam::Text(value.clone())],
            },
            FilterTest::JsonContains { json } => SqlFragment {
                sql: format!("({} -> {})::jsonb @> ?::jsonb", column, key),
                params: vec![SqlParam::Text(json.clone())],
            },
        }
    }

    /// Hand this condition to a host query builder
    pub fn apply<Q: QueryBuilder>(&self, query: Q) -> Q {
        let SqlFragment { sql, params } = self.to_sql();
        query.where_fragment(&sql, params)
    }
}

fn quote_ident(ident: &str) -> String {
    format!("\"{}\"", ident.replace('"', "\"\""))
}

fn quote_literal(literal: &str) -> String {
    format!("'{}'", literal.replace('\'', "''"))
}
