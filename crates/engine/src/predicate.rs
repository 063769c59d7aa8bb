//! Predicate Translator
//!
//! Every declared field gets a fixed family of named predicates chosen by its
//! data type. Applying a predicate to its arguments yields a [`Condition`]
//! over the table-qualified physical attribute.
//!
//! | Type | Names | Condition |
//! |------|-------|-----------|
//! | string | `with_<f>` | map containment |
//! | integer, float, decimal | `<f>_lt` `<f>_lte` `<f>_eq` `<f>_gte` `<f>_gt` | numeric compare after store-side cast |
//! | datetime | `<f>_before` `<f>_eq` `<f>_after` | epoch-second compare |
//! | date | `<f>_before` `<f>_eq` `<f>_after` | ISO text compare |
//! | boolean | `is_<f>` `not_<f>` | map containment with `"true"` / `"false"` |
//! | array | `<f>_eq` `<f>_contains` | JSON text equality / JSON superset |
//! | hash | none | |

use overlay_core::{
    registry, ColumnRef, CompareOp, Condition, DataType, Error, FilterTest, Result, SqlParam,
    StoreCast, Value,
};

use crate::descriptor::FieldDescriptor;

/// The shape of a named predicate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PredicateKind {
    /// `with_<f>(v)`
    With,
    /// `<f>_lt(v)`
    Lt,
    /// `<f>_lte(v)`
    Lte,
    /// `<f>_eq(v)`
    Eq,
    /// `<f>_gte(v)`
    Gte,
    /// `<f>_gt(v)`
    Gt,
    /// `<f>_before(v)`
    Before,
    /// `<f>_after(v)`
    After,
    /// `is_<f>()`
    Is,
    /// `not_<f>()`
    Not,
    /// `<f>_contains(v)`
    Contains,
}

impl PredicateKind {
    /// Predicate name for a field
    pub fn name_for(&self, field: &str) -> String {
        match self {
            PredicateKind::With => format!("with_{}", field),
            PredicateKind::Lt => format!("{}_lt", field),
            PredicateKind::Lte => format!("{}_lte", field),
            PredicateKind::Eq => format!("{}_eq", field),
            PredicateKind::Gte => format!("{}_gte", field),
            PredicateKind::Gt => format!("{}_gt", field),
            PredicateKind::Before => format!("{}_before", field),
            PredicateKind::After => format!("{}_after", field),
            PredicateKind::Is => format!("is_{}", field),
            PredicateKind::Not => format!("not_{}", field),
            PredicateKind::Contains => format!("{}_contains", field),
        }
    }

    /// Number of arguments the predicate takes
    pub const fn arity(&self) -> usize {
        match self {
            PredicateKind::Is | PredicateKind::Not => 0,
            _ => 1,
        }
    }

    fn compare_op(&self) -> Option<CompareOp> {
        match self {
            PredicateKind::Lt | PredicateKind::Before => Some(CompareOp::Lt),
            PredicateKind::Lte => Some(CompareOp::Lte),
            PredicateKind::Eq => Some(CompareOp::Eq),
            PredicateKind::Gte => Some(CompareOp::Gte),
            PredicateKind::Gt | PredicateKind::After => Some(CompareOp::Gt),
            _ => None,
        }
    }
}

/// The predicate kinds a data type supports
pub fn kinds_for(data_type: DataType) -> &'static [PredicateKind] {
    match data_type {
        DataType::String => &[PredicateKind::With],
        DataType::Integer | DataType::Float | DataType::Decimal => &[
            PredicateKind::Lt,
            PredicateKind::Lte,
            PredicateKind::Eq,
            PredicateKind::Gte,
            PredicateKind::Gt,
        ],
        DataType::Date | DataType::DateTime => &[
            PredicateKind::Before,
            PredicateKind::Eq,
            PredicateKind::After,
        ],
        DataType::Boolean => &[PredicateKind::Is, PredicateKind::Not],
        DataType::Array => &[PredicateKind::Eq, PredicateKind::Contains],
        DataType::Hash => &[],
    }
}

/// A reusable named filter bound to one field
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamedPredicate {
    /// Registered name, e.g. `price_lt`
    pub name: String,
    /// Logical field name
    pub field: String,
    /// Predicate shape
    pub kind: PredicateKind,
    /// Field type
    pub data_type: DataType,
    /// Key inside the physical attribute
    pub store_key: String,
    /// Qualified physical attribute
    pub column: ColumnRef,
}

impl NamedPredicate {
    /// Number of arguments
    pub fn arity(&self) -> usize {
        self.kind.arity()
    }

    /// Build the condition for `args`
    ///
    /// # Errors
    ///
    /// - `ScopeArity` if the argument count is wrong
    /// - `CastFailure` if the operand is nil or cannot be cast
    pub fn apply(&self, args: &[Value]) -> Result<Condition> {
        if args.len() != self.arity() {
            return Err(Error::ScopeArity {
                scope: self.name.clone(),
                expected: self.arity(),
                got: args.len(),
            });
        }
        let test = match self.kind {
            PredicateKind::Is => FilterTest::Contains {
                value: "true".to_string(),
            },
            PredicateKind::Not => FilterTest::Contains {
                value: "false".to_string(),
            },
            PredicateKind::With => FilterTest::Contains {
                value: self.operand_text(&args[0])?,
            },
            PredicateKind::Contains => FilterTest::JsonContains {
                json: self.operand_text(&args[0])?,
            },
            PredicateKind::Eq if self.data_type == DataType::Array => FilterTest::Equals {
                value: self.operand_text(&args[0])?,
            },
            kind => {
                let op = kind.compare_op().ok_or_else(|| Error::UnknownScope {
                    scope: self.name.clone(),
                })?;
                let (cast, operand) = self.compare_operand(&args[0])?;
                FilterTest::Compare { cast, op, operand }
            }
        };
        Ok(Condition {
            column: self.column.clone(),
            store_key: self.store_key.clone(),
            test,
        })
    }

    /// The operand as it would be stored
    fn operand_text(&self, arg: &Value) -> Result<String> {
        registry::serialize(self.data_type, arg)?
            .ok_or_else(|| Error::cast_failure(self.data_type, arg, "predicate operand is nil"))
    }

    fn compare_operand(&self, arg: &Value) -> Result<(StoreCast, SqlParam)> {
        match self.data_type {
            DataType::Integer => match fractional_operand(arg) {
                Some(d) => Ok((StoreCast::Decimal, SqlParam::Text(d.to_string()))),
                None => Ok((StoreCast::Integer, SqlParam::Text(self.operand_text(arg)?))),
            },
            DataType::Float => Ok((StoreCast::Float, SqlParam::Text(self.operand_text(arg)?))),
            DataType::Decimal => Ok((StoreCast::Decimal, SqlParam::Text(self.operand_text(arg)?))),
            DataType::Date => Ok((StoreCast::Text, SqlParam::Text(self.operand_text(arg)?))),
            DataType::DateTime => {
                let instant = registry::cast(DataType::DateTime, arg)?
                    .as_datetime()
                    .ok_or_else(|| {
                        Error::cast_failure(DataType::DateTime, arg, "predicate operand is nil")
                    })?;
                Ok((StoreCast::Epoch, SqlParam::Int(instant.timestamp())))
            }
            other => Err(Error::UnknownScope {
                scope: format!("{} ({} field)", self.name, other),
            }),
        }
    }
}

/// A non-integral operand against an integer field
///
/// Truncating it would move the comparison boundary, so such operands are
/// compared as decimals instead.
fn fractional_operand(arg: &Value) -> Option<rust_decimal::Decimal> {
    match arg {
        Value::Float(_) | Value::String(_) | Value::Decimal(_) => {
            registry::cast(DataType::Decimal, arg)
                .ok()
                .and_then(|v| v.as_decimal())
                .filter(|d| !d.fract().is_zero())
        }
        _ => None,
    }
}

/// The predicate family for one field
pub fn predicates_for(column: &ColumnRef, descriptor: &FieldDescriptor) -> Vec<NamedPredicate> {
    kinds_for(descriptor.data_type)
        .iter()
        .map(|kind| NamedPredicate {
            name: kind.name_for(&descriptor.name),
            field: descriptor.name.clone(),
            kind: *kind,
            data_type: descriptor.data_type,
            store_key: descriptor.store_key.clone(),
            column: column.clone(),
        })
        .collect()
}
