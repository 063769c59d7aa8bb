//! Predicate Tests
//!
//! Named predicates executed by the in-memory table and rendered through
//! the SQL query builder.

use crate::common::*;
use chrono::NaiveDate;
use serde_json::json;
use typed_overlay::{Error, QueryBuilder, SqlParam};

fn filter(schema: &HostSchema, table: &MemoryTable, scope: &str, args: &[Value]) -> Vec<RecordId> {
    let condition = schema.filter(scope, args).unwrap();
    table.filter(&condition).unwrap()
}

fn priced_table(schema: &HostSchema) -> MemoryTable {
    products_table(
        schema,
        &[
            vec![("price", Value::Int(10)), ("weight", Value::Float(1.5))],
            vec![("price", Value::Int(20)), ("weight", Value::Float(20.0))],
            vec![("price", Value::Int(30)), ("weight", Value::Float(38.5))],
        ],
    )
}

// ============================================================================
// Numeric comparisons
// ============================================================================

#[test]
fn integer_comparisons_order_numerically() {
    let schema = product_schema();
    let table = priced_table(&schema);

    assert_eq!(
        filter(&schema, &table, "price_lt", &[Value::Int(20)]),
        vec![RecordId(0)]
    );
    assert_eq!(
        filter(&schema, &table, "price_gte", &[Value::Int(20)]),
        vec![RecordId(1), RecordId(2)]
    );
    assert_eq!(
        filter(&schema, &table, "price_lte", &[Value::Int(20)]),
        vec![RecordId(0), RecordId(1)]
    );
    assert_eq!(
        filter(&schema, &table, "price_gt", &[Value::Int(20)]),
        vec![RecordId(2)]
    );
    assert_eq!(
        filter(&schema, &table, "price_eq", &[Value::from("20")]),
        vec![RecordId(1)]
    );
}

#[test]
fn numeric_order_is_not_lexicographic() {
    let schema = product_schema();
    let table = products_table(
        &schema,
        &[
            vec![("price", Value::Int(9))],
            vec![("price", Value::Int(100))],
        ],
    );
    assert_eq!(
        filter(&schema, &table, "price_gt", &[Value::Int(10)]),
        vec![RecordId(1)]
    );
}

#[test]
fn fractional_operands_are_not_truncated_on_integer_fields() {
    let schema = product_schema();
    let table = products_table(
        &schema,
        &[
            vec![("price", Value::Int(19))],
            vec![("price", Value::Int(20))],
        ],
    );
    assert_eq!(
        filter(&schema, &table, "price_gte", &[Value::Float(19.5)]),
        vec![RecordId(1)]
    );
    assert_eq!(
        filter(&schema, &table, "price_lt", &[Value::from("19.5")]),
        vec![RecordId(0)]
    );
    assert!(filter(&schema, &table, "price_eq", &[Value::Float(19.5)]).is_empty());

    let condition = schema.filter("price_gte", &[Value::Float(19.5)]).unwrap();
    assert_eq!(condition.to_sql().params, vec![SqlParam::Text("19.5".into())]);
}

#[test]
fn float_comparisons_use_the_store_key() {
    let schema = product_schema();
    let table = priced_table(&schema);

    assert_eq!(
        filter(&schema, &table, "weight_gte", &[Value::Int(20)]),
        vec![RecordId(1), RecordId(2)]
    );
    let condition = schema.filter("weight_gte", &[Value::Int(20)]).unwrap();
    assert_eq!(condition.store_key, "w");
}

#[test]
fn decimal_comparisons() {
    let schema = product_schema();
    let table = products_table(
        &schema,
        &[
            vec![("miles", Value::from("1.25"))],
            vec![("miles", Value::from("1.50"))],
            vec![("miles", Value::from("12.0"))],
        ],
    );
    assert_eq!(
        filter(&schema, &table, "miles_lt", &[Value::from("1.5")]),
        vec![RecordId(0)]
    );
    assert_eq!(
        filter(&schema, &table, "miles_eq", &[Value::from("1.5")]),
        vec![RecordId(1)]
    );
}

#[test]
fn records_without_the_key_never_match() {
    let schema = product_schema();
    let table = products_table(
        &schema,
        &[vec![("color", Value::from("red"))], vec![("price", Value::Int(1))]],
    );
    assert_eq!(
        filter(&schema, &table, "price_lt", &[Value::Int(100)]),
        vec![RecordId(1)]
    );
}

// ============================================================================
// Temporal comparisons
// ============================================================================

#[test]
fn date_comparisons() {
    let schema = product_schema();
    let table = products_table(
        &schema,
        &[
            vec![("released_at", Value::from("2014-02-12"))],
            vec![("released_at", Value::from("2014-03-01"))],
        ],
    );
    let cutoff = Value::Date(NaiveDate::from_ymd_opt(2014, 2, 20).unwrap());

    assert_eq!(
        filter(&schema, &table, "released_at_before", &[cutoff.clone()]),
        vec![RecordId(0)]
    );
    assert_eq!(
        filter(&schema, &table, "released_at_after", &[cutoff]),
        vec![RecordId(1)]
    );
}

#[test]
fn datetime_comparisons() {
    let schema = product_schema();
    let table = products_table(
        &schema,
        &[
            vec![("build_timestamp", Value::from("2014-04-14T15:00:00Z"))],
            vec![("build_timestamp", Value::from("2014-04-16T15:00:00Z"))],
        ],
    );

    assert_eq!(
        filter(
            &schema,
            &table,
            "build_timestamp_after",
            &[Value::from("2014-04-15T00:00:00Z")]
        ),
        vec![RecordId(1)]
    );
    assert_eq!(
        filter(
            &schema,
            &table,
            "build_timestamp_eq",
            &[Value::from("2014-04-14T17:00:00+02:00")]
        ),
        vec![RecordId(0)]
    );
}

// ============================================================================
// Containment
// ============================================================================

#[test]
fn array_containment() {
    let schema = product_schema();
    let table = products_table(
        &schema,
        &[
            vec![("tags", Value::from(vec!["tag1", "tag2", "tag3"]))],
            vec![("tags", Value::from(vec!["tag2", "tag3", "tag4"]))],
            vec![("tags", Value::from(vec!["tag3", "tag4", "tag5"]))],
        ],
    );

    assert_eq!(
        filter(
            &schema,
            &table,
            "tags_contains",
            &[Value::from(json!(["tag2", "tag3"]))]
        ),
        vec![RecordId(0), RecordId(1)]
    );
    assert_eq!(
        filter(
            &schema,
            &table,
            "tags_eq",
            &[Value::from(vec!["tag3", "tag4", "tag5"])]
        ),
        vec![RecordId(2)]
    );
}

#[test]
fn string_and_boolean_predicates() {
    let schema = product_schema();
    let table = products_table(
        &schema,
        &[
            vec![("color", Value::from("green")), ("published", Value::Bool(true))],
            vec![("color", Value::from("red")), ("published", Value::Bool(false))],
            vec![("color", Value::from("green"))],
        ],
    );

    assert_eq!(
        filter(&schema, &table, "with_color", &[Value::from("green")]),
        vec![RecordId(0), RecordId(2)]
    );
    assert_eq!(filter(&schema, &table, "is_published", &[]), vec![RecordId(0)]);
    assert_eq!(filter(&schema, &table, "not_published", &[]), vec![RecordId(1)]);
}

#[test]
fn scopes_combine() {
    let schema = product_schema();
    let table = priced_table(&schema);
    let conditions = vec![
        schema.filter("price_gt", &[Value::Int(10)]).unwrap(),
        schema.filter("weight_lt", &[Value::Int(30)]).unwrap(),
    ];
    assert_eq!(table.filter_all(&conditions).unwrap(), vec![RecordId(1)]);
}

#[test]
fn filters_see_persisted_state_only() {
    let schema = product_schema();
    let mut table = priced_table(&schema);
    let record = table.get_mut(RecordId(0)).unwrap();
    schema.set(record, "price", 99).unwrap();

    assert_eq!(
        filter(&schema, &table, "price_lt", &[Value::Int(20)]),
        vec![RecordId(0)]
    );
    table.get_mut(RecordId(0)).unwrap().save();
    assert!(filter(&schema, &table, "price_lt", &[Value::Int(20)]).is_empty());
}

// ============================================================================
// Rendering
// ============================================================================

#[test]
fn identical_attribute_names_on_two_tables_render_distinct_references() {
    let mut products = HostSchema::new("products");
    products.declare(options_declaration()).unwrap();
    let mut orders = HostSchema::new("orders");
    orders.declare(options_declaration()).unwrap();

    let a = products.filter("with_color", &[Value::from("red")]).unwrap();
    let b = orders.filter("with_color", &[Value::from("red")]).unwrap();

    assert!(a.to_sql().sql.starts_with(r#""products"."options""#));
    assert!(b.to_sql().sql.starts_with(r#""orders"."options""#));
}

#[test]
fn conditions_from_another_table_are_refused() {
    let mut orders = HostSchema::new("orders");
    orders.declare(options_declaration()).unwrap();
    let schema = product_schema();
    let table = priced_table(&schema);

    let condition = orders.filter("price_lt", &[Value::Int(20)]).unwrap();
    assert!(matches!(
        table.filter(&condition).unwrap_err(),
        Error::UnknownAttribute { .. }
    ));
}

#[test]
fn scopes_render_into_the_host_query() {
    let schema = product_schema();
    let query = schema
        .apply_scope(SqlQuery::new("products"), "with_color", &[Value::from("red")])
        .unwrap();
    let query = schema
        .apply_scope(query, "price_lt", &[Value::Int(20)])
        .unwrap();

    assert_eq!(
        query.to_sql(),
        r#"SELECT * FROM "products" WHERE ("products"."options" @> hstore(?, ?)) AND (("products"."options" -> 'price')::integer < ?)"#
    );
    assert_eq!(
        query.params(),
        &[
            SqlParam::Text("color".into()),
            SqlParam::Text("red".into()),
            SqlParam::Text("20".into()),
        ]
    );
}

#[test]
fn raw_fragments_mix_with_scopes() {
    let schema = product_schema();
    let query = SqlQuery::new("products").where_fragment("id > ?", vec![SqlParam::Int(3)]);
    let query = schema.apply_scope(query, "is_popular", &[]).unwrap();
    assert_eq!(query.clauses().len(), 2);
}

#[test]
fn hash_fields_have_no_predicates() {
    let schema = product_schema();
    assert!(schema.scopes().all(|p| p.field != "reviews"));
    assert!(matches!(
        schema.filter("reviews_eq", &[Value::from(json!({}))]).unwrap_err(),
        Error::UnknownScope { .. }
    ));
}

#[test]
fn wrong_argument_count_is_reported() {
    let schema = product_schema();
    assert!(matches!(
        schema.filter("price_lt", &[]).unwrap_err(),
        Error::ScopeArity {
            expected: 1,
            got: 0,
            ..
        }
    ));
}
