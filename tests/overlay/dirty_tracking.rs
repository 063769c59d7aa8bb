//! Dirty Tracking Tests
//!
//! Field-level change facts over one shared physical attribute.

use crate::common::*;

fn priced(schema: &HostSchema) -> MemoryRecord {
    saved_product(
        schema,
        &[("color", Value::from("green")), ("price", Value::Int(5))],
    )
}

// ============================================================================
// Pending changes
// ============================================================================

#[test]
fn sibling_change_is_not_reported() {
    let schema = product_schema();
    let overlay = schema.overlay("options").unwrap();
    let mut record = priced(&schema);

    schema.set(&mut record, "price", 6).unwrap();

    assert_eq!(
        overlay.change(&record, "price").unwrap(),
        Some((Value::Int(5), Value::Int(6)))
    );
    assert_eq!(overlay.change(&record, "color").unwrap(), None);
    assert!(!overlay.changed(&record, "color").unwrap());
}

#[test]
fn was_reports_the_baseline() {
    let schema = product_schema();
    let overlay = schema.overlay("options").unwrap();
    let mut record = priced(&schema);

    schema.set(&mut record, "price", 7).unwrap();
    schema.set(&mut record, "price", 8).unwrap();

    assert_eq!(overlay.was(&record, "price").unwrap(), Value::Int(5));
    assert_eq!(schema.read(&record, "price").unwrap(), Value::Int(8));
}

#[test]
fn changing_back_clears_the_field_change() {
    let schema = product_schema();
    let overlay = schema.overlay("options").unwrap();
    let mut record = priced(&schema);

    schema.set(&mut record, "price", 6).unwrap();
    schema.set(&mut record, "price", 5).unwrap();

    assert!(!overlay.changed(&record, "price").unwrap());
    assert_eq!(overlay.change(&record, "price").unwrap(), None);
}

#[test]
fn change_on_a_fresh_record() {
    let schema = product_schema();
    let overlay = schema.overlay("options").unwrap();
    let mut record = MemoryRecord::new();

    schema.set(&mut record, "color", "red").unwrap();

    assert_eq!(
        overlay.change(&record, "color").unwrap(),
        Some((Value::Null, Value::from("red")))
    );
    assert_eq!(overlay.change(&record, "price").unwrap(), None);
}

#[test]
fn reload_discards_pending_changes() {
    let schema = product_schema();
    let overlay = schema.overlay("options").unwrap();
    let mut record = priced(&schema);

    schema.set(&mut record, "price", 6).unwrap();
    record.reload();

    assert_eq!(schema.read(&record, "price").unwrap(), Value::Int(5));
    assert!(!overlay.changed(&record, "price").unwrap());
}

// ============================================================================
// Restore
// ============================================================================

#[test]
fn restore_reverts_only_that_field() {
    let schema = product_schema();
    let overlay = schema.overlay("options").unwrap();
    let mut record = priced(&schema);

    schema.set(&mut record, "price", 6).unwrap();
    schema.set(&mut record, "color", "blue").unwrap();
    overlay.restore(&mut record, "price").unwrap();

    assert_eq!(schema.read(&record, "price").unwrap(), Value::Int(5));
    assert_eq!(schema.read(&record, "color").unwrap(), Value::from("blue"));
    assert!(overlay.changed(&record, "color").unwrap());
    assert!(!overlay.changed(&record, "price").unwrap());
}

#[test]
fn restore_of_a_new_field_writes_nil() {
    let schema = product_schema();
    let overlay = schema.overlay("options").unwrap();
    let mut record = priced(&schema);

    schema.set(&mut record, "weight", 1.5).unwrap();
    overlay.restore(&mut record, "weight").unwrap();

    assert_eq!(schema.read(&record, "weight").unwrap(), Value::Null);
    assert_eq!(schema.read(&record, "price").unwrap(), Value::Int(5));
}

// ============================================================================
// Committed changes
// ============================================================================

#[test]
fn saved_change_after_one_commit() {
    let schema = product_schema();
    let overlay = schema.overlay("options").unwrap();
    let mut record = priced(&schema);

    schema.set(&mut record, "price", 6).unwrap();
    record.save();

    assert_eq!(
        overlay.saved_change(&record, "price").unwrap(),
        Some((Value::Int(5), Value::Int(6)))
    );
    assert!(overlay.saved_changed(&record, "price").unwrap());
    assert_eq!(overlay.saved_change(&record, "color").unwrap(), None);
}

#[test]
fn sibling_only_commit_reports_nothing() {
    let schema = product_schema();
    let overlay = schema.overlay("options").unwrap();
    let mut record = priced(&schema);

    schema.set(&mut record, "color", "blue").unwrap();
    record.save();

    assert!(!overlay.saved_changed(&record, "price").unwrap());
    assert!(overlay.saved_changed(&record, "color").unwrap());
}

#[test]
fn next_commit_replaces_saved_changes() {
    let schema = product_schema();
    let overlay = schema.overlay("options").unwrap();
    let mut record = priced(&schema);

    schema.set(&mut record, "price", 6).unwrap();
    record.save();
    schema.set(&mut record, "color", "blue").unwrap();
    record.save();

    assert_eq!(overlay.saved_change(&record, "price").unwrap(), None);
}

#[test]
fn two_distinct_changes_in_one_batch_are_ambiguous() {
    let schema = product_schema();
    let overlay = schema.overlay("options").unwrap();
    let mut record = priced(&schema);

    schema.set(&mut record, "price", 6).unwrap();
    record.save();
    schema.set(&mut record, "price", 7).unwrap();
    record.save_batched();

    assert_eq!(overlay.saved_change(&record, "price").unwrap(), None);
}

// ============================================================================
// Dirty policy
// ============================================================================

#[test]
fn equal_value_does_not_mark_under_compare_before_mark() {
    let schema = product_schema();
    let overlay = schema.overlay("options").unwrap();
    let mut record = saved_product(&schema, &[("price", Value::Int(100))]);

    schema.set(&mut record, "price", "100").unwrap();

    assert!(!record.is_dirty("options"));
    assert!(!overlay.changed(&record, "price").unwrap());
    assert_eq!(record.change_notifications("options"), 0);
}

#[test]
fn same_instant_in_another_offset_is_equal() {
    let schema = product_schema();
    let mut record = saved_product(
        &schema,
        &[("build_timestamp", Value::from("2014-04-14T15:00:00Z"))],
    );

    schema
        .set(&mut record, "build_timestamp", "2014-04-14T17:00:00+02:00")
        .unwrap();

    assert!(!record.is_dirty("options"));
}

#[test]
fn equal_value_marks_under_always_mark() {
    let schema =
        product_schema_with(OverlayConfig::default().with_dirty_policy(DirtyPolicy::AlwaysMark));
    let overlay = schema.overlay("options").unwrap();
    let mut record = saved_product(&schema, &[("price", Value::Int(100))]);

    schema.set(&mut record, "price", "100").unwrap();

    assert!(record.is_dirty("options"));
    assert!(!overlay.changed(&record, "price").unwrap());
    assert_eq!(overlay.change(&record, "price").unwrap(), None);
}

#[test]
fn will_change_marks_the_physical_attribute() {
    let schema = product_schema();
    let overlay = schema.overlay("options").unwrap();
    let mut record = priced(&schema);

    overlay.will_change(&mut record, "color").unwrap();

    assert!(record.is_dirty("options"));
    assert!(!record.is_dirty("data"));
}
