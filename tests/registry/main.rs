//! Type Registry integration suite
//!
//! Storage encodings as a host database would see them, and the
//! historical-format migrations.

use chrono::{DateTime, NaiveDate, Utc};
use proptest::prelude::*;
use rust_decimal::Decimal;
use serde_json::json;
use typed_overlay::registry::{cast, deserialize, serialize};
use typed_overlay::{
    migrate_legacy_array, migrate_legacy_hash, DataType, Error, TypeRegistry, Value,
    LEGACY_ARRAY_SEPARATOR,
};

// ============================================================================
// Encodings
// ============================================================================

#[test]
fn every_type_has_a_handler() {
    for dt in DataType::ALL {
        let handler = TypeRegistry::DEFAULT.handler(dt);
        assert_eq!((handler.cast)(&Value::Null).unwrap(), Value::Null, "{dt}");
    }
}

#[test]
fn nil_passes_through_every_stage() {
    for dt in DataType::ALL {
        assert_eq!(serialize(dt, &Value::Null).unwrap(), None, "{dt}");
        assert_eq!(deserialize(dt, None).unwrap(), Value::Null, "{dt}");
    }
}

#[test]
fn stored_strings_are_canonical() {
    let cases: Vec<(DataType, Value, &str)> = vec![
        (DataType::Integer, Value::from("12"), "12"),
        (DataType::Float, Value::Int(20), "20.0"),
        (DataType::Boolean, Value::from("off"), "false"),
        (
            DataType::Date,
            Value::Date(NaiveDate::from_ymd_opt(2014, 2, 12).unwrap()),
            "2014-02-12",
        ),
        (
            DataType::DateTime,
            Value::from("2014-04-14T15:00:00Z"),
            "1397487600",
        ),
        (DataType::Array, Value::from(vec!["a", "b"]), r#"["a","b"]"#),
        (DataType::Hash, Value::from(json!({"k": 1})), r#"{"k":1}"#),
    ];
    for (dt, input, expected) in cases {
        assert_eq!(
            serialize(dt, &input).unwrap().as_deref(),
            Some(expected),
            "{dt}"
        );
    }
}

#[test]
fn decimal_keeps_its_scale() {
    let d: Decimal = "1.50".parse().unwrap();
    assert_eq!(
        serialize(DataType::Decimal, &Value::Decimal(d)).unwrap(),
        Some("1.50".to_string())
    );
}

#[test]
fn decimal_beyond_28_digits_is_rejected() {
    let long = "1.23456789012345678901234567890123";
    assert!(matches!(
        serialize(DataType::Decimal, &Value::from(long)).unwrap_err(),
        Error::CastFailure { .. }
    ));
    assert!(matches!(
        serialize(DataType::Decimal, &Value::Float(1e-30)).unwrap_err(),
        Error::CastFailure { .. }
    ));
    assert!(matches!(
        deserialize(DataType::Decimal, Some(long)).unwrap_err(),
        Error::Corrupt { .. }
    ));
    assert_eq!(
        serialize(DataType::Decimal, &Value::from("1.234567890123456789012345678"))
            .unwrap()
            .as_deref(),
        Some("1.234567890123456789012345678")
    );
}

#[test]
fn datetime_truncates_to_whole_seconds() {
    let v = cast(DataType::DateTime, &Value::from("2014-04-14T15:00:00.750Z")).unwrap();
    assert_eq!(
        v,
        Value::DateTime(DateTime::<Utc>::from_timestamp(1_397_487_600, 0).unwrap())
    );
}

#[test]
fn corrupt_stored_strings_are_surfaced() {
    for (dt, stored) in [
        (DataType::Integer, "abc"),
        (DataType::Integer, "1e30"),
        (DataType::Date, "yesterday"),
        (DataType::Array, "[1,"),
        (DataType::Hash, "[1]"),
    ] {
        let err = deserialize(dt, Some(stored)).unwrap_err();
        assert!(matches!(err, Error::Corrupt { .. }), "{dt}: {err}");
    }
}

#[test]
fn hash_shape_mismatch_is_an_invalid_data_type() {
    let err = serialize(DataType::Hash, &Value::from(vec![1, 2])).unwrap_err();
    assert!(err.is_invalid_data_type());
}

// ============================================================================
// Legacy migrations
// ============================================================================

#[test]
fn legacy_array_is_split_on_the_separator() {
    let migrated = migrate_legacy_array(Some("tag1||;||tag2||;||tag3")).unwrap();
    assert_eq!(migrated.as_deref(), Some(r#"["tag1","tag2","tag3"]"#));
    assert_eq!(
        deserialize(DataType::Array, migrated.as_deref()).unwrap(),
        Value::from(vec!["tag1", "tag2", "tag3"])
    );
}

#[test]
fn legacy_array_edge_cases() {
    assert_eq!(migrate_legacy_array(None).unwrap(), None);
    assert_eq!(migrate_legacy_array(Some("")).unwrap().as_deref(), Some("[]"));
    assert_eq!(
        migrate_legacy_array(Some(r#"["x", 1]"#)).unwrap().as_deref(),
        Some(r#"["x",1]"#)
    );
}

#[test]
fn legacy_hash_is_reencoded() {
    assert_eq!(migrate_legacy_hash(None).unwrap(), None);
    assert_eq!(
        migrate_legacy_hash(Some(r#"{ "user_123" : "4 stars" }"#))
            .unwrap()
            .as_deref(),
        Some(r#"{"user_123":"4 stars"}"#)
    );
    assert!(matches!(
        migrate_legacy_hash(Some("[1, 2]")).unwrap_err(),
        Error::Corrupt { .. }
    ));
}

proptest! {
    #[test]
    fn legacy_array_migration_preserves_items(items in prop::collection::vec("[a-z0-9 ]{1,8}", 1..6)) {
        let legacy = items.join(LEGACY_ARRAY_SEPARATOR);
        let migrated = migrate_legacy_array(Some(&legacy)).unwrap();
        let value = deserialize(DataType::Array, migrated.as_deref()).unwrap();
        prop_assert_eq!(value, Value::from(items.clone()));

        let again = migrate_legacy_array(migrated.as_deref()).unwrap();
        prop_assert_eq!(again, migrated);
    }

    #[test]
    fn integer_strings_round_trip(i in any::<i64>()) {
        let stored = serialize(DataType::Integer, &Value::from(i.to_string())).unwrap();
        prop_assert_eq!(deserialize(DataType::Integer, stored.as_deref()).unwrap(), Value::Int(i));
    }
}
