//! Physical attribute representation
//!
//! A physical attribute is a flat string-to-string map. Key order carries no
//! meaning. A key may map to `None`, the nil marker left behind when a
//! logical field is cleared.

use std::collections::{BTreeMap, BTreeSet};

/// The value of one physical attribute
pub type StoreMap = BTreeMap<String, Option<String>>;

/// Stored string under `key`, flattening a nil marker to absence
pub fn stored<'a>(map: &'a StoreMap, key: &str) -> Option<&'a str> {
    map.get(key).and_then(|v| v.as_deref())
}

/// Keys whose stored strings differ between two maps
///
/// An absent key and a nil-valued key are treated as the same thing.
pub fn changed_keys(before: &StoreMap, after: &StoreMap) -> BTreeSet<String> {
    before
        .keys()
        .chain(after.keys())
        .filter(|k| stored(before, k) != stored(after, k))
        .cloned()
        .collect()
}

/// Build a map from string pairs
///
/// Convenience for hosts and tests that seed raw attribute contents.
pub fn store_map<K, V, I>(pairs: I) -> StoreMap
where
    I: IntoIterator<Item = (K, V)>,
    K: Into<String>,
    V: Into<String>,
{
    pairs
        .into_iter()
        .map(|(k, v)| (k.into(), Some(v.into())))
        .collect()
}
