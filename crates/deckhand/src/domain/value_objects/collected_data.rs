//! CollectedData - Startup facts accumulated across a conversation

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::StartupField;

/// Mapping from field name to extracted value.
///
/// Not restricted to the required fields; only [`StartupField::REQUIRED`]
/// entries count toward completeness.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CollectedData(BTreeMap<String, String>);

impl CollectedData {
    pub fn new() -> Self {
        Self::default()
    }

    /// Raw lookup by key
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    /// Lookup by schema field
    pub fn field(&self, field: StartupField) -> Option<&str> {
        self.get(field.as_str())
    }

    /// A field is filled iff its value is non-empty after trimming
    pub fn is_filled(&self, field: StartupField) -> bool {
        self.field(field).is_some_and(|v| !v.trim().is_empty())
    }

    /// Insert or overwrite a value
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.0.insert(key.into(), value.into());
    }

    /// Shallow merge: every entry of `other` overwrites or extends `self`
    pub fn merge(&mut self, other: &CollectedData) {
        for (key, value) in &other.0 {
            self.0.insert(key.clone(), value.clone());
        }
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn into_inner(self) -> BTreeMap<String, String> {
        self.0
    }
}

impl From<BTreeMap<String, String>> for CollectedData {
    fn from(map: BTreeMap<String, String>) -> Self {
        Self(map)
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for CollectedData {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_value_is_not_filled() {
        let data: CollectedData = [("company_name", "   "), ("industry", "fintech")]
            .into_iter()
            .collect();

        assert!(!data.is_filled(StartupField::CompanyName));
        assert!(data.is_filled(StartupField::Industry));
        assert!(!data.is_filled(StartupField::Problem));
    }

    #[test]
    fn test_merge_overwrites_and_extends() {
        let mut data: CollectedData = [("a", "x")].into_iter().collect();
        let patch: CollectedData = [("a", "y"), ("b", "z")].into_iter().collect();

        data.merge(&patch);

        let expected: CollectedData = [("a", "y"), ("b", "z")].into_iter().collect();
        assert_eq!(data, expected);
    }

    #[test]
    fn test_serializes_as_plain_object() {
        let data: CollectedData = [("company_name", "Acme")].into_iter().collect();
        let json = serde_json::to_value(&data).unwrap();
        assert_eq!(json, serde_json::json!({"company_name": "Acme"}));
    }
}
