use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// A data instance: feature name to numeric value.
///
/// Lookups are explicit — a feature the instance does not carry yields
/// `None`, which the path tracer turns into a truncated path rather than a
/// silent fallthrough.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Instance {
    features: BTreeMap<String, f64>,
}

impl Instance {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, feature: impl Into<String>, value: f64) {
        self.features.insert(feature.into(), value);
    }

    pub fn value(&self, feature: &str) -> Option<f64> {
        self.features.get(feature).copied()
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }
}

impl<K: Into<String>> FromIterator<(K, f64)> for Instance {
    fn from_iter<I: IntoIterator<Item = (K, f64)>>(iter: I) -> Self {
        Self {
            features: iter
                .into_iter()
                .map(|(feature, value)| (feature.into(), value))
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_feature_is_none() {
        let instance = Instance::from_iter([("x", 3.0)]);
        assert_eq!(instance.value("x"), Some(3.0));
        assert_eq!(instance.value("y"), None);
    }

    #[test]
    fn deserializes_flat_map() {
        let instance: Instance =
            serde_json::from_str(r#"{"petal length (cm)": 5.1, "petal width (cm)": 2.0}"#).unwrap();
        assert_eq!(instance.len(), 2);
        assert_eq!(instance.value("petal width (cm)"), Some(2.0));
    }
}
