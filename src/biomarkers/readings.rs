use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;

use crate::numeric::parse_float_prefix;

/// The user's lab values, keyed by biomarker key.
///
/// Serialized as a plain JSON object (`{"ferritin": 42.0}`), which is also the
/// `labs_json` shape the backend expects.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct BiomarkerReadings(BTreeMap<String, f64>);

// Entries that are not numbers are dropped one by one; the rest are kept.
impl<'de> Deserialize<'de> for BiomarkerReadings {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = BTreeMap::<String, serde_json::Value>::deserialize(deserializer)?;
        let readings = raw
            .into_iter()
            .filter_map(|(key, value)| match value.as_f64() {
                Some(number) => Some((key, number)),
                None => {
                    tracing::warn!(key = %key, "Dropping non-numeric biomarker reading");
                    None
                }
            })
            .collect();
        Ok(Self(readings))
    }
}

impl BiomarkerReadings {
    pub fn get(&self, key: &str) -> Option<f64> {
        self.0.get(key).copied()
    }

    pub fn set(&mut self, key: &str, value: f64) {
        self.0.insert(key.to_string(), value);
    }

    pub fn remove(&mut self, key: &str) -> Option<f64> {
        self.0.remove(key)
    }

    /// Applies raw text typed into a biomarker field. Returns the stored value,
    /// or `None` when the field was cleared or holds no number (the reading is
    /// then dropped).
    pub fn set_from_input(&mut self, key: &str, raw: &str) -> Option<f64> {
        match parse_float_prefix(raw) {
            Some(value) if !value.is_nan() => {
                self.set(key, value);
                Some(value)
            }
            _ => {
                self.remove(key);
                None
            }
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.0.iter().map(|(k, v)| (k.as_str(), *v))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(String, f64)> for BiomarkerReadings {
    fn from_iter<I: IntoIterator<Item = (String, f64)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}
