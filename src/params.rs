//! Query values attached to a request
//!
//! A key may carry several values, mirroring how HTTP query strings work.
//! Keys are kept sorted so encoding is stable across runs.

use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;

/// Ordered key → multi-value mapping used for URL query parameters.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct QueryValues(BTreeMap<String, Vec<String>>);

impl QueryValues {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a value to the key, keeping any values already present.
    pub fn add(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.0.entry(key.into()).or_default().push(value.into());
    }

    /// Replace all values of the key with a single value.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.0.insert(key.into(), vec![value.into()]);
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.add(key, value);
        self
    }

    /// First value for the key, if any.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0
            .get(key)
            .and_then(|values| values.first())
            .map(String::as_str)
    }

    pub fn get_all(&self, key: &str) -> &[String] {
        self.0.get(key).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn remove(&mut self, key: &str) -> Option<Vec<String>> {
        self.0.remove(key)
    }

    /// Additive merge: every value of `other` is appended, nothing is overwritten.
    pub fn merge(&mut self, other: &QueryValues) {
        for (key, values) in other.iter() {
            self.0
                .entry(key.clone())
                .or_default()
                .extend(values.iter().cloned());
        }
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Vec<String>)> {
        self.0.iter()
    }

    /// One representative value per key.
    pub fn first_values(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().filter_map(|(key, values)| {
            values
                .first()
                .map(|value| (key.as_str(), value.as_str()))
        })
    }

    /// Encode as `application/x-www-form-urlencoded`, keys in sorted order.
    pub fn encode(&self) -> String {
        let mut serializer = url::form_urlencoded::Serializer::new(String::new());
        for (key, values) in &self.0 {
            for value in values {
                serializer.append_pair(key, value);
            }
        }
        serializer.finish()
    }
}

impl<K, V> FromIterator<(K, V)> for QueryValues
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut values = QueryValues::new();
        for (key, value) in iter {
            values.add(key, value);
        }
        values
    }
}

impl<'de> Deserialize<'de> for QueryValues {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        fn scalar<E: serde::de::Error>(value: serde_yaml::Value) -> std::result::Result<String, E> {
            match value {
                serde_yaml::Value::String(s) => Ok(s),
                serde_yaml::Value::Bool(b) => Ok(b.to_string()),
                serde_yaml::Value::Number(n) => Ok(n.to_string()),
                other => Err(E::custom(format!(
                    "query value must be a scalar, got {:?}",
                    other
                ))),
            }
        }

        // Each key takes either a scalar (refresh: true) or a list of scalars.
        let raw = BTreeMap::<String, serde_yaml::Value>::deserialize(deserializer)?;
        let mut out = BTreeMap::new();
        for (key, input) in raw {
            let values = match input {
                serde_yaml::Value::Sequence(list) => list
                    .into_iter()
                    .map(scalar::<D::Error>)
                    .collect::<std::result::Result<Vec<_>, _>>()?,
                value => vec![scalar::<D::Error>(value)?],
            };
            // `routing: []` carries nothing to send.
            if !values.is_empty() {
                out.insert(key, values);
            }
        }
        Ok(QueryValues(out))
    }
}
