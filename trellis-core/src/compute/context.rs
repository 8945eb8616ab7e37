//! Computation Context
//!
//! The context is the data bag a computation threads through every node it
//! runs. Nodes read their inputs from it and store their outputs in it.
//!
//! Keys are strings and values are arbitrary JSON values, so a key holding an
//! explicit `null` is distinguishable from a missing key. Writes are visible
//! immediately to every node that runs afterwards; there are no transactions
//! and no rollback.
//!
//! A context serializes as a plain JSON object, which makes it easy to seed a
//! computation from request data and to inspect the result afterwards.

use indexmap::IndexMap;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Mutable key/value store shared by the nodes of one computation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Context {
    entries: IndexMap<String, Value>,
}

impl Context {
    /// Create an empty context.
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a value, replacing any previous value under `key`.
    pub fn store(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.entries.insert(key.into(), value.into());
    }

    /// Serialize `value` and store it under `key`.
    pub fn store_serialized<T>(
        &mut self,
        key: impl Into<String>,
        value: &T,
    ) -> serde_json::Result<()>
    where
        T: Serialize + ?Sized,
    {
        let value = serde_json::to_value(value)?;
        self.entries.insert(key.into(), value);
        Ok(())
    }

    /// Remove `key`, returning its value if it was present.
    pub fn delete(&mut self, key: &str) -> Option<Value> {
        self.entries.shift_remove(key)
    }

    /// Read the value under `key`. `None` means the key is absent.
    pub fn read(&self, key: &str) -> Option<&Value> {
        self.entries.get(key)
    }

    /// Read and deserialize the value under `key`.
    ///
    /// Returns `None` when the key is absent.
    pub fn read_as<T>(&self, key: &str) -> Option<serde_json::Result<T>>
    where
        T: DeserializeOwned,
    {
        self.entries.get(key).map(T::deserialize)
    }

    pub fn have_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in first-insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries.iter().map(|(key, value)| (key.as_str(), value))
    }
}

impl<K> FromIterator<(K, Value)> for Context
where
    K: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, Value)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }
}
