//! Property bags and their JSON codec
//!
//! Nodes and edges carry an open key/value mapping. In storage it is a JSON
//! object; in memory it is a [`Properties`] value with typed accessors.
//!
//! Two decode paths exist. [`Properties::get_property`] fails closed and hands
//! back the caller's default for anything missing or mistyped, which is what
//! display paths want. [`Properties::decode`] and [`Properties::try_get`] are
//! strict and report the underlying error, for integrity checks.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// An open key/value attribute bag
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Properties(Map<String, Value>);

impl Properties {
    /// Create an empty property bag
    pub fn new() -> Self {
        Self::default()
    }

    /// Encode to the JSON text stored alongside the node or edge
    pub fn encode(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(&self.0)
    }

    /// Strictly decode stored JSON text
    ///
    /// Empty input decodes to an empty bag; anything that is not a JSON object
    /// is an error.
    pub fn decode(text: &str) -> Result<Self, serde_json::Error> {
        if text.trim().is_empty() {
            return Ok(Self::new());
        }
        serde_json::from_str::<Map<String, Value>>(text).map(Self)
    }

    /// Decode stored JSON text, degrading to an empty bag on failure
    pub fn decode_lenient(text: &str) -> Self {
        match Self::decode(text) {
            Ok(props) => props,
            Err(e) => {
                tracing::warn!(error = %e, "undecodable property payload, treating as empty");
                Self::new()
            }
        }
    }

    /// Get a property, or `default` if the key is absent or holds another type
    ///
    /// # Examples
    ///
    /// ```
    /// use provenant_domain::Properties;
    ///
    /// let mut props = Properties::new();
    /// props.set_property("chapter_number", 3).unwrap();
    /// assert_eq!(props.get_property("chapter_number", 0i64), 3);
    /// assert_eq!(props.get_property("missing", 7i64), 7);
    /// assert_eq!(props.get_property("chapter_number", String::new()), "");
    /// ```
    pub fn get_property<T: DeserializeOwned>(&self, key: &str, default: T) -> T {
        self.try_get(key).ok().flatten().unwrap_or(default)
    }

    /// Strictly get a property
    ///
    /// `Ok(None)` when the key is absent, `Err` when it holds a value that
    /// does not deserialize as `T`.
    pub fn try_get<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, serde_json::Error> {
        self.0
            .get(key)
            .map(|v| T::deserialize(v))
            .transpose()
    }

    /// Get the raw JSON value of a property
    pub fn get_raw(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Set a property to any serializable value, replacing an existing one
    pub fn set_property<V: Serialize>(&mut self, key: &str, value: V) -> Result<(), serde_json::Error> {
        let value = serde_json::to_value(value)?;
        self.0.insert(key.to_string(), value);
        Ok(())
    }

    /// Set a property from an already-built JSON value (builder form)
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }

    /// Remove a property, returning its previous value
    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.0.remove(key)
    }

    /// Whether a key is present
    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    /// Overlay `other` onto this bag; keys in `other` win
    pub fn merge(&mut self, other: Properties) {
        self.0.extend(other.0);
    }

    /// Number of keys
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the bag is empty
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate over keys and raw values
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }
}

impl From<Map<String, Value>> for Properties {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

impl TryFrom<Value> for Properties {
    type Error = String;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::Object(map) => Ok(Self(map)),
            Value::Null => Ok(Self::new()),
            other => Err(format!("properties must be a JSON object, got {}", other)),
        }
    }
}

impl FromIterator<(String, Value)> for Properties {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}
