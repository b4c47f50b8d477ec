//! Visual attribute sets attached to diagram nodes and edges.
//!
//! An [`Attributes`] value is an insertion-ordered mapping from attribute
//! keys (`shape`, `xlabel`, `arrowhead`, ...) to [`AttrValue`]s. Ordering is
//! preserved so that serialized output is stable across runs.

use std::fmt;

use indexmap::IndexMap;
use serde::Deserialize;

/// A single attribute value.
///
/// Plain text values are quoted by the serializer when needed, HTML-like
/// values are always emitted verbatim between angle brackets.
///
/// When deserialized, strings, numbers and booleans are all accepted and
/// stored as text, so `len = 0.5` and `len = "0.5"` are equivalent.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "ScalarValue")]
pub enum AttrValue {
    /// Ordinary string value.
    Text(String),

    /// HTML-like label markup, without the enclosing `<` and `>`.
    Html(String),
}

impl AttrValue {
    /// Creates a plain text value.
    pub fn text(value: impl Into<String>) -> Self {
        Self::Text(value.into())
    }

    /// Creates an HTML-like value.
    pub fn html(markup: impl Into<String>) -> Self {
        Self::Html(markup.into())
    }

    /// Returns the raw string content of the value.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Text(value) | Self::Html(value) => value,
        }
    }

    /// Returns `true` if this is an HTML-like value.
    pub fn is_html(&self) -> bool {
        matches!(self, Self::Html(_))
    }
}

/// Scalar forms accepted for an attribute value in configuration files.
#[derive(Deserialize)]
#[serde(untagged)]
enum ScalarValue {
    Text(String),
    Bool(bool),
    Integer(i64),
    Float(f64),
}

impl From<ScalarValue> for AttrValue {
    fn from(value: ScalarValue) -> Self {
        match value {
            ScalarValue::Text(text) => Self::Text(text),
            ScalarValue::Bool(flag) => Self::Text(flag.to_string()),
            ScalarValue::Integer(number) => Self::Text(number.to_string()),
            ScalarValue::Float(number) => Self::Text(number.to_string()),
        }
    }
}

impl From<String> for AttrValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<&str> for AttrValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl fmt::Display for AttrValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(value) => write!(f, "{value}"),
            Self::Html(markup) => write!(f, "<{markup}>"),
        }
    }
}

/// Ordered set of visual attributes.
///
/// Setting a key that is already present replaces its value in place, so
/// the key keeps its original position.
///
/// # Examples
///
/// ```
/// use dfm_core::attributes::{AttrValue, Attributes};
///
/// let attrs = Attributes::from_pairs([("shape", "circle"), ("label", "")])
///     .with("label", "Store")
///     .with("fixedsize", "true");
///
/// assert_eq!(attrs.len(), 3);
/// assert_eq!(attrs.get("label"), Some(&AttrValue::text("Store")));
/// assert_eq!(attrs.keys().collect::<Vec<_>>(), ["shape", "label", "fixedsize"]);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct Attributes(IndexMap<String, AttrValue>);

impl Attributes {
    /// Creates an empty attribute set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an attribute set from key/value pairs, in the given order.
    pub fn from_pairs<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<AttrValue>,
    {
        Self(
            pairs
                .into_iter()
                .map(|(key, value)| (key.into(), value.into()))
                .collect(),
        )
    }

    /// Returns a copy of this set with `key` set to `value`.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<AttrValue>) -> Self {
        self.set(key, value);
        self
    }

    /// Sets `key` to `value`, replacing any previous value.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<AttrValue>) {
        self.0.insert(key.into(), value.into());
    }

    /// Returns the value for `key`, if present.
    pub fn get(&self, key: &str) -> Option<&AttrValue> {
        self.0.get(key)
    }

    /// Returns `true` if `key` is present.
    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    /// Iterates over the keys in insertion order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    /// Iterates over key/value pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &AttrValue)> {
        self.0.iter().map(|(key, value)| (key.as_str(), value))
    }

    /// Returns the number of attributes.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if the set holds no attributes.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
