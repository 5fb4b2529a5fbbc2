//! Page parameters.
//!
//! - [`ParamValue`]: one parameter value. Matching always produces
//!   [`ParamValue::Str`]; a page's [`Mapper`](crate::Mapper) may coerce it to
//!   an integer, float or boolean.
//! - [`PageParams`]: the key/value map carried by page-change events.
//!   Equality is deep and structural: `{id: 3}` and `{id: "3"}` differ.
//!
//! # Example
//!
//! ```
//! use page_navigator::{PageParams, ParamValue};
//!
//! let params = PageParams::new().with("id", "42").with("page", 2);
//! assert_eq!(params.get_str("id"), Some("42"));
//! assert_eq!(params.get("page"), Some(&ParamValue::Int(2)));
//! assert_eq!(params.get_as::<u32>("id"), Some(42));
//! ```

use std::collections::HashMap;
use std::fmt;

/// A single parameter value.
#[derive(Debug, Clone, PartialEq)]
pub enum ParamValue {
    /// Raw or string-typed value
    Str(String),
    /// Integer value
    Int(i64),
    /// Floating point value
    Float(f64),
    /// Boolean value
    Bool(bool),
}

impl ParamValue {
    /// Borrow the string, if this is a [`ParamValue::Str`].
    pub fn as_str(&self) -> Option<&str> {
        match self {
            ParamValue::Str(s) => Some(s),
            _ => None,
        }
    }

    /// Get the integer, if this is a [`ParamValue::Int`].
    pub fn as_int(&self) -> Option<i64> {
        match self {
            ParamValue::Int(n) => Some(*n),
            _ => None,
        }
    }

    /// Get the float, if this is a [`ParamValue::Float`].
    pub fn as_float(&self) -> Option<f64> {
        match self {
            ParamValue::Float(n) => Some(*n),
            _ => None,
        }
    }

    /// Get the boolean, if this is a [`ParamValue::Bool`].
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            ParamValue::Bool(b) => Some(*b),
            _ => None,
        }
    }
}

/// Renders the value the way it appears in a path segment.
impl fmt::Display for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamValue::Str(s) => f.write_str(s),
            ParamValue::Int(n) => write!(f, "{}", n),
            ParamValue::Float(n) => write!(f, "{}", n),
            ParamValue::Bool(b) => write!(f, "{}", b),
        }
    }
}

impl From<&str> for ParamValue {
    fn from(value: &str) -> Self {
        ParamValue::Str(value.to_string())
    }
}

impl From<String> for ParamValue {
    fn from(value: String) -> Self {
        ParamValue::Str(value)
    }
}

impl From<i64> for ParamValue {
    fn from(value: i64) -> Self {
        ParamValue::Int(value)
    }
}

impl From<i32> for ParamValue {
    fn from(value: i32) -> Self {
        ParamValue::Int(i64::from(value))
    }
}

impl From<u32> for ParamValue {
    fn from(value: u32) -> Self {
        ParamValue::Int(i64::from(value))
    }
}

impl From<f64> for ParamValue {
    fn from(value: f64) -> Self {
        ParamValue::Float(value)
    }
}

impl From<bool> for ParamValue {
    fn from(value: bool) -> Self {
        ParamValue::Bool(value)
    }
}

/// Parameters of a page, keyed by template parameter name.
///
/// # Example
///
/// ```
/// use page_navigator::PageParams;
///
/// // Template /users/:id, path /users/123
/// let mut params = PageParams::new();
/// params.insert("id", "123");
///
/// assert_eq!(params.get_str("id"), Some("123"));
/// assert_eq!(params.get_as::<i32>("id"), Some(123));
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PageParams {
    params: HashMap<String, ParamValue>,
}

impl PageParams {
    /// Create empty parameters.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create from an existing `HashMap`.
    pub fn from_map(params: HashMap<String, ParamValue>) -> Self {
        Self { params }
    }

    /// Builder-style [`insert`](Self::insert).
    pub fn with(mut self, key: impl Into<String>, value: impl Into<ParamValue>) -> Self {
        self.insert(key, value);
        self
    }

    /// Get a parameter value by key.
    pub fn get(&self, key: &str) -> Option<&ParamValue> {
        self.params.get(key)
    }

    /// Get a parameter only if it is still a string.
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.params.get(key)?.as_str()
    }

    /// Get a parameter and parse its rendered form as a specific type
    ///
    /// Returns `None` if the parameter doesn't exist or cannot be parsed.
    pub fn get_as<T>(&self, key: &str) -> Option<T>
    where
        T: std::str::FromStr,
    {
        self.params.get(key)?.to_string().parse().ok()
    }

    /// Insert or overwrite a parameter.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<ParamValue>) {
        self.params.insert(key.into(), value.into());
    }

    /// Remove a parameter, returning its value.
    pub fn remove(&mut self, key: &str) -> Option<ParamValue> {
        self.params.remove(key)
    }

    /// Return `true` if the given key is present.
    pub fn contains(&self, key: &str) -> bool {
        self.params.contains_key(key)
    }

    /// Get a reference to the underlying parameter map.
    pub fn all(&self) -> &HashMap<String, ParamValue> {
        &self.params
    }

    /// Iterate over all `(key, value)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &ParamValue)> {
        self.params.iter()
    }

    /// Return `true` if there are no parameters.
    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    /// Return the number of parameters.
    pub fn len(&self) -> usize {
        self.params.len()
    }

    /// Merge parent parameters with child parameters
    ///
    /// Child parameters override parent parameters in case of collision.
    /// Useful when formatting a child page whose template was composed onto
    /// a parent's.
    ///
    /// # Example
    ///
    /// ```
    /// use page_navigator::PageParams;
    ///
    /// let parent = PageParams::new().with("id", "5").with("view", "list");
    /// let child = PageParams::new().with("number", 2).with("view", "grid");
    ///
    /// let merged = PageParams::merge(&parent, &child);
    /// assert_eq!(merged.get_str("id"), Some("5"));
    /// assert_eq!(merged.get_as::<i64>("number"), Some(2));
    /// assert_eq!(merged.get_str("view"), Some("grid"));
    /// ```
    pub fn merge(parent: &PageParams, child: &PageParams) -> PageParams {
        let mut merged = parent.clone();

        for (key, value) in child.iter() {
            merged.params.insert(key.clone(), value.clone());
        }

        merged
    }
}

impl<K, V> FromIterator<(K, V)> for PageParams
where
    K: Into<String>,
    V: Into<ParamValue>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            params: iter
                .into_iter()
                .map(|(key, value)| (key.into(), value.into()))
                .collect(),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
