//! Config paths and the sections they point at.
//!
//! A [`ConfigPath`] is an ordered list of string or integer segments. Walking
//! a root [`Value`] through it never fails: any missing step yields an empty
//! [`ConfigSection`].
//!
//! ```text
//! root = { "foo": { "bar": { "debug": true } } }
//!
//! ["foo", "bar"]  -> { "debug": true }
//! ["foo", "baz"]  -> {}
//! ["foo", 0]      -> {}
//! ```
//!
//! Integer segments are signed so a path can name keys such as `"-1"`. A
//! negative segment never addresses an array element.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

// ============================================================================
// PathSegment
// ============================================================================

/// A single step of a [`ConfigPath`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PathSegment {
    /// Array position (or an integer-like object key).
    Index(i64),
    /// Object key.
    Key(String),
}

impl PathSegment {
    /// Step from `value` into the child addressed by this segment.
    fn descend<'a>(&self, value: &'a Value) -> Option<&'a Value> {
        match (self, value) {
            (Self::Key(key), Value::Object(map)) => map.get(key),
            (Self::Index(index), Value::Object(map)) => map.get(&index.to_string()),
            (Self::Index(index), Value::Array(items)) => {
                usize::try_from(*index).ok().and_then(|i| items.get(i))
            }
            _ => None,
        }
    }
}

impl fmt::Display for PathSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Index(index) => write!(f, "{index}"),
            Self::Key(key) => f.write_str(key),
        }
    }
}

impl From<&str> for PathSegment {
    fn from(key: &str) -> Self {
        Self::Key(key.to_string())
    }
}

impl From<String> for PathSegment {
    fn from(key: String) -> Self {
        Self::Key(key)
    }
}

impl From<i64> for PathSegment {
    fn from(index: i64) -> Self {
        Self::Index(index)
    }
}

impl From<i32> for PathSegment {
    fn from(index: i32) -> Self {
        Self::Index(i64::from(index))
    }
}

impl From<u32> for PathSegment {
    fn from(index: u32) -> Self {
        Self::Index(i64::from(index))
    }
}

impl From<u64> for PathSegment {
    /// Values past `i64::MAX` can only be object keys.
    fn from(index: u64) -> Self {
        i64::try_from(index).map_or_else(|_| Self::Key(index.to_string()), Self::Index)
    }
}

impl From<usize> for PathSegment {
    fn from(index: usize) -> Self {
        i64::try_from(index).map_or_else(|_| Self::Key(index.to_string()), Self::Index)
    }
}

// ============================================================================
// ConfigPath
// ============================================================================

/// Ordered keys locating a section inside the root configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConfigPath(Vec<PathSegment>);

impl ConfigPath {
    pub fn new<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<PathSegment>,
    {
        Self(segments.into_iter().map(Into::into).collect())
    }

    /// The empty path, addressing the root itself.
    pub const fn root() -> Self {
        Self(Vec::new())
    }

    pub fn segments(&self) -> &[PathSegment] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Path extended by one more segment.
    pub fn child(&self, segment: impl Into<PathSegment>) -> Self {
        let mut segments = self.0.clone();
        segments.push(segment.into());
        Self(segments)
    }

    /// Follow the path from `root`, stopping at the first missing step.
    pub fn lookup<'a>(&self, root: &'a Value) -> Option<&'a Value> {
        self.0
            .iter()
            .try_fold(root, |current, segment| segment.descend(current))
    }

    /// Resolve the section this path points at.
    pub fn section(&self, root: &Value) -> ConfigSection {
        ConfigSection::from_root(root, self)
    }
}

impl fmt::Display for ConfigPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, segment) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(".")?;
            }
            write!(f, "{segment}")?;
        }
        Ok(())
    }
}

impl<S: Into<PathSegment>> FromIterator<S> for ConfigPath {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self::new(iter)
    }
}

// ============================================================================
// ConfigSection
// ============================================================================

/// The mapping found at the end of a [`ConfigPath`].
///
/// Keys keep the order of the source document. A key holding `null` counts
/// as absent.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConfigSection(Map<String, Value>);

impl ConfigSection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Walk `root` through `path`; anything that is not a mapping at the end
    /// (or along the way) degrades to an empty section.
    pub fn from_root(root: &Value, path: &ConfigPath) -> Self {
        match path.lookup(root) {
            Some(Value::Object(map)) => Self(map.clone()),
            _ => Self::default(),
        }
    }

    /// Value stored under `key`, treating `null` as missing.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key).filter(|value| !value.is_null())
    }

    pub fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    pub fn into_value(self) -> Value {
        Value::Object(self.0)
    }
}

impl From<Map<String, Value>> for ConfigSection {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

// ============================================================================
// tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn root() -> Value {
        json!({
            "foo": {
                "bar": { "debug": true, "cacheDir": null },
                "list": [{ "debug": false }],
                "7": { "typeParser": "parser" },
                "-1": { "debug": true },
            },
            "scalar": 42,
        })
    }

    #[test]
    fn test_section_found() {
        let section = ConfigPath::new(["foo", "bar"]).section(&root());
        assert_eq!(section.get("debug"), Some(&json!(true)));
    }

    #[test]
    fn test_section_missing_branch_is_empty() {
        assert!(ConfigPath::new(["foo", "baz"]).section(&root()).is_empty());
        assert!(ConfigPath::new(["nope", "bar"]).section(&root()).is_empty());
    }

    #[test]
    fn test_section_through_scalar_is_empty() {
        let path = ConfigPath::new(["scalar", "deeper"]);
        assert!(path.lookup(&root()).is_none());
        assert!(path.section(&root()).is_empty());
    }

    #[test]
    fn test_section_non_object_target_is_empty() {
        assert!(ConfigPath::new(["scalar"]).section(&root()).is_empty());
        assert!(ConfigPath::new(["foo", "list"]).section(&root()).is_empty());
    }

    #[test]
    fn test_integer_segments() {
        let path = ConfigPath::new(["foo", "list"]).child(0_usize);
        assert_eq!(path.section(&root()).get("debug"), Some(&json!(false)));

        let path = ConfigPath::new(["foo"]).child(7_u32);
        assert_eq!(path.section(&root()).get("typeParser"), Some(&json!("parser")));

        let path = ConfigPath::new(["foo", "list"]).child(3_usize);
        assert!(path.section(&root()).is_empty());
    }

    #[test]
    fn test_plain_and_negative_integer_segments() {
        let path = ConfigPath::new(["foo", "list"]).child(0);
        assert_eq!(path.segments()[2], PathSegment::Index(0));
        assert_eq!(path.section(&root()).get("debug"), Some(&json!(false)));

        let path = ConfigPath::new(["foo"]).child(-1);
        assert_eq!(path.to_string(), "foo.-1");
        assert_eq!(path.section(&root()).get("debug"), Some(&json!(true)));

        assert!(ConfigPath::new(["foo", "list"]).child(-1).lookup(&root()).is_none());
    }

    #[test]
    fn test_large_unsigned_segment_becomes_key() {
        assert_eq!(
            PathSegment::from(u64::MAX),
            PathSegment::Key(u64::MAX.to_string())
        );
        assert_eq!(PathSegment::from(7_u64), PathSegment::Index(7));
    }

    #[test]
    fn test_null_counts_as_absent() {
        let section = ConfigPath::new(["foo", "bar"]).section(&root());
        assert!(!section.contains("cacheDir"));
        assert_eq!(section.keys().collect::<Vec<_>>(), vec!["debug", "cacheDir"]);
    }

    #[test]
    fn test_root_path_uses_whole_config() {
        let section = ConfigPath::root().section(&root());
        assert!(section.contains("scalar"));
    }

    #[test]
    fn test_display_and_serde() {
        let path = ConfigPath::new(["foo", "bar"]).child(2_u64);
        assert_eq!(path.to_string(), "foo.bar.2");

        let encoded = serde_json::to_value(&path).unwrap();
        assert_eq!(encoded, json!(["foo", "bar", 2]));
        let decoded: ConfigPath = serde_json::from_value(encoded).unwrap();
        assert_eq!(decoded, path);
    }
}
