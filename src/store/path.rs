use std::fmt;
use std::str::FromStr;

use crate::error::StoreError;

/// Ordered key sequence addressing a location inside a snapshot.
///
/// Keys are validated once at construction; an empty path addresses the
/// snapshot root.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Path {
    keys: Vec<String>,
}

impl Path {
    /// The root path.
    pub fn root() -> Self {
        Self::default()
    }

    /// Build a path from keys. Every key must be non-empty.
    pub fn new<I, S>(keys: I) -> Result<Self, StoreError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let keys: Vec<String> = keys.into_iter().map(Into::into).collect();
        if let Some(index) = keys.iter().position(|k| k.is_empty()) {
            return Err(StoreError::InvalidPath {
                reason: format!("key at position {} is empty", index),
            });
        }
        Ok(Self { keys })
    }

    pub fn keys(&self) -> &[String] {
        &self.keys
    }

    pub fn is_root(&self) -> bool {
        self.keys.is_empty()
    }
}

/// Parses dotted notation such as `app.likes`. The empty string is the root.
impl FromStr for Path {
    type Err = StoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() {
            return Ok(Self::root());
        }
        Path::new(s.split('.'))
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.keys.join("."))
    }
}
