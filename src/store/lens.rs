//! Pure read/write of a value at a nested path inside a snapshot.
//!
//! Only objects are traversed. An array, scalar or missing node on the way
//! reads as absent, and on write is replaced by a fresh object.

use serde_json::{Map, Value};

use super::path::Path;

/// Value at `path`, or `default` when any level is absent.
pub fn read(snapshot: &Value, path: &Path, default: &Value) -> Value {
    lookup(snapshot, path).cloned().unwrap_or_else(|| default.clone())
}

/// Borrowing variant of [`read`]: `None` when absent.
pub fn lookup<'a>(snapshot: &'a Value, path: &Path) -> Option<&'a Value> {
    path.keys()
        .iter()
        .try_fold(snapshot, |node, key| node.as_object()?.get(key))
}

/// A new snapshot with `value` placed at `path`.
///
/// The input is left untouched. Siblings along the path are carried over
/// into the new tree.
pub fn write(snapshot: &Value, path: &Path, value: Value) -> Value {
    write_keys(Some(snapshot), path.keys(), value)
}

fn write_keys(node: Option<&Value>, keys: &[String], value: Value) -> Value {
    let Some((head, rest)) = keys.split_first() else {
        return value;
    };

    let mut map = match node {
        Some(Value::Object(map)) => map.clone(),
        _ => Map::new(),
    };
    let child = write_keys(map.get(head), rest, value);
    map.insert(head.clone(), child);
    Value::Object(map)
}
