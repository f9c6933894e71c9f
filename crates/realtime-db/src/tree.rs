//! In-place edits of a JSON tree, following the store's rules: writing
//! `null` deletes, and objects left without children disappear.

use serde_json::{Map, Value};

use crate::path;

/// Returns the value stored at `keys`, or `Value::Null` when nothing is there.
pub fn get(root: &Value, keys: &[&str]) -> Value {
    keys.iter()
        .try_fold(root, |node, key| node.get(*key))
        .cloned()
        .unwrap_or(Value::Null)
}

/// Replaces whatever lives at `keys` with `value`.
pub fn set(node: &mut Value, keys: &[&str], value: Value) {
    let Some((key, rest)) = keys.split_first() else {
        *node = if is_empty(&value) { Value::Null } else { value };
        return;
    };
    if !node.is_object() {
        if value.is_null() {
            return;
        }
        *node = Value::Object(Map::new());
    }
    let emptied = match node {
        Value::Object(children) => {
            let child = children.entry(key.to_string()).or_insert(Value::Null);
            set(child, rest, value);
            if is_empty(child) {
                children.remove(*key);
            }
            children.is_empty()
        }
        _ => false,
    };
    if emptied {
        *node = Value::Null;
    }
}

/// Applies a multi-location update: each key of `children` is a path
/// relative to `keys`.
pub fn update(root: &mut Value, keys: &[&str], children: Map<String, Value>) {
    for (relative, value) in children {
        let mut target = keys.to_vec();
        target.extend(path::split(&relative));
        set(root, &target, value);
    }
}

fn is_empty(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Object(children) => children.is_empty(),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn set_creates_intermediate_objects() {
        let mut root = Value::Null;
        set(&mut root, &["favorites", "hello"], json!({ "word": "hello" }));
        assert_eq!(root, json!({ "favorites": { "hello": { "word": "hello" } } }));
        assert_eq!(get(&root, &["favorites", "hello", "word"]), json!("hello"));
        assert_eq!(get(&root, &["history"]), Value::Null);
    }

    #[test]
    fn set_overwrites_existing_value() {
        let mut root = json!({ "favorites": { "hello": { "definition": "old" } } });
        set(&mut root, &["favorites", "hello"], json!({ "definition": "new" }));
        assert_eq!(get(&root, &["favorites", "hello"]), json!({ "definition": "new" }));
    }

    #[test]
    fn null_deletes_and_prunes_empty_parents() {
        let mut root = json!({ "history": { "-a": "hello" }, "favorites": { "x": 1 } });
        set(&mut root, &["history", "-a"], Value::Null);
        assert_eq!(root, json!({ "favorites": { "x": 1 } }));
        set(&mut root, &["favorites"], json!({}));
        assert_eq!(root, Value::Null);
    }

    #[test]
    fn update_touches_only_named_children() {
        let mut root = json!({ "history": { "-a": "hello" } });
        let mut children = Map::new();
        children.insert("-b".to_owned(), json!("world"));
        children.insert("nested/deep".to_owned(), json!(true));
        update(&mut root, &["history"], children);
        assert_eq!(
            root,
            json!({ "history": { "-a": "hello", "-b": "world", "nested": { "deep": true } } })
        );
    }
}
