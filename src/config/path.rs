use serde_json::{Map, Value};

/// Splits `a.b.c` into segments.
pub fn segments(path: &str) -> Vec<&str> {
    path.split('.').filter(|s| !s.is_empty()).collect()
}

/// Follows a segment path through nested maps.
pub fn lookup<'a>(root: &'a Value, path: &[&str]) -> Option<&'a Value> {
    path.iter().try_fold(root, |node, key| node.get(*key))
}

/// Writes `value` at `path`, replacing non-map intermediates with maps.
pub fn assign(root: &mut Value, path: &[&str], value: Value) {
    let Some((last, parents)) = path.split_last() else {
        *root = value;
        return;
    };
    let mut node = root;
    for key in parents {
        node = ensure_map(node)
            .entry((*key).to_string())
            .or_insert_with(|| Value::Object(Map::new()));
    }
    ensure_map(node).insert((*last).to_string(), value);
}

fn ensure_map(node: &mut Value) -> &mut Map<String, Value> {
    if !node.is_object() {
        *node = Value::Object(Map::new());
    }
    match node {
        Value::Object(map) => map,
        _ => unreachable!("node was just replaced with a map"),
    }
}

/// Recursively layers `top` over `base`: maps merge, everything else replaces.
pub fn deep_merge(base: &mut Value, top: &Value) {
    match (base, top) {
        (Value::Object(base), Value::Object(top)) => deep_merge_map(base, top),
        (base, top) => *base = top.clone(),
    }
}

pub fn deep_merge_map(base: &mut Map<String, Value>, top: &Map<String, Value>) {
    for (key, value) in top {
        match base.get_mut(key) {
            Some(existing) => deep_merge(existing, value),
            None => {
                base.insert(key.clone(), value.clone());
            }
        }
    }
}
