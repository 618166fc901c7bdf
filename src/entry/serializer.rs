// Converts a payload graph into a JSON tree.
//
// Every shared node is emitted at most once per serialization: the first
// visit copies it, any later visit of the same node (through a cycle or a
// second path) is omitted. Map keys pointing at an already-seen node are
// dropped; list slots become null so positions are preserved.

use crate::domain::Payload;
use serde_json::{Map, Value};
use std::collections::HashSet;

#[derive(Debug, Default)]
pub struct EntrySerializer {
    seen: HashSet<usize>,
}

impl EntrySerializer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serializes one payload with a fresh identity cache.
    pub fn serialize(payload: &Payload) -> Value {
        Self::new().visit(payload).unwrap_or(Value::Null)
    }

    /// Serializes an optional payload; absent stays absent.
    pub fn serialize_opt(payload: Option<&Payload>) -> Option<Value> {
        payload.map(Self::serialize)
    }

    /// Walks the graph depth-first with an explicit frame stack, so nesting
    /// depth is bounded by the heap rather than the thread stack.
    fn visit(&mut self, payload: &Payload) -> Option<Value> {
        let mut stack = match self.open(payload) {
            Step::Value(value) => return value,
            Step::Nested(frame) => vec![frame],
        };
        while let Some(frame) = stack.last_mut() {
            if let Some(child) = frame.next_child() {
                match self.open(&child) {
                    Step::Value(value) => frame.accept(value),
                    Step::Nested(nested) => stack.push(nested),
                }
                continue;
            }
            let value = stack.pop().map(Frame::finish);
            match stack.last_mut() {
                Some(parent) => parent.accept(value),
                None => return value,
            }
        }
        None
    }

    /// Scalars become values directly; containers not seen before open a
    /// frame over a snapshot of their children.
    fn open(&mut self, payload: &Payload) -> Step {
        match payload {
            Payload::Null => Step::Value(Some(Value::Null)),
            Payload::Bool(b) => Step::Value(Some(Value::Bool(*b))),
            Payload::Number(n) => Step::Value(Some(Value::Number(n.clone()))),
            Payload::String(s) => Step::Value(Some(Value::String(s.clone()))),
            Payload::List(node) => {
                if !self.seen.insert(node.identity()) {
                    return Step::Value(None);
                }
                let items = node.read().clone();
                Step::Nested(Frame::List {
                    out: Vec::with_capacity(items.len()),
                    items: items.into_iter(),
                })
            }
            Payload::Map(node) => {
                if !self.seen.insert(node.identity()) {
                    return Step::Value(None);
                }
                let fields = node.read().clone();
                Step::Nested(Frame::Map {
                    out: Map::with_capacity(fields.len()),
                    fields: fields.into_iter(),
                    key: None,
                })
            }
        }
    }
}

enum Step {
    /// `None` marks a node that was already emitted.
    Value(Option<Value>),
    Nested(Frame),
}

/// A container being filled in.
enum Frame {
    List {
        items: std::vec::IntoIter<Payload>,
        out: Vec<Value>,
    },
    Map {
        fields: std::vec::IntoIter<(String, Payload)>,
        key: Option<String>,
        out: Map<String, Value>,
    },
}

impl Frame {
    fn next_child(&mut self) -> Option<Payload> {
        match self {
            Frame::List { items, .. } => items.next(),
            Frame::Map { fields, key, .. } => fields.next().map(|(name, value)| {
                *key = Some(name);
                value
            }),
        }
    }

    fn accept(&mut self, value: Option<Value>) {
        match self {
            Frame::List { out, .. } => out.push(value.unwrap_or(Value::Null)),
            Frame::Map { key, out, .. } => {
                if let (Some(name), Some(value)) = (key.take(), value) {
                    out.insert(name, value);
                }
            }
        }
    }

    fn finish(self) -> Value {
        match self {
            Frame::List { out, .. } => Value::Array(out),
            Frame::Map { out, .. } => Value::Object(out),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_self_reference_is_dropped() {
        let node = Payload::map();
        node.insert("name", "root");
        node.insert("me", node.clone());

        let out = EntrySerializer::serialize(&node);
        assert_eq!(out, json!({"name": "root"}));
    }

    #[test]
    fn test_shared_node_serialized_once() {
        let shared = Payload::map();
        shared.insert("v", 1i64);
        let root = Payload::map();
        root.insert("first", shared.clone());
        root.insert("second", shared);

        let out = EntrySerializer::serialize(&root);
        assert_eq!(out, json!({"first": {"v": 1}}));
    }

    #[test]
    fn test_equal_but_distinct_nodes_both_kept() {
        let root = Payload::map();
        root.insert("first", Payload::from(json!({"v": 1})));
        root.insert("second", Payload::from(json!({"v": 1})));

        let out = EntrySerializer::serialize(&root);
        assert_eq!(out, json!({"first": {"v": 1}, "second": {"v": 1}}));
    }

    #[test]
    fn test_repeated_list_slot_becomes_null() {
        let inner = Payload::list();
        inner.push(1i64);
        let outer = Payload::list();
        outer.push(inner.clone()).push(inner);

        let out = EntrySerializer::serialize(&outer);
        assert_eq!(out, json!([[1], null]));
    }

    #[test]
    fn test_indirect_cycle_terminates() {
        let a = Payload::map();
        let b = Payload::map();
        a.insert("b", b.clone());
        b.insert("a", a.clone());
        b.insert("label", "b");

        let out = EntrySerializer::serialize(&a);
        assert_eq!(out, json!({"b": {"label": "b"}}));
    }

    #[test]
    fn test_absent_payload_stays_absent() {
        assert_eq!(EntrySerializer::serialize_opt(None), None);
        assert_eq!(
            EntrySerializer::serialize_opt(Some(&Payload::Null)),
            Some(Value::Null)
        );
    }

    #[test]
    fn test_deep_nesting_does_not_exhaust_the_stack() {
        const DEPTH: usize = 100_000;
        let mut chain = Payload::map();
        for _ in 0..DEPTH {
            let parent = Payload::map();
            parent.insert("next", chain);
            chain = parent;
        }

        let out = EntrySerializer::serialize(&chain);
        let mut depth = 0;
        let mut cursor = &out;
        while let Some(next) = cursor.get("next") {
            depth += 1;
            cursor = next;
        }
        assert_eq!(depth, DEPTH);

        // Both trees drop recursively.
        std::mem::forget(out);
        std::mem::forget(chain);
    }

    #[test]
    fn test_order_is_preserved() {
        let root = Payload::map();
        root.insert("z", 1i64).insert("a", 2i64);
        let out = EntrySerializer::serialize(&root);
        let keys: Vec<_> = out.as_object().unwrap().keys().cloned().collect();
        assert_eq!(keys, vec!["z", "a"]);
    }
}
