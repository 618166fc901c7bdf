use parking_lot::RwLock;
use serde_json::{Number, Value};
use std::sync::Arc;

/// A shared, interior-mutable node of a payload graph.
///
/// Cloning a `Node` aliases it; identity is the address of the shared cell.
#[derive(Debug)]
pub struct Node<T>(Arc<RwLock<T>>);

impl<T> Clone for Node<T> {
    fn clone(&self) -> Self {
        Node(Arc::clone(&self.0))
    }
}

impl<T> Node<T> {
    fn new(inner: T) -> Self {
        Node(Arc::new(RwLock::new(inner)))
    }

    pub(crate) fn identity(&self) -> usize {
        Arc::as_ptr(&self.0) as *const () as usize
    }

    pub(crate) fn read(&self) -> parking_lot::RwLockReadGuard<'_, T> {
        self.0.read()
    }

    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

/// Caller-supplied log data.
///
/// `List` and `Map` are shared nodes, so the same object may be reachable
/// through several paths, or even through itself. The entry serializer turns
/// such a graph into a plain JSON tree.
#[derive(Debug, Clone)]
pub enum Payload {
    Null,
    Bool(bool),
    Number(Number),
    String(String),
    List(Node<Vec<Payload>>),
    Map(Node<Vec<(String, Payload)>>),
}

impl Payload {
    /// A fresh, empty map node.
    pub fn map() -> Self {
        Payload::Map(Node::new(Vec::new()))
    }

    /// A fresh, empty list node.
    pub fn list() -> Self {
        Payload::List(Node::new(Vec::new()))
    }

    /// Sets `key` on a map node, replacing an existing value. No-op on other variants.
    pub fn insert(&self, key: impl Into<String>, value: impl Into<Payload>) -> &Self {
        if let Payload::Map(node) = self {
            let key = key.into();
            let value = value.into();
            let mut fields = node.0.write();
            match fields.iter_mut().find(|(k, _)| *k == key) {
                Some(slot) => slot.1 = value,
                None => fields.push((key, value)),
            }
        }
        self
    }

    /// Appends to a list node. No-op on other variants.
    pub fn push(&self, value: impl Into<Payload>) -> &Self {
        if let Payload::List(node) = self {
            node.0.write().push(value.into());
        }
        self
    }

    /// Reads a field of a map node.
    pub fn get(&self, key: &str) -> Option<Payload> {
        match self {
            Payload::Map(node) => node
                .read()
                .iter()
                .find(|(k, _)| k == key)
                .map(|(_, v)| v.clone()),
            _ => None,
        }
    }

    /// True when both values are the same shared node.
    pub fn same_node(&self, other: &Payload) -> bool {
        match (self, other) {
            (Payload::Map(a), Payload::Map(b)) => a.ptr_eq(b),
            (Payload::List(a), Payload::List(b)) => a.ptr_eq(b),
            _ => false,
        }
    }

    /// Captures an error as `{ "message": .., "sources": [..] }`.
    pub fn from_error(err: &(dyn std::error::Error + 'static)) -> Self {
        let payload = Payload::map();
        payload.insert("message", err.to_string());
        let sources = Payload::list();
        let mut source = err.source();
        while let Some(cause) = source {
            sources.push(cause.to_string());
            source = cause.source();
        }
        payload.insert("sources", sources);
        payload
    }
}

impl From<Value> for Payload {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => Payload::Null,
            Value::Bool(b) => Payload::Bool(b),
            Value::Number(n) => Payload::Number(n),
            Value::String(s) => Payload::String(s),
            Value::Array(items) => {
                Payload::List(Node::new(items.into_iter().map(Payload::from).collect()))
            }
            Value::Object(fields) => Payload::Map(Node::new(
                fields
                    .into_iter()
                    .map(|(k, v)| (k, Payload::from(v)))
                    .collect(),
            )),
        }
    }
}

impl From<&str> for Payload {
    fn from(s: &str) -> Self {
        Payload::String(s.to_string())
    }
}

impl From<String> for Payload {
    fn from(s: String) -> Self {
        Payload::String(s)
    }
}

impl From<bool> for Payload {
    fn from(b: bool) -> Self {
        Payload::Bool(b)
    }
}

impl From<i64> for Payload {
    fn from(n: i64) -> Self {
        Payload::Number(n.into())
    }
}

impl From<u64> for Payload {
    fn from(n: u64) -> Self {
        Payload::Number(n.into())
    }
}

impl From<f64> for Payload {
    fn from(n: f64) -> Self {
        Number::from_f64(n).map_or(Payload::Null, Payload::Number)
    }
}
