//! Observable key/value state shared by every binding.

use crate::value::Value;
use indexmap::IndexMap;
use log::trace;
use serde_json::{Map, Value as Json};

/// Receives one notification per store write.
///
/// The store is only lent out shared, so a sink can read every variable but
/// cannot write back into the store while it is being notified.
pub trait ChangeSink {
    fn notify(&mut self, key: &str, store: &Store);
}

impl<F> ChangeSink for F
where
    F: FnMut(&str, &Store),
{
    fn notify(&mut self, key: &str, store: &Store) {
        self(key, store);
    }
}

/// Variables in first-write order.
#[derive(Clone, Debug, Default)]
pub struct Store {
    values: IndexMap<String, Value>,
}

impl Store {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    /// Store `value` under `key`, then notify `sink` exactly once, whether or
    /// not the value changed.
    pub fn set(&mut self, key: &str, value: Value, sink: &mut dyn ChangeSink) {
        trace!("store: {key} = {value}");
        self.values.insert(key.to_owned(), value);
        sink.notify(key, self);
    }

    /// Resolve `name.nested.path` from the store root. A missing variable or
    /// property at any step, or a step through `null`, is `Undefined`.
    ///
    /// A variable whose name is the whole path (written by `setz="a.b:..."`)
    /// wins over walking into `a`, matching what an update of that key renders.
    pub fn resolve_path(&self, path: &str) -> Value {
        if let Some(whole) = self.get(path) {
            return whole.clone();
        }
        let mut segments = path.split('.');
        let Some(mut current) = segments.next().and_then(|root| self.get(root)).cloned() else {
            return Value::Undefined;
        };
        for segment in segments {
            let Some(next) = current.property(segment) else {
                return Value::Undefined;
            };
            current = next;
        }
        current
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.values.iter().map(|(key, value)| (key.as_str(), value))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Snapshot as a JSON object in first-write order.
    pub fn to_json(&self) -> Json {
        let mut map = Map::new();
        for (key, value) in &self.values {
            map.insert(key.clone(), value.to_json());
        }
        Json::Object(map)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn every_set_notifies_once_in_order() {
        let mut store = Store::new();
        let mut seen: Vec<(String, String)> = Vec::new();
        let mut record = |key: &str, snapshot: &Store| {
            let value = snapshot.get(key).map(Value::to_js_string).unwrap_or_default();
            seen.push((key.to_owned(), value));
        };
        store.set("a", Value::from(1), &mut record);
        store.set("a", Value::from(1), &mut record);
        store.set("b", Value::from("x"), &mut record);
        store.set("a", Value::from(2), &mut record);
        assert_eq!(
            seen,
            vec![
                (String::from("a"), String::from("1")),
                (String::from("a"), String::from("1")),
                (String::from("b"), String::from("x")),
                (String::from("a"), String::from("2")),
            ]
        );
    }

    #[test]
    fn keys_keep_first_write_order() {
        let mut store = Store::new();
        let mut ignore = |_: &str, _: &Store| {};
        store.set("z", Value::from(1), &mut ignore);
        store.set("a", Value::Undefined, &mut ignore);
        store.set("z", Value::Number(f64::NAN), &mut ignore);
        assert_eq!(store.keys().collect::<Vec<_>>(), vec!["z", "a"]);
        assert_eq!(store.len(), 2);
        assert_eq!(store.to_json(), json!({"z": null, "a": null}));
    }

    #[test]
    fn resolves_nested_paths() {
        let mut store = Store::new();
        let mut ignore = |_: &str, _: &Store| {};
        store.set(
            "user",
            Value::from_json(json!({"name": "Ada", "address": null})),
            &mut ignore,
        );
        assert_eq!(store.resolve_path("user.name"), Value::from("Ada"));
        assert_eq!(store.resolve_path("user.missing"), Value::Undefined);
        assert_eq!(store.resolve_path("user.address.city"), Value::Undefined);
        assert_eq!(store.resolve_path("nobody.name"), Value::Undefined);

        store.set("user.name", Value::from("Grace"), &mut ignore);
        assert_eq!(store.resolve_path("user.name"), Value::from("Grace"));
        assert_eq!(store.resolve_path("user.address"), Value::Null);
    }
}
