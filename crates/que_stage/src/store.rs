//! Reactive store.
//!
//! Fields are only reachable through [`Store::get`] and [`Store::set`], so
//! every write is observed. A write that changes a field broadcasts one
//! [`ChangeEvent`] to every subscriber, synchronously and in subscription
//! order, before `set` returns. Subscribers may write back into the store;
//! the nested broadcast completes before the outer one resumes.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;

use que_carton::{CompactString, FxHashMap};
use que_relief::{EvalResult, Value};

/// Handle returned by [`Store::subscribe`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Subscriber = Rc<dyn Fn(&ChangeEvent) -> EvalResult<()>>;

/// A field change, delivered to every subscriber
pub struct ChangeEvent {
    pub target: Store,
    pub field: CompactString,
    pub value: Value,
}

impl fmt::Debug for ChangeEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChangeEvent")
            .field("field", &self.field)
            .field("value", &self.value)
            .finish_non_exhaustive()
    }
}

#[derive(Default)]
struct StoreInner {
    fields: RefCell<FxHashMap<CompactString, Value>>,
    subscribers: RefCell<Vec<(SubscriptionId, Subscriber)>>,
    next_id: Cell<u64>,
}

/// Shared handle to a field map with change notification.
///
/// Cloning the handle shares the same fields and subscribers.
#[derive(Clone, Default)]
pub struct Store {
    inner: Rc<StoreInner>,
}

impl Store {
    pub fn new<I, K, V>(fields: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<CompactString>,
        V: Into<Value>,
    {
        let store = Self::default();
        store.inner.fields.borrow_mut().extend(
            fields
                .into_iter()
                .map(|(name, value)| (name.into(), value.into())),
        );
        store
    }

    /// Build a store from a JSON object. Anything else yields an empty store.
    pub fn from_json(data: serde_json::Value) -> Self {
        match data {
            serde_json::Value::Object(map) => Self::new(map),
            serde_json::Value::Null => Self::default(),
            other => {
                let kind = Value::from(other).type_name();
                tracing::warn!(kind, "store data is not an object");
                Self::default()
            }
        }
    }

    /// Current value of `field`; missing fields are `undefined`
    pub fn get(&self, field: &str) -> Value {
        self.inner
            .fields
            .borrow()
            .get(field)
            .cloned()
            .unwrap_or_default()
    }

    pub fn contains(&self, field: &str) -> bool {
        self.inner.fields.borrow().contains_key(field)
    }

    /// Write `field` and broadcast the change.
    ///
    /// Writing a value strictly equal to the current one does nothing.
    /// Returns whether the field changed. Every subscriber runs even when
    /// one fails; the first error is returned and the new value stays
    /// written.
    pub fn set(&self, field: &str, value: impl Into<Value>) -> EvalResult<bool> {
        let value = value.into();
        {
            let mut fields = self.inner.fields.borrow_mut();
            let unchanged = match fields.get(field) {
                Some(old) => old.strict_eq(&value),
                None => value == Value::Undefined,
            };
            if unchanged {
                return Ok(false);
            }
            fields.insert(CompactString::from(field), value.clone());
        }
        self.broadcast(field, value)?;
        Ok(true)
    }

    /// Broadcast the current value of `field` without writing it
    pub fn notify(&self, field: &str) -> EvalResult<()> {
        self.broadcast(field, self.get(field))
    }

    fn broadcast(&self, field: &str, value: Value) -> EvalResult<()> {
        // Snapshot so subscribers can subscribe, unsubscribe or write
        let subscribers: Vec<Subscriber> = self
            .inner
            .subscribers
            .borrow()
            .iter()
            .map(|(_, subscriber)| Rc::clone(subscriber))
            .collect();
        tracing::trace!(field, subscribers = subscribers.len(), "broadcasting change");

        let event = ChangeEvent {
            target: self.clone(),
            field: CompactString::from(field),
            value,
        };
        let mut first_error = None;
        for subscriber in subscribers {
            if let Err(err) = subscriber(&event) {
                tracing::debug!(field, error = %err, "subscriber failed");
                if first_error.is_none() {
                    first_error = Some(err);
                }
            }
        }
        match first_error {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    /// Register a change subscriber
    pub fn subscribe(&self, subscriber: impl Fn(&ChangeEvent) -> EvalResult<()> + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.inner.next_id.get());
        self.inner.next_id.set(id.0 + 1);
        self.inner
            .subscribers
            .borrow_mut()
            .push((id, Rc::new(subscriber)));
        id
    }

    /// Remove a subscriber. Returns `false` if it was already gone.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut subscribers = self.inner.subscribers.borrow_mut();
        let before = subscribers.len();
        subscribers.retain(|(sub_id, _)| *sub_id != id);
        subscribers.len() != before
    }

    pub fn subscriber_count(&self) -> usize {
        self.inner.subscribers.borrow().len()
    }

    /// All fields, sorted by name
    pub fn snapshot(&self) -> Vec<(CompactString, Value)> {
        let mut fields: Vec<_> = self
            .inner
            .fields
            .borrow()
            .iter()
            .map(|(name, value)| (name.clone(), value.clone()))
            .collect();
        fields.sort_unstable_by(|a, b| a.0.cmp(&b.0));
        fields
    }

    /// Fields as a JSON object
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::Value::Object(
            self.snapshot()
                .into_iter()
                .map(|(name, value)| (name.to_string(), value.to_json()))
                .collect(),
        )
    }

    /// Whether both handles share the same fields
    pub fn ptr_eq(&self, other: &Store) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }
}

impl fmt::Debug for Store {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Store")
            .field("fields", &self.snapshot())
            .field("subscribers", &self.subscriber_count())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use que_relief::EvalError;

    fn recorder(store: &Store) -> Rc<RefCell<Vec<(String, Value)>>> {
        let events = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&events);
        store.subscribe(move |event| {
            sink.borrow_mut()
                .push((event.field.to_string(), event.value.clone()));
            Ok(())
        });
        events
    }

    #[test]
    fn test_get_and_set() {
        let store = Store::new([("count", 0)]);
        assert_eq!(store.get("count"), Value::from(0));
        assert_eq!(store.get("missing"), Value::Undefined);
        assert_eq!(store.set("count", 1), Ok(true));
        assert_eq!(store.get("count"), Value::from(1));
    }

    #[test]
    fn test_same_value_broadcasts_once() {
        let store = Store::new([("name", "Max")]);
        let events = recorder(&store);
        assert_eq!(store.set("name", "Lee"), Ok(true));
        assert_eq!(store.set("name", "Lee"), Ok(false));
        assert_eq!(*events.borrow(), vec![("name".to_string(), Value::from("Lee"))]);
    }

    #[test]
    fn test_dynamic_fields() {
        let store = Store::default();
        let events = recorder(&store);
        assert_eq!(store.set("ghost", Value::Undefined), Ok(false));
        assert_eq!(store.set("fresh", true), Ok(true));
        assert!(store.contains("fresh"));
        assert_eq!(events.borrow().len(), 1);
    }

    #[test]
    fn test_target_is_the_store() {
        let store = Store::new([("a", 1)]);
        let seen = Rc::new(Cell::new(false));
        let flag = Rc::clone(&seen);
        let handle = store.clone();
        store.subscribe(move |event| {
            flag.set(event.target.ptr_eq(&handle));
            Ok(())
        });
        store.set("a", 2).unwrap();
        assert!(seen.get());
    }

    #[test]
    fn test_subscription_order_and_reentrancy() {
        let store = Store::new([("a", 0), ("b", 0)]);
        let log = Rc::new(RefCell::new(Vec::new()));

        let first = Rc::clone(&log);
        store.subscribe(move |event| {
            first.borrow_mut().push(format!("first:{}", event.field));
            if event.field == "a" {
                event.target.set("b", 1)?;
            }
            Ok(())
        });
        let second = Rc::clone(&log);
        store.subscribe(move |event| {
            second.borrow_mut().push(format!("second:{}", event.field));
            Ok(())
        });

        store.set("a", 1).unwrap();
        assert_eq!(
            *log.borrow(),
            vec!["first:a", "first:b", "second:b", "second:a"]
        );
    }

    #[test]
    fn test_unsubscribe() {
        let store = Store::new([("a", 0)]);
        let events = Rc::new(Cell::new(0));
        let counter = Rc::clone(&events);
        let id = store.subscribe(move |_| {
            counter.set(counter.get() + 1);
            Ok(())
        });
        store.set("a", 1).unwrap();
        assert!(store.unsubscribe(id));
        assert!(!store.unsubscribe(id));
        store.set("a", 2).unwrap();
        assert_eq!(events.get(), 1);
        assert_eq!(store.subscriber_count(), 0);
    }

    #[test]
    fn test_subscriber_error_does_not_stop_broadcast() {
        let store = Store::new([("a", 0)]);
        store.subscribe(|_| Err(EvalError::method_not_found("boom")));
        store.subscribe(|_| Err(EvalError::method_not_found("bang")));
        let events = recorder(&store);

        assert_eq!(store.set("a", 1), Err(EvalError::method_not_found("boom")));
        assert_eq!(store.get("a"), Value::from(1));
        assert_eq!(*events.borrow(), vec![("a".to_string(), Value::from(1))]);
    }

    #[test]
    fn test_notify() {
        let store = Store::new([("a", 5)]);
        let events = recorder(&store);
        store.notify("a").unwrap();
        assert_eq!(*events.borrow(), vec![("a".to_string(), Value::from(5))]);
    }

    #[test]
    fn test_from_json() {
        let store = Store::from_json(serde_json::json!({ "name": "Max", "tags": ["a"] }));
        assert_eq!(store.get("name"), Value::from("Max"));
        assert_eq!(store.get("tags").to_string(), "a");
        assert_eq!(
            store.to_json(),
            serde_json::json!({ "name": "Max", "tags": ["a"] })
        );
        assert!(Store::from_json(serde_json::json!(3)).snapshot().is_empty());
    }
}
