//! In-memory storage implementation

use super::value::{Map, Set, Value};
use bytes::Bytes;
use siphasher::sip::SipHasher13;
use std::collections::{HashMap, VecDeque};
use std::hash::BuildHasherDefault;
use thiserror::Error;

/// Type alias for our keyspace map with SipHasher
type StoreMap = HashMap<Bytes, Value, BuildHasherDefault<SipHasher13>>;

/// A key was addressed through the wrong namespace
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("WRONGTYPE Operation against a key holding the wrong kind of value")]
pub struct WrongType;

/// In-memory key-value store over six typed namespaces
///
/// A key is present in at most one namespace at a time. The typed
/// accessors below enforce that: reading or writing a key through the
/// wrong namespace yields `WrongType`, a missing key reads as `None`
/// (observationally an empty container), and the `*_mut` accessors
/// create an empty container on first write.
pub struct MemoryStore {
    /// The main storage map
    store: StoreMap,
}

impl MemoryStore {
    /// Create a new memory store with default capacity
    pub fn new() -> Self {
        Self::with_capacity(1024)
    }

    /// Create a new memory store with specified initial capacity
    pub fn with_capacity(capacity: usize) -> Self {
        MemoryStore {
            store: HashMap::with_capacity_and_hasher(
                capacity,
                BuildHasherDefault::<SipHasher13>::default(),
            ),
        }
    }

    /// Get a value by key regardless of namespace
    pub fn get(&self, key: &Bytes) -> Option<&Value> {
        self.store.get(key)
    }

    /// Overwrite a key with a value, replacing whatever namespace held it
    pub fn put(&mut self, key: impl Into<Bytes>, value: Value) {
        self.store.insert(key.into(), value);
    }

    /// Delete a key, returns true if the key existed
    pub fn delete(&mut self, key: &Bytes) -> bool {
        self.store.remove(key).is_some()
    }

    /// Check if a key exists in any namespace
    pub fn exists(&self, key: &Bytes) -> bool {
        self.store.contains_key(key)
    }

    /// Remove all keys
    pub fn clear(&mut self) {
        self.store.clear();
    }

    /// Get the number of keys across all namespaces
    pub fn len(&self) -> usize {
        self.store.len()
    }

    /// Check if the store is empty
    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    /// Get all keys (expensive operation, for KEYS)
    pub fn keys(&self) -> Vec<Bytes> {
        self.store.keys().cloned().collect()
    }

    /// Read a string value
    pub fn string(&self, key: &Bytes) -> Result<Option<&Bytes>, WrongType> {
        match self.store.get(key) {
            Some(value) => value.as_string().map(Some).ok_or(WrongType),
            None => Ok(None),
        }
    }

    /// Write a string value, guarding the namespace
    pub fn put_string(&mut self, key: impl Into<Bytes>, value: Bytes) -> Result<(), WrongType> {
        let key = key.into();
        match self.store.get(&key) {
            Some(existing) if existing.as_string().is_none() => Err(WrongType),
            _ => {
                self.store.insert(key, Value::String(value));
                Ok(())
            }
        }
    }

    /// Read a list
    pub fn list(&self, key: &Bytes) -> Result<Option<&VecDeque<Bytes>>, WrongType> {
        match self.store.get(key) {
            Some(value) => value.as_list().map(Some).ok_or(WrongType),
            None => Ok(None),
        }
    }

    /// Get a mutable list, creating an empty one on first write
    pub fn list_mut(&mut self, key: &Bytes) -> Result<&mut VecDeque<Bytes>, WrongType> {
        self.store
            .entry(key.clone())
            .or_insert_with(Value::empty_list)
            .as_list_mut()
            .ok_or(WrongType)
    }

    /// Read a set
    pub fn set(&self, key: &Bytes) -> Result<Option<&Set<Bytes>>, WrongType> {
        match self.store.get(key) {
            Some(value) => value.as_set().map(Some).ok_or(WrongType),
            None => Ok(None),
        }
    }

    /// Get a mutable set, creating an empty one on first write
    pub fn set_mut(&mut self, key: &Bytes) -> Result<&mut Set<Bytes>, WrongType> {
        self.store
            .entry(key.clone())
            .or_insert_with(Value::empty_set)
            .as_set_mut()
            .ok_or(WrongType)
    }

    /// Read a hash
    pub fn hash(&self, key: &Bytes) -> Result<Option<&Map<Bytes, Bytes>>, WrongType> {
        match self.store.get(key) {
            Some(value) => value.as_hash().map(Some).ok_or(WrongType),
            None => Ok(None),
        }
    }

    /// Get a mutable hash, creating an empty one on first write
    pub fn hash_mut(&mut self, key: &Bytes) -> Result<&mut Map<Bytes, Bytes>, WrongType> {
        self.store
            .entry(key.clone())
            .or_insert_with(Value::empty_hash)
            .as_hash_mut()
            .ok_or(WrongType)
    }

    /// Read a sorted set
    pub fn sorted_set(&self, key: &Bytes) -> Result<Option<&Map<Bytes, f64>>, WrongType> {
        match self.store.get(key) {
            Some(value) => value.as_sorted_set().map(Some).ok_or(WrongType),
            None => Ok(None),
        }
    }

    /// Get a mutable sorted set, creating an empty one on first write
    pub fn sorted_set_mut(&mut self, key: &Bytes) -> Result<&mut Map<Bytes, f64>, WrongType> {
        self.store
            .entry(key.clone())
            .or_insert_with(Value::empty_sorted_set)
            .as_sorted_set_mut()
            .ok_or(WrongType)
    }

    /// Read a HyperLogLog
    pub fn hll(&self, key: &Bytes) -> Result<Option<&Set<Bytes>>, WrongType> {
        match self.store.get(key) {
            Some(value) => value.as_hll().map(Some).ok_or(WrongType),
            None => Ok(None),
        }
    }

    /// Get a mutable HyperLogLog, creating an empty one on first write
    pub fn hll_mut(&mut self, key: &Bytes) -> Result<&mut Set<Bytes>, WrongType> {
        self.store
            .entry(key.clone())
            .or_insert_with(Value::empty_hll)
            .as_hll_mut()
            .ok_or(WrongType)
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_put_get() {
        let mut store = MemoryStore::new();
        store.put("key1", Value::string("value1"));

        let value = store.get(&Bytes::from("key1")).unwrap();
        assert_eq!(value.as_string().unwrap(), &Bytes::from("value1"));
    }

    #[test]
    fn test_delete() {
        let mut store = MemoryStore::new();
        store.put("key1", Value::string("value1"));

        assert!(store.delete(&Bytes::from("key1")));
        assert!(!store.exists(&Bytes::from("key1")));
    }

    #[test]
    fn test_missing_reads_as_none() {
        let store = MemoryStore::new();
        assert_eq!(store.list(&Bytes::from("nope")), Ok(None));
        assert_eq!(store.set(&Bytes::from("nope")), Ok(None));
        assert_eq!(store.hash(&Bytes::from("nope")), Ok(None));
        assert_eq!(store.sorted_set(&Bytes::from("nope")), Ok(None));
    }

    #[test]
    fn test_namespace_exclusivity() {
        let mut store = MemoryStore::new();
        let key = Bytes::from("key1");
        store.put_string(key.clone(), Bytes::from("v")).unwrap();

        assert_eq!(store.list(&key), Err(WrongType));
        assert_eq!(store.list_mut(&key), Err(WrongType));
        assert_eq!(store.set_mut(&key), Err(WrongType));
        assert_eq!(store.hash_mut(&key), Err(WrongType));
        assert_eq!(store.sorted_set_mut(&key), Err(WrongType));
        assert_eq!(store.hll_mut(&key), Err(WrongType));

        // A string write over a list key is refused too
        let list_key = Bytes::from("mylist");
        store.list_mut(&list_key).unwrap().push_back(Bytes::from("a"));
        assert_eq!(
            store.put_string(list_key.clone(), Bytes::from("v")),
            Err(WrongType)
        );
    }

    #[test]
    fn test_mut_accessor_creates_container() {
        let mut store = MemoryStore::new();
        let key = Bytes::from("mylist");

        store.list_mut(&key).unwrap().push_back(Bytes::from("a"));
        assert_eq!(store.list(&key).unwrap().map(|l| l.len()), Some(1));
    }

    #[test]
    fn test_hll_disjoint_from_set() {
        let mut store = MemoryStore::new();
        let key = Bytes::from("counted");

        store.hll_mut(&key).unwrap().insert(Bytes::from("a"));
        assert_eq!(store.set(&key), Err(WrongType));
        assert_eq!(store.set_mut(&key), Err(WrongType));
    }
}
