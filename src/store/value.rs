//! Value types for the key-value store

use bytes::Bytes;
use siphasher::sip::SipHasher13;
use std::collections::{HashMap, HashSet, VecDeque};
use std::hash::BuildHasherDefault;

/// Hash map with a deterministic hasher, so iteration order is stable for
/// a given insertion sequence
pub type Map<K, V> = HashMap<K, V, BuildHasherDefault<SipHasher13>>;

/// Hash set with the same deterministic hasher
pub type Set<T> = HashSet<T, BuildHasherDefault<SipHasher13>>;

/// Represents the different types of values that can be stored
///
/// Each variant is one keyspace namespace; a key holds at most one variant
/// at a time, which is what makes WRONGTYPE checks a single match.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// String value (binary-safe)
    String(Bytes),

    /// List of values (ordered, indexable from both ends)
    List(VecDeque<Bytes>),

    /// Set of unique values (unordered)
    Set(Set<Bytes>),

    /// Hash map (field -> value)
    Hash(Map<Bytes, Bytes>),

    /// Sorted set (member -> score), re-sorted on each query
    SortedSet(Map<Bytes, f64>),

    /// HyperLogLog, modeled as an exact set in its own namespace
    HyperLogLog(Set<Bytes>),
}

impl Value {
    /// Create a string value
    pub fn string(bytes: impl Into<Bytes>) -> Self {
        Value::String(bytes.into())
    }

    /// Create an empty list
    pub fn empty_list() -> Self {
        Value::List(VecDeque::new())
    }

    /// Create an empty set
    pub fn empty_set() -> Self {
        Value::Set(Set::default())
    }

    /// Create an empty hash
    pub fn empty_hash() -> Self {
        Value::Hash(Map::default())
    }

    /// Create an empty sorted set
    pub fn empty_sorted_set() -> Self {
        Value::SortedSet(Map::default())
    }

    /// Create an empty HyperLogLog
    pub fn empty_hll() -> Self {
        Value::HyperLogLog(Set::default())
    }

    /// Get the type name as reported by TYPE
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::String(_) => "string",
            Value::List(_) => "list",
            Value::Set(_) => "set",
            Value::Hash(_) => "hash",
            Value::SortedSet(_) => "zset",
            Value::HyperLogLog(_) => "hll",
        }
    }

    /// Try to get as string bytes
    pub fn as_string(&self) -> Option<&Bytes> {
        match self {
            Value::String(b) => Some(b),
            _ => None,
        }
    }

    /// Try to get as list reference
    pub fn as_list(&self) -> Option<&VecDeque<Bytes>> {
        match self {
            Value::List(list) => Some(list),
            _ => None,
        }
    }

    /// Try to get as mutable list
    pub fn as_list_mut(&mut self) -> Option<&mut VecDeque<Bytes>> {
        match self {
            Value::List(list) => Some(list),
            _ => None,
        }
    }

    /// Try to get as set reference
    pub fn as_set(&self) -> Option<&Set<Bytes>> {
        match self {
            Value::Set(set) => Some(set),
            _ => None,
        }
    }

    /// Try to get as mutable set
    pub fn as_set_mut(&mut self) -> Option<&mut Set<Bytes>> {
        match self {
            Value::Set(set) => Some(set),
            _ => None,
        }
    }

    /// Try to get as hash reference
    pub fn as_hash(&self) -> Option<&Map<Bytes, Bytes>> {
        match self {
            Value::Hash(hash) => Some(hash),
            _ => None,
        }
    }

    /// Try to get as mutable hash
    pub fn as_hash_mut(&mut self) -> Option<&mut Map<Bytes, Bytes>> {
        match self {
            Value::Hash(hash) => Some(hash),
            _ => None,
        }
    }

    /// Try to get as sorted set reference
    pub fn as_sorted_set(&self) -> Option<&Map<Bytes, f64>> {
        match self {
            Value::SortedSet(zset) => Some(zset),
            _ => None,
        }
    }

    /// Try to get as mutable sorted set
    pub fn as_sorted_set_mut(&mut self) -> Option<&mut Map<Bytes, f64>> {
        match self {
            Value::SortedSet(zset) => Some(zset),
            _ => None,
        }
    }

    /// Try to get as HyperLogLog reference
    pub fn as_hll(&self) -> Option<&Set<Bytes>> {
        match self {
            Value::HyperLogLog(set) => Some(set),
            _ => None,
        }
    }

    /// Try to get as mutable HyperLogLog
    pub fn as_hll_mut(&mut self) -> Option<&mut Set<Bytes>> {
        match self {
            Value::HyperLogLog(set) => Some(set),
            _ => None,
        }
    }
}
