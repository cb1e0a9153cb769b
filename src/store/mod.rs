//! In-memory storage module
//!
//! Provides the core data structures for storing typed values in memory.
//! This module is independent of reply construction and command handling
//! (loose coupling).

mod memory;
mod value;

pub use memory::{MemoryStore, WrongType};
pub use value::{Map, Set, Value};
