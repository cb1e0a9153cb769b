//! Command execution context

use crate::picker::{RandomPicker, DEFAULT_SEED};
use crate::store::MemoryStore;

/// Context provided to commands during execution
///
/// This context gives commands access to the store and the random-pick
/// source. Both live behind the executor's lock, so everything a handler
/// touches through the context mutates atomically with the command.
pub struct CommandContext {
    /// The memory store
    pub store: MemoryStore,

    /// Pick stream for SPOP / SRANDMEMBER / HRANDFIELD / ZRANDMEMBER
    pub picker: RandomPicker,
}

impl CommandContext {
    /// Create a new command context with the default pick seed
    pub fn new() -> Self {
        Self::with_seed(DEFAULT_SEED)
    }

    /// Create a context whose pick stream starts from `seed`
    pub fn with_seed(seed: u64) -> Self {
        CommandContext {
            store: MemoryStore::new(),
            picker: RandomPicker::new(seed),
        }
    }
}

impl Default for CommandContext {
    fn default() -> Self {
        Self::new()
    }
}
