//! Command registry
//!
//! Centralized registry for all available commands. This allows loose
//! coupling between command implementations and the dispatcher.

use super::{admin, connection, counter, hash, hll, key, list, search, set, string, zset, Command};
use std::collections::HashMap;
use std::sync::Arc;

/// Registry of all available commands
pub struct CommandRegistry {
    commands: HashMap<String, Arc<dyn Command>>,
}

impl CommandRegistry {
    /// Create a new command registry and register all commands
    pub fn new() -> Self {
        let mut registry = CommandRegistry {
            commands: HashMap::new(),
        };

        // Register connection commands
        registry.register(Arc::new(connection::PingCommand));
        registry.register(Arc::new(connection::EchoCommand));
        registry.register(Arc::new(connection::AuthCommand));
        registry.register(Arc::new(connection::SelectCommand));

        // Register string commands
        registry.register(Arc::new(string::SetCommand));
        registry.register(Arc::new(string::GetCommand));
        registry.register(Arc::new(string::AppendCommand));

        // Register counter commands
        registry.register(Arc::new(counter::IncrCommand));
        registry.register(Arc::new(counter::IncrByCommand));
        registry.register(Arc::new(counter::DecrCommand));
        registry.register(Arc::new(counter::DecrByCommand));

        // Register key commands
        registry.register(Arc::new(key::DelCommand));
        registry.register(Arc::new(key::ExistsCommand));
        registry.register(Arc::new(key::TypeCommand));

        // Register list commands
        registry.register(Arc::new(list::LPushCommand));
        registry.register(Arc::new(list::RPushCommand));
        registry.register(Arc::new(list::LPushXCommand));
        registry.register(Arc::new(list::RPushXCommand));
        registry.register(Arc::new(list::LPopCommand));
        registry.register(Arc::new(list::RPopCommand));
        registry.register(Arc::new(list::LLenCommand));
        registry.register(Arc::new(list::LRangeCommand));
        registry.register(Arc::new(list::LIndexCommand));
        registry.register(Arc::new(list::LInsertCommand));
        registry.register(Arc::new(list::LRemCommand));
        registry.register(Arc::new(list::LSetCommand));
        registry.register(Arc::new(list::LTrimCommand));
        registry.register(Arc::new(list::RPoplPushCommand));
        registry.register(Arc::new(list::LMoveCommand));
        registry.register(Arc::new(list::LPosCommand));

        // Register set commands
        registry.register(Arc::new(set::SAddCommand));
        registry.register(Arc::new(set::SRemCommand));
        registry.register(Arc::new(set::SCardCommand));
        registry.register(Arc::new(set::SIsMemberCommand));
        registry.register(Arc::new(set::SMembersCommand));
        registry.register(Arc::new(set::SDiffCommand));
        registry.register(Arc::new(set::SDiffStoreCommand));
        registry.register(Arc::new(set::SInterCommand));
        registry.register(Arc::new(set::SInterStoreCommand));
        registry.register(Arc::new(set::SUnionCommand));
        registry.register(Arc::new(set::SUnionStoreCommand));
        registry.register(Arc::new(set::SMoveCommand));
        registry.register(Arc::new(set::SPopCommand));
        registry.register(Arc::new(set::SRandMemberCommand));
        registry.register(Arc::new(set::SScanCommand));

        // Register hash commands
        registry.register(Arc::new(hash::HSetCommand));
        registry.register(Arc::new(hash::HMSetCommand));
        registry.register(Arc::new(hash::HSetNxCommand));
        registry.register(Arc::new(hash::HGetCommand));
        registry.register(Arc::new(hash::HMGetCommand));
        registry.register(Arc::new(hash::HDelCommand));
        registry.register(Arc::new(hash::HExistsCommand));
        registry.register(Arc::new(hash::HKeysCommand));
        registry.register(Arc::new(hash::HValsCommand));
        registry.register(Arc::new(hash::HLenCommand));
        registry.register(Arc::new(hash::HGetAllCommand));
        registry.register(Arc::new(hash::HStrLenCommand));
        registry.register(Arc::new(hash::HIncrByCommand));
        registry.register(Arc::new(hash::HIncrByFloatCommand));
        registry.register(Arc::new(hash::HScanCommand));
        registry.register(Arc::new(hash::HRandFieldCommand));

        // Register sorted set commands
        registry.register(Arc::new(zset::ZAddCommand));
        registry.register(Arc::new(zset::ZRemCommand));
        registry.register(Arc::new(zset::ZCardCommand));
        registry.register(Arc::new(zset::ZCountCommand));
        registry.register(Arc::new(zset::ZScoreCommand));
        registry.register(Arc::new(zset::ZMScoreCommand));
        registry.register(Arc::new(zset::ZRankCommand));
        registry.register(Arc::new(zset::ZRevRankCommand));
        registry.register(Arc::new(zset::ZIncrByCommand));
        registry.register(Arc::new(zset::ZRangeCommand));
        registry.register(Arc::new(zset::ZRevRangeCommand));
        registry.register(Arc::new(zset::ZRangeByScoreCommand));
        registry.register(Arc::new(zset::ZRevRangeByScoreCommand));
        registry.register(Arc::new(zset::ZRangeByLexCommand));
        registry.register(Arc::new(zset::ZRevRangeByLexCommand));
        registry.register(Arc::new(zset::ZLexCountCommand));
        registry.register(Arc::new(zset::ZRemRangeByRankCommand));
        registry.register(Arc::new(zset::ZRemRangeByScoreCommand));
        registry.register(Arc::new(zset::ZRemRangeByLexCommand));
        registry.register(Arc::new(zset::ZPopMinCommand));
        registry.register(Arc::new(zset::ZPopMaxCommand));
        registry.register(Arc::new(zset::ZDiffCommand));
        registry.register(Arc::new(zset::ZDiffStoreCommand));
        registry.register(Arc::new(zset::ZInterCommand));
        registry.register(Arc::new(zset::ZInterStoreCommand));
        registry.register(Arc::new(zset::ZUnionCommand));
        registry.register(Arc::new(zset::ZUnionStoreCommand));
        registry.register(Arc::new(zset::ZRandMemberCommand));
        registry.register(Arc::new(zset::ZScanCommand));

        // Register HyperLogLog commands
        registry.register(Arc::new(hll::PfAddCommand));
        registry.register(Arc::new(hll::PfCountCommand));
        registry.register(Arc::new(hll::PfMergeCommand));

        // Register admin commands
        registry.register(Arc::new(admin::FlushDbCommand));
        registry.register(Arc::new(admin::DbSizeCommand));

        // Register search commands
        registry.register(Arc::new(search::KeysCommand));

        registry
    }

    /// Register a command
    fn register(&mut self, command: Arc<dyn Command>) {
        let name = command.name().to_uppercase();
        self.commands.insert(name, command);
    }

    /// Get a command by name (case-insensitive)
    pub fn get(&self, name: &str) -> Option<Arc<dyn Command>> {
        self.commands.get(&name.to_uppercase()).cloned()
    }

    /// Check if a command exists
    pub fn has_command(&self, name: &str) -> bool {
        self.commands.contains_key(&name.to_uppercase())
    }

    /// Get all command names
    pub fn command_names(&self) -> Vec<String> {
        self.commands.keys().cloned().collect()
    }
}

impl Default for CommandRegistry {
    fn default() -> Self {
        Self::new()
    }
}
