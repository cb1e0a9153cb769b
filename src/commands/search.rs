//! Search commands (KEYS)

use super::{glob_to_regex, Command, CommandContext};
use crate::protocol::Reply;
use bytes::Bytes;

/// KEYS command - Find all keys matching a pattern
///
/// Syntax: KEYS pattern
///
/// The pattern dialect is the same one *SCAN MATCH uses: a bare `*`
/// wildcard, every other character literal.
pub struct KeysCommand;

impl Command for KeysCommand {
    fn execute(&self, ctx: &mut CommandContext, args: &[Bytes]) -> Reply {
        let pattern = match glob_to_regex(&args[0]) {
            Ok(re) => re,
            Err(e) => return e,
        };

        let mut keys = ctx.store.keys();
        keys.sort();

        let matching: Vec<Reply> = keys
            .into_iter()
            .filter(|key| match std::str::from_utf8(key) {
                Ok(s) => pattern.is_match(s),
                Err(_) => false,
            })
            .map(Reply::bulk_string)
            .collect();

        Reply::array(matching)
    }

    fn name(&self) -> &'static str {
        "KEYS"
    }

    fn min_args(&self) -> usize {
        1
    }

    fn max_args(&self) -> Option<usize> {
        Some(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::Value;

    #[test]
    fn test_keys_all() {
        let mut ctx = CommandContext::new();
        ctx.store.put("key1", Value::string("value1"));
        ctx.store.put("key2", Value::string("value2"));
        ctx.store.put("name", Value::string("Alice"));

        let result = KeysCommand.execute(&mut ctx, &[Bytes::from("*")]);
        assert_eq!(result.as_array().map(|a| a.len()), Some(3));
    }

    #[test]
    fn test_keys_prefix() {
        let mut ctx = CommandContext::new();
        ctx.store.put("user:1", Value::string("Alice"));
        ctx.store.put("user:2", Value::string("Bob"));
        ctx.store.put("session:1", Value::string("xyz"));

        let result = KeysCommand.execute(&mut ctx, &[Bytes::from("user:*")]);
        assert_eq!(
            result,
            Reply::array(vec![
                Reply::bulk_string("user:1"),
                Reply::bulk_string("user:2"),
            ])
        );
    }

    #[test]
    fn test_keys_exact_and_literal_metachars() {
        let mut ctx = CommandContext::new();
        ctx.store.put("exact.key", Value::string("1"));
        ctx.store.put("exactXkey", Value::string("2"));

        let result = KeysCommand.execute(&mut ctx, &[Bytes::from("exact.key")]);
        assert_eq!(result, Reply::array(vec![Reply::bulk_string("exact.key")]));
    }
}
