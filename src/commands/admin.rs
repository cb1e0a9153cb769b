//! Admin commands (FLUSHDB, DBSIZE)

use super::{Command, CommandContext};
use crate::protocol::Reply;
use bytes::Bytes;

/// FLUSHDB command - Remove every key from every namespace
///
/// Syntax: FLUSHDB
pub struct FlushDbCommand;

impl Command for FlushDbCommand {
    fn execute(&self, ctx: &mut CommandContext, _args: &[Bytes]) -> Reply {
        ctx.store.clear();
        Reply::ok()
    }

    fn name(&self) -> &'static str {
        "FLUSHDB"
    }

    fn max_args(&self) -> Option<usize> {
        Some(0)
    }
}

/// DBSIZE command - Number of keys in the store
///
/// Syntax: DBSIZE
pub struct DbSizeCommand;

impl Command for DbSizeCommand {
    fn execute(&self, ctx: &mut CommandContext, _args: &[Bytes]) -> Reply {
        Reply::integer(ctx.store.len() as i64)
    }

    fn name(&self) -> &'static str {
        "DBSIZE"
    }

    fn max_args(&self) -> Option<usize> {
        Some(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::Value;

    #[test]
    fn test_flushdb_dbsize() {
        let mut ctx = CommandContext::new();
        ctx.store.put("a", Value::string("1"));
        ctx.store.put("b", Value::empty_list());

        assert_eq!(DbSizeCommand.execute(&mut ctx, &[]), Reply::integer(2));
        assert_eq!(FlushDbCommand.execute(&mut ctx, &[]), Reply::ok());
        assert_eq!(DbSizeCommand.execute(&mut ctx, &[]), Reply::integer(0));
    }
}
