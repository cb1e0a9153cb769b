//! Key commands (DEL, EXISTS, TYPE)

use super::{Command, CommandContext};
use crate::protocol::Reply;
use bytes::Bytes;

/// DEL command - Delete one or more keys from any namespace
///
/// Syntax: DEL key [key ...]
pub struct DelCommand;

impl Command for DelCommand {
    fn execute(&self, ctx: &mut CommandContext, args: &[Bytes]) -> Reply {
        let mut removed = 0;
        for key in args {
            if ctx.store.delete(key) {
                removed += 1;
            }
        }
        Reply::integer(removed)
    }

    fn name(&self) -> &'static str {
        "DEL"
    }

    fn min_args(&self) -> usize {
        1
    }
}

/// EXISTS command - Count how many of the given keys exist
///
/// Syntax: EXISTS key [key ...]
pub struct ExistsCommand;

impl Command for ExistsCommand {
    fn execute(&self, ctx: &mut CommandContext, args: &[Bytes]) -> Reply {
        let mut present = 0;
        for key in args {
            if ctx.store.exists(key) {
                present += 1;
            }
        }
        Reply::integer(present)
    }

    fn name(&self) -> &'static str {
        "EXISTS"
    }

    fn min_args(&self) -> usize {
        1
    }
}

/// TYPE command - Report which namespace holds a key
///
/// Syntax: TYPE key
pub struct TypeCommand;

impl Command for TypeCommand {
    fn execute(&self, ctx: &mut CommandContext, args: &[Bytes]) -> Reply {
        match ctx.store.get(&args[0]) {
            Some(value) => Reply::simple_string(value.type_name()),
            None => Reply::simple_string("none"),
        }
    }

    fn name(&self) -> &'static str {
        "TYPE"
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
    fn test_del() {
        let mut ctx = CommandContext::new();
        ctx.store.put("a", Value::string("1"));
        ctx.store.put("b", Value::string("2"));

        let result = DelCommand.execute(
            &mut ctx,
            &[Bytes::from("a"), Bytes::from("b"), Bytes::from("missing")],
        );
        assert_eq!(result, Reply::integer(2));
        assert!(!ctx.store.exists(&Bytes::from("a")));
    }

    #[test]
    fn test_exists() {
        let mut ctx = CommandContext::new();
        ctx.store.put("a", Value::string("1"));

        let result = ExistsCommand.execute(
            &mut ctx,
            &[Bytes::from("a"), Bytes::from("a"), Bytes::from("missing")],
        );
        assert_eq!(result, Reply::integer(2));
    }

    #[test]
    fn test_type() {
        let mut ctx = CommandContext::new();
        ctx.store.put("s", Value::string("1"));
        ctx.store.put("z", Value::empty_sorted_set());

        assert_eq!(
            TypeCommand.execute(&mut ctx, &[Bytes::from("s")]),
            Reply::simple_string("string")
        );
        assert_eq!(
            TypeCommand.execute(&mut ctx, &[Bytes::from("z")]),
            Reply::simple_string("zset")
        );
        assert_eq!(
            TypeCommand.execute(&mut ctx, &[Bytes::from("missing")]),
            Reply::simple_string("none")
        );
    }
}
