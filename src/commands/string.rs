//! String commands (SET, GET, APPEND)

use super::{arg_eq, parse_int, Command, CommandContext};
use crate::protocol::Reply;
use bytes::{Bytes, BytesMut};

/// SET command - Set a key to a value
///
/// Syntax: SET key value [EX seconds | PX milliseconds]
///
/// TTL tokens are parsed for client compatibility but never enforced;
/// keys do not expire.
pub struct SetCommand;

impl Command for SetCommand {
    fn execute(&self, ctx: &mut CommandContext, args: &[Bytes]) -> Reply {
        let key = args[0].clone();
        let value = args[1].clone();

        let mut i = 2;
        while i < args.len() {
            if (arg_eq(&args[i], "PX") || arg_eq(&args[i], "EX")) && i + 1 < args.len() {
                if let Err(e) = parse_int(&args[i + 1]) {
                    return e;
                }
                i += 2;
            } else {
                return Reply::error("ERR syntax error");
            }
        }

        match ctx.store.put_string(key, value) {
            Ok(()) => Reply::ok(),
            Err(_) => Reply::wrong_type(),
        }
    }

    fn name(&self) -> &'static str {
        "SET"
    }

    fn min_args(&self) -> usize {
        2
    }
}

/// GET command - Get the value of a key
///
/// Syntax: GET key
pub struct GetCommand;

impl Command for GetCommand {
    fn execute(&self, ctx: &mut CommandContext, args: &[Bytes]) -> Reply {
        match ctx.store.string(&args[0]) {
            Ok(Some(value)) => Reply::bulk_string(value.clone()),
            Ok(None) => Reply::NullBulk,
            Err(_) => Reply::wrong_type(),
        }
    }

    fn name(&self) -> &'static str {
        "GET"
    }

    fn min_args(&self) -> usize {
        1
    }

    fn max_args(&self) -> Option<usize> {
        Some(1)
    }
}

/// APPEND command - Append to a string, creating it if missing
///
/// Syntax: APPEND key value
pub struct AppendCommand;

impl Command for AppendCommand {
    fn execute(&self, ctx: &mut CommandContext, args: &[Bytes]) -> Reply {
        let key = args[0].clone();

        let current = match ctx.store.string(&key) {
            Ok(Some(value)) => value.clone(),
            Ok(None) => Bytes::new(),
            Err(_) => return Reply::wrong_type(),
        };

        let mut combined = BytesMut::with_capacity(current.len() + args[1].len());
        combined.extend_from_slice(&current);
        combined.extend_from_slice(&args[1]);
        let combined = combined.freeze();
        let new_len = combined.len();

        match ctx.store.put_string(key, combined) {
            Ok(()) => Reply::integer(new_len as i64),
            Err(_) => Reply::wrong_type(),
        }
    }

    fn name(&self) -> &'static str {
        "APPEND"
    }

    fn min_args(&self) -> usize {
        2
    }

    fn max_args(&self) -> Option<usize> {
        Some(2)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_get() {
        let mut ctx = CommandContext::new();

        let result = SetCommand.execute(&mut ctx, &[Bytes::from("mykey"), Bytes::from("myvalue")]);
        assert_eq!(result, Reply::ok());

        let result = GetCommand.execute(&mut ctx, &[Bytes::from("mykey")]);
        assert_eq!(result, Reply::bulk_string("myvalue"));
    }

    #[test]
    fn test_get_nonexistent() {
        let mut ctx = CommandContext::new();

        let result = GetCommand.execute(&mut ctx, &[Bytes::from("nonexistent")]);
        assert_eq!(result, Reply::NullBulk);
    }

    #[test]
    fn test_set_px_parsed_not_enforced() {
        let mut ctx = CommandContext::new();

        let result = SetCommand.execute(
            &mut ctx,
            &[
                Bytes::from("k"),
                Bytes::from("v"),
                Bytes::from("PX"),
                Bytes::from("100"),
            ],
        );
        assert_eq!(result, Reply::ok());

        // Bad TTL value is still rejected at parse time
        let result = SetCommand.execute(
            &mut ctx,
            &[
                Bytes::from("k"),
                Bytes::from("v"),
                Bytes::from("PX"),
                Bytes::from("soon"),
            ],
        );
        assert!(result.is_error());
    }

    #[test]
    fn test_set_wrong_type() {
        let mut ctx = CommandContext::new();
        ctx.store
            .list_mut(&Bytes::from("mylist"))
            .unwrap()
            .push_back(Bytes::from("a"));

        let result = SetCommand.execute(&mut ctx, &[Bytes::from("mylist"), Bytes::from("v")]);
        assert_eq!(result, Reply::wrong_type());
    }

    #[test]
    fn test_append() {
        let mut ctx = CommandContext::new();

        let result = AppendCommand.execute(&mut ctx, &[Bytes::from("greeting"), Bytes::from("hello")]);
        assert_eq!(result, Reply::integer(5));

        let result = AppendCommand.execute(&mut ctx, &[Bytes::from("greeting"), Bytes::from(" world")]);
        assert_eq!(result, Reply::integer(11));

        let result = GetCommand.execute(&mut ctx, &[Bytes::from("greeting")]);
        assert_eq!(result, Reply::bulk_string("hello world"));
    }
}
