//! Counter commands (INCR, INCRBY, DECR, DECRBY)
//!
//! Counters live in the string namespace: the stored value is the base-10
//! textual form of the number.

use super::{parse_int, Command, CommandContext};
use crate::protocol::Reply;
use bytes::Bytes;

/// Apply a signed delta to the integer stored at key
fn increment_by(ctx: &mut CommandContext, key: &Bytes, delta: i64) -> Reply {
    let current = match ctx.store.string(key) {
        Ok(Some(value)) => match std::str::from_utf8(value).ok().and_then(|s| s.parse::<i64>().ok()) {
            Some(i) => i,
            None => return Reply::error("ERR value is not an integer or out of range"),
        },
        Ok(None) => 0,
        Err(_) => return Reply::wrong_type(),
    };

    let updated = match current.checked_add(delta) {
        Some(v) => v,
        None => return Reply::error("ERR increment or decrement would overflow"),
    };

    match ctx
        .store
        .put_string(key.clone(), Bytes::from(updated.to_string()))
    {
        Ok(()) => Reply::integer(updated),
        Err(_) => Reply::wrong_type(),
    }
}

/// INCR command - Increment the integer value of a key by one
///
/// Syntax: INCR key
pub struct IncrCommand;

impl Command for IncrCommand {
    fn execute(&self, ctx: &mut CommandContext, args: &[Bytes]) -> Reply {
        increment_by(ctx, &args[0], 1)
    }

    fn name(&self) -> &'static str {
        "INCR"
    }

    fn min_args(&self) -> usize {
        1
    }

    fn max_args(&self) -> Option<usize> {
        Some(1)
    }
}

/// DECR command - Decrement the integer value of a key by one
///
/// Syntax: DECR key
pub struct DecrCommand;

impl Command for DecrCommand {
    fn execute(&self, ctx: &mut CommandContext, args: &[Bytes]) -> Reply {
        increment_by(ctx, &args[0], -1)
    }

    fn name(&self) -> &'static str {
        "DECR"
    }

    fn min_args(&self) -> usize {
        1
    }

    fn max_args(&self) -> Option<usize> {
        Some(1)
    }
}

/// INCRBY command - Increment the integer value of a key
///
/// Syntax: INCRBY key increment
pub struct IncrByCommand;

impl Command for IncrByCommand {
    fn execute(&self, ctx: &mut CommandContext, args: &[Bytes]) -> Reply {
        let delta = match parse_int(&args[1]) {
            Ok(i) => i,
            Err(e) => return e,
        };
        increment_by(ctx, &args[0], delta)
    }

    fn name(&self) -> &'static str {
        "INCRBY"
    }

    fn min_args(&self) -> usize {
        2
    }

    fn max_args(&self) -> Option<usize> {
        Some(2)
    }
}

/// DECRBY command - Decrement the integer value of a key
///
/// Syntax: DECRBY key decrement
pub struct DecrByCommand;

impl Command for DecrByCommand {
    fn execute(&self, ctx: &mut CommandContext, args: &[Bytes]) -> Reply {
        let delta = match parse_int(&args[1]) {
            Ok(i) => i,
            Err(e) => return e,
        };
        match delta.checked_neg() {
            Some(delta) => increment_by(ctx, &args[0], delta),
            None => Reply::error("ERR decrement would overflow"),
        }
    }

    fn name(&self) -> &'static str {
        "DECRBY"
    }

    fn min_args(&self) -> usize {
        2
    }

    fn max_args(&self) -> Option<usize> {
        Some(2)
    }
}
