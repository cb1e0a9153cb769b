//! List commands (LPUSH, RPUSH, pops, ranges, LINSERT, LREM, LSET, LTRIM,
//! RPOPLPUSH, LMOVE, LPOS)

use super::{arg_eq, normalize_range, parse_int, Command, CommandContext};
use crate::protocol::Reply;
use crate::store::{MemoryStore, WrongType};
use bytes::Bytes;
use std::collections::VecDeque;

/// Which end of a list an operation addresses
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum End {
    Left,
    Right,
}

impl End {
    pub(crate) fn parse(arg: &Bytes) -> Result<Self, Reply> {
        if arg_eq(arg, "LEFT") {
            Ok(End::Left)
        } else if arg_eq(arg, "RIGHT") {
            Ok(End::Right)
        } else {
            Err(Reply::error("ERR syntax error"))
        }
    }
}

/// Pop one element from `end` of the list at `key`
///
/// Ok(None) means no data (missing key or empty list), which is what the
/// blocking runner retries on.
pub(crate) fn try_pop(
    store: &mut MemoryStore,
    key: &Bytes,
    end: End,
) -> Result<Option<Bytes>, WrongType> {
    match store.list(key)? {
        Some(list) if !list.is_empty() => {}
        _ => return Ok(None),
    }
    let list = store.list_mut(key)?;
    Ok(match end {
        End::Left => list.pop_front(),
        End::Right => list.pop_back(),
    })
}

/// Move one element from `from` of `src` to `to` of `dst`
///
/// Both keys are namespace-checked before anything moves. src == dst
/// operates on the single, updated list.
pub(crate) fn try_move(
    store: &mut MemoryStore,
    src: &Bytes,
    dst: &Bytes,
    from: End,
    to: End,
) -> Result<Option<Bytes>, WrongType> {
    store.list(dst)?;
    let Some(value) = try_pop(store, src, from)? else {
        return Ok(None);
    };
    let dst_list = store.list_mut(dst)?;
    match to {
        End::Left => dst_list.push_front(value.clone()),
        End::Right => dst_list.push_back(value.clone()),
    }
    Ok(Some(value))
}

fn push(ctx: &mut CommandContext, args: &[Bytes], end: End, require_existing: bool) -> Reply {
    let key = &args[0];

    if require_existing && !ctx.store.exists(key) {
        return Reply::integer(0);
    }

    let list = match ctx.store.list_mut(key) {
        Ok(list) => list,
        Err(_) => return Reply::wrong_type(),
    };

    for value in &args[1..] {
        match end {
            End::Left => list.push_front(value.clone()),
            End::Right => list.push_back(value.clone()),
        }
    }

    Reply::integer(list.len() as i64)
}

/// LPUSH command - Prepend one or multiple values to a list
///
/// Syntax: LPUSH key value [value ...]
///
/// Values are pushed one at a time, so the argument order ends up
/// reversed at the head.
pub struct LPushCommand;

impl Command for LPushCommand {
    fn execute(&self, ctx: &mut CommandContext, args: &[Bytes]) -> Reply {
        push(ctx, args, End::Left, false)
    }

    fn name(&self) -> &'static str {
        "LPUSH"
    }

    fn min_args(&self) -> usize {
        2
    }
}

/// RPUSH command - Append one or multiple values to a list
///
/// Syntax: RPUSH key value [value ...]
pub struct RPushCommand;

impl Command for RPushCommand {
    fn execute(&self, ctx: &mut CommandContext, args: &[Bytes]) -> Reply {
        push(ctx, args, End::Right, false)
    }

    fn name(&self) -> &'static str {
        "RPUSH"
    }

    fn min_args(&self) -> usize {
        2
    }
}

/// LPUSHX command - LPUSH that is a no-op when the key is missing
///
/// Syntax: LPUSHX key value [value ...]
pub struct LPushXCommand;

impl Command for LPushXCommand {
    fn execute(&self, ctx: &mut CommandContext, args: &[Bytes]) -> Reply {
        push(ctx, args, End::Left, true)
    }

    fn name(&self) -> &'static str {
        "LPUSHX"
    }

    fn min_args(&self) -> usize {
        2
    }
}

/// RPUSHX command - RPUSH that is a no-op when the key is missing
///
/// Syntax: RPUSHX key value [value ...]
pub struct RPushXCommand;

impl Command for RPushXCommand {
    fn execute(&self, ctx: &mut CommandContext, args: &[Bytes]) -> Reply {
        push(ctx, args, End::Right, true)
    }

    fn name(&self) -> &'static str {
        "RPUSHX"
    }

    fn min_args(&self) -> usize {
        2
    }
}

fn pop(ctx: &mut CommandContext, args: &[Bytes], end: End) -> Reply {
    let key = &args[0];

    match args.get(1) {
        None => match try_pop(&mut ctx.store, key, end) {
            Ok(Some(value)) => Reply::bulk_string(value),
            Ok(None) => Reply::NullBulk,
            Err(_) => Reply::wrong_type(),
        },
        Some(count_arg) => {
            let count = match parse_int(count_arg) {
                Ok(i) if i >= 0 => i as usize,
                Ok(_) => return Reply::error("ERR value is out of range, must be positive"),
                Err(e) => return e,
            };

            let mut popped = Vec::new();
            for _ in 0..count {
                match try_pop(&mut ctx.store, key, end) {
                    Ok(Some(value)) => popped.push(Reply::bulk_string(value)),
                    Ok(None) => break,
                    Err(_) => return Reply::wrong_type(),
                }
            }
            Reply::array(popped)
        }
    }
}

/// LPOP command - Remove and return elements from the head
///
/// Syntax: LPOP key [count]
pub struct LPopCommand;

impl Command for LPopCommand {
    fn execute(&self, ctx: &mut CommandContext, args: &[Bytes]) -> Reply {
        pop(ctx, args, End::Left)
    }

    fn name(&self) -> &'static str {
        "LPOP"
    }

    fn min_args(&self) -> usize {
        1
    }

    fn max_args(&self) -> Option<usize> {
        Some(2)
    }
}

/// RPOP command - Remove and return elements from the tail
///
/// Syntax: RPOP key [count]
pub struct RPopCommand;

impl Command for RPopCommand {
    fn execute(&self, ctx: &mut CommandContext, args: &[Bytes]) -> Reply {
        pop(ctx, args, End::Right)
    }

    fn name(&self) -> &'static str {
        "RPOP"
    }

    fn min_args(&self) -> usize {
        1
    }

    fn max_args(&self) -> Option<usize> {
        Some(2)
    }
}

/// LLEN command - Get the length of a list
///
/// Syntax: LLEN key
pub struct LLenCommand;

impl Command for LLenCommand {
    fn execute(&self, ctx: &mut CommandContext, args: &[Bytes]) -> Reply {
        match ctx.store.list(&args[0]) {
            Ok(Some(list)) => Reply::integer(list.len() as i64),
            Ok(None) => Reply::integer(0),
            Err(_) => Reply::wrong_type(),
        }
    }

    fn name(&self) -> &'static str {
        "LLEN"
    }

    fn min_args(&self) -> usize {
        1
    }

    fn max_args(&self) -> Option<usize> {
        Some(1)
    }
}

/// LRANGE command - Get a range of elements from a list
///
/// Syntax: LRANGE key start stop
pub struct LRangeCommand;

impl Command for LRangeCommand {
    fn execute(&self, ctx: &mut CommandContext, args: &[Bytes]) -> Reply {
        let start = match parse_int(&args[1]) {
            Ok(i) => i,
            Err(e) => return e,
        };
        let stop = match parse_int(&args[2]) {
            Ok(i) => i,
            Err(e) => return e,
        };

        let list = match ctx.store.list(&args[0]) {
            Ok(Some(list)) => list,
            Ok(None) => return Reply::array(vec![]),
            Err(_) => return Reply::wrong_type(),
        };

        let Some((start, stop)) = normalize_range(start, stop, list.len()) else {
            return Reply::array(vec![]);
        };

        Reply::array(
            list.iter()
                .skip(start)
                .take(stop - start + 1)
                .map(|v| Reply::bulk_string(v.clone()))
                .collect(),
        )
    }

    fn name(&self) -> &'static str {
        "LRANGE"
    }

    fn min_args(&self) -> usize {
        3
    }

    fn max_args(&self) -> Option<usize> {
        Some(3)
    }
}

/// LINDEX command - Get a single element by index
///
/// Syntax: LINDEX key index
pub struct LIndexCommand;

impl Command for LIndexCommand {
    fn execute(&self, ctx: &mut CommandContext, args: &[Bytes]) -> Reply {
        let index = match parse_int(&args[1]) {
            Ok(i) => i,
            Err(e) => return e,
        };

        let list = match ctx.store.list(&args[0]) {
            Ok(Some(list)) => list,
            Ok(None) => return Reply::NullBulk,
            Err(_) => return Reply::wrong_type(),
        };

        let len = list.len() as i64;
        let index = if index < 0 { len + index } else { index };
        if index < 0 || index >= len {
            return Reply::NullBulk;
        }

        match list.get(index as usize) {
            Some(value) => Reply::bulk_string(value.clone()),
            None => Reply::NullBulk,
        }
    }

    fn name(&self) -> &'static str {
        "LINDEX"
    }

    fn min_args(&self) -> usize {
        2
    }

    fn max_args(&self) -> Option<usize> {
        Some(2)
    }
}

/// LINSERT command - Insert an element next to a pivot
///
/// Syntax: LINSERT key BEFORE|AFTER pivot element
pub struct LInsertCommand;

impl Command for LInsertCommand {
    fn execute(&self, ctx: &mut CommandContext, args: &[Bytes]) -> Reply {
        let before = if arg_eq(&args[1], "BEFORE") {
            true
        } else if arg_eq(&args[1], "AFTER") {
            false
        } else {
            return Reply::error("ERR syntax error");
        };
        let (pivot, element) = (&args[2], &args[3]);

        match ctx.store.list(&args[0]) {
            Ok(Some(_)) => {}
            Ok(None) => return Reply::integer(0),
            Err(_) => return Reply::wrong_type(),
        }

        let list = match ctx.store.list_mut(&args[0]) {
            Ok(list) => list,
            Err(_) => return Reply::wrong_type(),
        };

        match list.iter().position(|v| v == pivot) {
            Some(position) => {
                let at = if before { position } else { position + 1 };
                list.insert(at, element.clone());
                Reply::integer(list.len() as i64)
            }
            None => Reply::integer(-1),
        }
    }

    fn name(&self) -> &'static str {
        "LINSERT"
    }

    fn min_args(&self) -> usize {
        4
    }

    fn max_args(&self) -> Option<usize> {
        Some(4)
    }
}

/// LREM command - Remove occurrences of an element
///
/// Syntax: LREM key count element
///
/// count > 0 removes from the head, count < 0 from the tail, count == 0
/// removes every occurrence.
pub struct LRemCommand;

impl Command for LRemCommand {
    fn execute(&self, ctx: &mut CommandContext, args: &[Bytes]) -> Reply {
        let count = match parse_int(&args[1]) {
            Ok(i) => i,
            Err(e) => return e,
        };
        let element = &args[2];

        match ctx.store.list(&args[0]) {
            Ok(Some(_)) => {}
            Ok(None) => return Reply::integer(0),
            Err(_) => return Reply::wrong_type(),
        }
        let list = match ctx.store.list_mut(&args[0]) {
            Ok(list) => list,
            Err(_) => return Reply::wrong_type(),
        };

        let limit = if count == 0 {
            usize::MAX
        } else {
            count.unsigned_abs() as usize
        };

        let mut removed = 0;
        let mut kept = VecDeque::with_capacity(list.len());
        if count >= 0 {
            for value in list.drain(..) {
                if removed < limit && value == *element {
                    removed += 1;
                } else {
                    kept.push_back(value);
                }
            }
        } else {
            for value in list.drain(..).rev() {
                if removed < limit && value == *element {
                    removed += 1;
                } else {
                    kept.push_front(value);
                }
            }
        }
        *list = kept;

        Reply::integer(removed as i64)
    }

    fn name(&self) -> &'static str {
        "LREM"
    }

    fn min_args(&self) -> usize {
        3
    }

    fn max_args(&self) -> Option<usize> {
        Some(3)
    }
}

/// LSET command - Overwrite an element by index
///
/// Syntax: LSET key index element
pub struct LSetCommand;

impl Command for LSetCommand {
    fn execute(&self, ctx: &mut CommandContext, args: &[Bytes]) -> Reply {
        let index = match parse_int(&args[1]) {
            Ok(i) => i,
            Err(e) => return e,
        };

        match ctx.store.list(&args[0]) {
            Ok(Some(_)) => {}
            Ok(None) => return Reply::error("ERR no such key"),
            Err(_) => return Reply::wrong_type(),
        }
        let list = match ctx.store.list_mut(&args[0]) {
            Ok(list) => list,
            Err(_) => return Reply::wrong_type(),
        };

        let len = list.len() as i64;
        let index = if index < 0 { len + index } else { index };
        if index < 0 || index >= len {
            return Reply::error("ERR index out of range");
        }

        list[index as usize] = args[2].clone();
        Reply::ok()
    }

    fn name(&self) -> &'static str {
        "LSET"
    }

    fn min_args(&self) -> usize {
        3
    }

    fn max_args(&self) -> Option<usize> {
        Some(3)
    }
}

/// LTRIM command - Retain only the elements inside a range
///
/// Syntax: LTRIM key start stop
pub struct LTrimCommand;

impl Command for LTrimCommand {
    fn execute(&self, ctx: &mut CommandContext, args: &[Bytes]) -> Reply {
        let start = match parse_int(&args[1]) {
            Ok(i) => i,
            Err(e) => return e,
        };
        let stop = match parse_int(&args[2]) {
            Ok(i) => i,
            Err(e) => return e,
        };

        match ctx.store.list(&args[0]) {
            Ok(Some(_)) => {}
            Ok(None) => return Reply::ok(),
            Err(_) => return Reply::wrong_type(),
        }
        let list = match ctx.store.list_mut(&args[0]) {
            Ok(list) => list,
            Err(_) => return Reply::wrong_type(),
        };

        match normalize_range(start, stop, list.len()) {
            Some((start, stop)) => {
                list.truncate(stop + 1);
                list.drain(..start);
            }
            None => list.clear(),
        }

        Reply::ok()
    }

    fn name(&self) -> &'static str {
        "LTRIM"
    }

    fn min_args(&self) -> usize {
        3
    }

    fn max_args(&self) -> Option<usize> {
        Some(3)
    }
}

/// RPOPLPUSH command - Move the tail of one list to the head of another
///
/// Syntax: RPOPLPUSH source destination
pub struct RPoplPushCommand;

impl Command for RPoplPushCommand {
    fn execute(&self, ctx: &mut CommandContext, args: &[Bytes]) -> Reply {
        match try_move(&mut ctx.store, &args[0], &args[1], End::Right, End::Left) {
            Ok(Some(value)) => Reply::bulk_string(value),
            Ok(None) => Reply::NullBulk,
            Err(_) => Reply::wrong_type(),
        }
    }

    fn name(&self) -> &'static str {
        "RPOPLPUSH"
    }

    fn min_args(&self) -> usize {
        2
    }

    fn max_args(&self) -> Option<usize> {
        Some(2)
    }
}

/// LMOVE command - Move an element between the ends of two lists
///
/// Syntax: LMOVE source destination LEFT|RIGHT LEFT|RIGHT
pub struct LMoveCommand;

impl Command for LMoveCommand {
    fn execute(&self, ctx: &mut CommandContext, args: &[Bytes]) -> Reply {
        let from = match End::parse(&args[2]) {
            Ok(end) => end,
            Err(e) => return e,
        };
        let to = match End::parse(&args[3]) {
            Ok(end) => end,
            Err(e) => return e,
        };

        match try_move(&mut ctx.store, &args[0], &args[1], from, to) {
            Ok(Some(value)) => Reply::bulk_string(value),
            Ok(None) => Reply::NullBulk,
            Err(_) => Reply::wrong_type(),
        }
    }

    fn name(&self) -> &'static str {
        "LMOVE"
    }

    fn min_args(&self) -> usize {
        4
    }

    fn max_args(&self) -> Option<usize> {
        Some(4)
    }
}

/// LPOS command - Find positions of matching elements
///
/// Syntax: LPOS key element [RANK rank] [COUNT num-matches] [MAXLEN len]
///
/// A negative RANK searches from the tail; MAXLEN bounds how many
/// entries are compared, from whichever end the search starts at.
/// Positions are always reported relative to the head.
pub struct LPosCommand;

impl Command for LPosCommand {
    fn execute(&self, ctx: &mut CommandContext, args: &[Bytes]) -> Reply {
        let element = &args[1];

        let mut rank = 1i64;
        let mut count: Option<usize> = None;
        let mut maxlen = 0usize;

        let mut i = 2;
        while i < args.len() {
            if arg_eq(&args[i], "RANK") && i + 1 < args.len() {
                rank = match parse_int(&args[i + 1]) {
                    Ok(r) => r,
                    Err(e) => return e,
                };
                if rank == 0 {
                    return Reply::error(
                        "ERR RANK can't be zero: use 1 to start searching from the first matching element, or the other way around",
                    );
                }
                i += 2;
            } else if arg_eq(&args[i], "COUNT") && i + 1 < args.len() {
                match parse_int(&args[i + 1]) {
                    Ok(c) if c >= 0 => count = Some(c as usize),
                    Ok(_) => return Reply::error("ERR COUNT can't be negative"),
                    Err(e) => return e,
                }
                i += 2;
            } else if arg_eq(&args[i], "MAXLEN") && i + 1 < args.len() {
                match parse_int(&args[i + 1]) {
                    Ok(m) if m >= 0 => maxlen = m as usize,
                    Ok(_) => return Reply::error("ERR MAXLEN can't be negative"),
                    Err(e) => return e,
                }
                i += 2;
            } else {
                return Reply::error("ERR syntax error");
            }
        }

        let list = match ctx.store.list(&args[0]) {
            Ok(Some(list)) => list,
            Ok(None) => {
                return match count {
                    Some(_) => Reply::array(vec![]),
                    None => Reply::NullBulk,
                }
            }
            Err(_) => return Reply::wrong_type(),
        };

        let wanted = match count {
            Some(0) => usize::MAX,
            Some(c) => c,
            None => 1,
        };

        let mut positions = Vec::new();
        let mut scanned = 0usize;
        if rank > 0 {
            let mut skip = (rank - 1) as usize;
            for (position, value) in list.iter().enumerate() {
                if maxlen > 0 && scanned >= maxlen {
                    break;
                }
                scanned += 1;
                if value == element {
                    if skip > 0 {
                        skip -= 1;
                        continue;
                    }
                    positions.push(position);
                    if positions.len() == wanted {
                        break;
                    }
                }
            }
        } else {
            let mut skip = rank.unsigned_abs() as usize - 1;
            for (position, value) in list.iter().enumerate().rev() {
                if maxlen > 0 && scanned >= maxlen {
                    break;
                }
                scanned += 1;
                if value == element {
                    if skip > 0 {
                        skip -= 1;
                        continue;
                    }
                    positions.push(position);
                    if positions.len() == wanted {
                        break;
                    }
                }
            }
        }

        match count {
            Some(_) => Reply::array(
                positions
                    .into_iter()
                    .map(|p| Reply::integer(p as i64))
                    .collect(),
            ),
            None => match positions.first() {
                Some(&position) => Reply::integer(position as i64),
                None => Reply::NullBulk,
            },
        }
    }

    fn name(&self) -> &'static str {
        "LPOS"
    }

    fn min_args(&self) -> usize {
        2
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rpush(ctx: &mut CommandContext, key: &str, values: &[&str]) {
        let mut args = vec![Bytes::from(key.to_string())];
        args.extend(values.iter().map(|v| Bytes::from(v.to_string())));
        RPushCommand.execute(ctx, &args);
    }

    fn lrange_all(ctx: &mut CommandContext, key: &str) -> Vec<Bytes> {
        let result = LRangeCommand.execute(
            ctx,
            &[Bytes::from(key.to_string()), Bytes::from("0"), Bytes::from("-1")],
        );
        result
            .as_array()
            .unwrap()
            .iter()
            .map(|r| r.as_bulk_string().unwrap().clone())
            .collect()
    }

    #[test]
    fn test_lpush_reverses_argument_order() {
        let mut ctx = CommandContext::new();

        let result = LPushCommand.execute(
            &mut ctx,
            &[Bytes::from("L"), Bytes::from("a"), Bytes::from("b"), Bytes::from("c")],
        );
        assert_eq!(result, Reply::integer(3));
        assert_eq!(
            lrange_all(&mut ctx, "L"),
            vec![Bytes::from("c"), Bytes::from("b"), Bytes::from("a")]
        );
    }

    #[test]
    fn test_pushx_noop_on_missing() {
        let mut ctx = CommandContext::new();

        assert_eq!(
            LPushXCommand.execute(&mut ctx, &[Bytes::from("L"), Bytes::from("a")]),
            Reply::integer(0)
        );
        assert_eq!(
            RPushXCommand.execute(&mut ctx, &[Bytes::from("L"), Bytes::from("a")]),
            Reply::integer(0)
        );
        assert!(!ctx.store.exists(&Bytes::from("L")));

        rpush(&mut ctx, "L", &["x"]);
        assert_eq!(
            RPushXCommand.execute(&mut ctx, &[Bytes::from("L"), Bytes::from("y")]),
            Reply::integer(2)
        );
    }

    #[test]
    fn test_lpop_rpop() {
        let mut ctx = CommandContext::new();
        rpush(&mut ctx, "L", &["a", "b", "c"]);

        assert_eq!(
            LPopCommand.execute(&mut ctx, &[Bytes::from("L")]),
            Reply::bulk_string("a")
        );
        assert_eq!(
            RPopCommand.execute(&mut ctx, &[Bytes::from("L")]),
            Reply::bulk_string("c")
        );
        assert_eq!(
            LPopCommand.execute(&mut ctx, &[Bytes::from("L"), Bytes::from("5")]),
            Reply::array(vec![Reply::bulk_string("b")])
        );
        assert_eq!(
            LPopCommand.execute(&mut ctx, &[Bytes::from("L")]),
            Reply::NullBulk
        );
    }

    #[test]
    fn test_lindex_and_empty_boundaries() {
        let mut ctx = CommandContext::new();

        assert_eq!(
            LIndexCommand.execute(&mut ctx, &[Bytes::from("empty"), Bytes::from("0")]),
            Reply::NullBulk
        );
        assert_eq!(
            LRangeCommand.execute(
                &mut ctx,
                &[Bytes::from("empty"), Bytes::from("0"), Bytes::from("-1")]
            ),
            Reply::array(vec![])
        );

        rpush(&mut ctx, "L", &["a", "b", "c"]);
        assert_eq!(
            LIndexCommand.execute(&mut ctx, &[Bytes::from("L"), Bytes::from("-1")]),
            Reply::bulk_string("c")
        );
        assert_eq!(
            LIndexCommand.execute(&mut ctx, &[Bytes::from("L"), Bytes::from("9")]),
            Reply::NullBulk
        );
    }

    #[test]
    fn test_linsert() {
        let mut ctx = CommandContext::new();

        // LPUSH L 1 2 3; LINSERT L BEFORE 2 X => [3, X, 2, 1]
        LPushCommand.execute(
            &mut ctx,
            &[Bytes::from("L"), Bytes::from("1"), Bytes::from("2"), Bytes::from("3")],
        );
        let result = LInsertCommand.execute(
            &mut ctx,
            &[
                Bytes::from("L"),
                Bytes::from("BEFORE"),
                Bytes::from("2"),
                Bytes::from("X"),
            ],
        );
        assert_eq!(result, Reply::integer(4));
        assert_eq!(
            lrange_all(&mut ctx, "L"),
            vec![Bytes::from("3"), Bytes::from("X"), Bytes::from("2"), Bytes::from("1")]
        );

        let result = LInsertCommand.execute(
            &mut ctx,
            &[
                Bytes::from("L"),
                Bytes::from("AFTER"),
                Bytes::from("nope"),
                Bytes::from("X"),
            ],
        );
        assert_eq!(result, Reply::integer(-1));

        let result = LInsertCommand.execute(
            &mut ctx,
            &[
                Bytes::from("missing"),
                Bytes::from("BEFORE"),
                Bytes::from("2"),
                Bytes::from("X"),
            ],
        );
        assert_eq!(result, Reply::integer(0));
    }

    #[test]
    fn test_lrem_directions() {
        let mut ctx = CommandContext::new();
        rpush(&mut ctx, "L", &["a", "b", "a", "c", "a"]);

        // Remove two from the head
        let result = LRemCommand.execute(
            &mut ctx,
            &[Bytes::from("L"), Bytes::from("2"), Bytes::from("a")],
        );
        assert_eq!(result, Reply::integer(2));
        assert_eq!(
            lrange_all(&mut ctx, "L"),
            vec![Bytes::from("b"), Bytes::from("c"), Bytes::from("a")]
        );

        // Remove from the tail
        rpush(&mut ctx, "L", &["b"]);
        let result = LRemCommand.execute(
            &mut ctx,
            &[Bytes::from("L"), Bytes::from("-1"), Bytes::from("b")],
        );
        assert_eq!(result, Reply::integer(1));
        assert_eq!(
            lrange_all(&mut ctx, "L"),
            vec![Bytes::from("b"), Bytes::from("c"), Bytes::from("a")]
        );

        // Remove all
        let result = LRemCommand.execute(
            &mut ctx,
            &[Bytes::from("L"), Bytes::from("0"), Bytes::from("b")],
        );
        assert_eq!(result, Reply::integer(1));
    }

    #[test]
    fn test_lset() {
        let mut ctx = CommandContext::new();
        rpush(&mut ctx, "L", &["a", "b"]);

        let result = LSetCommand.execute(
            &mut ctx,
            &[Bytes::from("L"), Bytes::from("0"), Bytes::from("x")],
        );
        assert_eq!(result, Reply::ok());
        assert_eq!(
            lrange_all(&mut ctx, "L"),
            vec![Bytes::from("x"), Bytes::from("b")]
        );

        // Negative index addresses from the tail, -1 being the last element
        let result = LSetCommand.execute(
            &mut ctx,
            &[Bytes::from("L"), Bytes::from("-1"), Bytes::from("y")],
        );
        assert_eq!(result, Reply::ok());
        assert_eq!(
            lrange_all(&mut ctx, "L"),
            vec![Bytes::from("x"), Bytes::from("y")]
        );

        let result = LSetCommand.execute(
            &mut ctx,
            &[Bytes::from("L"), Bytes::from("99"), Bytes::from("z")],
        );
        assert_eq!(result, Reply::error("ERR index out of range"));

        let result = LSetCommand.execute(
            &mut ctx,
            &[Bytes::from("missing"), Bytes::from("0"), Bytes::from("z")],
        );
        assert_eq!(result, Reply::error("ERR no such key"));
    }

    #[test]
    fn test_ltrim() {
        let mut ctx = CommandContext::new();
        rpush(&mut ctx, "L", &["a", "b", "c", "d", "e"]);

        let result = LTrimCommand.execute(
            &mut ctx,
            &[Bytes::from("L"), Bytes::from("1"), Bytes::from("-2")],
        );
        assert_eq!(result, Reply::ok());
        assert_eq!(
            lrange_all(&mut ctx, "L"),
            vec![Bytes::from("b"), Bytes::from("c"), Bytes::from("d")]
        );

        // An inverted range empties the list
        let result = LTrimCommand.execute(
            &mut ctx,
            &[Bytes::from("L"), Bytes::from("2"), Bytes::from("1")],
        );
        assert_eq!(result, Reply::ok());
        assert_eq!(
            LLenCommand.execute(&mut ctx, &[Bytes::from("L")]),
            Reply::integer(0)
        );
    }

    #[test]
    fn test_rpoplpush() {
        let mut ctx = CommandContext::new();
        rpush(&mut ctx, "src", &["a", "b", "c"]);
        rpush(&mut ctx, "dst", &["x"]);

        let result =
            RPoplPushCommand.execute(&mut ctx, &[Bytes::from("src"), Bytes::from("dst")]);
        assert_eq!(result, Reply::bulk_string("c"));
        assert_eq!(
            lrange_all(&mut ctx, "dst"),
            vec![Bytes::from("c"), Bytes::from("x")]
        );

        let result =
            RPoplPushCommand.execute(&mut ctx, &[Bytes::from("empty"), Bytes::from("dst")]);
        assert_eq!(result, Reply::NullBulk);
    }

    #[test]
    fn test_lmove_same_key_rotates() {
        let mut ctx = CommandContext::new();
        rpush(&mut ctx, "L", &["a", "b", "c"]);

        let result = LMoveCommand.execute(
            &mut ctx,
            &[
                Bytes::from("L"),
                Bytes::from("L"),
                Bytes::from("LEFT"),
                Bytes::from("RIGHT"),
            ],
        );
        assert_eq!(result, Reply::bulk_string("a"));
        assert_eq!(
            lrange_all(&mut ctx, "L"),
            vec![Bytes::from("b"), Bytes::from("c"), Bytes::from("a")]
        );
    }

    #[test]
    fn test_lmove_wrong_destination_type() {
        let mut ctx = CommandContext::new();
        rpush(&mut ctx, "src", &["a"]);
        ctx.store
            .put_string(Bytes::from("dst"), Bytes::from("v"))
            .unwrap();

        let result = LMoveCommand.execute(
            &mut ctx,
            &[
                Bytes::from("src"),
                Bytes::from("dst"),
                Bytes::from("LEFT"),
                Bytes::from("LEFT"),
            ],
        );
        assert_eq!(result, Reply::wrong_type());
        // Nothing was popped from the source
        assert_eq!(
            LLenCommand.execute(&mut ctx, &[Bytes::from("src")]),
            Reply::integer(1)
        );
    }

    #[test]
    fn test_lpos() {
        let mut ctx = CommandContext::new();
        rpush(&mut ctx, "L", &["a", "b", "c", "1", "2", "3", "c", "c"]);

        assert_eq!(
            LPosCommand.execute(&mut ctx, &[Bytes::from("L"), Bytes::from("c")]),
            Reply::integer(2)
        );
        assert_eq!(
            LPosCommand.execute(&mut ctx, &[Bytes::from("L"), Bytes::from("nope")]),
            Reply::NullBulk
        );

        // RANK -1 searches right to left
        assert_eq!(
            LPosCommand.execute(
                &mut ctx,
                &[Bytes::from("L"), Bytes::from("c"), Bytes::from("RANK"), Bytes::from("-1")]
            ),
            Reply::integer(7)
        );

        // COUNT 0 returns every match
        assert_eq!(
            LPosCommand.execute(
                &mut ctx,
                &[Bytes::from("L"), Bytes::from("c"), Bytes::from("COUNT"), Bytes::from("0")]
            ),
            Reply::array(vec![Reply::integer(2), Reply::integer(6), Reply::integer(7)])
        );

        // MAXLEN truncates the search window
        assert_eq!(
            LPosCommand.execute(
                &mut ctx,
                &[
                    Bytes::from("L"),
                    Bytes::from("c"),
                    Bytes::from("COUNT"),
                    Bytes::from("0"),
                    Bytes::from("MAXLEN"),
                    Bytes::from("3")
                ]
            ),
            Reply::array(vec![Reply::integer(2)])
        );

        // MAXLEN with a negative RANK truncates from the tail
        assert_eq!(
            LPosCommand.execute(
                &mut ctx,
                &[
                    Bytes::from("L"),
                    Bytes::from("c"),
                    Bytes::from("RANK"),
                    Bytes::from("-1"),
                    Bytes::from("COUNT"),
                    Bytes::from("0"),
                    Bytes::from("MAXLEN"),
                    Bytes::from("2")
                ]
            ),
            Reply::array(vec![Reply::integer(7), Reply::integer(6)])
        );

        assert!(LPosCommand
            .execute(
                &mut ctx,
                &[Bytes::from("L"), Bytes::from("c"), Bytes::from("RANK"), Bytes::from("0")]
            )
            .is_error());
    }
}
