//! Set commands (SADD, SREM, SCARD, SISMEMBER, SMEMBERS, set algebra,
//! SMOVE, SPOP, SRANDMEMBER, SSCAN)

use super::{parse_int, parse_scan_options, scan_page, Command, CommandContext};
use crate::protocol::Reply;
use crate::store::{Set, Value};
use bytes::Bytes;

/// SADD command - Add one or more members to a set
///
/// Syntax: SADD key member [member ...]
pub struct SAddCommand;

impl Command for SAddCommand {
    fn execute(&self, ctx: &mut CommandContext, args: &[Bytes]) -> Reply {
        let set = match ctx.store.set_mut(&args[0]) {
            Ok(set) => set,
            Err(_) => return Reply::wrong_type(),
        };

        let mut added = 0;
        for member in &args[1..] {
            if set.insert(member.clone()) {
                added += 1;
            }
        }

        Reply::integer(added)
    }

    fn name(&self) -> &'static str {
        "SADD"
    }

    fn min_args(&self) -> usize {
        2
    }
}

/// SREM command - Remove one or more members from a set
///
/// Syntax: SREM key member [member ...]
pub struct SRemCommand;

impl Command for SRemCommand {
    fn execute(&self, ctx: &mut CommandContext, args: &[Bytes]) -> Reply {
        match ctx.store.set(&args[0]) {
            Ok(Some(_)) => {}
            Ok(None) => return Reply::integer(0),
            Err(_) => return Reply::wrong_type(),
        }
        let set = match ctx.store.set_mut(&args[0]) {
            Ok(set) => set,
            Err(_) => return Reply::wrong_type(),
        };

        let mut removed = 0;
        for member in &args[1..] {
            if set.remove(member) {
                removed += 1;
            }
        }

        Reply::integer(removed)
    }

    fn name(&self) -> &'static str {
        "SREM"
    }

    fn min_args(&self) -> usize {
        2
    }
}

/// SCARD command - Get the number of members in a set
///
/// Syntax: SCARD key
pub struct SCardCommand;

impl Command for SCardCommand {
    fn execute(&self, ctx: &mut CommandContext, args: &[Bytes]) -> Reply {
        match ctx.store.set(&args[0]) {
            Ok(Some(set)) => Reply::integer(set.len() as i64),
            Ok(None) => Reply::integer(0),
            Err(_) => Reply::wrong_type(),
        }
    }

    fn name(&self) -> &'static str {
        "SCARD"
    }

    fn min_args(&self) -> usize {
        1
    }

    fn max_args(&self) -> Option<usize> {
        Some(1)
    }
}

/// SISMEMBER command - Test membership
///
/// Syntax: SISMEMBER key member
pub struct SIsMemberCommand;

impl Command for SIsMemberCommand {
    fn execute(&self, ctx: &mut CommandContext, args: &[Bytes]) -> Reply {
        match ctx.store.set(&args[0]) {
            Ok(Some(set)) => Reply::integer(set.contains(&args[1]) as i64),
            Ok(None) => Reply::integer(0),
            Err(_) => Reply::wrong_type(),
        }
    }

    fn name(&self) -> &'static str {
        "SISMEMBER"
    }

    fn min_args(&self) -> usize {
        2
    }

    fn max_args(&self) -> Option<usize> {
        Some(2)
    }
}

/// SMEMBERS command - Get all members of a set
///
/// Syntax: SMEMBERS key
pub struct SMembersCommand;

impl Command for SMembersCommand {
    fn execute(&self, ctx: &mut CommandContext, args: &[Bytes]) -> Reply {
        match ctx.store.set(&args[0]) {
            Ok(Some(set)) => {
                let members: Vec<Reply> = set
                    .iter()
                    .map(|m| Reply::bulk_string(m.clone()))
                    .collect();
                Reply::array(members)
            }
            Ok(None) => Reply::array(vec![]),
            Err(_) => Reply::wrong_type(),
        }
    }

    fn name(&self) -> &'static str {
        "SMEMBERS"
    }

    fn min_args(&self) -> usize {
        1
    }

    fn max_args(&self) -> Option<usize> {
        Some(1)
    }
}

/// How the algebra commands combine their operand sets
#[derive(Clone, Copy)]
enum SetOp {
    Diff,
    Inter,
    Union,
}

/// Left-fold the sets named by `keys` under `op`
fn combine_sets(ctx: &CommandContext, keys: &[Bytes], op: SetOp) -> Result<Set<Bytes>, Reply> {
    let mut result = match ctx.store.set(&keys[0]) {
        Ok(Some(set)) => set.clone(),
        Ok(None) => Set::default(),
        Err(_) => return Err(Reply::wrong_type()),
    };

    for key in &keys[1..] {
        let operand = match ctx.store.set(key) {
            Ok(Some(set)) => set,
            Ok(None) => {
                if matches!(op, SetOp::Inter) {
                    result.clear();
                }
                continue;
            }
            Err(_) => return Err(Reply::wrong_type()),
        };

        match op {
            SetOp::Diff => result.retain(|m| !operand.contains(m)),
            SetOp::Inter => result.retain(|m| operand.contains(m)),
            SetOp::Union => result.extend(operand.iter().cloned()),
        }
    }

    Ok(result)
}

fn set_algebra(ctx: &mut CommandContext, args: &[Bytes], op: SetOp) -> Reply {
    match combine_sets(ctx, args, op) {
        Ok(result) => {
            let members: Vec<Reply> = result
                .iter()
                .map(|m| Reply::bulk_string(m.clone()))
                .collect();
            Reply::array(members)
        }
        Err(e) => e,
    }
}

fn set_algebra_store(ctx: &mut CommandContext, args: &[Bytes], op: SetOp) -> Reply {
    match combine_sets(ctx, &args[1..], op) {
        Ok(result) => {
            let cardinality = result.len() as i64;
            ctx.store.put(args[0].clone(), Value::Set(result));
            Reply::integer(cardinality)
        }
        Err(e) => e,
    }
}

macro_rules! set_algebra_command {
    ($name:ident, $opcode:literal, $op:expr, $min:literal, $store:literal) => {
        #[doc = concat!($opcode, " command")]
        pub struct $name;

        impl Command for $name {
            fn execute(&self, ctx: &mut CommandContext, args: &[Bytes]) -> Reply {
                if $store {
                    set_algebra_store(ctx, args, $op)
                } else {
                    set_algebra(ctx, args, $op)
                }
            }

            fn name(&self) -> &'static str {
                $opcode
            }

            fn min_args(&self) -> usize {
                $min
            }
        }
    };
}

set_algebra_command!(SDiffCommand, "SDIFF", SetOp::Diff, 1, false);
set_algebra_command!(SDiffStoreCommand, "SDIFFSTORE", SetOp::Diff, 2, true);
set_algebra_command!(SInterCommand, "SINTER", SetOp::Inter, 1, false);
set_algebra_command!(SInterStoreCommand, "SINTERSTORE", SetOp::Inter, 2, true);
set_algebra_command!(SUnionCommand, "SUNION", SetOp::Union, 1, false);
set_algebra_command!(SUnionStoreCommand, "SUNIONSTORE", SetOp::Union, 2, true);

/// SMOVE command - Atomically move a member between sets
///
/// Syntax: SMOVE source destination member
pub struct SMoveCommand;

impl Command for SMoveCommand {
    fn execute(&self, ctx: &mut CommandContext, args: &[Bytes]) -> Reply {
        let (src, dst, member) = (&args[0], &args[1], &args[2]);

        // Both ends are namespace-checked before anything moves
        let present = match ctx.store.set(src) {
            Ok(Some(set)) => set.contains(member),
            Ok(None) => false,
            Err(_) => return Reply::wrong_type(),
        };
        if ctx.store.set(dst).is_err() {
            return Reply::wrong_type();
        }

        if !present {
            return Reply::integer(0);
        }

        match ctx.store.set_mut(src) {
            Ok(set) => {
                set.remove(member);
            }
            Err(_) => return Reply::wrong_type(),
        }
        match ctx.store.set_mut(dst) {
            Ok(set) => {
                set.insert(member.clone());
            }
            Err(_) => return Reply::wrong_type(),
        }

        Reply::integer(1)
    }

    fn name(&self) -> &'static str {
        "SMOVE"
    }

    fn min_args(&self) -> usize {
        3
    }

    fn max_args(&self) -> Option<usize> {
        Some(3)
    }
}

/// Members of a set in its (deterministic) iteration order
fn members_vec(set: &Set<Bytes>) -> Vec<Bytes> {
    set.iter().cloned().collect()
}

/// SPOP command - Remove and return random members
///
/// Syntax: SPOP key [count]
pub struct SPopCommand;

impl Command for SPopCommand {
    fn execute(&self, ctx: &mut CommandContext, args: &[Bytes]) -> Reply {
        let key = &args[0];

        let members = match ctx.store.set(key) {
            Ok(Some(set)) => members_vec(set),
            Ok(None) => Vec::new(),
            Err(_) => return Reply::wrong_type(),
        };

        match args.get(1) {
            None => {
                let picked = match ctx.picker.select_one(&members) {
                    Some(member) => member.clone(),
                    None => return Reply::NullBulk,
                };
                if let Ok(set) = ctx.store.set_mut(key) {
                    set.remove(&picked);
                }
                Reply::bulk_string(picked)
            }
            Some(count_arg) => {
                let count = match parse_int(count_arg) {
                    Ok(i) => i,
                    Err(e) => return e,
                };
                if count < 0 {
                    return Reply::error("ERR value is out of range, must be positive");
                }

                let picked: Vec<Bytes> = ctx
                    .picker
                    .select_n(&members, count as usize)
                    .into_iter()
                    .cloned()
                    .collect();
                if !picked.is_empty() {
                    if let Ok(set) = ctx.store.set_mut(key) {
                        for member in &picked {
                            set.remove(member);
                        }
                    }
                }
                Reply::array(picked.into_iter().map(Reply::bulk_string).collect())
            }
        }
    }

    fn name(&self) -> &'static str {
        "SPOP"
    }

    fn min_args(&self) -> usize {
        1
    }

    fn max_args(&self) -> Option<usize> {
        Some(2)
    }
}

/// SRANDMEMBER command - Return random members without removing them
///
/// Syntax: SRANDMEMBER key [count]
///
/// A negative count samples with replacement.
pub struct SRandMemberCommand;

impl Command for SRandMemberCommand {
    fn execute(&self, ctx: &mut CommandContext, args: &[Bytes]) -> Reply {
        let members = match ctx.store.set(&args[0]) {
            Ok(Some(set)) => members_vec(set),
            Ok(None) => Vec::new(),
            Err(_) => return Reply::wrong_type(),
        };

        match args.get(1) {
            None => match ctx.picker.select_one(&members) {
                Some(member) => Reply::bulk_string(member.clone()),
                None => Reply::NullBulk,
            },
            Some(count_arg) => {
                let count = match parse_int(count_arg) {
                    Ok(i) => i,
                    Err(e) => return e,
                };
                let picked = if count < 0 {
                    ctx.picker
                        .select_n_with_replacement(&members, count.unsigned_abs() as usize)
                } else {
                    ctx.picker.select_n(&members, count as usize)
                };
                Reply::array(
                    picked
                        .into_iter()
                        .map(|m| Reply::bulk_string(m.clone()))
                        .collect(),
                )
            }
        }
    }

    fn name(&self) -> &'static str {
        "SRANDMEMBER"
    }

    fn min_args(&self) -> usize {
        1
    }

    fn max_args(&self) -> Option<usize> {
        Some(2)
    }
}

/// SSCAN command - Incrementally iterate a set
///
/// Syntax: SSCAN key cursor [MATCH pattern] [COUNT count]
///
/// The cursor is a plain offset into the sorted, filtered member view.
pub struct SScanCommand;

impl Command for SScanCommand {
    fn execute(&self, ctx: &mut CommandContext, args: &[Bytes]) -> Reply {
        let cursor = match parse_int(&args[1]) {
            Ok(i) if i >= 0 => i as usize,
            Ok(_) => return Reply::error("ERR invalid cursor"),
            Err(e) => return e,
        };
        let options = match parse_scan_options(&args[2..]) {
            Ok(options) => options,
            Err(e) => return e,
        };

        let mut members = match ctx.store.set(&args[0]) {
            Ok(Some(set)) => members_vec(set),
            Ok(None) => Vec::new(),
            Err(_) => return Reply::wrong_type(),
        };
        members.sort();

        if let Some(pattern) = &options.pattern {
            members.retain(|m| match std::str::from_utf8(m) {
                Ok(s) => pattern.is_match(s),
                Err(_) => false,
            });
        }

        let (next, page) = scan_page(&members, cursor, options.count);
        Reply::array(vec![
            Reply::bulk_string(next.to_string()),
            Reply::array(page.iter().map(|m| Reply::bulk_string(m.clone())).collect()),
        ])
    }

    fn name(&self) -> &'static str {
        "SSCAN"
    }

    fn min_args(&self) -> usize {
        2
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sadd(ctx: &mut CommandContext, key: &str, members: &[&str]) {
        let mut args = vec![Bytes::from(key.to_string())];
        args.extend(members.iter().map(|m| Bytes::from(m.to_string())));
        SAddCommand.execute(ctx, &args);
    }

    #[test]
    fn test_sadd_srem_scard() {
        let mut ctx = CommandContext::new();

        let args = [Bytes::from("s"), Bytes::from("a"), Bytes::from("b"), Bytes::from("c")];
        assert_eq!(SAddCommand.execute(&mut ctx, &args), Reply::integer(3));
        // Re-adding existing members adds nothing
        assert_eq!(SAddCommand.execute(&mut ctx, &args), Reply::integer(0));

        assert_eq!(
            SCardCommand.execute(&mut ctx, &[Bytes::from("s")]),
            Reply::integer(3)
        );
        assert_eq!(
            SRemCommand.execute(&mut ctx, &[Bytes::from("s"), Bytes::from("a"), Bytes::from("z")]),
            Reply::integer(1)
        );
        assert_eq!(
            SCardCommand.execute(&mut ctx, &[Bytes::from("s")]),
            Reply::integer(2)
        );
    }

    #[test]
    fn test_sismember_smembers() {
        let mut ctx = CommandContext::new();
        sadd(&mut ctx, "s", &["b", "c"]);

        assert_eq!(
            SIsMemberCommand.execute(&mut ctx, &[Bytes::from("s"), Bytes::from("b")]),
            Reply::integer(1)
        );
        assert_eq!(
            SIsMemberCommand.execute(&mut ctx, &[Bytes::from("s"), Bytes::from("x")]),
            Reply::integer(0)
        );

        let result = SMembersCommand.execute(&mut ctx, &[Bytes::from("s")]);
        let members = result.as_array().unwrap();
        assert_eq!(members.len(), 2);
        assert!(members.contains(&Reply::bulk_string("b")));
        assert!(members.contains(&Reply::bulk_string("c")));
    }

    #[test]
    fn test_set_algebra() {
        let mut ctx = CommandContext::new();
        sadd(&mut ctx, "a", &["1", "2", "3"]);
        sadd(&mut ctx, "b", &["2", "3", "4"]);

        let diff = SDiffCommand.execute(&mut ctx, &[Bytes::from("a"), Bytes::from("b")]);
        assert_eq!(diff.as_array().unwrap(), &[Reply::bulk_string("1")]);

        let inter = SInterCommand.execute(&mut ctx, &[Bytes::from("a"), Bytes::from("b")]);
        assert_eq!(inter.as_array().map(|m| m.len()), Some(2));

        let union = SUnionCommand.execute(&mut ctx, &[Bytes::from("a"), Bytes::from("b")]);
        assert_eq!(union.as_array().map(|m| m.len()), Some(4));

        // Intersecting with a missing key empties the result
        let inter = SInterCommand.execute(&mut ctx, &[Bytes::from("a"), Bytes::from("missing")]);
        assert_eq!(inter, Reply::array(vec![]));
    }

    #[test]
    fn test_set_algebra_store() {
        let mut ctx = CommandContext::new();
        sadd(&mut ctx, "a", &["1", "2", "3"]);
        sadd(&mut ctx, "b", &["2", "3", "4"]);

        let result = SUnionStoreCommand.execute(
            &mut ctx,
            &[Bytes::from("dst"), Bytes::from("a"), Bytes::from("b")],
        );
        assert_eq!(result, Reply::integer(4));
        assert_eq!(
            SCardCommand.execute(&mut ctx, &[Bytes::from("dst")]),
            Reply::integer(4)
        );
    }

    #[test]
    fn test_smove() {
        let mut ctx = CommandContext::new();
        sadd(&mut ctx, "src", &["a", "b"]);
        sadd(&mut ctx, "dst", &["c"]);

        let args = [Bytes::from("src"), Bytes::from("dst"), Bytes::from("a")];
        assert_eq!(SMoveCommand.execute(&mut ctx, &args), Reply::integer(1));
        assert_eq!(SMoveCommand.execute(&mut ctx, &args), Reply::integer(0));

        assert_eq!(
            SIsMemberCommand.execute(&mut ctx, &[Bytes::from("dst"), Bytes::from("a")]),
            Reply::integer(1)
        );
    }

    #[test]
    fn test_smove_wrong_destination_type() {
        let mut ctx = CommandContext::new();
        sadd(&mut ctx, "src", &["a"]);
        ctx.store
            .put_string(Bytes::from("dst"), Bytes::from("v"))
            .unwrap();

        let args = [Bytes::from("src"), Bytes::from("dst"), Bytes::from("a")];
        assert_eq!(SMoveCommand.execute(&mut ctx, &args), Reply::wrong_type());
        // The member never left the source
        assert_eq!(
            SIsMemberCommand.execute(&mut ctx, &[Bytes::from("src"), Bytes::from("a")]),
            Reply::integer(1)
        );
    }

    #[test]
    fn test_spop_single_and_counted() {
        let mut ctx = CommandContext::new();
        sadd(&mut ctx, "s", &["a", "b", "c"]);

        let popped = SPopCommand.execute(&mut ctx, &[Bytes::from("s")]);
        assert!(popped.as_bulk_string().is_some());
        assert_eq!(
            SCardCommand.execute(&mut ctx, &[Bytes::from("s")]),
            Reply::integer(2)
        );

        let popped = SPopCommand.execute(&mut ctx, &[Bytes::from("s"), Bytes::from("5")]);
        assert_eq!(popped.as_array().map(|m| m.len()), Some(2));
        assert_eq!(
            SCardCommand.execute(&mut ctx, &[Bytes::from("s")]),
            Reply::integer(0)
        );

        assert_eq!(
            SPopCommand.execute(&mut ctx, &[Bytes::from("missing")]),
            Reply::NullBulk
        );
        assert!(SPopCommand
            .execute(&mut ctx, &[Bytes::from("s"), Bytes::from("-1")])
            .is_error());
    }

    #[test]
    fn test_srandmember_repeatable_with_seed() {
        let mut a = CommandContext::with_seed(99);
        let mut b = CommandContext::with_seed(99);
        for ctx in [&mut a, &mut b] {
            sadd(ctx, "s", &["a", "b", "c", "d", "e"]);
        }

        let args = [Bytes::from("s"), Bytes::from("3")];
        assert_eq!(
            SRandMemberCommand.execute(&mut a, &args),
            SRandMemberCommand.execute(&mut b, &args)
        );
    }

    #[test]
    fn test_srandmember_negative_count() {
        let mut ctx = CommandContext::new();
        sadd(&mut ctx, "s", &["a"]);

        let result = SRandMemberCommand.execute(&mut ctx, &[Bytes::from("s"), Bytes::from("-4")]);
        assert_eq!(
            result,
            Reply::array(vec![Reply::bulk_string("a"); 4])
        );
    }

    #[test]
    fn test_sscan_walks_whole_set() {
        let mut ctx = CommandContext::new();
        sadd(&mut ctx, "s", &["m1", "m2", "m3", "m4", "m5"]);

        let mut cursor = Bytes::from("0");
        let mut seen = Vec::new();
        loop {
            let result = SScanCommand.execute(
                &mut ctx,
                &[
                    Bytes::from("s"),
                    cursor.clone(),
                    Bytes::from("COUNT"),
                    Bytes::from("2"),
                ],
            );
            let parts = result.as_array().unwrap();
            let next = parts[0].as_bulk_string().unwrap().clone();
            for member in parts[1].as_array().unwrap() {
                seen.push(member.as_bulk_string().unwrap().clone());
            }
            if next.as_ref() == b"0" {
                break;
            }
            cursor = next;
        }

        assert_eq!(
            seen,
            vec![
                Bytes::from("m1"),
                Bytes::from("m2"),
                Bytes::from("m3"),
                Bytes::from("m4"),
                Bytes::from("m5"),
            ]
        );
    }

    #[test]
    fn test_sscan_match() {
        let mut ctx = CommandContext::new();
        sadd(&mut ctx, "s", &["user:1", "user:2", "other"]);

        let result = SScanCommand.execute(
            &mut ctx,
            &[
                Bytes::from("s"),
                Bytes::from("0"),
                Bytes::from("MATCH"),
                Bytes::from("user:*"),
            ],
        );
        let parts = result.as_array().unwrap();
        assert_eq!(parts[0], Reply::bulk_string("0"));
        assert_eq!(parts[1].as_array().map(|m| m.len()), Some(2));
    }
}
