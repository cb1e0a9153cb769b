//! Sorted set commands (ZADD and friends, ranks, ranges by rank / score /
//! lex, pops, set algebra, ZRANDMEMBER, ZSCAN)
//!
//! The underlying representation is a member -> score map; every ranked
//! query re-sorts by (score, member) ascending.

use super::{
    arg_eq, fmt_score, normalize_range, parse_float, parse_int, parse_scan_options, scan_page,
    Command, CommandContext,
};
use crate::protocol::Reply;
use crate::store::{Map, MemoryStore, Value, WrongType};
use bytes::Bytes;

/// One end of a range, parsed once at handler entry
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Bound<T> {
    Unbounded,
    Open(T),
    Closed(T),
}

impl<T: PartialOrd> Bound<T> {
    /// Does `v` lie on the allowed side when this is a minimum?
    fn allows_as_min(&self, v: &T) -> bool {
        match self {
            Bound::Unbounded => true,
            Bound::Open(b) => v > b,
            Bound::Closed(b) => v >= b,
        }
    }

    /// Does `v` lie on the allowed side when this is a maximum?
    fn allows_as_max(&self, v: &T) -> bool {
        match self {
            Bound::Unbounded => true,
            Bound::Open(b) => v < b,
            Bound::Closed(b) => v <= b,
        }
    }
}

/// Parse a score bound: `-inf`, `+inf`, `(1.5` (exclusive) or `1.5`
fn parse_score_bound(arg: &Bytes) -> Result<Bound<f64>, Reply> {
    let err = || Reply::error("ERR min or max is not a float");
    let s = std::str::from_utf8(arg).map_err(|_| err())?;
    let (exclusive, body) = match s.strip_prefix('(') {
        Some(rest) => (true, rest),
        None => (false, s),
    };
    let value = match body.to_ascii_lowercase().as_str() {
        "inf" | "+inf" => f64::INFINITY,
        "-inf" => f64::NEG_INFINITY,
        _ => body.parse::<f64>().map_err(|_| err())?,
    };
    Ok(if exclusive {
        Bound::Open(value)
    } else {
        Bound::Closed(value)
    })
}

/// Parse a lex bound: `-`, `+`, `(member` (exclusive) or `[member`
fn parse_lex_bound(arg: &Bytes) -> Result<Bound<Bytes>, Reply> {
    match arg.first() {
        Some(b'-') | Some(b'+') if arg.len() == 1 => Ok(Bound::Unbounded),
        Some(b'(') => Ok(Bound::Open(arg.slice(1..))),
        Some(b'[') => Ok(Bound::Closed(arg.slice(1..))),
        _ => Err(Reply::error("ERR min or max not valid string range item")),
    }
}

/// Entries sorted by (score, member) ascending
fn sorted_entries(zset: &Map<Bytes, f64>) -> Vec<(Bytes, f64)> {
    let mut entries: Vec<(Bytes, f64)> = zset.iter().map(|(m, s)| (m.clone(), *s)).collect();
    entries.sort_by(|a, b| a.1.total_cmp(&b.1).then_with(|| a.0.cmp(&b.0)));
    entries
}

/// Which extreme a pop addresses
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Extreme {
    Min,
    Max,
}

/// Pop the entry with the lowest or highest (score, member)
///
/// Ok(None) means no data, which is what the blocking runner retries on.
pub(crate) fn try_pop_score(
    store: &mut MemoryStore,
    key: &Bytes,
    extreme: Extreme,
) -> Result<Option<(Bytes, f64)>, WrongType> {
    let entry = match store.sorted_set(key)? {
        Some(zset) if !zset.is_empty() => {
            let entries = sorted_entries(zset);
            match extreme {
                Extreme::Min => entries.first().cloned(),
                Extreme::Max => entries.last().cloned(),
            }
        }
        _ => None,
    };
    if let Some((member, _)) = &entry {
        store.sorted_set_mut(key)?.remove(member);
    }
    Ok(entry)
}

/// Flags accepted by ZADD
struct ZAddFlags {
    nx: bool,
    xx: bool,
    lt: bool,
    gt: bool,
    ch: bool,
    incr: bool,
}

/// ZADD command - Add or update members with scores
///
/// Syntax: ZADD key [NX | XX] [GT | LT] [CH] [INCR] score member [score member ...]
pub struct ZAddCommand;

impl Command for ZAddCommand {
    fn execute(&self, ctx: &mut CommandContext, args: &[Bytes]) -> Reply {
        let mut flags = ZAddFlags {
            nx: false,
            xx: false,
            lt: false,
            gt: false,
            ch: false,
            incr: false,
        };

        let mut i = 1;
        while i < args.len() {
            if arg_eq(&args[i], "NX") {
                flags.nx = true;
            } else if arg_eq(&args[i], "XX") {
                flags.xx = true;
            } else if arg_eq(&args[i], "LT") {
                flags.lt = true;
            } else if arg_eq(&args[i], "GT") {
                flags.gt = true;
            } else if arg_eq(&args[i], "CH") {
                flags.ch = true;
            } else if arg_eq(&args[i], "INCR") {
                flags.incr = true;
            } else {
                break;
            }
            i += 1;
        }

        if flags.nx && flags.xx {
            return Reply::error("ERR XX and NX options at the same time are not compatible");
        }
        if (flags.gt && flags.lt) || (flags.nx && (flags.gt || flags.lt)) {
            return Reply::error(
                "ERR GT, LT, and/or NX options at the same time are not compatible",
            );
        }

        let pairs = &args[i..];
        if pairs.is_empty() || pairs.len() % 2 != 0 {
            return Reply::wrong_arity("ZADD");
        }
        if flags.incr && pairs.len() != 2 {
            return Reply::error("ERR INCR option supports a single increment-element pair");
        }

        let mut parsed = Vec::with_capacity(pairs.len() / 2);
        for pair in pairs.chunks_exact(2) {
            let score = match parse_float(&pair[0]) {
                Ok(s) => s,
                Err(e) => return e,
            };
            parsed.push((score, pair[1].clone()));
        }

        // XX against a missing key writes nothing, so don't create one
        if flags.xx && !ctx.store.exists(&args[0]) {
            return if flags.incr {
                Reply::NullBulk
            } else {
                Reply::integer(0)
            };
        }

        let zset = match ctx.store.sorted_set_mut(&args[0]) {
            Ok(zset) => zset,
            Err(_) => return Reply::wrong_type(),
        };

        if flags.incr {
            let (increment, member) = (parsed[0].0, parsed[0].1.clone());
            let updated = match zset.get(&member) {
                Some(&old) => {
                    if flags.nx {
                        return Reply::NullBulk;
                    }
                    let new = old + increment;
                    if (flags.lt && new >= old) || (flags.gt && new <= old) {
                        return Reply::NullBulk;
                    }
                    new
                }
                None => {
                    if flags.xx {
                        return Reply::NullBulk;
                    }
                    increment
                }
            };
            zset.insert(member, updated);
            return Reply::bulk_string(fmt_score(updated));
        }

        let mut added = 0;
        let mut changed = 0;
        for (score, member) in parsed {
            match zset.get(&member) {
                Some(&old) => {
                    if flags.nx {
                        continue;
                    }
                    if (flags.lt && score >= old) || (flags.gt && score <= old) {
                        continue;
                    }
                    if score != old {
                        zset.insert(member, score);
                        changed += 1;
                    }
                }
                None => {
                    if flags.xx {
                        continue;
                    }
                    zset.insert(member, score);
                    added += 1;
                }
            }
        }

        Reply::integer(if flags.ch { added + changed } else { added })
    }

    fn name(&self) -> &'static str {
        "ZADD"
    }

    fn min_args(&self) -> usize {
        3
    }
}

/// ZREM command - Remove members
///
/// Syntax: ZREM key member [member ...]
pub struct ZRemCommand;

impl Command for ZRemCommand {
    fn execute(&self, ctx: &mut CommandContext, args: &[Bytes]) -> Reply {
        match ctx.store.sorted_set(&args[0]) {
            Ok(Some(_)) => {}
            Ok(None) => return Reply::integer(0),
            Err(_) => return Reply::wrong_type(),
        }
        let zset = match ctx.store.sorted_set_mut(&args[0]) {
            Ok(zset) => zset,
            Err(_) => return Reply::wrong_type(),
        };

        let mut removed = 0;
        for member in &args[1..] {
            if zset.remove(member).is_some() {
                removed += 1;
            }
        }

        Reply::integer(removed)
    }

    fn name(&self) -> &'static str {
        "ZREM"
    }

    fn min_args(&self) -> usize {
        2
    }
}

/// ZCARD command - Cardinality of a sorted set
///
/// Syntax: ZCARD key
pub struct ZCardCommand;

impl Command for ZCardCommand {
    fn execute(&self, ctx: &mut CommandContext, args: &[Bytes]) -> Reply {
        match ctx.store.sorted_set(&args[0]) {
            Ok(Some(zset)) => Reply::integer(zset.len() as i64),
            Ok(None) => Reply::integer(0),
            Err(_) => Reply::wrong_type(),
        }
    }

    fn name(&self) -> &'static str {
        "ZCARD"
    }

    fn min_args(&self) -> usize {
        1
    }

    fn max_args(&self) -> Option<usize> {
        Some(1)
    }
}

/// ZCOUNT command - Count members with scores inside a range
///
/// Syntax: ZCOUNT key min max
pub struct ZCountCommand;

impl Command for ZCountCommand {
    fn execute(&self, ctx: &mut CommandContext, args: &[Bytes]) -> Reply {
        let min = match parse_score_bound(&args[1]) {
            Ok(b) => b,
            Err(e) => return e,
        };
        let max = match parse_score_bound(&args[2]) {
            Ok(b) => b,
            Err(e) => return e,
        };

        match ctx.store.sorted_set(&args[0]) {
            Ok(Some(zset)) => Reply::integer(
                zset.values()
                    .filter(|s| min.allows_as_min(s) && max.allows_as_max(s))
                    .count() as i64,
            ),
            Ok(None) => Reply::integer(0),
            Err(_) => Reply::wrong_type(),
        }
    }

    fn name(&self) -> &'static str {
        "ZCOUNT"
    }

    fn min_args(&self) -> usize {
        3
    }

    fn max_args(&self) -> Option<usize> {
        Some(3)
    }
}

/// ZSCORE command - Score of a member
///
/// Syntax: ZSCORE key member
pub struct ZScoreCommand;

impl Command for ZScoreCommand {
    fn execute(&self, ctx: &mut CommandContext, args: &[Bytes]) -> Reply {
        match ctx.store.sorted_set(&args[0]) {
            Ok(Some(zset)) => match zset.get(&args[1]) {
                Some(&score) => Reply::bulk_string(fmt_score(score)),
                None => Reply::NullBulk,
            },
            Ok(None) => Reply::NullBulk,
            Err(_) => Reply::wrong_type(),
        }
    }

    fn name(&self) -> &'static str {
        "ZSCORE"
    }

    fn min_args(&self) -> usize {
        2
    }

    fn max_args(&self) -> Option<usize> {
        Some(2)
    }
}

/// ZMSCORE command - Scores of several members
///
/// Syntax: ZMSCORE key member [member ...]
pub struct ZMScoreCommand;

impl Command for ZMScoreCommand {
    fn execute(&self, ctx: &mut CommandContext, args: &[Bytes]) -> Reply {
        let zset = match ctx.store.sorted_set(&args[0]) {
            Ok(Some(zset)) => Some(zset),
            Ok(None) => None,
            Err(_) => return Reply::wrong_type(),
        };

        Reply::array(
            args[1..]
                .iter()
                .map(|member| match zset.and_then(|z| z.get(member)) {
                    Some(&score) => Reply::bulk_string(fmt_score(score)),
                    None => Reply::NullBulk,
                })
                .collect(),
        )
    }

    fn name(&self) -> &'static str {
        "ZMSCORE"
    }

    fn min_args(&self) -> usize {
        2
    }
}

fn rank_of(ctx: &CommandContext, args: &[Bytes], reverse: bool) -> Reply {
    let zset = match ctx.store.sorted_set(&args[0]) {
        Ok(Some(zset)) => zset,
        Ok(None) => return Reply::NullBulk,
        Err(_) => return Reply::wrong_type(),
    };

    let entries = sorted_entries(zset);
    let position = entries.iter().position(|(m, _)| m == &args[1]);
    match position {
        Some(position) => {
            let rank = if reverse {
                entries.len() - 1 - position
            } else {
                position
            };
            Reply::integer(rank as i64)
        }
        None => Reply::NullBulk,
    }
}

/// ZRANK command - Ascending rank of a member
///
/// Syntax: ZRANK key member
pub struct ZRankCommand;

impl Command for ZRankCommand {
    fn execute(&self, ctx: &mut CommandContext, args: &[Bytes]) -> Reply {
        rank_of(ctx, args, false)
    }

    fn name(&self) -> &'static str {
        "ZRANK"
    }

    fn min_args(&self) -> usize {
        2
    }

    fn max_args(&self) -> Option<usize> {
        Some(2)
    }
}

/// ZREVRANK command - Descending rank of a member
///
/// Syntax: ZREVRANK key member
pub struct ZRevRankCommand;

impl Command for ZRevRankCommand {
    fn execute(&self, ctx: &mut CommandContext, args: &[Bytes]) -> Reply {
        rank_of(ctx, args, true)
    }

    fn name(&self) -> &'static str {
        "ZREVRANK"
    }

    fn min_args(&self) -> usize {
        2
    }

    fn max_args(&self) -> Option<usize> {
        Some(2)
    }
}

/// ZINCRBY command - Increment a member's score
///
/// Syntax: ZINCRBY key increment member
pub struct ZIncrByCommand;

impl Command for ZIncrByCommand {
    fn execute(&self, ctx: &mut CommandContext, args: &[Bytes]) -> Reply {
        let increment = match parse_float(&args[1]) {
            Ok(f) => f,
            Err(e) => return e,
        };

        let zset = match ctx.store.sorted_set_mut(&args[0]) {
            Ok(zset) => zset,
            Err(_) => return Reply::wrong_type(),
        };

        let updated = zset.get(&args[2]).copied().unwrap_or(0.0) + increment;
        zset.insert(args[2].clone(), updated);
        Reply::bulk_string(fmt_score(updated))
    }

    fn name(&self) -> &'static str {
        "ZINCRBY"
    }

    fn min_args(&self) -> usize {
        3
    }

    fn max_args(&self) -> Option<usize> {
        Some(3)
    }
}

/// Render a slice of entries, optionally appending scores
fn entries_reply(entries: &[(Bytes, f64)], with_scores: bool) -> Reply {
    let mut result = Vec::with_capacity(entries.len() * if with_scores { 2 } else { 1 });
    for (member, score) in entries {
        result.push(Reply::bulk_string(member.clone()));
        if with_scores {
            result.push(Reply::bulk_string(fmt_score(*score)));
        }
    }
    Reply::array(result)
}

fn range_by_rank(ctx: &CommandContext, args: &[Bytes], reverse: bool) -> Reply {
    let start = match parse_int(&args[1]) {
        Ok(i) => i,
        Err(e) => return e,
    };
    let stop = match parse_int(&args[2]) {
        Ok(i) => i,
        Err(e) => return e,
    };
    let with_scores = match args.get(3) {
        Some(token) if arg_eq(token, "WITHSCORES") => true,
        Some(_) => return Reply::error("ERR syntax error"),
        None => false,
    };

    let zset = match ctx.store.sorted_set(&args[0]) {
        Ok(Some(zset)) => zset,
        Ok(None) => return Reply::array(vec![]),
        Err(_) => return Reply::wrong_type(),
    };

    let mut entries = sorted_entries(zset);
    if reverse {
        entries.reverse();
    }

    match normalize_range(start, stop, entries.len()) {
        Some((start, stop)) => entries_reply(&entries[start..=stop], with_scores),
        None => Reply::array(vec![]),
    }
}

/// ZRANGE command - Members by ascending rank
///
/// Syntax: ZRANGE key start stop [WITHSCORES]
pub struct ZRangeCommand;

impl Command for ZRangeCommand {
    fn execute(&self, ctx: &mut CommandContext, args: &[Bytes]) -> Reply {
        range_by_rank(ctx, args, false)
    }

    fn name(&self) -> &'static str {
        "ZRANGE"
    }

    fn min_args(&self) -> usize {
        3
    }

    fn max_args(&self) -> Option<usize> {
        Some(4)
    }
}

/// ZREVRANGE command - Members by descending rank
///
/// Syntax: ZREVRANGE key start stop [WITHSCORES]
pub struct ZRevRangeCommand;

impl Command for ZRevRangeCommand {
    fn execute(&self, ctx: &mut CommandContext, args: &[Bytes]) -> Reply {
        range_by_rank(ctx, args, true)
    }

    fn name(&self) -> &'static str {
        "ZREVRANGE"
    }

    fn min_args(&self) -> usize {
        3
    }

    fn max_args(&self) -> Option<usize> {
        Some(4)
    }
}

/// The `[WITHSCORES] [LIMIT offset count]` tail of the by-score ranges
struct RangeOptions {
    with_scores: bool,
    limit: Option<(i64, i64)>,
}

fn parse_range_options(args: &[Bytes]) -> Result<RangeOptions, Reply> {
    let mut options = RangeOptions {
        with_scores: false,
        limit: None,
    };

    let mut i = 0;
    while i < args.len() {
        if arg_eq(&args[i], "WITHSCORES") {
            options.with_scores = true;
            i += 1;
        } else if arg_eq(&args[i], "LIMIT") && i + 2 < args.len() {
            let offset = parse_int(&args[i + 1])?;
            let count = parse_int(&args[i + 2])?;
            options.limit = Some((offset, count));
            i += 3;
        } else {
            return Err(Reply::error("ERR syntax error"));
        }
    }

    Ok(options)
}

/// Apply a LIMIT window to a filtered view; a negative count means "to
/// the end", a negative offset yields nothing
fn apply_limit(entries: Vec<(Bytes, f64)>, limit: Option<(i64, i64)>) -> Vec<(Bytes, f64)> {
    let Some((offset, count)) = limit else {
        return entries;
    };
    if offset < 0 {
        return Vec::new();
    }
    let offset = (offset as usize).min(entries.len());
    let remaining = entries.len() - offset;
    let take = if count < 0 {
        remaining
    } else {
        (count as usize).min(remaining)
    };
    entries.into_iter().skip(offset).take(take).collect()
}

fn range_by_score(ctx: &CommandContext, args: &[Bytes], reverse: bool) -> Reply {
    // For the REV variant the bounds arrive as max min
    let (min_arg, max_arg) = if reverse {
        (&args[2], &args[1])
    } else {
        (&args[1], &args[2])
    };
    let min = match parse_score_bound(min_arg) {
        Ok(b) => b,
        Err(e) => return e,
    };
    let max = match parse_score_bound(max_arg) {
        Ok(b) => b,
        Err(e) => return e,
    };
    let options = match parse_range_options(&args[3..]) {
        Ok(options) => options,
        Err(e) => return e,
    };

    let zset = match ctx.store.sorted_set(&args[0]) {
        Ok(Some(zset)) => zset,
        Ok(None) => return Reply::array(vec![]),
        Err(_) => return Reply::wrong_type(),
    };

    let mut entries = sorted_entries(zset);
    entries.retain(|(_, s)| min.allows_as_min(s) && max.allows_as_max(s));
    if reverse {
        entries.reverse();
    }
    let entries = apply_limit(entries, options.limit);

    entries_reply(&entries, options.with_scores)
}

/// ZRANGEBYSCORE command - Members inside a score range, ascending
///
/// Syntax: ZRANGEBYSCORE key min max [WITHSCORES] [LIMIT offset count]
pub struct ZRangeByScoreCommand;

impl Command for ZRangeByScoreCommand {
    fn execute(&self, ctx: &mut CommandContext, args: &[Bytes]) -> Reply {
        range_by_score(ctx, args, false)
    }

    fn name(&self) -> &'static str {
        "ZRANGEBYSCORE"
    }

    fn min_args(&self) -> usize {
        3
    }
}

/// ZREVRANGEBYSCORE command - Members inside a score range, descending
///
/// Syntax: ZREVRANGEBYSCORE key max min [WITHSCORES] [LIMIT offset count]
pub struct ZRevRangeByScoreCommand;

impl Command for ZRevRangeByScoreCommand {
    fn execute(&self, ctx: &mut CommandContext, args: &[Bytes]) -> Reply {
        range_by_score(ctx, args, true)
    }

    fn name(&self) -> &'static str {
        "ZREVRANGEBYSCORE"
    }

    fn min_args(&self) -> usize {
        3
    }
}

/// Members inside a lex range, sorted by member bytes
fn lex_filtered(
    zset: &Map<Bytes, f64>,
    min: &Bound<Bytes>,
    max: &Bound<Bytes>,
) -> Vec<(Bytes, f64)> {
    let mut entries: Vec<(Bytes, f64)> = zset
        .iter()
        .filter(|(m, _)| min.allows_as_min(m) && max.allows_as_max(m))
        .map(|(m, s)| (m.clone(), *s))
        .collect();
    entries.sort_by(|a, b| a.0.cmp(&b.0));
    entries
}

fn range_by_lex(ctx: &CommandContext, args: &[Bytes], reverse: bool) -> Reply {
    let (min_arg, max_arg) = if reverse {
        (&args[2], &args[1])
    } else {
        (&args[1], &args[2])
    };
    let min = match parse_lex_bound(min_arg) {
        Ok(b) => b,
        Err(e) => return e,
    };
    let max = match parse_lex_bound(max_arg) {
        Ok(b) => b,
        Err(e) => return e,
    };
    let options = match parse_range_options(&args[3..]) {
        Ok(options) => options,
        Err(e) => return e,
    };
    if options.with_scores {
        return Reply::error("ERR syntax error");
    }

    let zset = match ctx.store.sorted_set(&args[0]) {
        Ok(Some(zset)) => zset,
        Ok(None) => return Reply::array(vec![]),
        Err(_) => return Reply::wrong_type(),
    };

    let mut entries = lex_filtered(zset, &min, &max);
    if reverse {
        entries.reverse();
    }
    let entries = apply_limit(entries, options.limit);

    entries_reply(&entries, false)
}

/// ZRANGEBYLEX command - Members inside a lexicographic range
///
/// Syntax: ZRANGEBYLEX key min max [LIMIT offset count]
pub struct ZRangeByLexCommand;

impl Command for ZRangeByLexCommand {
    fn execute(&self, ctx: &mut CommandContext, args: &[Bytes]) -> Reply {
        range_by_lex(ctx, args, false)
    }

    fn name(&self) -> &'static str {
        "ZRANGEBYLEX"
    }

    fn min_args(&self) -> usize {
        3
    }
}

/// ZREVRANGEBYLEX command - Lexicographic range, descending
///
/// Syntax: ZREVRANGEBYLEX key max min [LIMIT offset count]
pub struct ZRevRangeByLexCommand;

impl Command for ZRevRangeByLexCommand {
    fn execute(&self, ctx: &mut CommandContext, args: &[Bytes]) -> Reply {
        range_by_lex(ctx, args, true)
    }

    fn name(&self) -> &'static str {
        "ZREVRANGEBYLEX"
    }

    fn min_args(&self) -> usize {
        3
    }
}

/// ZLEXCOUNT command - Count members inside a lexicographic range
///
/// Syntax: ZLEXCOUNT key min max
pub struct ZLexCountCommand;

impl Command for ZLexCountCommand {
    fn execute(&self, ctx: &mut CommandContext, args: &[Bytes]) -> Reply {
        let min = match parse_lex_bound(&args[1]) {
            Ok(b) => b,
            Err(e) => return e,
        };
        let max = match parse_lex_bound(&args[2]) {
            Ok(b) => b,
            Err(e) => return e,
        };

        match ctx.store.sorted_set(&args[0]) {
            Ok(Some(zset)) => Reply::integer(lex_filtered(zset, &min, &max).len() as i64),
            Ok(None) => Reply::integer(0),
            Err(_) => Reply::wrong_type(),
        }
    }

    fn name(&self) -> &'static str {
        "ZLEXCOUNT"
    }

    fn min_args(&self) -> usize {
        3
    }

    fn max_args(&self) -> Option<usize> {
        Some(3)
    }
}

/// Remove every listed member from the sorted set at `key`
fn remove_members(ctx: &mut CommandContext, key: &Bytes, members: Vec<Bytes>) -> Reply {
    let zset = match ctx.store.sorted_set_mut(key) {
        Ok(zset) => zset,
        Err(_) => return Reply::wrong_type(),
    };
    let mut removed = 0;
    for member in members {
        if zset.remove(&member).is_some() {
            removed += 1;
        }
    }
    Reply::integer(removed)
}

/// ZREMRANGEBYRANK command - Remove members inside a rank range
///
/// Syntax: ZREMRANGEBYRANK key start stop
pub struct ZRemRangeByRankCommand;

impl Command for ZRemRangeByRankCommand {
    fn execute(&self, ctx: &mut CommandContext, args: &[Bytes]) -> Reply {
        let start = match parse_int(&args[1]) {
            Ok(i) => i,
            Err(e) => return e,
        };
        let stop = match parse_int(&args[2]) {
            Ok(i) => i,
            Err(e) => return e,
        };

        let doomed = match ctx.store.sorted_set(&args[0]) {
            Ok(Some(zset)) => {
                let entries = sorted_entries(zset);
                match normalize_range(start, stop, entries.len()) {
                    Some((start, stop)) => entries[start..=stop]
                        .iter()
                        .map(|(m, _)| m.clone())
                        .collect(),
                    None => Vec::new(),
                }
            }
            Ok(None) => return Reply::integer(0),
            Err(_) => return Reply::wrong_type(),
        };

        remove_members(ctx, &args[0], doomed)
    }

    fn name(&self) -> &'static str {
        "ZREMRANGEBYRANK"
    }

    fn min_args(&self) -> usize {
        3
    }

    fn max_args(&self) -> Option<usize> {
        Some(3)
    }
}

/// ZREMRANGEBYSCORE command - Remove members inside a score range
///
/// Syntax: ZREMRANGEBYSCORE key min max
pub struct ZRemRangeByScoreCommand;

impl Command for ZRemRangeByScoreCommand {
    fn execute(&self, ctx: &mut CommandContext, args: &[Bytes]) -> Reply {
        let min = match parse_score_bound(&args[1]) {
            Ok(b) => b,
            Err(e) => return e,
        };
        let max = match parse_score_bound(&args[2]) {
            Ok(b) => b,
            Err(e) => return e,
        };

        let doomed = match ctx.store.sorted_set(&args[0]) {
            Ok(Some(zset)) => zset
                .iter()
                .filter(|(_, s)| min.allows_as_min(s) && max.allows_as_max(s))
                .map(|(m, _)| m.clone())
                .collect(),
            Ok(None) => return Reply::integer(0),
            Err(_) => return Reply::wrong_type(),
        };

        remove_members(ctx, &args[0], doomed)
    }

    fn name(&self) -> &'static str {
        "ZREMRANGEBYSCORE"
    }

    fn min_args(&self) -> usize {
        3
    }

    fn max_args(&self) -> Option<usize> {
        Some(3)
    }
}

/// ZREMRANGEBYLEX command - Remove members inside a lexicographic range
///
/// Syntax: ZREMRANGEBYLEX key min max
pub struct ZRemRangeByLexCommand;

impl Command for ZRemRangeByLexCommand {
    fn execute(&self, ctx: &mut CommandContext, args: &[Bytes]) -> Reply {
        let min = match parse_lex_bound(&args[1]) {
            Ok(b) => b,
            Err(e) => return e,
        };
        let max = match parse_lex_bound(&args[2]) {
            Ok(b) => b,
            Err(e) => return e,
        };

        let doomed = match ctx.store.sorted_set(&args[0]) {
            Ok(Some(zset)) => lex_filtered(zset, &min, &max)
                .into_iter()
                .map(|(m, _)| m)
                .collect(),
            Ok(None) => return Reply::integer(0),
            Err(_) => return Reply::wrong_type(),
        };

        remove_members(ctx, &args[0], doomed)
    }

    fn name(&self) -> &'static str {
        "ZREMRANGEBYLEX"
    }

    fn min_args(&self) -> usize {
        3
    }

    fn max_args(&self) -> Option<usize> {
        Some(3)
    }
}

fn pop_extreme(ctx: &mut CommandContext, args: &[Bytes], extreme: Extreme) -> Reply {
    let count = match args.get(1) {
        Some(count_arg) => match parse_int(count_arg) {
            Ok(i) if i >= 0 => i as usize,
            Ok(_) => return Reply::error("ERR value is out of range, must be positive"),
            Err(e) => return e,
        },
        None => 1,
    };

    let mut result = Vec::new();
    for _ in 0..count {
        match try_pop_score(&mut ctx.store, &args[0], extreme) {
            Ok(Some((member, score))) => {
                result.push(Reply::bulk_string(member));
                result.push(Reply::bulk_string(fmt_score(score)));
            }
            Ok(None) => break,
            Err(_) => return Reply::wrong_type(),
        }
    }
    Reply::array(result)
}

/// ZPOPMIN command - Remove and return the lowest-scored entries
///
/// Syntax: ZPOPMIN key [count]
pub struct ZPopMinCommand;

impl Command for ZPopMinCommand {
    fn execute(&self, ctx: &mut CommandContext, args: &[Bytes]) -> Reply {
        pop_extreme(ctx, args, Extreme::Min)
    }

    fn name(&self) -> &'static str {
        "ZPOPMIN"
    }

    fn min_args(&self) -> usize {
        1
    }

    fn max_args(&self) -> Option<usize> {
        Some(2)
    }
}

/// ZPOPMAX command - Remove and return the highest-scored entries
///
/// Syntax: ZPOPMAX key [count]
pub struct ZPopMaxCommand;

impl Command for ZPopMaxCommand {
    fn execute(&self, ctx: &mut CommandContext, args: &[Bytes]) -> Reply {
        pop_extreme(ctx, args, Extreme::Max)
    }

    fn name(&self) -> &'static str {
        "ZPOPMAX"
    }

    fn min_args(&self) -> usize {
        1
    }

    fn max_args(&self) -> Option<usize> {
        Some(2)
    }
}

/// How the algebra commands merge scores for a shared member
#[derive(Clone, Copy)]
enum Aggregate {
    Sum,
    Min,
    Max,
}

impl Aggregate {
    fn apply(self, a: f64, b: f64) -> f64 {
        match self {
            Aggregate::Sum => a + b,
            Aggregate::Min => a.min(b),
            Aggregate::Max => a.max(b),
        }
    }
}

/// How the algebra commands combine their operand sets
#[derive(Clone, Copy)]
enum ZSetOp {
    Diff,
    Inter,
    Union,
}

/// Parsed argument shape shared by the six algebra commands
struct ZSetOpArgs {
    keys: Vec<Bytes>,
    weights: Vec<f64>,
    aggregate: Aggregate,
    with_scores: bool,
}

fn parse_zsetop_args(args: &[Bytes], allow_with_scores: bool) -> Result<ZSetOpArgs, Reply> {
    let numkeys = match parse_int(&args[0]) {
        Ok(n) if n > 0 => n as usize,
        Ok(_) => {
            return Err(Reply::error(
                "ERR at least 1 input key is needed for this command",
            ))
        }
        Err(e) => return Err(e),
    };
    if args.len() < 1 + numkeys {
        return Err(Reply::error("ERR syntax error"));
    }

    let keys = args[1..1 + numkeys].to_vec();
    let mut weights = vec![1.0; numkeys];
    let mut aggregate = Aggregate::Sum;
    let mut with_scores = false;

    let mut i = 1 + numkeys;
    while i < args.len() {
        if arg_eq(&args[i], "WEIGHTS") {
            // A weight count differing from numkeys is an error
            if args.len() < i + 1 + numkeys {
                return Err(Reply::error("ERR syntax error"));
            }
            for (w, arg) in weights.iter_mut().zip(&args[i + 1..i + 1 + numkeys]) {
                *w = parse_float(arg).map_err(|_| Reply::error("ERR weight value is not a float"))?;
            }
            i += 1 + numkeys;
            if i < args.len() && parse_float(&args[i]).is_ok() {
                return Err(Reply::error("ERR syntax error"));
            }
        } else if arg_eq(&args[i], "AGGREGATE") && i + 1 < args.len() {
            aggregate = if arg_eq(&args[i + 1], "SUM") {
                Aggregate::Sum
            } else if arg_eq(&args[i + 1], "MIN") {
                Aggregate::Min
            } else if arg_eq(&args[i + 1], "MAX") {
                Aggregate::Max
            } else {
                return Err(Reply::error("ERR syntax error"));
            };
            i += 2;
        } else if allow_with_scores && arg_eq(&args[i], "WITHSCORES") {
            with_scores = true;
            i += 1;
        } else {
            return Err(Reply::error("ERR syntax error"));
        }
    }

    Ok(ZSetOpArgs {
        keys,
        weights,
        aggregate,
        with_scores,
    })
}

/// Combine the sorted sets named by `op_args.keys` into one member map
fn combine_zsets(
    ctx: &CommandContext,
    op_args: &ZSetOpArgs,
    op: ZSetOp,
) -> Result<Map<Bytes, f64>, Reply> {
    let mut operands = Vec::with_capacity(op_args.keys.len());
    for key in &op_args.keys {
        match ctx.store.sorted_set(key) {
            Ok(Some(zset)) => operands.push(Some(zset)),
            Ok(None) => operands.push(None),
            Err(_) => return Err(Reply::wrong_type()),
        }
    }

    let mut result: Map<Bytes, f64> = Map::default();
    match op {
        ZSetOp::Union => {
            for (operand, weight) in operands.iter().zip(&op_args.weights) {
                let Some(zset) = operand else { continue };
                for (member, score) in zset.iter() {
                    let weighted = score * weight;
                    match result.get(member) {
                        Some(&existing) => {
                            result
                                .insert(member.clone(), op_args.aggregate.apply(existing, weighted));
                        }
                        None => {
                            result.insert(member.clone(), weighted);
                        }
                    }
                }
            }
        }
        ZSetOp::Inter => {
            if let Some(zset) = operands[0] {
                for (member, score) in zset.iter() {
                    if operands[1..].iter().all(|o| {
                        o.map(|z| z.contains_key(member)).unwrap_or(false)
                    }) {
                        let mut merged = score * op_args.weights[0];
                        for (operand, weight) in operands[1..].iter().zip(&op_args.weights[1..]) {
                            if let Some(other) = operand.and_then(|z| z.get(member)) {
                                merged = op_args.aggregate.apply(merged, other * weight);
                            }
                        }
                        result.insert(member.clone(), merged);
                    }
                }
            }
        }
        ZSetOp::Diff => {
            if let Some(zset) = operands[0] {
                for (member, score) in zset.iter() {
                    let shadowed = operands[1..]
                        .iter()
                        .any(|o| o.map(|z| z.contains_key(member)).unwrap_or(false));
                    if !shadowed {
                        result.insert(member.clone(), score * op_args.weights[0]);
                    }
                }
            }
        }
    }

    Ok(result)
}

fn zset_algebra(ctx: &mut CommandContext, args: &[Bytes], op: ZSetOp) -> Reply {
    let op_args = match parse_zsetop_args(args, true) {
        Ok(parsed) => parsed,
        Err(e) => return e,
    };
    match combine_zsets(ctx, &op_args, op) {
        Ok(result) => entries_reply(&sorted_entries(&result), op_args.with_scores),
        Err(e) => e,
    }
}

fn zset_algebra_store(ctx: &mut CommandContext, args: &[Bytes], op: ZSetOp) -> Reply {
    let op_args = match parse_zsetop_args(&args[1..], false) {
        Ok(parsed) => parsed,
        Err(e) => return e,
    };
    match combine_zsets(ctx, &op_args, op) {
        Ok(result) => {
            let cardinality = result.len() as i64;
            ctx.store.put(args[0].clone(), Value::SortedSet(result));
            Reply::integer(cardinality)
        }
        Err(e) => e,
    }
}

macro_rules! zset_algebra_command {
    ($name:ident, $opcode:literal, $op:expr, $min:literal, $store:literal) => {
        #[doc = concat!($opcode, " command")]
        pub struct $name;

        impl Command for $name {
            fn execute(&self, ctx: &mut CommandContext, args: &[Bytes]) -> Reply {
                if $store {
                    zset_algebra_store(ctx, args, $op)
                } else {
                    zset_algebra(ctx, args, $op)
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

zset_algebra_command!(ZDiffCommand, "ZDIFF", ZSetOp::Diff, 2, false);
zset_algebra_command!(ZDiffStoreCommand, "ZDIFFSTORE", ZSetOp::Diff, 3, true);
zset_algebra_command!(ZInterCommand, "ZINTER", ZSetOp::Inter, 2, false);
zset_algebra_command!(ZInterStoreCommand, "ZINTERSTORE", ZSetOp::Inter, 3, true);
zset_algebra_command!(ZUnionCommand, "ZUNION", ZSetOp::Union, 2, false);
zset_algebra_command!(ZUnionStoreCommand, "ZUNIONSTORE", ZSetOp::Union, 3, true);

/// ZRANDMEMBER command - Return random members
///
/// Syntax: ZRANDMEMBER key [count [WITHSCORES]]
///
/// A negative count samples with replacement.
pub struct ZRandMemberCommand;

impl Command for ZRandMemberCommand {
    fn execute(&self, ctx: &mut CommandContext, args: &[Bytes]) -> Reply {
        let entries = match ctx.store.sorted_set(&args[0]) {
            Ok(Some(zset)) => sorted_entries(zset),
            Ok(None) => Vec::new(),
            Err(_) => return Reply::wrong_type(),
        };

        let Some(count_arg) = args.get(1) else {
            return match ctx.picker.select_one(&entries) {
                Some((member, _)) => Reply::bulk_string(member.clone()),
                None => Reply::NullBulk,
            };
        };

        let count = match parse_int(count_arg) {
            Ok(i) => i,
            Err(e) => return e,
        };
        let with_scores = match args.get(2) {
            Some(token) if arg_eq(token, "WITHSCORES") => true,
            Some(_) => return Reply::error("ERR syntax error"),
            None => false,
        };

        let picked = if count < 0 {
            ctx.picker
                .select_n_with_replacement(&entries, count.unsigned_abs() as usize)
        } else {
            ctx.picker.select_n(&entries, count as usize)
        };

        let mut result = Vec::with_capacity(picked.len() * 2);
        for (member, score) in picked {
            result.push(Reply::bulk_string(member.clone()));
            if with_scores {
                result.push(Reply::bulk_string(fmt_score(*score)));
            }
        }
        Reply::array(result)
    }

    fn name(&self) -> &'static str {
        "ZRANDMEMBER"
    }

    fn min_args(&self) -> usize {
        1
    }

    fn max_args(&self) -> Option<usize> {
        Some(3)
    }
}

/// ZSCAN command - Incrementally iterate a sorted set
///
/// Syntax: ZSCAN key cursor [MATCH pattern] [COUNT count]
///
/// The page is a flat member, score sequence over the (score, member)
/// sorted view.
pub struct ZScanCommand;

impl Command for ZScanCommand {
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

        let mut entries = match ctx.store.sorted_set(&args[0]) {
            Ok(Some(zset)) => sorted_entries(zset),
            Ok(None) => Vec::new(),
            Err(_) => return Reply::wrong_type(),
        };

        if let Some(pattern) = &options.pattern {
            entries.retain(|(member, _)| match std::str::from_utf8(member) {
                Ok(s) => pattern.is_match(s),
                Err(_) => false,
            });
        }

        let (next, page) = scan_page(&entries, cursor, options.count);
        let mut flat = Vec::with_capacity(page.len() * 2);
        for (member, score) in page {
            flat.push(Reply::bulk_string(member.clone()));
            flat.push(Reply::bulk_string(fmt_score(*score)));
        }

        Reply::array(vec![
            Reply::bulk_string(next.to_string()),
            Reply::array(flat),
        ])
    }

    fn name(&self) -> &'static str {
        "ZSCAN"
    }

    fn min_args(&self) -> usize {
        2
    }
}
