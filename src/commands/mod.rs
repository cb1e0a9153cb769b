//! Command execution module
//!
//! Provides a unified interface for all commands through the Command trait.
//! Each namespace's commands live in a separate file for high cohesion.

mod context;
mod registry;

// Command implementations
mod admin;
mod connection;
mod counter;
mod hash;
mod hll;
mod key;
mod list;
mod search;
mod set;
mod string;
mod zset;

pub use context::CommandContext;
pub use registry::CommandRegistry;

pub(crate) use list::{try_move, try_pop, End};
pub(crate) use zset::{try_pop_score, Extreme};

use crate::protocol::Reply;
use bytes::Bytes;
use regex::Regex;

/// Command execution trait
///
/// All commands implement this trait with a single execute method.
/// This provides loose coupling between command implementations and the
/// dispatcher.
pub trait Command: Send + Sync {
    /// Execute the command with the given context and arguments
    ///
    /// Arguments:
    /// - ctx: mutable reference to the command context (store + picker)
    /// - args: command arguments (excluding the command name itself)
    ///
    /// Returns:
    /// - Reply representing the response to hand back to the caller
    fn execute(&self, ctx: &mut CommandContext, args: &[Bytes]) -> Reply;

    /// Get the command name (for registration and arity errors)
    fn name(&self) -> &'static str;

    /// Get the minimum number of arguments required
    fn min_args(&self) -> usize {
        0
    }

    /// Get the maximum number of arguments (None = unlimited)
    fn max_args(&self) -> Option<usize> {
        None
    }
}

/// Parse a base-10 integer argument
pub(crate) fn parse_int(arg: &Bytes) -> Result<i64, Reply> {
    std::str::from_utf8(arg)
        .ok()
        .and_then(|s| s.parse::<i64>().ok())
        .ok_or_else(|| Reply::error("ERR value is not an integer or out of range"))
}

/// Parse a double argument; accepts inf/+inf/-inf spellings
pub(crate) fn parse_float(arg: &Bytes) -> Result<f64, Reply> {
    let s = std::str::from_utf8(arg)
        .map_err(|_| Reply::error("ERR value is not a valid float"))?;
    match s.to_ascii_lowercase().as_str() {
        "inf" | "+inf" => Ok(f64::INFINITY),
        "-inf" => Ok(f64::NEG_INFINITY),
        _ => s
            .parse::<f64>()
            .map_err(|_| Reply::error("ERR value is not a valid float")),
    }
}

/// Textual form of a score, as emitted in score-bearing replies
///
/// Rust's default double formatting already renders 1.0 as "1", which is
/// the stripped form every score reply uses.
pub(crate) fn fmt_score(score: f64) -> String {
    score.to_string()
}

/// Case-insensitive match of an option token like WEIGHTS or WITHSCORES
pub(crate) fn arg_eq(arg: &Bytes, token: &str) -> bool {
    arg.len() == token.len() && arg.eq_ignore_ascii_case(token.as_bytes())
}

/// Translate a MATCH glob into an anchored regex
///
/// Only `*` is a wildcard (mapped to `.*`); every other character is
/// literal.
pub(crate) fn glob_to_regex(pattern: &Bytes) -> Result<Regex, Reply> {
    let pattern = std::str::from_utf8(pattern)
        .map_err(|_| Reply::error("ERR invalid pattern encoding"))?;
    let mut translated = String::with_capacity(pattern.len() + 8);
    translated.push('^');
    for ch in pattern.chars() {
        if ch == '*' {
            translated.push_str(".*");
        } else {
            translated.push_str(&regex::escape(&ch.to_string()));
        }
    }
    translated.push('$');
    Regex::new(&translated).map_err(|_| Reply::error("ERR invalid pattern"))
}

/// Options accepted by the *SCAN family
pub(crate) struct ScanOptions {
    pub pattern: Option<Regex>,
    pub count: usize,
}

/// Parse the `[MATCH pattern] [COUNT n]` tail of a scan command
pub(crate) fn parse_scan_options(args: &[Bytes]) -> Result<ScanOptions, Reply> {
    let mut options = ScanOptions {
        pattern: None,
        count: 10,
    };

    let mut i = 0;
    while i < args.len() {
        if arg_eq(&args[i], "MATCH") && i + 1 < args.len() {
            options.pattern = Some(glob_to_regex(&args[i + 1])?);
            i += 2;
        } else if arg_eq(&args[i], "COUNT") && i + 1 < args.len() {
            let count = parse_int(&args[i + 1])?;
            if count <= 0 {
                return Err(Reply::error("ERR syntax error"));
            }
            options.count = count as usize;
            i += 2;
        } else {
            return Err(Reply::error("ERR syntax error"));
        }
    }

    Ok(options)
}

/// Window `[cursor, cursor+count)` of a scan view, with the follow-up cursor
///
/// The cursor is a plain offset into the filtered view; 0 signals the end
/// of the walk.
pub(crate) fn scan_page<T>(items: &[T], cursor: usize, count: usize) -> (usize, &[T]) {
    let start = cursor.min(items.len());
    let end = (start + count).min(items.len());
    let next = if end >= items.len() { 0 } else { end };
    (next, &items[start..end])
}

/// Normalize a possibly-negative index pair against a container length,
/// yielding an inclusive `[start, stop]` window or None when it is empty
pub(crate) fn normalize_range(start: i64, stop: i64, len: usize) -> Option<(usize, usize)> {
    let len = len as i64;
    let start = if start < 0 { (len + start).max(0) } else { start };
    let stop = if stop < 0 { len + stop } else { stop.min(len - 1) };
    if start > stop || start >= len || stop < 0 {
        return None;
    }
    Some((start as usize, stop as usize))
}
