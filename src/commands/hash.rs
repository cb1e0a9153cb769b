//! Hash commands (HSET, HGET, HGETALL, HDEL, HINCRBY and friends,
//! HSCAN, HRANDFIELD)

use super::{
    arg_eq, parse_float, parse_int, parse_scan_options, scan_page, Command, CommandContext,
};
use crate::protocol::Reply;
use bytes::Bytes;

/// HSET command - Set fields in the hash stored at key
///
/// Syntax: HSET key field value [field value ...]
pub struct HSetCommand;

impl Command for HSetCommand {
    fn execute(&self, ctx: &mut CommandContext, args: &[Bytes]) -> Reply {
        if (args.len() - 1) % 2 != 0 {
            return Reply::wrong_arity("HSET");
        }

        let hash = match ctx.store.hash_mut(&args[0]) {
            Ok(hash) => hash,
            Err(_) => return Reply::wrong_type(),
        };

        let mut added = 0;
        for pair in args[1..].chunks_exact(2) {
            if hash.insert(pair[0].clone(), pair[1].clone()).is_none() {
                added += 1;
            }
        }

        Reply::integer(added)
    }

    fn name(&self) -> &'static str {
        "HSET"
    }

    fn min_args(&self) -> usize {
        3
    }
}

/// HMSET command - Legacy spelling of HSET that replies OK
///
/// Syntax: HMSET key field value [field value ...]
pub struct HMSetCommand;

impl Command for HMSetCommand {
    fn execute(&self, ctx: &mut CommandContext, args: &[Bytes]) -> Reply {
        if (args.len() - 1) % 2 != 0 {
            return Reply::wrong_arity("HMSET");
        }

        match HSetCommand.execute(ctx, args) {
            Reply::Integer(_) => Reply::ok(),
            other => other,
        }
    }

    fn name(&self) -> &'static str {
        "HMSET"
    }

    fn min_args(&self) -> usize {
        3
    }
}

/// HSETNX command - Set a field only if it does not exist
///
/// Syntax: HSETNX key field value
pub struct HSetNxCommand;

impl Command for HSetNxCommand {
    fn execute(&self, ctx: &mut CommandContext, args: &[Bytes]) -> Reply {
        let hash = match ctx.store.hash_mut(&args[0]) {
            Ok(hash) => hash,
            Err(_) => return Reply::wrong_type(),
        };

        if hash.contains_key(&args[1]) {
            Reply::integer(0)
        } else {
            hash.insert(args[1].clone(), args[2].clone());
            Reply::integer(1)
        }
    }

    fn name(&self) -> &'static str {
        "HSETNX"
    }

    fn min_args(&self) -> usize {
        3
    }

    fn max_args(&self) -> Option<usize> {
        Some(3)
    }
}

/// HGET command - Get the value of a hash field
///
/// Syntax: HGET key field
pub struct HGetCommand;

impl Command for HGetCommand {
    fn execute(&self, ctx: &mut CommandContext, args: &[Bytes]) -> Reply {
        match ctx.store.hash(&args[0]) {
            Ok(Some(hash)) => match hash.get(&args[1]) {
                Some(value) => Reply::bulk_string(value.clone()),
                None => Reply::NullBulk,
            },
            Ok(None) => Reply::NullBulk,
            Err(_) => Reply::wrong_type(),
        }
    }

    fn name(&self) -> &'static str {
        "HGET"
    }

    fn min_args(&self) -> usize {
        2
    }

    fn max_args(&self) -> Option<usize> {
        Some(2)
    }
}

/// HMGET command - Get several hash fields at once
///
/// Syntax: HMGET key field [field ...]
pub struct HMGetCommand;

impl Command for HMGetCommand {
    fn execute(&self, ctx: &mut CommandContext, args: &[Bytes]) -> Reply {
        let hash = match ctx.store.hash(&args[0]) {
            Ok(Some(hash)) => Some(hash),
            Ok(None) => None,
            Err(_) => return Reply::wrong_type(),
        };

        Reply::array(
            args[1..]
                .iter()
                .map(|field| {
                    match hash.and_then(|h| h.get(field)) {
                        Some(value) => Reply::bulk_string(value.clone()),
                        None => Reply::NullBulk,
                    }
                })
                .collect(),
        )
    }

    fn name(&self) -> &'static str {
        "HMGET"
    }

    fn min_args(&self) -> usize {
        2
    }
}

/// HDEL command - Delete one or more hash fields
///
/// Syntax: HDEL key field [field ...]
///
/// Removes the key itself once the last field is gone.
pub struct HDelCommand;

impl Command for HDelCommand {
    fn execute(&self, ctx: &mut CommandContext, args: &[Bytes]) -> Reply {
        match ctx.store.hash(&args[0]) {
            Ok(Some(_)) => {}
            Ok(None) => return Reply::integer(0),
            Err(_) => return Reply::wrong_type(),
        }

        let mut deleted = 0;
        let now_empty = {
            let hash = match ctx.store.hash_mut(&args[0]) {
                Ok(hash) => hash,
                Err(_) => return Reply::wrong_type(),
            };
            for field in &args[1..] {
                if hash.remove(field).is_some() {
                    deleted += 1;
                }
            }
            hash.is_empty()
        };

        if now_empty {
            ctx.store.delete(&args[0]);
        }

        Reply::integer(deleted)
    }

    fn name(&self) -> &'static str {
        "HDEL"
    }

    fn min_args(&self) -> usize {
        2
    }
}

/// HEXISTS command - Test whether a field exists
///
/// Syntax: HEXISTS key field
pub struct HExistsCommand;

impl Command for HExistsCommand {
    fn execute(&self, ctx: &mut CommandContext, args: &[Bytes]) -> Reply {
        match ctx.store.hash(&args[0]) {
            Ok(Some(hash)) => Reply::integer(hash.contains_key(&args[1]) as i64),
            Ok(None) => Reply::integer(0),
            Err(_) => Reply::wrong_type(),
        }
    }

    fn name(&self) -> &'static str {
        "HEXISTS"
    }

    fn min_args(&self) -> usize {
        2
    }

    fn max_args(&self) -> Option<usize> {
        Some(2)
    }
}

/// HKEYS command - Get all field names in a hash
///
/// Syntax: HKEYS key
pub struct HKeysCommand;

impl Command for HKeysCommand {
    fn execute(&self, ctx: &mut CommandContext, args: &[Bytes]) -> Reply {
        match ctx.store.hash(&args[0]) {
            Ok(Some(hash)) => Reply::array(
                hash.keys().map(|k| Reply::bulk_string(k.clone())).collect(),
            ),
            Ok(None) => Reply::array(vec![]),
            Err(_) => Reply::wrong_type(),
        }
    }

    fn name(&self) -> &'static str {
        "HKEYS"
    }

    fn min_args(&self) -> usize {
        1
    }

    fn max_args(&self) -> Option<usize> {
        Some(1)
    }
}

/// HVALS command - Get all values in a hash
///
/// Syntax: HVALS key
pub struct HValsCommand;

impl Command for HValsCommand {
    fn execute(&self, ctx: &mut CommandContext, args: &[Bytes]) -> Reply {
        match ctx.store.hash(&args[0]) {
            Ok(Some(hash)) => Reply::array(
                hash.values().map(|v| Reply::bulk_string(v.clone())).collect(),
            ),
            Ok(None) => Reply::array(vec![]),
            Err(_) => Reply::wrong_type(),
        }
    }

    fn name(&self) -> &'static str {
        "HVALS"
    }

    fn min_args(&self) -> usize {
        1
    }

    fn max_args(&self) -> Option<usize> {
        Some(1)
    }
}

/// HLEN command - Number of fields in a hash
///
/// Syntax: HLEN key
pub struct HLenCommand;

impl Command for HLenCommand {
    fn execute(&self, ctx: &mut CommandContext, args: &[Bytes]) -> Reply {
        match ctx.store.hash(&args[0]) {
            Ok(Some(hash)) => Reply::integer(hash.len() as i64),
            Ok(None) => Reply::integer(0),
            Err(_) => Reply::wrong_type(),
        }
    }

    fn name(&self) -> &'static str {
        "HLEN"
    }

    fn min_args(&self) -> usize {
        1
    }

    fn max_args(&self) -> Option<usize> {
        Some(1)
    }
}

/// HGETALL command - Get all fields and values in a hash
///
/// Syntax: HGETALL key
pub struct HGetAllCommand;

impl Command for HGetAllCommand {
    fn execute(&self, ctx: &mut CommandContext, args: &[Bytes]) -> Reply {
        match ctx.store.hash(&args[0]) {
            Ok(Some(hash)) => {
                let mut result = Vec::with_capacity(hash.len() * 2);
                for (field, value) in hash.iter() {
                    result.push(Reply::bulk_string(field.clone()));
                    result.push(Reply::bulk_string(value.clone()));
                }
                Reply::array(result)
            }
            Ok(None) => Reply::array(vec![]),
            Err(_) => Reply::wrong_type(),
        }
    }

    fn name(&self) -> &'static str {
        "HGETALL"
    }

    fn min_args(&self) -> usize {
        1
    }

    fn max_args(&self) -> Option<usize> {
        Some(1)
    }
}

/// HSTRLEN command - Length of the value of a field
///
/// Syntax: HSTRLEN key field
pub struct HStrLenCommand;

impl Command for HStrLenCommand {
    fn execute(&self, ctx: &mut CommandContext, args: &[Bytes]) -> Reply {
        match ctx.store.hash(&args[0]) {
            Ok(Some(hash)) => {
                Reply::integer(hash.get(&args[1]).map(|v| v.len()).unwrap_or(0) as i64)
            }
            Ok(None) => Reply::integer(0),
            Err(_) => Reply::wrong_type(),
        }
    }

    fn name(&self) -> &'static str {
        "HSTRLEN"
    }

    fn min_args(&self) -> usize {
        2
    }

    fn max_args(&self) -> Option<usize> {
        Some(2)
    }
}

/// HINCRBY command - Increment the integer value of a hash field
///
/// Syntax: HINCRBY key field increment
pub struct HIncrByCommand;

impl Command for HIncrByCommand {
    fn execute(&self, ctx: &mut CommandContext, args: &[Bytes]) -> Reply {
        let increment = match parse_int(&args[2]) {
            Ok(i) => i,
            Err(e) => return e,
        };

        let hash = match ctx.store.hash_mut(&args[0]) {
            Ok(hash) => hash,
            Err(_) => return Reply::wrong_type(),
        };

        let current = match hash.get(&args[1]) {
            Some(bytes) => match std::str::from_utf8(bytes).ok().and_then(|s| s.parse::<i64>().ok())
            {
                Some(i) => i,
                None => return Reply::error("ERR hash value is not an integer"),
            },
            None => 0,
        };

        let updated = match current.checked_add(increment) {
            Some(v) => v,
            None => return Reply::error("ERR increment would overflow"),
        };

        hash.insert(args[1].clone(), Bytes::from(updated.to_string()));
        Reply::integer(updated)
    }

    fn name(&self) -> &'static str {
        "HINCRBY"
    }

    fn min_args(&self) -> usize {
        3
    }

    fn max_args(&self) -> Option<usize> {
        Some(3)
    }
}

/// HINCRBYFLOAT command - Increment the double value of a hash field
///
/// Syntax: HINCRBYFLOAT key field increment
pub struct HIncrByFloatCommand;

impl Command for HIncrByFloatCommand {
    fn execute(&self, ctx: &mut CommandContext, args: &[Bytes]) -> Reply {
        let increment = match parse_float(&args[2]) {
            Ok(f) => f,
            Err(e) => return e,
        };

        let hash = match ctx.store.hash_mut(&args[0]) {
            Ok(hash) => hash,
            Err(_) => return Reply::wrong_type(),
        };

        let current = match hash.get(&args[1]) {
            Some(bytes) => match std::str::from_utf8(bytes).ok().and_then(|s| s.parse::<f64>().ok())
            {
                Some(f) => f,
                None => return Reply::error("ERR hash value is not a float"),
            },
            None => 0.0,
        };

        let updated = current + increment;
        let text = updated.to_string();
        hash.insert(args[1].clone(), Bytes::from(text.clone()));
        Reply::bulk_string(text)
    }

    fn name(&self) -> &'static str {
        "HINCRBYFLOAT"
    }

    fn min_args(&self) -> usize {
        3
    }

    fn max_args(&self) -> Option<usize> {
        Some(3)
    }
}

/// Fields of a hash in sorted order, for scans and random picks
fn fields_vec(ctx: &CommandContext, key: &Bytes) -> Result<Vec<(Bytes, Bytes)>, Reply> {
    let mut fields: Vec<(Bytes, Bytes)> = match ctx.store.hash(key) {
        Ok(Some(hash)) => hash.iter().map(|(f, v)| (f.clone(), v.clone())).collect(),
        Ok(None) => Vec::new(),
        Err(_) => return Err(Reply::wrong_type()),
    };
    fields.sort_by(|a, b| a.0.cmp(&b.0));
    Ok(fields)
}

/// HSCAN command - Incrementally iterate a hash
///
/// Syntax: HSCAN key cursor [MATCH pattern] [COUNT count]
///
/// The page is a flat field, value, field, value sequence; the cursor
/// counts fields, not flat entries.
pub struct HScanCommand;

impl Command for HScanCommand {
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

        let mut fields = match fields_vec(ctx, &args[0]) {
            Ok(fields) => fields,
            Err(e) => return e,
        };

        if let Some(pattern) = &options.pattern {
            fields.retain(|(field, _)| match std::str::from_utf8(field) {
                Ok(s) => pattern.is_match(s),
                Err(_) => false,
            });
        }

        let (next, page) = scan_page(&fields, cursor, options.count);
        let mut flat = Vec::with_capacity(page.len() * 2);
        for (field, value) in page {
            flat.push(Reply::bulk_string(field.clone()));
            flat.push(Reply::bulk_string(value.clone()));
        }

        Reply::array(vec![
            Reply::bulk_string(next.to_string()),
            Reply::array(flat),
        ])
    }

    fn name(&self) -> &'static str {
        "HSCAN"
    }

    fn min_args(&self) -> usize {
        2
    }
}

/// HRANDFIELD command - Return random fields
///
/// Syntax: HRANDFIELD key [count [WITHVALUES]]
///
/// A negative count samples with replacement.
pub struct HRandFieldCommand;

impl Command for HRandFieldCommand {
    fn execute(&self, ctx: &mut CommandContext, args: &[Bytes]) -> Reply {
        let fields = match fields_vec(ctx, &args[0]) {
            Ok(fields) => fields,
            Err(e) => return e,
        };

        let Some(count_arg) = args.get(1) else {
            return match ctx.picker.select_one(&fields) {
                Some((field, _)) => Reply::bulk_string(field.clone()),
                None => Reply::NullBulk,
            };
        };

        let count = match parse_int(count_arg) {
            Ok(i) => i,
            Err(e) => return e,
        };
        let with_values = match args.get(2) {
            Some(token) if arg_eq(token, "WITHVALUES") => true,
            Some(_) => return Reply::error("ERR syntax error"),
            None => false,
        };

        let picked = if count < 0 {
            ctx.picker
                .select_n_with_replacement(&fields, count.unsigned_abs() as usize)
        } else {
            ctx.picker.select_n(&fields, count as usize)
        };

        let mut result = Vec::with_capacity(picked.len() * 2);
        for (field, value) in picked {
            result.push(Reply::bulk_string(field.clone()));
            if with_values {
                result.push(Reply::bulk_string(value.clone()));
            }
        }
        Reply::array(result)
    }

    fn name(&self) -> &'static str {
        "HRANDFIELD"
    }

    fn min_args(&self) -> usize {
        1
    }

    fn max_args(&self) -> Option<usize> {
        Some(3)
    }
}
