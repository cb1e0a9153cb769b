//! HyperLogLog commands (PFADD, PFCOUNT, PFMERGE)
//!
//! Cardinalities are exact: the sketch is modeled as a plain set living
//! in its own namespace.

use super::{Command, CommandContext};
use crate::protocol::Reply;
use crate::store::Set;
use bytes::Bytes;

/// PFADD command - Add elements, reporting whether anything changed
///
/// Syntax: PFADD key [element ...]
pub struct PfAddCommand;

impl Command for PfAddCommand {
    fn execute(&self, ctx: &mut CommandContext, args: &[Bytes]) -> Reply {
        let existed = ctx.store.exists(&args[0]);

        let set = match ctx.store.hll_mut(&args[0]) {
            Ok(set) => set,
            Err(_) => return Reply::wrong_type(),
        };

        let mut changed = !existed;
        for element in &args[1..] {
            if set.insert(element.clone()) {
                changed = true;
            }
        }

        Reply::integer(changed as i64)
    }

    fn name(&self) -> &'static str {
        "PFADD"
    }

    fn min_args(&self) -> usize {
        1
    }
}

/// PFCOUNT command - Cardinality of the union of the given keys
///
/// Syntax: PFCOUNT key [key ...]
pub struct PfCountCommand;

impl Command for PfCountCommand {
    fn execute(&self, ctx: &mut CommandContext, args: &[Bytes]) -> Reply {
        let mut union: Set<Bytes> = Set::default();
        for key in args {
            match ctx.store.hll(key) {
                Ok(Some(set)) => union.extend(set.iter().cloned()),
                Ok(None) => {}
                Err(_) => return Reply::wrong_type(),
            }
        }
        Reply::integer(union.len() as i64)
    }

    fn name(&self) -> &'static str {
        "PFCOUNT"
    }

    fn min_args(&self) -> usize {
        1
    }
}

/// PFMERGE command - Union source keys into the destination
///
/// Syntax: PFMERGE destkey [sourcekey ...]
pub struct PfMergeCommand;

impl Command for PfMergeCommand {
    fn execute(&self, ctx: &mut CommandContext, args: &[Bytes]) -> Reply {
        let mut merged: Set<Bytes> = Set::default();
        for key in &args[1..] {
            match ctx.store.hll(key) {
                Ok(Some(set)) => merged.extend(set.iter().cloned()),
                Ok(None) => {}
                Err(_) => return Reply::wrong_type(),
            }
        }

        let dst = match ctx.store.hll_mut(&args[0]) {
            Ok(set) => set,
            Err(_) => return Reply::wrong_type(),
        };
        dst.extend(merged);

        Reply::ok()
    }

    fn name(&self) -> &'static str {
        "PFMERGE"
    }

    fn min_args(&self) -> usize {
        1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pfadd_change_detection() {
        let mut ctx = CommandContext::new();

        let args = [Bytes::from("hll"), Bytes::from("a")];
        assert_eq!(PfAddCommand.execute(&mut ctx, &args), Reply::integer(1));
        assert_eq!(PfAddCommand.execute(&mut ctx, &args), Reply::integer(0));

        // Creating the key counts as a change even with no elements
        assert_eq!(
            PfAddCommand.execute(&mut ctx, &[Bytes::from("fresh")]),
            Reply::integer(1)
        );
        assert_eq!(
            PfAddCommand.execute(&mut ctx, &[Bytes::from("fresh")]),
            Reply::integer(0)
        );
    }

    #[test]
    fn test_pfcount_union() {
        let mut ctx = CommandContext::new();
        PfAddCommand.execute(&mut ctx, &[Bytes::from("x"), Bytes::from("a"), Bytes::from("b")]);
        PfAddCommand.execute(&mut ctx, &[Bytes::from("y"), Bytes::from("b"), Bytes::from("c")]);

        assert_eq!(
            PfCountCommand.execute(&mut ctx, &[Bytes::from("x")]),
            Reply::integer(2)
        );
        assert_eq!(
            PfCountCommand.execute(&mut ctx, &[Bytes::from("x"), Bytes::from("y")]),
            Reply::integer(3)
        );
        assert_eq!(
            PfCountCommand.execute(&mut ctx, &[Bytes::from("missing")]),
            Reply::integer(0)
        );
    }

    #[test]
    fn test_pfmerge() {
        let mut ctx = CommandContext::new();
        PfAddCommand.execute(&mut ctx, &[Bytes::from("x"), Bytes::from("a")]);
        PfAddCommand.execute(&mut ctx, &[Bytes::from("y"), Bytes::from("b")]);

        let result = PfMergeCommand.execute(
            &mut ctx,
            &[Bytes::from("dst"), Bytes::from("x"), Bytes::from("y")],
        );
        assert_eq!(result, Reply::ok());
        assert_eq!(
            PfCountCommand.execute(&mut ctx, &[Bytes::from("dst")]),
            Reply::integer(2)
        );
    }

    #[test]
    fn test_hll_namespace_is_disjoint() {
        let mut ctx = CommandContext::new();
        ctx.store
            .set_mut(&Bytes::from("s"))
            .unwrap()
            .insert(Bytes::from("a"));

        assert_eq!(
            PfAddCommand.execute(&mut ctx, &[Bytes::from("s"), Bytes::from("a")]),
            Reply::wrong_type()
        );
    }
}
