//! Command executor
//!
//! The public contract of the crate: feed a decoded command vector in,
//! get a decoded reply out. Every non-blocking command runs as one
//! atomic unit under the executor's lock; blocking commands retry their
//! body whenever another command commits, until data appears or their
//! timeout fires.

use crate::commands::{fmt_score, parse_int, try_move, try_pop, try_pop_score, End, Extreme};
use crate::dispatch::Dispatcher;
use crate::protocol::{ProtocolError, Reply};
use bytes::Bytes;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Mutex, Notify};
use tokio::time::Instant;
use tracing::debug;

/// Shape of a blocking request after opcode classification
enum BlockingKind {
    /// BLPOP / BRPOP over one or more list keys
    PopList(End),
    /// BRPOPLPUSH (fixed tail-to-head) and BLMOVE (explicit ends)
    MoveList { from: End, to: End },
    /// BZPOPMIN / BZPOPMAX over one or more sorted set keys
    PopScore(Extreme),
}

struct Inner {
    dispatcher: Mutex<Dispatcher>,
    /// Signalled after every committed command so blocked commands re-run
    wakeup: Notify,
}

/// In-memory, transactionally-atomic command executor
///
/// Cloning is cheap and every clone addresses the same store, which is
/// how concurrent callers share one instance.
#[derive(Clone)]
pub struct Executor {
    inner: Arc<Inner>,
}

impl Executor {
    /// Create a fresh executor
    pub fn new() -> Self {
        Self::from_dispatcher(Dispatcher::new())
    }

    /// Create a fresh executor whose random picks start from `seed`
    pub fn with_seed(seed: u64) -> Self {
        Self::from_dispatcher(Dispatcher::with_seed(seed))
    }

    fn from_dispatcher(dispatcher: Dispatcher) -> Self {
        Executor {
            inner: Arc::new(Inner {
                dispatcher: Mutex::new(dispatcher),
                wakeup: Notify::new(),
            }),
        }
    }

    /// Execute one decoded command and return its reply
    ///
    /// The only out-of-band failure is an empty command vector; every
    /// other problem comes back as an in-band error reply.
    pub async fn execute(&self, command: &[Bytes]) -> Result<Reply, ProtocolError> {
        let Some(opcode) = command.first() else {
            return Err(ProtocolError::MalformedCommand);
        };

        if let Some(kind) = classify_blocking(opcode) {
            return Ok(self.run_blocking(kind, opcode, &command[1..]).await);
        }

        let reply = {
            let mut dispatcher = self.inner.dispatcher.lock().await;
            dispatcher.dispatch(command)?
        };
        self.inner.wakeup.notify_waiters();
        Ok(reply)
    }

    /// Run one blocking command: try, then wait for a commit or the
    /// deadline and try again
    async fn run_blocking(&self, kind: BlockingKind, opcode: &Bytes, args: &[Bytes]) -> Reply {
        let name = match &kind {
            BlockingKind::PopList(End::Left) => "BLPOP",
            BlockingKind::PopList(End::Right) => "BRPOP",
            BlockingKind::MoveList { .. } => {
                if opcode.eq_ignore_ascii_case(b"BRPOPLPUSH") {
                    "BRPOPLPUSH"
                } else {
                    "BLMOVE"
                }
            }
            BlockingKind::PopScore(Extreme::Min) => "BZPOPMIN",
            BlockingKind::PopScore(Extreme::Max) => "BZPOPMAX",
        };

        // The timeout sits at the tail; everything before it is keys,
        // except for the move forms whose ends are fixed-position
        let (kind, keys) = match kind {
            BlockingKind::MoveList { from, to } => {
                let expected = if name == "BLMOVE" { 5 } else { 3 };
                if args.len() != expected {
                    return Reply::wrong_arity(name);
                }
                let (from, to) = if name == "BLMOVE" {
                    match (End::parse(&args[2]), End::parse(&args[3])) {
                        (Ok(from), Ok(to)) => (from, to),
                        _ => return Reply::error("ERR syntax error"),
                    }
                } else {
                    (from, to)
                };
                (BlockingKind::MoveList { from, to }, &args[..2])
            }
            other => {
                if args.len() < 2 {
                    return Reply::wrong_arity(name);
                }
                (other, &args[..args.len() - 1])
            }
        };

        let timeout = match parse_int(&args[args.len() - 1]) {
            Ok(secs) if secs >= 0 => secs as u64,
            Ok(_) => return Reply::error("ERR timeout is negative"),
            Err(_) => return Reply::error("ERR timeout is not an integer or out of range"),
        };
        let deadline = (timeout > 0).then(|| Instant::now() + Duration::from_secs(timeout));

        debug!("Blocking command {} over {} key(s)", name, keys.len());

        loop {
            // Register interest before looking, so a commit between the
            // attempt and the await still wakes us
            let notified = self.inner.wakeup.notified();
            tokio::pin!(notified);
            notified.as_mut().enable();

            if let Some(reply) = self.attempt(&kind, keys).await {
                if !reply.is_error() {
                    self.inner.wakeup.notify_waiters();
                }
                return reply;
            }

            match deadline {
                Some(deadline) => {
                    if tokio::time::timeout_at(deadline, notified).await.is_err() {
                        return timeout_reply(&kind);
                    }
                }
                None => notified.await,
            }
        }
    }

    /// One non-waiting pass over the candidate keys, left to right
    async fn attempt(&self, kind: &BlockingKind, keys: &[Bytes]) -> Option<Reply> {
        let mut dispatcher = self.inner.dispatcher.lock().await;
        let store = &mut dispatcher.context_mut().store;

        match kind {
            BlockingKind::PopList(end) => {
                for key in keys {
                    match try_pop(store, key, *end) {
                        Ok(Some(value)) => {
                            return Some(Reply::array(vec![
                                Reply::bulk_string(key.clone()),
                                Reply::bulk_string(value),
                            ]));
                        }
                        Ok(None) => {}
                        Err(_) => return Some(Reply::wrong_type()),
                    }
                }
                None
            }
            BlockingKind::MoveList { from, to } => {
                match try_move(store, &keys[0], &keys[1], *from, *to) {
                    Ok(Some(value)) => Some(Reply::bulk_string(value)),
                    Ok(None) => None,
                    Err(_) => Some(Reply::wrong_type()),
                }
            }
            BlockingKind::PopScore(extreme) => {
                for key in keys {
                    match try_pop_score(store, key, *extreme) {
                        Ok(Some((member, score))) => {
                            return Some(Reply::array(vec![
                                Reply::bulk_string(key.clone()),
                                Reply::bulk_string(member),
                                Reply::bulk_string(fmt_score(score)),
                            ]));
                        }
                        Ok(None) => {}
                        Err(_) => return Some(Reply::wrong_type()),
                    }
                }
                None
            }
        }
    }
}

impl Default for Executor {
    fn default() -> Self {
        Self::new()
    }
}

/// Map a blocking opcode to its request shape; None means the command is
/// not a blocking one and dispatches normally
fn classify_blocking(opcode: &Bytes) -> Option<BlockingKind> {
    if opcode.eq_ignore_ascii_case(b"BLPOP") {
        Some(BlockingKind::PopList(End::Left))
    } else if opcode.eq_ignore_ascii_case(b"BRPOP") {
        Some(BlockingKind::PopList(End::Right))
    } else if opcode.eq_ignore_ascii_case(b"BRPOPLPUSH") {
        Some(BlockingKind::MoveList {
            from: End::Right,
            to: End::Left,
        })
    } else if opcode.eq_ignore_ascii_case(b"BLMOVE") {
        Some(BlockingKind::MoveList {
            from: End::Left,
            to: End::Left,
        })
    } else if opcode.eq_ignore_ascii_case(b"BZPOPMIN") {
        Some(BlockingKind::PopScore(Extreme::Min))
    } else if opcode.eq_ignore_ascii_case(b"BZPOPMAX") {
        Some(BlockingKind::PopScore(Extreme::Max))
    } else {
        None
    }
}

/// The documented null reply for a blocking command that timed out
fn timeout_reply(kind: &BlockingKind) -> Reply {
    match kind {
        BlockingKind::PopList(_) => Reply::NullArray,
        // BZPOPMIN/BZPOPMAX answer a null bulk here, like the move forms
        BlockingKind::MoveList { .. } | BlockingKind::PopScore(_) => Reply::NullBulk,
    }
}
