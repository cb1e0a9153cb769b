//! Connection commands (PING, ECHO, AUTH, SELECT)
//!
//! AUTH and SELECT are accepted for client compatibility but have no
//! effect: there is no authentication and only one database.

use super::{Command, CommandContext};
use crate::protocol::Reply;
use bytes::Bytes;

/// PING command - Liveness check
///
/// Syntax: PING [message]
pub struct PingCommand;

impl Command for PingCommand {
    fn execute(&self, _ctx: &mut CommandContext, args: &[Bytes]) -> Reply {
        match args.first() {
            Some(message) => Reply::bulk_string(message.clone()),
            None => Reply::simple_string("PONG"),
        }
    }

    fn name(&self) -> &'static str {
        "PING"
    }

    fn max_args(&self) -> Option<usize> {
        Some(1)
    }
}

/// ECHO command - Return the given message
///
/// Syntax: ECHO message
pub struct EchoCommand;

impl Command for EchoCommand {
    fn execute(&self, _ctx: &mut CommandContext, args: &[Bytes]) -> Reply {
        Reply::bulk_string(args[0].clone())
    }

    fn name(&self) -> &'static str {
        "ECHO"
    }

    fn min_args(&self) -> usize {
        1
    }

    fn max_args(&self) -> Option<usize> {
        Some(1)
    }
}

/// AUTH command - Always succeeds
///
/// Syntax: AUTH password | AUTH username password
pub struct AuthCommand;

impl Command for AuthCommand {
    fn execute(&self, _ctx: &mut CommandContext, _args: &[Bytes]) -> Reply {
        Reply::ok()
    }

    fn name(&self) -> &'static str {
        "AUTH"
    }

    fn min_args(&self) -> usize {
        1
    }
}

/// SELECT command - Accepted, single database only
///
/// Syntax: SELECT index
pub struct SelectCommand;

impl Command for SelectCommand {
    fn execute(&self, _ctx: &mut CommandContext, _args: &[Bytes]) -> Reply {
        Reply::ok()
    }

    fn name(&self) -> &'static str {
        "SELECT"
    }

    fn min_args(&self) -> usize {
        1
    }
}
