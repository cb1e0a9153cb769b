//! Command dispatcher
//!
//! Routes a decoded command vector to the appropriate handler. This
//! module provides loose coupling between the executor and command
//! implementations.

use crate::commands::{CommandContext, CommandRegistry};
use crate::protocol::{ProtocolError, Reply};
use bytes::Bytes;
use tracing::{debug, warn};

/// Command dispatcher
///
/// Receives decoded commands, validates them, and routes to the
/// appropriate handlers
pub struct Dispatcher {
    /// Command registry
    registry: CommandRegistry,

    /// Command execution context
    context: CommandContext,
}

impl Dispatcher {
    /// Create a new dispatcher
    pub fn new() -> Self {
        Dispatcher {
            registry: CommandRegistry::new(),
            context: CommandContext::new(),
        }
    }

    /// Create a dispatcher whose random picks start from `seed`
    pub fn with_seed(seed: u64) -> Self {
        Dispatcher {
            registry: CommandRegistry::new(),
            context: CommandContext::with_seed(seed),
        }
    }

    /// Dispatch a command
    ///
    /// The first element names the opcode (matched case-insensitively);
    /// the rest are its arguments. An empty vector is the one condition
    /// reported to the caller instead of in-band.
    pub fn dispatch(&mut self, command: &[Bytes]) -> Result<Reply, ProtocolError> {
        let Some(name) = command.first() else {
            return Err(ProtocolError::MalformedCommand);
        };

        let name = match std::str::from_utf8(name) {
            Ok(s) => s,
            Err(_) => {
                return Ok(Reply::error("ERR invalid command name encoding"));
            }
        };

        debug!("Dispatching command: {}", name);

        let command_impl = match self.registry.get(name) {
            Some(cmd) => cmd,
            None => {
                warn!("Unknown command: {}", name);
                return Ok(Reply::error(format!("ERR unknown command '{}'", name)));
            }
        };

        let args = &command[1..];

        if args.len() < command_impl.min_args() {
            return Ok(Reply::wrong_arity(command_impl.name()));
        }
        if let Some(max) = command_impl.max_args() {
            if args.len() > max {
                return Ok(Reply::wrong_arity(command_impl.name()));
            }
        }

        Ok(command_impl.execute(&mut self.context, args))
    }

    /// Get reference to the context (for testing/inspection)
    pub fn context(&self) -> &CommandContext {
        &self.context
    }

    /// Get mutable reference to the context
    pub fn context_mut(&mut self) -> &mut CommandContext {
        &mut self.context
    }
}

impl Default for Dispatcher {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cmd(parts: &[&str]) -> Vec<Bytes> {
        parts.iter().map(|p| Bytes::from(p.to_string())).collect()
    }

    #[test]
    fn test_dispatch_set_get() {
        let mut dispatcher = Dispatcher::new();

        let result = dispatcher.dispatch(&cmd(&["SET", "mykey", "myvalue"])).unwrap();
        assert_eq!(result, Reply::ok());

        let result = dispatcher.dispatch(&cmd(&["GET", "mykey"])).unwrap();
        assert_eq!(result, Reply::bulk_string("myvalue"));
    }

    #[test]
    fn test_dispatch_case_insensitive() {
        let mut dispatcher = Dispatcher::new();

        let result = dispatcher.dispatch(&cmd(&["set", "k", "v"])).unwrap();
        assert_eq!(result, Reply::ok());

        let result = dispatcher.dispatch(&cmd(&["gEt", "k"])).unwrap();
        assert_eq!(result, Reply::bulk_string("v"));
    }

    #[test]
    fn test_dispatch_unknown_command() {
        let mut dispatcher = Dispatcher::new();

        let result = dispatcher.dispatch(&cmd(&["NOSUCH"])).unwrap();
        assert_eq!(result, Reply::error("ERR unknown command 'NOSUCH'"));
    }

    #[test]
    fn test_dispatch_empty_command() {
        let mut dispatcher = Dispatcher::new();

        let result = dispatcher.dispatch(&[]);
        assert_eq!(result, Err(ProtocolError::MalformedCommand));
    }

    #[test]
    fn test_dispatch_arity_errors() {
        let mut dispatcher = Dispatcher::new();

        let result = dispatcher.dispatch(&cmd(&["GET"])).unwrap();
        assert_eq!(
            result,
            Reply::error("ERR wrong number of arguments for 'GET' command")
        );

        let result = dispatcher.dispatch(&cmd(&["AUTH"])).unwrap();
        assert_eq!(
            result,
            Reply::error("ERR wrong number of arguments for 'AUTH' command")
        );

        let result = dispatcher.dispatch(&cmd(&["SELECT"])).unwrap();
        assert_eq!(
            result,
            Reply::error("ERR wrong number of arguments for 'SELECT' command")
        );
    }

    #[test]
    fn test_type_exclusivity_across_dispatch() {
        let mut dispatcher = Dispatcher::new();

        dispatcher.dispatch(&cmd(&["SET", "x", "hi"])).unwrap();
        let result = dispatcher.dispatch(&cmd(&["SADD", "x", "y"])).unwrap();
        assert_eq!(result, Reply::wrong_type());
    }
}
