//! Reply model
//!
//! Defines the decoded reply values the executor returns. Wire framing is
//! an external collaborator's concern; this module is completely
//! independent from other modules (loose coupling).

mod types;

pub use types::{ProtocolError, Reply};
