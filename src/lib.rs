//! MimicDB - An in-memory, transactionally-atomic Redis test double
//!
//! MimicDB executes decoded Redis commands against six typed in-memory
//! namespaces with the same reply semantics as the real server, so client
//! code can run against it without a network. It is designed with strong
//! cohesion and loose coupling principles:
//! - Each module has a single, well-defined responsibility
//! - Modules communicate through clear, minimal interfaces
//! - No circular dependencies between modules
//!
//! Wire framing, connection handling and persistence are deliberately
//! out of scope; the whole contract is [`Executor::execute`].
//!
//! ```
//! use bytes::Bytes;
//! use mimicdb::{Executor, Reply};
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let executor = Executor::new();
//! let reply = executor
//!     .execute(&[Bytes::from("SET"), Bytes::from("k"), Bytes::from("v")])
//!     .await
//!     .unwrap();
//! assert_eq!(reply, Reply::ok());
//! # }
//! ```

pub mod commands;
pub mod dispatch;
pub mod executor;
pub mod picker;
pub mod protocol;
pub mod store;

/// Re-export commonly used types
pub use executor::Executor;
pub use protocol::{ProtocolError, Reply};
pub use store::{MemoryStore, Value};
