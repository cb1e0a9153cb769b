//! Reply value types
//!
//! Defines the decoded reply shapes handlers construct. Encoding these to
//! the RESP wire format is the caller's concern, not this crate's.

use bytes::Bytes;
use std::fmt;
use thiserror::Error;

/// Decoded command reply
#[derive(Debug, Clone, PartialEq)]
pub enum Reply {
    /// Simple strings: +OK\r\n
    SimpleString(String),

    /// Errors: -Error message\r\n
    Error(String),

    /// Integers: :1000\r\n
    Integer(i64),

    /// Bulk strings: $6\r\nfoobar\r\n
    BulkString(Bytes),

    /// Null bulk string: $-1\r\n
    NullBulk,

    /// Arrays: *2\r\n$3\r\nfoo\r\n$3\r\nbar\r\n
    Array(Vec<Reply>),

    /// Null array: *-1\r\n
    NullArray,
}

impl Reply {
    /// Create a simple string
    pub fn simple_string(s: impl Into<String>) -> Self {
        Reply::SimpleString(s.into())
    }

    /// Create an error
    pub fn error(s: impl Into<String>) -> Self {
        Reply::Error(s.into())
    }

    /// Create an integer
    pub fn integer(i: i64) -> Self {
        Reply::Integer(i)
    }

    /// Create a bulk string from bytes
    pub fn bulk_string(b: impl Into<Bytes>) -> Self {
        Reply::BulkString(b.into())
    }

    /// Create an array
    pub fn array(v: Vec<Reply>) -> Self {
        Reply::Array(v)
    }

    /// The OK simple string
    pub fn ok() -> Self {
        Reply::SimpleString("OK".to_string())
    }

    /// The type-exclusivity violation error
    pub fn wrong_type() -> Self {
        Reply::Error(
            "WRONGTYPE Operation against a key holding the wrong kind of value".to_string(),
        )
    }

    /// The arity error for a named command
    pub fn wrong_arity(name: &str) -> Self {
        Reply::Error(format!(
            "ERR wrong number of arguments for '{}' command",
            name
        ))
    }

    /// Check if this is an error reply
    pub fn is_error(&self) -> bool {
        matches!(self, Reply::Error(_))
    }

    /// Try to extract array elements
    pub fn as_array(&self) -> Option<&Vec<Reply>> {
        match self {
            Reply::Array(arr) => Some(arr),
            _ => None,
        }
    }

    /// Try to extract bulk string bytes
    pub fn as_bulk_string(&self) -> Option<&Bytes> {
        match self {
            Reply::BulkString(bytes) => Some(bytes),
            _ => None,
        }
    }

    /// Try to extract integer value
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Reply::Integer(i) => Some(*i),
            _ => None,
        }
    }
}

impl fmt::Display for Reply {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Reply::SimpleString(s) => write!(f, "SimpleString({})", s),
            Reply::Error(e) => write!(f, "Error({})", e),
            Reply::Integer(i) => write!(f, "Integer({})", i),
            Reply::BulkString(b) => write!(f, "BulkString({} bytes)", b.len()),
            Reply::NullBulk => write!(f, "NullBulk"),
            Reply::Array(arr) => write!(f, "Array({} elements)", arr.len()),
            Reply::NullArray => write!(f, "NullArray"),
        }
    }
}

/// Command-vector errors surfaced to the caller instead of as in-band replies
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ProtocolError {
    /// The command vector was empty
    #[error("Malformed command.")]
    MalformedCommand,
}
