//! # Error Types
//!
//! Error handling for the packet codec, registry and dispatcher.
//!
//! Every fallible operation in the crate returns [`ProtocolError`]. Codec-level
//! failures abort the whole encode or decode call; callers never observe a
//! partially decoded packet.
//!
//! ## Error Categories
//! - **Codec Errors**: range violations, buffer underflow, malformed varints and strings
//! - **Registration Errors**: duplicate ids, names or field orders (fatal at startup)
//! - **Dispatch Errors**: unknown packet ids, descriptor mismatches, missing handlers
//! - **Configuration Errors**: unreadable or invalid configuration
//!
//! ## Example Usage
//! ```rust
//! use game_protocol::error::{ProtocolError, Result};
//! use game_protocol::protocol::registry::RegistryBuilder;
//!
//! fn startup() -> Result<()> {
//!     let registry = RegistryBuilder::with_standard_packets()?.build();
//!     if registry.is_empty() {
//!         return Err(ProtocolError::ConfigError("no packets registered".into()));
//!     }
//!     Ok(())
//! }
//!
//! startup().unwrap();
//! ```

use thiserror::Error;

/// Error message constants for the error paths that carry free text.
pub mod constants {
    /// Configuration errors
    pub const ERR_CONFIG_OPEN: &str = "Failed to open config file";
    pub const ERR_CONFIG_READ: &str = "Failed to read config file";
    pub const ERR_CONFIG_PARSE: &str = "Failed to parse TOML";
    pub const ERR_CONFIG_SERIALIZE: &str = "Failed to serialize config";
    pub const ERR_CONFIG_WRITE: &str = "Failed to write config file";

    /// Logging errors
    pub const ERR_LOGGING_INIT: &str = "Failed to install tracing subscriber";

    /// Engine errors
    pub const ERR_VALUE_COUNT: &str = "value count does not match descriptor field count";
    pub const ERR_TRAILING_BYTES: &str = "bytes remain after the last declared field";
    pub const ERR_WRONG_DESCRIPTOR: &str = "packet was decoded with a different descriptor";
}

/// Primary error type for all codec, registry and dispatch operations.
#[derive(Error, Debug)]
pub enum ProtocolError {
    /// A value cannot be represented by the codec it is encoded with.
    #[error("Value {value} out of range for {codec}")]
    ValueRange { codec: &'static str, value: String },

    /// Decode needed more bytes than the buffer holds.
    #[error("Buffer underflow: needed {needed} bytes, {remaining} remaining")]
    BufferUnderflow { needed: usize, remaining: usize },

    #[error("VarInt exceeds {max_bytes} bytes")]
    VarIntTooLong { max_bytes: usize },

    #[error("Invalid UTF-8 in string field")]
    InvalidUtf8,

    /// A declared string or array length exceeds the configured limit.
    #[error("Length {len} exceeds limit of {max}")]
    LengthLimit { len: usize, max: usize },

    /// The value variant handed to a field does not fit the field's codec.
    #[error("Field '{field}' expects {expected}, got {found}")]
    TypeMismatch {
        field: String,
        expected: &'static str,
        found: &'static str,
    },

    #[error("Missing field '{0}'")]
    MissingField(String),

    #[error("Duplicate packet id: {0}")]
    DuplicatePacketId(u32),

    #[error("Duplicate packet name: {0}")]
    DuplicatePacketName(String),

    #[error("Packet '{packet}' declares field order {order} twice")]
    DuplicateFieldOrder { packet: String, order: u16 },

    #[error("Packet '{packet}' declares field '{field}' twice")]
    DuplicateFieldName { packet: String, field: String },

    /// Field orders must be exactly `0..n`; order is the wire position.
    #[error("Packet '{packet}' expected field order {expected}, found {found}")]
    FieldOrderGap {
        packet: String,
        expected: u16,
        found: u16,
    },

    #[error("Unknown packet id: {0}")]
    UnknownPacketId(u32),

    /// Decoded field count or residual length disagrees with the descriptor.
    #[error("Descriptor mismatch for packet {id}: {reason}")]
    DescriptorMismatch { id: u32, reason: &'static str },

    #[error("Packet too large: {0} bytes")]
    OversizedPacket(usize),

    #[error("No handler registered for packet id {0}")]
    NoHandler(u32),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl ProtocolError {
    /// Shorthand for a [`ProtocolError::ValueRange`] from any displayable value.
    pub fn value_range(codec: &'static str, value: impl std::fmt::Display) -> Self {
        ProtocolError::ValueRange {
            codec,
            value: value.to_string(),
        }
    }

    /// Returns true for errors raised while building a registry.
    pub fn is_registration_error(&self) -> bool {
        matches!(
            self,
            ProtocolError::DuplicatePacketId(_)
                | ProtocolError::DuplicatePacketName(_)
                | ProtocolError::DuplicateFieldOrder { .. }
                | ProtocolError::DuplicateFieldName { .. }
                | ProtocolError::FieldOrderGap { .. }
        )
    }
}

/// Type alias for Results using ProtocolError
pub type Result<T> = std::result::Result<T, ProtocolError>;
