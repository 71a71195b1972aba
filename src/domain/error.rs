//! Domain layer error definitions.

use thiserror::Error;

/// Errors related to Value Object validation
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValueObjectError {
    /// RoomId validation error
    #[error("RoomId cannot be empty")]
    RoomIdEmpty,

    /// RoomId too long error
    #[error("RoomId cannot exceed {max} characters (got {actual})")]
    RoomIdTooLong { max: usize, actual: usize },

    /// UserId validation error
    #[error("UserId cannot be empty")]
    UserIdEmpty,

    /// ChatText validation error
    #[error("chat text cannot be empty")]
    ChatTextEmpty,

    /// ChatText too long error
    #[error("chat text cannot exceed {max} characters (got {actual})")]
    ChatTextTooLong { max: usize, actual: usize },
}

/// Errors from the room and chat stores.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// The underlying store rejected or lost the operation
    #[error("store operation failed: {0}")]
    Backend(String),
}

/// Token verification failures.
///
/// On the HTTP streaming path these surface as structured 401/403 responses.
/// On the chat path the message is dropped silently (logged) and the
/// connection stays open.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// No token was supplied
    #[error("missing auth token")]
    MissingToken,

    /// The token could not be decoded
    #[error("malformed auth token")]
    MalformedToken,

    /// The token signature does not match
    #[error("invalid token signature")]
    InvalidSignature,

    /// The token is past its expiry time
    #[error("token expired at {expired_at_millis}")]
    Expired { expired_at_millis: i64 },
}
