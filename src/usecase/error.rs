//! UseCase layer error definitions.

use thiserror::Error;

use crate::domain::{AuthError, StoreError, ValueObjectError};

/// Failures while handling a chat message.
///
/// Both variants are absorbed by the gateway: the message is dropped with a
/// log line, no error is surfaced to the sender, and the connection stays
/// open.
#[derive(Debug, Error)]
pub enum SendChatError {
    /// The supplied auth token did not verify
    #[error("chat auth failed: {0}")]
    Auth(#[from] AuthError),

    /// The message text failed validation
    #[error("invalid chat text: {0}")]
    InvalidText(#[from] ValueObjectError),

    /// The chat store rejected the append; the broadcast is suppressed
    #[error("chat persistence failed: {0}")]
    Persistence(#[from] StoreError),
}

/// Failures while verifying a room PIN.
#[derive(Debug, Error)]
pub enum VerifyPinError {
    /// No room record with the given id
    #[error("room not found")]
    RoomNotFound,

    /// The supplied PIN does not match the room's
    #[error("PIN mismatch")]
    PinMismatch,

    /// The room store failed
    #[error("room store failed: {0}")]
    Store(#[from] StoreError),
}
