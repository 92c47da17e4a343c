//! Wire protocol for the war game.
//!
//! Every message is one opcode byte followed by a fixed-size payload, so the
//! opcode alone tells the reader how many bytes to wait for. There is no
//! length prefix.

/// Decoding/encoding errors.
pub mod error;

/// Message and opcode types.
pub mod messages;

/// `tokio_util` codec turning a byte stream into [`Message`]s and back.
pub mod codec;

pub use codec::WarCodec;
pub use error::CodecError;
pub use messages::{Message, Opcode};
