//! Protocol error types.

use std::io;

use thiserror::Error;

/// Errors raised while turning bytes into messages or messages into bytes.
#[derive(Debug, Error)]
pub enum CodecError {
    /// The leading byte is not one of the four opcodes.
    #[error("unknown opcode {0}")]
    UnknownOpcode(u8),

    /// The stream ended before the message was complete.
    #[error("stream closed after {received} of {expected} bytes of a message with opcode {opcode}")]
    Truncated {
        opcode: u8,
        expected: usize,
        received: usize,
    },

    /// A card byte outside `0..52`.
    #[error("card value {0} is out of range")]
    InvalidCard(u8),

    /// A PLAYRESULT byte other than WIN, DRAW or LOSE.
    #[error("unknown play result {0}")]
    InvalidResult(u8),

    /// A GAMESTART that does not carry exactly one hand.
    #[error("GAMESTART must carry {expected} cards, got {actual}")]
    InvalidHand { expected: usize, actual: usize },

    #[error(transparent)]
    Io(#[from] io::Error),
}
