//! Opcodes and the messages they frame.

use crate::config::game::HAND_SIZE;
use crate::game::{Card, Outcome};
use crate::protocol::error::CodecError;

/// Leading byte of every message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Opcode {
    /// Client asks to be paired. Payload: one ignored byte.
    WantGame = 0,
    /// Server deals a hand. Payload: 26 card bytes.
    GameStart = 1,
    /// Client plays a card. Payload: one card byte.
    PlayCard = 2,
    /// Server reports a round. Payload: one result byte.
    PlayResult = 3,
}

impl Opcode {
    pub const ALL: [Opcode; 4] = [
        Opcode::WantGame,
        Opcode::GameStart,
        Opcode::PlayCard,
        Opcode::PlayResult,
    ];

    pub fn payload_len(self) -> usize {
        match self {
            Opcode::GameStart => HAND_SIZE,
            Opcode::WantGame | Opcode::PlayCard | Opcode::PlayResult => 1,
        }
    }

    /// Total size on the wire, opcode included.
    pub fn message_len(self) -> usize {
        1 + self.payload_len()
    }

    /// Whether this opcode only travels from server to client.
    pub fn is_client_bound(self) -> bool {
        matches!(self, Opcode::GameStart | Opcode::PlayResult)
    }
}

impl TryFrom<u8> for Opcode {
    type Error = CodecError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Opcode::WantGame),
            1 => Ok(Opcode::GameStart),
            2 => Ok(Opcode::PlayCard),
            3 => Ok(Opcode::PlayResult),
            other => Err(CodecError::UnknownOpcode(other)),
        }
    }
}

impl From<Outcome> for u8 {
    fn from(outcome: Outcome) -> Self {
        match outcome {
            Outcome::Win => 0,
            Outcome::Draw => 1,
            Outcome::Lose => 2,
        }
    }
}

impl TryFrom<u8> for Outcome {
    type Error = CodecError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Outcome::Win),
            1 => Ok(Outcome::Draw),
            2 => Ok(Outcome::Lose),
            other => Err(CodecError::InvalidResult(other)),
        }
    }
}

/// A decoded protocol message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Message {
    WantGame,
    GameStart(Vec<Card>),
    PlayCard(Card),
    PlayResult(Outcome),
}

impl Message {
    pub fn opcode(&self) -> Opcode {
        match self {
            Message::WantGame => Opcode::WantGame,
            Message::GameStart(_) => Opcode::GameStart,
            Message::PlayCard(_) => Opcode::PlayCard,
            Message::PlayResult(_) => Opcode::PlayResult,
        }
    }
}
