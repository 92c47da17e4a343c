//! Messages exchanged between connections, the matchmaker and game sessions.

use std::time::Duration;

use actix::prelude::*;
use thiserror::Error;
use uuid::Uuid;

use super::server::GameSession;
use crate::game::{Card, GameError, Outcome, Seat};

/// Why a session ended before both hands were played out.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AbortReason {
    #[error("protocol violation by {seat}: {detail}")]
    ProtocolViolation { seat: Seat, detail: String },
    #[error("illegal play by {seat}: card {card} is not in their hand")]
    IllegalPlay { seat: Seat, card: Card },
    #[error("{0} disconnected")]
    PeerDisconnect(Seat),
    #[error("round not completed within {0:?}")]
    PlayTimeout(Duration),
}

impl AbortReason {
    /// Map a rejected play onto the abort it causes. Plays against an ended
    /// game are not aborts and yield `None`.
    pub fn from_game_error(err: GameError) -> Option<Self> {
        match err {
            GameError::IllegalPlay { seat, card } => Some(AbortReason::IllegalPlay { seat, card }),
            GameError::AlreadyPlayed { seat } => Some(AbortReason::ProtocolViolation {
                seat,
                detail: "second PLAYCARD in one round".to_string(),
            }),
            GameError::AlreadyDealt | GameError::NotAcceptingPlays(_) => None,
        }
    }
}

/// How a connection should be shut down.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloseMode {
    /// Flush what was already queued, then close.
    Graceful,
    /// Drop the connection now.
    Immediate,
}

/// Message: something the server tells a player's connection.
#[derive(Message)]
#[rtype(result = "()")]
pub enum PlayerEvent {
    /// The connection was paired and dealt `hand`; it now plays for `seat`.
    Started {
        game_id: Uuid,
        seat: Seat,
        session: Addr<GameSession>,
        hand: Vec<Card>,
    },
    /// A round resolved with `Outcome` for this player.
    RoundResult(Outcome),
    /// The game (or the wait for one) is over.
    Close(CloseMode),
}

/// Message: a connection played a card.
#[derive(Message, Debug)]
#[rtype(result = "()")]
pub struct PlayCard {
    pub seat: Seat,
    pub card: Card,
}

/// Message: a connection can no longer take part in the game.
#[derive(Message, Debug)]
#[rtype(result = "()")]
pub struct AbortGame {
    pub reason: AbortReason,
}

/// Message: the matchmaker paired two players.
#[derive(Message)]
#[rtype(result = "Uuid")]
pub struct CreateGame {
    /// Seat A first, seat B second.
    pub players: [Recipient<PlayerEvent>; 2],
}

/// Message: a session stopped and can be forgotten.
#[derive(Message)]
#[rtype(result = "()")]
pub struct SessionClosed {
    pub game_id: Uuid,
}

/// Message: number of sessions currently running.
#[derive(Message)]
#[rtype(result = "usize")]
pub struct ActiveSessions;
