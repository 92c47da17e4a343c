//! Messages understood by the matchmaking server.

use actix::prelude::*;
use uuid::Uuid;

use crate::server::game_session::messages::PlayerEvent;

/// Message: a connection sent WANTGAME and waits for a partner.
#[derive(Message)]
#[rtype(result = "()")]
pub struct Enqueue {
    pub conn_id: Uuid,
    pub player: Recipient<PlayerEvent>,
}

/// Message: a connection went away; drop it from the queue if it is still there.
#[derive(Message)]
#[rtype(result = "()")]
pub struct Leave {
    pub conn_id: Uuid,
}

/// Message: number of connections currently waiting.
#[derive(Message)]
#[rtype(result = "usize")]
pub struct QueueLen;
