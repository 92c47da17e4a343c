//! Per-connection actor.
//!
//! Reads framed messages off the socket and routes them: WANTGAME goes to
//! the matchmaker, PLAYCARD to the bound game session. Everything the server
//! has to say to the player arrives as a [`PlayerEvent`] and is written back
//! through the same codec.

use actix::io::{FramedWrite, WriteHandler};
use actix::prelude::*;
use log::{debug, info, warn};
use std::net::SocketAddr;
use tokio::net::TcpStream;
use tokio::net::tcp::OwnedWriteHalf;
use tokio_util::codec::FramedRead;
use uuid::Uuid;

use crate::game::Seat;
use crate::protocol::{CodecError, Message, WarCodec};
use crate::server::game_session::messages::{AbortGame, AbortReason, CloseMode, PlayCard, PlayerEvent};
use crate::server::game_session::server::GameSession;
use crate::server::matchmaking::messages::{Enqueue, Leave};
use crate::server::matchmaking::server::MatchmakingServer;

type Writer = FramedWrite<Message, OwnedWriteHalf, WarCodec>;

/// Where a connection stands.
enum Binding {
    /// Connected, no WANTGAME yet.
    Idle,
    /// WANTGAME sent, waiting in the matchmaker.
    Queued,
    /// Dealt into a game.
    Playing {
        game_id: Uuid,
        seat: Seat,
        session: Addr<GameSession>,
    },
    /// On the way out; nothing more is routed.
    Closing,
}

pub struct Connection {
    id: Uuid,
    peer: SocketAddr,
    matchmaker: Addr<MatchmakingServer>,
    writer: Writer,
    binding: Binding,
}

impl Connection {
    /// Spawn the actor owning `stream`.
    pub fn start(stream: TcpStream, peer: SocketAddr, matchmaker: Addr<MatchmakingServer>) -> Addr<Self> {
        Connection::create(move |ctx| {
            let (reader, writer) = stream.into_split();
            ctx.add_stream(FramedRead::new(reader, WarCodec));
            let id = Uuid::new_v4();
            info!("[Connection] {} accepted from {}", id, peer);
            Connection {
                id,
                peer,
                matchmaker,
                writer: FramedWrite::new(writer, WarCodec, ctx),
                binding: Binding::Idle,
            }
        })
    }

    fn dispatch(&mut self, message: Message, ctx: &mut Context<Self>) {
        match (&self.binding, message) {
            (Binding::Idle, Message::WantGame) => {
                self.matchmaker.do_send(Enqueue {
                    conn_id: self.id,
                    player: ctx.address().recipient(),
                });
                self.binding = Binding::Queued;
            }
            (Binding::Playing { seat, session, .. }, Message::PlayCard(card)) => {
                session.do_send(PlayCard { seat: *seat, card });
            }
            (Binding::Closing, message) => {
                debug!("[Connection] {} ignoring {:?} while closing", self.id, message.opcode());
            }
            (_, message) => {
                let detail = if message.opcode().is_client_bound() {
                    format!("client sent server-only opcode {:?}", message.opcode())
                } else {
                    format!("unexpected {:?} in this state", message.opcode())
                };
                self.violation(detail, ctx);
            }
        }
    }

    /// The peer broke the protocol. A bound game is aborted; either way the
    /// connection goes.
    fn violation(&mut self, detail: String, ctx: &mut Context<Self>) {
        warn!("[Connection] {} ({}) protocol violation: {}", self.id, self.peer, detail);
        if let Binding::Playing { seat, session, .. } = &self.binding {
            session.do_send(AbortGame {
                reason: AbortReason::ProtocolViolation { seat: *seat, detail },
            });
            self.binding = Binding::Closing;
        }
        ctx.stop();
    }

    /// Queue `message` on the socket. Encode failures surface in `WriteHandler::error`.
    fn write(&mut self, message: Message) {
        self.writer.write(message);
    }
}

impl Actor for Connection {
    type Context = Context<Self>;

    /// Whatever the connection was part of learns that it is gone.
    fn stopped(&mut self, _ctx: &mut Self::Context) {
        match std::mem::replace(&mut self.binding, Binding::Closing) {
            Binding::Queued => self.matchmaker.do_send(Leave { conn_id: self.id }),
            Binding::Playing { game_id, seat, session } => {
                debug!("[Connection] {} left game_id={} mid-game", self.id, game_id);
                session.do_send(AbortGame {
                    reason: AbortReason::PeerDisconnect(seat),
                });
            }
            Binding::Idle | Binding::Closing => {}
        }
        info!("[Connection] {} ({}) closed", self.id, self.peer);
    }
}

impl StreamHandler<Result<Message, CodecError>> for Connection {
    fn handle(&mut self, item: Result<Message, CodecError>, ctx: &mut Self::Context) {
        match item {
            Ok(message) => self.dispatch(message, ctx),
            Err(CodecError::Io(err)) => {
                debug!("[Connection] {} read error: {}", self.id, err);
                ctx.stop();
            }
            Err(err) => self.violation(err.to_string(), ctx),
        }
    }

    /// The peer closed its side.
    fn finished(&mut self, ctx: &mut Self::Context) {
        debug!("[Connection] {} reached end of stream", self.id);
        ctx.stop();
    }
}

impl WriteHandler<CodecError> for Connection {
    fn error(&mut self, err: CodecError, _ctx: &mut Self::Context) -> Running {
        warn!("[Connection] {} write error: {}", self.id, err);
        Running::Stop
    }
}

impl Handler<PlayerEvent> for Connection {
    type Result = ();

    fn handle(&mut self, msg: PlayerEvent, ctx: &mut Context<Self>) -> Self::Result {
        match msg {
            PlayerEvent::Started { game_id, seat, session, hand } => {
                debug!("[Connection] {} joined game_id={} as {}", self.id, game_id, seat);
                self.binding = Binding::Playing { game_id, seat, session };
                self.write(Message::GameStart(hand));
            }
            PlayerEvent::RoundResult(outcome) => self.write(Message::PlayResult(outcome)),
            PlayerEvent::Close(CloseMode::Graceful) => {
                // The writer flushes, shuts down, and then stops the actor.
                self.binding = Binding::Closing;
                self.writer.close();
            }
            PlayerEvent::Close(CloseMode::Immediate) => {
                self.binding = Binding::Closing;
                ctx.stop();
            }
        }
    }
}
