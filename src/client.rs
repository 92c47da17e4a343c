//! Load-generating client.
//!
//! Each client asks for a game, plays its hand in the order it was dealt and
//! keeps score from the PLAYRESULT messages.

use futures_util::{SinkExt, StreamExt};
use log::{info, warn};
use std::fmt;
use std::io;
use std::net::SocketAddr;
use std::sync::Arc;
use thiserror::Error;
use tokio::net::TcpStream;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tokio_util::codec::Framed;

use crate::game::Tally;
use crate::protocol::{CodecError, Message, Opcode, WarCodec};

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("could not connect: {0}")]
    Connect(io::Error),
    #[error(transparent)]
    Codec(#[from] CodecError),
    #[error("server closed the connection")]
    Closed,
    #[error("expected {expected:?}, server sent {got:?}")]
    Unexpected { expected: Opcode, got: Opcode },
}

/// How a finished game went for this client.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Won,
    Lost,
    Drew,
}

impl From<&Tally> for Verdict {
    fn from(tally: &Tally) -> Self {
        match tally.net() {
            n if n > 0 => Verdict::Won,
            n if n < 0 => Verdict::Lost,
            _ => Verdict::Drew,
        }
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Verdict::Won => "won",
            Verdict::Lost => "lost",
            Verdict::Drew => "drew",
        })
    }
}

type Conn = Framed<TcpStream, WarCodec>;

async fn next(conn: &mut Conn) -> Result<Message, ClientError> {
    match conn.next().await {
        Some(message) => Ok(message?),
        None => Err(ClientError::Closed),
    }
}

/// Play one full game against whoever the server pairs us with.
pub async fn play(addr: SocketAddr) -> Result<Tally, ClientError> {
    let stream = TcpStream::connect(addr).await.map_err(ClientError::Connect)?;
    stream.set_nodelay(true).map_err(ClientError::Connect)?;
    let mut conn = Framed::new(stream, WarCodec);

    conn.send(Message::WantGame).await?;
    let hand = match next(&mut conn).await? {
        Message::GameStart(hand) => hand,
        other => {
            return Err(ClientError::Unexpected {
                expected: Opcode::GameStart,
                got: other.opcode(),
            });
        }
    };

    let mut tally = Tally::default();
    for card in hand {
        conn.send(Message::PlayCard(card)).await?;
        match next(&mut conn).await? {
            Message::PlayResult(outcome) => tally.record(outcome),
            other => {
                return Err(ClientError::Unexpected {
                    expected: Opcode::PlayResult,
                    got: other.opcode(),
                });
            }
        }
    }

    info!(
        "[Client] Game complete, I {} ({} wins, {} draws, {} losses)",
        Verdict::from(&tally),
        tally.wins,
        tally.draws,
        tally.losses
    );
    Ok(tally)
}

/// Run `count` clients with at most `concurrency` connected at once.
/// Returns how many played a game to the end.
///
/// Clients only finish in pairs, so with an odd `count` the last one waits
/// for a partner from elsewhere.
pub async fn play_many(addr: SocketAddr, count: usize, concurrency: usize) -> usize {
    let permits = Arc::new(Semaphore::new(concurrency));
    let mut clients = JoinSet::new();
    for _ in 0..count {
        let permits = Arc::clone(&permits);
        clients.spawn(async move {
            let _permit = permits.acquire_owned().await.ok()?;
            match play(addr).await {
                Ok(tally) => Some(tally),
                Err(err) => {
                    warn!("[Client] Game failed: {}", err);
                    None
                }
            }
        });
    }

    let mut completed = 0;
    while let Some(result) = clients.join_next().await {
        match result {
            Ok(Some(_)) => completed += 1,
            Ok(None) => {}
            Err(err) => warn!("[Client] Client task failed: {}", err),
        }
    }
    info!("[Client] {}/{} clients completed a game", completed, count);
    completed
}
