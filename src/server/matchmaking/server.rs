//! Matchmaking server actor.
//!
//! Holds the connections that asked for a game and have no partner yet.
//! The second arrival is paired with the first waiting one and the pair is
//! handed to the game session manager.

use actix::prelude::*;
use log::{debug, error, info};
use std::collections::VecDeque;
use std::time::{Duration, Instant};
use uuid::Uuid;

use super::messages::{Enqueue, Leave, QueueLen};
use crate::config::matchmaking::QUEUE_SWEEP_INTERVAL_SECS;
use crate::server::game_session::messages::{CloseMode, CreateGame, PlayerEvent};
use crate::server::game_session::server::GameSessionManager;

/// A connection waiting for a partner.
struct Waiting {
    conn_id: Uuid,
    player: Recipient<PlayerEvent>,
    since: Instant,
}

/// Main matchmaking server actor.
pub struct MatchmakingServer {
    /// Waiting connections, oldest first.
    queue: VecDeque<Waiting>,
    /// Address of the game session manager for launching games.
    game_session_manager: Addr<GameSessionManager>,
    /// Longest a connection may wait, if bounded.
    queue_timeout: Option<Duration>,
}

impl MatchmakingServer {
    /// Create a new matchmaking server.
    pub fn new(game_session_manager: Addr<GameSessionManager>, queue_timeout: Option<Duration>) -> Self {
        Self {
            queue: VecDeque::new(),
            game_session_manager,
            queue_timeout,
        }
    }

    /// Pop the oldest waiting connection that is still alive.
    fn next_waiting(&mut self) -> Option<Waiting> {
        while let Some(waiting) = self.queue.pop_front() {
            if waiting.player.connected() {
                return Some(waiting);
            }
            debug!("[Matchmaking] Dropping dead connection {} from the queue", waiting.conn_id);
        }
        None
    }

    /// Hand a pair to the game session manager. `first` takes seat A.
    fn launch_game(&mut self, first: Waiting, second: Waiting, ctx: &mut Context<Self>) {
        let players = [first.player, second.player];
        let fallback = players.clone();
        let conn_ids = (first.conn_id, second.conn_id);

        self.game_session_manager
            .send(CreateGame { players })
            .into_actor(self)
            .then(move |res, _act, _ctx| {
                match res {
                    Ok(game_id) => {
                        info!(
                            "[Matchmaking] Paired {} and {}, game_id={}",
                            conn_ids.0, conn_ids.1, game_id
                        );
                    }
                    Err(err) => {
                        error!("[Matchmaking] Could not create a game for {} and {}: {}", conn_ids.0, conn_ids.1, err);
                        for player in fallback {
                            player.do_send(PlayerEvent::Close(CloseMode::Immediate));
                        }
                    }
                }
                fut::ready(())
            })
            .spawn(ctx);
    }

    /// Close and forget connections that waited longer than the queue timeout.
    fn evict_expired(&mut self, timeout: Duration) {
        let (expired, kept): (VecDeque<_>, VecDeque<_>) = self
            .queue
            .drain(..)
            .partition(|waiting| waiting.since.elapsed() >= timeout);
        self.queue = kept;
        for waiting in expired {
            info!("[Matchmaking] Connection {} waited more than {:?}, closing", waiting.conn_id, timeout);
            waiting.player.do_send(PlayerEvent::Close(CloseMode::Immediate));
        }
    }
}

impl Actor for MatchmakingServer {
    type Context = Context<Self>;

    fn started(&mut self, ctx: &mut Self::Context) {
        if let Some(timeout) = self.queue_timeout {
            ctx.run_interval(Duration::from_secs(QUEUE_SWEEP_INTERVAL_SECS), move |act, _ctx| {
                act.evict_expired(timeout);
            });
        }
    }
}

impl Handler<Enqueue> for MatchmakingServer {
    type Result = ();

    /// Pair with the oldest waiting connection, or wait.
    fn handle(&mut self, msg: Enqueue, ctx: &mut Self::Context) -> Self::Result {
        let arrival = Waiting {
            conn_id: msg.conn_id,
            player: msg.player,
            since: Instant::now(),
        };
        match self.next_waiting() {
            Some(first) => self.launch_game(first, arrival, ctx),
            None => {
                debug!("[Matchmaking] Connection {} is waiting for a partner", arrival.conn_id);
                self.queue.push_back(arrival);
            }
        }
    }
}

impl Handler<Leave> for MatchmakingServer {
    type Result = ();

    fn handle(&mut self, msg: Leave, _ctx: &mut Self::Context) -> Self::Result {
        let before = self.queue.len();
        self.queue.retain(|waiting| waiting.conn_id != msg.conn_id);
        if self.queue.len() < before {
            debug!("[Matchmaking] Connection {} left the queue", msg.conn_id);
        }
    }
}

impl Handler<QueueLen> for MatchmakingServer {
    type Result = usize;

    fn handle(&mut self, _: QueueLen, _ctx: &mut Self::Context) -> Self::Result {
        self.queue.len()
    }
}
