//! Actor addresses shared by the accept loop.
//!
//! Holds the matchmaker that new connections report to and the session
//! manager that runs the games it pairs.

use actix::{Actor, Addr};

use crate::config::ServerConfig;
use crate::game::Dealer;
use crate::server::game_session::server::GameSessionManager;
use crate::server::matchmaking::server::MatchmakingServer;

/// Handles to the two long-lived actors of a running server.
#[derive(Clone)]
pub struct AppState {
    /// Address of the matchmaking server actor.
    pub matchmaking_addr: Addr<MatchmakingServer>,
    /// Address of the game session manager actor.
    pub game_session_manager: Addr<GameSessionManager>,
}

impl AppState {
    /// Start the session manager and the matchmaker wired to it.
    pub fn start(config: &ServerConfig, dealer: Dealer) -> Self {
        let game_session_manager = GameSessionManager::new(dealer, config.play_timeout).start();
        let matchmaking_addr =
            MatchmakingServer::new(game_session_manager.clone(), config.queue_timeout).start();
        AppState {
            matchmaking_addr,
            game_session_manager,
        }
    }
}
