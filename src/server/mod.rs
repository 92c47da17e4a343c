//! Server layer root module.
//!
//! This module organizes the running server:
//! - Per-connection actors that decode and route client messages
//! - Matchmaking (FIFO pairing of waiting connections)
//! - Game session orchestration (one actor per game)
//! - The TCP accept loop and the actor addresses it shares

pub mod connection;
pub mod game_session;
pub mod listener;
pub mod matchmaking;
pub mod state;
