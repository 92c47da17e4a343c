//! Two-player war card game server.
//!
//! Clients connect over TCP, ask for a game, and are paired first come first
//! served. Each pair gets its own session actor that deals a shuffled deck
//! and resolves the 26 rounds as both players' cards arrive.

pub mod client;
pub mod config;
pub mod game;
pub mod protocol;
pub mod server;
