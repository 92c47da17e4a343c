//! Matchmaking module: pairs connections that asked for a game, first come first served.

pub mod messages;
pub mod server;
