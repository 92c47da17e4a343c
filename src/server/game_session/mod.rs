//! Game session module: one actor per running game plus the manager that tracks them.

pub mod messages;
pub mod server;

pub use server::GameSession;
