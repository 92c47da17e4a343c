//! Game rules: cards, dealing, and the per-game state machine.

pub mod deck;
pub mod state;

pub use deck::{Card, Dealer, Deck, Hand, compare, new_deck};
pub use state::{GameError, GameState, Outcome, Phase, PlayStep, Round, Seat, Tally};
