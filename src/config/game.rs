//! Game configuration constants.
//!
//! This module defines the deck layout used by every session.

/// Cards in a full deck, valued 0 through 51.
pub const DECK_SIZE: usize = 52;

/// Number of cards dealt to each of the two players.
pub const HAND_SIZE: usize = DECK_SIZE / 2;

/// Number of distinct ranks; a card's rank is its value modulo this.
pub const RANKS: u8 = 13;

/// Default time (in seconds) a session waits for a round to complete, when enabled.
pub const DEFAULT_PLAY_TIMEOUT_SECS: u64 = 60;
