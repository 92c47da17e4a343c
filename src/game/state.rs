//! Per-game state machine: seats, pending plays, round resolution and score.

use std::cmp::Ordering;
use std::fmt;

use thiserror::Error;

use crate::game::deck::{Card, Hand, compare};

/// One of the two sides of a game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Seat {
    A,
    B,
}

impl Seat {
    pub const BOTH: [Seat; 2] = [Seat::A, Seat::B];

    pub fn index(self) -> usize {
        match self {
            Seat::A => 0,
            Seat::B => 1,
        }
    }

    pub fn opponent(self) -> Seat {
        match self {
            Seat::A => Seat::B,
            Seat::B => Seat::A,
        }
    }
}

impl fmt::Display for Seat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Seat::A => f.write_str("seat A"),
            Seat::B => f.write_str("seat B"),
        }
    }
}

/// Lifecycle of a game. Resolution of a round happens inside [`GameState::play`],
/// so it never shows up as a phase of its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    AwaitingStart,
    AwaitingPlays,
    Complete,
    Aborted,
}

impl Phase {
    pub fn is_terminal(self) -> bool {
        matches!(self, Phase::Complete | Phase::Aborted)
    }
}

/// Result of one round from one player's point of view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Win,
    Draw,
    Lose,
}

impl Outcome {
    /// Outcome for the owner of `mine` when it meets `theirs`.
    pub fn of(mine: Card, theirs: Card) -> Self {
        match compare(mine, theirs) {
            Ordering::Greater => Outcome::Win,
            Ordering::Equal => Outcome::Draw,
            Ordering::Less => Outcome::Lose,
        }
    }
}

/// Running score of one player.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Tally {
    pub wins: u32,
    pub draws: u32,
    pub losses: u32,
}

impl Tally {
    /// Count one round from this player's side.
    pub fn record(&mut self, outcome: Outcome) {
        match outcome {
            Outcome::Win => self.wins += 1,
            Outcome::Draw => self.draws += 1,
            Outcome::Lose => self.losses += 1,
        }
    }

    pub fn rounds(&self) -> u32 {
        self.wins + self.draws + self.losses
    }

    /// Wins minus losses.
    pub fn net(&self) -> i64 {
        i64::from(self.wins) - i64::from(self.losses)
    }
}

/// A resolved round.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Round {
    pub cards: [Card; 2],
    pub outcomes: [Outcome; 2],
    /// Both hands are empty after this round.
    pub finished: bool,
}

impl Round {
    pub fn outcome_for(&self, seat: Seat) -> Outcome {
        self.outcomes[seat.index()]
    }
}

/// What happened after a card was accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayStep {
    /// The card is pending; the opponent has not played yet.
    Waiting,
    Resolved(Round),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GameError {
    #[error("cards were already dealt")]
    AlreadyDealt,
    #[error("game is not accepting plays ({0:?})")]
    NotAcceptingPlays(Phase),
    #[error("{seat} already has a card pending")]
    AlreadyPlayed { seat: Seat },
    #[error("{seat} played card {card}, which is not in their hand")]
    IllegalPlay { seat: Seat, card: Card },
}

/// Authoritative state of one game: both hands, the pending plays and the score.
///
/// Pure rules, no I/O. The session actor owns one of these and turns its
/// results into outbound messages.
#[derive(Debug, Clone)]
pub struct GameState {
    phase: Phase,
    hands: [Hand; 2],
    pending: [Option<Card>; 2],
    tallies: [Tally; 2],
    rounds: u32,
}

impl Default for GameState {
    fn default() -> Self {
        Self::new()
    }
}

impl GameState {
    pub fn new() -> Self {
        Self {
            phase: Phase::AwaitingStart,
            hands: [Hand::new(Vec::new()), Hand::new(Vec::new())],
            pending: [None, None],
            tallies: [Tally::default(); 2],
            rounds: 0,
        }
    }

    /// Hand out the two hands and start accepting plays.
    pub fn deal(&mut self, (a, b): (Hand, Hand)) -> Result<(), GameError> {
        if self.phase != Phase::AwaitingStart {
            return Err(GameError::AlreadyDealt);
        }
        self.hands = [a, b];
        self.phase = Phase::AwaitingPlays;
        Ok(())
    }

    /// Apply a PLAYCARD from `seat`.
    ///
    /// Playing twice in one round or playing a card outside one's own hand
    /// aborts the game. Plays against a finished game are rejected without
    /// changing anything.
    pub fn play(&mut self, seat: Seat, card: Card) -> Result<PlayStep, GameError> {
        if self.phase != Phase::AwaitingPlays {
            return Err(GameError::NotAcceptingPlays(self.phase));
        }
        let idx = seat.index();
        if self.pending[idx].is_some() {
            self.phase = Phase::Aborted;
            return Err(GameError::AlreadyPlayed { seat });
        }
        if !self.hands[idx].remove(card) {
            self.phase = Phase::Aborted;
            return Err(GameError::IllegalPlay { seat, card });
        }
        self.pending[idx] = Some(card);

        match self.pending {
            [Some(a), Some(b)] => Ok(PlayStep::Resolved(self.resolve(a, b))),
            _ => Ok(PlayStep::Waiting),
        }
    }

    fn resolve(&mut self, a: Card, b: Card) -> Round {
        let outcomes = [Outcome::of(a, b), Outcome::of(b, a)];
        for seat in Seat::BOTH {
            self.tallies[seat.index()].record(outcomes[seat.index()]);
        }
        self.pending = [None, None];
        self.rounds += 1;

        let finished = self.hands.iter().all(Hand::is_empty);
        if finished {
            self.phase = Phase::Complete;
        }
        Round {
            cards: [a, b],
            outcomes,
            finished,
        }
    }

    /// Move to `Aborted`. Returns `false` if the game had already ended.
    pub fn abort(&mut self) -> bool {
        if self.phase.is_terminal() {
            return false;
        }
        self.phase = Phase::Aborted;
        true
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_terminal(&self) -> bool {
        self.phase.is_terminal()
    }

    pub fn hand(&self, seat: Seat) -> &Hand {
        &self.hands[seat.index()]
    }

    pub fn pending(&self, seat: Seat) -> Option<Card> {
        self.pending[seat.index()]
    }

    pub fn tally(&self, seat: Seat) -> Tally {
        self.tallies[seat.index()]
    }

    pub fn rounds(&self) -> u32 {
        self.rounds
    }
}
