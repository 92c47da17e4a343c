//! Cards, decks and hands.
//!
//! A card is an integer in `0..52`. Its rank is `value % 13` and its suit is
//! `value / 13`; only the rank matters when two cards are compared.

use std::cmp::Ordering;
use std::collections::BTreeSet;
use std::fmt;

use rand::Rng;
use rand::seq::SliceRandom;
use thiserror::Error;

use crate::config::game::{DECK_SIZE, HAND_SIZE, RANKS};

/// A single playing card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Card(u8);

impl Card {
    /// Build a card, or `None` if `value` is not in `0..52`.
    pub fn new(value: u8) -> Option<Self> {
        ((value as usize) < DECK_SIZE).then_some(Self(value))
    }

    pub fn value(self) -> u8 {
        self.0
    }

    pub fn rank(self) -> u8 {
        self.0 % RANKS
    }

    pub fn suit(self) -> u8 {
        self.0 / RANKS
    }
}

impl TryFrom<u8> for Card {
    type Error = DeckError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value).ok_or(DeckError::CardOutOfRange(value))
    }
}

impl From<Card> for u8 {
    fn from(card: Card) -> Self {
        card.0
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Compare two cards by rank only. Suit never breaks a tie.
pub fn compare(a: Card, b: Card) -> Ordering {
    a.rank().cmp(&b.rank())
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DeckError {
    #[error("card value {0} is outside 0..52")]
    CardOutOfRange(u8),
    #[error("a deck needs exactly 52 cards, got {0}")]
    WrongSize(usize),
    #[error("card {0} appears more than once")]
    Duplicate(Card),
}

/// A full ordered deck of 52 distinct cards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Deck {
    cards: Vec<Card>,
}

impl Deck {
    /// The 52 cards in ascending order.
    pub fn ordered() -> Self {
        Self {
            cards: (0..DECK_SIZE as u8).map(Card).collect(),
        }
    }

    /// A uniformly shuffled deck drawn from `rng`.
    pub fn shuffled<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let mut deck = Self::ordered();
        deck.cards.shuffle(rng);
        deck
    }

    /// Build a deck from an explicit order. The order must be a permutation of `0..52`.
    pub fn from_order(values: &[u8]) -> Result<Self, DeckError> {
        if values.len() != DECK_SIZE {
            return Err(DeckError::WrongSize(values.len()));
        }
        let mut seen = BTreeSet::new();
        let mut cards = Vec::with_capacity(DECK_SIZE);
        for &value in values {
            let card = Card::try_from(value)?;
            if !seen.insert(card) {
                return Err(DeckError::Duplicate(card));
            }
            cards.push(card);
        }
        Ok(Self { cards })
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    /// Split into two hands: the first 26 cards and the remaining 26.
    pub fn split(mut self) -> (Hand, Hand) {
        let second = self.cards.split_off(HAND_SIZE);
        (Hand::new(self.cards), Hand::new(second))
    }
}

/// Deal a fresh shuffled deck using the thread-local, OS-seeded generator.
pub fn new_deck() -> (Hand, Hand) {
    Deck::shuffled(&mut rand::rng()).split()
}

/// How a session obtains its deck.
#[derive(Debug, Clone, Default)]
pub enum Dealer {
    /// A freshly shuffled deck for every game.
    #[default]
    Shuffled,
    /// The same deck for every game.
    Fixed(Deck),
}

impl Dealer {
    pub fn deal(&self) -> (Hand, Hand) {
        match self {
            Dealer::Shuffled => new_deck(),
            Dealer::Fixed(deck) => deck.clone().split(),
        }
    }
}

/// The cards one player has not played yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Hand {
    cards: Vec<Card>,
}

impl Hand {
    pub fn new(cards: Vec<Card>) -> Self {
        Self { cards }
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn contains(&self, card: Card) -> bool {
        self.cards.contains(&card)
    }

    /// Take `card` out of the hand. Returns `false` if it was not there.
    pub fn remove(&mut self, card: Card) -> bool {
        match self.cards.iter().position(|&c| c == card) {
            Some(idx) => {
                self.cards.swap_remove(idx);
                true
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn card(value: u8) -> Card {
        Card::new(value).unwrap()
    }

    #[test]
    fn test_card_range() {
        assert!(Card::new(0).is_some());
        assert!(Card::new(51).is_some());
        assert!(Card::new(52).is_none());
        assert_eq!(Card::try_from(200), Err(DeckError::CardOutOfRange(200)));
    }

    #[test]
    fn test_rank_and_suit() {
        assert_eq!(card(0).rank(), 0);
        assert_eq!(card(13).rank(), 0);
        assert_eq!(card(13).suit(), 1);
        assert_eq!(card(51).rank(), 12);
        assert_eq!(card(51).suit(), 3);
    }

    #[test]
    fn test_compare_ignores_suit() {
        assert_eq!(compare(card(0), card(13)), Ordering::Equal);
        assert_eq!(compare(card(1), card(14)), Ordering::Equal);
        assert_eq!(compare(card(12), card(13)), Ordering::Greater);
        assert_eq!(compare(card(26), card(25)), Ordering::Less);
    }

    #[test]
    fn test_split_sizes() {
        let (a, b) = Deck::ordered().split();
        assert_eq!(a.len(), HAND_SIZE);
        assert_eq!(b.len(), HAND_SIZE);
        assert_eq!(a.cards()[0], card(0));
        assert_eq!(b.cards()[0], card(26));
    }

    #[test]
    fn test_from_order_rejects_bad_decks() {
        assert_eq!(Deck::from_order(&[0, 1, 2]), Err(DeckError::WrongSize(3)));

        let mut values: Vec<u8> = (0..52).collect();
        values[51] = 0;
        assert_eq!(Deck::from_order(&values), Err(DeckError::Duplicate(card(0))));

        values[51] = 60;
        assert_eq!(Deck::from_order(&values), Err(DeckError::CardOutOfRange(60)));
    }

    #[test]
    fn test_hand_remove() {
        let mut hand = Hand::new(vec![card(3), card(7), card(9)]);
        assert!(hand.remove(card(7)));
        assert!(!hand.remove(card(7)));
        assert!(!hand.contains(card(7)));
        assert_eq!(hand.len(), 2);
    }

    #[test]
    fn test_fixed_dealer_is_stable() {
        let deck = Deck::shuffled(&mut StdRng::seed_from_u64(7));
        let dealer = Dealer::Fixed(deck.clone());
        assert_eq!(dealer.deal(), deck.clone().split());
        assert_eq!(dealer.deal(), deck.split());
    }

    #[test]
    fn test_shuffled_decks_differ() {
        // 52! orderings; two independent draws colliding means the generator is broken.
        let (a1, _) = new_deck();
        let (a2, _) = new_deck();
        assert_ne!(a1, a2);
    }

    proptest! {
        #[test]
        fn prop_hands_partition_the_deck(seed in any::<u64>()) {
            let (a, b) = Deck::shuffled(&mut StdRng::seed_from_u64(seed)).split();
            prop_assert_eq!(a.len(), HAND_SIZE);
            prop_assert_eq!(b.len(), HAND_SIZE);

            let set_a: BTreeSet<u8> = a.cards().iter().map(|c| c.value()).collect();
            let set_b: BTreeSet<u8> = b.cards().iter().map(|c| c.value()).collect();
            prop_assert!(set_a.is_disjoint(&set_b));

            let union: BTreeSet<u8> = set_a.union(&set_b).copied().collect();
            prop_assert_eq!(union, (0..52).collect::<BTreeSet<u8>>());
        }

        #[test]
        fn prop_compare_matches_rank(x in 0u8..52, y in 0u8..52) {
            let (a, b) = (card(x), card(y));
            prop_assert_eq!(compare(a, b), (x % 13).cmp(&(y % 13)));
            prop_assert_eq!(compare(a, b), compare(b, a).reverse());
        }

        #[test]
        fn prop_same_rank_always_draws(rank in 0u8..13, s1 in 0u8..4, s2 in 0u8..4) {
            prop_assert_eq!(compare(card(s1 * 13 + rank), card(s2 * 13 + rank)), Ordering::Equal);
        }
    }
}
