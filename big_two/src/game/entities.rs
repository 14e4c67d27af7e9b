use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};
use std::{
    cmp::Ordering,
    collections::HashSet,
    fmt::{self},
};
use thiserror::Error;

use super::constants::{DECK_SIZE, NUM_PLAYERS};

/// Card suits in ascending tie-break order.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
#[repr(u8)]
pub enum Suit {
    Diamond = 0,
    Club = 1,
    Heart = 2,
    Spade = 3,
}

impl Suit {
    pub const ALL: [Self; 4] = [Self::Diamond, Self::Club, Self::Heart, Self::Spade];
}

impl fmt::Display for Suit {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let repr = match self {
            Self::Diamond => "♦",
            Self::Club => "♣",
            Self::Heart => "♥",
            Self::Spade => "♠",
        };
        write!(f, "{repr}")
    }
}

impl TryFrom<u8> for Suit {
    type Error = CardError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::ALL
            .get(usize::from(value))
            .copied()
            .ok_or(CardError::InvalidSuit(value))
    }
}

impl From<Suit> for u8 {
    fn from(suit: Suit) -> u8 {
        suit as u8
    }
}

/// Card ranks in their face order (ace first). This is NOT the order cards
/// compare in; see [`Rank::effective`].
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
#[repr(u8)]
pub enum Rank {
    Ace = 0,
    Two = 1,
    Three = 2,
    Four = 3,
    Five = 4,
    Six = 5,
    Seven = 6,
    Eight = 7,
    Nine = 8,
    Ten = 9,
    Jack = 10,
    Queen = 11,
    King = 12,
}

impl Rank {
    pub const ALL: [Self; 13] = [
        Self::Ace,
        Self::Two,
        Self::Three,
        Self::Four,
        Self::Five,
        Self::Six,
        Self::Seven,
        Self::Eight,
        Self::Nine,
        Self::Ten,
        Self::Jack,
        Self::Queen,
        Self::King,
    ];

    /// Position of the rank in game order: 3 is 0, 2 is 12.
    #[must_use]
    pub const fn effective(self) -> u8 {
        (self as u8 + 11) % 13
    }

    /// Rank used when testing five cards for a run. Aces and twos are
    /// lifted above the king so runs may pass through K-A-2.
    #[must_use]
    pub const fn run_value(self) -> u8 {
        let rank = self as u8;
        if rank < 2 { rank + 13 } else { rank }
    }
}

impl fmt::Display for Rank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let repr = match self {
            Self::Ace => "A",
            Self::Two => "2",
            Self::Three => "3",
            Self::Four => "4",
            Self::Five => "5",
            Self::Six => "6",
            Self::Seven => "7",
            Self::Eight => "8",
            Self::Nine => "9",
            Self::Ten => "10",
            Self::Jack => "J",
            Self::Queen => "Q",
            Self::King => "K",
        };
        write!(f, "{repr}")
    }
}

impl TryFrom<u8> for Rank {
    type Error = CardError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::ALL
            .get(usize::from(value))
            .copied()
            .ok_or(CardError::InvalidRank(value))
    }
}

impl From<Rank> for u8 {
    fn from(rank: Rank) -> u8 {
        rank as u8
    }
}

#[derive(Debug, Deserialize, Eq, Error, PartialEq, Serialize)]
pub enum CardError {
    #[error("suit {0} out of range")]
    InvalidSuit(u8),
    #[error("rank {0} out of range")]
    InvalidRank(u8),
}

/// A playing card. Cards order by effective rank first and suit second,
/// so the 3 of diamonds is the lowest card and the 2 of spades the highest.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
pub struct Card {
    pub suit: Suit,
    pub rank: Rank,
}

impl Card {
    /// The card whose holder opens every round.
    pub const OPENING: Self = Self::new(Suit::Diamond, Rank::Three);

    #[must_use]
    pub const fn new(suit: Suit, rank: Rank) -> Self {
        Self { suit, rank }
    }

    /// Builds a card from its wire integers (`suit` 0..=3, `rank` 0..=12).
    pub fn from_indices(suit: u8, rank: u8) -> Result<Self, CardError> {
        Ok(Self::new(Suit::try_from(suit)?, Rank::try_from(rank)?))
    }

    fn game_key(&self) -> (u8, Suit) {
        (self.rank.effective(), self.suit)
    }
}

impl Ord for Card {
    fn cmp(&self, other: &Self) -> Ordering {
        self.game_key().cmp(&other.game_key())
    }
}

impl PartialOrd for Card {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}{}", self.rank, self.suit)
    }
}

/// Sorts cards ascending by game order. The sort is stable.
pub fn sort_cards(cards: &mut [Card]) {
    cards.sort();
}

/// Formats a run of cards as `[3♦ 4♣ 5♠]`.
pub struct CardsDisplay<'a>(pub &'a [Card]);

impl fmt::Display for CardsDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (i, card) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, " ")?;
            }
            write!(f, "{card}")?;
        }
        write!(f, "]")
    }
}

#[derive(Debug, Deserialize, Eq, Error, PartialEq, Serialize)]
pub enum DeckError {
    #[error("deck has {0} cards, expected {DECK_SIZE}")]
    WrongSize(usize),
    #[error("deck contains {0} more than once")]
    Duplicate(Card),
}

/// A full 52-card deck in dealing order.
///
/// A deck can only be built from a permutation of the standard cards, so a
/// round dealt from it always partitions the 52 cards exactly.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct Deck {
    cards: Vec<Card>,
}

impl Deck {
    #[must_use]
    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    /// A freshly shuffled deck.
    #[must_use]
    pub fn shuffled() -> Self {
        let mut deck = Self::default();
        deck.cards.shuffle(&mut rand::rng());
        deck
    }

    /// Card `i` of a deal goes to seat `i % 4`, matching how the dealer
    /// hands cards around the table.
    #[must_use]
    pub fn deal(&self) -> [Vec<Card>; NUM_PLAYERS] {
        let mut hands: [Vec<Card>; NUM_PLAYERS] = Default::default();
        for (i, card) in self.cards.iter().enumerate() {
            hands[i % NUM_PLAYERS].push(*card);
        }
        hands
    }
}

impl Default for Deck {
    /// Standard order: suits ascending, ranks in face order within a suit.
    fn default() -> Self {
        let cards = Suit::ALL
            .into_iter()
            .flat_map(|suit| Rank::ALL.into_iter().map(move |rank| Card::new(suit, rank)))
            .collect();
        Self { cards }
    }
}

impl TryFrom<Vec<Card>> for Deck {
    type Error = DeckError;

    fn try_from(cards: Vec<Card>) -> Result<Self, Self::Error> {
        if cards.len() != DECK_SIZE {
            return Err(DeckError::WrongSize(cards.len()));
        }
        let mut seen = HashSet::with_capacity(DECK_SIZE);
        for card in &cards {
            if !seen.insert(*card) {
                return Err(DeckError::Duplicate(*card));
            }
        }
        Ok(Self { cards })
    }
}

// Decks coming off the wire go through the same validation as local ones.
impl<'de> Deserialize<'de> for Deck {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(Deserialize)]
        struct RawDeck {
            cards: Vec<Card>,
        }
        let raw = RawDeck::deserialize(deserializer)?;
        Self::try_from(raw.cards).map_err(serde::de::Error::custom)
    }
}

/// Seat position at the table, 0..4.
pub type SeatIndex = usize;

/// A seat at the table and the cards currently held in it.
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct Player {
    pub name: String,
    cards: Vec<Card>,
}

impl Player {
    #[must_use]
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            cards: Vec::new(),
        }
    }

    #[must_use]
    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    #[must_use]
    pub fn num_cards(&self) -> usize {
        self.cards.len()
    }

    #[must_use]
    pub fn has_name(&self) -> bool {
        !self.name.is_empty()
    }

    pub(crate) fn set_cards(&mut self, mut cards: Vec<Card>) {
        sort_cards(&mut cards);
        self.cards = cards;
    }

    pub(crate) fn clear_cards(&mut self) {
        self.cards.clear();
    }

    /// Removes every card in `played` from this player's hand.
    pub(crate) fn remove_cards(&mut self, played: &[Card]) {
        self.cards.retain(|card| !played.contains(card));
    }
}
