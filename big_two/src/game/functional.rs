//! Hand classification and comparison.
//!
//! Everything here is pure: a selection of cards is classified into a
//! [`HandType`], composed into an owned [`Hand`], and two hands are compared
//! with [`beats`]. Cross-type comparisons go through the five-card dominance
//! ladder in [`HandType::tier`].

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use super::entities::{Card, CardsDisplay, SeatIndex, sort_cards};

/// Combination types a move can be played as.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
pub enum HandType {
    Single,
    Pair,
    Triple,
    Straight,
    Flush,
    FullHouse,
    Quad,
    StraightFlush,
}

impl HandType {
    /// Number of cards a hand of this type holds.
    #[must_use]
    pub const fn size(self) -> usize {
        match self {
            Self::Single => 1,
            Self::Pair => 2,
            Self::Triple => 3,
            Self::Straight | Self::Flush | Self::FullHouse | Self::Quad | Self::StraightFlush => 5,
        }
    }

    /// Position on the five-card dominance ladder. A higher tier beats a
    /// lower one regardless of card values. `None` for 1-3 card hands.
    #[must_use]
    pub const fn tier(self) -> Option<u8> {
        match self {
            Self::Single | Self::Pair | Self::Triple => None,
            Self::Straight => Some(0),
            Self::Flush => Some(1),
            Self::FullHouse => Some(2),
            Self::Quad => Some(3),
            Self::StraightFlush => Some(4),
        }
    }
}

impl fmt::Display for HandType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let repr = match self {
            Self::Single => "Single",
            Self::Pair => "Pair",
            Self::Triple => "Triple",
            Self::Straight => "Straight",
            Self::Flush => "Flush",
            Self::FullHouse => "FullHouse",
            Self::Quad => "Quad",
            Self::StraightFlush => "StraightFlush",
        };
        write!(f, "{repr}")
    }
}

/// Reasons a selection of cards isn't a playable hand.
#[derive(Clone, Debug, Deserialize, Eq, Error, PartialEq, Serialize)]
pub enum InvalidHand {
    #[error("a hand needs 1, 2, 3 or 5 cards, not {0}")]
    WrongSize(usize),
    #[error("{0} is selected more than once")]
    DuplicateCard(Card),
    #[error("cards don't share a rank")]
    MismatchedRanks,
    #[error("not a straight, flush, full house, quad or straight flush")]
    NoCombination,
}

fn same_rank(cards: &[Card]) -> bool {
    cards.windows(2).all(|w| w[0].rank == w[1].rank)
}

fn same_suit(cards: &[Card]) -> bool {
    cards.windows(2).all(|w| w[0].suit == w[1].suit)
}

fn is_run(cards: &[Card]) -> bool {
    cards
        .windows(2)
        .all(|w| w[0].rank.run_value() + 1 == w[1].rank.run_value())
}

/// Classifies five cards already sorted in game order. The checks run in
/// dominance order, so a straight flush is never reported as a flush or a
/// straight.
fn classify_five(cards: &[Card]) -> Option<HandType> {
    let flush = same_suit(cards);
    let run = is_run(cards);
    if flush && run {
        Some(HandType::StraightFlush)
    } else if same_rank(&cards[..4]) || same_rank(&cards[1..]) {
        Some(HandType::Quad)
    } else if (same_rank(&cards[..3]) && same_rank(&cards[3..]))
        || (same_rank(&cards[..2]) && same_rank(&cards[2..]))
    {
        Some(HandType::FullHouse)
    } else if flush {
        Some(HandType::Flush)
    } else if run {
        Some(HandType::Straight)
    } else {
        None
    }
}

/// Classifies a selection of cards. The input order doesn't matter.
pub fn classify(cards: &[Card]) -> Result<HandType, InvalidHand> {
    let mut sorted = cards.to_vec();
    sort_cards(&mut sorted);
    classify_sorted(&sorted)
}

fn classify_sorted(cards: &[Card]) -> Result<HandType, InvalidHand> {
    if let Some(w) = cards.windows(2).find(|w| w[0] == w[1]) {
        return Err(InvalidHand::DuplicateCard(w[0]));
    }
    match cards.len() {
        1 => Ok(HandType::Single),
        2 if same_rank(cards) => Ok(HandType::Pair),
        3 if same_rank(cards) => Ok(HandType::Triple),
        2 | 3 => Err(InvalidHand::MismatchedRanks),
        5 => classify_five(cards).ok_or(InvalidHand::NoCombination),
        n => Err(InvalidHand::WrongSize(n)),
    }
}

/// A classified combination played by one seat.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct Hand {
    owner: SeatIndex,
    kind: HandType,
    cards: Vec<Card>,
}

impl Hand {
    /// Classifies `cards` and binds them to `owner`. Fails if the cards
    /// don't form a playable hand.
    pub fn compose(owner: SeatIndex, mut cards: Vec<Card>) -> Result<Self, InvalidHand> {
        sort_cards(&mut cards);
        let kind = classify_sorted(&cards)?;
        Ok(Self { owner, kind, cards })
    }

    #[must_use]
    pub fn owner(&self) -> SeatIndex {
        self.owner
    }

    #[must_use]
    pub fn kind(&self) -> HandType {
        self.kind
    }

    /// Cards in game order.
    #[must_use]
    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    #[must_use]
    pub fn contains(&self, card: &Card) -> bool {
        self.cards.contains(card)
    }

    /// Highest card of the hand in game order.
    #[must_use]
    pub fn top_card(&self) -> Card {
        self.cards[self.cards.len() - 1]
    }

    /// The card that decides comparisons against a hand of the same type.
    ///
    /// For full houses and quads this is the highest card of the triple or
    /// quad, since the pair or kicker may outrank the group.
    #[must_use]
    pub fn rank_card(&self) -> Card {
        match self.kind {
            HandType::FullHouse if self.cards[2].rank == self.cards[0].rank => self.cards[2],
            HandType::Quad if self.cards[3].rank == self.cards[0].rank => self.cards[3],
            _ => self.top_card(),
        }
    }

    #[must_use]
    pub fn beats(&self, other: &Hand) -> bool {
        beats(self, other)
    }
}

impl fmt::Display for Hand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.kind, CardsDisplay(&self.cards))
    }
}

/// Whether `challenger` may be played on top of `incumbent`.
///
/// Five-card hands of different types compare by tier. Otherwise only hands
/// of the same type compare, and the challenger must hold a strictly higher
/// rank card.
#[must_use]
pub fn beats(challenger: &Hand, incumbent: &Hand) -> bool {
    match (challenger.kind.tier(), incumbent.kind.tier()) {
        (Some(ours), Some(theirs)) if ours != theirs => ours > theirs,
        _ if challenger.kind != incumbent.kind => false,
        _ => challenger.rank_card() > incumbent.rank_card(),
    }
}
