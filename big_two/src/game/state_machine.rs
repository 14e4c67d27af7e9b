//! Turn engine for a single Big Two round.
//!
//! A [`RoundState`] moves through `NotStarted -> InProgress -> Ended`. It is
//! dealt a deck with [`RoundState::start`], after which seats take turns
//! through [`RoundState::attempt_move`] until one of them runs out of cards.

use log::debug;
use serde::{Deserialize, Serialize};
use std::{collections::HashSet, fmt};
use thiserror::Error;

use super::constants::NUM_PLAYERS;
use super::entities::{Card, Deck, Player, SeatIndex};
use super::functional::{Hand, HandType, InvalidHand};

/// Round lifecycle.
#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub enum Phase {
    #[default]
    NotStarted,
    InProgress,
    Ended,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let repr = match self {
            Self::NotStarted => "not started",
            Self::InProgress => "in progress",
            Self::Ended => "ended",
        };
        write!(f, "{repr}")
    }
}

/// Reasons a move is refused. A refused move leaves the round untouched and
/// the player may simply try again.
#[derive(Clone, Debug, Deserialize, Eq, Error, PartialEq, Serialize)]
pub enum IllegalMove {
    #[error("round is {0}")]
    RoundNotInProgress(Phase),
    #[error("not your turn")]
    OutOfTurn,
    #[error("can't pass while leading")]
    CannotPass,
    #[error("card index {0} out of range")]
    InvalidCardIndex(usize),
    #[error("card index {0} selected twice")]
    RepeatedCardIndex(usize),
    #[error(transparent)]
    InvalidHand(#[from] InvalidHand),
    #[error("opening play must include {}", Card::OPENING)]
    MissingOpeningCard,
    #[error("need {expected} cards to follow a {top}")]
    WrongSize { expected: usize, top: HandType },
    #[error("{played} doesn't beat {top}")]
    DoesNotBeat { played: HandType, top: HandType },
}

/// What an accepted move did to the round.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum MoveOutcome {
    /// The seat passed; `next` is now on turn.
    Passed { next: SeatIndex },
    /// The hand went to the table; `next` is now on turn.
    Played { hand: Hand, next: SeatIndex },
    /// The hand emptied the seat and ended the round.
    Finished { hand: Hand, winner: SeatIndex },
}

/// A seat as shown to the presentation layer.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct PlayerView {
    pub name: String,
    pub num_cards: usize,
}

/// Read-only copy of a round. Only the viewer's own cards are included.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct RoundSnapshot {
    pub phase: Phase,
    pub current_player: SeatIndex,
    pub players: Vec<PlayerView>,
    pub viewer: Option<SeatIndex>,
    pub viewer_cards: Vec<Card>,
    pub table: Vec<Hand>,
}

impl RoundSnapshot {
    /// Most recently played hand, the one to beat.
    #[must_use]
    pub fn top_hand(&self) -> Option<&Hand> {
        self.table.last()
    }
}

/// The authoritative state of one round.
#[derive(Clone, Debug, Default)]
pub struct RoundState {
    players: [Player; NUM_PLAYERS],
    /// Append-only record of hands played this round. Only cleared by
    /// [`RoundState::start`].
    table: Vec<Hand>,
    current_player: SeatIndex,
    phase: Phase,
}

impl RoundState {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    #[must_use]
    pub fn current_player(&self) -> SeatIndex {
        self.current_player
    }

    #[must_use]
    pub fn players(&self) -> &[Player; NUM_PLAYERS] {
        &self.players
    }

    #[must_use]
    pub fn player(&self, seat: SeatIndex) -> Option<&Player> {
        self.players.get(seat)
    }

    #[must_use]
    pub fn table(&self) -> &[Hand] {
        &self.table
    }

    #[must_use]
    pub fn top_hand(&self) -> Option<&Hand> {
        self.table.last()
    }

    /// Names a seat. Returns `false` if the seat doesn't exist.
    pub fn set_name(&mut self, seat: SeatIndex, name: &str) -> bool {
        match self.players.get_mut(seat) {
            Some(player) => {
                player.name = name.to_string();
                true
            }
            None => false,
        }
    }

    /// Whether every seat has a name.
    #[must_use]
    pub fn is_full(&self) -> bool {
        self.players.iter().all(Player::has_name)
    }

    /// Clears the table and every hand, deals `deck` around the table and
    /// puts the holder of the opening card on turn. Returns that seat.
    pub fn start(&mut self, deck: &Deck) -> SeatIndex {
        self.table.clear();
        for (player, cards) in self.players.iter_mut().zip(deck.deal()) {
            player.set_cards(cards);
        }
        self.current_player = self
            .players
            .iter()
            .position(|player| player.cards().contains(&Card::OPENING))
            .unwrap_or_default();
        self.phase = Phase::InProgress;
        debug!("round started, seat {} opens", self.current_player);
        self.current_player
    }

    /// Abandons the round. Hands are emptied but the table history is kept
    /// until the next [`RoundState::start`].
    pub fn reset(&mut self) {
        for player in &mut self.players {
            player.clear_cards();
        }
        self.phase = Phase::NotStarted;
    }

    /// Attempts a move for `seat`. `None` passes; `Some(indices)` plays the
    /// cards at those positions of the seat's hand.
    pub fn attempt_move(
        &mut self,
        seat: SeatIndex,
        selection: Option<&[usize]>,
    ) -> Result<MoveOutcome, IllegalMove> {
        if self.phase != Phase::InProgress {
            return Err(IllegalMove::RoundNotInProgress(self.phase));
        }
        if seat != self.current_player {
            return Err(IllegalMove::OutOfTurn);
        }
        match selection {
            None => self.pass(),
            Some(indices) => self.play(indices),
        }
    }

    fn pass(&mut self) -> Result<MoveOutcome, IllegalMove> {
        // Passing is only possible while someone else's hand is on top.
        let can_pass = self
            .top_hand()
            .is_some_and(|top| top.owner() != self.current_player);
        if !can_pass {
            return Err(IllegalMove::CannotPass);
        }
        self.advance();
        Ok(MoveOutcome::Passed {
            next: self.current_player,
        })
    }

    fn play(&mut self, indices: &[usize]) -> Result<MoveOutcome, IllegalMove> {
        let seat = self.current_player;
        let cards = self.select(seat, indices)?;
        let hand = Hand::compose(seat, cards)?;
        self.check_against_table(&hand)?;

        self.players[seat].remove_cards(hand.cards());
        self.table.push(hand.clone());
        if self.players[seat].num_cards() == 0 {
            self.phase = Phase::Ended;
            debug!("seat {seat} emptied their hand");
            return Ok(MoveOutcome::Finished { hand, winner: seat });
        }
        self.advance();
        Ok(MoveOutcome::Played {
            hand,
            next: self.current_player,
        })
    }

    fn select(&self, seat: SeatIndex, indices: &[usize]) -> Result<Vec<Card>, IllegalMove> {
        let held = self.players[seat].cards();
        let mut seen = HashSet::with_capacity(indices.len());
        indices
            .iter()
            .map(|&idx| {
                if !seen.insert(idx) {
                    return Err(IllegalMove::RepeatedCardIndex(idx));
                }
                held.get(idx).copied().ok_or(IllegalMove::InvalidCardIndex(idx))
            })
            .collect()
    }

    fn check_against_table(&self, hand: &Hand) -> Result<(), IllegalMove> {
        match self.top_hand() {
            None if hand.contains(&Card::OPENING) => Ok(()),
            None => Err(IllegalMove::MissingOpeningCard),
            // Everyone else passed, so the trick is theirs to lead.
            Some(top) if top.owner() == hand.owner() => Ok(()),
            Some(top) if top.len() != hand.len() => Err(IllegalMove::WrongSize {
                expected: top.len(),
                top: top.kind(),
            }),
            Some(top) if hand.beats(top) => Ok(()),
            Some(top) => Err(IllegalMove::DoesNotBeat {
                played: hand.kind(),
                top: top.kind(),
            }),
        }
    }

    fn advance(&mut self) {
        self.current_player = (self.current_player + 1) % NUM_PLAYERS;
    }

    /// Whether a dealt round has been won.
    #[must_use]
    pub fn end_of_game(&self) -> bool {
        self.phase != Phase::NotStarted && self.players.iter().any(|p| p.num_cards() == 0)
    }

    /// Cards left in each seat.
    #[must_use]
    pub fn hand_counts(&self) -> [usize; NUM_PLAYERS] {
        let mut counts = [0; NUM_PLAYERS];
        for (count, player) in counts.iter_mut().zip(&self.players) {
            *count = player.num_cards();
        }
        counts
    }

    /// A copy of the round as seen from `viewer`'s seat.
    #[must_use]
    pub fn snapshot(&self, viewer: Option<SeatIndex>) -> RoundSnapshot {
        RoundSnapshot {
            phase: self.phase,
            current_player: self.current_player,
            players: self
                .players
                .iter()
                .map(|p| PlayerView {
                    name: p.name.clone(),
                    num_cards: p.num_cards(),
                })
                .collect(),
            viewer,
            viewer_cards: viewer
                .and_then(|seat| self.players.get(seat))
                .map(|p| p.cards().to_vec())
                .unwrap_or_default(),
            table: self.table.clone(),
        }
    }
}
