//! Presentation boundary.
//!
//! The client never talks to a UI directly. Everything it wants shown is
//! turned into a [`Notification`] and handed to a [`GameObserver`] once the
//! session lock has been released.

use crate::game::{
    IllegalMove, RoundSnapshot, constants::NUM_PLAYERS, entities::SeatIndex,
};

/// Receives everything the client wants to show. Every method defaults to
/// doing nothing so implementors only pick what they render.
pub trait GameObserver: Send + Sync {
    fn on_status_message(&self, _text: &str) {}

    fn on_chat_message(&self, _text: &str) {}

    /// The seat the local view should highlight.
    fn on_active_player_changed(&self, _seat: SeatIndex) {}

    fn on_round_state_changed(&self, _snapshot: &RoundSnapshot) {}

    /// Only called for moves made by the local player.
    fn on_move_rejected(&self, _reason: &IllegalMove) {}

    /// Cards left in each seat when the round was won.
    fn on_game_ended(&self, _hand_counts: &[usize; NUM_PLAYERS]) {}
}

/// A queued observer call.
#[derive(Clone, Debug, PartialEq)]
pub enum Notification {
    Status(String),
    Chat(String),
    ActivePlayerChanged(SeatIndex),
    RoundStateChanged(RoundSnapshot),
    MoveRejected(IllegalMove),
    GameEnded([usize; NUM_PLAYERS]),
}

impl Notification {
    pub fn deliver(&self, observer: &dyn GameObserver) {
        match self {
            Self::Status(text) => observer.on_status_message(text),
            Self::Chat(text) => observer.on_chat_message(text),
            Self::ActivePlayerChanged(seat) => observer.on_active_player_changed(*seat),
            Self::RoundStateChanged(snapshot) => observer.on_round_state_changed(snapshot),
            Self::MoveRejected(reason) => observer.on_move_rejected(reason),
            Self::GameEnded(counts) => observer.on_game_ended(counts),
        }
    }
}

/// Observer that ignores everything.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullObserver;

impl GameObserver for NullObserver {}
