//! # Big Two
//!
//! A four-player Big Two (Choh Dai Di) client library.
//!
//! The game engine is a plain state machine over a dealt deck. The network
//! side keeps one connection to a dealer that relays every move to all
//! seats, so each client runs its own copy of the round and applies the
//! same messages in the same order.
//!
//! ## Round lifecycle
//!
//! - **NotStarted**: Seats fill up and announce themselves ready
//! - **InProgress**: The holder of 3♦ opens and seats take turns
//! - **Ended**: A seat played its last card
//!
//! ## Core Modules
//!
//! - [`game`]: Cards, hand classification and the turn engine
//! - [`net`]: Wire protocol, session dispatch and the TCP client
//!
//! ## Example
//!
//! ```
//! use big_two::{RoundState, entities::{Card, Deck}};
//!
//! let mut round = RoundState::new();
//! let opener = round.start(&Deck::shuffled());
//! assert!(round.players()[opener].cards().contains(&Card::OPENING));
//! ```

/// Networking components for talking to a dealer.
pub mod net;
pub use net::{
    client::{Client, ConnectionState},
    config::{ClientConfig, ConfigError},
    errors::{ConnectionError, NetError, ProtocolError, SessionError},
    messages,
    observer::{GameObserver, Notification},
    utils,
};

/// Core game logic, entities, and state machine.
pub mod game;
pub use game::{
    IllegalMove, MoveOutcome, Phase, PlayerView, RoundSnapshot, RoundState,
    constants::{self, CARDS_PER_PLAYER, DECK_SIZE, NUM_PLAYERS},
    entities, functional,
};
