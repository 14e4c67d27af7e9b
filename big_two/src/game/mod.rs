//! Big Two game engine.
//!
//! This module provides the card model, hand classification and the
//! per-round turn engine:
//! - Card ordering where 3 is the lowest rank and 2 the highest
//! - Hand types with a five-card dominance ladder
//! - A round state machine enforcing the legal-move policy

pub mod constants;
pub mod entities;
pub mod functional;
pub mod state_machine;

pub use state_machine::{IllegalMove, MoveOutcome, Phase, PlayerView, RoundSnapshot, RoundState};
