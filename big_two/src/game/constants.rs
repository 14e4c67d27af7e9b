//! Table and deck sizes.

/// Seats at a Big Two table.
pub const NUM_PLAYERS: usize = 4;

/// Cards in a standard deck.
pub const DECK_SIZE: usize = 52;

/// Cards dealt to each seat at the start of a round.
pub const CARDS_PER_PLAYER: usize = DECK_SIZE / NUM_PLAYERS;
