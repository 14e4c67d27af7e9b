//! Plain-text rendering of the table for a terminal.

use big_two::{
    GameObserver, IllegalMove, RoundSnapshot, constants::NUM_PLAYERS, entities::SeatIndex,
};
use std::fmt::Write;

/// Prints everything the client reports to stdout.
#[derive(Debug, Default)]
pub struct ConsoleObserver;

impl GameObserver for ConsoleObserver {
    fn on_status_message(&self, text: &str) {
        println!("{text}");
    }

    fn on_chat_message(&self, text: &str) {
        println!("[chat] {text}");
    }

    fn on_active_player_changed(&self, seat: SeatIndex) {
        println!("You are seated at position {seat}.");
    }

    fn on_round_state_changed(&self, snapshot: &RoundSnapshot) {
        if !snapshot.viewer_cards.is_empty() {
            print!("{}", render_hand(snapshot));
        }
    }

    fn on_move_rejected(&self, reason: &IllegalMove) {
        println!("Not a legal move: {reason}");
    }

    fn on_game_ended(&self, hand_counts: &[usize; NUM_PLAYERS]) {
        print!("{}", render_final_counts(hand_counts));
    }
}

/// The local hand with the positions `play` expects.
#[must_use]
pub fn render_hand(snapshot: &RoundSnapshot) -> String {
    let mut out = String::from("Your hand:");
    for (idx, card) in snapshot.viewer_cards.iter().enumerate() {
        let _ = write!(out, " {idx}:{card}");
    }
    out.push('\n');
    out
}

/// Seats, card counts and the hand to beat.
#[must_use]
pub fn render_table(snapshot: &RoundSnapshot) -> String {
    let mut out = format!("Round {}\n", snapshot.phase);
    for (seat, player) in snapshot.players.iter().enumerate() {
        let name = if player.name.is_empty() {
            "(empty)"
        } else {
            player.name.as_str()
        };
        let marker = if seat == snapshot.current_player { '>' } else { ' ' };
        let you = if snapshot.viewer == Some(seat) { " (you)" } else { "" };
        let _ = writeln!(out, "{marker} {seat}. {name}{you}: {} cards", player.num_cards);
    }
    match snapshot.top_hand() {
        Some(hand) => {
            let _ = writeln!(out, "To beat: {hand} by seat {}", hand.owner());
        }
        None => out.push_str("Table is empty\n"),
    }
    out
}

#[must_use]
pub fn render_final_counts(hand_counts: &[usize; NUM_PLAYERS]) -> String {
    let mut out = String::from("Cards left:");
    for (seat, count) in hand_counts.iter().enumerate() {
        let _ = write!(out, " seat {seat}={count}");
    }
    out.push('\n');
    out
}
