//! Client-side view of a table, driven by messages from the dealer.
//!
//! A [`Session`] owns the [`RoundState`] and is the only thing that mutates
//! it. Each inbound [`GameMessage`] is turned into a [`Dispatch`]: replies to
//! write back to the dealer and notifications for the observer. Nothing in
//! here touches a socket.

use log::debug;

use crate::game::{
    MoveOutcome, RoundSnapshot, RoundState,
    entities::{Deck, SeatIndex},
};

use super::{
    errors::{NetError, ProtocolError},
    messages::{GameMessage, MessageKind, Payload, seat_index},
    observer::Notification,
};

/// Shown after the read loop gives up on a connection.
pub const CONNECTION_LOST: &str =
    "Your connection to the server has been lost. Use connect to reconnect.";

/// Effects of handling one message.
#[derive(Debug, Default, PartialEq)]
pub struct Dispatch {
    pub replies: Vec<GameMessage>,
    pub notifications: Vec<Notification>,
}

impl Dispatch {
    fn reply(&mut self, msg: GameMessage) {
        self.replies.push(msg);
    }

    fn notify(&mut self, notification: Notification) {
        self.notifications.push(notification);
    }

    fn status(&mut self, text: impl Into<String>) {
        self.notify(Notification::Status(text.into()));
    }
}

#[derive(Debug)]
pub struct Session {
    player_name: String,
    local_seat: Option<SeatIndex>,
    round: RoundState,
    /// Seated at a table, as opposed to merely having an open socket.
    joined: bool,
    /// All four seats were ready and a round was or is being dealt.
    started: bool,
}

impl Session {
    #[must_use]
    pub fn new(player_name: &str) -> Self {
        Self {
            player_name: player_name.to_string(),
            local_seat: None,
            round: RoundState::new(),
            joined: false,
            started: false,
        }
    }

    #[must_use]
    pub fn local_seat(&self) -> Option<SeatIndex> {
        self.local_seat
    }

    #[must_use]
    pub fn round(&self) -> &RoundState {
        &self.round
    }

    #[must_use]
    pub fn is_joined(&self) -> bool {
        self.joined
    }

    #[must_use]
    pub fn is_started(&self) -> bool {
        self.started
    }

    #[must_use]
    pub fn snapshot(&self) -> RoundSnapshot {
        self.round.snapshot(self.local_seat)
    }

    /// Applies one message from the dealer.
    ///
    /// # Errors
    ///
    /// Malformed messages yield a [`ProtocolError`] and messages naming a
    /// seat that doesn't exist a `SessionError`. Either way the session is
    /// left unchanged.
    pub fn handle(&mut self, msg: GameMessage) -> Result<Dispatch, NetError> {
        msg.validate()?;
        debug!("handling {msg}");
        let GameMessage {
            kind,
            origin,
            payload,
        } = msg;
        let seat = || seat_index(origin);
        match (kind, payload) {
            (MessageKind::PlayerList, Payload::Names(names)) => {
                Ok(self.on_player_list(seat()?, &names))
            }
            (MessageKind::Join, Payload::Text(name)) => Ok(self.on_join(seat()?, &name)),
            (MessageKind::Full, Payload::None) => Ok(self.on_full()),
            (MessageKind::Quit, Payload::None) => Ok(self.on_quit(seat()?)),
            (MessageKind::Ready, Payload::None) => Ok(self.on_ready(seat()?)),
            (MessageKind::Start, Payload::Deck(deck)) => Ok(self.on_start(&deck)),
            (MessageKind::Move, Payload::None) => Ok(self.on_move(seat()?, None)),
            (MessageKind::Move, Payload::Selection(indices)) => {
                Ok(self.on_move(seat()?, Some(&indices)))
            }
            (MessageKind::Msg, Payload::Text(text)) => {
                let mut dispatch = Dispatch::default();
                dispatch.notify(Notification::Chat(text));
                Ok(dispatch)
            }
            (kind, payload) => Err(ProtocolError::UnexpectedPayload {
                kind,
                payload: payload.describe(),
            }
            .into()),
        }
    }

    /// The socket was closed on purpose. The table is left as it was so the
    /// last round stays visible, but nothing is running anymore.
    pub fn disconnect(&mut self) {
        self.joined = false;
        self.started = false;
    }

    /// Same as [`Session::disconnect`], for a socket that broke.
    pub fn connection_lost(&mut self) -> Dispatch {
        self.disconnect();
        let mut dispatch = Dispatch::default();
        dispatch.status(CONNECTION_LOST);
        dispatch
    }

    fn on_player_list(&mut self, seat: SeatIndex, names: &[String]) -> Dispatch {
        self.local_seat = Some(seat);
        for (idx, name) in names.iter().enumerate() {
            self.round.set_name(idx, name);
        }
        let mut dispatch = Dispatch::default();
        dispatch.reply(GameMessage::join(GameMessage::UNASSIGNED, &self.player_name));
        dispatch.notify(Notification::RoundStateChanged(self.snapshot()));
        dispatch
    }

    fn on_join(&mut self, seat: SeatIndex, name: &str) -> Dispatch {
        let mut dispatch = Dispatch::default();
        if self.local_seat == Some(seat) {
            dispatch.reply(GameMessage::ready(GameMessage::UNASSIGNED));
        } else {
            dispatch.status(format!("{name} joins the game."));
        }
        self.round.set_name(seat, name);
        self.joined = true;
        self.started = false;
        self.highlight_local(&mut dispatch);
        dispatch.notify(Notification::RoundStateChanged(self.snapshot()));
        dispatch
    }

    fn on_full(&mut self) -> Dispatch {
        self.joined = false;
        let mut dispatch = Dispatch::default();
        dispatch.status("The game is full!");
        dispatch
    }

    fn on_quit(&mut self, seat: SeatIndex) -> Dispatch {
        let mut dispatch = Dispatch::default();
        dispatch.status(format!("Player {} has left the game", self.name_of(seat)));
        if self.started {
            dispatch.status("Waiting for others to join");
        }
        self.round.set_name(seat, "");
        self.round.reset();
        self.joined = false;
        self.started = false;
        dispatch.reply(GameMessage::ready(GameMessage::UNASSIGNED));
        dispatch.notify(Notification::RoundStateChanged(self.snapshot()));
        dispatch
    }

    fn on_ready(&mut self, seat: SeatIndex) -> Dispatch {
        let mut dispatch = Dispatch::default();
        if self.round.is_full() {
            self.started = true;
            self.joined = true;
            self.highlight_local(&mut dispatch);
        } else {
            self.started = false;
            dispatch.status(format!("{} is ready!", self.name_of(seat)));
        }
        dispatch
    }

    fn on_start(&mut self, deck: &Deck) -> Dispatch {
        self.round.start(deck);
        self.started = true;
        let mut dispatch = Dispatch::default();
        self.highlight_local(&mut dispatch);
        dispatch.status("All players are ready. Game starts.");
        self.announce_turn(&mut dispatch);
        dispatch.notify(Notification::RoundStateChanged(self.snapshot()));
        dispatch
    }

    fn on_move(&mut self, seat: SeatIndex, selection: Option<&[usize]>) -> Dispatch {
        let mut dispatch = Dispatch::default();
        match self.round.attempt_move(seat, selection) {
            Ok(MoveOutcome::Passed { .. }) => {
                dispatch.status("[pass]");
                self.announce_turn(&mut dispatch);
            }
            Ok(MoveOutcome::Played { hand, .. }) => {
                dispatch.status(hand.to_string());
                self.announce_turn(&mut dispatch);
            }
            Ok(MoveOutcome::Finished { hand, winner }) => {
                debug!("seat {winner} won the round");
                dispatch.status(hand.to_string());
                dispatch.status("Game has ended!");
                dispatch.notify(Notification::GameEnded(self.round.hand_counts()));
                self.started = false;
                dispatch.reply(GameMessage::ready(GameMessage::UNASSIGNED));
            }
            Err(reason) if self.local_seat == Some(seat) => {
                dispatch.notify(Notification::MoveRejected(reason));
                return dispatch;
            }
            Err(reason) => {
                debug!("seat {seat} made an illegal move: {reason}");
                return dispatch;
            }
        }
        dispatch.notify(Notification::RoundStateChanged(self.snapshot()));
        dispatch
    }

    fn announce_turn(&self, dispatch: &mut Dispatch) {
        let current = self.round.current_player();
        if self.local_seat == Some(current) {
            dispatch.status("Your turn:");
        } else {
            dispatch.status(format!("{}'s turn:", self.name_of(current)));
        }
    }

    fn highlight_local(&self, dispatch: &mut Dispatch) {
        if let Some(seat) = self.local_seat {
            dispatch.notify(Notification::ActivePlayerChanged(seat));
        }
    }

    fn name_of(&self, seat: SeatIndex) -> &str {
        self.round
            .player(seat)
            .map(|player| player.name.as_str())
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        game::{
            IllegalMove, Phase,
            entities::{Card, Rank, Suit},
        },
        net::errors::SessionError,
    };

    /// Seat 0 gets every diamond, seat 1 clubs, seat 2 hearts, seat 3 spades.
    fn suited_deck() -> Deck {
        let mut cards = Vec::with_capacity(52);
        for rank in Rank::ALL {
            for suit in Suit::ALL {
                cards.push(Card::new(suit, rank));
            }
        }
        Deck::try_from(cards).unwrap()
    }

    fn names() -> Vec<String> {
        vec!["alice".into(), "bob".into(), "carol".into(), String::new()]
    }

    fn statuses(dispatch: &Dispatch) -> Vec<&str> {
        dispatch
            .notifications
            .iter()
            .filter_map(|n| match n {
                Notification::Status(text) => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    /// Session seated at `seat` with all four seats named and a round dealt
    /// from [`suited_deck`].
    fn dealt(seat: i32) -> Session {
        let mut session = Session::new("dave");
        session.handle(GameMessage::player_list(seat, names())).unwrap();
        session.handle(GameMessage::join(3, "dave")).unwrap();
        session.handle(GameMessage::start(suited_deck())).unwrap();
        session
    }

    #[test]
    fn player_list_assigns_seat_and_replies_join() {
        let mut session = Session::new("dave");
        let dispatch = session.handle(GameMessage::player_list(3, names())).unwrap();
        assert_eq!(session.local_seat(), Some(3));
        assert_eq!(session.round().players()[1].name, "bob");
        assert_eq!(dispatch.replies, [GameMessage::join(-1, "dave")]);
        assert!(matches!(
            dispatch.notifications.as_slice(),
            [Notification::RoundStateChanged(_)]
        ));
    }

    #[test]
    fn own_join_replies_ready() {
        let mut session = Session::new("dave");
        session.handle(GameMessage::player_list(3, names())).unwrap();
        let dispatch = session.handle(GameMessage::join(3, "dave")).unwrap();
        assert_eq!(dispatch.replies, [GameMessage::ready(-1)]);
        assert!(statuses(&dispatch).is_empty());
        assert!(dispatch.notifications.contains(&Notification::ActivePlayerChanged(3)));
        assert!(session.is_joined());
        assert!(!session.is_started());
        assert!(session.round().is_full());
    }

    #[test]
    fn remote_join_announces() {
        let mut session = Session::new("dave");
        session.handle(GameMessage::player_list(0, names())).unwrap();
        let dispatch = session.handle(GameMessage::join(3, "erin")).unwrap();
        assert!(dispatch.replies.is_empty());
        assert_eq!(statuses(&dispatch), ["erin joins the game."]);
        assert_eq!(session.round().players()[3].name, "erin");
    }

    #[test]
    fn full_marks_not_joined() {
        let mut session = Session::new("dave");
        let dispatch = session.handle(GameMessage::full()).unwrap();
        assert!(!session.is_joined());
        assert_eq!(statuses(&dispatch), ["The game is full!"]);
    }

    #[test]
    fn ready_with_empty_seat_announces_player() {
        let mut session = Session::new("dave");
        session.handle(GameMessage::player_list(0, names())).unwrap();
        let dispatch = session.handle(GameMessage::ready(1)).unwrap();
        assert_eq!(statuses(&dispatch), ["bob is ready!"]);
        assert!(!session.is_started());
    }

    #[test]
    fn ready_with_full_table_starts() {
        let mut session = Session::new("dave");
        session.handle(GameMessage::player_list(3, names())).unwrap();
        session.handle(GameMessage::join(3, "dave")).unwrap();
        let dispatch = session.handle(GameMessage::ready(2)).unwrap();
        assert!(session.is_started());
        assert!(session.is_joined());
        assert_eq!(dispatch.notifications, [Notification::ActivePlayerChanged(3)]);
    }

    #[test]
    fn start_deals_and_announces_turn() {
        let session = dealt(0);
        assert_eq!(session.round().phase(), Phase::InProgress);
        assert_eq!(session.snapshot().viewer_cards.len(), 13);
        assert!(session.is_started());

        let mut session = Session::new("dave");
        session.handle(GameMessage::player_list(3, names())).unwrap();
        session.handle(GameMessage::join(3, "dave")).unwrap();
        let dispatch = session.handle(GameMessage::start(suited_deck())).unwrap();
        assert_eq!(
            statuses(&dispatch),
            ["All players are ready. Game starts.", "alice's turn:"]
        );
        assert_eq!(
            dispatch.notifications.first(),
            Some(&Notification::ActivePlayerChanged(3))
        );
    }

    #[test]
    fn moves_report_plays_and_passes() {
        let mut session = dealt(1);
        let dispatch = session
            .handle(GameMessage::make_move(0, Some(vec![0])))
            .unwrap();
        assert_eq!(statuses(&dispatch), ["Single [3♦]", "Your turn:"]);
        assert_eq!(session.round().table().len(), 1);

        let dispatch = session.handle(GameMessage::make_move(1, None)).unwrap();
        assert_eq!(statuses(&dispatch), ["[pass]", "carol's turn:"]);
    }

    #[test]
    fn local_rejection_is_reported() {
        let mut session = dealt(0);
        let dispatch = session.handle(GameMessage::make_move(0, None)).unwrap();
        assert_eq!(
            dispatch.notifications,
            [Notification::MoveRejected(IllegalMove::CannotPass)]
        );
        assert!(session.round().table().is_empty());
    }

    #[test]
    fn remote_rejection_is_silent() {
        let mut session = dealt(2);
        let dispatch = session.handle(GameMessage::make_move(1, Some(vec![0]))).unwrap();
        assert_eq!(dispatch, Dispatch::default());
    }

    #[test]
    fn winning_move_ends_game_and_readies() {
        let mut session = dealt(0);
        session.handle(GameMessage::make_move(0, Some(vec![0]))).unwrap();
        let mut last = Dispatch::default();
        for _ in 0..12 {
            for seat in 1..4 {
                session.handle(GameMessage::make_move(seat, None)).unwrap();
            }
            last = session.handle(GameMessage::make_move(0, Some(vec![0]))).unwrap();
        }
        assert_eq!(statuses(&last), ["Single [2♦]", "Game has ended!"]);
        assert!(last.notifications.contains(&Notification::GameEnded([0, 13, 13, 13])));
        assert_eq!(last.replies, [GameMessage::ready(-1)]);
        assert!(!session.is_started());
        assert!(session.round().end_of_game());
    }

    #[test]
    fn quit_resets_round_and_readies() {
        let mut session = dealt(0);
        let dispatch = session.handle(GameMessage::quit(2)).unwrap();
        assert_eq!(
            statuses(&dispatch),
            ["Player carol has left the game", "Waiting for others to join"]
        );
        assert_eq!(dispatch.replies, [GameMessage::ready(-1)]);
        assert_eq!(session.round().phase(), Phase::NotStarted);
        assert!(!session.round().players()[2].has_name());
        assert!(!session.is_started());
        assert!(!session.is_joined());
    }

    #[test]
    fn chat_is_forwarded() {
        let mut session = Session::new("dave");
        let dispatch = session.handle(GameMessage::chat(1, "bob: hi")).unwrap();
        assert_eq!(dispatch.notifications, [Notification::Chat("bob: hi".into())]);
        assert!(dispatch.replies.is_empty());
    }

    #[test]
    fn unknown_seat_is_rejected() {
        let mut session = Session::new("dave");
        assert!(matches!(
            session.handle(GameMessage::ready(7)),
            Err(NetError::Session(SessionError::UnknownSeat(7)))
        ));
        assert!(matches!(
            session.handle(GameMessage::join(-1, "x")),
            Err(NetError::Session(SessionError::UnknownSeat(-1)))
        ));
    }

    #[test]
    fn malformed_message_is_a_protocol_error() {
        let mut session = Session::new("dave");
        let msg = GameMessage::new(MessageKind::Start, -1, Payload::None);
        assert!(matches!(
            session.handle(msg),
            Err(NetError::Protocol(ProtocolError::UnexpectedPayload { .. }))
        ));
    }

    #[test]
    fn connection_lost_clears_flags() {
        let mut session = dealt(0);
        let dispatch = session.connection_lost();
        assert_eq!(statuses(&dispatch), [CONNECTION_LOST]);
        assert!(!session.is_started());
        assert!(!session.is_joined());
        assert_eq!(session.round().phase(), Phase::InProgress);
    }
}
