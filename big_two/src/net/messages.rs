use serde::{Deserialize, Serialize};
use std::fmt;

use super::{
    super::game::{
        constants::NUM_PLAYERS,
        entities::{Deck, SeatIndex},
    },
    errors::{ProtocolError, SessionError},
};

/// Message types exchanged with the dealer. Discriminants are the type
/// codes used on the wire.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
#[repr(u8)]
pub enum MessageKind {
    /// Seat assignment plus the names already at the table.
    PlayerList = 0,
    /// A player took a seat.
    Join = 1,
    /// The table has no free seat.
    Full = 2,
    /// A player left.
    Quit = 3,
    /// A player is ready for the next round.
    Ready = 4,
    /// The dealt deck for a new round.
    Start = 5,
    /// A play or a pass.
    Move = 6,
    /// Chat text.
    Msg = 7,
}

impl fmt::Display for MessageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let repr = match self {
            Self::PlayerList => "PLAYER_LIST",
            Self::Join => "JOIN",
            Self::Full => "FULL",
            Self::Quit => "QUIT",
            Self::Ready => "READY",
            Self::Start => "START",
            Self::Move => "MOVE",
            Self::Msg => "MSG",
        };
        write!(f, "{repr}")
    }
}

/// Message body. Which shape is allowed depends on the [`MessageKind`].
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub enum Payload {
    None,
    Text(String),
    Names(Vec<String>),
    Selection(Vec<usize>),
    Deck(Deck),
}

impl Payload {
    pub(crate) fn describe(&self) -> &'static str {
        match self {
            Self::None => "no payload",
            Self::Text(_) => "text",
            Self::Names(_) => "a name list",
            Self::Selection(_) => "a card selection",
            Self::Deck(_) => "a deck",
        }
    }
}

/// Converts a wire origin into a seat at the table.
pub fn seat_index(origin: i32) -> Result<SeatIndex, SessionError> {
    usize::try_from(origin)
        .ok()
        .filter(|seat| *seat < NUM_PLAYERS)
        .ok_or(SessionError::UnknownSeat(origin))
}

/// A single framed message.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct GameMessage {
    pub kind: MessageKind,
    /// Seat the message concerns. Messages sent by a client carry
    /// [`GameMessage::UNASSIGNED`] and the dealer stamps the sender's seat.
    pub origin: i32,
    pub payload: Payload,
}

impl GameMessage {
    pub const UNASSIGNED: i32 = -1;

    #[must_use]
    pub fn new(kind: MessageKind, origin: i32, payload: Payload) -> Self {
        Self {
            kind,
            origin,
            payload,
        }
    }

    #[must_use]
    pub fn player_list(seat: i32, names: Vec<String>) -> Self {
        Self::new(MessageKind::PlayerList, seat, Payload::Names(names))
    }

    #[must_use]
    pub fn join(origin: i32, name: &str) -> Self {
        Self::new(MessageKind::Join, origin, Payload::Text(name.to_string()))
    }

    #[must_use]
    pub fn full() -> Self {
        Self::new(MessageKind::Full, Self::UNASSIGNED, Payload::None)
    }

    #[must_use]
    pub fn quit(origin: i32) -> Self {
        Self::new(MessageKind::Quit, origin, Payload::None)
    }

    #[must_use]
    pub fn ready(origin: i32) -> Self {
        Self::new(MessageKind::Ready, origin, Payload::None)
    }

    #[must_use]
    pub fn start(deck: Deck) -> Self {
        Self::new(MessageKind::Start, Self::UNASSIGNED, Payload::Deck(deck))
    }

    /// A move. `None` passes.
    #[must_use]
    pub fn make_move(origin: i32, selection: Option<Vec<usize>>) -> Self {
        let payload = selection.map_or(Payload::None, Payload::Selection);
        Self::new(MessageKind::Move, origin, payload)
    }

    #[must_use]
    pub fn chat(origin: i32, text: &str) -> Self {
        Self::new(MessageKind::Msg, origin, Payload::Text(text.to_string()))
    }

    /// The origin as a seat index.
    pub fn seat(&self) -> Result<SeatIndex, SessionError> {
        seat_index(self.origin)
    }

    /// Checks that the payload has the shape the message type calls for.
    pub fn validate(&self) -> Result<(), ProtocolError> {
        let fits = match (self.kind, &self.payload) {
            (MessageKind::PlayerList, Payload::Names(names)) => {
                if names.len() != NUM_PLAYERS {
                    return Err(ProtocolError::WrongSeatCount(names.len()));
                }
                true
            }
            (MessageKind::Join | MessageKind::Msg, Payload::Text(_)) => true,
            (MessageKind::Full | MessageKind::Quit | MessageKind::Ready, Payload::None) => true,
            (MessageKind::Start, Payload::Deck(_)) => true,
            (MessageKind::Move, Payload::None | Payload::Selection(_)) => true,
            _ => false,
        };
        if fits {
            Ok(())
        } else {
            Err(ProtocolError::UnexpectedPayload {
                kind: self.kind,
                payload: self.payload.describe(),
            })
        }
    }
}

impl fmt::Display for GameMessage {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} from {} with {}", self.kind, self.origin, self.payload.describe())
    }
}
