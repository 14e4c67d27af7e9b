use std::fmt;

/// A line typed at the console.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Play the cards at these positions of the local hand.
    Play(Vec<usize>),
    Pass,
    Chat(String),
    /// Show the local hand.
    Hand,
    /// Show the table and the seats.
    Table,
    Connect,
    Quit,
    Help,
}

/// Errors that can occur during command parsing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// Play command without card indices.
    PlayMissingCards,
    /// Card index that isn't a number.
    InvalidCardIndex(String),
    /// Chat command without text.
    EmptyChat,
    /// Unrecognized command.
    UnrecognizedCommand(String),
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PlayMissingCards => {
                write!(f, "Play requires card positions (e.g., 'play 0 1')")
            }
            Self::InvalidCardIndex(value) => write!(
                f,
                "Invalid card position '{}'. Use the numbers shown by 'hand'",
                value
            ),
            Self::EmptyChat => write!(f, "Nothing to say (e.g., 'say good luck')"),
            Self::UnrecognizedCommand(cmd) => write!(
                f,
                "Unrecognized command '{}'. Type 'help' to see available commands",
                cmd
            ),
        }
    }
}

impl std::error::Error for ParseError {}

pub const HELP: &str = "\
Commands:
  play <i> [<j> ...]   Play the cards at these positions of your hand
  pass                 Pass the turn
  say <text>           Chat with the table (also: chat)
  hand                 Show your hand with positions
  table                Show the seats and the last hands played
  connect              Connect to the dealer
  quit                 Leave the table
  help                 Show this help";

/// Parse a command string into a [`Command`].
///
/// # Examples
///
/// ```
/// use b2_client::commands::{Command, parse_command};
///
/// assert_eq!(parse_command("pass"), Ok(Command::Pass));
/// assert_eq!(parse_command("play 0 3"), Ok(Command::Play(vec![0, 3])));
/// assert_eq!(parse_command("say hi all"), Ok(Command::Chat("hi all".into())));
/// ```
pub fn parse_command(input: &str) -> Result<Command, ParseError> {
    let trimmed = input.trim();

    // Try single-word commands first
    match trimmed {
        "pass" => return Ok(Command::Pass),
        "hand" => return Ok(Command::Hand),
        "table" => return Ok(Command::Table),
        "connect" => return Ok(Command::Connect),
        "quit" => return Ok(Command::Quit),
        "help" => return Ok(Command::Help),
        _ => {}
    }

    // Parse multi-word commands
    let (head, rest) = trimmed
        .split_once(char::is_whitespace)
        .unwrap_or((trimmed, ""));
    match head {
        "play" => parse_play_command(rest),
        "say" | "chat" => parse_chat_command(rest),
        _ => Err(ParseError::UnrecognizedCommand(trimmed.to_string())),
    }
}

/// Parse the arguments of "play <i> [<j> ...]"
fn parse_play_command(args: &str) -> Result<Command, ParseError> {
    let indices = args
        .split_ascii_whitespace()
        .map(|value| {
            value
                .parse::<usize>()
                .map_err(|_| ParseError::InvalidCardIndex(value.to_string()))
        })
        .collect::<Result<Vec<_>, _>>()?;
    if indices.is_empty() {
        return Err(ParseError::PlayMissingCards);
    }
    Ok(Command::Play(indices))
}

/// Parse the argument of "say <text>", keeping inner spacing
fn parse_chat_command(args: &str) -> Result<Command, ParseError> {
    let text = args.trim();
    if text.is_empty() {
        return Err(ParseError::EmptyChat);
    }
    Ok(Command::Chat(text.to_string()))
}
