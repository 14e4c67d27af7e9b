//! Integration test: 4 clients sit at a relay dealer and play the opening
//! of a round.
//!
//! The dealer here only does what a real one does on the wire: hands out
//! seats, stamps the sender's seat on every message and relays it to the
//! whole table.

use b2_client::commands::{Command, parse_command};
use big_two::{
    Client, ClientConfig, GameObserver, Notification,
    constants::NUM_PLAYERS,
    entities::{Card, Deck, Rank, Suit},
    messages::{GameMessage, MessageKind, Payload},
    utils::{read_prefixed, write_prefixed},
};
use std::{
    net::{TcpListener, TcpStream},
    sync::{
        Arc, Mutex,
        mpsc::{self, Receiver, Sender},
    },
    thread,
    time::Duration,
};

const WAIT: Duration = Duration::from_secs(5);

/// Generate unique player name for tests
fn unique_name(prefix: &str) -> String {
    let rand_id: u32 = rand::random();
    format!("{}_{}", prefix, rand_id % 100000)
}

struct StatusRecorder {
    tx: Mutex<Sender<Notification>>,
}

impl GameObserver for StatusRecorder {
    fn on_status_message(&self, text: &str) {
        let _ = self
            .tx
            .lock()
            .unwrap()
            .send(Notification::Status(text.to_string()));
    }

    fn on_chat_message(&self, text: &str) {
        let _ = self
            .tx
            .lock()
            .unwrap()
            .send(Notification::Chat(text.to_string()));
    }
}

fn wait_for(rx: &Receiver<Notification>, expected: &Notification) {
    loop {
        let notification = rx.recv_timeout(WAIT).unwrap();
        if &notification == expected {
            return;
        }
    }
}

fn status(text: &str) -> Notification {
    Notification::Status(text.to_string())
}

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

/// Accepts four players and relays their messages until the test ends.
fn spawn_dealer(listener: TcpListener) {
    thread::spawn(move || {
        let (tx, rx) = mpsc::channel::<(usize, GameMessage)>();
        let mut writers: Vec<TcpStream> = Vec::with_capacity(NUM_PLAYERS);
        for seat in 0..NUM_PLAYERS {
            let (stream, _) = listener.accept().unwrap();
            let mut reader = stream.try_clone().unwrap();
            let tx = tx.clone();
            thread::spawn(move || {
                while let Ok(msg) = read_prefixed::<GameMessage, TcpStream>(&mut reader) {
                    if tx.send((seat, msg)).is_err() {
                        return;
                    }
                }
            });
            writers.push(stream);
            let names = vec![String::new(); NUM_PLAYERS];
            write_prefixed(&mut writers[seat], &GameMessage::player_list(seat as i32, names))
                .unwrap();
        }

        let mut names = vec![String::new(); NUM_PLAYERS];
        let mut ready = [false; NUM_PLAYERS];
        let broadcast = |writers: &mut Vec<TcpStream>, msg: &GameMessage| {
            for writer in writers.iter_mut() {
                let _ = write_prefixed(writer, msg);
            }
        };
        for (seat, msg) in rx {
            let origin = seat as i32;
            match (msg.kind, msg.payload) {
                (MessageKind::Join, Payload::Text(name)) => {
                    names[seat] = name.clone();
                    broadcast(&mut writers, &GameMessage::join(origin, &name));
                }
                (MessageKind::Ready, _) => {
                    ready[seat] = true;
                    broadcast(&mut writers, &GameMessage::ready(origin));
                    if ready.iter().all(|r| *r) {
                        ready = [false; NUM_PLAYERS];
                        broadcast(&mut writers, &GameMessage::start(suited_deck()));
                    }
                }
                (MessageKind::Move, Payload::Selection(indices)) => {
                    broadcast(&mut writers, &GameMessage::make_move(origin, Some(indices)));
                }
                (MessageKind::Move, _) => {
                    broadcast(&mut writers, &GameMessage::make_move(origin, None));
                }
                (MessageKind::Msg, Payload::Text(text)) => {
                    let line = format!("{}: {}", names[seat], text);
                    broadcast(&mut writers, &GameMessage::chat(origin, &line));
                }
                _ => {}
            }
        }
    });
}

/// Runs a typed console line against a client, as the binary does.
fn type_line(client: &Client, line: &str) {
    match parse_command(line).unwrap() {
        Command::Play(indices) => client.make_move(Some(indices)).unwrap(),
        Command::Pass => client.make_move(None).unwrap(),
        Command::Chat(text) => client.send_chat(&text).unwrap(),
        other => panic!("not a table command: {other:?}"),
    }
}

#[test]
fn four_clients_play_the_opening() {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let server = listener.local_addr().unwrap();
    spawn_dealer(listener);

    let mut players = Vec::with_capacity(NUM_PLAYERS);
    let mut names = Vec::with_capacity(NUM_PLAYERS);
    for prefix in ["alice", "bob", "carol", "dave"] {
        let name = unique_name(prefix);
        let (tx, rx) = mpsc::channel();
        let config = ClientConfig {
            server,
            player_name: name.clone(),
            connect_timeout: Duration::from_secs(1),
        };
        config.validate().unwrap();
        let client = Client::new(config, Arc::new(StatusRecorder { tx: Mutex::new(tx) }));
        // Connect one at a time so seats follow the connection order.
        client.connect().unwrap();
        while client.local_seat().is_none() {
            thread::sleep(Duration::from_millis(10));
        }
        players.push((client, rx));
        names.push(name);
    }

    for (seat, (client, rx)) in players.iter().enumerate() {
        wait_for(rx, &status("All players are ready. Game starts."));
        assert_eq!(client.local_seat(), Some(seat));
        assert!(client.is_started());
    }
    wait_for(&players[0].1, &status("Your turn:"));

    type_line(&players[0].0, "play 0");
    for (_, rx) in &players {
        wait_for(rx, &status("Single [3♦]"));
    }
    type_line(&players[1].0, "play 0");
    for (_, rx) in &players {
        wait_for(rx, &status("Single [3♣]"));
    }
    type_line(&players[2].0, "pass");
    for (_, rx) in &players {
        wait_for(rx, &status("[pass]"));
    }

    // Every client applied the same moves in the same order.
    let tables: Vec<_> = players.iter().map(|(c, _)| c.snapshot()).collect();
    for snapshot in &tables {
        assert_eq!(snapshot.table, tables[0].table);
        assert_eq!(snapshot.current_player, 3);
        let counts: Vec<_> = snapshot.players.iter().map(|p| p.num_cards).collect();
        assert_eq!(counts, [12, 12, 13, 13]);
    }

    type_line(&players[3].0, "say good luck");
    let line = format!("{}: good luck", names[3]);
    for (_, rx) in &players {
        wait_for(rx, &Notification::Chat(line.clone()));
    }

    for (client, _) in &players {
        client.quit().unwrap();
    }
}
