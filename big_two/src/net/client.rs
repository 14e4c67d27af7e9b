//! A blocking TCP client for a Big Two table.
//!
//! Each connection gets a dedicated reader thread that decodes frames and
//! feeds them into the [`Session`]. The session sits behind one mutex, so
//! at most one message mutates the round at a time. Replies are written
//! after that lock is released and observer callbacks run last, with no
//! lock held, so an observer may call straight back into the client.

use std::{
    net::{Shutdown, SocketAddr, TcpStream},
    sync::{Arc, Mutex, MutexGuard, PoisonError},
    thread,
};

use crate::game::{RoundSnapshot, entities::SeatIndex};

use super::{
    config::ClientConfig,
    errors::{ConnectionError, NetError},
    messages::GameMessage,
    observer::{GameObserver, Notification},
    session::{Dispatch, Session},
    utils,
};

/// Where the client is in its connection lifecycle.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ConnectionState {
    Disconnected,
    Connecting,
    Connected,
}

#[derive(Debug)]
struct Link {
    state: ConnectionState,
    /// Bumped on every `connect`. A reader thread only tears down the
    /// connection it was started for.
    epoch: u64,
}

struct Inner {
    config: ClientConfig,
    session: Mutex<Session>,
    writer: Mutex<Option<TcpStream>>,
    link: Mutex<Link>,
    observer: Arc<dyn GameObserver>,
}

/// Handle to a client. Clones share the same connection and session.
#[derive(Clone)]
pub struct Client {
    inner: Arc<Inner>,
}

impl Client {
    #[must_use]
    pub fn new(config: ClientConfig, observer: Arc<dyn GameObserver>) -> Self {
        let session = Session::new(&config.player_name);
        Self {
            inner: Arc::new(Inner {
                config,
                session: Mutex::new(session),
                writer: Mutex::new(None),
                link: Mutex::new(Link {
                    state: ConnectionState::Disconnected,
                    epoch: 0,
                }),
                observer,
            }),
        }
    }

    #[must_use]
    pub fn server(&self) -> SocketAddr {
        self.inner.config.server
    }

    #[must_use]
    pub fn state(&self) -> ConnectionState {
        lock(&self.inner.link).state
    }

    #[must_use]
    pub fn local_seat(&self) -> Option<SeatIndex> {
        lock(&self.inner.session).local_seat()
    }

    /// Whether the table has four ready players.
    #[must_use]
    pub fn is_started(&self) -> bool {
        lock(&self.inner.session).is_started()
    }

    /// A copy of the round from the local seat.
    #[must_use]
    pub fn snapshot(&self) -> RoundSnapshot {
        lock(&self.inner.session).snapshot()
    }

    /// Opens the connection to the configured dealer and starts the reader
    /// thread. The dealer speaks first, so nothing is sent here.
    ///
    /// # Errors
    ///
    /// Returns [`ConnectionError::AlreadyConnected`] unless disconnected, or
    /// the I/O error that stopped the connection from being established.
    pub fn connect(&self) -> Result<(), NetError> {
        let epoch = {
            let mut link = lock(&self.inner.link);
            if link.state != ConnectionState::Disconnected {
                drop(link);
                self.notify(&Notification::Status("You are already connected!".to_string()));
                return Err(ConnectionError::AlreadyConnected.into());
            }
            link.state = ConnectionState::Connecting;
            link.epoch += 1;
            link.epoch
        };

        let server = self.server();
        log::info!("Connecting to {server}");
        match self.open(epoch) {
            Ok(()) => {
                log::info!("Connected to {server}");
                Ok(())
            }
            Err(error) => {
                log::warn!("Couldn't connect to {server}: {error}");
                let mut link = lock(&self.inner.link);
                if link.epoch == epoch {
                    link.state = ConnectionState::Disconnected;
                }
                Err(error)
            }
        }
    }

    fn open(&self, epoch: u64) -> Result<(), NetError> {
        let stream = TcpStream::connect_timeout(&self.server(), self.inner.config.connect_timeout)?;
        stream.set_nodelay(true)?;
        let reader = stream.try_clone()?;
        {
            // A quit or a newer connect while this one was in flight wins.
            let mut link = lock(&self.inner.link);
            if link.epoch != epoch || link.state != ConnectionState::Connecting {
                let _ = stream.shutdown(Shutdown::Both);
                return Err(ConnectionError::NotConnected.into());
            }
            *lock(&self.inner.writer) = Some(stream);
            link.state = ConnectionState::Connected;
        }

        let client = self.clone();
        thread::Builder::new()
            .name(format!("big-two-reader-{epoch}"))
            .spawn(move || client.read_loop(reader, epoch))?;
        Ok(())
    }

    /// Closes the connection. The dealer sees the socket close and tells the
    /// rest of the table.
    ///
    /// # Errors
    ///
    /// Returns [`ConnectionError::NotConnected`] if there's no connection.
    pub fn quit(&self) -> Result<(), NetError> {
        {
            let mut link = lock(&self.inner.link);
            if link.state == ConnectionState::Disconnected {
                return Err(ConnectionError::NotConnected.into());
            }
            link.state = ConnectionState::Disconnected;
        }
        self.close_writer();
        lock(&self.inner.session).disconnect();
        log::info!("Disconnected from {}", self.server());
        self.notify(&Notification::Status("Disconnected.".to_string()));
        Ok(())
    }

    /// Sends a move for the local seat. `None` passes. The dealer echoes it
    /// back to every seat and the move only takes effect then.
    ///
    /// # Errors
    ///
    /// Returns an error if the message cannot be sent to the server.
    pub fn make_move(&self, selection: Option<Vec<usize>>) -> Result<(), NetError> {
        self.send(&GameMessage::make_move(GameMessage::UNASSIGNED, selection))
    }

    /// Sends a chat line to the table.
    ///
    /// # Errors
    ///
    /// Returns an error if the message cannot be sent to the server.
    pub fn send_chat(&self, text: &str) -> Result<(), NetError> {
        self.send(&GameMessage::chat(GameMessage::UNASSIGNED, text))
    }

    fn send(&self, msg: &GameMessage) -> Result<(), NetError> {
        let mut writer = lock(&self.inner.writer);
        match writer.as_mut() {
            Some(stream) => utils::write_prefixed(stream, msg),
            None => Err(ConnectionError::NotConnected.into()),
        }
    }

    fn read_loop(&self, mut reader: TcpStream, epoch: u64) {
        loop {
            match utils::read_prefixed::<GameMessage, TcpStream>(&mut reader) {
                Ok(msg) => self.dispatch(msg),
                Err(NetError::Protocol(error)) => log::warn!("Dropping message: {error}"),
                Err(error) => {
                    log::info!("Connection to {} closed: {error}", self.server());
                    self.connection_lost(epoch);
                    return;
                }
            }
        }
    }

    fn dispatch(&self, msg: GameMessage) {
        // The guard is dropped at the end of this statement.
        let handled = lock(&self.inner.session).handle(msg);
        match handled {
            Ok(Dispatch {
                replies,
                notifications,
            }) => {
                for reply in &replies {
                    if let Err(error) = self.send(reply) {
                        log::warn!("Couldn't send {reply}: {error}");
                    }
                }
                for notification in &notifications {
                    self.notify(notification);
                }
            }
            Err(NetError::Session(error)) => log::warn!("Ignoring message: {error}"),
            Err(error) => log::warn!("Dropping message: {error}"),
        }
    }

    fn connection_lost(&self, epoch: u64) {
        {
            let mut link = lock(&self.inner.link);
            if link.epoch != epoch || link.state == ConnectionState::Disconnected {
                return;
            }
            link.state = ConnectionState::Disconnected;
        }
        self.close_writer();
        let dispatch = lock(&self.inner.session).connection_lost();
        for notification in &dispatch.notifications {
            self.notify(notification);
        }
    }

    fn close_writer(&self) {
        if let Some(stream) = lock(&self.inner.writer).take() {
            // Also unblocks the reader thread.
            let _ = stream.shutdown(Shutdown::Both);
        }
    }

    fn notify(&self, notification: &Notification) {
        notification.deliver(self.inner.observer.as_ref());
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
