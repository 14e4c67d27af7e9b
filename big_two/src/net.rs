//! Networking layer for talking to a dealer.
//!
//! This module provides a blocking TCP client with a length-prefixed binary
//! protocol using bincode serialization. A reader thread per connection
//! feeds a [`session::Session`], which owns the round.

/// TCP client for connecting to a dealer.
pub mod client;

/// Client configuration from the environment.
pub mod config;

/// Error types for the networking layer.
pub mod errors;

/// Message types for the dealer protocol.
pub mod messages;

/// Presentation callbacks.
pub mod observer;

/// Message dispatch into the round.
pub mod session;

/// Utilities for binary message serialization and framing.
pub mod utils;
