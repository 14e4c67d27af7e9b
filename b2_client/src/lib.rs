//! Internal modules for the Big Two client.
//!
//! This library provides command parsing and console rendering used by the
//! b2_client binary.

pub mod commands;
pub mod console;
