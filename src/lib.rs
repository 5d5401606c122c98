//! Library crate for the scoreboard back end, exposing modules for the console binary and tests.

/// Teams, admin table and directories loaded at startup.
pub mod config;
/// JSON-lines console host.
pub mod console;
/// Persistence layer.
pub mod dao;
/// Views and requests exchanged with the console.
pub mod dto;
/// Service-level error type.
pub mod error;
/// Operations on the board and the session.
pub mod services;
/// Domain model and shared application state.
pub mod state;
