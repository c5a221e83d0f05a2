//! Open Theatre Player
//!
//! Client-side game-state synchronization for the theatre backend: a typed
//! transport, the single-owner game store, the interaction controller, draft
//! editors and a plain-text front end.

pub mod application;
pub mod command;
pub mod config;
pub mod infrastructure;
pub mod ports;
pub mod presentation;
pub mod runner;
pub mod state;

pub use application::{ServiceError, TheatreClient};
pub use config::ClientConfig;
