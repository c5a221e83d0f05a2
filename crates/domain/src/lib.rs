//! Open Theatre domain model.
//!
//! Plain, JSON-shaped records mirroring what the theatre backend sends back
//! (`GameState`, `Script`, `Scene`, `Character`) plus the client-only
//! transcript `Message`. Nothing in here performs I/O.

pub mod entities;
pub mod error;
pub mod ids;
pub mod value_objects;

pub use entities::{
    Background, Character, ChainEntryStatus, GameState, Message, MessageKind, Scene, Script,
};

pub use error::DomainError;

pub use ids::{MessageId, SceneKey, DEFAULT_PLAYER_NAME, NEW_SCRIPT_ID};

pub use value_objects::{
    addressee_prefix, parse_mentions, ChainMark, ChainProgress, Mentions, SceneMode,
};
