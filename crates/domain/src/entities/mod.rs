//! Domain entities - Records the backend owns and the client mirrors

mod character;
mod game_state;
mod message;
mod scene;
mod script;

pub use character::Character;
pub use game_state::{ChainEntryStatus, GameState};
pub use message::{Message, MessageKind};
pub use scene::Scene;
pub use script::{Background, Script};
