//! Value objects - Immutable objects defined by their attributes

mod mentions;
mod plot_chain;
mod scene_mode;

pub use mentions::{addressee_prefix, parse_mentions, Mentions};
pub use plot_chain::{ChainMark, ChainProgress};
pub use scene_mode::SceneMode;
