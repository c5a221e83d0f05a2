//! Client-side state containers
//!
//! `GameStore` owns the authoritative `GameState`; everything else (editors,
//! panels, presentation) works on snapshots of it.

mod game_store;
mod notice;
mod phase;
mod transcript;

pub use game_store::{ApplyOutcome, GameStore, RequestTicket};
pub use notice::{Notice, NoticeBoard, NoticeKind};
pub use phase::InteractionPhase;
pub use transcript::Transcript;
