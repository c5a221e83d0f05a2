//! Presentation - plain-text projections of client state
//!
//! Pure functions from domain and wire values to display models. No styling.

mod message;
mod panels;
mod scene_view;
mod script_overview;

pub use message::render_message;
pub use panels::{render_character_info, render_system_feedback, render_world_records};
pub use scene_view::SceneView;
pub use script_overview::{OverviewScene, ScriptOverview};
