//! Application services
//!
//! Use cases of the theatre client. Services depend on the typed
//! [`TheatreApi`](crate::application::api::TheatreApi) and the state
//! containers, never on a concrete transport.

pub mod asset_service;
pub mod info_service;
pub mod interaction_service;
pub mod script_service;
pub mod settings_service;

pub use asset_service::AssetService;
pub use info_service::{export_file_name, InfoService, PanelCache};
pub use interaction_service::{InteractionOutcome, InteractionService};
pub use script_service::{Installed, ScriptService};
pub use settings_service::SettingsService;
