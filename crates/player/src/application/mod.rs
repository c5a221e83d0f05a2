//! Application layer - typed transport, services, editors and the client facade

pub mod api;
pub mod client;
pub mod editors;
pub mod error;
pub mod services;

pub use api::{ApiResponse, TheatreApi};
pub use client::TheatreClient;
pub use error::{ParseResponse, ServiceError};
