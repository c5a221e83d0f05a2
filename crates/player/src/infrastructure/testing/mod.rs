//! Test doubles and fixtures shared by unit and integration tests

pub mod fixtures;
pub mod scripted_api;

pub use scripted_api::{RecordedCall, ScriptedApi};
