//! Outbound payload validation errors

use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ProtocolError {
    #[error("{0} must not be empty")]
    EmptyField(&'static str),

    #[error("Duplicate character: {0}")]
    DuplicateCharacter(String),

    #[error("Scene keys must run scene1..scene{expected_len}, found {found}")]
    SceneKeyGap { expected_len: usize, found: String },

    #[error("Empty plot chain entry in {scene}")]
    EmptyChainEntry { scene: String },

    #[error("Stream in {scene} references unknown chain entry '{entry}'")]
    OrphanStream { scene: String, entry: String },

    #[error("Unknown example script: {0}")]
    UnknownExample(String),

    #[error("Unknown model provider: {0}")]
    UnknownProvider(String),

    #[error("Unknown model setting: {0}")]
    UnknownSetting(String),

    #[error("Payload did not survive serialization intact")]
    Truncated,

    #[error("Serialization failed: {0}")]
    Serialize(String),
}

impl From<serde_json::Error> for ProtocolError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialize(err.to_string())
    }
}
