//! Narrative-orchestration architecture selector for a scene.
//!
//! The backend picks its director/character loop from this value; the client
//! only displays it and round-trips it through the script editors.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::DomainError;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum SceneMode {
    #[default]
    V1,
    V2,
    V2Plus,
    V2Prime,
    V3,
    /// A mode this client does not know about yet; kept verbatim.
    Other(String),
}

impl SceneMode {
    /// Modes the editors offer.
    pub const ALL: [SceneMode; 5] = [
        SceneMode::V1,
        SceneMode::V2,
        SceneMode::V2Plus,
        SceneMode::V2Prime,
        SceneMode::V3,
    ];

    pub fn as_str(&self) -> &str {
        match self {
            Self::V1 => "v1",
            Self::V2 => "v2",
            Self::V2Plus => "v2_plus",
            Self::V2Prime => "v2_prime",
            Self::V3 => "v3",
            Self::Other(raw) => raw,
        }
    }

    /// Any wire value, known or not.
    pub fn from_wire(raw: &str) -> Self {
        Self::ALL
            .into_iter()
            .find(|mode| mode.as_str() == raw)
            .unwrap_or_else(|| Self::Other(raw.to_string()))
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, Self::Other(_))
    }
}

impl fmt::Display for SceneMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Strict parse for user input: only the modes the editors offer.
impl FromStr for SceneMode {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Some(Self::from_wire(s.trim()))
            .filter(SceneMode::is_known)
            .ok_or_else(|| DomainError::parse(format!("Unknown scene mode: {}", s)))
    }
}

impl Serialize for SceneMode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for SceneMode {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(Self::from_wire(&raw))
    }
}
