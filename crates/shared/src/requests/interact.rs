//! `/api/interact` request bodies

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Player verb. The backend names them with a leading dash.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ActionKind {
    Speak,
    Stay,
    /// A verb this client does not model; kept verbatim.
    Other(String),
}

impl ActionKind {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Speak => "-speak",
            Self::Stay => "-stay",
            Self::Other(raw) => raw,
        }
    }

    pub fn is_speak(&self) -> bool {
        matches!(self, Self::Speak)
    }
}

impl From<&str> for ActionKind {
    fn from(raw: &str) -> Self {
        match raw {
            "-speak" => Self::Speak,
            "-stay" => Self::Stay,
            other => Self::Other(other.to_string()),
        }
    }
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for ActionKind {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for ActionKind {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(Self::from(raw.as_str()))
    }
}

/// One-shot scene navigation commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Navigation {
    Next,
    Back,
    Withdraw,
}

impl Navigation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Next => "next",
            Self::Back => "back",
            Self::Withdraw => "withdraw",
        }
    }
}

/// Body of `POST /api/interact`.
///
/// The backend branches on which key is present (`type` or `interact`), so
/// the two shapes are untagged on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum InteractRequest {
    Act {
        #[serde(rename = "type")]
        kind: ActionKind,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        message: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        object: Option<String>,
    },
    Navigate {
        interact: Navigation,
    },
}

impl InteractRequest {
    pub fn speak(message: impl Into<String>, object: Option<String>) -> Self {
        Self::Act {
            kind: ActionKind::Speak,
            message: Some(message.into()),
            object,
        }
    }

    pub fn stay() -> Self {
        Self::Act {
            kind: ActionKind::Stay,
            message: None,
            object: None,
        }
    }

    pub fn navigate(interact: Navigation) -> Self {
        Self::Navigate { interact }
    }
}
