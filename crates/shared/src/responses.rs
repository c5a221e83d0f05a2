//! Response bodies for the `/api/*` endpoints
//!
//! The backend is loosely typed: optional keys go missing, lists arrive as
//! `null`, addressees come as a list or a bare string. Everything here is
//! tolerant on the way in and strict about what it hands to callers.

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use theatre_domain::{ChainProgress, GameState, Script};

use crate::requests::ActionKind;

/// Application-level failure reported inside a 2xx body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

impl ErrorBody {
    /// The `error` field of a JSON object, if the backend set one. Falsy
    /// values (`null`, `""`, `false`) count as no error.
    pub fn extract(body: &Value) -> Option<String> {
        match body.get("error")? {
            Value::Null | Value::Bool(false) => None,
            Value::String(message) if message.is_empty() => None,
            Value::String(message) => Some(message.clone()),
            other => Some(other.to_string()),
        }
    }
}

/// Treats `null` like a missing key.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Addressee list of an action. Accepts a list, a single name, or nothing.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(transparent)]
pub struct Addressees(Vec<String>);

impl Addressees {
    pub fn new(names: Vec<String>) -> Self {
        Self(names)
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    pub fn into_vec(self) -> Vec<String> {
        self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<'de> Deserialize<'de> for Addressees {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            One(String),
            Many(Vec<Option<String>>),
        }

        let names = match Option::<Raw>::deserialize(deserializer)? {
            None => Vec::new(),
            Some(Raw::One(name)) => vec![name],
            Some(Raw::Many(names)) => names.into_iter().flatten().collect(),
        };
        Ok(Self(
            names
                .into_iter()
                .filter(|name| !name.trim().is_empty())
                .collect(),
        ))
    }
}

/// One entry of `action` (or the echoed `input`) in an interact response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionEntry {
    pub x: ActionKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aid: Option<String>,
    #[serde(default)]
    pub bid: Addressees,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
}

/// Response of `POST /api/interact` for player actions.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct InteractResponse {
    #[serde(default, deserialize_with = "null_as_default")]
    pub done: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<GameState>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub action: Vec<ActionEntry>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub input: Option<ActionEntry>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cnt: Option<i64>,
}

/// Response of `POST /api/interact` for `next`, `back` and `withdraw`.
///
/// `next` and `back` answer with the bare state; `withdraw` wraps it together
/// with the number of transcript entries to drop.
#[derive(Debug, Clone, PartialEq)]
pub enum NavigationResponse {
    Wrapped {
        state: Option<GameState>,
        cnt: Option<i64>,
    },
    Bare(GameState),
}

impl NavigationResponse {
    /// The state to install (if any) and the withdraw count, never negative.
    pub fn into_parts(self) -> (Option<GameState>, Option<u32>) {
        match self {
            Self::Wrapped { state, cnt } => {
                let cnt = cnt.map(|n| u32::try_from(n.max(0)).unwrap_or(u32::MAX));
                (state, cnt)
            }
            Self::Bare(state) => (Some(state), None),
        }
    }
}

impl<'de> Deserialize<'de> for NavigationResponse {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        struct Wrapped {
            #[serde(default)]
            state: Option<GameState>,
            #[serde(default)]
            cnt: Option<i64>,
        }

        let raw = Value::deserialize(deserializer)?;
        let is_wrapped = raw
            .as_object()
            .is_some_and(|obj| obj.contains_key("state") || obj.contains_key("cnt"));
        if is_wrapped {
            let wrapped: Wrapped = serde_json::from_value(raw).map_err(serde::de::Error::custom)?;
            Ok(Self::Wrapped {
                state: wrapped.state,
                cnt: wrapped.cnt,
            })
        } else {
            serde_json::from_value(raw)
                .map(Self::Bare)
                .map_err(serde::de::Error::custom)
        }
    }
}

/// `GET /api/save`
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SaveReceipt {
    #[serde(default)]
    pub save_id: String,
    #[serde(default)]
    pub info: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SavedScript {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub timestamp: String,
    #[serde(default)]
    pub filename: String,
}

/// `GET /api/saved-scripts`
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SavedScripts {
    #[serde(default, deserialize_with = "null_as_default")]
    pub scripts: Vec<SavedScript>,
}

/// `{help: characters}`. The backend appends a literal `"null"` entry.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CharacterList {
    #[serde(default, deserialize_with = "null_as_default")]
    pub characters: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RetrievedChunk {
    #[serde(rename = "Info", default)]
    pub info: String,
}

/// `{help: allmemory}`: the raw per-scene record log.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct WorldRecords {
    #[serde(default, deserialize_with = "null_as_default")]
    pub allmemory: BTreeMap<String, Vec<Value>>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub chunks: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub retrieved: Vec<RetrievedChunk>,
}

impl WorldRecords {
    pub fn record_count(&self) -> usize {
        self.allmemory.values().map(Vec::len).sum()
    }
}

/// `{help: dramallm}`: director reasoning traces, shape owned by the backend.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SystemFeedback {
    #[serde(default, deserialize_with = "null_as_default")]
    pub dramallm: Vec<Value>,
}

/// `{help: allscript}`
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ScriptInfo {
    #[serde(default)]
    pub allscript: Value,
    #[serde(default)]
    pub scene_cnt: i64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub nc: ChainProgress,
}

impl ScriptInfo {
    /// The script, when the backend sent it as an object.
    pub fn script(&self) -> Option<Script> {
        match &self.allscript {
            Value::Object(_) => serde_json::from_value(self.allscript.clone()).ok(),
            Value::String(raw) => serde_json::from_str(raw).ok(),
            _ => None,
        }
    }
}

/// `{role: name}`
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CharacterInfo {
    #[serde(default)]
    pub profile: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub memory: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub chunks: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub retrieved: Vec<RetrievedChunk>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub prompts: Vec<Value>,
}

/// `POST /api/upload`
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct UploadReceipt {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
}
