//! Script persistence request bodies (`/api/data` POST, `/api/load`)

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use theatre_domain::{SceneKey, SceneMode};

use crate::ProtocolError;

/// Prefix the backend matches when loading a script by name.
pub const LOAD_SCRIPT_PREFIX: &str = "load-script-";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CharacterConfig {
    pub id: String,
    pub profile: String,
    pub initial_memory: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SceneConfig {
    #[serde(rename = "sceneName")]
    pub scene_name: String,
    #[serde(rename = "sceneInfo")]
    pub scene_info: String,
    pub chains: Vec<String>,
    pub streams: BTreeMap<String, Vec<String>>,
    /// Character name -> motivation
    pub characters: BTreeMap<String, String>,
    pub mode: SceneMode,
}

/// Body of `POST /api/data`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaveScriptRequest {
    pub id: String,
    pub player_name: String,
    pub background_narrative: String,
    pub characters: Vec<CharacterConfig>,
    /// The backend reads initial memories from here, keyed by character id.
    pub characters_initial_memories: BTreeMap<String, String>,
    pub scenes: BTreeMap<SceneKey, SceneConfig>,
    #[serde(rename = "storageMode")]
    pub storage_mode: bool,
}

impl SaveScriptRequest {
    pub fn new(
        id: impl Into<String>,
        player_name: impl Into<String>,
        background_narrative: impl Into<String>,
        characters: Vec<CharacterConfig>,
        scenes: BTreeMap<SceneKey, SceneConfig>,
    ) -> Self {
        let characters_initial_memories = characters
            .iter()
            .map(|c| (c.id.clone(), c.initial_memory.clone()))
            .collect();
        Self {
            id: id.into(),
            player_name: player_name.into(),
            background_narrative: background_narrative.into(),
            characters,
            characters_initial_memories,
            scenes,
            storage_mode: true,
        }
    }

    /// Reject bodies the backend would choke on before they leave the client.
    pub fn validate(&self) -> Result<(), ProtocolError> {
        if self.id.trim().is_empty() {
            return Err(ProtocolError::EmptyField("id"));
        }

        let mut seen = BTreeSet::new();
        for character in &self.characters {
            if character.id.trim().is_empty() {
                return Err(ProtocolError::EmptyField("character id"));
            }
            if !seen.insert(character.id.as_str()) {
                return Err(ProtocolError::DuplicateCharacter(character.id.clone()));
            }
        }

        let expected_len = self.scenes.len();
        for (position, key) in self.scenes.keys().enumerate() {
            if key.index() as usize != position + 1 {
                return Err(ProtocolError::SceneKeyGap {
                    expected_len,
                    found: key.to_string(),
                });
            }
        }

        for (key, scene) in &self.scenes {
            if scene.chains.iter().any(|entry| entry.trim().is_empty()) {
                return Err(ProtocolError::EmptyChainEntry {
                    scene: key.to_string(),
                });
            }
            if let Some(entry) = scene.streams.keys().find(|k| !scene.chains.contains(k)) {
                return Err(ProtocolError::OrphanStream {
                    scene: key.to_string(),
                    entry: entry.clone(),
                });
            }
        }

        let encoded = serde_json::to_string(self)?;
        let decoded: SaveScriptRequest =
            serde_json::from_str(&encoded).map_err(|_| ProtocolError::Truncated)?;
        if &decoded != self {
            return Err(ProtocolError::Truncated);
        }

        Ok(())
    }
}

/// Scripts bundled with the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExampleScript {
    Hp,
    Station,
    Romeo,
}

impl ExampleScript {
    pub const ALL: [ExampleScript; 3] = [Self::Hp, Self::Station, Self::Romeo];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Hp => "hp",
            Self::Station => "station",
            Self::Romeo => "romeo",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Self::Hp => "Harry Potter and the Philosopher's Stone",
            Self::Station => "Seven people in the waiting room",
            Self::Romeo => "Romeo and Juliet",
        }
    }
}

impl fmt::Display for ExampleScript {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ExampleScript {
    type Err = ProtocolError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|example| example.as_str() == s)
            .ok_or_else(|| ProtocolError::UnknownExample(s.to_string()))
    }
}

/// Body of `POST /api/load`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoadScriptRequest {
    pub script_name: String,
    #[serde(rename = "storageMode")]
    pub storage_mode: bool,
}

impl LoadScriptRequest {
    pub fn new(script_name: impl Into<String>) -> Self {
        Self {
            script_name: script_name.into(),
            storage_mode: true,
        }
    }

    pub fn example(example: ExampleScript) -> Self {
        Self::new(format!("{LOAD_SCRIPT_PREFIX}{example}"))
    }

    /// A script saved earlier through `/api/save`.
    pub fn saved(id: &str) -> Self {
        Self::new(format!("{LOAD_SCRIPT_PREFIX}{id}"))
    }
}
