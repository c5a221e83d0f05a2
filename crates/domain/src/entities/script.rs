//! Script entity - The authored drama
//!
//! Fully replaced on save/load, never diffed against the server.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::{Scene, SceneKey, DEFAULT_PLAYER_NAME, NEW_SCRIPT_ID};

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Background {
    #[serde(default)]
    pub narrative: String,
    #[serde(default)]
    pub player: String,
    /// Character name -> profile
    #[serde(default)]
    pub characters: BTreeMap<String, String>,
    /// Character name -> initial memory
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<BTreeMap<String, String>>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Script {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub background: Background,
    #[serde(default)]
    pub scenes: BTreeMap<SceneKey, Scene>,
}

impl Script {
    /// The blank script behind "start creating script".
    pub fn blank() -> Self {
        Self {
            id: NEW_SCRIPT_ID.to_string(),
            background: Background {
                narrative: String::new(),
                player: DEFAULT_PLAYER_NAME.to_string(),
                characters: BTreeMap::new(),
                context: None,
            },
            scenes: BTreeMap::new(),
        }
    }

    pub fn player_name(&self) -> &str {
        let player = self.background.player.trim();
        if player.is_empty() {
            DEFAULT_PLAYER_NAME
        } else {
            player
        }
    }

    pub fn initial_memory(&self, character: &str) -> Option<&str> {
        self.background
            .context
            .as_ref()
            .and_then(|context| context.get(character))
            .map(String::as_str)
    }

    pub fn scene(&self, key: SceneKey) -> Option<&Scene> {
        self.scenes.get(&key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_script_defaults() {
        let script = Script::blank();
        assert_eq!(script.id, NEW_SCRIPT_ID);
        assert_eq!(script.player_name(), "Player");
        assert!(script.background.characters.is_empty());
        assert!(script.scenes.is_empty());
    }

    #[test]
    fn player_name_falls_back_when_blank() {
        let mut script = Script::default();
        script.background.player = "  ".into();
        assert_eq!(script.player_name(), DEFAULT_PLAYER_NAME);
        script.background.player = "Harry".into();
        assert_eq!(script.player_name(), "Harry");
    }

    #[test]
    fn parses_backend_script_with_context() {
        let script: Script = serde_json::from_str(
            r#"{"id":"hp","background":{"narrative":"Hogwarts","player":"Harry",
                "characters":{"Ron":"loyal friend"},"context":{"Ron":"met Harry on the train"}},
                "scenes":{"scene1":{"name":"Train","scene":"Hogwarts Express","chain":["meet"]}}}"#,
        )
        .unwrap();
        assert_eq!(script.initial_memory("Ron"), Some("met Harry on the train"));
        assert_eq!(script.initial_memory("Hermione"), None);
        let scene = script.scene(SceneKey::first()).unwrap();
        assert_eq!(scene.info, "Hogwarts Express");
    }
}
