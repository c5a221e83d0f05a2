//! GameState - The full client-visible session snapshot
//!
//! Always replaced wholesale when the server hands back a new one; the client
//! never patches it field by field.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::{Character, ChainProgress, Scene, SceneKey, Script, NEW_SCRIPT_ID};

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct GameState {
    #[serde(default)]
    pub id: String,
    /// 1-based index of the current scene. May arrive as 0 before a scene starts.
    #[serde(default)]
    pub scene_cnt: i64,
    #[serde(default)]
    pub nc: ChainProgress,
    #[serde(default)]
    pub characters: BTreeMap<String, Character>,
    #[serde(default)]
    pub scenes: BTreeMap<SceneKey, Scene>,
    #[serde(default)]
    pub script: Script,
}

/// Render-ready completion flag for one plot-chain entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChainEntryStatus {
    pub entry: String,
    pub completed: bool,
}

impl GameState {
    /// State for a script that has not been saved yet.
    pub fn new_script() -> Self {
        Self {
            id: NEW_SCRIPT_ID.to_string(),
            scene_cnt: 1,
            nc: ChainProgress::default(),
            characters: BTreeMap::new(),
            scenes: BTreeMap::new(),
            script: Script::blank(),
        }
    }

    /// A state without an id is the backend's "nothing loaded" answer.
    pub fn is_playable(&self) -> bool {
        !self.id.trim().is_empty()
    }

    pub fn effective_scene_index(&self) -> u32 {
        self.current_scene_key().index()
    }

    pub fn current_scene_key(&self) -> SceneKey {
        SceneKey::clamped(self.scene_cnt)
    }

    /// The current scene, if the server sent one for `scene_cnt`.
    pub fn current_scene(&self) -> Option<&Scene> {
        self.scenes.get(&self.current_scene_key())
    }

    /// The authored version of the current scene (carries chain and mode even
    /// when the live scene state does not).
    pub fn current_script_scene(&self) -> Option<&Scene> {
        self.script.scene(self.current_scene_key())
    }

    pub fn player_name(&self) -> &str {
        self.script.player_name()
    }

    pub fn chain_status(&self, scene: &Scene) -> Vec<ChainEntryStatus> {
        scene
            .chain
            .iter()
            .map(|entry| ChainEntryStatus {
                entry: entry.clone(),
                completed: self.nc.is_completed(entry),
            })
            .collect()
    }
}
