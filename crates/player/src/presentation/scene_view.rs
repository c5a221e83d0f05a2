//! Scene header: what the stage shows for the current scene.

use std::collections::BTreeMap;
use std::fmt;

use theatre_domain::{ChainEntryStatus, GameState, SceneMode};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SceneView {
    pub index: u32,
    pub title: String,
    pub info: String,
    pub mode: SceneMode,
    /// Character -> motivation in this scene
    pub motivations: BTreeMap<String, String>,
    pub chain: Vec<ChainEntryStatus>,
}

impl SceneView {
    /// Falls back to empty fields when the state has no scene for `scene_cnt`.
    pub fn from_state(state: &GameState) -> Self {
        let index = state.effective_scene_index();
        let live = state.current_scene();
        let authored = state.current_script_scene();

        // The authored scene carries motivations and chain; the live one may
        // only have positions.
        let name = live
            .map(|s| s.name.as_str())
            .filter(|name| !name.is_empty())
            .or_else(|| authored.map(|s| s.name.as_str()))
            .unwrap_or_default();
        let title = if name.trim().is_empty() {
            format!("Scene {index}")
        } else {
            format!("Scene {index}  {name}")
        };

        let info = live
            .map(|s| s.info.clone())
            .filter(|info| !info.is_empty())
            .or_else(|| authored.map(|s| s.info.clone()))
            .unwrap_or_default();

        let source = authored.or(live);
        Self {
            index,
            title,
            info,
            mode: source.map(|s| s.mode.clone()).unwrap_or_default(),
            motivations: source.map(|s| s.characters.clone()).unwrap_or_default(),
            chain: source.map(|s| state.chain_status(s)).unwrap_or_default(),
        }
    }

    pub fn completed(&self) -> usize {
        self.chain.iter().filter(|entry| entry.completed).count()
    }
}

impl fmt::Display for SceneView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} [{}]", self.title, self.mode)?;
        if !self.info.is_empty() {
            writeln!(f, "{}", self.info)?;
        }
        for (name, motivation) in &self.motivations {
            writeln!(f, "  {name}: {motivation}")?;
        }
        if !self.chain.is_empty() {
            writeln!(f, "Plot chain ({}/{}):", self.completed(), self.chain.len())?;
            for entry in &self.chain {
                let mark = if entry.completed { "x" } else { " " };
                writeln!(f, "  [{mark}] {}", entry.entry)?;
            }
        }
        Ok(())
    }
}
