//! Text form of the "script" info panel.

use std::fmt;

use theatre_domain::{ChainEntryStatus, SceneKey, SceneMode};
use theatre_shared::ScriptInfo;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OverviewScene {
    pub key: SceneKey,
    pub name: String,
    pub mode: SceneMode,
    pub current: bool,
    pub chain: Vec<ChainEntryStatus>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ScriptOverview {
    pub script_id: String,
    pub narrative: String,
    pub scenes: Vec<OverviewScene>,
}

impl ScriptOverview {
    /// `None` when the backend sent no parseable script.
    pub fn from_script_info(info: &ScriptInfo) -> Option<Self> {
        let script = info.script()?;
        let current = SceneKey::clamped(info.scene_cnt);
        let scenes = script
            .scenes
            .iter()
            .map(|(key, scene)| OverviewScene {
                key: *key,
                name: scene.name.clone(),
                mode: scene.mode.clone(),
                current: *key == current,
                chain: scene
                    .chain
                    .iter()
                    .map(|entry| ChainEntryStatus {
                        entry: entry.clone(),
                        completed: *key == current && info.nc.is_completed(entry),
                    })
                    .collect(),
            })
            .collect();

        Some(Self {
            script_id: script.id,
            narrative: script.background.narrative,
            scenes,
        })
    }
}

impl fmt::Display for ScriptOverview {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Script: {}", self.script_id)?;
        if !self.narrative.is_empty() {
            writeln!(f, "{}", self.narrative)?;
        }
        for scene in &self.scenes {
            let marker = if scene.current { ">" } else { " " };
            writeln!(f, "{marker} {} {} [{}]", scene.key, scene.name, scene.mode)?;
            for entry in &scene.chain {
                let mark = if entry.completed { "x" } else { " " };
                writeln!(f, "    [{mark}] {}", entry.entry)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::testing::fixtures::sample_game_state_json;
    use serde_json::json;

    fn info(scene_cnt: i64) -> ScriptInfo {
        let state = sample_game_state_json();
        serde_json::from_value(json!({
            "allscript": state["script"],
            "scene_cnt": scene_cnt,
            "nc": state["nc"],
        }))
        .unwrap()
    }

    #[test]
    fn marks_current_scene_and_progress() {
        let overview = ScriptOverview::from_script_info(&info(1)).unwrap();
        assert_eq!(overview.scenes.len(), 2);
        assert!(overview.scenes[0].current);
        assert!(overview.scenes[0].chain[0].completed);
        assert!(!overview.scenes[1].current);

        let text = overview.to_string();
        assert!(text.contains("> scene1 Hogwarts Express [v1]"));
        assert!(text.contains("  scene2 Great Hall [v2]"));
    }

    #[test]
    fn string_allscript_is_not_a_script() {
        let info = ScriptInfo {
            allscript: json!("not json"),
            ..ScriptInfo::default()
        };
        assert_eq!(ScriptOverview::from_script_info(&info), None);
    }
}
