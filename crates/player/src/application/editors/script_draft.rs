//! Local draft of a script, edited without touching the server.
//!
//! Drafts are independent copies: nothing here mutates the live `GameState`.
//! Saving serializes the whole draft into a single `SaveScriptRequest`, with
//! scenes renumbered densely from `scene1` in list order.

use std::collections::BTreeMap;

use theatre_domain::{
    Background, Character, DomainError, GameState, Scene, SceneKey, SceneMode, Script,
    ChainProgress, DEFAULT_PLAYER_NAME,
};
use theatre_shared::{CharacterConfig, SaveScriptRequest, SceneConfig};

/// Script id used when the draft has no name.
pub const UNTITLED_SCRIPT_ID: &str = "untitled-script";

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CharacterDraft {
    pub id: String,
    pub profile: String,
    pub initial_memory: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CharacterField {
    Id,
    Profile,
    InitialMemory,
}

/// A character's motivation within one scene.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SceneCharacterDraft {
    pub name: String,
    pub motivation: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SceneCharacterField {
    Name(String),
    Motivation(String),
}

/// One plot-chain entry together with its detail beats.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ChainDraft {
    pub entry: String,
    pub details: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SceneDraft {
    pub name: String,
    pub info: String,
    pub mode: SceneMode,
    pub characters: Vec<SceneCharacterDraft>,
    pub chains: Vec<ChainDraft>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SceneField {
    Name(String),
    Info(String),
    Mode(SceneMode),
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ScriptDraft {
    pub script_name: String,
    pub player_name: String,
    pub background_narrative: String,
    pub characters: Vec<CharacterDraft>,
    pub scenes: Vec<SceneDraft>,
}

fn checked<'a, T>(items: &'a mut [T], what: &'static str, index: usize) -> Result<&'a mut T, DomainError> {
    let len = items.len();
    items
        .get_mut(index)
        .ok_or_else(|| DomainError::index_out_of_range(what, index, len))
}

fn checked_remove<T>(items: &mut Vec<T>, what: &'static str, index: usize) -> Result<T, DomainError> {
    if index >= items.len() {
        return Err(DomainError::index_out_of_range(what, index, items.len()));
    }
    Ok(items.remove(index))
}

fn non_empty_or(value: &str, fallback: impl FnOnce() -> String) -> String {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        fallback()
    } else {
        trimmed.to_string()
    }
}

impl ScriptDraft {
    pub fn new() -> Self {
        Self::default()
    }

    /// Independent editable copy of `script`.
    pub fn from_script(script: &Script) -> Self {
        let background = &script.background;
        let characters = background
            .characters
            .iter()
            .map(|(id, profile)| CharacterDraft {
                id: id.clone(),
                profile: profile.clone(),
                initial_memory: script.initial_memory(id).unwrap_or_default().to_string(),
            })
            .collect();

        let scenes = script
            .scenes
            .values()
            .map(|scene| SceneDraft {
                name: scene.name.clone(),
                info: scene.info.clone(),
                mode: scene.mode.clone(),
                characters: scene
                    .characters
                    .iter()
                    .map(|(name, motivation)| SceneCharacterDraft {
                        name: name.clone(),
                        motivation: motivation.clone(),
                    })
                    .collect(),
                chains: scene
                    .chain
                    .iter()
                    .map(|entry| ChainDraft {
                        entry: entry.clone(),
                        details: scene.details_for(entry).to_vec(),
                    })
                    .collect(),
            })
            .collect();

        Self {
            script_name: script.id.clone(),
            player_name: background.player.clone(),
            background_narrative: background.narrative.clone(),
            characters,
            scenes,
        }
    }

    pub fn from_state(state: &GameState) -> Self {
        Self::from_script(&state.script)
    }

    // =========================================================================
    // Characters
    // =========================================================================

    pub fn add_character(&mut self) -> usize {
        self.characters.push(CharacterDraft::default());
        self.characters.len() - 1
    }

    pub fn remove_character(&mut self, index: usize) -> Result<CharacterDraft, DomainError> {
        checked_remove(&mut self.characters, "character", index)
    }

    pub fn update_character(
        &mut self,
        index: usize,
        field: CharacterField,
        value: impl Into<String>,
    ) -> Result<(), DomainError> {
        let character = checked(&mut self.characters, "character", index)?;
        let value = value.into();
        match field {
            CharacterField::Id => character.id = value,
            CharacterField::Profile => character.profile = value,
            CharacterField::InitialMemory => character.initial_memory = value,
        }
        Ok(())
    }

    // =========================================================================
    // Scenes
    // =========================================================================

    pub fn add_scene(&mut self) -> usize {
        self.scenes.push(SceneDraft::default());
        self.scenes.len() - 1
    }

    pub fn remove_scene(&mut self, index: usize) -> Result<SceneDraft, DomainError> {
        checked_remove(&mut self.scenes, "scene", index)
    }

    pub fn update_scene(&mut self, index: usize, field: SceneField) -> Result<(), DomainError> {
        let scene = checked(&mut self.scenes, "scene", index)?;
        match field {
            SceneField::Name(name) => scene.name = name,
            SceneField::Info(info) => scene.info = info,
            SceneField::Mode(mode) => scene.mode = mode,
        }
        Ok(())
    }

    /// Adds the first named character not yet in the scene. `Ok(None)` when
    /// every character is already there.
    pub fn add_scene_character(&mut self, scene: usize) -> Result<Option<String>, DomainError> {
        let candidates: Vec<String> = self
            .characters
            .iter()
            .map(|c| c.id.trim().to_string())
            .filter(|id| !id.is_empty())
            .collect();
        let scene = checked(&mut self.scenes, "scene", scene)?;
        let Some(name) = candidates
            .into_iter()
            .find(|id| !scene.characters.iter().any(|c| &c.name == id))
        else {
            return Ok(None);
        };
        scene.characters.push(SceneCharacterDraft {
            name: name.clone(),
            motivation: String::new(),
        });
        Ok(Some(name))
    }

    pub fn remove_scene_character(
        &mut self,
        scene: usize,
        index: usize,
    ) -> Result<SceneCharacterDraft, DomainError> {
        let scene = checked(&mut self.scenes, "scene", scene)?;
        checked_remove(&mut scene.characters, "scene character", index)
    }

    pub fn update_scene_character(
        &mut self,
        scene: usize,
        index: usize,
        field: SceneCharacterField,
    ) -> Result<(), DomainError> {
        let scene = checked(&mut self.scenes, "scene", scene)?;
        let entry = checked(&mut scene.characters, "scene character", index)?;
        match field {
            SceneCharacterField::Name(name) => entry.name = name,
            SceneCharacterField::Motivation(motivation) => entry.motivation = motivation,
        }
        Ok(())
    }

    // =========================================================================
    // Plot chain and stream details
    // =========================================================================

    pub fn add_chain(&mut self, scene: usize) -> Result<usize, DomainError> {
        let scene = checked(&mut self.scenes, "scene", scene)?;
        scene.chains.push(ChainDraft::default());
        Ok(scene.chains.len() - 1)
    }

    /// Removes the entry together with its detail beats.
    pub fn remove_chain(&mut self, scene: usize, index: usize) -> Result<ChainDraft, DomainError> {
        let scene = checked(&mut self.scenes, "scene", scene)?;
        checked_remove(&mut scene.chains, "chain entry", index)
    }

    /// Rewrites the entry text; its details stay attached.
    pub fn update_chain(
        &mut self,
        scene: usize,
        index: usize,
        entry: impl Into<String>,
    ) -> Result<(), DomainError> {
        let scene = checked(&mut self.scenes, "scene", scene)?;
        checked(&mut scene.chains, "chain entry", index)?.entry = entry.into();
        Ok(())
    }

    pub fn add_stream_detail(&mut self, scene: usize, chain: usize) -> Result<usize, DomainError> {
        let scene = checked(&mut self.scenes, "scene", scene)?;
        let chain = checked(&mut scene.chains, "chain entry", chain)?;
        chain.details.push(String::new());
        Ok(chain.details.len() - 1)
    }

    pub fn update_stream_detail(
        &mut self,
        scene: usize,
        chain: usize,
        index: usize,
        detail: impl Into<String>,
    ) -> Result<(), DomainError> {
        let scene = checked(&mut self.scenes, "scene", scene)?;
        let chain = checked(&mut scene.chains, "chain entry", chain)?;
        *checked(&mut chain.details, "stream detail", index)? = detail.into();
        Ok(())
    }

    pub fn remove_stream_detail(
        &mut self,
        scene: usize,
        chain: usize,
        index: usize,
    ) -> Result<String, DomainError> {
        let scene = checked(&mut self.scenes, "scene", scene)?;
        let chain = checked(&mut scene.chains, "chain entry", chain)?;
        checked_remove(&mut chain.details, "stream detail", index)
    }

    // =========================================================================
    // Serialization
    // =========================================================================

    /// Body for `POST /api/data`. Blank ids and chain entries are dropped,
    /// names fall back to defaults, and scenes are keyed `scene1..N`.
    pub fn to_save_request(&self) -> SaveScriptRequest {
        let characters = self
            .characters
            .iter()
            .filter(|c| !c.id.trim().is_empty())
            .map(|c| CharacterConfig {
                id: c.id.trim().to_string(),
                profile: c.profile.clone(),
                initial_memory: c.initial_memory.clone(),
            })
            .collect();

        let mut scenes = BTreeMap::new();
        let mut key = SceneKey::first();
        for scene in &self.scenes {
            scenes.insert(key, scene_config(key, scene));
            key = key.next();
        }

        SaveScriptRequest::new(
            non_empty_or(&self.script_name, || UNTITLED_SCRIPT_ID.to_string()),
            non_empty_or(&self.player_name, || DEFAULT_PLAYER_NAME.to_string()),
            self.background_narrative.clone(),
            characters,
            scenes,
        )
    }

    /// The script the backend will hold once `to_save_request()` is accepted.
    pub fn to_script(&self) -> Script {
        script_from_request(&self.to_save_request())
    }

    /// Fresh local state for a just-saved draft: always back at scene 1.
    pub fn to_game_state(&self) -> GameState {
        let request = self.to_save_request();
        let script = script_from_request(&request);
        let characters = request
            .characters
            .iter()
            .map(|c| {
                (
                    c.id.clone(),
                    Character::from_draft(&c.id, &c.profile, &c.initial_memory),
                )
            })
            .collect();
        GameState {
            id: request.id.clone(),
            scene_cnt: 1,
            nc: ChainProgress::default(),
            characters,
            scenes: script.scenes.clone(),
            script,
        }
    }
}

fn scene_config(key: SceneKey, scene: &SceneDraft) -> SceneConfig {
    let chains: Vec<&ChainDraft> = scene
        .chains
        .iter()
        .filter(|c| !c.entry.trim().is_empty())
        .collect();

    let streams = chains
        .iter()
        .filter_map(|chain| {
            let details: Vec<String> = chain
                .details
                .iter()
                .map(|d| d.trim())
                .filter(|d| !d.is_empty())
                .map(str::to_string)
                .collect();
            (!details.is_empty()).then(|| (chain.entry.trim().to_string(), details))
        })
        .collect();

    let characters = scene
        .characters
        .iter()
        .filter(|c| !c.name.trim().is_empty())
        .map(|c| (c.name.trim().to_string(), c.motivation.clone()))
        .collect();

    SceneConfig {
        scene_name: non_empty_or(&scene.name, || format!("Scene {}", key.index())),
        scene_info: scene.info.clone(),
        chains: chains.iter().map(|c| c.entry.trim().to_string()).collect(),
        streams,
        characters,
        mode: scene.mode.clone(),
    }
}

fn script_from_request(request: &SaveScriptRequest) -> Script {
    let characters = request
        .characters
        .iter()
        .map(|c| (c.id.clone(), c.profile.clone()))
        .collect();
    // A fresh backend game stores only non-blank memories. Re-saving into a
    // running game also keeps blank entries, which read the same as absent.
    let context = request
        .characters_initial_memories
        .iter()
        .filter(|(_, memory)| !memory.trim().is_empty())
        .map(|(id, memory)| (id.clone(), memory.clone()))
        .collect();

    let scenes = request
        .scenes
        .iter()
        .map(|(key, config)| {
            let scene = Scene {
                id: key.to_string(),
                name: config.scene_name.clone(),
                info: config.scene_info.clone(),
                mode: config.mode.clone(),
                characters: config.characters.clone(),
                chain: config.chains.clone(),
                stream: (!config.streams.is_empty()).then(|| config.streams.clone()),
            };
            (*key, scene)
        })
        .collect();

    Script {
        id: request.id.clone(),
        background: Background {
            narrative: request.background_narrative.clone(),
            player: request.player_name.clone(),
            characters,
            context: Some(context),
        },
        scenes,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft() -> ScriptDraft {
        let mut d = ScriptDraft::new();
        d.script_name = "hp".into();
        d.player_name = "Harry".into();
        for (id, memory) in [("Harry", ""), ("Ron", "met Harry on the train")] {
            let i = d.add_character();
            d.update_character(i, CharacterField::Id, id).unwrap();
            d.update_character(i, CharacterField::Profile, format!("{id} profile")).unwrap();
            d.update_character(i, CharacterField::InitialMemory, memory).unwrap();
        }
        for name in ["Train", "Hall", "Dungeon"] {
            let s = d.add_scene();
            d.update_scene(s, SceneField::Name(name.into())).unwrap();
            let c = d.add_chain(s).unwrap();
            d.update_chain(s, c, format!("{name} beat")).unwrap();
        }
        d
    }

    #[test]
    fn out_of_range_indices_are_errors() {
        let mut d = draft();
        assert_eq!(
            d.remove_character(9),
            Err(DomainError::index_out_of_range("character", 9, 2))
        );
        assert!(d.update_scene(3, SceneField::Info("x".into())).is_err());
        assert!(d.remove_chain(0, 4).is_err());
        assert!(d.update_stream_detail(0, 0, 0, "x").is_err());
        assert_eq!(d.scenes.len(), 3);
    }

    #[test]
    fn removing_middle_scene_renumbers_densely() {
        let mut d = draft();
        d.remove_scene(1).unwrap();
        let req = d.to_save_request();
        let keys: Vec<String> = req.scenes.keys().map(ToString::to_string).collect();
        assert_eq!(keys, vec!["scene1", "scene2"]);
        assert_eq!(req.scenes[&SceneKey::new(2).unwrap()].scene_name, "Dungeon");
        assert_eq!(req.validate(), Ok(()));
    }

    #[test]
    fn add_scene_character_picks_first_absent() {
        let mut d = draft();
        assert_eq!(d.add_scene_character(0).unwrap().as_deref(), Some("Harry"));
        assert_eq!(d.add_scene_character(0).unwrap().as_deref(), Some("Ron"));
        assert_eq!(d.add_scene_character(0).unwrap(), None);
        assert_eq!(d.scenes[0].characters.len(), 2);
    }

    #[test]
    fn save_request_drops_blanks_and_applies_defaults() {
        let mut d = draft();
        d.script_name = "  ".into();
        d.player_name = String::new();
        d.add_character();
        let s = d.add_scene();
        let c = d.add_chain(s).unwrap();
        d.update_chain(s, c, "   ").unwrap();

        let req = d.to_save_request();
        assert_eq!(req.id, UNTITLED_SCRIPT_ID);
        assert_eq!(req.player_name, "Player");
        assert_eq!(req.characters.len(), 2);
        let last = &req.scenes[&SceneKey::new(4).unwrap()];
        assert_eq!(last.scene_name, "Scene 4");
        assert!(last.chains.is_empty());
        assert_eq!(last.mode, SceneMode::V1);
    }

    #[test]
    fn stream_details_follow_their_chain_entry() {
        let mut d = draft();
        let detail = d.add_stream_detail(0, 0).unwrap();
        d.update_stream_detail(0, 0, detail, "Ron spots the scar").unwrap();
        d.add_stream_detail(0, 0).unwrap();
        d.update_chain(0, 0, "Harry meets Ron").unwrap();

        let req = d.to_save_request();
        let scene = &req.scenes[&SceneKey::first()];
        assert_eq!(
            scene.streams.get("Harry meets Ron"),
            Some(&vec!["Ron spots the scar".to_string()])
        );

        d.remove_chain(0, 0).unwrap();
        assert!(d.to_save_request().scenes[&SceneKey::first()].streams.is_empty());
    }

    #[test]
    fn game_state_from_draft_resets_to_scene_one() {
        let state = draft().to_game_state();
        assert_eq!(state.id, "hp");
        assert_eq!(state.scene_cnt, 1);
        assert!(state.nc.is_empty());
        assert_eq!(state.characters["Ron"].memory, vec!["met Harry on the train"]);
        assert!(state.characters["Harry"].memory.is_empty());
        assert_eq!(state.current_scene().map(|s| s.name.as_str()), Some("Train"));
        assert_eq!(state.script.initial_memory("Ron"), Some("met Harry on the train"));
    }

    #[test]
    fn blank_initial_memories_stay_out_of_context() {
        let script = draft().to_script();
        let context = script.background.context.as_ref().unwrap();
        assert_eq!(context.keys().collect::<Vec<_>>(), vec!["Ron"]);
        assert_eq!(script.initial_memory("Harry"), None);
    }

    #[test]
    fn unrecognised_scene_mode_is_saved_unchanged() {
        let script: Script = serde_json::from_value(serde_json::json!({
            "id": "hp",
            "background": {"player": "Harry", "characters": {"Harry": "wizard"}},
            "scenes": {"scene1": {"name": "Train", "mode": "v4", "chain": ["board"]}}
        }))
        .unwrap();

        let req = ScriptDraft::from_script(&script).to_save_request();
        assert_eq!(req.validate(), Ok(()));
        let body = serde_json::to_value(&req).unwrap();
        assert_eq!(body["scenes"]["scene1"]["mode"], "v4");
        assert_eq!(
            ScriptDraft::from_script(&script).to_script().scenes[&SceneKey::first()].mode,
            SceneMode::Other("v4".into())
        );
    }

    #[test]
    fn from_script_round_trips_authored_content() {
        let original = draft().to_script();
        let copy = ScriptDraft::from_script(&original).to_script();
        assert_eq!(copy.background.characters, original.background.characters);
        assert_eq!(copy.background.context, original.background.context);
        for (key, scene) in &original.scenes {
            assert_eq!(copy.scenes[key].chain, scene.chain);
            assert_eq!(copy.scenes[key].characters, scene.characters);
        }
    }
}
