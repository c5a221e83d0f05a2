//! Draft editors - synchronous local CRUD over copies of the script

mod script_draft;

pub use script_draft::{
    ChainDraft, CharacterDraft, CharacterField, SceneCharacterDraft, SceneCharacterField,
    SceneDraft, SceneField, ScriptDraft, UNTITLED_SCRIPT_ID,
};
