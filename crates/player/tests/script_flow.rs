//! Script authoring and loading against a scripted backend.

use std::sync::Arc;

use serde_json::{json, Map, Value};
use theatre_domain::{GameState, SceneMode};
use theatre_player::application::editors::{
    CharacterField, SceneCharacterField, SceneField, ScriptDraft,
};
use theatre_player::infrastructure::testing::fixtures::{fixed_now, sample_game_state_json};
use theatre_player::infrastructure::testing::{RecordedCall, ScriptedApi};
use theatre_player::infrastructure::FixedClock;
use theatre_player::{ClientConfig, TheatreClient};

fn client(api: &ScriptedApi) -> TheatreClient {
    TheatreClient::new(
        Arc::new(api.clone()),
        Arc::new(FixedClock(fixed_now())),
        &ClientConfig::default(),
    )
}

fn heist_draft() -> ScriptDraft {
    let mut draft = ScriptDraft::new();
    draft.script_name = "heist".into();
    draft.player_name = "Danny".into();
    draft.background_narrative = "Eleven people, one vault".into();
    for (id, profile, memory) in [
        ("Danny", "The planner", ""),
        ("Rusty", "The right hand", "Knows Danny from prison"),
    ] {
        let i = draft.add_character();
        draft.update_character(i, CharacterField::Id, id).unwrap();
        draft.update_character(i, CharacterField::Profile, profile).unwrap();
        draft.update_character(i, CharacterField::InitialMemory, memory).unwrap();
    }

    for (name, mode, chain) in [
        ("Recruiting", SceneMode::V1, "Rusty joins"),
        ("Casino", SceneMode::V2, "The vault opens"),
    ] {
        let s = draft.add_scene();
        draft.update_scene(s, SceneField::Name(name.into())).unwrap();
        draft.update_scene(s, SceneField::Mode(mode)).unwrap();
        draft.add_scene_character(s).unwrap();
        draft
            .update_scene_character(s, 0, SceneCharacterField::Motivation("Win".into()))
            .unwrap();
        let c = draft.add_chain(s).unwrap();
        draft.update_chain(s, c, chain).unwrap();
    }
    draft
}

/// What a fresh backend game stores for a `/api/data` body: blank initial
/// memories are left out of `context`.
fn backend_script(body: &Value) -> Value {
    let mut characters = Map::new();
    let mut context = Map::new();
    for character in body["characters"].as_array().into_iter().flatten() {
        let id = character["id"].as_str().unwrap_or_default().to_string();
        characters.insert(id.clone(), character["profile"].clone());
        let memory = &body["characters_initial_memories"][&id];
        if memory.as_str().is_some_and(|m| !m.is_empty()) {
            context.insert(id.clone(), memory.clone());
        }
    }

    let mut scenes = Map::new();
    for (key, scene) in body["scenes"].as_object().into_iter().flatten() {
        scenes.insert(
            key.clone(),
            json!({
                "name": scene["sceneName"],
                "scene": scene["sceneInfo"],
                "mode": scene["mode"],
                "characters": scene["characters"],
                "chain": scene["chains"],
                "stream": scene["streams"],
            }),
        );
    }

    json!({
        "id": body["id"],
        "background": {
            "player": body["player_name"],
            "narrative": body["background_narrative"],
            "characters": characters,
            "context": context,
        },
        "scenes": scenes,
    })
}

#[tokio::test]
async fn new_script_is_blank_at_scene_one() {
    let api = ScriptedApi::new();
    let state = client(&api).new_script().await;
    assert_eq!(state.id, "new-script");
    assert_eq!(state.scene_cnt, 1);
    assert!(state.scenes.is_empty());
    assert!(state.characters.is_empty());
    assert!(api.calls().is_empty());
}

#[tokio::test]
async fn saved_draft_reloads_with_same_content() {
    let api = ScriptedApi::new();
    api.respond("/api/data", Value::Null)
        .respond("/api/info", json!({"characters": ["Danny", "Rusty", "null"]}));

    let client = client(&api);
    let draft = heist_draft();
    let saved = client.save_draft(&draft).await.unwrap();
    assert_eq!(saved.scene_cnt, 1);
    assert_eq!(saved.player_name(), "Danny");

    let body = match api.calls_to("/api/data").first() {
        Some(RecordedCall::Post { body, .. }) => body.clone(),
        other => panic!("expected a POST to /api/data, got {other:?}"),
    };
    assert_eq!(body["storageMode"], true);
    assert_eq!(body["characters_initial_memories"]["Danny"], "");

    // The backend answers the reload with the script it stored.
    let mut reloaded = sample_game_state_json();
    reloaded["id"] = json!("heist");
    reloaded["script"] = backend_script(&body);
    api.respond("/api/load", reloaded)
        .respond("/api/info", json!({"characters": ["Danny", "Rusty"]}));

    let loaded: GameState = client.load_script("heist").await.unwrap();
    let (before, after) = (&saved.script, &loaded.script);
    assert_eq!(after.background.characters, before.background.characters);
    assert_eq!(after.background.context, before.background.context);
    assert_eq!(after.scenes.len(), before.scenes.len());
    for (key, scene) in &before.scenes {
        assert_eq!(after.scenes[key].chain, scene.chain);
        assert_eq!(after.scenes[key].characters, scene.characters);
        assert_eq!(after.scenes[key].mode, scene.mode);
    }

    let load_body = api.calls_to("/api/load")[0].body().cloned().unwrap();
    assert_eq!(load_body["script_name"], "load-script-heist");
}

#[tokio::test]
async fn rejected_save_keeps_previous_game() {
    let api = ScriptedApi::new();
    api.respond("/api/load", sample_game_state_json())
        .respond("/api/info", json!({"characters": []}))
        .respond("/api/data", json!({"error": "Initial memories changed! reload the script!"}));

    let client = client(&api);
    client.load_script("hp").await.unwrap();
    client.take_notice().await;

    let err = client.save_draft(&heist_draft()).await.unwrap_err();
    assert_eq!(err.to_string(), "Initial memories changed! reload the script!");
    assert_eq!(client.state().await.unwrap().id, "hp");
    assert!(client.take_notice().await.unwrap().is_error());
}

#[tokio::test]
async fn saved_scripts_list_and_session_save() {
    let api = ScriptedApi::new();
    api.respond(
        "/api/saved-scripts",
        json!({"scripts": [{"id": "hp_0301_200000", "name": "hp", "timestamp": "2025-03-01 20:00:00", "filename": "hp_0301_200000.yml"}]}),
    )
    .respond("/api/save", json!({"info": "Saved", "save_id": "hp_0301_200001"}));

    let client = client(&api);
    let scripts = client.saved_scripts().await.unwrap();
    assert_eq!(scripts[0].id, "hp_0301_200000");

    let receipt = client.save_session().await.unwrap();
    assert_eq!(receipt.save_id, "hp_0301_200001");
    assert_eq!(
        client.take_notice().await.unwrap().to_string(),
        "[ok] Saved as hp_0301_200001"
    );
}
