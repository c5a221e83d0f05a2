//! Playing a scene against a scripted backend.

use std::sync::Arc;
use std::time::Duration;

use serde_json::json;
use theatre_player::application::services::InteractionOutcome;
use theatre_player::infrastructure::testing::fixtures::{
    fixed_now, sample_game_state_json, sample_game_state_json_for,
};
use theatre_player::infrastructure::testing::ScriptedApi;
use theatre_player::infrastructure::FixedClock;
use theatre_player::presentation::SceneView;
use theatre_player::state::{ApplyOutcome, InteractionPhase};
use theatre_player::{ClientConfig, ServiceError, TheatreClient};
use theatre_shared::ActionKind;

fn client(api: &ScriptedApi) -> TheatreClient {
    TheatreClient::new(
        Arc::new(api.clone()),
        Arc::new(FixedClock(fixed_now())),
        &ClientConfig::default(),
    )
}

async fn loaded(api: &ScriptedApi) -> TheatreClient {
    api.respond("/api/data", sample_game_state_json())
        .respond("/api/info", json!({"characters": ["Harry", "Ron", "null"]}));
    let client = client(api);
    client.start().await.unwrap();
    client.take_notice().await;
    client
}

#[tokio::test]
async fn unaddressed_speak_appends_one_plain_line() {
    let api = ScriptedApi::new();
    let client = loaded(&api).await;
    api.respond(
        "/api/interact",
        json!({"done": false, "input": {"x": "-speak", "bid": [null], "content": "hello"}, "action": []}),
    );

    let outcome = client
        .send_action(ActionKind::Speak, "hello", None)
        .await
        .unwrap();
    assert_eq!(
        outcome,
        InteractionOutcome::Completed {
            appended: 1,
            state_replaced: false
        }
    );

    let transcript = client.transcript().await;
    assert_eq!(transcript.len(), 1);
    let line = &transcript.messages()[0];
    assert_eq!(line.character, "Harry");
    assert!(line.content.ends_with("hello"));
    assert!(!line.content.contains('@'));
}

#[tokio::test]
async fn character_reply_without_done_keeps_state() {
    let api = ScriptedApi::new();
    let client = loaded(&api).await;
    let before = client.state().await.unwrap();
    api.respond(
        "/api/interact",
        json!({"done": false, "action": [{"x": "-speak", "aid": "Bob", "content": "hi", "bid": []}]}),
    );

    client.send_action(ActionKind::Stay, "", None).await.unwrap();

    let transcript = client.transcript().await;
    assert_eq!(transcript.len(), 1);
    assert_eq!(transcript.messages()[0].character, "Bob");
    assert_eq!(transcript.messages()[0].content, "hi");
    assert_eq!(client.state().await.unwrap(), before);
    assert_eq!(client.phase().await, InteractionPhase::Appended);
}

#[tokio::test]
async fn withdraw_removes_latest_lines_in_order() {
    let api = ScriptedApi::new();
    let client = loaded(&api).await;
    for i in 0..4 {
        api.respond(
            "/api/interact",
            json!({"done": false, "action": [{"x": "-speak", "aid": "Ron", "content": format!("line {i}")}]}),
        );
        client.send_action(ActionKind::Stay, "", None).await.unwrap();
    }
    api.respond(
        "/api/interact",
        json!({"state": sample_game_state_json(), "cnt": 3}),
    );

    assert_eq!(client.withdraw().await.unwrap(), 3);
    let transcript = client.transcript().await;
    let contents: Vec<&str> = transcript.messages().iter().map(|m| m.content.as_str()).collect();
    assert_eq!(contents, vec!["line 0"]);
}

#[tokio::test]
async fn slow_navigation_reply_is_discarded() {
    let api = ScriptedApi::new();
    let client = loaded(&api).await;
    api.respond_after(
        "/api/interact",
        sample_game_state_json_for("hp", 1),
        Duration::from_millis(50),
    )
    .respond("/api/interact", sample_game_state_json_for("hp", 2))
    .respond("/api/info", json!({"characters": ["Harry"]}));

    let (older, newer) = tokio::join!(client.back_scene(), client.next_scene());
    assert_eq!(older.unwrap(), ApplyOutcome::Stale);
    assert!(newer.unwrap().is_applied());
    assert_eq!(client.state().await.unwrap().scene_cnt, 2);
}

#[tokio::test]
async fn second_action_while_sending_is_busy() {
    let api = ScriptedApi::new();
    let client = loaded(&api).await;
    api.respond_after(
        "/api/interact",
        json!({"done": false, "action": []}),
        Duration::from_millis(50),
    );

    let (first, second) = tokio::join!(
        client.send_action(ActionKind::Stay, "", None),
        client.send_action(ActionKind::Stay, "", None),
    );
    assert!(first.is_ok());
    assert_eq!(second, Err(ServiceError::Busy));
    assert_eq!(api.calls_to("/api/interact").len(), 1);
}

#[tokio::test]
async fn completed_scene_replaces_state_and_refreshes_characters() {
    let api = ScriptedApi::new();
    let client = loaded(&api).await;
    api.respond(
        "/api/interact",
        json!({
            "done": true,
            "input": {"x": "-speak", "bid": ["Ron"], "content": "Let's go"},
            "action": [],
            "state": sample_game_state_json_for("hp", 2),
        }),
    )
    .respond("/api/info", json!({"characters": ["Harry"]}));

    client
        .send_action(ActionKind::Speak, "@Ron Let's go", Some("Ron".into()))
        .await
        .unwrap();

    let state = client.state().await.unwrap();
    assert_eq!(SceneView::from_state(&state).title, "Scene 2  Great Hall");
    assert_eq!(client.characters().await.unwrap(), vec!["Harry"]);
    assert_eq!(api.calls_to("/api/info").len(), 2);
}

#[tokio::test]
async fn chain_completion_needs_exact_text() {
    let api = ScriptedApi::new();
    let mut state = sample_game_state_json();
    state["nc"] = json!([["Harry meets Ron ", true], ["Ron shares sweets", false]]);
    api.respond("/api/data", state)
        .respond("/api/info", json!({"characters": []}));

    let client = client(&api);
    client.start().await.unwrap();
    let view = SceneView::from_state(&client.state().await.unwrap());
    assert!(view.chain.iter().all(|entry| !entry.completed));
}

#[tokio::test]
async fn rejected_action_leaves_transcript_alone() {
    let api = ScriptedApi::new();
    let client = loaded(&api).await;
    api.respond("/api/interact", json!({"error": "Not your turn"}));

    let err = client
        .send_action(ActionKind::Speak, "hello", None)
        .await
        .unwrap_err();
    assert_eq!(err, ServiceError::Rejected("Not your turn".into()));
    assert!(client.transcript().await.is_empty());
    assert_eq!(client.phase().await, InteractionPhase::ErroredDisplayed);
    assert_eq!(
        client.take_notice().await.unwrap().to_string(),
        "[error] Not your turn"
    );
}
