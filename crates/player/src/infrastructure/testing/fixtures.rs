//! Test fixtures: backend-shaped JSON and matching domain values.

use chrono::{DateTime, TimeZone, Utc};
use serde_json::{json, Value};
use theatre_domain::GameState;

use crate::ports::outbound::ApiError;

pub fn api_request_failed(msg: &str) -> ApiError {
    ApiError::RequestFailed(msg.to_string())
}

pub fn fixed_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 3, 1, 20, 0, 0)
        .single()
        .unwrap_or_default()
}

/// A two-scene Hogwarts session in scene 1, as `/api/data` returns it.
pub fn sample_game_state_json() -> Value {
    sample_game_state_json_for("hp", 1)
}

pub fn sample_game_state_json_for(id: &str, scene_cnt: i64) -> Value {
    json!({
        "id": id,
        "raw_records": {"scene1": ["Harry: hello"]},
        "scene_cnt": scene_cnt,
        "nc": [["Harry meets Ron", true], ["Ron shares sweets", false]],
        "characters": {
            "Harry": {"id": "Harry", "profile": "The boy who lived", "memory": []},
            "Ron": {"id": "Ron", "profile": "Loyal friend", "memory": ["Met Harry on the train"]}
        },
        "scenes": {
            "scene1": {
                "id": "scene1",
                "name": "Hogwarts Express",
                "info": "A compartment on the train",
                "characters": {"Harry": {"loc": "scene1"}, "Ron": {"loc": "scene1"}}
            },
            "scene2": {
                "id": "scene2",
                "name": "Great Hall",
                "info": "The sorting feast",
                "characters": {"Harry": {"loc": "scene2"}}
            }
        },
        "script": {
            "id": id,
            "background": {
                "narrative": "First year at Hogwarts",
                "player": "Harry",
                "characters": {"Harry": "The boy who lived", "Ron": "Loyal friend"},
                "context": {"Ron": "Met Harry on the train"}
            },
            "scenes": {
                "scene1": {
                    "name": "Hogwarts Express",
                    "scene": "A compartment on the train",
                    "mode": "v1",
                    "characters": {"Harry": "Make a friend", "Ron": "Find a seat"},
                    "chain": ["Harry meets Ron", "Ron shares sweets"],
                    "stream": {"Harry meets Ron": ["Ron asks about the scar"]}
                },
                "scene2": {
                    "name": "Great Hall",
                    "scene": "The sorting feast",
                    "mode": "v2",
                    "characters": {"Harry": "Avoid Slytherin"},
                    "chain": ["Harry is sorted"]
                }
            }
        }
    })
}

pub fn sample_game_state() -> GameState {
    serde_json::from_value(sample_game_state_json()).unwrap_or_default()
}

pub fn speak_response(content: &str, bid: Value, actions: Value) -> Value {
    json!({
        "done": false,
        "input": {"x": "-speak", "bid": bid, "content": content},
        "action": actions,
    })
}
