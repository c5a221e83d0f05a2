use serde::{Deserialize, Serialize};

/// A character as reported in `GameState.characters`.
///
/// `memory` is chronological and append-only on the server; the client only
/// displays it.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Character {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub profile: String,
    #[serde(default)]
    pub memory: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
}

impl Character {
    /// Local character synthesized from an editor draft.
    pub fn from_draft(name: &str, profile: &str, initial_memory: &str) -> Self {
        let memory = if initial_memory.is_empty() {
            Vec::new()
        } else {
            vec![initial_memory.to_string()]
        };
        Self {
            id: name.to_string(),
            name: name.to_string(),
            profile: profile.to_string(),
            memory,
            avatar: None,
        }
    }
}
