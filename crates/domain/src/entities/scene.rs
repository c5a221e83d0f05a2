//! Scene entity - A named unit of the script
//!
//! A scene carries its own orchestration mode, the motivation of each character
//! taking part, and an ordered plot chain. `stream` optionally maps a chain
//! entry to finer-grained detail beats.

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};

use crate::SceneMode;

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Scene {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    /// The backend's script model stores scene info under `scene`
    #[serde(default, alias = "scene")]
    pub info: String,
    #[serde(default)]
    pub mode: SceneMode,
    /// Character name -> motivation in this scene
    #[serde(default, deserialize_with = "motivation_map")]
    pub characters: BTreeMap<String, String>,
    #[serde(default)]
    pub chain: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stream: Option<BTreeMap<String, Vec<String>>>,
}

impl Scene {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn with_chain(mut self, chain: Vec<String>) -> Self {
        self.chain = chain;
        self
    }

    /// Detail beats authored for one chain entry.
    pub fn details_for(&self, chain_entry: &str) -> &[String] {
        self.stream
            .as_ref()
            .and_then(|stream| stream.get(chain_entry))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}

/// The live scene state sends character "surface" objects where the script
/// has plain motivations; keep anything non-string as its compact JSON text.
fn motivation_map<'de, D>(deserializer: D) -> Result<BTreeMap<String, String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<BTreeMap<String, serde_json::Value>> = Option::deserialize(deserializer)?;
    Ok(raw
        .unwrap_or_default()
        .into_iter()
        .map(|(name, value)| {
            let motivation = match value {
                serde_json::Value::String(s) => s,
                serde_json::Value::Null => String::new(),
                other => other.to_string(),
            };
            (name, motivation)
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_script_scene_with_info_alias() {
        let scene: Scene = serde_json::from_str(
            r#"{"name":"Platform","scene":"King's Cross","mode":"v2","chain":["a"],
                "characters":{"Ron":"find a seat"}}"#,
        )
        .unwrap();
        assert_eq!(scene.info, "King's Cross");
        assert_eq!(scene.mode, SceneMode::V2);
        assert_eq!(scene.characters.get("Ron").map(String::as_str), Some("find a seat"));
        assert!(scene.id.is_empty());
    }

    #[test]
    fn tolerates_live_state_character_objects() {
        let scene: Scene = serde_json::from_str(
            r#"{"id":"scene1","name":"Hall","info":"","characters":{"Ron":{"loc":"scene1"},"Neville":null}}"#,
        )
        .unwrap();
        assert_eq!(
            scene.characters.get("Ron").map(String::as_str),
            Some(r#"{"loc":"scene1"}"#)
        );
        assert_eq!(scene.characters.get("Neville").map(String::as_str), Some(""));
        assert_eq!(scene.mode, SceneMode::V1);
    }

    #[test]
    fn details_for_missing_entry_is_empty() {
        let mut scene = Scene::new("scene1", "Hall").with_chain(vec!["a".into()]);
        assert!(scene.details_for("a").is_empty());

        scene.stream = Some(BTreeMap::from([("a".to_string(), vec!["a1".to_string()])]));
        assert_eq!(scene.details_for("a"), ["a1".to_string()]);
    }
}
