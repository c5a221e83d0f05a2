//! Plain renderings of the read-only info panels.

use serde_json::Value;
use theatre_shared::{CharacterInfo, SystemFeedback, WorldRecords};

fn value_line(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

pub fn render_world_records(records: &WorldRecords) -> Vec<String> {
    let mut lines = Vec::with_capacity(records.record_count() + records.allmemory.len());
    for (scene, entries) in &records.allmemory {
        lines.push(format!("[{scene}]"));
        lines.extend(entries.iter().map(|entry| format!("  {}", value_line(entry))));
    }
    lines
}

pub fn render_system_feedback(feedback: &SystemFeedback) -> Vec<String> {
    feedback.dramallm.iter().map(value_line).collect()
}

pub fn render_character_info(name: &str, info: &CharacterInfo) -> Vec<String> {
    let mut lines = vec![format!("{name}: {}", info.profile)];
    if !info.memory.is_empty() {
        lines.push("Memory:".to_string());
        lines.extend(info.memory.iter().map(|m| format!("  - {m}")));
    }
    if !info.retrieved.is_empty() {
        lines.push("Retrieved:".to_string());
        lines.extend(info.retrieved.iter().map(|chunk| format!("  - {}", chunk.info)));
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn records_grouped_by_scene() {
        let records: WorldRecords = serde_json::from_value(json!({
            "allmemory": {"scene1": ["Harry: hello", {"x": "-stay"}]}
        }))
        .unwrap();
        assert_eq!(
            render_world_records(&records),
            vec!["[scene1]", "  Harry: hello", r#"  {"x":"-stay"}"#]
        );
    }
}
