//! `/api/info` request bodies

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InfoTopic {
    Characters,
    Allmemory,
    Dramallm,
    Allscript,
    ExportRecords,
}

impl InfoTopic {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Characters => "characters",
            Self::Allmemory => "allmemory",
            Self::Dramallm => "dramallm",
            Self::Allscript => "allscript",
            Self::ExportRecords => "export_records",
        }
    }
}

/// Body of `POST /api/info`: either a `help` discriminator or a `role` lookup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum InfoRequest {
    Help { help: InfoTopic },
    Role { role: String },
}

impl InfoRequest {
    pub fn help(topic: InfoTopic) -> Self {
        Self::Help { help: topic }
    }

    pub fn role(name: impl Into<String>) -> Self {
        Self::Role { role: name.into() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn help_and_role_shapes() {
        assert_eq!(
            serde_json::to_value(InfoRequest::help(InfoTopic::ExportRecords)).unwrap(),
            json!({"help": "export_records"})
        );
        assert_eq!(
            serde_json::to_value(InfoRequest::role("Ron")).unwrap(),
            json!({"role": "Ron"})
        );
    }
}
