use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use uuid::Uuid;

use crate::DomainError;

/// Id the backend and the editors use for a script that was never saved.
pub const NEW_SCRIPT_ID: &str = "new-script";

/// Player display name when a script leaves it blank.
pub const DEFAULT_PLAYER_NAME: &str = "Player";

macro_rules! define_id {
    ($name:ident) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub struct $name(Uuid);

        impl $name {
            pub fn new() -> Self {
                Self(Uuid::new_v4())
            }

            pub fn from_uuid(uuid: Uuid) -> Self {
                Self(uuid)
            }

            pub fn as_uuid(&self) -> &Uuid {
                &self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<Uuid> for $name {
            fn from(value: Uuid) -> Self {
                Self(value)
            }
        }
    };
}

// Transcript entries only; never sent to the backend
define_id!(MessageId);

const SCENE_KEY_PREFIX: &str = "scene";

/// Positional, 1-based scene key (`scene1`, `scene2`, ...).
///
/// Serialized as its string form so it can key JSON maps. Ordering follows the
/// numeric index, so `scene10` sorts after `scene2`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SceneKey(u32);

impl SceneKey {
    pub fn new(index: u32) -> Result<Self, DomainError> {
        if index == 0 {
            return Err(DomainError::invalid_scene_key(format!(
                "{SCENE_KEY_PREFIX}0"
            )));
        }
        Ok(Self(index))
    }

    /// The key for `scene_cnt`, clamped to a minimum of 1.
    pub fn clamped(scene_cnt: i64) -> Self {
        let index = scene_cnt.clamp(1, i64::from(u32::MAX));
        Self(u32::try_from(index).unwrap_or(1))
    }

    pub fn first() -> Self {
        Self(1)
    }

    pub fn index(&self) -> u32 {
        self.0
    }

    pub fn next(&self) -> Self {
        Self(self.0.saturating_add(1))
    }
}

impl fmt::Display for SceneKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{SCENE_KEY_PREFIX}{}", self.0)
    }
}

impl FromStr for SceneKey {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits = s
            .strip_prefix(SCENE_KEY_PREFIX)
            .ok_or_else(|| DomainError::invalid_scene_key(s))?;
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(DomainError::invalid_scene_key(s));
        }
        let index: u32 = digits
            .parse()
            .map_err(|_| DomainError::invalid_scene_key(s))?;
        Self::new(index).map_err(|_| DomainError::invalid_scene_key(s))
    }
}

impl Serialize for SceneKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for SceneKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}
