// ABOUTME: Custom serde deserializers for config types.
// ABOUTME: Validates the retired-name suffix and the cf binary path.

use serde::Deserialize;
use std::path::PathBuf;

use crate::types::Naming;

pub fn deserialize_naming<'de, D>(deserializer: D) -> Result<Naming, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    Naming::new(&s).map_err(serde::de::Error::custom)
}

pub fn deserialize_binary<'de, D>(deserializer: D) -> Result<PathBuf, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    if s.trim().is_empty() {
        return Err(serde::de::Error::custom("cf_binary cannot be empty"));
    }
    Ok(PathBuf::from(s))
}
