use bevy::prelude::*;
use serde::Deserialize;
use std::fs;

/// 1-based index into the level manifest.
#[derive(Resource, Debug, Clone, Copy)]
pub struct CurrentLevel(pub usize);

/// Ordered list of levels, read from `assets/levels.json`.
#[derive(Resource, Debug, Deserialize)]
pub struct LevelManifest {
    pub levels: Vec<LevelEntry>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LevelEntry {
    pub name: String,
    pub map: String,
}

impl LevelManifest {
    pub fn load(path: &str) -> Result<Self, String> {
        let text = fs::read_to_string(path)
            .map_err(|e| format!("failed to read level manifest {}: {}", path, e))?;
        Self::parse(&text).map_err(|e| format!("{}: {}", path, e))
    }

    pub fn parse(text: &str) -> Result<Self, String> {
        let manifest: LevelManifest =
            serde_json::from_str(text).map_err(|e| format!("invalid level manifest: {}", e))?;
        if manifest.levels.is_empty() {
            return Err("level manifest lists no levels".to_string());
        }
        Ok(manifest)
    }

    /// Look up a level by 1-based index.
    pub fn level(&self, number: usize) -> Option<&LevelEntry> {
        number.checked_sub(1).and_then(|i| self.levels.get(i))
    }

    pub fn len(&self) -> usize {
        self.levels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }
}

/// Per-run tallies, reset when a new game starts and shown on the
/// victory screen.
#[derive(Resource, Debug, Default)]
pub struct GameStats {
    pub enemies_destroyed: u32,
    pub lasers_deflected: u32,
    pub hits_taken: u32,
    pub levels_cleared: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    const MANIFEST: &str = r#"{
        "levels": [
            { "name": "First Contact", "map": "assets/maps/level1.txt" },
            { "name": "Robot Foundry", "map": "assets/maps/level2.txt" }
        ]
    }"#;

    #[test]
    fn manifest_parses_and_indexes_from_one() {
        let manifest = LevelManifest::parse(MANIFEST).unwrap();
        assert_eq!(manifest.len(), 2);
        assert_eq!(manifest.level(1).unwrap().name, "First Contact");
        assert_eq!(manifest.level(2).unwrap().map, "assets/maps/level2.txt");
        assert!(manifest.level(0).is_none());
        assert!(manifest.level(3).is_none());
    }

    #[test]
    fn empty_manifest_is_rejected() {
        let err = LevelManifest::parse(r#"{ "levels": [] }"#).unwrap_err();
        assert!(err.contains("no levels"));
    }

    #[test]
    fn malformed_manifest_is_rejected() {
        assert!(LevelManifest::parse("not json").is_err());
    }
}
