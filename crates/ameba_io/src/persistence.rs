use crate::error::{IoError, Result};
use crate::serialization::{read_json_file, write_json_file};
use ameba_core::Tunables;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// The durable tunables file.
///
/// On disk it is a JSON object with the keys `foodSpawnProb` and
/// `reproductionBaseChance`. Missing keys keep their defaults and values are
/// clamped into `[0, 1]` on load.
#[derive(Debug, Clone)]
pub struct ConfigStore {
    path: PathBuf,
}

impl ConfigStore {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_owned(),
        }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn load(&self) -> Result<Tunables> {
        self.load_onto(Tunables::default())
    }

    /// Applies the stored keys onto `base`; keys absent from the file keep
    /// `base`'s values.
    pub fn load_onto(&self, mut base: Tunables) -> Result<Tunables> {
        if !self.path.exists() {
            return Err(IoError::not_found(self.path.display().to_string()));
        }
        let raw: HashMap<String, serde_json::Value> = read_json_file(&self.path)?;
        let numbers: HashMap<String, f64> = raw
            .into_iter()
            .filter_map(|(k, v)| v.as_f64().map(|v| (k, v)))
            .collect();
        base.apply_map(&numbers);
        Ok(base)
    }

    /// Overlays the stored tunables onto `tunables` in place.
    ///
    /// A missing or unreadable file leaves `tunables` untouched.
    pub fn overlay(&self, tunables: &mut Tunables) {
        match self.load_onto(*tunables) {
            Ok(loaded) => {
                tracing::debug!(path = %self.path.display(), tunables = ?loaded, "Loaded tunables");
                *tunables = loaded;
            }
            Err(e) if e.is_not_found() => {
                tracing::debug!(path = %self.path.display(), "No tunables file, keeping current values");
            }
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "Ignoring unreadable tunables file");
            }
        }
    }

    /// Loads the tunables, falling back to defaults on any failure.
    pub fn load_or_default(&self) -> Tunables {
        let mut tunables = Tunables::default();
        self.overlay(&mut tunables);
        tunables
    }

    pub fn save(&self, tunables: &Tunables) -> Result<()> {
        write_json_file(tunables, &self.path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_save_then_load() {
        let dir = TempDir::new().expect("temp dir");
        let store = ConfigStore::new(dir.path().join("config").join("world.json"));
        let tunables = Tunables {
            food_spawn_prob: 0.4,
            reproduction_base_chance: 0.9,
        };
        store.save(&tunables).expect("save");
        assert_eq!(store.load().expect("load"), tunables);

        let text = std::fs::read_to_string(store.path()).expect("read back");
        assert!(text.contains("\"foodSpawnProb\""));
        assert!(text.contains("\"reproductionBaseChance\""));
    }

    #[test]
    fn test_missing_file_is_not_found_and_defaults() {
        let dir = TempDir::new().expect("temp dir");
        let store = ConfigStore::new(dir.path().join("absent.json"));
        assert!(store.load().expect_err("missing").is_not_found());
        assert_eq!(store.load_or_default(), Tunables::default());
    }

    #[test]
    fn test_corrupt_file_defaults() {
        let dir = TempDir::new().expect("temp dir");
        let path = dir.path().join("world.json");
        std::fs::write(&path, "{ not json").expect("write");
        let store = ConfigStore::new(&path);
        assert!(matches!(store.load(), Err(IoError::Json(_))));
        assert_eq!(store.load_or_default(), Tunables::default());
    }

    #[test]
    fn test_partial_file_is_clamped_and_merged() {
        let dir = TempDir::new().expect("temp dir");
        let path = dir.path().join("world.json");
        std::fs::write(&path, r#"{"foodSpawnProb": 7, "worldWidth": 10}"#).expect("write");
        let tunables = ConfigStore::new(&path).load().expect("load");
        assert_eq!(tunables.food_spawn_prob, 1.0);
        assert_eq!(tunables.reproduction_base_chance, 0.12);
    }

    #[test]
    fn test_overlay_keeps_keys_the_file_omits() {
        let dir = TempDir::new().expect("temp dir");
        let path = dir.path().join("world.json");
        std::fs::write(&path, r#"{"foodSpawnProb": 0.25}"#).expect("write");
        let mut tunables = Tunables {
            food_spawn_prob: 0.9,
            reproduction_base_chance: 0.5,
        };
        ConfigStore::new(&path).overlay(&mut tunables);
        assert_eq!(tunables.food_spawn_prob, 0.25);
        assert_eq!(tunables.reproduction_base_chance, 0.5);
    }

    #[test]
    fn test_overlay_ignores_missing_and_corrupt_files() {
        let dir = TempDir::new().expect("temp dir");
        let configured = Tunables {
            food_spawn_prob: 0.3,
            reproduction_base_chance: 0.7,
        };
        let mut tunables = configured;
        ConfigStore::new(dir.path().join("absent.json")).overlay(&mut tunables);
        assert_eq!(tunables, configured);

        let path = dir.path().join("world.json");
        std::fs::write(&path, "[1, 2]").expect("write");
        ConfigStore::new(&path).overlay(&mut tunables);
        assert_eq!(tunables, configured);
    }
}
