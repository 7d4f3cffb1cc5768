//! Persisted seen-set.
//!
//! A flat JSON array of listing keys that have already been notified.
//! The set only ever grows: keys are never evicted, within a process or
//! across restarts. Long deployments therefore accumulate one string per
//! post ever notified; at board posting rates that stays small, and
//! keeping the literal behavior keeps restarts from re-notifying.

use std::collections::HashSet;
use std::path::PathBuf;

use tokio::io::AsyncWriteExt;

use crate::error::Result;

/// In-memory seen-set backed by a JSON file.
pub struct SeenStore {
    path: PathBuf,
    seen: HashSet<String>,
}

impl SeenStore {
    /// Load the seen-set from disk. A missing file is a normal cold
    /// start; a malformed file is logged and treated as empty.
    pub async fn load(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let seen = match tokio::fs::read(&path).await {
            Ok(bytes) => match serde_json::from_slice::<Vec<String>>(&bytes) {
                Ok(keys) => {
                    log::info!("Loaded {} seen posts from {}", keys.len(), path.display());
                    keys.into_iter().collect()
                }
                Err(e) => {
                    log::warn!(
                        "Seen file {} is malformed ({}), starting empty",
                        path.display(),
                        e
                    );
                    HashSet::new()
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                log::info!("No seen file at {}, starting empty", path.display());
                HashSet::new()
            }
            Err(e) => {
                log::warn!("Failed to read {} ({}), starting empty", path.display(), e);
                HashSet::new()
            }
        };
        Self { path, seen }
    }

    /// Rewrite the file wholesale, via temp file + rename so a crash
    /// mid-write never leaves a truncated seen file.
    pub async fn save(&self) -> Result<()> {
        let keys: Vec<&String> = self.seen.iter().collect();
        let bytes = serde_json::to_vec_pretty(&keys)?;

        let tmp = self.path.with_extension("tmp");
        let mut file = tokio::fs::File::create(&tmp).await?;
        file.write_all(&bytes).await?;
        file.flush().await?;
        drop(file);

        tokio::fs::rename(&tmp, &self.path).await?;
        Ok(())
    }

    /// Record a key. Returns true when the key was not already present.
    pub fn insert(&mut self, key: &str) -> bool {
        self.seen.insert(key.to_string())
    }

    /// Check whether a key has been notified before.
    pub fn contains(&self, key: &str) -> bool {
        self.seen.contains(key)
    }

    pub fn len(&self) -> usize {
        self.seen.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seen.is_empty()
    }
}
