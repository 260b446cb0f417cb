//! Snapshot storage.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use deckflow_protocols::WorkflowState;
use tokio::fs;
use tokio::sync::RwLock;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::checkpoint::Checkpoint;
use crate::error::CheckpointError;

/// Extension of snapshot files staged but not yet committed.
const TEMP_EXTENSION: &str = "json.tmp";

/// Snapshot storage keyed by session id.
#[async_trait]
pub trait SnapshotStore: Send + Sync {
    /// Save a snapshot.
    async fn save(&self, checkpoint: &Checkpoint) -> Result<(), CheckpointError>;

    /// Save several snapshots in order.
    ///
    /// Stores that can fail midway override this to save all or nothing.
    async fn save_batch(&self, checkpoints: &[Checkpoint]) -> Result<(), CheckpointError> {
        for checkpoint in checkpoints {
            self.save(checkpoint).await?;
        }
        Ok(())
    }

    /// Latest snapshot for a session.
    async fn load(&self, session_id: &str) -> Result<Option<Checkpoint>, CheckpointError>;

    /// All snapshots for a session, ordered by sequence (oldest first).
    async fn list(&self, session_id: &str) -> Result<Vec<Checkpoint>, CheckpointError>;

    /// Delete one snapshot.
    async fn delete(&self, session_id: &str, id: &Uuid) -> Result<(), CheckpointError>;

    /// Delete all snapshots for a session.
    async fn delete_session(&self, session_id: &str) -> Result<(), CheckpointError>;

    /// The state the session resumes from, read from its latest snapshot.
    async fn current_pending_state(
        &self,
        session_id: &str,
    ) -> Result<Option<WorkflowState>, CheckpointError> {
        Ok(self.load(session_id).await?.map(|cp| cp.next))
    }
}

/// In-memory snapshot store.
pub struct MemorySnapshotStore {
    checkpoints: RwLock<HashMap<Uuid, Checkpoint>>,
}

impl MemorySnapshotStore {
    /// Create a new memory store.
    pub fn new() -> Self {
        Self {
            checkpoints: RwLock::new(HashMap::new()),
        }
    }
}

impl Default for MemorySnapshotStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SnapshotStore for MemorySnapshotStore {
    async fn save(&self, checkpoint: &Checkpoint) -> Result<(), CheckpointError> {
        let mut store = self.checkpoints.write().await;
        store.insert(checkpoint.id, checkpoint.clone());
        Ok(())
    }

    async fn save_batch(&self, checkpoints: &[Checkpoint]) -> Result<(), CheckpointError> {
        let mut store = self.checkpoints.write().await;
        for checkpoint in checkpoints {
            store.insert(checkpoint.id, checkpoint.clone());
        }
        Ok(())
    }

    async fn load(&self, session_id: &str) -> Result<Option<Checkpoint>, CheckpointError> {
        let store = self.checkpoints.read().await;
        let latest = store
            .values()
            .filter(|cp| cp.session_id == session_id)
            .max_by_key(|cp| cp.sequence)
            .cloned();
        Ok(latest)
    }

    async fn list(&self, session_id: &str) -> Result<Vec<Checkpoint>, CheckpointError> {
        let store = self.checkpoints.read().await;
        let mut checkpoints: Vec<_> = store
            .values()
            .filter(|cp| cp.session_id == session_id)
            .cloned()
            .collect();
        checkpoints.sort_by_key(|cp| cp.sequence);
        Ok(checkpoints)
    }

    async fn delete(&self, session_id: &str, id: &Uuid) -> Result<(), CheckpointError> {
        let mut store = self.checkpoints.write().await;
        if store.get(id).is_some_and(|cp| cp.session_id == session_id) {
            store.remove(id);
        }
        Ok(())
    }

    async fn delete_session(&self, session_id: &str) -> Result<(), CheckpointError> {
        let mut store = self.checkpoints.write().await;
        store.retain(|_, cp| cp.session_id != session_id);
        Ok(())
    }
}

/// File system based snapshot store.
///
/// Snapshots are stored as individual JSON files organized by session:
/// ```text
/// {storage_path}/
/// └── checkpoints/
///     └── {session_id}/
///         ├── 000000_{uuid}.json
///         ├── 000001_{uuid}.json
///         └── ...
/// ```
pub struct FileSnapshotStore {
    /// Base storage path.
    storage_path: PathBuf,
}

impl FileSnapshotStore {
    /// Create a new file-based snapshot store rooted at `storage_path`.
    pub async fn new(storage_path: impl Into<PathBuf>) -> Result<Self, CheckpointError> {
        let storage_path = storage_path.into();
        fs::create_dir_all(storage_path.join("checkpoints")).await?;

        debug!("FileSnapshotStore initialized at {:?}", storage_path);

        Ok(Self { storage_path })
    }

    fn checkpoints_dir(&self) -> PathBuf {
        self.storage_path.join("checkpoints")
    }

    fn session_dir(&self, session_id: &str) -> PathBuf {
        self.checkpoints_dir()
            .join(Self::sanitize_session_id(session_id))
    }

    fn checkpoint_path(&self, checkpoint: &Checkpoint) -> PathBuf {
        self.session_dir(&checkpoint.session_id)
            .join(format!("{:06}_{}.json", checkpoint.sequence, checkpoint.id))
    }

    /// Sanitize session ID for use as directory name.
    fn sanitize_session_id(session_id: &str) -> String {
        session_id
            .chars()
            .map(|c| {
                if c.is_alphanumeric() || c == '-' || c == '_' {
                    c
                } else {
                    '_'
                }
            })
            .collect()
    }

    fn temp_path(path: &Path) -> PathBuf {
        path.with_extension(TEMP_EXTENSION)
    }

    /// Read a snapshot file and report whether it belongs to `session_id`.
    ///
    /// Unreadable files belong to nobody.
    async fn owned_by(path: &Path, session_id: &str) -> bool {
        match fs::read_to_string(path).await {
            Ok(content) => serde_json::from_str::<Checkpoint>(&content)
                .map(|cp| cp.session_id == session_id)
                .unwrap_or(false),
            Err(_) => false,
        }
    }

    /// Write every snapshot to a temporary file, then rename them into place.
    ///
    /// On failure, temporaries are removed and already renamed files are
    /// rolled back, so the batch is all or nothing.
    async fn write_batch(&self, checkpoints: &[Checkpoint]) -> Result<(), CheckpointError> {
        let mut staged = Vec::with_capacity(checkpoints.len());
        for checkpoint in checkpoints {
            fs::create_dir_all(self.session_dir(&checkpoint.session_id)).await?;
            let path = self.checkpoint_path(checkpoint);
            let temp = Self::temp_path(&path);

            let written = match serde_json::to_string_pretty(checkpoint) {
                Ok(content) => fs::write(&temp, content)
                    .await
                    .map_err(CheckpointError::from),
                Err(e) => Err(CheckpointError::Serialization(format!(
                    "Failed to serialize snapshot: {}",
                    e
                ))),
            };
            staged.push((temp, path));
            if let Err(e) = written {
                Self::discard(staged.iter().map(|(temp, _)| temp)).await;
                return Err(e);
            }
        }

        for (i, (temp, path)) in staged.iter().enumerate() {
            if let Err(e) = fs::rename(temp, path).await {
                warn!("Failed to commit snapshot {:?}, rolling back batch: {}", path, e);
                Self::discard(staged[..i].iter().map(|(_, path)| path)).await;
                Self::discard(staged[i..].iter().map(|(temp, _)| temp)).await;
                return Err(e.into());
            }
        }
        Ok(())
    }

    async fn discard<'a>(paths: impl Iterator<Item = &'a PathBuf>) {
        for path in paths {
            if let Err(e) = fs::remove_file(path).await {
                if e.kind() != std::io::ErrorKind::NotFound {
                    warn!("Failed to remove {:?}: {}", path, e);
                }
            }
        }
    }

    /// Parse sequence and checkpoint ID from a filename.
    fn parse_filename(filename: &str) -> Option<(u32, Uuid)> {
        // Format: {sequence:06}_{uuid}.json
        let stem = filename.strip_suffix(".json")?;
        let (sequence, id) = stem.split_once('_')?;
        let sequence = sequence.parse().ok()?;
        let id = Uuid::parse_str(id).ok()?;
        Some((sequence, id))
    }

    /// Read all snapshots in a session directory, skipping unreadable files.
    async fn read_session_checkpoints(
        &self,
        session_id: &str,
    ) -> Result<Vec<Checkpoint>, CheckpointError> {
        let session_dir = self.session_dir(session_id);

        if !fs::try_exists(&session_dir).await? {
            return Ok(Vec::new());
        }

        let mut checkpoints = Vec::new();
        let mut entries = fs::read_dir(&session_dir).await?;

        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if path.extension().is_none_or(|ext| ext != "json") {
                continue;
            }

            match fs::read_to_string(&path).await {
                Ok(content) => match serde_json::from_str::<Checkpoint>(&content) {
                    // Sanitized ids can collide; only keep exact matches.
                    Ok(checkpoint) if checkpoint.session_id == session_id => {
                        checkpoints.push(checkpoint)
                    }
                    Ok(_) => {}
                    Err(e) => {
                        warn!("Failed to deserialize snapshot from {:?}: {}", path, e);
                    }
                },
                Err(e) => {
                    warn!("Failed to read snapshot file {:?}: {}", path, e);
                }
            }
        }

        Ok(checkpoints)
    }
}

#[async_trait]
impl SnapshotStore for FileSnapshotStore {
    async fn save(&self, checkpoint: &Checkpoint) -> Result<(), CheckpointError> {
        self.write_batch(std::slice::from_ref(checkpoint)).await?;

        debug!(
            "Saved snapshot '{}' for session '{}' (sequence {}, step {})",
            checkpoint.id, checkpoint.session_id, checkpoint.sequence, checkpoint.step
        );
        Ok(())
    }

    async fn save_batch(&self, checkpoints: &[Checkpoint]) -> Result<(), CheckpointError> {
        self.write_batch(checkpoints).await?;
        debug!("Saved batch of {} snapshots", checkpoints.len());
        Ok(())
    }

    async fn load(&self, session_id: &str) -> Result<Option<Checkpoint>, CheckpointError> {
        let checkpoints = self.read_session_checkpoints(session_id).await?;
        Ok(checkpoints.into_iter().max_by_key(|cp| cp.sequence))
    }

    async fn list(&self, session_id: &str) -> Result<Vec<Checkpoint>, CheckpointError> {
        let mut checkpoints = self.read_session_checkpoints(session_id).await?;
        checkpoints.sort_by_key(|cp| cp.sequence);
        Ok(checkpoints)
    }

    async fn delete(&self, session_id: &str, id: &Uuid) -> Result<(), CheckpointError> {
        let session_dir = self.session_dir(session_id);
        if !fs::try_exists(&session_dir).await? {
            return Ok(());
        }

        let mut entries = fs::read_dir(&session_dir).await?;
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            let matches = path
                .file_name()
                .and_then(|n| n.to_str())
                .and_then(Self::parse_filename)
                .is_some_and(|(_, file_id)| file_id == *id);
            if matches {
                fs::remove_file(&path).await?;
                debug!("Deleted snapshot '{}'", id);
                break;
            }
        }
        Ok(())
    }

    async fn delete_session(&self, session_id: &str) -> Result<(), CheckpointError> {
        let session_dir = self.session_dir(session_id);
        if !fs::try_exists(&session_dir).await? {
            return Ok(());
        }

        // The directory may be shared with a colliding id; only remove our files.
        let mut remaining = 0usize;
        let mut entries = fs::read_dir(&session_dir).await?;
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if Self::owned_by(&path, session_id).await {
                fs::remove_file(&path).await?;
            } else {
                remaining += 1;
            }
        }

        if remaining == 0 {
            fs::remove_dir(&session_dir).await?;
        }
        debug!("Deleted all snapshots for session '{}'", session_id);
        Ok(())
    }
}

#[cfg(test)]
#[path = "store_tests.rs"]
mod tests;
