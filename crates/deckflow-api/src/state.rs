//! Application state.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use dashmap::DashMap;
use deckflow_export::{DeckRenderer, MarkdownRenderer};
use deckflow_workflow::WorkflowEngine;
use tokio::sync::{Mutex, OwnedMutexGuard};

/// Application state shared across handlers.
pub struct AppState {
    pub engine: Arc<WorkflowEngine>,
    pub renderer: Arc<dyn DeckRenderer>,
    pub template: Option<PathBuf>,
    session_locks: DashMap<String, Arc<Mutex<()>>>,
    start_time: Instant,
}

impl AppState {
    /// State with the Markdown renderer and no template.
    pub fn new(engine: Arc<WorkflowEngine>) -> Self {
        Self::with_renderer(engine, Arc::new(MarkdownRenderer::new()), None)
    }

    pub fn with_renderer(
        engine: Arc<WorkflowEngine>,
        renderer: Arc<dyn DeckRenderer>,
        template: Option<PathBuf>,
    ) -> Self {
        Self {
            engine,
            renderer,
            template,
            session_locks: DashMap::new(),
            start_time: Instant::now(),
        }
    }

    /// Lock serializing mutations of one session.
    ///
    /// The engine reads the latest snapshot and commits new ones without
    /// coordination, so concurrent `advance` calls on one id must queue here.
    /// The entry is dropped again once nobody holds or waits on it.
    pub async fn lock_session(&self, session_id: &str) -> SessionGuard<'_> {
        let lock = self
            .session_locks
            .entry(session_id.to_string())
            .or_default()
            .clone();
        SessionGuard {
            locks: &self.session_locks,
            session_id: session_id.to_string(),
            guard: Some(lock.lock_owned().await),
        }
    }

    /// Ids with a live lock entry.
    pub fn session_lock_count(&self) -> usize {
        self.session_locks.len()
    }

    pub fn uptime(&self) -> std::time::Duration {
        self.start_time.elapsed()
    }
}

/// Held session lock; releasing it prunes the map entry when idle.
pub struct SessionGuard<'a> {
    locks: &'a DashMap<String, Arc<Mutex<()>>>,
    session_id: String,
    guard: Option<OwnedMutexGuard<()>>,
}

impl Drop for SessionGuard<'_> {
    fn drop(&mut self) {
        // Release first so our own clone no longer counts.
        self.guard.take();
        self.locks
            .remove_if(&self.session_id, |_, lock| Arc::strong_count(lock) == 1);
    }
}
