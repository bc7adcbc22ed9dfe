//! In-memory access token holder
//!
//! A single-slot store for the current bearer credential, shared via
//! `Arc` and injected into the client rather than living at module scope,
//! so tests can substitute their own instance. Empty at process start;
//! filled by successful login or refresh; emptied by logout, a failed
//! refresh, or a failed post-refresh retry. Never persisted — session
//! continuity across restarts comes from the refresh cookie, not from
//! this slot.

use common::Secret;
use tokio::sync::RwLock;
use tracing::debug;

struct Slot {
    credential: Option<Secret<String>>,
    /// Bumped on every set/clear; lets waiters on the refresh gate detect
    /// that another caller already replaced the token.
    generation: u64,
}

/// Shared single-slot holder for the current access token.
pub struct TokenHolder {
    slot: RwLock<Slot>,
}

impl TokenHolder {
    /// Create an empty holder (no credential until login).
    pub fn new() -> Self {
        Self {
            slot: RwLock::new(Slot {
                credential: None,
                generation: 0,
            }),
        }
    }

    /// Current access token, if one is held.
    pub async fn get(&self) -> Option<String> {
        let slot = self.slot.read().await;
        slot.credential.as_ref().map(|c| c.expose().clone())
    }

    /// Whether a credential is currently held.
    pub async fn is_present(&self) -> bool {
        self.slot.read().await.credential.is_some()
    }

    /// Install a new access token, replacing any previous one.
    pub async fn set(&self, token: String) {
        let mut slot = self.slot.write().await;
        slot.credential = Some(Secret::new(token));
        slot.generation += 1;
        debug!(generation = slot.generation, "access token installed");
    }

    /// Drop the held credential, if any.
    pub async fn clear(&self) {
        let mut slot = self.slot.write().await;
        if slot.credential.take().is_some() {
            slot.generation += 1;
            debug!(generation = slot.generation, "access token cleared");
        }
    }

    /// Change counter for the slot. Two equal readings mean no set/clear
    /// happened in between.
    pub async fn generation(&self) -> u64 {
        self.slot.read().await.generation
    }
}

impl Default for TokenHolder {
    fn default() -> Self {
        Self::new()
    }
}
