//! Single owner of the current `GameState`.
//!
//! Every request that may install a state takes a [`RequestTicket`] before it
//! is sent. A response is applied only if its ticket is newer than the one
//! behind the state currently installed, so a slow response can never
//! overwrite the result of a request issued after it.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use theatre_domain::GameState;
use tokio::sync::RwLock;

/// Monotonic stamp taken when a request is issued.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RequestTicket(u64);

impl RequestTicket {
    pub fn sequence(&self) -> u64 {
        self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApplyOutcome {
    Applied { script_changed: bool },
    /// A newer response was already installed; this one was dropped.
    Stale,
}

impl ApplyOutcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, Self::Applied { .. })
    }

    pub fn script_changed(&self) -> bool {
        matches!(self, Self::Applied { script_changed: true })
    }
}

#[derive(Debug, Default)]
struct Slot {
    state: Option<GameState>,
    applied: Option<RequestTicket>,
    version: u64,
}

#[derive(Debug, Clone, Default)]
pub struct GameStore {
    next_ticket: Arc<AtomicU64>,
    slot: Arc<RwLock<Slot>>,
}

impl GameStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn begin_request(&self) -> RequestTicket {
        RequestTicket(self.next_ticket.fetch_add(1, Ordering::SeqCst) + 1)
    }

    /// Install `state` unless a response to a later request already landed.
    pub async fn apply(&self, ticket: RequestTicket, state: GameState) -> ApplyOutcome {
        let mut slot = self.slot.write().await;
        if slot.applied.is_some_and(|applied| applied >= ticket) {
            tracing::debug!(
                ticket = ticket.sequence(),
                applied = slot.applied.map(|t| t.sequence()),
                "Discarding stale game state"
            );
            return ApplyOutcome::Stale;
        }

        let script_changed = match &slot.state {
            Some(current) => current.script.id != state.script.id,
            None => true,
        };
        tracing::debug!(
            ticket = ticket.sequence(),
            id = %state.id,
            scene_cnt = state.scene_cnt,
            "Installing game state"
        );
        slot.state = Some(state);
        slot.applied = Some(ticket);
        slot.version += 1;
        ApplyOutcome::Applied { script_changed }
    }

    /// Unconditional local install (new script, saved draft).
    pub async fn replace(&self, state: GameState) -> ApplyOutcome {
        let ticket = self.begin_request();
        self.apply(ticket, state).await
    }

    pub async fn snapshot(&self) -> Option<GameState> {
        self.slot.read().await.state.clone()
    }

    /// Bumped on every install; lets side-channel caches spot staleness.
    pub async fn version(&self) -> u64 {
        self.slot.read().await.version
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state(id: &str, scene_cnt: i64) -> GameState {
        let mut state = GameState::new_script();
        state.id = id.to_string();
        state.script.id = id.to_string();
        state.scene_cnt = scene_cnt;
        state
    }

    #[tokio::test]
    async fn older_response_never_overwrites_newer() {
        let store = GameStore::new();
        let first = store.begin_request();
        let second = store.begin_request();

        assert!(store.apply(second, state("hp", 2)).await.is_applied());
        assert_eq!(store.apply(first, state("hp", 1)).await, ApplyOutcome::Stale);

        assert_eq!(store.snapshot().await.unwrap().scene_cnt, 2);
        assert_eq!(store.version().await, 1);
    }

    #[tokio::test]
    async fn in_order_responses_all_apply() {
        let store = GameStore::new();
        let a = store.begin_request();
        let b = store.begin_request();
        assert!(store.apply(a, state("hp", 1)).await.is_applied());
        assert!(store.apply(b, state("hp", 2)).await.is_applied());
        assert_eq!(store.version().await, 2);
    }

    #[tokio::test]
    async fn reports_script_change() {
        let store = GameStore::new();
        assert!(store.replace(state("hp", 1)).await.script_changed());
        assert!(!store.replace(state("hp", 2)).await.script_changed());
        assert!(store.replace(state("romeo", 1)).await.script_changed());
    }

    #[tokio::test]
    async fn local_replace_supersedes_in_flight_request() {
        let store = GameStore::new();
        let in_flight = store.begin_request();
        store.replace(GameState::new_script()).await;
        assert_eq!(store.apply(in_flight, state("hp", 3)).await, ApplyOutcome::Stale);
        assert_eq!(store.snapshot().await.unwrap().id, "new-script");
    }
}
