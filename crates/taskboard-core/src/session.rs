// File: src/session.rs
// Purpose: Current user identity and its asynchronous "ready" transition

use serde::{Deserialize, Serialize};
use tokio::sync::watch;
use uuid::Uuid;

/// Authenticated user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub user_id: Uuid,
    pub email: Option<String>,
}

impl Session {
    pub fn new(user_id: Uuid) -> Self {
        Self {
            user_id,
            email: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SessionState {
    /// Not known yet (initial session lookup still running)
    #[default]
    Loading,
    SignedOut,
    SignedIn(Session),
}

impl SessionState {
    pub fn is_loading(&self) -> bool {
        matches!(self, SessionState::Loading)
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self, SessionState::SignedIn(_))
    }

    pub fn session(&self) -> Option<&Session> {
        match self {
            SessionState::SignedIn(session) => Some(session),
            _ => None,
        }
    }

    pub fn user_id(&self) -> Option<Uuid> {
        self.session().map(|session| session.user_id)
    }
}

/// Source of the current session
#[allow(async_fn_in_trait)]
pub trait SessionProvider {
    /// Current state, possibly still `Loading`
    fn state(&self) -> SessionState;

    /// Wait until the state is no longer `Loading`
    async fn ready(&self) -> SessionState;
}

/// Provider with a fixed state
#[derive(Debug, Clone, Default)]
pub struct StaticSession {
    state: SessionState,
}

impl StaticSession {
    pub fn signed_in(session: Session) -> Self {
        Self {
            state: SessionState::SignedIn(session),
        }
    }

    pub fn signed_out() -> Self {
        Self {
            state: SessionState::SignedOut,
        }
    }
}

impl SessionProvider for StaticSession {
    fn state(&self) -> SessionState {
        self.state.clone()
    }

    async fn ready(&self) -> SessionState {
        match &self.state {
            // A fixed provider never leaves Loading
            SessionState::Loading => SessionState::SignedOut,
            state => state.clone(),
        }
    }
}

/// Provider updated by an auth listener
///
/// Starts in `Loading`; every [`publish`](Self::publish) replaces the state
/// and wakes waiters of [`ready`](SessionProvider::ready).
#[derive(Debug)]
pub struct WatchSession {
    tx: watch::Sender<SessionState>,
}

impl WatchSession {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(SessionState::Loading);
        Self { tx }
    }

    pub fn publish(&self, state: SessionState) {
        self.tx.send_replace(state);
    }

    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.tx.subscribe()
    }
}

impl Default for WatchSession {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionProvider for WatchSession {
    fn state(&self) -> SessionState {
        self.tx.borrow().clone()
    }

    async fn ready(&self) -> SessionState {
        let mut rx = self.tx.subscribe();
        let state = match rx.wait_for(|state| !state.is_loading()).await {
            Ok(state) => state.clone(),
            Err(_) => SessionState::SignedOut,
        };
        state
    }
}
