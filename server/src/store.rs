//! In-memory session store and the cookie middleware that binds each
//! request to a session.
//!
//! # Design
//! `update` runs its operation on the stored session while holding the write
//! lock, so overlapping requests from one client are applied one after the
//! other. `checkout` and `commit` copy a session out and back in; callers
//! that use them across a gap get last-write-wins.
//!
//! A session is stored only once an operation leaves it different from an
//! empty one, so cookieless page views and failed lookups store nothing.
//! Stored sessions expire after `SessionLimits::idle_timeout` without a
//! request, and the store never holds more than `max_sessions`; when full,
//! the least recently used session is dropped.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::{
    extract::Request,
    http::{header, HeaderMap, HeaderValue},
    middleware::Next,
    response::Response,
};
use todo_core::Session;
use tokio::sync::RwLock;
use uuid::Uuid;

pub const SESSION_COOKIE: &str = "todo_session";

/// Opaque per-client key, carried in the `todo_session` cookie.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SessionId(pub Uuid);

impl SessionId {
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionLimits {
    pub idle_timeout: Duration,
    pub max_sessions: usize,
}

impl Default for SessionLimits {
    fn default() -> Self {
        Self {
            idle_timeout: Duration::from_secs(60 * 60),
            max_sessions: 10_000,
        }
    }
}

#[derive(Debug)]
struct Entry {
    session: Session,
    last_seen: Instant,
}

impl Entry {
    fn is_idle(&self, now: Instant, timeout: Duration) -> bool {
        now.saturating_duration_since(self.last_seen) > timeout
    }
}

#[derive(Debug, Clone, Default)]
pub struct SessionStore {
    sessions: Arc<RwLock<HashMap<SessionId, Entry>>>,
    limits: SessionLimits,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_limits(limits: SessionLimits) -> Self {
        Self {
            sessions: Arc::default(),
            limits,
        }
    }

    /// Copy of the session's current state. Unknown or expired ids yield an
    /// empty session.
    pub async fn checkout(&self, id: SessionId) -> Session {
        let now = Instant::now();
        self.sessions
            .read()
            .await
            .get(&id)
            .filter(|entry| !entry.is_idle(now, self.limits.idle_timeout))
            .map(|entry| entry.session.clone())
            .unwrap_or_default()
    }

    /// Replace the stored session, discarding whatever was there.
    pub async fn commit(&self, id: SessionId, session: Session) {
        let mut sessions = self.sessions.write().await;
        self.admit(&mut sessions, id, session, Instant::now());
    }

    /// Run `apply` on the session in place under the write lock.
    pub async fn update<T>(&self, id: SessionId, apply: impl FnOnce(&mut Session) -> T) -> T {
        let mut sessions = self.sessions.write().await;
        let now = Instant::now();

        if let Some(entry) = sessions
            .get_mut(&id)
            .filter(|entry| !entry.is_idle(now, self.limits.idle_timeout))
        {
            entry.last_seen = now;
            return apply(&mut entry.session);
        }

        let mut session = Session::new();
        let output = apply(&mut session);
        if session != Session::new() {
            self.admit(&mut sessions, id, session, now);
        }
        output
    }

    /// Number of sessions held, including expired ones not yet swept.
    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    fn admit(
        &self,
        sessions: &mut HashMap<SessionId, Entry>,
        id: SessionId,
        session: Session,
        now: Instant,
    ) {
        if !sessions.contains_key(&id) {
            let before = sessions.len();
            sessions.retain(|_, entry| !entry.is_idle(now, self.limits.idle_timeout));
            if sessions.len() < before {
                tracing::debug!(expired = before - sessions.len(), "idle sessions swept");
            }

            if sessions.len() >= self.limits.max_sessions.max(1) {
                let oldest = sessions
                    .iter()
                    .min_by_key(|(_, entry)| entry.last_seen)
                    .map(|(oldest, _)| *oldest);
                if let Some(oldest) = oldest {
                    sessions.remove(&oldest);
                    tracing::debug!(session = %oldest, "session evicted");
                }
            }
            tracing::debug!(session = %id, "session stored");
        }
        sessions.insert(
            id,
            Entry {
                session,
                last_seen: now,
            },
        );
    }
}

/// Find the session id in the request's `Cookie` headers, if any.
pub fn session_cookie(headers: &HeaderMap) -> Option<SessionId> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == SESSION_COOKIE)
        .and_then(|(_, value)| Uuid::parse_str(value.trim()).ok())
        .map(SessionId)
}

fn set_cookie_value(id: SessionId) -> Option<HeaderValue> {
    HeaderValue::from_str(&format!(
        "{SESSION_COOKIE}={id}; Path=/; HttpOnly; SameSite=Lax"
    ))
    .ok()
}

/// Middleware: attach a `SessionId` extension to every request, minting one
/// and issuing its cookie when the request carries none.
pub async fn attach_session(mut request: Request, next: Next) -> Response {
    let (id, issued) = match session_cookie(request.headers()) {
        Some(id) => (id, false),
        None => (SessionId::generate(), true),
    };
    request.extensions_mut().insert(id);

    let mut response = next.run(request).await;
    if issued {
        if let Some(cookie) = set_cookie_value(id) {
            response.headers_mut().append(header::SET_COOKIE, cookie);
        }
    }
    response
}
