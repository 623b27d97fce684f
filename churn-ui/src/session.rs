//! Per-browser session state
//!
//! A browser gets a random session id in a cookie the first time it stores
//! a prediction. The store keeps the latest prediction for that id only, so
//! concurrent users never see each other's results. Reads never create a
//! session. Idle sessions are dropped after the configured TTL.

use axum::http::{header, HeaderMap, HeaderValue};
use axum::response::Response;
use chrono::{DateTime, Utc};
use churn_common::PredictionResult;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tracing::debug;
use uuid::Uuid;

/// Name of the session cookie
pub const SESSION_COOKIE: &str = "churn_session";

#[derive(Debug, Clone)]
struct SessionEntry {
    prediction: PredictionResult,
    last_seen: DateTime<Utc>,
}

/// Session the current request belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionHandle {
    pub id: Uuid,
    /// The cookie must be (re)issued
    pub is_new: bool,
}

impl SessionHandle {
    /// `Set-Cookie` value for this session
    pub fn cookie(&self) -> String {
        format!("{}={}; Path=/; HttpOnly; SameSite=Lax", SESSION_COOKIE, self.id)
    }

    /// Attach the session cookie to a response when the session is new
    pub fn apply(&self, mut response: Response) -> Response {
        if self.is_new {
            if let Ok(value) = HeaderValue::from_str(&self.cookie()) {
                response.headers_mut().append(header::SET_COOKIE, value);
            }
        }
        response
    }
}

/// Read the session id from the request's `Cookie` headers
pub fn session_id_from_headers(headers: &HeaderMap) -> Option<Uuid> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|cookies| cookies.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == SESSION_COOKIE)
        .and_then(|(_, value)| Uuid::parse_str(value.trim()).ok())
}

/// Session-keyed prediction slots
#[derive(Clone)]
pub struct SessionStore {
    inner: Arc<RwLock<HashMap<Uuid, SessionEntry>>>,
    ttl: chrono::Duration,
}

impl SessionStore {
    pub fn new(ttl: Duration) -> Self {
        Self {
            inner: Arc::new(RwLock::new(HashMap::new())),
            ttl: chrono::Duration::from_std(ttl).unwrap_or_else(|_| chrono::Duration::hours(1)),
        }
    }

    /// Live session named by the request's cookie. Never creates one.
    pub async fn find(&self, headers: &HeaderMap) -> Option<Uuid> {
        let id = session_id_from_headers(headers)?;
        let now = Utc::now();
        let mut sessions = self.inner.write().await;

        let live = sessions
            .get(&id)
            .map(|entry| now - entry.last_seen <= self.ttl)?;
        if live {
            if let Some(entry) = sessions.get_mut(&id) {
                entry.last_seen = now;
            }
            Some(id)
        } else {
            sessions.remove(&id);
            debug!(session_id = %id, "Expired session dropped");
            None
        }
    }

    /// Latest prediction stored for the session with this id
    pub async fn prediction(&self, id: Uuid) -> Option<PredictionResult> {
        self.inner.read().await.get(&id).map(|entry| entry.prediction)
    }

    /// Latest prediction for the request's session, if it has one
    pub async fn latest(&self, headers: &HeaderMap) -> Option<PredictionResult> {
        let id = self.find(headers).await?;
        self.prediction(id).await
    }

    /// Replace the prediction of the request's session.
    ///
    /// Requests without a live session get a new one with a fresh id.
    pub async fn store_prediction(
        &self,
        headers: &HeaderMap,
        result: PredictionResult,
    ) -> SessionHandle {
        let now = Utc::now();
        let mut sessions = self.inner.write().await;

        if let Some(id) = session_id_from_headers(headers) {
            if let Some(entry) = sessions.get_mut(&id) {
                if now - entry.last_seen <= self.ttl {
                    entry.prediction = result;
                    entry.last_seen = now;
                    return SessionHandle { id, is_new: false };
                }
            }
        }

        let ttl = self.ttl;
        let before = sessions.len();
        sessions.retain(|_, entry| now - entry.last_seen <= ttl);
        if sessions.len() < before {
            debug!(evicted = before - sessions.len(), "Expired sessions evicted");
        }

        let id = Uuid::new_v4();
        sessions.insert(
            id,
            SessionEntry {
                prediction: result,
                last_seen: now,
            },
        );
        debug!(session_id = %id, active = sessions.len(), "Session created");
        SessionHandle { id, is_new: true }
    }

    /// Number of live sessions
    pub async fn active_count(&self) -> usize {
        self.inner.read().await.len()
    }
}
