use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use std::time::{Duration, Instant};

use actix_web::cookie::{time, Cookie};
use actix_web::HttpRequest;
use uuid::Uuid;

pub const SESSION_COOKIE: &str = "runclub_session";
pub const SESSION_TTL: Duration = Duration::from_secs(7 * 24 * 60 * 60);

#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    pub user_id: i64,
}

struct Entry {
    session: Session,
    created_at: Instant,
}

/// Logged-in sessions, keyed by the id carried in [`SESSION_COOKIE`].
///
/// A session lives for the store's TTL from login. Expired entries read as
/// absent and are swept out whenever a new session is created, so the map
/// holds at most the sessions started within one TTL. Nothing survives a
/// restart.
#[derive(Clone)]
pub struct SessionStore {
    sessions: Arc<RwLock<HashMap<String, Entry>>>,
    ttl: Duration,
}

impl Default for SessionStore {
    fn default() -> Self {
        SessionStore::with_ttl(SESSION_TTL)
    }
}

impl SessionStore {
    pub fn new() -> Self {
        SessionStore::default()
    }

    pub fn with_ttl(ttl: Duration) -> Self {
        SessionStore {
            sessions: Arc::default(),
            ttl,
        }
    }

    pub fn create(&self, user_id: i64) -> String {
        let id = Uuid::new_v4().to_string();
        let mut sessions = self.sessions.write().unwrap_or_else(|e| e.into_inner());
        let ttl = self.ttl;
        sessions.retain(|_, entry| entry.created_at.elapsed() < ttl);
        sessions.insert(
            id.clone(),
            Entry {
                session: Session { user_id },
                created_at: Instant::now(),
            },
        );
        id
    }

    pub fn get(&self, id: &str) -> Option<Session> {
        let sessions = self.sessions.read().unwrap_or_else(|e| e.into_inner());
        sessions
            .get(id)
            .filter(|entry| entry.created_at.elapsed() < self.ttl)
            .map(|entry| entry.session.clone())
    }

    pub fn remove(&self, id: &str) -> Option<Session> {
        let mut sessions = self.sessions.write().unwrap_or_else(|e| e.into_inner());
        sessions.remove(id).map(|entry| entry.session)
    }

    /// The session named by the request's cookie, if it is still live.
    pub fn for_request(&self, req: &HttpRequest) -> Option<Session> {
        req.cookie(SESSION_COOKIE)
            .and_then(|cookie| self.get(cookie.value()))
    }
}

pub fn session_cookie(id: String) -> Cookie<'static> {
    Cookie::build(SESSION_COOKIE, id)
        .path("/")
        .http_only(true)
        .max_age(time::Duration::seconds(SESSION_TTL.as_secs() as i64))
        .finish()
}

pub fn expired_cookie() -> Cookie<'static> {
    Cookie::build(SESSION_COOKIE, "")
        .path("/")
        .http_only(true)
        .max_age(time::Duration::ZERO)
        .finish()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_get_remove() {
        let store = SessionStore::new();
        let id = store.create(3);
        assert_eq!(store.get(&id), Some(Session { user_id: 3 }));
        assert_eq!(store.remove(&id), Some(Session { user_id: 3 }));
        assert_eq!(store.get(&id), None);
    }

    #[test]
    fn ids_are_unique() {
        let store = SessionStore::new();
        assert_ne!(store.create(1), store.create(1));
    }

    #[test]
    fn clones_share_sessions() {
        let store = SessionStore::new();
        let id = store.clone().create(5);
        assert_eq!(store.get(&id).map(|s| s.user_id), Some(5));
    }

    #[test]
    fn expired_sessions_are_gone() {
        let store = SessionStore::with_ttl(Duration::ZERO);
        let id = store.create(8);
        assert_eq!(store.get(&id), None);
    }

    #[test]
    fn expired_sessions_are_swept_on_create() {
        let store = SessionStore::with_ttl(Duration::ZERO);
        for user_id in 0..100 {
            store.create(user_id);
        }
        assert_eq!(store.sessions.read().unwrap().len(), 1);
    }

    #[test]
    fn cookie_lasts_as_long_as_the_session() {
        let cookie = session_cookie("abc".to_string());
        assert_eq!(
            cookie.max_age(),
            Some(time::Duration::seconds(SESSION_TTL.as_secs() as i64))
        );
    }
}
