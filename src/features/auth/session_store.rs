use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;

use crate::core::error::Result;
use crate::features::auth::model::Session;
use crate::modules::civic_api::{CivicApi, UpstreamUser};

/// Session validated against the report service
struct CachedSession {
    session: Session,
    validated_at: Instant,
}

/// Owns the hydrate/teardown lifecycle of sessions.
///
/// Tokens are keyed by their SHA-256 digest and re-validated against
/// `/auth/me` once the cache TTL has elapsed.
pub struct SessionStore {
    api: Arc<dyn CivicApi>,
    cache: Arc<RwLock<HashMap<String, CachedSession>>>,
    ttl: Duration,
}

impl SessionStore {
    pub fn new(api: Arc<dyn CivicApi>, ttl: Duration) -> Self {
        Self {
            api,
            cache: Arc::new(RwLock::new(HashMap::new())),
            ttl,
        }
    }

    /// Resolve a bearer token into a session, validating it with the report service
    pub async fn hydrate(&self, token: &str) -> Result<Session> {
        let key = Self::cache_key(token);

        // Try to get from cache first
        {
            let cache = self.cache.read().await;
            if let Some(cached) = cache.get(&key) {
                if cached.validated_at.elapsed() < self.ttl {
                    return Ok(cached.session.clone());
                }
            }
        }

        let user = match self.api.me(token).await {
            Ok(user) => user,
            Err(e) => {
                // A rejected token must not keep a stale session alive
                self.cache.write().await.remove(&key);
                return Err(e);
            }
        };

        tracing::debug!("Session validated for user {}", user.id);
        Ok(self.store(key, Session::new(token, user)).await)
    }

    /// Record a session for a token the report service just issued
    pub async fn prime(&self, token: &str, user: UpstreamUser) -> Session {
        let session = Session::new(token, user);
        self.store(Self::cache_key(token), session).await
    }

    /// Forget the session for this token. Returns whether one was cached.
    pub async fn teardown(&self, token: &str) -> bool {
        let removed = self
            .cache
            .write()
            .await
            .remove(&Self::cache_key(token))
            .is_some();
        tracing::debug!("Session teardown (cached: {})", removed);
        removed
    }

    pub async fn len(&self) -> usize {
        self.cache.read().await.len()
    }

    async fn store(&self, key: String, session: Session) -> Session {
        let mut cache = self.cache.write().await;
        let ttl = self.ttl;
        cache.retain(|_, cached| cached.validated_at.elapsed() < ttl);
        cache.insert(
            key,
            CachedSession {
                session: session.clone(),
                validated_at: Instant::now(),
            },
        );
        session
    }

    fn cache_key(token: &str) -> String {
        hex::encode(Sha256::digest(token.as_bytes()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::AppError;
    use crate::shared::test_helpers::{citizen, FakeCivicApi};

    #[tokio::test]
    async fn test_hydrate_validates_once_within_ttl() {
        let api = Arc::new(FakeCivicApi::new().with_user("token-1", citizen(5)));
        let store = SessionStore::new(api.clone(), Duration::from_secs(60));

        let first = store.hydrate("token-1").await.unwrap();
        let second = store.hydrate("token-1").await.unwrap();

        assert_eq!(first.user_id(), 5);
        assert_eq!(second.token(), "token-1");
        assert_eq!(api.calls("me"), 1);
    }

    #[tokio::test]
    async fn test_expired_entry_is_revalidated() {
        let api = Arc::new(FakeCivicApi::new().with_user("token-1", citizen(5)));
        let store = SessionStore::new(api.clone(), Duration::ZERO);

        store.hydrate("token-1").await.unwrap();
        store.hydrate("token-1").await.unwrap();

        assert_eq!(api.calls("me"), 2);
    }

    #[tokio::test]
    async fn test_unknown_token_is_unauthorized() {
        let api = Arc::new(FakeCivicApi::new());
        let store = SessionStore::new(api, Duration::from_secs(60));

        let result = store.hydrate("nope").await;
        assert!(matches!(result, Err(AppError::Unauthorized(_))));
        assert_eq!(store.len().await, 0);
    }

    #[tokio::test]
    async fn test_teardown_forgets_session() {
        let api = Arc::new(FakeCivicApi::new());
        let store = SessionStore::new(api.clone(), Duration::from_secs(60));

        store.prime("fresh", citizen(9)).await;
        assert_eq!(store.hydrate("fresh").await.unwrap().user_id(), 9);
        assert_eq!(api.calls("me"), 0);

        assert!(store.teardown("fresh").await);
        assert!(!store.teardown("fresh").await);
        // Token no longer known upstream either
        assert!(store.hydrate("fresh").await.is_err());
    }
}
