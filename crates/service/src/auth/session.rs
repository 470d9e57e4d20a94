use std::time::Duration;

use moka::future::Cache;
use uuid::Uuid;

use super::domain::SessionUser;

/// In-memory session table. Entries expire `ttl` after login.
#[derive(Clone)]
pub struct SessionStore {
    cache: Cache<String, SessionUser>,
}

impl SessionStore {
    pub fn new(ttl: Duration, capacity: u64) -> Self {
        let cache = Cache::builder().max_capacity(capacity).time_to_live(ttl).build();
        Self { cache }
    }

    /// Store `user` under a fresh v4 token and return the token.
    pub async fn open(&self, user: SessionUser) -> String {
        let token = Uuid::new_v4().to_string();
        self.cache.insert(token.clone(), user).await;
        token
    }

    pub async fn get(&self, token: &str) -> Option<SessionUser> {
        self.cache.get(token).await
    }

    pub async fn close(&self, token: &str) {
        self.cache.invalidate(token).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use models::enums::{Department, Role};

    fn user() -> SessionUser {
        SessionUser {
            ssn: "1234010190".into(),
            username: "max.mustermann".into(),
            first_name: "Max".into(),
            last_name: "Mustermann".into(),
            role: Role::Employee,
            department: Department::Crew,
        }
    }

    #[tokio::test]
    async fn open_get_close() {
        let store = SessionStore::new(Duration::from_secs(60), 10);
        let token = store.open(user()).await;
        assert!(Uuid::parse_str(&token).is_ok());
        assert_eq!(store.get(&token).await, Some(user()));
        store.close(&token).await;
        assert_eq!(store.get(&token).await, None);
    }

    #[tokio::test]
    async fn sessions_expire() {
        let store = SessionStore::new(Duration::from_millis(50), 10);
        let token = store.open(user()).await;
        tokio::time::sleep(Duration::from_millis(120)).await;
        assert_eq!(store.get(&token).await, None);
    }

    #[tokio::test]
    async fn unknown_token_has_no_session() {
        let store = SessionStore::new(Duration::from_secs(60), 10);
        assert_eq!(store.get("not-a-token").await, None);
    }
}
