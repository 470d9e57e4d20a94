use async_trait::async_trait;

use super::domain::{Credentials, SessionUser};
use super::errors::AuthError;

/// Repository abstraction for auth-related persistence.
#[async_trait]
pub trait AuthRepository: Send + Sync {
    async fn find_by_username(&self, username: &str) -> Result<Option<Credentials>, AuthError>;

    /// Current state of the employee behind a session.
    async fn find_by_ssn(&self, ssn: &str) -> Result<Option<SessionUser>, AuthError>;
}

/// Simple in-memory mock repository for tests and doc examples
pub mod mock {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Mutex;

    use crate::auth::password::hash_password;

    #[derive(Default)]
    pub struct MockAuthRepository {
        users: Mutex<HashMap<String, Credentials>>, // key: username
    }

    impl MockAuthRepository {
        /// Register `user` with a freshly hashed `password`.
        pub fn insert(&self, user: SessionUser, password: &str) -> Result<(), AuthError> {
            let password_hash = hash_password(password)?;
            let mut users = self.users.lock().map_err(|e| AuthError::Repository(e.to_string()))?;
            users.insert(user.username.clone(), Credentials { user, password_hash });
            Ok(())
        }

        /// Overwrite the stored user, keeping its password.
        pub fn replace(&self, user: SessionUser) -> Result<(), AuthError> {
            let mut users = self.users.lock().map_err(|e| AuthError::Repository(e.to_string()))?;
            if let Some(cred) = users.values_mut().find(|c| c.user.ssn == user.ssn) {
                cred.user = user;
            }
            Ok(())
        }

        pub fn remove(&self, ssn: &str) -> Result<(), AuthError> {
            let mut users = self.users.lock().map_err(|e| AuthError::Repository(e.to_string()))?;
            users.retain(|_, c| c.user.ssn != ssn);
            Ok(())
        }
    }

    #[async_trait]
    impl AuthRepository for MockAuthRepository {
        async fn find_by_username(&self, username: &str) -> Result<Option<Credentials>, AuthError> {
            let users = self.users.lock().map_err(|e| AuthError::Repository(e.to_string()))?;
            Ok(users.get(username).cloned())
        }

        async fn find_by_ssn(&self, ssn: &str) -> Result<Option<SessionUser>, AuthError> {
            let users = self.users.lock().map_err(|e| AuthError::Repository(e.to_string()))?;
            Ok(users.values().find(|c| c.user.ssn == ssn).map(|c| c.user.clone()))
        }
    }
}
