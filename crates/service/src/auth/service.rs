use std::sync::Arc;
use std::time::Duration;

use models::enums::Role;
use tracing::{debug, info, instrument, warn};

use super::domain::{AuthSession, LoginInput, SessionUser};
use super::errors::AuthError;
use super::password::verify_password;
use super::repository::AuthRepository;
use super::session::SessionStore;

/// Auth business service independent of web framework
pub struct AuthService<R: AuthRepository> {
    repo: Arc<R>,
    sessions: SessionStore,
}

impl<R: AuthRepository> AuthService<R> {
    pub fn new(repo: Arc<R>, session_ttl: Duration, session_capacity: u64) -> Self {
        Self { repo, sessions: SessionStore::new(session_ttl, session_capacity) }
    }

    /// Check a username/password pair and open a session.
    ///
    /// # Examples
    /// ```
    /// use std::{sync::Arc, time::Duration};
    /// use models::enums::{Department, Role};
    /// use service::auth::{AuthService, domain::{LoginInput, SessionUser}, repository::mock::MockAuthRepository};
    /// let repo = Arc::new(MockAuthRepository::default());
    /// repo.insert(SessionUser {
    ///     ssn: "1234010190".into(), username: "max.mustermann".into(),
    ///     first_name: "Max".into(), last_name: "Mustermann".into(),
    ///     role: Role::Admin, department: Department::Crew,
    /// }, "Passw0rd!").unwrap();
    /// let svc = AuthService::new(repo, Duration::from_secs(60), 100);
    /// let input = LoginInput { username: Some("max.mustermann".into()), password: Some("Passw0rd!".into()) };
    /// let session = tokio_test::block_on(svc.login(input)).unwrap();
    /// assert_eq!(session.user.role, Role::Admin);
    /// ```
    #[instrument(skip(self, input), fields(username = ?input.username))]
    pub async fn login(&self, input: LoginInput) -> Result<AuthSession, AuthError> {
        let (Some(username), Some(password)) = (input.username, input.password) else {
            return Err(AuthError::Validation("username and password are required".into()));
        };
        let username = username.trim();
        if username.is_empty() || password.is_empty() {
            return Err(AuthError::Validation("username and password are required".into()));
        }

        let Some(cred) = self.repo.find_by_username(username).await? else {
            debug!("unknown username");
            return Err(AuthError::InvalidCredentials);
        };
        if !verify_password(&password, &cred.password_hash)? {
            warn!(username, "login_rejected");
            return Err(AuthError::InvalidCredentials);
        }

        let token = self.sessions.open(cred.user.clone()).await;
        info!(username, role = ?cred.user.role, "login_succeeded");
        Ok(AuthSession { token, user: cred.user })
    }

    pub async fn logout(&self, token: &str) {
        self.sessions.close(token).await;
        info!("logout");
    }

    /// Resolve a token to the employee's current record. Sessions of deleted
    /// employees are closed; role and department changes apply immediately.
    pub async fn authenticate(&self, token: &str) -> Result<SessionUser, AuthError> {
        let session = self.sessions.get(token).await.ok_or(AuthError::Unauthorized)?;
        match self.repo.find_by_ssn(&session.ssn).await? {
            Some(current) => Ok(current),
            None => {
                self.sessions.close(token).await;
                warn!(ssn = %session.ssn, "session_revoked");
                Err(AuthError::Unauthorized)
            }
        }
    }

    /// Admins pass every role check; employees only pass `Role::Employee`.
    pub fn require_role(user: &SessionUser, required: Role) -> Result<(), AuthError> {
        match (user.role, required) {
            (Role::Admin, _) | (Role::Employee, Role::Employee) => Ok(()),
            _ => Err(AuthError::Forbidden),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::repository::mock::MockAuthRepository;
    use models::enums::Department;

    fn eva() -> SessionUser {
        SessionUser {
            ssn: "1234010190".into(),
            username: "eva.employee".into(),
            first_name: "Eva".into(),
            last_name: "Employee".into(),
            role: Role::Employee,
            department: Department::Maintenance,
        }
    }

    fn svc_with_repo() -> (AuthService<MockAuthRepository>, Arc<MockAuthRepository>) {
        let repo = Arc::new(MockAuthRepository::default());
        repo.insert(eva(), "Passw0rd!").unwrap();
        (AuthService::new(Arc::clone(&repo), Duration::from_secs(60), 100), repo)
    }

    fn svc() -> AuthService<MockAuthRepository> {
        svc_with_repo().0
    }

    fn input(u: Option<&str>, p: Option<&str>) -> LoginInput {
        LoginInput { username: u.map(Into::into), password: p.map(Into::into) }
    }

    #[tokio::test]
    async fn login_then_authenticate_then_logout() {
        let svc = svc();
        let session = svc.login(input(Some("eva.employee"), Some("Passw0rd!"))).await.unwrap();
        let user = svc.authenticate(&session.token).await.unwrap();
        assert_eq!(user.ssn, "1234010190");
        svc.logout(&session.token).await;
        assert!(matches!(svc.authenticate(&session.token).await, Err(AuthError::Unauthorized)));
    }

    #[tokio::test]
    async fn sessions_follow_role_changes_and_deletion() {
        let (svc, repo) = svc_with_repo();
        let session = svc.login(input(Some("eva.employee"), Some("Passw0rd!"))).await.unwrap();

        repo.replace(SessionUser { role: Role::Admin, ..eva() }).unwrap();
        assert_eq!(svc.authenticate(&session.token).await.unwrap().role, Role::Admin);

        repo.remove("1234010190").unwrap();
        assert!(matches!(svc.authenticate(&session.token).await, Err(AuthError::Unauthorized)));
        // the session is gone for good, even if the ssn comes back
        repo.insert(eva(), "Passw0rd!").unwrap();
        assert!(matches!(svc.authenticate(&session.token).await, Err(AuthError::Unauthorized)));
    }

    #[tokio::test]
    async fn wrong_password_and_unknown_user_look_the_same() {
        let svc = svc();
        let bad_pw = svc.login(input(Some("eva.employee"), Some("nope-nope"))).await.unwrap_err();
        let bad_user = svc.login(input(Some("ghost"), Some("Passw0rd!"))).await.unwrap_err();
        assert_eq!(bad_pw.to_string(), "Incorrect username or password");
        assert_eq!(bad_pw.to_string(), bad_user.to_string());
    }

    #[tokio::test]
    async fn missing_fields_are_validation_errors() {
        let svc = svc();
        assert!(matches!(svc.login(input(None, Some("x"))).await, Err(AuthError::Validation(_))));
        assert!(matches!(svc.login(input(Some("eva.employee"), None)).await, Err(AuthError::Validation(_))));
    }

    #[test]
    fn employees_cannot_act_as_admin() {
        let mut user = SessionUser {
            ssn: "1234010190".into(),
            username: "u".into(),
            first_name: "U".into(),
            last_name: "V".into(),
            role: Role::Employee,
            department: Department::Crew,
        };
        assert!(AuthService::<MockAuthRepository>::require_role(&user, Role::Employee).is_ok());
        assert!(matches!(
            AuthService::<MockAuthRepository>::require_role(&user, Role::Admin),
            Err(AuthError::Forbidden)
        ));
        user.role = Role::Admin;
        assert!(AuthService::<MockAuthRepository>::require_role(&user, Role::Admin).is_ok());
    }
}
