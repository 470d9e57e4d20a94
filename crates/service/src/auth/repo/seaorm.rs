use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter};

use crate::auth::domain::{Credentials, SessionUser};
use crate::auth::errors::AuthError;
use crate::auth::repository::AuthRepository;

pub struct SeaOrmAuthRepository {
    pub db: DatabaseConnection,
}

impl SeaOrmAuthRepository {
    pub fn new(db: DatabaseConnection) -> Self { Self { db } }
}

fn session_user(e: models::employee::Model) -> SessionUser {
    SessionUser {
        ssn: e.ssn,
        username: e.username,
        first_name: e.first_name,
        last_name: e.last_name,
        role: e.role,
        department: e.department,
    }
}

#[async_trait::async_trait]
impl AuthRepository for SeaOrmAuthRepository {
    async fn find_by_username(&self, username: &str) -> Result<Option<Credentials>, AuthError> {
        let res = models::employee::Entity::find()
            .filter(models::employee::Column::Username.eq(username))
            .one(&self.db)
            .await
            .map_err(|e| AuthError::Repository(e.to_string()))?;
        Ok(res.map(|e| {
            let password_hash = e.password_hash.clone();
            Credentials { user: session_user(e), password_hash }
        }))
    }

    async fn find_by_ssn(&self, ssn: &str) -> Result<Option<SessionUser>, AuthError> {
        let res = models::employee::Entity::find_by_id(ssn.to_string())
            .one(&self.db)
            .await
            .map_err(|e| AuthError::Repository(e.to_string()))?;
        Ok(res.map(session_user))
    }
}
