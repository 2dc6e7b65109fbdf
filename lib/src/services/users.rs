// lib/src/services/users.rs

use log::info;

use models::medical::{IdentityProfile, Role, User};

use crate::database::Database;
use crate::errors::Result;

/// Accounts created from identity-provider logins.
#[derive(Debug, Clone)]
pub struct UserService {
    db: Database,
}

impl UserService {
    pub fn new(db: Database) -> Self {
        UserService { db }
    }

    /// Creates the user on first login, or refreshes the provider-owned
    /// profile fields on later logins. New users get `default_role`.
    pub fn upsert_from_profile(&self, profile: IdentityProfile, default_role: Role) -> Result<User> {
        let user = self.db.transaction(|uow| {
            let user = match uow.get::<User>(&profile.subject)? {
                Some(mut existing) => {
                    existing.refresh_profile(profile.clone());
                    existing
                }
                None => User::from_profile(profile.clone(), default_role),
            };
            uow.put(&user)?;
            Ok(user)
        })?;
        info!("User {} logged in with role {}", user.id, user.role);
        Ok(user)
    }

    pub fn get(&self, id: &str) -> Result<User> {
        self.db.fetch::<User>(id)
    }

    pub fn find(&self, id: &str) -> Result<Option<User>> {
        self.db.get::<User>(id)
    }

    pub fn list(&self) -> Result<Vec<User>> {
        self.db.list::<User>()
    }

    pub fn set_role(&self, id: &str, role: Role) -> Result<User> {
        let user = self.db.transaction(|uow| {
            let mut user = uow.fetch::<User>(id)?;
            user.role = role;
            user.updated_at = chrono::Utc::now();
            uow.put(&user)?;
            Ok(user)
        })?;
        info!("User {} role set to {}", user.id, role);
        Ok(user)
    }
}
