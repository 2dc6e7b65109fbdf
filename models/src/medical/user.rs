// models/src/medical/user.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::record::Record;

string_enum! {
    /// Staff and patient roles. A role only decides which sections of the
    /// application a user is shown.
    Role, "role" {
        Admin => "admin",
        Doctor => "doctor",
        Nurse => "nurse",
        LabStaff => "lab_staff",
        Receptionist => "receptionist",
        Patient => "patient",
    }
}

impl Default for Role {
    fn default() -> Self {
        Role::Patient
    }
}

/// The profile an identity provider hands back after a successful login.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentityProfile {
    pub subject: String,
    pub email: Option<String>,
    pub given_name: Option<String>,
    pub family_name: Option<String>,
    pub picture: Option<String>,
}

/// An account, keyed by the identity provider's subject id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub profile_image_url: Option<String>,
    pub role: Role,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Creates a user from a first login.
    pub fn from_profile(profile: IdentityProfile, role: Role) -> Self {
        let now = Utc::now();
        User {
            id: profile.subject,
            email: profile.email,
            first_name: profile.given_name,
            last_name: profile.family_name,
            profile_image_url: profile.picture,
            role,
            created_at: now,
            updated_at: now,
        }
    }

    /// Refreshes the provider-owned fields on a later login. The role is
    /// managed locally and left untouched.
    pub fn refresh_profile(&mut self, profile: IdentityProfile) {
        self.email = profile.email;
        self.first_name = profile.given_name;
        self.last_name = profile.family_name;
        self.profile_image_url = profile.picture;
        self.updated_at = Utc::now();
    }

    pub fn display_name(&self) -> String {
        match (&self.first_name, &self.last_name) {
            (Some(first), Some(last)) => format!("{} {}", first, last),
            (Some(name), None) | (None, Some(name)) => name.clone(),
            (None, None) => self.email.clone().unwrap_or_else(|| self.id.clone()),
        }
    }
}

impl Record for User {
    const KIND: &'static str = "users";
    const LABEL: &'static str = "user";

    fn key(&self) -> String {
        self.id.clone()
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile() -> IdentityProfile {
        IdentityProfile {
            subject: "auth0|42".to_string(),
            email: Some("ana@example.org".to_string()),
            given_name: Some("Ana".to_string()),
            family_name: Some("Lima".to_string()),
            picture: None,
        }
    }

    #[test]
    fn refresh_keeps_locally_assigned_role() {
        let mut user = User::from_profile(profile(), Role::Patient);
        user.role = Role::Nurse;
        let mut changed = profile();
        changed.email = Some("ana.lima@example.org".to_string());
        user.refresh_profile(changed);
        assert_eq!(user.role, Role::Nurse);
        assert_eq!(user.email.as_deref(), Some("ana.lima@example.org"));
    }

    #[test]
    fn roles_parse_from_their_wire_names() {
        assert_eq!("lab_staff".parse::<Role>(), Ok(Role::LabStaff));
        assert_eq!("ADMIN".parse::<Role>(), Ok(Role::Admin));
        assert!("janitor".parse::<Role>().is_err());
    }

    #[test]
    fn display_name_falls_back_to_email_then_subject() {
        let mut user = User::from_profile(profile(), Role::Admin);
        assert_eq!(user.display_name(), "Ana Lima");
        user.first_name = None;
        user.last_name = None;
        assert_eq!(user.display_name(), "ana@example.org");
        user.email = None;
        assert_eq!(user.display_name(), "auth0|42");
    }
}
