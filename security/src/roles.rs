// security/src/roles.rs

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use log::{info, warn};
use serde::{Deserialize, Serialize};

use models::medical::Role;

/// Navigation sections known to the front end.
pub const ALL_SECTIONS: &[&str] = &[
    "dashboard",
    "patients",
    "doctors",
    "departments",
    "appointments",
    "lab-tests",
    "lab-catalog",
    "wards",
    "beds",
    "admissions",
    "bills",
    "users",
];

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct RoleConfig {
    pub sections: Vec<String>,
}

/// Which menu sections each role is shown. Roles only drive navigation;
/// every logged-in user may call every API endpoint.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct RolesConfig {
    pub roles: HashMap<String, RoleConfig>,
}

fn sections(names: &[&str]) -> RoleConfig {
    RoleConfig {
        sections: names.iter().map(|name| name.to_string()).collect(),
    }
}

impl Default for RolesConfig {
    fn default() -> Self {
        let mut roles = HashMap::new();
        roles.insert(Role::Admin.to_string(), sections(ALL_SECTIONS));
        roles.insert(
            Role::Doctor.to_string(),
            sections(&["dashboard", "patients", "appointments", "lab-tests", "admissions"]),
        );
        roles.insert(
            Role::Nurse.to_string(),
            sections(&["dashboard", "patients", "wards", "beds", "admissions"]),
        );
        roles.insert(
            Role::LabStaff.to_string(),
            sections(&["dashboard", "lab-tests", "lab-catalog"]),
        );
        roles.insert(
            Role::Receptionist.to_string(),
            sections(&["dashboard", "patients", "doctors", "appointments", "bills"]),
        );
        roles.insert(
            Role::Patient.to_string(),
            sections(&["dashboard", "appointments", "bills"]),
        );
        RolesConfig { roles }
    }
}

impl RolesConfig {
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read roles file {}", path.display()))?;
        let config: RolesConfig = serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse roles file {}", path.display()))?;
        for name in config.roles.keys() {
            if name.parse::<Role>().is_err() {
                warn!("Roles file {} mentions unknown role '{}'", path.display(), name);
            }
        }
        Ok(config)
    }

    /// Reads the roles file when one is configured and present, otherwise
    /// falls back to the built-in mapping.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) if path.exists() => {
                info!("Loading role menus from {}", path.display());
                Self::from_yaml_file(path)
            }
            Some(path) => {
                warn!(
                    "Roles file {} not found, using built-in role menus",
                    path.display()
                );
                Ok(Self::default())
            }
            None => Ok(Self::default()),
        }
    }

    /// Sections visible to `role`; a role missing from the file sees only
    /// the dashboard.
    pub fn sections_for(&self, role: Role) -> Vec<String> {
        self.roles
            .get(role.as_str())
            .map(|config| config.sections.clone())
            .unwrap_or_else(|| vec!["dashboard".to_string()])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults_cover_every_role() {
        let config = RolesConfig::default();
        for role in Role::ALL {
            assert!(config.sections_for(*role).contains(&"dashboard".to_string()));
        }
        assert_eq!(config.sections_for(Role::Admin).len(), ALL_SECTIONS.len());
    }

    #[test]
    fn yaml_file_overrides_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "roles:\n  nurse:\n    sections: [dashboard, beds]\n  admin:\n    sections: [users]"
        )
        .unwrap();
        let config = RolesConfig::load_or_default(Some(file.path())).unwrap();
        assert_eq!(config.sections_for(Role::Nurse), vec!["dashboard", "beds"]);
        assert_eq!(config.sections_for(Role::Patient), vec!["dashboard"]);
    }

    #[test]
    fn missing_file_falls_back() {
        let config =
            RolesConfig::load_or_default(Some(Path::new("/definitely/not/here.yaml"))).unwrap();
        assert_eq!(config, RolesConfig::default());
    }
}
