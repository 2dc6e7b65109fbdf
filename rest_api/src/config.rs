// rest_api/src/config.rs

use std::env;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use anyhow::{Context, Result};
use config::{Config, Environment, File, FileFormat};
use log::{info, warn};
use serde::{Deserialize, Serialize};

use lib::storage_engine::StorageConfig;
use models::medical::{IdentityProfile, Role};
use security::OidcSettings;

pub const DEFAULT_CONFIG_PATH: &str = "config/hospital.yaml";
pub const CONFIG_PATH_ENV: &str = "HMS_CONFIG";
pub const ENV_PREFIX: &str = "HMS";

/// Development fallback for `auth.session_secret`. Only accepted together
/// with the static provider.
pub const DEV_SESSION_SECRET: &str = "hms-development-secret-change-me-0123456789";

const REDACTED: &str = "********";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
    /// Browser origins allowed by CORS. Empty means any origin.
    pub allowed_origins: Vec<String>,
}

impl Default for ServerSettings {
    fn default() -> Self {
        ServerSettings {
            host: "127.0.0.1".to_string(),
            port: 8080,
            allowed_origins: Vec::new(),
        }
    }
}

/// Which identity provider answers `/api/login`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProviderKind {
    Oidc,
    Static,
}

impl FromStr for ProviderKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "oidc" => Ok(ProviderKind::Oidc),
            "static" => Ok(ProviderKind::Static),
            _ => Err(anyhow::anyhow!("Unknown identity provider: {}", s)),
        }
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProviderKind::Oidc => f.write_str("oidc"),
            ProviderKind::Static => f.write_str("static"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthSettings {
    pub provider: ProviderKind,
    /// Must be set for `provider: static`, which logs every visitor in as
    /// the static profile.
    pub allow_static_login: bool,
    pub authorize_url: String,
    pub token_url: String,
    pub userinfo_url: String,
    pub client_id: String,
    pub client_secret: String,
    pub redirect_url: String,
    pub scopes: Vec<String>,
    pub default_role: Role,
    pub session_secret: String,
    pub session_ttl_hours: i64,
    pub post_logout_redirect: String,
    pub roles_file: PathBuf,
    pub http_timeout_secs: u64,
    pub static_subject: String,
    pub static_email: String,
    pub static_given_name: String,
    pub static_family_name: String,
}

impl Default for AuthSettings {
    fn default() -> Self {
        AuthSettings {
            provider: ProviderKind::Oidc,
            allow_static_login: false,
            authorize_url: String::new(),
            token_url: String::new(),
            userinfo_url: String::new(),
            client_id: String::new(),
            client_secret: String::new(),
            redirect_url: "http://127.0.0.1:8080/api/callback".to_string(),
            scopes: vec!["openid".to_string(), "email".to_string(), "profile".to_string()],
            default_role: Role::Patient,
            session_secret: DEV_SESSION_SECRET.to_string(),
            session_ttl_hours: 24 * 7,
            post_logout_redirect: "/".to_string(),
            roles_file: PathBuf::from("config/roles.yaml"),
            http_timeout_secs: 10,
            static_subject: "dev|local-admin".to_string(),
            static_email: "admin@hospital.local".to_string(),
            static_given_name: "Local".to_string(),
            static_family_name: "Admin".to_string(),
        }
    }
}

impl AuthSettings {
    pub fn oidc(&self) -> OidcSettings {
        OidcSettings {
            authorize_url: self.authorize_url.clone(),
            token_url: self.token_url.clone(),
            userinfo_url: self.userinfo_url.clone(),
            client_id: self.client_id.clone(),
            client_secret: self.client_secret.clone(),
            redirect_url: self.redirect_url.clone(),
            scopes: self.scopes.clone(),
            http_timeout_secs: self.http_timeout_secs,
        }
    }

    /// The fixed profile handed out by the static provider.
    pub fn static_profile(&self) -> IdentityProfile {
        fn non_empty(value: &str) -> Option<String> {
            Some(value.trim().to_string()).filter(|v| !v.is_empty())
        }
        IdentityProfile {
            subject: self.static_subject.clone(),
            email: non_empty(&self.static_email),
            given_name: non_empty(&self.static_given_name),
            family_name: non_empty(&self.static_family_name),
            picture: None,
        }
    }
}

/// Effective service configuration.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub server: ServerSettings,
    pub storage: StorageConfig,
    pub auth: AuthSettings,
}

impl Settings {
    /// Layers built-in defaults, the YAML file and `HMS__*` environment
    /// variables, in that order. `.env` is read first.
    ///
    /// An explicitly given file must exist; the default path is optional.
    pub fn load(config_path: Option<&Path>) -> Result<Self> {
        if dotenv::dotenv().is_ok() {
            info!("Loaded environment from .env");
        }

        let explicit = config_path
            .map(Path::to_path_buf)
            .or_else(|| env::var(CONFIG_PATH_ENV).ok().map(PathBuf::from));
        let required = explicit.is_some();
        let path = explicit.unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH));

        let settings: Settings = Config::builder()
            .add_source(
                Config::try_from(&Settings::default())
                    .context("Failed to serialize default settings")?,
            )
            .add_source(
                File::from(path.clone())
                    .format(FileFormat::Yaml)
                    .required(required),
            )
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("__")
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("server.allowed_origins")
                    .with_list_parse_key("auth.scopes")
                    .try_parsing(true),
            )
            .build()
            .with_context(|| format!("Failed to load configuration from {}", path.display()))?
            .try_deserialize()
            .context("Failed to parse configuration")?;

        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<()> {
        if self.auth.session_secret.len() < 32 {
            anyhow::bail!("auth.session_secret must be at least 32 bytes long");
        }
        if self.auth.session_ttl_hours <= 0 {
            anyhow::bail!("auth.session_ttl_hours must be positive");
        }
        match self.auth.provider {
            ProviderKind::Static if !self.auth.allow_static_login => {
                anyhow::bail!(
                    "auth.provider static logs in anyone who asks; set auth.allow_static_login to use it"
                );
            }
            ProviderKind::Static => {
                warn!("Static identity provider enabled; do not expose this server");
            }
            ProviderKind::Oidc => self.validate_oidc()?,
        }
        if self.auth.session_secret == DEV_SESSION_SECRET {
            if self.auth.provider != ProviderKind::Static {
                anyhow::bail!(
                    "auth.session_secret is the built-in development secret; set HMS__AUTH__SESSION_SECRET"
                );
            }
            warn!("auth.session_secret is the built-in development secret");
        }
        Ok(())
    }

    fn validate_oidc(&self) -> Result<()> {
        for (name, value) in [
            ("auth.authorize_url", &self.auth.authorize_url),
            ("auth.token_url", &self.auth.token_url),
            ("auth.userinfo_url", &self.auth.userinfo_url),
            ("auth.client_id", &self.auth.client_id),
        ] {
            if value.trim().is_empty() {
                anyhow::bail!("{} is required for the oidc provider", name);
            }
        }
        Ok(())
    }

    /// A copy safe to print or log.
    pub fn redacted(&self) -> Settings {
        let mut copy = self.clone();
        if !copy.auth.client_secret.is_empty() {
            copy.auth.client_secret = REDACTED.to_string();
        }
        copy.auth.session_secret = REDACTED.to_string();
        copy
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}
