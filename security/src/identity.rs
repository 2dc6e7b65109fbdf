// security/src/identity.rs

use std::time::Duration;

use async_trait::async_trait;
use log::{debug, error};
use reqwest::{Client, Url};
use serde::{Deserialize, Serialize};

use models::medical::IdentityProfile;

use crate::errors::AuthError;

/// The external login provider behind `/api/login` and `/api/callback`.
#[async_trait]
pub trait IdentityProvider: Send + Sync + 'static {
    /// Where to send the browser to log in, carrying our one-time `state`.
    fn authorize_url(&self, state: &str) -> Result<String, AuthError>;

    /// Exchanges the authorization `code` for the user's profile.
    async fn exchange_code(&self, code: &str) -> Result<IdentityProfile, AuthError>;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OidcSettings {
    pub authorize_url: String,
    pub token_url: String,
    pub userinfo_url: String,
    pub client_id: String,
    pub client_secret: String,
    pub redirect_url: String,
    pub scopes: Vec<String>,
    pub http_timeout_secs: u64,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

/// Standard OIDC userinfo claims we care about.
#[derive(Debug, Deserialize)]
struct UserInfo {
    sub: String,
    email: Option<String>,
    given_name: Option<String>,
    family_name: Option<String>,
    picture: Option<String>,
}

impl From<UserInfo> for IdentityProfile {
    fn from(info: UserInfo) -> Self {
        IdentityProfile {
            subject: info.sub,
            email: info.email,
            given_name: info.given_name,
            family_name: info.family_name,
            picture: info.picture,
        }
    }
}

/// OpenID Connect authorization-code flow over plain HTTP calls.
pub struct OidcProvider {
    client: Client,
    settings: OidcSettings,
}

impl OidcProvider {
    pub fn new(settings: OidcSettings) -> Result<Self, AuthError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(settings.http_timeout_secs))
            .build()
            .map_err(|e| AuthError::Configuration(format!("Failed to build HTTP client: {}", e)))?;
        Ok(OidcProvider { client, settings })
    }
}

#[async_trait]
impl IdentityProvider for OidcProvider {
    fn authorize_url(&self, state: &str) -> Result<String, AuthError> {
        let scope = self.settings.scopes.join(" ");
        let url = Url::parse_with_params(
            &self.settings.authorize_url,
            &[
                ("response_type", "code"),
                ("client_id", self.settings.client_id.as_str()),
                ("redirect_uri", self.settings.redirect_url.as_str()),
                ("scope", scope.as_str()),
                ("state", state),
            ],
        )
        .map_err(|e| AuthError::Configuration(format!("Invalid authorize URL: {}", e)))?;
        Ok(url.to_string())
    }

    async fn exchange_code(&self, code: &str) -> Result<IdentityProfile, AuthError> {
        debug!("Exchanging authorization code at {}", self.settings.token_url);
        let response = self
            .client
            .post(&self.settings.token_url)
            .form(&[
                ("grant_type", "authorization_code"),
                ("code", code),
                ("redirect_uri", self.settings.redirect_url.as_str()),
                ("client_id", self.settings.client_id.as_str()),
                ("client_secret", self.settings.client_secret.as_str()),
            ])
            .send()
            .await?;
        if !response.status().is_success() {
            error!("Token endpoint answered {}", response.status());
            return Err(AuthError::IdentityProvider(format!(
                "token endpoint returned {}",
                response.status()
            )));
        }
        let token: TokenResponse = response.json().await?;

        let response = self
            .client
            .get(&self.settings.userinfo_url)
            .bearer_auth(&token.access_token)
            .send()
            .await?;
        if !response.status().is_success() {
            error!("Userinfo endpoint answered {}", response.status());
            return Err(AuthError::IdentityProvider(format!(
                "userinfo endpoint returned {}",
                response.status()
            )));
        }
        let info: UserInfo = response.json().await?;
        Ok(info.into())
    }
}

/// Logs everyone in as one fixed profile without any network calls. Its
/// authorize URL points straight back at the callback.
#[derive(Debug, Clone)]
pub struct StaticIdentityProvider {
    profile: IdentityProfile,
    redirect_url: String,
}

impl StaticIdentityProvider {
    pub fn new(profile: IdentityProfile, redirect_url: impl Into<String>) -> Self {
        StaticIdentityProvider {
            profile,
            redirect_url: redirect_url.into(),
        }
    }
}

#[async_trait]
impl IdentityProvider for StaticIdentityProvider {
    fn authorize_url(&self, state: &str) -> Result<String, AuthError> {
        let url = Url::parse_with_params(&self.redirect_url, &[("code", "static"), ("state", state)])
            .map_err(|e| AuthError::Configuration(format!("Invalid redirect URL: {}", e)))?;
        Ok(url.to_string())
    }

    async fn exchange_code(&self, _code: &str) -> Result<IdentityProfile, AuthError> {
        Ok(self.profile.clone())
    }
}
