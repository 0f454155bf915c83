/// Google OAuth client
///
/// Implements the authorization-code flow: the browser is sent to
/// Google's consent page, comes back with a code, and the code is
/// exchanged server-side for an access token used to fetch the profile.
/// Token issuance afterwards is the same as password login.
use reqwest::Client as HttpClient;
use serde::Deserialize;

use crate::config::Config;
use crate::error::{AppError, AppResult};

const AUTH_URL: &str = "https://accounts.google.com/o/oauth2/v2/auth";
const TOKEN_URL: &str = "https://oauth2.googleapis.com/token";
const USERINFO_URL: &str = "https://www.googleapis.com/oauth2/v2/userinfo";

/// Profile fields returned by the userinfo endpoint
#[derive(Debug, Clone, Deserialize)]
pub struct GoogleUser {
    pub id: String,
    pub email: String,
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Clone)]
pub struct GoogleOAuth {
    http_client: HttpClient,
    client_id: String,
    client_secret: String,
    redirect_url: String,
}

impl GoogleOAuth {
    /// Builds the client when all three OAuth settings are present
    pub fn from_config(config: &Config) -> Option<Self> {
        let client_id = config.google_client_id.clone()?;
        let client_secret = config.google_client_secret.clone()?;
        let redirect_url = config.google_redirect_url.clone()?;

        Some(Self {
            http_client: HttpClient::new(),
            client_id,
            client_secret,
            redirect_url,
        })
    }

    /// Consent-page URL the browser is redirected to
    pub fn authorize_url(&self) -> String {
        format!(
            "{}?client_id={}&redirect_uri={}&response_type=code&scope=openid%20email%20profile",
            AUTH_URL, self.client_id, self.redirect_url
        )
    }

    /// Exchanges an authorization code for the account's Google profile
    pub async fn exchange_code(&self, code: &str) -> AppResult<GoogleUser> {
        #[derive(Deserialize)]
        struct TokenResponse {
            access_token: String,
        }

        let response = self
            .http_client
            .post(TOKEN_URL)
            .form(&[
                ("code", code),
                ("client_id", self.client_id.as_str()),
                ("client_secret", self.client_secret.as_str()),
                ("redirect_uri", self.redirect_url.as_str()),
                ("grant_type", "authorization_code"),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            tracing::error!(status = %status, body = %body, "Google token exchange failed");
            return Err(AppError::ExternalApi(format!(
                "Google token exchange returned status {}",
                status
            )));
        }

        let token: TokenResponse = response.json().await?;

        let response = self
            .http_client
            .get(USERINFO_URL)
            .bearer_auth(&token.access_token)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            return Err(AppError::ExternalApi(format!(
                "Google userinfo returned status {}",
                status
            )));
        }

        let user: GoogleUser = response.json().await?;

        tracing::info!(email = %user.email, "Google profile fetched");

        Ok(user)
    }
}
