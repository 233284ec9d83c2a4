pub mod google;

pub use google::GoogleProvider;

use crate::error::UserError;
use crate::oauth::types::{OAuthUserInfo, TokenResponse};
use async_trait::async_trait;
use oauth2::{
    AuthUrl, AuthorizationCode, ClientId, ClientSecret, CsrfToken, PkceCodeChallenge,
    PkceCodeVerifier, RedirectUrl, Scope, TokenResponse as OAuth2TokenResponse, TokenUrl,
    basic::BasicClient,
};

pub type OAuthResult<T> = Result<T, UserError>;

fn oauth_url<T>(
    build: impl FnOnce(String) -> Result<T, url::ParseError>,
    raw: &str,
    what: &str,
) -> OAuthResult<T> {
    build(raw.to_string()).map_err(|e| UserError::OAuth(format!("Invalid {}: {}", what, e)))
}

#[async_trait]
pub trait OAuthProvider: Send + Sync {
    fn name(&self) -> &str;

    fn required_scopes(&self) -> &'static [&'static str];

    fn auth_url(&self) -> &str;
    fn token_url(&self) -> &str;
    fn client_id(&self) -> &str;
    fn client_secret(&self) -> &str;
    fn http_client(&self) -> &reqwest::Client;

    /// Authorization URL with an S256 PKCE challenge derived from the verifier
    fn authorize_url(
        &self,
        state: &str,
        pkce_verifier: &str,
        redirect_uri: &str,
    ) -> OAuthResult<String> {
        let client = BasicClient::new(ClientId::new(self.client_id().to_string()))
            .set_client_secret(ClientSecret::new(self.client_secret().to_string()))
            .set_auth_uri(oauth_url(AuthUrl::new, self.auth_url(), "auth URL")?)
            .set_redirect_uri(oauth_url(RedirectUrl::new, redirect_uri, "redirect URL")?);

        let verifier = PkceCodeVerifier::new(pkce_verifier.to_string());
        let challenge = PkceCodeChallenge::from_code_verifier_sha256(&verifier);

        let request = self
            .required_scopes()
            .iter()
            .fold(
                client.authorize_url(|| CsrfToken::new(state.to_string())),
                |acc, scope| acc.add_scope(Scope::new(scope.to_string())),
            )
            .set_pkce_challenge(challenge);

        let (url, _) = request.url();
        Ok(url.to_string())
    }

    /// Exchange an authorization code for tokens, proving the PKCE verifier
    async fn exchange_code(
        &self,
        code: &str,
        pkce_verifier: &str,
        redirect_uri: &str,
    ) -> OAuthResult<TokenResponse> {
        let client = BasicClient::new(ClientId::new(self.client_id().to_string()))
            .set_client_secret(ClientSecret::new(self.client_secret().to_string()))
            .set_auth_uri(oauth_url(AuthUrl::new, self.auth_url(), "auth URL")?)
            .set_token_uri(oauth_url(TokenUrl::new, self.token_url(), "token URL")?)
            .set_redirect_uri(oauth_url(RedirectUrl::new, redirect_uri, "redirect URL")?);

        let token = client
            .exchange_code(AuthorizationCode::new(code.to_string()))
            .set_pkce_verifier(PkceCodeVerifier::new(pkce_verifier.to_string()))
            .request_async(self.http_client())
            .await
            .map_err(|e| UserError::OAuth(format!("Failed to exchange code: {}", e)))?;

        Ok(TokenResponse {
            access_token: token.access_token().secret().clone(),
            refresh_token: token.refresh_token().map(|t| t.secret().clone()),
            expires_in: token.expires_in().map(|d| d.as_secs()),
            token_type: "Bearer".to_string(),
        })
    }

    /// Fetch the account behind an access token
    async fn get_user_info(&self, access_token: &str) -> OAuthResult<OAuthUserInfo>;
}
