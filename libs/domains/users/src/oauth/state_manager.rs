use crate::error::UserError;
use crate::oauth::types::OAuthState;
use oauth2::PkceCodeChallenge;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use uuid::Uuid;

/// How long an authorization may stay pending (10 minutes)
pub const STATE_TTL: Duration = Duration::from_secs(600);

/// Pending OAuth states and PKCE verifiers, held in process memory.
///
/// Each state can be consumed once. Entries older than the TTL are treated
/// as missing and pruned on the next insert.
#[derive(Clone)]
pub struct OAuthStateManager {
    pending: Arc<Mutex<HashMap<String, (OAuthState, Instant)>>>,
    ttl: Duration,
}

impl Default for OAuthStateManager {
    fn default() -> Self {
        Self::with_ttl(STATE_TTL)
    }
}

impl OAuthStateManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_ttl(ttl: Duration) -> Self {
        Self {
            pending: Arc::new(Mutex::new(HashMap::new())),
            ttl,
        }
    }

    /// Random state parameter for CSRF protection
    pub fn generate_state(&self) -> String {
        Uuid::new_v4().simple().to_string()
    }

    /// PKCE verifier; the challenge is derived from it when building the URL
    pub fn generate_pkce_verifier(&self) -> String {
        let (_challenge, verifier) = PkceCodeChallenge::new_random_sha256();
        verifier.secret().clone()
    }

    pub async fn store_state(&self, oauth_state: OAuthState) {
        let mut pending = self.pending.lock().await;
        let ttl = self.ttl;
        pending.retain(|_, (_, created)| created.elapsed() < ttl);
        pending.insert(oauth_state.state.clone(), (oauth_state, Instant::now()));
    }

    /// Removes and returns the state; replays and expired states fail.
    pub async fn verify_and_consume_state(&self, state: &str) -> Result<OAuthState, UserError> {
        let entry = self.pending.lock().await.remove(state);
        match entry {
            Some((oauth_state, created)) if created.elapsed() < self.ttl => Ok(oauth_state),
            _ => Err(UserError::OAuth(
                "Invalid or expired OAuth state".to_string(),
            )),
        }
    }

    pub async fn pending_count(&self) -> usize {
        self.pending.lock().await.len()
    }
}
