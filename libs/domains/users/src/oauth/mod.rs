pub mod providers;
pub mod state_manager;
pub mod types;

pub use providers::{GoogleProvider, OAuthProvider, OAuthResult};
pub use state_manager::OAuthStateManager;
pub use types::{OAuthCallbackParams, OAuthState, OAuthUserInfo, TokenResponse};
