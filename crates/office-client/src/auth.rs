use std::sync::Arc;

use office_types::{LoginRequest, LoginUser, Validate};
use tracing::{info, warn};

use crate::api::ApiClient;
use crate::error::ClientError;
use crate::session::{AuthStatus, SessionGuard, SessionUser};
use crate::transport::Transport;

/// Exchanges credentials for a bearer token and hands it to the guard.
pub struct AuthService<T> {
    api: Arc<ApiClient<T>>,
    session: SessionGuard,
    login_path: String,
}

impl<T: Transport> AuthService<T> {
    pub fn new(api: Arc<ApiClient<T>>, session: SessionGuard, loginPath: impl Into<String>) -> Self {
        Self {
            api,
            session,
            login_path: loginPath.into(),
        }
    }

    pub async fn login(&self, credentials: &LoginRequest) -> Result<Option<SessionUser>, ClientError> {
        credentials.validate()?;

        let response = self
            .api
            .post::<_, LoginUser>(&self.login_path, credentials)
            .await
            .inspect_err(|e| warn!("login for {} failed: {e}", credentials.username))?;

        let token = response.token.ok_or(ClientError::MissingData {
            status: response.status,
        })?;
        let user = response.data.map(|data| SessionUser {
            username: data.username,
            role: data.role,
        });

        match self.session.set_session(Some(token), user) {
            AuthStatus::Authenticated => {
                info!("{} signed in", credentials.username);
                Ok(self.session.user())
            }
            _ => Err(ClientError::InvalidToken(
                "issued token is malformed or already expired".into(),
            )),
        }
    }

    pub fn logout(&self) {
        self.session.logout();
    }

    pub fn session(&self) -> &SessionGuard {
        &self.session
    }
}
