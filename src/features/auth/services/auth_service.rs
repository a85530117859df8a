use std::sync::Arc;

use crate::core::error::Result;
use crate::features::auth::dtos::{
    AuthResponseDto, LoginRequestDto, LogoutResponseDto, SignupRequestDto, UserDto,
};
use crate::features::auth::model::Session;
use crate::features::auth::SessionStore;
use crate::modules::civic_api::{CivicApi, TokenResponse};

/// Forwards credentials to the report service and keeps the session cache in step
pub struct AuthService {
    api: Arc<dyn CivicApi>,
    sessions: Arc<SessionStore>,
}

impl AuthService {
    pub fn new(api: Arc<dyn CivicApi>, sessions: Arc<SessionStore>) -> Self {
        Self { api, sessions }
    }

    pub async fn signup(&self, dto: SignupRequestDto) -> Result<AuthResponseDto> {
        let token = self.api.signup(&dto.into()).await?;
        tracing::info!("Citizen {} signed up", token.user.id);
        Ok(self.start_session(token).await)
    }

    pub async fn login(&self, dto: LoginRequestDto) -> Result<AuthResponseDto> {
        let token = self.api.login(&dto.into()).await?;
        tracing::info!("User {} logged in as {:?}", token.user.id, token.user.role);
        Ok(self.start_session(token).await)
    }

    pub fn current_user(&self, session: Session) -> UserDto {
        session.user.into()
    }

    pub async fn logout(&self, session: &Session) -> LogoutResponseDto {
        let session_cleared = self.sessions.teardown(session.token()).await;
        tracing::info!("User {} logged out", session.user_id());
        LogoutResponseDto { session_cleared }
    }

    async fn start_session(&self, token: TokenResponse) -> AuthResponseDto {
        self.sessions
            .prime(&token.access_token, token.user.clone())
            .await;
        tracing::debug!("{} sessions cached", self.sessions.len().await);
        token.into()
    }
}
