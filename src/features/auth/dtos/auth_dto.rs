use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::modules::civic_api::{LoginPayload, SignupPayload, TokenResponse, UpstreamUser, UserRole};

/// Request DTO for citizen signup
#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
pub struct SignupRequestDto {
    #[validate(length(min = 1, max = 100, message = "Name must be 1-100 characters"))]
    pub name: String,

    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    pub password: String,

    #[validate(length(max = 100, message = "Ward must be at most 100 characters"))]
    pub ward: Option<String>,
}

impl From<SignupRequestDto> for SignupPayload {
    fn from(dto: SignupRequestDto) -> Self {
        Self {
            name: dto.name.trim().to_string(),
            email: dto.email.trim().to_lowercase(),
            password: dto.password,
            ward: dto
                .ward
                .map(|w| w.trim().to_string())
                .filter(|w| !w.is_empty()),
        }
    }
}

/// Request DTO for user login
#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
pub struct LoginRequestDto {
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

impl From<LoginRequestDto> for LoginPayload {
    fn from(dto: LoginRequestDto) -> Self {
        Self {
            email: dto.email.trim().to_lowercase(),
            password: dto.password,
        }
    }
}

/// Response DTO for signup/login
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct AuthResponseDto {
    /// Bearer token issued by the report service
    pub access_token: String,
    /// Token type (always "bearer")
    pub token_type: String,
    pub user: UserDto,
}

impl From<TokenResponse> for AuthResponseDto {
    fn from(token: TokenResponse) -> Self {
        Self {
            access_token: token.access_token,
            token_type: token.token_type,
            user: token.user.into(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UserDto {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub role: UserRole,
    pub ward: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
    /// Department staff or admin
    pub is_staff: bool,
}

impl From<UpstreamUser> for UserDto {
    fn from(user: UpstreamUser) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            role: user.role,
            ward: user.ward,
            created_at: user.created_at,
            is_staff: user.role.is_staff(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct LogoutResponseDto {
    /// Whether a cached session existed for the token
    pub session_cleared: bool,
}
