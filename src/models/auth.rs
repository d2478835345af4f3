use super::user::{User, UserDto};
use serde::{Deserialize, Serialize};

use crate::error::ApiError;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterRequest {
    #[serde(rename = "username", alias = "name")]
    pub name: String,
    pub email: String,
    pub password: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Google ID token obtained by the sign-in button; the backend verifies it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GoogleLoginRequest {
    pub token: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AuthResponseDto {
    #[serde(alias = "accessToken")]
    pub token: String,
    pub user: UserDto,
}

#[derive(Debug, Clone)]
pub struct AuthResponse {
    pub token: String,
    pub user: User,
}

impl TryFrom<AuthResponseDto> for AuthResponse {
    type Error = ApiError;

    fn try_from(dto: AuthResponseDto) -> Result<Self, Self::Error> {
        Ok(Self {
            token: dto.token,
            user: dto.user.try_into()?,
        })
    }
}

/// Payload of the JWT the backend issues at login.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub role: String,
    pub exp: usize,
}
