use log::info;

use super::client::ApiClient;
use crate::error::Result;
use crate::models::{AuthResponse, AuthResponseDto, GoogleLoginRequest, LoginRequest, RegisterRequest};

#[derive(Clone)]
pub struct AuthService {
    api: ApiClient,
}

impl AuthService {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    /// Signs in and attaches the returned token to every later request.
    pub async fn login(&self, credentials: &LoginRequest) -> Result<AuthResponse> {
        let dto: AuthResponseDto = self.api.post("/users/login", credentials).await?;
        let auth = AuthResponse::try_from(dto)?;
        self.api.set_token(Some(auth.token.clone()));
        info!("User {} signed in as {}", auth.user.email, auth.user.role);
        Ok(auth)
    }

    pub async fn register(&self, request: &RegisterRequest) -> Result<AuthResponse> {
        let dto: AuthResponseDto = self.api.post("/users/register", request).await?;
        let auth = AuthResponse::try_from(dto)?;
        self.api.set_token(Some(auth.token.clone()));
        info!("Registered new account for {}", auth.user.email);
        Ok(auth)
    }

    /// Exchanges a Google ID token for a backend session.
    pub async fn google_login(&self, id_token: &str) -> Result<AuthResponse> {
        let request = GoogleLoginRequest {
            token: id_token.to_string(),
        };
        let dto: AuthResponseDto = self.api.post("/users/google-login", &request).await?;
        let auth = AuthResponse::try_from(dto)?;
        self.api.set_token(Some(auth.token.clone()));
        info!("User {} signed in with Google", auth.user.email);
        Ok(auth)
    }

    pub fn logout(&self) {
        self.api.set_token(None);
    }
}
