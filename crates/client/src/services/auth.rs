use lms_admin_shared::{
    ApiError, AuthResponse, LoginRequest, RegisterRequest, UpdateProfileRequest, User,
};

use crate::api_client::ApiClient;
use crate::auth_session::decode_claims;

impl ApiClient {
    /// `POST /api/v1/auth/login`. The auth service only returns tokens; the
    /// user is read back out of the access token when the body lacks one.
    pub async fn login(&self, credentials: &LoginRequest) -> Result<AuthResponse, ApiError> {
        let mut resp: AuthResponse = self.post_json("/api/v1/auth/login", credentials).await?;
        if resp.user.is_none() {
            resp.user = decode_claims(&resp.access_token).and_then(|c| User::from_claims(&c));
            if resp.user.is_none() {
                crate::log_warn!("could not decode user from access token");
            }
        }
        Ok(resp)
    }

    /// `POST /api/v1/auth/register`
    pub async fn register(&self, payload: &RegisterRequest) -> Result<AuthResponse, ApiError> {
        self.post_json("/api/v1/auth/register", payload).await
    }

    pub async fn get_profile(&self) -> Result<User, ApiError> {
        self.get_json("/api/v1/auth/profile").await
    }

    pub async fn update_profile(&self, update: &UpdateProfileRequest) -> Result<User, ApiError> {
        self.put_json("/api/v1/auth/profile", update).await
    }

    /// `POST /api/v1/auth/logout`
    pub async fn logout_remote(&self) -> Result<(), ApiError> {
        let _: serde_json::Value = self.post_empty("/api/v1/auth/logout").await?;
        Ok(())
    }
}
