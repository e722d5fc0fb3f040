// User endpoints
use super::{ApiError, SpotifyClient};
use crate::models::{Credential, User};

impl SpotifyClient {
    /// `GET /me`
    pub async fn fetch_current_user(&self, credential: &Credential) -> Result<User, ApiError> {
        let url = self.url("/me");
        let user: User = self.get_json(&url, credential).await?;
        log::debug!("[Users] Resolved current user: {}", user.id);
        Ok(user)
    }
}
