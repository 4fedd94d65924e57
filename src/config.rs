use crate::error::AppError;

pub const USERNAME_ENV: &str = "BSKY_USERNAME";
pub const PASSWORD_ENV: &str = "BSKY_PASSWORD";
pub const SERVICE_URL_ENV: &str = "BSKY_SERVICE_URL";

pub const USER_AGENT: &str = "BlueskyCollector/1.0";

/// createSession に渡す 2 つの資格情報
#[derive(Clone)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    /// どちらかが未設定または空ならエラー
    pub fn new(username: Option<String>, password: Option<String>) -> Result<Self, AppError> {
        let username = username
            .filter(|v| !v.is_empty())
            .ok_or(AppError::MissingCredential(USERNAME_ENV))?;
        let password = password
            .filter(|v| !v.is_empty())
            .ok_or(AppError::MissingCredential(PASSWORD_ENV))?;

        Ok(Self { username, password })
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"***")
            .finish()
    }
}
