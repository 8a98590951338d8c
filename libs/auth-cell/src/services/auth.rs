use std::sync::Arc;

use tracing::info;

use shared_config::AppConfig;
use shared_database::supabase::SupabaseClient;
use shared_models::auth::TokenResponse;
use shared_utils::jwt::create_token;
use shared_utils::password::verify_password;

use crate::models::{AuthError, UserAccount};
use crate::services::UsersService;

const TOKEN_VALID_HOURS: i64 = 24;

pub struct AuthService {
    users: UsersService,
    jwt_secret: String,
}

impl AuthService {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            users: UsersService::new(config),
            jwt_secret: config.supabase_jwt_secret.clone(),
        }
    }

    pub fn with_client(supabase: Arc<SupabaseClient>, jwt_secret: &str) -> Self {
        Self {
            users: UsersService::with_client(supabase),
            jwt_secret: jwt_secret.to_string(),
        }
    }

    pub async fn register(
        &self,
        email: &str,
        password: &str,
        name: &str,
    ) -> Result<TokenResponse, AuthError> {
        if email.trim().is_empty() || !email.contains('@') {
            return Err(AuthError::Validation("A valid email is required".to_string()));
        }
        if password.len() < 6 {
            return Err(AuthError::Validation(
                "Password must be at least 6 characters".to_string(),
            ));
        }
        if name.trim().is_empty() {
            return Err(AuthError::Validation("Name is required".to_string()));
        }

        if self.users.find_by_email(email).await?.is_some() {
            return Err(AuthError::EmailTaken);
        }

        let user = self.users.create_user(email, password, name, "user").await?;
        info!("Registered new account: {}", user.email);

        self.issue_token(&user)
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<TokenResponse, AuthError> {
        let user = self
            .users
            .find_by_email(email)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        let valid = verify_password(password, &user.password)
            .map_err(|e| AuthError::DatabaseError(format!("Password check failed: {}", e)))?;
        if !valid {
            return Err(AuthError::InvalidCredentials);
        }

        self.issue_token(&user)
    }

    pub async fn get_profile(&self, user_id: &str) -> Result<UserAccount, AuthError> {
        self.users
            .find_by_id(user_id)
            .await?
            .ok_or(AuthError::NotFound)
    }

    fn issue_token(&self, user: &UserAccount) -> Result<TokenResponse, AuthError> {
        let access_token = create_token(
            &user.id.to_string(),
            &user.email,
            &user.role,
            &self.jwt_secret,
            TOKEN_VALID_HOURS,
        )
        .map_err(AuthError::TokenCreation)?;

        Ok(TokenResponse { access_token })
    }
}
