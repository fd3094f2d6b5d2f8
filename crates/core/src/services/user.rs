//! User service: account creation, login, password changes.

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use chrono::NaiveDate;
use drinklog_common::{AppError, AppResult, IdGenerator};
use drinklog_db::{entities::user, repositories::UserRepository};
use sea_orm::Set;
use serde::{Deserialize, Serialize};
use tracing::info;
use validator::Validate;

/// User service for business logic.
#[derive(Clone)]
pub struct UserService {
    user_repo: UserRepository,
    id_gen: IdGenerator,
}

/// Input for creating a new account.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateUserInput {
    #[validate(length(min = 1, max = 50))]
    pub username: String,

    #[validate(length(min = 1, max = 30))]
    pub nickname: String,

    #[validate(length(min = 8, max = 128))]
    pub password: String,

    #[validate(length(min = 1, max = 10))]
    pub gender: String,

    pub birthdate: NaiveDate,
}

/// Input for changing the caller's password.
#[derive(Debug, Deserialize, Validate)]
pub struct ChangePasswordInput {
    pub old_password: String,

    #[validate(length(min = 8, max = 128))]
    pub new_password: String,
}

/// Public view of a user.
#[derive(Debug, Clone, Serialize)]
pub struct UserResponse {
    pub id: String,
    pub username: String,
    pub nickname: String,
    pub gender: String,
    pub birthdate: NaiveDate,
    pub is_admin: bool,
    pub created_at: String,
}

impl From<user::Model> for UserResponse {
    fn from(u: user::Model) -> Self {
        Self {
            id: u.id,
            username: u.username,
            nickname: u.nickname,
            gender: u.gender,
            birthdate: u.birthdate,
            is_admin: u.is_admin,
            created_at: u.created_at.to_rfc3339(),
        }
    }
}

impl UserService {
    /// Create a new user service.
    #[must_use]
    pub const fn new(user_repo: UserRepository) -> Self {
        Self {
            user_repo,
            id_gen: IdGenerator::new(),
        }
    }

    /// Create a new account.
    pub async fn join(&self, input: CreateUserInput) -> AppResult<user::Model> {
        input.validate()?;

        if self
            .user_repo
            .find_by_username(&input.username)
            .await?
            .is_some()
        {
            return Err(AppError::BadRequest("username: already taken".to_string()));
        }

        if self
            .user_repo
            .find_by_nickname(&input.nickname)
            .await?
            .is_some()
        {
            return Err(AppError::BadRequest("nickname: already taken".to_string()));
        }

        let password_hash = hash_password(&input.password)?;

        let model = user::ActiveModel {
            id: Set(self.id_gen.generate()),
            username: Set(input.username),
            nickname: Set(input.nickname),
            password: Set(password_hash),
            gender: Set(input.gender),
            birthdate: Set(input.birthdate),
            token: Set(None),
            is_admin: Set(false),
            created_at: Set(chrono::Utc::now().into()),
            updated_at: Set(None),
        };

        let user = self.user_repo.create(model).await?;
        info!(user_id = %user.id, "Account created");
        Ok(user)
    }

    /// Check credentials and return the user's bearer token.
    ///
    /// The token is issued on the first successful login and reused afterwards.
    pub async fn login(&self, username: &str, password: &str) -> AppResult<(String, user::Model)> {
        let user = self
            .user_repo
            .find_by_username(username)
            .await?
            .ok_or(AppError::InvalidCredentials)?;

        if !verify_password(password, &user.password)? {
            return Err(AppError::InvalidCredentials);
        }

        if let Some(token) = user.token.clone() {
            return Ok((token, user));
        }

        let token = self.id_gen.generate_token();
        let mut active: user::ActiveModel = user.into();
        active.token = Set(Some(token.clone()));
        active.updated_at = Set(Some(chrono::Utc::now().into()));

        let user = self.user_repo.update(active).await?;
        Ok((token, user))
    }

    /// Authenticate a user by token.
    pub async fn authenticate_by_token(&self, token: &str) -> AppResult<user::Model> {
        self.user_repo
            .find_by_token(token)
            .await?
            .ok_or(AppError::Unauthorized)
    }

    /// Change a user's password after checking the old one.
    ///
    /// The bearer token is left untouched so the caller stays signed in.
    pub async fn change_password(
        &self,
        user: &user::Model,
        input: ChangePasswordInput,
    ) -> AppResult<()> {
        input.validate()?;

        if !verify_password(&input.old_password, &user.password)? {
            return Err(AppError::BadRequest("old_password: Wrong password.".to_string()));
        }

        let mut active: user::ActiveModel = user.clone().into();
        active.password = Set(hash_password(&input.new_password)?);
        active.updated_at = Set(Some(chrono::Utc::now().into()));

        self.user_repo.update(active).await?;
        info!(user_id = %user.id, "Password changed");
        Ok(())
    }

    /// List every account. Admin only.
    pub async fn list_all(&self, requester: &user::Model) -> AppResult<Vec<UserResponse>> {
        if !requester.is_admin {
            return Err(AppError::Forbidden(
                "Only administrators can list users".to_string(),
            ));
        }

        let users = self.user_repo.find_all().await?;
        Ok(users.into_iter().map(Into::into).collect())
    }
}

/// Hash a password using Argon2.
fn hash_password(password: &str) -> AppResult<String> {
    let salt = SaltString::generate(&mut OsRng);

    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|h| h.to_string())
        .map_err(|e| AppError::Internal(format!("Failed to hash password: {e}")))
}

/// Verify a password against a hash.
fn verify_password(password: &str, hash: &str) -> AppResult<bool> {
    let parsed_hash =
        PasswordHash::new(hash).map_err(|e| AppError::Internal(format!("Invalid hash: {e}")))?;

    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok())
}
