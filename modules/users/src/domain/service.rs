//! `UsersService`: signup and signin (§4.2 collaborator, §6.1 auth routes).
//!
//! Signup performs its existence-check and insert in one transaction so
//! "email/username taken" decisions are race-free under concurrent signups
//! (§5), mirroring the original's `tx.QueryRow` existence check followed by
//! `INSERT ... RETURNING id` inside the same `pgx.Tx`
//! (`original_source/backend/handlers/signup.go`).

use std::time::Duration;

use chrono::Utc;
use pagetree_auth::{AppEnv, TokenConfig, compare_password, generate_token, hash_password};
use pagetree_db::Db;
use pagetree_db::entities::users;
use pagetree_errors::ApiError;
use sea_orm::{ActiveModelTrait, ColumnTrait, Condition, EntityTrait, QueryFilter, Set, TransactionTrait};

use super::validate::{validate_email, validate_signup_password, validate_username};

const DEADLINE: Duration = Duration::from_secs(5);

async fn with_deadline<T, F>(fut: F) -> Result<T, ApiError>
where
    F: std::future::Future<Output = Result<T, ApiError>>,
{
    tokio::time::timeout(DEADLINE, fut)
        .await
        .map_err(|_| ApiError::internal("request deadline exceeded"))?
}

pub struct UsersService {
    db: Db,
    token_config: TokenConfig,
    app_env: AppEnv,
}

impl UsersService {
    #[must_use]
    pub fn new(db: Db, token_config: TokenConfig, app_env: AppEnv) -> Self {
        Self {
            db,
            token_config,
            app_env,
        }
    }

    /// §6.1 `POST /auth/signup`. Validates shape, then in one transaction
    /// checks for an existing email/username and inserts the new row,
    /// closing the race window between the check and the insert.
    pub async fn signup(&self, email: &str, username: &str, password: &str) -> Result<String, ApiError> {
        with_deadline(async {
            validate_email(email)?;
            validate_username(username)?;
            validate_signup_password(password)?;
            let hashed = hash_password(password, self.app_env.bcrypt_cost())?;

            let txn = self
                .db
                .connection()
                .begin()
                .await
                .map_err(|e| ApiError::internal_with("failed to start transaction", e))?;

            let existing = users::Entity::find()
                .filter(
                    Condition::any()
                        .add(users::Column::Email.eq(email))
                        .add(users::Column::Username.eq(username)),
                )
                .all(&txn)
                .await
                .map_err(|e| ApiError::internal_with("failed to validate user", e))?;

            if existing.iter().any(|u| u.email == email) {
                return Err(ApiError::bad_request("email already in use"));
            }
            if existing.iter().any(|u| u.username == username) {
                return Err(ApiError::bad_request("username already taken"));
            }

            let user = users::ActiveModel {
                id: sea_orm::NotSet,
                email: Set(email.to_owned()),
                username: Set(username.to_owned()),
                password: Set(hashed),
                created_at: Set(Utc::now().into()),
            }
            .insert(&txn)
            .await
            .map_err(|e| ApiError::internal_with("failed to create user", e))?;

            txn.commit()
                .await
                .map_err(|e| ApiError::internal_with("failed to commit transaction", e))?;

            generate_token(user.id, &self.token_config)
        })
        .await
    }

    /// §6.1 `POST /auth/signin`. Deliberately vague on failure (wrong
    /// email or wrong password look identical to the caller), matching
    /// the original's comment in
    /// `original_source/backend/handlers/signin.go` about not handing an
    /// attacker a user-enumeration oracle.
    pub async fn signin(&self, email: &str, password: &str) -> Result<String, ApiError> {
        with_deadline(async {
            let user = users::Entity::find()
                .filter(users::Column::Email.eq(email))
                .one(self.db.connection())
                .await
                .map_err(|e| ApiError::internal_with("failed to look up user", e))?
                .ok_or_else(|| ApiError::bad_request("wrong email or password"))?;

            compare_password(password, &user.password).map_err(|_| ApiError::bad_request("wrong email or password"))?;

            generate_token(user.id, &self.token_config)
        })
        .await
    }
}
