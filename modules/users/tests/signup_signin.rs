//! Black-box signup/signin scenarios driven through `UsersService` against
//! an in-memory SQLite database (§6.1, §8).

use pagetree_auth::{AppEnv, TokenConfig};
use pagetree_db::{Db, PoolConfig};
use pagetree_errors::ApiError;
use users::UsersService;

fn test_token_config() -> TokenConfig {
    temp_env::with_vars(
        [
            ("TOKEN_SECRET", Some("integration-test-secret")),
            ("TOKEN_HOUR_LIFESPAN", Some("24")),
        ],
        TokenConfig::from_env,
    )
    .expect("valid token config")
}

async fn test_service() -> UsersService {
    let db = Db::connect("sqlite::memory:", &PoolConfig::default())
        .await
        .expect("in-memory database connects and migrates");
    UsersService::new(db, test_token_config(), AppEnv::Development)
}

#[tokio::test]
async fn signup_then_signin_round_trips_a_token() {
    let service = test_service().await;

    service
        .signup("new@example.com", "newuser", "hunter22")
        .await
        .expect("signup succeeds");

    let token = service
        .signin("new@example.com", "hunter22")
        .await
        .expect("signin succeeds");
    assert!(!token.is_empty());
}

#[tokio::test]
async fn signup_rejects_duplicate_email() {
    let service = test_service().await;
    service
        .signup("dup@example.com", "firstuser", "hunter22")
        .await
        .expect("first signup succeeds");

    let result = service.signup("dup@example.com", "seconduser", "hunter22").await;
    assert!(matches!(result, Err(ApiError::BadRequest { .. })));
}

#[tokio::test]
async fn signup_rejects_duplicate_username() {
    let service = test_service().await;
    service
        .signup("first@example.com", "shared", "hunter22")
        .await
        .expect("first signup succeeds");

    let result = service.signup("second@example.com", "shared", "hunter22").await;
    assert!(matches!(result, Err(ApiError::BadRequest { .. })));
}

#[tokio::test]
async fn signup_rejects_malformed_input() {
    let service = test_service().await;

    let bad_email = service.signup("not-an-email", "someuser", "hunter22").await;
    assert!(matches!(bad_email, Err(ApiError::BadRequest { .. })));

    let short_password = service.signup("ok@example.com", "someuser", "ab").await;
    assert!(matches!(short_password, Err(ApiError::BadRequest { .. })));
}

/// Wrong password and unknown email are both a 400 "wrong email or
/// password", never a 401 or 404 that would confirm which part was wrong.
#[tokio::test]
async fn signin_rejects_wrong_password_and_unknown_email_identically() {
    let service = test_service().await;
    service
        .signup("known@example.com", "knownuser", "correct-horse")
        .await
        .expect("signup succeeds");

    let wrong_password = service.signin("known@example.com", "incorrect").await;
    assert!(matches!(wrong_password, Err(ApiError::BadRequest { .. })));

    let unknown_email = service.signin("ghost@example.com", "whatever").await;
    assert!(matches!(unknown_email, Err(ApiError::BadRequest { .. })));
}
