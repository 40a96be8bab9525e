//! Shape validation for signup input (§6.1): email-format, username 3-30,
//! password >=5 bytes.
//!
//! Kept as plain functions rather than pulling in the `validator` crate —
//! the teacher's workspace does not carry one and the checks are few and
//! simple (SPEC_FULL.md §4.8).

use pagetree_errors::ApiError;

const USERNAME_MIN: usize = 3;
const USERNAME_MAX: usize = 30;
const PASSWORD_MIN: usize = 5;

/// A deliberately permissive check: one `@`, with at least one character
/// on either side and a `.` somewhere after it. Rejects the obviously
/// malformed without pretending to implement RFC 5322.
pub fn validate_email(email: &str) -> Result<(), ApiError> {
    let Some((local, domain)) = email.split_once('@') else {
        return Err(ApiError::bad_request("email must contain '@'"));
    };
    if local.is_empty() || domain.is_empty() || !domain.contains('.') {
        return Err(ApiError::bad_request("email is not a valid email address"));
    }
    Ok(())
}

pub fn validate_username(username: &str) -> Result<(), ApiError> {
    if !(USERNAME_MIN..=USERNAME_MAX).contains(&username.len()) {
        return Err(ApiError::bad_request(format!(
            "username must be between {USERNAME_MIN} and {USERNAME_MAX} characters"
        )));
    }
    Ok(())
}

pub fn validate_signup_password(password: &str) -> Result<(), ApiError> {
    if password.len() < PASSWORD_MIN {
        return Err(ApiError::bad_request(format!(
            "password must be at least {PASSWORD_MIN} characters"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_email_without_at() {
        assert!(validate_email("not-an-email").is_err());
    }

    #[test]
    fn rejects_email_without_domain_dot() {
        assert!(validate_email("a@b").is_err());
    }

    #[test]
    fn accepts_plausible_email() {
        assert!(validate_email("user@example.com").is_ok());
    }

    #[test]
    fn rejects_short_username() {
        assert!(validate_username("ab").is_err());
    }

    #[test]
    fn rejects_long_username() {
        assert!(validate_username(&"a".repeat(31)).is_err());
    }

    #[test]
    fn rejects_short_password() {
        assert!(validate_signup_password("1234").is_err());
    }
}
