use pagetree_errors::ApiError;

/// bcrypt's input ceiling: passwords longer than this (in bytes) are
/// rejected before hashing, as a user error (§4.2).
const BCRYPT_MAX_BYTES: usize = 72;

/// Hashes `password` at `cost`, rejecting empty or over-long inputs as
/// [`ApiError::BadRequest`] before ever calling into bcrypt.
///
/// # Errors
///
/// Returns [`ApiError::BadRequest`] if `password` is empty or exceeds 72
/// bytes, or [`ApiError::Internal`] if hashing itself fails.
pub fn hash_password(password: &str, cost: u32) -> Result<String, ApiError> {
    validate_shape(password)?;
    bcrypt::hash(password, cost).map_err(|e| ApiError::internal_with("failed to hash password", e))
}

/// Compares a plaintext password against a bcrypt hash.
///
/// # Errors
///
/// Returns [`ApiError::Unauthorized`] if the password does not match or
/// the stored hash is malformed.
pub fn compare_password(password: &str, hash: &str) -> Result<(), ApiError> {
    let matches = bcrypt::verify(password, hash)
        .map_err(|_| ApiError::unauthorized("wrong email or password"))?;
    if matches {
        Ok(())
    } else {
        Err(ApiError::unauthorized("wrong email or password"))
    }
}

fn validate_shape(password: &str) -> Result<(), ApiError> {
    if password.is_empty() {
        return Err(ApiError::bad_request("password must not be empty"));
    }
    if password.len() > BCRYPT_MAX_BYTES {
        return Err(ApiError::bad_request(format!(
            "password must not exceed {BCRYPT_MAX_BYTES} bytes"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_password_is_rejected_before_hashing() {
        assert!(matches!(
            hash_password("", 4),
            Err(ApiError::BadRequest { .. })
        ));
    }

    #[test]
    fn over_long_password_is_rejected_before_hashing() {
        let long = "a".repeat(BCRYPT_MAX_BYTES + 1);
        assert!(matches!(
            hash_password(&long, 4),
            Err(ApiError::BadRequest { .. })
        ));
    }

    #[test]
    fn correct_password_compares_successfully() {
        let hash = hash_password("hunter2", 4).expect("hashes");
        assert!(compare_password("hunter2", &hash).is_ok());
    }

    #[test]
    fn wrong_password_is_rejected() {
        let hash = hash_password("hunter2", 4).expect("hashes");
        assert!(compare_password("wrong", &hash).is_err());
    }
}
