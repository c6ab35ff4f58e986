use bcrypt::BcryptError;

use crate::error::ApiError;

pub fn hash(password: &str, cost: u32) -> Result<String, BcryptError> {
    bcrypt::hash(password, cost)
}

/// A malformed stored hash counts as a mismatch.
pub fn verify(password: &str, hashed: &str) -> bool {
    bcrypt::verify(password, hashed).unwrap_or(false)
}

pub fn validate_strength(password: &str) -> Result<(), ApiError> {
    if password.chars().count() < 8 {
        return Err(ApiError::BadRequest(
            "password must be at least 8 characters long".to_string(),
        ));
    }

    let has_letter = password.chars().any(|c| c.is_alphabetic());
    let has_digit = password.chars().any(|c| c.is_numeric());
    if !has_letter || !has_digit {
        return Err(ApiError::BadRequest(
            "password must contain at least one letter and one number".to_string(),
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_then_verify() {
        let hashed = hash("trailrunner9", 4).unwrap();
        assert!(verify("trailrunner9", &hashed));
        assert!(!verify("trailrunner8", &hashed));
    }

    #[test]
    fn garbage_hash_never_verifies() {
        assert!(!verify("password", "password"));
    }

    #[test]
    fn weak_passwords() {
        assert!(validate_strength("short1").is_err());
        assert!(validate_strength("onlyletters").is_err());
        assert!(validate_strength("123456789").is_err());
        assert!(validate_strength("hill5repeats").is_ok());
    }
}
