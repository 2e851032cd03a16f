use crate::error::{AppError, AppResult};
use bcrypt::{DEFAULT_COST, hash, verify};

const MIN_PASSWORD_CHARS: usize = 8;
const MAX_PASSWORD_CHARS: usize = 128;

/// At least one lower case letter, one upper case letter and one digit.
pub fn validate_password(password: &str) -> AppResult<()> {
    let len = password.chars().count();
    if !(MIN_PASSWORD_CHARS..=MAX_PASSWORD_CHARS).contains(&len) {
        return Err(AppError::ValidationError(format!(
            "Password must be between {MIN_PASSWORD_CHARS} and {MAX_PASSWORD_CHARS} characters"
        )));
    }

    let missing: Vec<&str> = [
        (password.chars().any(char::is_lowercase), "a lower case letter"),
        (password.chars().any(char::is_uppercase), "an upper case letter"),
        (password.chars().any(|c| c.is_ascii_digit()), "a digit"),
    ]
    .into_iter()
    .filter(|(present, _)| !present)
    .map(|(_, what)| what)
    .collect();

    if !missing.is_empty() {
        return Err(AppError::ValidationError(format!(
            "Password must contain {}",
            missing.join(" and ")
        )));
    }

    Ok(())
}

pub fn hash_password(password: &str) -> AppResult<String> {
    hash(password, DEFAULT_COST)
        .map_err(|e| AppError::InternalError(format!("Failed to hash password: {e}")))
}

/// A malformed stored hash is an internal error, not a failed login.
pub fn verify_password(password: &str, hash: &str) -> AppResult<bool> {
    verify(password, hash)
        .map_err(|e| AppError::InternalError(format!("Failed to verify password: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_password() {
        assert!(validate_password("Password123").is_ok());
        assert!(validate_password("password123").is_err());
        assert!(validate_password("PASSWORD123").is_err());
        assert!(validate_password("Password").is_err());
        assert!(validate_password("Pass123").is_err());
    }

    #[test]
    fn test_validate_password_names_what_is_missing() {
        match validate_password("password") {
            Err(AppError::ValidationError(msg)) => {
                assert_eq!(msg, "Password must contain an upper case letter and a digit")
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn test_length_counts_characters() {
        // 7 characters but more than 8 bytes
        assert!(validate_password("Pässwö1").is_err());
        assert!(validate_password(&format!("Aa1{}", "x".repeat(126))).is_err());
    }

    #[test]
    fn test_hash_and_verify_password() {
        let password = "Password123";
        let hashed = hash_password(password).unwrap();

        assert!(verify_password(password, &hashed).unwrap());
        assert!(!verify_password("WrongPassword", &hashed).unwrap());
    }
}
