use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};

pub fn hash_password(password: &str) -> String {
    let argon2 = Argon2::default();
    let salt = SaltString::generate(&mut OsRng);

    argon2
        .hash_password(password.as_bytes(), &salt)
        .unwrap()
        .to_string()
}

pub fn verify_password(password: &str, hashed: &str) -> Result<(), argon2::password_hash::Error> {
    let argon2 = Argon2::default();
    let parsed = PasswordHash::new(hashed)?;

    argon2.verify_password(password.as_bytes(), &parsed)
}

const MIN_PASSWORD_LEN: usize = 8;
const MIN_CHARACTER_CLASSES: usize = 3;

/// Checks a candidate password against the account-security policy.
///
/// Returns the unmet requirements, empty when the password is acceptable.
/// Policy: at least 8 characters, and characters drawn from at least three
/// of {lowercase, uppercase, digits, symbols}.
pub fn password_strength_issues(password: &str) -> Vec<&'static str> {
    let mut issues = Vec::new();

    if password.chars().count() < MIN_PASSWORD_LEN {
        issues.push("must be at least 8 characters long");
    }

    let has_lower = password.chars().any(|c| c.is_ascii_lowercase());
    let has_upper = password.chars().any(|c| c.is_ascii_uppercase());
    let has_digit = password.chars().any(|c| c.is_ascii_digit());
    let has_symbol = password.chars().any(|c| !c.is_ascii_alphanumeric());

    let classes = [has_lower, has_upper, has_digit, has_symbol]
        .iter()
        .filter(|present| **present)
        .count();

    if classes < MIN_CHARACTER_CLASSES {
        issues.push("must mix at least three of: lowercase, uppercase, digits, symbols");
    }

    issues
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_then_verify_round_trip() {
        let hashed = hash_password("Str0ng-pass!");

        assert!(verify_password("Str0ng-pass!", &hashed).is_ok());
        assert!(verify_password("wrong-pass", &hashed).is_err());
    }

    #[test]
    fn test_short_password_is_rejected() {
        let issues = password_strength_issues("aB1!");

        assert_eq!(issues.len(), 1);
        assert!(issues[0].contains("8 characters"));
    }

    #[test]
    fn test_single_class_password_is_rejected() {
        let issues = password_strength_issues("aaaaaaaaaa");

        assert_eq!(issues.len(), 1);
        assert!(issues[0].contains("three of"));
    }

    #[test]
    fn test_short_and_weak_reports_both_issues() {
        let issues = password_strength_issues("aaa");

        assert_eq!(issues.len(), 2);
    }

    #[test]
    fn test_three_classes_at_min_length_is_accepted() {
        assert!(password_strength_issues("Passw0rd").is_empty());
        assert!(password_strength_issues("pass-w0rd").is_empty());
    }

    #[test]
    fn test_four_classes_is_accepted() {
        assert!(password_strength_issues("Str0ng-pass!").is_empty());
    }
}
