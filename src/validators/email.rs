use regex::Regex;
use std::sync::LazyLock;

static EMAIL_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    #[allow(clippy::unwrap_used)]
    Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$").unwrap()
});

/// Shape check applied to login input before the profile store is consulted.
///
/// The login contract renders every failure as the same generic response,
/// so this returns a plain bool; the caller logs malformed input and moves
/// on without a store round-trip.
pub fn is_valid_email(email: &str) -> bool {
    !email.is_empty() && email.len() <= 254 && EMAIL_REGEX.is_match(email)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_emails() {
        assert!(is_valid_email("user@example.com"));
        assert!(is_valid_email("user.name+tag@sub.example.com"));
    }

    #[test]
    fn test_invalid_emails() {
        assert!(!is_valid_email(""));
        assert!(!is_valid_email("notanemail"));
        assert!(!is_valid_email("missing@domain"));
        assert!(!is_valid_email("@nodomain.com"));
        assert!(!is_valid_email("spaces in@email.com"));
    }

    #[test]
    fn test_too_long() {
        let long = format!("{}@example.com", "a".repeat(250));
        assert!(!is_valid_email(&long));
    }
}
