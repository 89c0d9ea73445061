use serde::{Deserialize, Serialize};

use crate::constants::MAX_NAME_LENGTH;

/// User record stored in redb
/// Uses Unix timestamp for compact storage with bincode
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserRecord {
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    /// When the user was created (Unix timestamp)
    pub created_at: i64,
}

impl UserRecord {
    /// Validate a username: non-empty, within length limits, word characters only
    pub fn validate_username(username: &str) -> bool {
        !username.is_empty()
            && username.len() <= MAX_NAME_LENGTH
            && username
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-' || c == '.')
    }

    /// Validate an email address: minimal local@domain shape
    pub fn validate_email(email: &str) -> bool {
        if email.len() > MAX_NAME_LENGTH {
            return false;
        }
        match email.split_once('@') {
            Some((local, domain)) => !local.is_empty() && domain.contains('.'),
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_username() {
        assert!(UserRecord::validate_username("chef_ivan"));
        assert!(UserRecord::validate_username("user-1.a"));

        // Empty
        assert!(!UserRecord::validate_username(""));

        // Invalid characters
        assert!(!UserRecord::validate_username("chef ivan"));
        assert!(!UserRecord::validate_username("chef@home"));

        // Too long
        let long = "a".repeat(MAX_NAME_LENGTH + 1);
        assert!(!UserRecord::validate_username(&long));
    }

    #[test]
    fn test_validate_email() {
        assert!(UserRecord::validate_email("chef@example.com"));

        assert!(!UserRecord::validate_email(""));
        assert!(!UserRecord::validate_email("no-at-sign"));
        assert!(!UserRecord::validate_email("@example.com"));
        assert!(!UserRecord::validate_email("chef@nodot"));
    }
}
