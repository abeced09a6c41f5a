//! Password generation for newly created local accounts
//!
//! The directory is an identity source, not a credential source: a freshly
//! created local account gets a random password that is never derived from
//! directory data.

use rand::Rng;

/// Characters used in generated passwords.
const CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789!@#$%&*";

/// Default length for initial passwords.
pub const DEFAULT_PASSWORD_LENGTH: usize = 24;

/// Generate a random password of the given length.
pub fn generate_random_password(length: usize) -> String {
    let mut rng = rand::thread_rng();
    (0..length)
        .map(|_| {
            let idx = rng.gen_range(0..CHARSET.len());
            CHARSET[idx] as char
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_length() {
        assert_eq!(generate_random_password(16).len(), 16);
        assert_eq!(generate_random_password(DEFAULT_PASSWORD_LENGTH).len(), 24);
    }

    #[test]
    fn test_generated_charset() {
        let password = generate_random_password(256);
        assert!(password.bytes().all(|b| CHARSET.contains(&b)));
    }

    #[test]
    fn test_generated_passwords_differ() {
        let a = generate_random_password(24);
        let b = generate_random_password(24);
        assert_ne!(a, b);
    }

    #[test]
    fn test_zero_length() {
        assert!(generate_random_password(0).is_empty());
    }
}
