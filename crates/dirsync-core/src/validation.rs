//! Email syntax validation
//!
//! Validates the `mail` attribute of directory entries before they become
//! sync candidates. Handles standard addresses, plus addressing, dotted
//! local parts, and subdomains.

use std::sync::LazyLock;

/// RFC 5322 style email pattern.
///
/// Local part: alphanumeric plus common special characters, dot-separated
/// atoms. Domain: dot-separated labels, no leading/trailing hyphen.
static EMAIL_REGEX: LazyLock<regex::Regex> = LazyLock::new(|| {
    regex::Regex::new(
        r"(?i)^[a-z0-9!#$%&'*+/=?^_`{|}~-]+(?:\.[a-z0-9!#$%&'*+/=?^_`{|}~-]+)*@(?:[a-z0-9](?:[a-z0-9-]*[a-z0-9])?\.)+[a-z0-9](?:[a-z0-9-]*[a-z0-9])?$"
    ).expect("EMAIL_REGEX is a valid regex pattern")
});

/// Maximum allowed email length (per RFC 5321).
const MAX_EMAIL_LENGTH: usize = 254;

/// Minimum reasonable email length (a@b.c).
const MIN_EMAIL_LENGTH: usize = 5;

/// Check whether a string is a syntactically valid email address.
pub fn is_valid_email(email: &str) -> bool {
    let email = email.trim();

    if email.len() < MIN_EMAIL_LENGTH || email.len() > MAX_EMAIL_LENGTH {
        return false;
    }

    EMAIL_REGEX.is_match(email)
}
