//! Short code generation and validation utilities.
//!
//! Codes are drawn uniformly from a 62-character alphabet using the
//! thread-local CSPRNG, so issued codes cannot be predicted from earlier ones.

use rand::Rng;

/// Characters allowed in short codes.
pub const ALPHABET: &[u8] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz";

/// Shortest code accepted by [`is_valid_format`].
pub const MIN_CODE_LENGTH: usize = 3;

/// Longest code accepted by [`is_valid_format`].
pub const MAX_CODE_LENGTH: usize = 10;

/// Generates a random code of exactly `length` characters.
///
/// Collisions are not checked here; see
/// [`crate::application::services::MappingService`].
///
/// # Examples
///
/// ```
/// use url_shortener::utils::code_generator::{generate_code, is_valid_format};
///
/// let code = generate_code(6);
/// assert_eq!(code.len(), 6);
/// assert!(is_valid_format(&code));
/// ```
pub fn generate_code(length: usize) -> String {
    let mut rng = rand::rng();

    (0..length)
        .map(|_| ALPHABET[rng.random_range(0..ALPHABET.len())] as char)
        .collect()
}

/// Checks that a code is 3-10 characters long and only uses [`ALPHABET`].
pub fn is_valid_format(code: &str) -> bool {
    (MIN_CODE_LENGTH..=MAX_CODE_LENGTH).contains(&code.len())
        && code.bytes().all(|b| b.is_ascii_alphanumeric())
}
