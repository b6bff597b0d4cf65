//! Anti-forgery tokens.

use rand::RngExt;

/// Charset for generated tokens (alphanumeric).
const CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";

pub fn generate_token(len: usize) -> String {
    let mut rng = rand::rng();
    (0..len)
        .map(|_| CHARSET[rng.random_range(0..CHARSET.len())] as char)
        .collect()
}

/// Compare a submitted token with the session's token without an early exit
/// on the first differing byte.
pub fn tokens_match(submitted: Option<&str>, expected: &str) -> bool {
    let Some(submitted) = submitted else {
        return false;
    };
    if expected.is_empty() || submitted.len() != expected.len() {
        return false;
    }
    submitted
        .bytes()
        .zip(expected.bytes())
        .fold(0u8, |acc, (a, b)| acc | (a ^ b))
        == 0
}
