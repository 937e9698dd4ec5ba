//! Random identifier generation for shop tokens and order ids.

use rand::Rng;

/// Generates a fresh shop token: three uppercase letters followed by
/// three digits. Each call is independently random; only the latest
/// stored token is valid, so collisions across calls are acceptable.
pub fn new_shop_token() -> String {
    let mut rng = rand::rng();
    let mut token = String::with_capacity(6);
    for _ in 0..3 {
        token.push(rng.random_range(b'A'..=b'Z') as char);
    }
    for _ in 0..3 {
        token.push(rng.random_range(b'0'..=b'9') as char);
    }
    token
}

/// Returns true if the value matches the shop token shape
/// (3 uppercase ASCII letters then 3 digits).
pub fn is_well_formed_token(token: &str) -> bool {
    let bytes = token.as_bytes();
    bytes.len() == 6
        && bytes[..3].iter().all(|b| b.is_ascii_uppercase())
        && bytes[3..].iter().all(|b| b.is_ascii_digit())
}

/// Samples a random numeric order id of the given length. Uniqueness is
/// checked against the store by the caller.
pub fn random_order_id(length: usize) -> String {
    let mut rng = rand::rng();
    (0..length)
        .map(|_| rng.random_range(b'0'..=b'9') as char)
        .collect()
}
