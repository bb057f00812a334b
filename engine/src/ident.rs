//! Public identifier generation.
//!
//! Identifiers are short fixed-length strings drawn uniformly from the
//! 62-symbol alphanumeric alphabet. At the default length of 6 the space
//! holds 62^6 (~5.7e10) ids, so collisions are rare but not impossible -
//! uniqueness is enforced by the store, not here.

/// The 62-symbol identifier alphabet.
pub const ID_ALPHABET: &[u8; 62] =
    b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// Default identifier length.
pub const ID_LENGTH: usize = 6;

/// Generate a candidate identifier of the given length.
///
/// Each character is chosen uniformly at random. The result is only a
/// candidate: it may still collide with an existing record and must go
/// through the allocator's insert-conflict loop.
pub fn generate_candidate(length: usize) -> String {
    use rand::Rng;

    let mut rng = rand::rng();
    (0..length)
        .map(|_| ID_ALPHABET[rng.random_range(0..ID_ALPHABET.len())] as char)
        .collect()
}

/// Check that an identifier has the default length and only uses alphabet
/// characters.
pub fn is_well_formed(id: &str) -> bool {
    id.len() == ID_LENGTH && id.bytes().all(|b| ID_ALPHABET.contains(&b))
}
