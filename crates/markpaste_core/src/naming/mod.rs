//! Short opaque identifiers for pastes.

use crate::constants::PASTE_ID_LEN;
use rand::Rng;

const ID_ALPHABET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Generate a random paste id of [`PASTE_ID_LEN`] lowercase alphanumerics.
///
/// Ids are not checked against existing keys. A collision overwrites the
/// earlier paste.
pub fn generate_id() -> String {
    let mut rng = rand::thread_rng();
    (0..PASTE_ID_LEN)
        .map(|_| ID_ALPHABET[rng.gen_range(0..ID_ALPHABET.len())] as char)
        .collect()
}

/// Whether `candidate` has the shape of a generated paste id.
pub fn is_valid_id(candidate: &str) -> bool {
    candidate.len() == PASTE_ID_LEN && candidate.bytes().all(|b| ID_ALPHABET.contains(&b))
}
