//! Short random identifiers for headings, sections, objectives, and items.

use rand::Rng;

/// URL-safe alphabet, 64 symbols, so every character carries 6 bits.
const ID_ALPHABET: &[u8; 64] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789_-";

/// Generated identifier length: 60 bits of randomness.
pub const ID_LENGTH: usize = 10;

/// Generate an identifier from the thread-local RNG.
pub fn generate_id() -> String {
    return generate_id_with(&mut rand::rng());
}

/// Generate an identifier from the given RNG.
pub fn generate_id_with<R: Rng + ?Sized>(rng: &mut R) -> String {
    return (0..ID_LENGTH)
        .filter_map(|_| ID_ALPHABET.get(rng.random_range(0..ID_ALPHABET.len())))
        .map(|&b| char::from(b))
        .collect();
}

/// Whether `candidate` is usable inside a heading marker (`[A-Za-z0-9_-]+`).
pub fn is_valid_id(candidate: &str) -> bool {
    return !candidate.is_empty()
        && candidate
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'_' || b == b'-');
}

#[cfg(test)]
#[allow(clippy::missing_panics_doc, reason = "tests")]
mod tests {
    use std::collections::HashSet;

    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::*;

    #[test]
    fn generated_ids_are_marker_safe() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..200 {
            let id = generate_id_with(&mut rng);
            assert_eq!(id.len(), ID_LENGTH);
            assert!(is_valid_id(&id), "bad id {id}");
        }
    }

    #[test]
    fn generated_ids_do_not_repeat() {
        let ids: HashSet<String> = (0..1000).map(|_| generate_id()).collect();
        assert_eq!(ids.len(), 1000);
    }

    #[test]
    fn rejects_marker_breaking_characters() {
        assert!(!is_valid_id(""));
        assert!(!is_valid_id("a b"));
        assert!(!is_valid_id("a}"));
        assert!(is_valid_id("abc_123-X"));
    }
}
