//! Short codes
//!
//! Explicit codes are chosen by the client and must match `[A-Za-z0-9]{6,8}`, generated codes are
//! always 6 characters long. Codes are case-sensitive.

use rand::Rng;

/// Characters a short code is made of
const CHARSET: &[u8; 62] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";

/// Length of a generated code
pub const GENERATED_LENGTH: usize = 6;

/// Minimal length of an explicit code
pub const MIN_LENGTH: usize = 6;

/// Maximal length of an explicit code
pub const MAX_LENGTH: usize = 8;

/// Number of generated candidates tried before giving up
pub const MAX_GENERATION_ATTEMPTS: usize = 5;

/// Is the code a valid short code?
///
/// ```rust
/// assert!(is_valid("Ab12cd"));
/// assert!(!is_valid("AB"));
/// ```
pub fn is_valid(code: &str) -> bool {
    (MIN_LENGTH..=MAX_LENGTH).contains(&code.len())
        && code.bytes().all(|byte| byte.is_ascii_alphanumeric())
}

/// Generate a random code from the given source of randomness
pub fn generate<R>(rng: &mut R) -> String
where
    R: Rng + ?Sized,
{
    (0..GENERATED_LENGTH)
        .map(|_| char::from(CHARSET[rng.random_range(0..CHARSET.len())]))
        .collect()
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::*;
    use crate::tests::rng::RepeatRng;

    #[test]
    fn test_is_valid() {
        assert!(is_valid("abcdef"));
        assert!(is_valid("ABCdef12"));
        assert!(is_valid("000000"));

        assert!(!is_valid(""));
        assert!(!is_valid("AB"));
        assert!(!is_valid("abcde"));
        assert!(!is_valid("abcdefghi"));
        assert!(!is_valid("abc-de"));
        assert!(!is_valid("abc def"));
        assert!(!is_valid("ábcdef"));
    }

    #[test]
    fn test_generate() {
        let mut rng = StdRng::seed_from_u64(42);

        let codes = (0..1000)
            .map(|_| generate(&mut rng))
            .collect::<Vec<String>>();

        for code in &codes {
            assert_eq!(GENERATED_LENGTH, code.len());
            assert!(is_valid(code), "{code} is not a valid code");
        }

        let unique = codes.iter().collect::<HashSet<_>>();
        assert!(unique.len() > 990);
    }

    #[test]
    fn test_generate_uses_whole_charset() {
        let mut rng = StdRng::seed_from_u64(42);

        let seen = (0..1000)
            .flat_map(|_| generate(&mut rng).into_bytes())
            .collect::<HashSet<u8>>();

        assert_eq!(CHARSET.len(), seen.len());
    }

    #[test]
    fn test_generate_is_deterministic() {
        let mut one = StdRng::seed_from_u64(7);
        let mut two = StdRng::seed_from_u64(7);

        assert_eq!(generate(&mut one), generate(&mut two));
    }

    #[test]
    fn test_generate_repeats_with_constant_randomness() {
        let mut rng = RepeatRng::new(1);

        let code = generate(&mut rng);
        assert!(is_valid(&code));
        assert_eq!(code, generate(&mut rng));
    }
}
