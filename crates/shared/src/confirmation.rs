//! Confirmation codes for the self-destruct flow.

use rand::Rng;

/// Length of a generated confirmation code.
pub const CONFIRMATION_CODE_LENGTH: usize = 6;

/// Avoids confusing characters: 0, O, 1, I.
const CHARSET: &[u8] = b"ABCDEFGHJKLMNPQRSTUVWXYZ23456789";

/// Generate a random confirmation code, e.g. `K7QX2M`.
pub fn generate_confirmation_code() -> String {
    let mut rng = rand::thread_rng();

    (0..CONFIRMATION_CODE_LENGTH)
        .map(|_| {
            let idx = rng.gen_range(0..CHARSET.len());
            CHARSET[idx] as char
        })
        .collect()
}

/// Checks a submitted code against the expected one.
///
/// Surrounding whitespace and letter case are ignored.
pub fn codes_match(expected: &str, submitted: &str) -> bool {
    let submitted = submitted.trim();
    !expected.is_empty() && expected.eq_ignore_ascii_case(submitted)
}
