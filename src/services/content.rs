//! Chirp body validation and profanity masking.

use crate::error::AppError;

/// Longest accepted chirp body, in characters.
pub const MAX_CHIRP_LENGTH: usize = 140;

const BANNED_WORDS: [&str; 3] = ["kerfuffle", "sharbert", "fornax"];
const MASK: &str = "****";

/// Reject over-long bodies and mask banned words.
///
/// Words are split on whitespace and matched case-insensitively; a word with
/// trailing punctuation is left alone.
pub fn clean_chirp_body(body: &str) -> Result<String, AppError> {
    if body.chars().count() > MAX_CHIRP_LENGTH {
        return Err(AppError::Validation("Chirp is too long".to_string()));
    }

    let cleaned = body
        .split_whitespace()
        .map(|word| {
            let banned = BANNED_WORDS
                .iter()
                .any(|b| b.eq_ignore_ascii_case(word));
            if banned {
                MASK
            } else {
                word
            }
        })
        .collect::<Vec<_>>()
        .join(" ");

    Ok(cleaned)
}
