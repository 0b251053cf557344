//! Chirp body validation and cleaning.

use thiserror::Error;

/// Longest accepted chirp, in characters.
pub const MAX_CHIRP_LENGTH: usize = 140;

/// Replacement for filtered words.
pub const PROFANE_REPLACEMENT: &str = "****";

/// Filtered words (matched case-insensitively, also inside longer words).
const PROFANE_WORDS: [&str; 3] = ["kerfuffle", "sharbert", "fornax"];

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ChirpError {
    #[error("Chirp is too long")]
    TooLong,
}

/// Check the length limit and return the cleaned body.
pub fn validate_chirp(body: &str) -> Result<String, ChirpError> {
    if body.chars().count() > MAX_CHIRP_LENGTH {
        return Err(ChirpError::TooLong);
    }
    Ok(clean_profanity(body))
}

/// Replace every filtered word with [`PROFANE_REPLACEMENT`].
pub fn clean_profanity(body: &str) -> String {
    // ASCII folding keeps byte offsets aligned with `body`.
    let folded = body.to_ascii_lowercase();
    let mut cleaned = String::with_capacity(body.len());
    let mut pos = 0;

    while pos < body.len() {
        let hit = PROFANE_WORDS
            .iter()
            .find(|word| folded[pos..].starts_with(*word));
        match hit {
            Some(word) => {
                cleaned.push_str(PROFANE_REPLACEMENT);
                pos += word.len();
            }
            None => {
                let Some(ch) = body[pos..].chars().next() else {
                    break;
                };
                cleaned.push(ch);
                pos += ch.len_utf8();
            }
        }
    }

    cleaned
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clean_body_is_unchanged() {
        let body = "I had something interesting for breakfast";
        assert_eq!(validate_chirp(body).unwrap(), body);
    }

    #[test]
    fn profanity_is_replaced_case_insensitively() {
        assert_eq!(
            clean_profanity("I hear Mastodon is better than Chirpy. sharbert I need to migrate"),
            "I hear Mastodon is better than Chirpy. **** I need to migrate"
        );
        assert_eq!(
            clean_profanity("I really need a kerfuffle to go to bed sooner, Fornax !"),
            "I really need a **** to go to bed sooner, **** !"
        );
        assert_eq!(clean_profanity("KERFUFFLE"), "****");
    }

    #[test]
    fn profanity_inside_words_is_replaced() {
        assert_eq!(clean_profanity("superkerfuffled"), "super****d");
    }

    #[test]
    fn non_ascii_text_survives() {
        assert_eq!(clean_profanity("héllo fornax ü ok"), "héllo **** ü ok");
    }

    #[test]
    fn length_limit_counts_characters() {
        let at_limit = "é".repeat(MAX_CHIRP_LENGTH);
        assert!(validate_chirp(&at_limit).is_ok());

        let over = "a".repeat(MAX_CHIRP_LENGTH + 1);
        assert_eq!(validate_chirp(&over), Err(ChirpError::TooLong));
    }
}
