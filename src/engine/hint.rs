//! Progressive letter reveal for hints.

use serde::Serialize;

/// What the player is shown when asking for help.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Hint {
    pub word: Option<String>,
    pub message: String,
    pub masked_word: Option<String>,
    pub word_length: Option<usize>,
    pub fully_revealed: bool,
    pub steps_remaining: Option<usize>,
    pub hint_level: usize,
}

impl Hint {
    pub fn reached_target(level: usize) -> Self {
        Self {
            word: None,
            message: "You've reached the target word!".to_string(),
            masked_word: None,
            word_length: None,
            fully_revealed: false,
            steps_remaining: Some(0),
            hint_level: level,
        }
    }

    /// Builds a hint for `word` (or a generic nudge when there is none),
    /// revealing `level` leading letters.
    pub fn reveal(word: Option<String>, level: usize, steps_remaining: Option<usize>) -> Self {
        let Some(word) = word else {
            return Self {
                word: None,
                message: "Continue towards the target word".to_string(),
                masked_word: None,
                word_length: None,
                fully_revealed: false,
                steps_remaining,
                hint_level: level,
            };
        };

        let (masked, shown) = mask_word(&word, level);
        let length = word.chars().count();
        let fully_revealed = shown >= length;
        let message = if fully_revealed {
            format!("The word is '{}'", word.to_uppercase())
        } else {
            format!(
                "Revealing {} letter{}",
                shown,
                if shown > 1 { "s" } else { "" }
            )
        };

        Self {
            word: Some(word),
            message,
            masked_word: Some(masked),
            word_length: Some(length),
            fully_revealed,
            steps_remaining,
            hint_level: level,
        }
    }
}

/// Upper-cases the first `level` letters and hides the rest behind `_`.
/// Returns the mask and how many letters are shown.
pub fn mask_word(word: &str, level: usize) -> (String, usize) {
    let length = word.chars().count();
    let shown = level.min(length);
    let revealed: String = word.chars().take(shown).collect::<String>().to_uppercase();
    (format!("{}{}", revealed, "_".repeat(length - shown)), shown)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mask_word() {
        assert_eq!(mask_word("kitten", 1), ("K_____".to_string(), 1));
        assert_eq!(mask_word("kitten", 3), ("KIT___".to_string(), 3));
        assert_eq!(mask_word("kitten", 0), ("______".to_string(), 0));
        assert_eq!(mask_word("cat", 10), ("CAT".to_string(), 3));
    }

    #[test]
    fn test_reveal_messages() {
        let hint = Hint::reveal(Some("kitten".into()), 2, Some(3));
        assert_eq!(hint.masked_word.as_deref(), Some("KI____"));
        assert_eq!(hint.message, "Revealing 2 letters");
        assert_eq!(hint.word_length, Some(6));
        assert!(!hint.fully_revealed);

        let hint = Hint::reveal(Some("cat".into()), 1, Some(1));
        assert_eq!(hint.message, "Revealing 1 letter");

        let hint = Hint::reveal(Some("cat".into()), 3, Some(1));
        assert!(hint.fully_revealed);
        assert_eq!(hint.message, "The word is 'CAT'");
    }

    #[test]
    fn test_reveal_level_zero_hides_every_letter() {
        let hint = Hint::reveal(Some("dog".into()), 0, Some(2));
        assert_eq!(hint.masked_word.as_deref(), Some("___"));
        assert_eq!(hint.message, "Revealing 0 letter");
        assert!(!hint.fully_revealed);
        assert_eq!(hint.hint_level, 0);
    }

    #[test]
    fn test_reveal_without_word() {
        let hint = Hint::reveal(None, 1, None);
        assert!(hint.masked_word.is_none());
        assert_eq!(hint.message, "Continue towards the target word");
    }
}
