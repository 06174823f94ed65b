//! Tokenizer patterns shared by the scorers

use once_cell::sync::Lazy;
use regex::Regex;

/// Token patterns used by both scorers
pub struct TokenPatterns;

impl TokenPatterns {
    /// Lexicon tokens: letters with an optional contraction (`isn't`, `don't`)
    pub fn lexicon_word() -> &'static Regex {
        static PATTERN: Lazy<Regex> = Lazy::new(|| {
            Regex::new(r"[a-z]+(?:['’][a-z]+)?").expect("Valid lexicon word regex")
        });
        &PATTERN
    }

    /// Bag-of-words tokens: runs of two or more word characters
    pub fn bag_of_words_token() -> &'static Regex {
        static PATTERN: Lazy<Regex> =
            Lazy::new(|| Regex::new(r"\b\w\w+\b").expect("Valid bag-of-words token regex"));
        &PATTERN
    }
}

/// Lowercase and split text into lexicon words
pub fn lexicon_words(text: &str) -> Vec<String> {
    let lowered = text.to_lowercase();
    TokenPatterns::lexicon_word()
        .find_iter(&lowered)
        .map(|m| m.as_str().replace('’', "'"))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lexicon_words() {
        assert_eq!(
            lexicon_words("The mall ISN'T clean!"),
            vec!["the", "mall", "isn't", "clean"]
        );
        assert_eq!(lexicon_words("don’t"), vec!["don't"]);
        assert!(lexicon_words("  42 ... ").is_empty());
    }

    #[test]
    fn test_bag_of_words_skips_single_characters() {
        let tokens: Vec<&str> = TokenPatterns::bag_of_words_token()
            .find_iter("a great food court")
            .map(|m| m.as_str())
            .collect();
        assert_eq!(tokens, vec!["great", "food", "court"]);
    }
}
