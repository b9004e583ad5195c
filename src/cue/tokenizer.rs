use once_cell::sync::Lazy;
use regex::Regex;

use super::model::Token;

// Letters and digits, with inner apostrophes kept ("don't", "l'eau")
static WORD_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[\p{L}\p{N}]+(?:['’][\p{L}\p{N}]+)*").unwrap()
});

/// Normalize a word to its lookup form
pub fn normalize_term(term: &str) -> String {
    term.trim().to_lowercase()
}

/// Split text into alternating word and separator tokens.
///
/// Word tokens carry their lower-cased form and are clickable; the runs of
/// punctuation and whitespace between them are not. Concatenating the token
/// texts yields the input unchanged.
pub fn tokenize(text: &str) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut cursor = 0;

    for word in WORD_REGEX.find_iter(text) {
        if word.start() > cursor {
            tokens.push(Token::plain(&text[cursor..word.start()]));
        }
        tokens.push(Token::new(word.as_str(), normalize_term(word.as_str())));
        cursor = word.end();
    }

    if cursor < text.len() {
        tokens.push(Token::plain(&text[cursor..]));
    }

    tokens
}
