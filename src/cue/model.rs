/*!
 * Cue model types.
 *
 * A `Cue` is one timed subtitle line. Cues never change after normalization
 * except for their translation, and even that produces a new value.
 */

use log::warn;
use serde::{Deserialize, Serialize};
use std::ops::Deref;
use std::sync::Arc;

use crate::errors::CueError;
use crate::remote::{RawCue, RawToken};

use super::tokenizer::tokenize;

/// Language assumed when a cue does not say
pub const DEFAULT_CUE_LANGUAGE: &str = "en";

/// A substring of a cue's text
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    /// Text as displayed
    pub text: String,

    /// Lookup form; empty for punctuation and whitespace runs
    pub normalized_form: String,
}

impl Token {
    pub fn new(text: impl Into<String>, normalized_form: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            normalized_form: normalized_form.into(),
        }
    }

    /// Plain, non-clickable token
    pub fn plain(text: impl Into<String>) -> Self {
        Self::new(text, "")
    }

    /// Whether the token can be clicked for a dictionary lookup
    pub fn is_clickable(&self) -> bool {
        !self.normalized_form.is_empty()
    }
}

impl From<RawToken> for Token {
    fn from(raw: RawToken) -> Self {
        Self::new(raw.t, raw.norm)
    }
}

/// One timed subtitle line
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cue {
    /// Identifier, unique within a cue set
    pub id: i64,

    /// Start time in ms
    pub start_ms: u64,

    /// End time in ms
    pub end_ms: u64,

    /// Subtitle text in the source language
    pub source_text: String,

    /// Translated text; empty when not translated yet
    pub translation: String,

    /// Tokens of the source text
    pub tokens: Vec<Token>,

    /// Language of the source text
    pub language: String,
}

impl Cue {
    /// Build a cue with no translation or tokens
    pub fn new(id: i64, start_ms: u64, end_ms: u64, source_text: impl Into<String>) -> Self {
        Self {
            id,
            start_ms,
            end_ms,
            source_text: source_text.into(),
            translation: String::new(),
            tokens: Vec::new(),
            language: DEFAULT_CUE_LANGUAGE.to_string(),
        }
    }

    /// Build a cue, rejecting intervals that end before they start
    pub fn new_validated(
        id: i64,
        start_ms: u64,
        end_ms: u64,
        source_text: impl Into<String>,
    ) -> Result<Self, CueError> {
        if end_ms < start_ms {
            return Err(CueError::InvalidInterval { id, start_ms, end_ms });
        }
        Ok(Self::new(id, start_ms, end_ms, source_text))
    }

    /// Normalize a raw cue, filling absent fields with defaults.
    ///
    /// When `tokenize_missing` is set, a cue that arrives without tokens is
    /// tokenized from its text; otherwise it gets an empty token list.
    pub fn from_raw(raw: RawCue, tokenize_missing: bool) -> Self {
        let end_ms = if raw.end_ms < raw.start_ms {
            warn!(
                "Cue {} ends before it starts ({} < {}), clamping",
                raw.id, raw.end_ms, raw.start_ms
            );
            raw.start_ms
        } else {
            raw.end_ms
        };

        let tokens = match raw.tokens {
            Some(tokens) => tokens.into_iter().map(Token::from).collect(),
            None if tokenize_missing => tokenize(&raw.text),
            None => Vec::new(),
        };

        Self {
            id: raw.id,
            start_ms: raw.start_ms,
            end_ms,
            source_text: raw.text,
            translation: raw.translation.unwrap_or_default(),
            tokens,
            language: raw
                .lang
                .filter(|lang| !lang.is_empty())
                .unwrap_or_else(|| DEFAULT_CUE_LANGUAGE.to_string()),
        }
    }

    pub fn with_translation(&self, translation: impl Into<String>) -> Self {
        Self {
            translation: translation.into(),
            ..self.clone()
        }
    }

    pub fn with_tokens(mut self, tokens: Vec<Token>) -> Self {
        self.tokens = tokens;
        self
    }

    pub fn has_translation(&self) -> bool {
        !self.translation.is_empty()
    }

    pub fn start_seconds(&self) -> f64 {
        self.start_ms as f64 / 1000.0
    }

    pub fn end_seconds(&self) -> f64 {
        self.end_ms as f64 / 1000.0
    }

    /// Whether `time` (seconds) falls inside the closed interval of this cue
    pub fn contains(&self, time: f64) -> bool {
        time >= self.start_seconds() && time <= self.end_seconds()
    }

    /// Clickable tokens in order
    pub fn clickable_tokens(&self) -> impl Iterator<Item = &Token> {
        self.tokens.iter().filter(|token| token.is_clickable())
    }
}

/// Ordered cues for one video and language pair.
///
/// Clones share storage, so handing a set to several consumers is cheap.
/// Equality compares the cues themselves.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CueSet {
    cues: Arc<Vec<Cue>>,
}

impl CueSet {
    /// Wrap cues in their given order
    pub fn new(cues: Vec<Cue>) -> Self {
        Self { cues: Arc::new(cues) }
    }

    /// Wrap cues after a stable sort by start time; ties keep their order
    pub fn sorted(mut cues: Vec<Cue>) -> Self {
        cues.sort_by_key(|cue| cue.start_ms);
        Self::new(cues)
    }

    pub fn is_sorted(&self) -> bool {
        self.cues.windows(2).all(|pair| pair[0].start_ms <= pair[1].start_ms)
    }

    /// Whether both sets share the same storage
    pub fn ptr_eq(&self, other: &CueSet) -> bool {
        Arc::ptr_eq(&self.cues, &other.cues)
    }

    pub fn as_slice(&self) -> &[Cue] {
        &self.cues
    }

    pub fn to_vec(&self) -> Vec<Cue> {
        self.cues.as_ref().clone()
    }

    /// Cues that still need a translation
    pub fn missing_translations(&self) -> impl Iterator<Item = &Cue> {
        self.cues.iter().filter(|cue| !cue.has_translation())
    }

    pub fn find_by_id(&self, id: i64) -> Option<&Cue> {
        self.cues.iter().find(|cue| cue.id == id)
    }
}

impl Deref for CueSet {
    type Target = [Cue];

    fn deref(&self) -> &Self::Target {
        &self.cues
    }
}

impl From<Vec<Cue>> for CueSet {
    fn from(cues: Vec<Cue>) -> Self {
        Self::new(cues)
    }
}

impl<'a> IntoIterator for &'a CueSet {
    type Item = &'a Cue;
    type IntoIter = std::slice::Iter<'a, Cue>;

    fn into_iter(self) -> Self::IntoIter {
        self.cues.iter()
    }
}
