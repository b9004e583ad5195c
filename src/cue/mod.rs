/*!
 * Cue model and time lookup.
 *
 * - `model`: `Token`, `Cue` and `CueSet` value types
 * - `tokenizer`: splitting cue text into clickable words
 * - `index`: `CueIndex`, the playback time to active cue search
 */

pub mod index;
pub mod model;
pub mod tokenizer;

pub use index::CueIndex;
pub use model::{Cue, CueSet, Token, DEFAULT_CUE_LANGUAGE};
pub use tokenizer::{normalize_term, tokenize};
