use serde::{Deserialize, Serialize};

/// Lexical summary of one narrative. Derived, never edited.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Analysis {
    pub word_count: usize,

    /// Lower-cased tokens, most frequent first
    pub common_words: Vec<(String, usize)>,

    /// Share of marker tokens, in percent
    pub divergence_score: f64,
}
