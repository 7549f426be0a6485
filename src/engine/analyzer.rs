use std::collections::HashMap;

use crate::model::analysis::Analysis;

pub const TOP_WORDS: usize = 10;

/// Words that signal the story has drifted away from recorded history.
pub const DIVERGENCE_MARKERS: [&str; 10] = [
    "alternative",
    "différent",
    "inhabituel",
    "étrange",
    "mystérieux",
    "inexpliqué",
    "nouveau",
    "révolutionnaire",
    "impossible",
    "magique",
];

pub struct TextAnalyzer;

impl TextAnalyzer {
    pub fn analyze(text: &str) -> Analysis {
        let tokens = tokenize(text);
        let word_count = tokens.len();

        let marker_hits = tokens
            .iter()
            .filter(|t| DIVERGENCE_MARKERS.contains(&t.as_str()))
            .count();

        let divergence_score = if word_count == 0 {
            0.0
        } else {
            marker_hits as f64 * 100.0 / word_count as f64
        };

        Analysis {
            word_count,
            common_words: most_common(&tokens, TOP_WORDS),
            divergence_score,
        }
    }
}

/// Lower-cased runs of letters, digits and underscores. Accented letters count.
pub fn tokenize(text: &str) -> Vec<String> {
    text.split(|c: char| !(c.is_alphanumeric() || c == '_'))
        .filter(|w| !w.is_empty())
        .map(str::to_lowercase)
        .collect()
}

fn most_common(tokens: &[String], limit: usize) -> Vec<(String, usize)> {
    let mut seen: HashMap<&str, usize> = HashMap::new();
    let mut counts: Vec<(String, usize)> = Vec::new();

    for token in tokens {
        match seen.get(token.as_str()) {
            Some(&slot) => counts[slot].1 += 1,
            None => {
                seen.insert(token, counts.len());
                counts.push((token.clone(), 1));
            }
        }
    }

    // stable: equal counts keep first-occurrence order
    counts.sort_by(|a, b| b.1.cmp(&a.1));
    counts.truncate(limit);
    counts
}
