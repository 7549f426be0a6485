//! Extracts the story from raw model output.
//!
//! Reasoning models wrap their deliberation in `<think>` … `</think>`. The
//! deliberation is mostly English analysis, but the model often drafts the
//! actual French story inside it, sometimes without ever closing the block.
//! The filter below is a line heuristic, not a parser: it keeps lines that
//! read like French prose and drops lines that read like analysis.

use crate::engine::analyzer::tokenize;

pub const THINK_OPEN: &str = "<think>";
pub const THINK_CLOSE: &str = "</think>";

/// Minimum length of a narrative line inside a reasoning segment.
const SEGMENT_LINE_MIN_CHARS: usize = 20;
/// Minimum length of a standalone narrative line outside reasoning segments.
const STANDALONE_LINE_MIN_CHARS: usize = 30;

/// Words a French narrative paragraph may open with.
const SENTENCE_OPENERS: &[&str] = &[
    "À", "Au", "Aux", "Dans", "En", "Le", "La", "Les", "L", "Un", "Une", "Des", "Du", "De",
    "D", "Il", "Elle", "Ils", "Elles", "On", "Ce", "Cet", "Cette", "Ces", "C", "Sur", "Sous",
    "Depuis", "Quand", "Lorsque", "Alors", "Ainsi", "Pourtant", "Cependant", "Mais", "Et",
    "Chaque", "Jamais", "Personne", "Par", "Pendant", "Parmi", "Derrière", "Devant", "Entre",
    "Loin", "Près", "Tout", "Toute", "Tous", "Toutes", "Son", "Sa", "Ses", "Leur", "Leurs",
    "Nul", "Quelques", "Soudain", "Ici", "Là", "Autour", "Avant", "Après",
];

const FUNCTION_WORDS: &[&str] = &[
    "le", "la", "les", "l", "de", "des", "du", "d", "et", "un", "une", "dans", "en", "à",
    "au", "aux", "qui", "que", "qu", "sur", "pour", "par", "est", "il", "elle", "se", "son",
    "sa", "ses", "ne", "pas",
];

/// Analysis chatter and meta-commentary, matched case-insensitively.
const DENIED_PHRASES: &[&str] = &[
    "i need", "i should", "i must", "i will", "i'll", "i'm ", "i think", "let me", "let's",
    "we need", "the user", "the story", "the prompt", "the narrative", "the text",
    "the reader", "in french", "word count", "make sure", "okay", "hmm", "wait,",
    "alternatively", "first,", "maybe", "nombre de mots", "voici le récit", "voici un récit",
    "voici une histoire", "je vais", "je dois", "il faut que je", "mots environ", "consigne",
];

/// Turns raw backend output into narrative text.
///
/// An empty result means nothing usable was found. Implementations must never
/// return the reasoning delimiters.
pub trait ResponseSanitizer: Send {
    fn clean(&self, raw: &str) -> String;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct ReasoningFilter;

impl ResponseSanitizer for ReasoningFilter {
    fn clean(&self, raw: &str) -> String {
        let split = split_reasoning(raw);

        let mut accepted: Vec<String> = Vec::new();
        for segment in &split.reasoning {
            accept_from_segment(segment, &mut accepted);
        }
        for line in split.outside.lines().map(str::trim) {
            if is_standalone_narrative(line) {
                accepted.push(line.to_string());
            }
        }

        if accepted.iter().all(|l| l.is_empty()) {
            return strip_markers(&split.outside).trim().to_string();
        }

        // Collapsing only shortens space runs, so it cannot rebuild a marker.
        collapse_spaces(&strip_markers(&accepted.join("\n\n"))).trim().to_string()
    }
}

struct Split<'a> {
    reasoning: Vec<&'a str>,
    outside: String,
}

fn split_reasoning(raw: &str) -> Split<'_> {
    let mut reasoning = Vec::new();
    let mut outside = String::new();
    let mut rest = raw;

    // a close marker with no opener: everything before it was deliberation
    if let Some(close) = rest.find(THINK_CLOSE) {
        if rest.find(THINK_OPEN).map_or(true, |open| open > close) {
            reasoning.push(&rest[..close]);
            rest = &rest[close + THINK_CLOSE.len()..];
        }
    }

    while let Some(open) = rest.find(THINK_OPEN) {
        outside.push_str(&rest[..open]);
        let body = &rest[open + THINK_OPEN.len()..];

        match body.find(THINK_CLOSE) {
            Some(close) => {
                reasoning.push(&body[..close]);
                rest = &body[close + THINK_CLOSE.len()..];
            }
            None => {
                // truncated output: the remainder is one segment
                reasoning.push(body);
                rest = "";
            }
        }
    }
    outside.push_str(rest);

    Split {
        reasoning,
        outside: strip_markers(&outside),
    }
}

fn accept_from_segment(segment: &str, accepted: &mut Vec<String>) {
    let mut run: Vec<String> = Vec::new();
    let mut started = false;

    for line in segment.lines().map(str::trim) {
        if !started {
            if is_narrative_start(line) {
                started = true;
                run.push(line.to_string());
            }
            continue;
        }

        if line.is_empty() {
            if run.last().is_some_and(|l| !l.is_empty()) {
                run.push(String::new());
            }
            continue;
        }
        if contains_denied_phrase(line) {
            break;
        }
        if line.chars().count() > SEGMENT_LINE_MIN_CHARS && has_function_word(line) {
            run.push(line.to_string());
        }
    }

    while run.last().is_some_and(|l| l.is_empty()) {
        run.pop();
    }
    accepted.extend(run);
}

fn is_narrative_start(line: &str) -> bool {
    line.chars().count() > SEGMENT_LINE_MIN_CHARS
        && starts_with_opener(line)
        && !contains_denied_phrase(line)
}

fn is_standalone_narrative(line: &str) -> bool {
    line.chars().count() > STANDALONE_LINE_MIN_CHARS
        && has_function_word(line)
        && !contains_denied_phrase(line)
}

fn starts_with_opener(line: &str) -> bool {
    let body = line.trim_start_matches(|c: char| {
        c.is_whitespace() || matches!(c, '«' | '"' | '—' | '–' | '-' | '*' | '_')
    });
    let first: String = body.chars().take_while(|c| c.is_alphabetic()).collect();
    SENTENCE_OPENERS.contains(&first.as_str())
}

fn has_function_word(line: &str) -> bool {
    tokenize(line)
        .iter()
        .any(|t| FUNCTION_WORDS.contains(&t.as_str()))
}

fn contains_denied_phrase(line: &str) -> bool {
    let lower = line.to_lowercase();
    DENIED_PHRASES.iter().any(|p| lower.contains(p))
}

/// Removes markers until none are left; one pass can splice a new marker
/// out of the text around a removed one.
fn strip_markers(text: &str) -> String {
    let mut out = text.to_string();
    while out.contains(THINK_OPEN) || out.contains(THINK_CLOSE) {
        out = out.replace(THINK_OPEN, "").replace(THINK_CLOSE, "");
    }
    out
}

fn collapse_spaces(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut previous_space = false;
    for c in text.chars() {
        if c == ' ' {
            if !previous_space {
                out.push(c);
            }
            previous_space = true;
        } else {
            out.push(c);
            previous_space = false;
        }
    }
    out
}
