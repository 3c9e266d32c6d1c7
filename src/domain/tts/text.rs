use once_cell::sync::Lazy;
use regex::Regex;

static STYLE_TAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"\[[^\]]*\]").expect("valid style tag pattern"));
static EMPHASIS_MARKER: Lazy<Regex> = Lazy::new(|| Regex::new(r"[*_]+").expect("valid emphasis pattern"));
static EMPHASIZED_WORDS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\*+([^*]+)\*+").expect("valid emphasized words pattern"));
static SENTENCE_END: Lazy<Regex> = Lazy::new(|| Regex::new(r"[.!?]+").expect("valid sentence pattern"));
static CLAUSE_BREAK: Lazy<Regex> = Lazy::new(|| Regex::new(r"[,;:]").expect("valid clause pattern"));
static SENTENCE_BOUNDARY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[.!?]+\s+").expect("valid sentence boundary pattern"));
static WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("valid whitespace pattern"));

/// Remove `[style tags]` and emphasis markers, collapse whitespace
pub fn sanitize_for_speech(text: &str) -> String {
    let without_tags = STYLE_TAG.replace_all(text, " ");
    let without_emphasis = EMPHASIS_MARKER.replace_all(&without_tags, "");
    let normalized = WHITESPACE.replace_all(&without_emphasis, " ");

    normalized.trim().to_string()
}

/// Mechanical delivery for the robotic character: emphasized words are
/// shouted, sentence ends become long pauses and clause breaks short ones.
pub fn robotic_cadence(text: &str) -> String {
    let shouted = EMPHASIZED_WORDS.replace_all(text, |caps: &regex::Captures| caps[1].to_uppercase());
    let paused = SENTENCE_END.replace_all(&shouted, " ... ");
    let clipped = CLAUSE_BREAK.replace_all(&paused, " - ");

    sanitize_for_speech(&clipped)
}

/// Split text into batches of at most `max_len` bytes, preferring sentence
/// boundaries and falling back to hard character splits.
pub fn split_into_batches(text: &str, max_len: usize) -> Vec<String> {
    if text.len() <= max_len {
        return vec![text.to_string()];
    }

    let mut batches = Vec::new();
    let mut current = String::new();
    let mut last_end = 0;

    for boundary in SENTENCE_BOUNDARY.find_iter(text) {
        let sentence = &text[last_end..boundary.end()];
        push_piece(&mut batches, &mut current, sentence, max_len);
        last_end = boundary.end();
    }
    if last_end < text.len() {
        push_piece(&mut batches, &mut current, &text[last_end..], max_len);
    }
    if !current.trim().is_empty() {
        batches.push(current.trim().to_string());
    }

    batches
}

fn push_piece(batches: &mut Vec<String>, current: &mut String, piece: &str, max_len: usize) {
    if !current.is_empty() && current.len() + piece.len() > max_len {
        batches.push(current.trim().to_string());
        current.clear();
    }

    if piece.len() <= max_len {
        current.push_str(piece);
        return;
    }

    // A single piece longer than the limit is cut on char boundaries
    let mut chunk = String::new();
    for ch in piece.chars() {
        if chunk.len() + ch.len_utf8() > max_len {
            batches.push(std::mem::take(&mut chunk));
        }
        chunk.push(ch);
    }
    current.push_str(&chunk);
}
