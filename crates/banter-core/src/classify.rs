//! Keyword categorizer.
//!
//! Maps a free-text question to a topical category using n-gram phrase
//! matching: every keyword phrase that occurs verbatim in the question
//! contributes its word count to its category's score, and the category
//! with the strictly highest score wins. Longer phrases therefore beat
//! their shorter prefixes ("when will i" outscores "will i").

use std::collections::HashSet;

use indexmap::IndexMap;

/// Category keyword table: category name to ordered keyword phrases.
///
/// Insertion order is significant: on a score tie the earliest category
/// wins, so two table constructions with different orderings are
/// different tables.
pub type KeywordTable = IndexMap<String, Vec<String>>;

/// Reserved fallback category; returned when nothing matches.
pub const GENERAL_CATEGORY: &str = "general";

/// Return every contiguous n-word span of `tokens`.
///
/// `ngrams(&["when", "will", "i", "sleep"], 2)` yields
/// `["when will", "will i", "i sleep"]`.
pub fn ngrams(tokens: &[&str], n: usize) -> Vec<String> {
    if n == 0 || n > tokens.len() {
        return Vec::new();
    }
    tokens.windows(n).map(|w| w.join(" ")).collect()
}

/// Longest keyword phrase (in words) anywhere in the table, minimum 1.
fn max_phrase_len(table: &KeywordTable) -> usize {
    table
        .values()
        .flatten()
        .map(|phrase| phrase.split_whitespace().count())
        .max()
        .unwrap_or(1)
        .max(1)
}

/// Categorize a question against a keyword table.
///
/// Scoring is presence-based: each keyword phrase found among the
/// question's n-grams adds its word count once, regardless of how many
/// positions it occurs at. A best score of zero falls back to
/// [`GENERAL_CATEGORY`]; ties resolve to the category inserted first.
pub fn categorize<'a>(question: &str, table: &'a KeywordTable) -> &'a str {
    let lowered = question.to_lowercase();
    let tokens: Vec<&str> = lowered.split_whitespace().collect();

    let max_len = max_phrase_len(table);
    let mut spans: HashSet<String> = HashSet::new();
    for n in 1..=max_len {
        spans.extend(ngrams(&tokens, n));
    }

    let mut best: Option<(&str, usize)> = None;
    for (category, phrases) in table {
        let score: usize = phrases
            .iter()
            .map(|phrase| phrase.to_lowercase())
            .filter(|phrase| spans.contains(phrase.as_str()))
            .map(|phrase| phrase.split_whitespace().count())
            .sum();

        // Strict comparison keeps the earliest category on ties.
        if best.map_or(true, |(_, top)| score > top) {
            best = Some((category.as_str(), score));
        }
    }

    match best {
        Some((category, score)) if score > 0 => category,
        _ => GENERAL_CATEGORY,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_table(entries: &[(&str, &[&str])]) -> KeywordTable {
        entries
            .iter()
            .map(|(cat, kws)| {
                (
                    cat.to_string(),
                    kws.iter().map(|k| k.to_string()).collect(),
                )
            })
            .collect()
    }

    #[test]
    fn test_ngrams_basic() {
        let tokens = ["when", "will", "i", "sleep"];
        assert_eq!(
            ngrams(&tokens, 2),
            vec!["when will", "will i", "i sleep"]
        );
        assert_eq!(ngrams(&tokens, 4), vec!["when will i sleep"]);
        assert!(ngrams(&tokens, 5).is_empty());
        assert!(ngrams(&tokens, 0).is_empty());
    }

    #[test]
    fn test_longer_phrase_outweighs_shorter() {
        let table = make_table(&[
            ("yesno", &["will i"] as &[&str]),
            ("timing", &["when will i"]),
        ]);
        // "when will i" scores 3 for timing, "will i" scores 2 for yesno.
        assert_eq!(categorize("when will i sleep", &table), "timing");
    }

    #[test]
    fn test_no_match_falls_back_to_general() {
        let table = make_table(&[("timing", &["when"] as &[&str])]);
        assert_eq!(categorize("completely unrelated", &table), "general");
        assert_eq!(categorize("", &table), "general");
    }

    #[test]
    fn test_empty_table_falls_back_to_general() {
        let table = KeywordTable::default();
        assert_eq!(categorize("when will i sleep", &table), "general");

        let empty_lists = make_table(&[
            ("timing", &[] as &[&str]),
            ("yesno", &[]),
        ]);
        assert_eq!(categorize("when will i sleep", &empty_lists), "general");
    }

    #[test]
    fn test_tie_break_prefers_insertion_order() {
        let first_wins = make_table(&[
            ("alpha", &["sleep"] as &[&str]),
            ("beta", &["when"]),
        ]);
        let reversed = make_table(&[
            ("beta", &["when"] as &[&str]),
            ("alpha", &["sleep"]),
        ]);
        // Both categories score 1; insertion order decides, repeatably.
        for _ in 0..10 {
            assert_eq!(categorize("when will i sleep", &first_wins), "alpha");
            assert_eq!(categorize("when will i sleep", &reversed), "beta");
        }
    }

    #[test]
    fn test_matching_is_case_insensitive() {
        let table = make_table(&[("timing", &["When Will I"] as &[&str])]);
        assert_eq!(categorize("WHEN WILL I SLEEP?", &table), "timing");
        // Tokenization is whitespace-only, so punctuation sticks to its word.
        assert_eq!(categorize("WHEN WILL I?", &table), "general");
    }

    #[test]
    fn test_presence_scored_once_per_phrase() {
        let table = make_table(&[
            ("echo", &["kring"] as &[&str]),
            ("pair", &["will i"]),
        ]);
        // "kring" appears three times but still scores 1; "will i" scores 2.
        assert_eq!(categorize("kring kring kring will i", &table), "pair");
    }

    #[test]
    fn test_phrase_longer_than_question_never_matches() {
        let table = make_table(&[("long", &["one two three four"] as &[&str])]);
        assert_eq!(categorize("one two", &table), "general");
    }
}
