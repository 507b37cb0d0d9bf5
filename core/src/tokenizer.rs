use std::collections::HashSet;

/// Tokenize one string into the given set: lowercase, split on single
/// spaces, then emit every word plus every contiguous 2-gram and 3-gram
/// (words re-joined with one space). Empty words (empty input, runs of
/// spaces) are dropped so the empty token never reaches the index.
pub fn tokenize_into(text: &str, tokens: &mut HashSet<String>) {
    let lowered = text.to_lowercase();
    let words: Vec<&str> = lowered.split(' ').filter(|w| !w.is_empty()).collect();
    for word in &words {
        tokens.insert((*word).to_string());
    }
    for pair in words.windows(2) {
        tokens.insert(pair.join(" "));
    }
    for triple in words.windows(3) {
        tokens.insert(triple.join(" "));
    }
}

/// Token set for a whole bag of strings. N-grams never cross string
/// boundaries.
pub fn tokenize_all<'a, I>(strings: I) -> HashSet<String>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut tokens = HashSet::new();
    for s in strings {
        tokenize_into(s, &mut tokens);
    }
    tokens
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens_of(text: &str) -> HashSet<String> {
        tokenize_all([text])
    }

    #[test]
    fn two_words_yield_unigrams_and_bigram() {
        let tokens = tokens_of("dir name1");
        let expected: HashSet<String> =
            ["dir", "name1", "dir name1"].iter().map(|s| s.to_string()).collect();
        assert_eq!(tokens, expected);
    }

    #[test]
    fn three_words_include_the_trigram() {
        let tokens = tokens_of("genre name one");
        assert!(tokens.contains("genre"));
        assert!(tokens.contains("genre name"));
        assert!(tokens.contains("name one"));
        assert!(tokens.contains("genre name one"));
        assert_eq!(tokens.len(), 6);
    }

    #[test]
    fn single_word_yields_only_itself() {
        let tokens = tokens_of("Shawshank");
        let expected: HashSet<String> = ["shawshank".to_string()].into_iter().collect();
        assert_eq!(tokens, expected);
    }

    #[test]
    fn empty_string_yields_no_tokens() {
        assert!(tokens_of("").is_empty());
    }

    #[test]
    fn repeated_spaces_do_not_produce_empty_tokens() {
        let tokens = tokens_of("dir  name1");
        assert!(tokens.iter().all(|t| !t.contains("  ") && !t.is_empty()));
        assert!(tokens.contains("dir name1"));
    }

    #[test]
    fn ngrams_do_not_cross_string_boundaries() {
        let tokens = tokenize_all(["dir", "name1"]);
        assert!(!tokens.contains("dir name1"));
    }
}
