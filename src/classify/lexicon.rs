use std::collections::HashSet;
use std::path::Path;

use anyhow::{Context, Result};

/// Common English words used for dictionary-coverage statistics. A
/// small embedded list is enough: the features only need a coarse
/// "does this look like prose" signal, not spell checking.
const COMMON_WORDS: &[&str] = &[
    "the", "of", "and", "a", "to", "in", "is", "you", "that", "it", "he", "was", "for", "on",
    "are", "as", "with", "his", "they", "i", "at", "be", "this", "have", "from", "or", "one",
    "had", "by", "word", "but", "not", "what", "all", "were", "we", "when", "your", "can",
    "said", "there", "use", "an", "each", "which", "she", "do", "how", "their", "if", "will",
    "up", "other", "about", "out", "many", "then", "them", "these", "so", "some", "her",
    "would", "make", "like", "him", "into", "time", "has", "look", "two", "more", "write",
    "go", "see", "number", "no", "way", "could", "people", "my", "than", "first", "water",
    "been", "call", "who", "its", "now", "find", "long", "down", "day", "did", "get", "come",
    "made", "may", "part", "over", "new", "sound", "take", "only", "little", "work", "know",
    "place", "year", "live", "me", "back", "give", "most", "very", "after", "thing", "our",
    "just", "name", "good", "sentence", "man", "think", "say", "great", "where", "help",
    "through", "much", "before", "line", "right", "too", "mean", "old", "any", "same", "tell",
    "boy", "follow", "came", "want", "show", "also", "around", "form", "three", "small",
    "set", "put", "end", "does", "another", "well", "large", "must", "big", "even", "such",
    "because", "turn", "here", "why", "ask", "went", "men", "read", "need", "land",
    "different", "home", "us", "move", "try", "kind", "hand", "picture", "again", "change",
    "off", "play", "spell", "air", "away", "animal", "house", "point", "page", "letter",
    "mother", "answer", "found", "study", "still", "learn", "should", "america", "world",
    "high", "every", "near", "add", "food", "between", "own", "below", "country", "plant",
    "last", "school", "father", "keep", "tree", "never", "start", "city", "earth", "eye",
    "light", "thought", "head", "under", "story", "saw", "left", "few", "while", "along",
    "might", "close", "something", "seem", "next", "hard", "open", "example", "begin",
    "life", "always", "those", "both", "paper", "together", "got", "group", "often", "run",
    "important", "until", "children", "side", "feet", "car", "mile", "night", "walk",
    "white", "sea", "began", "grow", "took", "river", "four", "carry", "state", "once",
    "book", "hear", "stop", "without", "second", "later", "miss", "idea", "enough", "eat",
    "face", "watch", "far", "really", "almost", "let", "above", "girl", "sometimes",
    "mountain", "cut", "young", "talk", "soon", "list", "song", "being", "leave", "family",
    "students", "student", "university", "college", "campus", "professor", "game", "team",
    "win", "won", "award", "regional", "season", "board", "meeting", "council", "vote",
    "money", "public", "president", "office", "program", "week", "month", "center",
    "department", "report", "committee", "election", "police", "court", "judge", "budget",
];

/// Common first names, used for byline and name-density statistics.
const COMMON_NAMES: &[&str] = &[
    "james", "john", "robert", "michael", "william", "david", "richard", "joseph", "thomas",
    "charles", "christopher", "daniel", "matthew", "anthony", "donald", "mark", "paul",
    "steven", "andrew", "kenneth", "joshua", "kevin", "brian", "george", "edward", "ronald",
    "timothy", "jason", "jeffrey", "ryan", "jacob", "gary", "nicholas", "eric", "jonathan",
    "stephen", "larry", "justin", "scott", "brandon", "benjamin", "samuel", "gregory",
    "mary", "patricia", "jennifer", "linda", "elizabeth", "barbara", "susan", "jessica",
    "sarah", "karen", "nancy", "lisa", "betty", "margaret", "sandra", "ashley", "kimberly",
    "emily", "donna", "michelle", "dorothy", "carol", "amanda", "melissa", "deborah",
    "stephanie", "rebecca", "sharon", "laura", "cynthia", "kathleen", "amy", "shirley",
    "angela", "helen", "anna", "brenda", "pamela", "nicole", "katherine", "christine",
    "vivian", "diane", "julie", "heather",
];

/// Word and name dictionaries backing the feature extractors and the
/// headline heuristic. The embedded defaults can be extended from a
/// plain one-word-per-line file.
#[derive(Debug, Clone)]
pub struct Lexicon {
    words: HashSet<String>,
    names: HashSet<String>,
}

impl Default for Lexicon {
    fn default() -> Self {
        Self {
            words: COMMON_WORDS.iter().map(|w| w.to_string()).collect(),
            names: COMMON_NAMES.iter().map(|n| n.to_string()).collect(),
        }
    }
}

impl Lexicon {
    /// Extend the word list from a file of one word per line.
    pub fn load_words(&mut self, path: &Path) -> Result<()> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read word list: {:?}", path))?;
        for word in content.lines() {
            let word = word.trim().to_lowercase();
            if !word.is_empty() {
                self.words.insert(word);
            }
        }
        Ok(())
    }

    pub fn is_word(&self, word: &str) -> bool {
        let word = word.trim_matches(|c: char| !c.is_alphanumeric());
        if word.is_empty() {
            return false;
        }
        let word = word.to_lowercase();
        if self.words.contains(&word) {
            return true;
        }
        // The embedded list holds stems only; accept the common
        // inflections rather than storing every surface form.
        ["s", "es", "d", "ed", "ing"].iter().any(|suffix| {
            word.strip_suffix(suffix)
                .is_some_and(|stem| stem.len() >= 3 && self.words.contains(stem))
        })
    }

    pub fn is_name(&self, word: &str) -> bool {
        let word = word.trim_matches(|c: char| !c.is_alphanumeric());
        !word.is_empty() && self.names.contains(&word.to_lowercase())
    }

    /// Whitespace-split words of `text` found in the dictionary.
    pub fn dictionary_words<'a>(&self, text: &'a str) -> Vec<&'a str> {
        text.split_whitespace()
            .filter(|w| self.is_word(w))
            .collect()
    }

    /// Fraction of whitespace-split words found in the dictionary.
    pub fn dictionary_ratio(&self, text: &str) -> f64 {
        let words: Vec<&str> = text.split_whitespace().collect();
        if words.is_empty() {
            return 0.0;
        }
        self.dictionary_words(text).len() as f64 / words.len() as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_word_strips_punctuation() {
        let lexicon = Lexicon::default();
        assert!(lexicon.is_word("the"));
        assert!(lexicon.is_word("The,"));
        assert!(!lexicon.is_word("zzxqv"));
        assert!(!lexicon.is_word(""));
    }

    #[test]
    fn test_is_word_accepts_inflections() {
        let lexicon = Lexicon::default();
        assert!(lexicon.is_word("meetings"));
        assert!(lexicon.is_word("voted"));
        assert!(lexicon.is_word("starting"));
        assert!(lexicon.is_word("turns"));
        // A coincidental suffix on a non-word is still a non-word.
        assert!(!lexicon.is_word("zzxqving"));
    }

    #[test]
    fn test_dictionary_ratio() {
        let lexicon = Lexicon::default();
        assert!(lexicon.dictionary_ratio("the students won the game") > 0.9);
        assert!(lexicon.dictionary_ratio("xq zvw kjй qqq") < 0.1);
    }
}
