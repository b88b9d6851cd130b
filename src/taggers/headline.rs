//! Headline tagging. There is no reliable surface pattern for a
//! headline, so this combines several weak signals: token count,
//! punctuation shape, part-of-speech composition, dictionary
//! coverage, and whether a byline follows.

use super::TagStats;
use crate::classify::Lexicon;
use crate::models::{FunctionTag, Issue};

const DETERMINERS: &[&str] = &[
    "the", "a", "an", "this", "that", "these", "those", "each", "every", "either", "neither",
];

const PRONOUNS: &[&str] = &[
    "i", "you", "he", "she", "it", "we", "they", "me", "him", "her", "us", "them", "my", "your",
    "his", "its", "our", "their", "who", "whom", "which",
];

const COMMON_VERBS: &[&str] = &[
    "is", "are", "was", "were", "be", "been", "being", "am", "has", "have", "had", "do", "does",
    "did", "will", "would", "shall", "should", "may", "might", "can", "could", "must", "say",
    "says", "said", "get", "gets", "got", "go", "goes", "went", "gone", "make", "makes", "made",
    "take", "takes", "took", "come", "comes", "came", "see", "sees", "saw", "seen", "give",
    "gives", "gave",
];

/// Coarse part-of-speech guess for one token. Closed classes are
/// looked up; verbs by list and suffix; everything else reads as a
/// noun, which is the right default for headline vocabulary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Pos {
    Determiner,
    Pronoun,
    Verb,
    Noun,
}

fn guess_pos(token: &str) -> Pos {
    let word: String = token
        .chars()
        .filter(|c| c.is_alphanumeric())
        .collect::<String>()
        .to_lowercase();
    if DETERMINERS.contains(&word.as_str()) {
        Pos::Determiner
    } else if PRONOUNS.contains(&word.as_str()) {
        Pos::Pronoun
    } else if COMMON_VERBS.contains(&word.as_str())
        || (word.len() > 5 && (word.ends_with("ing") || word.ends_with("ed")))
    {
        Pos::Verb
    } else {
        Pos::Noun
    }
}

/// Configuration for the headline heuristic.
#[derive(Debug, Clone)]
pub struct HeadlineConfig {
    pub min_tokens: usize,
    pub max_tokens: usize,
    pub max_chars: usize,
    /// Minimum dictionary-word coverage of the line.
    pub min_dict_ratio: f64,
}

impl Default for HeadlineConfig {
    fn default() -> Self {
        Self {
            min_tokens: 2,
            max_tokens: 10,
            max_chars: 80,
            min_dict_ratio: 0.5,
        }
    }
}

/// Tag headline lines among still-unset rows.
pub fn tag(issue: &mut Issue, config: &HeadlineConfig, lexicon: &Lexicon) -> TagStats {
    let mut matched = Vec::new();
    for (index, line) in issue.lines() {
        if line.function != FunctionTag::Unset {
            continue;
        }
        let Some(text) = line.clean_text() else {
            continue;
        };
        let next_is_byline = issue.neighbor_role(index, 1) == FunctionTag::Byline;
        if is_headline(&text, next_is_byline, config, lexicon) {
            matched.push(index);
        }
    }

    for &index in &matched {
        issue.set_role(index, FunctionTag::Headline);
    }
    TagStats {
        lines_tagged: matched.len(),
    }
}

fn is_headline(
    text: &str,
    next_is_byline: bool,
    config: &HeadlineConfig,
    lexicon: &Lexicon,
) -> bool {
    let tokens: Vec<&str> = text.split_whitespace().collect();
    if tokens.len() < config.min_tokens || tokens.len() > config.max_tokens {
        return false;
    }
    if text.len() >= config.max_chars {
        return false;
    }
    // Headlines do not end like sentences.
    if text.contains('.') || text.ends_with('!') || text.ends_with('?') {
        return false;
    }
    if lexicon.dictionary_ratio(text) < config.min_dict_ratio && !next_is_byline {
        return false;
    }

    let pos: Vec<Pos> = tokens.iter().map(|t| guess_pos(t)).collect();
    if pos.contains(&Pos::Determiner) || pos.contains(&Pos::Pronoun) {
        return false;
    }
    let nouns = pos.iter().filter(|p| **p == Pos::Noun).count();
    let verbs = pos.iter().filter(|p| **p == Pos::Verb).count();

    let pos_ok = pos[0] == Pos::Noun && nouns * 2 > pos.len() && verbs <= 1;

    // A following byline is the strongest signal a line is a headline.
    pos_ok || (next_is_byline && nouns >= 1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Line;

    fn tagged_issue(texts: &[&str]) -> Issue {
        Issue::new(texts.iter().map(|t| Line::new(1, *t)).collect())
    }

    #[test]
    fn test_headline_before_byline() {
        let mut issue = tagged_issue(&["Students Win Regional Award", "By Jane Doe"]);
        issue.set_role(1, FunctionTag::Byline);
        let stats = tag(&mut issue, &HeadlineConfig::default(), &Lexicon::default());
        assert_eq!(stats.lines_tagged, 1);
        assert_eq!(issue.get(0).unwrap().function, FunctionTag::Headline);
    }

    #[test]
    fn test_headline_without_byline_still_matches() {
        let mut issue = tagged_issue(&["Students Win Regional Award"]);
        tag(&mut issue, &HeadlineConfig::default(), &Lexicon::default());
        assert_eq!(issue.get(0).unwrap().function, FunctionTag::Headline);
    }

    #[test]
    fn test_sentence_rejected() {
        let mut issue = tagged_issue(&["The council approved the budget."]);
        let stats = tag(&mut issue, &HeadlineConfig::default(), &Lexicon::default());
        assert_eq!(stats.lines_tagged, 0);
    }

    #[test]
    fn test_single_token_rejected() {
        let mut issue = tagged_issue(&["Sports"]);
        let stats = tag(&mut issue, &HeadlineConfig::default(), &Lexicon::default());
        assert_eq!(stats.lines_tagged, 0);
    }

    #[test]
    fn test_existing_role_not_overwritten() {
        let mut issue = tagged_issue(&["Students Win Regional Award"]);
        issue.set_role(0, FunctionTag::PublicationInfo);
        let stats = tag(&mut issue, &HeadlineConfig::default(), &Lexicon::default());
        assert_eq!(stats.lines_tagged, 0);
        assert_eq!(
            issue.get(0).unwrap().function,
            FunctionTag::PublicationInfo
        );
    }
}
