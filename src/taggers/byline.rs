//! Byline tagging: "By <name>" credits, staff titles, and the
//! contributor-biography sentence that follows opinion pieces.

use super::TagStats;
use crate::models::{Elem, FunctionTag, FuzzyPattern, Issue};

const TITLE_ADJECTIVES: &[&str] = &[
    "ASSOCIATED",
    "STAFF",
    "EDITORIAL",
    "MANAGING",
    "CONTRIBUTING",
    "COMMENTARY",
    "SPORTS",
    "OUTDOOR",
];

const TITLE_NOUNS: &[&str] = &[
    "PRESS", "STAFF", "EDITOR", "WRITER", "REPORT", "REPORTER", "ARTIST",
];

const CLASS_NOUNS: &[&str] = &[
    "FRESHMAN",
    "SOPHOMORE",
    "JUNIOR",
    "SENIOR",
    "MAJOR",
    "PROFESSOR",
];

/// Tag byline lines. Hits from the author and biography matchers are
/// unioned, deduplicated, and applied only to still-unset lines.
pub fn tag(issue: &mut Issue) -> TagStats {
    let mut matched: Vec<usize> = find_byline(issue);
    matched.extend(find_description(issue));
    matched.sort_unstable();
    matched.dedup();

    let mut tagged = 0;
    for index in matched {
        if let Some(line) = issue.get(index) {
            if line.function == FunctionTag::Unset {
                issue.set_role(index, FunctionTag::Byline);
                tagged += 1;
            }
        }
    }
    TagStats {
        lines_tagged: tagged,
    }
}

/// An anchored "by <name>" credit, optionally prefixed with "story"
/// and optionally followed by a second name or a staff title.
fn author_pattern() -> FuzzyPattern {
    FuzzyPattern::new(
        vec![
            Elem::opt(Elem::word("STORY", 2)),
            Elem::word("BY", 1),
            Elem::run(1, 3),
            Elem::opt(Elem::word("AND", 1)),
            Elem::run(0, 3),
            Elem::opt(Elem::one_of(TITLE_ADJECTIVES, 2, None)),
            Elem::opt(Elem::one_of(TITLE_NOUNS, 2, None)),
        ],
        3,
    )
}

/// An anchored staff title with no name, e.g. "Staff Writer" or
/// "Associated Press".
fn title_pattern() -> FuzzyPattern {
    FuzzyPattern::new(
        vec![
            Elem::opt(Elem::one_of(&["DAILY", "AP"], 1, None)),
            Elem::opt(Elem::one_of(TITLE_ADJECTIVES, 2, None)),
            Elem::one_of(TITLE_NOUNS, 2, None),
        ],
        3,
    )
}

/// The "<Name> is a <class> <major>" biography sentence.
fn description_pattern() -> FuzzyPattern {
    FuzzyPattern::new(
        vec![
            Elem::run(2, 3),
            Elem::word("IS", 1),
            Elem::word("A", 0),
            Elem::opt(Elem::phrase("CAL POLY", 2)),
            Elem::run(1, 2),
            Elem::one_of(CLASS_NOUNS, 2, None),
            Elem::run(0, 8),
        ],
        3,
    )
}

/// Lines a byline can never be: long lines and anything with a colon
/// (datelines, scoreboard rows).
fn eligible(text: &str) -> bool {
    text.len() < 100 && !text.contains(':')
}

fn find_byline(issue: &Issue) -> Vec<usize> {
    let author = author_pattern();
    let title = title_pattern();
    issue
        .lines()
        .filter_map(|(index, line)| {
            let text = line.clean_text()?;
            if !eligible(&text) {
                return None;
            }
            (author.matches(&text).is_some() || title.matches(&text).is_some()).then_some(index)
        })
        .collect()
}

fn find_description(issue: &Issue) -> Vec<usize> {
    let pattern = description_pattern();
    issue
        .lines()
        .filter_map(|(index, line)| {
            let text = line.clean_text()?;
            if !eligible(&text) {
                return None;
            }
            pattern.matches(&text).map(|_| index)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Line;

    fn issue_of(texts: &[&str]) -> Issue {
        Issue::new(texts.iter().map(|t| Line::new(1, *t)).collect())
    }

    #[test]
    fn test_simple_byline() {
        let mut issue = issue_of(&["By Jane Doe"]);
        let stats = tag(&mut issue);
        assert_eq!(stats.lines_tagged, 1);
        assert_eq!(issue.get(0).unwrap().function, FunctionTag::Byline);
    }

    #[test]
    fn test_byline_with_title() {
        let mut issue = issue_of(&["By Jane Doe, Staff Writer"]);
        tag(&mut issue);
        assert_eq!(issue.get(0).unwrap().function, FunctionTag::Byline);
    }

    #[test]
    fn test_story_by_two_authors() {
        let mut issue = issue_of(&["Story by Jane Doe and John Smith"]);
        tag(&mut issue);
        assert_eq!(issue.get(0).unwrap().function, FunctionTag::Byline);
    }

    #[test]
    fn test_bare_staff_title() {
        let mut issue = issue_of(&["Staff Writer"]);
        tag(&mut issue);
        assert_eq!(issue.get(0).unwrap().function, FunctionTag::Byline);
    }

    #[test]
    fn test_biography_sentence() {
        let mut issue = issue_of(&["Jane Doe is a journalism senior"]);
        tag(&mut issue);
        assert_eq!(issue.get(0).unwrap().function, FunctionTag::Byline);
    }

    #[test]
    fn test_colon_line_rejected() {
        let mut issue = issue_of(&["By the numbers: 44"]);
        let stats = tag(&mut issue);
        assert_eq!(stats.lines_tagged, 0);
    }

    #[test]
    fn test_ordinary_sentence_rejected() {
        let mut issue = issue_of(&["The game went into overtime after a late goal."]);
        let stats = tag(&mut issue);
        assert_eq!(stats.lines_tagged, 0);
    }
}
