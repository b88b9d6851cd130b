//! Body-text tagging by length. After the structural matchers and the
//! classifiers have claimed their lines, long remaining lines are
//! almost always article prose.

use super::TagStats;
use crate::models::{FunctionTag, Issue};

/// Configuration for length-based body-text tagging.
#[derive(Debug, Clone)]
pub struct BodyConfig {
    /// Minimum word count for a line to read as prose.
    pub min_words: usize,
}

impl Default for BodyConfig {
    fn default() -> Self {
        Self { min_words: 10 }
    }
}

/// Tag long still-unset lines as body text.
pub fn tag(issue: &mut Issue, config: &BodyConfig) -> TagStats {
    let matched: Vec<usize> = issue
        .lines()
        .filter(|(_, line)| {
            line.function == FunctionTag::Unset && line.word_count() >= config.min_words
        })
        .map(|(index, _)| index)
        .collect();
    for &index in &matched {
        issue.set_role(index, FunctionTag::BodyText);
    }
    TagStats {
        lines_tagged: matched.len(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Line;

    #[test]
    fn test_long_lines_become_body_text() {
        let mut issue = Issue::new(vec![
            Line::new(1, "the council voted nine to two to approve the revised budget"),
            Line::new(1, "short caption"),
        ]);
        let stats = tag(&mut issue, &BodyConfig::default());
        assert_eq!(stats.lines_tagged, 1);
        assert_eq!(issue.get(0).unwrap().function, FunctionTag::BodyText);
        assert_eq!(issue.get(1).unwrap().function, FunctionTag::Unset);
    }

    #[test]
    fn test_tagged_lines_untouched() {
        let mut issue = Issue::new(vec![Line::new(
            1,
            "the council voted nine to two to approve the revised budget",
        )]);
        issue.set_role(0, FunctionTag::Advertisement);
        let stats = tag(&mut issue, &BodyConfig::default());
        assert_eq!(stats.lines_tagged, 0);
    }
}
