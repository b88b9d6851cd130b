//! Continuation-marker resolution. Articles that continue on another
//! page announce it with markers like "(Please see page 5)" at the
//! break and "(From page 3)" at the continuation, none of which OCR
//! reproduces cleanly.

use tracing::debug;

use super::{require_roles, StageError, TagStats};
use crate::models::{Elem, FunctionTag, FuzzyPattern, Issue, Jump};

/// Configuration for continuation-marker resolution.
#[derive(Debug, Clone)]
pub struct JumpConfig {
    /// Referenced page numbers at or above this are treated as OCR
    /// garbage rather than real pages.
    pub max_page: u32,
    /// Marker lines with at least this many words are body text that
    /// happens to carry a marker; shorter ones are the marker alone.
    pub body_words: usize,
}

impl Default for JumpConfig {
    fn default() -> Self {
        Self {
            max_page: 20,
            body_words: 5,
        }
    }
}

/// One way a continuation marker can read, with the sign of the jump
/// it encodes. Negative means the article continues from an earlier
/// page, positive that it continues onward.
struct JumpRule {
    pattern: FuzzyPattern,
    direction: i32,
}

fn rules() -> Vec<JumpRule> {
    vec![
        JumpRule {
            pattern: FuzzyPattern::new(
                vec![Elem::phrase("FROM PAGE", 2), Elem::number(2, Some("page"))],
                2,
            ),
            direction: -1,
        },
        JumpRule {
            pattern: FuzzyPattern::new(
                vec![
                    Elem::phrase("PLEASE SEE PAGE", 4),
                    Elem::number(2, Some("page")),
                ],
                4,
            ),
            direction: 1,
        },
        JumpRule {
            pattern: FuzzyPattern::new(
                vec![
                    Elem::word("SEE", 1),
                    Elem::run(0, 3),
                    Elem::word("PAGE", 1),
                    Elem::number(2, Some("page")),
                ],
                2,
            ),
            direction: 1,
        },
        JumpRule {
            pattern: FuzzyPattern::new(
                vec![
                    Elem::word("SEE", 1),
                    Elem::run(0, 3),
                    Elem::one_of(&["FRONT", "BACK"], 2, Some("target")),
                    Elem::word("PAGE", 1),
                ],
                4,
            ),
            direction: 1,
        },
    ]
}

/// Resolve continuation markers on still-unset lines, recording the
/// jump and retagging the line.
pub fn tag(issue: &mut Issue, config: &JumpConfig) -> Result<TagStats, StageError> {
    require_roles(
        issue,
        "jump",
        &[
            FunctionTag::PublicationInfo,
            FunctionTag::Headline,
            FunctionTag::Byline,
        ],
    )?;

    let rules = rules();
    let mut resolved: Vec<(usize, Jump, FunctionTag)> = Vec::new();

    for (index, line) in issue.lines() {
        if line.function != FunctionTag::Unset {
            continue;
        }
        let Some(text) = line.clean_text() else {
            continue;
        };
        let Some(jump) = resolve(&text, &rules, config) else {
            continue;
        };
        let role = if line.word_count() >= config.body_words {
            FunctionTag::BodyText
        } else {
            FunctionTag::MastheadContinuation
        };
        debug!(index, ?jump, "Resolved continuation marker");
        resolved.push((index, jump, role));
    }

    let stats = TagStats {
        lines_tagged: resolved.len(),
    };
    for (index, jump, role) in resolved {
        issue.set_jump(index, jump);
        issue.set_role(index, role);
    }
    Ok(stats)
}

/// First rule that matches wins; rules are ordered most to least
/// specific.
fn resolve(text: &str, rules: &[JumpRule], config: &JumpConfig) -> Option<Jump> {
    for rule in rules {
        let Some(found) = rule.pattern.search(text) else {
            continue;
        };
        if let Some(page) = found.get("page") {
            let Ok(page) = page.parse::<u32>() else {
                continue;
            };
            if page == 0 || page >= config.max_page {
                continue;
            }
            return Some(Jump::Page(rule.direction * page as i32));
        }
        if let Some(target) = found.get("target") {
            return Some(Jump::Target(target.to_lowercase()));
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Line;

    fn issue_with(texts: &[&str]) -> Issue {
        let mut issue = Issue::new(texts.iter().map(|t| Line::new(1, *t)).collect());
        // Prerequisite stages have run on any real input.
        issue.set_role(0, FunctionTag::PublicationInfo);
        issue.set_role(1, FunctionTag::Headline);
        issue.set_role(2, FunctionTag::Byline);
        issue
    }

    #[test]
    fn test_from_page_is_backward() {
        let mut issue = issue_with(&["masthead", "headline", "byline", "(From page 3)"]);
        let stats = tag(&mut issue, &JumpConfig::default()).unwrap();
        assert_eq!(stats.lines_tagged, 1);
        assert_eq!(issue.get(3).unwrap().jump, Jump::Page(-3));
        assert_eq!(
            issue.get(3).unwrap().function,
            FunctionTag::MastheadContinuation
        );
    }

    #[test]
    fn test_please_see_page_is_forward() {
        let mut issue = issue_with(&["masthead", "headline", "byline", "(Please see page 5)"]);
        tag(&mut issue, &JumpConfig::default()).unwrap();
        assert_eq!(issue.get(3).unwrap().jump, Jump::Page(5));
    }

    #[test]
    fn test_marker_inside_body_text_keeps_body_role() {
        let mut issue = issue_with(&[
            "masthead",
            "headline",
            "byline",
            "the council will vote again next week. See BUDGET, page 8",
        ]);
        tag(&mut issue, &JumpConfig::default()).unwrap();
        assert_eq!(issue.get(3).unwrap().jump, Jump::Page(8));
        assert_eq!(issue.get(3).unwrap().function, FunctionTag::BodyText);
    }

    #[test]
    fn test_named_target_page() {
        let mut issue = issue_with(&["masthead", "headline", "byline", "See ELECTION, back page"]);
        tag(&mut issue, &JumpConfig::default()).unwrap();
        assert_eq!(
            issue.get(3).unwrap().jump,
            Jump::Target("back".to_string())
        );
    }

    #[test]
    fn test_garbage_page_number_ignored() {
        let mut issue = issue_with(&["masthead", "headline", "byline", "(From page 73)"]);
        let stats = tag(&mut issue, &JumpConfig::default()).unwrap();
        assert_eq!(stats.lines_tagged, 0);
        assert_eq!(issue.get(3).unwrap().jump, Jump::None);
    }

    #[test]
    fn test_missing_prerequisites_rejected() {
        let mut issue = Issue::new(vec![Line::new(1, "(From page 3)")]);
        let err = tag(&mut issue, &JumpConfig::default()).unwrap_err();
        assert!(matches!(err, StageError::MissingRoles { .. }));
    }
}
