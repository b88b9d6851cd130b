//! Publication-info tagging: masthead, volume markers, page markers,
//! and the issue date banner.

use tracing::debug;

use super::TagStats;
use crate::models::{Elem, FunctionTag, FuzzyMatch, FuzzyPattern, Issue};

pub const DAY_NAMES: &[&str] = &[
    "MONDAY",
    "TUESDAY",
    "WEDNESDAY",
    "THURSDAY",
    "FRIDAY",
    "SATURDAY",
    "SUNDAY",
];

pub const MONTH_NAMES: &[&str] = &[
    "JANUARY",
    "FEBRUARY",
    "MARCH",
    "APRIL",
    "MAY",
    "JUNE",
    "JULY",
    "AUGUST",
    "SEPTEMBER",
    "OCTOBER",
    "NOVEMBER",
    "DECEMBER",
];

/// Configuration for the publication-info matchers.
#[derive(Debug, Clone)]
pub struct PublicationConfig {
    /// Publication name as printed on the nameplate.
    pub masthead: String,
}

impl Default for PublicationConfig {
    fn default() -> Self {
        Self {
            masthead: "MUSTANG DAILY".to_string(),
        }
    }
}

/// Result of the publication tagging stage.
#[derive(Debug)]
pub struct PublicationResult {
    pub stats: TagStats,
    /// Issue date recovered from the date banner (ISO), if any.
    pub date: Option<String>,
    /// (volume, issue) recovered from the volume marker, if any.
    pub edition: Option<(u32, u32)>,
}

/// Tag publication-info lines. All matcher hits are unioned,
/// deduplicated by line index, and applied only where the role is
/// still unset.
pub fn tag(issue: &mut Issue, config: &PublicationConfig) -> PublicationResult {
    let mut matched: Vec<usize> = Vec::new();
    let mut edition = None;

    for (index, m) in find_volume(issue) {
        if edition.is_none() {
            edition = parse_edition(&m);
        }
        matched.push(index);
    }
    matched.extend(find_page_info(issue));
    matched.extend(find_masthead(issue, &config.masthead));

    let date_matches = find_date(issue, &config.masthead);
    let date = best_date(&date_matches);
    matched.extend(date_matches.into_iter().flat_map(|(indices, _)| indices));

    matched.sort_unstable();
    matched.dedup();

    let mut tagged = 0;
    for index in matched {
        if let Some(line) = issue.get(index) {
            if line.function == FunctionTag::Unset {
                issue.set_role(index, FunctionTag::PublicationInfo);
                tagged += 1;
            }
        }
    }

    if let Some(date) = &date {
        debug!("Recovered issue date {}", date);
        issue.date = Some(date.clone());
    }
    if let Some(edition) = edition {
        issue.edition = Some(edition);
    }

    PublicationResult {
        stats: TagStats {
            lines_tagged: tagged,
        },
        date,
        edition,
    }
}

fn volume_pattern() -> FuzzyPattern {
    FuzzyPattern::new(
        vec![
            Elem::word("VOLUME", 3),
            Elem::any(1, 4, Some("volume")),
            Elem::word("NO", 2),
            Elem::any(1, 4, Some("issue")),
        ],
        3,
    )
}

fn page_pattern() -> FuzzyPattern {
    FuzzyPattern::new(
        vec![Elem::word("PAGE", 1), Elem::any(1, 2, Some("page"))],
        1,
    )
}

fn date_pattern(masthead: &str) -> FuzzyPattern {
    FuzzyPattern::new(
        vec![
            Elem::opt(Elem::any(1, 2, None)),
            Elem::opt(Elem::phrase(masthead, 3)),
            Elem::one_of(DAY_NAMES, 3, Some("dow")),
            Elem::one_of(MONTH_NAMES, 3, Some("month")),
            Elem::number(2, Some("day")),
            Elem::any(4, 4, Some("year")),
            Elem::opt(Elem::phrase(masthead, 3)),
            Elem::opt(Elem::any(1, 2, None)),
        ],
        6,
    )
}

/// Anchored search for a volume/issue marker. Only the first hit is
/// kept; an issue prints its volume line once.
fn find_volume(issue: &Issue) -> Vec<(usize, FuzzyMatch)> {
    let pattern = volume_pattern();
    for (index, line) in issue.lines() {
        if let Some(text) = line.clean_text() {
            if let Some(m) = pattern.matches(&text) {
                return vec![(index, m)];
            }
        }
    }
    Vec::new()
}

fn find_page_info(issue: &Issue) -> Vec<usize> {
    let pattern = page_pattern();
    issue
        .lines()
        .filter_map(|(index, line)| {
            let text = line.clean_text()?;
            pattern.matches(&text).map(|_| index)
        })
        .collect()
}

fn find_masthead(issue: &Issue, masthead: &str) -> Vec<usize> {
    let pattern = FuzzyPattern::new(vec![Elem::phrase(masthead, 5)], 5);
    issue
        .lines()
        .filter_map(|(index, line)| {
            let text = line.clean_text()?;
            pattern.matches(&text).map(|_| index)
        })
        .collect()
}

/// Find date banners. When a line fails on its own, retry against the
/// concatenation with its successor: OCR often splits the banner over
/// two rows. Returns the matched line indices with each match.
fn find_date(issue: &Issue, masthead: &str) -> Vec<(Vec<usize>, FuzzyMatch)> {
    let pattern = date_pattern(masthead);
    let mut matches = Vec::new();
    let mut prev: Option<(usize, String)> = None;

    for (index, line) in issue.lines() {
        let Some(text) = line.clean_text() else {
            continue;
        };
        if let Some(m) = pattern.matches(&text) {
            matches.push((vec![index], m));
        } else if let Some((prev_index, prev_text)) = &prev {
            let joined = format!("{} {}", prev_text, text);
            if let Some(m) = pattern.matches(&joined) {
                matches.push((vec![*prev_index, index], m));
            }
        }
        prev = Some((index, text));
    }
    matches
}

/// Choose the closest date match (lowest edit count, first on ties)
/// and assemble an ISO date from its captures.
fn best_date(matches: &[(Vec<usize>, FuzzyMatch)]) -> Option<String> {
    let best = matches
        .iter()
        .map(|(_, m)| m)
        .min_by_key(|m| m.edits)?;
    let month = MONTH_NAMES
        .iter()
        .position(|name| Some(*name) == best.get("month"))?
        + 1;
    let day: u32 = best.get("day")?.parse().ok()?;
    let year: i32 = best.get("year")?.parse().ok()?;
    if !(1700..=2100).contains(&year) {
        return None;
    }
    let date = chrono::NaiveDate::from_ymd_opt(year, month as u32, day)?;
    Some(date.format("%Y-%m-%d").to_string())
}

fn parse_edition(m: &FuzzyMatch) -> Option<(u32, u32)> {
    let volume = m.get("volume")?.parse().ok()?;
    let number = m.get("issue")?.parse().ok()?;
    Some((volume, number))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Line;

    fn issue_of(texts: &[&str]) -> Issue {
        Issue::new(texts.iter().map(|t| Line::new(1, *t)).collect())
    }

    #[test]
    fn test_volume_marker() {
        let mut issue = issue_of(&["Volume 55, No. 120", "Some body text"]);
        let result = tag(&mut issue, &PublicationConfig::default());
        assert_eq!(result.edition, Some((55, 120)));
        assert_eq!(
            issue.get(0).unwrap().function,
            FunctionTag::PublicationInfo
        );
        assert_eq!(issue.get(1).unwrap().function, FunctionTag::Unset);
    }

    #[test]
    fn test_noisy_page_marker() {
        let mut issue = issue_of(&["Pagc 7"]);
        tag(&mut issue, &PublicationConfig::default());
        assert_eq!(
            issue.get(0).unwrap().function,
            FunctionTag::PublicationInfo
        );
    }

    #[test]
    fn test_date_banner_single_line() {
        let mut issue = issue_of(&["Tuesday, May 14, 1991"]);
        let result = tag(&mut issue, &PublicationConfig::default());
        assert_eq!(result.date.as_deref(), Some("1991-05-14"));
        assert_eq!(
            issue.get(0).unwrap().function,
            FunctionTag::PublicationInfo
        );
    }

    #[test]
    fn test_date_banner_split_over_two_lines() {
        let mut issue = issue_of(&["Mustang Daily Tuesday,", "May 14, 1991"]);
        let result = tag(&mut issue, &PublicationConfig::default());
        assert_eq!(result.date.as_deref(), Some("1991-05-14"));
        assert_eq!(
            issue.get(0).unwrap().function,
            FunctionTag::PublicationInfo
        );
        assert_eq!(
            issue.get(1).unwrap().function,
            FunctionTag::PublicationInfo
        );
    }

    #[test]
    fn test_noisy_date_still_recovered() {
        let mut issue = issue_of(&["Tuesdey, Mey 14, 1991"]);
        let result = tag(&mut issue, &PublicationConfig::default());
        assert_eq!(result.date.as_deref(), Some("1991-05-14"));
    }

    #[test]
    fn test_body_text_not_matched() {
        let mut issue = issue_of(&["The council approved the budget after a long debate."]);
        let result = tag(&mut issue, &PublicationConfig::default());
        assert_eq!(result.stats.lines_tagged, 0);
        assert_eq!(issue.get(0).unwrap().function, FunctionTag::Unset);
    }
}
