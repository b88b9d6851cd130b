//! Noise tagging: blank lines, section headers, the pretrained
//! classifier passes, neighborhood smoothing, and the final fallback
//! that folds whatever is left into junk.

use anyhow::Result;
use tracing::debug;

use super::TagStats;
use crate::classify::{extract_features, Classifier, ClassifierConfig, Lexicon};
use crate::models::{edit_distance_within, normalize, FunctionTag, Issue};

/// Section names that appear as standalone page furniture.
const SECTION_NAMES: &[&str] = &[
    "NEWS",
    "SPORTS",
    "OPINION",
    "EDITORIAL",
    "COMMENTARY",
    "CLASSIFIED",
    "CLASSIFIEDS",
    "ENTERTAINMENT",
    "ARTS",
    "LETTERS",
    "INSIGHT",
    "WORLD",
    "NATION",
    "STATE",
    "CAMPUS",
    "BUSINESS",
    "FEATURES",
    "CALENDAR",
    "SCOREBOARD",
    "BRIEFS",
];

/// Tag blank lines as junk.
pub fn tag_blank(issue: &mut Issue) -> TagStats {
    let blank: Vec<usize> = issue
        .lines()
        .filter(|(_, line)| line.function == FunctionTag::Unset && line.is_blank())
        .map(|(index, _)| index)
        .collect();
    for &index in &blank {
        issue.set_role(index, FunctionTag::Junk);
    }
    TagStats {
        lines_tagged: blank.len(),
    }
}

/// Tag standalone section names. Longer names tolerate more OCR
/// damage, but fuzzy matching is only safe on lines short enough to
/// actually be page furniture.
pub fn tag_section_headers(issue: &mut Issue) -> TagStats {
    let mut matched = Vec::new();
    for (index, line) in issue.lines() {
        if line.function != FunctionTag::Unset {
            continue;
        }
        let Some(text) = line.clean_text() else {
            continue;
        };
        if line.word_count() > 2 {
            continue;
        }
        let normalized = normalize(&text);
        let hit = SECTION_NAMES.iter().any(|name| {
            let budget = if name.len() > 5 { 2 } else { 1 };
            edit_distance_within(&normalized, name, budget).is_some()
        });
        if hit {
            matched.push(index);
        }
    }
    for &index in &matched {
        issue.set_role(index, FunctionTag::SectionHeader);
    }
    TagStats {
        lines_tagged: matched.len(),
    }
}

/// Run the configured classifier passes over still-unset lines, in
/// configuration order. A line with no word characters at all is
/// unintelligible without asking a model.
pub fn classify(
    issue: &mut Issue,
    config: &ClassifierConfig,
    lexicon: &Lexicon,
    masthead: &str,
) -> Result<TagStats> {
    let models = config.load_models()?;
    let mut tagged = 0;

    let mut assignments: Vec<(usize, FunctionTag)> = Vec::new();
    for (index, line) in issue.lines() {
        if line.function != FunctionTag::Unset {
            continue;
        }
        let Some(text) = line.clean_text() else {
            continue;
        };
        if !text.chars().any(|c| c.is_alphanumeric()) {
            assignments.push((index, FunctionTag::Unintelligible));
            continue;
        }
        for (spec, model) in &models {
            let features = extract_features(spec.features, &text, lexicon, masthead);
            if model.classify(&features) {
                assignments.push((index, spec.assigns));
                break;
            }
        }
    }

    for (index, role) in assignments {
        debug!(index, ?role, "Classifier assignment");
        issue.set_role(index, role);
        tagged += 1;
    }
    Ok(TagStats {
        lines_tagged: tagged,
    })
}

/// Configuration for neighborhood smoothing.
#[derive(Debug, Clone)]
pub struct SmoothConfig {
    pub iterations: usize,
    /// Immediate-neighbor rule fires only below this many dictionary
    /// words.
    pub sparse_words: usize,
    /// Majority rule fires only below this many dictionary words.
    pub dense_words: usize,
}

impl Default for SmoothConfig {
    fn default() -> Self {
        Self {
            iterations: 3,
            sparse_words: 5,
            dense_words: 20,
        }
    }
}

/// Reclassify lines surrounded by noise as unintelligible. Iterated so
/// holes in a noise region collapse from the edges inward.
pub fn smooth(issue: &mut Issue, config: &SmoothConfig, lexicon: &Lexicon) -> TagStats {
    let mut total = 0;
    for _ in 0..config.iterations {
        let mut flips = Vec::new();
        for (index, line) in issue.lines() {
            if !matches!(line.function, FunctionTag::Unset | FunctionTag::Headline) {
                continue;
            }
            let words = line
                .clean_text()
                .map(|t| lexicon.dictionary_words(&t).len())
                .unwrap_or(0);

            let near = [
                issue.neighbor_role(index, -1).is_noise(),
                issue.neighbor_role(index, 1).is_noise(),
            ];
            let far = [
                issue.neighbor_role(index, -2).is_noise(),
                issue.neighbor_role(index, 2).is_noise(),
            ];
            let noisy = near.iter().chain(far.iter()).filter(|n| **n).count();

            let surrounded = near[0] && near[1];
            let flip = (surrounded && words <= config.sparse_words)
                || (surrounded && far[0] && far[1])
                || (noisy >= 3 && words < config.dense_words);
            if flip {
                flips.push(index);
            }
        }
        if flips.is_empty() {
            break;
        }
        total += flips.len();
        for index in flips {
            issue.set_role(index, FunctionTag::Unintelligible);
        }
    }
    TagStats {
        lines_tagged: total,
    }
}

/// Final fallback: whatever no stage claimed is junk. With
/// `replace_all`, every noise role is folded into junk as well, which
/// is how tagged output is compared role-for-role.
pub fn tag_junk(issue: &mut Issue, replace_all: bool) -> TagStats {
    let targets: Vec<(usize, bool)> = issue
        .lines()
        .filter(|(_, line)| {
            line.function == FunctionTag::Unset || (replace_all && line.function.is_noise())
        })
        .map(|(index, line)| (index, line.function != FunctionTag::Junk))
        .collect();
    let tagged = targets.iter().filter(|(_, changed)| *changed).count();
    for &(index, _) in &targets {
        issue.set_role(index, FunctionTag::Junk);
    }
    TagStats {
        lines_tagged: tagged,
    }
}
