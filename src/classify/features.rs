//! Surface-statistic features fed to the content classifiers.
//!
//! Each family mirrors one aspect of how a line "looks": character
//! class ratios, dictionary coverage, name density, punctuation shape,
//! and the handful of noise idioms OCR produces on ads and mastheads.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex::Regex;

use super::Lexicon;

/// Named binary features, ordered for stable model files.
pub type FeatureSet = BTreeMap<String, bool>;

/// Bucket a numeric value against threshold ranges, producing one
/// feature per bucket. `name_<_r0`, `name_r0_to_r1`, ..., `name_>=_rN`.
pub fn ranged_features(features: &mut FeatureSet, name: &str, value: f64, ranges: &[f64]) {
    let Some(&first) = ranges.first() else {
        return;
    };
    features.insert(format!("{}_<_{:.2}", name, first), value < first);
    if ranges.len() > 1 {
        let last = *ranges.last().unwrap();
        features.insert(format!("{}_>=_{:.2}", name, last), value >= last);
        for pair in ranges.windows(2) {
            features.insert(
                format!("{}_{:.2}_to_{:.2}", name, pair[0], pair[1]),
                value >= pair[0] && value < pair[1],
            );
        }
    }
}

static COLON_NUMBER: LazyLock<Regex> = LazyLock::new(|| Regex::new(r": \d{1,3}$").unwrap());
static YEAR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(^|[^\d])((1[7-9])|2[0-1])\d{2}([^\d]|$)").unwrap());
static THOUSANDS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\d+,\d{3}").unwrap());
static SCORE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r" \d{1,2}-\d{1,2} ").unwrap());
static FRACTION: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\d{1,2}/\d{1,2} ").unwrap());
static MONEY_THOUSANDS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$\d{1,3},\d{1,3}").unwrap());
static PHONE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[^\d]\d{3}-\d{4}").unwrap());
static MONEY: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\$\d+|\d+\$").unwrap());
static PERCENT: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\d+%").unwrap());
static TIME: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\d:\d\d").unwrap());
static TIME_AM_PM: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d+ (a\.m\.|p\.m\.|am|pm)").unwrap());
static UNDERSCORES: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"_{5,}").unwrap());
static DAY_DATE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(monday|tuesday|wednesday|thursday|friday)[,.]? \w+\.? \d{1,2}").unwrap()
});
static WIRE_TAG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r" \(ap\) -").unwrap());

/// Alphabetic character statistics.
pub fn alphabetic_features(features: &mut FeatureSet, text: &str) {
    let total = text.chars().count().max(1);
    let alphabetic: String = text
        .chars()
        .filter(|c| c.is_ascii_alphabetic() || *c == ' ')
        .collect();
    let percent = alphabetic.chars().count() as f64 / total as f64;
    ranged_features(
        features,
        "percent_alpha",
        percent,
        &[0.05, 0.1, 0.5, 0.7, 0.8, 0.9],
    );

    let words: Vec<&str> = alphabetic.split_whitespace().collect();
    ranged_features(
        features,
        "num_alpha_words",
        words.len() as f64,
        &[2.0, 5.0, 11.0, 25.0, 30.0, 40.0, 50.0],
    );

    let avg_len = if words.is_empty() {
        0.0
    } else {
        words.iter().map(|w| w.len()).sum::<usize>() as f64 / words.len() as f64
    };
    ranged_features(
        features,
        "avg_len_alpha_words",
        avg_len,
        &[2.0, 3.0, 4.0, 5.0, 6.0, 8.0],
    );

    features.insert(
        "start_alphabetic".to_string(),
        text.chars().next().is_some_and(|c| c.is_alphabetic()),
    );
}

/// Uppercase character statistics.
pub fn uppercase_features(features: &mut FeatureSet, text: &str) {
    let total = text.chars().count().max(1);
    let upper = text.chars().filter(|c| c.is_ascii_uppercase()).count();
    let percent = upper as f64 / total as f64;
    ranged_features(
        features,
        "percent_uppercase",
        percent,
        &[0.05, 0.1, 0.2, 0.8, 0.9, 0.95],
    );

    let words: Vec<&str> = text.split_whitespace().collect();
    let uppercase_words = words
        .iter()
        .filter(|w| w.chars().next().is_some_and(|c| c.is_uppercase()))
        .count();
    features.insert(
        "all_words_start_uppercase".to_string(),
        !words.is_empty() && uppercase_words == words.len(),
    );
    features.insert(
        "start_uppercase".to_string(),
        text.chars().next().is_some_and(|c| c.is_uppercase()),
    );
}

/// Dictionary coverage statistics.
pub fn dictionary_features(features: &mut FeatureSet, text: &str, lexicon: &Lexicon) {
    let words: Vec<&str> = text.split_whitespace().collect();
    let dict_words = lexicon.dictionary_words(text);

    let percent = if words.is_empty() {
        0.0
    } else {
        dict_words.len() as f64 / words.len() as f64
    };
    ranged_features(features, "percent_dict_words", percent, &[0.9]);

    let distinct: std::collections::HashSet<String> =
        dict_words.iter().map(|w| w.to_lowercase()).collect();
    ranged_features(features, "count_dict_words", distinct.len() as f64, &[30.0]);

    let avg_len = if dict_words.is_empty() {
        0.0
    } else {
        dict_words.iter().map(|w| w.len()).sum::<usize>() as f64 / dict_words.len() as f64
    };
    ranged_features(features, "avg_len_dict_words", avg_len, &[10.0]);
}

/// Name-density statistics, used to tell bylines and photo credits
/// apart from body text.
pub fn name_features(features: &mut FeatureSet, text: &str, lexicon: &Lexicon) {
    let words: Vec<&str> = text.split_whitespace().collect();
    let non_names = words
        .iter()
        .filter(|w| lexicon.is_word(w) && !lexicon.is_name(w))
        .count();
    ranged_features(features, "num_names", non_names as f64, &[1.0, 3.0, 10.0, 40.0]);
    ranged_features(features, "num_non_names", words.len() as f64, &[1.0, 3.0, 5.0]);

    let titles = words
        .iter()
        .filter(|w| {
            let stripped: String = w.chars().filter(|c| c.is_alphanumeric()).collect();
            let mut chars = stripped.chars();
            chars.next().is_some_and(|c| c.is_uppercase())
                && chars.all(|c| c.is_lowercase() || c.is_ascii_digit())
        })
        .count();
    ranged_features(features, "num_titles", titles as f64, &[2.0, 5.0, 10.0, 20.0]);

    // "- <Name>" photo and pull-quote credits.
    let starts_dash = text
        .trim_start()
        .chars()
        .next()
        .is_some_and(|c| c == '-' || c == '\u{2014}');
    features.insert("starts_dash".to_string(), starts_dash);
    features.insert(
        "starts_dash_num_titles".to_string(),
        starts_dash && titles < 5,
    );
}

/// Numeral statistics.
pub fn numeral_features(features: &mut FeatureSet, text: &str) {
    let total = text.chars().count().max(1);
    let non_digits = text.chars().filter(|c| !c.is_ascii_digit()).count();
    let percent = non_digits as f64 / total as f64;
    ranged_features(
        features,
        "percent_numerals",
        percent,
        &[0.35, 0.7, 0.9, 0.98],
    );
    features.insert("colon_number".to_string(), COLON_NUMBER.is_match(text));
}

/// Non-ASCII content and recurring OCR noise idioms.
pub fn non_alphabetic_features(features: &mut FeatureSet, text: &str) {
    let total = text.chars().count().max(1);
    let ascii = text.chars().filter(|c| c.is_ascii()).count();
    let percent = ascii as f64 / total as f64;
    ranged_features(features, "percent_ascii", percent, &[0.8, 0.9, 0.96]);

    let a_caret = text.matches("a^").count();
    ranged_features(features, "num_a_caret", a_caret as f64, &[1.0, 2.0]);

    let percent_a = text.matches("%a").count();
    ranged_features(features, "num_percent_a", percent_a as f64, &[1.0]);
}

/// Sentence-shape features: how the line starts and ends.
pub fn positional_features(features: &mut FeatureSet, text: &str, lexicon: &Lexicon) {
    let words: Vec<&str> = text.split_whitespace().collect();
    let last_word = words
        .last()
        .map(|w| w.trim_end_matches(|c: char| !c.is_alphanumeric()))
        .unwrap_or("");

    let ends_period = text.ends_with('.') || text.ends_with('!');
    let ends_word = !last_word.is_empty()
        && last_word.chars().last().is_some_and(|c| c.is_alphabetic())
        && lexicon.is_word(last_word);
    features.insert("ends_period".to_string(), ends_period);
    features.insert("ends_word".to_string(), ends_word);
    features.insert("ends_word_1_word".to_string(), ends_word && words.len() == 1);
    features.insert(
        "ends_word_long".to_string(),
        ends_word && last_word.len() >= 5,
    );
    features.insert("ends_word_period".to_string(), ends_period && ends_word);

    let has_comma = text.contains(',') || text.contains(';');
    features.insert("ends_comma".to_string(), has_comma);
    features.insert("ends_word_comma".to_string(), has_comma && ends_word);

    const QUOTES: &[char] = &['"', '\'', '`', '\u{2018}', '\u{2019}', '\u{201C}', '\u{201D}'];
    let starts_quotation = text.chars().next().is_some_and(|c| QUOTES.contains(&c));
    let ends_period_quotation = {
        let mut rev = text.chars().rev();
        rev.next().is_some_and(|c| QUOTES.contains(&c)) && rev.next() == Some('.')
    };
    features.insert(
        "has_simple_quotation".to_string(),
        text.contains('\u{201C}') && text.contains('\u{201D}'),
    );
    features.insert("starts_quotation".to_string(), starts_quotation);
    features.insert("ends_period_quotation".to_string(), ends_period_quotation);

    let has_title_first = text.chars().next().is_some_and(|c| c.is_uppercase()) && words.len() > 2;
    features.insert("has_title_first_word".to_string(), has_title_first);
    features.insert(
        "is_proper_sentence".to_string(),
        has_title_first && ends_word && last_word.len() >= 5,
    );
    features.insert(
        "is_quoted_sentence".to_string(),
        has_title_first && ends_period_quotation,
    );
    features.insert(
        "is_full_quoted_sentence".to_string(),
        starts_quotation && ends_period_quotation,
    );
}

/// Short word-pattern features: addressings, date lines, masthead
/// words, wire tags.
pub fn word_pattern_features(features: &mut FeatureSet, text: &str, masthead: &str) {
    let lower = text.to_lowercase();
    let words: Vec<&str> = lower.split_whitespace().collect();

    features.insert(
        "has_addressings".to_string(),
        (lower.contains("by ") || lower.contains("dear ")) && words.len() == 3,
    );
    features.insert("has_days_of_week".to_string(), DAY_DATE.is_match(&lower));
    features.insert("is_editor_colon".to_string(), lower.trim() == "editor:");
    features.insert(
        "has_masthead".to_string(),
        !masthead.is_empty() && lower.contains(&masthead.to_lowercase()),
    );
    features.insert("has_wire_tag".to_string(), WIRE_TAG.is_match(&lower));
    features.insert(
        "has_1_word".to_string(),
        words.len() == 1 && words[0].len() > 3,
    );
    features.insert(
        "has_2_words".to_string(),
        words.len() == 2 && words[0].len() > 3 && words[1].len() > 3,
    );
}

/// Numeric and role-word patterns common in ads, scoreboards, and
/// staff boxes.
pub fn pattern_features(features: &mut FeatureSet, text: &str) {
    let lower = text.to_lowercase();

    features.insert(
        "has_positions".to_string(),
        lower.contains("editor") || lower.contains("manager") || lower.contains("adviser"),
    );
    features.insert("has_year".to_string(), YEAR.is_match(&lower));
    features.insert("has_thousands".to_string(), THOUSANDS.is_match(&lower));
    features.insert("has_score".to_string(), SCORE.is_match(&lower));
    features.insert("has_fractions".to_string(), FRACTION.is_match(&lower));
    features.insert(
        "has_money_thousands".to_string(),
        MONEY_THOUSANDS.is_match(&lower),
    );
    features.insert("has_phone_number".to_string(), PHONE.is_match(&lower));
    features.insert("has_money".to_string(), MONEY.is_match(&lower));
    features.insert("has_ellipses".to_string(), lower.contains("..."));
    features.insert("has_percent".to_string(), PERCENT.is_match(&lower));
    features.insert("has_time".to_string(), TIME.is_match(&lower));
    features.insert("has_time_am_pm".to_string(), TIME_AM_PM.is_match(&lower));
    features.insert("has_underscores".to_string(), UNDERSCORES.is_match(&lower));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ranged_features_buckets() {
        let mut features = FeatureSet::new();
        ranged_features(&mut features, "x", 0.6, &[0.5, 0.7, 0.9]);
        assert_eq!(features["x_<_0.50"], false);
        assert_eq!(features["x_0.50_to_0.70"], true);
        assert_eq!(features["x_0.70_to_0.90"], false);
        assert_eq!(features["x_>=_0.90"], false);
    }

    #[test]
    fn test_pattern_features_phone_and_money() {
        let mut features = FeatureSet::new();
        pattern_features(&mut features, "Call 555-1234 today, only $20!");
        assert!(features["has_phone_number"]);
        assert!(features["has_money"]);
        assert!(!features["has_score"]);
    }

    #[test]
    fn test_positional_proper_sentence() {
        let lexicon = Lexicon::default();
        let mut features = FeatureSet::new();
        positional_features(
            &mut features,
            "The council approved the new budget between meetings.",
            &lexicon,
        );
        assert!(features["is_proper_sentence"]);
        assert!(features["ends_word_period"]);
    }

    #[test]
    fn test_uppercase_all_words() {
        let mut features = FeatureSet::new();
        uppercase_features(&mut features, "BIG SALE TODAY");
        assert!(features["all_words_start_uppercase"]);
        assert_eq!(features["percent_uppercase_>=_0.95"], false);
    }
}
