//! Fuzzy structural pattern matching over normalized OCR text.
//!
//! OCR output is too noisy for exact patterns, so a pattern here is a
//! sequence of token-level elements, each tolerant of a bounded number
//! of character edits, matched under a total edit budget. Ambiguity is
//! resolved by lowest total edit count; ties go to the earliest match.

/// Levenshtein distance between `a` and `b`, computed only if it does
/// not exceed `max`. Banded over the diagonal so the common reject
/// case stays cheap.
pub fn edit_distance_within(a: &str, b: &str, max: usize) -> Option<usize> {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    let (n, m) = (a.len(), b.len());

    if n.abs_diff(m) > max {
        return None;
    }
    if n == 0 {
        return Some(m);
    }
    if m == 0 {
        return Some(n);
    }

    let inf = max + 1;
    let mut prev: Vec<usize> = (0..=m).map(|j| j.min(inf)).collect();
    let mut curr = vec![inf; m + 1];

    for i in 1..=n {
        curr[0] = i.min(inf);
        let lo = i.saturating_sub(max).max(1);
        let hi = (i + max).min(m);
        if lo > 1 {
            curr[lo - 1] = inf;
        }
        for j in lo..=hi {
            let cost = if a[i - 1] == b[j - 1] { 0 } else { 1 };
            let mut best = prev[j - 1] + cost;
            if prev[j] + 1 < best {
                best = prev[j] + 1;
            }
            if curr[j - 1] + 1 < best {
                best = curr[j - 1] + 1;
            }
            curr[j] = best.min(inf);
        }
        if hi < m {
            curr[hi + 1] = inf;
        }
        std::mem::swap(&mut prev, &mut curr);
        if prev.iter().all(|&d| d > max) {
            return None;
        }
    }

    (prev[m] <= max).then_some(prev[m])
}

/// Uppercase the text and fold punctuation into whitespace, the shared
/// normalization every structural matcher runs before matching.
pub fn normalize(text: &str) -> String {
    let folded: String = text
        .chars()
        .map(|c| {
            if c.is_alphanumeric() || c.is_whitespace() {
                c
            } else {
                ' '
            }
        })
        .collect();
    folded
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_uppercase()
}

/// One element of a fuzzy pattern, matched against the token stream.
#[derive(Debug, Clone)]
pub enum Elem {
    /// A literal word within an edit budget.
    Word(String, usize),
    /// A multi-word literal matched as a unit (tokens joined with a
    /// space) within an edit budget.
    Phrase(String, usize),
    /// The closest member of a vocabulary within an edit budget. The
    /// canonical option, not the raw token, is captured.
    OneOf {
        options: Vec<String>,
        budget: usize,
        capture: Option<&'static str>,
    },
    /// Any single token whose length falls within the bounds.
    Any {
        min_len: usize,
        max_len: usize,
        capture: Option<&'static str>,
    },
    /// A run of `min..=max` arbitrary tokens.
    Run { min: usize, max: usize },
    /// A token of 1..=`max_digits` digits.
    Number {
        max_digits: usize,
        capture: Option<&'static str>,
    },
    /// An element that may be absent at no cost.
    Opt(Box<Elem>),
}

impl Elem {
    pub fn word(word: impl Into<String>, budget: usize) -> Elem {
        Elem::Word(word.into(), budget)
    }

    pub fn phrase(phrase: impl Into<String>, budget: usize) -> Elem {
        Elem::Phrase(phrase.into(), budget)
    }

    pub fn one_of(options: &[&str], budget: usize, capture: Option<&'static str>) -> Elem {
        Elem::OneOf {
            options: options.iter().map(|o| o.to_string()).collect(),
            budget,
            capture,
        }
    }

    pub fn any(min_len: usize, max_len: usize, capture: Option<&'static str>) -> Elem {
        Elem::Any {
            min_len,
            max_len,
            capture,
        }
    }

    pub fn run(min: usize, max: usize) -> Elem {
        Elem::Run { min, max }
    }

    pub fn number(max_digits: usize, capture: Option<&'static str>) -> Elem {
        Elem::Number {
            max_digits,
            capture,
        }
    }

    pub fn opt(elem: Elem) -> Elem {
        Elem::Opt(Box::new(elem))
    }
}

/// A successful fuzzy match: total edit count plus named captures.
#[derive(Debug, Clone, Default)]
pub struct FuzzyMatch {
    pub edits: usize,
    pub captures: Vec<(&'static str, String)>,
    /// Index of the first token the match consumed.
    pub start: usize,
}

impl FuzzyMatch {
    pub fn get(&self, name: &str) -> Option<&str> {
        self.captures
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, v)| v.as_str())
    }
}

/// A fuzzy pattern: an element sequence plus a total edit budget.
#[derive(Debug, Clone)]
pub struct FuzzyPattern {
    elems: Vec<Elem>,
    max_edits: usize,
}

impl FuzzyPattern {
    pub fn new(elems: Vec<Elem>, max_edits: usize) -> Self {
        Self { elems, max_edits }
    }

    /// Anchored match: the whole normalized line must be consumed.
    pub fn matches(&self, text: &str) -> Option<FuzzyMatch> {
        let normalized = normalize(text);
        let tokens: Vec<&str> = normalized.split_whitespace().collect();
        best_parse(&self.elems, &tokens, self.max_edits, true)
    }

    /// Unanchored search: try every start offset in input order and
    /// keep the closest match (lowest edit count, earliest on ties).
    pub fn search(&self, text: &str) -> Option<FuzzyMatch> {
        let normalized = normalize(text);
        let tokens: Vec<&str> = normalized.split_whitespace().collect();
        let mut best: Option<FuzzyMatch> = None;
        for start in 0..tokens.len().max(1) {
            if let Some(mut m) = best_parse(&self.elems, &tokens[start..], self.max_edits, false) {
                m.start = start;
                if best.as_ref().is_none_or(|b| m.edits < b.edits) {
                    best = Some(m);
                }
            }
        }
        best
    }
}

/// Best (minimum-edit) parse of `elems` against a token slice. With
/// `anchored` the parse must consume every token; otherwise a trailing
/// remainder is allowed.
fn best_parse(
    elems: &[Elem],
    tokens: &[&str],
    budget: usize,
    anchored: bool,
) -> Option<FuzzyMatch> {
    match elems.split_first() {
        None => {
            if anchored && !tokens.is_empty() {
                return None;
            }
            Some(FuzzyMatch::default())
        }
        Some((head, rest)) => {
            let mut best: Option<FuzzyMatch> = None;
            for cand in element_matches(head, tokens, budget) {
                let remaining = budget - cand.edits;
                if let Some(tail) = best_parse(rest, &tokens[cand.consumed..], remaining, anchored)
                {
                    let total = cand.edits + tail.edits;
                    if best.as_ref().is_none_or(|b| total < b.edits) {
                        let mut captures = cand.captures.clone();
                        captures.extend(tail.captures);
                        best = Some(FuzzyMatch {
                            edits: total,
                            captures,
                            start: 0,
                        });
                    }
                }
            }
            best
        }
    }
}

/// One way a single element can consume the front of the token slice.
struct ElemMatch {
    consumed: usize,
    edits: usize,
    captures: Vec<(&'static str, String)>,
}

fn element_matches(elem: &Elem, tokens: &[&str], budget: usize) -> Vec<ElemMatch> {
    let mut out = Vec::new();
    match elem {
        Elem::Word(word, word_budget) => {
            if let Some(&tok) = tokens.first() {
                let cap = (*word_budget).min(budget);
                if let Some(edits) = edit_distance_within(tok, word, cap) {
                    out.push(ElemMatch {
                        consumed: 1,
                        edits,
                        captures: Vec::new(),
                    });
                }
            }
        }
        Elem::Phrase(phrase, phrase_budget) => {
            let words = phrase.split_whitespace().count();
            if tokens.len() >= words {
                let joined = tokens[..words].join(" ");
                let cap = (*phrase_budget).min(budget);
                if let Some(edits) = edit_distance_within(&joined, phrase, cap) {
                    out.push(ElemMatch {
                        consumed: words,
                        edits,
                        captures: Vec::new(),
                    });
                }
            }
        }
        Elem::OneOf {
            options,
            budget: elem_budget,
            capture,
        } => {
            if let Some(&tok) = tokens.first() {
                let cap = (*elem_budget).min(budget);
                // Closest candidate wins; ties break to vocabulary order.
                let mut best: Option<(usize, &str)> = None;
                for option in options {
                    if let Some(edits) = edit_distance_within(tok, option, cap) {
                        if best.is_none_or(|(b, _)| edits < b) {
                            best = Some((edits, option));
                        }
                    }
                }
                if let Some((edits, option)) = best {
                    let captures = capture
                        .map(|name| vec![(name, option.to_string())])
                        .unwrap_or_default();
                    out.push(ElemMatch {
                        consumed: 1,
                        edits,
                        captures,
                    });
                }
            }
        }
        Elem::Any {
            min_len,
            max_len,
            capture,
        } => {
            if let Some(&tok) = tokens.first() {
                let len = tok.chars().count();
                if len >= *min_len && len <= *max_len {
                    let captures = capture
                        .map(|name| vec![(name, tok.to_string())])
                        .unwrap_or_default();
                    out.push(ElemMatch {
                        consumed: 1,
                        edits: 0,
                        captures,
                    });
                }
            }
        }
        Elem::Run { min, max } => {
            for take in *min..=(*max).min(tokens.len()) {
                if take > 0 || *min == 0 {
                    out.push(ElemMatch {
                        consumed: take,
                        edits: 0,
                        captures: Vec::new(),
                    });
                }
            }
        }
        Elem::Number {
            max_digits,
            capture,
        } => {
            if let Some(&tok) = tokens.first() {
                if !tok.is_empty()
                    && tok.len() <= *max_digits
                    && tok.chars().all(|c| c.is_ascii_digit())
                {
                    let captures = capture
                        .map(|name| vec![(name, tok.to_string())])
                        .unwrap_or_default();
                    out.push(ElemMatch {
                        consumed: 1,
                        edits: 0,
                        captures,
                    });
                }
            }
        }
        Elem::Opt(inner) => {
            out.push(ElemMatch {
                consumed: 0,
                edits: 0,
                captures: Vec::new(),
            });
            out.extend(element_matches(inner, tokens, budget));
        }
    }
    out
}
