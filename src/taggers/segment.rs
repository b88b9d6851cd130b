//! Article segmentation. A first sweep groups each page into stubs
//! (headline-led runs of body text) and chunks (orphan body-text runs
//! with no headline, usually continuations from another page). A
//! second pass attaches each chunk to the stub whose vocabulary it
//! shares most.

use std::collections::HashSet;

use tracing::{debug, warn};

use super::{require_roles, StageError};
use crate::models::{normalize, FunctionTag, Issue};

/// Configuration for article segmentation.
#[derive(Debug, Clone)]
pub struct SegmentConfig {
    /// A run of this many consecutive non-article lines ends the
    /// current stub or chunk.
    pub gap_limit: usize,
    /// Tokens shorter than this are excluded from vocabulary bags.
    pub min_token_len: usize,
}

impl Default for SegmentConfig {
    fn default() -> Self {
        Self {
            gap_limit: 3,
            min_token_len: 3,
        }
    }
}

/// Counts from a segmentation run.
#[derive(Debug, Clone, Default)]
pub struct SegmentResult {
    pub articles: usize,
    pub chunks_attached: usize,
    pub chunks_dropped: usize,
}

/// An article seed: its headline and byline lines plus the body text
/// that follows them on the same page.
struct Stub {
    head: Vec<usize>,
    body: Vec<usize>,
    body_started: bool,
    /// Chunk lines attached by the clustering pass, in chunk order.
    attached: Vec<usize>,
}

impl Stub {
    fn new(first: usize) -> Self {
        Self {
            head: vec![first],
            body: Vec::new(),
            body_started: false,
            attached: Vec::new(),
        }
    }

    fn bag(&self, issue: &Issue, min_token_len: usize) -> HashSet<String> {
        let mut bag = HashSet::new();
        for &index in self.head.iter().chain(self.body.iter()) {
            if let Some(text) = issue.get(index).and_then(|l| l.clean_text()) {
                collect_tokens(&mut bag, &text, min_token_len);
            }
        }
        bag
    }
}

fn collect_tokens(bag: &mut HashSet<String>, text: &str, min_token_len: usize) {
    for token in normalize(text).split_whitespace() {
        if token.len() >= min_token_len {
            bag.insert(token.to_string());
        }
    }
}

/// Segment the issue into numbered articles. Article numbers follow
/// stub reading order; paragraph numbers are contiguous from one over
/// a stub's body and its attached chunks.
pub fn tag(issue: &mut Issue, config: &SegmentConfig) -> Result<SegmentResult, StageError> {
    require_roles(
        issue,
        "segment",
        &[FunctionTag::Headline, FunctionTag::BodyText],
    )?;

    let (mut stubs, chunks) = sweep(issue, config);
    let mut result = SegmentResult::default();

    // Attach each chunk to the stub sharing the most vocabulary.
    // Ties break to the earlier stub.
    let bags: Vec<HashSet<String>> = stubs
        .iter()
        .map(|s| s.bag(issue, config.min_token_len))
        .collect();
    for chunk in chunks {
        let mut chunk_bag = HashSet::new();
        for &index in &chunk {
            if let Some(text) = issue.get(index).and_then(|l| l.clean_text()) {
                collect_tokens(&mut chunk_bag, &text, config.min_token_len);
            }
        }
        let best = bags
            .iter()
            .enumerate()
            .map(|(i, bag)| (i, bag.intersection(&chunk_bag).count()))
            .max_by(|a, b| a.1.cmp(&b.1).then(b.0.cmp(&a.0)))
            .map(|(i, _)| i);
        match best {
            Some(stub_index) => {
                debug!(
                    stub = stub_index,
                    lines = chunk.len(),
                    "Attached continuation chunk"
                );
                stubs[stub_index].attached.extend(chunk);
                result.chunks_attached += 1;
            }
            None => {
                warn!(lines = chunk.len(), "Dropped chunk with no stub to join");
                result.chunks_dropped += 1;
            }
        }
    }

    for (number, stub) in stubs.iter().enumerate() {
        let article = number as u32 + 1;
        for &index in &stub.head {
            if let Some(line) = issue.get_mut(index) {
                line.article = Some(article);
            }
        }
        for (offset, &index) in stub.body.iter().chain(stub.attached.iter()).enumerate() {
            issue.set_article(index, article, offset as u32 + 1);
        }
    }
    result.articles = stubs.len();
    Ok(result)
}

/// Per-page sweep producing stubs and orphan chunks in reading order.
fn sweep(issue: &Issue, config: &SegmentConfig) -> (Vec<Stub>, Vec<Vec<usize>>) {
    let mut stubs: Vec<Stub> = Vec::new();
    let mut chunks: Vec<Vec<usize>> = Vec::new();
    let mut open: Option<Stub> = None;
    let mut chunk: Vec<usize> = Vec::new();
    let mut gap = 0;
    let mut page = None;

    let close = |open: &mut Option<Stub>,
                 chunk: &mut Vec<usize>,
                 stubs: &mut Vec<Stub>,
                 chunks: &mut Vec<Vec<usize>>| {
        if let Some(stub) = open.take() {
            stubs.push(stub);
        }
        if !chunk.is_empty() {
            chunks.push(std::mem::take(chunk));
        }
    };

    for (index, line) in issue.lines() {
        if page != Some(line.page) {
            close(&mut open, &mut chunk, &mut stubs, &mut chunks);
            page = Some(line.page);
            gap = 0;
        }
        match line.function {
            FunctionTag::Headline => {
                match open.as_mut() {
                    // A second headline before any body text is the
                    // article's subheading.
                    Some(stub) if !stub.body_started => stub.head.push(index),
                    _ => {
                        close(&mut open, &mut chunk, &mut stubs, &mut chunks);
                        open = Some(Stub::new(index));
                    }
                }
                gap = 0;
            }
            FunctionTag::Byline => {
                if let Some(stub) = open.as_mut().filter(|s| !s.body_started) {
                    stub.head.push(index);
                    gap = 0;
                } else {
                    gap += 1;
                }
            }
            FunctionTag::BodyText => {
                match open.as_mut() {
                    Some(stub) => {
                        stub.body.push(index);
                        stub.body_started = true;
                    }
                    None => chunk.push(index),
                }
                gap = 0;
            }
            _ => {
                gap += 1;
                if gap >= config.gap_limit {
                    close(&mut open, &mut chunk, &mut stubs, &mut chunks);
                }
            }
        }
    }
    close(&mut open, &mut chunk, &mut stubs, &mut chunks);
    (stubs, chunks)
}
