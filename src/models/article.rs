use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};

/// A reconstructed article: the final output record built from all
/// lines sharing one article id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Article {
    /// Output identifier, monotonically increasing across a whole run.
    pub id: u64,
    /// Article number within its issue (1-based, reading order).
    pub number: u32,
    pub headline: Option<String>,
    pub byline: Option<String>,
    pub subheading: Option<String>,
    /// Body paragraphs joined in paragraph order.
    pub text: String,
    /// Sorted distinct page numbers the article spans.
    pub pages: Vec<u32>,
    pub paragraph_count: usize,
    /// Publication date (ISO `YYYY-MM-DD`), when known.
    pub date: Option<String>,
    /// Publication identifier from the source filename.
    pub publication: String,
}

/// Hands out run-wide article output ids. Shared across worker tasks
/// instead of living in process-global state.
#[derive(Debug, Clone, Default)]
pub struct IdAllocator {
    next: Arc<AtomicU64>,
}

impl IdAllocator {
    pub fn new() -> Self {
        Self {
            next: Arc::new(AtomicU64::new(0)),
        }
    }

    pub fn next_id(&self) -> u64 {
        self.next.fetch_add(1, Ordering::Relaxed) + 1
    }
}
