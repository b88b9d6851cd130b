pub mod classify;
pub mod io;
pub mod metrics;
pub mod models;
pub mod pipeline;
pub mod reconstruct;
pub mod taggers;

pub use classify::{ClassifierConfig, Lexicon, NaiveBayesModel};
pub use io::{read_issue, write_articles, DateIndex};
pub use metrics::{evaluate, Accuracy};
pub use models::{Article, FunctionTag, IdAllocator, Issue, Jump, Line};
pub use pipeline::{process_batch, process_issue, BatchSummary, IssueReport, PipelineConfig};
pub use reconstruct::{reconstruct, ReconstructConfig};
