//! The issue-processing pipeline: runs every tagging stage over one
//! issue in order, then reconstructs articles. Issues are independent,
//! so a batch fans out over blocking worker tasks.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::task::JoinSet;
use tracing::{error, info};

use crate::classify::{ClassifierConfig, Lexicon};
use crate::io;
use crate::models::{Article, IdAllocator, Issue};
use crate::reconstruct::{reconstruct, ReconstructConfig};
use crate::taggers::{
    body, headline, junk, publication, segment, BodyConfig, HeadlineConfig, JumpConfig,
    PublicationConfig, SegmentConfig, SmoothConfig,
};
use crate::taggers::{byline, jump};

/// Configuration for the whole pipeline, one section per stage.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub publication: PublicationConfig,
    pub headline: HeadlineConfig,
    pub jump: JumpConfig,
    pub body: BodyConfig,
    pub smooth: SmoothConfig,
    pub segment: SegmentConfig,
    pub classifiers: ClassifierConfig,
    pub reconstruct: ReconstructConfig,
    pub lexicon: Lexicon,
}

impl PipelineConfig {
    pub fn new(model_dir: impl Into<PathBuf>) -> Self {
        Self {
            publication: PublicationConfig::default(),
            headline: HeadlineConfig::default(),
            jump: JumpConfig::default(),
            body: BodyConfig::default(),
            smooth: SmoothConfig::default(),
            segment: SegmentConfig::default(),
            classifiers: ClassifierConfig::new(model_dir),
            reconstruct: ReconstructConfig::default(),
            lexicon: Lexicon::default(),
        }
    }
}

/// Per-issue counts reported after processing.
#[derive(Debug, Clone, Default)]
pub struct IssueReport {
    pub lines: usize,
    pub structural_tags: usize,
    pub jumps_resolved: usize,
    pub noise_tags: usize,
    pub articles: usize,
    pub chunks_attached: usize,
}

/// Run every stage over one issue and reconstruct its articles.
pub fn process_issue(
    issue: &mut Issue,
    config: &PipelineConfig,
    ids: &IdAllocator,
) -> Result<(Vec<Article>, IssueReport)> {
    let mut report = IssueReport {
        lines: issue.len(),
        ..Default::default()
    };

    let pub_result = publication::tag(issue, &config.publication);
    report.structural_tags += pub_result.stats.lines_tagged;
    report.structural_tags += byline::tag(issue).lines_tagged;
    report.structural_tags += headline::tag(issue, &config.headline, &config.lexicon).lines_tagged;

    let jump_stats = jump::tag(issue, &config.jump).context("Jump resolution failed")?;
    report.jumps_resolved = jump_stats.lines_tagged;

    report.noise_tags += junk::tag_blank(issue).lines_tagged;
    report.noise_tags += junk::tag_section_headers(issue).lines_tagged;
    report.noise_tags += junk::classify(
        issue,
        &config.classifiers,
        &config.lexicon,
        &config.publication.masthead,
    )
    .context("Classifier pass failed")?
    .lines_tagged;

    report.structural_tags += body::tag(issue, &config.body).lines_tagged;
    report.noise_tags += junk::smooth(issue, &config.smooth, &config.lexicon).lines_tagged;
    report.noise_tags += junk::tag_junk(issue, false).lines_tagged;

    let seg = segment::tag(issue, &config.segment).context("Segmentation failed")?;
    report.chunks_attached = seg.chunks_attached;

    let articles =
        reconstruct(issue, &config.reconstruct, ids).context("Reconstruction failed")?;
    report.articles = articles.len();
    Ok((articles, report))
}

/// Summary of a batch run.
#[derive(Debug, Clone, Default)]
pub struct BatchSummary {
    pub issues_processed: usize,
    pub issues_failed: usize,
    pub articles_written: usize,
}

/// Process a batch of issue files concurrently, writing each issue's
/// articles as they finish. A failed issue is logged and skipped; it
/// never takes the batch down.
pub async fn process_batch(
    inputs: Vec<PathBuf>,
    output_dir: &Path,
    config: Arc<PipelineConfig>,
    dates: Option<Arc<io::DateIndex>>,
) -> Result<BatchSummary> {
    std::fs::create_dir_all(output_dir)
        .with_context(|| format!("Failed to create output directory {:?}", output_dir))?;

    let ids = IdAllocator::new();
    let mut tasks = JoinSet::new();
    for input in inputs {
        let config = Arc::clone(&config);
        let dates = dates.clone();
        let ids = ids.clone();
        let output_dir = output_dir.to_path_buf();
        tasks.spawn_blocking(move || {
            let result = process_file(&input, &output_dir, &config, dates.as_deref(), &ids);
            (input, result)
        });
    }

    let mut summary = BatchSummary::default();
    while let Some(joined) = tasks.join_next().await {
        let (input, result) = joined.context("Worker task panicked")?;
        match result {
            Ok(written) => {
                summary.issues_processed += 1;
                summary.articles_written += written;
            }
            Err(err) => {
                summary.issues_failed += 1;
                error!("Failed to process {:?}: {:#}", input, err);
            }
        }
    }
    Ok(summary)
}

fn process_file(
    input: &Path,
    output_dir: &Path,
    config: &PipelineConfig,
    dates: Option<&io::DateIndex>,
    ids: &IdAllocator,
) -> Result<usize> {
    let mut issue = io::read_issue(input)?;
    if let (None, Some(dates)) = (&issue.date, dates) {
        issue.date = issue.issue_id().and_then(|id| dates.lookup(&id));
    }
    let (articles, report) = process_issue(&mut issue, config, ids)?;
    info!(
        "{:?}: {} lines, {} articles ({} jumps, {} chunks attached)",
        input, report.lines, report.articles, report.jumps_resolved, report.chunks_attached
    );
    io::write_articles(&articles, output_dir)?;
    Ok(articles.len())
}
