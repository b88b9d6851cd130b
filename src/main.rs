use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use linotype::{
    evaluate, process_batch, process_issue, read_issue, DateIndex, FunctionTag, IdAllocator,
    Issue, Line, PipelineConfig,
};

#[derive(Parser)]
#[command(name = "linotype")]
#[command(author, version, about = "OCR newspaper article extraction pipeline", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Process scanned issues into structured article JSON
    Process {
        /// Input issue file, or a directory of issue files
        #[arg(short, long)]
        input: PathBuf,

        /// Output directory for article JSON files
        #[arg(short, long)]
        output: PathBuf,

        /// Directory holding the pretrained classifier models
        #[arg(short, long, default_value = "models")]
        models: PathBuf,

        /// Publication name as printed on the nameplate
        #[arg(long, default_value = "Mustang Daily")]
        masthead: String,

        /// Date spreadsheet (CSV) for issues without a readable banner
        #[arg(long)]
        dates: Option<PathBuf>,

        /// Fail an issue on malformed paragraph numbering instead of
        /// repairing it
        #[arg(long)]
        strict: bool,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },

    /// Analyze a raw or tagged issue without writing anything
    Analyze {
        /// Input issue file
        #[arg(short, long)]
        input: PathBuf,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },

    /// Run the pipeline over hand-tagged issues and score it
    Evaluate {
        /// Hand-tagged reference issue (CSV), or a directory of them
        #[arg(short, long)]
        reference: PathBuf,

        /// Directory holding the pretrained classifier models
        #[arg(short, long, default_value = "models")]
        models: PathBuf,

        /// Publication name as printed on the nameplate
        #[arg(long, default_value = "Mustang Daily")]
        masthead: String,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Process {
            input,
            output,
            models,
            masthead,
            dates,
            strict,
            verbose,
        } => {
            setup_logging(verbose);
            process_issues(input, output, models, masthead, dates, strict).await
        }
        Commands::Analyze { input, verbose } => {
            setup_logging(verbose);
            analyze_issue(input)
        }
        Commands::Evaluate {
            reference,
            models,
            masthead,
            verbose,
        } => {
            setup_logging(verbose);
            evaluate_issue(reference, models, masthead)
        }
    }
}

fn setup_logging(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder().with_max_level(level).finish();
    tracing::subscriber::set_global_default(subscriber).ok();
}

fn build_config(models: PathBuf, masthead: &str) -> PipelineConfig {
    let mut config = PipelineConfig::new(models);
    config.publication.masthead = masthead.to_uppercase();
    config
}

async fn process_issues(
    input: PathBuf,
    output: PathBuf,
    models: PathBuf,
    masthead: String,
    dates: Option<PathBuf>,
    strict: bool,
) -> Result<()> {
    let mut config = build_config(models, &masthead);
    config.reconstruct.strict = strict;

    let inputs = collect_inputs(&input)?;
    info!("Processing {} issue file(s)", inputs.len());

    let dates = match dates {
        Some(path) => {
            let index = DateIndex::load(&path)?;
            info!("Loaded {} date index entries", index.len());
            Some(Arc::new(index))
        }
        None => None,
    };

    let summary = process_batch(inputs, &output, Arc::new(config), dates).await?;
    info!(
        "Done: {} issues processed, {} failed, {} articles written",
        summary.issues_processed, summary.issues_failed, summary.articles_written
    );
    Ok(())
}

fn collect_inputs(input: &PathBuf) -> Result<Vec<PathBuf>> {
    if input.is_dir() {
        let mut files: Vec<PathBuf> = std::fs::read_dir(input)
            .with_context(|| format!("Failed to read input directory {:?}", input))?
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .filter(|path| {
                matches!(
                    path.extension().and_then(|e| e.to_str()),
                    Some("txt") | Some("csv")
                )
            })
            .collect();
        files.sort();
        Ok(files)
    } else {
        Ok(vec![input.clone()])
    }
}

fn analyze_issue(input: PathBuf) -> Result<()> {
    let issue = read_issue(&input)?;
    println!("File: {:?}", input);
    println!("Lines: {}", issue.len());
    println!("Pages: {:?}", issue.pages());
    if let Some(id) = issue.publication_id() {
        println!("Publication: {}", id);
    }
    if let Some(id) = issue.issue_id() {
        println!("Issue id: {}", id);
    }

    let roles = [
        FunctionTag::PublicationInfo,
        FunctionTag::Headline,
        FunctionTag::Byline,
        FunctionTag::BodyText,
        FunctionTag::Advertisement,
        FunctionTag::Unintelligible,
        FunctionTag::SectionHeader,
        FunctionTag::MastheadContinuation,
        FunctionTag::Junk,
        FunctionTag::Unset,
    ];
    println!("Role counts:");
    for role in roles {
        let count = issue.count_role(role);
        if count > 0 {
            println!("  {:?}: {}", role, count);
        }
    }

    let jumps = issue.lines().filter(|(_, l)| !l.jump.is_none()).count();
    println!("Lines with jump markers: {}", jumps);
    let articles = issue
        .lines()
        .filter_map(|(_, l)| l.article)
        .collect::<std::collections::HashSet<_>>()
        .len();
    println!("Articles: {}", articles);
    Ok(())
}

fn evaluate_issue(reference: PathBuf, models: PathBuf, masthead: String) -> Result<()> {
    let config = build_config(models, &masthead);
    let ids = IdAllocator::new();
    let mut total = linotype::Accuracy::default();

    for path in collect_inputs(&reference)? {
        let tagged = read_issue(&path)?;

        // Re-run the pipeline over the bare text of the reference
        // issue.
        let lines: Vec<Line> = tagged
            .lines()
            .map(|(_, l)| Line {
                text: l.text.clone(),
                ..Line::new(l.page, "")
            })
            .collect();
        let mut predicted = match &tagged.filename {
            Some(name) => Issue::with_filename(lines, name.clone()),
            None => Issue::new(lines),
        };

        let (articles, report) = process_issue(&mut predicted, &config, &ids)?;
        info!(
            "{:?}: pipeline produced {} articles from {} lines",
            path,
            articles.len(),
            report.lines
        );
        total.absorb(&evaluate(&tagged, &predicted)?);
    }

    println!(
        "Role accuracy: {:.1}% ({}/{})",
        total.role_accuracy() * 100.0,
        total.role_correct,
        total.role_total
    );
    println!(
        "Jump accuracy: {:.1}% ({}/{})",
        total.jump_accuracy() * 100.0,
        total.jump_correct,
        total.jump_total
    );
    Ok(())
}
