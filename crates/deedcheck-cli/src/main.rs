mod display;
mod files;

use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use deedcheck_core::{ReviewObject, chunk_precedent};
use deedcheck_extract::ParsedCase;
use deedcheck_review::reconcile::DEFAULT_SIMILARITY_THRESHOLD;
use deedcheck_review::{
    PipelineConfig, Reconciler, format_precedents_for_prompt, generator_prompt, group_precedents,
    validate_review,
};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "deedcheck", version, about = "Title-report review over merged property cases")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Print the deed, EC and report records extracted from a case
    Parse { case: PathBuf },

    /// Print the retrieval fingerprint of a case
    Fingerprint { case: PathBuf },

    /// Print the cross-source case extract
    Extract { case: PathBuf },

    /// Print the generator prompt for a case
    Prompt {
        case: PathBuf,
        /// JSON array of precedent chunk hits to group into the prompt
        #[arg(long)]
        precedents: Option<PathBuf>,
    },

    /// Chunk every precedent JSON file in a directory, one chunk per line
    Chunk { dir: PathBuf },

    /// Reconcile and validate a critic review, then print its summary
    Reconcile {
        review: PathBuf,
        /// Write the reconciled review here as review_<name>_<timestamp>.json
        #[arg(long, env = "DEEDCHECK_OUT_DIR")]
        out_dir: Option<PathBuf>,
        /// Evidence similarity above which same-location issues merge
        #[arg(long, env = "DEEDCHECK_SIMILARITY", default_value_t = DEFAULT_SIMILARITY_THRESHOLD)]
        similarity: f32,
    },
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();
    tracing::debug!("deedcheck v{}", env!("CARGO_PKG_VERSION"));

    match Cli::parse().command {
        Command::Parse { case } => {
            let parsed = ParsedCase::parse(&files::load_case(&case)?);
            println!("{}", serde_json::to_string_pretty(&parsed)?);
        }
        Command::Fingerprint { case } => {
            println!("{}", ParsedCase::parse(&files::load_case(&case)?).fingerprint());
        }
        Command::Extract { case } => {
            let extract = ParsedCase::parse(&files::load_case(&case)?).case_extract();
            println!("{}", serde_json::to_string_pretty(&extract)?);
        }
        Command::Prompt { case, precedents } => {
            let parsed = ParsedCase::parse(&files::load_case(&case)?);
            let hits = match precedents {
                Some(path) => files::read_json(&path)?,
                None => Vec::new(),
            };
            let grouped = group_precedents(hits, PipelineConfig::default().retrieval_n);
            let extract = serde_json::to_string_pretty(&parsed.case_extract())?;
            println!(
                "{}",
                generator_prompt(&extract, &format_precedents_for_prompt(&grouped))
            );
        }
        Command::Chunk { dir } => {
            for (path, precedent) in files::load_precedents(&dir)? {
                let chunks = chunk_precedent(&precedent);
                tracing::info!(file = %path.display(), chunks = chunks.len(), "chunked precedent");
                for chunk in chunks {
                    println!("{}", serde_json::to_string(&chunk)?);
                }
            }
        }
        Command::Reconcile {
            review,
            out_dir,
            similarity,
        } => {
            let value = files::read_json(&review)?;
            let mut object = ReviewObject::from_value(value)
                .with_context(|| format!("malformed review object in {}", review.display()))?;
            let report = Reconciler::new(similarity).reconcile(&mut object);
            validate_review(&object).context("reconciled review failed validation")?;

            display::print_reconcile_report(&report);
            display::print_summary(&object);

            if let Some(dir) = out_dir {
                let written = files::write_review(&dir, &review, &object, chrono::Local::now())?;
                println!("\nSaved: {}", written.display());
            }
        }
    }
    Ok(())
}
