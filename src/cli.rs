//! CLI interface for the resume screener

use crate::config::OutputFormat;
use crate::processing::decision::DecisionPolicy;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "resume-screener")]
#[command(about = "Resume scoring and screening with semantic similarity")]
#[command(
    long_about = "Score candidates against job descriptions with embeddings, experience and \
                  education bonuses, screen resume batches, and evaluate decisions against \
                  historical recruiter outcomes"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Configuration file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Score with keyword overlap only, without loading an embedding model
    #[arg(long, global = true)]
    pub no_embeddings: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Evaluate hire decisions against a labeled CSV dataset
    Evaluate {
        /// Dataset in the recruiter-decision CSV layout
        dataset: PathBuf,

        /// Evaluate only the first N records
        #[arg(short, long)]
        limit: Option<usize>,

        /// Score records on a worker pool
        #[arg(short, long)]
        parallel: bool,

        /// Worker threads for --parallel (default: one per core)
        #[arg(short, long)]
        workers: Option<usize>,

        /// Embedding model to use
        #[arg(short, long)]
        embedding: Option<String>,

        /// Output format: console, json, markdown, html
        #[arg(short, long, default_value = "console")]
        output: String,

        /// Save output to file, or into a directory under a generated name
        #[arg(short, long)]
        save: Option<PathBuf>,

        /// Show every record instead of a sample
        #[arg(short, long)]
        detailed: bool,
    },

    /// Score a single candidate profile
    Score {
        #[arg(long)]
        name: String,

        /// Comma separated skills
        #[arg(long)]
        skills: String,

        /// Years of experience
        #[arg(long, default_value = "0")]
        experience: String,

        #[arg(long, default_value = "")]
        education: String,

        #[arg(long, default_value = "")]
        certifications: String,

        /// Role the candidate applies for
        #[arg(long)]
        role: String,

        /// Job description file (TXT, MD); generated from role and skills if omitted
        #[arg(short, long)]
        job: Option<PathBuf>,

        /// Decision policy: binary or ternary
        #[arg(long, default_value = "binary")]
        policy: String,

        /// Embedding model to use
        #[arg(short, long)]
        embedding: Option<String>,

        /// Output format: console or json
        #[arg(short, long, default_value = "console")]
        output: String,
    },

    /// Screen a batch of resumes against a job description
    Screen {
        /// Job description file (TXT, MD)
        #[arg(short, long)]
        job: PathBuf,

        /// Resume files (TXT, MD)
        #[arg(required = true)]
        resumes: Vec<PathBuf>,

        /// Job identifier recorded with saved results
        #[arg(long, default_value_t = 1)]
        job_id: u64,

        /// Embedding model to use
        #[arg(short, long)]
        embedding: Option<String>,

        /// Output format: console, json, markdown, html
        #[arg(short, long, default_value = "console")]
        output: String,

        /// Save output to file, or into a directory under a generated name
        #[arg(short, long)]
        save: Option<PathBuf>,

        /// Do not record results in the screening history
        #[arg(long)]
        no_history: bool,
    },

    /// Show past screening results, most recent first
    History {
        /// Number of results to show
        #[arg(short, long, default_value_t = 20)]
        limit: usize,

        /// Show the single result saved under this id
        #[arg(long)]
        id: Option<String>,

        /// Output format: console or json
        #[arg(short, long, default_value = "console")]
        output: String,
    },

    /// Model management commands
    Models {
        #[command(subcommand)]
        action: ModelAction,
    },

    /// Show configuration
    Config {
        #[command(subcommand)]
        action: Option<ConfigAction>,
    },
}

#[derive(Subcommand)]
pub enum ModelAction {
    /// List available embedding models
    List,

    /// Download an embedding model
    Download {
        /// Model name or HuggingFace repo ID
        model: String,
    },
}

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Reset configuration to defaults
    Reset,

    /// Print the configuration file location
    Path,
}

/// Parse and validate output format
pub fn parse_output_format(format: &str) -> Result<OutputFormat, String> {
    match format.to_lowercase().as_str() {
        "console" => Ok(OutputFormat::Console),
        "json" => Ok(OutputFormat::Json),
        "markdown" | "md" => Ok(OutputFormat::Markdown),
        "html" => Ok(OutputFormat::Html),
        _ => Err(format!(
            "Invalid output format: {}. Supported: console, json, markdown, html",
            format
        )),
    }
}

pub fn parse_policy(policy: &str) -> Result<DecisionPolicy, String> {
    policy.parse()
}

/// Validate file extension
pub fn validate_file_extension(path: &Path, allowed_extensions: &[&str]) -> Result<(), String> {
    match path.extension().and_then(|ext| ext.to_str()) {
        Some(ext) => {
            if allowed_extensions.contains(&ext.to_lowercase().as_str()) {
                Ok(())
            } else {
                Err(format!(
                    "Unsupported file extension: .{}. Allowed: {}",
                    ext,
                    allowed_extensions.join(", ")
                ))
            }
        }
        None => Err("File has no extension".to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_evaluate() {
        let cli = Cli::try_parse_from([
            "resume-screener",
            "--no-embeddings",
            "evaluate",
            "data.csv",
            "--parallel",
            "--limit",
            "50",
        ])
        .unwrap();

        assert!(cli.no_embeddings);
        match cli.command {
            Commands::Evaluate { dataset, parallel, limit, .. } => {
                assert_eq!(dataset, PathBuf::from("data.csv"));
                assert!(parallel);
                assert_eq!(limit, Some(50));
            }
            _ => panic!("expected evaluate"),
        }
    }

    #[test]
    fn test_screen_requires_resumes() {
        assert!(Cli::try_parse_from(["resume-screener", "screen", "--job", "job.txt"]).is_err());
    }

    #[test]
    fn test_parse_history_by_id() {
        let cli =
            Cli::try_parse_from(["resume-screener", "history", "--id", "20260101120000000-0003"])
                .unwrap();
        match cli.command {
            Commands::History { id, limit, .. } => {
                assert_eq!(id.as_deref(), Some("20260101120000000-0003"));
                assert_eq!(limit, 20);
            }
            _ => panic!("expected history"),
        }
    }

    #[test]
    fn test_parse_helpers() {
        assert_eq!(parse_output_format("MD").unwrap(), OutputFormat::Markdown);
        assert!(parse_output_format("pdf").is_err());
        assert_eq!(parse_policy("ternary").unwrap(), DecisionPolicy::Ternary);
        assert!(validate_file_extension(Path::new("cv.md"), &["txt", "md"]).is_ok());
        assert!(validate_file_extension(Path::new("cv"), &["txt"]).is_err());
    }
}
