//! Resume screener: resume scoring, batch screening and decision evaluation

use clap::Parser;
use log::{error, info, warn};
use resume_screener::cli::{self, Cli, Commands, ConfigAction, ModelAction};
use resume_screener::config::{Config, OutputFormat};
use resume_screener::input::{DatasetReader, InputManager};
use resume_screener::output::formatter::{resolve_save_path, save_report_to_file, ReportGenerator};
use resume_screener::output::report::ScreeningOutcome;
use resume_screener::output::sink::{JsonLinesSink, StoredRecord};
use resume_screener::processing::decision::DecisionClassifier;
use resume_screener::processing::embedding_manager::EmbeddingModelManager;
use resume_screener::processing::embeddings::Embedder;
use resume_screener::processing::evaluator::{BatchEvaluator, EvaluationOptions};
use resume_screener::processing::profile::{CandidateProfile, JobDescription};
use resume_screener::processing::scorer::CompositeScorer;
use resume_screener::processing::screening::Screener;
use resume_screener::processing::similarity::SimilarityProvider;
use resume_screener::processing::skills::SkillMatcher;
use resume_screener::{Result, ScreenerError};
use std::path::Path;
use std::process;
use std::sync::Arc;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();

    let config = match Config::load(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            process::exit(1);
        }
    };

    if let Err(e) = run_command(cli.command, config, cli.no_embeddings).await {
        error!("Command failed: {}", e);
        process::exit(1);
    }
}

/// Build the similarity provider, loading an embedding model unless disabled.
/// A missing or unloadable model degrades to keyword overlap.
async fn build_similarity(
    config: &Config,
    embedding: Option<&str>,
    no_embeddings: bool,
) -> Result<SimilarityProvider> {
    let matcher = SkillMatcher::from_config(&config.skills)?;
    if no_embeddings {
        println!("⚠️  Embeddings disabled, scoring by keyword overlap");
        return Ok(SimilarityProvider::keyword_only(matcher));
    }

    let model_id = embedding.unwrap_or(config.models.default_embedding_model.as_str());
    let manager = EmbeddingModelManager::new(&config.models).await?;
    let embedder: Option<Arc<dyn Embedder>> = match manager.load_embedder(model_id) {
        Ok(embedder) => {
            println!("🧠 Embedding Model: {} ({} dimensions)", model_id, embedder.dimensions());
            Some(Arc::new(embedder) as Arc<dyn Embedder>)
        }
        Err(e) => {
            warn!("Embedding model unavailable, scoring by keyword overlap: {}", e);
            println!("💡 Download a model with: resume-screener models download {}", model_id);
            None
        }
    };

    Ok(SimilarityProvider::new(embedder, matcher))
}

/// Print `content`, or save it. Saving into a directory generates the file
/// name from `base_name`.
fn emit(
    content: &str,
    save: Option<&Path>,
    format: OutputFormat,
    base_name: &Path,
) -> Result<()> {
    match save {
        Some(path) => {
            let path = resolve_save_path(path, format, base_name);
            save_report_to_file(content, &path)?;
            println!("💾 Report saved to: {}", path.display());
        }
        None => println!("{}", content),
    }
    Ok(())
}

async fn run_command(command: Commands, config: Config, no_embeddings: bool) -> Result<()> {
    let classifier = DecisionClassifier::new(config.thresholds.clone());

    match command {
        Commands::Evaluate {
            dataset,
            limit,
            parallel,
            workers,
            embedding,
            output,
            save,
            detailed,
        } => {
            let output_format =
                cli::parse_output_format(&output).map_err(ScreenerError::InvalidInput)?;
            cli::validate_file_extension(&dataset, &["csv"])
                .map_err(|e| ScreenerError::InvalidInput(format!("Dataset file: {}", e)))?;

            println!("🔬 Evaluating screening decisions");
            println!("📊 Dataset: {}", dataset.display());

            let records = DatasetReader::new().with_limit(limit).read_path(&dataset)?;
            let similarity = build_similarity(&config, embedding.as_deref(), no_embeddings).await?;
            let scorer = CompositeScorer::new(similarity, config.scoring.clone(), classifier);

            let mut options = EvaluationOptions::from(&config.evaluation);
            options.parallel |= parallel;
            if let Some(workers) = workers {
                options.workers = workers;
            }

            let report = BatchEvaluator::new(scorer, options).evaluate(&records);
            info!(
                "Evaluated {} records: {} semantic, {} fallback",
                report.summary.total_cases,
                report.scoring_mode_counts.semantic,
                report.scoring_mode_counts.fallback
            );

            let generator = ReportGenerator::with_options(
                config.output.color_output,
                detailed || config.output.detailed,
                true,
            );
            let content = generator.generate_evaluation(&report, output_format)?;
            emit(&content, save.as_deref(), output_format, &dataset)?;
        }

        Commands::Score {
            name,
            skills,
            experience,
            education,
            certifications,
            role,
            job,
            policy,
            embedding,
            output,
        } => {
            let policy = cli::parse_policy(&policy).map_err(ScreenerError::InvalidInput)?;
            let candidate = CandidateProfile {
                name,
                skills,
                experience,
                education,
                certifications,
                job_role: role,
            };

            let job = match job {
                Some(path) => {
                    cli::validate_file_extension(&path, &["txt", "md"])
                        .map_err(|e| {
                            ScreenerError::InvalidInput(format!("Job description file: {}", e))
                        })?;
                    let text = InputManager::new().extract_text(&path).await?;
                    let title = path
                        .file_stem()
                        .map(|s| s.to_string_lossy().to_string())
                        .unwrap_or_else(|| candidate.job_role.clone());
                    JobDescription::new(title, text, "")
                }
                None => JobDescription::for_candidate(&candidate),
            };

            let similarity = build_similarity(&config, embedding.as_deref(), no_embeddings).await?;
            let scorer = CompositeScorer::new(similarity, config.scoring.clone(), classifier);
            let result = scorer.match_candidate(&candidate, &job, policy)?;

            if output.eq_ignore_ascii_case("json") {
                println!("{}", serde_json::to_string_pretty(&result)?);
            } else {
                let b = &result.breakdown;
                println!("\n🎯 {} for {}", result.candidate, result.job_title);
                println!(
                    "  • Semantic component: {:.2}% ({})",
                    b.semantic_component, b.scoring_mode
                );
                println!("  • Experience bonus: {}", b.experience_bonus);
                println!("  • Education bonus: {}", b.education_bonus);
                println!("  • Final score: {:.2}%", b.final_score);
                println!("  • Decision: {}", result.decision);
                println!("  • Matched skills: {}", result.matched_skills.join(", "));
                println!("  • Missing skills: {}", result.missing_skills.join(", "));
            }
        }

        Commands::Screen {
            job,
            resumes,
            job_id,
            embedding,
            output,
            save,
            no_history,
        } => {
            let output_format =
                cli::parse_output_format(&output).map_err(ScreenerError::InvalidInput)?;
            cli::validate_file_extension(&job, &["txt", "md"])
                .map_err(|e| ScreenerError::InvalidInput(format!("Job description file: {}", e)))?;
            if resumes.len() > config.screening.max_batch_size {
                return Err(ScreenerError::BatchTooLarge {
                    count: resumes.len(),
                    max: config.screening.max_batch_size,
                });
            }

            println!("📦 Batch processing {} resume(s)...", resumes.len());

            let mut input_manager = InputManager::new();
            let job_text = input_manager.extract_text(&job).await?;
            let documents = input_manager.extract_documents(&resumes).await;

            let similarity = build_similarity(&config, embedding.as_deref(), no_embeddings).await?;
            let mut screener = Screener::new(similarity, classifier, &config.screening);
            if !no_history {
                let sink = JsonLinesSink::new(config.screening.history_file.clone());
                screener = screener.with_sink(Arc::new(sink));
            }

            let report = screener.screen(job_id, &job_text, documents)?;
            println!(
                "✅ Batch processing complete! {} resume(s) processed, {} failed.",
                report.total_processed,
                report.error_count()
            );

            let generator = ReportGenerator::with_options(
                config.output.color_output,
                config.output.detailed,
                true,
            );
            let content = generator.generate_screening(&report, output_format)?;
            emit(&content, save.as_deref(), output_format, &job)?;
        }

        Commands::History { id: Some(id), output, .. } => {
            let sink = JsonLinesSink::new(config.screening.history_file.clone());
            let entry: StoredRecord<ScreeningOutcome> = sink
                .find(&id)?
                .ok_or_else(|| {
                    ScreenerError::InvalidInput(format!("No screening result with id {}", id))
                })?;

            if output.eq_ignore_ascii_case("json") {
                println!("{}", serde_json::to_string_pretty(&entry)?);
            } else {
                let record = &entry.record;
                println!("📄 Screening result {}\n", entry.id);
                println!("  • Saved: {}", entry.saved_at.format("%Y-%m-%d %H:%M:%S UTC"));
                println!("  • Job: {}", entry.job_id);
                println!("  • File: {}", record.file_name);
                println!("  • Candidate: {}", record.candidate_name);
                println!("  • Match score: {:.2}%", record.match_score);
                println!("  • Recommendation: {}", record.recommendation_label());
                println!("  • Matched skills: {}", record.matched_skills.join(", "));
                println!("  • Missing skills: {}", record.missing_skills.join(", "));
            }
        }

        Commands::History { limit, id: None, output } => {
            let sink = JsonLinesSink::new(config.screening.history_file.clone());
            let history: Vec<StoredRecord<ScreeningOutcome>> = sink.recent(limit)?;

            if output.eq_ignore_ascii_case("json") {
                println!("{}", serde_json::to_string_pretty(&history)?);
            } else if history.is_empty() {
                println!("📭 No screening results recorded yet ({})", sink.path().display());
            } else {
                println!("📜 Screening history ({} most recent)\n", history.len());
                for entry in &history {
                    println!(
                        "  • [{}] job {} | {} ({}) | {:.2}% | {}",
                        entry.saved_at.format("%Y-%m-%d %H:%M"),
                        entry.job_id,
                        entry.record.candidate_name,
                        entry.record.file_name,
                        entry.record.match_score,
                        entry.record.recommendation_label()
                    );
                }
            }
        }

        Commands::Models { action } => match action {
            ModelAction::List => {
                println!("📚 Available Embedding Models\n");
                let manager = EmbeddingModelManager::new(&config.models).await?;
                for model in manager.list_available_models() {
                    let status = if manager.is_model_downloaded(&model.name) {
                        "✅ Downloaded"
                    } else {
                        "⬇️  Available"
                    };
                    println!(
                        "  • {} ({}) - {} MB, {} dims [{}]",
                        model.name, model.repo_id, model.size_mb, model.dimensions, status
                    );
                    println!("    {}", model.description);
                }
                if manager.list_downloaded_models().is_empty() {
                    println!("\n💡 No models downloaded yet. Get started with:");
                    println!(
                        "   resume-screener models download {}",
                        config.models.default_embedding_model
                    );
                }
            }

            ModelAction::Download { model } => {
                let mut manager = EmbeddingModelManager::new(&config.models).await?;
                if manager.is_model_downloaded(&model) {
                    println!("✅ Model '{}' is already downloaded!", model);
                    return Ok(());
                }
                let path = manager.download_model(&model).await?;
                println!("📁 Location: {}", path.display());
            }
        },

        Commands::Config { action } => match action {
            Some(ConfigAction::Show) | None => {
                println!("⚙️  Current Configuration\n");
                let content = toml::to_string_pretty(&config)
                    .map_err(|e| {
                        ScreenerError::Configuration(format!("Failed to serialize config: {}", e))
                    })?;
                println!("{}", content);
            }

            Some(ConfigAction::Reset) => {
                println!("🔄 Resetting configuration to defaults...");
                Config::default().save()?;
                println!("✅ Configuration reset successfully!");
            }

            Some(ConfigAction::Path) => {
                println!("{}", Config::config_path().display());
            }
        },
    }

    Ok(())
}
