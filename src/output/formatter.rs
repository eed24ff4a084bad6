//! Output formatters for evaluation and screening reports

use crate::config::OutputFormat;
use crate::error::{Result, ScreenerError};
use crate::output::report::{EvaluationReport, RecordOutcome, ScreeningOutcome, ScreeningReport};
use crate::processing::decision::Decision;
use askama::Template;
use colored::{Color, Colorize};
use std::path::{Path, PathBuf};

/// Trait for rendering finished reports
pub trait OutputFormatter {
    fn format_evaluation(&self, report: &EvaluationReport) -> Result<String>;
    fn format_screening(&self, report: &ScreeningReport) -> Result<String>;
}

/// Console formatter with colors
pub struct ConsoleFormatter {
    use_colors: bool,
    detailed: bool,
}

/// JSON formatter for machine consumption
pub struct JsonFormatter {
    pretty: bool,
}

pub struct MarkdownFormatter {
    include_metadata: bool,
}

/// HTML formatter with embedded styling
pub struct HtmlFormatter {
    include_styles: bool,
}

/// Coordinates the formatters
pub struct ReportGenerator {
    console_formatter: ConsoleFormatter,
    json_formatter: JsonFormatter,
    markdown_formatter: MarkdownFormatter,
    html_formatter: HtmlFormatter,
}

/// Records shown in console and markdown output when not detailed
const SAMPLE_SIZE: usize = 10;

const HTML_STYLES: &str = r#"<style>
        body {
            font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif;
            line-height: 1.6;
            color: #333;
            max-width: 1000px;
            margin: 0 auto;
            padding: 20px;
            background: #f8f9fa;
        }
        .container {
            background: white;
            padding: 30px;
            border-radius: 8px;
            box-shadow: 0 2px 10px rgba(0,0,0,0.1);
        }
        .header {
            text-align: center;
            border-bottom: 3px solid #007acc;
            padding-bottom: 20px;
        }
        .metrics {
            display: grid;
            grid-template-columns: repeat(auto-fit, minmax(180px, 1fr));
            gap: 15px;
            margin: 20px 0;
        }
        .metric {
            background: #f8f9fa;
            padding: 15px;
            border-radius: 6px;
            border-left: 4px solid #007acc;
        }
        .metric .value { font-size: 1.6em; font-weight: bold; }
        table { width: 100%; border-collapse: collapse; margin: 15px 0; }
        th, td { padding: 8px; border-bottom: 1px solid #e9ecef; text-align: left; }
        th { background: #007acc; color: white; }
        .positive { color: #28a745; font-weight: bold; }
        .review { color: #b8860b; font-weight: bold; }
        .negative { color: #dc3545; font-weight: bold; }
        .degraded { background: #fff3cd; }
        .metadata { color: #6c757d; font-size: 0.9em; margin-top: 30px; }
    </style>"#;

#[derive(Template)]
#[template(source = r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>Screening Evaluation Report</title>
    {% if include_styles %}{{ styles | safe }}{% endif %}
</head>
<body>
    <div class="container">
        <div class="header">
            <h1>📊 Screening Evaluation Report</h1>
            <p>{{ total_cases }} records evaluated against recruiter decisions</p>
        </div>

        <div class="metrics">
            <div class="metric"><div>Accuracy</div><div class="value">{{ accuracy }}</div></div>
            <div class="metric"><div>Precision</div><div class="value">{{ precision }}</div></div>
            <div class="metric"><div>Recall</div><div class="value">{{ recall }}</div></div>
            <div class="metric"><div>F1 score</div><div class="value">{{ f1_score }}</div></div>
        </div>

        <h2>Recruiter Decisions</h2>
        <p>{{ label_summary }}</p>

        <h2>Confusion Matrix</h2>
        <table>
            <tr><th></th><th>Recruiter: Hire</th><th>Recruiter: not Hire</th></tr>
            <tr>
                <td><strong>Predicted Hire</strong></td>
                <td>{{ true_positives }}</td><td>{{ false_positives }}</td>
            </tr>
            <tr>
                <td><strong>Predicted Reject</strong></td>
                <td>{{ false_negatives }}</td><td>{{ true_negatives }}</td>
            </tr>
        </table>

        <h2>Results</h2>
        <p>
            Semantic: {{ semantic_count }} | Fallback: {{ fallback_count }}
            | Degraded: {{ degraded_count }}
        </p>
        <table>
            <tr>
                <th>#</th><th>Candidate</th><th>Role</th><th>Exp</th><th>Education</th>
                <th>Score</th><th>Predicted</th><th>Recruiter</th><th></th>
            </tr>
            {{ rows_html | safe }}
        </table>

        <div class="metadata">
            <p>
                <strong>Generated by resume-screener v{{ version }}</strong> at {{ generated_at }}
            </p>
            <p><strong>Embedding model:</strong> {{ model }}</p>
        </div>
    </div>
</body>
</html>"#, ext = "html")]
struct EvaluationHtmlTemplate {
    include_styles: bool,
    styles: String,
    total_cases: u64,
    accuracy: String,
    precision: String,
    recall: String,
    f1_score: String,
    true_positives: u64,
    true_negatives: u64,
    false_positives: u64,
    false_negatives: u64,
    label_summary: String,
    semantic_count: u64,
    fallback_count: u64,
    degraded_count: u64,
    rows_html: String,
    version: String,
    generated_at: String,
    model: String,
}

#[derive(Template)]
#[template(source = r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>Resume Screening Results</title>
    {% if include_styles %}{{ styles | safe }}{% endif %}
</head>
<body>
    <div class="container">
        <div class="header">
            <h1>📄 Resume Screening Results</h1>
            <p>
                {{ total_processed }} resume(s) screened for job {{ job_id }}
                ({{ error_count }} failed)
            </p>
        </div>

        <h2>Job Description</h2>
        <pre>{{ job_description }}</pre>

        <h2>Candidates</h2>
        <table>
            <tr>
                <th>File</th><th>Candidate</th><th>Match</th><th>Recommendation</th>
                <th>Matched skills</th><th>Missing skills</th>
            </tr>
            {{ rows_html | safe }}
        </table>

        <div class="metadata">
            <p><strong>Generated by resume-screener v{{ version }}</strong> at {{ screened_at }}</p>
        </div>
    </div>
</body>
</html>"#, ext = "html")]
struct ScreeningHtmlTemplate {
    include_styles: bool,
    styles: String,
    job_id: u64,
    total_processed: usize,
    error_count: usize,
    job_description: String,
    rows_html: String,
    version: String,
    screened_at: String,
}

fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

fn join_or_none(items: &[String]) -> String {
    if items.is_empty() {
        "None".to_string()
    } else {
        items.join(", ")
    }
}

impl ConsoleFormatter {
    pub fn new(use_colors: bool, detailed: bool) -> Self {
        Self { use_colors, detailed }
    }

    fn colorize(&self, text: &str, color: Color) -> String {
        if self.use_colors {
            text.color(color).to_string()
        } else {
            text.to_string()
        }
    }

    fn format_header(&self, title: &str, level: u8) -> String {
        let prefix = match level {
            1 => "█",
            2 => "▓",
            _ => "▒",
        };

        let color = match level {
            1 => Color::Blue,
            2 => Color::Green,
            _ => Color::Yellow,
        };

        if self.use_colors {
            format!("\n{} {}\n", prefix.color(color).bold(), title.color(color).bold())
        } else {
            format!("\n{} {}\n", prefix, title)
        }
    }

    fn format_decision(&self, decision: Option<Decision>) -> String {
        let (label, color) = match decision {
            Some(d @ (Decision::Hire | Decision::Pass)) => (d.to_string(), Color::Green),
            Some(d @ Decision::Review) => (d.to_string(), Color::Yellow),
            Some(d) => (d.to_string(), Color::Red),
            None => ("ERROR".to_string(), Color::BrightRed),
        };

        if self.use_colors {
            label.color(color).bold().to_string()
        } else {
            label
        }
    }

    fn format_record(&self, position: usize, outcome: &RecordOutcome) -> String {
        let status = if outcome.correct { "✅" } else { "❌" };
        let mut line = format!(
            concat!(
                "{}. {} - {}\n   Exp: {}y | Edu: {}\n",
                "   Score: {:.2}% ({}) | Predicted: {} | Recruiter: {} {}\n"
            ),
            position,
            outcome.result.candidate,
            outcome.result.job_title,
            outcome.experience,
            outcome.education,
            outcome.result.final_score(),
            outcome.result.breakdown.scoring_mode,
            self.format_decision(Some(outcome.result.decision)),
            outcome.ground_truth,
            status
        );
        if let Some(error) = &outcome.scoring_error {
            let warning = self.colorize(&format!("⚠️  degraded: {}", error), Color::Yellow);
            line.push_str(&format!("   {}\n", warning));
        }
        line
    }
}

impl OutputFormatter for ConsoleFormatter {
    fn format_evaluation(&self, report: &EvaluationReport) -> Result<String> {
        let summary = &report.summary;
        let matrix = &report.confusion_matrix;
        let mut output = String::new();

        output.push_str(&self.format_header("📊 SCREENING EVALUATION RESULTS", 1));
        output.push_str(&format!(
            "Generated: {}\n",
            report.generated_at.format("%Y-%m-%d %H:%M:%S UTC")
        ));
        output.push_str(&format!(
            "Embedding model: {}\n",
            report.model.as_deref().unwrap_or("none (keyword overlap)")
        ));

        output.push_str(&self.format_header("Summary", 2));
        output.push_str(&format!("Total Resumes Tested:     {}\n", summary.total_cases));
        output.push_str(&format!("Correct Predictions:      {}\n", summary.correct_predictions));
        output.push_str(&format!(
            "Incorrect Predictions:    {}\n\n",
            summary.total_cases - summary.correct_predictions
        ));
        output.push_str(&format!(
            "🎯 ACCURACY:  {}\n",
            self.colorize(&format!("{:.2}%", summary.accuracy), Color::Cyan)
        ));
        output.push_str(&format!("📈 PRECISION: {:.2}%\n", summary.precision));
        output.push_str(&format!("📊 RECALL:    {:.2}%\n", summary.recall));
        output.push_str(&format!("⭐ F1-SCORE:  {:.2}%\n", summary.f1_score));

        let labels = &report.label_distribution;
        output.push_str(&self.format_header("Recruiter Decisions", 2));
        output.push_str(&format!("Hire:   {} ({:.1}%)\n", labels.hire, labels.hire_percent()));
        output.push_str(&format!("Reject: {} ({:.1}%)\n", labels.reject, labels.reject_percent()));
        if labels.unknown > 0 {
            output.push_str(&format!("Other:  {} (counted as not hired)\n", labels.unknown));
        }

        output.push_str(&self.format_header("Confusion Matrix", 2));
        let matrix_lines = [
            ("True Positives (correctly hired):   ", matrix.true_positives),
            ("True Negatives (correctly rejected):", matrix.true_negatives),
            ("False Positives (wrongly hired):    ", matrix.false_positives),
            ("False Negatives (wrongly rejected): ", matrix.false_negatives),
        ];
        for (label, count) in matrix_lines {
            output.push_str(&format!("{} {}\n", label, count));
        }

        output.push_str(&self.format_header("Scoring Modes", 3));
        output.push_str(&format!(
            "Semantic: {} | Fallback: {} | Degraded: {}\n",
            report.scoring_mode_counts.semantic,
            report.scoring_mode_counts.fallback,
            report.degraded_records
        ));
        if report.scoring_mode_counts.fallback > 0 {
            output.push_str(&self.colorize(
                "⚠️  Some records were scored by keyword overlap; \
                 results are not comparable to a fully semantic run\n",
                Color::Yellow,
            ));
        }

        let shown = if self.detailed {
            report.detailed_results.len()
        } else {
            SAMPLE_SIZE
        };
        if !report.detailed_results.is_empty() {
            let title = if self.detailed {
                "All Results".to_string()
            } else {
                format!("Sample Results (first {})", shown.min(report.detailed_results.len()))
            };
            output.push_str(&self.format_header(&title, 2));
            for (i, outcome) in report.detailed_results.iter().take(shown).enumerate() {
                output.push_str(&self.format_record(i + 1, outcome));
                output.push('\n');
            }
        }

        Ok(output)
    }

    fn format_screening(&self, report: &ScreeningReport) -> Result<String> {
        let mut output = String::new();

        output.push_str(&self.format_header("📄 RESUME SCREENING RESULTS", 1));
        output.push_str(&format!(
            "Job {} | {} resume(s) processed | {} failed\n",
            report.job_id,
            report.total_processed,
            report.error_count()
        ));

        for outcome in &report.results {
            output.push_str(&self.format_header(&outcome.file_name, 3));
            if let Some(error) = &outcome.error {
                output.push_str(&format!(
                    "{} {}\n",
                    self.format_decision(None),
                    self.colorize(error, Color::Red)
                ));
                continue;
            }

            output.push_str(&format!("Candidate: {}\n", outcome.candidate_name));
            output.push_str(&format!(
                "Match: {:.2}% | {} | {}\n",
                outcome.match_score,
                self.format_decision(outcome.recommendation),
                if outcome.ai_powered() { "semantic" } else { "keyword overlap" }
            ));
            output.push_str(&format!(
                "✅ Matched: {}\n",
                self.colorize(&join_or_none(&outcome.matched_skills), Color::Green)
            ));
            output.push_str(&format!(
                "❌ Missing: {}\n",
                self.colorize(&join_or_none(&outcome.missing_skills), Color::Red)
            ));
            if self.detailed {
                if let Some(id) = &outcome.id {
                    output.push_str(&format!("Saved as: {}\n", id));
                }
            }
        }

        Ok(output)
    }
}

impl JsonFormatter {
    pub fn new(pretty: bool) -> Self {
        Self { pretty }
    }

    fn to_json<T: serde::Serialize>(&self, value: &T) -> Result<String> {
        if self.pretty {
            Ok(serde_json::to_string_pretty(value)?)
        } else {
            Ok(serde_json::to_string(value)?)
        }
    }
}

impl OutputFormatter for JsonFormatter {
    fn format_evaluation(&self, report: &EvaluationReport) -> Result<String> {
        self.to_json(report)
    }

    fn format_screening(&self, report: &ScreeningReport) -> Result<String> {
        self.to_json(report)
    }
}

impl MarkdownFormatter {
    pub fn new(include_metadata: bool) -> Self {
        Self { include_metadata }
    }

    fn markdown_decision(decision: Option<Decision>) -> &'static str {
        match decision {
            Some(Decision::Hire) => "🟢 Hire",
            Some(Decision::Pass) => "🟢 PASS",
            Some(Decision::Review) => "🟡 REVIEW",
            Some(Decision::Reject) => "🔴 Reject",
            Some(Decision::Fail) => "🔴 FAIL",
            None => "⚠️ ERROR",
        }
    }

    /// Escape pipes so cell text cannot break the table.
    fn cell(text: &str) -> String {
        text.replace('|', "\\|").replace('\n', " ")
    }
}

impl OutputFormatter for MarkdownFormatter {
    fn format_evaluation(&self, report: &EvaluationReport) -> Result<String> {
        let summary = &report.summary;
        let matrix = &report.confusion_matrix;
        let mut output = String::new();

        output.push_str("# 📊 Screening Evaluation Report\n\n");
        if self.include_metadata {
            output.push_str(&format!(
                "**Generated:** {} | **Embedding model:** {}\n\n",
                report.generated_at.format("%Y-%m-%d %H:%M:%S UTC"),
                report.model.as_deref().unwrap_or("none")
            ));
        }

        output.push_str("## Summary\n\n");
        output.push_str("| Metric | Value |\n|---|---|\n");
        output.push_str(&format!("| Total cases | {} |\n", summary.total_cases));
        output.push_str(&format!("| Correct predictions | {} |\n", summary.correct_predictions));
        output.push_str(&format!("| Accuracy | {:.2}% |\n", summary.accuracy));
        output.push_str(&format!("| Precision | {:.2}% |\n", summary.precision));
        output.push_str(&format!("| Recall | {:.2}% |\n", summary.recall));
        output.push_str(&format!("| F1 score | {:.2}% |\n\n", summary.f1_score));

        let labels = &report.label_distribution;
        output.push_str("## Recruiter Decisions\n\n");
        output.push_str("| Label | Count | Share |\n|---|---|---|\n");
        output.push_str(&format!("| Hire | {} | {:.1}% |\n", labels.hire, labels.hire_percent()));
        output.push_str(&format!(
            "| Reject | {} | {:.1}% |\n",
            labels.reject,
            labels.reject_percent()
        ));
        if labels.unknown > 0 {
            output.push_str(&format!("| Other | {} | - |\n", labels.unknown));
        }
        output.push('\n');

        output.push_str("## Confusion Matrix\n\n");
        output.push_str("| | Recruiter: Hire | Recruiter: not Hire |\n|---|---|---|\n");
        output.push_str(&format!(
            "| **Predicted Hire** | {} | {} |\n",
            matrix.true_positives, matrix.false_positives
        ));
        output.push_str(&format!(
            "| **Predicted Reject** | {} | {} |\n\n",
            matrix.false_negatives, matrix.true_negatives
        ));

        output.push_str(&format!(
            "Scoring modes: {} semantic, {} fallback, {} degraded.\n\n",
            report.scoring_mode_counts.semantic,
            report.scoring_mode_counts.fallback,
            report.degraded_records
        ));

        if !report.detailed_results.is_empty() {
            output.push_str("## Sample Results\n\n");
            output.push_str("| # | Candidate | Role | Score | Predicted | Recruiter | |\n");
            output.push_str("|---|---|---|---|---|---|---|\n");
            for outcome in report.detailed_results.iter().take(SAMPLE_SIZE) {
                output.push_str(&format!(
                    "| {} | {} | {} | {:.2} | {} | {} | {} |\n",
                    outcome.index + 1,
                    Self::cell(&outcome.result.candidate),
                    Self::cell(&outcome.result.job_title),
                    outcome.result.final_score(),
                    Self::markdown_decision(Some(outcome.result.decision)),
                    Self::cell(&outcome.ground_truth.to_string()),
                    if outcome.correct { "✅" } else { "❌" }
                ));
            }
        }

        Ok(output)
    }

    fn format_screening(&self, report: &ScreeningReport) -> Result<String> {
        let mut output = String::new();

        output.push_str("# 📄 Resume Screening Results\n\n");
        if self.include_metadata {
            output.push_str(&format!(
                "**Screened:** {} | **Job:** {} | **Processed:** {}\n\n",
                report.screened_at.format("%Y-%m-%d %H:%M:%S UTC"),
                report.job_id,
                report.total_processed
            ));
        }

        output.push_str("| File | Candidate | Match | Recommendation | Matched | Missing |\n");
        output.push_str("|---|---|---|---|---|---|\n");
        for outcome in &report.results {
            output.push_str(&format!(
                "| {} | {} | {:.2}% | {} | {} | {} |\n",
                Self::cell(&outcome.file_name),
                Self::cell(&outcome.candidate_name),
                outcome.match_score,
                Self::markdown_decision(outcome.recommendation),
                Self::cell(&join_or_none(&outcome.matched_skills)),
                Self::cell(&join_or_none(&outcome.missing_skills))
            ));
        }

        let failures: Vec<&ScreeningOutcome> =
            report.results.iter().filter(|o| o.is_error()).collect();
        if !failures.is_empty() {
            output.push_str("\n## Errors\n\n");
            for outcome in failures {
                output.push_str(&format!(
                    "- `{}`: {}\n",
                    outcome.file_name,
                    outcome.error.as_deref().unwrap_or("unknown error")
                ));
            }
        }

        Ok(output)
    }
}

impl HtmlFormatter {
    pub fn new(include_styles: bool) -> Self {
        Self { include_styles }
    }

    fn decision_class(decision: Option<Decision>) -> &'static str {
        match decision {
            Some(Decision::Hire | Decision::Pass) => "positive",
            Some(Decision::Review) => "review",
            _ => "negative",
        }
    }

    fn evaluation_rows(report: &EvaluationReport) -> String {
        report
            .detailed_results
            .iter()
            .map(|outcome| {
                format!(
                    concat!(
                        "<tr{}><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td>",
                        "<td>{:.2}</td><td class=\"{}\">{}</td><td>{}</td><td>{}</td></tr>"
                    ),
                    if outcome.is_degraded() { " class=\"degraded\"" } else { "" },
                    outcome.index + 1,
                    escape_html(&outcome.result.candidate),
                    escape_html(&outcome.result.job_title),
                    escape_html(&outcome.experience),
                    escape_html(&outcome.education),
                    outcome.result.final_score(),
                    Self::decision_class(Some(outcome.result.decision)),
                    outcome.result.decision,
                    escape_html(&outcome.ground_truth.to_string()),
                    if outcome.correct { "✅" } else { "❌" }
                )
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn screening_rows(report: &ScreeningReport) -> String {
        report
            .results
            .iter()
            .map(|outcome| {
                let recommendation = match &outcome.error {
                    Some(error) => format!("ERROR: {}", escape_html(error)),
                    None => outcome.recommendation_label(),
                };
                format!(
                    concat!(
                        "<tr><td>{}</td><td>{}</td><td>{:.2}%</td>",
                        "<td class=\"{}\">{}</td><td>{}</td><td>{}</td></tr>"
                    ),
                    escape_html(&outcome.file_name),
                    escape_html(&outcome.candidate_name),
                    outcome.match_score,
                    Self::decision_class(outcome.recommendation),
                    recommendation,
                    escape_html(&join_or_none(&outcome.matched_skills)),
                    escape_html(&join_or_none(&outcome.missing_skills))
                )
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl OutputFormatter for HtmlFormatter {
    fn format_evaluation(&self, report: &EvaluationReport) -> Result<String> {
        let labels = &report.label_distribution;
        let template = EvaluationHtmlTemplate {
            include_styles: self.include_styles,
            styles: HTML_STYLES.to_string(),
            total_cases: report.summary.total_cases,
            accuracy: format!("{:.2}%", report.summary.accuracy),
            precision: format!("{:.2}%", report.summary.precision),
            recall: format!("{:.2}%", report.summary.recall),
            f1_score: format!("{:.2}%", report.summary.f1_score),
            true_positives: report.confusion_matrix.true_positives,
            true_negatives: report.confusion_matrix.true_negatives,
            false_positives: report.confusion_matrix.false_positives,
            false_negatives: report.confusion_matrix.false_negatives,
            label_summary: format!(
                "Hire: {} ({:.1}%) | Reject: {} ({:.1}%) | Other: {}",
                labels.hire,
                labels.hire_percent(),
                labels.reject,
                labels.reject_percent(),
                labels.unknown
            ),
            semantic_count: report.scoring_mode_counts.semantic,
            fallback_count: report.scoring_mode_counts.fallback,
            degraded_count: report.degraded_records,
            rows_html: Self::evaluation_rows(report),
            version: env!("CARGO_PKG_VERSION").to_string(),
            generated_at: report.generated_at.format("%Y-%m-%d %H:%M:%S UTC").to_string(),
            model: report.model.clone().unwrap_or_else(|| "none (keyword overlap)".to_string()),
        };

        template
            .render()
            .map_err(|e| ScreenerError::OutputFormatting(e.to_string()))
    }

    fn format_screening(&self, report: &ScreeningReport) -> Result<String> {
        let template = ScreeningHtmlTemplate {
            include_styles: self.include_styles,
            styles: HTML_STYLES.to_string(),
            job_id: report.job_id,
            total_processed: report.total_processed,
            error_count: report.error_count(),
            job_description: report.job_description.clone(),
            rows_html: Self::screening_rows(report),
            version: env!("CARGO_PKG_VERSION").to_string(),
            screened_at: report.screened_at.format("%Y-%m-%d %H:%M:%S UTC").to_string(),
        };

        template
            .render()
            .map_err(|e| ScreenerError::OutputFormatting(e.to_string()))
    }
}

impl ReportGenerator {
    pub fn new() -> Self {
        Self {
            console_formatter: ConsoleFormatter::new(true, false),
            json_formatter: JsonFormatter::new(true),
            markdown_formatter: MarkdownFormatter::new(true),
            html_formatter: HtmlFormatter::new(true),
        }
    }

    pub fn with_options(use_colors: bool, detailed: bool, pretty_json: bool) -> Self {
        Self {
            console_formatter: ConsoleFormatter::new(use_colors, detailed),
            json_formatter: JsonFormatter::new(pretty_json),
            markdown_formatter: MarkdownFormatter::new(true),
            html_formatter: HtmlFormatter::new(true),
        }
    }

    fn formatter(&self, format: OutputFormat) -> &dyn OutputFormatter {
        match format {
            OutputFormat::Console => &self.console_formatter,
            OutputFormat::Json => &self.json_formatter,
            OutputFormat::Markdown => &self.markdown_formatter,
            OutputFormat::Html => &self.html_formatter,
        }
    }

    pub fn generate_evaluation(
        &self,
        report: &EvaluationReport,
        format: OutputFormat,
    ) -> Result<String> {
        self.formatter(format).format_evaluation(report)
    }

    pub fn generate_screening(
        &self,
        report: &ScreeningReport,
        format: OutputFormat,
    ) -> Result<String> {
        self.formatter(format).format_screening(report)
    }
}

impl Default for ReportGenerator {
    fn default() -> Self {
        Self::new()
    }
}

pub fn save_report_to_file(content: &str, file_path: &Path) -> Result<()> {
    use std::fs;
    if let Some(parent) = file_path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(file_path, content)?;
    Ok(())
}

pub fn suggest_filename(format: OutputFormat, base_name: &str, timestamp: bool) -> String {
    let stem = Path::new(base_name)
        .file_stem()
        .unwrap_or_default()
        .to_string_lossy();

    let timestamp_suffix = if timestamp {
        format!("_{}", chrono::Utc::now().format("%Y%m%d_%H%M%S"))
    } else {
        String::new()
    };

    let extension = match format {
        OutputFormat::Console => "txt",
        OutputFormat::Json => "json",
        OutputFormat::Markdown => "md",
        OutputFormat::Html => "html",
    };

    format!("{}_report{}.{}", stem, timestamp_suffix, extension)
}

/// Where `--save` writes: the path itself, or a generated timestamped file
/// inside it when it is an existing directory.
pub fn resolve_save_path(save: &Path, format: OutputFormat, base_name: &Path) -> PathBuf {
    if save.is_dir() {
        save.join(suggest_filename(format, &base_name.to_string_lossy(), true))
    } else {
        save.to_path_buf()
    }
}
