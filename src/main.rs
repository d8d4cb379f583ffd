//! bejerman-rec main entry point

use anyhow::{bail, Context};
use bejerman_config::Config;
use bejerman_core::{
    record_rows, summary, CompanySummary, ConsolidatedSet, Consolidator, CoreError, ErrorDetails,
    ErrorSeverity, FileReport, SourceDocument,
};
use bejerman_parser::TextEncoding;
use bejerman_utils::format_amount;
use clap::Parser;
use serde::Serialize;
use std::path::{Path, PathBuf};
use tokio::runtime::Runtime;

#[derive(Parser, Debug)]
#[command(name = "bejerman-rec")]
#[command(version = "0.1.0")]
#[command(about = "Consolidate Bejerman .rec exports into a two-sheet workbook", long_about = None)]
struct Args {
    /// .rec files or glob patterns (at most 3 are processed)
    #[arg(required = true)]
    files: Vec<String>,

    /// Configuration file path
    #[arg(short, long, default_value = "bejerman.yaml")]
    config: PathBuf,

    /// Text encoding of the input files (latin-1, utf-8, utf-16)
    #[arg(short, long)]
    encoding: Option<TextEncoding>,

    /// Directory for the exported workbook
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Consolidated rows to print
    #[arg(long, default_value_t = 100)]
    preview: usize,

    /// Print reports as JSON
    #[arg(long)]
    json: bool,

    /// Do not write the workbook
    #[arg(long)]
    no_export: bool,
}

#[derive(Serialize)]
struct JsonReport<'a> {
    files: &'a [FileReport],
    stats: &'a bejerman_core::ConsolidationStats,
    records: Vec<bejerman_core::RecordRow<'a>>,
    summary: &'a [CompanySummary],
    output_file: &'a str,
}

/// JSON output of a run that stopped before producing a table
#[derive(Serialize)]
struct JsonFailure<'a> {
    files: &'a [FileReport],
    error: ErrorDetails,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let mut config = Config::load_or_default(&args.config)
        .with_context(|| format!("Failed to load configuration from {}", args.config.display()))?;
    if let Some(encoding) = args.encoding {
        config.input.encoding = encoding;
    }
    if let Some(dir) = &args.output_dir {
        config.output.directory = dir.clone();
    }

    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(config.logging.level.as_str()),
    )
    .init();

    log::debug!(
        "Config: encoding={}, max_files={}, output={}",
        config.input.encoding,
        config.input.max_files,
        config.output.directory.display()
    );

    let rt = Runtime::new()?;
    rt.block_on(run(args, config))
}

async fn run(args: Args, config: Config) -> anyhow::Result<()> {
    let paths = limit_inputs(resolve_inputs(&args.files)?, config.input.max_files);
    let documents = read_documents(&paths, config.input.encoding).await?;

    let consolidator = Consolidator::new(config);
    let loaded = consolidator.load(&documents);
    let reports: Vec<FileReport> = loaded.iter().map(|d| d.report()).collect();

    if !args.json {
        print!("{}", render_file_reports(&reports));
    }

    let set = match consolidator.consolidate(loaded) {
        Ok(set) => set,
        Err(err) => {
            log::log!(log_level(&err), "{}", err.to_details());
            if args.json {
                println!("{}", render_json_failure(&reports, &err)?);
            }
            bail!(err);
        }
    };

    let company_summary = consolidator.summarize(&set);
    let file_name = consolidator.output_file_name(&set);

    if args.json {
        let report = JsonReport {
            files: &reports,
            stats: set.stats(),
            records: record_rows(&set).into_iter().take(args.preview).collect(),
            summary: &company_summary,
            output_file: &file_name,
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_preview(&set, args.preview);
        print_stats(&set);
        print_summary(&company_summary);
    }

    if args.no_export {
        return Ok(());
    }

    let bytes = consolidator.export(&set, &company_summary).map_err(|err| {
        log::log!(log_level(&err), "{}", err.to_details());
        err
    })?;
    let out_dir = &consolidator.config().output.directory;
    tokio::fs::create_dir_all(out_dir)
        .await
        .with_context(|| format!("Failed to create {}", out_dir.display()))?;
    let out_path = out_dir.join(&file_name);
    tokio::fs::write(&out_path, bytes)
        .await
        .with_context(|| format!("Failed to write {}", out_path.display()))?;

    log::info!("Workbook written to {}", out_path.display());
    if !args.json {
        println!("\nWorkbook: {}", out_path.display());
    }
    Ok(())
}

fn log_level(err: &CoreError) -> log::Level {
    match err.severity() {
        ErrorSeverity::Warning => log::Level::Warn,
        ErrorSeverity::Error => log::Level::Error,
    }
}

fn render_json_failure(reports: &[FileReport], err: &CoreError) -> serde_json::Result<String> {
    serde_json::to_string_pretty(&JsonFailure {
        files: reports,
        error: err.to_details(),
    })
}

/// Keep the first `max_files` inputs so ignored files are never read
fn limit_inputs(mut paths: Vec<PathBuf>, max_files: usize) -> Vec<PathBuf> {
    if paths.len() > max_files {
        log::warn!(
            "{} files supplied, only the first {} will be processed",
            paths.len(),
            max_files
        );
        paths.truncate(max_files);
    }
    paths
}

/// Expand glob patterns, keeping literal paths that match nothing so the
/// read step reports them
fn resolve_inputs(patterns: &[String]) -> anyhow::Result<Vec<PathBuf>> {
    let mut paths = Vec::new();
    for pattern in patterns {
        let mut matched: Vec<PathBuf> = glob::glob(pattern)
            .with_context(|| format!("Invalid file pattern: {}", pattern))?
            .flatten()
            .filter(|p| p.is_file())
            .collect();
        matched.sort();

        if matched.is_empty() {
            paths.push(PathBuf::from(pattern));
        } else {
            paths.extend(matched);
        }
    }
    Ok(paths)
}

async fn read_documents(paths: &[PathBuf], encoding: TextEncoding) -> anyhow::Result<Vec<SourceDocument>> {
    let mut documents = Vec::with_capacity(paths.len());
    for path in paths {
        let bytes = tokio::fs::read(path)
            .await
            .with_context(|| format!("Failed to read {}", path.display()))?;
        documents.push(SourceDocument::new(display_name(path), bytes, encoding));
    }
    Ok(documents)
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string())
}

fn render_file_reports(reports: &[FileReport]) -> String {
    let mut out = String::from("Result per file\n");
    for report in reports {
        out.push_str(&format!("  {:<40} {:>8} records\n", report.file, report.records));
    }
    out
}

fn print_preview(set: &ConsolidatedSet, limit: usize) {
    if limit == 0 {
        return;
    }
    println!("\nConsolidated preview ({} of {})", limit.min(set.len()), set.len());
    for row in record_rows(set).into_iter().take(limit) {
        let date = row
            .date
            .map(|d| d.format("%d/%m/%Y").to_string())
            .unwrap_or_default();
        println!(
            "  {:<10} {:<14} {:<24} {:<30} {:>16} {:>16} {:>16}",
            date,
            row.account,
            truncate(row.company, 24),
            truncate(row.description, 30),
            format_amount(row.credit),
            format_amount(row.debit),
            format_amount(row.movement),
        );
    }
}

fn print_stats(set: &ConsolidatedSet) {
    let stats = set.stats();
    println!("\nFiles processed: {}", stats.documents);
    println!("Total records:   {}", stats.records);
    println!("Unique accounts: {}", stats.unique_accounts);
    println!("Duplicates:      {}", stats.duplicates_dropped);
}

fn print_summary(rows: &[CompanySummary]) {
    println!("\nSummary by company");
    for row in rows.iter().chain(std::iter::once(&summary::total(rows))) {
        println!(
            "  {:<40} {:>16} {:>16} {:>16}",
            truncate(&row.company, 40),
            format_amount(row.credit),
            format_amount(row.debit),
            format_amount(row.movement),
        );
    }
}

fn truncate(text: &str, max: usize) -> String {
    text.chars().take(max).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn empty_report(file: &str) -> FileReport {
        FileReport {
            file: file.to_string(),
            records: 0,
        }
    }

    #[test]
    fn test_json_failure_keeps_file_reports() {
        let reports = vec![empty_report("vacio.rec")];
        let err = CoreError::NoValidRecords { documents: 1 };

        let json: serde_json::Value =
            serde_json::from_str(&render_json_failure(&reports, &err).unwrap()).unwrap();
        assert_eq!(json["files"][0]["file"], "vacio.rec");
        assert_eq!(json["files"][0]["records"], 0);
        assert_eq!(json["error"]["code"], "NO_VALID_RECORDS");
    }

    #[test]
    fn test_text_report_lists_zero_counts() {
        let text = render_file_reports(&[empty_report("vacio.rec")]);
        assert!(text.starts_with("Result per file"));
        assert!(text.contains("vacio.rec"));
        assert!(text.contains("0 records"));
    }

    #[test]
    fn test_limit_inputs_drops_extra_paths() {
        let paths: Vec<PathBuf> = ["a.rec", "b.rec", "c.rec", "missing.rec"]
            .iter()
            .map(PathBuf::from)
            .collect();
        let kept = limit_inputs(paths, 3);
        assert_eq!(kept, vec![PathBuf::from("a.rec"), PathBuf::from("b.rec"), PathBuf::from("c.rec")]);
        assert_eq!(limit_inputs(vec![PathBuf::from("a.rec")], 3).len(), 1);
    }

    #[test]
    fn test_log_level_follows_severity() {
        assert_eq!(log_level(&CoreError::NoValidRecords { documents: 2 }), log::Level::Warn);
        let export = CoreError::ExportError {
            message: "bad sheet".to_string(),
        };
        assert_eq!(log_level(&export), log::Level::Error);
    }
}
