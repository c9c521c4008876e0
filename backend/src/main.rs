//! Claims report CLI
//!
//! # Main Command
//!
//! ```bash
//! claimsreport report                     # Read Insurance_auto_data.csv, print report, ask to save
//! claimsreport report claims.csv --save   # Save without asking
//! claimsreport report claims.csv --json   # JSON summary instead of the table
//! ```
//!
//! # Debug Commands
//!
//! ```bash
//! claimsreport parse claims.csv           # Raw rows as JSON
//! claimsreport clean claims.csv           # Cleaned and classified rows as JSON
//! claimsreport classify "policy expired"  # Class of one remark
//! ```
//!
//! `CLAIMS_INPUT` and `CLAIMS_OUTPUT` (also read from `.env`) override the
//! default file names.

use clap::{Parser, Subcommand};
use claimsreport::logs::{log_success, log_warning, set_log_format, LogFormat};
use claimsreport::{
    classify_rejection, parse_file, render_report, run_report, CsvFileSink, ReportOptions,
    ReportSink, ReportSummary, SaveMode,
};
use std::fs;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "claimsreport")]
#[command(about = "City-level rejection report for insurance claims exports", long_about = None)]
struct Cli {
    /// Silence progress logs
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Write progress logs as JSON lines
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the full report
    Report {
        /// Claims CSV file (default: $CLAIMS_INPUT or Insurance_auto_data.csv)
        input: Option<PathBuf>,

        /// Cleaned output file (default: $CLAIMS_OUTPUT or Cleaned_Insurance_Data.csv)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Save cleaned records without asking
        #[arg(long, conflicts_with = "no_save")]
        save: bool,

        /// Never save cleaned records
        #[arg(long)]
        no_save: bool,

        /// Print a JSON summary instead of the table
        #[arg(long)]
        json: bool,
    },

    /// Parse a CSV file and output raw rows as JSON
    Parse {
        /// Input CSV file
        input: PathBuf,

        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Clean and classify a CSV file and output the rows as JSON
    Clean {
        /// Input CSV file
        input: PathBuf,

        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Show the rejection class of a remark
    Classify {
        remark: String,
    },
}

fn main() {
    // Load .env file (if present)
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    if cli.quiet {
        set_log_format(LogFormat::Off);
    } else if cli.json_logs {
        set_log_format(LogFormat::Json);
    }

    let result = match cli.command {
        Commands::Report {
            input,
            output,
            save,
            no_save,
            json,
        } => {
            let env_options = ReportOptions::from_env();
            let options = ReportOptions {
                input: input.unwrap_or(env_options.input),
                output: output.unwrap_or(env_options.output),
                save: match (save, no_save) {
                    (true, _) => SaveMode::Always,
                    (_, true) => SaveMode::Never,
                    _ => SaveMode::Prompt,
                },
            };
            cmd_report(&options, json)
        }

        Commands::Parse { input, output } => cmd_parse(&input, output.as_deref()),

        Commands::Clean { input, output } => cmd_clean(&input, output.as_deref()),

        Commands::Classify { remark } => {
            println!("{}", classify_rejection(Some(&remark)));
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("❌ Error: {}", e);
        std::process::exit(1);
    }
}

fn cmd_report(options: &ReportOptions, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let report = run_report(&options.input)?;

    if json {
        let summary = ReportSummary::from(&report);
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        println!("\n{}", render_report(&report));
    }

    let save = match options.save {
        SaveMode::Always => true,
        SaveMode::Never => false,
        SaveMode::Prompt => ask_save()?,
    };

    let mut sink = CsvFileSink::new(&options.output);
    match sink.accept(&report.records, save) {
        Ok(Some(path)) => log_success(format!("Saved as {}", path.display())),
        Ok(None) => {}
        Err(claimsreport::SinkError::NoRecords) => log_warning("No records to save"),
        Err(e) => return Err(e.into()),
    }

    Ok(())
}

/// Only an answer of `y` (any case) saves.
fn ask_save() -> Result<bool, Box<dyn std::error::Error>> {
    print!("\nSave cleaned file? (y/n): ");
    io::stdout().flush()?;

    let mut answer = String::new();
    io::stdin().lock().read_line(&mut answer)?;
    Ok(answer.trim_end_matches(['\r', '\n']).to_lowercase() == "y")
}

fn cmd_parse(input: &Path, output: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    eprintln!("📄 Parsing CSV: {}", input.display());

    let result = parse_file(input)?;
    eprintln!("   Encoding: {}", result.encoding);
    eprintln!("   Columns: {}", result.headers.join(", "));
    eprintln!("✅ Parsed {} records ({} dropped)", result.records.len(), result.dropped.len());

    let rows: Vec<_> = result.records.iter().map(|r| r.to_json()).collect();
    let json = serde_json::to_string_pretty(&rows)?;
    write_output(&json, output)?;

    Ok(())
}

fn cmd_clean(input: &Path, output: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    let report = run_report(input)?;

    let rows: Vec<_> = report.records.iter().map(|r| r.to_json()).collect();
    let json = serde_json::to_string_pretty(&rows)?;
    write_output(&json, output)?;

    Ok(())
}

fn write_output(content: &str, path: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    match path {
        Some(p) => {
            fs::write(p, content)?;
            eprintln!("💾 Output written to: {}", p.display());
        }
        None => {
            println!("{}", content);
        }
    }
    Ok(())
}
