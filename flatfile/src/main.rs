//! nibrs-flatfile CLI - decode NIBRS flat files
//!
//! # Commands
//!
//! ```bash
//! nibrs-flatfile decode incidents.txt            # JSON lines to stdout
//! nibrs-flatfile decode incidents.txt -o out.jsonl
//! nibrs-flatfile summary incidents.txt           # Counts only
//! nibrs-flatfile check incidents.txt             # Print decode errors, exit 1 if any
//! ```
//!
//! Policies default to the `NIBRS_*` environment variables (see
//! `config`); flags override them.

use clap::{Args, Parser, Subcommand};
use nibrs_flatfile::error::ConfigResult;
use nibrs_flatfile::logs::LOG_BROADCASTER;
use nibrs_flatfile::{
    from_fn, ingest_path, DecodeError, HandoffPolicy, IngestOptions, IngestResult,
    IngestSummary, JsonLinesSink, Report, SinkFailurePolicy, SinkSet, TextEncoding,
};
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "nibrs-flatfile")]
#[command(about = "Decode NIBRS flat files into structured reports", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Decode a flat file and write one JSON object per report
    Decode {
        #[command(flatten)]
        run: RunArgs,

        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Decode a flat file and print the run summary only
    Summary {
        #[command(flatten)]
        run: RunArgs,
    },

    /// Print every decode error; exit code 1 if there are any
    Check {
        #[command(flatten)]
        run: RunArgs,
    },
}

#[derive(Args)]
struct RunArgs {
    /// Input flat file
    input: PathBuf,

    /// Name to use in error locations (default: the input path)
    #[arg(long)]
    source_name: Option<String>,

    /// Input encoding: utf-8, latin1, windows-1252 (auto-detect if not specified)
    #[arg(short, long)]
    encoding: Option<String>,

    /// Stop when a detail segment has no Group A incident to attach to
    #[arg(long)]
    strict_handoff: bool,

    /// Stop on the first sink failure
    #[arg(long)]
    fail_fast_sinks: bool,

    /// Don't echo the run log to stderr
    #[arg(short, long)]
    quiet: bool,
}

impl RunArgs {
    fn options(&self) -> IngestResult<IngestOptions> {
        self.resolve(IngestOptions::from_env())
    }

    /// Apply the command-line overrides on top of the loaded options.
    fn resolve(&self, loaded: ConfigResult<IngestOptions>) -> IngestResult<IngestOptions> {
        let mut options = loaded?;
        if let Some(ref name) = self.source_name {
            options = options.with_source_name(name.clone());
        }
        if let Some(ref label) = self.encoding {
            options = options.with_encoding(label.parse::<TextEncoding>()?);
        }
        if self.strict_handoff {
            options = options.with_handoff(HandoffPolicy::Abort);
        }
        if self.fail_fast_sinks {
            options = options.with_sink_failures(SinkFailurePolicy::FailFast);
        }
        Ok(options)
    }
}

fn main() {
    let cli = Cli::parse();

    let quiet = match &cli.command {
        Commands::Decode { run, .. } | Commands::Summary { run } | Commands::Check { run } => {
            run.quiet
        }
    };
    LOG_BROADCASTER.set_echo(!quiet);

    let result = match cli.command {
        Commands::Decode { run, output } => cmd_decode(&run, output.as_deref()),
        Commands::Summary { run } => cmd_summary(&run),
        Commands::Check { run } => cmd_check(&run),
    };

    if let Err(e) = result {
        eprintln!("❌ Error: {}", e);
        std::process::exit(1);
    }
}

fn cmd_decode(run: &RunArgs, output: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    let options = run.options()?;
    eprintln!("📄 Decoding: {}", run.input.display());

    let writer: Box<dyn Write> = match output {
        Some(path) => Box::new(BufWriter::new(File::create(path)?)),
        None => Box::new(io::stdout().lock()),
    };
    let mut json = JsonLinesSink::new(writer);

    let summary = {
        let mut sinks = SinkSet::new();
        sinks.register(&mut json);
        ingest_path(&run.input, &mut sinks, &options)?
    };

    print_totals(&summary);
    if let Some(path) = output {
        eprintln!("💾 {} reports written to: {}", json.written(), path.display());
    }
    Ok(())
}

fn cmd_summary(run: &RunArgs) -> Result<(), Box<dyn std::error::Error>> {
    let options = run.options()?;
    eprintln!("📊 Summarizing: {}", run.input.display());

    let summary = ingest_path(&run.input, &mut SinkSet::new(), &options)?;

    print_totals(&summary);
    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}

fn cmd_check(run: &RunArgs) -> Result<(), Box<dyn std::error::Error>> {
    let options = run.options()?;
    eprintln!("✔️  Checking: {}", run.input.display());

    let mut printer = from_fn("error-printer", |report: &Report, errors: &[DecodeError]| {
        if !errors.is_empty() {
            println!("{}", report.unique_description());
            for error in errors {
                println!("   - {}", error);
            }
        }
        Ok(())
    });

    let summary = {
        let mut sinks = SinkSet::new();
        sinks.register(&mut printer);
        ingest_path(&run.input, &mut sinks, &options)?
    };

    if !summary.unattributed_errors.is_empty() {
        println!("Unattributed");
        for error in &summary.unattributed_errors {
            println!("   - {}", error);
        }
    }

    print_totals(&summary);
    if summary.has_errors() {
        std::process::exit(1);
    }
    eprintln!("✅ No decode errors");
    Ok(())
}

fn print_totals(summary: &IngestSummary) {
    eprintln!("   Lines: {}", summary.lines_read);
    eprintln!(
        "   Reports: {} (zero: {}, Group A: {}, Group B: {})",
        summary.reports.total(),
        summary.reports.zero,
        summary.reports.group_a,
        summary.reports.group_b
    );
    eprintln!(
        "   Errors: {} (structural: {}, field: {}, dispatch: {}, hand-off: {})",
        summary.errors.total(),
        summary.errors.structural,
        summary.errors.field,
        summary.errors.dispatch,
        summary.errors.handoff
    );
    if !summary.sink_failures.is_empty() {
        eprintln!("   ⚠️  Sink failures: {}", summary.sink_failures.len());
    }
}
