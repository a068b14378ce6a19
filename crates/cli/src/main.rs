//! CLI for inspecting argument equality comparer registries.
//!
//! Builds the demo registry, then either reports which comparer each type
//! resolves to or runs the canonical matching scenarios against it.

mod demo;

use clap::{Parser, Subcommand, ValueEnum};
use equate_matcher::reporter::RegistryReport;
use equate_matcher::sink::json_stream::JsonStreamSink;
use equate_matcher::{ArgumentMatcher, MatcherConfig, TieBreak};
use equate_registry::ComparerRegistry;

#[derive(Parser, Debug)]
#[command(name = "equate", version, about = "Argument equality comparer inspector")]
struct Cli {
    /// Rule for comparers sharing the highest priority.
    #[arg(
        long,
        global = true,
        value_enum,
        env = "EQUATE_TIE_BREAK",
        default_value_t = TieBreakArg::First
    )]
    tie_break: TieBreakArg,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Show which comparer each registered type resolves to.
    Report {
        #[arg(long, default_value_t = false)]
        json: bool,

        /// Sink output: "ndjson" writes NDJSON to stdout,
        /// "ndjson:/path/to/file" writes to file.
        #[arg(long)]
        sink: Option<String>,
    },
    /// Run the canonical matching scenarios against the demo registry.
    Scenarios {
        #[arg(long, default_value_t = false)]
        json: bool,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum TieBreakArg {
    First,
    Last,
}

impl From<TieBreakArg> for TieBreak {
    fn from(arg: TieBreakArg) -> Self {
        match arg {
            TieBreakArg::First => TieBreak::FirstRegistered,
            TieBreakArg::Last => TieBreak::LastRegistered,
        }
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let config = MatcherConfig {
        tie_break: cli.tie_break.into(),
    };

    let registry = ComparerRegistry::builder()
        .plugin(&demo::DemoComparers)
        .build_shared();
    let matcher = ArgumentMatcher::with_config(registry, config);

    tracing::info!(tie_break = ?config.tie_break, "matcher ready");

    match cli.command {
        Commands::Report { json, sink } => {
            let report = RegistryReport::build(matcher.registry(), matcher.resolver());

            if let Some(ref sink_spec) = sink {
                let rows = report.to_rows();

                if sink_spec == "ndjson" {
                    let mut s = JsonStreamSink::stdout();
                    s.write_rows(&rows)?;
                    let n = s.finish()?;
                    tracing::info!(rows = n, "ndjson sink: wrote to stdout");
                } else if let Some(path) = sink_spec.strip_prefix("ndjson:") {
                    let file = std::fs::File::create(path)?;
                    let mut s = JsonStreamSink::new(file);
                    s.write_rows(&rows)?;
                    let n = s.finish()?;
                    tracing::info!(rows = n, path, "ndjson sink: wrote to file");
                } else {
                    eprintln!(
                        "Unknown sink: {}. Use 'ndjson' or 'ndjson:/path'",
                        sink_spec
                    );
                }

                // Still print report to stderr so it's visible.
                eprint!("{}", report.render());
            } else if json {
                println!("{}", serde_json::to_string_pretty(&report.to_rows())?);
            } else {
                print!("{}", report.render());
            }
        }
        Commands::Scenarios { json } => {
            let outcomes = demo::run_scenarios(&matcher);
            let failed = outcomes.iter().filter(|o| !o.passed).count();

            if json {
                let mut s = JsonStreamSink::stdout();
                s.write_rows(&outcomes)?;
                s.finish()?;
            } else {
                for o in &outcomes {
                    let status = if o.passed { "PASS" } else { "FAIL" };
                    println!("{status}  {:<18} {}", o.scenario, o.detail);
                }
            }

            tracing::info!(total = outcomes.len(), failed, "scenarios complete");
            if failed > 0 {
                std::process::exit(1);
            }
        }
    }

    Ok(())
}
