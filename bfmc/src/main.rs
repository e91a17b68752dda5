use std::{
    error::Error as _,
    io,
    process::ExitCode,
};

use bfm_base::{CellMode, Engine, EngineConfig, Instruction, JumpStrategy, SourceKind};
use clap::{ArgAction, Parser};
use tracing::{debug, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser)]
#[command(version, about, long_about = None, arg_required_else_help(true))]
struct Args {
    /// Program text, or source kind (`T` text, `F` file) when SOURCE follows
    #[arg(allow_hyphen_values = true)]
    first: Option<String>,

    /// Program text or file path
    #[arg(allow_hyphen_values = true)]
    source: Option<String>,

    /// Use 64-bit cells and raw code point output
    #[arg(short, long)]
    wide: bool,

    /// Match brackets by scanning instead of the jump table
    #[arg(long)]
    scan: bool,

    /// Fail after executing this many instructions
    #[arg(long, value_name = "N")]
    max_steps: Option<u64>,

    /// Print instruction table and exit
    #[arg(long)]
    instructions: bool,

    /// Log more, repeat for trace output
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| format!("bfmc={level},bfm_base={level}").into()))
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();
}

/// Splits positional arguments into identifier and source kind selector.
fn resolve_source(first: String, source: Option<String>) -> (String, String) {
    match source {
        Some(source) => (source, first),
        None => (first, SourceKind::TEXT.to_owned()),
    }
}

fn print_instructions() {
    for ins in Instruction::VARIANTS {
        println!("{}  {:<10} {}", ins.symbol(), ins.name(), ins.incode_doc().trim());
    }
}

fn main() -> ExitCode {
    let Args {
        first,
        source,
        wide,
        scan,
        max_steps,
        instructions,
        verbose,
    } = Args::parse();

    init_logging(verbose);

    if instructions {
        print_instructions();
        return ExitCode::SUCCESS;
    }

    let Some(first) = first else {
        eprintln!("Invalid args.");
        return ExitCode::FAILURE;
    };
    let (identifier, kind) = resolve_source(first, source);

    let mut config = EngineConfig::new()
        .cell_mode(if wide { CellMode::Wide } else { CellMode::Byte })
        .strategy(if scan { JumpStrategy::Scan } else { JumpStrategy::Table });
    if let Some(limit) = max_steps {
        config = config.step_limit(limit);
    }
    debug!(?config, kind = %kind, "configured");

    let outcome = execute(&identifier, &kind, config);
    print!("{}", outcome.stdout);
    if let Some(diagnostic) = &outcome.diagnostic {
        eprintln!("{diagnostic}");
    }

    outcome.exit_code()
}

/// What a run prints: stdout text and, on failure, the diagnostic line.
#[derive(Debug)]
struct Outcome {
    stdout: String,
    diagnostic: Option<String>,
}

impl Outcome {
    fn exit_code(&self) -> ExitCode {
        if self.diagnostic.is_some() {
            ExitCode::FAILURE
        } else {
            ExitCode::SUCCESS
        }
    }
}

/// Loads and runs a program. Output written before a failure is kept.
fn execute(identifier: &str, kind: &str, config: EngineConfig) -> Outcome {
    let engine = kind
        .parse::<SourceKind>()
        .and_then(|kind| Engine::from_source_with_config(identifier, kind, config));
    let mut engine = match engine {
        Ok(v) => v,
        Err(e) => {
            return Outcome {
                stdout: String::new(),
                diagnostic: Some(diagnostic(&e)),
            };
        }
    };

    match engine.run() {
        Ok(output) => {
            info!(steps = engine.stats().steps, "done");

            Outcome {
                stdout: format!("{output}\n"),
                diagnostic: None,
            }
        }
        Err(e) => {
            let partial = engine.output();
            Outcome {
                stdout: if partial.is_empty() { String::new() } else { format!("{partial}\n") },
                diagnostic: Some(diagnostic(&e)),
            }
        }
    }
}

fn diagnostic(e: &bfm_base::Error) -> String {
    let mut line = format!("error: {}: {e}", e.kind());
    if let Some(source) = e.source() {
        line.push_str(&format!(": {source}"));
    }
    line
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn one_argument_is_text() {
        let (identifier, kind) = resolve_source("+.".into(), None);
        assert_eq!((identifier.as_str(), kind.as_str()), ("+.", "T"));
    }

    #[test]
    fn two_arguments_are_kind_then_source() {
        let (identifier, kind) = resolve_source("F".into(), Some("hello.b".into()));
        assert_eq!((identifier.as_str(), kind.as_str()), ("hello.b", "F"));
    }

    #[test]
    fn parses_flags() {
        let args = Args::try_parse_from(["bfmc", "--wide", "--max-steps", "10", "-vv", "F", "prog.b"]).unwrap();
        assert!(args.wide);
        assert!(!args.scan);
        assert_eq!(args.max_steps, Some(10));
        assert_eq!(args.verbose, 2);
        assert_eq!(args.first.as_deref(), Some("F"));
        assert_eq!(args.source.as_deref(), Some("prog.b"));
    }

    #[test]
    fn program_may_start_with_hyphen() {
        let args = Args::try_parse_from(["bfmc", "-."]).unwrap();
        assert_eq!(args.first.as_deref(), Some("-."));
        assert_eq!(args.source, None);

        let args = Args::try_parse_from(["bfmc", "-[--->+<]>."]).unwrap();
        assert_eq!(args.first.as_deref(), Some("-[--->+<]>."));

        let args = Args::try_parse_from(["bfmc", "T", "-."]).unwrap();
        assert_eq!(args.first.as_deref(), Some("T"));
        assert_eq!(args.source.as_deref(), Some("-."));

        let args = Args::try_parse_from(["bfmc", "-vv", "--scan", "-."]).unwrap();
        assert_eq!(args.verbose, 2);
        assert!(args.scan);
        assert_eq!(args.first.as_deref(), Some("-."));
    }

    #[test]
    fn successful_run_prints_output() {
        let outcome = execute(&format!("{}.", "+".repeat(33)), "T", EngineConfig::default());
        assert_eq!(outcome.stdout, "!\n");
        assert_eq!(outcome.diagnostic, None);
    }

    #[test]
    fn failed_run_keeps_partial_output() {
        let outcome = execute(&format!("{}.,", "+".repeat(33)), "T", EngineConfig::default());
        assert_eq!(outcome.stdout, "!\n");
        assert_eq!(
            outcome.diagnostic.as_deref(),
            Some("error: UnimplementedInstruction: command `,` at 34 is not yet functional")
        );

        let outcome = execute(",", "T", EngineConfig::default());
        assert_eq!(outcome.stdout, "");
        assert!(outcome.diagnostic.is_some());
    }

    #[test]
    fn load_errors_are_reported() {
        let outcome = execute("+.", "X", EngineConfig::default());
        assert_eq!(outcome.stdout, "");
        assert_eq!(
            outcome.diagnostic.as_deref(),
            Some("error: InvalidSourceKind: invalid source kind `X`, expected `T` or `F`")
        );

        let outcome = execute("/nonexistent/bfmc/prog.b", "F", EngineConfig::default());
        let diagnostic = outcome.diagnostic.unwrap();
        assert!(diagnostic.starts_with("error: FileLoad: failed to load program from /nonexistent/bfmc/prog.b: "), "{diagnostic}");

        let outcome = execute("+[", "T", EngineConfig::default());
        assert_eq!(
            outcome.diagnostic.as_deref(),
            Some("error: ProgramCounterOutOfRange: invalid program pointer (2), program length is 2")
        );
    }
}
