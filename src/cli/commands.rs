//! CLI command handlers.

use std::io::Write;
use std::path::Path;
use std::process::ExitCode;

use crate::config::VizConfig;
use crate::demos::activity::ActivitySelection;
use crate::demos::knapsack::FractionalKnapsack;
use crate::demos::prim::Prim;
use crate::demos::{generate_random_dataset, DatasetFile};
use crate::engine::{algorithm_rng, AlgorithmKind, GreedyAlgorithm, Session, SystemClock};
use crate::error::{VizError, VizResult};
use crate::renderers::{TraceFormat, TraceSink};
use crate::verification::verify_seeds;

use super::output::{format_check, format_summary};
use super::{Args, Command, CommonArgs, GenerateArgs, RunArgs, VerifyArgs};

/// Main CLI entry point.
///
/// Exit codes: 0 success, 1 verification failure or I/O error, 2 invalid
/// input.
#[must_use]
pub fn run_cli(args: Args) -> ExitCode {
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    match execute(&args.command, &mut out) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::from(1),
        Err(e) => {
            tracing::error!(error = %e, "command failed");
            eprintln!("error: {e}");
            ExitCode::from(if e.is_input_error() { 2 } else { 1 })
        }
    }
}

/// Execute `command`, writing results to `out`.
///
/// Returns whether the command succeeded.
///
/// # Errors
///
/// Returns error if configuration or dataset input is invalid, or writing
/// fails.
pub fn execute(command: &Command, out: &mut dyn Write) -> VizResult<bool> {
    match command {
        Command::Run(args) => run(args, out),
        Command::Verify(args) => verify(args, out),
        Command::Generate(args) => generate(args, out),
    }
}

/// Load the configuration file (or defaults) and apply the seed override.
///
/// # Errors
///
/// Returns error if the file cannot be read or is invalid.
pub fn load_config(common: &CommonArgs) -> VizResult<VizConfig> {
    let mut config = match &common.config {
        Some(path) => VizConfig::load(path)?,
        None => VizConfig::default(),
    };
    if let Some(seed) = common.seed {
        config.reproducibility.seed = seed;
    }
    Ok(config)
}

fn load_dataset(path: &Path, requested: Option<AlgorithmKind>) -> VizResult<DatasetFile> {
    let file = DatasetFile::load(path)?;
    if let Some(kind) = requested.filter(|k| *k != file.kind()) {
        return Err(VizError::config(format!(
            "dataset {} is for {}, not {kind}",
            path.display(),
            file.kind()
        )));
    }
    Ok(file)
}

// =============================================================================
// run
// =============================================================================

fn run(args: &RunArgs, out: &mut dyn Write) -> VizResult<bool> {
    let config = load_config(&args.common)?;
    let dataset = args
        .dataset
        .as_deref()
        .map(|path| load_dataset(path, args.algorithm))
        .transpose()?;

    match (dataset, args.algorithm) {
        (Some(DatasetFile::Activity(d)), _) => walk::<ActivitySelection>(config, Some(d), args.format, out),
        (Some(DatasetFile::Knapsack(d)), _) => walk::<FractionalKnapsack>(config, Some(d), args.format, out),
        (Some(DatasetFile::Prim(d)), _) => walk::<Prim>(config, Some(d), args.format, out),
        (None, Some(AlgorithmKind::Activity)) => walk::<ActivitySelection>(config, None, args.format, out),
        (None, Some(AlgorithmKind::Knapsack)) => walk::<FractionalKnapsack>(config, None, args.format, out),
        (None, Some(AlgorithmKind::Prim)) => walk::<Prim>(config, None, args.format, out),
        (None, None) => Err(VizError::config("run needs an algorithm or --dataset")),
    }
}

/// Walk a session from the first to the last step, printing every render.
fn walk<A: GreedyAlgorithm>(
    config: VizConfig,
    dataset: Option<A::Dataset>,
    format: TraceFormat,
    out: &mut dyn Write,
) -> VizResult<bool> {
    let seed = config.seed();
    let sink = TraceSink::new(format);
    let mut session: Session<A, TraceSink> = match dataset {
        Some(d) => Session::with_dataset(config, d, sink, SystemClock::new())?,
        None => Session::new(config, sink, SystemClock::new()),
    };

    if format == TraceFormat::Text {
        writeln!(out, "{} (seed {seed}, {} steps)", A::KIND.title(), session.steps().len())?;
    }
    while session.player_mut().next() {}
    for line in session.player_mut().sink_mut().take_lines() {
        writeln!(out, "{line}")?;
    }
    Ok(true)
}

// =============================================================================
// verify
// =============================================================================

fn verify(args: &VerifyArgs, out: &mut dyn Write) -> VizResult<bool> {
    let config = load_config(&args.common)?;
    let report = verify_seeds(config.seed(), args.seeds, &config);

    if args.json {
        writeln!(out, "{}", serde_json::to_string_pretty(&report)?)?;
    } else {
        for failure in report.failures() {
            writeln!(out, "{}", format_check(failure))?;
        }
        writeln!(out, "{}", format_summary(&report, config.seed(), args.seeds))?;
    }
    Ok(report.is_verified())
}

// =============================================================================
// generate
// =============================================================================

fn generate(args: &GenerateArgs, out: &mut dyn Write) -> VizResult<bool> {
    let config = load_config(&args.common)?;
    let mut rng = algorithm_rng(config.seed(), args.algorithm);
    let file = generate_random_dataset(args.algorithm, &mut rng, &config.datasets);
    tracing::info!(algorithm = %args.algorithm, seed = config.seed(), "generated dataset");
    write!(out, "{}", file.to_yaml()?)?;
    Ok(true)
}
