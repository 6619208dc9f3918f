use std::{path::PathBuf, process::ExitCode, time::Instant};

use clap::Parser;
use correlation_mining::{
    discover_correlation_dfg_from_table, discovery::case_centric::correlation_mining::SolverChoice,
    CorrelationMinerError, CorrelationMinerParameters, CorrelationMinerResult, EventTable,
};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Discover a frequency and a performance directly-follows graph from a CSV event table
///
/// The result is printed as JSON on stdout. Log output goes to stderr and is controlled by
/// `CORRELATION_MINER_LOG` (default: `correlation_mining=info`).
#[derive(Debug, Parser)]
#[command(name = "correlation-miner")]
#[command(version, about, long_about = None)]
struct Cli {
    /// CSV file with one event per row (first row is the header)
    log: PathBuf,

    /// Column holding the activity label [default: concept:name]
    #[arg(long)]
    activity_key: Option<String>,

    /// Column holding the event time [default: time:timestamp]
    #[arg(long)]
    timestamp_key: Option<String>,

    /// Column holding the case identifier [default: case:concept:name]
    #[arg(long)]
    case_id_key: Option<String>,

    /// Minimal precedence probability of a candidate edge, in [0, 1) [default: 0.5]
    #[arg(long)]
    confidence_threshold: Option<f64>,

    /// Solver for the causality program (simplex or greedy) [default: simplex]
    #[arg(long)]
    solver: Option<SolverChoice>,
}

impl Cli {
    /// Apply the given flags on top of the default parameters
    fn parameters(&self) -> Result<CorrelationMinerParameters, CorrelationMinerError> {
        let mut params = CorrelationMinerParameters::default();
        if let Some(key) = &self.activity_key {
            params.activity_key = key.clone();
        }
        if let Some(key) = &self.timestamp_key {
            params.timestamp_key = key.clone();
        }
        if let Some(key) = &self.case_id_key {
            params.case_id_key = key.clone();
        }
        if let Some(threshold) = self.confidence_threshold {
            params.confidence_threshold = threshold;
        }
        if let Some(solver) = self.solver {
            params.solver = solver;
        }
        params.validate()?;
        Ok(params)
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env("CORRELATION_MINER_LOG")
        .unwrap_or_else(|_| EnvFilter::new("correlation_mining=info"));
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr).with_target(true))
        .with(filter)
        .init();
}

fn run(cli: &Cli) -> Result<CorrelationMinerResult, CorrelationMinerError> {
    let params = cli.parameters()?;
    let now = Instant::now();
    let table = EventTable::from_csv_path(&cli.log)?;
    tracing::info!(
        rows = table.rows.len(),
        elapsed = ?now.elapsed(),
        "read event table from {}",
        cli.log.display()
    );
    let result = discover_correlation_dfg_from_table(&table, &params)?;
    if result.approximate {
        tracing::warn!("edge frequencies are approximate (flow conservation not enforced)");
    }
    Ok(result)
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing();
    let json = run(&cli).and_then(|result| {
        serde_json::to_string_pretty(&result).map_err(|e| CorrelationMinerError::Io(e.into()))
    });
    match json {
        Ok(json) => {
            println!("{json}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn command_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn flags_override_defaults() {
        let cli = Cli::try_parse_from([
            "correlation-miner",
            "log.csv",
            "--activity-key",
            "Activity",
            "--confidence-threshold",
            "0.25",
            "--solver",
            "greedy",
        ])
        .unwrap();
        assert_eq!(cli.log, PathBuf::from("log.csv"));
        let params = cli.parameters().unwrap();
        assert_eq!(params.activity_key, "Activity");
        assert_eq!(params.timestamp_key, "time:timestamp");
        assert_eq!(params.confidence_threshold, 0.25);
        assert_eq!(params.solver, SolverChoice::Greedy);
    }

    #[test]
    fn invalid_arguments_are_rejected() {
        assert!(Cli::try_parse_from(["correlation-miner"]).is_err());
        assert!(Cli::try_parse_from(["correlation-miner", "log.csv", "--solver", "magic"]).is_err());

        let cli =
            Cli::try_parse_from(["correlation-miner", "log.csv", "--confidence-threshold", "1.5"])
                .unwrap();
        assert!(cli.parameters().is_err());
    }
}
