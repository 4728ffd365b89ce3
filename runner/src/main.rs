use std::fs;
use std::io::{self, Read};

use anyhow::{anyhow, bail, Context, Result};
use clap::{Parser, ValueEnum};
use serde_json::Value;
use tracing_subscriber::EnvFilter;

use scheduler::{AlgorithmConfig, ProcessSpec, SimulationRequest};

mod format;
use format::format_table;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// JSON simulation request, `-` reads standard input
    #[arg(short, long, default_value = "-")]
    input: String,

    /// Scheduling algorithm; when set, the input only needs a `processes` list
    #[arg(short, long, value_enum)]
    algorithm: Option<Algorithm>,

    /// Round robin quantum
    #[arg(long)]
    quantum: Option<i64>,

    /// Number of MLFQ queues, defaults to the number of quantums
    #[arg(long)]
    queues: Option<i64>,

    /// MLFQ quantum of every queue, highest priority first
    #[arg(long, value_delimiter = ',')]
    quantums: Vec<i64>,

    /// Ticks between two MLFQ priority boosts
    #[arg(long)]
    allotment: Option<i64>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = Format::Json)]
    format: Format,

    /// Indent JSON output
    #[arg(long, default_value = "false")]
    pretty: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Algorithm {
    Fcfs,
    Sjf,
    Rr,
    Stcf,
    Mlfq,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Format {
    Json,
    Table,
}

impl Args {
    fn algorithm_config(&self, algorithm: Algorithm) -> AlgorithmConfig {
        match algorithm {
            Algorithm::Fcfs => AlgorithmConfig::Fcfs,
            Algorithm::Sjf => AlgorithmConfig::Sjf,
            Algorithm::Rr => AlgorithmConfig::Rr {
                quantum: self.quantum,
            },
            Algorithm::Stcf => AlgorithmConfig::Stcf,
            Algorithm::Mlfq => AlgorithmConfig::Mlfq {
                queues: self.queues.unwrap_or(self.quantums.len() as i64),
                quantums: self.quantums.clone(),
                allotment: self.allotment,
            },
        }
    }

    /// Builds the request from the input document and the command line
    fn load_request(&self, raw: &str) -> Result<SimulationRequest> {
        let document: Value = serde_json::from_str(raw).context("input is not valid JSON")?;

        let Some(algorithm) = self.algorithm else {
            return serde_json::from_value(document)
                .context("input is not a simulation request, pass --algorithm to supply one");
        };

        let processes = match document {
            Value::Array(_) => document,
            Value::Object(mut fields) => fields
                .remove("processes")
                .ok_or_else(|| anyhow!("input has no `processes` list"))?,
            _ => bail!("input must be a process list or an object with `processes`"),
        };
        let processes: Vec<ProcessSpec> =
            serde_json::from_value(processes).context("malformed process list")?;

        Ok(SimulationRequest {
            processes,
            algorithm: self.algorithm_config(algorithm),
        })
    }
}

fn read_input(path: &str) -> Result<String> {
    if path == "-" {
        let mut raw = String::new();
        io::stdin()
            .read_to_string(&mut raw)
            .context("failed to read standard input")?;
        return Ok(raw);
    }

    fs::read_to_string(path).with_context(|| format!("failed to read {path}"))
}

fn init_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

fn main() -> Result<()> {
    init_logging();
    let args = Args::parse();

    let raw = read_input(&args.input)?;
    let request = args.load_request(&raw)?;
    tracing::debug!(
        algorithm = request.algorithm.name(),
        processes = request.processes.len(),
        "loaded request"
    );

    let result = scheduler::run(&request).context("simulation rejected")?;

    match args.format {
        Format::Table => print!("{}", format_table(&result)),
        Format::Json if args.pretty => println!("{}", serde_json::to_string_pretty(&result)?),
        Format::Json => println!("{}", serde_json::to_string(&result)?),
    }

    Ok(())
}

#[cfg(test)]
mod tests;
