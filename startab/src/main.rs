//! # startab
//!
//! A CLI tool for preparing the published data table of a dwarf-galaxy
//! membership analysis.
//!
//! ## Overview
//!
//! startab is built on top of startablib and provides a command-line
//! interface for the two data-preparation steps of the analysis: converting
//! the published fixed-width ASCII table ("Table E1") to CSV, and computing
//! robust kinematic summaries (weighted means and the Robust Scatter
//! Estimate) of catalog columns.
//!
//! ## Usage
//!
//! ```bash
//! # Convert the published table (reads data/table-e1.ascii)
//! startab > data/table-e1.csv
//!
//! # Convert an explicit table file
//! startab convert other-table.ascii > other-table.csv
//!
//! # Weighted mean and RSE of one column (zero-based indices)
//! startab moments data/table-e1.csv --x-col 5 --sx-col 6
//!
//! # Weighted mean proper motion with the full per-star covariance
//! startab moments data/table-e1.csv \
//!     --x-col 5 --sx-col 6 --y-col 7 --sy-col 8 --corr-col 9 --output json
//! ```
//!
//! Setting `TRACE=1` in the environment enables verbose execution tracing on
//! standard error; standard output stays reserved for results.

use std::io::{self, Write};
use std::process::ExitCode;

use clap::{Arg, ArgAction, ArgMatches, Command};
use serde::Serialize;
use startablib::{
    complete_cases, convert_file, read_columns_file, rse, weighted_mean_oned, weighted_mean_twod,
    ConvertOptions,
};
use tracing::trace;

/// Default input path, matching the published conversion script.
const DEFAULT_TABLE: &str = "data/table-e1.ascii";

/// Weighted-mean report for a single column.
#[derive(Debug, Serialize)]
struct OnedReport {
    samples: usize,
    mean: f64,
    sigma_mean: f64,
    rse: f64,
}

/// Weighted-mean report for a column pair with covariance.
#[derive(Debug, Serialize)]
struct TwodReport {
    samples: usize,
    mean: [f64; 2],
    cov: [[f64; 2]; 2],
    rse: [f64; 2],
}

/// Build the clap Command structure
fn build_command() -> Command {
    Command::new("startab")
        .version(env!("CARGO_PKG_VERSION"))
        .author("Anthony Brown")
        .about("Convert the published fixed-width stellar catalog table to CSV")
        .arg(
            Arg::new("path")
                .help("Table to convert (defaults to the published table path)")
                .default_value(DEFAULT_TABLE),
        )
        .subcommand(
            Command::new("convert")
                .about("Convert a fixed-width table to CSV on stdout (default command)")
                .arg(
                    Arg::new("path")
                        .help("Table to convert")
                        .default_value(DEFAULT_TABLE),
                ),
        )
        .subcommand(
            Command::new("moments")
                .about("Weighted mean and Robust Scatter Estimate of catalog columns")
                .arg(Arg::new("csv").help("Converted CSV table").required(true))
                .arg(
                    Arg::new("x-col")
                        .long("x-col")
                        .required(true)
                        .value_parser(clap::value_parser!(usize))
                        .help("Zero-based index of the measurement column"),
                )
                .arg(
                    Arg::new("sx-col")
                        .long("sx-col")
                        .required(true)
                        .value_parser(clap::value_parser!(usize))
                        .help("Zero-based index of its uncertainty column"),
                )
                .arg(
                    Arg::new("y-col")
                        .long("y-col")
                        .value_parser(clap::value_parser!(usize))
                        .help("Second measurement column (enables the 2D estimator)"),
                )
                .arg(
                    Arg::new("sy-col")
                        .long("sy-col")
                        .value_parser(clap::value_parser!(usize))
                        .help("Uncertainty column of the second measurement"),
                )
                .arg(
                    Arg::new("corr-col")
                        .long("corr-col")
                        .value_parser(clap::value_parser!(usize))
                        .help("Correlation coefficient column of the two measurements"),
                )
                .arg(
                    Arg::new("no-header")
                        .long("no-header")
                        .action(ArgAction::SetTrue)
                        .help("Treat the first CSV line as data, not column names"),
                )
                .arg(
                    Arg::new("output")
                        .short('o')
                        .long("output")
                        .value_parser(["text", "json"])
                        .default_value("text")
                        .help("Report format"),
                ),
        )
}

/// Whether verbose tracing was requested via the TRACE environment variable.
fn trace_enabled() -> bool {
    std::env::var("TRACE").as_deref() == Ok("1")
}

/// Install a stderr tracing subscriber when TRACE=1; otherwise tracing stays off.
fn init_tracing() {
    if trace_enabled() {
        tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::new("trace"))
            .with_writer(io::stderr)
            .init();
    }
}

/// Handler for the convert command (and the bare invocation)
fn convert_handler(matches: &ArgMatches) -> Result<(), anyhow::Error> {
    let path = matches
        .get_one::<String>("path")
        .map(|s| s.as_str())
        .unwrap_or(DEFAULT_TABLE);

    let options = ConvertOptions::new().with_trace(trace_enabled());
    let stdout = io::stdout();
    let mut writer = io::BufWriter::new(stdout.lock());
    let summary = convert_file(path, &mut writer, &options)?;
    writer.flush()?;

    trace!(
        lines = summary.lines,
        fields = summary.fields,
        missing = summary.missing,
        "conversion finished"
    );
    Ok(())
}

/// Handler for the moments command
fn moments_handler(matches: &ArgMatches) -> Result<(), anyhow::Error> {
    let csv = matches
        .get_one::<String>("csv")
        .expect("csv is a required argument");
    let x_col = *matches.get_one::<usize>("x-col").expect("required");
    let sx_col = *matches.get_one::<usize>("sx-col").expect("required");
    let y_col = matches.get_one::<usize>("y-col").copied();
    let sy_col = matches.get_one::<usize>("sy-col").copied();
    let corr_col = matches.get_one::<usize>("corr-col").copied();
    let skip_header = !matches.get_flag("no-header");
    let json = matches.get_one::<String>("output").map(|s| s.as_str()) == Some("json");

    let report = match (y_col, sy_col, corr_col) {
        (None, None, None) => {
            let cols = read_columns_file(csv, &[x_col, sx_col], skip_header)?;
            let complete = complete_cases(&cols);
            let (mean, sigma_mean) = weighted_mean_oned(&complete[0], &complete[1])?;
            let report = OnedReport {
                samples: complete[0].len(),
                mean,
                sigma_mean,
                rse: rse(&complete[0])?,
            };
            if json {
                serde_json::to_string_pretty(&report)?
            } else {
                format!(
                    "samples: {}\nmean:    {} \u{00b1} {}\nrse:     {}",
                    report.samples, report.mean, report.sigma_mean, report.rse
                )
            }
        }
        (Some(y), Some(sy), Some(corr)) => {
            let cols = read_columns_file(csv, &[x_col, y, sx_col, sy, corr], skip_header)?;
            let complete = complete_cases(&cols);
            let mean = weighted_mean_twod(
                &complete[0],
                &complete[1],
                &complete[2],
                &complete[3],
                &complete[4],
            )?;
            let report = TwodReport {
                samples: complete[0].len(),
                mean: [mean.x, mean.y],
                cov: mean.cov,
                rse: [rse(&complete[0])?, rse(&complete[1])?],
            };
            if json {
                serde_json::to_string_pretty(&report)?
            } else {
                format!(
                    "samples: {}\nmean x:  {}\nmean y:  {}\ncov:     [[{}, {}], [{}, {}]]\nrse x:   {}\nrse y:   {}",
                    report.samples,
                    report.mean[0],
                    report.mean[1],
                    report.cov[0][0],
                    report.cov[0][1],
                    report.cov[1][0],
                    report.cov[1][1],
                    report.rse[0],
                    report.rse[1]
                )
            }
        }
        _ => {
            return Err(anyhow::anyhow!(
                "--y-col, --sy-col and --corr-col must be given together"
            ))
        }
    };

    println!("{report}");
    Ok(())
}

fn main() -> ExitCode {
    init_tracing();

    let matches = build_command().get_matches();
    let result = match matches.subcommand() {
        Some(("convert", sub)) => convert_handler(sub),
        Some(("moments", sub)) => moments_handler(sub),
        _ => convert_handler(&matches),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}
