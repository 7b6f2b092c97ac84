//! Command line interface to the message validator.
//!
//! `ssb-validate2 validate` reads `{ "message": ..., "state": ..., "hmacKey": ... }` from stdin,
//! prints why the message is invalid (or `null`) and exits with 0 when it is valid and 1
//! otherwise. The other subcommands maintain and run fixture files.
use clap::{Parser, Subcommand};
use ssb_validate2::fixtures;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::{error, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(author, version, about = "Validate scuttlebutt feed messages")]
struct Args {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Validate a single message read from stdin
    Validate,
    /// Set the `id` of every fixture in a file to the id of its message
    Hash {
        /// Fixture file to rewrite
        file: PathBuf,
    },
    /// Group the fixtures in a file by validity and HMAC key
    Sort {
        /// Fixture file to rewrite
        file: PathBuf,
    },
    /// Validate every fixture in a file and report unexpected results
    Check {
        /// Fixture file to check
        file: PathBuf,
    },
}

fn main() -> ExitCode {
    // stdout is reserved for the verdict of `validate`.
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    let args = Args::parse();
    let result = match args.cmd {
        Command::Validate => return validate_stdin(),
        Command::Hash { file } => fixtures::read_fixtures(&file).and_then(|mut all| {
            fixtures::hash_fixtures(&mut all)?;
            fixtures::write_fixtures(&file, &all)
        }),
        Command::Sort { file } => fixtures::read_fixtures(&file).and_then(|mut all| {
            fixtures::sort_fixtures(&mut all);
            fixtures::write_fixtures(&file, &all)
        }),
        Command::Check { file } => return check(&file),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{}", err);
            ExitCode::FAILURE
        }
    }
}

fn validate_stdin() -> ExitCode {
    let mut input = Vec::new();
    if let Err(err) = std::io::stdin().read_to_end(&mut input) {
        error!("could not read stdin: {}", err);
        println!("{}", err);
        return ExitCode::FAILURE;
    }

    match ssb_validate2::validate_input(&input) {
        Ok(()) => {
            println!("null");
            ExitCode::SUCCESS
        }
        Err(err) => {
            if !err.is_rejection() {
                warn!("{}", err);
            }
            println!("{}", err);
            ExitCode::FAILURE
        }
    }
}

fn check(file: &Path) -> ExitCode {
    let all = match fixtures::read_fixtures(file) {
        Ok(all) => all,
        Err(err) => {
            error!("{}", err);
            return ExitCode::FAILURE;
        }
    };

    let mismatches = fixtures::check_fixtures(&all);
    for mismatch in &mismatches {
        let expected = if mismatch.expected_valid {
            "valid"
        } else {
            "invalid"
        };
        match &mismatch.error {
            Some(reason) => println!(
                "fixture {}: expected {}, rejected with: {}",
                mismatch.index, expected, reason
            ),
            None => println!("fixture {}: expected {}, accepted", mismatch.index, expected),
        }
    }
    println!("{} of {} fixtures ok", all.len() - mismatches.len(), all.len());

    if mismatches.is_empty() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}
