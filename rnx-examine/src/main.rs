//! Command line tool to examine `RINEX` observation files.
//! Refer to README for command line arguments.

mod cli;
mod render;

use cli::Cli;
use render::render;

use rinex_examiner::prelude::{Capability, Error as ExaminerError, Examiner};

use env_logger::{Builder, Target};

#[macro_use]
extern crate log;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("{0}")]
    Examiner(#[from] ExaminerError),
    #[error("json serialization error")]
    Json(#[from] serde_json::Error),
    #[error("report formatting error")]
    Formatting(#[from] std::fmt::Error),
}

fn print_codecs(cli: &Cli) {
    for (compression, capability) in cli.codecs().status() {
        match capability {
            Capability::Available(_) => println!("{:<18} available", compression),
            Capability::Unavailable(remedy) => {
                println!("{:<18} unavailable: {}", compression, remedy)
            },
        }
    }
}

pub fn main() -> Result<(), Error> {
    let mut builder = Builder::from_default_env();
    builder
        .target(Target::Stdout)
        .format_timestamp_secs()
        .format_module_path(false)
        .init();

    let cli = Cli::new();

    if cli.codecs_status() {
        print_codecs(&cli);
        return Ok(());
    }

    let Some(path) = cli.filepath() else {
        return Ok(());
    };

    let examiner = Examiner::default().with_codecs(cli.codecs());
    info!("examining {}", path.display());

    let report = examiner.examine_file(path)?;
    for warning in report.warnings() {
        warn!("{}", warning);
    }

    if cli.json() {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print!("{}", render(&report)?);
    }
    Ok(())
}
