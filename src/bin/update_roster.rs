//! Updates the roster of students.
//!
//! This binary will look at the roster CSV given on the command line and compare it, by roll
//! number, with the students currently stored in the database. It will then add / delete students
//! so that the database matches the CSV roster.

use anyhow::{Context, Result};
use clap::Parser;
use college_attendance::config::Settings;
use college_attendance::{logging, roster};
use std::path::PathBuf;

#[derive(Parser, Debug)]
struct Args {
    /// The path to the roster of students.
    roster_path: PathBuf,

    /// Configuration file to read.
    #[arg(long, default_value = "config")]
    config: String,
}

pub fn main() -> Result<()> {
    let args = Args::parse();

    let settings = Settings::load(&args.config).context("could not load settings")?;
    logging::init_tracing(env!("CARGO_CRATE_NAME"), &settings.log.level);

    let mut store = college_attendance::open_store(&settings)?;

    let new_roster = roster::load_students(&args.roster_path)?;
    let diff = roster::sync_roster(&mut store, new_roster)?;

    println!("Students dropped: {:#?}", diff.removed);
    println!("Students added: {:#?}", diff.added);

    Ok(())
}
