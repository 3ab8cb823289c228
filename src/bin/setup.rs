//! Creates the database tables and, if the database has no students yet, fills it with the
//! sample college.

use anyhow::{Context, Result};
use college_attendance::config::Settings;
use college_attendance::store::StudentFilter;
use college_attendance::{RecordStore, logging, seed};
use tracing::warn;

pub fn main() -> Result<()> {
    let settings = Settings::load("config").context("could not load settings")?;
    logging::init_tracing(env!("CARGO_CRATE_NAME"), &settings.log.level);

    let mut store = college_attendance::open_store(&settings)?;

    // Seeding twice would duplicate the college.
    if !store.students(&StudentFilter::default())?.is_empty() {
        warn!(database = %settings.database.url, "database already has students, not seeding");
        return Ok(());
    }

    let counts = seed::seed(&mut store)?;
    println!("{counts:#?}");

    Ok(())
}
