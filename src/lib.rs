pub mod aggregator;
pub mod cli;
pub mod config;
pub mod display;
pub mod error;
pub mod logging;
pub mod models;
pub mod roster;
pub mod schedule;
pub mod schema;
pub mod seed;
pub mod store;

use crate::config::Settings;
use crate::error::StoreResult;
use crate::store::SqliteStore;

pub use crate::aggregator::AttendanceAggregator;
pub use crate::error::StoreError;
pub use crate::store::RecordStore;

/// Opens the database named by the settings, creating its tables if needed.
pub fn open_store(settings: &Settings) -> StoreResult<SqliteStore> {
    SqliteStore::open(&settings.database.url)
}
