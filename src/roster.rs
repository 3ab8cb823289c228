//! Student rosters: importing students from CSV, syncing the stored roster against a CSV export,
//! and looking up who takes a subject.
//!
//! Roster CSVs have a header row `name,roll_no,department,year,email`.

use crate::error::StoreResult;
use crate::models::{NewStudent, Student};
use crate::store::{RecordStore, StudentFilter};
use std::collections::HashSet;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{info, warn};

#[derive(Debug, Error)]
pub enum RosterError {
    #[error("could not read roster `{}`: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
}

/// Students added and removed by [`sync_roster`].
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RosterDiff {
    pub added: Vec<Student>,
    pub removed: Vec<Student>,
}

/// Parses a roster CSV.
pub fn read_students<R: io::Read>(reader: R) -> Result<Vec<NewStudent>, csv::Error> {
    csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader)
        .deserialize::<NewStudent>()
        .collect()
}

/// Reads the roster CSV at `path`.
pub fn load_students(path: impl AsRef<Path>) -> Result<Vec<NewStudent>, RosterError> {
    let path = path.as_ref();
    let read_error = |source| RosterError::Read {
        path: path.to_path_buf(),
        source,
    };

    let file = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_path(path)
        .map_err(read_error)?;

    file.into_deserialize::<NewStudent>()
        .collect::<Result<Vec<_>, _>>()
        .map_err(read_error)
}

/// Adds every student in `roster` to the store.
pub fn import_students<S: RecordStore + ?Sized>(
    store: &mut S,
    roster: Vec<NewStudent>,
) -> StoreResult<Vec<Student>> {
    let added = roster
        .into_iter()
        .map(|student| store.add_student(student))
        .collect::<StoreResult<Vec<_>>>()?;

    info!(count = added.len(), "imported students");
    Ok(added)
}

/// Makes the stored students match `roster`, comparing by roll number: students missing from the
/// roster are deleted and roster entries not yet stored are added. Students present in both are
/// left as they are.
pub fn sync_roster<S: RecordStore + ?Sized>(
    store: &mut S,
    roster: Vec<NewStudent>,
) -> StoreResult<RosterDiff> {
    let current = store.students(&StudentFilter::default())?;
    let wanted: HashSet<&str> = roster.iter().map(|s| s.roll_no.as_str()).collect();
    let duplicates = roster.len() - wanted.len();

    let mut diff = RosterDiff::default();

    for student in &current {
        if !wanted.contains(student.roll_no.as_str()) && store.delete_student(&student.id)? {
            diff.removed.push(student.clone());
        }
    }

    // Duplicate roll numbers in the CSV collapse into their first row.
    if duplicates > 0 {
        warn!(duplicates, "roster repeats roll numbers");
    }

    let mut stored: HashSet<String> = current.into_iter().map(|s| s.roll_no).collect();
    for student in roster {
        if stored.insert(student.roll_no.clone()) {
            diff.added.push(store.add_student(student)?);
        }
    }

    info!(
        added = diff.added.len(),
        removed = diff.removed.len(),
        "synced roster"
    );
    Ok(diff)
}

/// The students a subject is taught to: everyone in the subject's department. Empty if the
/// subject does not exist.
pub fn roster_for_subject<S: RecordStore + ?Sized>(
    store: &mut S,
    subject_id: &str,
) -> StoreResult<Vec<Student>> {
    let Some(subject) = store.subject(subject_id)? else {
        return Ok(Vec::new());
    };

    store.students(&StudentFilter::default().department(subject.department))
}
