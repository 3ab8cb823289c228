//! A student's class schedule, derived from the timetable of their department and year.

use crate::error::StoreResult;
use crate::models::{Day, Subject, TimetableEntry};
use crate::store::{RecordStore, SubjectFilter, TimetableFilter};
use std::collections::BTreeMap;

/// A timetable entry together with the subject it teaches. `subject` is `None` when the entry
/// points at a subject that no longer exists.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduledClass {
    pub entry: TimetableEntry,
    pub subject: Option<Subject>,
}

/// The classes a student has on `day`, in time-slot order. Empty for unknown students.
pub fn daily_schedule<S: RecordStore + ?Sized>(
    store: &mut S,
    student_id: &str,
    day: Day,
) -> StoreResult<Vec<ScheduledClass>> {
    let Some(student) = store.student(student_id)? else {
        return Ok(Vec::new());
    };

    let filter = TimetableFilter::default()
        .department(student.department)
        .year(student.year)
        .day(day);

    let entries = store.timetable(&filter)?;
    with_subjects(store, entries)
}

/// A student's classes for the whole week, keyed by day. Days without classes are left out.
pub fn weekly_schedule<S: RecordStore + ?Sized>(
    store: &mut S,
    student_id: &str,
) -> StoreResult<BTreeMap<Day, Vec<ScheduledClass>>> {
    let Some(student) = store.student(student_id)? else {
        return Ok(BTreeMap::new());
    };

    let filter = TimetableFilter::default()
        .department(student.department)
        .year(student.year);

    let entries = store.timetable(&filter)?;

    let mut week: BTreeMap<Day, Vec<ScheduledClass>> = BTreeMap::new();
    for class in with_subjects(store, entries)? {
        week.entry(class.entry.day).or_default().push(class);
    }
    Ok(week)
}

/// The subjects offered by a student's department. Empty for unknown students.
pub fn subjects_for_student<S: RecordStore + ?Sized>(
    store: &mut S,
    student_id: &str,
) -> StoreResult<Vec<Subject>> {
    let Some(student) = store.student(student_id)? else {
        return Ok(Vec::new());
    };

    store.subjects(&SubjectFilter::default().department(student.department))
}

fn with_subjects<S: RecordStore + ?Sized>(
    store: &mut S,
    entries: Vec<TimetableEntry>,
) -> StoreResult<Vec<ScheduledClass>> {
    entries
        .into_iter()
        .map(|entry| {
            let subject = store.subject(&entry.subject_id)?;
            Ok(ScheduledClass { entry, subject })
        })
        .collect()
}
