//! The record store: CRUD over students, faculty, subjects and the timetable, plus the
//! attendance log.
//!
//! [`SqliteStore`] persists to SQLite through diesel. [`MemoryStore`] keeps the same tables in
//! memory and is what most tests run against.

mod memory;
mod sqlite;

pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

use crate::error::StoreResult;
use crate::models::{
    Attendance, Day, Faculty, FacultyChanges, NewAttendance, NewFaculty, NewStudent, NewSubject,
    NewTimetableEntry, Student, StudentChanges, Subject, SubjectChanges, TimetableChanges,
    TimetableEntry,
};
use chrono::NaiveDate;

/// Persistence for the college tables.
///
/// Listings come back sorted: students, faculty and subjects by name, timetable entries by day
/// and then time slot, attendance by date, then subject id, then student id. Lookups of a missing
/// id return `None`, and updates and deletes of a missing id return `None` and `false`
/// respectively without touching the store.
pub trait RecordStore {
    fn students(&mut self, filter: &StudentFilter) -> StoreResult<Vec<Student>>;
    fn student(&mut self, id: &str) -> StoreResult<Option<Student>>;
    fn add_student(&mut self, student: NewStudent) -> StoreResult<Student>;
    fn update_student(
        &mut self,
        id: &str,
        changes: &StudentChanges,
    ) -> StoreResult<Option<Student>>;
    fn delete_student(&mut self, id: &str) -> StoreResult<bool>;

    fn faculty(&mut self, filter: &FacultyFilter) -> StoreResult<Vec<Faculty>>;
    fn faculty_member(&mut self, id: &str) -> StoreResult<Option<Faculty>>;
    fn add_faculty(&mut self, member: NewFaculty) -> StoreResult<Faculty>;
    fn update_faculty(
        &mut self,
        id: &str,
        changes: &FacultyChanges,
    ) -> StoreResult<Option<Faculty>>;
    fn delete_faculty(&mut self, id: &str) -> StoreResult<bool>;

    fn subjects(&mut self, filter: &SubjectFilter) -> StoreResult<Vec<Subject>>;
    fn subject(&mut self, id: &str) -> StoreResult<Option<Subject>>;
    fn add_subject(&mut self, subject: NewSubject) -> StoreResult<Subject>;
    fn update_subject(
        &mut self,
        id: &str,
        changes: &SubjectChanges,
    ) -> StoreResult<Option<Subject>>;
    fn delete_subject(&mut self, id: &str) -> StoreResult<bool>;

    fn timetable(&mut self, filter: &TimetableFilter) -> StoreResult<Vec<TimetableEntry>>;
    fn timetable_entry(&mut self, id: &str) -> StoreResult<Option<TimetableEntry>>;
    fn add_timetable_entry(&mut self, entry: NewTimetableEntry) -> StoreResult<TimetableEntry>;
    fn update_timetable_entry(
        &mut self,
        id: &str,
        changes: &TimetableChanges,
    ) -> StoreResult<Option<TimetableEntry>>;
    fn delete_timetable_entry(&mut self, id: &str) -> StoreResult<bool>;

    fn attendance(&mut self, filter: &AttendanceFilter) -> StoreResult<Vec<Attendance>>;

    /// Inserts the event, or overwrites the status and marker of the event that already has the
    /// same `(student_id, subject_id, date)`. The existing identity is kept on overwrite.
    fn upsert_attendance(&mut self, event: NewAttendance) -> StoreResult<Attendance>;
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StudentFilter {
    pub department: Option<String>,
    pub year: Option<i32>,
}

impl StudentFilter {
    pub fn department(mut self, department: impl Into<String>) -> Self {
        self.department = Some(department.into());
        self
    }

    pub fn year(mut self, year: i32) -> Self {
        self.year = Some(year);
        self
    }

    pub fn matches(&self, student: &Student) -> bool {
        self.department
            .as_ref()
            .is_none_or(|department| &student.department == department)
            && self.year.is_none_or(|year| student.year == year)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FacultyFilter {
    pub department: Option<String>,
}

impl FacultyFilter {
    pub fn department(mut self, department: impl Into<String>) -> Self {
        self.department = Some(department.into());
        self
    }

    pub fn matches(&self, member: &Faculty) -> bool {
        self.department
            .as_ref()
            .is_none_or(|department| &member.department == department)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubjectFilter {
    pub department: Option<String>,
    pub faculty_id: Option<String>,
}

impl SubjectFilter {
    pub fn department(mut self, department: impl Into<String>) -> Self {
        self.department = Some(department.into());
        self
    }

    pub fn faculty(mut self, faculty_id: impl Into<String>) -> Self {
        self.faculty_id = Some(faculty_id.into());
        self
    }

    pub fn matches(&self, subject: &Subject) -> bool {
        self.department
            .as_ref()
            .is_none_or(|department| &subject.department == department)
            && self
                .faculty_id
                .as_ref()
                .is_none_or(|faculty_id| &subject.faculty_id == faculty_id)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TimetableFilter {
    pub department: Option<String>,
    pub year: Option<i32>,
    pub day: Option<Day>,
}

impl TimetableFilter {
    pub fn department(mut self, department: impl Into<String>) -> Self {
        self.department = Some(department.into());
        self
    }

    pub fn year(mut self, year: i32) -> Self {
        self.year = Some(year);
        self
    }

    pub fn day(mut self, day: Day) -> Self {
        self.day = Some(day);
        self
    }

    pub fn matches(&self, entry: &TimetableEntry) -> bool {
        self.department
            .as_ref()
            .is_none_or(|department| &entry.department == department)
            && self.year.is_none_or(|year| entry.year == year)
            && self.day.is_none_or(|day| entry.day == day)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AttendanceFilter {
    pub student_id: Option<String>,
    pub subject_id: Option<String>,
    pub date: Option<NaiveDate>,
}

impl AttendanceFilter {
    pub fn student(mut self, student_id: impl Into<String>) -> Self {
        self.student_id = Some(student_id.into());
        self
    }

    pub fn subject(mut self, subject_id: impl Into<String>) -> Self {
        self.subject_id = Some(subject_id.into());
        self
    }

    pub fn date(mut self, date: NaiveDate) -> Self {
        self.date = Some(date);
        self
    }

    pub fn matches(&self, event: &Attendance) -> bool {
        self.student_id
            .as_ref()
            .is_none_or(|student_id| &event.student_id == student_id)
            && self
                .subject_id
                .as_ref()
                .is_none_or(|subject_id| &event.subject_id == subject_id)
            && self.date.is_none_or(|date| event.date == date)
    }
}

/// Orders timetable entries the way every store returns them.
pub(crate) fn sort_timetable(entries: &mut [TimetableEntry]) {
    entries.sort_by(|a, b| (a.day, &a.time_slot).cmp(&(b.day, &b.time_slot)));
}
