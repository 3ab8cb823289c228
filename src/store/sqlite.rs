use super::{
    AttendanceFilter, FacultyFilter, RecordStore, StudentFilter, SubjectFilter, TimetableFilter,
    sort_timetable,
};
use crate::error::{StoreError, StoreResult};
use crate::models::{
    Attendance, Faculty, FacultyChanges, NewAttendance, NewFaculty, NewStudent, NewSubject,
    NewTimetableEntry, Student, StudentChanges, Subject, SubjectChanges, TimetableChanges,
    TimetableEntry, new_id,
};
use crate::schema::{attendance, faculty, students, subjects, timetable};
use diesel::connection::SimpleConnection;
use diesel::prelude::*;
use tracing::{debug, info};

/// The table definitions, shared with the diesel CLI migration.
const SCHEMA: &str = include_str!("../../migrations/2025-10-01-000000_create_tables/up.sql");

/// A [`RecordStore`] backed by a `sqlite3` database.
pub struct SqliteStore {
    db: SqliteConnection,
}

impl SqliteStore {
    /// Connects to the `sqlite3` database at `database_url` without touching its schema.
    pub fn connect(database_url: &str) -> StoreResult<Self> {
        let db =
            SqliteConnection::establish(database_url).map_err(|source| StoreError::Connection {
                url: database_url.to_string(),
                source,
            })?;

        Ok(Self { db })
    }

    /// Connects to the database at `database_url` and creates any missing tables.
    pub fn open(database_url: &str) -> StoreResult<Self> {
        let mut store = Self::connect(database_url)?;
        store.initialize()?;
        Ok(store)
    }

    /// Opens a private, empty in-memory database.
    pub fn in_memory() -> StoreResult<Self> {
        Self::open(":memory:")
    }

    /// Creates the college tables if they do not exist yet.
    pub fn initialize(&mut self) -> StoreResult<()> {
        self.db.batch_execute(SCHEMA)?;
        debug!("schema initialized");
        Ok(())
    }
}

impl RecordStore for SqliteStore {
    fn students(&mut self, filter: &StudentFilter) -> StoreResult<Vec<Student>> {
        let mut query = students::table
            .select(Student::as_select())
            .order(students::name.asc())
            .into_boxed();

        if let Some(department) = &filter.department {
            query = query.filter(students::department.eq(department));
        }
        if let Some(year) = filter.year {
            query = query.filter(students::year.eq(year));
        }

        Ok(query.load(&mut self.db)?)
    }

    fn student(&mut self, id: &str) -> StoreResult<Option<Student>> {
        Ok(students::table
            .find(id)
            .select(Student::as_select())
            .first(&mut self.db)
            .optional()?)
    }

    fn add_student(&mut self, student: NewStudent) -> StoreResult<Student> {
        let student = student.with_id(new_id("s"));

        diesel::insert_into(students::table)
            .values(&student)
            .execute(&mut self.db)?;

        info!(id = %student.id, roll_no = %student.roll_no, "added student");
        Ok(student)
    }

    fn update_student(
        &mut self,
        id: &str,
        changes: &StudentChanges,
    ) -> StoreResult<Option<Student>> {
        // Diesel refuses to build an `UPDATE` with an empty `SET`.
        if changes.is_empty() {
            return self.student(id);
        }

        Ok(diesel::update(students::table.find(id))
            .set(changes)
            .returning(Student::as_returning())
            .get_result(&mut self.db)
            .optional()?)
    }

    fn delete_student(&mut self, id: &str) -> StoreResult<bool> {
        let deleted = diesel::delete(students::table.find(id)).execute(&mut self.db)?;

        if deleted > 0 {
            info!(id, "deleted student");
        }
        Ok(deleted > 0)
    }

    fn faculty(&mut self, filter: &FacultyFilter) -> StoreResult<Vec<Faculty>> {
        let mut query = faculty::table
            .select(Faculty::as_select())
            .order(faculty::name.asc())
            .into_boxed();

        if let Some(department) = &filter.department {
            query = query.filter(faculty::department.eq(department));
        }

        Ok(query.load(&mut self.db)?)
    }

    fn faculty_member(&mut self, id: &str) -> StoreResult<Option<Faculty>> {
        Ok(faculty::table
            .find(id)
            .select(Faculty::as_select())
            .first(&mut self.db)
            .optional()?)
    }

    fn add_faculty(&mut self, member: NewFaculty) -> StoreResult<Faculty> {
        let member = member.with_id(new_id("f"));

        diesel::insert_into(faculty::table)
            .values(&member)
            .execute(&mut self.db)?;

        info!(id = %member.id, "added faculty member");
        Ok(member)
    }

    fn update_faculty(
        &mut self,
        id: &str,
        changes: &FacultyChanges,
    ) -> StoreResult<Option<Faculty>> {
        if changes.is_empty() {
            return self.faculty_member(id);
        }

        Ok(diesel::update(faculty::table.find(id))
            .set(changes)
            .returning(Faculty::as_returning())
            .get_result(&mut self.db)
            .optional()?)
    }

    fn delete_faculty(&mut self, id: &str) -> StoreResult<bool> {
        let deleted = diesel::delete(faculty::table.find(id)).execute(&mut self.db)?;

        if deleted > 0 {
            info!(id, "deleted faculty member");
        }
        Ok(deleted > 0)
    }

    fn subjects(&mut self, filter: &SubjectFilter) -> StoreResult<Vec<Subject>> {
        let mut query = subjects::table
            .select(Subject::as_select())
            .order(subjects::name.asc())
            .into_boxed();

        if let Some(department) = &filter.department {
            query = query.filter(subjects::department.eq(department));
        }
        if let Some(faculty_id) = &filter.faculty_id {
            query = query.filter(subjects::faculty_id.eq(faculty_id));
        }

        Ok(query.load(&mut self.db)?)
    }

    fn subject(&mut self, id: &str) -> StoreResult<Option<Subject>> {
        Ok(subjects::table
            .find(id)
            .select(Subject::as_select())
            .first(&mut self.db)
            .optional()?)
    }

    fn add_subject(&mut self, subject: NewSubject) -> StoreResult<Subject> {
        let subject = subject.with_id(new_id("sub"));

        diesel::insert_into(subjects::table)
            .values(&subject)
            .execute(&mut self.db)?;

        info!(id = %subject.id, code = %subject.code, "added subject");
        Ok(subject)
    }

    fn update_subject(
        &mut self,
        id: &str,
        changes: &SubjectChanges,
    ) -> StoreResult<Option<Subject>> {
        if changes.is_empty() {
            return self.subject(id);
        }

        Ok(diesel::update(subjects::table.find(id))
            .set(changes)
            .returning(Subject::as_returning())
            .get_result(&mut self.db)
            .optional()?)
    }

    fn delete_subject(&mut self, id: &str) -> StoreResult<bool> {
        let deleted = diesel::delete(subjects::table.find(id)).execute(&mut self.db)?;

        if deleted > 0 {
            info!(id, "deleted subject");
        }
        Ok(deleted > 0)
    }

    fn timetable(&mut self, filter: &TimetableFilter) -> StoreResult<Vec<TimetableEntry>> {
        let mut query = timetable::table
            .select(TimetableEntry::as_select())
            .into_boxed();

        if let Some(department) = &filter.department {
            query = query.filter(timetable::department.eq(department));
        }
        if let Some(year) = filter.year {
            query = query.filter(timetable::year.eq(year));
        }
        if let Some(day) = filter.day {
            query = query.filter(timetable::day.eq(day));
        }

        // Days are stored by name, so the calendar order is restored here.
        let mut entries = query.load(&mut self.db)?;
        sort_timetable(&mut entries);
        Ok(entries)
    }

    fn timetable_entry(&mut self, id: &str) -> StoreResult<Option<TimetableEntry>> {
        Ok(timetable::table
            .find(id)
            .select(TimetableEntry::as_select())
            .first(&mut self.db)
            .optional()?)
    }

    fn add_timetable_entry(&mut self, entry: NewTimetableEntry) -> StoreResult<TimetableEntry> {
        let entry = entry.with_id(new_id("t"));

        diesel::insert_into(timetable::table)
            .values(&entry)
            .execute(&mut self.db)?;

        info!(id = %entry.id, day = %entry.day, slot = %entry.time_slot, "added timetable entry");
        Ok(entry)
    }

    fn update_timetable_entry(
        &mut self,
        id: &str,
        changes: &TimetableChanges,
    ) -> StoreResult<Option<TimetableEntry>> {
        if changes.is_empty() {
            return self.timetable_entry(id);
        }

        Ok(diesel::update(timetable::table.find(id))
            .set(changes)
            .returning(TimetableEntry::as_returning())
            .get_result(&mut self.db)
            .optional()?)
    }

    fn delete_timetable_entry(&mut self, id: &str) -> StoreResult<bool> {
        let deleted = diesel::delete(timetable::table.find(id)).execute(&mut self.db)?;

        if deleted > 0 {
            info!(id, "deleted timetable entry");
        }
        Ok(deleted > 0)
    }

    fn attendance(&mut self, filter: &AttendanceFilter) -> StoreResult<Vec<Attendance>> {
        let mut query = attendance::table
            .select(Attendance::as_select())
            .order((
                attendance::date.asc(),
                attendance::subject_id.asc(),
                attendance::student_id.asc(),
            ))
            .into_boxed();

        if let Some(student_id) = &filter.student_id {
            query = query.filter(attendance::student_id.eq(student_id));
        }
        if let Some(subject_id) = &filter.subject_id {
            query = query.filter(attendance::subject_id.eq(subject_id));
        }
        if let Some(date) = filter.date {
            query = query.filter(attendance::date.eq(date));
        }

        Ok(query.load(&mut self.db)?)
    }

    fn upsert_attendance(&mut self, event: NewAttendance) -> StoreResult<Attendance> {
        let row = event.with_id(new_id("a"));

        // If the record already exists, this only overwrites the status and the marker.
        let stored = diesel::insert_into(attendance::table)
            .values(&row)
            .on_conflict((
                attendance::student_id,
                attendance::subject_id,
                attendance::date,
            ))
            .do_update()
            .set((
                attendance::status.eq(row.status),
                attendance::marked_by.eq(&row.marked_by),
            ))
            .returning(Attendance::as_returning())
            .get_result(&mut self.db)?;

        debug!(
            id = %stored.id,
            student = %stored.student_id,
            subject = %stored.subject_id,
            date = %stored.date,
            status = %stored.status,
            "marked attendance"
        );
        Ok(stored)
    }
}
