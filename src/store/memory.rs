use super::{
    AttendanceFilter, FacultyFilter, RecordStore, StudentFilter, SubjectFilter, TimetableFilter,
    sort_timetable,
};
use crate::error::StoreResult;
use crate::models::{
    Attendance, Faculty, FacultyChanges, NewAttendance, NewFaculty, NewStudent, NewSubject,
    NewTimetableEntry, Student, StudentChanges, Subject, SubjectChanges, TimetableChanges,
    TimetableEntry, new_id,
};
use tracing::debug;

/// A [`RecordStore`] that keeps every table in a `Vec`. Nothing is persisted.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    students: Vec<Student>,
    faculty: Vec<Faculty>,
    subjects: Vec<Subject>,
    timetable: Vec<TimetableEntry>,
    attendance: Vec<Attendance>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

/// Removes the first row that `matches`, returning whether there was one.
fn remove_by<T>(rows: &mut Vec<T>, matches: impl Fn(&T) -> bool) -> bool {
    match rows.iter().position(matches) {
        Some(index) => {
            rows.remove(index);
            true
        }
        None => false,
    }
}

impl RecordStore for MemoryStore {
    fn students(&mut self, filter: &StudentFilter) -> StoreResult<Vec<Student>> {
        let mut found: Vec<Student> = self
            .students
            .iter()
            .filter(|student| filter.matches(student))
            .cloned()
            .collect();
        found.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(found)
    }

    fn student(&mut self, id: &str) -> StoreResult<Option<Student>> {
        Ok(self.students.iter().find(|s| s.id == id).cloned())
    }

    fn add_student(&mut self, student: NewStudent) -> StoreResult<Student> {
        let student = student.with_id(new_id("s"));
        self.students.push(student.clone());
        Ok(student)
    }

    fn update_student(
        &mut self,
        id: &str,
        changes: &StudentChanges,
    ) -> StoreResult<Option<Student>> {
        Ok(self.students.iter_mut().find(|s| s.id == id).map(|student| {
            changes.apply(student);
            student.clone()
        }))
    }

    fn delete_student(&mut self, id: &str) -> StoreResult<bool> {
        Ok(remove_by(&mut self.students, |s| s.id == id))
    }

    fn faculty(&mut self, filter: &FacultyFilter) -> StoreResult<Vec<Faculty>> {
        let mut found: Vec<Faculty> = self
            .faculty
            .iter()
            .filter(|member| filter.matches(member))
            .cloned()
            .collect();
        found.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(found)
    }

    fn faculty_member(&mut self, id: &str) -> StoreResult<Option<Faculty>> {
        Ok(self.faculty.iter().find(|f| f.id == id).cloned())
    }

    fn add_faculty(&mut self, member: NewFaculty) -> StoreResult<Faculty> {
        let member = member.with_id(new_id("f"));
        self.faculty.push(member.clone());
        Ok(member)
    }

    fn update_faculty(
        &mut self,
        id: &str,
        changes: &FacultyChanges,
    ) -> StoreResult<Option<Faculty>> {
        Ok(self.faculty.iter_mut().find(|f| f.id == id).map(|member| {
            changes.apply(member);
            member.clone()
        }))
    }

    fn delete_faculty(&mut self, id: &str) -> StoreResult<bool> {
        Ok(remove_by(&mut self.faculty, |f| f.id == id))
    }

    fn subjects(&mut self, filter: &SubjectFilter) -> StoreResult<Vec<Subject>> {
        let mut found: Vec<Subject> = self
            .subjects
            .iter()
            .filter(|subject| filter.matches(subject))
            .cloned()
            .collect();
        found.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(found)
    }

    fn subject(&mut self, id: &str) -> StoreResult<Option<Subject>> {
        Ok(self.subjects.iter().find(|s| s.id == id).cloned())
    }

    fn add_subject(&mut self, subject: NewSubject) -> StoreResult<Subject> {
        let subject = subject.with_id(new_id("sub"));
        self.subjects.push(subject.clone());
        Ok(subject)
    }

    fn update_subject(
        &mut self,
        id: &str,
        changes: &SubjectChanges,
    ) -> StoreResult<Option<Subject>> {
        Ok(self.subjects.iter_mut().find(|s| s.id == id).map(|subject| {
            changes.apply(subject);
            subject.clone()
        }))
    }

    fn delete_subject(&mut self, id: &str) -> StoreResult<bool> {
        Ok(remove_by(&mut self.subjects, |s| s.id == id))
    }

    fn timetable(&mut self, filter: &TimetableFilter) -> StoreResult<Vec<TimetableEntry>> {
        let mut found: Vec<TimetableEntry> = self
            .timetable
            .iter()
            .filter(|entry| filter.matches(entry))
            .cloned()
            .collect();
        sort_timetable(&mut found);
        Ok(found)
    }

    fn timetable_entry(&mut self, id: &str) -> StoreResult<Option<TimetableEntry>> {
        Ok(self.timetable.iter().find(|t| t.id == id).cloned())
    }

    fn add_timetable_entry(&mut self, entry: NewTimetableEntry) -> StoreResult<TimetableEntry> {
        let entry = entry.with_id(new_id("t"));
        self.timetable.push(entry.clone());
        Ok(entry)
    }

    fn update_timetable_entry(
        &mut self,
        id: &str,
        changes: &TimetableChanges,
    ) -> StoreResult<Option<TimetableEntry>> {
        Ok(self.timetable.iter_mut().find(|t| t.id == id).map(|entry| {
            changes.apply(entry);
            entry.clone()
        }))
    }

    fn delete_timetable_entry(&mut self, id: &str) -> StoreResult<bool> {
        Ok(remove_by(&mut self.timetable, |t| t.id == id))
    }

    fn attendance(&mut self, filter: &AttendanceFilter) -> StoreResult<Vec<Attendance>> {
        let mut found: Vec<Attendance> = self
            .attendance
            .iter()
            .filter(|event| filter.matches(event))
            .cloned()
            .collect();
        found.sort_by(|a, b| {
            (a.date, &a.subject_id, &a.student_id).cmp(&(b.date, &b.subject_id, &b.student_id))
        });
        Ok(found)
    }

    fn upsert_attendance(&mut self, event: NewAttendance) -> StoreResult<Attendance> {
        if let Some(existing) = self.attendance.iter_mut().find(|a| event.same_key(a)) {
            debug!(id = %existing.id, status = %event.status, "overwriting attendance");
            existing.status = event.status;
            existing.marked_by = event.marked_by;
            return Ok(existing.clone());
        }

        let event = event.with_id(new_id("a"));
        self.attendance.push(event.clone());
        Ok(event)
    }
}
