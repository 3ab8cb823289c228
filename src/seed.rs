//! A small sample college: five students in two departments, their faculty, subjects, weekly
//! timetable, and the first few days of attendance.

use crate::error::StoreResult;
use crate::models::{
    Day, NewAttendance, NewFaculty, NewStudent, NewSubject, NewTimetableEntry, Status,
};
use crate::store::RecordStore;
use chrono::NaiveDate;
use tracing::info;

const CS: &str = "Computer Science";
const EC: &str = "Electronics";

/// Row counts written by [`seed`].
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SeedCounts {
    pub students: usize,
    pub faculty: usize,
    pub subjects: usize,
    pub timetable: usize,
    pub attendance: usize,
}

/// Writes the sample college into `store`. References between rows use the identities the store
/// hands out, so this works against any store. Running it twice adds a second copy of the college.
pub fn seed<S: RecordStore + ?Sized>(store: &mut S) -> StoreResult<SeedCounts> {
    let students = [
        ("Rahul Kumar", "CS2021001", CS, 3),
        ("Priya Sharma", "CS2021002", CS, 3),
        ("Amit Patel", "CS2021003", CS, 3),
        ("Sneha Gupta", "EC2021001", EC, 2),
        ("Vikram Singh", "EC2021002", EC, 2),
    ]
    .into_iter()
    .map(|(name, roll_no, department, year)| {
        store.add_student(NewStudent {
            name: name.to_string(),
            roll_no: roll_no.to_string(),
            department: department.to_string(),
            year,
            email: email(name),
        })
    })
    .collect::<StoreResult<Vec<_>>>()?;

    let faculty = [
        ("Dr. Rajesh Verma", CS, "rajesh.verma@college.edu"),
        ("Prof. Sunita Desai", CS, "sunita.desai@college.edu"),
        ("Dr. Arjun Mehta", EC, "arjun.mehta@college.edu"),
    ]
    .into_iter()
    .map(|(name, department, email)| {
        store.add_faculty(NewFaculty {
            name: name.to_string(),
            department: department.to_string(),
            email: email.to_string(),
        })
    })
    .collect::<StoreResult<Vec<_>>>()?;

    let subjects = [
        ("Database Management Systems", "CS301", CS, 0, 4),
        ("Operating Systems", "CS302", CS, 1, 4),
        ("Computer Networks", "CS303", CS, 0, 3),
        ("Digital Signal Processing", "EC201", EC, 2, 3),
    ]
    .into_iter()
    .map(|(name, code, department, lecturer, credits)| {
        store.add_subject(NewSubject {
            name: name.to_string(),
            code: code.to_string(),
            department: department.to_string(),
            faculty_id: faculty[lecturer].id.clone(),
            credits,
        })
    })
    .collect::<StoreResult<Vec<_>>>()?;

    let timetable = [
        (0, Day::Monday, "09:00-10:00", "A101", CS, 3),
        (1, Day::Monday, "10:00-11:00", "A102", CS, 3),
        (2, Day::Tuesday, "09:00-10:00", "A101", CS, 3),
        (0, Day::Wednesday, "11:00-12:00", "A103", CS, 3),
        (1, Day::Thursday, "10:00-11:00", "A102", CS, 3),
        (3, Day::Monday, "09:00-10:00", "B201", EC, 2),
    ]
    .into_iter()
    .map(|(subject, day, time_slot, room, department, year)| {
        store.add_timetable_entry(NewTimetableEntry {
            subject_id: subjects[subject].id.clone(),
            day,
            time_slot: time_slot.to_string(),
            room: room.to_string(),
            department: department.to_string(),
            year,
        })
    })
    .collect::<StoreResult<Vec<_>>>()?;

    // (student, subject, day of October 2025, status, marking faculty)
    let attendance = [
        (0, 0, 1, Status::Present, 0),
        (1, 0, 1, Status::Present, 0),
        (2, 0, 1, Status::Absent, 0),
        (0, 1, 1, Status::Present, 1),
        (1, 1, 1, Status::Present, 1),
        (2, 1, 1, Status::Present, 1),
        (0, 0, 3, Status::Present, 0),
        (1, 0, 3, Status::Absent, 0),
        (2, 0, 3, Status::Present, 0),
    ]
    .into_iter()
    .map(|(student, subject, day, status, marker)| {
        store.upsert_attendance(NewAttendance {
            student_id: students[student].id.clone(),
            subject_id: subjects[subject].id.clone(),
            date: october(day),
            status,
            marked_by: faculty[marker].id.clone(),
        })
    })
    .collect::<StoreResult<Vec<_>>>()?;

    let counts = SeedCounts {
        students: students.len(),
        faculty: faculty.len(),
        subjects: subjects.len(),
        timetable: timetable.len(),
        attendance: attendance.len(),
    };
    info!(?counts, "seeded sample college");
    Ok(counts)
}

fn email(name: &str) -> String {
    format!("{}@college.edu", name.to_lowercase().replace(' ', "."))
}

fn october(day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 10, day).unwrap_or_default()
}
