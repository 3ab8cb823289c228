//! Row types for the college tables, the value types stored in them, and the insert/change-set
//! forms used by the [`RecordStore`](crate::store::RecordStore).

use crate::schema::{attendance, faculty, students, subjects, timetable};
use chrono::NaiveDate;
use clap::{Args, ValueEnum};
use diesel::backend::Backend;
use diesel::deserialize::{self, FromSql, FromSqlRow};
use diesel::expression::AsExpression;
use diesel::prelude::*;
use diesel::serialize::{self, IsNull, Output, ToSql};
use diesel::sql_types::Text;
use diesel::sqlite::Sqlite;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tabled::Tabled;
use uuid::Uuid;

/// Generates a fresh row identity, e.g. `s3f1c...` for a student.
pub fn new_id(prefix: &str) -> String {
    format!("{prefix}{}", Uuid::new_v4().simple())
}

/// Whether a student attended a class meeting.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, AsExpression, FromSqlRow, ValueEnum,
)]
#[diesel(sql_type = Text)]
pub enum Status {
    Present,
    Absent,
}

impl Status {
    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Present => "Present",
            Status::Absent => "Absent",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Status {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "present" | "p" => Ok(Status::Present),
            "absent" | "a" => Ok(Status::Absent),
            other => Err(format!("unknown attendance status `{other}`")),
        }
    }
}

impl ToSql<Text, Sqlite> for Status {
    fn to_sql<'b>(&'b self, out: &mut Output<'b, '_, Sqlite>) -> serialize::Result {
        out.set_value(self.as_str());
        Ok(IsNull::No)
    }
}

impl FromSql<Text, Sqlite> for Status {
    fn from_sql(bytes: <Sqlite as Backend>::RawValue<'_>) -> deserialize::Result<Self> {
        let value = <String as FromSql<Text, Sqlite>>::from_sql(bytes)?;
        value.parse().map_err(Into::into)
    }
}

/// A teaching day. Classes run Monday through Saturday.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    AsExpression,
    FromSqlRow,
    ValueEnum,
)]
#[diesel(sql_type = Text)]
pub enum Day {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
}

impl Day {
    pub const ALL: [Day; 6] = [
        Day::Monday,
        Day::Tuesday,
        Day::Wednesday,
        Day::Thursday,
        Day::Friday,
        Day::Saturday,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Day::Monday => "Monday",
            Day::Tuesday => "Tuesday",
            Day::Wednesday => "Wednesday",
            Day::Thursday => "Thursday",
            Day::Friday => "Friday",
            Day::Saturday => "Saturday",
        }
    }

    /// The teaching day a calendar date falls on, or `None` for Sundays.
    pub fn of(date: NaiveDate) -> Option<Day> {
        use chrono::{Datelike, Weekday};

        match date.weekday() {
            Weekday::Mon => Some(Day::Monday),
            Weekday::Tue => Some(Day::Tuesday),
            Weekday::Wed => Some(Day::Wednesday),
            Weekday::Thu => Some(Day::Thursday),
            Weekday::Fri => Some(Day::Friday),
            Weekday::Sat => Some(Day::Saturday),
            Weekday::Sun => None,
        }
    }
}

impl fmt::Display for Day {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Day {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lowered = s.trim().to_ascii_lowercase();
        Day::ALL
            .into_iter()
            .find(|day| {
                let name = day.as_str().to_ascii_lowercase();
                name == lowered || name[..3] == lowered
            })
            .ok_or_else(|| format!("unknown teaching day `{s}`"))
    }
}

impl ToSql<Text, Sqlite> for Day {
    fn to_sql<'b>(&'b self, out: &mut Output<'b, '_, Sqlite>) -> serialize::Result {
        out.set_value(self.as_str());
        Ok(IsNull::No)
    }
}

impl FromSql<Text, Sqlite> for Day {
    fn from_sql(bytes: <Sqlite as Backend>::RawValue<'_>) -> deserialize::Result<Self> {
        let value = <String as FromSql<Text, Sqlite>>::from_sql(bytes)?;
        value.parse().map_err(Into::into)
    }
}

#[derive(
    Queryable, Selectable, Insertable, Tabled, Debug, Clone, PartialEq, Eq, Serialize, Deserialize,
)]
#[diesel(table_name = students)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct Student {
    pub id: String,
    pub name: String,
    #[tabled(rename = "roll no")]
    pub roll_no: String,
    pub department: String,
    pub year: i32,
    pub email: String,
}

/// A student that has not been assigned an identity yet. Also the row format of CSV rosters.
#[derive(Args, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewStudent {
    /// Full name of the student.
    #[arg(long)]
    pub name: String,

    /// College roll number, e.g. CS2021001.
    #[arg(long)]
    pub roll_no: String,

    #[arg(long)]
    pub department: String,

    /// Year of study.
    #[arg(long)]
    pub year: i32,

    #[arg(long)]
    pub email: String,
}

impl NewStudent {
    pub fn with_id(self, id: String) -> Student {
        Student {
            id,
            name: self.name,
            roll_no: self.roll_no,
            department: self.department,
            year: self.year,
            email: self.email,
        }
    }
}

/// Profile fields of a [`Student`] to overwrite. `None` fields are left untouched.
#[derive(AsChangeset, Args, Debug, Clone, Default, PartialEq, Eq)]
#[diesel(table_name = students)]
pub struct StudentChanges {
    #[arg(long)]
    pub name: Option<String>,
    #[arg(long)]
    pub roll_no: Option<String>,
    #[arg(long)]
    pub department: Option<String>,
    #[arg(long)]
    pub year: Option<i32>,
    #[arg(long)]
    pub email: Option<String>,
}

impl StudentChanges {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    pub fn apply(&self, student: &mut Student) {
        if let Some(name) = &self.name {
            student.name.clone_from(name);
        }
        if let Some(roll_no) = &self.roll_no {
            student.roll_no.clone_from(roll_no);
        }
        if let Some(department) = &self.department {
            student.department.clone_from(department);
        }
        if let Some(year) = self.year {
            student.year = year;
        }
        if let Some(email) = &self.email {
            student.email.clone_from(email);
        }
    }
}

#[derive(
    Queryable, Selectable, Insertable, Tabled, Debug, Clone, PartialEq, Eq, Serialize, Deserialize,
)]
#[diesel(table_name = faculty)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct Faculty {
    pub id: String,
    pub name: String,
    pub department: String,
    pub email: String,
}

#[derive(Args, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewFaculty {
    #[arg(long)]
    pub name: String,
    #[arg(long)]
    pub department: String,
    #[arg(long)]
    pub email: String,
}

impl NewFaculty {
    pub fn with_id(self, id: String) -> Faculty {
        Faculty {
            id,
            name: self.name,
            department: self.department,
            email: self.email,
        }
    }
}

#[derive(AsChangeset, Args, Debug, Clone, Default, PartialEq, Eq)]
#[diesel(table_name = faculty)]
pub struct FacultyChanges {
    #[arg(long)]
    pub name: Option<String>,
    #[arg(long)]
    pub department: Option<String>,
    #[arg(long)]
    pub email: Option<String>,
}

impl FacultyChanges {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    pub fn apply(&self, member: &mut Faculty) {
        if let Some(name) = &self.name {
            member.name.clone_from(name);
        }
        if let Some(department) = &self.department {
            member.department.clone_from(department);
        }
        if let Some(email) = &self.email {
            member.email.clone_from(email);
        }
    }
}

#[derive(
    Queryable, Selectable, Insertable, Tabled, Debug, Clone, PartialEq, Eq, Serialize, Deserialize,
)]
#[diesel(table_name = subjects)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct Subject {
    pub id: String,
    pub name: String,
    pub code: String,
    pub department: String,
    #[tabled(rename = "faculty")]
    pub faculty_id: String,
    pub credits: i32,
}

#[derive(Args, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewSubject {
    #[arg(long)]
    pub name: String,

    /// Course code, e.g. CS301.
    #[arg(long)]
    pub code: String,

    #[arg(long)]
    pub department: String,

    /// Identity of the faculty member teaching the subject.
    #[arg(long)]
    pub faculty_id: String,

    #[arg(long)]
    pub credits: i32,
}

impl NewSubject {
    pub fn with_id(self, id: String) -> Subject {
        Subject {
            id,
            name: self.name,
            code: self.code,
            department: self.department,
            faculty_id: self.faculty_id,
            credits: self.credits,
        }
    }
}

#[derive(AsChangeset, Args, Debug, Clone, Default, PartialEq, Eq)]
#[diesel(table_name = subjects)]
pub struct SubjectChanges {
    #[arg(long)]
    pub name: Option<String>,
    #[arg(long)]
    pub code: Option<String>,
    #[arg(long)]
    pub department: Option<String>,
    #[arg(long)]
    pub faculty_id: Option<String>,
    #[arg(long)]
    pub credits: Option<i32>,
}

impl SubjectChanges {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    pub fn apply(&self, subject: &mut Subject) {
        if let Some(name) = &self.name {
            subject.name.clone_from(name);
        }
        if let Some(code) = &self.code {
            subject.code.clone_from(code);
        }
        if let Some(department) = &self.department {
            subject.department.clone_from(department);
        }
        if let Some(faculty_id) = &self.faculty_id {
            subject.faculty_id.clone_from(faculty_id);
        }
        if let Some(credits) = self.credits {
            subject.credits = credits;
        }
    }
}

/// One weekly class meeting of a subject.
#[derive(
    Queryable, Selectable, Insertable, Tabled, Debug, Clone, PartialEq, Eq, Serialize, Deserialize,
)]
#[diesel(table_name = timetable)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct TimetableEntry {
    pub id: String,
    #[tabled(rename = "subject")]
    pub subject_id: String,
    pub day: Day,
    #[tabled(rename = "time")]
    pub time_slot: String,
    pub room: String,
    pub department: String,
    pub year: i32,
}

#[derive(Args, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewTimetableEntry {
    #[arg(long)]
    pub subject_id: String,

    #[arg(long, value_enum)]
    pub day: Day,

    /// Time slot, e.g. 09:00-10:00.
    #[arg(long)]
    pub time_slot: String,

    #[arg(long)]
    pub room: String,

    #[arg(long)]
    pub department: String,

    #[arg(long)]
    pub year: i32,
}

impl NewTimetableEntry {
    pub fn with_id(self, id: String) -> TimetableEntry {
        TimetableEntry {
            id,
            subject_id: self.subject_id,
            day: self.day,
            time_slot: self.time_slot,
            room: self.room,
            department: self.department,
            year: self.year,
        }
    }
}

#[derive(AsChangeset, Args, Debug, Clone, Default, PartialEq, Eq)]
#[diesel(table_name = timetable)]
pub struct TimetableChanges {
    #[arg(long)]
    pub subject_id: Option<String>,
    #[arg(long, value_enum)]
    pub day: Option<Day>,
    #[arg(long)]
    pub time_slot: Option<String>,
    #[arg(long)]
    pub room: Option<String>,
    #[arg(long)]
    pub department: Option<String>,
    #[arg(long)]
    pub year: Option<i32>,
}

impl TimetableChanges {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    pub fn apply(&self, entry: &mut TimetableEntry) {
        if let Some(subject_id) = &self.subject_id {
            entry.subject_id.clone_from(subject_id);
        }
        if let Some(day) = self.day {
            entry.day = day;
        }
        if let Some(time_slot) = &self.time_slot {
            entry.time_slot.clone_from(time_slot);
        }
        if let Some(room) = &self.room {
            entry.room.clone_from(room);
        }
        if let Some(department) = &self.department {
            entry.department.clone_from(department);
        }
        if let Some(year) = self.year {
            entry.year = year;
        }
    }
}

/// One attendance event. The natural key is `(student_id, subject_id, date)`.
#[derive(
    Queryable, Selectable, Insertable, Tabled, Debug, Clone, PartialEq, Eq, Serialize, Deserialize,
)]
#[diesel(table_name = attendance)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct Attendance {
    pub id: String,
    #[tabled(rename = "student")]
    pub student_id: String,
    #[tabled(rename = "subject")]
    pub subject_id: String,
    pub date: NaiveDate,
    pub status: Status,
    #[tabled(rename = "marked by")]
    pub marked_by: String,
}

/// An attendance event to upsert.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAttendance {
    pub student_id: String,
    pub subject_id: String,
    pub date: NaiveDate,
    pub status: Status,
    pub marked_by: String,
}

impl NewAttendance {
    pub fn with_id(self, id: String) -> Attendance {
        Attendance {
            id,
            student_id: self.student_id,
            subject_id: self.subject_id,
            date: self.date,
            status: self.status,
            marked_by: self.marked_by,
        }
    }

    /// Whether `existing` shares this event's natural key.
    pub fn same_key(&self, existing: &Attendance) -> bool {
        existing.student_id == self.student_id
            && existing.subject_id == self.subject_id
            && existing.date == self.date
    }
}
