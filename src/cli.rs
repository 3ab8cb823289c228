//! This module contains the command-line interface [`Cli`] parser for managing the college's
//! records, marking attendance, and viewing reports.

use crate::models::{
    Day, FacultyChanges, NewFaculty, NewStudent, NewSubject, NewTimetableEntry, Status,
    StudentChanges, SubjectChanges, TimetableChanges,
};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// The command line configuration struct, where the command-line interface parser is automatically
/// derived by [`clap::Parser`].
#[derive(Parser, Debug)]
#[command(version, about = "College attendance and timetable records")]
pub struct Cli {
    /// Configuration file to read, with or without its extension.
    #[arg(long, global = true, default_value = "config")]
    pub config: String,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Create the database tables, optionally filling them with a sample college.
    Init {
        #[arg(long)]
        seed: bool,
    },

    /// Manage students.
    Student {
        #[command(subcommand)]
        action: StudentCommand,
    },

    /// Manage faculty members.
    Faculty {
        #[command(subcommand)]
        action: FacultyCommand,
    },

    /// Manage subjects.
    Subject {
        #[command(subcommand)]
        action: SubjectCommand,
    },

    /// Manage the weekly timetable.
    Timetable {
        #[command(subcommand)]
        action: TimetableCommand,
    },

    /// Mark one student's attendance for a class. Re-marking the same day overwrites it.
    Mark {
        student_id: String,
        subject_id: String,
        #[arg(value_enum)]
        status: Status,
        /// Faculty member taking attendance.
        #[arg(long)]
        by: String,
        /// Date of the class. Defaults to today.
        #[arg(long)]
        date: Option<NaiveDate>,
    },

    /// Mark every student of a subject's department present.
    MarkAllPresent {
        subject_id: String,
        #[arg(long)]
        by: String,
        #[arg(long)]
        date: Option<NaiveDate>,
    },

    /// Show a subject's roster with the statuses marked for a class.
    Sheet {
        subject_id: String,
        #[arg(long)]
        date: Option<NaiveDate>,
    },

    /// Show a student's attendance per subject.
    Report { student_id: String },

    /// Show a student's overall attendance with their best and worst subjects.
    Summary { student_id: String },

    /// Show every student's attendance in one subject.
    SubjectStats { subject_id: String },

    /// Rank all subjects by attendance.
    Ranking,

    /// List students of a subject below an attendance threshold.
    AtRisk {
        subject_id: String,
        /// Percentage to compare against. Defaults to the configured good-standing threshold.
        #[arg(long)]
        threshold: Option<f64>,
    },

    /// Show a student's classes for one day, or the whole week.
    Schedule {
        student_id: String,
        #[arg(long, value_enum)]
        day: Option<Day>,
    },
}

#[derive(Subcommand, Debug)]
pub enum StudentCommand {
    /// List students.
    List {
        #[arg(long)]
        department: Option<String>,
        #[arg(long)]
        year: Option<i32>,
    },

    /// Add a new student.
    Add(NewStudent),

    /// Change a student's profile.
    Update {
        id: String,
        #[command(flatten)]
        changes: StudentChanges,
    },

    /// Remove a student.
    Remove { id: String },

    /// Add every student listed in a roster CSV.
    Import { file_path: PathBuf },
}

#[derive(Subcommand, Debug)]
pub enum FacultyCommand {
    List {
        #[arg(long)]
        department: Option<String>,
    },
    Add(NewFaculty),
    Update {
        id: String,
        #[command(flatten)]
        changes: FacultyChanges,
    },
    Remove {
        id: String,
    },
}

#[derive(Subcommand, Debug)]
pub enum SubjectCommand {
    List {
        #[arg(long)]
        department: Option<String>,
        /// Only subjects taught by this faculty member.
        #[arg(long)]
        faculty: Option<String>,
    },
    Add(NewSubject),
    Update {
        id: String,
        #[command(flatten)]
        changes: SubjectChanges,
    },
    Remove {
        id: String,
    },
}

#[derive(Subcommand, Debug)]
pub enum TimetableCommand {
    List {
        #[arg(long)]
        department: Option<String>,
        #[arg(long)]
        year: Option<i32>,
        #[arg(long, value_enum)]
        day: Option<Day>,
    },
    Add(NewTimetableEntry),
    Update {
        id: String,
        #[command(flatten)]
        changes: TimetableChanges,
    },
    Remove {
        id: String,
    },
}
