//! Pretty printing of store contents and attendance statistics as terminal tables.

use crate::aggregator::AttendanceAggregator;
use crate::config::Thresholds;
use crate::error::{StoreError, StoreResult};
use crate::models::Day;
use crate::roster;
use crate::schedule::{self, ScheduledClass};
use crate::store::{FacultyFilter, RecordStore, StudentFilter, SubjectFilter, TimetableFilter};
use chrono::NaiveDate;
use tabled::{Table, Tabled, settings::Style};

fn print_table<T: Tabled>(title: &str, rows: impl IntoIterator<Item = T>) {
    let mut table = Table::new(rows);
    table.with(Style::modern());
    println!("{title}:\n{table}");
}

fn percent(value: f64) -> String {
    format!("{value:.2}%")
}

/// Pretty prints the students matching `filter`.
pub fn show_students<S: RecordStore + ?Sized>(
    store: &mut S,
    filter: &StudentFilter,
) -> StoreResult<()> {
    print_table("Students", store.students(filter)?);
    Ok(())
}

pub fn show_faculty<S: RecordStore + ?Sized>(
    store: &mut S,
    filter: &FacultyFilter,
) -> StoreResult<()> {
    print_table("Faculty", store.faculty(filter)?);
    Ok(())
}

pub fn show_subjects<S: RecordStore + ?Sized>(
    store: &mut S,
    filter: &SubjectFilter,
) -> StoreResult<()> {
    print_table("Subjects", store.subjects(filter)?);
    Ok(())
}

pub fn show_timetable<S: RecordStore + ?Sized>(
    store: &mut S,
    filter: &TimetableFilter,
) -> StoreResult<()> {
    print_table("Timetable", store.timetable(filter)?);
    Ok(())
}

/// Pretty prints a student's attendance, one row per subject.
pub fn show_report<S: RecordStore + ?Sized>(
    store: &mut S,
    student_id: &str,
    thresholds: Thresholds,
) -> StoreResult<()> {
    #[derive(Tabled)]
    struct ReportRow {
        code: String,
        subject: String,
        total: u32,
        present: u32,
        absent: u32,
        attendance: String,
        standing: String,
    }

    let reports = AttendanceAggregator::with_thresholds(store, thresholds)
        .report_for_student(student_id)?;

    if reports.is_empty() {
        println!("No attendance recorded for student '{student_id}'.");
        return Ok(());
    }

    let rows = reports.into_iter().map(|report| ReportRow {
        code: report.subject.code,
        subject: report.subject.name,
        total: report.total_classes,
        present: report.present_count,
        absent: report.absent_count,
        attendance: percent(report.percentage),
        standing: thresholds.standing(report.percentage).to_string(),
    });

    print_table(&format!("Attendance report for {student_id}"), rows);
    Ok(())
}

/// Prints the overall attendance, best and worst subjects of a student.
pub fn show_summary<S: RecordStore + ?Sized>(
    store: &mut S,
    student_id: &str,
    thresholds: Thresholds,
) -> StoreResult<()> {
    let summary = AttendanceAggregator::with_thresholds(store, thresholds)
        .student_summary(student_id)?
        .ok_or_else(|| StoreError::not_found("student", student_id))?;

    println!(
        "{} ({}), {} year {}",
        summary.student.name, summary.student.roll_no, summary.student.department, summary.student.year
    );
    println!("Overall attendance: {}% ({})", summary.overall, summary.standing);

    for (label, report) in [("Best subject", summary.best), ("Worst subject", summary.worst)] {
        match report {
            Some(report) => println!(
                "{label}: {} ({:.1}%)",
                report.subject.code, report.percentage
            ),
            None => println!("{label}: N/A"),
        }
    }

    Ok(())
}

/// Prints a subject's roster size and average attendance, then every student's attendance in it.
pub fn show_subject_stats<S: RecordStore + ?Sized>(
    store: &mut S,
    subject_id: &str,
) -> StoreResult<()> {
    #[derive(Tabled)]
    struct StatRow {
        student: String,
        name: String,
        present: u32,
        absent: u32,
        total: u32,
        attendance: String,
    }

    let summary = AttendanceAggregator::new(&mut *store)
        .subject_summary(subject_id)?
        .ok_or_else(|| StoreError::not_found("subject", subject_id))?;

    println!(
        "{} ({}): {} students enrolled, average attendance {}%",
        summary.subject.name, summary.subject.code, summary.enrolled, summary.average
    );

    let mut rows = Vec::with_capacity(summary.stats.len());
    for stat in summary.stats {
        let name = store
            .student(&stat.student_id)?
            .map(|student| student.name)
            .unwrap_or_else(|| "-".to_string());

        rows.push(StatRow {
            student: stat.student_id,
            name,
            present: stat.present,
            absent: stat.absent,
            total: stat.total,
            attendance: percent(stat.percentage),
        });
    }

    print_table(&format!("Attendance in {subject_id}"), rows);
    Ok(())
}

/// Pretty prints all subjects from best to worst attended.
pub fn show_ranking<S: RecordStore + ?Sized>(store: &mut S) -> StoreResult<()> {
    #[derive(Tabled)]
    struct RankRow {
        rank: usize,
        code: String,
        subject: String,
        classes: u32,
        present: u32,
        attendance: String,
    }

    let ranking = AttendanceAggregator::new(store).overall_subject_ranking()?;

    if let (Some(most), Some(least)) = (&ranking.most_attended, &ranking.least_attended) {
        println!(
            "Most attended: {} ({}), least attended: {} ({})",
            most.subject.code,
            percent(most.percentage),
            least.subject.code,
            percent(least.percentage)
        );
    }

    let rows = ranking
        .all
        .into_iter()
        .enumerate()
        .map(|(index, stat)| RankRow {
            rank: index + 1,
            code: stat.subject.code,
            subject: stat.subject.name,
            classes: stat.total_classes,
            present: stat.present_count,
            attendance: percent(stat.percentage),
        });

    print_table("Subject ranking", rows);
    Ok(())
}

/// Pretty prints the students of a subject below `threshold` percent attendance.
pub fn show_at_risk<S: RecordStore + ?Sized>(
    store: &mut S,
    subject_id: &str,
    threshold: f64,
) -> StoreResult<()> {
    #[derive(Tabled)]
    struct RiskRow {
        student: String,
        present: u32,
        total: u32,
        attendance: String,
    }

    let at_risk = AttendanceAggregator::new(store).at_risk(subject_id, threshold)?;

    if at_risk.is_empty() {
        println!("No students in {subject_id} below {threshold}%.");
        return Ok(());
    }

    let rows = at_risk.into_iter().map(|stat| RiskRow {
        student: stat.student_id,
        present: stat.present,
        total: stat.total,
        attendance: percent(stat.percentage),
    });

    print_table(&format!("Below {threshold}% in {subject_id}"), rows);
    Ok(())
}

/// Pretty prints the roster of a subject with the statuses marked on `date`.
pub fn show_sheet<S: RecordStore + ?Sized>(
    store: &mut S,
    subject_id: &str,
    date: NaiveDate,
) -> StoreResult<()> {
    #[derive(Tabled)]
    struct SheetRow {
        student: String,
        name: String,
        #[tabled(rename = "roll no")]
        roll_no: String,
        status: String,
    }

    let sheet = AttendanceAggregator::new(&mut *store).attendance_sheet(subject_id, date)?;
    let students = roster::roster_for_subject(store, subject_id)?;

    let rows = students.into_iter().map(|student| SheetRow {
        status: sheet
            .get(&student.id)
            .map(|status| status.to_string())
            .unwrap_or_else(|| "-".to_string()),
        student: student.id,
        name: student.name,
        roll_no: student.roll_no,
    });

    print_table(&format!("{subject_id} on {date}"), rows);
    Ok(())
}

/// Pretty prints a student's classes for one day, or for the whole week.
pub fn show_schedule<S: RecordStore + ?Sized>(
    store: &mut S,
    student_id: &str,
    day: Option<Day>,
) -> StoreResult<()> {
    #[derive(Tabled)]
    struct ClassRow {
        day: String,
        time: String,
        code: String,
        subject: String,
        room: String,
    }

    fn row(class: ScheduledClass) -> ClassRow {
        let (code, subject) = match class.subject {
            Some(subject) => (subject.code, subject.name),
            None => ("-".to_string(), class.entry.subject_id),
        };

        ClassRow {
            day: class.entry.day.to_string(),
            time: class.entry.time_slot,
            code,
            subject,
            room: class.entry.room,
        }
    }

    let classes: Vec<ScheduledClass> = match day {
        Some(day) => schedule::daily_schedule(store, student_id, day)?,
        None => schedule::weekly_schedule(store, student_id)?
            .into_values()
            .flatten()
            .collect(),
    };

    if classes.is_empty() {
        println!("No classes scheduled.");
        return Ok(());
    }

    print_table("Schedule", classes.into_iter().map(row));
    Ok(())
}
