//! Attendance statistics computed over a SQLite store.

use chrono::NaiveDate;
use college_attendance::models::{
    Day, NewFaculty, NewStudent, NewSubject, Status, Student, Subject,
};
use college_attendance::store::{AttendanceFilter, SqliteStore, StudentFilter, SubjectFilter};
use college_attendance::{AttendanceAggregator, RecordStore, schedule, seed};
use std::collections::BTreeMap;

fn date(day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 10, day).unwrap()
}

struct College {
    store: SqliteStore,
    faculty_id: String,
    students: Vec<Student>,
    dbms: Subject,
    os: Subject,
}

fn college() -> College {
    let mut store = SqliteStore::in_memory().unwrap();

    let faculty_id = store
        .add_faculty(NewFaculty {
            name: "Dr. Rajesh Verma".to_string(),
            department: "Computer Science".to_string(),
            email: "rajesh.verma@college.edu".to_string(),
        })
        .unwrap()
        .id;

    let students = ["Rahul Kumar", "Priya Sharma", "Amit Patel"]
        .into_iter()
        .enumerate()
        .map(|(index, name)| {
            store
                .add_student(NewStudent {
                    name: name.to_string(),
                    roll_no: format!("CS202100{}", index + 1),
                    department: "Computer Science".to_string(),
                    year: 3,
                    email: format!("{}@college.edu", name.to_lowercase().replace(' ', ".")),
                })
                .unwrap()
        })
        .collect();

    let mut subject = |name: &str, code: &str| {
        store
            .add_subject(NewSubject {
                name: name.to_string(),
                code: code.to_string(),
                department: "Computer Science".to_string(),
                faculty_id: faculty_id.clone(),
                credits: 4,
            })
            .unwrap()
    };
    let dbms = subject("Database Management Systems", "CS301");
    let os = subject("Operating Systems", "CS302");

    College {
        store,
        faculty_id,
        students,
        dbms,
        os,
    }
}

#[test]
fn report_for_student_counts_each_subject() {
    let College {
        mut store,
        faculty_id,
        students,
        dbms,
        os,
    } = college();
    let rahul = &students[0];

    let mut aggregator = AttendanceAggregator::new(&mut store);
    for (subject, day) in [(&dbms, 1), (&dbms, 3), (&os, 1)] {
        aggregator
            .mark_attendance(&rahul.id, &subject.id, date(day), Status::Present, &faculty_id)
            .unwrap();
    }

    let mut reports = aggregator.report_for_student(&rahul.id).unwrap();
    reports.sort_by(|a, b| a.subject.code.cmp(&b.subject.code));

    let rows: Vec<(&str, u32, u32, u32, f64)> = reports
        .iter()
        .map(|r| {
            (
                r.subject.code.as_str(),
                r.total_classes,
                r.present_count,
                r.absent_count,
                r.percentage,
            )
        })
        .collect();
    assert_eq!(rows, [("CS301", 2, 2, 0, 100.0), ("CS302", 1, 1, 0, 100.0)]);
    assert!(reports.iter().all(|r| r.student == *rahul));
}

#[test]
fn students_without_events_have_empty_reports() {
    let College {
        mut store,
        students,
        ..
    } = college();

    let mut aggregator = AttendanceAggregator::new(&mut store);
    for student in &students {
        assert!(aggregator.report_for_student(&student.id).unwrap().is_empty());
    }
}

#[test]
fn ranking_places_two_of_three_present_at_66_67() {
    let College {
        mut store,
        faculty_id,
        students,
        dbms,
        os,
    } = college();

    let mut aggregator = AttendanceAggregator::new(&mut store);
    let statuses = [Status::Present, Status::Present, Status::Absent];
    for (student, status) in students.iter().zip(statuses) {
        aggregator
            .mark_attendance(&student.id, &dbms.id, date(1), status, &faculty_id)
            .unwrap();
        aggregator
            .mark_attendance(&student.id, &os.id, date(1), Status::Present, &faculty_id)
            .unwrap();
    }

    let ranking = aggregator.overall_subject_ranking().unwrap();

    assert_eq!(ranking.all.len(), 2);
    assert_eq!(ranking.most_attended.unwrap().subject, os);
    let least = ranking.least_attended.unwrap();
    assert_eq!(least.subject, dbms);
    assert_eq!(least.percentage, 66.67);
    assert_eq!((least.total_classes, least.present_count), (3, 2));
}

#[test]
fn remarking_the_same_class_keeps_one_event() {
    let College {
        mut store,
        faculty_id,
        students,
        dbms,
        ..
    } = college();
    let priya = &students[1];

    let mut aggregator = AttendanceAggregator::new(&mut store);
    aggregator
        .mark_attendance(&priya.id, &dbms.id, date(3), Status::Absent, &faculty_id)
        .unwrap();
    aggregator
        .mark_attendance(&priya.id, &dbms.id, date(3), Status::Present, &faculty_id)
        .unwrap();

    let stats = aggregator.stats_for_subject(&dbms.id).unwrap();
    assert_eq!(stats.len(), 1);
    assert_eq!((stats[0].present, stats[0].absent, stats[0].total), (1, 0, 1));

    let events = store
        .attendance(&AttendanceFilter::default().student(&priya.id))
        .unwrap();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].status, Status::Present);
}

#[test]
fn sheet_round_trips_through_the_store() {
    let College {
        mut store,
        faculty_id,
        students,
        dbms,
        ..
    } = college();

    let marks: BTreeMap<String, Status> = students
        .iter()
        .zip([Status::Present, Status::Absent, Status::Present])
        .map(|(student, status)| (student.id.clone(), status))
        .collect();

    let mut aggregator = AttendanceAggregator::new(&mut store);
    let saved = aggregator
        .mark_sheet(&dbms.id, date(6), &marks, &faculty_id)
        .unwrap();
    assert_eq!(saved.len(), 3);

    assert_eq!(aggregator.attendance_sheet(&dbms.id, date(6)).unwrap(), marks);

    let at_risk = aggregator.at_risk(&dbms.id, 75.0).unwrap();
    assert_eq!(at_risk.len(), 1);
    assert_eq!(at_risk[0].student_id, students[1].id);
    assert_eq!(at_risk[0].percentage, 0.0);
}

#[test]
fn every_stat_adds_up_on_the_sample_college() {
    let mut store = SqliteStore::in_memory().unwrap();
    seed::seed(&mut store).unwrap();

    let students = store.students(&StudentFilter::default()).unwrap();
    let subjects = store.subjects(&SubjectFilter::default()).unwrap();

    let mut aggregator = AttendanceAggregator::new(&mut store);
    for student in &students {
        for report in aggregator.report_for_student(&student.id).unwrap() {
            assert_eq!(report.present_count + report.absent_count, report.total_classes);
            assert!(report.total_classes > 0);
        }
    }
    for subject in &subjects {
        for stat in aggregator.stats_for_subject(&subject.id).unwrap() {
            assert_eq!(stat.present + stat.absent, stat.total);
            let expected =
                (f64::from(stat.present) / f64::from(stat.total) * 10_000.0).round() / 100.0;
            assert_eq!(stat.percentage, expected);
        }
    }

    let amit = students.iter().find(|s| s.name == "Amit Patel").unwrap();
    let summary = aggregator.student_summary(&amit.id).unwrap().unwrap();
    // 50% in databases, 100% in operating systems.
    assert_eq!(summary.overall, 75);
    assert_eq!(summary.best.unwrap().subject.code, "CS302");
    assert_eq!(summary.worst.unwrap().subject.code, "CS301");

    let dbms = subjects.iter().find(|s| s.code == "CS301").unwrap();
    let dbms_summary = aggregator.subject_summary(&dbms.id).unwrap().unwrap();
    // Rahul 100%, Priya 50%, Amit 50%.
    assert_eq!(dbms_summary.average, 67);
    assert_eq!(dbms_summary.enrolled, 3);

    let monday = schedule::daily_schedule(&mut store, &amit.id, Day::Monday).unwrap();
    let codes: Vec<String> = monday
        .into_iter()
        .filter_map(|class| class.subject.map(|s| s.code))
        .collect();
    assert_eq!(codes, ["CS301", "CS302"]);
}
