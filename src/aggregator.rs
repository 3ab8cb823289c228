//! Attendance statistics computed from the attendance log of a [`RecordStore`].
//!
//! Every percentage produced here is `present / total * 100` rounded to two decimal places, and
//! is `0.0` when there were no classes.

use crate::config::{Standing, Thresholds};
use crate::error::StoreResult;
use crate::models::{Attendance, NewAttendance, Status, Student, Subject};
use crate::roster;
use crate::store::{AttendanceFilter, RecordStore, SubjectFilter};
use chrono::NaiveDate;
use std::collections::BTreeMap;
use tracing::{debug, info};

/// One subject's row in a student's attendance report.
#[derive(Debug, Clone, PartialEq)]
pub struct AttendanceReport {
    pub student: Student,
    pub subject: Subject,
    pub total_classes: u32,
    pub present_count: u32,
    pub absent_count: u32,
    pub percentage: f64,
}

/// One student's row in a subject's attendance statistics.
#[derive(Debug, Clone, PartialEq)]
pub struct SubjectStat {
    pub student_id: String,
    pub present: u32,
    pub absent: u32,
    pub total: u32,
    pub percentage: f64,
}

/// Attendance of one subject across all of its students.
#[derive(Debug, Clone, PartialEq)]
pub struct SubjectAttendance {
    pub subject: Subject,
    pub total_classes: u32,
    pub present_count: u32,
    pub percentage: f64,
}

/// Every subject ordered from best to worst attended.
#[derive(Debug, Clone, PartialEq)]
pub struct SubjectRanking {
    pub most_attended: Option<SubjectAttendance>,
    pub least_attended: Option<SubjectAttendance>,
    pub all: Vec<SubjectAttendance>,
}

/// The headline numbers of a student's attendance.
#[derive(Debug, Clone, PartialEq)]
pub struct StudentSummary {
    pub student: Student,
    /// Mean of the per-subject percentages, rounded to a whole percent.
    pub overall: u32,
    pub standing: Standing,
    pub best: Option<AttendanceReport>,
    pub worst: Option<AttendanceReport>,
    pub reports: Vec<AttendanceReport>,
}

/// The headline numbers of one subject: how many students take it and how well they attend.
#[derive(Debug, Clone, PartialEq)]
pub struct SubjectSummary {
    pub subject: Subject,
    /// Size of the subject's roster.
    pub enrolled: usize,
    /// Mean of the per-student percentages, rounded to a whole percent.
    pub average: u32,
    pub stats: Vec<SubjectStat>,
}

/// Present and absent counts for one group of attendance events.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct Tally {
    present: u32,
    absent: u32,
}

impl Tally {
    fn record(&mut self, status: Status) {
        match status {
            Status::Present => self.present += 1,
            Status::Absent => self.absent += 1,
        }
    }

    fn total(&self) -> u32 {
        self.present + self.absent
    }

    fn percentage(&self) -> f64 {
        percentage(self.present, self.total())
    }
}

/// `present / total * 100`, rounded to two decimal places. Zero when `total` is zero.
pub fn percentage(present: u32, total: u32) -> f64 {
    if total == 0 {
        return 0.0;
    }

    let raw = f64::from(present) / f64::from(total) * 100.0;
    (raw * 100.0).round() / 100.0
}

/// Mean of `percentages` rounded to a whole percent, or 0 when there are none.
fn mean_percent(percentages: impl ExactSizeIterator<Item = f64>) -> u32 {
    let count = percentages.len();
    if count == 0 {
        return 0;
    }

    let sum: f64 = percentages.sum();
    (sum / count as f64).round() as u32
}

/// Groups events by `key`, ordered by that key.
fn tally_by<'a>(
    events: &'a [Attendance],
    key: impl Fn(&'a Attendance) -> &'a str,
) -> BTreeMap<&'a str, Tally> {
    let mut tallies: BTreeMap<&str, Tally> = BTreeMap::new();
    for event in events {
        tallies.entry(key(event)).or_default().record(event.status);
    }
    tallies
}

/// Computes attendance statistics over a borrowed [`RecordStore`], and records attendance into
/// it.
pub struct AttendanceAggregator<'s, S: ?Sized> {
    store: &'s mut S,
    thresholds: Thresholds,
}

impl<'s, S: RecordStore + ?Sized> AttendanceAggregator<'s, S> {
    pub fn new(store: &'s mut S) -> Self {
        Self::with_thresholds(store, Thresholds::default())
    }

    pub fn with_thresholds(store: &'s mut S, thresholds: Thresholds) -> Self {
        Self { store, thresholds }
    }

    /// A student's attendance, one row per subject they have events for, ordered by subject id.
    ///
    /// Events whose subject no longer exists are skipped. An unknown student gets an empty
    /// report.
    pub fn report_for_student(&mut self, student_id: &str) -> StoreResult<Vec<AttendanceReport>> {
        let Some(student) = self.store.student(student_id)? else {
            debug!(student_id, "no such student, empty report");
            return Ok(Vec::new());
        };

        let events = self
            .store
            .attendance(&AttendanceFilter::default().student(student_id))?;

        let mut reports = Vec::new();
        for (subject_id, tally) in tally_by(&events, |event| event.subject_id.as_str()) {
            let Some(subject) = self.store.subject(subject_id)? else {
                debug!(student_id, subject_id, "skipping events for unknown subject");
                continue;
            };

            reports.push(AttendanceReport {
                student: student.clone(),
                subject,
                total_classes: tally.total(),
                present_count: tally.present,
                absent_count: tally.absent,
                percentage: tally.percentage(),
            });
        }

        Ok(reports)
    }

    /// Per-student attendance of one subject, ordered by student id.
    pub fn stats_for_subject(&mut self, subject_id: &str) -> StoreResult<Vec<SubjectStat>> {
        let events = self
            .store
            .attendance(&AttendanceFilter::default().subject(subject_id))?;

        Ok(tally_by(&events, |event| event.student_id.as_str())
            .into_iter()
            .map(|(student_id, tally)| SubjectStat {
                student_id: student_id.to_string(),
                present: tally.present,
                absent: tally.absent,
                total: tally.total(),
                percentage: tally.percentage(),
            })
            .collect())
    }

    /// Every subject's attendance across all students, best attended first.
    ///
    /// Subjects with equal percentages keep the store's order (by name).
    pub fn overall_subject_ranking(&mut self) -> StoreResult<SubjectRanking> {
        let subjects = self.store.subjects(&SubjectFilter::default())?;

        let mut all = Vec::with_capacity(subjects.len());
        for subject in subjects {
            let events = self
                .store
                .attendance(&AttendanceFilter::default().subject(&subject.id))?;

            let mut tally = Tally::default();
            events.iter().for_each(|event| tally.record(event.status));

            all.push(SubjectAttendance {
                subject,
                total_classes: tally.total(),
                present_count: tally.present,
                percentage: tally.percentage(),
            });
        }

        // `sort_by` is stable, which keeps ties in store order.
        all.sort_by(|a, b| b.percentage.total_cmp(&a.percentage));

        Ok(SubjectRanking {
            most_attended: all.first().cloned(),
            least_attended: all.last().cloned(),
            all,
        })
    }

    /// Records a student's attendance for one class meeting. Marking the same student, subject
    /// and date again overwrites the earlier status.
    pub fn mark_attendance(
        &mut self,
        student_id: &str,
        subject_id: &str,
        date: NaiveDate,
        status: Status,
        marked_by: &str,
    ) -> StoreResult<Attendance> {
        self.store.upsert_attendance(NewAttendance {
            student_id: student_id.to_string(),
            subject_id: subject_id.to_string(),
            date,
            status,
            marked_by: marked_by.to_string(),
        })
    }

    /// Overall attendance, best and worst subject, and standing of a student, or `None` if the
    /// student does not exist.
    pub fn student_summary(&mut self, student_id: &str) -> StoreResult<Option<StudentSummary>> {
        let Some(student) = self.store.student(student_id)? else {
            return Ok(None);
        };

        let reports = self.report_for_student(student_id)?;

        let overall = mean_percent(reports.iter().map(|report| report.percentage));

        // Ties go to the subject listed first.
        let best = reports
            .iter()
            .reduce(|best, report| {
                if report.percentage > best.percentage {
                    report
                } else {
                    best
                }
            })
            .cloned();
        let worst = reports
            .iter()
            .reduce(|worst, report| {
                if report.percentage < worst.percentage {
                    report
                } else {
                    worst
                }
            })
            .cloned();

        Ok(Some(StudentSummary {
            student,
            overall,
            standing: self.thresholds.standing(f64::from(overall)),
            best,
            worst,
            reports,
        }))
    }

    /// Roster size, average attendance and per-student stats of a subject, or `None` if the
    /// subject does not exist.
    pub fn subject_summary(&mut self, subject_id: &str) -> StoreResult<Option<SubjectSummary>> {
        let Some(subject) = self.store.subject(subject_id)? else {
            return Ok(None);
        };

        let enrolled = roster::roster_for_subject(self.store, subject_id)?.len();
        let stats = self.stats_for_subject(subject_id)?;

        Ok(Some(SubjectSummary {
            subject,
            enrolled,
            average: mean_percent(stats.iter().map(|stat| stat.percentage)),
            stats,
        }))
    }

    /// The statuses already recorded for one class meeting, keyed by student id.
    pub fn attendance_sheet(
        &mut self,
        subject_id: &str,
        date: NaiveDate,
    ) -> StoreResult<BTreeMap<String, Status>> {
        let events = self
            .store
            .attendance(&AttendanceFilter::default().subject(subject_id).date(date))?;

        Ok(events
            .into_iter()
            .map(|event| (event.student_id, event.status))
            .collect())
    }

    /// Records a whole class meeting at once.
    pub fn mark_sheet(
        &mut self,
        subject_id: &str,
        date: NaiveDate,
        marks: &BTreeMap<String, Status>,
        marked_by: &str,
    ) -> StoreResult<Vec<Attendance>> {
        let saved = marks
            .iter()
            .map(|(student_id, &status)| {
                self.mark_attendance(student_id, subject_id, date, status, marked_by)
            })
            .collect::<StoreResult<Vec<_>>>()?;

        info!(subject_id, %date, marked = saved.len(), "saved attendance sheet");
        Ok(saved)
    }

    /// Marks every student on the subject's roster present. Returns nothing if the subject does
    /// not exist.
    pub fn mark_all_present(
        &mut self,
        subject_id: &str,
        date: NaiveDate,
        marked_by: &str,
    ) -> StoreResult<Vec<Attendance>> {
        let marks: BTreeMap<String, Status> = roster::roster_for_subject(self.store, subject_id)?
            .into_iter()
            .map(|student| (student.id, Status::Present))
            .collect();

        if marks.is_empty() {
            return Ok(Vec::new());
        }

        self.mark_sheet(subject_id, date, &marks, marked_by)
    }

    /// Students of a subject whose attendance is strictly below `threshold` percent.
    pub fn at_risk(&mut self, subject_id: &str, threshold: f64) -> StoreResult<Vec<SubjectStat>> {
        Ok(self
            .stats_for_subject(subject_id)?
            .into_iter()
            .filter(|stat| stat.percentage < threshold)
            .collect())
    }

    /// The thresholds standings are computed with.
    pub fn thresholds(&self) -> Thresholds {
        self.thresholds
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{NewFaculty, NewStudent, NewSubject};
    use crate::store::MemoryStore;

    fn date(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 10, day).unwrap()
    }

    fn student(store: &mut MemoryStore, name: &str, department: &str) -> Student {
        store
            .add_student(NewStudent {
                name: name.to_string(),
                roll_no: format!("R-{name}"),
                department: department.to_string(),
                year: 3,
                email: format!("{}@college.edu", name.to_lowercase()),
            })
            .unwrap()
    }

    fn subject(store: &mut MemoryStore, name: &str, department: &str) -> Subject {
        store
            .add_subject(NewSubject {
                name: name.to_string(),
                code: name[..2].to_uppercase(),
                department: department.to_string(),
                faculty_id: "f1".to_string(),
                credits: 3,
            })
            .unwrap()
    }

    #[test]
    fn percentage_rounds_to_two_places() {
        assert_eq!(percentage(2, 3), 66.67);
        assert_eq!(percentage(1, 3), 33.33);
        assert_eq!(percentage(3, 3), 100.0);
        assert_eq!(percentage(0, 4), 0.0);
    }

    #[test]
    fn percentage_without_classes_is_zero() {
        assert_eq!(percentage(0, 0), 0.0);
    }

    #[test]
    fn report_groups_by_subject() {
        let mut store = MemoryStore::new();
        let rahul = student(&mut store, "Rahul", "CS");
        let dbms = subject(&mut store, "Databases", "CS");
        let os = subject(&mut store, "Operating Systems", "CS");

        let mut aggregator = AttendanceAggregator::new(&mut store);
        for (subject, day) in [(&dbms, 1), (&dbms, 3), (&os, 1)] {
            aggregator
                .mark_attendance(&rahul.id, &subject.id, date(day), Status::Present, "f1")
                .unwrap();
        }

        let mut reports = aggregator.report_for_student(&rahul.id).unwrap();
        reports.sort_by(|a, b| a.subject.name.cmp(&b.subject.name));

        assert_eq!(reports.len(), 2);
        assert_eq!(reports[0].subject, dbms);
        assert_eq!(
            (reports[0].total_classes, reports[0].present_count, reports[0].absent_count),
            (2, 2, 0)
        );
        assert_eq!(reports[0].percentage, 100.0);
        assert_eq!(reports[1].subject, os);
        assert_eq!(reports[1].total_classes, 1);
        assert_eq!(reports[1].percentage, 100.0);
    }

    #[test]
    fn report_is_empty_without_events_or_student() {
        let mut store = MemoryStore::new();
        let idle = student(&mut store, "Idle", "CS");

        let mut aggregator = AttendanceAggregator::new(&mut store);
        assert!(aggregator.report_for_student(&idle.id).unwrap().is_empty());
        assert!(aggregator.report_for_student("s-missing").unwrap().is_empty());
    }

    #[test]
    fn report_skips_unknown_subjects() {
        let mut store = MemoryStore::new();
        let rahul = student(&mut store, "Rahul", "CS");
        let dbms = subject(&mut store, "Databases", "CS");

        let mut aggregator = AttendanceAggregator::new(&mut store);
        aggregator
            .mark_attendance(&rahul.id, &dbms.id, date(1), Status::Absent, "f1")
            .unwrap();
        aggregator
            .mark_attendance(&rahul.id, "sub-gone", date(1), Status::Present, "f1")
            .unwrap();

        let reports = aggregator.report_for_student(&rahul.id).unwrap();
        assert_eq!(reports.len(), 1);
        assert_eq!(reports[0].subject.id, dbms.id);
        assert_eq!(reports[0].absent_count, 1);
        assert_eq!(reports[0].percentage, 0.0);
    }

    #[test]
    fn remarking_overwrites_status() {
        let mut store = MemoryStore::new();
        let mut aggregator = AttendanceAggregator::new(&mut store);

        let first = aggregator
            .mark_attendance("s1", "sub1", date(1), Status::Absent, "f1")
            .unwrap();
        let second = aggregator
            .mark_attendance("s1", "sub1", date(1), Status::Present, "f2")
            .unwrap();

        assert_eq!(first.id, second.id);
        assert_eq!(second.status, Status::Present);
        assert_eq!(second.marked_by, "f2");

        let stats = aggregator.stats_for_subject("sub1").unwrap();
        assert_eq!(stats.len(), 1);
        assert_eq!((stats[0].present, stats[0].absent, stats[0].total), (1, 0, 1));
    }

    #[test]
    fn subject_stats_are_sorted_by_student() {
        let mut store = MemoryStore::new();
        let mut aggregator = AttendanceAggregator::new(&mut store);
        let marks = [
            ("s3", 1, Status::Absent),
            ("s1", 1, Status::Present),
            ("s3", 3, Status::Present),
            ("s1", 3, Status::Present),
            ("s3", 6, Status::Absent),
        ];
        for (student_id, day, status) in marks {
            aggregator
                .mark_attendance(student_id, "sub1", date(day), status, "f1")
                .unwrap();
        }

        let stats = aggregator.stats_for_subject("sub1").unwrap();

        assert_eq!(stats.len(), 2);
        assert_eq!(stats[0].student_id, "s1");
        assert_eq!(stats[0].percentage, 100.0);
        assert_eq!(stats[1].student_id, "s3");
        assert_eq!((stats[1].present, stats[1].absent, stats[1].total), (1, 2, 3));
        assert_eq!(stats[1].percentage, 33.33);
        assert!(stats.iter().all(|s| s.present + s.absent == s.total));
    }

    #[test]
    fn ranking_sorts_descending_and_keeps_ties_in_order() {
        let mut store = MemoryStore::new();
        let algebra = subject(&mut store, "Algebra", "Math");
        let biology = subject(&mut store, "Biology", "Science");
        let chemistry = subject(&mut store, "Chemistry", "Science");

        let mut aggregator = AttendanceAggregator::new(&mut store);
        let marks = [
            (&algebra, "s1", Status::Present),
            (&algebra, "s2", Status::Absent),
            (&biology, "s1", Status::Present),
            (&biology, "s2", Status::Present),
            (&biology, "s3", Status::Absent),
        ];
        for (subject, student_id, status) in marks {
            aggregator
                .mark_attendance(student_id, &subject.id, date(1), status, "f1")
                .unwrap();
        }

        let ranking = aggregator.overall_subject_ranking().unwrap();
        let order: Vec<(&str, f64)> = ranking
            .all
            .iter()
            .map(|s| (s.subject.name.as_str(), s.percentage))
            .collect();

        assert_eq!(
            order,
            [("Biology", 66.67), ("Algebra", 50.0), ("Chemistry", 0.0)]
        );
        assert_eq!(ranking.most_attended.unwrap().subject, biology);
        let least = ranking.least_attended.unwrap();
        assert_eq!(least.subject, chemistry);
        assert_eq!(least.total_classes, 0);
    }

    #[test]
    fn ranking_of_no_subjects_has_no_extremes() {
        let mut store = MemoryStore::new();
        let ranking = AttendanceAggregator::new(&mut store)
            .overall_subject_ranking()
            .unwrap();

        assert!(ranking.most_attended.is_none());
        assert!(ranking.least_attended.is_none());
        assert!(ranking.all.is_empty());
    }

    #[test]
    fn summary_averages_subjects_and_picks_extremes() {
        let mut store = MemoryStore::new();
        let rahul = student(&mut store, "Rahul", "CS");
        let dbms = subject(&mut store, "Databases", "CS");
        let os = subject(&mut store, "Operating Systems", "CS");

        let mut aggregator = AttendanceAggregator::new(&mut store);
        let marks = [
            (&dbms, 1, Status::Present),
            (&dbms, 3, Status::Present),
            (&dbms, 6, Status::Absent),
            (&os, 1, Status::Present),
        ];
        for (subject, day, status) in marks {
            aggregator
                .mark_attendance(&rahul.id, &subject.id, date(day), status, "f1")
                .unwrap();
        }

        let summary = aggregator.student_summary(&rahul.id).unwrap().unwrap();

        // (66.67 + 100) / 2 = 83.335
        assert_eq!(summary.overall, 83);
        assert_eq!(summary.standing, Standing::Good);
        assert_eq!(summary.best.unwrap().subject, os);
        assert_eq!(summary.worst.unwrap().subject, dbms);
        assert_eq!(summary.reports.len(), 2);
    }

    #[test]
    fn summary_of_student_without_events_is_zero() {
        let mut store = MemoryStore::new();
        let idle = student(&mut store, "Idle", "CS");

        let mut aggregator = AttendanceAggregator::new(&mut store);
        let summary = aggregator.student_summary(&idle.id).unwrap().unwrap();

        assert_eq!(summary.overall, 0);
        assert_eq!(summary.standing, Standing::Critical);
        assert!(summary.best.is_none() && summary.worst.is_none());
        assert!(aggregator.student_summary("s-missing").unwrap().is_none());
    }

    #[test]
    fn subject_summary_averages_students_and_counts_roster() {
        let mut store = MemoryStore::new();
        let rahul = student(&mut store, "Rahul", "CS");
        let priya = student(&mut store, "Priya", "CS");
        let amit = student(&mut store, "Amit", "CS");
        student(&mut store, "Idle", "CS");
        student(&mut store, "Sneha", "EC");
        let dbms = subject(&mut store, "Databases", "CS");

        let mut aggregator = AttendanceAggregator::new(&mut store);
        let marks = [
            (&rahul, 1, Status::Present),
            (&rahul, 3, Status::Present),
            (&priya, 1, Status::Present),
            (&priya, 3, Status::Absent),
            (&amit, 1, Status::Absent),
        ];
        for (student, day, status) in marks {
            aggregator
                .mark_attendance(&student.id, &dbms.id, date(day), status, "f1")
                .unwrap();
        }

        let summary = aggregator.subject_summary(&dbms.id).unwrap().unwrap();

        // (100 + 50 + 0) / 3
        assert_eq!(summary.average, 50);
        assert_eq!(summary.enrolled, 4);
        assert_eq!(summary.stats.len(), 3);
        assert_eq!(summary.subject, dbms);
    }

    #[test]
    fn subject_summary_without_events_is_zero() {
        let mut store = MemoryStore::new();
        student(&mut store, "Rahul", "CS");
        let dbms = subject(&mut store, "Databases", "CS");

        let mut aggregator = AttendanceAggregator::new(&mut store);
        let summary = aggregator.subject_summary(&dbms.id).unwrap().unwrap();

        assert_eq!(summary.average, 0);
        assert_eq!(summary.enrolled, 1);
        assert!(summary.stats.is_empty());
        assert!(aggregator.subject_summary("sub-missing").unwrap().is_none());
    }

    #[test]
    fn mark_all_present_covers_the_department() {
        let mut store = MemoryStore::new();
        let rahul = student(&mut store, "Rahul", "CS");
        let priya = student(&mut store, "Priya", "CS");
        student(&mut store, "Sneha", "EC");
        store
            .add_faculty(NewFaculty {
                name: "Dr. Verma".to_string(),
                department: "CS".to_string(),
                email: "verma@college.edu".to_string(),
            })
            .unwrap();
        let dbms = subject(&mut store, "Databases", "CS");

        let mut aggregator = AttendanceAggregator::new(&mut store);
        let saved = aggregator.mark_all_present(&dbms.id, date(1), "f1").unwrap();
        assert_eq!(saved.len(), 2);

        let sheet = aggregator.attendance_sheet(&dbms.id, date(1)).unwrap();
        assert_eq!(sheet.len(), 2);
        assert_eq!(sheet.get(&rahul.id), Some(&Status::Present));
        assert_eq!(sheet.get(&priya.id), Some(&Status::Present));
        assert!(aggregator.attendance_sheet(&dbms.id, date(2)).unwrap().is_empty());

        assert!(aggregator
            .mark_all_present("sub-missing", date(1), "f1")
            .unwrap()
            .is_empty());
    }

    #[test]
    fn at_risk_lists_students_below_threshold() {
        let mut store = MemoryStore::new();
        let mut aggregator = AttendanceAggregator::new(&mut store);
        let marks = [
            ("s1", 1, Status::Present),
            ("s1", 3, Status::Present),
            ("s2", 1, Status::Present),
            ("s2", 3, Status::Absent),
            ("s3", 1, Status::Absent),
            ("s3", 3, Status::Absent),
        ];
        for (student_id, day, status) in marks {
            aggregator
                .mark_attendance(student_id, "sub1", date(day), status, "f1")
                .unwrap();
        }

        let at_risk: Vec<String> = aggregator
            .at_risk("sub1", aggregator.thresholds().good)
            .unwrap()
            .into_iter()
            .map(|stat| stat.student_id)
            .collect();

        assert_eq!(at_risk, ["s2", "s3"]);
    }
}
