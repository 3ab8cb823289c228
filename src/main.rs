use anyhow::{Context, Result, bail};
use chrono::{Local, NaiveDate};
use clap::Parser;
use college_attendance::cli::{
    Cli, Command, FacultyCommand, StudentCommand, SubjectCommand, TimetableCommand,
};
use college_attendance::config::Settings;
use college_attendance::store::{FacultyFilter, StudentFilter, SubjectFilter, TimetableFilter};
use college_attendance::{
    AttendanceAggregator, RecordStore, StoreError, display, logging, roster, seed,
};
use tracing::info;

fn main() -> Result<()> {
    let cli = Cli::parse();

    let settings = Settings::load(&cli.config)
        .with_context(|| format!("could not load settings from `{}`", cli.config))?;
    logging::init_tracing(env!("CARGO_CRATE_NAME"), &settings.log.level);

    let mut store = college_attendance::open_store(&settings)?;

    run(cli.command, &mut store, &settings)
}

fn today_or(date: Option<NaiveDate>) -> NaiveDate {
    date.unwrap_or_else(|| Local::now().date_naive())
}

fn run<S: RecordStore>(command: Command, store: &mut S, settings: &Settings) -> Result<()> {
    let thresholds = settings.thresholds;

    match command {
        Command::Init { seed: with_sample } => {
            info!(database = %settings.database.url, "database ready");
            if with_sample {
                let counts = seed::seed(store)?;
                println!("Seeded sample college: {counts:?}");
            }
        }
        Command::Student { action } => student(action, store)?,
        Command::Faculty { action } => faculty(action, store)?,
        Command::Subject { action } => subject(action, store)?,
        Command::Timetable { action } => timetable(action, store)?,
        Command::Mark {
            student_id,
            subject_id,
            status,
            by,
            date,
        } => {
            let event = AttendanceAggregator::new(store).mark_attendance(
                &student_id,
                &subject_id,
                today_or(date),
                status,
                &by,
            )?;
            println!(
                "Marked {} {} in {} on {}",
                event.student_id, event.status, event.subject_id, event.date
            );
        }
        Command::MarkAllPresent {
            subject_id,
            by,
            date,
        } => {
            let date = today_or(date);
            let marked =
                AttendanceAggregator::new(&mut *store).mark_all_present(&subject_id, date, &by)?;
            if marked.is_empty() {
                bail!("subject `{subject_id}` has no students to mark");
            }
            display::show_sheet(store, &subject_id, date)?;
        }
        Command::Sheet { subject_id, date } => {
            display::show_sheet(store, &subject_id, today_or(date))?
        }
        Command::Report { student_id } => display::show_report(store, &student_id, thresholds)?,
        Command::Summary { student_id } => display::show_summary(store, &student_id, thresholds)?,
        Command::SubjectStats { subject_id } => display::show_subject_stats(store, &subject_id)?,
        Command::Ranking => display::show_ranking(store)?,
        Command::AtRisk {
            subject_id,
            threshold,
        } => display::show_at_risk(
            store,
            &subject_id,
            threshold.unwrap_or(thresholds.good),
        )?,
        Command::Schedule { student_id, day } => {
            display::show_schedule(store, &student_id, day)?
        }
    }

    Ok(())
}

fn student<S: RecordStore>(action: StudentCommand, store: &mut S) -> Result<()> {
    match action {
        StudentCommand::List { department, year } => {
            let filter = StudentFilter { department, year };
            display::show_students(store, &filter)?;
        }
        StudentCommand::Add(new_student) => {
            let student = store.add_student(new_student)?;
            println!("Added student:\n{student:#?}");
        }
        StudentCommand::Update { id, changes } => {
            let student = store
                .update_student(&id, &changes)?
                .ok_or_else(|| StoreError::not_found("student", &id))?;
            println!("Updated student:\n{student:#?}");
        }
        StudentCommand::Remove { id } => {
            if !store.delete_student(&id)? {
                return Err(StoreError::not_found("student", id).into());
            }
            println!("Removed student '{id}'.");
        }
        StudentCommand::Import { file_path } => {
            let students = roster::load_students(&file_path)?;
            let added = roster::import_students(store, students)?;
            println!("Imported {} students from {}.", added.len(), file_path.display());
        }
    }

    Ok(())
}

fn faculty<S: RecordStore>(action: FacultyCommand, store: &mut S) -> Result<()> {
    match action {
        FacultyCommand::List { department } => {
            display::show_faculty(store, &FacultyFilter { department })?;
        }
        FacultyCommand::Add(new_member) => {
            let member = store.add_faculty(new_member)?;
            println!("Added faculty member:\n{member:#?}");
        }
        FacultyCommand::Update { id, changes } => {
            let member = store
                .update_faculty(&id, &changes)?
                .ok_or_else(|| StoreError::not_found("faculty member", &id))?;
            println!("Updated faculty member:\n{member:#?}");
        }
        FacultyCommand::Remove { id } => {
            if !store.delete_faculty(&id)? {
                return Err(StoreError::not_found("faculty member", id).into());
            }
            println!("Removed faculty member '{id}'.");
        }
    }

    Ok(())
}

fn subject<S: RecordStore>(action: SubjectCommand, store: &mut S) -> Result<()> {
    match action {
        SubjectCommand::List {
            department,
            faculty,
        } => {
            let filter = SubjectFilter {
                department,
                faculty_id: faculty,
            };
            display::show_subjects(store, &filter)?;
        }
        SubjectCommand::Add(new_subject) => {
            let subject = store.add_subject(new_subject)?;
            println!("Added subject:\n{subject:#?}");
        }
        SubjectCommand::Update { id, changes } => {
            let subject = store
                .update_subject(&id, &changes)?
                .ok_or_else(|| StoreError::not_found("subject", &id))?;
            println!("Updated subject:\n{subject:#?}");
        }
        SubjectCommand::Remove { id } => {
            if !store.delete_subject(&id)? {
                return Err(StoreError::not_found("subject", id).into());
            }
            println!("Removed subject '{id}'.");
        }
    }

    Ok(())
}

fn timetable<S: RecordStore>(action: TimetableCommand, store: &mut S) -> Result<()> {
    match action {
        TimetableCommand::List {
            department,
            year,
            day,
        } => {
            let filter = TimetableFilter {
                department,
                year,
                day,
            };
            display::show_timetable(store, &filter)?;
        }
        TimetableCommand::Add(new_entry) => {
            let entry = store.add_timetable_entry(new_entry)?;
            println!("Added timetable entry:\n{entry:#?}");
        }
        TimetableCommand::Update { id, changes } => {
            let entry = store
                .update_timetable_entry(&id, &changes)?
                .ok_or_else(|| StoreError::not_found("timetable entry", &id))?;
            println!("Updated timetable entry:\n{entry:#?}");
        }
        TimetableCommand::Remove { id } => {
            if !store.delete_timetable_entry(&id)? {
                return Err(StoreError::not_found("timetable entry", id).into());
            }
            println!("Removed timetable entry '{id}'.");
        }
    }

    Ok(())
}
