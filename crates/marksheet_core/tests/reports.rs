use marksheet_core::db::open_db_in_memory;
use marksheet_core::{
    dashboard_summary, module_report, trainee_report, Grade, GradeDistribution, NewMark,
    NewModule, RecordsStore, SqliteCollectionRepository,
};
use rusqlite::Connection;

fn seeded_store(conn: &Connection) -> RecordsStore<SqliteCollectionRepository<'_>> {
    let repo = SqliteCollectionRepository::try_new(conn).unwrap();
    RecordsStore::open(repo).unwrap()
}

#[test]
fn dashboard_summarizes_seed_data() {
    let conn = open_db_in_memory().unwrap();
    let store = seeded_store(&conn);

    let summary = dashboard_summary(&store);

    assert_eq!(summary.trade_count, 5);
    assert_eq!(summary.trainee_count, 5);
    assert_eq!(summary.module_count, 5);
    assert_eq!(summary.mark_count, 5);
    assert_eq!(summary.passing_rate, 100.0);
    assert_eq!(
        summary.grades,
        GradeDistribution {
            excellent: 3,
            good: 2,
            average: 0,
            poor: 0,
        }
    );
    let recent: Vec<u32> = summary.recent_marks.iter().map(|mark| mark.mark_id).collect();
    assert_eq!(recent, vec![5, 4, 3, 2, 1]);
}

#[test]
fn dashboard_over_empty_store_reports_zero_rates() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteCollectionRepository::try_new(&conn).unwrap();
    let store = RecordsStore::open_empty(repo).unwrap();

    let summary = dashboard_summary(&store);

    assert_eq!(summary.mark_count, 0);
    assert_eq!(summary.passing_rate, 0.0);
    assert_eq!(summary.grades, GradeDistribution::default());
    assert!(summary.recent_marks.is_empty());
}

#[test]
fn recent_marks_are_capped_at_five() {
    let conn = open_db_in_memory().unwrap();
    let mut store = seeded_store(&conn);
    store
        .add_mark(NewMark::new(5, 4, 4, 2, [40, 40, 40]))
        .unwrap();

    let summary = dashboard_summary(&store);

    let recent: Vec<u32> = summary.recent_marks.iter().map(|mark| mark.mark_id).collect();
    assert_eq!(recent, vec![6, 5, 4, 3, 2]);
    assert_eq!(summary.grades.poor, 1);
    assert!((summary.passing_rate - 500.0 / 6.0).abs() < 1e-9);
}

#[test]
fn trainee_report_resolves_modules_and_averages() {
    let conn = open_db_in_memory().unwrap();
    let store = seeded_store(&conn);

    let report = trainee_report(&store, 1).unwrap();

    assert_eq!(report.trainee.full_name(), "John Doe");
    assert_eq!(
        report.trade.as_ref().map(|trade| trade.trade_name.as_str()),
        Some("Software Development L3")
    );
    let modules: Vec<&str> = report
        .lines
        .iter()
        .filter_map(|line| line.module.as_ref().map(|module| module.mod_name.as_str()))
        .collect();
    assert_eq!(modules, vec!["Web Development", "Database Design"]);
    assert_eq!(report.lines[0].grade, Grade::Excellent);
    assert_eq!(report.lines[1].grade, Grade::Good);
    assert_eq!(report.average_total, 77.5);
    assert!(report.is_passing);
}

#[test]
fn trainee_without_marks_is_not_passing() {
    let conn = open_db_in_memory().unwrap();
    let store = seeded_store(&conn);

    let report = trainee_report(&store, 5).unwrap();

    assert!(report.lines.is_empty());
    assert_eq!(report.average_total, 0.0);
    assert!(!report.is_passing);
    assert!(trainee_report(&store, 99).is_none());
}

#[test]
fn module_report_finds_extremes() {
    let conn = open_db_in_memory().unwrap();
    let store = seeded_store(&conn);

    let report = module_report(&store, 1).unwrap();

    let order: Vec<u32> = report.lines.iter().map(|line| line.mark.mark_id).collect();
    assert_eq!(order, vec![3, 1]);
    assert_eq!(report.average_total, 82.0);
    assert_eq!(report.pass_rate, 100.0);
    let highest = report.highest.unwrap();
    assert_eq!(highest.total, 84);
    assert_eq!(highest.trainee.unwrap().first_names, "Jane");
    let lowest = report.lowest.unwrap();
    assert_eq!(lowest.total, 80);
    assert_eq!(lowest.trainee.unwrap().first_names, "John");
    assert!(module_report(&store, 99).is_none());
}

#[test]
fn module_report_ties_keep_first_mark() {
    let conn = open_db_in_memory().unwrap();
    let mut store = seeded_store(&conn);
    let module = store.add_module(NewModule::new("Networking", 10)).unwrap();
    store
        .add_mark(NewMark::new(3, 2, module.module_id, 2, [70, 70, 70]))
        .unwrap();
    store
        .add_mark(NewMark::new(4, 3, module.module_id, 2, [70, 70, 70]))
        .unwrap();

    let report = module_report(&store, module.module_id).unwrap();

    let highest = report.highest.unwrap();
    let lowest = report.lowest.unwrap();
    assert_eq!(highest.total, 70);
    assert_eq!(highest.trainee.unwrap().trainee_id, 3);
    assert_eq!(lowest.trainee.unwrap().trainee_id, 3);
}

#[test]
fn module_without_marks_has_no_extremes() {
    let conn = open_db_in_memory().unwrap();
    let store = seeded_store(&conn);

    let report = module_report(&store, 4).unwrap();

    assert!(report.lines.is_empty());
    assert!(report.highest.is_none());
    assert!(report.lowest.is_none());
    assert_eq!(report.pass_rate, 0.0);
}

#[test]
fn module_report_lines_run_from_highest_total() {
    let conn = open_db_in_memory().unwrap();
    let mut store = seeded_store(&conn);
    let module = store.add_module(NewModule::new("Networking", 10)).unwrap();
    for (trainee_id, trade_id, scores) in [
        (1, 1, [50, 50, 50]),
        (2, 1, [90, 90, 90]),
        (3, 2, [70, 70, 70]),
        (4, 3, [90, 90, 90]),
    ] {
        store
            .add_mark(NewMark::new(trainee_id, trade_id, module.module_id, 2, scores))
            .unwrap();
    }

    let report = module_report(&store, module.module_id).unwrap();

    let rows: Vec<(u32, u32)> = report
        .lines
        .iter()
        .map(|line| (line.mark.trainee_id, line.mark.total_marks100))
        .collect();
    assert_eq!(rows, vec![(2, 90), (4, 90), (3, 70), (1, 50)]);
    assert_eq!(report.lines[3].grade, Grade::Poor);
}
