//! Derived reports over the records store.
//!
//! # Responsibility
//! - Aggregate marks into dashboard, per-trainee and per-module summaries.
//!
//! # Invariants
//! - Reports are pure reads; they never mutate the store.
//! - Averages and rates over an empty mark set are `0.0`.
//! - A total of 60 or more counts as passing.

use crate::model::grade::{Grade, GradeDistribution, PASSING_TOTAL};
use crate::model::mark::Mark;
use crate::model::module::Module;
use crate::model::trade::Trade;
use crate::model::trainee::Trainee;
use crate::model::{ModuleId, TraineeId};
use crate::repo::collection_repo::CollectionRepository;
use crate::service::records_store::RecordsStore;
use serde::Serialize;

/// Number of marks listed under "recent" on the dashboard.
const RECENT_MARKS_LIMIT: usize = 5;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardSummary {
    pub trade_count: usize,
    pub trainee_count: usize,
    pub module_count: usize,
    pub mark_count: usize,
    /// Percentage of marks with a passing total.
    pub passing_rate: f64,
    pub grades: GradeDistribution,
    /// Highest mark ids first.
    pub recent_marks: Vec<Mark>,
}

/// One assessed module inside a trainee report.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TraineeReportLine {
    pub mark: Mark,
    /// `None` when the mark references a module that no longer resolves.
    pub module: Option<Module>,
    pub grade: Grade,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TraineeReport {
    pub trainee: Trainee,
    pub trade: Option<Trade>,
    pub lines: Vec<TraineeReportLine>,
    pub average_total: f64,
    pub is_passing: bool,
    pub grades: GradeDistribution,
}

/// One assessed trainee inside a module report.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModuleReportLine {
    pub mark: Mark,
    pub trainee: Option<Trainee>,
    pub grade: Grade,
}

/// Best or worst total in a module and who achieved it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExtremeMark {
    pub total: u32,
    pub trainee: Option<Trainee>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModuleReport {
    pub module: Module,
    /// Highest total first; equal totals keep collection order.
    pub lines: Vec<ModuleReportLine>,
    pub average_total: f64,
    /// Percentage of marks with a passing total.
    pub pass_rate: f64,
    pub highest: Option<ExtremeMark>,
    pub lowest: Option<ExtremeMark>,
}

/// Builds the dashboard overview.
pub fn dashboard_summary<R: CollectionRepository>(store: &RecordsStore<R>) -> DashboardSummary {
    let marks = store.marks();
    let mut recent_marks = marks.to_vec();
    recent_marks.sort_by(|a, b| b.mark_id.cmp(&a.mark_id));
    recent_marks.truncate(RECENT_MARKS_LIMIT);

    DashboardSummary {
        trade_count: store.trades().len(),
        trainee_count: store.trainees().len(),
        module_count: store.modules().len(),
        mark_count: marks.len(),
        passing_rate: passing_rate(marks),
        grades: GradeDistribution::from_totals(marks.iter().map(|mark| mark.total_marks100)),
        recent_marks,
    }
}

/// Builds the report for one trainee, `None` when the trainee is unknown.
pub fn trainee_report<R: CollectionRepository>(
    store: &RecordsStore<R>,
    trainee_id: TraineeId,
) -> Option<TraineeReport> {
    let trainee = store.trainee_by_id(trainee_id)?.clone();
    let marks = store.marks_by_trainee(trainee_id);
    let average_total = average_total(&marks);
    let grades = GradeDistribution::from_totals(marks.iter().map(|mark| mark.total_marks100));
    let lines = marks
        .into_iter()
        .map(|mark| TraineeReportLine {
            module: store.module_by_id(mark.module_id).cloned(),
            grade: Grade::from_total(mark.total_marks100),
            mark,
        })
        .collect();

    Some(TraineeReport {
        trade: store.trade_by_id(trainee.trade_id).cloned(),
        trainee,
        lines,
        average_total,
        is_passing: average_total >= f64::from(PASSING_TOTAL),
        grades,
    })
}

/// Builds the report for one module, `None` when the module is unknown.
pub fn module_report<R: CollectionRepository>(
    store: &RecordsStore<R>,
    module_id: ModuleId,
) -> Option<ModuleReport> {
    let module = store.module_by_id(module_id)?.clone();
    let marks = store.marks_by_module(module_id);

    let mut highest: Option<&Mark> = None;
    let mut lowest: Option<&Mark> = None;
    for mark in &marks {
        if highest.map_or(true, |best| mark.total_marks100 > best.total_marks100) {
            highest = Some(mark);
        }
        if lowest.map_or(true, |worst| mark.total_marks100 < worst.total_marks100) {
            lowest = Some(mark);
        }
    }
    let extreme = |mark: &Mark| ExtremeMark {
        total: mark.total_marks100,
        trainee: store.trainee_by_id(mark.trainee_id).cloned(),
    };
    let highest = highest.map(extreme);
    let lowest = lowest.map(extreme);

    let average_total = average_total(&marks);
    let pass_rate = passing_rate(&marks);
    let mut lines: Vec<ModuleReportLine> = marks
        .into_iter()
        .map(|mark| ModuleReportLine {
            trainee: store.trainee_by_id(mark.trainee_id).cloned(),
            grade: Grade::from_total(mark.total_marks100),
            mark,
        })
        .collect();
    lines.sort_by(|a, b| b.mark.total_marks100.cmp(&a.mark.total_marks100));

    Some(ModuleReport {
        module,
        lines,
        average_total,
        pass_rate,
        highest,
        lowest,
    })
}

fn average_total(marks: &[Mark]) -> f64 {
    if marks.is_empty() {
        return 0.0;
    }
    let sum: u64 = marks.iter().map(|mark| u64::from(mark.total_marks100)).sum();
    sum as f64 / marks.len() as f64
}

fn passing_rate(marks: &[Mark]) -> f64 {
    if marks.is_empty() {
        return 0.0;
    }
    let passed = marks
        .iter()
        .filter(|mark| mark.total_marks100 >= PASSING_TOTAL)
        .count();
    passed as f64 / marks.len() as f64 * 100.0
}
