//! Core records store for trades, trainees, modules and marks.
//! This crate is the single source of truth for assessment-record invariants.

pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod seed;
pub mod service;

pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::grade::{Grade, GradeDistribution, PASSING_TOTAL};
pub use model::mark::{calculate_total_marks, Mark, NewMark};
pub use model::module::{Module, NewModule};
pub use model::trade::{NewTrade, Trade};
pub use model::trainee::{Gender, NewTrainee, Trainee};
pub use model::user::User;
pub use model::{MarkId, ModuleId, TradeId, TraineeId, UserId, ValidationError, MAX_SCORE};
pub use repo::collection_repo::{
    CollectionKey, CollectionRepository, RepoError, RepoResult, SqliteCollectionRepository,
};
pub use service::records_store::{
    EntityKind, IdCounters, IntegrityViolation, RecordsStore, StoreError, StoreResult,
};
pub use service::report_service::{
    dashboard_summary, module_report, trainee_report, DashboardSummary, ExtremeMark,
    ModuleReport, ModuleReportLine, TraineeReport, TraineeReportLine,
};
pub use service::transfer::{parse_import, CollectionImport, Snapshot, TransferError};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
