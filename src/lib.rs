pub mod app;
pub mod errors;
pub mod handlers;
pub mod models;
pub mod report;
pub mod state;
pub mod storage;
pub mod store;
pub mod ui;

pub use app::router;
pub use errors::{AppError, HabitError};
pub use models::{Habit, HabitId, ReportSummary};
pub use report::{build_report, build_report_at};
pub use state::AppState;
pub use storage::{resolve_data_dir, FileStore, KeyValueStore, MemoryStore};
pub use store::HabitStore;
