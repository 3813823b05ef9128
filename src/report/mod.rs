pub mod error;
pub mod event_log;
pub mod text_report;

pub use error::ReportError;
pub use event_log::{EventLog, LogEntry, LogKind};
pub use text_report::SimulationReport;
