use thiserror::Error;

#[derive(Error, Debug)]
pub enum ReportError {
    #[error("No simulation has been configured")]
    NotConfigured,
    #[error("Failed to write report: {0}")]
    Io(#[from] std::io::Error),
}
