use thiserror::Error;

#[derive(Error, Debug)]
pub enum DocQaError {
    #[error("not configured: {0}")]
    NotConfigured(String),
}
