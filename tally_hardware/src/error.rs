use thiserror::Error;

#[derive(Debug, Error)]
pub enum HwError {
    #[error("weighing platform timeout")]
    Timeout,
    #[error("detector fault: {0}")]
    Detector(String),
    #[error("io: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, HwError>;
