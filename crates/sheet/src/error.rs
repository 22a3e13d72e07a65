use thiserror::Error;

#[derive(Error, Debug)]
pub enum SheetError {
    #[error("Terminal error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Runtime error: {0}")]
    RuntimeInit(String),

    #[error("Logger error: {0}")]
    Logger(#[from] log::SetLoggerError),
}

// Create a type alias for convenience
pub type Result<T> = std::result::Result<T, SheetError>;
