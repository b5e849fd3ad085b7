use thiserror::Error;
use serde::Serialize;

use crate::shared::errors::{CalcError, ConversionError, GraphError, SettingsError};

#[derive(Error, Debug, Serialize)]
pub enum AppError {
    #[error("I/O Error: {0}")]
    Io(String),

    #[error(transparent)]
    Settings(#[from] SettingsError),

    #[error(transparent)]
    Conversion(#[from] ConversionError),

    #[error(transparent)]
    Calculation(#[from] CalcError),

    #[error(transparent)]
    Graph(#[from] GraphError),

    #[error("Validation Error: {0}")]
    Validation(String),
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::Io(err.to_string())
    }
}

pub type AppResult<T> = Result<T, AppError>;
