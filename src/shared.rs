pub mod types;
pub mod settings;
pub mod errors;
pub mod error;


pub use error::{AppError, AppResult};
pub use errors::{CalcError, ConversionError, GraphError, SettingsError};
