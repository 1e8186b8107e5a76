pub mod config;
pub mod error;

pub use self::config::{AppConfig, Features};
pub use self::error::{ClarityError, ClarityResult, ParseLabelError, ValidationError};
