pub mod error;
pub mod filename;
pub mod logger;
pub mod validation;
