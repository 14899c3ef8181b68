//! Utilities: logging, validation, money math

pub mod logger;
pub mod money;
pub mod validation;

pub use validation::ValidatedJson;
