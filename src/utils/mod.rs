pub mod error;
pub mod logger;
pub mod monitor;
pub mod ordered_map;
pub mod progress;
pub mod validation;
