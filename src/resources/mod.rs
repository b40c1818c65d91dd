pub mod config;
pub mod environment;

pub use config::*;
pub use environment::*;
